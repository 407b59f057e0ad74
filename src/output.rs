use std::{collections::vec_deque::VecDeque, fmt, iter::FromIterator};

/// An ordered sequence of emitted items, each displayed on its own line.
#[repr(transparent)]
#[derive(Debug, Default)]
pub struct Output<O> {
    inner: VecDeque<O>,
}

impl<O> Output<O> {
    /// Get a fresh, empty `Output<O>` structure. This is used as a fallback
    /// in case your type is not `Default`able.
    pub fn new() -> Self {
        Self {
            inner: VecDeque::new(),
        }
    }
    pub fn singleton(value: impl Into<O>) -> Self {
        Self::new().chain_single(value)
    }
    pub fn len(&self) -> usize {
        self.inner.len()
    }
    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    pub fn push(&mut self, value: impl Into<O>) {
        self.inner.push_back(value.into())
    }
    pub fn cons(&mut self, value: impl Into<O>) {
        self.inner.push_front(value.into())
    }
    pub fn extend<T: Into<O>>(&mut self, iter: impl IntoIterator<Item = T>) {
        self.inner.extend(iter.into_iter().map(Into::into))
    }

    pub fn chain_single(mut self, value: impl Into<O>) -> Self {
        self.push(value);
        self
    }

    pub fn chain<T: Into<O>>(mut self, iter: impl IntoIterator<Item = T>) -> Self {
        self.extend(iter);
        self
    }
}

impl<O: fmt::Display> fmt::Display for Output<O> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for line in &self.inner {
            writeln!(f, "{}", line)?;
        }
        Ok(())
    }
}

// this impl forwards to VecDeque's `IntoIterator`
impl<O> IntoIterator for Output<O> {
    type IntoIter = <VecDeque<O> as IntoIterator>::IntoIter;
    type Item = <Self::IntoIter as IntoIterator>::Item;
    fn into_iter(self) -> Self::IntoIter {
        self.inner.into_iter()
    }
}

impl<O, T> FromIterator<T> for Output<O>
where
    T: Into<O>,
{
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self {
            inner: VecDeque::from_iter(iter.into_iter().map(Into::into)),
        }
    }
}
