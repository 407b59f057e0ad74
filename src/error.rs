//! Diagnostics for malformed literal files.
//!
//! Errors carry the file they came from and, when known, the offending line so
//! the driver can print it with a caret under the bad character:
//!
//! ```text
//! unexpected '?'
//!  --> lits.txt:1:6
//!   |
//! 1 | True ?
//!   |      ^
//! ```
use std::error;
use std::fmt;
use std::path::PathBuf;

#[derive(Debug, Clone)]
pub struct Error<T> {
    pub kind: T,
    file: Option<PathBuf>,
    excerpt: Option<Excerpt>,
    notes: Vec<&'static str>,
}

/// A byte range in the literal file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Span {
    pub offset: usize,
    pub len: usize,
}

impl Span {
    pub const fn new(offset: usize) -> Self {
        Self { offset, len: 1 }
    }
    pub const fn as_range(&self) -> std::ops::Range<usize> {
        self.offset..self.offset + self.len
    }

    /// Finds the line holding the start of the span. Spans at or past the end
    /// of the input have no excerpt.
    pub fn excerpt_in(&self, source: &SourceMetadata) -> Option<Excerpt> {
        let mut line_start = 0;
        for (line, text) in source.input().split_terminator('\n').enumerate() {
            let line_end = line_start + text.len();
            if self.offset <= line_end {
                let col = text.get(..self.offset - line_start)?.chars().count();
                return Some(Excerpt {
                    position: Position { line, col },
                    text: text.to_string(),
                });
            }
            line_start = line_end + 1;
        }
        None
    }
}

/// The literal file being lexed, plus its path when it came from disk.
#[derive(Debug)]
pub struct SourceMetadata<'a> {
    file: Option<PathBuf>,
    source: &'a str,
}

impl<'a> SourceMetadata<'a> {
    pub const fn new(source: &'a str) -> Self {
        Self { file: None, source }
    }
    pub const fn input(&self) -> &'a str {
        self.source
    }
    #[must_use]
    pub fn with_file(mut self, file: PathBuf) -> Self {
        self.file = Some(file);
        self
    }
}

impl<T> Error<T> {
    pub const fn new(kind: T) -> Self {
        Self {
            kind,
            file: None,
            excerpt: None,
            notes: Vec::new(),
        }
    }
    #[must_use]
    pub fn with_source(mut self, span: Span, source: &SourceMetadata) -> Self {
        self.file = source.file.clone();
        self.excerpt = span.excerpt_in(source);
        self
    }
    /// Records what was being lexed, printed as `= while <ctx>`.
    #[must_use]
    pub fn add_context(mut self, ctx: &'static str) -> Self {
        self.notes.push(ctx);
        self
    }
    pub fn position(&self) -> Option<Position> {
        self.excerpt.as_ref().map(|excerpt| excerpt.position)
    }
}

#[derive(Debug, Clone)]
pub struct Excerpt {
    position: Position,
    text: String,
}

/// Zero-based line, and column counted in characters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Position {
    pub line: usize,
    pub col: usize,
}

impl<T: error::Error + 'static> error::Error for Error<T> {
    fn source(&self) -> Option<&(dyn error::Error + 'static)> {
        Some(&self.kind)
    }
}

impl<T: fmt::Display> fmt::Display for Error<T> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.kind)?;
        let file = self
            .file
            .as_ref()
            .map(|file| file.display().to_string())
            .unwrap_or_else(|| "<input>".to_string());
        let gutter = match &self.excerpt {
            Some(excerpt) => {
                let line = (excerpt.position.line + 1).to_string();
                let pad = " ".repeat(line.len());
                write!(
                    f,
                    "\n{pad}--> {file}:{line}:{col}\n{pad} |\n{line} | {text}\n{pad} | {caret:>width$}",
                    col = excerpt.position.col + 1,
                    text = excerpt.text,
                    caret = '^',
                    width = excerpt.position.col + 1,
                )?;
                pad
            }
            None if self.file.is_some() => {
                write!(f, "\n --> {file}")?;
                " ".to_string()
            }
            None => String::new(),
        };
        for note in &self.notes {
            write!(f, "\n{gutter} = while {note}")?;
        }
        Ok(())
    }
}
