//! Deduplicated literal constants for the data section.
//!
//! Every literal the code generator meets is turned into a [`Label`] that names
//! its entry in the data section. Equal values share one entry, so a program that
//! uses `42` twenty times still only emits it once.
use itertools::Itertools;
use std::collections::HashMap;
use std::fmt;

/// The symbolic name of a constant in the data section, rendered as `const_<n>`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Label {
    suffix: usize,
}

impl Label {
    pub const fn suffix(self) -> usize {
        self.suffix
    }
    pub fn name(self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "const_{}", self.suffix)
    }
}

/// A literal value as it appears in the source program.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Literal {
    Integer(i32),
    String(String),
    Boolean(bool),
    None,
}

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::Integer(value) => write!(f, "{}", value),
            Self::String(value) => write!(f, "{:?}", value),
            Self::Boolean(true) => f.write_str("True"),
            Self::Boolean(false) => f.write_str("False"),
            Self::None => f.write_str("None"),
        }
    }
}

/// The value stored behind a pool entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConstantValue<'pool> {
    Integer(i32),
    String(&'pool str),
    Boolean(bool),
}

/// One entry of the pool, as seen by the data section emitter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Constant<'pool> {
    pub label: Label,
    pub value: ConstantValue<'pool>,
}

/// Store of every constant requested during one code generation pass.
///
/// `False` and `True` always take the first two labels (`const_0` and `const_1`),
/// everything else is numbered in request order.
#[derive(Debug)]
pub struct ConstantPool {
    next_suffix: usize,
    false_constant: Label,
    true_constant: Label,
    int_constants: HashMap<i32, Label>,
    str_constants: HashMap<String, Label>,
}

impl Default for ConstantPool {
    fn default() -> Self {
        Self::new()
    }
}

impl ConstantPool {
    pub fn new() -> Self {
        let mut next_suffix = 0;
        let mut next = || {
            let suffix = next_suffix;
            next_suffix += 1;
            Label { suffix }
        };
        // order matters: `False` must be `const_0`
        let false_constant = next();
        let true_constant = next();
        Self {
            next_suffix,
            false_constant,
            true_constant,
            int_constants: HashMap::new(),
            str_constants: HashMap::new(),
        }
    }

    /// Generates a label no other call on this pool has returned.
    pub fn allocate_label(&mut self) -> Label {
        let label = Label {
            suffix: self.next_suffix,
        };
        self.next_suffix += 1;
        tracing::trace!(target: "constants::alloc", "allocated {label}");
        label
    }

    pub const fn get_bool_label(&self, value: bool) -> Label {
        if value {
            self.true_constant
        } else {
            self.false_constant
        }
    }

    pub fn get_int_label(&mut self, value: i32) -> Label {
        if let Some(&label) = self.int_constants.get(&value) {
            tracing::trace!(target: "constants", "reusing {label} for int {value}");
            return label;
        }
        let label = self.allocate_label();
        self.int_constants.insert(value, label);
        tracing::debug!(target: "constants", "new int constant {value} -> {label}");
        label
    }

    pub fn get_string_label(&mut self, value: &str) -> Label {
        if let Some(&label) = self.str_constants.get(value) {
            tracing::trace!(target: "constants", "reusing {label} for str {value:?}");
            return label;
        }
        let label = self.allocate_label();
        self.str_constants.insert(value.to_owned(), label);
        tracing::debug!(target: "constants", "new str constant {value:?} -> {label}");
        label
    }

    /// Returns the label a literal is stored under, or `None` for the `None` literal,
    /// which has no data section entry.
    pub fn label_for_literal(&mut self, literal: &Literal) -> Option<Label> {
        match literal {
            Literal::Integer(value) => Some(self.get_int_label(*value)),
            Literal::String(value) => Some(self.get_string_label(value)),
            Literal::Boolean(value) => Some(self.get_bool_label(*value)),
            Literal::None => None,
        }
    }

    /// Number of labels handed out so far, including the two boolean ones.
    pub const fn allocated(&self) -> usize {
        self.next_suffix
    }

    pub fn bool_constants(&self) -> [(bool, Label); 2] {
        [(false, self.false_constant), (true, self.true_constant)]
    }

    pub fn int_constants(&self) -> impl Iterator<Item = (i32, Label)> + '_ {
        self.int_constants.iter().map(|(&value, &label)| (value, label))
    }

    pub fn string_constants(&self) -> impl Iterator<Item = (&str, Label)> + '_ {
        self.str_constants
            .iter()
            .map(|(value, &label)| (value.as_str(), label))
    }

    /// All entries of the pool, ordered by label.
    pub fn entries(&self) -> Vec<Constant<'_>> {
        let bools = self
            .bool_constants()
            .into_iter()
            .map(|(value, label)| Constant {
                label,
                value: ConstantValue::Boolean(value),
            });
        let ints = self.int_constants().map(|(value, label)| Constant {
            label,
            value: ConstantValue::Integer(value),
        });
        let strs = self.string_constants().map(|(value, label)| Constant {
            label,
            value: ConstantValue::String(value),
        });
        bools
            .chain(ints)
            .chain(strs)
            .sorted_by_key(|constant| constant.label)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn booleans_take_first_labels() {
        let pool = ConstantPool::new();
        assert_eq!(pool.get_bool_label(false).name(), "const_0");
        assert_eq!(pool.get_bool_label(true).name(), "const_1");
        assert_eq!(pool.allocated(), 2);
    }

    #[test]
    fn boolean_labels_are_singletons() {
        let mut pool = ConstantPool::new();
        let t = pool.get_bool_label(true);
        let f = pool.get_bool_label(false);
        pool.get_int_label(3);
        pool.get_string_label("x");
        assert_eq!(pool.get_bool_label(true), t);
        assert_eq!(pool.get_bool_label(false), f);
        assert_ne!(t, f);
        assert_eq!(pool.allocated(), 4);
    }

    #[test]
    fn equal_ints_share_a_label() {
        let mut pool = ConstantPool::new();
        let a = pool.get_int_label(-5);
        let b = pool.get_int_label(-5);
        assert_eq!(a, b);
        assert_eq!(pool.allocated(), 3);
    }

    #[test]
    fn distinct_values_get_distinct_labels() {
        let mut pool = ConstantPool::new();
        let ints: Vec<_> = [0, 1, -1, i32::MAX, i32::MIN]
            .into_iter()
            .map(|v| pool.get_int_label(v))
            .collect();
        let strs: Vec<_> = ["", "a", "A", "a ", "0"]
            .into_iter()
            .map(|v| pool.get_string_label(v))
            .collect();
        let all: Vec<_> = ints.iter().chain(strs.iter()).collect();
        assert!(all.iter().all_unique());
    }

    #[test]
    fn int_and_string_tables_are_separate() {
        let mut pool = ConstantPool::new();
        let int = pool.get_int_label(1);
        let string = pool.get_string_label("1");
        assert_ne!(int, string);
        assert_ne!(int, pool.get_bool_label(true));
    }

    #[test]
    fn strings_compare_by_content() {
        let mut pool = ConstantPool::new();
        let owned = String::from("hello");
        let a = pool.get_string_label("hello");
        let b = pool.get_string_label(&owned);
        assert_eq!(a, b);
        assert_ne!(a, pool.get_string_label("Hello"));
    }

    #[test]
    fn allocated_suffixes_increase() {
        let mut pool = ConstantPool::new();
        let labels = [
            pool.allocate_label(),
            pool.get_int_label(9),
            pool.allocate_label(),
            pool.get_string_label("s"),
            pool.allocate_label(),
        ];
        let suffixes: Vec<_> = labels.iter().map(|l| l.suffix()).collect();
        assert_eq!(suffixes, vec![2, 3, 4, 5, 6]);
        assert!(labels.iter().all(|l| l.name().starts_with("const_")));
    }

    #[test]
    fn literal_dispatch() {
        let mut pool = ConstantPool::new();
        let direct = pool.get_int_label(12);
        assert_eq!(pool.label_for_literal(&Literal::Integer(12)), Some(direct));
        assert_eq!(
            pool.label_for_literal(&Literal::Boolean(true)),
            Some(pool.get_bool_label(true))
        );
        let s = pool.label_for_literal(&Literal::String("abc".into()));
        assert_eq!(s, Some(pool.get_string_label("abc")));
        assert_eq!(pool.label_for_literal(&Literal::None), None);
        assert_eq!(pool.allocated(), 4);
    }

    #[test]
    fn scenario() {
        let mut pool = ConstantPool::new();
        assert_eq!(pool.get_bool_label(false).to_string(), "const_0");
        assert_eq!(pool.get_bool_label(true).to_string(), "const_1");
        assert_eq!(pool.get_int_label(42).to_string(), "const_2");
        assert_eq!(pool.get_int_label(42).to_string(), "const_2");
        assert_eq!(pool.get_string_label("hi").to_string(), "const_3");
        assert_eq!(pool.get_int_label(7).to_string(), "const_4");
        assert_eq!(pool.label_for_literal(&Literal::None), None);
    }

    #[test]
    fn entries_are_ordered_by_label() {
        let mut pool = ConstantPool::new();
        pool.get_string_label("b");
        pool.get_int_label(100);
        pool.allocate_label();
        pool.get_string_label("a");
        pool.get_int_label(100);
        let entries = pool.entries();
        let values: Vec<_> = entries.iter().map(|c| c.value).collect();
        assert_eq!(
            values,
            vec![
                ConstantValue::Boolean(false),
                ConstantValue::Boolean(true),
                ConstantValue::String("b"),
                ConstantValue::Integer(100),
                ConstantValue::String("a"),
            ]
        );
        assert_eq!(entries[4].label.suffix(), 5);
    }

    #[test]
    fn pools_are_independent() {
        let mut first = ConstantPool::new();
        first.get_int_label(1);
        first.get_int_label(2);
        let mut second = ConstantPool::new();
        assert_eq!(second.get_int_label(2).name(), "const_2");
    }

    #[test]
    fn literal_display() {
        assert_eq!(Literal::Integer(-3).to_string(), "-3");
        assert_eq!(Literal::String("a\"b".into()).to_string(), r#""a\"b""#);
        assert_eq!(Literal::Boolean(false).to_string(), "False");
        assert_eq!(Literal::None.to_string(), "None");
    }
}
