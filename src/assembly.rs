//! Data section rendering of a [`ConstantPool`].
//!
//! The layout is deliberately plain: each entry is word aligned, integers and
//! booleans are a single `.word`, strings are their byte length followed by
//! the NUL terminated contents.
use crate::constants::{Constant, ConstantPool, ConstantValue, Label};
use crate::output::Output;
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Assembly {
    Directive(Directive),
    Label(Label),
    Comment(String),
}

impl fmt::Display for Assembly {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::Directive(direct) => write!(f, "\t.{}", direct),
            Self::Label(label) => write!(f, "{}:", label),
            Self::Comment(comment) => write!(f, "# {}", comment),
        }
    }
}

impl From<Directive> for Assembly {
    fn from(directive: Directive) -> Self {
        Self::Directive(directive)
    }
}

impl From<Label> for Assembly {
    fn from(label: Label) -> Self {
        Self::Label(label)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Directive {
    Data,
    /// Align to `2^n` bytes
    Align(u8),
    Word(i32),
    String(String),
}

impl fmt::Display for Directive {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::Data => f.write_str("data"),
            Self::Align(n) => write!(f, "align {}", n),
            Self::Word(value) => write!(f, "word {}", value),
            Self::String(value) => write!(f, "string \"{}\"", escape(value)),
        }
    }
}

fn escape(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for ch in value.chars() {
        match ch {
            '"' => escaped.push_str("\\\""),
            '\\' => escaped.push_str("\\\\"),
            '\n' => escaped.push_str("\\n"),
            '\t' => escaped.push_str("\\t"),
            ch => escaped.push(ch),
        }
    }
    escaped
}

fn constant_directives(constant: &Constant) -> Output<Assembly> {
    let output: Output<Assembly> = Output::new()
        .chain_single(Directive::Align(2))
        .chain_single(constant.label);
    match constant.value {
        ConstantValue::Boolean(value) => output.chain_single(Directive::Word(value.into())),
        ConstantValue::Integer(value) => output.chain_single(Directive::Word(value)),
        ConstantValue::String(value) => {
            // saturates for strings over 2GiB, which the lexer can't produce anyway
            let len = i32::try_from(value.len()).unwrap_or(i32::MAX);
            output.chain([Directive::Word(len), Directive::String(value.to_string())])
        }
    }
}

/// Renders every entry of the pool, in label order.
pub fn data_section(pool: &ConstantPool) -> Output<Assembly> {
    let entries = pool.entries();
    tracing::debug!(target: "datagen", "rendering {} constants", entries.len());
    let mut output: Output<Assembly> = Output::singleton(Directive::Data);
    for constant in &entries {
        tracing::trace!(target: "datagen", "{} = {:?}", constant.label, constant.value);
        output.extend(constant_directives(constant));
    }
    output
}
