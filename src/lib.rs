pub mod assembly;
pub mod constants;
pub mod driver;
pub mod error;
pub mod lexer;
pub mod output;

pub use constants::{ConstantPool, Label, Literal};
