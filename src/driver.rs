//! Pieces of the `constpool` binary that are worth testing without a filesystem.
use crate::constants::{ConstantPool, Literal};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DriverError {
    #[error("refusing to overwrite the input file {0}, pass a different `--output`")]
    OutputIsInput(PathBuf),
}

/// Feeds every literal through the pool in order, writing one
/// `<literal> -> <label>` line per literal to `listing` (`none` for `None`).
pub fn pool_literals(
    literals: &[Literal],
    pool: &mut ConstantPool,
    listing: &mut impl Write,
) -> io::Result<()> {
    for literal in literals {
        match pool.label_for_literal(literal) {
            Some(label) => writeln!(listing, "{} -> {}", literal, label)?,
            None => writeln!(listing, "{} -> none", literal)?,
        }
    }
    Ok(())
}

/// Picks where the data section goes: `requested` if given, otherwise the input
/// with an `.s` extension. Never the input itself.
pub fn output_path(input: &Path, requested: Option<PathBuf>) -> Result<PathBuf, DriverError> {
    let output = requested.unwrap_or_else(|| input.with_extension("s"));
    let same_file = output == input
        || matches!(
            (input.canonicalize(), output.canonicalize()),
            (Ok(a), Ok(b)) if a == b
        );
    if same_file {
        return Err(DriverError::OutputIsInput(input.to_path_buf()));
    }
    Ok(output)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn listing_covers_every_literal() {
        let literals = [
            Literal::Integer(42),
            Literal::String("hi".into()),
            Literal::None,
            Literal::Integer(42),
            Literal::Boolean(true),
            Literal::Boolean(false),
            Literal::Integer(7),
        ];
        let mut pool = ConstantPool::new();
        let mut listing = Vec::new();
        pool_literals(&literals, &mut pool, &mut listing).unwrap();
        assert_eq!(
            String::from_utf8(listing).unwrap(),
            "42 -> const_2\n\
             \"hi\" -> const_3\n\
             None -> none\n\
             42 -> const_2\n\
             True -> const_1\n\
             False -> const_0\n\
             7 -> const_4\n"
        );
        assert_eq!(pool.allocated(), 5);
    }

    #[test]
    fn pooling_into_a_sink_still_allocates() {
        let mut pool = ConstantPool::new();
        pool_literals(&[Literal::String("x".into())], &mut pool, &mut io::sink()).unwrap();
        assert_eq!(pool.get_string_label("x").name(), "const_2");
    }

    #[test]
    fn default_output_swaps_extension() {
        let out = output_path(Path::new("dir/lits.txt"), None).unwrap();
        assert_eq!(out, PathBuf::from("dir/lits.s"));
    }

    #[test]
    fn explicit_output_is_kept() {
        let out = output_path(Path::new("lits.txt"), Some("data.s".into())).unwrap();
        assert_eq!(out, PathBuf::from("data.s"));
    }

    #[test]
    fn assembly_input_is_not_overwritten() {
        let err = output_path(Path::new("lits.s"), None).unwrap_err();
        assert!(matches!(err, DriverError::OutputIsInput(ref p) if p == Path::new("lits.s")));
        assert!(output_path(Path::new("lits.s"), Some("lits.s".into())).is_err());
    }

    #[test]
    fn same_file_through_another_path() {
        let dir = std::env::temp_dir().join(format!("constpool-driver-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let input = dir.join("lits.txt");
        std::fs::write(&input, "1\n").unwrap();
        let aliased = dir.join(".").join("lits.txt");
        let result = output_path(&input, Some(aliased));
        std::fs::remove_dir_all(&dir).unwrap();
        assert!(matches!(result, Err(DriverError::OutputIsInput(_))));
    }
}
