//! CLI argument parsing using clap derive

use std::path::PathBuf;

use clap::{ArgAction, Parser, ValueEnum};
use refsync_engine::EndOfLine;

/// refsync - Update reference blocks from their canonical sources
#[derive(Parser, Debug)]
#[command(name = "refsync")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// The files or folders to update
    #[arg(required = true, value_name = "PATH")]
    pub paths: Vec<PathBuf>,

    /// Recurse into subfolders
    #[arg(long, default_value_t = true, action = ArgAction::Set, value_name = "BOOL")]
    pub recurse: bool,

    /// End-of-line handling for inserted content when a block sets no
    /// `eol` option
    #[arg(long = "end-of-line", value_enum, default_value_t = EolValue::Auto)]
    pub end_of_line: EolValue,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,
}

/// Command-line form of [`EndOfLine`].
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum EolValue {
    #[value(name = "as-is")]
    AsIs,
    Auto,
    Cr,
    Lf,
    Crlf,
}

impl From<EolValue> for EndOfLine {
    fn from(value: EolValue) -> Self {
        match value {
            EolValue::AsIs => Self::AsIs,
            EolValue::Auto => Self::Auto,
            EolValue::Cr => Self::Cr,
            EolValue::Lf => Self::Lf,
            EolValue::Crlf => Self::Crlf,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let cli = Cli::parse_from(["refsync", "some/dir"]);
        assert!(cli.recurse);
        assert_eq!(cli.end_of_line, EolValue::Auto);
        assert!(!cli.verbose);
    }

    #[test]
    fn test_recurse_can_be_disabled() {
        let cli = Cli::parse_from(["refsync", "--recurse", "false", "dir"]);
        assert!(!cli.recurse);
    }

    #[test]
    fn test_end_of_line_values() {
        let cli = Cli::parse_from(["refsync", "--end-of-line", "as-is", "dir"]);
        assert_eq!(cli.end_of_line, EolValue::AsIs);
        let cli = Cli::parse_from(["refsync", "--end-of-line", "crlf", "dir"]);
        assert_eq!(cli.end_of_line, EolValue::Crlf);
    }

    #[test]
    fn test_paths_are_required() {
        assert!(Cli::try_parse_from(["refsync"]).is_err());
    }
}
