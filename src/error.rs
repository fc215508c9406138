use std::io;
use thiserror::Error;

/// Error type for CSV reading operations.
///
/// Positions are 1-based line and column numbers; columns count characters,
/// not bytes.
#[derive(Error, Debug)]
pub enum ReaderError {
    /// IO error while reading from the underlying source.
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// A source line was not valid UTF-8.
    #[error("invalid UTF-8 on line {line}")]
    InvalidUtf8 {
        /// 1-based line number of the offending line.
        line: usize,
    },

    /// A quote character appeared inside an unquoted value.
    #[error("quote character inside unquoted value at line {line}, column {column}")]
    QuoteInUnquotedValue {
        /// 1-based line number of the offending quote.
        line: usize,
        /// 1-based column of the offending quote.
        column: usize,
    },

    /// Non-whitespace content followed a closed quoted value before the
    /// next delimiter or end of line.
    #[error("unexpected text after quoted value at line {line}, column {column}")]
    TextAfterQuotedValue {
        /// 1-based line number of the offending character.
        line: usize,
        /// 1-based column of the offending character.
        column: usize,
    },

    /// An opening quote was never matched before the source ran out.
    #[error("quoted value opened at line {line}, column {column} is never closed")]
    QuoteStartWithoutEnd {
        /// 1-based line number of the opening quote.
        line: usize,
        /// 1-based column of the opening quote.
        column: usize,
    },

    /// Invalid configuration.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

/// Result type alias for reading operations.
pub type Result<T> = std::result::Result<T, ReaderError>;
