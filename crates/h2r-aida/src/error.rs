//! Error types for AIDA conversion.

use std::fmt;

use thiserror::Error;

use h2r_store::StoreError;

/// The grammar construct a parser state was waiting for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Expected {
    /// A comment or the start of a record.
    BeginOrComment,
    /// The record terminator.
    EndHistogram,
    /// The record terminator, before the input ran out (strict mode).
    EndBeforeEof,
}

impl fmt::Display for Expected {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expected::BeginOrComment => f.write_str("expected a comment or \"# BEGIN HISTOGRAM\""),
            Expected::EndHistogram => f.write_str("expected \"# END HISTOGRAM\""),
            Expected::EndBeforeEof => {
                f.write_str("expected \"# END HISTOGRAM\" before the end of the input")
            }
        }
    }
}

/// A line that does not fit the grammar of the current parser state.
#[derive(Error, Debug, Clone, PartialEq)]
#[error("Line {line}: {text}\n{expected}")]
pub struct FormatError {
    /// 1-based line number.
    pub line: usize,
    /// The offending line, verbatim.
    pub text: String,
    /// What the parser was waiting for.
    pub expected: Expected,
}

/// Conversion error type
#[derive(Error, Debug)]
pub enum Error {
    /// Reading the input failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Input does not follow the AIDA text grammar.
    #[error(transparent)]
    Format(#[from] FormatError),

    /// Placing a histogram into the store failed.
    #[error("store error: {0}")]
    Store(#[from] StoreError),
}

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;
