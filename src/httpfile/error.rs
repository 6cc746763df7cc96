//! Definition format errors.

use thiserror::Error;

/// A malformed route definition, located by file and 1-based line.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{file}:{line}: {kind}")]
pub struct FormatError {
    pub file: String,
    pub line: usize,
    pub kind: FormatErrorKind,
}

/// What was wrong with the definition.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormatErrorKind {
    #[error("definition file is empty")]
    Empty,

    #[error("expected `<method> <url>` request line, found `{0}`")]
    BadRequestLine(String),

    #[error("invalid url `{0}`")]
    InvalidUrl(String),
}

impl FormatError {
    pub fn new(file: impl Into<String>, line: usize, kind: FormatErrorKind) -> Self {
        Self {
            file: file.into(),
            line,
            kind,
        }
    }
}
