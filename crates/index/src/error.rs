use thiserror::Error;

/// Errors raised while building a [`DocumentIndex`](crate::DocumentIndex).
///
/// Any of these is fatal for a lint run: no rule is evaluated against a
/// document that failed to parse.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("Document is not valid UTF-8: {0}")]
    InvalidUtf8(String),

    #[error("Unable to parse document at line {line}, column {column}: {message}")]
    Syntax {
        line: u32,
        column: u32,
        message: String,
    },

    #[error("Alias at line {line}, column {column} refers to an unknown or unfinished anchor")]
    UnknownAlias { line: u32, column: u32 },
}
