use oaslint_index::ParseError;
use thiserror::Error;

/// Errors raised while loading a ruleset definition.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("Invalid ruleset: {message}")]
    Invalid { message: String },

    #[error("Rule '{rule}' does not name a function")]
    MissingFunction { rule: String },
}

/// Errors that abort a lint run.
///
/// Ruleset problems never appear here: they are reported as findings of the
/// offending rule so the remaining rules still run.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MotorError {
    #[error(transparent)]
    Document(#[from] ParseError),
}

pub type Result<T> = std::result::Result<T, MotorError>;
