//! Severity types for lint rules.

use serde::{Deserialize, Serialize};

/// Rule severity, as declared by a rule and carried onto each finding.
///
/// Ordered from most to least severe, so sorting ascending puts errors first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RuleSeverity {
    /// A violation that makes the document incorrect
    Error,
    /// A likely problem (default)
    #[default]
    #[serde(rename = "warning", alias = "warn")]
    Warn,
    /// Informational finding
    Info,
    /// A suggestion or style recommendation
    Hint,
}

impl RuleSeverity {
    /// Returns true if this severity indicates an error.
    #[must_use]
    pub const fn is_error(self) -> bool {
        matches!(self, Self::Error)
    }
}

impl std::fmt::Display for RuleSeverity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Error => write!(f, "error"),
            Self::Warn => write!(f, "warning"),
            Self::Info => write!(f, "info"),
            Self::Hint => write!(f, "hint"),
        }
    }
}
