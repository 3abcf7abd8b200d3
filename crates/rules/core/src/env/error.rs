//! Errors raised when a required oracle is missing from the environment.

use crate::error::{ErrorSeverity, RulesError};

/// A lifecycle step asked the [`super::Env`] for an oracle that was never
/// provided. Always a wiring bug in the embedding application.
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum OracleError {
    #[error("config oracle not available")]
    ConfigNotAvailable,

    #[error("rng oracle not available")]
    RngNotAvailable,

    #[error("prompt oracle not available")]
    PromptsNotAvailable,

    #[error("action profile oracle not available")]
    ProfilesNotAvailable,
}

impl RulesError for OracleError {
    fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Fatal
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::ConfigNotAvailable => "ORACLE_CONFIG_NOT_AVAILABLE",
            Self::RngNotAvailable => "ORACLE_RNG_NOT_AVAILABLE",
            Self::PromptsNotAvailable => "ORACLE_PROMPTS_NOT_AVAILABLE",
            Self::ProfilesNotAvailable => "ORACLE_PROFILES_NOT_AVAILABLE",
        }
    }
}
