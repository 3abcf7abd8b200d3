//! Shared error classification for rules-core.
//!
//! Each module defines its own error enum next to the operations it guards
//! ([`crate::ActionError`], [`crate::CombatError`], and so on); this module
//! holds what they have in common. Every enum implements [`RulesError`] so
//! the embedding layer can route by severity and log a stable code without
//! matching on concrete variants.

/// How badly an error should be taken.
///
/// Rejections that the table expects during normal play (not enough focus,
/// a maneuver already spent) are [`Recoverable`](Self::Recoverable). Wiring
/// mistakes and corrupted sessions sit at the other end.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ErrorSeverity {
    /// The same declaration may succeed later in the encounter.
    ///
    /// Examples: insufficient focus, a maneuver already used this round
    Recoverable,

    /// The declaration itself is malformed; retrying unchanged cannot help.
    ///
    /// Examples: unknown actor, unknown action profile
    Validation,

    /// The engine reached a state it never should have. A bug.
    Internal,

    /// The session cannot continue.
    ///
    /// Examples: a required oracle missing from the environment
    Fatal,
}

impl ErrorSeverity {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Recoverable => "recoverable",
            Self::Validation => "validation",
            Self::Internal => "internal",
            Self::Fatal => "fatal",
        }
    }

    pub const fn is_recoverable(&self) -> bool {
        matches!(self, Self::Recoverable)
    }
}

/// Implemented by every error enum in the crate.
///
/// Derive `thiserror::Error` for the Display/Error impls and add this on
/// top; severity reflects recoverability, not how loud the failure is.
pub trait RulesError: core::fmt::Display + core::fmt::Debug {
    fn severity(&self) -> ErrorSeverity;

    /// Stable identifier for the variant, for metrics and log filters.
    fn error_code(&self) -> &'static str {
        core::any::type_name::<Self>()
    }
}
