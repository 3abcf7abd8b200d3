//! Action resolution errors.
//!
//! Everything here aborts the pipeline *before* any dice are rolled or any
//! cost is paid. Failures after rolling are not errors on the action; they
//! surface as [`super::Fault`] records instead.

use crate::actor::ActorId;
use crate::env::OracleError;
use crate::error::{ErrorSeverity, RulesError};
use crate::hooks::{HookId, Rejection};
use crate::ledger::ResourceKind;

/// Errors that can occur while resolving a declared action.
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ActionError {
    /// A `can_use` or `pre_activate` hook vetoed the action.
    #[error("{hook}: {reason}")]
    ValidationRejected { hook: HookId, reason: String },

    /// The actor cannot pay the action's cost.
    #[error("insufficient {resource}: need {required}, have {available}")]
    InsufficientResource {
        resource: ResourceKind,
        required: i32,
        available: i32,
    },

    /// A required Pre-Activate prompt was dismissed.
    #[error("cancelled by user")]
    AbortedByUser,

    /// Acting actor not found in the roster.
    #[error("actor {0} not found")]
    ActorNotFound(ActorId),

    /// A declared target not found in the roster.
    #[error("target {0} not found")]
    TargetNotFound(ActorId),

    /// No profile registered for the declared action type.
    #[error("no action profile registered for {0}")]
    ProfileNotFound(HookId),

    /// A required oracle was missing from the environment.
    #[error(transparent)]
    Oracle(#[from] OracleError),
}

impl ActionError {
    /// Converts a pre-roll hook rejection into the pipeline error.
    pub(super) fn from_rejection(hook: &HookId, rejection: Rejection) -> Self {
        match rejection {
            Rejection::Rule(reason) => Self::ValidationRejected {
                hook: hook.clone(),
                reason,
            },
            Rejection::Insufficient {
                resource,
                required,
                available,
            } => Self::InsufficientResource {
                resource,
                required,
                available,
            },
            Rejection::Aborted => Self::AbortedByUser,
        }
    }
}

impl RulesError for ActionError {
    fn severity(&self) -> ErrorSeverity {
        use ActionError::*;
        match self {
            ValidationRejected { .. } | InsufficientResource { .. } | AbortedByUser => {
                ErrorSeverity::Recoverable
            }
            ActorNotFound(_) | TargetNotFound(_) | ProfileNotFound(_) => ErrorSeverity::Validation,
            Oracle(_) => ErrorSeverity::Fatal,
        }
    }

    fn error_code(&self) -> &'static str {
        use ActionError::*;
        match self {
            ValidationRejected { .. } => "ACTION_VALIDATION_REJECTED",
            InsufficientResource { .. } => "ACTION_INSUFFICIENT_RESOURCE",
            AbortedByUser => "ACTION_ABORTED_BY_USER",
            ActorNotFound(_) => "ACTION_ACTOR_NOT_FOUND",
            TargetNotFound(_) => "ACTION_TARGET_NOT_FOUND",
            ProfileNotFound(_) => "ACTION_PROFILE_NOT_FOUND",
            Oracle(_) => "ACTION_ORACLE_NOT_AVAILABLE",
        }
    }
}
