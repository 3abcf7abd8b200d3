//! Runtime-level errors.

use rules_content::ProfileLoadError;
use rules_core::{ActionError, CombatError, RosterError};

/// Errors surfaced by the session API.
#[derive(Debug, thiserror::Error)]
pub enum RuntimeError {
    /// The engine rejected or aborted the action before rolling.
    #[error(transparent)]
    Action(#[from] ActionError),

    /// Round control failed.
    #[error(transparent)]
    Combat(#[from] CombatError),

    /// Roster mutation failed.
    #[error(transparent)]
    Roster(#[from] RosterError),

    /// The embedded content catalog failed to load.
    #[error(transparent)]
    Profiles(#[from] ProfileLoadError),

    /// A resolution task was cancelled or panicked.
    #[error("resolution task failed: {0}")]
    TaskFailed(String),
}

pub type Result<T> = std::result::Result<T, RuntimeError>;
