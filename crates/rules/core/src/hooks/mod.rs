//! Lifecycle hook registry.
//!
//! Content packages (talents, items, conditions, action types) participate
//! in resolution by registering a [`LifecycleHooks`] implementation under
//! their identifier. The engine never knows individual content: it looks up
//! the hook sets for an action's identifier and for everything the acting
//! actor possesses, then calls each phase in that order.
//!
//! # Ordering
//!
//! Order is part of the contract. A lookup returns the action-type hooks
//! first, then the actor's talents and conditions in possession order;
//! target-scoped phases (`prepare_defenses`, `confirm`) additionally run
//! the target's own hooks. Later callbacks observe mutations made by
//! earlier ones.
//!
//! # Registration
//!
//! Registration is append-only and happens once at load. Re-registering an
//! identifier overwrites its hook set (last writer wins) but never affects
//! a [`HookStack`] already captured for an in-flight resolution - stacks
//! hold `Arc` clones of the entries they saw.

mod registry;

pub use registry::{HookRegistry, HookStack};

use std::borrow::Cow;
use std::fmt;

use crate::action::{ActionState, Outcome};
use crate::actor::ActorState;
use crate::combat::TurnContext;
use crate::dice::CheckInput;
use crate::env::GameEnv;
use crate::ledger::ResourceKind;

// ============================================================================
// Identifiers & Phases
// ============================================================================

/// Opaque identifier a hook set is registered under.
///
/// Action types, talents, items and conditions all share this namespace;
/// an actor "possesses" a hook set by carrying its id.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct HookId(Cow<'static, str>);

impl HookId {
    /// Wraps a static identifier without allocating.
    pub const fn from_static(id: &'static str) -> Self {
        Self(Cow::Borrowed(id))
    }

    pub fn new(id: impl Into<String>) -> Self {
        Self(Cow::Owned(id.into()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for HookId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&'static str> for HookId {
    fn from(id: &'static str) -> Self {
        Self::from_static(id)
    }
}

/// Lifecycle phases, in execution order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display)]
#[strum(serialize_all = "snake_case")]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Phase {
    Prepare,
    Validate,
    PreActivate,
    Roll,
    Confirm,
    PostActivate,
    StartTurn,
    EndTurn,
}

// ============================================================================
// Rejection
// ============================================================================

/// A hook's veto of the in-flight action.
///
/// Raised from `can_use` or `pre_activate` it aborts the whole action
/// before any cost is paid; raised from `confirm` or `post_activate` it is
/// downgraded to a fault because the dice are already cast.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Rejection {
    /// A rule forbids the action ("may not Delay twice a round").
    #[error("{0}")]
    Rule(String),

    /// The actor cannot pay a cost the hook requires.
    #[error("insufficient {resource}: need {required}, have {available}")]
    Insufficient {
        resource: ResourceKind,
        required: i32,
        available: i32,
    },

    /// The player dismissed a prompt the action cannot proceed without.
    #[error("cancelled by user")]
    Aborted,
}

impl Rejection {
    /// Convenience constructor for rule vetoes.
    pub fn rule(reason: impl Into<String>) -> Self {
        Self::Rule(reason.into())
    }
}

// ============================================================================
// Lifecycle Hooks
// ============================================================================

/// The callbacks a content package may bind to lifecycle phases.
///
/// Every method has a no-op default; a hook set implements only the phases
/// it cares about. All context arrives through explicit parameters - a hook
/// never reaches for ambient state.
///
/// Hooks within one phase run sequentially in lookup order and never
/// concurrently; determinism depends on this.
#[allow(unused_variables)]
pub trait LifecycleHooks: Send + Sync {
    /// Adjust cost, range, tags or modifiers before validation.
    fn prepare(&self, actor: &ActorState, action: &mut ActionState, env: &GameEnv<'_>) {}

    /// Veto the action. The first rejection aborts the pipeline with no
    /// state committed.
    fn can_use(
        &self,
        actor: &ActorState,
        action: &ActionState,
        env: &GameEnv<'_>,
    ) -> Result<(), Rejection> {
        Ok(())
    }

    /// Last chance to adjust or abort before costs are paid. May consult
    /// the prompt oracle; a dismissed optional prompt must be a no-op.
    fn pre_activate(
        &self,
        actor: &ActorState,
        action: &mut ActionState,
        env: &GameEnv<'_>,
    ) -> Result<(), Rejection> {
        Ok(())
    }

    /// Target-scoped: adjust the check rolled *against* the defender.
    /// Runs on the defender's own hook sets only.
    fn prepare_defenses(
        &self,
        action: &ActionState,
        defender: &ActorState,
        check: &mut CheckInput,
        env: &GameEnv<'_>,
    ) {
    }

    /// Finalize one target's outcome given its roll. Errors here become
    /// faults; they never unwind the roll.
    fn confirm(
        &self,
        actor: &ActorState,
        target: &ActorState,
        action: &ActionState,
        outcome: &mut Outcome,
        env: &GameEnv<'_>,
    ) -> Result<(), Rejection> {
        Ok(())
    }

    /// Record lingering flags on the actor after resolution ("reloaded",
    /// "used basic strike this round"). Errors become faults.
    fn post_activate(
        &self,
        actor: &mut ActorState,
        action: &ActionState,
        env: &GameEnv<'_>,
    ) -> Result<(), Rejection> {
        Ok(())
    }

    /// Turn-scoped accrual at the start of the owning actor's turn.
    fn start_turn(&self, actor: &mut ActorState, turn: &TurnContext, env: &GameEnv<'_>) {}

    /// Turn-scoped cleanup at the end of the owning actor's turn.
    fn end_turn(&self, actor: &mut ActorState, turn: &TurnContext, env: &GameEnv<'_>) {}

    /// Optional one-line note for the actor's sheet UI.
    fn sheet_note(&self, actor: &ActorState) -> Option<String> {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hook_id_display_matches_source() {
        assert_eq!(HookId::from_static("bloodmagic000000").to_string(), "bloodmagic000000");
        assert_eq!(HookId::new(String::from("strike")).as_str(), "strike");
    }

    #[test]
    fn phase_names_are_snake_case() {
        assert_eq!(Phase::PreActivate.to_string(), "pre_activate");
        assert_eq!(Phase::PostActivate.to_string(), "post_activate");
        assert_eq!(Phase::StartTurn.to_string(), "start_turn");
    }
}
