//! Resolved results handed to external renderers.

use std::collections::BTreeMap;

use crate::actor::ActorId;
use crate::dice::CheckRoll;
use crate::hooks::{HookId, Phase};
use crate::ledger::ResourceKind;

use super::StatusChange;

/// One resource change on a target: what a hook asked for versus what the
/// ledger actually applied after clamping.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ResourceDelta {
    pub resource: ResourceKind,
    pub requested: i32,
    pub applied: i32,
}

/// The per-target result of a resolved action.
///
/// Owned by the lifecycle runner during Confirm, then read-only once the
/// [`ResolvedAction`] is returned.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Outcome {
    pub target: ActorId,

    /// The check rolled against this target, when the action rolls.
    pub roll: Option<CheckRoll>,

    /// Resource changes in application order. `applied` is filled in by the
    /// runner when the deltas land on the ledger.
    pub deltas: Vec<ResourceDelta>,

    /// Conditions applied to or removed from the target.
    pub statuses: StatusChange,

    /// Minimum health the target may end the action with, when a Confirm
    /// hook imposed one. Damage is trimmed to respect it; an already-lower
    /// target is left untouched, never healed up to the floor.
    pub health_floor: Option<i32>,
}

impl Outcome {
    pub fn new(target: ActorId) -> Self {
        Self {
            target,
            roll: None,
            deltas: Vec::new(),
            statuses: StatusChange::default(),
            health_floor: None,
        }
    }

    /// Requests a resource change; the runner fills in the applied amount.
    pub fn request(&mut self, resource: ResourceKind, amount: i32) {
        self.deltas.push(ResourceDelta {
            resource,
            requested: amount,
            applied: 0,
        });
    }

    /// Net applied change for one resource.
    pub fn applied(&self, resource: ResourceKind) -> i32 {
        self.deltas
            .iter()
            .filter(|d| d.resource == resource)
            .map(|d| d.applied)
            .sum()
    }
}

/// A Confirm/Post-Activate hook failure after the dice were already cast.
///
/// Faults are reported, never propagated: the rolls and outcomes that
/// already landed stay committed.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Fault {
    pub hook: HookId,
    pub phase: Phase,
    pub message: String,
}

/// Everything external consumers need to render a finished action.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ResolvedAction {
    pub action: HookId,
    pub actor: ActorId,

    /// Costs actually charged to the actor, requested vs applied.
    pub cost_paid: Vec<ResourceDelta>,

    /// One outcome per declared target, in declaration order.
    pub outcomes: Vec<Outcome>,

    /// The final bonus bag. Values hooks left for consumers outside the
    /// pipeline survive here (the Delay action's chosen initiative, for
    /// the turn tracker).
    pub bonuses: BTreeMap<String, i32>,

    /// Post-roll hook failures, surfaced as warnings.
    pub faults: Vec<Fault>,
}

impl ResolvedAction {
    /// The outcome for a specific target, if it was one.
    pub fn outcome_for(&self, target: ActorId) -> Option<&Outcome> {
        self.outcomes.iter().find(|o| o.target == target)
    }
}
