//! The mutable usage record flowing through the lifecycle.

use std::collections::BTreeMap;

use arrayvec::ArrayVec;

use crate::actor::ActorId;
use crate::config::RulesConfig;
use crate::hooks::HookId;

use super::{ActionDeclaration, ActionProfile, ActionTag, CheckProfile, CostRecord, Impact, RangeBand};

/// Conditions queued for application to or removal from one actor.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StatusChange {
    pub add: ArrayVec<HookId, { RulesConfig::MAX_STATUS_CHANGES }>,
    pub remove: ArrayVec<HookId, { RulesConfig::MAX_STATUS_CHANGES }>,
}

impl StatusChange {
    /// Queues a condition for application, ignoring overflow and duplicates.
    pub fn queue_add(&mut self, id: HookId) {
        if !self.add.contains(&id) && !self.add.is_full() {
            self.add.push(id);
        }
    }

    /// Queues a condition for removal, ignoring overflow and duplicates.
    pub fn queue_remove(&mut self, id: HookId) {
        if !self.remove.contains(&id) && !self.remove.is_full() {
            self.remove.push(id);
        }
    }

    /// Merges another change set into this one.
    pub fn merge(&mut self, other: &StatusChange) {
        for id in &other.add {
            self.queue_add(id.clone());
        }
        for id in &other.remove {
            self.queue_remove(id.clone());
        }
    }

    pub fn is_empty(&self) -> bool {
        self.add.is_empty() && self.remove.is_empty()
    }
}

/// The working state of one action as it moves through the pipeline.
///
/// Created when the action is declared, mutated exclusively by lifecycle
/// phases and their hooks in declared order, consumed into ledger deltas
/// and outcomes at the end, then discarded. Never persisted.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ActionState {
    pub actor: ActorId,
    pub action: HookId,
    pub name: String,

    /// Declared targets; resolution order is declaration order.
    pub targets: Vec<ActorId>,

    /// Cost still owed; hooks rewrite this freely before validation.
    pub cost: CostRecord,

    pub range: RangeBand,
    pub tags: Vec<ActionTag>,

    /// Check modifiers, present when the action rolls.
    pub check: Option<CheckProfile>,

    /// Working boon/bane tallies. Clamping happens at pool build time.
    pub boons: i32,
    pub banes: i32,

    /// Open bag of named numeric adjustments hooks leave for each other
    /// (a Pre-Activate hook computes a damage bonus, Confirm reads it).
    pub bonuses: BTreeMap<String, i32>,

    /// Status changes queued per target, applied when outcomes land.
    pub pending_statuses: BTreeMap<ActorId, StatusChange>,

    /// Primary per-target impact, if any.
    pub impact: Option<Impact>,
}

impl ActionState {
    /// Builds an empty state with no profile data attached.
    ///
    /// Resolution always goes through [`ActionState::from_profile`]; this
    /// constructor exists for tools and tests that drive hooks directly.
    pub fn new(actor: ActorId, action: impl Into<HookId>) -> Self {
        Self {
            actor,
            action: action.into(),
            name: String::new(),
            targets: Vec::new(),
            cost: CostRecord::new(),
            range: RangeBand::default(),
            tags: Vec::new(),
            check: None,
            boons: 0,
            banes: 0,
            bonuses: BTreeMap::new(),
            pending_statuses: BTreeMap::new(),
            impact: None,
        }
    }

    /// Builds the initial state from a declaration and its profile.
    pub fn from_profile(declaration: &ActionDeclaration, profile: &ActionProfile) -> Self {
        let mut pending_statuses: BTreeMap<ActorId, StatusChange> = BTreeMap::new();
        if !profile.inflicts.is_empty() {
            for target in &declaration.targets {
                let change = pending_statuses.entry(*target).or_default();
                for id in &profile.inflicts {
                    change.queue_add(id.clone());
                }
            }
        }

        Self {
            actor: declaration.actor,
            action: profile.id.clone(),
            name: profile.name.clone(),
            targets: declaration.targets.clone(),
            cost: profile.cost.clone(),
            range: profile.range,
            tags: profile.tags.clone(),
            check: profile.rolls_check.then_some(declaration.check),
            boons: profile.base_boons,
            banes: profile.base_banes,
            bonuses: BTreeMap::new(),
            pending_statuses,
            impact: profile.impact,
        }
    }

    pub fn has_tag(&self, tag: ActionTag) -> bool {
        self.tags.contains(&tag)
    }

    /// Reads a named bonus; 0 when unset.
    pub fn bonus(&self, name: &str) -> i32 {
        self.bonuses.get(name).copied().unwrap_or(0)
    }

    /// Adds to a named bonus.
    pub fn add_bonus(&mut self, name: impl Into<String>, amount: i32) {
        *self.bonuses.entry(name.into()).or_insert(0) += amount;
    }

    /// Queues a status change against a target.
    pub fn queue_status(&mut self, target: ActorId) -> &mut StatusChange {
        self.pending_statuses.entry(target).or_default()
    }
}
