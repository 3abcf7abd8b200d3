//! Action declaration, working state, and the lifecycle pipeline.
//!
//! An action starts as an [`ActionDeclaration`] (who, what, against whom),
//! picks up its static data from an [`ActionProfile`], flows through the
//! [`LifecycleRunner`] as a mutable [`ActionState`], and ends as a
//! [`ResolvedAction`] holding one [`Outcome`] per target.

mod error;
mod lifecycle;
mod outcome;
mod state;

pub use error::ActionError;
pub use lifecycle::{LifecycleRunner, ResolutionSeed};
pub use outcome::{Fault, Outcome, ResolvedAction, ResourceDelta};
pub use state::{ActionState, StatusChange};

use std::collections::BTreeMap;
use std::fmt;

use crate::hooks::HookId;
use crate::ledger::ResourceKind;

// ============================================================================
// Profile Data
// ============================================================================

/// Coarse categories hooks use to recognize actions they care about.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum ActionTag {
    Attack,
    Maneuver,
    Spell,
    Ranged,
}

/// Minimum and maximum reach of an action, in squares.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RangeBand {
    pub minimum: u32,
    pub maximum: u32,
}

impl fmt::Display for RangeBand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.minimum == self.maximum {
            write!(f, "{}", self.maximum)
        } else {
            write!(f, "{}-{}", self.minimum, self.maximum)
        }
    }
}

/// The resource costs of an action, as an open map.
///
/// Hooks adjust entries freely during Prepare; the runner pays whatever the
/// record says once Pre-Activate has passed.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct CostRecord {
    entries: BTreeMap<ResourceKind, i32>,
}

impl CostRecord {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets one cost entry (builder pattern).
    #[must_use]
    pub fn with(mut self, resource: ResourceKind, amount: i32) -> Self {
        self.set(resource, amount);
        self
    }

    /// Cost in the given resource; 0 when absent.
    pub fn get(&self, resource: ResourceKind) -> i32 {
        self.entries.get(&resource).copied().unwrap_or(0)
    }

    /// Sets a cost entry, removing it when zero.
    pub fn set(&mut self, resource: ResourceKind, amount: i32) {
        if amount == 0 {
            self.entries.remove(&resource);
        } else {
            self.entries.insert(resource, amount);
        }
    }

    /// Adds to a cost entry.
    pub fn add(&mut self, resource: ResourceKind, amount: i32) {
        self.set(resource, self.get(resource) + amount);
    }

    /// True when nothing is owed.
    pub fn is_free(&self) -> bool {
        self.entries.values().all(|v| *v <= 0)
    }

    /// Iterates entries in resource order.
    pub fn iter(&self) -> impl Iterator<Item = (ResourceKind, i32)> + '_ {
        self.entries.iter().map(|(k, v)| (*k, *v))
    }
}

impl fmt::Display for CostRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.entries.is_empty() {
            return f.write_str("free");
        }
        let mut first = true;
        for (resource, amount) in self.iter() {
            if !first {
                f.write_str(", ")?;
            }
            write!(f, "{amount} {resource}")?;
            first = false;
        }
        Ok(())
    }
}

/// How an action's primary impact on each target is computed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum ImpactAmount {
    /// A fixed signed delta: positive restores, negative drains.
    Fixed(i32),

    /// The check total, applied as a drain (damage scales with the roll).
    CheckTotal,
}

/// The primary resource impact an action has on each target.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Impact {
    pub resource: ResourceKind,
    pub amount: ImpactAmount,
}

/// Per-roll numeric modifiers the acting actor brings to a check.
///
/// Supplied by the declaring layer (the sheet knows which ability and skill
/// an action uses); the engine only clamps and sums them.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CheckProfile {
    pub ability: i32,
    pub skill: i32,
    pub enchantment: i32,
}

/// Static definition of an action type.
///
/// Profiles are data: the content crate loads them from RON and serves
/// them through [`crate::env::ProfileOracle`].
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ActionProfile {
    pub id: HookId,
    pub name: String,

    /// Base cost before Prepare hooks adjust it.
    #[cfg_attr(feature = "serde", serde(default))]
    pub cost: CostRecord,

    #[cfg_attr(feature = "serde", serde(default))]
    pub range: RangeBand,

    #[cfg_attr(feature = "serde", serde(default))]
    pub tags: Vec<ActionTag>,

    /// Whether the action rolls a check, and its starting boons/banes.
    #[cfg_attr(feature = "serde", serde(default))]
    pub rolls_check: bool,

    #[cfg_attr(feature = "serde", serde(default))]
    pub base_boons: i32,

    #[cfg_attr(feature = "serde", serde(default))]
    pub base_banes: i32,

    /// Primary per-target impact, if the action has one.
    #[cfg_attr(feature = "serde", serde(default))]
    pub impact: Option<Impact>,

    /// Conditions inflicted on every target.
    #[cfg_attr(feature = "serde", serde(default))]
    pub inflicts: Vec<HookId>,
}

// ============================================================================
// Declaration
// ============================================================================

/// A player's declared intent, before any resolution has happened.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ActionDeclaration {
    pub actor: crate::actor::ActorId,

    /// Action-type identifier; also the first key of the hook lookup.
    pub action: HookId,

    /// Targets in declared order. Resolution processes them in this order.
    pub targets: Vec<crate::actor::ActorId>,

    /// Ability/skill/enchantment values for this use of the action.
    pub check: CheckProfile,
}

impl ActionDeclaration {
    pub fn new(actor: crate::actor::ActorId, action: impl Into<HookId>) -> Self {
        Self {
            actor,
            action: action.into(),
            targets: Vec::new(),
            check: CheckProfile::default(),
        }
    }

    /// Adds a target (builder pattern).
    #[must_use]
    pub fn with_target(mut self, target: crate::actor::ActorId) -> Self {
        self.targets.push(target);
        self
    }

    /// Sets the check modifiers (builder pattern).
    #[must_use]
    pub fn with_check(mut self, check: CheckProfile) -> Self {
        self.check = check;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cost_record_drops_zero_entries() {
        let mut cost = CostRecord::new().with(ResourceKind::Action, 2);
        cost.add(ResourceKind::Action, -2);
        assert!(cost.is_free());
        assert_eq!(cost.iter().count(), 0);
    }

    #[test]
    fn cost_record_renders_human_readable() {
        let cost = CostRecord::new()
            .with(ResourceKind::Action, 1)
            .with(ResourceKind::Focus, 2);
        assert_eq!(cost.to_string(), "1 action, 2 focus");
        assert_eq!(CostRecord::new().to_string(), "free");
    }

    #[test]
    fn range_band_renders_collapsed_when_flat() {
        assert_eq!(RangeBand { minimum: 1, maximum: 1 }.to_string(), "1");
        assert_eq!(RangeBand { minimum: 2, maximum: 6 }.to_string(), "2-6");
    }
}
