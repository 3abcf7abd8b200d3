//! Actor state as seen by the resolution engine.
//!
//! Actors are built by the embedding document layer (sheets, persistence
//! live there); the engine only needs pools, possessed hook identifiers,
//! and round-scoped flags. Nothing here is persisted by this crate.

use bitflags::bitflags;

use crate::hooks::HookId;
use crate::ledger::ResourceSet;

/// Identifies one actor within a session.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct ActorId(pub u32);

impl core::fmt::Display for ActorId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "actor:{}", self.0)
    }
}

bitflags! {
    /// Lingering flags set by Post-Activate hooks and consumed by later
    /// Prepare/Validate phases in the same round.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
    pub struct RoundFlags: u8 {
        /// A ranged weapon has been reloaded and may fire.
        const RELOADED          = 1 << 0;
        /// The basic strike has been used this round.
        const USED_BASIC_STRIKE = 1 << 1;
        /// The actor has already delayed this round.
        const DELAYED           = 1 << 2;
    }
}

impl RoundFlags {
    /// Flags that expire when the round ends. RELOADED persists until the
    /// shot is fired.
    pub const ROUND_SCOPED: Self = Self::USED_BASIC_STRIKE.union(Self::DELAYED);

    /// Clears everything that does not survive into the next round.
    pub fn end_round(&mut self) {
        *self = self.difference(Self::ROUND_SCOPED);
    }
}

/// One actor's engine-visible state.
#[derive(Clone, Debug)]
pub struct ActorState {
    pub id: ActorId,

    /// Display name for outcome rendering.
    pub name: String,

    /// Consumable pools, mutated only through the ledger API.
    pub resources: ResourceSet,

    /// Talents and items granting hook sets, in possession order.
    /// Lookup order during resolution follows this order exactly.
    pub talents: Vec<HookId>,

    /// Active conditions (also hook set ids), in application order.
    pub conditions: Vec<HookId>,

    /// Round-scoped flags written by Post-Activate hooks.
    pub flags: RoundFlags,

    /// Ability term used when this actor rolls initiative.
    pub initiative_bonus: i32,

    /// Boons and banes applied to this actor's initiative checks, derived
    /// by the document layer from statuses and gear.
    pub initiative_boons: i32,
    pub initiative_banes: i32,
}

impl ActorState {
    pub fn new(id: ActorId) -> Self {
        Self {
            id,
            name: String::new(),
            resources: ResourceSet::new(),
            talents: Vec::new(),
            conditions: Vec::new(),
            flags: RoundFlags::empty(),
            initiative_bonus: 0,
            initiative_boons: 0,
            initiative_banes: 0,
        }
    }

    /// Sets the display name (builder pattern).
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Sets the resource pools (builder pattern).
    #[must_use]
    pub fn with_resources(mut self, resources: ResourceSet) -> Self {
        self.resources = resources;
        self
    }

    /// Grants a talent hook set (builder pattern).
    #[must_use]
    pub fn with_talent(mut self, id: impl Into<HookId>) -> Self {
        self.talents.push(id.into());
        self
    }

    /// Applies a condition hook set (builder pattern).
    #[must_use]
    pub fn with_condition(mut self, id: impl Into<HookId>) -> Self {
        self.conditions.push(id.into());
        self
    }

    /// True if the actor currently has the given condition.
    pub fn has_condition(&self, id: &HookId) -> bool {
        self.conditions.contains(id)
    }

    /// Adds a condition unless already present.
    pub fn add_condition(&mut self, id: HookId) {
        if !self.conditions.contains(&id) {
            self.conditions.push(id);
        }
    }

    /// Removes a condition if present.
    pub fn remove_condition(&mut self, id: &HookId) {
        self.conditions.retain(|c| c != id);
    }

    /// All hook set ids this actor possesses, talents before conditions.
    pub fn possessed_hooks(&self) -> impl Iterator<Item = &HookId> {
        self.talents.iter().chain(self.conditions.iter())
    }
}

/// The set of actors participating in a session, in declaration order.
#[derive(Clone, Debug, Default)]
pub struct Roster {
    actors: Vec<ActorState>,
}

/// Errors raised by roster lookups.
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum RosterError {
    #[error("actor {0} not found in roster")]
    NotFound(ActorId),

    #[error("actor {0} already present in roster")]
    Duplicate(ActorId),
}

impl crate::error::RulesError for RosterError {
    fn severity(&self) -> crate::error::ErrorSeverity {
        crate::error::ErrorSeverity::Validation
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::NotFound(_) => "ROSTER_ACTOR_NOT_FOUND",
            Self::Duplicate(_) => "ROSTER_DUPLICATE_ACTOR",
        }
    }
}

impl Roster {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an actor; ids must be unique.
    pub fn insert(&mut self, actor: ActorState) -> Result<(), RosterError> {
        if self.actors.iter().any(|a| a.id == actor.id) {
            return Err(RosterError::Duplicate(actor.id));
        }
        self.actors.push(actor);
        Ok(())
    }

    pub fn actor(&self, id: ActorId) -> Option<&ActorState> {
        self.actors.iter().find(|a| a.id == id)
    }

    pub fn actor_mut(&mut self, id: ActorId) -> Option<&mut ActorState> {
        self.actors.iter_mut().find(|a| a.id == id)
    }

    pub fn contains(&self, id: ActorId) -> bool {
        self.actors.iter().any(|a| a.id == id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &ActorState> {
        self.actors.iter()
    }

    pub fn len(&self) -> usize {
        self.actors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.actors.is_empty()
    }
}
