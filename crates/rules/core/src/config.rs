/// Rules configuration constants and tunable parameters.
///
/// Built once at startup by the embedding application and passed by
/// reference into the lifecycle runner and combat controller. Never stored
/// in a global.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RulesConfig {
    /// Action points refreshed for the current combatant at the start of
    /// each of their turns.
    pub action_points_per_turn: i32,

    /// Heroism accrual required per threshold, multiplied by the number of
    /// undefeated participants in the encounter.
    pub heroism_per_participant: u32,
}

impl RulesConfig {
    // ===== compile-time constants used by the dice pool builder =====
    /// Number of dice in a standard check pool.
    pub const POOL_SIZE: usize = 3;
    /// Faces of each die before boons and banes are applied.
    pub const BASE_DIE_FACES: u8 = 8;
    /// Smallest die a bane can step down to.
    pub const DIE_MIN_FACES: u8 = 4;
    /// Largest die a boon can step up to.
    pub const DIE_MAX_FACES: u8 = 12;
    /// Faces added or removed by a single boon or bane step.
    pub const DIE_STEP: u8 = 2;

    // ===== modifier clamp ranges =====
    pub const MAX_BOONS: i32 = 6;
    pub const MAX_BANES: i32 = 6;
    pub const MAX_ABILITY: i32 = 12;
    pub const MAX_SKILL: i32 = 12;
    pub const MAX_ENCHANTMENT: i32 = 6;

    // ===== structural limits =====
    /// Maximum status changes a single outcome can carry.
    pub const MAX_STATUS_CHANGES: usize = 8;

    // ===== runtime-tunable defaults =====
    pub const DEFAULT_ACTION_POINTS_PER_TURN: i32 = 3;
    pub const DEFAULT_HEROISM_PER_PARTICIPANT: u32 = 2;

    pub fn new() -> Self {
        Self {
            action_points_per_turn: Self::DEFAULT_ACTION_POINTS_PER_TURN,
            heroism_per_participant: Self::DEFAULT_HEROISM_PER_PARTICIPANT,
        }
    }
}

impl Default for RulesConfig {
    fn default() -> Self {
        Self::new()
    }
}
