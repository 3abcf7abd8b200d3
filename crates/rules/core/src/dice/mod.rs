//! Dice pool construction for standard checks.
//!
//! A standard check rolls a pool of three dice plus an ability term, a skill
//! term, and (when present) an enchantment term. Boons step pool dice up in
//! size, banes step them down; the pool itself never grows or shrinks.
//!
//! Building a check is a pure computation: the formula and its bindings are
//! fully determined by the inputs, and no randomness happens here. Rolling
//! is a separate downstream step (see [`roll`]).

mod roll;

pub use roll::{CheckRoll, CheckSeed, roll_check};

use crate::config::RulesConfig;

// ============================================================================
// Die
// ============================================================================

/// A single die in the pool, identified by its face count.
///
/// Valid sizes are d4, d6, d8, d10 and d12; boons and banes move between
/// them in fixed steps of two faces.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Die(u8);

impl Die {
    pub const D4: Self = Self(4);
    pub const D6: Self = Self(6);
    pub const D8: Self = Self(8);
    pub const D10: Self = Self(10);
    pub const D12: Self = Self(12);

    /// Returns the number of faces.
    pub const fn faces(self) -> u8 {
        self.0
    }

    /// Returns true if this die cannot be stepped up further.
    pub const fn at_max(self) -> bool {
        self.0 == RulesConfig::DIE_MAX_FACES
    }

    /// Returns true if this die cannot be stepped down further.
    pub const fn at_min(self) -> bool {
        self.0 == RulesConfig::DIE_MIN_FACES
    }

    /// Steps the die up one size. No effect at d12.
    fn step_up(&mut self) {
        if !self.at_max() {
            self.0 += RulesConfig::DIE_STEP;
        }
    }

    /// Steps the die down one size. No effect at d4.
    fn step_down(&mut self) {
        if !self.at_min() {
            self.0 -= RulesConfig::DIE_STEP;
        }
    }
}

impl Default for Die {
    fn default() -> Self {
        Self(RulesConfig::BASE_DIE_FACES)
    }
}

// ============================================================================
// Check Input
// ============================================================================

/// Raw modifiers feeding a standard check.
///
/// Values may arrive outside their legal ranges (hooks add modifiers without
/// coordinating with each other); [`build_standard_check`] clamps them and
/// reports the clamped values alongside the formula.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CheckInput {
    pub boons: i32,
    pub banes: i32,
    pub ability: i32,
    pub skill: i32,
    pub enchantment: i32,
}

impl CheckInput {
    pub fn new(boons: i32, banes: i32, ability: i32, skill: i32, enchantment: i32) -> Self {
        Self {
            boons,
            banes,
            ability,
            skill,
            enchantment,
        }
    }

    /// Returns a copy with every modifier clamped to its legal range.
    #[must_use]
    pub fn clamped(self) -> Self {
        Self {
            boons: self.boons.clamp(0, RulesConfig::MAX_BOONS),
            banes: self.banes.clamp(0, RulesConfig::MAX_BANES),
            ability: self.ability.clamp(0, RulesConfig::MAX_ABILITY),
            skill: self.skill.clamp(0, RulesConfig::MAX_SKILL),
            enchantment: self.enchantment.clamp(0, RulesConfig::MAX_ENCHANTMENT),
        }
    }
}

// ============================================================================
// Dice Pool
// ============================================================================

/// The three-die pool of a standard check after boons and banes.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DicePool {
    dice: [Die; RulesConfig::POOL_SIZE],
}

impl DicePool {
    /// The unmodified pool: three d8s.
    pub fn base() -> Self {
        Self::default()
    }

    /// Applies clamped boon and bane counts to the base pool.
    ///
    /// Boons walk the pool left to right, stepping the current die up one
    /// size each; once a die caps at d12 the walk advances to the next
    /// index. Banes mirror this from the right with a d4 floor. Steps
    /// beyond a fully capped pool are absorbed. Boons are applied before
    /// banes; the ordering is a defined tie-break, not incidental.
    pub fn with_modifiers(boons: i32, banes: i32) -> Self {
        let mut pool = Self::base();

        let mut idx = 0usize;
        for _ in 0..boons {
            pool.dice[idx].step_up();
            if pool.dice[idx].at_max() && idx + 1 < RulesConfig::POOL_SIZE {
                idx += 1;
            }
        }

        let mut idx = RulesConfig::POOL_SIZE - 1;
        for _ in 0..banes {
            pool.dice[idx].step_down();
            if pool.dice[idx].at_min() && idx > 0 {
                idx -= 1;
            }
        }

        pool
    }

    /// Returns the dice in pool order.
    pub const fn dice(&self) -> &[Die; RulesConfig::POOL_SIZE] {
        &self.dice
    }

    /// Sum of faces across the pool; useful as a weight invariant.
    pub fn total_faces(&self) -> u32 {
        self.dice.iter().map(|d| d.faces() as u32).sum()
    }
}

// ============================================================================
// Standard Check
// ============================================================================

/// Named numeric substitutions carried alongside a check formula.
///
/// The terms are never inlined into the formula text, so the same string can
/// be re-rolled or audited with different bound values.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CheckBindings {
    pub ability: i32,
    pub skill: i32,
    /// Absent when the check has no enchantment term.
    pub enchantment: Option<i32>,
}

/// A fully built standard check: pool, formula text, bindings, and the
/// clamped inputs that produced it.
///
/// Immutable once built; discard after the roll resolves.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StandardCheck {
    pub pool: DicePool,
    pub formula: String,
    pub bindings: CheckBindings,
    /// The inputs actually used, after clamping.
    pub clamped: CheckInput,
}

/// Builds a standard check from raw modifiers.
///
/// Clamps boons and banes to `[0, 6]`, ability and skill to `[0, 12]`, and
/// enchantment to `[0, 6]`, then steps the pool and renders the formula.
/// The enchantment term is emitted only when the clamped value is positive.
pub fn build_standard_check(input: CheckInput) -> StandardCheck {
    let clamped = input.clamped();
    let pool = DicePool::with_modifiers(clamped.boons, clamped.banes);

    let mut formula = String::new();
    for die in pool.dice() {
        if !formula.is_empty() {
            formula.push_str(" + ");
        }
        formula.push_str("1d");
        formula.push_str(faces_str(die.faces()));
    }
    formula.push_str(" + @ability + @skill");

    let enchantment = if clamped.enchantment > 0 {
        formula.push_str(" + @enchantment");
        Some(clamped.enchantment)
    } else {
        None
    };

    StandardCheck {
        pool,
        formula,
        bindings: CheckBindings {
            ability: clamped.ability,
            skill: clamped.skill,
            enchantment,
        },
        clamped,
    }
}

/// Face counts only ever take one of five values.
fn faces_str(faces: u8) -> &'static str {
    match faces {
        4 => "4",
        6 => "6",
        8 => "8",
        10 => "10",
        _ => "12",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn faces(check: &StandardCheck) -> [u8; 3] {
        let d = check.pool.dice();
        [d[0].faces(), d[1].faces(), d[2].faces()]
    }

    #[test]
    fn unmodified_check_renders_three_d8() {
        let check = build_standard_check(CheckInput::new(0, 0, 0, 0, 0));
        assert_eq!(check.formula, "1d8 + 1d8 + 1d8 + @ability + @skill");
        assert_eq!(faces(&check), [8, 8, 8]);
        assert_eq!(check.bindings.enchantment, None);
    }

    #[test]
    fn boons_step_left_to_right() {
        assert_eq!(
            faces(&build_standard_check(CheckInput::new(1, 0, 0, 0, 0))),
            [10, 8, 8]
        );
        assert_eq!(
            faces(&build_standard_check(CheckInput::new(2, 0, 0, 0, 0))),
            [12, 8, 8]
        );
        assert_eq!(
            faces(&build_standard_check(CheckInput::new(3, 0, 0, 0, 0))),
            [12, 10, 8]
        );
        assert_eq!(
            faces(&build_standard_check(CheckInput::new(6, 0, 0, 0, 0))),
            [12, 12, 12]
        );
    }

    #[test]
    fn banes_step_right_to_left() {
        assert_eq!(
            faces(&build_standard_check(CheckInput::new(0, 1, 0, 0, 0))),
            [8, 8, 6]
        );
        assert_eq!(
            faces(&build_standard_check(CheckInput::new(0, 2, 0, 0, 0))),
            [8, 8, 4]
        );
        assert_eq!(
            faces(&build_standard_check(CheckInput::new(0, 3, 0, 0, 0))),
            [8, 6, 4]
        );
        assert_eq!(
            faces(&build_standard_check(CheckInput::new(0, 6, 0, 0, 0))),
            [4, 4, 4]
        );
    }

    #[test]
    fn excess_steps_are_absorbed() {
        // Inputs past the clamp behave identically to the clamp boundary.
        assert_eq!(
            faces(&build_standard_check(CheckInput::new(20, 0, 0, 0, 0))),
            [12, 12, 12]
        );
        assert_eq!(
            faces(&build_standard_check(CheckInput::new(0, 20, 0, 0, 0))),
            [4, 4, 4]
        );
    }

    #[test]
    fn boons_and_banes_are_independent() {
        // Boons land first from the left, banes then bite from the right.
        let check = build_standard_check(CheckInput::new(2, 2, 0, 0, 0));
        assert_eq!(faces(&check), [12, 8, 4]);
        assert_eq!(check.formula, "1d12 + 1d8 + 1d4 + @ability + @skill");
    }

    #[test]
    fn pool_weight_tracks_net_steps() {
        for boons in 0..=6 {
            for banes in 0..=6 {
                let pool = DicePool::with_modifiers(boons, banes);
                for die in pool.dice() {
                    assert!(matches!(die.faces(), 4 | 6 | 8 | 10 | 12));
                }
                // Recount effective (non-absorbed) steps and check the
                // weight invariant: base 24 faces plus 2 per effective
                // boon minus 2 per effective bane.
                let up = pool
                    .dice()
                    .iter()
                    .map(|d| (d.faces().max(8) - 8) as i32 / 2)
                    .sum::<i32>();
                let down = pool
                    .dice()
                    .iter()
                    .map(|d| (8 - d.faces().min(8)) as i32 / 2)
                    .sum::<i32>();
                assert_eq!(pool.total_faces() as i32, 24 + 2 * up - 2 * down);
                assert!(up <= boons && down <= banes);
            }
        }
    }

    #[test]
    fn enchantment_term_present_only_when_positive() {
        let with = build_standard_check(CheckInput::new(0, 0, 3, 2, 1));
        assert_eq!(
            with.formula,
            "1d8 + 1d8 + 1d8 + @ability + @skill + @enchantment"
        );
        assert_eq!(with.bindings.enchantment, Some(1));

        let without = build_standard_check(CheckInput::new(0, 0, 3, 2, 0));
        assert_eq!(without.bindings.enchantment, None);
        assert!(!without.formula.contains("@enchantment"));
    }

    #[test]
    fn clamp_metadata_reports_used_inputs() {
        let check = build_standard_check(CheckInput::new(9, -3, 15, -1, 40));
        assert_eq!(check.clamped, CheckInput::new(6, 0, 12, 0, 6));
        assert_eq!(check.bindings.ability, 12);
        assert_eq!(check.bindings.skill, 0);
        assert_eq!(check.bindings.enchantment, Some(6));
    }
}
