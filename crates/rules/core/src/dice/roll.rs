//! Rolling a built check through the RNG oracle.
//!
//! Each roll is an independent invocation: multiple strikes in one action
//! build their seeds from distinct slots and share nothing but the formula.

use crate::env::{RngOracle, compute_seed};

use super::StandardCheck;

/// Seed components identifying one roll within a session.
///
/// `stream` is the session seed, `sequence` the resolution counter, `actor`
/// the roller, and `slot` distinguishes multiple rolls inside the same
/// resolution (one per target, for instance).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CheckSeed {
    pub stream: u64,
    pub sequence: u64,
    pub actor: u32,
    pub slot: u32,
}

impl CheckSeed {
    /// Derives the base seed for this roll's die stream.
    fn base(&self) -> u64 {
        compute_seed(self.stream, self.sequence, self.actor, self.slot)
    }
}

/// The resolved result of one standard check.
///
/// Carries the formula string and per-die results so downstream consumers
/// (chat cards, logs) can render the roll without re-running resolution.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CheckRoll {
    /// Formula the dice were rolled against, e.g. `1d12 + 1d8 + 1d8 + @ability + @skill`.
    pub formula: String,
    /// One entry per pool die: (faces, rolled value).
    pub dice: [(u8, u32); 3],
    /// Ability value bound to `@ability`.
    pub ability: i32,
    /// Skill value bound to `@skill`.
    pub skill: i32,
    /// Enchantment value bound to `@enchantment`, when the term exists.
    pub enchantment: Option<i32>,
    /// Sum of all dice and bound terms.
    pub total: i32,
}

/// Rolls a built check. Dice are resolved through the oracle, one derived
/// seed per die, so the same `CheckSeed` always reproduces the same roll.
pub fn roll_check(
    check: &StandardCheck,
    rng: &(impl RngOracle + ?Sized),
    seed: CheckSeed,
) -> CheckRoll {
    let base = seed.base();

    let mut dice = [(0u8, 0u32); 3];
    let mut total = 0i32;
    for (i, die) in check.pool.dice().iter().enumerate() {
        let value = rng.roll_die(base.wrapping_add(i as u64), die.faces() as u32);
        dice[i] = (die.faces(), value);
        total += value as i32;
    }

    total += check.bindings.ability + check.bindings.skill;
    if let Some(enchantment) = check.bindings.enchantment {
        total += enchantment;
    }

    CheckRoll {
        formula: check.formula.clone(),
        dice,
        ability: check.bindings.ability,
        skill: check.bindings.skill,
        enchantment: check.bindings.enchantment,
        total,
    }
}
