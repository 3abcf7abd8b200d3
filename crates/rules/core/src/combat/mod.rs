//! Combat round control: initiative, turn order, and per-turn accrual.
//!
//! The controller is a thin client of the same primitives actions use: it
//! rolls initiative through the dice pool builder and fires `start_turn` /
//! `end_turn` hooks through the registry. It owns no resolution logic of
//! its own.

mod heroism;

pub use heroism::HeroismMeter;

use crate::actor::{ActorId, Roster};
use crate::dice::{CheckInput, CheckSeed, build_standard_check, roll_check};
use crate::env::GameEnv;
use crate::error::{ErrorSeverity, RulesError};
use crate::hooks::{HookId, HookRegistry};

/// Turn-scoped context handed to `start_turn` / `end_turn` hooks.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TurnContext {
    /// Round number, starting at 1 once combat begins.
    pub round: u32,

    /// Undefeated combatants at the time the hook fires.
    pub participants: usize,
}

/// One combatant's slot in the round.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Combatant {
    pub actor: ActorId,

    /// Rolled initiative total; `None` until the first roll.
    pub initiative: Option<i32>,

    pub defeated: bool,

    /// Whether this combatant's actions accrue heroism.
    pub hero: bool,
}

impl Combatant {
    pub fn new(actor: ActorId) -> Self {
        Self {
            actor,
            initiative: None,
            defeated: false,
            hero: false,
        }
    }

    /// Marks this combatant as heroism-accruing (builder pattern).
    #[must_use]
    pub fn hero(mut self) -> Self {
        self.hero = true;
        self
    }
}

/// Errors raised by round control.
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CombatError {
    #[error("no combatants in the round")]
    NoCombatants,

    #[error("combatant {0} not found")]
    UnknownCombatant(ActorId),

    #[error(transparent)]
    Oracle(#[from] crate::env::OracleError),
}

impl RulesError for CombatError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            Self::NoCombatants | Self::UnknownCombatant(_) => ErrorSeverity::Validation,
            Self::Oracle(_) => ErrorSeverity::Fatal,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::NoCombatants => "COMBAT_NO_COMBATANTS",
            Self::UnknownCombatant(_) => "COMBAT_UNKNOWN_COMBATANT",
            Self::Oracle(_) => "COMBAT_ORACLE_NOT_AVAILABLE",
        }
    }
}

/// An encounter's round state: ordered combatants, a turn pointer, and the
/// heroism meter.
#[derive(Clone, Debug, Default)]
pub struct CombatRound {
    combatants: Vec<Combatant>,
    turn: usize,
    round: u32,
    /// Initiative rolls made so far; seeds the next roll so a re-roll in
    /// the same round draws fresh dice.
    rolls: u64,
    heroism: HeroismMeter,
}

impl CombatRound {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a combatant at the end of the declaration order.
    ///
    /// Declaration order is the stable tie-break for equal initiative.
    pub fn add_combatant(&mut self, combatant: Combatant) {
        self.combatants.push(combatant);
    }

    pub fn combatants(&self) -> &[Combatant] {
        &self.combatants
    }

    pub fn round(&self) -> u32 {
        self.round
    }

    pub fn heroism(&self) -> &HeroismMeter {
        &self.heroism
    }

    /// The combatant whose turn it is, if any remain this round.
    pub fn current(&self) -> Option<&Combatant> {
        self.combatants.get(self.turn)
    }

    fn participants(&self) -> usize {
        self.combatants.iter().filter(|c| !c.defeated).count()
    }

    /// Rolls initiative for every combatant and sorts descending.
    ///
    /// Each combatant rolls a standard check with boons/banes and ability
    /// taken from their actor state. Ties keep declaration order (the sort
    /// is stable). Re-rolling always resets the turn pointer to the top,
    /// regardless of whose turn it was - skipped defeated combatants are
    /// intentionally not preserved across a re-roll.
    pub fn roll_initiative(
        &mut self,
        roster: &Roster,
        env: &GameEnv<'_>,
        stream: u64,
    ) -> Result<(), CombatError> {
        if self.combatants.is_empty() {
            return Err(CombatError::NoCombatants);
        }

        let rng = env.rng()?;
        let sequence = self.rolls;
        self.rolls += 1;
        for (slot, combatant) in self.combatants.iter_mut().enumerate() {
            let actor = roster
                .actor(combatant.actor)
                .ok_or(CombatError::UnknownCombatant(combatant.actor))?;

            let check = build_standard_check(CheckInput::new(
                actor.initiative_boons,
                actor.initiative_banes,
                actor.initiative_bonus,
                0,
                0,
            ));
            let roll = roll_check(
                &check,
                rng,
                CheckSeed {
                    stream,
                    sequence,
                    actor: combatant.actor.0,
                    slot: slot as u32,
                },
            );
            combatant.initiative = Some(roll.total);
        }

        // Stable sort: equal totals keep declaration order.
        self.combatants
            .sort_by(|a, b| b.initiative.cmp(&a.initiative));
        self.turn = 0;
        Ok(())
    }

    /// Begins a new round: bumps the counter and rewinds the turn pointer.
    pub fn start_round(&mut self) {
        self.round += 1;
        self.turn = 0;
    }

    /// Starts the current combatant's turn: refreshes action points and
    /// fires their `start_turn` hooks.
    pub fn start_turn(
        &mut self,
        roster: &mut Roster,
        registry: &HookRegistry,
        env: &GameEnv<'_>,
    ) -> Result<ActorId, CombatError> {
        let combatant = self
            .combatants
            .get(self.turn)
            .ok_or(CombatError::NoCombatants)?;
        let actor_id = combatant.actor;
        let turn = TurnContext {
            round: self.round,
            participants: self.participants(),
        };

        let actor = roster
            .actor_mut(actor_id)
            .ok_or(CombatError::UnknownCombatant(actor_id))?;

        let refresh = env.config()?.rules().action_points_per_turn;
        actor
            .resources
            .apply_delta(crate::ledger::ResourceKind::Action, refresh);

        let ids: Vec<HookId> = actor.possessed_hooks().cloned().collect();
        let stack = registry.capture(ids.iter());
        for (_, hooks) in stack.iter() {
            hooks.start_turn(actor, &turn, env);
        }

        Ok(actor_id)
    }

    /// Ends the current combatant's turn: fires `end_turn` hooks and
    /// advances the pointer. Returns the next actor, or `None` when the
    /// round is over.
    pub fn end_turn(
        &mut self,
        roster: &mut Roster,
        registry: &HookRegistry,
        env: &GameEnv<'_>,
    ) -> Result<Option<ActorId>, CombatError> {
        let combatant = self
            .combatants
            .get(self.turn)
            .ok_or(CombatError::NoCombatants)?;
        let actor_id = combatant.actor;
        let turn = TurnContext {
            round: self.round,
            participants: self.participants(),
        };

        {
            let actor = roster
                .actor_mut(actor_id)
                .ok_or(CombatError::UnknownCombatant(actor_id))?;
            let ids: Vec<HookId> = actor.possessed_hooks().cloned().collect();
            let stack = registry.capture(ids.iter());
            for (_, hooks) in stack.iter() {
                hooks.end_turn(actor, &turn, env);
            }
        }

        // Advance past defeated combatants.
        self.turn += 1;
        while let Some(next) = self.combatants.get(self.turn) {
            if !next.defeated {
                return Ok(Some(next.actor));
            }
            self.turn += 1;
        }
        Ok(None)
    }

    /// Ends the round: clears round-scoped flags on every combatant.
    pub fn end_round(&mut self, roster: &mut Roster) {
        for combatant in &self.combatants {
            if let Some(actor) = roster.actor_mut(combatant.actor) {
                actor.flags.end_round();
            }
        }
    }

    /// Marks a combatant defeated; their remaining turns are skipped.
    pub fn set_defeated(&mut self, actor: ActorId, defeated: bool) -> Result<(), CombatError> {
        let combatant = self
            .combatants
            .iter_mut()
            .find(|c| c.actor == actor)
            .ok_or(CombatError::UnknownCombatant(actor))?;
        combatant.defeated = defeated;
        Ok(())
    }

    /// Records a resolved action for heroism accrual.
    ///
    /// Only hero combatants accrue; the meter recomputes against the
    /// current undefeated participant count.
    pub fn record_action(&mut self, actor: ActorId, per_participant: u32) {
        let is_hero = self
            .combatants
            .iter()
            .any(|c| c.actor == actor && c.hero && !c.defeated);
        if is_hero {
            let participants = self.participants();
            self.heroism.accrue(1, participants, per_participant);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::actor::ActorState;
    use crate::config::RulesConfig;
    use crate::env::{ConfigOracle, Env, PcgRng, RngOracle};
    use crate::ledger::{ResourceKind, ResourcePool, ResourceSet};

    fn env_with<'a>(config: &'a RulesConfig, rng: &'a PcgRng) -> GameEnv<'a> {
        Env::new(
            Some(config as &dyn ConfigOracle),
            Some(rng as &dyn RngOracle),
            None,
            None,
        )
    }

    fn roster_of(count: u32) -> Roster {
        let mut roster = Roster::new();
        for id in 1..=count {
            roster
                .insert(
                    ActorState::new(ActorId(id)).with_resources(
                        ResourceSet::new()
                            .with_pool(ResourceKind::Action, ResourcePool::full(3)),
                    ),
                )
                .unwrap();
        }
        roster
    }

    /// RNG that makes every die land on 1, forcing initiative ties.
    struct FlatRng;

    impl RngOracle for FlatRng {
        fn next_u32(&self, _seed: u64) -> u32 {
            0
        }
    }

    #[test]
    fn initiative_sorts_descending() {
        let roster = roster_of(3);
        let config = RulesConfig::default();
        let rng = PcgRng;
        let env = env_with(&config, &rng);

        let mut round = CombatRound::new();
        for id in 1..=3 {
            round.add_combatant(Combatant::new(ActorId(id)));
        }
        round.roll_initiative(&roster, &env, 0xBEEF).unwrap();

        let totals: Vec<i32> = round
            .combatants()
            .iter()
            .map(|c| c.initiative.unwrap())
            .collect();
        let mut sorted = totals.clone();
        sorted.sort_unstable_by(|a, b| b.cmp(a));
        assert_eq!(totals, sorted);
        assert!(round.current().is_some());
    }

    #[test]
    fn initiative_ties_keep_declaration_order() {
        let mut roster = roster_of(3);
        // Identical actors, identical (flat) rolls.
        for id in 1..=3 {
            roster.actor_mut(ActorId(id)).unwrap().initiative_bonus = 2;
        }
        let config = RulesConfig::default();
        let rng = FlatRng;
        let env: GameEnv<'_> = Env::new(
            Some(&config as &dyn ConfigOracle),
            Some(&rng as &dyn RngOracle),
            None,
            None,
        );

        let mut round = CombatRound::new();
        for id in [1, 2, 3] {
            round.add_combatant(Combatant::new(ActorId(id)));
        }
        round.roll_initiative(&roster, &env, 1).unwrap();

        let order: Vec<ActorId> = round.combatants().iter().map(|c| c.actor).collect();
        assert_eq!(order, vec![ActorId(1), ActorId(2), ActorId(3)]);
    }

    #[test]
    fn reroll_resets_turn_pointer() {
        let roster = roster_of(2);
        let config = RulesConfig::default();
        let rng = PcgRng;
        let env = env_with(&config, &rng);

        let mut round = CombatRound::new();
        round.add_combatant(Combatant::new(ActorId(1)));
        round.add_combatant(Combatant::new(ActorId(2)));
        round.roll_initiative(&roster, &env, 7).unwrap();

        // Move partway through the round, then re-roll.
        round.turn = 1;
        round.roll_initiative(&roster, &env, 7).unwrap();
        assert_eq!(round.turn, 0);
    }

    #[test]
    fn start_turn_refreshes_action_points() {
        let mut roster = roster_of(1);
        roster
            .actor_mut(ActorId(1))
            .unwrap()
            .resources
            .apply_delta(ResourceKind::Action, -3);

        let config = RulesConfig::default();
        let rng = PcgRng;
        let env = env_with(&config, &rng);
        let registry = HookRegistry::new();

        let mut round = CombatRound::new();
        round.add_combatant(Combatant::new(ActorId(1)));
        round.start_round();
        round.start_turn(&mut roster, &registry, &env).unwrap();

        assert_eq!(
            roster
                .actor(ActorId(1))
                .unwrap()
                .resources
                .current(ResourceKind::Action),
            3
        );
    }

    #[test]
    fn end_turn_skips_defeated_combatants() {
        let mut roster = roster_of(3);
        let config = RulesConfig::default();
        let rng = PcgRng;
        let env = env_with(&config, &rng);
        let registry = HookRegistry::new();

        let mut round = CombatRound::new();
        for id in [1, 2, 3] {
            round.add_combatant(Combatant::new(ActorId(id)));
        }
        round.start_round();
        round.set_defeated(ActorId(2), true).unwrap();

        let next = round.end_turn(&mut roster, &registry, &env).unwrap();
        assert_eq!(next, Some(ActorId(3)));

        let done = round.end_turn(&mut roster, &registry, &env).unwrap();
        assert_eq!(done, None);
    }

    #[test]
    fn end_round_clears_round_scoped_flags() {
        let mut roster = roster_of(1);
        roster.actor_mut(ActorId(1)).unwrap().flags =
            crate::actor::RoundFlags::DELAYED | crate::actor::RoundFlags::RELOADED;

        let mut round = CombatRound::new();
        round.add_combatant(Combatant::new(ActorId(1)));
        round.end_round(&mut roster);

        assert_eq!(
            roster.actor(ActorId(1)).unwrap().flags,
            crate::actor::RoundFlags::RELOADED
        );
    }

    #[test]
    fn only_heroes_accrue_heroism() {
        let mut round = CombatRound::new();
        round.add_combatant(Combatant::new(ActorId(1)).hero());
        round.add_combatant(Combatant::new(ActorId(2)));

        round.record_action(ActorId(2), 2);
        assert_eq!(round.heroism().actions, 0);

        round.record_action(ActorId(1), 2);
        assert_eq!(round.heroism().actions, 1);
        assert_eq!(round.heroism().required, 4);
    }
}
