//! Talent hook sets.
//!
//! A talent participates in every action its owner declares; each
//! implementation filters for the actions it actually cares about.

use std::sync::Arc;

use rules_core::{
    ActionState, ActionTag, ActorState, GameEnv, HookRegistry, LifecycleHooks, Outcome, Rejection,
    ResourceKind, TurnContext,
};

/// Registers the talent hook sets.
pub fn register(registry: &mut HookRegistry) {
    // The upstream rules data carried this talent in two overlapping
    // tables under the same id; it is registered exactly once here.
    registry.register(BLOOD_MAGIC, Arc::new(BloodMagic));
    registry.register("meditative_focus", Arc::new(MeditativeFocus));
    registry.register("bloodied_fury", Arc::new(BloodiedFury));
}

pub const BLOOD_MAGIC: &str = "bloodmagic000000";

/// Blood Magic: spells are paid for in health instead of focus, and the
/// life so spent wards the victim - the target cannot be reduced below the
/// health the caster paid.
pub struct BloodMagic;

impl LifecycleHooks for BloodMagic {
    fn prepare(&self, _actor: &ActorState, action: &mut ActionState, _env: &GameEnv<'_>) {
        if !action.has_tag(ActionTag::Spell) {
            return;
        }
        let focus = action.cost.get(ResourceKind::Focus);
        if focus > 0 {
            action.cost.set(ResourceKind::Focus, 0);
            action.cost.add(ResourceKind::Health, focus);
        }
    }

    fn confirm(
        &self,
        _actor: &ActorState,
        _target: &ActorState,
        action: &ActionState,
        outcome: &mut Outcome,
        _env: &GameEnv<'_>,
    ) -> Result<(), Rejection> {
        if !action.has_tag(ActionTag::Spell) {
            return Ok(());
        }
        let paid = action.cost.get(ResourceKind::Health);
        if paid > 0 {
            outcome.health_floor = Some(paid);
        }
        Ok(())
    }

    fn sheet_note(&self, _actor: &ActorState) -> Option<String> {
        Some(String::from("Spell focus costs are paid in health"))
    }
}

/// Meditative Focus: recover 1 focus at the start of each turn.
pub struct MeditativeFocus;

impl LifecycleHooks for MeditativeFocus {
    fn start_turn(&self, actor: &mut ActorState, _turn: &TurnContext, _env: &GameEnv<'_>) {
        actor.resources.apply_delta(ResourceKind::Focus, 1);
    }
}

/// Bonus-bag key for the fury damage bonus.
pub const FURY_BONUS: &str = "fury.damage";

/// Bloodied Fury: attacks gain a boon and a damage bonus while the actor
/// is at or below half health.
///
/// Pre-Activate computes the bonus from current health and leaves it in
/// the bonus bag; Confirm reads it back and lands it on the outcome.
pub struct BloodiedFury;

impl LifecycleHooks for BloodiedFury {
    fn pre_activate(
        &self,
        actor: &ActorState,
        action: &mut ActionState,
        _env: &GameEnv<'_>,
    ) -> Result<(), Rejection> {
        if !action.has_tag(ActionTag::Attack) {
            return Ok(());
        }
        let Some(pool) = actor.resources.pool(ResourceKind::Health) else {
            return Ok(());
        };
        if pool.current() * 2 <= pool.bounds().max {
            action.boons += 1;
            action.add_bonus(FURY_BONUS, 2);
        }
        Ok(())
    }

    fn confirm(
        &self,
        _actor: &ActorState,
        _target: &ActorState,
        action: &ActionState,
        outcome: &mut Outcome,
        _env: &GameEnv<'_>,
    ) -> Result<(), Rejection> {
        let bonus = action.bonus(FURY_BONUS);
        if bonus > 0 && outcome.roll.is_some() {
            outcome.request(ResourceKind::Health, -bonus);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rules_core::{ActionTag, ActorId, Impact, ImpactAmount, ResourcePool, ResourceSet};

    fn caster() -> ActorState {
        ActorState::new(ActorId(1)).with_resources(
            ResourceSet::new()
                .with_pool(ResourceKind::Health, ResourcePool::full(20))
                .with_pool(ResourceKind::Focus, ResourcePool::full(4)),
        )
    }

    fn spell(actor: ActorId) -> ActionState {
        let mut action = ActionState::new(actor, "bloodbolt");
        action.tags = vec![ActionTag::Attack, ActionTag::Spell];
        action.cost.set(ResourceKind::Focus, 2);
        action.impact = Some(Impact {
            resource: ResourceKind::Health,
            amount: ImpactAmount::CheckTotal,
        });
        action
    }

    #[test]
    fn blood_magic_converts_focus_cost_to_health() {
        let actor = caster();
        let mut action = spell(actor.id);
        let env = GameEnv::empty();

        BloodMagic.prepare(&actor, &mut action, &env);
        assert_eq!(action.cost.get(ResourceKind::Focus), 0);
        assert_eq!(action.cost.get(ResourceKind::Health), 2);
    }

    #[test]
    fn blood_magic_floors_target_health_at_the_paid_cost() {
        let actor = caster();
        let target = ActorState::new(ActorId(2));
        let mut action = spell(actor.id);
        let env = GameEnv::empty();

        BloodMagic.prepare(&actor, &mut action, &env);
        let mut outcome = Outcome::new(target.id);
        BloodMagic
            .confirm(&actor, &target, &action, &mut outcome, &env)
            .unwrap();
        assert_eq!(outcome.health_floor, Some(2));
    }

    #[test]
    fn blood_magic_ignores_non_spells() {
        let actor = caster();
        let mut action = ActionState::new(actor.id, "strike");
        action.tags = vec![ActionTag::Attack];
        action.cost.set(ResourceKind::Focus, 1);
        let env = GameEnv::empty();

        BloodMagic.prepare(&actor, &mut action, &env);
        assert_eq!(action.cost.get(ResourceKind::Focus), 1);
    }

    #[test]
    fn bloodied_fury_kicks_in_at_half_health() {
        let mut actor = caster();
        let mut action = ActionState::new(actor.id, "strike");
        action.tags = vec![ActionTag::Attack];
        let env = GameEnv::empty();

        BloodiedFury.pre_activate(&actor, &mut action, &env).unwrap();
        assert_eq!(action.boons, 0);

        actor.resources.apply_delta(ResourceKind::Health, -10);
        BloodiedFury.pre_activate(&actor, &mut action, &env).unwrap();
        assert_eq!(action.boons, 1);
        assert_eq!(action.bonus(FURY_BONUS), 2);
    }

    #[test]
    fn bloodied_fury_confirm_spends_the_stored_bonus() {
        let mut actor = caster();
        actor.resources.apply_delta(ResourceKind::Health, -10);
        let target = ActorState::new(ActorId(2));
        let mut action = ActionState::new(actor.id, "strike");
        action.tags = vec![ActionTag::Attack];
        let env = GameEnv::empty();

        BloodiedFury.pre_activate(&actor, &mut action, &env).unwrap();

        let mut outcome = Outcome::new(target.id);
        outcome.roll = Some(rules_core::roll_check(
            &rules_core::build_standard_check(rules_core::CheckInput::default()),
            &rules_core::PcgRng,
            rules_core::CheckSeed { stream: 1, sequence: 1, actor: 1, slot: 0 },
        ));
        BloodiedFury
            .confirm(&actor, &target, &action, &mut outcome, &env)
            .unwrap();
        assert_eq!(outcome.deltas.len(), 1);
        assert_eq!(outcome.deltas[0].requested, -2);
    }

    #[test]
    fn meditative_focus_regenerates_one_per_turn() {
        let mut actor = caster();
        actor.resources.apply_delta(ResourceKind::Focus, -3);
        let turn = TurnContext { round: 1, participants: 2 };
        let env = GameEnv::empty();

        MeditativeFocus.start_turn(&mut actor, &turn, &env);
        assert_eq!(actor.resources.current(ResourceKind::Focus), 2);

        // Clamped at the ceiling.
        for _ in 0..5 {
            MeditativeFocus.start_turn(&mut actor, &turn, &env);
        }
        assert_eq!(actor.resources.current(ResourceKind::Focus), 4);
    }
}
