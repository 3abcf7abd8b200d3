//! Condition hook sets.
//!
//! Conditions ride along on the actor's possessed-hook list exactly like
//! talents do; the only difference is that actions apply and remove them.

use std::sync::Arc;

use rules_core::{
    ActionState, ActorState, CheckInput, GameEnv, HookRegistry, LifecycleHooks,
};

/// Registers the condition hook sets.
pub fn register(registry: &mut HookRegistry) {
    registry.register("inspired", Arc::new(Inspired));
    registry.register("staggered", Arc::new(Staggered));
    registry.register("shieldwall", Arc::new(Shieldwall));
}

/// Inspired: one boon on every check the bearer makes.
pub struct Inspired;

impl LifecycleHooks for Inspired {
    fn prepare(&self, _actor: &ActorState, action: &mut ActionState, _env: &GameEnv<'_>) {
        action.boons += 1;
    }
}

/// Staggered: one bane on every check the bearer makes.
pub struct Staggered;

impl LifecycleHooks for Staggered {
    fn prepare(&self, _actor: &ActorState, action: &mut ActionState, _env: &GameEnv<'_>) {
        action.banes += 1;
    }
}

/// Shieldwall: checks rolled *against* the bearer suffer one bane.
pub struct Shieldwall;

impl LifecycleHooks for Shieldwall {
    fn prepare_defenses(
        &self,
        _action: &ActionState,
        _defender: &ActorState,
        check: &mut CheckInput,
        _env: &GameEnv<'_>,
    ) {
        check.banes += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rules_core::ActorId;

    #[test]
    fn inspired_and_staggered_offset() {
        let actor = ActorState::new(ActorId(1));
        let mut action = ActionState::new(actor.id, "strike");
        let env = GameEnv::empty();

        Inspired.prepare(&actor, &mut action, &env);
        Staggered.prepare(&actor, &mut action, &env);
        assert_eq!(action.boons, 1);
        assert_eq!(action.banes, 1);
    }

    #[test]
    fn shieldwall_banes_incoming_checks_only() {
        let defender = ActorState::new(ActorId(2));
        let action = ActionState::new(ActorId(1), "strike");
        let mut check = CheckInput::new(0, 0, 3, 1, 0);
        let env = GameEnv::empty();

        Shieldwall.prepare_defenses(&action, &defender, &mut check, &env);
        assert_eq!(check.banes, 1);
        assert_eq!(check.boons, 0);
    }
}
