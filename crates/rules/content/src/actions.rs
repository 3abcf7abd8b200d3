//! Hook sets for the built-in action types.

use std::sync::Arc;

use rules_core::{
    ActionState, ActorState, GameEnv, HookRegistry, LifecycleHooks, PromptKind, PromptRequest,
    Rejection, RoundFlags,
};

/// Registers the action-type hook sets under their catalog ids.
pub fn register(registry: &mut HookRegistry) {
    registry.register("strike", Arc::new(Strike));
    registry.register("aimed_shot", Arc::new(AimedShot));
    registry.register("reload", Arc::new(Reload));
    registry.register("delay", Arc::new(Delay));
}

/// The basic strike. Leaves a round flag behind so talents that key off
/// "already swung this round" can see it.
pub struct Strike;

impl LifecycleHooks for Strike {
    fn post_activate(
        &self,
        actor: &mut ActorState,
        _action: &ActionState,
        _env: &GameEnv<'_>,
    ) -> Result<(), Rejection> {
        actor.flags.insert(RoundFlags::USED_BASIC_STRIKE);
        Ok(())
    }
}

/// A ranged attack that needs a loaded weapon. Firing consumes the load.
pub struct AimedShot;

impl LifecycleHooks for AimedShot {
    fn can_use(
        &self,
        actor: &ActorState,
        _action: &ActionState,
        _env: &GameEnv<'_>,
    ) -> Result<(), Rejection> {
        if !actor.flags.contains(RoundFlags::RELOADED) {
            return Err(Rejection::rule("weapon is not loaded"));
        }
        Ok(())
    }

    fn post_activate(
        &self,
        actor: &mut ActorState,
        _action: &ActionState,
        _env: &GameEnv<'_>,
    ) -> Result<(), Rejection> {
        actor.flags.remove(RoundFlags::RELOADED);
        Ok(())
    }
}

/// The reload maneuver; its only effect is the flag.
pub struct Reload;

impl LifecycleHooks for Reload {
    fn post_activate(
        &self,
        actor: &mut ActorState,
        _action: &ActionState,
        _env: &GameEnv<'_>,
    ) -> Result<(), Rejection> {
        actor.flags.insert(RoundFlags::RELOADED);
        Ok(())
    }
}

/// Bonus-bag key the chosen delay value is stored under.
pub const DELAY_INITIATIVE: &str = "delay.initiative";

/// Delay: step out of the order and re-enter at a chosen initiative.
///
/// The initiative value is the whole point of the action, so a dismissed
/// prompt aborts instead of falling through as a no-op.
pub struct Delay;

impl LifecycleHooks for Delay {
    fn can_use(
        &self,
        actor: &ActorState,
        _action: &ActionState,
        _env: &GameEnv<'_>,
    ) -> Result<(), Rejection> {
        if actor.flags.contains(RoundFlags::DELAYED) {
            return Err(Rejection::rule("may not Delay twice in the same round"));
        }
        Ok(())
    }

    fn pre_activate(
        &self,
        actor: &ActorState,
        action: &mut ActionState,
        env: &GameEnv<'_>,
    ) -> Result<(), Rejection> {
        let reply = env.prompts().ok().and_then(|prompts| {
            prompts.request(&PromptRequest {
                actor: actor.id,
                source: action.action.clone(),
                message: String::from("Choose the initiative value to act on"),
                kind: PromptKind::Value { min: 1, max: 30 },
            })
        });
        match reply {
            Some(value) => {
                action.add_bonus(DELAY_INITIATIVE, value);
                Ok(())
            }
            None => Err(Rejection::Aborted),
        }
    }

    fn post_activate(
        &self,
        actor: &mut ActorState,
        _action: &ActionState,
        _env: &GameEnv<'_>,
    ) -> Result<(), Rejection> {
        actor.flags.insert(RoundFlags::DELAYED);
        Ok(())
    }
}
