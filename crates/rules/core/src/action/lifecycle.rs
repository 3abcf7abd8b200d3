//! The action lifecycle pipeline.
//!
//! One resolution walks the phases in strict order:
//!
//! 1. **Prepare** - hooks adjust cost, range, tags, modifiers
//! 2. **Validate** - engine affordability check, then `can_use` hooks;
//!    the first rejection aborts with no state committed
//! 3. **Pre-Activate** - hooks may prompt the user and may still abort
//! 4. costs are paid (the last cancellable point has passed)
//! 5. **Roll** - one independent check per target; the target's own
//!    `prepare_defenses` hooks adjust only that target's check
//! 6. **Confirm** - per-target outcome finalization; failures are faults
//! 7. **Post-Activate** - lingering actor flags; failures are faults
//!
//! The runner snapshots the actor's pools before Prepare and restores them
//! on any pre-roll abort, so a rejected action can never leave a partial
//! cost behind. Once dice have been rolled there is no unwinding: rolls
//! are observed events, and later hook failures only produce [`Fault`]
//! records.
//!
//! Execution is sequential throughout; hooks within a phase run in the
//! registry lookup order and never concurrently.

use crate::actor::{ActorId, Roster};
use crate::dice::{CheckInput, CheckSeed, build_standard_check, roll_check};
use crate::env::GameEnv;
use crate::hooks::{HookId, HookRegistry, Phase};
use crate::ledger::ResourceKind;

use super::{
    ActionDeclaration, ActionError, ActionState, Fault, ImpactAmount, Outcome, ResolvedAction,
    ResourceDelta,
};

/// Seed components shared by every roll in one resolution.
///
/// `stream` identifies the session, `sequence` the resolution within it;
/// per-target slots are derived inside the runner.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ResolutionSeed {
    pub stream: u64,
    pub sequence: u64,
}

/// Orchestrates one action's execution against a roster.
///
/// The runner is stateless: everything it needs arrives as arguments, and
/// the registry is only read. One runner can serve any number of sequential
/// resolutions.
pub struct LifecycleRunner<'a> {
    registry: &'a HookRegistry,
}

impl<'a> LifecycleRunner<'a> {
    pub fn new(registry: &'a HookRegistry) -> Self {
        Self { registry }
    }

    /// Resolves a declared action to completion or a pre-roll abort.
    pub fn resolve(
        &self,
        declaration: &ActionDeclaration,
        roster: &mut Roster,
        env: &GameEnv<'_>,
        seed: ResolutionSeed,
    ) -> Result<ResolvedAction, ActionError> {
        let profile = env
            .profiles()?
            .profile(&declaration.action)
            .ok_or_else(|| ActionError::ProfileNotFound(declaration.action.clone()))?;

        let mut state = ActionState::from_profile(declaration, profile);

        // Capture the hook stack once, before any phase runs: action-type
        // hooks first, then everything the actor possesses, in order.
        let (stack, snapshot) = {
            let actor = roster
                .actor(declaration.actor)
                .ok_or(ActionError::ActorNotFound(declaration.actor))?;
            let ids: Vec<HookId> = core::iter::once(&declaration.action)
                .chain(actor.possessed_hooks())
                .cloned()
                .collect();
            (self.registry.capture(ids.iter()), actor.resources.snapshot())
        };

        for target in &state.targets {
            if !roster.contains(*target) {
                return Err(ActionError::TargetNotFound(*target));
            }
        }

        // ==== Prepare / Validate / Pre-Activate (still cancellable) ====
        let pre_roll = (|| {
            let actor = roster
                .actor(declaration.actor)
                .ok_or(ActionError::ActorNotFound(declaration.actor))?;

            for (_, hooks) in stack.iter() {
                hooks.prepare(actor, &mut state, env);
            }

            for (resource, amount) in state.cost.iter() {
                if amount > 0 && !actor.resources.can_afford(resource, amount) {
                    return Err(ActionError::InsufficientResource {
                        resource,
                        required: amount,
                        available: actor.resources.current(resource),
                    });
                }
            }
            for (id, hooks) in stack.iter() {
                hooks
                    .can_use(actor, &state, env)
                    .map_err(|rejection| ActionError::from_rejection(id, rejection))?;
            }

            for (id, hooks) in stack.iter() {
                hooks
                    .pre_activate(actor, &mut state, env)
                    .map_err(|rejection| ActionError::from_rejection(id, rejection))?;
            }

            Ok(())
        })();

        if let Err(error) = pre_roll {
            if let Some(actor) = roster.actor_mut(declaration.actor) {
                actor.resources.restore(snapshot);
            }
            return Err(error);
        }

        // ==== Costs: the dice are about to be cast ====
        let cost_paid = {
            let actor = roster
                .actor_mut(declaration.actor)
                .ok_or(ActionError::ActorNotFound(declaration.actor))?;
            let mut paid = Vec::new();
            for (resource, amount) in state.cost.iter() {
                if amount != 0 {
                    let applied = actor.resources.apply_delta(resource, -amount);
                    paid.push(ResourceDelta {
                        resource,
                        requested: -amount,
                        applied,
                    });
                }
            }
            paid
        };

        // ==== Roll / Confirm / apply, one target at a time ====
        let mut outcomes = Vec::with_capacity(state.targets.len());
        let mut faults = Vec::new();

        let targets = state.targets.clone();
        for (slot, target_id) in targets.iter().enumerate() {
            let mut outcome = {
                let actor = roster
                    .actor(declaration.actor)
                    .ok_or(ActionError::ActorNotFound(declaration.actor))?;
                let target = roster
                    .actor(*target_id)
                    .ok_or(ActionError::TargetNotFound(*target_id))?;

                let target_ids: Vec<HookId> = target.possessed_hooks().cloned().collect();
                let target_stack = self.registry.capture(target_ids.iter());

                let roll = match &state.check {
                    Some(check) => {
                        let mut input = CheckInput::new(
                            state.boons,
                            state.banes,
                            check.ability,
                            check.skill,
                            check.enchantment,
                        );
                        for (_, hooks) in target_stack.iter() {
                            hooks.prepare_defenses(&state, target, &mut input, env);
                        }
                        let built = build_standard_check(input);
                        Some(roll_check(
                            &built,
                            env.rng()?,
                            CheckSeed {
                                stream: seed.stream,
                                sequence: seed.sequence,
                                actor: declaration.actor.0,
                                slot: slot as u32,
                            },
                        ))
                    }
                    None => None,
                };

                let mut outcome = Outcome::new(*target_id);
                outcome.roll = roll;

                if let Some(impact) = &state.impact {
                    let amount = match impact.amount {
                        ImpactAmount::Fixed(value) => value,
                        ImpactAmount::CheckTotal => {
                            -outcome.roll.as_ref().map_or(0, |roll| roll.total)
                        }
                    };
                    if amount != 0 {
                        outcome.request(impact.resource, amount);
                    }
                }
                if let Some(pending) = state.pending_statuses.get(target_id) {
                    outcome.statuses.merge(pending);
                }

                for (id, hooks) in stack.iter().chain(target_stack.iter()) {
                    if let Err(rejection) =
                        hooks.confirm(actor, target, &state, &mut outcome, env)
                    {
                        faults.push(Fault {
                            hook: id.clone(),
                            phase: Phase::Confirm,
                            message: rejection.to_string(),
                        });
                    }
                }

                outcome
            };

            Self::apply_outcome(roster, &mut outcome)?;
            outcomes.push(outcome);
        }

        // ==== Post-Activate ====
        {
            let actor = roster
                .actor_mut(declaration.actor)
                .ok_or(ActionError::ActorNotFound(declaration.actor))?;
            for (id, hooks) in stack.iter() {
                if let Err(rejection) = hooks.post_activate(actor, &state, env) {
                    faults.push(Fault {
                        hook: id.clone(),
                        phase: Phase::PostActivate,
                        message: rejection.to_string(),
                    });
                }
            }
        }

        Ok(ResolvedAction {
            action: state.action,
            actor: state.actor,
            cost_paid,
            outcomes,
            bonuses: state.bonuses,
            faults,
        })
    }

    /// Lands one outcome on its target: deltas (respecting a health floor),
    /// then queued status changes.
    fn apply_outcome(roster: &mut Roster, outcome: &mut Outcome) -> Result<(), ActionError> {
        let target = roster
            .actor_mut(outcome.target)
            .ok_or(ActionError::TargetNotFound(outcome.target))?;

        let floor = outcome.health_floor;
        for delta in outcome.deltas.iter_mut() {
            let mut amount = delta.requested;
            if delta.resource == ResourceKind::Health
                && let Some(floor) = floor
            {
                let current = target.resources.current(ResourceKind::Health);
                // Trim damage so the target ends at or above the floor;
                // never heal a target already below it.
                amount = amount.max((floor - current).min(0));
            }
            delta.applied = target.resources.apply_delta(delta.resource, amount);
        }

        let statuses = outcome.statuses.clone();
        for id in statuses.add {
            target.add_condition(id);
        }
        for id in &statuses.remove {
            target.remove_condition(id);
        }

        Ok(())
    }
}
