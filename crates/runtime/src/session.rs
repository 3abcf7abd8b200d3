//! The session orchestrator.
//!
//! A [`Session`] owns the roster, the combat round, the loaded content,
//! and the event bus. Resolutions execute on blocking tasks so that a
//! prompt-suspended action never stalls the async runtime; the session
//! mutex serializes access to shared state, which keeps each resolution
//! single-threaded from the engine's point of view.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use rules_content::ActionProfileRegistry;
use rules_core::{
    ActionDeclaration, ActorId, ActorState, CombatRound, Combatant, Env, GameEnv, HeroismMeter,
    HookId, HookRegistry, LifecycleHooks, LifecycleRunner, PcgRng, ResolutionSeed, ResolvedAction,
    ResourceKind, Roster, RulesConfig,
};
use tracing::{info, warn};

use crate::error::{Result, RuntimeError};
use crate::events::{Event, EventBus, Payload, Topic};
use crate::prompt::{DismissPrompts, PromptBroker, PromptHandler};

/// Builder for [`Session`].
pub struct SessionBuilder {
    config: RulesConfig,
    seed: Option<u64>,
    handler: Arc<dyn PromptHandler>,
    extra_hooks: Vec<(HookId, Arc<dyn LifecycleHooks>)>,
}

impl SessionBuilder {
    pub fn new() -> Self {
        Self {
            config: RulesConfig::default(),
            seed: None,
            handler: Arc::new(DismissPrompts),
            extra_hooks: Vec::new(),
        }
    }

    /// Overrides the rules configuration (builder pattern).
    #[must_use]
    pub fn config(mut self, config: RulesConfig) -> Self {
        self.config = config;
        self
    }

    /// Fixes the session seed; omit for a random one.
    #[must_use]
    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Installs the prompt handler servicing Pre-Activate dialogs.
    #[must_use]
    pub fn prompts(mut self, handler: Arc<dyn PromptHandler>) -> Self {
        self.handler = handler;
        self
    }

    /// Registers an additional hook set on top of the built-in content.
    #[must_use]
    pub fn register(mut self, id: impl Into<HookId>, hooks: Arc<dyn LifecycleHooks>) -> Self {
        self.extra_hooks.push((id.into(), hooks));
        self
    }

    /// Loads content, spawns the prompt service, and opens the session.
    ///
    /// Must be called from within a tokio runtime.
    pub fn build(self) -> Result<Session> {
        let mut registry = HookRegistry::new();
        rules_content::register_hooks(&mut registry);
        for (id, hooks) in self.extra_hooks {
            registry.register(id, hooks);
        }

        let profiles = rules_content::profiles()?;
        let stream = self.seed.unwrap_or_else(rand::random);
        let broker = PromptBroker::spawn(self.handler);

        info!(
            target: "runtime::session",
            hooks = registry.len(),
            profiles = profiles.len(),
            stream,
            "session opened"
        );

        Ok(Session {
            inner: Arc::new(SessionInner {
                config: self.config,
                registry,
                profiles,
                rng: PcgRng,
                broker,
                events: EventBus::new(),
                state: Mutex::new(SharedState {
                    roster: Roster::new(),
                    combat: CombatRound::new(),
                }),
                stream,
                sequence: AtomicU64::new(0),
            }),
        })
    }
}

impl Default for SessionBuilder {
    fn default() -> Self {
        Self::new()
    }
}

struct SharedState {
    roster: Roster,
    combat: CombatRound,
}

struct SessionInner {
    config: RulesConfig,
    registry: HookRegistry,
    profiles: ActionProfileRegistry,
    rng: PcgRng,
    broker: PromptBroker,
    events: EventBus,
    state: Mutex<SharedState>,
    stream: u64,
    sequence: AtomicU64,
}

impl SessionInner {
    fn env(&self) -> GameEnv<'_> {
        Env::with_all(&self.config, &self.rng, &self.broker, &self.profiles).as_game_env()
    }

    fn resolve_blocking(
        &self,
        declaration: &ActionDeclaration,
    ) -> std::result::Result<ResolvedAction, rules_core::ActionError> {
        let sequence = self.sequence.fetch_add(1, Ordering::Relaxed);
        let mut state = self.state.lock().expect("session state poisoned");
        let env = self.env();
        LifecycleRunner::new(&self.registry).resolve(
            declaration,
            &mut state.roster,
            &env,
            ResolutionSeed {
                stream: self.stream,
                sequence,
            },
        )
    }
}

/// Handle to one running game session.
#[derive(Clone)]
pub struct Session {
    inner: Arc<SessionInner>,
}

impl Session {
    pub fn builder() -> SessionBuilder {
        SessionBuilder::new()
    }

    /// Adds an actor to the roster.
    pub fn add_actor(&self, actor: ActorState) -> Result<()> {
        let mut state = self.inner.state.lock().expect("session state poisoned");
        state.roster.insert(actor)?;
        Ok(())
    }

    /// Adds a combatant slot for an actor already in the roster.
    pub fn add_combatant(&self, combatant: Combatant) {
        let mut state = self.inner.state.lock().expect("session state poisoned");
        state.combat.add_combatant(combatant);
    }

    /// Resolves a declared action to completion.
    ///
    /// The resolution runs on a blocking task; if a Pre-Activate hook
    /// raises a prompt, the call suspends until the handler answers.
    pub async fn resolve(&self, declaration: ActionDeclaration) -> Result<ResolvedAction> {
        let inner = Arc::clone(&self.inner);
        let moved = declaration.clone();
        let outcome = tokio::task::spawn_blocking(move || inner.resolve_blocking(&moved))
            .await
            .map_err(|join| RuntimeError::TaskFailed(join.to_string()))?;

        match outcome {
            Ok(resolved) => {
                info!(
                    target: "runtime::session",
                    action = %resolved.action,
                    actor = %resolved.actor,
                    targets = resolved.outcomes.len(),
                    faults = resolved.faults.len(),
                    "action resolved"
                );
                for fault in &resolved.faults {
                    warn!(
                        target: "runtime::session",
                        hook = %fault.hook,
                        phase = %fault.phase,
                        message = %fault.message,
                        "post-roll hook fault"
                    );
                    self.inner.events.publish(Payload::HookFault {
                        action: resolved.action.clone(),
                        fault: fault.clone(),
                    });
                }

                {
                    let mut state =
                        self.inner.state.lock().expect("session state poisoned");
                    let per_participant = self.inner.config.heroism_per_participant;
                    state.combat.record_action(resolved.actor, per_participant);
                }

                self.inner.events.publish(Payload::ActionResolved {
                    resolved: resolved.clone(),
                });
                Ok(resolved)
            }
            Err(error) => {
                use rules_core::RulesError as _;
                info!(
                    target: "runtime::session",
                    action = %declaration.action,
                    actor = %declaration.actor,
                    code = error.error_code(),
                    "action rejected"
                );
                self.inner.events.publish(Payload::ActionRejected {
                    actor: declaration.actor,
                    action: declaration.action.clone(),
                    code: error.error_code().to_string(),
                    reason: error.to_string(),
                });
                Err(error.into())
            }
        }
    }

    /// Rolls initiative for every combatant and rewinds to the top of the
    /// order.
    pub fn roll_initiative(&self) -> Result<Vec<(ActorId, i32)>> {
        let mut state = self.inner.state.lock().expect("session state poisoned");
        let SharedState { roster, combat } = &mut *state;
        combat.roll_initiative(roster, &self.inner.env(), self.inner.stream)?;
        Ok(combat
            .combatants()
            .iter()
            .map(|c| (c.actor, c.initiative.unwrap_or(0)))
            .collect())
    }

    /// Begins a new round.
    pub fn start_round(&self) {
        let mut state = self.inner.state.lock().expect("session state poisoned");
        state.combat.start_round();
    }

    /// Starts the current combatant's turn and announces it.
    pub fn start_turn(&self) -> Result<ActorId> {
        let mut state = self.inner.state.lock().expect("session state poisoned");
        let SharedState { roster, combat } = &mut *state;
        let actor = combat.start_turn(roster, &self.inner.registry, &self.inner.env())?;
        let round = combat.round();
        drop(state);

        self.inner
            .events
            .publish(Payload::TurnStarted { actor, round });
        Ok(actor)
    }

    /// Ends the current turn; returns the next actor, or `None` when the
    /// round is over (round-scoped flags are cleared in that case).
    pub fn end_turn(&self) -> Result<Option<ActorId>> {
        let mut state = self.inner.state.lock().expect("session state poisoned");
        let SharedState { roster, combat } = &mut *state;
        let next = combat.end_turn(roster, &self.inner.registry, &self.inner.env())?;
        if next.is_none() {
            combat.end_round(roster);
            let round = combat.round();
            drop(state);
            self.inner.events.publish(Payload::RoundEnded { round });
        }
        Ok(next)
    }

    /// Marks a combatant defeated.
    pub fn set_defeated(&self, actor: ActorId, defeated: bool) -> Result<()> {
        let mut state = self.inner.state.lock().expect("session state poisoned");
        state.combat.set_defeated(actor, defeated)?;
        Ok(())
    }

    /// Current heroism meter.
    pub fn heroism(&self) -> HeroismMeter {
        let state = self.inner.state.lock().expect("session state poisoned");
        *state.combat.heroism()
    }

    /// Current value of one of an actor's pools.
    pub fn resource(&self, actor: ActorId, kind: ResourceKind) -> Option<i32> {
        let state = self.inner.state.lock().expect("session state poisoned");
        state
            .roster
            .actor(actor)
            .map(|a| a.resources.current(kind))
    }

    /// Sheet notes contributed by the actor's talents and conditions.
    pub fn sheet_notes(&self, actor: ActorId) -> Vec<String> {
        let state = self.inner.state.lock().expect("session state poisoned");
        let Some(actor) = state.roster.actor(actor) else {
            return Vec::new();
        };
        let ids: Vec<HookId> = actor.possessed_hooks().cloned().collect();
        self.inner
            .registry
            .capture(ids.iter())
            .iter()
            .filter_map(|(_, hooks)| hooks.sheet_note(actor))
            .collect()
    }

    /// Subscribes to one event topic.
    pub fn subscribe(&self, topic: Topic) -> tokio::sync::broadcast::Receiver<Event> {
        self.inner.events.subscribe(topic)
    }
}
