//! Deterministic rules-resolution core for the tabletop combat engine.
//!
//! `rules-core` defines the canonical resolution pipeline (dice pools,
//! lifecycle hooks, resource ledger, combat rounds) and exposes pure APIs
//! that can be reused by the runtime and offline tools. All mutation of
//! actor state flows through [`action::LifecycleRunner`], and supporting
//! crates depend on the types re-exported here.
pub mod action;
pub mod actor;
pub mod combat;
pub mod config;
pub mod dice;
pub mod env;
pub mod error;
pub mod hooks;
pub mod ledger;

pub use action::{
    ActionDeclaration, ActionError, ActionProfile, ActionState, ActionTag, CheckProfile,
    CostRecord, Fault, Impact, ImpactAmount, LifecycleRunner, Outcome, RangeBand, ResolutionSeed,
    ResolvedAction, ResourceDelta, StatusChange,
};
pub use actor::{ActorId, ActorState, Roster, RosterError, RoundFlags};
pub use combat::{CombatError, CombatRound, Combatant, HeroismMeter, TurnContext};
pub use config::RulesConfig;
pub use dice::{
    CheckBindings, CheckInput, CheckRoll, CheckSeed, DicePool, Die, StandardCheck,
    build_standard_check, roll_check,
};
pub use env::{
    ConfigOracle, DismissAll, Env, GameEnv, OracleError, PcgRng, ProfileOracle, PromptKind,
    PromptOracle, PromptRequest, RngOracle, compute_seed,
};
pub use error::{ErrorSeverity, RulesError};
pub use hooks::{HookId, HookRegistry, HookStack, LifecycleHooks, Phase, Rejection};
pub use ledger::{PoolBounds, PoolSnapshot, ResourceKind, ResourcePool, ResourceSet};
