//! Async orchestration for the rules-resolution engine.
//!
//! This crate wires the pure engine, the content packages, and async I/O
//! into a cohesive session API. Consumers embed [`Session`] to declare
//! actions, drive combat rounds, answer prompts, and subscribe to outcome
//! events for chat or rendering.
//!
//! Modules are organized by responsibility:
//! - [`session`] hosts the orchestrator and builder
//! - [`events`] provides the topic-based event bus
//! - [`prompt`] bridges the engine's synchronous prompt oracle to async UI
pub mod error;
pub mod events;
pub mod prompt;
pub mod session;

pub use error::{Result, RuntimeError};
pub use events::{Event, EventBus, Payload, Topic};
pub use prompt::{DismissPrompts, PromptBroker, PromptHandler};
pub use session::{Session, SessionBuilder};
