//! User-prompt oracle for hooks that need a mid-pipeline decision.
//!
//! Some Pre-Activate hooks cannot finish without player input (the Delay
//! action asks for an initiative value). The engine stays synchronous: a
//! hook calls [`PromptOracle::request`], which blocks the resolution until
//! the embedding runtime produces an answer or reports dismissal. While a
//! resolution waits here, no other hook for the *same* action runs;
//! unrelated actions on other sessions are free to proceed.

use crate::actor::ActorId;
use crate::hooks::HookId;

/// What kind of value the hook is asking for.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum PromptKind {
    /// A numeric value within an inclusive range (e.g. a chosen initiative).
    Value { min: i32, max: i32 },

    /// A pick from a fixed list of options; the reply is the option index.
    Choice { options: Vec<String> },
}

/// A single prompt, addressed to the player controlling `actor`.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PromptRequest {
    /// Actor whose player must answer.
    pub actor: ActorId,

    /// Action or talent the prompt belongs to.
    pub source: HookId,

    /// Short human-readable question for the dialog.
    pub message: String,

    pub kind: PromptKind,
}

/// Oracle that services prompts raised during Pre-Activate.
///
/// Returning `None` means the player dismissed the dialog without a value.
/// Hooks must treat dismissal as "no-op" unless the action cannot proceed
/// without the input, in which case they reject with
/// [`crate::hooks::Rejection::Aborted`].
pub trait PromptOracle: Send + Sync {
    fn request(&self, request: &PromptRequest) -> Option<i32>;
}

/// Prompt oracle that dismisses every request.
///
/// Useful for NPC-driven resolutions and tests of the no-op path.
#[derive(Clone, Copy, Debug, Default)]
pub struct DismissAll;

impl PromptOracle for DismissAll {
    fn request(&self, _request: &PromptRequest) -> Option<i32> {
        None
    }
}
