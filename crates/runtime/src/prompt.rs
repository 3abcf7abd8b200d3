//! Bridge between the engine's synchronous prompt oracle and async UI.
//!
//! Resolutions run on blocking tasks; when a Pre-Activate hook asks for
//! input, the [`PromptBroker`] ships the request to an async service task
//! and parks the resolution thread until the [`PromptHandler`] answers.
//! Other sessions keep resolving while one sits in a dialog.

use std::sync::mpsc as std_mpsc;

use async_trait::async_trait;
use tokio::sync::mpsc;

use rules_core::{PromptOracle, PromptRequest};

/// Async handler that produces answers to prompts, typically by showing a
/// dialog. `None` means the player dismissed it.
#[async_trait]
pub trait PromptHandler: Send + Sync {
    async fn handle(&self, request: PromptRequest) -> Option<i32>;
}

/// Handler that dismisses every prompt; the default for headless sessions.
pub struct DismissPrompts;

#[async_trait]
impl PromptHandler for DismissPrompts {
    async fn handle(&self, _request: PromptRequest) -> Option<i32> {
        None
    }
}

struct PendingPrompt {
    request: PromptRequest,
    reply: std_mpsc::Sender<Option<i32>>,
}

/// The blocking half: lives inside the engine environment as its
/// [`PromptOracle`].
pub struct PromptBroker {
    tx: mpsc::UnboundedSender<PendingPrompt>,
}

impl PromptBroker {
    /// Creates a broker and spawns its service task on the current tokio
    /// runtime. The task exits when the broker is dropped.
    pub fn spawn(handler: std::sync::Arc<dyn PromptHandler>) -> Self {
        let (tx, mut rx) = mpsc::unbounded_channel::<PendingPrompt>();
        tokio::spawn(async move {
            while let Some(pending) = rx.recv().await {
                let reply = handler.handle(pending.request).await;
                // The resolution thread may have been cancelled; a closed
                // reply channel is not an error.
                let _ = pending.reply.send(reply);
            }
        });
        Self { tx }
    }
}

impl PromptOracle for PromptBroker {
    fn request(&self, request: &PromptRequest) -> Option<i32> {
        let (reply_tx, reply_rx) = std_mpsc::channel();
        let pending = PendingPrompt {
            request: request.clone(),
            reply: reply_tx,
        };
        if self.tx.send(pending).is_err() {
            tracing::warn!(target: "runtime::prompt", "prompt service gone, dismissing");
            return None;
        }
        reply_rx.recv().unwrap_or(None)
    }
}
