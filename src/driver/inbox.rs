//! Cancellable wait-for-next-qualifying-input.
//!
//! A driver asks for "the next input from actor X within T seconds".
//! Inputs from anyone else are discarded without satisfying the wait;
//! a matching input resolves the wait immediately; otherwise the wait
//! expires exactly at the deadline and the driver treats it as a
//! timeout. Cancellation is layered on top by the driver loops via
//! `tokio::select!`.

use tokio::sync::mpsc;
use tokio::time::{sleep_until, timeout_at, Instant};

use crate::core::ParticipantId;

/// One human input routed to a game instance.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PlayerInput {
    /// Who sent it.
    pub participant: ParticipantId,
    /// Raw message text (word, command, ...).
    pub text: String,
}

impl PlayerInput {
    /// Convenience constructor.
    #[must_use]
    pub fn new(participant: ParticipantId, text: impl Into<String>) -> Self {
        Self {
            participant,
            text: text.into(),
        }
    }
}

/// Receiving half of an instance's input queue.
pub struct Inbox {
    rx: mpsc::UnboundedReceiver<PlayerInput>,
}

impl Inbox {
    /// Create a connected (sender, inbox) pair for one game instance.
    #[must_use]
    pub fn channel() -> (mpsc::UnboundedSender<PlayerInput>, Inbox) {
        let (tx, rx) = mpsc::unbounded_channel();
        (tx, Inbox { rx })
    }

    /// Wait up to `window` for the next input from `actor`.
    ///
    /// Inputs from other participants are dropped. Returns `None` on
    /// timeout; a closed input channel behaves like silence (the wait
    /// still runs out the clock, so a vanished front end reads as a
    /// sequence of ordinary timeouts).
    pub async fn next_from(
        &mut self,
        actor: ParticipantId,
        window: std::time::Duration,
    ) -> Option<PlayerInput> {
        let deadline = Instant::now() + window;
        loop {
            match timeout_at(deadline, self.rx.recv()).await {
                Err(_) => return None,
                Ok(None) => {
                    sleep_until(deadline).await;
                    return None;
                }
                Ok(Some(input)) if input.participant == actor => return Some(input),
                Ok(Some(_)) => {}
            }
        }
    }
}
