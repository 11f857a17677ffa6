//! Async driver loops: one task per live game instance.
//!
//! A driver exclusively owns the pacing of its instance: it serializes
//! state mutation behind the instance lock, suspends between turns
//! (pacing delays, turn timeouts, auto-pass windows), and checks the
//! cancellation token after every suspension point so an externally
//! ended game emits no further prompts. Narration delivery can never
//! stall a driver - events are fire-and-forget into an unbounded
//! channel, and a dropped front end reads as silence.

pub mod house;
pub mod inbox;
pub mod tournament;
pub mod wordchain;

pub use house::run_house;
pub use inbox::{Inbox, PlayerInput};
pub use tournament::run_tournament;
pub use wordchain::run_word_chain;

use std::sync::Arc;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use crate::core::{NarrationEvent, ScopeId};
use crate::ledger::{ExemptionPolicy, Ledger};
use crate::registry::GameRegistry;

/// Everything a driver loop needs besides its instance.
#[derive(Clone)]
pub struct DriverContext {
    /// The shared registry; the driver unregisters its instance on exit.
    pub registry: Arc<GameRegistry>,
    /// The scope this instance lives in.
    pub scope: ScopeId,
    /// Where narration goes. Send failures are ignored by design.
    pub events: mpsc::UnboundedSender<NarrationEvent>,
    /// Currency collaborator for the win award.
    pub ledger: Arc<dyn Ledger>,
    /// Who skips the award credit.
    pub exemptions: Arc<dyn ExemptionPolicy>,
    /// Liveness flag checked after every suspension point.
    pub cancel: CancellationToken,
}

impl DriverContext {
    /// Emit one narration event, ignoring delivery failure.
    pub fn emit(&self, event: NarrationEvent) {
        let _ = self.events.send(event);
    }

    /// Emit a plain text line.
    pub fn emit_text(&self, text: impl Into<String>) {
        self.emit(NarrationEvent::text(text));
    }
}
