//! Narration events: the engine-to-front-end surface.
//!
//! Engines never talk to the chat platform. Each state change produces an
//! ordered sequence of `NarrationEvent`s the front end renders verbatim,
//! in order (later events reference earlier state, e.g. "now 4 HP").
//! A terminal `GameSummary` closes every driver run.

use serde::{Deserialize, Serialize};
use std::time::Duration;

use super::ParticipantId;

/// Optional cue for a cosmetic renderer alongside a narration line.
///
/// Purely advisory: the engine never depends on whether (or how) a hint
/// is rendered.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum VisualHint {
    /// A battle just resolved between two combatants.
    Clash(ParticipantId, ParticipantId),
    /// A participant was eliminated / knocked out.
    Knockout(ParticipantId),
    /// A participant came back from elimination.
    Revival(ParticipantId),
    /// Spin the wheel and land on `winner_index` within the full roster.
    ///
    /// The index is into the complete participant set in join order. A
    /// renderer that caps visible segments must substitute the winner
    /// into its subsample; the draw itself never shrinks.
    WheelSpin {
        /// Index of the winner in the full join-order roster.
        winner_index: usize,
    },
    /// Show the room at this grid position.
    Room {
        /// Column, 0-based from the west edge.
        x: usize,
        /// Row, 0-based from the north edge.
        y: usize,
    },
}

/// One unit of human-readable game progress.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct NarrationEvent {
    /// The line to display.
    pub text: String,
    /// Optional renderer cue.
    pub visual: Option<VisualHint>,
}

impl NarrationEvent {
    /// A plain text event with no visual cue.
    #[must_use]
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            visual: None,
        }
    }

    /// An event carrying a renderer cue.
    #[must_use]
    pub fn with_visual(text: impl Into<String>, visual: VisualHint) -> Self {
        Self {
            text: text.into(),
            visual: Some(visual),
        }
    }
}

/// Terminal summary emitted once per driver run.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameSummary {
    /// The sole survivor / drawn winner, if the game produced one.
    pub winner: Option<ParticipantId>,
    /// Wall-clock time from instance creation to the terminal state.
    pub duration: Duration,
}

impl GameSummary {
    /// Format the duration the way the lobby embeds do ("3m 17s").
    #[must_use]
    pub fn duration_text(&self) -> String {
        let total = self.duration.as_secs();
        format!("{}m {}s", total / 60, total % 60)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_duration_text() {
        let summary = GameSummary {
            winner: None,
            duration: Duration::from_secs(197),
        };
        assert_eq!(summary.duration_text(), "3m 17s");
    }

    #[test]
    fn test_event_serde_round_trip() {
        let event = NarrationEvent::with_visual("spin!", VisualHint::WheelSpin { winner_index: 3 });
        let json = serde_json::to_string(&event).unwrap();
        let back: NarrationEvent = serde_json::from_str(&json).unwrap();
        assert_eq!(event, back);
    }
}
