//! Core engine types: identifiers, RNG, events, errors, authority.
//!
//! These are the game-agnostic building blocks; the engines under
//! `crate::games` share them but never each other's state.

pub mod error;
pub mod event;
pub mod ids;
pub mod rng;

pub use error::GameError;
pub use event::{GameSummary, NarrationEvent, VisualHint};
pub use ids::{AuthorityContext, GameKind, GamePhase, ParticipantId, ScopeId};
pub use rng::GameRng;
