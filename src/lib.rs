//! # ghost-games
//!
//! Party mini-game engines for chat channels: an elimination tournament,
//! a word-chain survival game, a prize wheel, and a room-exploration
//! game, plus the registry and currency ledger that tie them together.
//!
//! ## Design Principles
//!
//! 1. **Engines are pure state machines**: no chat-platform I/O. A front
//!    end feeds player intents in and renders the narration events that
//!    come back, in order.
//!
//! 2. **One driver per instance**: every live game is advanced by a
//!    single async task that owns its pacing (round delays, turn
//!    timeouts, auto-pass windows) and checks for cancellation after
//!    every suspension point. Distinct scopes never share mutable state.
//!
//! 3. **Outcomes are seeded, flavor is not**: everything that decides
//!    who wins flows through an injected [`GameRng`]; which flavor line
//!    gets shown comes from a separate cosmetic stream.
//!
//! ## Modules
//!
//! - `core`: identifiers, RNG, narration events, errors, authority
//! - `games`: the four engines
//! - `registry`: one live game per scope and kind
//! - `ledger`: ghosts currency collaborator contract
//! - `driver`: async loops, input inbox, cancellation

pub mod core;
pub mod driver;
pub mod games;
pub mod ledger;
pub mod registry;

// Re-export commonly used types
pub use crate::core::{
    AuthorityContext, GameError, GameKind, GamePhase, GameRng, GameSummary, NarrationEvent,
    ParticipantId, ScopeId, VisualHint,
};

pub use crate::games::{
    normalize, BattleRound, Direction, DrawResult, EliminationTournament, HouseAction,
    HouseConfig, HouseGame, HouseMode, HousePlayerStatus, HouseStatus, PrizeWheel,
    TournamentConfig, TournamentStatus, WordChainConfig, WordChainGame,
};

pub use crate::driver::{
    run_house, run_tournament, run_word_chain, DriverContext, Inbox, PlayerInput,
};

pub use crate::ledger::{award, ExemptionPolicy, InMemoryLedger, Ledger, NoExemptions};

pub use crate::registry::{GameRegistry, GameSlot};
