//! The four mini-game engines.
//!
//! Each engine owns its roster and board state exclusively, mutates only
//! through its own operations, and reports progress as narration events.
//! Chat-platform I/O lives entirely outside this crate.

pub mod house;
pub mod tournament;
pub mod wheel;
pub mod wordchain;

pub use house::{
    Direction, HouseAction, HouseConfig, HouseGame, HouseMode, HousePlayerStatus, HouseStatus,
};
pub use tournament::{BattleRound, EliminationTournament, TournamentConfig, TournamentStatus};
pub use wheel::{DrawResult, PrizeWheel};
pub use wordchain::{normalize, WordChainConfig, WordChainGame};
