//! Typed error taxonomy for every engine operation.
//!
//! All variants are expected, locally recoverable conditions. The engine
//! returns them as values and never aborts; the front end decides how to
//! surface each one. Display strings are the short user-visible messages
//! tied to each rejection.

use thiserror::Error;

use super::ParticipantId;

/// Expected, recoverable rejection of a player or host intent.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum GameError {
    /// Requestor lacks host/override authority for this operation.
    #[error("only the host or a manager can do that")]
    NotAuthorized,

    /// Participant is already in the roster.
    #[error("{0} already joined")]
    AlreadyJoined(ParticipantId),

    /// Participant is not in the roster.
    #[error("{0} is not in this game")]
    NotJoined(ParticipantId),

    /// Roster is at capacity.
    #[error("game is full (maximum {max} participants)")]
    Full {
        /// The roster cap that was hit.
        max: usize,
    },

    /// Too few participants to start.
    #[error("need at least {min} to start")]
    NotEnoughParticipants {
        /// Minimum participant count for this game kind.
        min: usize,
    },

    /// Another live game of this kind already occupies the scope.
    #[error("a game of that kind is already running here")]
    ScopeOccupied,

    /// Move would leave the grid.
    #[error("you can't go that way")]
    InvalidMove,

    /// Action submitted out of turn.
    #[error("it's not your turn")]
    NotYourTurn,

    /// Operation not valid in the instance's current phase: acting
    /// before start, or joining/leaving after it.
    #[error("the game isn't at that stage right now")]
    GameNotStarted,

    /// Actor is not a participant of this instance.
    #[error("{0} is not playing")]
    NotParticipant(ParticipantId),

    /// Ledger debit would go below zero.
    #[error("not enough ghosts")]
    InsufficientBalance,

    /// Accept without a prior invite.
    #[error("{0} was not invited")]
    NotInvited(ParticipantId),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_are_short_and_specific() {
        assert_eq!(
            GameError::NotEnoughParticipants { min: 2 }.to_string(),
            "need at least 2 to start"
        );
        assert_eq!(
            GameError::Full { max: 75 }.to_string(),
            "game is full (maximum 75 participants)"
        );
        assert_eq!(
            GameError::NotJoined(ParticipantId::new(9)).to_string(),
            "<@9> is not in this game"
        );
    }
}
