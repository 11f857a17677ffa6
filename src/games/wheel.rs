//! Prize wheel: a roster plus one uniform draw.
//!
//! Join/leave are idempotent (reaction-style signals arrive duplicated).
//! The draw is uniform over the complete roster and wholly independent
//! of any rendering subsample: if a renderer caps visible segments, it
//! must substitute the winner into its slice, never the other way round.
//! A wheel is single-use - drawing finishes the instance.

use std::time::{Duration, Instant};

use crate::core::{
    GameError, GameKind, GamePhase, GameRng, NarrationEvent, ParticipantId, VisualHint,
};

/// The outcome of a wheel spin.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DrawResult {
    /// The drawn participant.
    pub winner: ParticipantId,
    /// Index of the winner in the full join-order roster, for renderers.
    pub winner_index: usize,
    /// Roster size at the moment of the draw.
    pub participant_count: usize,
    /// Narration announcing the result.
    pub event: NarrationEvent,
}

/// Participant roster plus a single uniform draw.
pub struct PrizeWheel {
    host: ParticipantId,
    phase: GamePhase,
    created_at: Instant,
    /// Join order; membership is set-like (no duplicates).
    participants: Vec<ParticipantId>,
}

impl PrizeWheel {
    /// Create a wheel hosted by `host`.
    #[must_use]
    pub fn new(host: ParticipantId) -> Self {
        Self {
            host,
            phase: GamePhase::Lobby,
            created_at: Instant::now(),
            participants: Vec::new(),
        }
    }

    /// The registry kind of this engine.
    #[must_use]
    pub const fn kind() -> GameKind {
        GameKind::Wheel
    }

    /// The lobby host.
    #[must_use]
    pub fn host(&self) -> ParticipantId {
        self.host
    }

    /// Current lifecycle phase.
    #[must_use]
    pub fn phase(&self) -> GamePhase {
        self.phase
    }

    /// Time since the wheel was created.
    #[must_use]
    pub fn elapsed(&self) -> Duration {
        self.created_at.elapsed()
    }

    /// Add a participant. Idempotent: re-joining is a no-op.
    pub fn join(&mut self, participant: ParticipantId) {
        if self.phase == GamePhase::Lobby && !self.participants.contains(&participant) {
            self.participants.push(participant);
        }
    }

    /// Remove a participant. Idempotent: leaving twice is a no-op.
    pub fn leave(&mut self, participant: ParticipantId) {
        if self.phase == GamePhase::Lobby {
            self.participants.retain(|&p| p != participant);
        }
    }

    /// The full roster in join order.
    #[must_use]
    pub fn roster(&self) -> &[ParticipantId] {
        &self.participants
    }

    /// Draw the winner uniformly from the complete roster and finish
    /// the wheel. Fails with `NotEnoughParticipants` on an empty roster.
    pub fn draw(&mut self, rng: &mut GameRng) -> Result<DrawResult, GameError> {
        if self.phase != GamePhase::Lobby {
            return Err(GameError::GameNotStarted);
        }
        if self.participants.is_empty() {
            return Err(GameError::NotEnoughParticipants { min: 1 });
        }

        let winner_index = rng.gen_range_usize(0..self.participants.len());
        let winner = self.participants[winner_index];
        self.phase = GamePhase::Finished;

        Ok(DrawResult {
            winner,
            winner_index,
            participant_count: self.participants.len(),
            event: NarrationEvent::with_visual(
                format!("The wheel slows... and lands on {winner}!"),
                VisualHint::WheelSpin { winner_index },
            ),
        })
    }

    /// Ghosts awarded to the drawn winner: twice the roster size, at least one.
    #[must_use]
    pub fn award_amount(&self) -> i64 {
        (2 * self.participants.len() as i64).max(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rustc_hash::FxHashMap;

    #[test]
    fn test_join_and_leave_are_idempotent() {
        let mut wheel = PrizeWheel::new(ParticipantId::new(1));
        wheel.join(ParticipantId::new(1));
        wheel.join(ParticipantId::new(1));
        assert_eq!(wheel.roster().len(), 1);

        wheel.leave(ParticipantId::new(1));
        wheel.leave(ParticipantId::new(1));
        assert!(wheel.roster().is_empty());
    }

    #[test]
    fn test_draw_requires_participants() {
        let mut wheel = PrizeWheel::new(ParticipantId::new(1));
        let mut rng = GameRng::new(42);
        assert_eq!(
            wheel.draw(&mut rng),
            Err(GameError::NotEnoughParticipants { min: 1 })
        );
    }

    #[test]
    fn test_wheel_is_single_use() {
        let mut wheel = PrizeWheel::new(ParticipantId::new(1));
        wheel.join(ParticipantId::new(1));
        let mut rng = GameRng::new(42);

        wheel.draw(&mut rng).unwrap();
        assert_eq!(wheel.phase(), GamePhase::Finished);
        assert_eq!(wheel.draw(&mut rng), Err(GameError::GameNotStarted));
    }

    #[test]
    fn test_draw_is_roughly_uniform() {
        let mut counts: FxHashMap<ParticipantId, usize> = FxHashMap::default();
        let mut rng = GameRng::new(42);

        for _ in 0..10_000 {
            let mut wheel = PrizeWheel::new(ParticipantId::new(1));
            for id in 1..=4 {
                wheel.join(ParticipantId::new(id));
            }
            let result = wheel.draw(&mut rng).unwrap();
            assert!(wheel.roster().contains(&result.winner));
            *counts.entry(result.winner).or_default() += 1;
        }

        for id in 1..=4 {
            let share = counts[&ParticipantId::new(id)] as f64 / 10_000.0;
            assert!((share - 0.25).abs() < 0.03, "share for {id}: {share}");
        }
    }

    #[test]
    fn test_winner_index_points_into_full_roster() {
        // A renderer capping visible segments must still be handed an
        // index valid in the complete roster.
        let mut wheel = PrizeWheel::new(ParticipantId::new(1));
        for id in 1..=40 {
            wheel.join(ParticipantId::new(id));
        }
        let mut rng = GameRng::new(7);
        let result = wheel.draw(&mut rng).unwrap();
        assert_eq!(wheel.roster()[result.winner_index], result.winner);
        assert_eq!(result.participant_count, 40);
    }

    #[test]
    fn test_award_floors_at_one() {
        let mut wheel = PrizeWheel::new(ParticipantId::new(1));
        assert_eq!(wheel.award_amount(), 1);
        wheel.join(ParticipantId::new(1));
        wheel.join(ParticipantId::new(2));
        assert_eq!(wheel.award_amount(), 4);
    }
}
