//! Bracket-free pairwise-elimination battle simulator with revival.
//!
//! ## Rules
//!
//! Each round samples two distinct combatants from the alive set. The
//! first-sampled combatant wins with probability 0.6 (an asymmetry kept
//! from the product rules - see the crate docs). The loser is eliminated,
//! then gets a 0.6-probability revival if the tournament still has
//! revives left and the loser has never been revived before. Revives are
//! capped at `max(1, starting_count / 10)`.
//!
//! The engine is a pure state machine; pacing between rounds belongs to
//! the driver in `crate::driver`.

use rustc_hash::FxHashSet;
use std::time::{Duration, Instant};

use crate::core::{
    AuthorityContext, GameError, GameKind, GamePhase, GameRng, NarrationEvent, ParticipantId,
    VisualHint,
};

const ATTACK_VERBS: &[&str] = &[
    "dive-bombs",
    "body-slams",
    "unleashes a deafening screech at",
    "hurls a haunted pillow at",
    "sneaks up behind",
    "challenges and overwhelms",
];

const ELIMINATION_LINES: &[&str] = &[
    "is out of the running!",
    "has been eliminated!",
    "crumples dramatically to the floor!",
    "fades out of the bracket!",
];

const REVIVAL_LINES: &[&str] = &[
    "claws back from the beyond - revived!",
    "gets a second chance and rejoins the fray!",
    "rises again in a swirl of ghostly light!",
];

/// Tunables for a tournament instance.
#[derive(Clone, Debug)]
pub struct TournamentConfig {
    /// Roster cap.
    pub max_participants: usize,
    /// Minimum roster size to start.
    pub min_participants: usize,
    /// Inclusive bounds (seconds) for the between-round pacing delay.
    pub round_delay_secs: (u64, u64),
}

impl Default for TournamentConfig {
    fn default() -> Self {
        Self {
            max_participants: 75,
            min_participants: 2,
            round_delay_secs: (5, 10),
        }
    }
}

/// The outcome of one battle round.
#[derive(Clone, Debug)]
pub struct BattleRound {
    /// Narration for the front end, in emission order.
    pub events: Vec<NarrationEvent>,
    /// Who landed the blow.
    pub killer: ParticipantId,
    /// Who went down.
    pub victim: ParticipantId,
    /// Whether the victim was revived this round.
    pub revived: bool,
}

/// Read-only snapshot for lobby embeds and status queries.
#[derive(Clone, Debug)]
pub struct TournamentStatus {
    /// Current lifecycle phase.
    pub phase: GamePhase,
    /// Everyone who joined, in join order.
    pub participants: Vec<ParticipantId>,
    /// Still standing.
    pub alive: Vec<ParticipantId>,
    /// Knocked out, in elimination order.
    pub eliminated: Vec<ParticipantId>,
    /// Revives spent so far.
    pub revives_used: usize,
    /// Revive budget for this tournament.
    pub max_revives: usize,
}

/// Pairwise-elimination battle simulator.
pub struct EliminationTournament {
    host: ParticipantId,
    phase: GamePhase,
    created_at: Instant,
    participants: Vec<ParticipantId>,
    alive: Vec<ParticipantId>,
    eliminated: Vec<ParticipantId>,
    revived_once: FxHashSet<ParticipantId>,
    revives_used: usize,
    max_revives: usize,
    config: TournamentConfig,
    rng: GameRng,
    flavor: GameRng,
}

impl EliminationTournament {
    /// Create a lobby hosted by `host`.
    #[must_use]
    pub fn new(host: ParticipantId, config: TournamentConfig, seed: u64) -> Self {
        let rng = GameRng::new(seed);
        let flavor = rng.for_context("flavor");
        Self {
            host,
            phase: GamePhase::Lobby,
            created_at: Instant::now(),
            participants: Vec::new(),
            alive: Vec::new(),
            eliminated: Vec::new(),
            revived_once: FxHashSet::default(),
            revives_used: 0,
            max_revives: 0,
            config,
            rng,
            flavor,
        }
    }

    /// The registry kind of this engine.
    #[must_use]
    pub const fn kind() -> GameKind {
        GameKind::Tournament
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

    /// Time since the lobby was created.
    #[must_use]
    pub fn elapsed(&self) -> Duration {
        self.created_at.elapsed()
    }

    /// Add a participant. Lobby only.
    pub fn join(&mut self, participant: ParticipantId) -> Result<(), GameError> {
        if self.phase != GamePhase::Lobby {
            return Err(GameError::GameNotStarted);
        }
        if self.participants.contains(&participant) {
            return Err(GameError::AlreadyJoined(participant));
        }
        if self.participants.len() >= self.config.max_participants {
            return Err(GameError::Full {
                max: self.config.max_participants,
            });
        }
        self.participants.push(participant);
        Ok(())
    }

    /// Remove a participant. Lobby only.
    pub fn leave(&mut self, participant: ParticipantId) -> Result<(), GameError> {
        if self.phase != GamePhase::Lobby {
            return Err(GameError::GameNotStarted);
        }
        let before = self.participants.len();
        self.participants.retain(|&p| p != participant);
        if self.participants.len() == before {
            return Err(GameError::NotJoined(participant));
        }
        Ok(())
    }

    /// Transition to Started. Host or override authority required.
    pub fn start(&mut self, authority: AuthorityContext) -> Result<(), GameError> {
        if !authority.can_manage() {
            return Err(GameError::NotAuthorized);
        }
        if self.phase != GamePhase::Lobby {
            return Err(GameError::GameNotStarted);
        }
        if self.participants.len() < self.config.min_participants {
            return Err(GameError::NotEnoughParticipants {
                min: self.config.min_participants,
            });
        }
        self.alive = self.participants.clone();
        self.max_revives = (self.alive.len() / 10).max(1);
        self.phase = GamePhase::Started;
        Ok(())
    }

    /// Cancel before the game finishes. No winner is recorded.
    pub fn cancel(&mut self, authority: AuthorityContext) -> Result<(), GameError> {
        if !authority.can_manage() {
            return Err(GameError::NotAuthorized);
        }
        self.phase = GamePhase::Finished;
        self.alive.clear();
        Ok(())
    }

    /// Run one battle round, or return `None` if the bracket is decided.
    ///
    /// Picks two distinct combatants uniformly from the alive set; the
    /// first pick wins with probability 0.6. The victim is eliminated
    /// and may be revived (0.6 probability, once per participant, capped
    /// by the tournament's revive budget).
    pub fn run_battle_round(&mut self) -> Option<BattleRound> {
        if self.phase != GamePhase::Started || self.alive.len() <= 1 {
            return None;
        }

        let (i, j) = self.rng.sample_pair(self.alive.len())?;
        let first = self.alive[i];
        let second = self.alive[j];
        let (killer, victim) = if self.rng.gen_bool(0.6) {
            (first, second)
        } else {
            (second, first)
        };

        self.alive.retain(|&p| p != victim);
        self.eliminated.push(victim);

        let mut events = Vec::with_capacity(3);
        let verb = self.flavor.choose(ATTACK_VERBS).copied().unwrap_or("attacks");
        events.push(NarrationEvent::with_visual(
            format!("{killer} {verb} {victim}!"),
            VisualHint::Clash(killer, victim),
        ));
        let elim = self
            .flavor
            .choose(ELIMINATION_LINES)
            .copied()
            .unwrap_or("is eliminated!");
        events.push(NarrationEvent::with_visual(
            format!("{victim} {elim}"),
            VisualHint::Knockout(victim),
        ));

        let mut revived = false;
        if self.revives_used < self.max_revives
            && !self.revived_once.contains(&victim)
            && self.rng.gen_bool(0.6)
        {
            self.alive.push(victim);
            self.eliminated.pop();
            self.revived_once.insert(victim);
            self.revives_used += 1;
            revived = true;
            let line = self.flavor.choose(REVIVAL_LINES).copied().unwrap_or("is revived!");
            events.push(NarrationEvent::with_visual(
                format!("{victim} {line}"),
                VisualHint::Revival(victim),
            ));
        }

        Some(BattleRound {
            events,
            killer,
            victim,
            revived,
        })
    }

    /// The champion, once exactly one participant remains.
    #[must_use]
    pub fn winner(&self) -> Option<ParticipantId> {
        if self.phase == GamePhase::Lobby || self.alive.len() != 1 {
            return None;
        }
        self.alive.first().copied()
    }

    /// Mark the instance terminal.
    pub fn finish(&mut self) {
        self.phase = GamePhase::Finished;
    }

    /// Seconds to pause before the next round, drawn from the configured range.
    pub fn pacing_delay(&mut self) -> Duration {
        let (lo, hi) = self.config.round_delay_secs;
        Duration::from_secs(self.rng.gen_range_u64(lo..hi + 1))
    }

    /// Ghosts awarded to the champion: twice the final roster size.
    #[must_use]
    pub fn award_amount(&self) -> i64 {
        2 * self.participants.len() as i64
    }

    /// Snapshot for status queries and lobby embeds.
    #[must_use]
    pub fn status(&self) -> TournamentStatus {
        TournamentStatus {
            phase: self.phase,
            participants: self.participants.clone(),
            alive: self.alive.clone(),
            eliminated: self.eliminated.clone(),
            revives_used: self.revives_used,
            max_revives: self.max_revives,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lobby_with(n: u64) -> EliminationTournament {
        let mut game = EliminationTournament::new(
            ParticipantId::new(1),
            TournamentConfig::default(),
            42,
        );
        for id in 1..=n {
            game.join(ParticipantId::new(id)).unwrap();
        }
        game
    }

    #[test]
    fn test_join_rejects_duplicates() {
        let mut game = lobby_with(2);
        assert_eq!(
            game.join(ParticipantId::new(1)),
            Err(GameError::AlreadyJoined(ParticipantId::new(1)))
        );
    }

    #[test]
    fn test_join_rejects_past_cap() {
        let mut game = EliminationTournament::new(
            ParticipantId::new(1),
            TournamentConfig {
                max_participants: 3,
                ..TournamentConfig::default()
            },
            42,
        );
        for id in 1..=3 {
            game.join(ParticipantId::new(id)).unwrap();
        }
        assert_eq!(
            game.join(ParticipantId::new(4)),
            Err(GameError::Full { max: 3 })
        );
    }

    #[test]
    fn test_leave_twice_is_not_joined() {
        let mut game = lobby_with(2);
        game.leave(ParticipantId::new(2)).unwrap();
        assert_eq!(
            game.leave(ParticipantId::new(2)),
            Err(GameError::NotJoined(ParticipantId::new(2)))
        );
    }

    #[test]
    fn test_start_requires_authority_and_minimum() {
        let mut game = lobby_with(1);
        assert_eq!(
            game.start(AuthorityContext::none()),
            Err(GameError::NotAuthorized)
        );
        assert_eq!(
            game.start(AuthorityContext::host()),
            Err(GameError::NotEnoughParticipants { min: 2 })
        );

        game.join(ParticipantId::new(2)).unwrap();
        game.start(AuthorityContext::host()).unwrap();
        assert_eq!(game.phase(), GamePhase::Started);
    }

    #[test]
    fn test_max_revives_floor() {
        let mut small = lobby_with(4);
        small.start(AuthorityContext::host()).unwrap();
        assert_eq!(small.status().max_revives, 1);

        let mut large = lobby_with(30);
        large.start(AuthorityContext::host()).unwrap();
        assert_eq!(large.status().max_revives, 3);
    }

    #[test]
    fn test_round_eliminates_or_revives() {
        let mut game = lobby_with(4);
        game.start(AuthorityContext::host()).unwrap();

        let round = game.run_battle_round().unwrap();
        assert_ne!(round.killer, round.victim);
        let status = game.status();
        if round.revived {
            assert_eq!(status.alive.len(), 4);
            assert!(status.eliminated.is_empty());
        } else {
            assert_eq!(status.alive.len(), 3);
            assert_eq!(status.eliminated, vec![round.victim]);
        }
        // Attack + elimination narration always present.
        assert!(round.events.len() >= 2);
    }

    #[test]
    fn test_runs_to_single_survivor() {
        for seed in 0..20 {
            let mut game = EliminationTournament::new(
                ParticipantId::new(1),
                TournamentConfig::default(),
                seed,
            );
            for id in 1..=8 {
                game.join(ParticipantId::new(id)).unwrap();
            }
            game.start(AuthorityContext::host()).unwrap();

            while game.run_battle_round().is_some() {}

            let status = game.status();
            assert_eq!(status.alive.len(), 1);
            assert!(status.revives_used <= status.max_revives);
            assert!(game.winner().is_some());
        }
    }

    #[test]
    fn test_no_participant_revived_twice() {
        for seed in 0..50 {
            let mut game = EliminationTournament::new(
                ParticipantId::new(1),
                TournamentConfig::default(),
                seed,
            );
            for id in 1..=20 {
                game.join(ParticipantId::new(id)).unwrap();
            }
            game.start(AuthorityContext::host()).unwrap();

            let mut revivals: Vec<ParticipantId> = Vec::new();
            while let Some(round) = game.run_battle_round() {
                if round.revived {
                    assert!(!revivals.contains(&round.victim));
                    revivals.push(round.victim);
                }
            }
            assert!(revivals.len() <= game.status().max_revives);
        }
    }

    #[test]
    fn test_cancel_clears_winner() {
        let mut game = lobby_with(4);
        game.start(AuthorityContext::host()).unwrap();
        assert_eq!(
            game.cancel(AuthorityContext::none()),
            Err(GameError::NotAuthorized)
        );
        game.cancel(AuthorityContext::elevated()).unwrap();
        assert_eq!(game.phase(), GamePhase::Finished);
        assert_eq!(game.winner(), None);
        assert!(game.run_battle_round().is_none());
    }

    #[test]
    fn test_award_is_twice_roster() {
        let mut game = lobby_with(4);
        game.start(AuthorityContext::host()).unwrap();
        assert_eq!(game.award_amount(), 8);
    }

    #[test]
    fn test_first_pick_wins_about_sixty_percent() {
        // Two participants: the winner of each fresh game is the first
        // pick iff the 0.6 roll succeeded. Check the empirical rate.
        let mut first_pick_wins = 0;
        let trials = 2000;
        for seed in 0..trials {
            let mut game = EliminationTournament::new(
                ParticipantId::new(1),
                TournamentConfig::default(),
                seed,
            );
            game.join(ParticipantId::new(1)).unwrap();
            game.join(ParticipantId::new(2)).unwrap();
            game.start(AuthorityContext::host()).unwrap();
            let round = game.run_battle_round().unwrap();
            // Replay the same seed's first sample on the outcome stream
            // to learn which combatant was picked first.
            let mut rng = GameRng::new(seed);
            let (i, _) = rng.sample_pair(2).unwrap();
            let first = [ParticipantId::new(1), ParticipantId::new(2)][i];
            if round.killer == first {
                first_pick_wins += 1;
            }
        }
        let rate = first_pick_wins as f64 / trials as f64;
        assert!(rate > 0.55 && rate < 0.65, "rate = {rate}");
    }
}
