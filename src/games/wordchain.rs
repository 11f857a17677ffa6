//! Turn-based survival word game with life tracking.
//!
//! ## Rules
//!
//! Players take turns in join order. A word is accepted when its
//! normalized first letter matches the normalized last letter of the
//! current word (or no current word is set yet) and it has not been used
//! before. A rejected word - or a turn timeout, handled by the driver -
//! costs one life. Players start with three lives; the last player with
//! a life left wins.
//!
//! Normalization lowercases and strips everything except letters,
//! apostrophes and hyphens, so `"Tree!"` chains the same as `"tree"`.

use rustc_hash::{FxHashMap, FxHashSet};
use std::time::{Duration, Instant};

use crate::core::{AuthorityContext, GameError, GameKind, GamePhase, ParticipantId};

/// Normalize a raw chat message into a chain word.
///
/// Lowercase, then keep letters plus apostrophe and hyphen. If that
/// leaves no letters at all, fall back to the letters-only filter of the
/// raw lowercased input.
#[must_use]
pub fn normalize(raw: &str) -> String {
    let lower = raw.to_lowercase();
    let kept: String = lower
        .chars()
        .filter(|c| c.is_alphabetic() || *c == '\'' || *c == '-')
        .collect();
    if kept.chars().any(char::is_alphabetic) {
        kept
    } else {
        lower.chars().filter(|c| c.is_alphabetic()).collect()
    }
}

/// Tunables for a word-chain instance.
#[derive(Clone, Debug)]
pub struct WordChainConfig {
    /// Lives each player starts with.
    pub starting_lives: i32,
    /// How long the current actor has to produce a word.
    pub turn_timeout: Duration,
    /// Minimum roster size to start.
    pub min_players: usize,
}

impl Default for WordChainConfig {
    fn default() -> Self {
        Self {
            starting_lives: 3,
            turn_timeout: Duration::from_secs(30),
            min_players: 2,
        }
    }
}

/// Turn-based survival word game.
pub struct WordChainGame {
    host: ParticipantId,
    phase: GamePhase,
    created_at: Instant,
    /// Join order; fixed once started.
    players: Vec<ParticipantId>,
    lives: FxHashMap<ParticipantId, i32>,
    used_words: FxHashSet<String>,
    current_word: Option<String>,
    turn_index: usize,
    config: WordChainConfig,
}

impl WordChainGame {
    /// Create a lobby hosted by `host`.
    #[must_use]
    pub fn new(host: ParticipantId, config: WordChainConfig) -> Self {
        Self {
            host,
            phase: GamePhase::Lobby,
            created_at: Instant::now(),
            players: Vec::new(),
            lives: FxHashMap::default(),
            used_words: FxHashSet::default(),
            current_word: None,
            turn_index: 0,
            config,
        }
    }

    /// The registry kind of this engine.
    #[must_use]
    pub const fn kind() -> GameKind {
        GameKind::WordChain
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

    /// The configured per-turn timeout.
    #[must_use]
    pub fn turn_timeout(&self) -> Duration {
        self.config.turn_timeout
    }

    /// Add a player. Lobby only; duplicates rejected.
    pub fn add_player(&mut self, participant: ParticipantId) -> Result<(), GameError> {
        if self.phase != GamePhase::Lobby {
            return Err(GameError::GameNotStarted);
        }
        if self.players.contains(&participant) {
            return Err(GameError::AlreadyJoined(participant));
        }
        self.players.push(participant);
        self.lives.insert(participant, self.config.starting_lives);
        Ok(())
    }

    /// Remove a player. Lobby only.
    pub fn remove_player(&mut self, participant: ParticipantId) -> Result<(), GameError> {
        if self.phase != GamePhase::Lobby {
            return Err(GameError::GameNotStarted);
        }
        let before = self.players.len();
        self.players.retain(|&p| p != participant);
        if self.players.len() == before {
            return Err(GameError::NotJoined(participant));
        }
        self.lives.remove(&participant);
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
        if self.players.len() < self.config.min_players {
            return Err(GameError::NotEnoughParticipants {
                min: self.config.min_players,
            });
        }
        self.phase = GamePhase::Started;
        Ok(())
    }

    /// Cancel before the game finishes. No winner is recorded.
    pub fn cancel(&mut self, authority: AuthorityContext) -> Result<(), GameError> {
        if !authority.can_manage() {
            return Err(GameError::NotAuthorized);
        }
        self.phase = GamePhase::Finished;
        Ok(())
    }

    /// Players with at least one life left, in join order.
    #[must_use]
    pub fn alive_players(&self) -> Vec<ParticipantId> {
        self.players
            .iter()
            .copied()
            .filter(|p| self.lives.get(p).copied().unwrap_or(0) > 0)
            .collect()
    }

    /// Remaining lives for a player.
    #[must_use]
    pub fn lives_of(&self, participant: ParticipantId) -> i32 {
        self.lives.get(&participant).copied().unwrap_or(0)
    }

    /// The word the chain currently hangs from, normalized.
    #[must_use]
    pub fn current_word(&self) -> Option<&str> {
        self.current_word.as_deref()
    }

    /// Find the current actor: the first player with lives left, scanning
    /// forward (with wrap-around) from the turn index. Snaps the turn
    /// index onto the found slot so a later [`advance_turn`] moves one
    /// slot past the actor. Returns `None` when nobody is alive.
    ///
    /// [`advance_turn`]: WordChainGame::advance_turn
    pub fn next_player_id(&mut self) -> Option<ParticipantId> {
        if self.players.is_empty() {
            return None;
        }
        for offset in 0..self.players.len() {
            let slot = (self.turn_index + offset) % self.players.len();
            let candidate = self.players[slot];
            if self.lives.get(&candidate).copied().unwrap_or(0) > 0 {
                self.turn_index = slot;
                return Some(candidate);
            }
        }
        None
    }

    /// Move the turn index one slot forward. Dead slots are skipped by
    /// the next [`next_player_id`] scan, not here.
    ///
    /// [`next_player_id`]: WordChainGame::next_player_id
    pub fn advance_turn(&mut self) {
        if !self.players.is_empty() {
            self.turn_index = (self.turn_index + 1) % self.players.len();
        }
    }

    /// Would this word be accepted right now?
    #[must_use]
    pub fn is_word_valid(&self, word: &str) -> bool {
        let norm = normalize(word);
        if !norm.chars().any(char::is_alphabetic) {
            return false;
        }
        if self.used_words.contains(&norm) {
            return false;
        }
        match &self.current_word {
            None => true,
            Some(current) => match (norm.chars().next(), current.chars().last()) {
                (Some(first), Some(last)) => first == last,
                _ => false,
            },
        }
    }

    /// Submit a word for `participant`.
    ///
    /// Returns `(accepted, message)`. Rejection costs the participant a
    /// life (floored at zero) and the message reports the new count.
    pub fn play_word(
        &mut self,
        participant: ParticipantId,
        word: &str,
    ) -> Result<(bool, String), GameError> {
        if self.phase != GamePhase::Started {
            return Err(GameError::GameNotStarted);
        }
        if !self.players.contains(&participant) {
            return Err(GameError::NotParticipant(participant));
        }

        if self.is_word_valid(word) {
            let norm = normalize(word);
            self.used_words.insert(norm.clone());
            let message = format!("{participant} plays \"{norm}\" - the chain continues!");
            self.current_word = Some(norm);
            Ok((true, message))
        } else {
            let remaining = self.lose_life(participant);
            let message = format!(
                "\"{word}\" doesn't chain - {participant} loses a life ({remaining} left)"
            );
            Ok((false, message))
        }
    }

    /// Charge a life for a turn timeout. Returns the remaining lives.
    pub fn penalize_timeout(&mut self, participant: ParticipantId) -> i32 {
        self.lose_life(participant)
    }

    fn lose_life(&mut self, participant: ParticipantId) -> i32 {
        let lives = self.lives.entry(participant).or_insert(0);
        *lives = (*lives - 1).max(0);
        *lives
    }

    /// The survivor, once at most one player has lives left.
    #[must_use]
    pub fn winner(&self) -> Option<ParticipantId> {
        if self.phase == GamePhase::Lobby {
            return None;
        }
        let alive = self.alive_players();
        if alive.len() == 1 {
            alive.first().copied()
        } else {
            None
        }
    }

    /// Has the survival loop ended (one or zero players left)?
    #[must_use]
    pub fn is_over(&self) -> bool {
        self.phase == GamePhase::Finished
            || (self.phase == GamePhase::Started && self.alive_players().len() <= 1)
    }

    /// Mark the instance terminal.
    pub fn finish(&mut self) {
        self.phase = GamePhase::Finished;
    }

    /// Ghosts awarded to the survivor: twice the roster size, at least one.
    #[must_use]
    pub fn award_amount(&self) -> i64 {
        (2 * self.players.len() as i64).max(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn started_game(ids: &[u64]) -> WordChainGame {
        let mut game = WordChainGame::new(ParticipantId::new(ids[0]), WordChainConfig::default());
        for &id in ids {
            game.add_player(ParticipantId::new(id)).unwrap();
        }
        game.start(AuthorityContext::host()).unwrap();
        game
    }

    #[test]
    fn test_normalize_strips_punctuation() {
        assert_eq!(normalize("Tree!"), "tree");
        assert_eq!(normalize("it's"), "it's");
        assert_eq!(normalize("  NIGHT?? "), "night");
        assert_eq!(normalize("co-op"), "co-op");
    }

    #[test]
    fn test_normalize_fallback_when_no_letters() {
        assert_eq!(normalize("123!"), "");
        assert_eq!(normalize("---"), "");
    }

    #[test]
    fn test_chain_rule() {
        let mut game = started_game(&[1, 2]);
        game.current_word = Some("tiger".to_string());

        assert!(game.is_word_valid("Rat"));
        assert!(!game.is_word_valid("cat"));
    }

    #[test]
    fn test_first_word_always_chains() {
        let game = started_game(&[1, 2]);
        assert!(game.is_word_valid("anything"));
    }

    #[test]
    fn test_used_word_rejected_case_insensitively() {
        let mut game = started_game(&[1, 2]);
        let p1 = ParticipantId::new(1);

        let (accepted, _) = game.play_word(p1, "tiger").unwrap();
        assert!(accepted);

        // "Rat" chains from tiger; accept it, then replaying it must fail.
        let (accepted, _) = game.play_word(p1, "Rat").unwrap();
        assert!(accepted);
        assert!(!game.is_word_valid("rat!"));
        assert!(!game.is_word_valid("RAT"));
    }

    #[test]
    fn test_rejection_costs_a_life() {
        let mut game = started_game(&[1, 2]);
        let p1 = ParticipantId::new(1);
        game.current_word = Some("tiger".to_string());

        let (accepted, message) = game.play_word(p1, "cat").unwrap();
        assert!(!accepted);
        assert_eq!(game.lives_of(p1), 2);
        assert!(message.contains("2 left"), "message: {message}");
    }

    #[test]
    fn test_lives_floor_at_zero() {
        let mut game = started_game(&[1, 2]);
        let p1 = ParticipantId::new(1);
        for _ in 0..5 {
            game.penalize_timeout(p1);
        }
        assert_eq!(game.lives_of(p1), 0);
    }

    #[test]
    fn test_next_player_skips_dead_slots() {
        let mut game = started_game(&[1, 2, 3]);
        let p2 = ParticipantId::new(2);
        for _ in 0..3 {
            game.penalize_timeout(p2);
        }

        assert_eq!(game.next_player_id(), Some(ParticipantId::new(1)));
        game.advance_turn();
        // Slot 1 (player 2) is dead; the scan lands on player 3.
        assert_eq!(game.next_player_id(), Some(ParticipantId::new(3)));
        game.advance_turn();
        assert_eq!(game.next_player_id(), Some(ParticipantId::new(1)));
    }

    #[test]
    fn test_next_player_none_when_all_dead() {
        let mut game = started_game(&[1, 2]);
        for id in [1, 2] {
            let p = ParticipantId::new(id);
            for _ in 0..3 {
                game.penalize_timeout(p);
            }
        }
        assert_eq!(game.next_player_id(), None);
        assert!(game.is_over());
        assert_eq!(game.winner(), None);
    }

    #[test]
    fn test_winner_is_last_alive() {
        let mut game = started_game(&[1, 2]);
        let p2 = ParticipantId::new(2);
        for _ in 0..3 {
            game.penalize_timeout(p2);
        }
        assert!(game.is_over());
        assert_eq!(game.winner(), Some(ParticipantId::new(1)));
    }

    #[test]
    fn test_award_floors_at_one() {
        let game = started_game(&[1, 2, 3]);
        assert_eq!(game.award_amount(), 6);
    }

    #[test]
    fn test_add_player_after_start_rejected() {
        let mut game = started_game(&[1, 2]);
        assert_eq!(
            game.add_player(ParticipantId::new(9)),
            Err(GameError::GameNotStarted)
        );
    }

    #[test]
    fn test_play_word_from_stranger_rejected() {
        let mut game = started_game(&[1, 2]);
        assert_eq!(
            game.play_word(ParticipantId::new(9), "tiger"),
            Err(GameError::NotParticipant(ParticipantId::new(9)))
        );
    }
}
