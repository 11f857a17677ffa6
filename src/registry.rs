//! One live game per scope and kind.
//!
//! The registry is the only shared, cross-instance resource. A single
//! lock around the slot map makes `register` atomic per `(scope, kind)`
//! key: of two concurrent create intents, exactly one wins and the other
//! observes `ScopeOccupied`. Instances themselves are handed out behind
//! per-instance async mutexes, giving each driver the exclusive
//! serialization the turn loops rely on.

use rustc_hash::FxHashMap;
use std::sync::{Arc, Mutex};
use tokio::sync::Mutex as AsyncMutex;
use tracing::debug;

use crate::core::{GameError, GameKind, ScopeId};
use crate::games::{EliminationTournament, HouseGame, PrizeWheel, WordChainGame};

/// Shared handle to one live game instance.
///
/// Cloning is cheap; all clones refer to the same instance and contend
/// on the same per-instance lock.
#[derive(Clone)]
pub enum GameSlot {
    /// A tournament instance.
    Tournament(Arc<AsyncMutex<EliminationTournament>>),
    /// A word-chain instance.
    WordChain(Arc<AsyncMutex<WordChainGame>>),
    /// A wheel instance.
    Wheel(Arc<AsyncMutex<PrizeWheel>>),
    /// A house instance.
    House(Arc<AsyncMutex<HouseGame>>),
}

impl GameSlot {
    /// The kind this slot occupies in its scope.
    #[must_use]
    pub fn kind(&self) -> GameKind {
        match self {
            GameSlot::Tournament(_) => GameKind::Tournament,
            GameSlot::WordChain(_) => GameKind::WordChain,
            GameSlot::Wheel(_) => GameKind::Wheel,
            GameSlot::House(_) => GameKind::House,
        }
    }
}

impl From<EliminationTournament> for GameSlot {
    fn from(game: EliminationTournament) -> Self {
        GameSlot::Tournament(Arc::new(AsyncMutex::new(game)))
    }
}

impl From<WordChainGame> for GameSlot {
    fn from(game: WordChainGame) -> Self {
        GameSlot::WordChain(Arc::new(AsyncMutex::new(game)))
    }
}

impl From<PrizeWheel> for GameSlot {
    fn from(game: PrizeWheel) -> Self {
        GameSlot::Wheel(Arc::new(AsyncMutex::new(game)))
    }
}

impl From<HouseGame> for GameSlot {
    fn from(game: HouseGame) -> Self {
        GameSlot::House(Arc::new(AsyncMutex::new(game)))
    }
}

/// Maps `(scope, kind)` to at most one live game instance.
#[derive(Default)]
pub struct GameRegistry {
    slots: Mutex<FxHashMap<(ScopeId, GameKind), GameSlot>>,
}

impl GameRegistry {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Claim the `(scope, kind)` slot for `slot`.
    ///
    /// Atomic per key: a concurrent register for the same scope and kind
    /// loses with `ScopeOccupied`.
    pub fn register(&self, scope: ScopeId, slot: GameSlot) -> Result<(), GameError> {
        let kind = slot.kind();
        let mut slots = self.slots.lock().expect("registry lock poisoned");
        match slots.entry((scope, kind)) {
            std::collections::hash_map::Entry::Occupied(_) => Err(GameError::ScopeOccupied),
            std::collections::hash_map::Entry::Vacant(entry) => {
                entry.insert(slot);
                debug!(%scope, %kind, "game registered");
                Ok(())
            }
        }
    }

    /// Look up the live instance of `kind` in `scope`, if any.
    #[must_use]
    pub fn lookup(&self, scope: ScopeId, kind: GameKind) -> Option<GameSlot> {
        self.slots
            .lock()
            .expect("registry lock poisoned")
            .get(&(scope, kind))
            .cloned()
    }

    /// Release the `(scope, kind)` slot. Returns the evicted handle so a
    /// caller can finish narrating; `None` if the slot was already free.
    pub fn unregister(&self, scope: ScopeId, kind: GameKind) -> Option<GameSlot> {
        let removed = self
            .slots
            .lock()
            .expect("registry lock poisoned")
            .remove(&(scope, kind));
        if removed.is_some() {
            debug!(%scope, %kind, "game unregistered");
        }
        removed
    }

    /// Number of live instances across all scopes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.slots.lock().expect("registry lock poisoned").len()
    }

    /// Whether any instance is live.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::ParticipantId;
    use crate::games::TournamentConfig;

    fn tournament() -> GameSlot {
        EliminationTournament::new(ParticipantId::new(1), TournamentConfig::default(), 42).into()
    }

    #[test]
    fn test_second_register_same_kind_loses() {
        let registry = GameRegistry::new();
        let scope = ScopeId::new(100);

        registry.register(scope, tournament()).unwrap();
        assert_eq!(
            registry.register(scope, tournament()),
            Err(GameError::ScopeOccupied)
        );
    }

    #[test]
    fn test_kinds_do_not_collide() {
        let registry = GameRegistry::new();
        let scope = ScopeId::new(100);

        registry.register(scope, tournament()).unwrap();
        registry
            .register(scope, PrizeWheel::new(ParticipantId::new(1)).into())
            .unwrap();
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn test_lookup_and_unregister() {
        let registry = GameRegistry::new();
        let scope = ScopeId::new(100);

        assert!(registry.lookup(scope, GameKind::Tournament).is_none());
        registry.register(scope, tournament()).unwrap();
        assert!(registry.lookup(scope, GameKind::Tournament).is_some());

        assert!(registry.unregister(scope, GameKind::Tournament).is_some());
        assert!(registry.unregister(scope, GameKind::Tournament).is_none());
        assert!(registry.is_empty());
    }

    #[test]
    fn test_scopes_are_independent() {
        let registry = GameRegistry::new();
        registry.register(ScopeId::new(1), tournament()).unwrap();
        registry.register(ScopeId::new(2), tournament()).unwrap();
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn test_concurrent_register_exactly_one_wins() {
        let registry = Arc::new(GameRegistry::new());
        let scope = ScopeId::new(7);

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let registry = Arc::clone(&registry);
                std::thread::spawn(move || registry.register(scope, tournament()).is_ok())
            })
            .collect();

        let wins = handles
            .into_iter()
            .map(|h| h.join().unwrap())
            .filter(|&won| won)
            .count();
        assert_eq!(wins, 1);
    }
}
