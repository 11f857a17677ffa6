//! Identifiers and lifecycle types shared by every engine.
//!
//! ## ParticipantId / ScopeId
//!
//! Opaque newtypes over the platform's numeric ids. The engine never
//! interprets them - they exist so a participant can't be confused with
//! a scope at a call site.
//!
//! ## AuthorityContext
//!
//! Privileged operations (start, cancel, invite) take an explicit
//! `AuthorityContext` instead of consulting any platform permission
//! model. The front end resolves "is this the host / a manager" and
//! passes the flags in.

use serde::{Deserialize, Serialize};

/// Opaque platform user id.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ParticipantId(pub u64);

impl ParticipantId {
    /// Create a new participant id.
    #[must_use]
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    /// Get the raw id value.
    #[must_use]
    pub const fn raw(self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for ParticipantId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "<@{}>", self.0)
    }
}

/// Channel-equivalent boundary key: at most one live game of a kind per scope.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ScopeId(pub u64);

impl ScopeId {
    /// Create a new scope id.
    #[must_use]
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    /// Get the raw id value.
    #[must_use]
    pub const fn raw(self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for ScopeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Scope({})", self.0)
    }
}

/// The four mini-game kinds the registry distinguishes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GameKind {
    /// Pairwise-elimination battle simulator with optional revival.
    Tournament,
    /// Turn-based survival word game.
    WordChain,
    /// Participant roster plus a single uniform draw.
    Wheel,
    /// Turn-based grid-exploration game.
    House,
}

impl std::fmt::Display for GameKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            GameKind::Tournament => "tournament",
            GameKind::WordChain => "wordchain",
            GameKind::Wheel => "wheel",
            GameKind::House => "house",
        };
        write!(f, "{name}")
    }
}

/// Lifecycle of a game instance.
///
/// `Lobby` accepts joins/invites, `Started` accepts turns, `Finished`
/// accepts nothing and is removed from the registry.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Accepting participants; not yet started.
    #[default]
    Lobby,
    /// Turns are being taken.
    Started,
    /// Terminal. The instance is dead and unregistered.
    Finished,
}

/// Externally supplied authority flags for privileged operations.
///
/// The engine never inspects platform roles; the caller resolves
/// host/manager status and hands the result in.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthorityContext {
    /// The requestor created this game instance.
    pub is_host: bool,
    /// The requestor holds elevated (manage-server-equivalent) authority.
    pub has_override: bool,
}

impl AuthorityContext {
    /// Authority of the instance host.
    #[must_use]
    pub const fn host() -> Self {
        Self {
            is_host: true,
            has_override: false,
        }
    }

    /// Elevated authority (manager / staff).
    #[must_use]
    pub const fn elevated() -> Self {
        Self {
            is_host: false,
            has_override: true,
        }
    }

    /// No special authority.
    #[must_use]
    pub const fn none() -> Self {
        Self {
            is_host: false,
            has_override: false,
        }
    }

    /// May this requestor run start/cancel-class operations?
    #[must_use]
    pub const fn can_manage(self) -> bool {
        self.is_host || self.has_override
    }
}
