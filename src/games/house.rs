//! Turn-based room-exploration game ("the House").
//!
//! ## Rules
//!
//! A host opens a lobby (solo or multi), invites players, and starts
//! once enough invitees accepted. Everyone begins at the center of a
//! small grid of rooms. On their turn a player may `search` (20% find
//! an item, 20% take 1-3 damage from a hidden snare, 60% nothing),
//! `explore` (look around, no state change), `move` a direction, or
//! `use` an inventory item. A player at 0 HP drops out of the rotation
//! but stays on the roster for status queries.
//!
//! An idle turn is auto-passed by the driver with no penalty; the game
//! runs until no accepted players remain or the host ends it.

use smallvec::SmallVec;
use std::time::{Duration, Instant};

use crate::core::{
    AuthorityContext, GameError, GameKind, GamePhase, GameRng, NarrationEvent, ParticipantId,
    VisualHint,
};

const FOUND_ITEM: &str = "ancient key";

const ROOM_DESCRIPTIONS: &[&str] = &[
    "a dusty parlor where the curtains move on their own",
    "a kitchen that smells faintly of candle smoke",
    "a library whose books whisper when you turn your back",
    "a cramped cellar with scratch marks on the ceiling",
    "a ballroom lit by a chandelier with no candles",
    "a nursery where a rocking chair creaks in the corner",
    "a greenhouse overrun with pale, grasping vines",
    "an attic stacked with portraits that follow you",
    "a hallway of doors that were not there a moment ago",
];

const ROOM_ITEMS: &[&str] = &["rusty lantern", "cracked mirror", "moth-eaten map"];

const SEARCH_NOTHING_LINES: &[&str] = &[
    "You rummage around and find nothing but cobwebs.",
    "Something skitters away. The room keeps its secrets.",
    "You search every corner. Nothing... this time.",
];

/// Movement direction on the grid. `(0, 0)` is the north-west corner.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum Direction {
    /// North (row - 1).
    Up,
    /// South (row + 1).
    Down,
    /// West (column - 1).
    Left,
    /// East (column + 1).
    Right,
}

impl Direction {
    /// All four directions in a fixed order.
    pub const ALL: [Direction; 4] = [
        Direction::Up,
        Direction::Down,
        Direction::Left,
        Direction::Right,
    ];

    fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_lowercase().as_str() {
            "up" | "north" | "n" => Some(Direction::Up),
            "down" | "south" | "s" => Some(Direction::Down),
            "left" | "west" | "w" => Some(Direction::Left),
            "right" | "east" | "e" => Some(Direction::Right),
            _ => None,
        }
    }
}

impl std::fmt::Display for Direction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Direction::Up => "up",
            Direction::Down => "down",
            Direction::Left => "left",
            Direction::Right => "right",
        };
        write!(f, "{name}")
    }
}

/// One turn's intent from the current player.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum HouseAction {
    /// Rummage through the current room.
    Search,
    /// Look around: room description, items, exits.
    Explore,
    /// Walk to an adjacent room.
    Move(Direction),
    /// Consume an inventory item by name.
    Use(String),
}

impl HouseAction {
    /// Parse a chat-style command: `search`, `explore`, `move up`,
    /// `use ancient key`. Returns `None` for anything else.
    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        let trimmed = raw.trim();
        let (head, rest) = match trimmed.split_once(char::is_whitespace) {
            Some((head, rest)) => (head, rest.trim()),
            None => (trimmed, ""),
        };
        match head.to_lowercase().as_str() {
            "search" => Some(HouseAction::Search),
            "explore" | "look" => Some(HouseAction::Explore),
            "move" | "go" => Direction::parse(rest).map(HouseAction::Move),
            "use" if !rest.is_empty() => Some(HouseAction::Use(rest.to_lowercase())),
            _ => None,
        }
    }
}

/// Solo runs need one accepted player; multi needs two.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum HouseMode {
    /// Single-player exploration.
    Solo,
    /// Co-op exploration, minimum two accepted players.
    Multi,
}

/// Tunables for a house instance.
#[derive(Clone, Debug)]
pub struct HouseConfig {
    /// Grid width in rooms.
    pub width: usize,
    /// Grid height in rooms.
    pub height: usize,
    /// Roster cap, invited included.
    pub max_players: usize,
    /// Hit points each player starts with.
    pub starting_hp: i32,
    /// How long the driver waits before auto-passing a turn.
    pub turn_window: Duration,
}

impl Default for HouseConfig {
    fn default() -> Self {
        Self {
            width: 3,
            height: 3,
            max_players: 4,
            starting_hp: 10,
            turn_window: Duration::from_secs(20),
        }
    }
}

#[derive(Clone, Debug)]
struct Room {
    description: String,
    items: Vec<String>,
}

#[derive(Clone, Debug)]
struct PlayerState {
    accepted: bool,
    hp: i32,
    inventory: SmallVec<[String; 4]>,
    position: (usize, usize),
}

/// Per-player view for status queries.
#[derive(Clone, Debug)]
pub struct HousePlayerStatus {
    /// The player.
    pub participant: ParticipantId,
    /// In the active rotation (accepted the invite, not knocked out).
    pub accepted: bool,
    /// Remaining hit points.
    pub hp: i32,
    /// Carried items.
    pub inventory: Vec<String>,
    /// Current grid position.
    pub position: (usize, usize),
}

/// Read-only snapshot for status queries.
#[derive(Clone, Debug)]
pub struct HouseStatus {
    /// Current lifecycle phase.
    pub phase: GamePhase,
    /// Solo or multi.
    pub mode: HouseMode,
    /// Everyone on the roster, join order, knocked-out players included.
    pub players: Vec<HousePlayerStatus>,
}

/// Turn-based grid-exploration game.
pub struct HouseGame {
    host: ParticipantId,
    mode: HouseMode,
    phase: GamePhase,
    created_at: Instant,
    config: HouseConfig,
    /// Join order, invited-but-unaccepted included.
    roster: Vec<ParticipantId>,
    states: rustc_hash::FxHashMap<ParticipantId, PlayerState>,
    grid: Vec<Room>,
    turn_index: usize,
    rng: GameRng,
    flavor: GameRng,
}

impl HouseGame {
    /// Open a lobby. The host joins immediately as accepted.
    #[must_use]
    pub fn new(host: ParticipantId, mode: HouseMode, config: HouseConfig, seed: u64) -> Self {
        let rng = GameRng::new(seed);
        let flavor = rng.for_context("flavor");
        let mut game = Self {
            host,
            mode,
            phase: GamePhase::Lobby,
            created_at: Instant::now(),
            config,
            roster: Vec::new(),
            states: rustc_hash::FxHashMap::default(),
            grid: Vec::new(),
            turn_index: 0,
            rng,
            flavor,
        };
        game.roster.push(host);
        game.states.insert(host, game.blank_player(true));
        game
    }

    fn blank_player(&self, accepted: bool) -> PlayerState {
        PlayerState {
            accepted,
            hp: self.config.starting_hp,
            inventory: SmallVec::new(),
            position: (self.config.width / 2, self.config.height / 2),
        }
    }

    /// The registry kind of this engine.
    #[must_use]
    pub const fn kind() -> GameKind {
        GameKind::House
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

    /// How long the driver waits before auto-passing a turn.
    #[must_use]
    pub fn turn_window(&self) -> Duration {
        self.config.turn_window
    }

    /// Invite a player (host/override only). The invitee joins the
    /// roster unaccepted and enters the rotation once they accept.
    pub fn invite(
        &mut self,
        authority: AuthorityContext,
        target: ParticipantId,
    ) -> Result<(), GameError> {
        if !authority.can_manage() {
            return Err(GameError::NotAuthorized);
        }
        if self.phase != GamePhase::Lobby {
            return Err(GameError::GameNotStarted);
        }
        if self.roster.contains(&target) {
            return Err(GameError::AlreadyJoined(target));
        }
        if self.roster.len() >= self.config.max_players {
            return Err(GameError::Full {
                max: self.config.max_players,
            });
        }
        self.roster.push(target);
        self.states.insert(target, self.blank_player(false));
        Ok(())
    }

    /// Accept a pending invite.
    pub fn accept(&mut self, participant: ParticipantId) -> Result<(), GameError> {
        if self.phase != GamePhase::Lobby {
            return Err(GameError::GameNotStarted);
        }
        match self.states.get_mut(&participant) {
            Some(state) => {
                state.accepted = true;
                Ok(())
            }
            None => Err(GameError::NotInvited(participant)),
        }
    }

    /// Transition to Started: build the grid and place every accepted
    /// player at the center room.
    pub fn start(&mut self, authority: AuthorityContext) -> Result<(), GameError> {
        if !authority.can_manage() {
            return Err(GameError::NotAuthorized);
        }
        if self.phase != GamePhase::Lobby {
            return Err(GameError::GameNotStarted);
        }
        let min = match self.mode {
            HouseMode::Solo => 1,
            HouseMode::Multi => 2,
        };
        if self.accepted_players().len() < min {
            return Err(GameError::NotEnoughParticipants { min });
        }

        self.grid = (0..self.config.width * self.config.height)
            .map(|_| {
                let description = self
                    .flavor
                    .choose(ROOM_DESCRIPTIONS)
                    .copied()
                    .unwrap_or("an unremarkable room")
                    .to_string();
                let mut items = Vec::new();
                if self.flavor.gen_bool(0.3) {
                    if let Some(item) = self.flavor.choose(ROOM_ITEMS) {
                        items.push((*item).to_string());
                    }
                }
                Room { description, items }
            })
            .collect();

        let center = (self.config.width / 2, self.config.height / 2);
        for state in self.states.values_mut() {
            state.position = center;
        }
        self.phase = GamePhase::Started;
        Ok(())
    }

    /// End the run early (host/override only). No winner.
    pub fn cancel(&mut self, authority: AuthorityContext) -> Result<(), GameError> {
        if !authority.can_manage() {
            return Err(GameError::NotAuthorized);
        }
        self.phase = GamePhase::Finished;
        Ok(())
    }

    /// Players currently in the turn rotation, join order.
    #[must_use]
    pub fn accepted_players(&self) -> Vec<ParticipantId> {
        self.roster
            .iter()
            .copied()
            .filter(|p| self.states.get(p).is_some_and(|s| s.accepted))
            .collect()
    }

    /// Whose turn is it? `None` when nobody is left in the rotation.
    #[must_use]
    pub fn current_player(&self) -> Option<ParticipantId> {
        let accepted = self.accepted_players();
        if accepted.is_empty() {
            return None;
        }
        Some(accepted[self.turn_index % accepted.len()])
    }

    /// Directions that stay inside the grid from `participant`'s room.
    pub fn valid_moves(
        &self,
        participant: ParticipantId,
    ) -> Result<SmallVec<[Direction; 4]>, GameError> {
        let state = self
            .states
            .get(&participant)
            .ok_or(GameError::NotParticipant(participant))?;
        let (x, y) = state.position;
        let mut moves = SmallVec::new();
        if y > 0 {
            moves.push(Direction::Up);
        }
        if y + 1 < self.config.height {
            moves.push(Direction::Down);
        }
        if x > 0 {
            moves.push(Direction::Left);
        }
        if x + 1 < self.config.width {
            moves.push(Direction::Right);
        }
        Ok(moves)
    }

    /// Apply a bounds-checked move, returning the new position.
    pub fn move_player(
        &mut self,
        participant: ParticipantId,
        direction: Direction,
    ) -> Result<(usize, usize), GameError> {
        let (width, height) = (self.config.width, self.config.height);
        let state = self
            .states
            .get_mut(&participant)
            .ok_or(GameError::NotParticipant(participant))?;
        let (x, y) = state.position;
        let next = match direction {
            Direction::Up if y > 0 => (x, y - 1),
            Direction::Down if y + 1 < height => (x, y + 1),
            Direction::Left if x > 0 => (x - 1, y),
            Direction::Right if x + 1 < width => (x + 1, y),
            _ => return Err(GameError::InvalidMove),
        };
        state.position = next;
        Ok(next)
    }

    /// Take `participant`'s turn.
    ///
    /// Turn order is enforced (accepted players in join order); any
    /// accepted action advances the rotation, including an in-bounds
    /// check failure on `move` (which reports the valid exits instead
    /// of erroring).
    pub fn act(
        &mut self,
        participant: ParticipantId,
        action: &HouseAction,
    ) -> Result<Vec<NarrationEvent>, GameError> {
        if self.phase != GamePhase::Started {
            return Err(GameError::GameNotStarted);
        }
        if !self.states.contains_key(&participant) {
            return Err(GameError::NotParticipant(participant));
        }
        if self.current_player() != Some(participant) {
            return Err(GameError::NotYourTurn);
        }

        let events = match action {
            HouseAction::Search => self.do_search(participant),
            HouseAction::Explore => self.do_explore(participant),
            HouseAction::Move(direction) => self.do_move(participant, *direction),
            HouseAction::Use(item) => self.do_use(participant, item),
        };

        self.turn_index += 1;
        if self.accepted_players().is_empty() {
            self.phase = GamePhase::Finished;
        }
        Ok(events)
    }

    /// Auto-pass an idle turn: advance the rotation, no penalty.
    pub fn auto_pass(&mut self) {
        self.turn_index += 1;
    }

    fn room_at(&self, position: (usize, usize)) -> &Room {
        &self.grid[position.1 * self.config.width + position.0]
    }

    fn do_search(&mut self, participant: ParticipantId) -> Vec<NarrationEvent> {
        let roll = self.rng.gen_f64();
        if roll < 0.2 {
            let state = self.states.get_mut(&participant).expect("roster checked");
            state.inventory.push(FOUND_ITEM.to_string());
            vec![NarrationEvent::text(format!(
                "{participant} pries up a floorboard and finds an {FOUND_ITEM}!"
            ))]
        } else if roll < 0.4 {
            let damage = self.rng.gen_range(1..4);
            let state = self.states.get_mut(&participant).expect("roster checked");
            state.hp -= damage;
            let hp = state.hp;
            let mut events = vec![NarrationEvent::text(format!(
                "A hidden snare snaps shut! {participant} takes {damage} damage (now {hp} HP)."
            ))];
            if hp <= 0 {
                state.accepted = false;
                events.push(NarrationEvent::with_visual(
                    format!("{participant} collapses and is carried out of the house..."),
                    VisualHint::Knockout(participant),
                ));
            }
            events
        } else {
            let line = self
                .flavor
                .choose(SEARCH_NOTHING_LINES)
                .copied()
                .unwrap_or("You find nothing.");
            vec![NarrationEvent::text(line)]
        }
    }

    fn do_explore(&self, participant: ParticipantId) -> Vec<NarrationEvent> {
        let state = &self.states[&participant];
        let room = self.room_at(state.position);
        let exits = self
            .valid_moves(participant)
            .map(|moves| {
                moves
                    .iter()
                    .map(Direction::to_string)
                    .collect::<Vec<_>>()
                    .join(", ")
            })
            .unwrap_or_default();
        let items = if room.items.is_empty() {
            "nothing of note".to_string()
        } else {
            room.items.join(", ")
        };
        vec![NarrationEvent::with_visual(
            format!(
                "You are in {}. You see {items}. Exits: {exits}.",
                room.description
            ),
            VisualHint::Room {
                x: state.position.0,
                y: state.position.1,
            },
        )]
    }

    fn do_move(&mut self, participant: ParticipantId, direction: Direction) -> Vec<NarrationEvent> {
        match self.move_player(participant, direction) {
            Ok(position) => {
                let room = self.room_at(position);
                vec![NarrationEvent::with_visual(
                    format!("{participant} heads {direction} into {}.", room.description),
                    VisualHint::Room {
                        x: position.0,
                        y: position.1,
                    },
                )]
            }
            Err(_) => {
                let exits = self
                    .valid_moves(participant)
                    .map(|moves| {
                        moves
                            .iter()
                            .map(Direction::to_string)
                            .collect::<Vec<_>>()
                            .join(", ")
                    })
                    .unwrap_or_default();
                vec![NarrationEvent::text(format!(
                    "A wall blocks the way {direction}. You can go: {exits}."
                ))]
            }
        }
    }

    fn do_use(&mut self, participant: ParticipantId, item: &str) -> Vec<NarrationEvent> {
        let state = self.states.get_mut(&participant).expect("roster checked");
        let wanted = item.trim().to_lowercase();
        match state.inventory.iter().position(|held| *held == wanted) {
            Some(index) => {
                let consumed = state.inventory.remove(index);
                let effect = if consumed == FOUND_ITEM {
                    "It turns in an unseen lock somewhere; a distant door creaks open."
                } else {
                    "It crumbles to dust, its purpose spent."
                };
                vec![NarrationEvent::text(format!(
                    "{participant} uses the {consumed}. {effect}"
                ))]
            }
            None => vec![NarrationEvent::text(format!(
                "{participant} has no \"{wanted}\" to use."
            ))],
        }
    }

    /// Has the run ended (explicitly, or nobody left in rotation)?
    #[must_use]
    pub fn is_over(&self) -> bool {
        self.phase == GamePhase::Finished
            || (self.phase == GamePhase::Started && self.accepted_players().is_empty())
    }

    /// Mark the instance terminal.
    pub fn finish(&mut self) {
        self.phase = GamePhase::Finished;
    }

    /// Snapshot for status queries, knocked-out players included.
    #[must_use]
    pub fn status(&self) -> HouseStatus {
        HouseStatus {
            phase: self.phase,
            mode: self.mode,
            players: self
                .roster
                .iter()
                .map(|&participant| {
                    let state = &self.states[&participant];
                    HousePlayerStatus {
                        participant,
                        accepted: state.accepted,
                        hp: state.hp,
                        inventory: state.inventory.to_vec(),
                        position: state.position,
                    }
                })
                .collect(),
        }
    }
}
