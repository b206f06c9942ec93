//! Village Game Engine
//!
//! Rules engine for a hidden-role elimination game. Beasts pick off the
//! village at night, the village banishes a suspect by day, and the game ends
//! when either side is wiped out or the Beasts reach parity.
//! This crate holds the rules only; transports and UIs live elsewhere.

pub mod config;
pub mod errors;
pub mod lobby;
pub mod phase;
pub mod rng;
pub mod roles;
pub mod room;
pub mod round;
pub mod session;
pub mod state;
pub mod storage;
pub mod tally;
pub mod view;
pub mod voting;
pub mod win;

use log::{debug, info};
use rand::Rng;

// Re-export commonly used types
pub use config::{ConfigError, GameConfig, LobbyRules};
pub use errors::GameError;
pub use lobby::{configure, create_lobby, join_lobby};
pub use phase::{
    LOG_DAY_NO_CONSENSUS, LOG_NIGHT_INDECISIVE, PhaseOutcome, process_day, process_night,
};
pub use rng::{CountingRng, RngBundle};
pub use roles::{assign_roles, role_multiset};
pub use room::{ROOM_CODE_LEN, generate_room_code, normalize_room_code, seed_from_room_code};
pub use round::{OPENING_LINE, RoundController, start_game};
pub use session::GameSession;
pub use state::{
    EliminationReason, EliminationRecord, GameState, GameStatus, Person, Phase, Player, Role,
    Votes, Winner,
};
pub use storage::MemoryStorage;
pub use tally::{TargetSet, VoteTally, tally};
pub use view::PlayerView;
pub use voting::{cast_vote, eligible_targets, eligible_voters, pending_voters, voting_complete};
pub use win::{check_winner, evaluate};

/// Trait for abstracting room persistence.
/// Platform-specific implementations should provide this
pub trait RoomStorage {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Load the state of a room
    ///
    /// # Errors
    ///
    /// Returns an error if the stored state cannot be read or decoded.
    fn load_state(&self, room_id: &str) -> Result<Option<GameState>, Self::Error>;

    /// Save the state of a room, replacing what was there
    ///
    /// # Errors
    ///
    /// Returns an error if the state cannot be encoded or written.
    fn save_state(&self, room_id: &str, state: &GameState) -> Result<(), Self::Error>;
}

/// Attempts at finding an unused room code before giving up.
const ROOM_CODE_ATTEMPTS: usize = 64;

/// Main game engine for managing rooms
pub struct GameEngine<S: RoomStorage> {
    storage: S,
}

impl<S: RoomStorage> GameEngine<S> {
    /// Create a new game engine over the provided storage
    pub const fn new(storage: S) -> Self {
        Self { storage }
    }

    #[must_use]
    pub const fn storage(&self) -> &S {
        &self.storage
    }

    /// Open a new room with its creator seated as host.
    ///
    /// # Errors
    ///
    /// Returns an error if storage fails or no free room code is found.
    pub fn create_room<R: Rng + ?Sized>(&self, rng: &mut R) -> anyhow::Result<(String, Player)> {
        for _ in 0..ROOM_CODE_ATTEMPTS {
            let code = generate_room_code(rng);
            if self.storage.load_state(&code)?.is_some() {
                debug!("room code {code} taken, drawing another");
                continue;
            }
            let mut state = create_lobby();
            state.seed = seed_from_room_code(&code).unwrap_or_default();
            let host = state.players[0].clone();
            self.storage.save_state(&code, &state)?;
            info!("room {code} opened by {}", host.id);
            return Ok((code, host));
        }
        anyhow::bail!("no free room code after {ROOM_CODE_ATTEMPTS} attempts")
    }

    /// Seat a new player in a room's lobby.
    ///
    /// # Errors
    ///
    /// Returns [`GameError::RoomNotFound`] for unknown rooms and
    /// [`GameError::AlreadyStarted`] once the game is under way.
    pub fn join_room(&self, room: &str) -> anyhow::Result<Player> {
        self.update(room, join_lobby)
    }

    /// Change the role configuration of a room. Host only.
    ///
    /// # Errors
    ///
    /// See [`configure`].
    pub fn configure_room(
        &self,
        room: &str,
        player_id: &str,
        config: GameConfig,
    ) -> anyhow::Result<()> {
        self.update(room, |state| configure(state, player_id, config))
    }

    /// Deal roles and open the first night. Host only.
    ///
    /// # Errors
    ///
    /// Returns [`GameError::NotHost`] for anyone but the host, and whatever
    /// [`RoundController::start_game`] reports.
    pub fn start_room(&self, room: &str, player_id: &str) -> anyhow::Result<()> {
        self.update(room, |state| {
            lobby::ensure_host(state, player_id)?;
            RoundController::new(state.seed).start_game(state)
        })
    }

    /// Record a vote and resolve the phase once every eligible voter is in.
    ///
    /// # Errors
    ///
    /// See [`RoundController::cast_vote`] and [`RoundController::advance_if_ready`].
    pub fn vote(
        &self,
        room: &str,
        voter: &str,
        target: &str,
    ) -> anyhow::Result<Option<PhaseOutcome>> {
        self.update(room, |state| {
            let mut controller = RoundController::for_state(state);
            controller.cast_vote(state, voter, target)?;
            controller.advance_if_ready(state)
        })
    }

    /// Current state of a room.
    ///
    /// # Errors
    ///
    /// Returns [`GameError::RoomNotFound`] for unknown rooms.
    pub fn load_room(&self, room: &str) -> anyhow::Result<GameState> {
        let (_, state) = self.fetch(room)?;
        Ok(state)
    }

    /// A room as seen by one of its players.
    ///
    /// # Errors
    ///
    /// Returns [`GameError::RoomNotFound`] for unknown rooms and whatever
    /// [`PlayerView::for_player`] reports.
    pub fn view(&self, room: &str, player_id: &str) -> anyhow::Result<PlayerView> {
        let (_, state) = self.fetch(room)?;
        Ok(PlayerView::for_player(&state, player_id)?)
    }

    fn fetch(&self, room: &str) -> anyhow::Result<(String, GameState)> {
        let not_found = || GameError::RoomNotFound {
            room_id: room.trim().to_string(),
        };
        let code = normalize_room_code(room).ok_or_else(not_found)?;
        let state = self.storage.load_state(&code)?.ok_or_else(not_found)?;
        Ok((code, state))
    }

    /// Load, apply `op` and save only if it succeeded.
    fn update<T>(
        &self,
        room: &str,
        op: impl FnOnce(&mut GameState) -> Result<T, GameError>,
    ) -> anyhow::Result<T> {
        let (code, mut state) = self.fetch(room)?;
        let out = op(&mut state)?;
        self.storage.save_state(&code, &state)?;
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha20Rng;

    fn engine_with_room(players: usize) -> (GameEngine<MemoryStorage>, String) {
        let engine = GameEngine::new(MemoryStorage::new());
        let (code, host) = engine
            .create_room(&mut ChaCha20Rng::seed_from_u64(11))
            .unwrap();
        assert_eq!(host.id, "P1");
        for _ in 1..players {
            engine.join_room(&code).unwrap();
        }
        (engine, code)
    }

    fn game_error(err: &anyhow::Error) -> Option<&GameError> {
        err.downcast_ref::<GameError>()
    }

    #[test]
    fn rooms_are_seeded_from_their_code() {
        let (engine, code) = engine_with_room(1);
        let state = engine.load_room(&code).unwrap();
        assert_eq!(state.status, GameStatus::Lobby);
        assert_eq!(Some(state.seed), seed_from_room_code(&code));
        assert_eq!(state.host_id.as_deref(), Some("P1"));
    }

    #[test]
    fn room_codes_are_case_insensitive() {
        let (engine, code) = engine_with_room(1);
        let player = engine.join_room(&code.to_lowercase()).unwrap();
        assert_eq!(player.id, "P2");
        assert_eq!(engine.load_room(&code).unwrap().players.len(), 2);
    }

    #[test]
    fn unknown_rooms_are_reported() {
        let engine = GameEngine::new(MemoryStorage::new());
        for room in ["ZZZZ", "not a code"] {
            let err = engine.join_room(room).unwrap_err();
            assert!(matches!(
                game_error(&err),
                Some(GameError::RoomNotFound { .. })
            ));
        }
    }

    #[test]
    fn only_the_host_configures_and_starts() {
        let (engine, code) = engine_with_room(5);
        let err = engine
            .configure_room(&code, "P2", GameConfig::new(2, false))
            .unwrap_err();
        assert_eq!(
            game_error(&err),
            Some(&GameError::NotHost {
                player: "P2".to_string()
            })
        );
        engine
            .configure_room(&code, "P1", GameConfig::new(2, false))
            .unwrap();

        let err = engine.start_room(&code, "P3").unwrap_err();
        assert!(matches!(game_error(&err), Some(GameError::NotHost { .. })));
        assert_eq!(engine.load_room(&code).unwrap().status, GameStatus::Lobby);

        engine.start_room(&code, "P1").unwrap();
        let state = engine.load_room(&code).unwrap();
        assert_eq!(state.status, GameStatus::InGame);
        assert_eq!(state.living_beasts(), 2);
        assert!(state.people.iter().all(|p| p.role != Role::Hunter));
    }

    #[test]
    fn failed_starts_leave_the_lobby_untouched() {
        let (engine, code) = engine_with_room(2);
        let before = engine.load_room(&code).unwrap();
        let err = engine.start_room(&code, "P1").unwrap_err();
        assert!(matches!(
            game_error(&err),
            Some(GameError::Config(ConfigError::NotEnoughPlayers { .. }))
        ));
        assert_eq!(engine.load_room(&code).unwrap(), before);
    }

    #[test]
    fn votes_persist_and_resolve_the_night() {
        let (engine, code) = engine_with_room(4);
        engine.start_room(&code, "P1").unwrap();
        let state = engine.load_room(&code).unwrap();
        let beast = state
            .people
            .iter()
            .find(|p| p.role.is_beast())
            .map(|p| p.id.clone())
            .unwrap();
        let prey = eligible_targets(&state, &beast)[0].to_string();

        let outcome = engine.vote(&code, &beast, &prey).unwrap();
        assert_eq!(
            outcome.as_ref().and_then(PhaseOutcome::casualty),
            Some(prey.as_str())
        );

        let state = engine.load_room(&code).unwrap();
        assert_eq!(state.phase, Phase::Day);
        assert!(!state.person(&prey).unwrap().alive);

        let view = engine.view(&code, &prey).unwrap();
        assert!(view.spectator);
        assert_eq!(view.revealed.len(), 4);
    }

    #[test]
    fn rejected_votes_are_not_saved() {
        let (engine, code) = engine_with_room(3);
        engine.start_room(&code, "P1").unwrap();
        let state = engine.load_room(&code).unwrap();
        let villager = state
            .people
            .iter()
            .find(|p| !p.role.is_beast())
            .map(|p| p.id.clone())
            .unwrap();

        let err = engine.vote(&code, &villager, "P1").unwrap_err();
        assert!(matches!(
            game_error(&err),
            Some(GameError::IneligibleVoter { .. })
        ));
        assert!(engine.load_room(&code).unwrap().votes.is_empty());
    }
}
