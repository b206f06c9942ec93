use crate::config::GameConfig;
use crate::errors::GameError;
use crate::lobby::{create_lobby, join_lobby};
use crate::phase::PhaseOutcome;
use crate::round::RoundController;
use crate::state::{GameState, GameStatus};

/// High-level session wrapper binding a round controller to a mutable game state.
#[derive(Debug, Clone)]
pub struct GameSession {
    controller: RoundController,
    state: GameState,
}

impl GameSession {
    /// Seat `player_count` players in a fresh lobby configured with `config`.
    ///
    /// # Errors
    ///
    /// Never fails for a fresh lobby; the signature mirrors [`join_lobby`].
    pub fn lobby(seed: u64, player_count: usize, config: GameConfig) -> Result<Self, GameError> {
        let mut state = create_lobby();
        for _ in 1..player_count {
            join_lobby(&mut state)?;
        }
        state.game_config = config;
        Ok(Self::from_state(state, seed))
    }

    /// Build a session from an existing game state.
    ///
    /// `seed` deals the roles of a lobby. A game already under way keeps the
    /// seed it was dealt with.
    #[must_use]
    pub fn from_state(state: GameState, seed: u64) -> Self {
        let controller = match state.status {
            GameStatus::Lobby => RoundController::new(seed),
            GameStatus::InGame => RoundController::for_state(&state),
        };
        Self { controller, state }
    }

    /// Deal roles and open the first night.
    ///
    /// # Errors
    ///
    /// See [`RoundController::start_game`].
    pub fn start(&mut self) -> Result<(), GameError> {
        self.controller.start_game(&mut self.state)
    }

    /// Record a vote, resolving the phase if it was the last one missing.
    ///
    /// # Errors
    ///
    /// See [`RoundController::cast_vote`] and [`RoundController::advance_if_ready`].
    pub fn vote(&mut self, voter: &str, target: &str) -> Result<Option<PhaseOutcome>, GameError> {
        self.controller.cast_vote(&mut self.state, voter, target)?;
        self.controller.advance_if_ready(&mut self.state)
    }

    /// Resolve the current phase with whatever votes are in.
    ///
    /// # Errors
    ///
    /// See [`RoundController::resolve_phase`].
    pub fn resolve(&mut self) -> Result<PhaseOutcome, GameError> {
        self.controller.resolve_phase(&mut self.state)
    }

    /// Borrow the underlying immutable game state.
    #[must_use]
    pub const fn state(&self) -> &GameState {
        &self.state
    }

    /// Borrow the underlying mutable game state.
    pub const fn state_mut(&mut self) -> &mut GameState {
        &mut self.state
    }

    /// Apply a closure to the mutable game state.
    pub fn with_state_mut<R>(&mut self, f: impl FnOnce(&mut GameState) -> R) -> R {
        f(&mut self.state)
    }

    /// Borrow the controller.
    #[must_use]
    pub const fn controller(&self) -> &RoundController {
        &self.controller
    }

    /// Consume the session, returning the underlying game state.
    #[must_use]
    pub fn into_state(self) -> GameState {
        self.state
    }
}
