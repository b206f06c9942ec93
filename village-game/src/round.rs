//! Game lifecycle: start, then alternate night and day until someone wins.
use log::{debug, info};
use rand::Rng;

use crate::config::GameConfig;
use crate::errors::GameError;
use crate::phase::{PhaseOutcome, process_day, process_night};
use crate::rng::RngBundle;
use crate::roles::assign_roles;
use crate::state::{GameState, GameStatus, Phase};
use crate::voting::{cast_vote, voting_complete};

pub const OPENING_LINE: &str = "The first night falls. A nervous silence blankets the village...";

/// Lock the lobby roster, deal roles and open the first night.
///
/// # Errors
///
/// Returns [`GameError::AlreadyStarted`] when the game is running and
/// [`GameError::Config`] when `config` does not fit the roster.
pub fn start_game<R: Rng + ?Sized>(
    state: &mut GameState,
    config: &GameConfig,
    rng: &mut R,
) -> Result<(), GameError> {
    if state.status != GameStatus::Lobby {
        return Err(GameError::AlreadyStarted);
    }
    config.validate(state.players.len())?;

    let player_ids: Vec<String> = state.players.iter().map(|p| p.id.clone()).collect();
    state.people = assign_roles(&player_ids, config, rng);
    state.game_config = *config;
    state.status = GameStatus::InGame;
    state.phase = Phase::Night;
    state.current_round = 1;
    state.votes.clear();
    state.graveyard.clear();
    state.round_results = vec![OPENING_LINE.to_string()];
    state.winner = None;

    info!(
        "game started with {} players ({} beasts, hunter: {})",
        state.people.len(),
        config.num_beasts,
        config.include_hunter
    );
    Ok(())
}

/// Drives one game forward using its own deterministic random streams.
///
/// Holds no game state; every call operates on the state it is handed. Night
/// tie-breaks always draw from the stream keyed on the game's seed and round,
/// so a fresh controller and a long-lived one resolve the same state alike.
#[derive(Debug, Clone)]
pub struct RoundController {
    seed: u64,
    rng: RngBundle,
}

impl RoundController {
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            rng: RngBundle::from_user_seed(seed),
        }
    }

    /// Controller for a persisted game, keyed to its seed and current round so
    /// that reloading between phases replays the same draws.
    #[must_use]
    pub fn for_state(state: &GameState) -> Self {
        Self {
            seed: state.seed,
            rng: RngBundle::for_round(state.seed, state.current_round),
        }
    }

    #[must_use]
    pub const fn seed(&self) -> u64 {
        self.seed
    }

    #[must_use]
    pub const fn rng_bundle(&self) -> &RngBundle {
        &self.rng
    }

    /// Deterministically reseed the controller.
    pub fn reseed(&mut self, seed: u64) {
        self.seed = seed;
        self.rng = RngBundle::from_user_seed(seed);
    }

    /// Start the game using the configuration stored on the lobby.
    ///
    /// # Errors
    ///
    /// See [`start_game`].
    pub fn start_game(&mut self, state: &mut GameState) -> Result<(), GameError> {
        let config = state.game_config;
        start_game(state, &config, self.rng.roles())?;
        state.seed = self.seed;
        Ok(())
    }

    /// Record a vote for the current phase.
    ///
    /// # Errors
    ///
    /// See [`cast_vote`].
    pub fn cast_vote(
        &self,
        state: &mut GameState,
        voter: &str,
        target: &str,
    ) -> Result<(), GameError> {
        cast_vote(state, voter, target)
    }

    /// Resolve whichever phase is current, regardless of missing votes.
    ///
    /// The random streams are rekeyed to `(state.seed, state.current_round)`
    /// before a night is resolved.
    ///
    /// # Errors
    ///
    /// Returns [`GameError::GameOver`] once a winner is declared, otherwise
    /// whatever the phase resolution reports.
    pub fn resolve_phase(&mut self, state: &mut GameState) -> Result<PhaseOutcome, GameError> {
        if state.is_over() {
            return Err(GameError::GameOver);
        }
        match state.phase {
            Phase::Night => {
                self.rng = RngBundle::for_round(state.seed, state.current_round);
                process_night(state, self.rng.tiebreak())
            }
            Phase::Day => process_day(state),
        }
    }

    /// Resolve the current phase once every eligible voter has voted.
    ///
    /// # Errors
    ///
    /// See [`RoundController::resolve_phase`].
    pub fn advance_if_ready(
        &mut self,
        state: &mut GameState,
    ) -> Result<Option<PhaseOutcome>, GameError> {
        if !state.is_running() {
            return Err(if state.is_over() {
                GameError::GameOver
            } else {
                GameError::NotInGame
            });
        }
        if !voting_complete(state) {
            return Ok(None);
        }
        debug!("{} {} voting complete", state.phase, state.current_round);
        self.resolve_phase(state).map(Some)
    }
}
