//! Lobby roster management before the game starts.
use log::info;

use crate::config::GameConfig;
use crate::errors::GameError;
use crate::state::{GameState, GameStatus, Player};

/// Fresh lobby with its creator seated as `P1` and host.
#[must_use]
pub fn create_lobby() -> GameState {
    let host = next_player(0);
    GameState {
        host_id: Some(host.id.clone()),
        players: vec![host],
        ..GameState::default()
    }
}

/// Seat the next player. Ids and names follow join order.
///
/// # Errors
///
/// Returns [`GameError::AlreadyStarted`] once the game is under way.
pub fn join_lobby(state: &mut GameState) -> Result<Player, GameError> {
    ensure_lobby(state)?;
    let player = next_player(state.players.len());
    info!("{} joined the lobby", player.id);
    state.players.push(player.clone());
    Ok(player)
}

/// Replace the role configuration. Only the host may do this.
///
/// The configuration is not validated until the game starts, since the
/// roster can still grow.
///
/// # Errors
///
/// Returns [`GameError::AlreadyStarted`] after the game starts and
/// [`GameError::NotHost`] for anyone but the host.
pub fn configure(
    state: &mut GameState,
    player_id: &str,
    config: GameConfig,
) -> Result<(), GameError> {
    ensure_lobby(state)?;
    ensure_host(state, player_id)?;
    state.game_config = config;
    Ok(())
}

pub(crate) fn ensure_host(state: &GameState, player_id: &str) -> Result<(), GameError> {
    if state.is_host(player_id) {
        Ok(())
    } else {
        Err(GameError::NotHost {
            player: player_id.to_string(),
        })
    }
}

fn ensure_lobby(state: &GameState) -> Result<(), GameError> {
    match state.status {
        GameStatus::Lobby => Ok(()),
        GameStatus::InGame => Err(GameError::AlreadyStarted),
    }
}

fn next_player(seated: usize) -> Player {
    let number = seated + 1;
    Player::new(format!("P{number}"), format!("Player {number}"))
}
