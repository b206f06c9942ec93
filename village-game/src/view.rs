//! What one participant is allowed to see of the game.
use serde::{Deserialize, Serialize};

use crate::errors::GameError;
use crate::state::{GameState, GameStatus, Person, Phase, Role, Winner};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerView {
    pub player_id: String,
    pub role: Role,
    pub alive: bool,
    /// Dead players and everyone after the game ends watch with roles revealed.
    pub spectator: bool,
    pub phase: Phase,
    pub round: u32,
    /// Every living Beast, the viewer included; empty unless the viewer is a Beast.
    pub fellow_beasts: Vec<String>,
    pub alive_ids: Vec<String>,
    /// Full role table, populated for spectators only.
    pub revealed: Vec<Person>,
    pub latest_result: Option<String>,
    pub winner: Option<Winner>,
}

impl PlayerView {
    /// Project `state` for `player_id`.
    ///
    /// # Errors
    ///
    /// Returns [`GameError::NotInGame`] before the game starts and
    /// [`GameError::UnknownPerson`] for ids outside the game.
    pub fn for_player(state: &GameState, player_id: &str) -> Result<Self, GameError> {
        if state.status != GameStatus::InGame {
            return Err(GameError::NotInGame);
        }
        let me = state
            .person(player_id)
            .ok_or_else(|| GameError::UnknownPerson {
                id: player_id.to_string(),
            })?;

        let spectator = !me.alive || state.is_over();
        let fellow_beasts = if me.role.is_beast() {
            state
                .living()
                .filter(|p| p.role.is_beast())
                .map(|p| p.id.clone())
                .collect()
        } else {
            Vec::new()
        };
        let revealed = if spectator {
            state.people.clone()
        } else {
            Vec::new()
        };

        Ok(Self {
            player_id: me.id.clone(),
            role: me.role,
            alive: me.alive,
            spectator,
            phase: state.phase,
            round: state.current_round,
            fellow_beasts,
            alive_ids: state.living().map(|p| p.id.clone()).collect(),
            revealed,
            latest_result: state.latest_result().map(str::to_string),
            winner: state.winner,
        })
    }
}
