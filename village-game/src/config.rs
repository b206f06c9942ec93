//! Role-count configuration chosen by the host before the game starts.
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised when a role configuration cannot be dealt to the lobby.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("at least {min} players are required to start (got {actual})")]
    NotEnoughPlayers { min: usize, actual: usize },
    #[error("a game needs at least one Beast")]
    NoBeasts,
    #[error("at most {max} Beasts are allowed for this lobby (requested {requested})")]
    TooManyBeasts { max: usize, requested: usize },
    #[error("{roles} special roles do not fit {players} players")]
    RolesExceedPlayers { roles: usize, players: usize },
}

/// Lobby-level bounds applied before a configuration is accepted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LobbyRules {
    #[serde(default = "LobbyRules::default_min_players")]
    pub min_players: usize,
}

impl LobbyRules {
    const fn default_min_players() -> usize {
        3
    }

    /// Largest Beast count the host may pick. Beasts always start outnumbered.
    #[must_use]
    pub const fn max_beasts(player_count: usize) -> usize {
        let max = player_count.saturating_sub(1) / 2;
        if max < 1 { 1 } else { max }
    }
}

impl Default for LobbyRules {
    fn default() -> Self {
        Self {
            min_players: Self::default_min_players(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameConfig {
    #[serde(default = "GameConfig::default_num_beasts")]
    pub num_beasts: usize,
    #[serde(default = "GameConfig::default_include_hunter")]
    pub include_hunter: bool,
}

impl GameConfig {
    const fn default_num_beasts() -> usize {
        1
    }

    const fn default_include_hunter() -> bool {
        true
    }

    #[must_use]
    pub const fn new(num_beasts: usize, include_hunter: bool) -> Self {
        Self {
            num_beasts,
            include_hunter,
        }
    }

    /// Number of non-Villager roles in the deck.
    #[must_use]
    pub const fn special_roles(&self) -> usize {
        self.num_beasts + if self.include_hunter { 1 } else { 0 }
    }

    /// Validate against the default lobby rules.
    ///
    /// # Errors
    ///
    /// Returns the first bound the configuration violates.
    pub fn validate(&self, player_count: usize) -> Result<(), ConfigError> {
        self.validate_with(&LobbyRules::default(), player_count)
    }

    /// Validate against explicit lobby rules.
    ///
    /// # Errors
    ///
    /// Returns the first bound the configuration violates.
    pub fn validate_with(
        &self,
        rules: &LobbyRules,
        player_count: usize,
    ) -> Result<(), ConfigError> {
        if player_count < rules.min_players {
            return Err(ConfigError::NotEnoughPlayers {
                min: rules.min_players,
                actual: player_count,
            });
        }
        if self.num_beasts == 0 {
            return Err(ConfigError::NoBeasts);
        }
        let max = LobbyRules::max_beasts(player_count);
        if self.num_beasts > max {
            return Err(ConfigError::TooManyBeasts {
                max,
                requested: self.num_beasts,
            });
        }
        if self.special_roles() > player_count {
            return Err(ConfigError::RolesExceedPlayers {
                roles: self.special_roles(),
                players: player_count,
            });
        }
        Ok(())
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            num_beasts: Self::default_num_beasts(),
            include_hunter: Self::default_include_hunter(),
        }
    }
}
