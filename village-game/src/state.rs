use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use crate::config::GameConfig;

/// Votes cast during the current phase, keyed by voter id.
pub type Votes = BTreeMap<String, String>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Role {
    Beast,
    Hunter,
    Villager,
}

impl Role {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Beast => "Beast",
            Self::Hunter => "Hunter",
            Self::Villager => "Villager",
        }
    }

    /// Beasts form one team; every other role plays for the village.
    #[must_use]
    pub const fn is_beast(self) -> bool {
        matches!(self, Self::Beast)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Beast" => Ok(Self::Beast),
            "Hunter" => Ok(Self::Hunter),
            "Villager" => Ok(Self::Villager),
            _ => Err(()),
        }
    }
}

/// Lobby member. Immutable once joined.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
    pub id: String,
    pub name: String,
}

impl Player {
    #[must_use]
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }
}

/// In-game participant created from a [`Player`] at game start.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Person {
    pub id: String,
    pub role: Role,
    pub alive: bool,
}

impl Person {
    #[must_use]
    pub fn new(id: impl Into<String>, role: Role) -> Self {
        Self {
            id: id.into(),
            role,
            alive: true,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum GameStatus {
    #[default]
    Lobby,
    InGame,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    #[default]
    Night,
    Day,
}

impl Phase {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Night => "night",
            Self::Day => "day",
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Terminal result of a game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Winner {
    Villagers,
    Beasts,
}

impl Winner {
    #[must_use]
    pub const fn headline(self) -> &'static str {
        match self {
            Self::Villagers => "Villagers Win! 🎉",
            Self::Beasts => "Beasts Win! 🐺",
        }
    }
}

impl fmt::Display for Winner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.headline())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EliminationReason {
    /// Killed by the Beasts during the night.
    Eliminated,
    /// Voted out by the village during the day.
    Banished,
}

impl EliminationReason {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Eliminated => "Eliminated",
            Self::Banished => "Banished",
        }
    }

    #[must_use]
    pub const fn phase(self) -> Phase {
        match self {
            Self::Eliminated => Phase::Night,
            Self::Banished => Phase::Day,
        }
    }
}

/// Graveyard entry. Appended once per death, never edited.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EliminationRecord {
    pub id: String,
    pub role: Role,
    pub reason: EliminationReason,
    pub round: u32,
}

impl fmt::Display for EliminationRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let phase_label = match self.reason.phase() {
            Phase::Night => "Night",
            Phase::Day => "Day",
        };
        write!(
            f,
            "**{}** ({}) - {} in {} {}",
            self.id,
            self.role,
            self.reason.as_str(),
            phase_label,
            self.round
        )
    }
}

/// Aggregate root persisted per room.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameState {
    pub status: GameStatus,
    pub phase: Phase,
    pub current_round: u32,
    /// Replay seed for every random draw made on behalf of this room.
    pub seed: u64,
    pub players: Vec<Player>,
    pub host_id: Option<String>,
    pub game_config: GameConfig,
    pub people: Vec<Person>,
    pub votes: Votes,
    pub round_results: Vec<String>,
    pub graveyard: Vec<EliminationRecord>,
    pub winner: Option<Winner>,
}

impl Default for GameState {
    fn default() -> Self {
        Self {
            status: GameStatus::Lobby,
            phase: Phase::Night,
            current_round: 1,
            seed: 0,
            players: Vec::new(),
            host_id: None,
            game_config: GameConfig::default(),
            people: Vec::new(),
            votes: Votes::new(),
            round_results: Vec::new(),
            graveyard: Vec::new(),
            winner: None,
        }
    }
}

impl GameState {
    /// Build a running game directly from a role list, ids `P1..Pn` in order.
    #[must_use]
    pub fn with_roles(roles: &[Role]) -> Self {
        let people: Vec<Person> = roles
            .iter()
            .enumerate()
            .map(|(idx, role)| Person::new(format!("P{}", idx + 1), *role))
            .collect();
        let players = people
            .iter()
            .enumerate()
            .map(|(idx, person)| Player::new(person.id.clone(), format!("Player {}", idx + 1)))
            .collect();
        Self {
            status: GameStatus::InGame,
            host_id: Some("P1".to_string()),
            players,
            people,
            ..Self::default()
        }
    }

    /// True while the game has started and no winner has been declared.
    #[must_use]
    pub fn is_running(&self) -> bool {
        self.status == GameStatus::InGame && self.winner.is_none()
    }

    #[must_use]
    pub fn is_over(&self) -> bool {
        self.status == GameStatus::InGame && self.winner.is_some()
    }

    #[must_use]
    pub fn person(&self, id: &str) -> Option<&Person> {
        self.people.iter().find(|p| p.id == id)
    }

    pub fn person_mut(&mut self, id: &str) -> Option<&mut Person> {
        self.people.iter_mut().find(|p| p.id == id)
    }

    pub fn living(&self) -> impl Iterator<Item = &Person> {
        self.people.iter().filter(|p| p.alive)
    }

    #[must_use]
    pub fn living_beasts(&self) -> usize {
        self.living().filter(|p| p.role.is_beast()).count()
    }

    #[must_use]
    pub fn living_others(&self) -> usize {
        self.living().filter(|p| !p.role.is_beast()).count()
    }

    #[must_use]
    pub fn is_host(&self, player_id: &str) -> bool {
        self.host_id.as_deref() == Some(player_id)
    }

    /// Most recent narrative line, if any.
    #[must_use]
    pub fn latest_result(&self) -> Option<&str> {
        self.round_results.last().map(String::as_str)
    }

    pub(crate) fn narrate(&mut self, line: impl Into<String>) {
        self.round_results.push(line.into());
    }
}
