use thiserror::Error;

use crate::config::ConfigError;
use crate::state::Phase;

/// Errors raised by game operations. Ties, empty vote rounds and instant wins
/// are outcomes, not errors.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum GameError {
    #[error("cannot tally an empty vote set")]
    EmptyVotes,
    #[error("{voter} voted for {target}, who is not in this game")]
    InvalidVoteTarget { voter: String, target: String },
    #[error("{id} is not in this game")]
    UnknownPerson { id: String },
    #[error("{voter} is not in this game")]
    UnknownVoter { voter: String },
    #[error("{voter} may not vote during the {phase}")]
    IneligibleVoter { voter: String, phase: Phase },
    #[error("{voter} may not vote for {target} during the {phase}")]
    IneligibleTarget {
        voter: String,
        target: String,
        phase: Phase,
    },
    #[error("the game has not started")]
    NotInGame,
    #[error("the game is already over")]
    GameOver,
    #[error("the game has already started")]
    AlreadyStarted,
    #[error("only the host can do that ({player} is not the host)")]
    NotHost { player: String },
    #[error("room {room_id} not found")]
    RoomNotFound { room_id: String },
    #[error(transparent)]
    Config(#[from] ConfigError),
}
