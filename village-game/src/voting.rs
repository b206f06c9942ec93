//! Who may vote, for whom, and when a phase is ready to resolve.
use log::{debug, warn};

use crate::errors::GameError;
use crate::state::{GameState, Person, Phase};

/// Ids allowed to vote in the current phase, in seating order.
///
/// Living Beasts vote at night; everyone alive votes during the day.
#[must_use]
pub fn eligible_voters(state: &GameState) -> Vec<&str> {
    state
        .living()
        .filter(|p| can_vote(state.phase, p))
        .map(|p| p.id.as_str())
        .collect()
}

/// Ids `voter` may target in the current phase, in seating order.
///
/// Beasts pick among living non-Beasts at night. By day anyone alive other
/// than the voter can be named.
#[must_use]
pub fn eligible_targets<'a>(state: &'a GameState, voter: &str) -> Vec<&'a str> {
    state
        .living()
        .filter(|p| can_be_targeted(state.phase, voter, p))
        .map(|p| p.id.as_str())
        .collect()
}

/// Eligible voters who have not voted yet.
#[must_use]
pub fn pending_voters(state: &GameState) -> Vec<&str> {
    eligible_voters(state)
        .into_iter()
        .filter(|id| !state.votes.contains_key(*id))
        .collect()
}

/// True once every eligible voter has a vote on record.
#[must_use]
pub fn voting_complete(state: &GameState) -> bool {
    let pending = pending_voters(state);
    debug!(
        "{} {}: {} voter(s) pending",
        state.phase,
        state.current_round,
        pending.len()
    );
    pending.is_empty()
}

/// Record `voter`'s choice, replacing any earlier vote this phase.
///
/// # Errors
///
/// Fails when the game is not running, or when either id is unknown or not
/// eligible for the current phase.
pub fn cast_vote(state: &mut GameState, voter: &str, target: &str) -> Result<(), GameError> {
    if !state.is_running() {
        return Err(if state.is_over() {
            GameError::GameOver
        } else {
            GameError::NotInGame
        });
    }
    let phase = state.phase;
    let Some(person) = state.person(voter) else {
        return Err(GameError::UnknownVoter {
            voter: voter.to_string(),
        });
    };
    if !person.alive || !can_vote(phase, person) {
        warn!("rejected {phase} vote from ineligible voter {voter}");
        return Err(GameError::IneligibleVoter {
            voter: voter.to_string(),
            phase,
        });
    }
    let Some(chosen) = state.person(target) else {
        return Err(GameError::InvalidVoteTarget {
            voter: voter.to_string(),
            target: target.to_string(),
        });
    };
    if !chosen.alive || !can_be_targeted(phase, voter, chosen) {
        warn!("rejected {phase} vote from {voter} for ineligible target {target}");
        return Err(GameError::IneligibleTarget {
            voter: voter.to_string(),
            target: target.to_string(),
            phase,
        });
    }

    state.votes.insert(voter.to_string(), target.to_string());
    Ok(())
}

const fn can_vote(phase: Phase, person: &Person) -> bool {
    match phase {
        Phase::Night => person.role.is_beast(),
        Phase::Day => true,
    }
}

fn can_be_targeted(phase: Phase, voter: &str, person: &Person) -> bool {
    match phase {
        Phase::Night => !person.role.is_beast(),
        Phase::Day => person.id != voter,
    }
}
