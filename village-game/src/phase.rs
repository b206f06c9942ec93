//! Night and day resolution.
//!
//! The two phases break ties differently: a night kill always
//! lands on one of the tied targets at random, while a tied day vote stalls
//! and nobody is banished.
use log::{debug, info};
use rand::Rng;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};

use crate::errors::GameError;
use crate::state::{EliminationReason, EliminationRecord, GameState, GameStatus, Phase, Role};
use crate::tally::{TargetSet, tally};
use crate::win::evaluate;

pub const LOG_NIGHT_INDECISIVE: &str = "The Beasts were indecisive and no one was eliminated.";
pub const LOG_DAY_NO_CONSENSUS: &str =
    "The village could not reach a consensus. No one was banished.";

/// What a resolved phase did to the village.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PhaseOutcome {
    /// No votes were cast; nobody died.
    NoVotes,
    /// Night kill. The role is recorded in the graveyard but not narrated.
    Eliminated { id: String, role: Role },
    /// Day banishment with the role revealed.
    Banished { id: String, role: Role },
    /// Day vote tied at the top; nobody died.
    Tied { targets: TargetSet },
}

impl PhaseOutcome {
    /// Id of the person who died, if anyone did.
    #[must_use]
    pub fn casualty(&self) -> Option<&str> {
        match self {
            Self::Eliminated { id, .. } | Self::Banished { id, .. } => Some(id.as_str()),
            Self::NoVotes | Self::Tied { .. } => None,
        }
    }
}

/// Resolve the night vote, then move to the day of the same round.
///
/// # Errors
///
/// Returns [`GameError::NotInGame`] before the game starts and
/// [`GameError::InvalidVoteTarget`] when a vote names someone outside the
/// game. The state is untouched on error.
pub fn process_night<R: Rng + ?Sized>(
    state: &mut GameState,
    rng: &mut R,
) -> Result<PhaseOutcome, GameError> {
    ensure_resolvable(state)?;

    let outcome = if state.votes.is_empty() {
        state.narrate(LOG_NIGHT_INDECISIVE);
        PhaseOutcome::NoVotes
    } else {
        let result = tally(&state.votes)?;
        debug!(
            "night {} tally: {:?} with {} votes",
            state.current_round, result.targets, result.max_count
        );
        let target = result
            .targets
            .as_slice()
            .choose(rng)
            .cloned()
            .ok_or(GameError::EmptyVotes)?;
        let role = eliminate(state, &target, EliminationReason::Eliminated)?;
        state.narrate(format!(
            "Dawn breaks. The village discovers that **{target}** has been eliminated!"
        ));
        info!(
            "night {}: {target} ({role}) eliminated",
            state.current_round
        );
        PhaseOutcome::Eliminated { id: target, role }
    };

    state.phase = Phase::Day;
    state.votes.clear();
    evaluate(state);
    Ok(outcome)
}

/// Resolve the day vote, then move to the night of the next round.
///
/// # Errors
///
/// Returns [`GameError::NotInGame`] before the game starts and
/// [`GameError::InvalidVoteTarget`] when a vote names someone outside the
/// game. The state is untouched on error.
pub fn process_day(state: &mut GameState) -> Result<PhaseOutcome, GameError> {
    ensure_resolvable(state)?;

    let outcome = if state.votes.is_empty() {
        state.narrate(LOG_DAY_NO_CONSENSUS);
        PhaseOutcome::NoVotes
    } else {
        let result = tally(&state.votes)?;
        debug!(
            "day {} tally: {:?} with {} votes",
            state.current_round, result.targets, result.max_count
        );
        if let Some(leader) = result.leader() {
            let target = leader.to_string();
            let role = eliminate(state, &target, EliminationReason::Banished)?;
            state.narrate(format!(
                "The village has spoken. **{target}** has been banished, revealing they were a **{role}**!"
            ));
            info!("day {}: {target} ({role}) banished", state.current_round);
            PhaseOutcome::Banished { id: target, role }
        } else {
            state.narrate(format!(
                "The vote was tied between {}. No one is banished.",
                result.targets.join(", ")
            ));
            info!(
                "day {}: tie between {}",
                state.current_round,
                result.targets.join(", ")
            );
            PhaseOutcome::Tied {
                targets: result.targets,
            }
        }
    };

    state.phase = Phase::Night;
    state.current_round = state.current_round.saturating_add(1);
    state.votes.clear();
    evaluate(state);
    Ok(outcome)
}

/// Voter eligibility is trusted; unknown targets are not.
fn ensure_resolvable(state: &GameState) -> Result<(), GameError> {
    if state.status != GameStatus::InGame {
        return Err(GameError::NotInGame);
    }
    if let Some((voter, target)) = state
        .votes
        .iter()
        .find(|(_, target)| state.person(target).is_none())
    {
        return Err(GameError::InvalidVoteTarget {
            voter: voter.clone(),
            target: target.clone(),
        });
    }
    Ok(())
}

fn eliminate(
    state: &mut GameState,
    id: &str,
    reason: EliminationReason,
) -> Result<Role, GameError> {
    let round = state.current_round;
    let person = state
        .person_mut(id)
        .ok_or_else(|| GameError::UnknownPerson { id: id.to_string() })?;
    person.alive = false;
    let role = person.role;
    state.graveyard.push(EliminationRecord {
        id: id.to_string(),
        role,
        reason,
        round,
    });
    Ok(role)
}
