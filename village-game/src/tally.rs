//! Plurality vote counting. Tie policy lives with each phase, not here.
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use std::collections::BTreeMap;

use crate::errors::GameError;
use crate::state::Votes;

/// Targets sharing the top count, stored inline for the common one-or-two case.
pub type TargetSet = SmallVec<[String; 2]>;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoteTally {
    /// Ids receiving `max_count` votes, in ascending id order.
    pub targets: TargetSet,
    pub max_count: usize,
}

impl VoteTally {
    #[must_use]
    pub fn is_tie(&self) -> bool {
        self.targets.len() > 1
    }

    /// The single leading target, or `None` on a tie.
    #[must_use]
    pub fn leader(&self) -> Option<&str> {
        match self.targets.as_slice() {
            [only] => Some(only.as_str()),
            _ => None,
        }
    }
}

/// Count votes per target and keep every target tied for the maximum.
///
/// # Errors
///
/// Returns [`GameError::EmptyVotes`] when no votes were cast.
pub fn tally(votes: &Votes) -> Result<VoteTally, GameError> {
    let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
    for target in votes.values() {
        *counts.entry(target.as_str()).or_default() += 1;
    }
    let Some(max_count) = counts.values().copied().max() else {
        return Err(GameError::EmptyVotes);
    };
    let targets = counts
        .into_iter()
        .filter(|(_, count)| *count == max_count)
        .map(|(target, _)| target.to_string())
        .collect();
    Ok(VoteTally { targets, max_count })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn votes(pairs: &[(&str, &str)]) -> Votes {
        pairs
            .iter()
            .map(|(voter, target)| ((*voter).to_string(), (*target).to_string()))
            .collect()
    }

    #[test]
    fn empty_votes_are_rejected() {
        assert_eq!(tally(&Votes::new()), Err(GameError::EmptyVotes));
    }

    #[test]
    fn clear_plurality_has_one_leader() {
        let result = tally(&votes(&[("P1", "P3"), ("P2", "P3"), ("P3", "P1")])).unwrap();
        assert_eq!(result.leader(), Some("P3"));
        assert_eq!(result.max_count, 2);
        assert!(!result.is_tie());
    }

    #[test]
    fn ties_keep_every_leading_target_sorted() {
        let result = tally(&votes(&[
            ("P1", "P4"),
            ("P2", "P2"),
            ("P3", "P4"),
            ("P4", "P2"),
            ("P5", "P1"),
        ]))
        .unwrap();
        assert!(result.is_tie());
        assert_eq!(result.leader(), None);
        assert_eq!(result.targets.as_slice(), ["P2", "P4"]);
        assert_eq!(result.max_count, 2);
    }

    #[test]
    fn all_distinct_votes_tie_at_one() {
        let result = tally(&votes(&[("P1", "P2"), ("P2", "P3"), ("P3", "P1")])).unwrap();
        assert_eq!(result.targets.len(), 3);
        assert_eq!(result.max_count, 1);
    }
}
