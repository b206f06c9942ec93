use std::fmt;

use rand::SeedableRng;
use rand::seq::SliceRandom;
use rand_chacha::ChaCha20Rng;
use serde::{Deserialize, Serialize};

/// Policy interface for automated voters.
pub trait VoterPolicy {
    /// Name used for logging/debug output.
    fn name(&self) -> &'static str;

    /// Pick one of the ids the current voter may vote for, or abstain.
    fn pick_target(&mut self, targets: &[&str]) -> Option<String>;
}

/// Built-in voting strategies for automated games.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum VotingStrategy {
    Random,
    Focused,
    Split,
}

impl VotingStrategy {
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Random => "Random",
            Self::Focused => "Focused",
            Self::Split => "Split",
        }
    }

    #[must_use]
    pub fn create_policy(self, seed: u64) -> Box<dyn VoterPolicy + Send> {
        match self {
            Self::Random => Box::new(RandomPolicy {
                rng: ChaCha20Rng::seed_from_u64(seed),
            }),
            Self::Focused => Box::new(FocusedPolicy),
            Self::Split => Box::new(SplitPolicy::default()),
        }
    }
}

impl fmt::Display for VotingStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

struct RandomPolicy {
    rng: ChaCha20Rng,
}

/// Everyone piles onto the first eligible seat.
struct FocusedPolicy;

/// Alternates between the two first eligible seats to provoke ties.
#[derive(Default)]
struct SplitPolicy {
    ballots: usize,
}

impl VoterPolicy for RandomPolicy {
    fn name(&self) -> &'static str {
        "Random"
    }

    fn pick_target(&mut self, targets: &[&str]) -> Option<String> {
        targets.choose(&mut self.rng).map(|t| (*t).to_string())
    }
}

impl VoterPolicy for FocusedPolicy {
    fn name(&self) -> &'static str {
        "Focused"
    }

    fn pick_target(&mut self, targets: &[&str]) -> Option<String> {
        targets.first().map(|t| (*t).to_string())
    }
}

impl VoterPolicy for SplitPolicy {
    fn name(&self) -> &'static str {
        "Split"
    }

    fn pick_target(&mut self, targets: &[&str]) -> Option<String> {
        if targets.is_empty() {
            return None;
        }
        let idx = self.ballots % targets.len().min(2);
        self.ballots = self.ballots.wrapping_add(1);
        Some(targets[idx].to_string())
    }
}
