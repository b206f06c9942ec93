use anyhow::{Context, Result};
use log::debug;
use std::sync::Arc;
use village_game::{
    GameConfig, GameSession, GameState, LobbyRules, Phase, PhaseOutcome, eligible_targets,
    eligible_voters,
};

use crate::logic::policy::{VoterPolicy, VotingStrategy};

pub const DEFAULT_MAX_ROUNDS: u32 = 50;

/// Declarative plan for running a simulated game.
#[derive(Debug, Clone)]
pub struct SimulationPlan {
    pub players: usize,
    pub config: GameConfig,
    pub strategy: VotingStrategy,
    pub max_rounds: Option<u32>,
    pub expectations: Vec<SimulationExpectation>,
}

impl SimulationPlan {
    #[must_use]
    pub fn new(players: usize, config: GameConfig, strategy: VotingStrategy) -> Self {
        Self {
            players,
            config,
            strategy,
            max_rounds: None,
            expectations: Vec::new(),
        }
    }

    #[must_use]
    pub const fn with_max_rounds(mut self, max_rounds: u32) -> Self {
        self.max_rounds = Some(max_rounds);
        self
    }

    /// Reseat the table, trimming the Beast count to what the new size allows.
    #[must_use]
    pub fn with_players(mut self, players: usize) -> Self {
        self.players = players;
        self.config.num_beasts = self.config.num_beasts.min(LobbyRules::max_beasts(players));
        self
    }

    #[must_use]
    pub fn with_expectation(mut self, expectation: impl Into<SimulationExpectation>) -> Self {
        self.expectations.push(expectation.into());
        self
    }
}

/// Assertion hook run after a simulation completes.
type SimulationExpectationFn =
    Arc<dyn Fn(&SimulationSummary) -> Result<()> + Send + Sync + 'static>;

#[derive(Clone)]
pub struct SimulationExpectation(SimulationExpectationFn);

impl std::fmt::Debug for SimulationExpectation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SimulationExpectation").finish()
    }
}

impl SimulationExpectation {
    /// Run the expectation against a finished simulation.
    ///
    /// # Errors
    ///
    /// Returns the expectation's failure.
    pub fn evaluate(&self, summary: &SimulationSummary) -> Result<()> {
        (self.0)(summary)
    }
}

impl<F> From<F> for SimulationExpectation
where
    F: Fn(&SimulationSummary) -> Result<()> + Send + Sync + 'static,
{
    fn from(f: F) -> Self {
        Self(Arc::new(f))
    }
}

/// One resolved phase.
#[derive(Debug, Clone)]
pub struct PhaseRecord {
    pub round: u32,
    pub phase: Phase,
    pub ballots: usize,
    pub outcome: PhaseOutcome,
    pub living_after: usize,
    pub graveyard_len: usize,
}

/// Complete record of a simulated game.
#[derive(Debug, Clone)]
pub struct SimulationSummary {
    pub seed: u64,
    pub strategy: VotingStrategy,
    pub players: usize,
    pub phases: Vec<PhaseRecord>,
    pub final_state: GameState,
    pub game_ended: bool,
}

impl SimulationSummary {
    #[must_use]
    pub fn ending_message(&self) -> String {
        self.final_state.winner.map_or_else(
            || format!("stalled after {} phases", self.phases.len()),
            |winner| winner.headline().to_string(),
        )
    }
}

/// Headless deterministic runner for the rules engine.
#[derive(Debug, Clone, Copy)]
pub struct GameTester {
    verbose: bool,
}

impl GameTester {
    #[must_use]
    pub const fn new(verbose: bool) -> Self {
        Self { verbose }
    }

    /// Play a full game under `plan`, stopping at a winner or the round cap.
    ///
    /// # Errors
    ///
    /// Returns an error when the engine rejects the setup or a vote.
    pub fn run_plan(&self, plan: &SimulationPlan, seed: u64) -> Result<SimulationSummary> {
        let max_rounds = plan.max_rounds.unwrap_or(DEFAULT_MAX_ROUNDS);
        let mut session = GameSession::lobby(seed, plan.players, plan.config)?;
        session
            .start()
            .with_context(|| format!("starting a {}-player game", plan.players))?;

        if self.verbose {
            println!(
                "🎮 Starting simulation | seed:{seed} players:{} beasts:{} hunter:{} policy:{}",
                plan.players,
                plan.config.num_beasts,
                plan.config.include_hunter,
                plan.strategy.label()
            );
        }

        let mut policy = plan.strategy.create_policy(seed);
        let mut phases = Vec::new();
        while session.state().is_running() && session.state().current_round <= max_rounds {
            let record = play_phase(&mut session, policy.as_mut())?;
            if self.verbose {
                log_phase(&record, session.state());
            }
            phases.push(record);
        }

        let final_state = session.into_state();
        Ok(SimulationSummary {
            seed,
            strategy: plan.strategy,
            players: plan.players,
            phases,
            game_ended: final_state.winner.is_some(),
            final_state,
        })
    }
}

fn play_phase(session: &mut GameSession, policy: &mut dyn VoterPolicy) -> Result<PhaseRecord> {
    let state = session.state();
    let round = state.current_round;
    let phase = state.phase;
    let ballots: Vec<(String, String)> = eligible_voters(state)
        .into_iter()
        .filter_map(|voter| {
            let targets = eligible_targets(state, voter);
            let target = policy.pick_target(&targets)?;
            Some((voter.to_string(), target))
        })
        .collect();
    debug!(
        "{phase} {round}: {} ballots from {}",
        ballots.len(),
        policy.name()
    );

    let mut outcome = None;
    for (voter, target) in &ballots {
        if let Some(resolved) = session
            .vote(voter, target)
            .with_context(|| format!("{voter} voting for {target} in {phase} {round}"))?
        {
            outcome = Some(resolved);
        }
    }
    let outcome = match outcome {
        Some(outcome) => outcome,
        None => session.resolve()?,
    };

    let state = session.state();
    Ok(PhaseRecord {
        round,
        phase,
        ballots: ballots.len(),
        outcome,
        living_after: state.living().count(),
        graveyard_len: state.graveyard.len(),
    })
}

fn log_phase(record: &PhaseRecord, state: &GameState) {
    let detail = match &record.outcome {
        PhaseOutcome::NoVotes => "no votes".to_string(),
        PhaseOutcome::Eliminated { id, role } => format!("{id} ({role}) eliminated"),
        PhaseOutcome::Banished { id, role } => format!("{id} ({role}) banished"),
        PhaseOutcome::Tied { targets } => format!("tie between {}", targets.join(", ")),
    };
    println!(
        "  🌗 {} {} | ballots:{} | {detail} | alive:{} beasts:{}",
        record.phase,
        record.round,
        record.ballots,
        state.living().count(),
        state.living_beasts()
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn focused_games_finish_with_a_winner() {
        let plan = SimulationPlan::new(5, GameConfig::default(), VotingStrategy::Focused);
        let summary = GameTester::new(false).run_plan(&plan, 7).unwrap();
        assert!(summary.game_ended);
        assert_eq!(summary.final_state.people.len(), 5);
        assert!(!summary.phases.is_empty());
        assert_eq!(
            summary.phases.last().map(|p| p.graveyard_len),
            Some(summary.final_state.graveyard.len())
        );
        assert!(summary.ending_message().contains("Win!"));
    }

    #[test]
    fn runs_are_deterministic_per_seed() {
        let plan = SimulationPlan::new(8, GameConfig::new(2, true), VotingStrategy::Random);
        let tester = GameTester::new(false);
        let first = tester.run_plan(&plan, 31).unwrap();
        let second = tester.run_plan(&plan, 31).unwrap();
        assert_eq!(first.final_state, second.final_state);
        assert_eq!(first.phases.len(), second.phases.len());
    }

    #[test]
    fn round_cap_halts_the_game() {
        let plan = SimulationPlan::new(9, GameConfig::new(1, true), VotingStrategy::Split)
            .with_max_rounds(0);
        let summary = GameTester::new(false).run_plan(&plan, 3).unwrap();
        assert!(summary.phases.is_empty());
        assert!(!summary.game_ended);
        assert_eq!(summary.ending_message(), "stalled after 0 phases");

        let one_round = SimulationPlan::new(9, GameConfig::new(1, true), VotingStrategy::Split)
            .with_max_rounds(1);
        let summary = GameTester::new(false).run_plan(&one_round, 3).unwrap();
        assert!(summary.phases.len() <= 2);
        assert!(summary.phases.iter().all(|p| p.round == 1));
    }

    #[test]
    fn reseating_trims_beasts() {
        let config = GameConfig::new(4, true);
        let plan = SimulationPlan::new(9, config, VotingStrategy::Focused).with_players(4);
        assert_eq!(plan.players, 4);
        assert_eq!(plan.config.num_beasts, 1);
    }

    #[test]
    fn undersized_tables_are_rejected() {
        let plan = SimulationPlan::new(2, GameConfig::default(), VotingStrategy::Focused);
        assert!(GameTester::new(false).run_plan(&plan, 1).is_err());
    }
}
