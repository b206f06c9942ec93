use anyhow::{Result, ensure};
use village_game::{GameConfig, Phase, PhaseOutcome, Role, check_winner};

use crate::logic::{SimulationPlan, SimulationSummary, VotingStrategy};

pub fn smoke_plan() -> SimulationPlan {
    SimulationPlan::new(5, GameConfig::default(), VotingStrategy::Focused)
        .with_expectation(table_invariants)
        .with_expectation(terminates)
}

pub fn full_game_plan() -> SimulationPlan {
    SimulationPlan::new(7, GameConfig::new(2, true), VotingStrategy::Random)
        .with_expectation(table_invariants)
        .with_expectation(terminates)
        .with_expectation(nights_claim_someone)
}

pub fn tie_stall_plan() -> SimulationPlan {
    SimulationPlan::new(6, GameConfig::new(1, false), VotingStrategy::Split)
        .with_expectation(table_invariants)
        .with_expectation(ties_spare_everyone)
}

pub fn hunter_table_plan() -> SimulationPlan {
    SimulationPlan::new(5, GameConfig::new(1, true), VotingStrategy::Random)
        .with_expectation(table_invariants)
        .with_expectation(terminates)
        .with_expectation(hunter_is_ordinary)
}

/// Seating, graveyard and winner stay consistent with the living population.
fn table_invariants(summary: &SimulationSummary) -> Result<()> {
    let state = &summary.final_state;
    ensure!(
        state.people.len() == summary.players,
        "expected {} people, found {}",
        summary.players,
        state.people.len()
    );

    let dead = state.people.iter().filter(|p| !p.alive).count();
    ensure!(
        state.graveyard.len() == dead,
        "graveyard has {} entries for {dead} dead",
        state.graveyard.len()
    );

    let mut previous = 0;
    for record in &summary.phases {
        ensure!(
            record.graveyard_len == previous || record.graveyard_len == previous + 1,
            "{} {} moved the graveyard from {previous} to {}",
            record.phase,
            record.round,
            record.graveyard_len
        );
        ensure!(
            record.living_after + record.graveyard_len == summary.players,
            "{} {} lost track of the living",
            record.phase,
            record.round
        );
        previous = record.graveyard_len;
    }

    ensure!(
        state.winner == check_winner(&state.people),
        "winner {:?} disagrees with the living population",
        state.winner
    );
    Ok(())
}

fn terminates(summary: &SimulationSummary) -> Result<()> {
    ensure!(
        summary.game_ended,
        "no winner after {} phases",
        summary.phases.len()
    );
    Ok(())
}

/// Beasts always vote, so every night ends with a body.
fn nights_claim_someone(summary: &SimulationSummary) -> Result<()> {
    for record in summary.phases.iter().filter(|r| r.phase == Phase::Night) {
        ensure!(
            matches!(record.outcome, PhaseOutcome::Eliminated { .. }),
            "night {} ended with {:?}",
            record.round,
            record.outcome
        );
    }
    Ok(())
}

fn ties_spare_everyone(summary: &SimulationSummary) -> Result<()> {
    let mut previous = 0;
    for record in &summary.phases {
        if let PhaseOutcome::Tied { targets } = &record.outcome {
            ensure!(record.phase == Phase::Day, "tie outside the day");
            ensure!(targets.len() >= 2, "tie with {} targets", targets.len());
            ensure!(
                record.graveyard_len == previous,
                "tied day {} still claimed someone",
                record.round
            );
        }
        previous = record.graveyard_len;
    }
    Ok(())
}

fn hunter_is_ordinary(summary: &SimulationSummary) -> Result<()> {
    let state = &summary.final_state;
    let hunters = state
        .people
        .iter()
        .filter(|p| p.role == Role::Hunter)
        .count();
    ensure!(hunters == 1, "expected one Hunter, found {hunters}");
    let graves = state
        .graveyard
        .iter()
        .filter(|r| r.role == Role::Hunter)
        .count();
    ensure!(graves <= 1, "Hunter buried {graves} times");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logic::simulation::GameTester;

    fn run(plan: &SimulationPlan, seed: u64) -> SimulationSummary {
        GameTester::new(false).run_plan(plan, seed).unwrap()
    }

    fn check(plan: &SimulationPlan, summary: &SimulationSummary) -> Result<()> {
        for expectation in &plan.expectations {
            expectation.evaluate(summary)?;
        }
        Ok(())
    }

    #[test]
    fn catalog_plans_pass_across_seeds() {
        for plan in [
            smoke_plan(),
            full_game_plan(),
            tie_stall_plan(),
            hunter_table_plan(),
        ] {
            for seed in 0..8 {
                let summary = run(&plan, seed);
                check(&plan, &summary).unwrap();
            }
        }
    }

    #[test]
    fn invariants_catch_a_missing_grave() {
        let plan = smoke_plan();
        let mut summary = run(&plan, 1);
        summary.final_state.graveyard.pop();
        assert!(table_invariants(&summary).is_err());
    }

    #[test]
    fn unfinished_games_fail_termination() {
        let plan = smoke_plan().with_max_rounds(0);
        let summary = run(&plan, 1);
        assert!(terminates(&summary).is_err());
        assert!(table_invariants(&summary).is_ok());
    }
}
