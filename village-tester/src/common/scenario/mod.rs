pub mod catalog;

use crate::logic::SimulationPlan;
use catalog::{full_game_plan, hunter_table_plan, smoke_plan, tie_stall_plan};

/// Named simulation run.
#[derive(Debug, Clone)]
pub struct TestScenario {
    pub name: String,
    pub plan: SimulationPlan,
}

impl TestScenario {
    #[must_use]
    pub fn simulation(name: impl Into<String>, plan: SimulationPlan) -> Self {
        Self {
            name: name.into(),
            plan,
        }
    }
}

const SCENARIOS: &[(&str, &str)] = &[
    ("smoke", "Five-seat table, focused votes, must reach a winner"),
    ("full-game", "Seven seats with two Beasts and a Hunter, random votes"),
    ("tie-stall", "Split day votes; tied days must spare everyone"),
    ("hunter-table", "Hunter plays as an ordinary villager"),
];

#[must_use]
pub fn list_scenarios() -> Vec<(&'static str, &'static str)> {
    SCENARIOS.to_vec()
}

/// Build a scenario by key, optionally reseating it for `players`.
#[must_use]
pub fn get_scenario(name: &str, players: Option<usize>) -> Option<TestScenario> {
    let (title, plan) = match name.to_lowercase().as_str() {
        "smoke" => ("Smoke", smoke_plan()),
        "full-game" | "full" => ("Full Game", full_game_plan()),
        "tie-stall" | "ties" => ("Tie Stall", tie_stall_plan()),
        "hunter-table" | "hunter" => ("Hunter Table", hunter_table_plan()),
        _ => return None,
    };
    let plan = match players {
        Some(players) => plan.with_players(players),
        None => plan,
    };
    Some(TestScenario::simulation(title, plan))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_listed_scenario_resolves() {
        for (key, _) in list_scenarios() {
            assert!(get_scenario(key, None).is_some(), "{key}");
        }
        assert!(get_scenario("SMOKE", None).is_some());
        assert!(get_scenario("nope", None).is_none());
    }

    #[test]
    fn player_override_reseats_the_plan() {
        let scenario = get_scenario("full-game", Some(4)).unwrap();
        assert_eq!(scenario.plan.players, 4);
        assert_eq!(scenario.plan.config.num_beasts, 1);
    }
}
