//! Win condition evaluation over the living population.
use log::info;

use crate::state::{GameState, Person, Winner};

/// Winner implied by the living population, if any.
///
/// Beasts win once they equal or outnumber everyone else; the village wins
/// once no Beast is alive. Dead people are ignored and the Hunter counts as
/// an ordinary non-Beast.
#[must_use]
pub fn check_winner(people: &[Person]) -> Option<Winner> {
    let mut beasts = 0usize;
    let mut others = 0usize;
    for person in people.iter().filter(|p| p.alive) {
        if person.role.is_beast() {
            beasts += 1;
        } else {
            others += 1;
        }
    }

    if beasts == 0 {
        Some(Winner::Villagers)
    } else if beasts >= others {
        Some(Winner::Beasts)
    } else {
        None
    }
}

/// Record the winner on `state` when a win condition holds.
///
/// A state with no condition met keeps its current `winner`. Calling this
/// repeatedly on the same state yields the same result.
pub fn evaluate(state: &mut GameState) -> Option<Winner> {
    if let Some(winner) = check_winner(&state.people) {
        if state.winner != Some(winner) {
            info!(
                "{winner} ({} beasts vs {} others alive)",
                state.living_beasts(),
                state.living_others()
            );
        }
        state.winner = Some(winner);
    }
    state.winner
}
