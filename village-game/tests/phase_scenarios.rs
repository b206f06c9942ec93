use rand::SeedableRng;
use rand_chacha::ChaCha20Rng;
use village_game::Role::{Beast, Hunter, Villager};
use village_game::{
    EliminationReason, GameState, LOG_NIGHT_INDECISIVE, Phase, PhaseOutcome, Role, Winner,
    check_winner, evaluate, process_day, process_night,
};

fn state(roles: &[Role]) -> GameState {
    GameState::with_roles(roles)
}

fn vote(state: &mut GameState, voter: &str, target: &str) {
    state.votes.insert(voter.to_string(), target.to_string());
}

fn dead(state: &GameState) -> Vec<&str> {
    state
        .people
        .iter()
        .filter(|p| !p.alive)
        .map(|p| p.id.as_str())
        .collect()
}

#[test]
fn win_table_matches_the_rules() {
    let cases: &[(&[Role], Option<Winner>)] = &[
        (&[Villager, Villager, Villager], Some(Winner::Villagers)),
        (&[Beast, Beast], Some(Winner::Beasts)),
        (&[Villager, Beast], Some(Winner::Beasts)),
        (&[Villager, Villager, Beast, Beast], Some(Winner::Beasts)),
        (
            &[
                Villager, Villager, Villager, Villager, Villager, Villager, Villager, Villager,
                Beast, Beast,
            ],
            None,
        ),
        (&[Hunter, Villager, Beast], None),
    ];
    for (roles, expected) in cases {
        let mut game = state(roles);
        assert_eq!(evaluate(&mut game), *expected, "roles {roles:?}");
        assert_eq!(evaluate(&mut game), *expected, "second pass {roles:?}");
        assert_eq!(check_winner(&game.people), *expected);
    }
}

#[test]
fn the_dead_do_not_count_towards_parity() {
    let mut game = state(&[Villager, Villager, Villager, Beast, Beast]);
    assert_eq!(evaluate(&mut game), None);
    game.people[0].alive = false;
    assert_eq!(evaluate(&mut game), Some(Winner::Beasts));
}

#[test]
fn quiet_night_moves_to_day_without_casualties() {
    let mut game = state(&[Villager, Villager, Villager, Beast]);
    let outcome = process_night(&mut game, &mut ChaCha20Rng::seed_from_u64(3)).unwrap();
    assert_eq!(outcome, PhaseOutcome::NoVotes);
    assert!(dead(&game).is_empty());
    assert_eq!(game.phase, Phase::Day);
    assert_eq!(game.current_round, 1);
    assert_eq!(game.latest_result(), Some(LOG_NIGHT_INDECISIVE));
}

#[test]
fn night_tie_always_claims_one_of_the_tied() {
    for seed in 0..32 {
        let mut game = state(&[Villager, Villager, Villager, Villager, Beast, Beast]);
        vote(&mut game, "P5", "P1");
        vote(&mut game, "P6", "P2");
        process_night(&mut game, &mut ChaCha20Rng::seed_from_u64(seed)).unwrap();
        let dead = dead(&game);
        assert_eq!(dead.len(), 1, "seed {seed}");
        assert!(["P1", "P2"].contains(&dead[0]), "seed {seed}");
    }
}

#[test]
fn day_tie_stalls_and_round_advances() {
    let mut game = state(&[Villager, Villager, Villager, Villager, Beast]);
    game.phase = Phase::Day;
    vote(&mut game, "P1", "P5");
    vote(&mut game, "P2", "P5");
    vote(&mut game, "P3", "P4");
    vote(&mut game, "P5", "P4");

    let outcome = process_day(&mut game).unwrap();
    let PhaseOutcome::Tied { targets } = &outcome else {
        panic!("expected a tie, got {outcome:?}");
    };
    assert_eq!(targets.as_slice(), ["P4", "P5"]);
    assert!(dead(&game).is_empty());
    assert_eq!(game.phase, Phase::Night);
    assert_eq!(game.current_round, 2);
    assert_eq!(
        game.latest_result(),
        Some("The vote was tied between P4, P5. No one is banished.")
    );
}

#[test]
fn day_majority_banishes_and_reveals_the_role() {
    let mut game = state(&[Villager, Hunter, Villager, Villager, Beast]);
    game.phase = Phase::Day;
    vote(&mut game, "P1", "P2");
    vote(&mut game, "P3", "P2");
    vote(&mut game, "P5", "P1");

    let outcome = process_day(&mut game).unwrap();
    assert_eq!(
        outcome,
        PhaseOutcome::Banished {
            id: "P2".to_string(),
            role: Hunter
        }
    );
    assert_eq!(dead(&game), ["P2"]);
    assert_eq!(
        game.latest_result(),
        Some(
            "The village has spoken. **P2** has been banished, revealing they were a **Hunter**!"
        )
    );
    let record = game.graveyard.last().unwrap();
    assert_eq!(record.reason, EliminationReason::Banished);
    assert_eq!(record.to_string(), "**P2** (Hunter) - Banished in Day 1");
}

#[test]
fn three_person_village_turns_it_around() {
    let mut game = state(&[Villager, Villager, Beast]);
    let mut rng = ChaCha20Rng::seed_from_u64(8);

    vote(&mut game, "P3", "P1");
    process_night(&mut game, &mut rng).unwrap();
    assert_eq!(dead(&game), ["P1"]);
    assert_eq!(game.phase, Phase::Day);
    assert_eq!(
        game.latest_result(),
        Some("Dawn breaks. The village discovers that **P1** has been eliminated!")
    );
    // One Beast against one Villager is already parity.
    assert_eq!(game.winner, Some(Winner::Beasts));

    vote(&mut game, "P2", "P3");
    process_day(&mut game).unwrap();
    assert_eq!(dead(&game), ["P1", "P3"]);
    assert_eq!(game.winner, Some(Winner::Villagers));
    assert_eq!(game.winner.unwrap().headline(), "Villagers Win! 🎉");

    let history: Vec<String> = game.graveyard.iter().map(ToString::to_string).collect();
    assert_eq!(
        history,
        [
            "**P1** (Villager) - Eliminated in Night 1",
            "**P3** (Beast) - Banished in Day 1",
        ]
    );
}
