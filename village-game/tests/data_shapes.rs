use std::hash::Hasher;

use serde_json::Value;
use twox_hash::XxHash64;
use village_game::{
    GameConfig, GameSession, GameState, PhaseOutcome, PlayerView, eligible_targets, eligible_voters,
};

const SNAPSHOT_HASH: u64 = 0x656d_9278_8ebb_212b;

fn played_state(seed: u64) -> GameState {
    let mut session = GameSession::lobby(seed, 6, GameConfig::new(2, true)).unwrap();
    session.start().unwrap();
    for _ in 0..2 {
        let state = session.state().clone();
        for voter in eligible_voters(&state) {
            let target = eligible_targets(&state, voter)[0];
            if session.vote(voter, target).unwrap().is_some() {
                break;
            }
        }
    }
    session.into_state()
}

fn snapshot_hash(bytes: &[u8]) -> u64 {
    let mut hasher = XxHash64::with_seed(0);
    hasher.write(bytes);
    hasher.finish()
}

/// Stored documents must stay plain JSON an external store can hold as-is.
fn assert_plain(value: &Value, path: &str) {
    match value {
        Value::Null | Value::Bool(_) | Value::String(_) => {}
        Value::Number(n) => assert!(n.is_u64() || n.is_i64(), "{path} is not an integer"),
        Value::Array(items) => {
            for (idx, item) in items.iter().enumerate() {
                assert_plain(item, &format!("{path}[{idx}]"));
            }
        }
        Value::Object(map) => {
            for (key, item) in map {
                assert_plain(item, &format!("{path}.{key}"));
            }
        }
    }
}

#[test]
fn game_state_document_shape() {
    let state = played_state(0x5EED);
    let value = serde_json::to_value(&state).unwrap();
    assert_plain(&value, "$");

    assert_eq!(value["status"], "in_game");
    assert_eq!(value["phase"], "night");
    assert_eq!(value["current_round"], 2);
    assert_eq!(value["game_config"]["num_beasts"], 2);
    assert_eq!(value["game_config"]["include_hunter"], true);
    assert_eq!(value["players"][0]["name"], "Player 1");
    assert_eq!(value["host_id"], "P1");
    assert!(value["votes"].as_object().unwrap().is_empty());
    assert_eq!(value["graveyard"][0]["reason"], "eliminated");
    assert_eq!(value["graveyard"][0]["round"], 1);
    assert_eq!(value["graveyard"][1]["reason"], "banished");
}

#[test]
fn dealt_game_snapshot_stable() {
    let mut session = GameSession::lobby(0x5EED, 6, GameConfig::new(2, true)).unwrap();
    session.start().unwrap();
    let canonical = serde_json::to_string_pretty(session.state()).unwrap();
    let digest = snapshot_hash(canonical.as_bytes());
    assert_eq!(
        digest, SNAPSHOT_HASH,
        "dealt game snapshot changed\n{canonical}"
    );
}

#[test]
fn stored_games_round_trip_unchanged() {
    let stored = serde_json::to_string(&played_state(41)).unwrap();
    assert_eq!(stored, serde_json::to_string(&played_state(41)).unwrap());

    let restored: GameState = serde_json::from_str(&stored).unwrap();
    assert_eq!(serde_json::to_string(&restored).unwrap(), stored);
}

#[test]
fn sparse_documents_fill_in_defaults() {
    let state: GameState =
        serde_json::from_str(r#"{"players":[{"id":"P1","name":"Ana"}]}"#).unwrap();
    assert_eq!(state.current_round, 1);
    assert_eq!(state.game_config, GameConfig::default());
    assert!(state.people.is_empty() && state.winner.is_none());

    let config: GameConfig = serde_json::from_str(r#"{"num_beasts":2}"#).unwrap();
    assert!(config.include_hunter);
}

#[test]
fn outcomes_and_views_are_tagged_for_clients() {
    let outcome = serde_json::to_value(PhaseOutcome::Banished {
        id: "P3".to_string(),
        role: village_game::Role::Beast,
    })
    .unwrap();
    assert_eq!(outcome["kind"], "banished");
    assert_eq!(outcome["role"], "Beast");

    let state = played_state(7);
    let view = serde_json::to_value(PlayerView::for_player(&state, "P1").unwrap()).unwrap();
    assert_plain(&view, "$");
    assert_eq!(view["player_id"], "P1");
    assert!(view["alive_ids"].is_array());
}
