//! Role assignment for a freshly locked roster.
use rand::Rng;
use rand::seq::SliceRandom;

use crate::config::GameConfig;
use crate::state::{Person, Role};

/// Deck of roles for `player_count` seats: the configured Beasts, an optional
/// Hunter, and Villagers for every remaining seat.
#[must_use]
pub fn role_multiset(player_count: usize, config: &GameConfig) -> Vec<Role> {
    let mut roles = vec![Role::Beast; config.num_beasts];
    if config.include_hunter {
        roles.push(Role::Hunter);
    }
    let villagers = player_count.saturating_sub(roles.len());
    roles.extend(std::iter::repeat_n(Role::Villager, villagers));
    roles
}

/// Shuffle the role deck and deal it to `player_ids` in order.
///
/// Callers must have validated `config` against the roster size
/// (see [`GameConfig::validate`]); an oversized deck is truncated to the roster.
#[must_use]
pub fn assign_roles<R: Rng + ?Sized>(
    player_ids: &[String],
    config: &GameConfig,
    rng: &mut R,
) -> Vec<Person> {
    debug_assert!(
        config.special_roles() <= player_ids.len(),
        "role deck larger than roster"
    );
    let mut roles = role_multiset(player_ids.len(), config);
    roles.shuffle(rng);
    player_ids
        .iter()
        .zip(roles)
        .map(|(id, role)| Person::new(id.clone(), role))
        .collect()
}
