use anyhow::{Result, bail};
use std::collections::HashMap;
use village_game::{normalize_room_code, seed_from_room_code};

pub const DEFAULT_SEED: u64 = 1337;

/// Forces a token to be read as a room code, for codes that are all digits.
pub const ROOM_CODE_PREFIX: &str = "room:";

/// Seed metadata for a logic run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeedInfo {
    pub seed: u64,
    pub room_code: Option<String>,
}

impl SeedInfo {
    #[must_use]
    pub const fn from_numeric(seed: u64) -> Self {
        Self {
            seed,
            room_code: None,
        }
    }

    #[must_use]
    pub const fn from_room_code(seed: u64, code: String) -> Self {
        Self {
            seed,
            room_code: Some(code),
        }
    }
}

/// Resolve CLI seed arguments into canonical seeds.
///
/// Accepts integers and room codes, which replay the seed that room would
/// have been dealt. Integers win, so an all-digit code such as `1234` needs
/// the `room:` prefix.
///
/// # Errors
///
/// Returns an error for tokens that are neither.
pub fn resolve_seed_inputs(tokens: &[String]) -> Result<Vec<SeedInfo>> {
    let mut deduped: Vec<SeedInfo> = Vec::new();
    let mut index: HashMap<u64, usize> = HashMap::new();

    for token in tokens {
        if token.is_empty() {
            continue;
        }

        let info = if let Some(code) = token.strip_prefix(ROOM_CODE_PREFIX) {
            match room_seed(code) {
                Some(info) => info,
                None => bail!("Invalid room code: {token}"),
            }
        } else if let Ok(value) = token.parse::<i64>() {
            SeedInfo::from_numeric(value.unsigned_abs())
        } else if let Ok(value) = token.parse::<u64>() {
            SeedInfo::from_numeric(value)
        } else if let Some(info) = room_seed(token) {
            info
        } else {
            bail!("Unrecognized seed token: {token}");
        };

        if let Some(&existing) = index.get(&info.seed) {
            if let Some(entry) = deduped.get_mut(existing)
                && entry.room_code.is_none()
                && info.room_code.is_some()
            {
                *entry = info;
            }
        } else {
            index.insert(info.seed, deduped.len());
            deduped.push(info);
        }
    }

    if deduped.is_empty() {
        deduped.push(SeedInfo::from_numeric(DEFAULT_SEED));
    }

    Ok(deduped)
}

fn room_seed(token: &str) -> Option<SeedInfo> {
    let code = normalize_room_code(token)?;
    let seed = seed_from_room_code(&code)?;
    Some(SeedInfo::from_room_code(seed, code))
}
