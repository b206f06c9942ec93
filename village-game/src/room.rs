//! Short room codes players type to join, and the replay seed derived from them.
//! Code format: four characters from `A-Z0-9`, e.g. `K7QX`.
use rand::Rng;

pub const ROOM_CODE_LEN: usize = 4;
const ROOM_CODE_ALPHABET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

fn fnv1a64(bytes: &[u8]) -> u64 {
    const FNV_OFFSET: u64 = 0xcbf2_9ce4_8422_2325;
    const FNV_PRIME: u64 = 0x0100_0000_01b3;
    let mut hash = FNV_OFFSET;
    for b in bytes {
        hash = (hash ^ u64::from(*b)).wrapping_mul(FNV_PRIME);
    }
    hash
}

#[must_use]
pub fn generate_room_code<R: Rng + ?Sized>(rng: &mut R) -> String {
    (0..ROOM_CODE_LEN)
        .map(|_| {
            let idx = rng.gen_range(0..ROOM_CODE_ALPHABET.len());
            char::from(ROOM_CODE_ALPHABET[idx])
        })
        .collect()
}

/// Canonical form of user input, or `None` if it cannot be a room code.
#[must_use]
pub fn normalize_room_code(input: &str) -> Option<String> {
    let code = input.trim().to_ascii_uppercase();
    let valid = code.len() == ROOM_CODE_LEN
        && code.bytes().all(|b| ROOM_CODE_ALPHABET.contains(&b));
    valid.then_some(code)
}

/// Stable seed for a room so its shuffles and tie-breaks can be replayed.
#[must_use]
pub fn seed_from_room_code(code: &str) -> Option<u64> {
    let code = normalize_room_code(code)?;
    // Domain-separated FNV input
    let mut buf = [0u8; 6 + ROOM_CODE_LEN];
    buf[..6].copy_from_slice(b"VILLA-");
    buf[6..].copy_from_slice(code.as_bytes());
    Some(fnv1a64(&buf))
}
