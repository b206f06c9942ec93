//! Deterministic random streams segregated by game concern.
use hmac::{Hmac, Mac};
use rand::SeedableRng;
use rand_chacha::ChaCha20Rng;
use sha2::Sha256;

const ROLES_TAG: &[u8] = b"roles";
const TIEBREAK_TAG: &[u8] = b"tiebreak";

/// Independent RNG streams for role shuffles and night tie-breaks.
///
/// Both streams derive from one user-visible seed, so a room replays
/// identically from its seed and round number.
#[derive(Debug, Clone)]
pub struct RngBundle {
    roles: CountingRng<ChaCha20Rng>,
    tiebreak: CountingRng<ChaCha20Rng>,
}

impl RngBundle {
    /// Construct the bundle from a user-visible seed.
    #[must_use]
    pub fn from_user_seed(seed: u64) -> Self {
        Self::for_round(seed, 0)
    }

    /// Construct the bundle for a specific round of a seeded game.
    #[must_use]
    pub fn for_round(seed: u64, round: u32) -> Self {
        let salt = u64::from(round);
        Self {
            roles: CountingRng::new(derive_stream_seed(seed, ROLES_TAG, salt)),
            tiebreak: CountingRng::new(derive_stream_seed(seed, TIEBREAK_TAG, salt)),
        }
    }

    /// Access the role-shuffle stream.
    pub const fn roles(&mut self) -> &mut CountingRng<ChaCha20Rng> {
        &mut self.roles
    }

    /// Access the night tie-break stream.
    pub const fn tiebreak(&mut self) -> &mut CountingRng<ChaCha20Rng> {
        &mut self.tiebreak
    }

    /// Total draws across both streams.
    #[must_use]
    pub const fn draws(&self) -> u64 {
        self.roles.draws().saturating_add(self.tiebreak.draws())
    }
}

/// Counting wrapper for RNG streams providing instrumentation.
#[derive(Debug, Clone)]
pub struct CountingRng<R> {
    rng: R,
    draws: u64,
}

impl CountingRng<ChaCha20Rng> {
    fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha20Rng::seed_from_u64(seed),
            draws: 0,
        }
    }
}

impl<R: rand::RngCore> CountingRng<R> {
    /// Number of draw calls performed against this stream.
    #[must_use]
    pub const fn draws(&self) -> u64 {
        self.draws
    }
}

impl<R: rand::RngCore> rand::RngCore for CountingRng<R> {
    fn next_u32(&mut self) -> u32 {
        self.draws = self.draws.saturating_add(1);
        self.rng.next_u32()
    }

    fn next_u64(&mut self) -> u64 {
        self.draws = self.draws.saturating_add(1);
        self.rng.next_u64()
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        self.draws = self.draws.saturating_add(1);
        self.rng.fill_bytes(dest);
    }

    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), rand::Error> {
        self.draws = self.draws.saturating_add(1);
        self.rng.try_fill_bytes(dest)
    }
}

fn derive_stream_seed(user_seed: u64, domain_tag: &[u8], salt: u64) -> u64 {
    // Zero-padded to the SHA-256 block size, which HMAC does for short keys anyway.
    let mut key = [0u8; 64];
    key[..8].copy_from_slice(&user_seed.to_le_bytes());
    let mut mac = Hmac::<Sha256>::new(&key.into());
    mac.update(domain_tag);
    mac.update(&salt.to_le_bytes());
    let digest = mac.finalize().into_bytes();
    let mut seed_bytes = [0u8; 8];
    seed_bytes.copy_from_slice(&digest[..8]);
    u64::from_le_bytes(seed_bytes)
}
