//! TSID Generation
//!
//! Time-sorted unique identifiers encoded as 13-character Crockford Base32
//! strings. Lexicographic order follows creation order, and the string form
//! is safe to hand to JavaScript clients (no 64-bit integer precision loss).

use rand::Rng;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

/// Crockford Base32 alphabet (no I, L, O, U).
const ALPHABET: &[u8; 32] = b"0123456789ABCDEFGHJKMNPQRSTVWXYZ";

/// Custom epoch: 2020-01-01T00:00:00Z, leaves 42 bits of millis ≈ 139 years.
const TSID_EPOCH_MS: u64 = 1_577_836_800_000;

/// Guards monotonicity when two IDs land in the same millisecond.
static LAST: AtomicU64 = AtomicU64::new(0);

pub struct TsidGenerator;

impl TsidGenerator {
    /// Generate a new TSID: 42 bits of millis since the custom epoch,
    /// 22 bits of randomness.
    pub fn generate() -> String {
        let millis = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis() as u64)
            .unwrap_or(0)
            .saturating_sub(TSID_EPOCH_MS);

        let random: u64 = rand::thread_rng().gen_range(0..(1 << 22));
        let mut candidate = (millis << 22) | random;

        // Same-millisecond collisions of the time component are resolved by
        // bumping past the previous value, keeping IDs strictly increasing
        // within this process.
        loop {
            let last = LAST.load(Ordering::Relaxed);
            if candidate <= last {
                candidate = last + 1;
            }
            if LAST
                .compare_exchange(last, candidate, Ordering::Relaxed, Ordering::Relaxed)
                .is_ok()
            {
                break;
            }
        }

        Self::encode(candidate)
    }

    /// Encode a u64 as 13 Crockford Base32 characters (65 bits of space,
    /// so the leading character is always in 0..F).
    fn encode(value: u64) -> String {
        let mut out = [0u8; 13];
        let mut v = value;
        for slot in out.iter_mut().rev() {
            *slot = ALPHABET[(v & 0x1F) as usize];
            v >>= 5;
        }
        String::from_utf8_lossy(&out).into_owned()
    }
}
