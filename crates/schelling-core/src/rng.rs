//! Deterministic PRNG for simulation use (pair draws, acceptance draws,
//! trial seeding).
//!
//! Uses the SplitMix64 algorithm: fast, 8 bytes of state, excellent
//! statistical properties, and trivially serializable for snapshots.

use crate::fixed::Fixed64;

/// SplitMix64 pseudo-random number generator.
///
/// Deterministic across platforms, so a seeded run reproduces exactly.
/// Every [`Simulation`] owns its own generator; there is no process-wide
/// random source.
///
/// [`Simulation`]: crate::engine::Simulation
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct TrialRng {
    state: u64,
}

impl TrialRng {
    /// Create a new RNG with the given seed.
    pub fn new(seed: u64) -> Self {
        Self { state: seed }
    }

    /// Generate the next `u64` in the sequence.
    pub fn next_u64(&mut self) -> u64 {
        self.state = self.state.wrapping_add(0x9E37_79B9_7F4A_7C15);
        let mut z = self.state;
        z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
        z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
        z ^ (z >> 31)
    }

    /// Returns `true` with the given probability (Fixed64 in [0, 1]).
    ///
    /// - probability <= 0 always returns false and consumes no entropy
    /// - probability >= 1 always returns true and consumes no entropy
    pub fn chance(&mut self, probability: Fixed64) -> bool {
        if probability <= Fixed64::ZERO {
            return false;
        }
        if probability >= Fixed64::from_num(1) {
            return true;
        }
        // Fixed64 is Q32.32 (I32F32). For p in (0,1), the raw bits hold
        // the fractional part in the lower 32 bits (integer part = 0).
        // Generate a uniform u32 from the PRNG and compare against the
        // lower 32 bits of the fixed-point representation.
        let r = self.next_u64();
        let upper = (r >> 32) as u32;
        let raw = probability.to_bits() as u64;
        (upper as u64) < raw
    }

    /// Uniform index in `[0, bound)`.
    ///
    /// Multiply-high reduction of one `u64` draw; the selection bias is
    /// below 2^-32 for any bound that fits in memory.
    ///
    /// # Panics
    ///
    /// Panics if `bound` is zero.
    pub fn pick_index(&mut self, bound: usize) -> usize {
        assert!(bound > 0, "pick_index bound must be > 0");
        (((self.next_u64() as u128) * (bound as u128)) >> 64) as usize
    }

    /// Uniformly choose one element of `slice`.
    ///
    /// # Panics
    ///
    /// Panics if `slice` is empty.
    pub fn choose<'a, T>(&mut self, slice: &'a [T]) -> &'a T {
        &slice[self.pick_index(slice.len())]
    }

    /// Get the internal state (for hashing/serialization).
    pub fn state(&self) -> u64 {
        self.state
    }
}
