//! Determinism validation: state hashing and seeded-run comparison.
//!
//! Two simulations constructed from the same labels, topology, probability,
//! and seed must agree on their state hash after every step. The helpers
//! here make that property checkable in one call.

use crate::engine::Simulation;
use crate::error::SimError;
use crate::fixed::Fixed64;
use crate::happiness::Label;
use crate::topology::Topology;

// ---------------------------------------------------------------------------
// State hash
// ---------------------------------------------------------------------------

/// A simple deterministic hash of simulation state for reproducibility
/// checks.
///
/// Uses FNV-1a (64-bit) for speed and simplicity. Not cryptographic.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StateHash(pub u64);

impl StateHash {
    const FNV_OFFSET: u64 = 0xcbf29ce484222325;
    const FNV_PRIME: u64 = 0x100000001b3;

    /// Start a new hash.
    pub fn new() -> Self {
        Self(Self::FNV_OFFSET)
    }

    /// Feed bytes into the hash.
    pub fn write(&mut self, bytes: &[u8]) {
        for &b in bytes {
            self.0 ^= b as u64;
            self.0 = self.0.wrapping_mul(Self::FNV_PRIME);
        }
    }

    /// Feed a u64 into the hash.
    pub fn write_u64(&mut self, v: u64) {
        self.write(&v.to_le_bytes());
    }

    /// Finalize and return the hash value.
    pub fn finish(self) -> u64 {
        self.0
    }
}

impl Default for StateHash {
    fn default() -> Self {
        Self::new()
    }
}

// ---------------------------------------------------------------------------
// Determinism validation
// ---------------------------------------------------------------------------

/// Result of a determinism validation run.
#[derive(Debug)]
pub struct DeterminismResult {
    /// Whether the two runs produced identical results.
    pub is_deterministic: bool,
    /// Step at which divergence was first detected (if any).
    pub divergence_step: Option<u64>,
    /// Hash log: (step, hash_run1, hash_run2) for each step.
    pub hash_log: Vec<(u64, u64, u64)>,
}

/// Run the same seeded simulation twice and compare state hashes step by
/// step.
pub fn validate_determinism(
    labels: &[Label],
    topology: Topology,
    mistake_probability: Fixed64,
    seed: u64,
    steps: u64,
) -> Result<DeterminismResult, SimError> {
    let mut sim_a = Simulation::new(labels.to_vec(), topology, mistake_probability, seed)?;
    let mut sim_b = Simulation::new(labels.to_vec(), topology, mistake_probability, seed)?;

    let mut hash_log = Vec::new();
    let mut divergence_step = None;

    for _ in 0..steps {
        sim_a.step();
        sim_b.step();

        let hash_a = sim_a.state_hash();
        let hash_b = sim_b.state_hash();
        let step = sim_a.steps();

        hash_log.push((step, hash_a, hash_b));

        if hash_a != hash_b && divergence_step.is_none() {
            divergence_step = Some(step);
        }
    }

    Ok(DeterminismResult {
        is_deterministic: divergence_step.is_none(),
        divergence_step,
        hash_log,
    })
}
