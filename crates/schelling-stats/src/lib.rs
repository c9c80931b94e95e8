//! Absorption-time estimation for the Schelling segregation model.
//!
//! Enumerates the non-absorbing ("transient") balanced configurations of a
//! given population size, then Monte-Carlo samples the number of steps a
//! ring-topology, zero-mistake simulation takes to reach an absorbing
//! configuration, averaging over independent trials.
//!
//! # Usage
//!
//! ```ignore
//! let config = EstimatorConfig::default();
//! let mean = estimate_absorption_time(6, &config)?;
//! ```
//!
//! Every trial owns a freshly constructed, unshared simulation whose RNG is
//! derived from the base seed and the trial index, so estimates are
//! reproducible and identical whether trials run serially or (with the
//! `parallel` feature) on a rayon pool.

use schelling_core::engine::Simulation;
use schelling_core::error::SimError;
use schelling_core::fixed::Fixed64;
use schelling_core::happiness::{self, Label};
use schelling_core::rng::TrialRng;
use schelling_core::topology::Topology;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Errors from enumeration and estimation.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum EstimateError {
    /// Underlying simulation construction failed.
    #[error(transparent)]
    Sim(#[from] SimError),

    /// Every balanced configuration of this size is absorbing, so there is
    /// no transient state to start a trial from.
    #[error("no transient states exist for population size {size}")]
    NoTransientStates { size: usize },

    /// A trial exceeded the step ceiling without reaching an absorbing
    /// configuration.
    #[error("trial did not reach an absorbing state within {limit} steps")]
    DidNotConverge { limit: u64 },
}

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

/// Configuration for [`estimate_absorption_time`].
#[derive(Debug, Clone)]
pub struct EstimatorConfig {
    /// Number of independent trials to average over.
    pub repetitions: u32,
    /// Step ceiling per trial; exceeding it aborts the trial with
    /// [`EstimateError::DidNotConverge`] instead of looping unbounded.
    pub step_limit: u64,
    /// Base seed. Each trial derives its own RNG from this seed and the
    /// trial index.
    pub seed: u64,
}

impl Default for EstimatorConfig {
    fn default() -> Self {
        Self {
            repetitions: 1000,
            step_limit: 1_000_000,
            seed: 0,
        }
    }
}

// ---------------------------------------------------------------------------
// Transient-state enumeration
// ---------------------------------------------------------------------------

/// Advance `labels` to the lexicographically next permutation.
///
/// Returns `false` once `labels` holds the last permutation. Started from
/// the ascending arrangement of a multiset, this visits every distinct
/// label sequence exactly once -- no duplicate orderings are ever produced.
fn next_permutation(labels: &mut [Label]) -> bool {
    if labels.len() < 2 {
        return false;
    }
    // Pivot: last position followed by a strictly larger element.
    let mut i = labels.len() - 1;
    while i > 0 && labels[i - 1] >= labels[i] {
        i -= 1;
    }
    if i == 0 {
        return false;
    }
    // Rightmost element strictly greater than the pivot.
    let mut j = labels.len() - 1;
    while labels[j] <= labels[i - 1] {
        j -= 1;
    }
    labels.swap(i - 1, j);
    labels[i..].reverse();
    true
}

/// The canonical balanced multiset for `size` agents, sorted ascending:
/// floor(size/2) of each label, plus one extra `true` when `size` is odd.
fn balanced_template(size: usize) -> Vec<Label> {
    let mut labels = vec![true; size];
    labels[..size / 2].fill(false);
    labels
}

/// All distinct non-absorbing balanced configurations of `size` agents
/// under ring topology.
///
/// The result order is an artifact of the permutation generator; callers
/// must treat it as an unordered set of distinct label sequences.
pub fn enumerate_transient_states(size: usize) -> Result<Vec<Vec<Label>>, EstimateError> {
    if size == 0 {
        return Err(SimError::EmptyPopulation.into());
    }
    let mut current = balanced_template(size);
    let mut states = Vec::new();
    loop {
        if !happiness::is_absorbing(&current, Topology::Ring) {
            states.push(current.clone());
        }
        if !next_permutation(&mut current) {
            break;
        }
    }
    Ok(states)
}

// ---------------------------------------------------------------------------
// Absorption-time sampling
// ---------------------------------------------------------------------------

/// Run one trial: pick a uniform starting state from `candidates`, then
/// step a fresh ring-topology, zero-mistake simulation until it absorbs.
/// Returns the number of steps taken.
///
/// # Panics
///
/// Panics if `candidates` is empty, or if the picked state is already
/// absorbing -- either indicates a bug in the caller's enumeration, not a
/// recoverable condition.
pub fn sample_absorption_time(
    candidates: &[Vec<Label>],
    rng: &mut TrialRng,
    step_limit: u64,
) -> Result<u64, EstimateError> {
    let start = rng.choose(candidates).clone();
    let mut sim = Simulation::new(start, Topology::Ring, Fixed64::ZERO, rng.next_u64())?;
    assert!(
        !sim.is_absorbing(),
        "starting state {:?} is already absorbing",
        sim.labels()
    );

    while !sim.is_absorbing() {
        if sim.steps() >= step_limit {
            return Err(EstimateError::DidNotConverge { limit: step_limit });
        }
        sim.step();
    }
    Ok(sim.steps())
}

// ---------------------------------------------------------------------------
// Averaging
// ---------------------------------------------------------------------------

/// Derive the RNG for one trial from the base seed and trial index.
///
/// The extra scrambling pass keeps consecutive trial indices from producing
/// overlapping SplitMix64 streams.
fn trial_rng(seed: u64, trial: u32) -> TrialRng {
    let mut scrambler = TrialRng::new(seed ^ u64::from(trial));
    TrialRng::new(scrambler.next_u64())
}

/// Mean number of steps to absorption over `config.repetitions` independent
/// trials for population `size`, ring topology, mistake probability zero.
///
/// Each trial draws its own starting state uniformly from the enumerated
/// transient set and runs on a fresh simulation.
///
/// # Panics
///
/// Panics if `config.repetitions` is zero.
pub fn estimate_absorption_time(
    size: usize,
    config: &EstimatorConfig,
) -> Result<f64, EstimateError> {
    assert!(config.repetitions > 0, "repetitions must be > 0");

    let candidates = enumerate_transient_states(size)?;
    if candidates.is_empty() {
        return Err(EstimateError::NoTransientStates { size });
    }

    let run_trial = |trial: u32| {
        let mut rng = trial_rng(config.seed, trial);
        sample_absorption_time(&candidates, &mut rng, config.step_limit)
    };

    #[cfg(feature = "parallel")]
    let samples = (0..config.repetitions)
        .into_par_iter()
        .map(run_trial)
        .collect::<Result<Vec<u64>, EstimateError>>()?;

    #[cfg(not(feature = "parallel"))]
    let samples = (0..config.repetitions)
        .map(run_trial)
        .collect::<Result<Vec<u64>, EstimateError>>()?;

    let total: u64 = samples.iter().sum();
    Ok(total as f64 / samples.len() as f64)
}

// ===========================================================================
// Tests
// ===========================================================================
