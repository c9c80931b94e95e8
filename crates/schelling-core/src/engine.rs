//! The simulation engine: a population of binary-labelled agents advanced
//! by a stochastic pairwise-swap rule.
//!
//! # Architecture
//!
//! A [`Simulation`] owns:
//! - The label sequence (positions are fixed; only labels move)
//! - A [`Topology`] (ring or chain adjacency)
//! - The mistake probability as a [`Fixed64`]
//! - The precomputed list of all unordered position pairs
//! - A [`TrialRng`] seeded at construction
//! - A step counter
//!
//! # Step
//!
//! Each [`Simulation::step`] draws one pair uniformly from the pair list,
//! compares the pair's joint happiness before and after a hypothetical
//! swap, and then swaps with probability `1 - p` on strict improvement and
//! with probability `p` otherwise. At `p = 0` absorbing configurations are
//! fixed points: no pair can strictly improve, so no swap is ever accepted.

use crate::error::SimError;
use crate::fixed::{Fixed64, fixed64_to_f64};
use crate::happiness::{self, Label};
use crate::query::SimulationSnapshot;
use crate::rng::TrialRng;
use crate::topology::Topology;
use crate::validation::StateHash;

// ---------------------------------------------------------------------------
// Step outcome
// ---------------------------------------------------------------------------

/// What a single [`Simulation::step`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StepOutcome {
    /// The unordered position pair drawn this step (`pair.0 < pair.1`).
    pub pair: (usize, usize),
    /// Whether the two labels were exchanged.
    pub swapped: bool,
}

// ---------------------------------------------------------------------------
// Simulation
// ---------------------------------------------------------------------------

/// A Schelling population together with its transition rule and owned RNG.
///
/// The population size, topology, and mistake probability are fixed for the
/// lifetime of the instance; stepping only ever permutes the labels, so the
/// label multiset is invariant.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct Simulation {
    labels: Vec<Label>,
    topology: Topology,
    mistake_probability: Fixed64,
    /// All unordered position pairs `(i, j)` with `i < j`, built once at
    /// construction and sampled uniformly on every step.
    pairs: Vec<(usize, usize)>,
    rng: TrialRng,
    steps: u64,
}

impl Simulation {
    /// Create a simulation from an explicit initial label sequence.
    ///
    /// Fails on an empty population or a mistake probability outside [0, 1].
    pub fn new(
        labels: Vec<Label>,
        topology: Topology,
        mistake_probability: Fixed64,
        seed: u64,
    ) -> Result<Self, SimError> {
        if labels.is_empty() {
            return Err(SimError::EmptyPopulation);
        }
        if mistake_probability < Fixed64::ZERO || mistake_probability > Fixed64::from_num(1) {
            return Err(SimError::MistakeProbabilityOutOfRange {
                value: fixed64_to_f64(mistake_probability),
            });
        }

        let n = labels.len();
        let mut pairs = Vec::with_capacity(n * (n - 1) / 2);
        for i in 0..n {
            for j in (i + 1)..n {
                pairs.push((i, j));
            }
        }

        Ok(Self {
            labels,
            topology,
            mistake_probability,
            pairs,
            rng: TrialRng::new(seed),
            steps: 0,
        })
    }

    // -----------------------------------------------------------------------
    // Accessors
    // -----------------------------------------------------------------------

    /// Number of agents.
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    /// Always false: construction rejects empty populations.
    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// The current label sequence.
    pub fn labels(&self) -> &[Label] {
        &self.labels
    }

    /// The adjacency model fixed at construction.
    pub fn topology(&self) -> Topology {
        self.topology
    }

    /// The mistake probability fixed at construction.
    pub fn mistake_probability(&self) -> Fixed64 {
        self.mistake_probability
    }

    /// Number of steps taken so far.
    pub fn steps(&self) -> u64 {
        self.steps
    }

    // -----------------------------------------------------------------------
    // Happiness queries
    // -----------------------------------------------------------------------

    /// Whether the agent at `index` is happy in the current state.
    ///
    /// # Panics
    ///
    /// Panics if `index >= self.len()`.
    pub fn is_happy(&self, index: usize) -> bool {
        happiness::is_happy(&self.labels, self.topology, index)
    }

    /// Per-position happiness against the current state.
    pub fn happiness_vector(&self) -> Vec<bool> {
        happiness::happiness_vector(&self.labels, self.topology)
    }

    /// Number of happy agents in the current state.
    pub fn happy_count(&self) -> usize {
        happiness::happy_count(&self.labels, self.topology)
    }

    /// Whether every agent is happy -- the absorbing predicate.
    pub fn is_absorbing(&self) -> bool {
        happiness::is_absorbing(&self.labels, self.topology)
    }

    /// Joint happiness of the agents at `i` and `j` after a hypothetical
    /// swap of their labels, without mutating the live state.
    ///
    /// The first element is the happiness at position `j` (where the agent
    /// from `i` would sit), the second at position `i`. Evaluated over a
    /// virtual swapped view of the sequence; the live labels are untouched.
    pub fn happiness_after_swap(&self, i: usize, j: usize) -> Result<(bool, bool), SimError> {
        self.check_position(i)?;
        self.check_position(j)?;
        Ok(self.after_swap_pair(i, j))
    }

    fn after_swap_pair(&self, i: usize, j: usize) -> (bool, bool) {
        let at = |k: usize| {
            if k == i {
                self.labels[j]
            } else if k == j {
                self.labels[i]
            } else {
                self.labels[k]
            }
        };
        let happy_at = |pos: usize| {
            let own = at(pos);
            let matches = |side: Option<usize>| side.is_some_and(|k| at(k) == own);
            matches(self.topology.left_of(pos, self.labels.len()))
                || matches(self.topology.right_of(pos, self.labels.len()))
        };
        (happy_at(j), happy_at(i))
    }

    // -----------------------------------------------------------------------
    // Mutation
    // -----------------------------------------------------------------------

    /// Exchange the labels at positions `i` and `j` in place.
    ///
    /// Swapping a position with itself is a no-op.
    pub fn swap(&mut self, i: usize, j: usize) -> Result<(), SimError> {
        self.check_position(i)?;
        self.check_position(j)?;
        self.labels.swap(i, j);
        Ok(())
    }

    /// Advance the simulation by one step of the pairwise-swap rule.
    ///
    /// Draws one unordered pair uniformly, then applies the acceptance
    /// rule: a strictly improving swap is taken with probability
    /// `1 - mistake_probability`, any other with probability
    /// `mistake_probability`. Mutates the state in place; the returned
    /// [`StepOutcome`] is purely informational.
    ///
    /// # Panics
    ///
    /// Panics on a single-agent population, which has no candidate pairs.
    pub fn step(&mut self) -> StepOutcome {
        assert!(
            !self.pairs.is_empty(),
            "population of one agent has no candidate pairs"
        );
        let &(i, j) = self.rng.choose(&self.pairs);

        let current = u8::from(self.is_happy(i)) + u8::from(self.is_happy(j));
        let (at_j, at_i) = self.after_swap_pair(i, j);
        let after = u8::from(at_j) + u8::from(at_i);

        let swapped = if after > current {
            !self.rng.chance(self.mistake_probability)
        } else {
            self.rng.chance(self.mistake_probability)
        };
        if swapped {
            self.labels.swap(i, j);
        }
        self.steps += 1;

        StepOutcome { pair: (i, j), swapped }
    }

    // -----------------------------------------------------------------------
    // Inspection
    // -----------------------------------------------------------------------

    /// Owned read-only view of the current state.
    pub fn snapshot(&self) -> SimulationSnapshot {
        let happiness = self.happiness_vector();
        let happy_count = happiness.iter().filter(|&&h| h).count();
        SimulationSnapshot {
            labels: self.labels.clone(),
            topology: self.topology,
            absorbing: happy_count == self.labels.len(),
            happiness,
            happy_count,
            steps: self.steps,
        }
    }

    /// Deterministic hash of the full simulation state, including the RNG.
    /// Two seeded runs that agree on this hash at every step are identical.
    pub fn state_hash(&self) -> u64 {
        let mut hash = StateHash::new();
        for &label in &self.labels {
            hash.write(&[u8::from(label)]);
        }
        hash.write(&[match self.topology {
            Topology::Ring => 0u8,
            Topology::Chain => 1u8,
        }]);
        hash.write_u64(self.mistake_probability.to_bits() as u64);
        hash.write_u64(self.rng.state());
        hash.write_u64(self.steps);
        hash.finish()
    }

    fn check_position(&self, index: usize) -> Result<(), SimError> {
        if index < self.labels.len() {
            Ok(())
        } else {
            Err(SimError::PositionOutOfRange {
                index,
                len: self.labels.len(),
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixed::f64_to_fixed64;

    fn sample_sim(topology: Topology) -> Simulation {
        Simulation::new(
            vec![true, true, false, true, false],
            topology,
            Fixed64::ZERO,
            42,
        )
        .unwrap()
    }

    // -----------------------------------------------------------------------
    // Construction
    // -----------------------------------------------------------------------

    #[test]
    fn rejects_empty_population() {
        let err = Simulation::new(vec![], Topology::Ring, Fixed64::ZERO, 0).unwrap_err();
        assert_eq!(err, SimError::EmptyPopulation);
    }

    #[test]
    fn rejects_probability_above_one() {
        let err =
            Simulation::new(vec![true], Topology::Ring, f64_to_fixed64(1.5), 0).unwrap_err();
        assert!(matches!(err, SimError::MistakeProbabilityOutOfRange { .. }));
    }

    #[test]
    fn rejects_negative_probability() {
        let err =
            Simulation::new(vec![true], Topology::Ring, f64_to_fixed64(-0.1), 0).unwrap_err();
        assert!(matches!(err, SimError::MistakeProbabilityOutOfRange { .. }));
    }

    #[test]
    fn pair_list_has_n_choose_two_entries() {
        let sim = sample_sim(Topology::Ring);
        // N = 5 -> 10 unordered pairs.
        let snapshot = sim.snapshot();
        assert_eq!(snapshot.labels.len(), 5);
        assert_eq!(sim.pairs.len(), 10);
        assert!(sim.pairs.iter().all(|&(i, j)| i < j && j < 5));
    }

    // -----------------------------------------------------------------------
    // Happiness queries
    // -----------------------------------------------------------------------

    #[test]
    fn happiness_vector_matches_worked_example() {
        let sim = sample_sim(Topology::Ring);
        assert_eq!(
            sim.happiness_vector(),
            vec![true, true, false, false, false]
        );
        assert_eq!(sim.happy_count(), 2);
        assert!(!sim.is_absorbing());
    }

    #[test]
    fn hypothetical_swap_ring_scenarios() {
        let sim = sample_sim(Topology::Ring);
        assert_eq!(sim.happiness_after_swap(2, 3).unwrap(), (true, true));
        assert_eq!(sim.happiness_after_swap(3, 4).unwrap(), (true, true));
    }

    #[test]
    fn hypothetical_swap_chain_boundary_differs() {
        let sim = sample_sim(Topology::Chain);
        // Swapping 3 and 4 strands the agent moved to position 4 against
        // the chain boundary.
        assert_eq!(sim.happiness_after_swap(3, 4).unwrap(), (false, true));
    }

    #[test]
    fn hypothetical_swap_does_not_mutate() {
        let sim = sample_sim(Topology::Ring);
        let before = sim.labels().to_vec();
        let _ = sim.happiness_after_swap(1, 4).unwrap();
        let _ = sim.happiness_after_swap(0, 2).unwrap();
        assert_eq!(sim.labels(), &before[..]);
    }

    #[test]
    fn hypothetical_swap_is_symmetric_with_exchanged_values() {
        let sim = sample_sim(Topology::Ring);
        for &(i, j) in &[(0usize, 3usize), (2, 3), (1, 4)] {
            let (a, b) = sim.happiness_after_swap(i, j).unwrap();
            let (c, d) = sim.happiness_after_swap(j, i).unwrap();
            assert_eq!((a, b), (d, c));
        }
    }

    #[test]
    fn hypothetical_swap_rejects_out_of_range() {
        let sim = sample_sim(Topology::Ring);
        let err = sim.happiness_after_swap(0, 5).unwrap_err();
        assert_eq!(err, SimError::PositionOutOfRange { index: 5, len: 5 });
    }

    // -----------------------------------------------------------------------
    // Swap
    // -----------------------------------------------------------------------

    #[test]
    fn swap_exchanges_labels() {
        let mut sim = sample_sim(Topology::Ring);
        sim.swap(1, 2).unwrap();
        assert_eq!(sim.labels(), &[true, false, true, true, false]);
    }

    #[test]
    fn swap_rejects_out_of_range() {
        let mut sim = sample_sim(Topology::Ring);
        let err = sim.swap(7, 1).unwrap_err();
        assert_eq!(err, SimError::PositionOutOfRange { index: 7, len: 5 });
    }

    #[test]
    fn swap_with_self_is_noop() {
        let mut sim = sample_sim(Topology::Ring);
        let before = sim.labels().to_vec();
        sim.swap(2, 2).unwrap();
        assert_eq!(sim.labels(), &before[..]);
    }

    // -----------------------------------------------------------------------
    // Step
    // -----------------------------------------------------------------------

    #[test]
    fn step_counts_and_preserves_multiset() {
        let mut sim = sample_sim(Topology::Ring);
        let trues = sim.labels().iter().filter(|&&l| l).count();
        for _ in 0..50 {
            sim.step();
        }
        assert_eq!(sim.steps(), 50);
        assert_eq!(sim.labels().iter().filter(|&&l| l).count(), trues);
    }

    #[test]
    fn absorbing_state_is_a_fixed_point_at_zero_mistakes() {
        let mut sim =
            Simulation::new(vec![true, true, false, false], Topology::Ring, Fixed64::ZERO, 9)
                .unwrap();
        assert!(sim.is_absorbing());
        for _ in 0..200 {
            let outcome = sim.step();
            assert!(!outcome.swapped);
        }
        assert_eq!(sim.labels(), &[true, true, false, false]);
    }

    #[test]
    fn mistake_probability_one_always_takes_non_improving_swaps() {
        // From an absorbing state no swap improves, so at p = 1 every step
        // is a mistake and must swap.
        let mut sim = Simulation::new(
            vec![true, true, false, false],
            Topology::Ring,
            f64_to_fixed64(1.0),
            11,
        )
        .unwrap();
        let outcome = sim.step();
        assert!(outcome.swapped);
    }

    #[test]
    #[should_panic(expected = "no candidate pairs")]
    fn step_panics_on_single_agent() {
        let mut sim = Simulation::new(vec![true], Topology::Chain, Fixed64::ZERO, 0).unwrap();
        sim.step();
    }

    #[test]
    fn step_outcome_pair_is_ordered_and_in_range() {
        let mut sim = sample_sim(Topology::Ring);
        for _ in 0..100 {
            let outcome = sim.step();
            let (i, j) = outcome.pair;
            assert!(i < j && j < 5);
        }
    }

    // -----------------------------------------------------------------------
    // Snapshot and hashing
    // -----------------------------------------------------------------------

    #[test]
    fn snapshot_reflects_state() {
        let sim = sample_sim(Topology::Ring);
        let snap = sim.snapshot();
        assert_eq!(snap.labels, sim.labels());
        assert_eq!(snap.happiness, sim.happiness_vector());
        assert_eq!(snap.happy_count, 2);
        assert!(!snap.absorbing);
        assert_eq!(snap.steps, 0);
    }

    #[test]
    fn state_hash_changes_with_steps() {
        let mut sim = sample_sim(Topology::Ring);
        let before = sim.state_hash();
        sim.step();
        assert_ne!(before, sim.state_hash());
    }

    #[test]
    fn serde_round_trip_preserves_run() {
        let mut sim = sample_sim(Topology::Ring);
        for _ in 0..10 {
            sim.step();
        }
        let json = serde_json::to_string(&sim).unwrap();
        let mut restored: Simulation = serde_json::from_str(&json).unwrap();
        assert_eq!(sim.state_hash(), restored.state_hash());

        // Both continue identically.
        for _ in 0..10 {
            sim.step();
            restored.step();
        }
        assert_eq!(sim.labels(), restored.labels());
        assert_eq!(sim.state_hash(), restored.state_hash());
    }
}
