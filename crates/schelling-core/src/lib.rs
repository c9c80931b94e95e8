//! Schelling Core -- a discrete agent-segregation simulator on a line or ring.
//!
//! This crate implements a simplified Schelling model: a fixed population of
//! agents carrying one of two type labels, arranged on a linear chain or a
//! ring. An agent is *happy* when its label matches at least one immediate
//! neighbor, and a configuration in which every agent is happy is
//! *absorbing* -- the simulation's terminal condition.
//!
//! # Transition Rule
//!
//! Each call to [`engine::Simulation::step`] advances the simulation by one
//! step:
//!
//! 1. **Pair draw** -- one unordered position pair is drawn uniformly from
//!    the precomputed list of all N(N-1)/2 pairs.
//! 2. **Evaluation** -- the pair's joint happiness is compared before and
//!    after a hypothetical swap of the two labels.
//! 3. **Acceptance** -- a strictly improving swap is performed with
//!    probability `1 - p`; any other swap is performed with probability `p`,
//!    where `p` is the mistake probability fixed at construction.
//!
//! At `p = 0` the rule is purely greedy and absorbing configurations are
//! fixed points.
//!
//! # Key Types
//!
//! - [`engine::Simulation`] -- Population state, transition rule, and owned RNG.
//! - [`topology::Topology`] -- Ring (wraparound) vs. chain (boundary) adjacency.
//! - [`happiness`] -- Local happiness evaluation over a label sequence.
//! - [`rng::TrialRng`] -- Deterministic SplitMix64 generator, seeded per run.
//! - [`query::SimulationSnapshot`] -- Owned read-only view for display code.
//! - [`validation`] -- State hashing and seeded-run determinism checks.

pub mod engine;
pub mod error;
pub mod fixed;
pub mod happiness;
pub mod query;
pub mod rng;
pub mod topology;
pub mod validation;
