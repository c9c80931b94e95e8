//! Local happiness evaluation over a label sequence.
//!
//! An agent is happy when its label matches at least one immediate
//! neighbor. A missing neighbor (chain endpoints) never matches, so a
//! single-agent chain is always unhappy while a single-agent ring (its own
//! neighbor via wraparound) is always happy.
//!
//! These are free functions so callers that only need the absorbing
//! predicate -- the transient-state enumerator in particular -- can evaluate
//! candidate sequences without constructing a full simulation.

use crate::topology::Topology;

/// Agent type label. Two types; the position in the sequence is the agent's
/// location and only swaps ever move labels.
pub type Label = bool;

/// Whether the agent at `index` is happy in `labels` under `topology`.
///
/// # Panics
///
/// Panics if `index >= labels.len()`.
pub fn is_happy(labels: &[Label], topology: Topology, index: usize) -> bool {
    let own = labels[index];
    let matches = |side: Option<usize>| side.is_some_and(|k| labels[k] == own);
    matches(topology.left_of(index, labels.len()))
        || matches(topology.right_of(index, labels.len()))
}

/// Per-position happiness across the whole population.
pub fn happiness_vector(labels: &[Label], topology: Topology) -> Vec<bool> {
    (0..labels.len())
        .map(|i| is_happy(labels, topology, i))
        .collect()
}

/// Number of happy agents.
pub fn happy_count(labels: &[Label], topology: Topology) -> usize {
    (0..labels.len())
        .filter(|&i| is_happy(labels, topology, i))
        .count()
}

/// Whether every agent is happy -- the absorbing predicate. An empty
/// sequence is vacuously absorbing.
pub fn is_absorbing(labels: &[Label], topology: Topology) -> bool {
    happy_count(labels, topology) == labels.len()
}
