//! Read-only view of simulation state.
//!
//! An owned copy for display and diagnostics consumers -- no references into
//! the live simulation.

use crate::happiness::Label;
use crate::topology::Topology;

/// An aggregated, read-only view of a simulation at one instant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SimulationSnapshot {
    /// Copy of the label sequence.
    pub labels: Vec<Label>,
    /// The adjacency model.
    pub topology: Topology,
    /// Per-position happiness against the copied labels.
    pub happiness: Vec<bool>,
    /// Number of happy agents.
    pub happy_count: usize,
    /// Whether the state is absorbing (every agent happy).
    pub absorbing: bool,
    /// Steps taken when the snapshot was captured.
    pub steps: u64,
}

impl SimulationSnapshot {
    /// Render the labels as a 0/1 string, e.g. `"11010"`.
    pub fn render_labels(&self) -> String {
        self.labels
            .iter()
            .map(|&label| if label { '1' } else { '0' })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_labels_as_bits() {
        let snap = SimulationSnapshot {
            labels: vec![true, true, false, true, false],
            topology: Topology::Ring,
            happiness: vec![true, true, false, false, false],
            happy_count: 2,
            absorbing: false,
            steps: 0,
        };
        assert_eq!(snap.render_labels(), "11010");
    }
}
