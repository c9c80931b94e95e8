/// Errors from constructing or operating on a [`Simulation`].
///
/// [`Simulation`]: crate::engine::Simulation
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SimError {
    /// The initial label sequence was empty. Neighbor lookups are undefined
    /// for a population of zero agents.
    #[error("population must contain at least one agent")]
    EmptyPopulation,

    /// The mistake probability was outside [0, 1].
    #[error("mistake probability {value} is outside [0, 1]")]
    MistakeProbabilityOutOfRange { value: f64 },

    /// A position index fell outside the population.
    #[error("position {index} is out of range for a population of {len}")]
    PositionOutOfRange { index: usize, len: usize },
}
