//! Error types for the self-adaptive Differential Evolution engine.
//!
//! Errors fall in three categories: configuration errors raised when the
//! engine is built, problem errors raised when a problem is unsuitable, and
//! input errors raised for malformed populations or decision vectors.

use thiserror::Error;

/// Errors that can occur while configuring or running the engine.
#[derive(Debug, Error)]
pub enum SadeError {
    /// Mutation variant is outside `[1, 18]`.
    #[error("mutation variant must be in [1, 18], got {variant}")]
    InvalidVariant {
        /// The rejected variant id
        variant: u32,
    },

    /// Self-adaptation scheme is outside `{1, 2}`.
    #[error("self-adaptation variant must be 1 (jDE) or 2 (iDE), got {variant}")]
    InvalidAdaptationVariant {
        /// The rejected scheme id
        variant: u32,
    },

    /// A variant name could not be parsed.
    #[error("unknown mutation variant: {name}")]
    UnknownVariantName {
        /// The rejected name
        name: String,
    },

    /// The problem declares non-linear constraints.
    #[error("{constraints} constraints detected in {problem}: the engine cannot deal with them")]
    ConstrainedProblem {
        /// Problem name
        problem: String,
        /// Number of declared constraints
        constraints: usize,
    },

    /// The problem has more than one objective.
    #[error("{objectives} objectives detected in {problem}: the engine needs exactly one")]
    MultiObjectiveProblem {
        /// Problem name
        problem: String,
        /// Number of declared objectives
        objectives: usize,
    },

    /// The problem is stochastic.
    #[error("{problem} appears to be stochastic: the engine cannot deal with it")]
    StochasticProblem {
        /// Problem name
        problem: String,
    },

    /// Lower and upper bounds have different lengths.
    #[error("bounds mismatch: lower has {lower_len} elements, upper has {upper_len}")]
    BoundsMismatch {
        /// Length of the lower bounds array
        lower_len: usize,
        /// Length of the upper bounds array
        upper_len: usize,
    },

    /// A lower bound exceeds its upper bound, or either is NaN.
    #[error("invalid bounds at index {index}: lower ({lower}) > upper ({upper})")]
    InvalidBounds {
        /// Index of the invalid bound pair
        index: usize,
        /// The lower bound value
        lower: f64,
        /// The upper bound value
        upper: f64,
    },

    /// A bound is infinite, so no point can be sampled uniformly.
    #[error("non-finite bounds at index {index}: [{lower}, {upper}]")]
    NonFiniteBounds {
        /// Index of the offending bound pair
        index: usize,
        /// The lower bound value
        lower: f64,
        /// The upper bound value
        upper: f64,
    },

    /// The decision space has no dimension.
    #[error("{problem} has an empty decision space")]
    EmptyDecisionSpace {
        /// Problem name
        problem: String,
    },

    /// The problem declares no objective.
    #[error("{problem} declares no objective")]
    NoObjectives {
        /// Problem name
        problem: String,
    },

    /// Translation vector length differs from the problem dimension.
    #[error("translation has {got} elements while the problem dimension is {expected}")]
    TranslationMismatch {
        /// Problem dimension
        expected: usize,
        /// Translation length
        got: usize,
    },

    /// Population is too small for the donor selection.
    #[error("{problem} needs at least {min} individuals in the population, {size} detected")]
    PopulationTooSmall {
        /// Problem name
        problem: String,
        /// Population size
        size: usize,
        /// Minimum admissible size
        min: usize,
    },

    /// A decision vector has the wrong length.
    #[error("decision vector dimension mismatch: expected {expected}, got {got}")]
    DimensionMismatch {
        /// Problem dimension
        expected: usize,
        /// Length provided
        got: usize,
    },

    /// A fitness vector has the wrong length.
    #[error("fitness dimension mismatch: expected {expected}, got {got}")]
    FitnessDimensionMismatch {
        /// Number of objectives
        expected: usize,
        /// Length provided
        got: usize,
    },

    /// An individual index is past the end of the population.
    #[error("individual index {index} out of range for population of size {size}")]
    IndexOutOfRange {
        /// Requested index
        index: usize,
        /// Population size
        size: usize,
    },

    /// No benchmark problem with this name.
    #[error("unknown problem: {name}")]
    UnknownProblem {
        /// The rejected name
        name: String,
    },
}

/// A specialized `Result` type for engine operations.
pub type Result<T> = std::result::Result<T, SadeError>;

impl SadeError {
    /// Returns `true` if the engine configuration was rejected.
    pub fn is_config_error(&self) -> bool {
        matches!(
            self,
            SadeError::InvalidVariant { .. }
                | SadeError::InvalidAdaptationVariant { .. }
                | SadeError::UnknownVariantName { .. }
        )
    }

    /// Returns `true` if the problem is unsuitable or malformed.
    pub fn is_problem_error(&self) -> bool {
        matches!(
            self,
            SadeError::ConstrainedProblem { .. }
                | SadeError::MultiObjectiveProblem { .. }
                | SadeError::StochasticProblem { .. }
                | SadeError::BoundsMismatch { .. }
                | SadeError::InvalidBounds { .. }
                | SadeError::NonFiniteBounds { .. }
                | SadeError::EmptyDecisionSpace { .. }
                | SadeError::NoObjectives { .. }
                | SadeError::TranslationMismatch { .. }
        )
    }

    /// Returns `true` if a population, vector or index was rejected.
    pub fn is_input_error(&self) -> bool {
        matches!(
            self,
            SadeError::PopulationTooSmall { .. }
                | SadeError::DimensionMismatch { .. }
                | SadeError::FitnessDimensionMismatch { .. }
                | SadeError::IndexOutOfRange { .. }
                | SadeError::UnknownProblem { .. }
        )
    }
}
