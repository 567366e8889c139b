use ndarray::{Array1, Array2};
use rayon::prelude::*;

use crate::error::Result;
use crate::problem::ProblemHandle;

/// Parallel evaluation configuration for population initialization.
///
/// Only the initial batch evaluation is parallelized; the evolutionary loop
/// itself always runs on the calling thread.
#[derive(Debug, Clone)]
pub struct ParallelConfig {
    /// Enable parallel evaluation
    pub enabled: bool,
    /// Number of threads to use (None = use rayon default)
    pub num_threads: Option<usize>,
}

impl Default for ParallelConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            num_threads: None,
        }
    }
}

impl ParallelConfig {
    /// Sequential evaluation only.
    pub fn sequential() -> Self {
        Self {
            enabled: false,
            num_threads: None,
        }
    }
}

/// Evaluate every row of `population`, returning one fitness row per individual.
///
/// Results are index-aligned with the input regardless of scheduling, so the
/// output is identical to a sequential evaluation of a deterministic problem.
///
/// # Errors
///
/// Propagates the first dimension error reported by the problem handle.
pub(crate) fn evaluate_population_parallel(
    population: &Array2<f64>,
    problem: &ProblemHandle,
    config: &ParallelConfig,
) -> Result<Array2<f64>> {
    let npop = population.nrows();

    let results: Vec<Array1<f64>> = if !config.enabled || npop < 4 {
        // Sequential evaluation for small populations or when disabled
        (0..npop)
            .map(|i| problem.fitness(&population.row(i).to_owned()))
            .collect::<Result<_>>()?
    } else {
        if let Some(n) = config.num_threads {
            // Ignore error if global pool already set
            let _ = rayon::ThreadPoolBuilder::new()
                .num_threads(n)
                .build_global();
        }
        (0..npop)
            .into_par_iter()
            .map(|i| problem.fitness(&population.row(i).to_owned()))
            .collect::<Result<_>>()?
    };

    let mut fitness = Array2::<f64>::zeros((npop, problem.num_objectives()));
    for (i, f) in results.iter().enumerate() {
        fitness.row_mut(i).assign(f);
    }
    Ok(fitness)
}
