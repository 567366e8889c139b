//! Self-adaptive Differential Evolution library.
//!
//! This crate provides a Rust implementation of self-adaptive Differential
//! Evolution (DE), a population-based stochastic optimizer for box-bounded,
//! single-objective, unconstrained continuous problems. Each individual carries
//! its own amplification factor `F` and crossover probability `CR`, adapted
//! with jDE or iDE.
//!
//! # Features
//!
//! - 18 mutation/crossover variants (best/1, rand/1, ... rand-to-best-and-current/2,
//!   each with exponential or binomial crossover)
//! - jDE and iDE parameter self-adaptation, optionally kept across calls
//! - Flatness-based early termination and a per-generation log
//! - Random or Latin Hypercube population initialization
//! - Parallel evaluation of the initial population
//! - Standard benchmark problems and a translation decorator
//!
//! # Example
//!
//! ```rust
//! use math_audio_sade::{Population, Sade, SadeConfigBuilder};
//! use math_audio_sade::problems::FnProblem;
//! use ndarray::{Array1, array};
//!
//! // Minimize the sphere function: f(x) = sum(x_i^2)
//! let sphere = FnProblem::new(array![-5.0, -5.0], array![5.0, 5.0], |x: &Array1<f64>| {
//!     x.iter().map(|&xi| xi * xi).sum::<f64>()
//! });
//! let config = SadeConfigBuilder::new()
//!     .generations(100)
//!     .seed(42)
//!     .build()
//!     .expect("invalid config");
//!
//! let mut algo = Sade::new(config).expect("invalid config");
//! let pop = Population::new(sphere, 20, 42).expect("valid problem");
//! let pop = algo.evolve(pop).expect("evolution should succeed");
//!
//! assert!(pop.champion_f().unwrap()[0] < 1e-3);
//! ```
#![doc = include_str!("../README.md")]
#![warn(missing_docs)]

pub mod error;
pub use error::{Result, SadeError};

/// Index of the best and worst entries of a fitness column.
pub(crate) mod argmin;

/// Utilities for selecting distinct random indices from a population.
pub(crate) mod distinct_indices;
/// Latin Hypercube Sampling initialization strategy.
pub(crate) mod init_latin_hypercube;
/// Random uniform initialization strategy.
pub(crate) mod init_random;

/// Best/1 mutation strategy: generation champion plus one difference vector.
pub(crate) mod mutant_best1;
/// Best/2 mutation strategy: generation champion plus two difference vectors.
pub(crate) mod mutant_best2;
/// Best/3 mutation strategy: generation champion plus three difference vectors.
pub(crate) mod mutant_best3;
/// Rand/1 mutation strategy: random individual plus one difference vector.
pub(crate) mod mutant_rand1;
/// Rand/2 mutation strategy: random individual plus two difference vectors.
pub(crate) mod mutant_rand2;
/// Rand/3 mutation strategy: random individual plus three difference vectors.
pub(crate) mod mutant_rand3;
/// Rand-to-best/1 mutation: moves the parent towards the champion.
pub(crate) mod mutant_rand_to_best1;
/// Rand-to-best-and-current/2 mutation.
pub(crate) mod mutant_rand_to_best_and_current2;
/// Rand-to-current/2 mutation.
pub(crate) mod mutant_rand_to_current2;

/// Binomial (uniform) crossover implementation.
pub(crate) mod crossover_binomial;
/// Exponential crossover implementation.
pub(crate) mod crossover_exponential;

/// Parallel population evaluation support.
pub mod parallel_eval;
/// Population container.
pub mod population;
/// Problem trait and evaluation-counting handle.
pub mod problem;
/// Standard benchmark problems.
pub mod problems;
/// CSV export of the evolution log.
pub mod recorder;
/// The self-adaptive DE engine.
pub mod sade;
/// Comprehensive tests for the engine.
#[cfg(test)]
mod sade_tests;
/// F and CR adaptation schemes.
pub mod self_adaptation;
/// Translation meta-problem.
pub mod translate;
/// Strategy table for the 18 variants.
pub mod variant;

pub use parallel_eval::ParallelConfig;
pub use population::{Init, Population};
pub use problem::{Problem, ProblemHandle};
pub use sade::{ExitReason, LogLine, MIN_POP_SIZE, Sade, SadeConfig, SadeConfigBuilder};
pub use self_adaptation::Adaptation;
pub use translate::Translate;
pub use variant::{Crossover, MutationFamily, Variant};
