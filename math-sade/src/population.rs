//! Population of individuals evaluated on a single problem.

use std::fmt;

use ndarray::{Array1, Array2, Axis};
use rand::SeedableRng;
use rand::rngs::StdRng;
use serde::{Deserialize, Serialize};

use crate::argmin::{argmax, argmin};
use crate::error::{Result, SadeError};
use crate::init_latin_hypercube::init_latin_hypercube;
use crate::init_random::{init_random, random_decision_vector};
use crate::parallel_eval::{ParallelConfig, evaluate_population_parallel};
use crate::problem::{Problem, ProblemHandle};

/// Initialization scheme for the population.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Init {
    /// Uniform random initialization.
    #[default]
    Random,
    /// Latin Hypercube Sampling for better space coverage.
    LatinHypercube,
}

/// An ordered set of individuals, each a decision vector with its fitness.
///
/// Row `i` of [`get_x`](Population::get_x) and row `i` of
/// [`get_f`](Population::get_f) always describe the same individual: both are
/// replaced together by [`set_xf`](Population::set_xf).
#[derive(Clone)]
pub struct Population {
    problem: ProblemHandle,
    x: Array2<f64>,
    f: Array2<f64>,
    champion_x: Option<Array1<f64>>,
    champion_f: Option<Array1<f64>>,
    seed: u64,
    rng: StdRng,
}

impl Population {
    /// Creates an empty population on `problem`.
    ///
    /// # Errors
    ///
    /// Returns a problem error if the bounds are malformed.
    pub fn empty<P: Problem + 'static>(problem: P, seed: u64) -> Result<Self> {
        let problem = ProblemHandle::new(problem)?;
        let n = problem.dimension();
        let m = problem.num_objectives();
        Ok(Self {
            problem,
            x: Array2::zeros((0, n)),
            f: Array2::zeros((0, m)),
            champion_x: None,
            champion_f: None,
            seed,
            rng: StdRng::seed_from_u64(seed),
        })
    }

    /// Creates `size` uniformly random individuals and evaluates them.
    ///
    /// # Errors
    ///
    /// Returns a problem error if the bounds are malformed or the problem
    /// returns fitness vectors of the wrong length.
    pub fn new<P: Problem + 'static>(problem: P, size: usize, seed: u64) -> Result<Self> {
        Self::with_init(problem, size, seed, Init::Random, &ParallelConfig::default())
    }

    /// Creates `size` individuals with the chosen initialization scheme.
    ///
    /// The initial batch is evaluated according to `parallel`; the resulting
    /// population does not depend on the evaluation schedule.
    ///
    /// # Errors
    ///
    /// Same as [`Population::new`].
    pub fn with_init<P: Problem + 'static>(
        problem: P,
        size: usize,
        seed: u64,
        init: Init,
        parallel: &ParallelConfig,
    ) -> Result<Self> {
        let mut pop = Self::empty(problem, seed)?;
        let (lower, upper) = pop.problem.bounds();
        let x = match init {
            Init::Random => init_random(size, &lower, &upper, &mut pop.rng),
            Init::LatinHypercube => init_latin_hypercube(size, &lower, &upper, &mut pop.rng),
        };
        let f = evaluate_population_parallel(&x, &pop.problem, parallel)?;
        pop.x = x;
        pop.f = f;
        for i in 0..size {
            pop.update_champion(i);
        }
        Ok(pop)
    }

    /// Appends decision vector `x`, evaluating it once.
    ///
    /// # Errors
    ///
    /// Returns `SadeError::DimensionMismatch` if `x` has the wrong length.
    pub fn push_back(&mut self, x: Array1<f64>) -> Result<()> {
        let f = self.problem.fitness(&x)?;
        self.push_back_xf(x, f)
    }

    /// Appends `x` with an already known fitness `f`.
    ///
    /// # Errors
    ///
    /// Returns a dimension error if either vector has the wrong length.
    pub fn push_back_xf(&mut self, x: Array1<f64>, f: Array1<f64>) -> Result<()> {
        self.problem.check_x(&x)?;
        self.problem.check_f(&f)?;
        self.x
            .push(Axis(0), x.view())
            .map_err(|_| SadeError::DimensionMismatch {
                expected: self.problem.dimension(),
                got: x.len(),
            })?;
        self.f
            .push(Axis(0), f.view())
            .map_err(|_| SadeError::FitnessDimensionMismatch {
                expected: self.problem.num_objectives(),
                got: f.len(),
            })?;
        self.update_champion(self.size() - 1);
        Ok(())
    }

    /// Replaces individual `i` with `x`, evaluating it once.
    ///
    /// # Errors
    ///
    /// Returns `SadeError::IndexOutOfRange` or a dimension error.
    pub fn set_x(&mut self, i: usize, x: Array1<f64>) -> Result<()> {
        self.check_index(i)?;
        let f = self.problem.fitness(&x)?;
        self.set_xf(i, x, f)
    }

    /// Replaces decision vector and fitness of individual `i` together.
    ///
    /// # Errors
    ///
    /// Returns `SadeError::IndexOutOfRange` or a dimension error; on error
    /// the population is left untouched.
    pub fn set_xf(&mut self, i: usize, x: Array1<f64>, f: Array1<f64>) -> Result<()> {
        self.check_index(i)?;
        self.problem.check_x(&x)?;
        self.problem.check_f(&f)?;
        self.x.row_mut(i).assign(&x);
        self.f.row_mut(i).assign(&f);
        self.update_champion(i);
        Ok(())
    }

    fn check_index(&self, i: usize) -> Result<()> {
        if i >= self.size() {
            return Err(SadeError::IndexOutOfRange {
                index: i,
                size: self.size(),
            });
        }
        Ok(())
    }

    fn update_champion(&mut self, i: usize) {
        let candidate = self.f[[i, 0]];
        let improves = match &self.champion_f {
            Some(best) => candidate < best[0],
            None => true,
        };
        if improves {
            self.champion_x = Some(self.x.row(i).to_owned());
            self.champion_f = Some(self.f.row(i).to_owned());
        }
    }

    /// Decision vectors, one row per individual.
    pub fn get_x(&self) -> &Array2<f64> {
        &self.x
    }

    /// Fitness vectors, one row per individual.
    pub fn get_f(&self) -> &Array2<f64> {
        &self.f
    }

    /// Index of the individual with the lowest first objective.
    pub fn best_idx(&self) -> Option<usize> {
        if self.is_empty() {
            return None;
        }
        Some(argmin(self.f.column(0)).0)
    }

    /// Index of the individual with the highest first objective.
    pub fn worst_idx(&self) -> Option<usize> {
        if self.is_empty() {
            return None;
        }
        Some(argmax(self.f.column(0)).0)
    }

    /// Best decision vector ever stored in this population.
    pub fn champion_x(&self) -> Option<&Array1<f64>> {
        self.champion_x.as_ref()
    }

    /// Fitness of [`champion_x`](Population::champion_x).
    pub fn champion_f(&self) -> Option<&Array1<f64>> {
        self.champion_f.as_ref()
    }

    /// Number of individuals.
    pub fn size(&self) -> usize {
        self.x.nrows()
    }

    /// Whether the population holds no individual.
    pub fn is_empty(&self) -> bool {
        self.size() == 0
    }

    /// The problem this population is evaluated on.
    pub fn problem(&self) -> &ProblemHandle {
        &self.problem
    }

    /// Seed of the population's own random generator.
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Draws a uniformly random decision vector inside the problem bounds.
    pub fn random_decision_vector(&mut self) -> Array1<f64> {
        random_decision_vector(self.problem.lower(), self.problem.upper(), &mut self.rng)
    }
}

impl fmt::Debug for Population {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Population")
            .field("problem", &self.problem)
            .field("size", &self.size())
            .field("seed", &self.seed)
            .field("champion_f", &self.champion_f)
            .finish()
    }
}

impl fmt::Display for Population {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Problem name: {}", self.problem.name())?;
        let extra = self.problem.extra_info();
        if !extra.is_empty() {
            writeln!(f, "Extra info:{}", extra)?;
        }
        writeln!(f, "Population size: {}", self.size())?;
        writeln!(f, "Function evaluations: {}", self.problem.fevals())?;
        if let (Some(cx), Some(cf)) = (&self.champion_x, &self.champion_f) {
            writeln!(f, "Champion decision vector: {}", cx)?;
            writeln!(f, "Champion fitness: {}", cf)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::problems::{FnProblem, Sphere};
    use ndarray::array;

    #[test]
    fn test_random_population_within_bounds() {
        let pop = Population::new(Sphere::new(3), 20, 42).unwrap();
        assert_eq!(pop.size(), 20);
        assert_eq!(pop.get_x().dim(), (20, 3));
        assert_eq!(pop.get_f().dim(), (20, 1));
        assert_eq!(pop.problem().fevals(), 20);
        for row in pop.get_x().rows() {
            for &v in row.iter() {
                assert!((-5.12..=5.12).contains(&v));
            }
        }
    }

    #[test]
    fn test_latin_hypercube_population_within_bounds() {
        let pop = Population::with_init(
            Sphere::new(2),
            16,
            7,
            Init::LatinHypercube,
            &ParallelConfig::sequential(),
        )
        .unwrap();
        for row in pop.get_x().rows() {
            assert!(row.iter().all(|v| (-5.12..=5.12).contains(v)));
        }
        // one sample per stratum and dimension
        let width = 10.24 / 16.0;
        for j in 0..2 {
            let mut strata: Vec<usize> = pop
                .get_x()
                .column(j)
                .iter()
                .map(|&v| (((v + 5.12) / width).floor() as usize).min(15))
                .collect();
            strata.sort_unstable();
            assert_eq!(strata, (0..16).collect::<Vec<_>>());
        }
    }

    #[test]
    fn test_same_seed_same_population() {
        let a = Population::new(Sphere::new(4), 10, 3).unwrap();
        let b = Population::with_init(
            Sphere::new(4),
            10,
            3,
            Init::Random,
            &ParallelConfig::sequential(),
        )
        .unwrap();
        assert_eq!(a.get_x(), b.get_x());
        assert_eq!(a.get_f(), b.get_f());
    }

    #[test]
    fn test_best_worst_and_champion() {
        let mut pop = Population::empty(Sphere::new(1), 0).unwrap();
        assert_eq!(pop.best_idx(), None);
        for v in [2.0, -1.0, 3.0, 1.0, -3.0] {
            pop.push_back(array![v]).unwrap();
        }
        assert_eq!(pop.best_idx(), Some(1));
        assert_eq!(pop.worst_idx(), Some(2));
        assert_eq!(pop.champion_f().unwrap()[0], 1.0);

        pop.set_x(3, array![0.5]).unwrap();
        assert_eq!(pop.best_idx(), Some(3));
        assert_eq!(pop.champion_x().unwrap()[0], 0.5);

        // the champion survives even when the individual is overwritten
        pop.set_x(3, array![4.0]).unwrap();
        assert_eq!(pop.champion_f().unwrap()[0], 0.25);
    }

    #[test]
    fn test_set_xf_rejects_bad_input_atomically() {
        let mut pop = Population::new(Sphere::new(2), 8, 1).unwrap();
        let before_x = pop.get_x().clone();
        let before_f = pop.get_f().clone();

        let err = pop.set_xf(8, array![0.0, 0.0], array![0.0]).unwrap_err();
        assert!(matches!(err, SadeError::IndexOutOfRange { index: 8, size: 8 }));
        let err = pop.set_xf(0, array![0.0], array![0.0]).unwrap_err();
        assert!(matches!(err, SadeError::DimensionMismatch { .. }));
        let err = pop.set_xf(0, array![0.0, 0.0], array![0.0, 1.0]).unwrap_err();
        assert!(matches!(err, SadeError::FitnessDimensionMismatch { .. }));

        assert_eq!(pop.get_x(), &before_x);
        assert_eq!(pop.get_f(), &before_f);
    }

    #[test]
    fn test_unusable_problems_rejected_at_construction() {
        let err = Population::new(Sphere::new(0), 10, 1).unwrap_err();
        assert!(matches!(err, SadeError::EmptyDecisionSpace { .. }));

        struct NoObjective;
        impl Problem for NoObjective {
            fn fitness(&self, _x: &Array1<f64>) -> Array1<f64> {
                Array1::zeros(0)
            }
            fn bounds(&self) -> (Array1<f64>, Array1<f64>) {
                (array![-1.0], array![1.0])
            }
            fn num_objectives(&self) -> usize {
                0
            }
        }
        let err = Population::new(NoObjective, 10, 1).unwrap_err();
        assert!(matches!(err, SadeError::NoObjectives { .. }));
    }

    #[test]
    fn test_degenerate_bounds() {
        let p = FnProblem::new(array![-1.0, 2.0], array![1.0, 2.0], |x| x[0] * x[0]);
        let mut pop = Population::new(p, 10, 5).unwrap();
        assert!(pop.get_x().column(1).iter().all(|&v| v == 2.0));
        assert_eq!(pop.random_decision_vector()[1], 2.0);
    }
}
