//! Problem capability trait and the type-erased handle used by populations.

use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use ndarray::Array1;

use crate::error::{Result, SadeError};

/// A black-box optimization problem.
///
/// Only [`fitness`](Problem::fitness) and [`bounds`](Problem::bounds) are
/// required; the remaining methods describe properties the engine checks
/// before running.
pub trait Problem: Send + Sync {
    /// Evaluates the fitness vector of decision vector `x`.
    fn fitness(&self, x: &Array1<f64>) -> Array1<f64>;

    /// Box bounds `(lower, upper)` of the decision space.
    fn bounds(&self) -> (Array1<f64>, Array1<f64>);

    /// Dimension of the decision space.
    fn dimension(&self) -> usize {
        self.bounds().0.len()
    }

    /// Number of objectives.
    fn num_objectives(&self) -> usize {
        1
    }

    /// Number of (equality plus inequality) constraints.
    fn num_constraints(&self) -> usize {
        0
    }

    /// Whether repeated evaluations of the same point may differ.
    fn is_stochastic(&self) -> bool {
        false
    }

    /// Human readable name.
    fn name(&self) -> String {
        "unnamed problem".to_string()
    }

    /// Problem-specific details appended to the description.
    fn extra_info(&self) -> String {
        String::new()
    }
}

impl<P: Problem + ?Sized> Problem for Box<P> {
    fn fitness(&self, x: &Array1<f64>) -> Array1<f64> {
        (**self).fitness(x)
    }
    fn bounds(&self) -> (Array1<f64>, Array1<f64>) {
        (**self).bounds()
    }
    fn dimension(&self) -> usize {
        (**self).dimension()
    }
    fn num_objectives(&self) -> usize {
        (**self).num_objectives()
    }
    fn num_constraints(&self) -> usize {
        (**self).num_constraints()
    }
    fn is_stochastic(&self) -> bool {
        (**self).is_stochastic()
    }
    fn name(&self) -> String {
        (**self).name()
    }
    fn extra_info(&self) -> String {
        (**self).extra_info()
    }
}

/// Type-erased problem with cached bounds and an evaluation counter.
///
/// Every call to [`fitness`](ProblemHandle::fitness) increments the counter
/// exactly once. The counter is atomic so a batch of evaluations can share
/// the handle across threads. Cloning shares the problem and copies the
/// current count.
pub struct ProblemHandle {
    inner: Arc<dyn Problem>,
    lower: Array1<f64>,
    upper: Array1<f64>,
    nobj: usize,
    fevals: AtomicU64,
}

impl ProblemHandle {
    /// Wraps `problem`, validating its bounds.
    ///
    /// # Errors
    ///
    /// Returns `SadeError::BoundsMismatch` if the bounds differ in length and
    /// `SadeError::InvalidBounds` if a lower bound exceeds its upper bound or
    /// either is NaN, and `SadeError::NonFiniteBounds` if the box is unbounded.
    /// Empty bounds give `SadeError::EmptyDecisionSpace` and a problem without
    /// objectives gives `SadeError::NoObjectives`.
    pub fn new<P: Problem + 'static>(problem: P) -> Result<Self> {
        let (lower, upper) = problem.bounds();
        if lower.len() != upper.len() {
            return Err(SadeError::BoundsMismatch {
                lower_len: lower.len(),
                upper_len: upper.len(),
            });
        }
        if lower.is_empty() {
            return Err(SadeError::EmptyDecisionSpace {
                problem: problem.name(),
            });
        }
        for (index, (&lo, &hi)) in lower.iter().zip(upper.iter()).enumerate() {
            // NaN fails the comparison on purpose
            if !(lo <= hi) {
                return Err(SadeError::InvalidBounds {
                    index,
                    lower: lo,
                    upper: hi,
                });
            }
            if !(hi - lo).is_finite() {
                return Err(SadeError::NonFiniteBounds {
                    index,
                    lower: lo,
                    upper: hi,
                });
            }
        }
        let nobj = problem.num_objectives();
        if nobj == 0 {
            return Err(SadeError::NoObjectives {
                problem: problem.name(),
            });
        }
        Ok(Self {
            inner: Arc::new(problem),
            lower,
            upper,
            nobj,
            fevals: AtomicU64::new(0),
        })
    }

    /// Evaluates `x`, checking input and output dimensions.
    ///
    /// # Errors
    ///
    /// Returns `SadeError::DimensionMismatch` if `x` has the wrong length and
    /// `SadeError::FitnessDimensionMismatch` if the problem returns a fitness
    /// vector whose length differs from its number of objectives.
    pub fn fitness(&self, x: &Array1<f64>) -> Result<Array1<f64>> {
        self.check_x(x)?;
        let f = self.inner.fitness(x);
        self.fevals.fetch_add(1, Ordering::Relaxed);
        self.check_f(&f)?;
        Ok(f)
    }

    pub(crate) fn check_x(&self, x: &Array1<f64>) -> Result<()> {
        if x.len() != self.lower.len() {
            return Err(SadeError::DimensionMismatch {
                expected: self.lower.len(),
                got: x.len(),
            });
        }
        Ok(())
    }

    pub(crate) fn check_f(&self, f: &Array1<f64>) -> Result<()> {
        if f.len() != self.nobj {
            return Err(SadeError::FitnessDimensionMismatch {
                expected: self.nobj,
                got: f.len(),
            });
        }
        Ok(())
    }

    /// Lower bounds.
    pub fn lower(&self) -> &Array1<f64> {
        &self.lower
    }

    /// Upper bounds.
    pub fn upper(&self) -> &Array1<f64> {
        &self.upper
    }

    /// Bounds as an owned `(lower, upper)` pair.
    pub fn bounds(&self) -> (Array1<f64>, Array1<f64>) {
        (self.lower.clone(), self.upper.clone())
    }

    /// Dimension of the decision space.
    pub fn dimension(&self) -> usize {
        self.lower.len()
    }

    /// Number of objectives.
    pub fn num_objectives(&self) -> usize {
        self.nobj
    }

    /// Number of constraints.
    pub fn num_constraints(&self) -> usize {
        self.inner.num_constraints()
    }

    /// Whether the wrapped problem is stochastic.
    pub fn is_stochastic(&self) -> bool {
        self.inner.is_stochastic()
    }

    /// Name of the wrapped problem.
    pub fn name(&self) -> String {
        self.inner.name()
    }

    /// Extra information reported by the wrapped problem.
    pub fn extra_info(&self) -> String {
        self.inner.extra_info()
    }

    /// Number of fitness evaluations performed so far.
    pub fn fevals(&self) -> u64 {
        self.fevals.load(Ordering::Relaxed)
    }
}

impl Clone for ProblemHandle {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
            lower: self.lower.clone(),
            upper: self.upper.clone(),
            nobj: self.nobj,
            fevals: AtomicU64::new(self.fevals()),
        }
    }
}

impl fmt::Debug for ProblemHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProblemHandle")
            .field("name", &self.name())
            .field("dimension", &self.dimension())
            .field("num_objectives", &self.nobj)
            .field("fevals", &self.fevals())
            .finish()
    }
}
