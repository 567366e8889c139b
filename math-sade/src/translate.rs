//! Meta-problem shifting the whole search space by a fixed vector.

use std::fmt;

use ndarray::Array1;
use serde::{Deserialize, Serialize};

use crate::error::{Result, SadeError};
use crate::problem::Problem;

/// Translates a problem's decision space by `translation`.
///
/// The optimum of the translated problem sits at the inner optimum plus the
/// translation; bounds are shifted by the same amount.
///
/// Serializes as `{ "inner": ..., "translation": [...] }`; deserialization
/// checks the translation length like [`Translate::new`].
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(try_from = "TranslateParts<P>")]
#[serde(bound(
    serialize = "P: Serialize",
    deserialize = "P: Problem + Deserialize<'de>"
))]
pub struct Translate<P: Problem> {
    inner: P,
    translation: Array1<f64>,
}

#[derive(Deserialize)]
struct TranslateParts<P> {
    inner: P,
    translation: Array1<f64>,
}

impl<P: Problem> TryFrom<TranslateParts<P>> for Translate<P> {
    type Error = SadeError;

    fn try_from(parts: TranslateParts<P>) -> Result<Self> {
        Self::new(parts.inner, parts.translation)
    }
}

impl<P: Problem> Translate<P> {
    /// Wraps `inner` with the given translation vector.
    ///
    /// # Errors
    ///
    /// Returns `SadeError::TranslationMismatch` if the translation length is
    /// not the problem dimension.
    pub fn new(inner: P, translation: Array1<f64>) -> Result<Self> {
        let dim = inner.dimension();
        if translation.len() != dim {
            return Err(SadeError::TranslationMismatch {
                expected: dim,
                got: translation.len(),
            });
        }
        Ok(Self { inner, translation })
    }

    /// The translation vector.
    pub fn translation(&self) -> &Array1<f64> {
        &self.translation
    }

    /// The wrapped problem.
    pub fn inner(&self) -> &P {
        &self.inner
    }
}

impl<P: Problem> Problem for Translate<P> {
    fn fitness(&self, x: &Array1<f64>) -> Array1<f64> {
        self.inner.fitness(&(x - &self.translation))
    }

    fn bounds(&self) -> (Array1<f64>, Array1<f64>) {
        let (lo, hi) = self.inner.bounds();
        (lo + &self.translation, hi + &self.translation)
    }

    fn dimension(&self) -> usize {
        self.inner.dimension()
    }

    fn num_objectives(&self) -> usize {
        self.inner.num_objectives()
    }

    fn num_constraints(&self) -> usize {
        self.inner.num_constraints()
    }

    fn is_stochastic(&self) -> bool {
        self.inner.is_stochastic()
    }

    fn name(&self) -> String {
        format!("{} [translated]", self.inner.name())
    }

    fn extra_info(&self) -> String {
        format!(
            "{}\n\tTranslation Vector: {}",
            self.inner.extra_info(),
            self.translation
        )
    }
}

impl<P: Problem> fmt::Display for Translate<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Problem name: {}", self.name())?;
        writeln!(f, "Dimension: {}", self.dimension())?;
        write!(f, "Extra info:{}", self.extra_info())
    }
}
