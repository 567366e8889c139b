//! Per-individual control parameters `F` and `CR` and their update rules.

use std::fmt;

use rand::Rng;
use rand_distr::StandardNormal;
use serde::{Deserialize, Serialize};

use crate::error::{Result, SadeError};

/// Scheme used to adapt `F` and `CR`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Adaptation {
    /// jDE: keep the stored values with probability 0.9, else resample
    #[default]
    Jde,
    /// iDE: recombine the donors' stored values with normal perturbations
    Ide,
}

impl Adaptation {
    /// Maps `1` to jDE and `2` to iDE.
    ///
    /// # Errors
    ///
    /// Returns `SadeError::InvalidAdaptationVariant` for any other id.
    pub fn from_id(id: u32) -> Result<Self> {
        match id {
            1 => Ok(Adaptation::Jde),
            2 => Ok(Adaptation::Ide),
            _ => Err(SadeError::InvalidAdaptationVariant { variant: id }),
        }
    }

    /// Numeric id of the scheme.
    pub fn id(self) -> u32 {
        match self {
            Adaptation::Jde => 1,
            Adaptation::Ide => 2,
        }
    }

    /// Fresh `(F, CR)` arrays for `npop` individuals.
    ///
    /// For each individual CR is drawn before F.
    pub(crate) fn init<R: Rng + ?Sized>(self, npop: usize, rng: &mut R) -> (Vec<f64>, Vec<f64>) {
        let mut f = Vec::with_capacity(npop);
        let mut cr = Vec::with_capacity(npop);
        for _ in 0..npop {
            match self {
                Adaptation::Jde => {
                    cr.push(rng.random::<f64>());
                    f.push(rng.random::<f64>() * 0.9 + 0.1);
                }
                Adaptation::Ide => {
                    cr.push(normal(rng) * 0.15 + 0.5);
                    f.push(normal(rng) * 0.15 + 0.5);
                }
            }
        }
        (f, cr)
    }
}

impl fmt::Display for Adaptation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Adaptation::Jde => write!(f, "1 - jDE"),
            Adaptation::Ide => write!(f, "2 - iDE"),
        }
    }
}

/// Stored parameters the iDE recurrences read from.
pub(crate) struct ParamPool<'a> {
    pub f: &'a [f64],
    pub cr: &'a [f64],
    /// `F` of the generation champion
    pub best_f: f64,
    /// `CR` of the generation champion
    pub best_cr: f64,
}

/// One standard normal deviate.
pub(crate) fn normal<R: Rng + ?Sized>(rng: &mut R) -> f64 {
    rng.sample(StandardNormal)
}

/// jDE update of `(F, CR)` for one individual.
pub(crate) fn jde<R: Rng + ?Sized>(f_i: f64, cr_i: f64, rng: &mut R) -> (f64, f64) {
    let f = if rng.random::<f64>() < 0.9 {
        f_i
    } else {
        rng.random::<f64>() * 0.9 + 0.1
    };
    let cr = if rng.random::<f64>() < 0.9 {
        cr_i
    } else {
        rng.random::<f64>()
    };
    (f, cr)
}
