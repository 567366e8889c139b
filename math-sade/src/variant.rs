//! Strategy table for the eighteen mutation/crossover variants.
//!
//! A [`MutationFamily`] owns both the decision-vector recurrence and the
//! matching iDE parameter recurrence, so every donor pattern is written once.

use std::fmt;
use std::str::FromStr;

use ndarray::{Array1, Array2};
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::{Result, SadeError};
use crate::mutant_best1::{ide_best1, mutant_best1};
use crate::mutant_best2::{ide_best2, mutant_best2};
use crate::mutant_best3::{ide_best3, mutant_best3};
use crate::mutant_rand_to_best_and_current2::{
    ide_rand_to_best_and_current2, mutant_rand_to_best_and_current2,
};
use crate::mutant_rand_to_best1::{ide_rand_to_best1, mutant_rand_to_best1};
use crate::mutant_rand_to_current2::{ide_rand_to_current2, mutant_rand_to_current2};
use crate::mutant_rand1::{ide_rand1, mutant_rand1};
use crate::mutant_rand2::{ide_rand2, mutant_rand2};
use crate::mutant_rand3::{ide_rand3, mutant_rand3};
use crate::self_adaptation::ParamPool;

/// Vectors a mutation reads for individual `i`.
pub(crate) struct Donors<'a> {
    /// Index of the parent
    pub i: usize,
    /// Donor indices, distinct, drawn for this individual
    pub r: &'a [usize],
    /// Decision vectors of the previous generation
    pub pop: &'a Array2<f64>,
    /// Generation champion
    pub best: &'a Array1<f64>,
}

/// Structural recurrence of a mutation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MutationFamily {
    /// `b + F(x_r1 - x_r2)`
    Best1,
    /// `x_r0 + F(x_r1 - x_r2)`
    Rand1,
    /// `x_i + F(b - x_i) + F(x_r0 - x_r1)`
    RandToBest1,
    /// `b + F(x_r0 - x_r1) + F(x_r2 - x_r3)`
    Best2,
    /// `x_r4 + F(x_r0 - x_r1) + F(x_r2 - x_r3)`
    Rand2,
    /// `x_r0 + F(x_r1 - x_r2) + F(x_r3 - x_r4) + F(x_r5 - x_r6)`
    Rand3,
    /// `b + F(x_r1 - x_r2) + F(x_r3 - x_r4) + F(x_r5 - x_r6)`
    Best3,
    /// `x_r0 + F(x_r1 - x_i) + F(x_r2 - x_r3)`
    RandToCurrent2,
    /// `x_r0 + F(x_r1 - x_i) - F(x_r2 - b)`
    RandToBestAndCurrent2,
}

impl MutationFamily {
    /// Number of donor indices drawn per individual.
    pub fn donors(self) -> usize {
        match self {
            MutationFamily::Rand3 | MutationFamily::Best3 => 7,
            _ => 5,
        }
    }

    pub(crate) fn mutant(self, d: &Donors<'_>, f: f64) -> Array1<f64> {
        match self {
            MutationFamily::Best1 => mutant_best1(d, f),
            MutationFamily::Rand1 => mutant_rand1(d, f),
            MutationFamily::RandToBest1 => mutant_rand_to_best1(d, f),
            MutationFamily::Best2 => mutant_best2(d, f),
            MutationFamily::Rand2 => mutant_rand2(d, f),
            MutationFamily::Rand3 => mutant_rand3(d, f),
            MutationFamily::Best3 => mutant_best3(d, f),
            MutationFamily::RandToCurrent2 => mutant_rand_to_current2(d, f),
            MutationFamily::RandToBestAndCurrent2 => mutant_rand_to_best_and_current2(d, f),
        }
    }

    /// iDE parameters `(F, CR)`; all F deviates are drawn before CR's.
    pub(crate) fn adapt<R: Rng + ?Sized>(
        self,
        d: &Donors<'_>,
        p: &ParamPool<'_>,
        rng: &mut R,
    ) -> (f64, f64) {
        match self {
            MutationFamily::Best1 => ide_best1(d, p, rng),
            MutationFamily::Rand1 => ide_rand1(d, p, rng),
            MutationFamily::RandToBest1 => ide_rand_to_best1(d, p, rng),
            MutationFamily::Best2 => ide_best2(d, p, rng),
            MutationFamily::Rand2 => ide_rand2(d, p, rng),
            MutationFamily::Rand3 => ide_rand3(d, p, rng),
            MutationFamily::Best3 => ide_best3(d, p, rng),
            MutationFamily::RandToCurrent2 => ide_rand_to_current2(d, p, rng),
            MutationFamily::RandToBestAndCurrent2 => ide_rand_to_best_and_current2(d, p, rng),
        }
    }

    fn label(self) -> &'static str {
        match self {
            MutationFamily::Best1 => "best/1",
            MutationFamily::Rand1 => "rand/1",
            MutationFamily::RandToBest1 => "rand-to-best/1",
            MutationFamily::Best2 => "best/2",
            MutationFamily::Rand2 => "rand/2",
            MutationFamily::Rand3 => "rand/3",
            MutationFamily::Best3 => "best/3",
            MutationFamily::RandToCurrent2 => "rand-to-current/2",
            MutationFamily::RandToBestAndCurrent2 => "rand-to-best-and-current/2",
        }
    }
}

/// Crossover type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Crossover {
    /// Exponential crossover (contiguous run)
    Exponential,
    /// Binomial (uniform) crossover
    Binomial,
}

/// One of the eighteen numbered strategies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Variant {
    /// Mutation recurrence
    pub family: MutationFamily,
    /// Crossover applied to the mutant
    pub crossover: Crossover,
}

const TABLE: [Variant; 18] = {
    use Crossover::{Binomial as Bin, Exponential as Exp};
    use MutationFamily::*;
    [
        Variant { family: Best1, crossover: Exp },
        Variant { family: Rand1, crossover: Exp },
        Variant { family: RandToBest1, crossover: Exp },
        Variant { family: Best2, crossover: Exp },
        Variant { family: Rand2, crossover: Exp },
        Variant { family: Best1, crossover: Bin },
        Variant { family: Rand1, crossover: Bin },
        Variant { family: RandToBest1, crossover: Bin },
        Variant { family: Best2, crossover: Bin },
        Variant { family: Rand2, crossover: Bin },
        Variant { family: Rand3, crossover: Exp },
        Variant { family: Rand3, crossover: Bin },
        Variant { family: Best3, crossover: Exp },
        Variant { family: Best3, crossover: Bin },
        Variant { family: RandToCurrent2, crossover: Exp },
        Variant { family: RandToCurrent2, crossover: Bin },
        Variant { family: RandToBestAndCurrent2, crossover: Exp },
        Variant { family: RandToBestAndCurrent2, crossover: Bin },
    ]
};

impl Variant {
    /// Looks up a variant by its number in `[1, 18]`.
    ///
    /// # Errors
    ///
    /// Returns `SadeError::InvalidVariant` outside that range.
    pub fn from_id(id: u32) -> Result<Self> {
        match id {
            1..=18 => Ok(TABLE[(id - 1) as usize]),
            _ => Err(SadeError::InvalidVariant { variant: id }),
        }
    }

    /// Number of this variant in `[1, 18]`.
    pub fn id(self) -> u32 {
        TABLE
            .iter()
            .position(|&v| v == self)
            .map_or(0, |p| p as u32 + 1)
    }

    /// All variants in numeric order.
    pub fn all() -> impl Iterator<Item = Variant> {
        TABLE.into_iter()
    }
}

impl fmt::Display for Variant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let x = match self.crossover {
            Crossover::Exponential => "exp",
            Crossover::Binomial => "bin",
        };
        write!(f, "{}/{}", self.family.label(), x)
    }
}

impl FromStr for Variant {
    type Err = SadeError;
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let t: String = s
            .to_lowercase()
            .chars()
            .filter(|c| !matches!(c, '-' | '_' | '/'))
            .collect();
        if let Ok(id) = t.parse::<u32>() {
            return Variant::from_id(id);
        }
        let (stem, crossover) = if let Some(stem) = t.strip_suffix("exp") {
            (stem, Crossover::Exponential)
        } else if let Some(stem) = t.strip_suffix("bin") {
            (stem, Crossover::Binomial)
        } else {
            return Err(SadeError::UnknownVariantName { name: s.to_string() });
        };
        let family = match stem {
            "best1" => MutationFamily::Best1,
            "rand1" => MutationFamily::Rand1,
            "randtobest1" => MutationFamily::RandToBest1,
            "best2" => MutationFamily::Best2,
            "rand2" => MutationFamily::Rand2,
            "rand3" => MutationFamily::Rand3,
            "best3" => MutationFamily::Best3,
            "randtocurrent2" => MutationFamily::RandToCurrent2,
            "randtobestandcurrent2" => MutationFamily::RandToBestAndCurrent2,
            _ => return Err(SadeError::UnknownVariantName { name: s.to_string() }),
        };
        Ok(Variant { family, crossover })
    }
}
