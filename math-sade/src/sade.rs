//! Self-adaptive Differential Evolution engine.
//!
//! Each call to [`Sade::evolve`] runs up to `generations` generations on a
//! population. Every individual carries its own amplification factor `F` and
//! crossover probability `CR`, adapted either with jDE or with iDE (see
//! [`Adaptation`]). Parents and donors are read from the previous
//! generation's snapshot, while the generation champion used by the `best`
//! strategies is refreshed only between generations.

use std::fmt;

use ndarray::{Array1, Array2};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha12Rng;
use serde::{Deserialize, Serialize};

use crate::argmin::{argmax, argmin};
use crate::crossover_binomial::binomial_crossover;
use crate::crossover_exponential::exponential_crossover;
use crate::distinct_indices::distinct_indices;
use crate::error::{Result, SadeError};
use crate::init_random::uniform_real_from_range;
use crate::population::Population;
use crate::self_adaptation::{Adaptation, ParamPool, jde};
use crate::variant::{Crossover, Donors, Variant};

/// Smallest population the donor selection can work with.
pub const MIN_POP_SIZE: usize = 7;

/// Generations between two flatness checks.
const CHECK_PERIOD: u32 = 40;

/// Log lines between two repetitions of the column header.
const HEADER_PERIOD: u32 = 50;

/// Configuration of the engine.
///
/// Use [`SadeConfigBuilder`] to get a validated configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SadeConfig {
    /// Number of generations per `evolve` call (0 makes `evolve` a no-op).
    pub generations: u32,
    /// Mutation variant in `[1, 18]`.
    pub variant: u32,
    /// Adaptation scheme: 1 for jDE, 2 for iDE.
    pub variant_adptv: u32,
    /// Stop when the best/worst fitness gap falls below this value.
    pub f_tol: f64,
    /// Stop when the best/worst L1 distance falls below this value.
    pub x_tol: f64,
    /// Keep `F` and `CR` across `evolve` calls.
    pub memory: bool,
    /// Random seed (None draws one from the thread RNG).
    pub seed: Option<u64>,
    /// Log one line every `verbosity` generations (0 disables logging).
    pub verbosity: u32,
}

impl Default for SadeConfig {
    fn default() -> Self {
        Self {
            generations: 1,
            variant: 2,
            variant_adptv: 1,
            f_tol: 1e-6,
            x_tol: 1e-6,
            memory: false,
            seed: None,
            verbosity: 0,
        }
    }
}

/// Fluent builder for `SadeConfig`.
///
/// # Example
///
/// ```rust
/// use math_audio_sade::SadeConfigBuilder;
///
/// let config = SadeConfigBuilder::new()
///     .generations(200)
///     .variant(7)
///     .variant_adptv(2)
///     .seed(42)
///     .build()
///     .expect("valid configuration");
/// assert_eq!(config.variant, 7);
/// ```
pub struct SadeConfigBuilder {
    cfg: SadeConfig,
}

impl Default for SadeConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl SadeConfigBuilder {
    /// Creates a new builder with default configuration.
    pub fn new() -> Self {
        Self {
            cfg: SadeConfig::default(),
        }
    }
    /// Sets the number of generations.
    pub fn generations(mut self, v: u32) -> Self {
        self.cfg.generations = v;
        self
    }
    /// Sets the mutation variant.
    pub fn variant(mut self, v: u32) -> Self {
        self.cfg.variant = v;
        self
    }
    /// Sets the adaptation scheme.
    pub fn variant_adptv(mut self, v: u32) -> Self {
        self.cfg.variant_adptv = v;
        self
    }
    /// Sets the fitness tolerance.
    pub fn f_tol(mut self, v: f64) -> Self {
        self.cfg.f_tol = v;
        self
    }
    /// Sets the decision vector tolerance.
    pub fn x_tol(mut self, v: f64) -> Self {
        self.cfg.x_tol = v;
        self
    }
    /// Keeps adapted parameters between calls.
    pub fn memory(mut self, v: bool) -> Self {
        self.cfg.memory = v;
        self
    }
    /// Sets the random seed.
    pub fn seed(mut self, v: u64) -> Self {
        self.cfg.seed = Some(v);
        self
    }
    /// Sets the log period.
    pub fn verbosity(mut self, v: u32) -> Self {
        self.cfg.verbosity = v;
        self
    }
    /// Validates and returns the configuration.
    ///
    /// # Errors
    ///
    /// Returns `SadeError::InvalidVariant` or
    /// `SadeError::InvalidAdaptationVariant` for out-of-range ids.
    pub fn build(self) -> Result<SadeConfig> {
        Variant::from_id(self.cfg.variant)?;
        Adaptation::from_id(self.cfg.variant_adptv)?;
        Ok(self.cfg)
    }
}

/// One log entry, recorded every `verbosity` generations.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LogLine {
    /// Generation number, starting at 1
    #[serde(rename = "gen")]
    pub generation: u32,
    /// Fitness evaluations spent in this `evolve` call
    pub fevals: u64,
    /// Best fitness in the population
    pub best: f64,
    /// `F` of the generation champion
    pub f: f64,
    /// `CR` of the generation champion
    pub cr: f64,
    /// L1 distance between best and worst decision vectors
    pub dx: f64,
    /// Fitness gap between best and worst individuals
    pub df: f64,
}

/// Why the last `evolve` call returned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ExitReason {
    /// Population collapsed in decision space
    XTol,
    /// Population collapsed in fitness
    FTol,
    /// Generation budget exhausted
    Generations,
    /// Zero generations requested
    NoGenerations,
}

impl fmt::Display for ExitReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExitReason::XTol => write!(f, "xtol"),
            ExitReason::FTol => write!(f, "ftol"),
            ExitReason::Generations => write!(f, "generations"),
            ExitReason::NoGenerations => write!(f, "no generations"),
        }
    }
}

/// Mutable state owned by the engine between calls.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct SadeState {
    rng: ChaCha12Rng,
    f: Vec<f64>,
    cr: Vec<f64>,
    log: Vec<LogLine>,
    last_exit: Option<ExitReason>,
}

/// Self-adaptive Differential Evolution.
///
/// The engine serializes with its full state (configuration, seed, stored
/// `F`/`CR`, random generator position and log), so a restored engine
/// continues exactly where the saved one stopped.
///
/// # Example
///
/// ```rust
/// use math_audio_sade::{Population, Sade, SadeConfigBuilder, problems::Sphere};
///
/// let config = SadeConfigBuilder::new().generations(100).seed(1).build().unwrap();
/// let mut algo = Sade::new(config).unwrap();
/// let pop = Population::new(Sphere::new(2), 20, 7).unwrap();
/// let pop = algo.evolve(pop).unwrap();
/// assert!(pop.champion_f().unwrap()[0] < 1e-2);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(try_from = "SadeSnapshot", into = "SadeSnapshot")]
pub struct Sade {
    config: SadeConfig,
    variant: Variant,
    adaptation: Adaptation,
    seed: u64,
    state: SadeState,
}

/// Serialized form of [`Sade`]; variant and scheme are rebuilt from the config.
#[derive(Serialize, Deserialize)]
struct SadeSnapshot {
    config: SadeConfig,
    seed: u64,
    state: SadeState,
}

impl From<Sade> for SadeSnapshot {
    fn from(algo: Sade) -> Self {
        Self {
            config: algo.config,
            seed: algo.seed,
            state: algo.state,
        }
    }
}

impl TryFrom<SadeSnapshot> for Sade {
    type Error = SadeError;

    fn try_from(snapshot: SadeSnapshot) -> Result<Self> {
        Ok(Self {
            variant: Variant::from_id(snapshot.config.variant)?,
            adaptation: Adaptation::from_id(snapshot.config.variant_adptv)?,
            config: snapshot.config,
            seed: snapshot.seed,
            state: snapshot.state,
        })
    }
}

impl Sade {
    /// Creates an engine from `config`.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if the variant or the adaptation scheme
    /// is out of range.
    pub fn new(config: SadeConfig) -> Result<Self> {
        let variant = Variant::from_id(config.variant)?;
        let adaptation = Adaptation::from_id(config.variant_adptv)?;
        let seed = config.seed.unwrap_or_else(|| rand::rng().random());
        Ok(Self {
            config,
            variant,
            adaptation,
            seed,
            state: SadeState {
                rng: ChaCha12Rng::seed_from_u64(seed),
                f: Vec::new(),
                cr: Vec::new(),
                log: Vec::new(),
                last_exit: None,
            },
        })
    }

    /// Evolves `pop` and returns it.
    ///
    /// # Errors
    ///
    /// Returns a problem error for constrained, multi-objective or stochastic
    /// problems and `SadeError::PopulationTooSmall` below
    /// [`MIN_POP_SIZE`] individuals. Nothing is modified on error.
    pub fn evolve(&mut self, mut pop: Population) -> Result<Population> {
        let prob = pop.problem();
        if prob.num_constraints() != 0 {
            return Err(SadeError::ConstrainedProblem {
                problem: prob.name(),
                constraints: prob.num_constraints(),
            });
        }
        if prob.num_objectives() != 1 {
            return Err(SadeError::MultiObjectiveProblem {
                problem: prob.name(),
                objectives: prob.num_objectives(),
            });
        }
        if prob.is_stochastic() {
            return Err(SadeError::StochasticProblem {
                problem: prob.name(),
            });
        }
        if self.config.generations == 0 {
            self.state.last_exit = Some(ExitReason::NoGenerations);
            return Ok(pop);
        }
        if pop.size() < MIN_POP_SIZE {
            return Err(SadeError::PopulationTooSmall {
                problem: prob.name(),
                size: pop.size(),
                min: MIN_POP_SIZE,
            });
        }

        self.state.log.clear();
        self.state.last_exit = None;

        let dim = prob.dimension();
        let (lb, ub) = prob.bounds();
        let np = pop.size();
        let fevals0 = prob.fevals();
        let family = self.variant.family;
        let n_donors = family.donors();
        let verbosity = self.config.verbosity;

        log::debug!(
            "sade: {} individuals, {} generations, variant {} ({}), adaptation {}",
            np,
            self.config.generations,
            self.variant.id(),
            self.variant,
            self.adaptation
        );

        let SadeState {
            rng,
            f: f_mem,
            cr: cr_mem,
            log,
            last_exit,
        } = &mut self.state;

        let mut popold: Array2<f64> = pop.get_x().clone();
        let mut popnew = popold.clone();
        let mut fit: Vec<f64> = pop.get_f().column(0).to_vec();

        let (best_idx, _) = argmin(pop.get_f().column(0));
        let mut gb_x: Array1<f64> = popold.row(best_idx).to_owned();
        let mut gb_fit = fit[best_idx];
        let mut gb_iter = gb_x.clone();

        if f_mem.len() != np || cr_mem.len() != np || !self.config.memory {
            let (f, cr) = self.adaptation.init(np, rng);
            *f_mem = f;
            *cr_mem = cr;
        }
        // the first individual seeds the champions until one is accepted
        let mut gb_f = f_mem[0];
        let mut gb_cr = cr_mem[0];
        let mut gb_iter_f = gb_f;
        let mut gb_iter_cr = gb_cr;

        let mut count: u32 = 1;
        for generation in 1..=self.config.generations {
            for i in 0..np {
                let r = distinct_indices(n_donors, np, rng);
                let donors = Donors {
                    i,
                    r: &r,
                    pop: &popold,
                    best: &gb_iter,
                };

                let (f, cr) = match self.adaptation {
                    Adaptation::Jde => jde(f_mem[i], cr_mem[i], rng),
                    Adaptation::Ide => {
                        let pool = ParamPool {
                            f: f_mem.as_slice(),
                            cr: cr_mem.as_slice(),
                            best_f: gb_iter_f,
                            best_cr: gb_iter_cr,
                        };
                        family.adapt(&donors, &pool, rng)
                    }
                };

                let parent = popold.row(i).to_owned();
                let mutant = family.mutant(&donors, f);
                let mut trial = match self.variant.crossover {
                    Crossover::Exponential => exponential_crossover(&parent, &mutant, cr, rng),
                    Crossover::Binomial => binomial_crossover(&parent, &mutant, cr, rng),
                };

                // out-of-bounds components are resampled, not clipped
                for j in 0..dim {
                    if trial[j] < lb[j] || trial[j] > ub[j] {
                        trial[j] = uniform_real_from_range(lb[j], ub[j], rng);
                    }
                }

                let new_f = pop.problem().fitness(&trial)?;
                let new_fit = new_f[0];
                if new_fit <= fit[i] {
                    fit[i] = new_fit;
                    popnew.row_mut(i).assign(&trial);
                    pop.set_xf(i, trial, new_f)?;
                    f_mem[i] = f;
                    cr_mem[i] = cr;
                    if new_fit <= gb_fit {
                        gb_fit = new_fit;
                        gb_x = popnew.row(i).to_owned();
                        gb_f = f;
                        gb_cr = cr;
                    }
                } else {
                    popnew.row_mut(i).assign(&popold.row(i));
                }
            }

            gb_iter.assign(&gb_x);
            gb_iter_f = gb_f;
            gb_iter_cr = gb_cr;
            std::mem::swap(&mut popold, &mut popnew);

            if generation % CHECK_PERIOD == 0 {
                let flat = Flatness::of(&pop);
                if flat.dx < self.config.x_tol {
                    if verbosity > 0 {
                        log::info!("Exit condition -- xtol < {}", self.config.x_tol);
                    }
                    *last_exit = Some(ExitReason::XTol);
                    return Ok(pop);
                }
                if flat.df < self.config.f_tol {
                    if verbosity > 0 {
                        log::info!("Exit condition -- ftol < {}", self.config.f_tol);
                    }
                    *last_exit = Some(ExitReason::FTol);
                    return Ok(pop);
                }
            }

            if verbosity > 0 && (generation % verbosity == 1 || verbosity == 1) {
                let flat = Flatness::of(&pop);
                if count % HEADER_PERIOD == 1 {
                    log::info!(
                        "{:>7}{:>15}{:>15}{:>15}{:>15}{:>15}{:>15}",
                        "Gen:",
                        "Fevals:",
                        "Best:",
                        "F:",
                        "CR:",
                        "dx:",
                        "df:"
                    );
                }
                let line = LogLine {
                    generation,
                    fevals: pop.problem().fevals() - fevals0,
                    best: flat.best,
                    f: gb_iter_f,
                    cr: gb_iter_cr,
                    dx: flat.dx,
                    df: flat.df,
                };
                log::info!(
                    "{:>7}{:>15}{:>15.6e}{:>15.6}{:>15.6}{:>15.6e}{:>15.6e}",
                    line.generation,
                    line.fevals,
                    line.best,
                    line.f,
                    line.cr,
                    line.dx,
                    line.df
                );
                count += 1;
                log.push(line);
            }
        }

        if verbosity > 0 {
            log::info!("Exit condition -- generations = {}", self.config.generations);
        }
        *last_exit = Some(ExitReason::Generations);
        Ok(pop)
    }

    /// Sets the seed and restarts the random generator from it.
    pub fn set_seed(&mut self, seed: u64) {
        self.seed = seed;
        self.state.rng = ChaCha12Rng::seed_from_u64(seed);
    }

    /// Seed the generator was last started from.
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Sets the log period (0 disables logging).
    pub fn set_verbosity(&mut self, level: u32) {
        self.config.verbosity = level;
    }

    /// Current log period.
    pub fn verbosity(&self) -> u32 {
        self.config.verbosity
    }

    /// Log of the last `evolve` call.
    pub fn log(&self) -> &[LogLine] {
        &self.state.log
    }

    /// Exit condition of the last `evolve` call.
    pub fn last_exit(&self) -> Option<ExitReason> {
        self.state.last_exit
    }

    /// The configuration the engine was built from.
    pub fn config(&self) -> &SadeConfig {
        &self.config
    }

    /// The mutation/crossover strategy.
    pub fn variant(&self) -> Variant {
        self.variant
    }

    /// The adaptation scheme.
    pub fn adaptation(&self) -> Adaptation {
        self.adaptation
    }

    /// Stored `F` values (empty before the first call).
    pub fn f_values(&self) -> &[f64] {
        &self.state.f
    }

    /// Stored `CR` values (empty before the first call).
    pub fn cr_values(&self) -> &[f64] {
        &self.state.cr
    }

    /// Algorithm name.
    pub fn name(&self) -> &'static str {
        "sade: Self-adaptive Differential Evolution"
    }

    /// Human readable parameter summary.
    pub fn extra_info(&self) -> String {
        format!(
            "\tGenerations: {}\n\tVariant: {} - {}\n\tSelf adaptation variant: {}\n\
             \tStopping xtol: {}\n\tStopping ftol: {}\n\tMemory: {}\n\tVerbosity: {}\n\tSeed: {}",
            self.config.generations,
            self.variant.id(),
            self.variant,
            self.adaptation,
            self.config.x_tol,
            self.config.f_tol,
            self.config.memory,
            self.config.verbosity,
            self.seed
        )
    }
}

impl fmt::Display for Sade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Algorithm name: {}", self.name())?;
        writeln!(f, "Extra info:")?;
        write!(f, "{}", self.extra_info())
    }
}

/// Spread between the best and worst individuals.
struct Flatness {
    best: f64,
    dx: f64,
    df: f64,
}

impl Flatness {
    fn of(pop: &Population) -> Self {
        let fit = pop.get_f().column(0);
        let (best_idx, best) = argmin(fit);
        let (worst_idx, worst) = argmax(fit);
        let x = pop.get_x();
        let dx = x
            .row(worst_idx)
            .iter()
            .zip(x.row(best_idx).iter())
            .map(|(w, b)| (w - b).abs())
            .sum();
        Self {
            best,
            dx,
            df: (worst - best).abs(),
        }
    }
}
