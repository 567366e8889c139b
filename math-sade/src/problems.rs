//! Standard single-objective benchmark problems.
//!
//! Each problem has a configurable dimension and canonical box bounds.
//! [`FnProblem`] wraps an arbitrary closure.

use std::f64::consts::{E, PI};

use ndarray::{Array1, array};
use serde::{Deserialize, Serialize};

use crate::error::{Result, SadeError};
use crate::problem::Problem;

/// Names accepted by [`problem_by_name`].
pub const PROBLEM_NAMES: &[&str] = &["sphere", "rosenbrock", "rastrigin", "ackley", "griewank"];

fn uniform_bounds(dim: usize, lo: f64, hi: f64) -> (Array1<f64>, Array1<f64>) {
    (Array1::from_elem(dim, lo), Array1::from_elem(dim, hi))
}

/// Sphere function: f(x) = sum(x_i^2), minimum 0 at the origin.
/// Bounds: x_i in [-5.12, 5.12]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Sphere {
    dim: usize,
}

impl Sphere {
    /// Creates a sphere problem of dimension `dim`.
    pub fn new(dim: usize) -> Self {
        Self { dim }
    }
}

impl Problem for Sphere {
    fn fitness(&self, x: &Array1<f64>) -> Array1<f64> {
        array![x.iter().map(|&xi| xi * xi).sum::<f64>()]
    }
    fn bounds(&self) -> (Array1<f64>, Array1<f64>) {
        uniform_bounds(self.dim, -5.12, 5.12)
    }
    fn name(&self) -> String {
        "Sphere Function".to_string()
    }
}

/// Rosenbrock function, minimum 0 at (1, 1, ..., 1).
/// Bounds: x_i in [-5, 10]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Rosenbrock {
    dim: usize,
}

impl Rosenbrock {
    /// Creates a Rosenbrock problem of dimension `dim` (at least 2).
    pub fn new(dim: usize) -> Self {
        Self { dim: dim.max(2) }
    }
}

impl Problem for Rosenbrock {
    fn fitness(&self, x: &Array1<f64>) -> Array1<f64> {
        let mut sum = 0.0;
        for i in 0..x.len() - 1 {
            let xi = x[i];
            let xi_plus_1 = x[i + 1];
            sum += 100.0 * (xi_plus_1 - xi.powi(2)).powi(2) + (1.0 - xi).powi(2);
        }
        array![sum]
    }
    fn bounds(&self) -> (Array1<f64>, Array1<f64>) {
        uniform_bounds(self.dim, -5.0, 10.0)
    }
    fn name(&self) -> String {
        "Multidimensional Rosenbrock Function".to_string()
    }
}

/// Rastrigin function, highly multimodal, minimum 0 at the origin.
/// Bounds: x_i in [-5.12, 5.12]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Rastrigin {
    dim: usize,
}

impl Rastrigin {
    /// Creates a Rastrigin problem of dimension `dim`.
    pub fn new(dim: usize) -> Self {
        Self { dim }
    }
}

impl Problem for Rastrigin {
    fn fitness(&self, x: &Array1<f64>) -> Array1<f64> {
        let n = x.len() as f64;
        let s: f64 = x
            .iter()
            .map(|&xi| xi * xi - 10.0 * (2.0 * PI * xi).cos())
            .sum();
        array![10.0 * n + s]
    }
    fn bounds(&self) -> (Array1<f64>, Array1<f64>) {
        uniform_bounds(self.dim, -5.12, 5.12)
    }
    fn name(&self) -> String {
        "Rastrigin Function".to_string()
    }
}

/// Ackley function, minimum 0 at the origin.
/// Bounds: x_i in [-32.768, 32.768]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ackley {
    dim: usize,
}

impl Ackley {
    /// Creates an Ackley problem of dimension `dim`.
    pub fn new(dim: usize) -> Self {
        Self { dim }
    }
}

impl Problem for Ackley {
    fn fitness(&self, x: &Array1<f64>) -> Array1<f64> {
        let n = x.len() as f64;
        let sum_sq: f64 = x.iter().map(|&xi| xi.powi(2)).sum();
        let sum_cos: f64 = x.iter().map(|&xi| (2.0 * PI * xi).cos()).sum();
        array![-20.0 * (-0.2 * (sum_sq / n).sqrt()).exp() - (sum_cos / n).exp() + 20.0 + E]
    }
    fn bounds(&self) -> (Array1<f64>, Array1<f64>) {
        uniform_bounds(self.dim, -32.768, 32.768)
    }
    fn name(&self) -> String {
        "Ackley Function".to_string()
    }
}

/// Griewank function, minimum 0 at the origin.
/// Bounds: x_i in [-600, 600]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Griewank {
    dim: usize,
}

impl Griewank {
    /// Creates a Griewank problem of dimension `dim`.
    pub fn new(dim: usize) -> Self {
        Self { dim }
    }
}

impl Problem for Griewank {
    fn fitness(&self, x: &Array1<f64>) -> Array1<f64> {
        let sum_squares: f64 = x.iter().map(|&xi| xi.powi(2)).sum();
        let product_cos: f64 = x
            .iter()
            .enumerate()
            .map(|(i, &xi)| (xi / ((i + 1) as f64).sqrt()).cos())
            .product();
        array![1.0 + sum_squares / 4000.0 - product_cos]
    }
    fn bounds(&self) -> (Array1<f64>, Array1<f64>) {
        uniform_bounds(self.dim, -600.0, 600.0)
    }
    fn name(&self) -> String {
        "Griewank Function".to_string()
    }
}

/// Single-objective problem backed by a closure.
pub struct FnProblem<F>
where
    F: Fn(&Array1<f64>) -> f64 + Send + Sync,
{
    func: F,
    lower: Array1<f64>,
    upper: Array1<f64>,
    name: String,
}

impl<F> FnProblem<F>
where
    F: Fn(&Array1<f64>) -> f64 + Send + Sync,
{
    /// Creates a problem minimizing `func` inside `[lower, upper]`.
    pub fn new(lower: Array1<f64>, upper: Array1<f64>, func: F) -> Self {
        Self {
            func,
            lower,
            upper,
            name: "closure problem".to_string(),
        }
    }

    /// Sets the reported name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }
}

impl<F> Problem for FnProblem<F>
where
    F: Fn(&Array1<f64>) -> f64 + Send + Sync,
{
    fn fitness(&self, x: &Array1<f64>) -> Array1<f64> {
        array![(self.func)(x)]
    }
    fn bounds(&self) -> (Array1<f64>, Array1<f64>) {
        (self.lower.clone(), self.upper.clone())
    }
    fn name(&self) -> String {
        self.name.clone()
    }
}

/// Builds a boxed benchmark problem from its short name.
///
/// # Errors
///
/// Returns `SadeError::UnknownProblem` if `name` is not one of
/// [`PROBLEM_NAMES`].
pub fn problem_by_name(name: &str, dim: usize) -> Result<Box<dyn Problem>> {
    match name.to_lowercase().as_str() {
        "sphere" => Ok(Box::new(Sphere::new(dim))),
        "rosenbrock" => Ok(Box::new(Rosenbrock::new(dim))),
        "rastrigin" => Ok(Box::new(Rastrigin::new(dim))),
        "ackley" => Ok(Box::new(Ackley::new(dim))),
        "griewank" => Ok(Box::new(Griewank::new(dim))),
        _ => Err(SadeError::UnknownProblem {
            name: name.to_string(),
        }),
    }
}
