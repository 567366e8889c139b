use ndarray::{Array1, Array2};
use rand::Rng;

/// Uniform draw in the half-open range `[lo, hi)`; returns `lo` when the range
/// is degenerate. One uniform is always consumed.
pub(crate) fn uniform_real_from_range<R: Rng + ?Sized>(lo: f64, hi: f64, rng: &mut R) -> f64 {
    let u: f64 = rng.random::<f64>();
    lo + u * (hi - lo)
}

pub(crate) fn random_decision_vector<R: Rng + ?Sized>(
    lower: &Array1<f64>,
    upper: &Array1<f64>,
    rng: &mut R,
) -> Array1<f64> {
    let mut x = Array1::<f64>::zeros(lower.len());
    for j in 0..lower.len() {
        x[j] = uniform_real_from_range(lower[j], upper[j], rng);
    }
    x
}

pub(crate) fn init_random<R: Rng + ?Sized>(
    npop: usize,
    lower: &Array1<f64>,
    upper: &Array1<f64>,
    rng: &mut R,
) -> Array2<f64> {
    let mut pop = Array2::<f64>::zeros((npop, lower.len()));
    for i in 0..npop {
        pop.row_mut(i)
            .assign(&random_decision_vector(lower, upper, rng));
    }
    pop
}
