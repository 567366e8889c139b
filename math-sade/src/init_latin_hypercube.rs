use ndarray::{Array1, Array2};
use rand::Rng;
use rand::seq::SliceRandom;

pub(crate) fn init_latin_hypercube<R: Rng + ?Sized>(
    npop: usize,
    lower: &Array1<f64>,
    upper: &Array1<f64>,
    rng: &mut R,
) -> Array2<f64> {
    let n = lower.len();
    let mut samples = Array2::<f64>::zeros((npop, n));
    // one stratum per individual in every dimension, strata permuted per column
    for j in 0..n {
        let mut vals = Vec::with_capacity(npop);
        for k in 0..npop {
            let u: f64 = rng.random::<f64>();
            vals.push(((k as f64) + u) / (npop as f64));
        }
        vals.shuffle(rng);
        for i in 0..npop {
            samples[(i, j)] = lower[j] + vals[i] * (upper[j] - lower[j]);
        }
    }
    samples
}
