use ndarray::Array1;
use rand::Rng;

/// Copies a contiguous (cyclic) run of mutant components into the parent.
///
/// The run starts at a uniform position and keeps growing while a fresh
/// uniform is below `cr`, up to the full dimension. At least one component
/// always comes from the mutant.
pub(crate) fn exponential_crossover<R: Rng + ?Sized>(
    target: &Array1<f64>,
    mutant: &Array1<f64>,
    cr: f64,
    rng: &mut R,
) -> Array1<f64> {
    let n = target.len();
    let mut trial = target.clone();
    let mut j = rng.random_range(0..n);
    let mut l = 0usize;
    loop {
        trial[j] = mutant[j];
        j = (j + 1) % n;
        l += 1;
        let grow = rng.random::<f64>() < cr;
        if !grow || l >= n {
            break;
        }
    }
    trial
}
