use ndarray::Array1;
use rand::Rng;

/// Takes each mutant component with probability `cr`, walking the dimensions
/// cyclically from a uniform start. The last visited component always comes
/// from the mutant.
pub(crate) fn binomial_crossover<R: Rng + ?Sized>(
    target: &Array1<f64>,
    mutant: &Array1<f64>,
    cr: f64,
    rng: &mut R,
) -> Array1<f64> {
    let n = target.len();
    let mut trial = target.clone();
    let mut j = rng.random_range(0..n);
    for l in 0..n {
        if rng.random::<f64>() < cr || l + 1 == n {
            trial[j] = mutant[j];
        }
        j = (j + 1) % n;
    }
    trial
}
