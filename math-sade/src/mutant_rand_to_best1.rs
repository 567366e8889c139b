use ndarray::{Array1, Zip};
use rand::Rng;

use crate::self_adaptation::{ParamPool, normal};
use crate::variant::Donors;

/// `x_i + F(b - x_i) + F(x_r0 - x_r1)`
pub(crate) fn mutant_rand_to_best1(d: &Donors<'_>, f: f64) -> Array1<f64> {
    let r = d.r;
    Zip::from(d.pop.row(d.i))
        .and(d.best)
        .and(d.pop.row(r[0]))
        .and(d.pop.row(r[1]))
        .map_collect(|&xi, &b, &x0, &x1| xi + f * (b - xi) + f * (x0 - x1))
}

pub(crate) fn ide_rand_to_best1<R: Rng + ?Sized>(
    d: &Donors<'_>,
    p: &ParamPool<'_>,
    rng: &mut R,
) -> (f64, f64) {
    let (i, r) = (d.i, d.r);
    let f = p.f[i]
        + normal(rng) * 0.5 * (p.best_f - p.f[i])
        + normal(rng) * 0.5 * (p.f[r[0]] - p.f[r[1]]);
    let cr = p.cr[i]
        + normal(rng) * 0.5 * (p.best_cr - p.cr[i])
        + normal(rng) * 0.5 * (p.cr[r[0]] - p.cr[r[1]]);
    (f, cr)
}
