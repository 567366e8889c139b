use ndarray::{Array1, Zip};
use rand::Rng;

use crate::self_adaptation::{ParamPool, normal};
use crate::variant::Donors;

/// `b + F(x_r1 - x_r2)`
pub(crate) fn mutant_best1(d: &Donors<'_>, f: f64) -> Array1<f64> {
    let r = d.r;
    Zip::from(d.best)
        .and(d.pop.row(r[1]))
        .and(d.pop.row(r[2]))
        .map_collect(|&b, &x1, &x2| b + f * (x1 - x2))
}

pub(crate) fn ide_best1<R: Rng + ?Sized>(
    d: &Donors<'_>,
    p: &ParamPool<'_>,
    rng: &mut R,
) -> (f64, f64) {
    let r = d.r;
    let f = p.best_f + normal(rng) * 0.5 * (p.f[r[1]] - p.f[r[2]]);
    let cr = p.best_cr + normal(rng) * 0.5 * (p.cr[r[1]] - p.cr[r[2]]);
    (f, cr)
}
