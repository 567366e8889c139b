use ndarray::{Array1, Zip};
use rand::Rng;

use crate::self_adaptation::{ParamPool, normal};
use crate::variant::Donors;

/// `b + F(x_r0 - x_r1) + F(x_r2 - x_r3)`
pub(crate) fn mutant_best2(d: &Donors<'_>, f: f64) -> Array1<f64> {
    let r = d.r;
    Zip::from(d.best)
        .and(d.pop.row(r[0]))
        .and(d.pop.row(r[1]))
        .and(d.pop.row(r[2]))
        .and(d.pop.row(r[3]))
        .map_collect(|&b, &x0, &x1, &x2, &x3| b + (x0 - x1) * f + (x2 - x3) * f)
}

pub(crate) fn ide_best2<R: Rng + ?Sized>(
    d: &Donors<'_>,
    p: &ParamPool<'_>,
    rng: &mut R,
) -> (f64, f64) {
    let r = d.r;
    let f = p.best_f
        + normal(rng) * 0.5 * (p.f[r[0]] - p.f[r[1]])
        + normal(rng) * 0.5 * (p.f[r[2]] - p.f[r[3]]);
    let cr = p.best_cr
        + normal(rng) * 0.5 * (p.cr[r[0]] - p.cr[r[1]])
        + normal(rng) * 0.5 * (p.cr[r[2]] - p.cr[r[3]]);
    (f, cr)
}
