use ndarray::{Array1, Zip};
use rand::Rng;

use crate::self_adaptation::{ParamPool, normal};
use crate::variant::Donors;

/// `x_r4 + F(x_r0 - x_r1) + F(x_r2 - x_r3)`
pub(crate) fn mutant_rand2(d: &Donors<'_>, f: f64) -> Array1<f64> {
    let r = d.r;
    Zip::from(d.pop.row(r[4]))
        .and(d.pop.row(r[0]))
        .and(d.pop.row(r[1]))
        .and(d.pop.row(r[2]))
        .and(d.pop.row(r[3]))
        .map_collect(|&x4, &x0, &x1, &x2, &x3| x4 + (x0 - x1) * f + (x2 - x3) * f)
}

pub(crate) fn ide_rand2<R: Rng + ?Sized>(
    d: &Donors<'_>,
    p: &ParamPool<'_>,
    rng: &mut R,
) -> (f64, f64) {
    let r = d.r;
    let f = p.f[r[4]]
        + normal(rng) * 0.5 * (p.f[r[0]] - p.f[r[1]])
        + normal(rng) * 0.5 * (p.f[r[2]] - p.f[r[3]]);
    let cr = p.cr[r[4]]
        + normal(rng) * 0.5 * (p.cr[r[0]] - p.cr[r[1]])
        + normal(rng) * 0.5 * (p.cr[r[2]] - p.cr[r[3]]);
    (f, cr)
}
