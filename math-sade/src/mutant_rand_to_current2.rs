use ndarray::{Array1, Zip};
use rand::Rng;

use crate::self_adaptation::{ParamPool, normal};
use crate::variant::Donors;

/// `x_r0 + F(x_r1 - x_i) + F(x_r2 - x_r3)`
pub(crate) fn mutant_rand_to_current2(d: &Donors<'_>, f: f64) -> Array1<f64> {
    let r = d.r;
    Zip::from(d.pop.row(r[0]))
        .and(d.pop.row(r[1]))
        .and(d.pop.row(d.i))
        .and(d.pop.row(r[2]))
        .and(d.pop.row(r[3]))
        .map_collect(|&x0, &x1, &xi, &x2, &x3| x0 + (x1 - xi) * f + (x2 - x3) * f)
}

/// The second parameter difference reads donors `r3` and `r4`.
pub(crate) fn ide_rand_to_current2<R: Rng + ?Sized>(
    d: &Donors<'_>,
    p: &ParamPool<'_>,
    rng: &mut R,
) -> (f64, f64) {
    let (i, r) = (d.i, d.r);
    let f = p.f[r[0]]
        + normal(rng) * 0.5 * (p.f[r[1]] - p.f[i])
        + normal(rng) * 0.5 * (p.f[r[3]] - p.f[r[4]]);
    let cr = p.cr[r[0]]
        + normal(rng) * 0.5 * (p.cr[r[1]] - p.cr[i])
        + normal(rng) * 0.5 * (p.cr[r[3]] - p.cr[r[4]]);
    (f, cr)
}
