use ndarray::Array1;
use rand::Rng;

use crate::self_adaptation::{ParamPool, normal};
use crate::variant::Donors;

/// `x_r0 + F(x_r1 - x_r2) + F(x_r3 - x_r4) + F(x_r5 - x_r6)`
pub(crate) fn mutant_rand3(d: &Donors<'_>, f: f64) -> Array1<f64> {
    let r = d.r;
    let x = |k: usize, j: usize| d.pop[[r[k], j]];
    Array1::from_shape_fn(d.pop.ncols(), |j| {
        x(0, j) + (x(1, j) - x(2, j)) * f + (x(3, j) - x(4, j)) * f + (x(5, j) - x(6, j)) * f
    })
}

/// The CR recurrence pools four donors around `CR_r4`.
pub(crate) fn ide_rand3<R: Rng + ?Sized>(
    d: &Donors<'_>,
    p: &ParamPool<'_>,
    rng: &mut R,
) -> (f64, f64) {
    let r = d.r;
    let f = p.f[r[0]]
        + normal(rng) * 0.5 * (p.f[r[1]] - p.f[r[2]])
        + normal(rng) * 0.5 * (p.f[r[3]] - p.f[r[4]])
        + normal(rng) * 0.5 * (p.f[r[5]] - p.f[r[6]]);
    let cr = p.cr[r[4]] + normal(rng) * 0.5 * (p.cr[r[0]] + p.cr[r[1]] - p.cr[r[2]] - p.cr[r[3]]);
    (f, cr)
}
