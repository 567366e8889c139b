use ndarray::ArrayView1;

/// Index and value of the smallest entry; the lowest index wins ties.
pub(crate) fn argmin(v: ArrayView1<'_, f64>) -> (usize, f64) {
    let mut best_i = 0usize;
    let mut best_v = v[0];
    for (i, &val) in v.iter().enumerate() {
        if val < best_v {
            best_v = val;
            best_i = i;
        }
    }
    (best_i, best_v)
}

/// Index and value of the largest entry; the lowest index wins ties.
pub(crate) fn argmax(v: ArrayView1<'_, f64>) -> (usize, f64) {
    let mut worst_i = 0usize;
    let mut worst_v = v[0];
    for (i, &val) in v.iter().enumerate() {
        if val > worst_v {
            worst_v = val;
            worst_i = i;
        }
    }
    (worst_i, worst_v)
}
