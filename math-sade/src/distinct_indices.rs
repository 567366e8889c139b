use rand::Rng;

/// Draws `count` distinct indices from `0..pool_size` with a partial
/// Durstenfeld shuffle.
///
/// Step `j` picks a uniform position among the `pool_size - j` unused
/// indices and moves it past the tail, so exactly `count` integers are
/// consumed from `rng`.
pub(crate) fn distinct_indices<R: Rng + ?Sized>(
    count: usize,
    pool_size: usize,
    rng: &mut R,
) -> Vec<usize> {
    debug_assert!(count <= pool_size);
    let mut idxs: Vec<usize> = (0..pool_size).collect();
    let mut out = Vec::with_capacity(count);
    for j in 0..count {
        let last = pool_size - 1 - j;
        let k = rng.random_range(0..=last);
        out.push(idxs[k]);
        idxs.swap(k, last);
    }
    out
}
