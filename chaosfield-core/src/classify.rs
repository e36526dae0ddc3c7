use crate::complex::Complex;

/// Index of the root nearest to `z`.
///
/// Ties go to the lower index. A `NaN` distance never compares less than the
/// running minimum, so a diverged point (`NaN` or infinite components) maps to
/// root 0. Returns 0 for an empty root list.
#[inline]
pub fn closest_root(roots: &[Complex], z: Complex) -> usize {
    let mut best = 0;
    let mut best_dist = f64::INFINITY;
    for (i, &r) in roots.iter().enumerate() {
        let d = z.dist(r);
        if d < best_dist {
            best = i;
            best_dist = d;
        }
    }
    best
}

/// Nearest-root index for every value.
pub fn classify(roots: &[Complex], values: &[Complex]) -> Vec<usize> {
    values.iter().map(|&z| closest_root(roots, z)).collect()
}

/// Map a root index onto `[0, 1]` as `index / (root_count - 1)`.
///
/// With a single root there is nothing to spread over, so every point gets
/// `0.0`.
#[inline]
pub fn normalized_index(index: usize, root_count: usize) -> f64 {
    if root_count <= 1 {
        0.0
    } else {
        index as f64 / (root_count - 1) as f64
    }
}
