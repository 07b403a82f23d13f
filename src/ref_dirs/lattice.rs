//! Simplex-lattice sizing and enumeration (Das & Dennis, 1998).
//!
//! Partitioning each axis of the `n_dim`-simplex into `s` equal sections
//! yields every tuple with coordinates in `{0, 1/s, …, 1}` summing to one.
//! There are `C(n_dim + s - 1, s)` such tuples.
//!
//! The section count `s` is used with the same meaning in the count formula
//! and in the enumeration, so the lattice picked by [`smallest_sections`]
//! has exactly [`lattice_size`] points.

use crate::error::{Error, Result};

use super::SUM_TOLERANCE;

/// Number of lattice points for `sections` partitions of an `n_dim`-simplex.
///
/// Saturates at `u128::MAX` instead of overflowing.
///
/// ```
/// use u_mop::ref_dirs::lattice_size;
///
/// assert_eq!(lattice_size(2, 2), 3);
/// assert_eq!(lattice_size(3, 12), 91);
/// ```
pub fn lattice_size(n_dim: usize, sections: usize) -> u128 {
    if n_dim == 0 {
        return 0;
    }
    binomial((n_dim + sections - 1) as u128, sections as u128)
}

fn binomial(n: u128, k: u128) -> u128 {
    if k > n {
        return 0;
    }
    let k = k.min(n - k);
    let mut result: u128 = 1;
    for i in 0..k {
        // result * (n - i) is always divisible by (i + 1)
        result = match result.checked_mul(n - i) {
            Some(v) => v / (i + 1),
            None => return u128::MAX,
        };
    }
    result
}

/// Smallest section count in `1..=max_sections` whose lattice has at least
/// `n_points` points.
///
/// `s = 0` is never chosen: it cannot be enumerated, and `s = 1` already
/// covers every request of at most `n_dim` points.
///
/// # Errors
///
/// [`Error::SizingOutOfRange`] if even `max_sections` falls short.
pub fn smallest_sections(n_points: usize, n_dim: usize, max_sections: usize) -> Result<usize> {
    let target = n_points as u128;
    // lattice_size is non-decreasing in the section count: binary search
    let (mut lo, mut hi) = (1usize, max_sections);
    if max_sections == 0 || lattice_size(n_dim, hi) < target {
        return Err(Error::SizingOutOfRange {
            n_points,
            n_dim,
            max_sections,
        });
    }
    while lo < hi {
        let mid = lo + (hi - lo) / 2;
        if lattice_size(n_dim, mid) >= target {
            hi = mid;
        } else {
            lo = mid + 1;
        }
    }
    Ok(lo)
}

/// Largest section count in `1..=max_sections` whose lattice has at most
/// `n_points` points, or `None` if even one section overshoots.
pub fn largest_sections_within(n_points: usize, n_dim: usize, max_sections: usize) -> Option<usize> {
    let target = n_points as u128;
    if max_sections == 0 || lattice_size(n_dim, 1) > target {
        return None;
    }
    let (mut lo, mut hi) = (1usize, max_sections);
    while lo < hi {
        let mid = lo + (hi - lo).div_ceil(2);
        if lattice_size(n_dim, mid) <= target {
            lo = mid;
        } else {
            hi = mid - 1;
        }
    }
    Some(lo)
}

/// Enumerates the lattice for `sections` partitions by depth-first search.
///
/// At each of the `n_dim` levels a section value is appended (largest first).
/// Branches whose partial sum exceeds `1 + SUM_TOLERANCE` are pruned, and a
/// full tuple is kept only if its sum is within `SUM_TOLERANCE` of one.
///
/// # Panics
/// Panics if `sections == 0` or `n_dim == 0`.
pub fn enumerate(n_dim: usize, sections: usize) -> Vec<Vec<f64>> {
    assert!(n_dim > 0, "n_dim must be positive");
    assert!(sections > 0, "sections must be positive");

    let values: Vec<f64> = (0..=sections)
        .rev()
        .map(|i| i as f64 / sections as f64)
        .collect();

    let mut out = Vec::new();
    let mut current = Vec::with_capacity(n_dim);
    descend(n_dim, &values, 0.0, &mut current, &mut out);
    out
}

fn descend(
    n_dim: usize,
    values: &[f64],
    partial: f64,
    current: &mut Vec<f64>,
    out: &mut Vec<Vec<f64>>,
) {
    if partial > 1.0 + SUM_TOLERANCE {
        return;
    }
    if current.len() == n_dim {
        if (1.0 - partial).abs() < SUM_TOLERANCE {
            out.push(current.clone());
        }
        return;
    }
    for &v in values {
        current.push(v);
        descend(n_dim, values, partial + v, current, out);
        current.pop();
    }
}
