//! Constraint violation.
//!
//! Constraints follow the `g(x) <= 0` convention: a constraint value is
//! violated only when it is strictly positive, and a larger positive value
//! means "more" infeasible. Zero and negative values are feasible regardless
//! of their magnitude.
//!
//! The violation of a candidate is the sum of its positive constraint values:
//!
//! ```text
//! CV_i = Σ_j max(G[i, j], 0)
//! ```

use ndarray::{Array2, ArrayBase, Axis, Data, Ix2};

/// Reduces a constraint matrix to a per-row violation column.
///
/// The result always has shape `(rows, 1)`, including when `g` has zero
/// columns; in that case every candidate is feasible and the column is all
/// zeros. Callers never have to branch on whether a problem has constraints.
///
/// # Example
///
/// ```
/// use ndarray::array;
/// use u_mop::constraint::calc_constraint_violation;
///
/// let g = array![[1.0, -1.0], [0.5, 0.25], [-3.0, 0.0]];
/// let cv = calc_constraint_violation(&g);
///
/// assert_eq!(cv.shape(), &[3, 1]);
/// assert_eq!(cv[[0, 0]], 1.0);
/// assert_eq!(cv[[1, 0]], 0.75);
/// assert_eq!(cv[[2, 0]], 0.0);
/// ```
pub fn calc_constraint_violation<S>(g: &ArrayBase<S, Ix2>) -> Array2<f64>
where
    S: Data<Elem = f64>,
{
    let rows = g.nrows();
    if g.ncols() == 0 {
        return Array2::zeros((rows, 1));
    }

    g.map(|&v| v.max(0.0))
        .sum_axis(Axis(1))
        .insert_axis(Axis(1))
}

/// Returns `true` for rows whose violation is exactly zero.
pub fn feasible_mask<S>(g: &ArrayBase<S, Ix2>) -> Vec<bool>
where
    S: Data<Elem = f64>,
{
    calc_constraint_violation(g)
        .column(0)
        .iter()
        .map(|&cv| cv <= 0.0)
        .collect()
}
