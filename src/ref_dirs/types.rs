//! The reference-direction set value type.

use ndarray::{Array2, ArrayView1, ArrayView2};

use super::SUM_TOLERANCE;

/// An ordered set of points on the unit simplex.
///
/// Every row is non-negative and sums to one within
/// [`SUM_TOLERANCE`]. Sets are produced by
/// [`RefDirGenerator`](super::RefDirGenerator) and owned by the caller.
#[derive(Debug, Clone, PartialEq)]
pub struct ReferenceDirections {
    points: Array2<f64>,
}

impl ReferenceDirections {
    pub(crate) fn from_array(points: Array2<f64>) -> Self {
        debug_assert!(
            on_simplex(&points.view()),
            "reference directions must lie on the unit simplex"
        );
        Self { points }
    }

    /// Wraps caller-supplied directions, checking the simplex invariant.
    ///
    /// Returns `None` if any row has a negative coordinate or does not sum
    /// to one within [`SUM_TOLERANCE`].
    pub fn try_new(points: Array2<f64>) -> Option<Self> {
        on_simplex(&points.view()).then_some(Self { points })
    }

    /// Creates an empty set in `n_dim` dimensions.
    pub fn empty(n_dim: usize) -> Self {
        Self {
            points: Array2::zeros((0, n_dim)),
        }
    }

    /// Number of directions.
    pub fn len(&self) -> usize {
        self.points.nrows()
    }

    /// Returns `true` if the set holds no directions.
    pub fn is_empty(&self) -> bool {
        self.points.nrows() == 0
    }

    /// Dimension of the simplex.
    pub fn n_dim(&self) -> usize {
        self.points.ncols()
    }

    /// Borrows the directions as a `len × n_dim` matrix.
    pub fn view(&self) -> ArrayView2<'_, f64> {
        self.points.view()
    }

    /// Returns the `i`-th direction.
    ///
    /// # Panics
    /// Panics if `i >= len()`.
    pub fn row(&self, i: usize) -> ArrayView1<'_, f64> {
        self.points.row(i)
    }

    /// Consumes the set, returning the underlying matrix.
    pub fn into_array(self) -> Array2<f64> {
        self.points
    }
}

impl AsRef<Array2<f64>> for ReferenceDirections {
    fn as_ref(&self) -> &Array2<f64> {
        &self.points
    }
}

fn on_simplex(points: &ArrayView2<'_, f64>) -> bool {
    points.rows().into_iter().all(|row| {
        row.iter().all(|&v| v >= 0.0) && (row.sum() - 1.0).abs() <= SUM_TOLERANCE
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn test_try_new_accepts_simplex_points() {
        let dirs = ReferenceDirections::try_new(array![[0.5, 0.5], [1.0, 0.0]]).unwrap();
        assert_eq!(dirs.len(), 2);
        assert_eq!(dirs.n_dim(), 2);
        assert_eq!(dirs.row(1)[0], 1.0);
    }

    #[test]
    fn test_try_new_rejects_off_simplex() {
        assert!(ReferenceDirections::try_new(array![[0.5, 0.6]]).is_none());
        assert!(ReferenceDirections::try_new(array![[1.5, -0.5]]).is_none());
    }

    #[test]
    fn test_empty() {
        let dirs = ReferenceDirections::empty(4);
        assert!(dirs.is_empty());
        assert_eq!(dirs.n_dim(), 4);
    }
}
