//! Random simplex sampling.
//!
//! Drawing `n_dim` independent standard exponential variables and dividing
//! by their sum gives a point distributed uniformly on the simplex
//! (Dirichlet with all concentrations equal to one).

use ndarray::Array2;
use rand::Rng;
use rand_distr::Exp1;

/// Draws `n` points uniformly from the `n_dim`-simplex.
///
/// # Example
///
/// ```
/// use rand::SeedableRng;
/// use rand::rngs::StdRng;
/// use u_mop::ref_dirs::sample_simplex;
///
/// let mut rng = StdRng::seed_from_u64(42);
/// let points = sample_simplex(10, 3, &mut rng);
/// assert_eq!(points.shape(), &[10, 3]);
/// for row in points.rows() {
///     assert!((row.sum() - 1.0).abs() < 1e-12);
/// }
/// ```
pub fn sample_simplex<R: Rng>(n: usize, n_dim: usize, rng: &mut R) -> Array2<f64> {
    let mut points = Array2::zeros((n, n_dim));
    if n_dim == 0 {
        return points;
    }
    for mut row in points.rows_mut() {
        let mut total = 0.0;
        for v in row.iter_mut() {
            let e: f64 = rng.sample(Exp1);
            *v = e;
            total += e;
        }
        if total > 0.0 {
            row /= total;
        } else {
            // every draw underflowed: fall back to the barycenter
            row.fill(1.0 / n_dim as f64);
        }
    }
    points
}

/// The `n_dim` simplex corners (rows of the identity matrix).
pub fn corners(n_dim: usize) -> Array2<f64> {
    Array2::eye(n_dim)
}
