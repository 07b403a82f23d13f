//! Reference-direction generation.

use ndarray::Array2;
use rand::rngs::StdRng;
use rand::SeedableRng;

use super::config::{RefDirConfig, SamplingMode};
use super::lattice::{enumerate, largest_sections_within, smallest_sections};
use super::sampling::{corners, sample_simplex};
use super::types::ReferenceDirections;
use crate::error::{Error, Result};

/// Generates reference directions on the unit simplex.
///
/// # Usage
///
/// ```
/// use u_mop::ref_dirs::{RefDirConfig, RefDirGenerator};
///
/// // Lattice mode: at least 100 directions for three objectives.
/// let dirs = RefDirGenerator::generate(100, 3, &RefDirConfig::default()).unwrap();
/// assert_eq!(dirs.len(), 105);
///
/// // Exact mode: lattice of 91 plus 9 random interior points.
/// let config = RefDirConfig::exact().with_seed(1);
/// let dirs = RefDirGenerator::generate(100, 3, &config).unwrap();
/// assert_eq!(dirs.len(), 100);
/// ```
pub struct RefDirGenerator;

impl RefDirGenerator {
    /// Generates at least (lattice mode) or exactly (exact mode) `n_points`
    /// directions in `n_dim` dimensions.
    ///
    /// `n_points == 0` yields an empty set. `n_dim == 1` yields the single
    /// point `[1.0]` in lattice mode.
    ///
    /// # Errors
    ///
    /// - [`Error::InvalidArgument`] if `n_dim == 0` or the configuration is
    ///   invalid.
    /// - [`Error::SizingOutOfRange`] if, in lattice mode, no section count
    ///   up to `config.max_sections` produces `n_points` directions.
    pub fn generate(
        n_points: usize,
        n_dim: usize,
        config: &RefDirConfig,
    ) -> Result<ReferenceDirections> {
        config.validate().map_err(Error::InvalidArgument)?;
        if n_dim == 0 {
            return Err(Error::InvalidArgument(
                "n_dim must be positive for reference directions".into(),
            ));
        }
        if n_points == 0 {
            return Ok(ReferenceDirections::empty(n_dim));
        }

        let mut points = match config.mode {
            SamplingMode::Lattice => lattice_points(n_points, n_dim, config)?,
            SamplingMode::Exact => exact_points(n_points, n_dim, config),
        };

        if let Some(eps) = config.zero_substitute {
            substitute_zeros(&mut points, eps);
        }

        Ok(ReferenceDirections::from_array(points))
    }
}

/// Generates at least `n_points` lattice directions with the default
/// configuration.
///
/// ```
/// let dirs = u_mop::ref_dirs::generate(3, 2).unwrap();
/// assert_eq!(dirs.len(), 3);
/// ```
pub fn generate(n_points: usize, n_dim: usize) -> Result<ReferenceDirections> {
    RefDirGenerator::generate(n_points, n_dim, &RefDirConfig::default())
}

fn lattice_points(n_points: usize, n_dim: usize, config: &RefDirConfig) -> Result<Array2<f64>> {
    if n_dim == 1 {
        return Ok(Array2::ones((1, 1)));
    }
    let sections = smallest_sections(n_points, n_dim, config.max_sections)?;
    let rows = enumerate(n_dim, sections);
    trace_debug!(
        n_points,
        n_dim,
        sections,
        produced = rows.len(),
        "simplex lattice selected"
    );
    Ok(stack_rows(&rows, n_dim, rows.len()))
}

fn exact_points(n_points: usize, n_dim: usize, config: &RefDirConfig) -> Array2<f64> {
    if n_dim == 1 {
        return Array2::ones((n_points, 1));
    }

    let mut rows = largest_sections_within(n_points, n_dim, config.max_sections)
        .map(|sections| enumerate(n_dim, sections))
        .unwrap_or_default();

    if rows.is_empty() && config.seed_corners {
        rows.extend(
            corners(n_dim)
                .rows()
                .into_iter()
                .take(n_points)
                .map(|r| r.to_vec()),
        );
    }

    let lattice_rows = rows.len();
    let mut points = stack_rows(&rows, n_dim, n_points);

    let missing = n_points - lattice_rows;
    if missing > 0 {
        let mut rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::seed_from_u64(rand::random()),
        };
        let fill = sample_simplex(missing, n_dim, &mut rng);
        points
            .slice_mut(ndarray::s![lattice_rows.., ..])
            .assign(&fill);
        trace_debug!(n_points, n_dim, lattice_rows, missing, "random simplex fill");
    }

    points
}

/// Replaces exact zeros with `eps` and scales the remaining coordinates of
/// the row down by the added mass, so each row keeps its sum.
///
/// `eps` is capped at `1 / (2 n_dim)`, which keeps the scaled coordinates
/// positive however many zeros a row holds.
fn substitute_zeros(points: &mut Array2<f64>, eps: f64) {
    let eps = eps.min(0.5 / points.ncols().max(1) as f64);
    for mut row in points.rows_mut() {
        let zeros = row.iter().filter(|&&v| v == 0.0).count();
        let total = row.sum();
        if zeros == 0 || total <= 0.0 {
            continue;
        }
        let scale = (total - zeros as f64 * eps) / total;
        row.mapv_inplace(|v| if v == 0.0 { eps } else { v * scale });
    }
}

/// Copies `rows` into the top of a zeroed `capacity × n_dim` matrix.
fn stack_rows(rows: &[Vec<f64>], n_dim: usize, capacity: usize) -> Array2<f64> {
    let mut out = Array2::zeros((capacity, n_dim));
    for (mut dst, src) in out.rows_mut().into_iter().zip(rows) {
        for (d, &s) in dst.iter_mut().zip(src) {
            *d = s;
        }
    }
    out
}
