//! Reference directions (weight vectors) on the unit simplex.
//!
//! Many-objective problems sample their Pareto fronts by mapping a set of
//! well-spread simplex points onto the front geometry. This module produces
//! those points.
//!
//! # Algorithm
//!
//! 1. **Sizing**: find the smallest section count `s` whose lattice has
//!    `C(n_dim + s - 1, s) >= n_points` points ([`smallest_sections`]).
//! 2. **Enumeration**: depth-first construction of every tuple with
//!    coordinates in `{0, 1/s, …, 1}` summing to one ([`enumerate`]).
//! 3. **Zero substitution**: exact zeros become a tiny positive value so
//!    consumers may divide by coordinates.
//! 4. **Random fill** (exact mode only): pad the largest non-overshooting
//!    lattice with uniform simplex samples ([`sample_simplex`]).
//!
//! # Key Types
//!
//! - [`RefDirConfig`]: sizing ceiling, zero substitute, sampling mode, seed
//! - [`RefDirGenerator`]: runs the generation
//! - [`ReferenceDirections`]: the resulting simplex point set
//!
//! # References
//!
//! - Das & Dennis (1998), "Normal-Boundary Intersection: A New Method for
//!   Generating the Pareto Surface in Nonlinear Multicriteria Optimization
//!   Problems"
//! - Deb & Jain (2014), "An Evolutionary Many-Objective Optimization
//!   Algorithm Using Reference-Point-Based Nondominated Sorting Approach"

mod config;
mod generator;
mod lattice;
mod sampling;
mod types;

pub use config::{RefDirConfig, SamplingMode};
pub use generator::{generate, RefDirGenerator};
pub use lattice::{enumerate, largest_sections_within, lattice_size, smallest_sections};
pub use sampling::{corners, sample_simplex};
pub use types::ReferenceDirections;

/// Tolerance on the sum-to-one check for simplex points.
///
/// Lattice coordinates are accumulated in floating point; a tighter
/// tolerance rejects valid points.
pub const SUM_TOLERANCE: f64 = 1e-4;
