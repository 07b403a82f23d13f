//! Catalog of canonical test problems.
//!
//! Every constructor returns a ready [`Problem`](crate::problem::Problem)
//! with its formula and Pareto-front provider attached.
//!
//! | Module | Problems | Front |
//! |--------|----------|-------|
//! | [`zdt`] | ZDT1, ZDT2, ZDT3, ZDT4, ZDT6 | closed form |
//! | [`dtlz`] | DTLZ1 – DTLZ7 | reference directions (DTLZ1–4), unavailable (DTLZ5–7) |
//! | [`cdtlz`] | C1-DTLZ1, C1-DTLZ3, C2-DTLZ2, C3-DTLZ4 | reference directions |
//! | [`classic`] | BNH, OSY, TNK, Kursawe | closed form (BNH), sidecar store |
//! | [`engineering`] | Welded beam, Truss2D, Knapsack | unavailable |
//! | [`g`] | G1 – G10 | known optimum (front and Pareto set) |
//! | [`single`] | Sphere, Rastrigin, Rosenbrock, Griewank, Schwefel, Zakharov, Ackley | known optimum |
//!
//! # References
//!
//! - Zitzler, Deb & Thiele (2000), "Comparison of Multiobjective Evolutionary
//!   Algorithms: Empirical Results"
//! - Deb, Thiele, Laumanns & Zitzler (2002), "Scalable Multi-Objective
//!   Optimization Test Problems"
//! - Jain & Deb (2014), "An Evolutionary Many-Objective Optimization
//!   Algorithm Using Reference-Point Based Nondominated Sorting Approach,
//!   Part II"
//! - Michalewicz & Schoenauer (1996), "Evolutionary Algorithms for
//!   Constrained Parameter Optimization Problems"

pub mod cdtlz;
pub mod classic;
pub mod dtlz;
pub mod engineering;
pub mod g;
pub mod single;
pub mod zdt;

use ndarray::{Array2, ArrayView1, ArrayViewMut1, Zip};

use crate::error::{Error, Result};
use crate::problem::Formula;
use crate::ref_dirs::RefDirConfig;

/// Number of points sampled for closed-form and direction-mapped fronts.
pub const DEFAULT_FRONT_POINTS: usize = 100;

/// Generator settings for front sampling: exact lattice coordinates, no
/// zero substitution.
pub(crate) fn front_config() -> RefDirConfig {
    RefDirConfig::default().without_zero_substitute()
}

/// A formula evaluating each row independently.
pub(crate) fn rowwise<B>(body: B) -> Formula
where
    B: Fn(ArrayView1<'_, f64>, ArrayViewMut1<'_, f64>) + Send + Sync + 'static,
{
    Formula::objectives_fn(move |x, mut f| {
        Zip::from(x.rows())
            .and(f.rows_mut())
            .for_each(|xi, fi| body(xi, fi));
    })
}

/// A constrained formula evaluating each row independently.
pub(crate) fn rowwise_constrained<B>(body: B) -> Formula
where
    B: Fn(ArrayView1<'_, f64>, ArrayViewMut1<'_, f64>, ArrayViewMut1<'_, f64>)
        + Send
        + Sync
        + 'static,
{
    Formula::constrained_fn(move |x, mut f, mut g| {
        Zip::from(x.rows())
            .and(f.rows_mut())
            .and(g.rows_mut())
            .for_each(|xi, fi, gi| body(xi, fi, gi));
    })
}

/// A bi-objective curve `(t, h(t))` for the given `t` values.
pub(crate) fn curve(ts: impl IntoIterator<Item = f64>, h: impl Fn(f64) -> f64) -> Array2<f64> {
    let values: Vec<f64> = ts.into_iter().flat_map(|t| [t, h(t)]).collect();
    let rows = values.len() / 2;
    Array2::from_shape_vec((rows, 2), values).unwrap_or_else(|_| Array2::zeros((0, 2)))
}

pub(crate) fn require(condition: bool, message: impl FnOnce() -> String) -> Result<()> {
    if condition {
        Ok(())
    } else {
        Err(Error::InvalidArgument(message()))
    }
}
