//! Multi- and many-objective optimization test problems.
//!
//! Provides a uniform, batched evaluation contract for benchmark problems
//! together with the machinery their Pareto fronts rely on:
//!
//! - **Problem** ([`problem`]): bounds, counts, a formula producing
//!   objectives `F` and constraints `G`, and a lazily cached Pareto front.
//!   Evaluation accepts one design vector or a matrix of them and returns
//!   exactly the requested outputs (`F`, `G`, `CV`).
//! - **Reference directions** ([`ref_dirs`]): evenly spaced weight vectors
//!   on the unit simplex (Das-Dennis lattice) with a deterministic sizing
//!   search and a seeded random fill for exact counts.
//! - **Constraint violation** ([`constraint`]): the per-row sum of positive
//!   constraint values.
//! - **Pareto fronts** ([`front`]): closed-form, direction-mapped and
//!   tabulated front sources, with an explicit "unavailable" outcome.
//! - **Catalog** ([`problems`]): ZDT, DTLZ, C-DTLZ, BNH, OSY, TNK, Kursawe,
//!   engineering designs, G1–G10 and classic single-objective functions.
//! - **Registry** ([`registry`]): name → constructor lookup for the catalog.
//!
//! # Quick Start
//!
//! ```
//! use u_mop::problem::{EvalOptions, ReturnKey};
//! use u_mop::problems::dtlz;
//!
//! let problem = dtlz::dtlz2(12, 3).unwrap();
//! let x = vec![0.5; 12];
//! let out = problem
//!     .evaluate(&x, &EvalOptions::keys(["F", "CV"]).unwrap())
//!     .unwrap();
//! let f = out.get(ReturnKey::F).unwrap().as_vector().unwrap();
//! assert!((f.dot(f) - 1.0).abs() < 1e-12);
//!
//! let front = problem.pareto_front().unwrap();
//! assert_eq!(front.ncols(), 3);
//! ```
//!
//! # Features
//!
//! | Feature | Effect |
//! |---------|--------|
//! | `parallel` | Row chunks of large batches are evaluated with `rayon` |
//! | `serde` | `Serialize`/`Deserialize` for configuration and context types |
//! | `tracing` | Structured debug/info/warn events through `tracing` |

/// Emits a `tracing::debug!` event when the `tracing` feature is enabled.
/// No-op otherwise.
#[cfg(feature = "tracing")]
macro_rules! trace_debug {
    ($($arg:tt)*) => { tracing::debug!($($arg)*) };
}

#[cfg(not(feature = "tracing"))]
macro_rules! trace_debug {
    ($($arg:tt)*) => {};
}

/// Emits a `tracing::info!` event when the `tracing` feature is enabled.
/// No-op otherwise.
#[cfg(feature = "tracing")]
macro_rules! trace_info {
    ($($arg:tt)*) => { tracing::info!($($arg)*) };
}

#[cfg(not(feature = "tracing"))]
macro_rules! trace_info {
    ($($arg:tt)*) => {};
}

/// Emits a `tracing::warn!` event when the `tracing` feature is enabled.
/// No-op otherwise.
#[cfg(feature = "tracing")]
macro_rules! trace_warn {
    ($($arg:tt)*) => { tracing::warn!($($arg)*) };
}

#[cfg(not(feature = "tracing"))]
macro_rules! trace_warn {
    ($($arg:tt)*) => {};
}

pub mod constraint;
mod error;
pub mod front;
pub mod problem;
pub mod problems;
pub mod ref_dirs;
pub mod registry;

pub use error::{Error, Result};
