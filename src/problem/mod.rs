//! Problem descriptors and the evaluation dispatcher.
//!
//! A [`Problem`] bundles counts (`n_var`, `n_obj`, `n_constr`), variable
//! bounds, a [`Formula`], and a [`FrontProvider`](crate::front::FrontProvider).
//! [`Problem::evaluate`] is the single entry point every search algorithm
//! uses, whatever the formula.
//!
//! # Key Types
//!
//! - [`Problem`]: the descriptor, with the lazily cached Pareto front
//! - [`ProblemBuilder`] / [`Bounds`]: validated construction
//! - [`Formula`]: declared calling convention (constraints, context)
//! - [`EvalOptions`] / [`Outputs`]: output selection and the result
//! - [`scaled`] / [`convex`]: composition wrappers
//!
//! # Examples
//!
//! ```
//! use ndarray::array;
//! use u_mop::problem::{EvalOptions, Formula, ProblemBuilder};
//!
//! let problem = ProblemBuilder::new("circle", 2)
//!     .with_n_obj(2)
//!     .with_n_constr(1)
//!     .with_bounds(-1.0, 1.0)
//!     .with_formula(Formula::constrained_fn(|x, mut f, mut g| {
//!         f.assign(&x);
//!         for (i, row) in x.rows().into_iter().enumerate() {
//!             g[[i, 0]] = row.dot(&row) - 0.25;
//!         }
//!     }))
//!     .build()
//!     .unwrap();
//!
//! let out = problem
//!     .evaluate(&array![[0.0, 0.0], [1.0, 0.0]], &EvalOptions::default())
//!     .unwrap();
//! assert_eq!(out.cv().unwrap().as_matrix().unwrap(), &array![[0.0], [0.75]]);
//! ```

mod builder;
mod evaluate;
mod from_fn;
#[allow(clippy::module_inception)]
mod problem;
mod transform;
mod types;

pub use builder::{Bounds, ProblemBuilder};
pub use evaluate::{Design, EvalOptions, EvaluationResult, Outputs, ReturnKey, Returns, Value};
pub use problem::{FrontState, Problem};
pub use transform::{convex, scaled, transformed};
pub use types::{
    Constrained, ConstrainedWithContext, EvalContext, Formula, Objectives, ObjectivesWithContext,
};
