//! Composition wrappers.
//!
//! A wrapper holds an inner [`Problem`] and applies an objective transform
//! to everything the inner problem produces: its evaluations and its Pareto
//! front. Constraints, bounds, and counts pass through unchanged.

use std::sync::Arc;

use ndarray::{Array2, ArrayView2, ArrayViewMut2};

use super::builder::ProblemBuilder;
use super::problem::Problem;
use super::types::{ConstrainedWithContext, EvalContext, Formula, ObjectivesWithContext};
use crate::error::{Error, Result};
use crate::front::{FrontOutcome, FrontProvider, FrontRequest};

type ObjectiveMap = dyn Fn(ArrayViewMut2<'_, f64>) + Send + Sync;

struct Transformed {
    inner: Arc<Problem>,
    map: Arc<ObjectiveMap>,
}

impl ObjectivesWithContext for Transformed {
    fn evaluate(&self, x: ArrayView2<'_, f64>, mut f: ArrayViewMut2<'_, f64>, ctx: &EvalContext) {
        let mut g = Array2::<f64>::zeros((x.nrows(), 0));
        self.inner.formula().invoke(x, f.view_mut(), g.view_mut(), ctx);
        (self.map)(f);
    }
}

impl ConstrainedWithContext for Transformed {
    fn evaluate(
        &self,
        x: ArrayView2<'_, f64>,
        mut f: ArrayViewMut2<'_, f64>,
        g: ArrayViewMut2<'_, f64>,
        ctx: &EvalContext,
    ) {
        self.inner.formula().invoke(x, f.view_mut(), g, ctx);
        (self.map)(f);
    }
}

struct TransformedFront {
    inner: Arc<Problem>,
    map: Arc<ObjectiveMap>,
}

impl FrontProvider for TransformedFront {
    fn compute(&self, request: &FrontRequest<'_>) -> Result<FrontOutcome> {
        let inner = match request.ref_dirs {
            Some(dirs) => self.inner.pareto_front_with(dirs),
            None => self.inner.pareto_front().cloned(),
        };
        match inner {
            Ok(mut front) => {
                (self.map)(front.view_mut());
                Ok(FrontOutcome::Computed(front))
            }
            Err(Error::ParetoFrontUnavailable { .. }) => Ok(FrontOutcome::Unavailable),
            Err(e) => Err(e),
        }
    }
}

/// Wraps `inner`, applying `map` in place to every objective matrix.
///
/// The wrapper always declares a context so one supplied by the caller
/// reaches the inner formula.
///
/// # Errors
///
/// Propagates construction errors (none for a valid inner problem).
pub fn transformed(
    inner: Arc<Problem>,
    name: impl Into<String>,
    map: impl Fn(ArrayViewMut2<'_, f64>) + Send + Sync + 'static,
) -> Result<Problem> {
    let map: Arc<ObjectiveMap> = Arc::new(map);
    let body = Transformed {
        inner: inner.clone(),
        map: map.clone(),
    };
    let formula = if inner.has_constraints() {
        Formula::ConstrainedWithContext(Arc::new(body))
    } else {
        Formula::UnconstrainedWithContext(Arc::new(body))
    };
    ProblemBuilder::new(name, inner.n_var())
        .with_n_obj(inner.n_obj())
        .with_n_constr(inner.n_constr())
        .with_bounds(inner.xl().clone(), inner.xu().clone())
        .with_formula(formula)
        .with_front(TransformedFront { inner, map })
        .build()
}

/// Multiplies objective `i` by `factor^i`.
///
/// Produces badly scaled variants of a problem for testing normalization.
/// The inner problem's Pareto set carries over.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
/// use u_mop::problem::scaled;
/// use u_mop::problems::dtlz;
///
/// let inner = Arc::new(dtlz::dtlz1(7, 3).unwrap());
/// let problem = scaled(inner, 10.0).unwrap();
/// assert_eq!(problem.name(), "dtlz1_scaled");
/// let nadir = problem.nadir_point().unwrap();
/// assert!(nadir[2] > nadir[0]);
/// ```
pub fn scaled(inner: Arc<Problem>, factor: f64) -> Result<Problem> {
    if !factor.is_finite() || factor <= 0.0 {
        return Err(Error::InvalidArgument(format!(
            "scale factor must be positive and finite, got {factor}"
        )));
    }
    let name = format!("{}_scaled", inner.name());
    // positive scaling keeps the optimal decision vectors
    let set = inner.pareto_set().cloned();
    let mut problem = transformed(inner, name, move |mut f| {
        let mut weight = 1.0;
        for mut column in f.columns_mut() {
            column *= weight;
            weight *= factor;
        }
    })?;
    problem.pareto_set = set;
    Ok(problem)
}

/// Raises every objective to the 4th power, the last one to the 2nd.
///
/// Turns a linear or spherical front into a convex one.
pub fn convex(inner: Arc<Problem>) -> Result<Problem> {
    let name = format!("{}_convex", inner.name());
    transformed(inner, name, |mut f| {
        let last = f.ncols().saturating_sub(1);
        for (j, mut column) in f.columns_mut().into_iter().enumerate() {
            let power = if j == last { 2 } else { 4 };
            column.mapv_inplace(|v| v.powi(power));
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::front::ClosedForm;
    use crate::problem::{EvalOptions, FrontState};
    use ndarray::array;

    fn linear() -> Arc<Problem> {
        Arc::new(
            ProblemBuilder::new("lin", 3)
                .with_n_obj(3)
                .with_formula(Formula::objectives_fn(|x, mut f| f.assign(&x)))
                .with_front(ClosedForm::new(|| array![[0.5, 0.5, 0.5]]))
                .build()
                .unwrap(),
        )
    }

    #[test]
    fn test_scaled_objectives() {
        let p = scaled(linear(), 10.0).unwrap();
        let out = p.evaluate(&array![1.0, 1.0, 1.0], &EvalOptions::default()).unwrap();
        assert_eq!(out.f().unwrap().as_vector().unwrap(), &array![1.0, 10.0, 100.0]);
    }

    #[test]
    fn test_scaled_front() {
        let p = scaled(linear(), 2.0).unwrap();
        assert_eq!(p.pareto_front().unwrap(), &array![[0.5, 1.0, 2.0]]);
    }

    #[test]
    fn test_scaled_keeps_pareto_set() {
        let inner = Arc::new(crate::problems::g::g06().unwrap());
        let p = scaled(inner.clone(), 3.0).unwrap();
        assert!(p.pareto_set().is_some());
        assert_eq!(p.pareto_set(), inner.pareto_set());
        assert!(convex(inner).unwrap().pareto_set().is_none());
    }

    #[test]
    fn test_convex_powers() {
        let p = convex(linear()).unwrap();
        let out = p.evaluate(&array![2.0, 2.0, 2.0], &EvalOptions::default()).unwrap();
        assert_eq!(out.f().unwrap().as_vector().unwrap(), &array![16.0, 16.0, 4.0]);
    }

    #[test]
    fn test_wrapper_passes_constraints() {
        let inner = Arc::new(
            ProblemBuilder::new("c", 1)
                .with_n_constr(1)
                .with_formula(Formula::constrained_fn(|x, mut f, mut g| {
                    f.assign(&x);
                    g.assign(&x);
                }))
                .build()
                .unwrap(),
        );
        let p = scaled(inner, 3.0).unwrap();
        assert_eq!(p.n_constr(), 1);
        let out = p.evaluate(&array![0.5], &EvalOptions::default()).unwrap();
        assert_eq!(out.cv().unwrap().as_vector().unwrap(), &array![0.5]);
    }

    #[test]
    fn test_unavailable_inner_front() {
        let inner = Arc::new(
            ProblemBuilder::new("none", 1)
                .with_formula(Formula::objectives_fn(|_, _| {}))
                .build()
                .unwrap(),
        );
        let p = convex(inner).unwrap();
        assert!(matches!(p.pareto_front(), Err(Error::ParetoFrontUnavailable { .. })));
        assert_eq!(p.front_state(), FrontState::Unavailable);
    }

    #[test]
    fn test_invalid_factor() {
        assert!(scaled(linear(), 0.0).is_err());
        assert!(scaled(linear(), f64::NAN).is_err());
    }
}
