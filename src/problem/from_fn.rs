//! Problems backed by a plain batch function.

use ndarray::{Array2, ArrayView2, ArrayViewMut2, Axis};

use super::builder::{Bounds, ProblemBuilder};
use super::problem::Problem;
use super::types::Formula;
use crate::error::{Error, Result};

impl Problem {
    /// Builds a problem from a function returning `(F, Option<G>)` for a
    /// batch of rows.
    ///
    /// `n_var` is taken from whichever bound is an explicit vector. `n_obj`
    /// and `n_constr` are discovered by evaluating the function once at
    /// `xl`. The problem has no known Pareto front.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidArgument`] if both bounds are scalars, the evaluation
    /// at `xl` returns other than one row, or the problem fails validation.
    ///
    /// # Examples
    ///
    /// ```
    /// use ndarray::{Array2, ArrayView2, Axis};
    /// use u_mop::problem::{EvalOptions, Problem};
    ///
    /// let problem = Problem::from_fn("sum_sq", vec![-1.0; 3], vec![1.0; 3], |x: ArrayView2<'_, f64>| {
    ///     let f = x.mapv(|v| v * v).sum_axis(Axis(1)).insert_axis(Axis(1));
    ///     (f, None::<Array2<f64>>)
    /// })
    /// .unwrap();
    /// assert_eq!((problem.n_var(), problem.n_obj(), problem.n_constr()), (3, 1, 0));
    /// ```
    pub fn from_fn<F>(
        name: impl Into<String>,
        xl: impl Into<Bounds>,
        xu: impl Into<Bounds>,
        func: F,
    ) -> Result<Problem>
    where
        F: Fn(ArrayView2<'_, f64>) -> (Array2<f64>, Option<Array2<f64>>) + Send + Sync + 'static,
    {
        let (xl, xu) = (xl.into(), xu.into());
        let n_var = xl.len_hint().or(xu.len_hint()).ok_or_else(|| {
            Error::InvalidArgument("n_var cannot be inferred from scalar bounds".into())
        })?;
        Self::from_fn_with_n_var(name, n_var, xl, xu, func)
    }

    /// [`from_fn`](Self::from_fn) with an explicit variable count, for
    /// scalar bounds.
    ///
    /// # Errors
    ///
    /// As [`from_fn`](Self::from_fn).
    pub fn from_fn_with_n_var<F>(
        name: impl Into<String>,
        n_var: usize,
        xl: impl Into<Bounds>,
        xu: impl Into<Bounds>,
        func: F,
    ) -> Result<Problem>
    where
        F: Fn(ArrayView2<'_, f64>) -> (Array2<f64>, Option<Array2<f64>>) + Send + Sync + 'static,
    {
        let name = name.into();
        let (xl, xu) = (xl.into(), xu.into());
        let lower = xl.resolve(n_var, "xl")?;

        let (f, g) = func(lower.view().insert_axis(Axis(0)));
        if f.nrows() != 1 {
            return Err(Error::InvalidArgument(format!(
                "problem '{name}': evaluation at xl returned {} rows of F, expected 1",
                f.nrows()
            )));
        }
        let n_obj = f.ncols();
        let n_constr = g.as_ref().map_or(0, Array2::ncols);
        trace_debug!(problem = %name, n_obj, n_constr, "sized function-backed problem");

        let formula = if n_constr > 0 {
            Formula::constrained_fn(move |x, mut f, mut g| {
                let (fv, gv) = func(x);
                copy_into(f.view_mut(), &fv, "F");
                match gv {
                    Some(gv) => copy_into(g.view_mut(), &gv, "G"),
                    None => g.fill(f64::NAN),
                }
            })
        } else {
            Formula::objectives_fn(move |x, mut f| {
                let (fv, _) = func(x);
                copy_into(f.view_mut(), &fv, "F");
            })
        };

        ProblemBuilder::new(name, n_var)
            .with_n_obj(n_obj)
            .with_n_constr(n_constr)
            .with_bounds(xl, xu)
            .with_formula(formula)
            .build()
    }
}

/// Copies a function result into its buffer. A result of the wrong shape
/// poisons the buffer with NaN.
#[cfg_attr(not(feature = "tracing"), allow(unused_variables))]
fn copy_into(mut dst: ArrayViewMut2<'_, f64>, src: &Array2<f64>, which: &str) {
    if dst.shape() == src.shape() {
        dst.assign(src);
    } else {
        trace_warn!(
            output = which,
            expected = ?dst.shape(),
            got = ?src.shape(),
            "function returned a mis-shaped output"
        );
        dst.fill(f64::NAN);
    }
}
