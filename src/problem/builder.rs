//! Problem construction.

use std::sync::OnceLock;

use ndarray::{Array1, Array2};

use super::problem::Problem;
use super::types::Formula;
use crate::error::{Error, Result};
use crate::front::{FrontProvider, NoFront};

/// A variable bound given either as one value for every variable or as an
/// explicit per-variable vector.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Bounds {
    /// Broadcast to all `n_var` variables.
    Scalar(f64),
    /// One value per variable.
    Vector(Vec<f64>),
}

impl Bounds {
    /// Expands to a vector of length `n_var`.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidArgument`] if an explicit vector has the wrong length.
    pub fn resolve(&self, n_var: usize, which: &str) -> Result<Array1<f64>> {
        match self {
            Bounds::Scalar(v) => Ok(Array1::from_elem(n_var, *v)),
            Bounds::Vector(values) if values.len() == n_var => Ok(Array1::from_vec(values.clone())),
            Bounds::Vector(values) => Err(Error::InvalidArgument(format!(
                "{which} has {} entries, expected n_var = {n_var}",
                values.len()
            ))),
        }
    }

    /// Length of an explicit vector, `None` for a scalar.
    pub fn len_hint(&self) -> Option<usize> {
        match self {
            Bounds::Scalar(_) => None,
            Bounds::Vector(values) => Some(values.len()),
        }
    }
}

impl From<f64> for Bounds {
    fn from(v: f64) -> Self {
        Bounds::Scalar(v)
    }
}

impl From<Vec<f64>> for Bounds {
    fn from(v: Vec<f64>) -> Self {
        Bounds::Vector(v)
    }
}

impl From<&[f64]> for Bounds {
    fn from(v: &[f64]) -> Self {
        Bounds::Vector(v.to_vec())
    }
}

impl<const N: usize> From<[f64; N]> for Bounds {
    fn from(v: [f64; N]) -> Self {
        Bounds::Vector(v.to_vec())
    }
}

impl From<Array1<f64>> for Bounds {
    fn from(v: Array1<f64>) -> Self {
        Bounds::Vector(v.to_vec())
    }
}

/// Builder for [`Problem`].
///
/// Defaults: `n_obj = 1`, `n_constr = 0`, `xl = 0`, `xu = 1`, no known
/// Pareto front or Pareto set.
///
/// # Examples
///
/// ```
/// use u_mop::problem::{Formula, ProblemBuilder};
///
/// let problem = ProblemBuilder::new("identity", 2)
///     .with_n_obj(2)
///     .with_formula(Formula::objectives_fn(|x, mut f| f.assign(&x)))
///     .build()
///     .unwrap();
/// assert_eq!(problem.n_var(), 2);
/// assert_eq!(problem.xu().to_vec(), vec![1.0, 1.0]);
/// ```
pub struct ProblemBuilder {
    name: String,
    n_var: usize,
    n_obj: usize,
    n_constr: usize,
    xl: Bounds,
    xu: Bounds,
    formula: Option<Formula>,
    front: Option<Box<dyn FrontProvider>>,
    pareto_set: Option<Array2<f64>>,
}

impl ProblemBuilder {
    /// Starts a problem with `n_var` decision variables.
    pub fn new(name: impl Into<String>, n_var: usize) -> Self {
        Self {
            name: name.into(),
            n_var,
            n_obj: 1,
            n_constr: 0,
            xl: Bounds::Scalar(0.0),
            xu: Bounds::Scalar(1.0),
            formula: None,
            front: None,
            pareto_set: None,
        }
    }

    /// Sets the number of objectives.
    pub fn with_n_obj(mut self, n_obj: usize) -> Self {
        self.n_obj = n_obj;
        self
    }

    /// Sets the number of constraints.
    pub fn with_n_constr(mut self, n_constr: usize) -> Self {
        self.n_constr = n_constr;
        self
    }

    /// Sets both bounds.
    pub fn with_bounds(mut self, xl: impl Into<Bounds>, xu: impl Into<Bounds>) -> Self {
        self.xl = xl.into();
        self.xu = xu.into();
        self
    }

    /// Sets the lower bound.
    pub fn with_xl(mut self, xl: impl Into<Bounds>) -> Self {
        self.xl = xl.into();
        self
    }

    /// Sets the upper bound.
    pub fn with_xu(mut self, xu: impl Into<Bounds>) -> Self {
        self.xu = xu.into();
        self
    }

    /// Sets the evaluation formula.
    pub fn with_formula(mut self, formula: Formula) -> Self {
        self.formula = Some(formula);
        self
    }

    /// Sets the Pareto-front provider.
    pub fn with_front(mut self, front: impl FrontProvider + 'static) -> Self {
        self.front = Some(Box::new(front));
        self
    }

    /// Sets the known optimal decision vectors, one per row.
    pub fn with_pareto_set(mut self, set: Array2<f64>) -> Self {
        self.pareto_set = Some(set);
        self
    }

    /// Validates the configuration and builds the problem.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidArgument`] when `n_var` or `n_obj` is zero, a bound
    /// vector has the wrong length, some `xl[i] > xu[i]` (or either is NaN),
    /// no formula was given, the formula's declared kind disagrees with
    /// `n_constr`, or a Pareto set does not have `n_var` columns.
    pub fn build(self) -> Result<Problem> {
        if self.n_var == 0 {
            return Err(Error::InvalidArgument("n_var must be positive".into()));
        }
        if self.n_obj == 0 {
            return Err(Error::InvalidArgument("n_obj must be at least 1".into()));
        }
        let formula = self
            .formula
            .ok_or_else(|| Error::InvalidArgument(format!("problem '{}' has no formula", self.name)))?;
        match (formula.has_constraints(), self.n_constr > 0) {
            (true, false) => {
                return Err(Error::InvalidArgument(format!(
                    "problem '{}': constrained formula but n_constr = 0",
                    self.name
                )))
            }
            (false, true) => {
                return Err(Error::InvalidArgument(format!(
                    "problem '{}': n_constr = {} but the formula fills no constraints",
                    self.name, self.n_constr
                )))
            }
            _ => {}
        }

        let xl = self.xl.resolve(self.n_var, "xl")?;
        let xu = self.xu.resolve(self.n_var, "xu")?;
        if let Some(i) = (0..self.n_var).find(|&i| xl[i].is_nan() || xu[i].is_nan() || xl[i] > xu[i]) {
            return Err(Error::InvalidArgument(format!(
                "xl[{i}] = {} is not <= xu[{i}] = {}",
                xl[i], xu[i]
            )));
        }

        if let Some(set) = &self.pareto_set {
            if set.ncols() != self.n_var {
                return Err(Error::InvalidArgument(format!(
                    "problem '{}': pareto set has {} columns, expected n_var = {}",
                    self.name,
                    set.ncols(),
                    self.n_var
                )));
            }
        }

        Ok(Problem {
            name: self.name,
            n_var: self.n_var,
            n_obj: self.n_obj,
            n_constr: self.n_constr,
            xl,
            xu,
            formula,
            front: self.front.unwrap_or_else(|| Box::new(NoFront)),
            front_cache: OnceLock::new(),
            pareto_set: self.pareto_set,
        })
    }
}
