//! Evaluation dispatcher.
//!
//! [`Problem::evaluate`] turns a design (one vector or a row matrix) into the
//! requested subset of `F`, `G`, and `CV`:
//!
//! 1. normalize a single vector to one row and remember to de-batch;
//! 2. reject a width other than `n_var` before anything is allocated;
//! 3. allocate zeroed `F` (`rows × n_obj`) and `G` (`rows × n_constr`);
//! 4. invoke the formula according to its declared [`Formula`](super::Formula) variant;
//! 5. derive `CV` from `G` (a zero column when there are no constraints);
//! 6. return exactly the requested keys, in request order.

use std::fmt;
use std::str::FromStr;

use ndarray::{Array1, Array2, ArrayView1, ArrayView2, Axis};

use super::problem::Problem;
use super::types::EvalContext;
use crate::constraint::calc_constraint_violation;
use crate::error::{Error, Result};

/// An output an evaluation can return.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ReturnKey {
    /// Objective values.
    F,
    /// Constraint values.
    G,
    /// Constraint violation.
    CV,
}

impl ReturnKey {
    /// The key's canonical name.
    pub fn as_str(self) -> &'static str {
        match self {
            ReturnKey::F => "F",
            ReturnKey::G => "G",
            ReturnKey::CV => "CV",
        }
    }
}

impl fmt::Display for ReturnKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ReturnKey {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "F" => Ok(ReturnKey::F),
            "G" => Ok(ReturnKey::G),
            "CV" => Ok(ReturnKey::CV),
            other => Err(Error::UnknownReturnKey(other.to_string())),
        }
    }
}

/// Which outputs to return.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Returns {
    /// `F`, then `G` if `return_constraints`, then `CV` if
    /// `return_constraint_violation`.
    Flags {
        /// Append `CV`.
        return_constraint_violation: bool,
        /// Append `G`.
        return_constraints: bool,
    },
    /// Exactly these keys, in this order.
    Keys(Vec<ReturnKey>),
}

impl Default for Returns {
    fn default() -> Self {
        Returns::Flags {
            return_constraint_violation: true,
            return_constraints: false,
        }
    }
}

impl Returns {
    /// The requested keys in output order.
    pub fn keys(&self) -> Vec<ReturnKey> {
        match self {
            Returns::Flags {
                return_constraint_violation,
                return_constraints,
            } => {
                let mut keys = vec![ReturnKey::F];
                if *return_constraints {
                    keys.push(ReturnKey::G);
                }
                if *return_constraint_violation {
                    keys.push(ReturnKey::CV);
                }
                keys
            }
            Returns::Keys(keys) => keys.clone(),
        }
    }
}

/// Options for [`Problem::evaluate`].
///
/// # Examples
///
/// ```
/// use u_mop::problem::{EvalOptions, ReturnKey};
///
/// let opts = EvalOptions::keys(["CV", "F"]).unwrap();
/// assert_eq!(opts.returns.keys(), vec![ReturnKey::CV, ReturnKey::F]);
///
/// assert!(EvalOptions::keys(["F", "dF"]).is_err());
/// ```
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EvalOptions {
    /// Output selection.
    pub returns: Returns,

    /// Context handed to formulas that accept one. Formulas declared with a
    /// context receive an empty one when this is `None`.
    pub context: Option<EvalContext>,

    /// Split the batch into row chunks evaluated in parallel. Only honored
    /// when the crate is built with the `parallel` feature.
    pub parallel: bool,

    /// Rows per parallel chunk.
    pub chunk_size: usize,
}

impl Default for EvalOptions {
    fn default() -> Self {
        Self {
            returns: Returns::default(),
            context: None,
            parallel: false,
            chunk_size: 256,
        }
    }
}

impl EvalOptions {
    /// Requests exactly the named keys, in order.
    ///
    /// # Errors
    ///
    /// [`Error::UnknownReturnKey`] for a name other than `F`, `G`, `CV`.
    pub fn keys<I, S>(names: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let keys = names
            .into_iter()
            .map(|name| name.as_ref().parse())
            .collect::<Result<Vec<ReturnKey>>>()?;
        Ok(Self::default().with_keys(keys))
    }

    /// Requests exactly `keys`, in order.
    pub fn with_keys(mut self, keys: Vec<ReturnKey>) -> Self {
        self.returns = Returns::Keys(keys);
        self
    }

    /// Uses flag selection.
    pub fn with_flags(mut self, return_constraint_violation: bool, return_constraints: bool) -> Self {
        self.returns = Returns::Flags {
            return_constraint_violation,
            return_constraints,
        };
        self
    }

    /// Sets the context.
    pub fn with_context(mut self, context: EvalContext) -> Self {
        self.context = Some(context);
        self
    }

    /// Enables or disables parallel chunked evaluation.
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Sets the rows per parallel chunk.
    pub fn with_chunk_size(mut self, chunk_size: usize) -> Self {
        self.chunk_size = chunk_size;
        self
    }

    /// Validates the options.
    pub fn validate(&self) -> std::result::Result<(), String> {
        if self.chunk_size == 0 {
            return Err("chunk_size must be positive".into());
        }
        if let Returns::Keys(keys) = &self.returns {
            if keys.is_empty() {
                return Err("at least one return key is required".into());
            }
        }
        Ok(())
    }
}

/// Input to [`Problem::evaluate`]: one design vector or a row matrix.
#[derive(Debug, Clone, Copy)]
pub enum Design<'a> {
    /// One candidate; outputs are de-batched to vectors.
    Vector(ArrayView1<'a, f64>),
    /// One candidate per row.
    Matrix(ArrayView2<'a, f64>),
}

impl<'a> From<ArrayView1<'a, f64>> for Design<'a> {
    fn from(x: ArrayView1<'a, f64>) -> Self {
        Design::Vector(x)
    }
}

impl<'a> From<&'a Array1<f64>> for Design<'a> {
    fn from(x: &'a Array1<f64>) -> Self {
        Design::Vector(x.view())
    }
}

impl<'a> From<&'a [f64]> for Design<'a> {
    fn from(x: &'a [f64]) -> Self {
        Design::Vector(ArrayView1::from(x))
    }
}

impl<'a> From<&'a Vec<f64>> for Design<'a> {
    fn from(x: &'a Vec<f64>) -> Self {
        Design::Vector(ArrayView1::from(x.as_slice()))
    }
}

impl<'a> From<ArrayView2<'a, f64>> for Design<'a> {
    fn from(x: ArrayView2<'a, f64>) -> Self {
        Design::Matrix(x)
    }
}

impl<'a> From<&'a Array2<f64>> for Design<'a> {
    fn from(x: &'a Array2<f64>) -> Self {
        Design::Matrix(x.view())
    }
}

/// One returned output, shaped like the input batch.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// De-batched output of a single-vector evaluation.
    Vector(Array1<f64>),
    /// Batched output, one row per candidate.
    Matrix(Array2<f64>),
}

impl Value {
    /// The vector, if de-batched.
    pub fn as_vector(&self) -> Option<&Array1<f64>> {
        match self {
            Value::Vector(v) => Some(v),
            Value::Matrix(_) => None,
        }
    }

    /// The matrix, if batched.
    pub fn as_matrix(&self) -> Option<&Array2<f64>> {
        match self {
            Value::Matrix(m) => Some(m),
            Value::Vector(_) => None,
        }
    }

    /// Consumes into a vector, if de-batched.
    pub fn into_vector(self) -> Option<Array1<f64>> {
        match self {
            Value::Vector(v) => Some(v),
            Value::Matrix(_) => None,
        }
    }

    /// Consumes into a matrix, if batched.
    pub fn into_matrix(self) -> Option<Array2<f64>> {
        match self {
            Value::Matrix(m) => Some(m),
            Value::Vector(_) => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Vector(v) => write!(f, "{v}"),
            Value::Matrix(m) => write!(f, "{m}"),
        }
    }
}

/// The requested outputs, in request order.
#[derive(Debug, Clone, PartialEq)]
pub struct Outputs {
    entries: Vec<(ReturnKey, Value)>,
}

impl Outputs {
    /// Looks up an output by key.
    pub fn get(&self, key: ReturnKey) -> Option<&Value> {
        self.entries.iter().find(|(k, _)| *k == key).map(|(_, v)| v)
    }

    /// Objective values, if requested.
    pub fn f(&self) -> Option<&Value> {
        self.get(ReturnKey::F)
    }

    /// Constraint values, if requested.
    pub fn g(&self) -> Option<&Value> {
        self.get(ReturnKey::G)
    }

    /// Constraint violation, if requested.
    pub fn cv(&self) -> Option<&Value> {
        self.get(ReturnKey::CV)
    }

    /// Returned keys in order.
    pub fn keys(&self) -> impl Iterator<Item = ReturnKey> + '_ {
        self.entries.iter().map(|(k, _)| *k)
    }

    /// Iterates `(key, value)` pairs in order.
    pub fn iter(&self) -> impl Iterator<Item = (ReturnKey, &Value)> {
        self.entries.iter().map(|(k, v)| (*k, v))
    }

    /// Number of returned outputs.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if nothing was returned.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The values in order, dropping keys.
    pub fn into_values(self) -> Vec<Value> {
        self.entries.into_iter().map(|(_, v)| v).collect()
    }
}

/// Full batched evaluation result.
#[derive(Debug, Clone, PartialEq)]
pub struct EvaluationResult {
    /// Objectives, `rows × n_obj`.
    pub f: Array2<f64>,
    /// Constraints, `rows × n_constr` (zero columns when unconstrained).
    pub g: Array2<f64>,
    /// Constraint violation, `rows × 1`.
    pub cv: Array2<f64>,
}

impl EvaluationResult {
    /// Number of evaluated rows.
    pub fn len(&self) -> usize {
        self.f.nrows()
    }

    /// Returns `true` if no rows were evaluated.
    pub fn is_empty(&self) -> bool {
        self.f.nrows() == 0
    }

    fn select(self, keys: &[ReturnKey], single: bool) -> Outputs {
        let entries = keys
            .iter()
            .map(|&key| {
                let matrix = match key {
                    ReturnKey::F => &self.f,
                    ReturnKey::G => &self.g,
                    ReturnKey::CV => &self.cv,
                };
                let value = if single {
                    Value::Vector(matrix.row(0).to_owned())
                } else {
                    Value::Matrix(matrix.clone())
                };
                (key, value)
            })
            .collect();
        Outputs { entries }
    }
}

impl Problem {
    /// Evaluates a design and returns the requested outputs.
    ///
    /// A single vector yields vector outputs; a matrix yields matrices with
    /// one row per input row.
    ///
    /// # Errors
    ///
    /// - [`Error::DimensionMismatch`] if the design width is not `n_var`.
    ///   Nothing is allocated and the formula is not called.
    /// - [`Error::InvalidArgument`] for invalid options.
    ///
    /// # Examples
    ///
    /// ```
    /// use ndarray::array;
    /// use u_mop::problem::{EvalOptions, Formula, ProblemBuilder};
    ///
    /// let problem = ProblemBuilder::new("identity", 2)
    ///     .with_n_obj(2)
    ///     .with_formula(Formula::objectives_fn(|x, mut f| f.assign(&x)))
    ///     .build()
    ///     .unwrap();
    ///
    /// let x = array![0.2, 0.8];
    /// let out = problem.evaluate(&x, &EvalOptions::default()).unwrap();
    /// assert_eq!(out.f().unwrap().as_vector().unwrap(), &array![0.2, 0.8]);
    /// assert_eq!(out.cv().unwrap().as_vector().unwrap(), &array![0.0]);
    /// ```
    pub fn evaluate<'a>(&self, x: impl Into<Design<'a>>, options: &EvalOptions) -> Result<Outputs> {
        let (matrix, single) = match x.into() {
            Design::Vector(v) => (v.insert_axis(Axis(0)), true),
            Design::Matrix(m) => (m, false),
        };
        let result = self.evaluate_batch(matrix, options)?;
        Ok(result.select(&options.returns.keys(), single))
    }

    /// Evaluates a row matrix and returns every output.
    ///
    /// # Errors
    ///
    /// As [`evaluate`](Self::evaluate).
    pub fn evaluate_batch(&self, x: ArrayView2<'_, f64>, options: &EvalOptions) -> Result<EvaluationResult> {
        options.validate().map_err(Error::InvalidArgument)?;
        if x.ncols() != self.n_var {
            return Err(Error::DimensionMismatch {
                expected: self.n_var,
                got: x.ncols(),
            });
        }
        let rows = x.nrows();
        trace_debug!(problem = %self.name, rows, "evaluating batch");

        let mut f = Array2::zeros((rows, self.n_obj));
        let mut g = Array2::zeros((rows, self.n_constr));
        let empty = EvalContext::default();
        let ctx = options.context.as_ref().unwrap_or(&empty);

        self.dispatch(x, &mut f, &mut g, ctx, options);

        let cv = calc_constraint_violation(&g);
        Ok(EvaluationResult { f, g, cv })
    }

    #[cfg(feature = "parallel")]
    fn dispatch(
        &self,
        x: ArrayView2<'_, f64>,
        f: &mut Array2<f64>,
        g: &mut Array2<f64>,
        ctx: &EvalContext,
        options: &EvalOptions,
    ) {
        use rayon::prelude::*;

        let chunk = options.chunk_size;
        if !options.parallel || x.nrows() <= chunk {
            self.formula.invoke(x, f.view_mut(), g.view_mut(), ctx);
            return;
        }
        let tasks: Vec<_> = x
            .axis_chunks_iter(Axis(0), chunk)
            .zip(f.axis_chunks_iter_mut(Axis(0), chunk))
            .zip(g.axis_chunks_iter_mut(Axis(0), chunk))
            .collect();
        tasks
            .into_par_iter()
            .for_each(|((xc, fc), gc)| self.formula.invoke(xc, fc, gc, ctx));
    }

    #[cfg(not(feature = "parallel"))]
    fn dispatch(
        &self,
        x: ArrayView2<'_, f64>,
        f: &mut Array2<f64>,
        g: &mut Array2<f64>,
        ctx: &EvalContext,
        _options: &EvalOptions,
    ) {
        self.formula.invoke(x, f.view_mut(), g.view_mut(), ctx);
    }
}
