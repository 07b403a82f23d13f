//! Formula capabilities.
//!
//! A problem's formula writes objective values (and constraint values) for a
//! batch of candidates into buffers allocated by the dispatcher. The calling
//! convention is declared up front by the [`Formula`] variant: whether the
//! formula fills constraints and whether it reads an [`EvalContext`]. The
//! dispatcher matches on the variant; it never inspects the callable.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use ndarray::{ArrayView2, ArrayViewMut2};

/// A formula that fills objectives only: `(X, F)`.
///
/// `x` is `rows × n_var`; `f` is a zero-initialized `rows × n_obj` buffer.
/// Implementations must treat rows independently: the dispatcher may split
/// a batch into chunks.
pub trait Objectives: Send + Sync {
    /// Writes the objective values of every row of `x` into `f`.
    fn evaluate(&self, x: ArrayView2<'_, f64>, f: ArrayViewMut2<'_, f64>);
}

/// A formula that fills objectives and constraints: `(X, F, G)`.
///
/// `g` is a zero-initialized `rows × n_constr` buffer. A constraint value is
/// violated when positive.
pub trait Constrained: Send + Sync {
    /// Writes objective and constraint values of every row of `x`.
    fn evaluate(&self, x: ArrayView2<'_, f64>, f: ArrayViewMut2<'_, f64>, g: ArrayViewMut2<'_, f64>);
}

/// [`Objectives`] with access to an auxiliary [`EvalContext`].
pub trait ObjectivesWithContext: Send + Sync {
    /// Writes the objective values of every row of `x` into `f`.
    fn evaluate(&self, x: ArrayView2<'_, f64>, f: ArrayViewMut2<'_, f64>, ctx: &EvalContext);
}

/// [`Constrained`] with access to an auxiliary [`EvalContext`].
pub trait ConstrainedWithContext: Send + Sync {
    /// Writes objective and constraint values of every row of `x`.
    fn evaluate(
        &self,
        x: ArrayView2<'_, f64>,
        f: ArrayViewMut2<'_, f64>,
        g: ArrayViewMut2<'_, f64>,
        ctx: &EvalContext,
    );
}

/// Named numeric values passed through an evaluation to formulas that
/// declare they accept a context.
///
/// ```
/// use u_mop::problem::EvalContext;
///
/// let ctx = EvalContext::new().with("noise", 0.1);
/// assert_eq!(ctx.get("noise"), Some(0.1));
/// assert_eq!(ctx.get_or("missing", 2.0), 2.0);
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EvalContext {
    values: HashMap<String, f64>,
}

impl EvalContext {
    /// Creates an empty context.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a value.
    pub fn with(mut self, key: impl Into<String>, value: f64) -> Self {
        self.values.insert(key.into(), value);
        self
    }

    /// Sets a value.
    pub fn set(&mut self, key: impl Into<String>, value: f64) {
        self.values.insert(key.into(), value);
    }

    /// Looks up a value.
    pub fn get(&self, key: &str) -> Option<f64> {
        self.values.get(key).copied()
    }

    /// Looks up a value, falling back to `default`.
    pub fn get_or(&self, key: &str, default: f64) -> f64 {
        self.get(key).unwrap_or(default)
    }

    /// Returns `true` if no values are set.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// The declared calling convention of a problem's formula.
///
/// The variant is the contract: a formula that fills constraints is
/// `Constrained*`, one that reads the context is `*WithContext`.
#[derive(Clone)]
pub enum Formula {
    /// `(X, F)`.
    Unconstrained(Arc<dyn Objectives>),
    /// `(X, F, G)`.
    Constrained(Arc<dyn Constrained>),
    /// `(X, F, ctx)`.
    UnconstrainedWithContext(Arc<dyn ObjectivesWithContext>),
    /// `(X, F, G, ctx)`.
    ConstrainedWithContext(Arc<dyn ConstrainedWithContext>),
}

impl Formula {
    /// Wraps an [`Objectives`] implementation.
    pub fn unconstrained(formula: impl Objectives + 'static) -> Self {
        Formula::Unconstrained(Arc::new(formula))
    }

    /// Wraps a [`Constrained`] implementation.
    pub fn constrained(formula: impl Constrained + 'static) -> Self {
        Formula::Constrained(Arc::new(formula))
    }

    /// Wraps an objectives-only closure.
    ///
    /// ```
    /// use u_mop::problem::Formula;
    ///
    /// let identity = Formula::objectives_fn(|x, mut f| f.assign(&x));
    /// assert!(!identity.has_constraints());
    /// ```
    pub fn objectives_fn<F>(func: F) -> Self
    where
        F: Fn(ArrayView2<'_, f64>, ArrayViewMut2<'_, f64>) + Send + Sync + 'static,
    {
        Formula::Unconstrained(Arc::new(ObjectivesClosure(func)))
    }

    /// Wraps a closure filling objectives and constraints.
    pub fn constrained_fn<F>(func: F) -> Self
    where
        F: Fn(ArrayView2<'_, f64>, ArrayViewMut2<'_, f64>, ArrayViewMut2<'_, f64>)
            + Send
            + Sync
            + 'static,
    {
        Formula::Constrained(Arc::new(ConstrainedClosure(func)))
    }

    /// Wraps an objectives-only closure that reads the context.
    pub fn objectives_with_context_fn<F>(func: F) -> Self
    where
        F: Fn(ArrayView2<'_, f64>, ArrayViewMut2<'_, f64>, &EvalContext) + Send + Sync + 'static,
    {
        Formula::UnconstrainedWithContext(Arc::new(ObjectivesContextClosure(func)))
    }

    /// Wraps a constrained closure that reads the context.
    pub fn constrained_with_context_fn<F>(func: F) -> Self
    where
        F: Fn(ArrayView2<'_, f64>, ArrayViewMut2<'_, f64>, ArrayViewMut2<'_, f64>, &EvalContext)
            + Send
            + Sync
            + 'static,
    {
        Formula::ConstrainedWithContext(Arc::new(ConstrainedContextClosure(func)))
    }

    /// Whether the formula fills a constraint buffer.
    pub fn has_constraints(&self) -> bool {
        matches!(
            self,
            Formula::Constrained(_) | Formula::ConstrainedWithContext(_)
        )
    }

    /// Whether the formula reads an [`EvalContext`].
    pub fn accepts_context(&self) -> bool {
        matches!(
            self,
            Formula::UnconstrainedWithContext(_) | Formula::ConstrainedWithContext(_)
        )
    }

    /// Invokes the formula according to its declared convention.
    ///
    /// `g` is ignored by unconstrained formulas and `ctx` by formulas that do
    /// not accept a context.
    pub(crate) fn invoke(
        &self,
        x: ArrayView2<'_, f64>,
        f: ArrayViewMut2<'_, f64>,
        g: ArrayViewMut2<'_, f64>,
        ctx: &EvalContext,
    ) {
        match self {
            Formula::Unconstrained(h) => h.evaluate(x, f),
            Formula::Constrained(h) => h.evaluate(x, f, g),
            Formula::UnconstrainedWithContext(h) => h.evaluate(x, f, ctx),
            Formula::ConstrainedWithContext(h) => h.evaluate(x, f, g, ctx),
        }
    }
}

impl fmt::Debug for Formula {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kind = match self {
            Formula::Unconstrained(_) => "Unconstrained",
            Formula::Constrained(_) => "Constrained",
            Formula::UnconstrainedWithContext(_) => "UnconstrainedWithContext",
            Formula::ConstrainedWithContext(_) => "ConstrainedWithContext",
        };
        f.write_str(kind)
    }
}

struct ObjectivesClosure<F>(F);

impl<F> Objectives for ObjectivesClosure<F>
where
    F: Fn(ArrayView2<'_, f64>, ArrayViewMut2<'_, f64>) + Send + Sync,
{
    fn evaluate(&self, x: ArrayView2<'_, f64>, f: ArrayViewMut2<'_, f64>) {
        (self.0)(x, f)
    }
}

struct ConstrainedClosure<F>(F);

impl<F> Constrained for ConstrainedClosure<F>
where
    F: Fn(ArrayView2<'_, f64>, ArrayViewMut2<'_, f64>, ArrayViewMut2<'_, f64>) + Send + Sync,
{
    fn evaluate(&self, x: ArrayView2<'_, f64>, f: ArrayViewMut2<'_, f64>, g: ArrayViewMut2<'_, f64>) {
        (self.0)(x, f, g)
    }
}

struct ObjectivesContextClosure<F>(F);

impl<F> ObjectivesWithContext for ObjectivesContextClosure<F>
where
    F: Fn(ArrayView2<'_, f64>, ArrayViewMut2<'_, f64>, &EvalContext) + Send + Sync,
{
    fn evaluate(&self, x: ArrayView2<'_, f64>, f: ArrayViewMut2<'_, f64>, ctx: &EvalContext) {
        (self.0)(x, f, ctx)
    }
}

struct ConstrainedContextClosure<F>(F);

impl<F> ConstrainedWithContext for ConstrainedContextClosure<F>
where
    F: Fn(ArrayView2<'_, f64>, ArrayViewMut2<'_, f64>, ArrayViewMut2<'_, f64>, &EvalContext)
        + Send
        + Sync,
{
    fn evaluate(
        &self,
        x: ArrayView2<'_, f64>,
        f: ArrayViewMut2<'_, f64>,
        g: ArrayViewMut2<'_, f64>,
        ctx: &EvalContext,
    ) {
        (self.0)(x, f, g, ctx)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::{array, Array2};

    #[test]
    fn test_declared_tags() {
        let a = Formula::objectives_fn(|_, _| {});
        let b = Formula::constrained_fn(|_, _, _| {});
        let c = Formula::objectives_with_context_fn(|_, _, _| {});
        let d = Formula::constrained_with_context_fn(|_, _, _, _| {});

        assert!(!a.has_constraints() && !a.accepts_context());
        assert!(b.has_constraints() && !b.accepts_context());
        assert!(!c.has_constraints() && c.accepts_context());
        assert!(d.has_constraints() && d.accepts_context());
    }

    #[test]
    fn test_invoke_routes_buffers() {
        let formula = Formula::constrained_fn(|x, mut f, mut g| {
            f.assign(&x);
            g.fill(-1.0);
        });
        let x = array![[1.0, 2.0]];
        let mut f = Array2::zeros((1, 2));
        let mut g = Array2::zeros((1, 1));
        formula.invoke(x.view(), f.view_mut(), g.view_mut(), &EvalContext::default());
        assert_eq!(f, x);
        assert_eq!(g, array![[-1.0]]);
    }

    #[test]
    fn test_invoke_passes_context() {
        let formula = Formula::objectives_with_context_fn(|_, mut f, ctx| f.fill(ctx.get_or("v", 0.0)));
        let x = Array2::zeros((2, 1));
        let mut f = Array2::zeros((2, 1));
        let mut g = Array2::zeros((2, 0));
        let ctx = EvalContext::new().with("v", 3.0);
        formula.invoke(x.view(), f.view_mut(), g.view_mut(), &ctx);
        assert!(f.iter().all(|&v| v == 3.0));
    }

    #[test]
    fn test_debug_names_variant() {
        assert_eq!(format!("{:?}", Formula::objectives_fn(|_, _| {})), "Unconstrained");
    }
}
