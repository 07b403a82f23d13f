//! The problem descriptor and its Pareto-front cache.

use std::fmt;
use std::sync::OnceLock;

use ndarray::{Array1, Array2, Axis};

use super::evaluate::EvalOptions;
use super::types::Formula;
use crate::error::{Error, Result};
use crate::front::{FrontOutcome, FrontProvider, FrontRequest};
use crate::ref_dirs::ReferenceDirections;

/// Cache state of a problem's Pareto front.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FrontState<'a> {
    /// No computation has completed yet.
    NotComputed,
    /// The front was computed and is cached.
    Computed(&'a Array2<f64>),
    /// The provider answered that no front is known.
    Unavailable,
}

/// An optimization test problem: counts, bounds, a formula, and a
/// Pareto-front provider.
///
/// Immutable after construction apart from the front cache, which is filled
/// on the first successful [`pareto_front`](Self::pareto_front) call and
/// then reused. `Problem` is `Send + Sync`; one instance may be evaluated
/// from many threads.
///
/// Build one with [`ProblemBuilder`](super::ProblemBuilder),
/// [`Problem::from_fn`], or a constructor in [`crate::problems`].
pub struct Problem {
    pub(super) name: String,
    pub(super) n_var: usize,
    pub(super) n_obj: usize,
    pub(super) n_constr: usize,
    pub(super) xl: Array1<f64>,
    pub(super) xu: Array1<f64>,
    pub(super) formula: Formula,
    pub(super) front: Box<dyn FrontProvider>,
    pub(super) front_cache: OnceLock<FrontOutcome>,
    pub(super) pareto_set: Option<Array2<f64>>,
}

impl Problem {
    /// Problem name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Number of decision variables.
    pub fn n_var(&self) -> usize {
        self.n_var
    }

    /// Number of objectives.
    pub fn n_obj(&self) -> usize {
        self.n_obj
    }

    /// Number of constraints.
    pub fn n_constr(&self) -> usize {
        self.n_constr
    }

    /// Whether the problem declares constraints.
    pub fn has_constraints(&self) -> bool {
        self.n_constr > 0
    }

    /// Lower variable bounds.
    pub fn xl(&self) -> &Array1<f64> {
        &self.xl
    }

    /// Upper variable bounds.
    pub fn xu(&self) -> &Array1<f64> {
        &self.xu
    }

    /// The declared formula.
    pub fn formula(&self) -> &Formula {
        &self.formula
    }

    /// Returns the Pareto front, computing and caching it on first use.
    ///
    /// # Errors
    ///
    /// - [`Error::ParetoFrontUnavailable`] if the problem has no known front.
    ///   This answer is cached as well.
    /// - Any error raised by the provider (e.g. an unreadable sidecar file).
    ///   Errors are not cached; a later call retries.
    ///
    /// # Examples
    ///
    /// ```
    /// use u_mop::problems::zdt;
    ///
    /// let problem = zdt::zdt1(30).unwrap();
    /// let front = problem.pareto_front().unwrap();
    /// assert_eq!(front.ncols(), 2);
    /// assert!(std::ptr::eq(front, problem.pareto_front().unwrap()));
    /// ```
    pub fn pareto_front(&self) -> Result<&Array2<f64>> {
        let outcome = match self.front_cache.get() {
            Some(outcome) => outcome,
            None => {
                let computed = self.compute_front(None)?;
                self.front_cache.get_or_init(|| computed)
            }
        };
        match outcome {
            FrontOutcome::Computed(front) => Ok(front),
            FrontOutcome::Unavailable => Err(self.unavailable()),
        }
    }

    /// Computes the front for caller-supplied reference directions.
    ///
    /// The result is not cached. Providers that do not sample the front
    /// ignore the directions.
    ///
    /// # Errors
    ///
    /// As [`pareto_front`](Self::pareto_front), plus
    /// [`Error::DimensionMismatch`] if the directions' dimension differs
    /// from `n_obj`.
    pub fn pareto_front_with(&self, ref_dirs: &ReferenceDirections) -> Result<Array2<f64>> {
        match self.compute_front(Some(ref_dirs))? {
            FrontOutcome::Computed(front) => Ok(front),
            FrontOutcome::Unavailable => Err(self.unavailable()),
        }
    }

    /// Known optimal decision vectors, one per row (`n_var` columns).
    ///
    /// `None` unless the problem was built with
    /// [`ProblemBuilder::with_pareto_set`](super::ProblemBuilder::with_pareto_set).
    ///
    /// ```
    /// use u_mop::problems::g;
    ///
    /// let problem = g::g06().unwrap();
    /// let set = problem.pareto_set().unwrap();
    /// assert_eq!(set.shape(), &[1, 2]);
    /// ```
    pub fn pareto_set(&self) -> Option<&Array2<f64>> {
        self.pareto_set.as_ref()
    }

    /// Current cache state, without triggering a computation.
    pub fn front_state(&self) -> FrontState<'_> {
        match self.front_cache.get() {
            None => FrontState::NotComputed,
            Some(FrontOutcome::Computed(front)) => FrontState::Computed(front),
            Some(FrontOutcome::Unavailable) => FrontState::Unavailable,
        }
    }

    /// Element-wise minimum over the Pareto front.
    ///
    /// # Errors
    ///
    /// [`Error::ParetoFrontUnavailable`] if no front is known or it has no
    /// rows; provider errors otherwise.
    pub fn ideal_point(&self) -> Result<Array1<f64>> {
        let front = self.non_empty_front()?;
        Ok(front.fold_axis(Axis(0), f64::INFINITY, |acc, &v| acc.min(v)))
    }

    /// Element-wise maximum over the Pareto front.
    ///
    /// # Errors
    ///
    /// As [`ideal_point`](Self::ideal_point).
    pub fn nadir_point(&self) -> Result<Array1<f64>> {
        let front = self.non_empty_front()?;
        Ok(front.fold_axis(Axis(0), f64::NEG_INFINITY, |acc, &v| acc.max(v)))
    }

    fn non_empty_front(&self) -> Result<&Array2<f64>> {
        let front = self.pareto_front()?;
        if front.nrows() == 0 {
            return Err(self.unavailable());
        }
        Ok(front)
    }

    fn compute_front(&self, ref_dirs: Option<&ReferenceDirections>) -> Result<FrontOutcome> {
        let request = FrontRequest {
            problem: &self.name,
            n_obj: self.n_obj,
            ref_dirs,
        };
        let outcome = self.front.compute(&request)?;
        match &outcome {
            FrontOutcome::Computed(_front) => {
                trace_info!(problem = %self.name, rows = _front.nrows(), "pareto front computed");
            }
            FrontOutcome::Unavailable => {
                trace_info!(problem = %self.name, "pareto front unavailable");
            }
        }
        Ok(outcome)
    }

    fn unavailable(&self) -> Error {
        Error::ParetoFrontUnavailable {
            problem: self.name.clone(),
        }
    }
}

impl fmt::Debug for Problem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Problem")
            .field("name", &self.name)
            .field("n_var", &self.n_var)
            .field("n_obj", &self.n_obj)
            .field("n_constr", &self.n_constr)
            .field("xl", &self.xl)
            .field("xu", &self.xu)
            .field("formula", &self.formula)
            .field("front_state", &self.front_state())
            .field("pareto_set", &self.pareto_set.as_ref().map(|s| s.nrows()))
            .finish()
    }
}

/// Summary: name, counts, and the objective values at `xl`, the bound
/// midpoint, and `xu`.
impl fmt::Display for Problem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "# name: {}", self.name)?;
        writeln!(f, "# n_var: {}", self.n_var)?;
        writeln!(f, "# n_obj: {}", self.n_obj)?;
        writeln!(f, "# n_constr: {}", self.n_constr)?;

        let mid = (&self.xl + &self.xu) / 2.0;
        for (label, x) in [("xl", &self.xl), ("mid", &mid), ("xu", &self.xu)] {
            match self.evaluate(x, &EvalOptions::default()) {
                Ok(out) => match out.f() {
                    Some(values) => writeln!(f, "# f({label}): {values}")?,
                    None => writeln!(f, "# f({label}): -")?,
                },
                Err(e) => writeln!(f, "# f({label}): error: {e}")?,
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::front::{ClosedForm, FrontStore, MemoryStore, Sidecar};
    use crate::problem::ProblemBuilder;
    use ndarray::array;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    fn identity(name: &str) -> ProblemBuilder {
        ProblemBuilder::new(name, 2)
            .with_n_obj(2)
            .with_formula(Formula::objectives_fn(|x, mut f| f.assign(&x)))
    }

    struct Counting {
        calls: Arc<AtomicUsize>,
    }

    impl FrontProvider for Counting {
        fn compute(&self, _request: &FrontRequest<'_>) -> Result<FrontOutcome> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(FrontOutcome::Computed(array![[0.0, 1.0], [1.0, 0.0]]))
        }
    }

    #[test]
    fn test_pareto_front_is_memoized() {
        let calls = Arc::new(AtomicUsize::new(0));
        let p = identity("p")
            .with_front(Counting {
                calls: calls.clone(),
            })
            .build()
            .unwrap();

        assert_eq!(p.front_state(), FrontState::NotComputed);
        let first = p.pareto_front().unwrap().clone();
        let second = p.pareto_front().unwrap();
        assert_eq!(&first, second);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert!(matches!(p.front_state(), FrontState::Computed(_)));
    }

    #[test]
    fn test_concurrent_front_access() {
        let calls = Arc::new(AtomicUsize::new(0));
        let p = Arc::new(
            identity("p")
                .with_front(Counting {
                    calls: calls.clone(),
                })
                .build()
                .unwrap(),
        );
        let handles: Vec<_> = (0..4)
            .map(|_| {
                let p = p.clone();
                std::thread::spawn(move || p.pareto_front().unwrap().clone())
            })
            .collect();
        for h in handles {
            assert_eq!(h.join().unwrap(), array![[0.0, 1.0], [1.0, 0.0]]);
        }
        assert!(calls.load(Ordering::SeqCst) >= 1);
    }

    #[test]
    fn test_unavailable_is_explicit() {
        let p = identity("nofront").build().unwrap();
        let err = p.pareto_front().unwrap_err();
        assert!(matches!(err, Error::ParetoFrontUnavailable { ref problem } if problem == "nofront"));
        assert_eq!(p.front_state(), FrontState::Unavailable);
        assert!(p.ideal_point().is_err());
        assert!(p.nadir_point().is_err());
    }

    #[test]
    fn test_ideal_and_nadir() {
        let p = identity("p")
            .with_front(ClosedForm::new(|| array![[0.0, 4.0], [1.0, 2.0], [3.0, 0.5]]))
            .build()
            .unwrap();
        assert_eq!(p.ideal_point().unwrap(), array![0.0, 0.5]);
        assert_eq!(p.nadir_point().unwrap(), array![3.0, 4.0]);
    }

    #[test]
    fn test_empty_front_has_no_ideal_point() {
        let p = identity("p")
            .with_front(ClosedForm::new(|| Array2::zeros((0, 2))))
            .build()
            .unwrap();
        assert_eq!(p.pareto_front().unwrap().nrows(), 0);
        assert!(matches!(
            p.ideal_point(),
            Err(Error::ParetoFrontUnavailable { .. })
        ));
    }

    #[test]
    fn test_sidecar_errors_are_not_cached() {
        let store: Arc<dyn FrontStore> =
            Arc::new(MemoryStore::new().with_front("p", array![[1.0, 2.0, 3.0]]));
        let p = identity("p").with_front(Sidecar::new(store, "p")).build().unwrap();
        assert!(matches!(p.pareto_front(), Err(Error::Resource { .. })));
        assert_eq!(p.front_state(), FrontState::NotComputed);
    }

    #[test]
    fn test_pareto_front_with_is_uncached() {
        let p = identity("p")
            .with_front(crate::front::SimplexFront::linear(10, 1.0))
            .build()
            .unwrap();
        let dirs = ReferenceDirections::try_new(array![[0.25, 0.75]]).unwrap();
        let front = p.pareto_front_with(&dirs).unwrap();
        assert_eq!(front, array![[0.25, 0.75]]);
        assert_eq!(p.front_state(), FrontState::NotComputed);
    }

    #[test]
    fn test_display_summary() {
        let p = identity("identity").build().unwrap();
        let text = p.to_string();
        assert!(text.contains("# name: identity"));
        assert!(text.contains("# n_constr: 0"));
        assert!(text.contains("f(mid): [0.5, 0.5]"));
    }
}
