//! Pareto-front providers.
//!
//! A [`FrontProvider`] is the per-problem capability that produces the true
//! Pareto front, or reports explicitly that none is known. Three sources are
//! supported:
//!
//! - [`ClosedForm`]: the front is a direct formula (e.g. ZDT1's
//!   `f2 = 1 - sqrt(f1)`).
//! - [`SimplexFront`]: the front is sampled by mapping reference directions
//!   onto its geometry (e.g. DTLZ2 normalizes them onto the unit sphere).
//! - [`Sidecar`]: the front is looked up in a [`FrontStore`], optionally
//!   falling back to another provider when the entry is absent.

use std::sync::Arc;

use ndarray::{Array2, ArrayView2, Axis};

use super::store::FrontStore;
use crate::error::{Error, Result};
use crate::ref_dirs::{RefDirConfig, RefDirGenerator, ReferenceDirections};

/// Outcome of a front computation.
///
/// `Unavailable` is a definite answer ("no front is known for this
/// problem"), never a placeholder for "not computed yet".
#[derive(Debug, Clone, PartialEq)]
pub enum FrontOutcome {
    /// The front, one row per optimal objective vector.
    Computed(Array2<f64>),
    /// No formula or tabulated resource exists.
    Unavailable,
}

impl FrontOutcome {
    /// Returns the front if one was computed.
    pub fn into_front(self) -> Option<Array2<f64>> {
        match self {
            FrontOutcome::Computed(front) => Some(front),
            FrontOutcome::Unavailable => None,
        }
    }

    /// Returns `true` if a front was computed.
    pub fn is_computed(&self) -> bool {
        matches!(self, FrontOutcome::Computed(_))
    }
}

/// What a provider needs to know about the problem asking for its front.
#[derive(Debug, Clone, Copy)]
pub struct FrontRequest<'a> {
    /// Problem name, used as the sidecar key and in log events.
    pub problem: &'a str,
    /// Number of objectives (simplex dimension for sampled fronts).
    pub n_obj: usize,
    /// Caller-supplied directions; providers that sample the front use
    /// these instead of generating their own.
    pub ref_dirs: Option<&'a ReferenceDirections>,
}

/// Produces the Pareto front of one problem.
///
/// # Implementing
///
/// ```
/// use ndarray::{array, Array2};
/// use u_mop::front::{FrontOutcome, FrontProvider, FrontRequest};
/// use u_mop::Result;
///
/// struct Knee;
///
/// impl FrontProvider for Knee {
///     fn compute(&self, _request: &FrontRequest<'_>) -> Result<FrontOutcome> {
///         Ok(FrontOutcome::Computed(array![[0.0, 1.0], [0.2, 0.2], [1.0, 0.0]]))
///     }
/// }
/// ```
pub trait FrontProvider: Send + Sync {
    /// Computes the front.
    ///
    /// # Errors
    ///
    /// Returns an error only when a source exists but fails (unreadable
    /// resource, mismatched reference directions). A missing source is
    /// reported as [`FrontOutcome::Unavailable`].
    fn compute(&self, request: &FrontRequest<'_>) -> Result<FrontOutcome>;
}

impl<P: FrontProvider + ?Sized> FrontProvider for Arc<P> {
    fn compute(&self, request: &FrontRequest<'_>) -> Result<FrontOutcome> {
        (**self).compute(request)
    }
}

impl<P: FrontProvider + ?Sized> FrontProvider for Box<P> {
    fn compute(&self, request: &FrontRequest<'_>) -> Result<FrontOutcome> {
        (**self).compute(request)
    }
}

/// A problem with no known front.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoFront;

impl FrontProvider for NoFront {
    fn compute(&self, _request: &FrontRequest<'_>) -> Result<FrontOutcome> {
        Ok(FrontOutcome::Unavailable)
    }
}

type BuildFn = dyn Fn() -> Array2<f64> + Send + Sync;

/// A front given by a formula that needs no reference directions.
pub struct ClosedForm {
    build: Box<BuildFn>,
}

impl ClosedForm {
    /// Wraps a front-building function.
    pub fn new(build: impl Fn() -> Array2<f64> + Send + Sync + 'static) -> Self {
        Self {
            build: Box::new(build),
        }
    }

    /// A single known optimum, e.g. the best objective value of a
    /// single-objective benchmark.
    pub fn point(values: Vec<f64>) -> Self {
        Self::new(move || {
            let n = values.len();
            Array2::from_shape_fn((1, n), |(_, j)| values[j])
        })
    }
}

impl FrontProvider for ClosedForm {
    fn compute(&self, _request: &FrontRequest<'_>) -> Result<FrontOutcome> {
        Ok(FrontOutcome::Computed((self.build)()))
    }
}

type MapFn = dyn Fn(ArrayView2<'_, f64>) -> Array2<f64> + Send + Sync;

/// A front sampled by mapping reference directions onto its geometry.
///
/// When the request carries no directions, `n_points` directions of the
/// problem's `n_obj` dimensionality are generated with `config`.
pub struct SimplexFront {
    n_points: usize,
    config: RefDirConfig,
    map: Box<MapFn>,
}

impl SimplexFront {
    /// Creates a sampled front with the default generator configuration.
    pub fn new(
        n_points: usize,
        map: impl Fn(ArrayView2<'_, f64>) -> Array2<f64> + Send + Sync + 'static,
    ) -> Self {
        Self {
            n_points,
            config: RefDirConfig::default(),
            map: Box::new(map),
        }
    }

    /// Linear front `scale * w` (e.g. DTLZ1 with `scale = 0.5`).
    pub fn linear(n_points: usize, scale: f64) -> Self {
        Self::new(n_points, move |dirs| dirs.mapv(|v| v * scale))
    }

    /// Spherical front: directions normalized to unit Euclidean norm.
    pub fn sphere(n_points: usize) -> Self {
        Self::new(n_points, project_to_sphere)
    }

    /// Sets the generator configuration used when no directions are given.
    pub fn with_config(mut self, config: RefDirConfig) -> Self {
        self.config = config;
        self
    }
}

impl FrontProvider for SimplexFront {
    fn compute(&self, request: &FrontRequest<'_>) -> Result<FrontOutcome> {
        let front = match request.ref_dirs {
            Some(dirs) => {
                if dirs.n_dim() != request.n_obj {
                    return Err(Error::DimensionMismatch {
                        expected: request.n_obj,
                        got: dirs.n_dim(),
                    });
                }
                (self.map)(dirs.view())
            }
            None => {
                let dirs = RefDirGenerator::generate(self.n_points, request.n_obj, &self.config)?;
                (self.map)(dirs.view())
            }
        };
        Ok(FrontOutcome::Computed(front))
    }
}

/// A front looked up in a [`FrontStore`] under a fixed key.
pub struct Sidecar {
    store: Arc<dyn FrontStore>,
    key: String,
    fallback: Option<Box<dyn FrontProvider>>,
}

impl Sidecar {
    /// Looks up `key` in `store`.
    pub fn new(store: Arc<dyn FrontStore>, key: impl Into<String>) -> Self {
        Self {
            store,
            key: key.into(),
            fallback: None,
        }
    }

    /// Uses `fallback` when the store has no entry for the key.
    pub fn or_else(mut self, fallback: impl FrontProvider + 'static) -> Self {
        self.fallback = Some(Box::new(fallback));
        self
    }
}

impl FrontProvider for Sidecar {
    fn compute(&self, request: &FrontRequest<'_>) -> Result<FrontOutcome> {
        match self.store.load(&self.key)? {
            Some(front) => {
                if front.ncols() != request.n_obj {
                    return Err(Error::Resource {
                        key: self.key.clone(),
                        reason: format!(
                            "front has {} columns, problem '{}' has {} objectives",
                            front.ncols(),
                            request.problem,
                            request.n_obj
                        ),
                    });
                }
                Ok(FrontOutcome::Computed(front))
            }
            None => match &self.fallback {
                Some(fallback) => fallback.compute(request),
                None => {
                    trace_debug!(key = %self.key, problem = request.problem, "sidecar front missing");
                    Ok(FrontOutcome::Unavailable)
                }
            },
        }
    }
}

/// Normalizes every row to unit Euclidean norm.
///
/// Rows with zero norm are left unchanged.
pub fn project_to_sphere(points: ArrayView2<'_, f64>) -> Array2<f64> {
    let mut out = points.to_owned();
    for mut row in out.axis_iter_mut(Axis(0)) {
        let norm = row.dot(&row).sqrt();
        if norm > 0.0 {
            row /= norm;
        }
    }
    out
}

/// Evenly spaced values from `start` to `end` inclusive.
pub(crate) fn linspace(start: f64, end: f64, n: usize) -> Vec<f64> {
    match n {
        0 => Vec::new(),
        1 => vec![start],
        _ => {
            let step = (end - start) / (n - 1) as f64;
            let mut values: Vec<f64> = (0..n).map(|i| start + step * i as f64).collect();
            values[n - 1] = end;
            values
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::front::MemoryStore;
    use approx::assert_relative_eq;
    use ndarray::array;

    fn request(n_obj: usize) -> FrontRequest<'static> {
        FrontRequest {
            problem: "test",
            n_obj,
            ref_dirs: None,
        }
    }

    #[test]
    fn test_no_front_is_unavailable() {
        assert_eq!(NoFront.compute(&request(2)).unwrap(), FrontOutcome::Unavailable);
    }

    #[test]
    fn test_closed_form_point() {
        let out = ClosedForm::point(vec![-15.0]).compute(&request(1)).unwrap();
        assert_eq!(out, FrontOutcome::Computed(array![[-15.0]]));
    }

    #[test]
    fn test_linear_front_scales_directions() {
        let front = SimplexFront::linear(3, 0.5)
            .with_config(RefDirConfig::default().without_zero_substitute())
            .compute(&request(2))
            .unwrap()
            .into_front()
            .unwrap();
        assert_eq!(front.nrows(), 3);
        for row in front.rows() {
            assert_relative_eq!(row.sum(), 0.5, epsilon = 1e-9);
        }
    }

    #[test]
    fn test_sphere_front_has_unit_norm() {
        let front = SimplexFront::sphere(20)
            .compute(&request(3))
            .unwrap()
            .into_front()
            .unwrap();
        for row in front.rows() {
            assert_relative_eq!(row.dot(&row), 1.0, epsilon = 1e-9);
        }
    }

    #[test]
    fn test_simplex_front_uses_given_directions() {
        let dirs = ReferenceDirections::try_new(array![[0.5, 0.5]]).unwrap();
        let req = FrontRequest {
            problem: "p",
            n_obj: 2,
            ref_dirs: Some(&dirs),
        };
        let front = SimplexFront::linear(100, 2.0).compute(&req).unwrap();
        assert_eq!(front, FrontOutcome::Computed(array![[1.0, 1.0]]));
    }

    #[test]
    fn test_simplex_front_rejects_wrong_dimension() {
        let dirs = ReferenceDirections::try_new(array![[0.5, 0.5]]).unwrap();
        let req = FrontRequest {
            problem: "p",
            n_obj: 3,
            ref_dirs: Some(&dirs),
        };
        assert!(matches!(
            SimplexFront::sphere(10).compute(&req),
            Err(Error::DimensionMismatch { expected: 3, got: 2 })
        ));
    }

    #[test]
    fn test_sidecar_hit_and_miss() {
        let store: Arc<dyn FrontStore> =
            Arc::new(MemoryStore::new().with_front("osy", array![[1.0, 2.0]]));

        let hit = Sidecar::new(store.clone(), "osy").compute(&request(2)).unwrap();
        assert!(hit.is_computed());

        let miss = Sidecar::new(store.clone(), "tnk").compute(&request(2)).unwrap();
        assert_eq!(miss, FrontOutcome::Unavailable);

        let fallback = Sidecar::new(store, "tnk")
            .or_else(ClosedForm::point(vec![0.0, 0.0]))
            .compute(&request(2))
            .unwrap();
        assert_eq!(fallback, FrontOutcome::Computed(array![[0.0, 0.0]]));
    }

    #[test]
    fn test_sidecar_width_mismatch() {
        let store: Arc<dyn FrontStore> =
            Arc::new(MemoryStore::new().with_front("osy", array![[1.0, 2.0, 3.0]]));
        assert!(matches!(
            Sidecar::new(store, "osy").compute(&request(2)),
            Err(Error::Resource { .. })
        ));
    }

    #[test]
    fn test_project_to_sphere_keeps_zero_rows() {
        let out = project_to_sphere(array![[3.0, 4.0], [0.0, 0.0]].view());
        assert_relative_eq!(out[[0, 0]], 0.6);
        assert_relative_eq!(out[[0, 1]], 0.8);
        assert_eq!(out.row(1).sum(), 0.0);
    }

    #[test]
    fn test_linspace() {
        assert_eq!(linspace(0.0, 1.0, 3), vec![0.0, 0.5, 1.0]);
        assert_eq!(linspace(2.0, 5.0, 1), vec![2.0]);
        assert!(linspace(0.0, 1.0, 0).is_empty());
    }
}
