//! Lookup of catalog problems by name.
//!
//! A [`ProblemRegistry`] is an ordinary value: build it once with
//! [`ProblemRegistry::with_catalog`], add your own constructors with
//! [`register`](ProblemRegistry::register), and pass it to whatever needs
//! to instantiate problems from configuration.
//!
//! # Examples
//!
//! ```
//! use u_mop::registry::{ProblemParams, ProblemRegistry};
//!
//! let registry = ProblemRegistry::with_catalog();
//! let params = ProblemParams::new().with("n_obj", 5.0).with("k", 10.0);
//! let problem = registry.get("DTLZ2", &params).unwrap();
//! assert_eq!(problem.n_obj(), 5);
//! assert_eq!(problem.n_var(), 14);
//! ```

use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::sync::Arc;

use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::error::{Error, Result};
use crate::front::FrontStore;
use crate::problem::Problem;
use crate::problems::{cdtlz, classic, dtlz, engineering, g, single, zdt};

type Constructor = Box<dyn Fn(&ProblemParams) -> Result<Problem> + Send + Sync>;

/// Named numeric parameters for a problem constructor, plus an optional
/// front store for problems with tabulated fronts.
///
/// Recognised keys depend on the problem: `n_var`, `n_obj`, `k` (DTLZ
/// distance variables), `alpha` (DTLZ4), `r` (C1-DTLZ3, C2-DTLZ2), `a`
/// (Rastrigin), `n_items` and `seed` (knapsack). Unrecognised keys are
/// ignored.
#[derive(Clone, Default)]
pub struct ProblemParams {
    values: HashMap<String, f64>,
    store: Option<Arc<dyn FrontStore>>,
}

impl ProblemParams {
    /// Empty parameters: every constructor uses its defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets a numeric parameter.
    pub fn with(mut self, key: impl Into<String>, value: f64) -> Self {
        self.values.insert(key.into(), value);
        self
    }

    /// Attaches a store for sidecar fronts.
    pub fn with_store(mut self, store: Arc<dyn FrontStore>) -> Self {
        self.store = Some(store);
        self
    }

    /// The raw value of `key`, if set.
    pub fn get(&self, key: &str) -> Option<f64> {
        self.values.get(key).copied()
    }

    /// The attached front store.
    pub fn store(&self) -> Option<Arc<dyn FrontStore>> {
        self.store.clone()
    }

    /// `key` as a real number, or `default` when unset.
    pub fn get_f64(&self, key: &str, default: f64) -> Result<f64> {
        match self.get(key) {
            None => Ok(default),
            Some(v) if v.is_finite() => Ok(v),
            Some(v) => Err(Error::InvalidArgument(format!(
                "parameter '{key}' must be finite, got {v}"
            ))),
        }
    }

    /// `key` as a count, or `default` when unset. Rejects negative and
    /// fractional values.
    pub fn get_usize(&self, key: &str, default: usize) -> Result<usize> {
        match self.get(key) {
            None => Ok(default),
            Some(v) if v.is_finite() && v >= 0.0 && v.fract() == 0.0 => Ok(v as usize),
            Some(v) => Err(Error::InvalidArgument(format!(
                "parameter '{key}' must be a non-negative integer, got {v}"
            ))),
        }
    }

    /// `(n_var, n_obj)` for a DTLZ-style problem. An explicit `n_var` wins;
    /// otherwise `n_var` follows from `k`, whose default keeps
    /// `default_n_var` at three objectives.
    fn dtlz_sizes(&self, default_n_var: usize) -> Result<(usize, usize)> {
        let n_obj = self.get_usize("n_obj", 3)?;
        if self.get("n_var").is_some() {
            return Ok((self.get_usize("n_var", default_n_var)?, n_obj));
        }
        let k = self.get_usize("k", default_n_var - 2)?;
        Ok((dtlz::n_var_for_k(k, n_obj)?, n_obj))
    }
}

impl fmt::Debug for ProblemParams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProblemParams")
            .field("values", &self.values)
            .field("store", &self.store.is_some())
            .finish()
    }
}

/// Name → constructor map. Names are stored and matched in lowercase.
pub struct ProblemRegistry {
    constructors: BTreeMap<String, Constructor>,
}

impl ProblemRegistry {
    /// An empty registry.
    pub fn new() -> Self {
        Self {
            constructors: BTreeMap::new(),
        }
    }

    /// A registry holding every problem in [`crate::problems`].
    pub fn with_catalog() -> Self {
        let mut registry = Self::new();

        registry.register("zdt1", |p| zdt::zdt1(p.get_usize("n_var", 30)?));
        registry.register("zdt2", |p| zdt::zdt2(p.get_usize("n_var", 30)?));
        registry.register("zdt3", |p| zdt::zdt3(p.get_usize("n_var", 30)?));
        registry.register("zdt4", |p| zdt::zdt4(p.get_usize("n_var", 10)?));
        registry.register("zdt6", |p| zdt::zdt6(p.get_usize("n_var", 10)?));

        registry.register("dtlz1", |p| {
            let (n_var, n_obj) = p.dtlz_sizes(7)?;
            dtlz::dtlz1(n_var, n_obj)
        });
        registry.register("dtlz2", |p| {
            let (n_var, n_obj) = p.dtlz_sizes(10)?;
            dtlz::dtlz2(n_var, n_obj)
        });
        registry.register("dtlz3", |p| {
            let (n_var, n_obj) = p.dtlz_sizes(10)?;
            dtlz::dtlz3(n_var, n_obj)
        });
        registry.register("dtlz4", |p| {
            let (n_var, n_obj) = p.dtlz_sizes(10)?;
            dtlz::dtlz4_with_alpha(n_var, n_obj, p.get_f64("alpha", dtlz::DTLZ4_ALPHA)?)
        });
        registry.register("dtlz5", |p| {
            let (n_var, n_obj) = p.dtlz_sizes(10)?;
            dtlz::dtlz5(n_var, n_obj)
        });
        registry.register("dtlz6", |p| {
            let (n_var, n_obj) = p.dtlz_sizes(10)?;
            dtlz::dtlz6(n_var, n_obj)
        });
        registry.register("dtlz7", |p| {
            let (n_var, n_obj) = p.dtlz_sizes(10)?;
            dtlz::dtlz7(n_var, n_obj)
        });

        registry.register("c1dtlz1", |p| {
            let (n_var, n_obj) = p.dtlz_sizes(7)?;
            cdtlz::c1dtlz1(n_var, n_obj)
        });
        registry.register("c1dtlz3", |p| {
            let (n_var, n_obj) = p.dtlz_sizes(12)?;
            let r = p.get_f64("r", cdtlz::c1dtlz3_default_radius(n_obj))?;
            cdtlz::c1dtlz3_with_radius(n_var, n_obj, r)
        });
        registry.register("c2dtlz2", |p| {
            let (n_var, n_obj) = p.dtlz_sizes(12)?;
            let r = p.get_f64("r", cdtlz::c2dtlz2_default_radius(n_obj))?;
            cdtlz::c2dtlz2_with_radius(n_var, n_obj, r)
        });
        registry.register("c3dtlz4", |p| {
            let (n_var, n_obj) = p.dtlz_sizes(7)?;
            cdtlz::c3dtlz4(n_var, n_obj)
        });

        registry.register("bnh", |_| classic::bnh());
        registry.register("osy", |p| classic::osy(p.store()));
        registry.register("tnk", |p| classic::tnk(p.store()));
        registry.register("kursawe", |p| classic::kursawe(p.store()));

        registry.register("welded_beam", |_| engineering::welded_beam());
        registry.register("truss2d", |_| engineering::truss2d());
        registry.register("knp", |p| {
            let n_items = p.get_usize("n_items", 10)?;
            let seed = p.get_usize("seed", 0)? as u64;
            engineering::random_knapsack(n_items, &mut StdRng::seed_from_u64(seed))
        });

        registry.register("g01", |_| g::g01());
        registry.register("g02", |_| g::g02());
        registry.register("g03", |_| g::g03());
        registry.register("g04", |_| g::g04());
        registry.register("g05", |_| g::g05());
        registry.register("g06", |_| g::g06());
        registry.register("g07", |_| g::g07());
        registry.register("g08", |_| g::g08());
        registry.register("g09", |_| g::g09());
        registry.register("g10", |_| g::g10());

        registry.register("sphere", |p| single::sphere(p.get_usize("n_var", 10)?));
        registry.register("rastrigin", |p| {
            single::rastrigin_with_amplitude(p.get_usize("n_var", 2)?, p.get_f64("a", 10.0)?)
        });
        registry.register("rosenbrock", |p| single::rosenbrock(p.get_usize("n_var", 2)?));
        registry.register("griewank", |p| single::griewank(p.get_usize("n_var", 2)?));
        registry.register("schwefel", |p| single::schwefel(p.get_usize("n_var", 2)?));
        registry.register("zakharov", |p| single::zakharov(p.get_usize("n_var", 2)?));
        registry.register("ackley", |p| single::ackley(p.get_usize("n_var", 2)?));

        registry
    }

    /// Adds or replaces the constructor for `name`.
    pub fn register<F>(&mut self, name: &str, constructor: F)
    where
        F: Fn(&ProblemParams) -> Result<Problem> + Send + Sync + 'static,
    {
        self.constructors
            .insert(name.to_lowercase(), Box::new(constructor));
    }

    /// Builds the problem registered under `name` (case-insensitive).
    ///
    /// # Errors
    ///
    /// [`Error::UnknownProblem`] if nothing is registered under `name`;
    /// otherwise whatever the constructor reports for bad parameters.
    pub fn get(&self, name: &str, params: &ProblemParams) -> Result<Problem> {
        let key = name.to_lowercase();
        let constructor = self
            .constructors
            .get(&key)
            .ok_or_else(|| Error::UnknownProblem(name.to_string()))?;
        trace_debug!(problem = %key, "constructing registered problem");
        constructor(params)
    }

    /// Whether `name` is registered (case-insensitive).
    pub fn contains(&self, name: &str) -> bool {
        self.constructors.contains_key(&name.to_lowercase())
    }

    /// Registered names in lexicographic order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.constructors.keys().map(String::as_str)
    }

    /// Number of registered problems.
    pub fn len(&self) -> usize {
        self.constructors.len()
    }

    /// Whether the registry is empty.
    pub fn is_empty(&self) -> bool {
        self.constructors.is_empty()
    }
}

impl Default for ProblemRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for ProblemRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.constructors.keys()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::front::MemoryStore;
    use crate::problem::{Formula, ProblemBuilder};
    use ndarray::array;

    #[test]
    fn test_catalog_builds_every_problem_with_defaults() {
        let registry = ProblemRegistry::with_catalog();
        assert_eq!(registry.len(), 40);
        let params = ProblemParams::new();
        for name in registry.names() {
            let problem = registry.get(name, &params).unwrap();
            assert_eq!(problem.name(), name);
        }
    }

    #[test]
    fn test_lookup_is_case_insensitive() {
        let registry = ProblemRegistry::with_catalog();
        assert!(registry.contains("ZDT1"));
        let p = registry.get("Welded_Beam", &ProblemParams::new()).unwrap();
        assert_eq!(p.n_constr(), 4);
    }

    #[test]
    fn test_unknown_problem() {
        let registry = ProblemRegistry::with_catalog();
        let err = registry.get("zdt5", &ProblemParams::new()).unwrap_err();
        assert!(matches!(err, Error::UnknownProblem(ref n) if n == "zdt5"));
    }

    #[test]
    fn test_dtlz_sizing() {
        let registry = ProblemRegistry::with_catalog();
        let defaults = registry.get("dtlz1", &ProblemParams::new()).unwrap();
        assert_eq!((defaults.n_var(), defaults.n_obj()), (7, 3));

        let by_k = ProblemParams::new().with("n_obj", 5.0).with("k", 5.0);
        assert_eq!(registry.get("dtlz1", &by_k).unwrap().n_var(), 9);

        let explicit = ProblemParams::new().with("n_var", 12.0).with("k", 99.0);
        assert_eq!(registry.get("dtlz2", &explicit).unwrap().n_var(), 12);

        let scaled_up = ProblemParams::new().with("n_obj", 10.0);
        let p = registry.get("c2dtlz2", &scaled_up).unwrap();
        assert_eq!(p.n_var(), 19);
    }

    #[test]
    fn test_dtlz_zero_objectives_rejected() {
        let registry = ProblemRegistry::with_catalog();
        let params = ProblemParams::new().with("n_obj", 0.0).with("k", 0.0);
        for name in ["dtlz1", "dtlz2", "c1dtlz1", "c3dtlz4"] {
            assert!(matches!(
                registry.get(name, &params),
                Err(Error::InvalidArgument(_))
            ));
        }
    }

    #[test]
    fn test_rejects_bad_parameters() {
        let registry = ProblemRegistry::with_catalog();
        for bad in [-1.0, 2.5, f64::NAN] {
            let params = ProblemParams::new().with("n_var", bad);
            assert!(matches!(
                registry.get("zdt1", &params),
                Err(Error::InvalidArgument(_))
            ));
        }
        let params = ProblemParams::new().with("r", 2.0);
        assert!(registry.get("c1dtlz3", &params).is_err());
    }

    #[test]
    fn test_store_reaches_sidecar_problems() {
        let store: Arc<dyn FrontStore> =
            Arc::new(MemoryStore::new().with_front("tnk", array![[0.1, 1.0], [1.0, 0.1]]));
        let registry = ProblemRegistry::with_catalog();
        let with_store = ProblemParams::new().with_store(store);
        let p = registry.get("tnk", &with_store).unwrap();
        assert_eq!(p.pareto_front().unwrap().nrows(), 2);

        let p = registry.get("tnk", &ProblemParams::new()).unwrap();
        assert!(p.pareto_front().is_err());
    }

    #[test]
    fn test_knapsack_seed_is_reproducible() {
        let registry = ProblemRegistry::with_catalog();
        let params = ProblemParams::new().with("n_items", 5.0).with("seed", 7.0);
        let a = registry.get("knp", &params).unwrap();
        let b = registry.get("knp", &params).unwrap();
        let x = array![1.0, 0.0, 1.0, 0.0, 1.0];
        let opts = crate::problem::EvalOptions::default();
        let fa = a.evaluate(&x, &opts).unwrap();
        let fb = b.evaluate(&x, &opts).unwrap();
        assert_eq!(fa.f().unwrap().as_vector(), fb.f().unwrap().as_vector());
    }

    #[test]
    fn test_register_custom_problem() {
        let mut registry = ProblemRegistry::new();
        assert!(registry.is_empty());
        registry.register("Custom", |p| {
            ProblemBuilder::new("custom", p.get_usize("n_var", 2)?)
                .with_formula(Formula::objectives_fn(|x, mut f| {
                    f.column_mut(0).assign(&x.column(0));
                }))
                .build()
        });
        assert!(registry.contains("custom"));
        let p = registry.get("CUSTOM", &ProblemParams::new().with("n_var", 4.0)).unwrap();
        assert_eq!(p.n_var(), 4);
        assert_eq!(registry.names().collect::<Vec<_>>(), vec!["custom"]);
    }
}
