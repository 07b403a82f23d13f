//! DTLZ scalable many-objective problems.
//!
//! Variables split into `n_obj - 1` position variables and `k` distance
//! variables (`n_var = n_obj + k - 1`). The distance function `g` is zero on
//! the true front, where DTLZ1 lies on the hyperplane `Σ f = 0.5` and
//! DTLZ2–4 on the unit hypersphere.

use std::f64::consts::{FRAC_PI_2, PI};

use ndarray::{s, ArrayView1, ArrayViewMut1};

use super::{front_config, require, rowwise, DEFAULT_FRONT_POINTS};
use crate::error::{Error, Result};
use crate::front::{FrontProvider, NoFront, SimplexFront};
use crate::problem::{Problem, ProblemBuilder};

/// DTLZ4's default position-variable exponent.
pub const DTLZ4_ALPHA: f64 = 100.0;

/// The objective function family member.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Variant {
    /// Linear front, multimodal `g`.
    Dtlz1,
    /// Spherical front.
    Dtlz2,
    /// Spherical front, multimodal `g`.
    Dtlz3,
    /// Spherical front, biased density.
    Dtlz4,
    /// Degenerate curve.
    Dtlz5,
    /// Degenerate curve, harder `g`.
    Dtlz6,
    /// Disconnected front.
    Dtlz7,
}

impl Variant {
    fn name(self) -> &'static str {
        match self {
            Variant::Dtlz1 => "dtlz1",
            Variant::Dtlz2 => "dtlz2",
            Variant::Dtlz3 => "dtlz3",
            Variant::Dtlz4 => "dtlz4",
            Variant::Dtlz5 => "dtlz5",
            Variant::Dtlz6 => "dtlz6",
            Variant::Dtlz7 => "dtlz7",
        }
    }
}

/// Row-wise DTLZ objective evaluation, shared with the constrained variants.
#[derive(Debug, Clone, Copy)]
pub(crate) struct DtlzObjectives {
    pub variant: Variant,
    pub n_obj: usize,
    pub alpha: f64,
}

impl DtlzObjectives {
    pub fn fill(&self, x: ArrayView1<'_, f64>, mut f: ArrayViewMut1<'_, f64>) {
        let m = self.n_obj;
        let position = x.slice(s![..m - 1]);
        let distance = x.slice(s![m - 1..]);
        match self.variant {
            Variant::Dtlz1 => {
                let g = g_multimodal(distance);
                for i in 0..m {
                    let mut v = 0.5 * (1.0 + g);
                    v *= position.slice(s![..m - 1 - i]).product();
                    if i > 0 {
                        v *= 1.0 - position[m - 1 - i];
                    }
                    f[i] = v;
                }
            }
            Variant::Dtlz2 => spherical(position, g_sphere(distance), 1.0, f),
            Variant::Dtlz3 => spherical(position, g_multimodal(distance), 1.0, f),
            Variant::Dtlz4 => spherical(position, g_sphere(distance), self.alpha, f),
            Variant::Dtlz5 | Variant::Dtlz6 => {
                let g = if self.variant == Variant::Dtlz5 {
                    g_sphere(distance)
                } else {
                    distance.fold(0.0, |acc, &v| acc + v.powf(0.1))
                };
                let mut theta = position.to_owned();
                for j in 1..theta.len() {
                    theta[j] = (1.0 + 2.0 * g * position[j]) / (2.0 * (1.0 + g));
                }
                spherical(theta.view(), g, 1.0, f);
            }
            Variant::Dtlz7 => {
                let k = distance.len() as f64;
                let g = 1.0 + 9.0 / k * distance.sum();
                let mut h = m as f64;
                for i in 0..m - 1 {
                    f[i] = position[i];
                    h -= position[i] / (1.0 + g) * (1.0 + (3.0 * PI * position[i]).sin());
                }
                f[m - 1] = (1.0 + g) * h;
            }
        }
    }
}

/// Rastrigin-like distance function of DTLZ1 and DTLZ3.
fn g_multimodal(xm: ArrayView1<'_, f64>) -> f64 {
    let k = xm.len() as f64;
    100.0
        * (k + xm.fold(0.0, |acc, &v| {
            let d = v - 0.5;
            acc + d * d - (20.0 * PI * d).cos()
        }))
}

fn g_sphere(xm: ArrayView1<'_, f64>) -> f64 {
    xm.fold(0.0, |acc, &v| acc + (v - 0.5) * (v - 0.5))
}

/// `(1 + g)` times the cos/sin products mapping angles onto a sphere.
fn spherical(theta: ArrayView1<'_, f64>, g: f64, alpha: f64, mut f: ArrayViewMut1<'_, f64>) {
    let n = theta.len();
    for i in 0..f.len() {
        let mut v = 1.0 + g;
        for j in 0..n - i {
            v *= (theta[j].powf(alpha) * FRAC_PI_2).cos();
        }
        if i > 0 {
            v *= (theta[n - i].powf(alpha) * FRAC_PI_2).sin();
        }
        f[i] = v;
    }
}

/// `n_var` for `k` distance variables.
///
/// # Errors
///
/// [`Error::InvalidArgument`] if `n_obj == 0` or the sum overflows.
pub fn n_var_for_k(k: usize, n_obj: usize) -> Result<usize> {
    require(n_obj >= 1, || "n_obj must be at least 1".into())?;
    k.checked_add(n_obj - 1).ok_or_else(|| {
        Error::InvalidArgument(format!("k = {k} with n_obj = {n_obj} overflows n_var"))
    })
}

pub(crate) fn check_sizes(name: &str, n_var: usize, n_obj: usize) -> Result<()> {
    require(n_obj >= 2, || format!("{name} needs n_obj >= 2, got {n_obj}"))?;
    require(n_var >= n_obj, || {
        format!("{name} needs n_var >= n_obj, got n_var = {n_var}, n_obj = {n_obj}")
    })
}

fn build(
    variant: Variant,
    n_var: usize,
    n_obj: usize,
    alpha: f64,
    front: impl FrontProvider + 'static,
) -> Result<Problem> {
    let name = variant.name();
    check_sizes(name, n_var, n_obj)?;
    let objectives = DtlzObjectives {
        variant,
        n_obj,
        alpha,
    };
    ProblemBuilder::new(name, n_var)
        .with_n_obj(n_obj)
        .with_formula(rowwise(move |x, f| objectives.fill(x, f)))
        .with_front(front)
        .build()
}

/// The hyperplane `Σ f = 0.5`.
pub(crate) fn linear_front() -> SimplexFront {
    SimplexFront::linear(DEFAULT_FRONT_POINTS, 0.5).with_config(front_config())
}

/// The unit hypersphere.
pub(crate) fn sphere_front() -> SimplexFront {
    SimplexFront::sphere(DEFAULT_FRONT_POINTS).with_config(front_config())
}

/// DTLZ1. Defaults: `n_var = 7`, `n_obj = 3`.
///
/// ```
/// use u_mop::problems::dtlz;
///
/// let problem = dtlz::dtlz1(7, 3).unwrap();
/// let front = problem.pareto_front().unwrap();
/// for row in front.rows() {
///     assert!((row.sum() - 0.5).abs() < 1e-9);
/// }
/// ```
pub fn dtlz1(n_var: usize, n_obj: usize) -> Result<Problem> {
    build(Variant::Dtlz1, n_var, n_obj, 1.0, linear_front())
}

/// DTLZ2. Defaults: `n_var = 10`, `n_obj = 3`.
pub fn dtlz2(n_var: usize, n_obj: usize) -> Result<Problem> {
    build(Variant::Dtlz2, n_var, n_obj, 1.0, sphere_front())
}

/// DTLZ3. Defaults: `n_var = 10`, `n_obj = 3`.
pub fn dtlz3(n_var: usize, n_obj: usize) -> Result<Problem> {
    build(Variant::Dtlz3, n_var, n_obj, 1.0, sphere_front())
}

/// DTLZ4 with `alpha = 100`. Defaults: `n_var = 10`, `n_obj = 3`.
pub fn dtlz4(n_var: usize, n_obj: usize) -> Result<Problem> {
    dtlz4_with_alpha(n_var, n_obj, DTLZ4_ALPHA)
}

/// DTLZ4 with a custom density bias.
pub fn dtlz4_with_alpha(n_var: usize, n_obj: usize, alpha: f64) -> Result<Problem> {
    require(alpha > 0.0, || format!("dtlz4 needs alpha > 0, got {alpha}"))?;
    build(Variant::Dtlz4, n_var, n_obj, alpha, sphere_front())
}

/// DTLZ5. No front is provided.
pub fn dtlz5(n_var: usize, n_obj: usize) -> Result<Problem> {
    build(Variant::Dtlz5, n_var, n_obj, 1.0, NoFront)
}

/// DTLZ6. No front is provided.
pub fn dtlz6(n_var: usize, n_obj: usize) -> Result<Problem> {
    build(Variant::Dtlz6, n_var, n_obj, 1.0, NoFront)
}

/// DTLZ7. No front is provided.
pub fn dtlz7(n_var: usize, n_obj: usize) -> Result<Problem> {
    build(Variant::Dtlz7, n_var, n_obj, 1.0, NoFront)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::problems::testing::eval;
    use crate::ref_dirs::{generate, ReferenceDirections};
    use approx::assert_relative_eq;
    use ndarray::array;

    #[test]
    fn test_dtlz1_optimal_sum() {
        let p = dtlz1(7, 3).unwrap();
        let (f, _) = eval(&p, &[0.3, 0.6, 0.5, 0.5, 0.5, 0.5, 0.5]);
        assert_relative_eq!(f.sum(), 0.5, epsilon = 1e-12);
        assert_relative_eq!(f[0], 0.5 * 0.3 * 0.6, epsilon = 1e-12);
        assert_relative_eq!(f[2], 0.5 * 0.7, epsilon = 1e-12);
    }

    #[test]
    fn test_dtlz2_on_sphere() {
        let p = dtlz2(12, 3).unwrap();
        let mut x = vec![0.5; 12];
        x[0] = 0.2;
        x[1] = 0.9;
        let (f, _) = eval(&p, &x);
        assert_relative_eq!(f.dot(&f), 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_dtlz3_distance_penalty() {
        let p = dtlz3(10, 3).unwrap();
        let mut x = vec![0.5; 10];
        let (on, _) = eval(&p, &x);
        x[5] = 0.0;
        let (off, _) = eval(&p, &x);
        assert!(off.dot(&off) > on.dot(&on));
    }

    #[test]
    fn test_dtlz4_alpha_bias() {
        let p = dtlz4(10, 3).unwrap();
        let mut x = vec![0.5; 10];
        x[0] = 0.9;
        x[1] = 0.9;
        let (f, _) = eval(&p, &x);
        // 0.9^100 is tiny, so the point collapses onto the f3 axis.
        assert_relative_eq!(f[2], 0.0, epsilon = 1e-3);
        assert_relative_eq!(f[0], 1.0, epsilon = 1e-3);
    }

    #[test]
    fn test_dtlz5_first_angle_free() {
        let p = dtlz5(10, 3).unwrap();
        let mut x = vec![0.5; 10];
        x[0] = 0.0;
        let (f, _) = eval(&p, &x);
        // theta = (0, 0.5) with g = 0
        assert_relative_eq!(f[0], std::f64::consts::FRAC_1_SQRT_2, epsilon = 1e-12);
        assert_relative_eq!(f[1], std::f64::consts::FRAC_1_SQRT_2, epsilon = 1e-12);
        assert_relative_eq!(f[2], 0.0, epsilon = 1e-12);
    }

    #[test]
    fn test_dtlz7_last_objective() {
        let p = dtlz7(22, 3).unwrap();
        let (f, _) = eval(&p, &vec![0.0; 22]);
        assert_eq!(f[0], 0.0);
        assert_eq!(f[1], 0.0);
        assert_relative_eq!(f[2], 6.0);
    }

    #[test]
    fn test_dtlz_fronts() {
        assert!(dtlz2(10, 3).unwrap().pareto_front().is_ok());
        assert!(matches!(
            dtlz7(10, 3).unwrap().pareto_front(),
            Err(Error::ParetoFrontUnavailable { .. })
        ));
    }

    #[test]
    fn test_front_from_given_directions() {
        let p = dtlz2(10, 2).unwrap();
        let dirs = ReferenceDirections::try_new(array![[1.0, 0.0], [0.5, 0.5]]).unwrap();
        let front = p.pareto_front_with(&dirs).unwrap();
        assert_relative_eq!(front[[0, 0]], 1.0);
        assert_relative_eq!(front[[1, 0]], std::f64::consts::FRAC_1_SQRT_2);

        let wrong = generate(10, 3).unwrap();
        assert!(matches!(
            p.pareto_front_with(&wrong),
            Err(Error::DimensionMismatch { .. })
        ));
    }

    #[test]
    fn test_size_checks() {
        assert!(dtlz1(7, 1).is_err());
        assert!(dtlz2(2, 3).is_err());
        assert!(dtlz4_with_alpha(10, 3, 0.0).is_err());
        assert_eq!(n_var_for_k(10, 3).unwrap(), 12);
        assert!(matches!(n_var_for_k(0, 0), Err(Error::InvalidArgument(_))));
        assert!(n_var_for_k(usize::MAX, 3).is_err());
    }
}
