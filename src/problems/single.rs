//! Unconstrained single-objective functions.
//!
//! All have a global minimum of `0`, reported as a `1×1` front.

use std::f64::consts::PI;

use ndarray::{ArrayView1, ArrayViewMut1};

use super::{require, rowwise};
use crate::error::Result;
use crate::front::ClosedForm;
use crate::problem::{Problem, ProblemBuilder};

fn build(
    name: &str,
    n_var: usize,
    bound: f64,
    body: impl Fn(ArrayView1<'_, f64>, ArrayViewMut1<'_, f64>) + Send + Sync + 'static,
) -> Result<Problem> {
    ProblemBuilder::new(name, n_var)
        .with_bounds(-bound, bound)
        .with_formula(rowwise(body))
        .with_front(ClosedForm::point(vec![0.0]))
        .build()
}

/// Shifted sphere `Σ (x - 0.5)²` on `[0, 1]`. Default `n_var = 10`.
pub fn sphere(n_var: usize) -> Result<Problem> {
    ProblemBuilder::new("sphere", n_var)
        .with_bounds(0.0, 1.0)
        .with_formula(rowwise(|x, mut f| {
            f[0] = x.fold(0.0, |acc, &v| acc + (v - 0.5).powi(2));
        }))
        .with_front(ClosedForm::point(vec![0.0]))
        .build()
}

/// Rastrigin with amplitude `10`. Default `n_var = 2`.
pub fn rastrigin(n_var: usize) -> Result<Problem> {
    rastrigin_with_amplitude(n_var, 10.0)
}

/// Rastrigin `A·n + Σ (x² - A·cos 2πx)` on `[-5, 5]`.
pub fn rastrigin_with_amplitude(n_var: usize, a: f64) -> Result<Problem> {
    require(a.is_finite(), || format!("rastrigin amplitude must be finite, got {a}"))?;
    build("rastrigin", n_var, 5.0, move |x, mut f| {
        let n = x.len() as f64;
        f[0] = a * n + x.fold(0.0, |acc, &v| acc + v * v - a * (2.0 * PI * v).cos());
    })
}

/// Rosenbrock valley on `[-2.048, 2.048]`. Default `n_var = 2`.
pub fn rosenbrock(n_var: usize) -> Result<Problem> {
    build("rosenbrock", n_var, 2.048, |x, mut f| {
        f[0] = x
            .windows(2)
            .into_iter()
            .map(|w| 100.0 * (w[1] - w[0] * w[0]).powi(2) + (1.0 - w[0]).powi(2))
            .sum::<f64>();
    })
}

/// Griewank on `[-600, 600]`. Default `n_var = 2`.
pub fn griewank(n_var: usize) -> Result<Problem> {
    build("griewank", n_var, 600.0, |x, mut f| {
        let squares = x.dot(&x) / 4000.0;
        let product: f64 = x
            .iter()
            .enumerate()
            .map(|(i, &v)| (v / ((i + 1) as f64).sqrt()).cos())
            .product();
        f[0] = 1.0 + squares - product;
    })
}

/// Schwefel on `[-500, 500]`; minimum near `x_i = 420.9687`. Default
/// `n_var = 2`.
pub fn schwefel(n_var: usize) -> Result<Problem> {
    build("schwefel", n_var, 500.0, |x, mut f| {
        let n = x.len() as f64;
        f[0] = 418.9829 * n - x.fold(0.0, |acc, &v| acc + v * v.abs().sqrt().sin());
    })
}

/// Zakharov on `[-10, 10]`. Default `n_var = 2`.
pub fn zakharov(n_var: usize) -> Result<Problem> {
    build("zakharov", n_var, 10.0, |x, mut f| {
        let a: f64 = x
            .iter()
            .enumerate()
            .map(|(i, &v)| 0.5 * (i + 1) as f64 * v)
            .sum();
        f[0] = x.dot(&x) + a * a + a.powi(4);
    })
}

/// Ackley on `[-32.768, 32.768]`. Default `n_var = 2`.
pub fn ackley(n_var: usize) -> Result<Problem> {
    const A: f64 = 20.0;
    const B: f64 = 0.2;
    build("ackley", n_var, 32.768, |x, mut f| {
        let n = x.len() as f64;
        let mean_sq = x.dot(&x) / n;
        let mean_cos = x.fold(0.0, |acc, &v| acc + (2.0 * PI * v).cos()) / n;
        f[0] = -A * (-B * mean_sq.sqrt()).exp() - mean_cos.exp() + A + 1f64.exp();
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::problems::testing::eval;
    use approx::assert_relative_eq;

    #[test]
    fn test_minima_are_zero() {
        let cases = [
            (sphere(10).unwrap(), vec![0.5; 10]),
            (rastrigin(3).unwrap(), vec![0.0; 3]),
            (rosenbrock(4).unwrap(), vec![1.0; 4]),
            (griewank(2).unwrap(), vec![0.0; 2]),
            (zakharov(2).unwrap(), vec![0.0; 2]),
            (ackley(5).unwrap(), vec![0.0; 5]),
        ];
        for (p, x) in cases {
            let (f, g) = eval(&p, &x);
            assert_relative_eq!(f[0], 0.0, epsilon = 1e-12);
            assert!(g.is_empty());
            assert_eq!(p.pareto_front().unwrap()[[0, 0]], 0.0);
        }
    }

    #[test]
    fn test_schwefel_near_optimum() {
        let p = schwefel(2).unwrap();
        let (f, _) = eval(&p, &[420.9687, 420.9687]);
        assert!(f[0].abs() < 1e-3);
    }

    #[test]
    fn test_rastrigin_values() {
        let p = rastrigin(2).unwrap();
        // cos(2πx) = 1 at integers
        let (f, _) = eval(&p, &[1.0, 2.0]);
        assert_relative_eq!(f[0], 5.0, epsilon = 1e-12);
        assert!(rastrigin_with_amplitude(2, f64::NAN).is_err());
    }

    #[test]
    fn test_rosenbrock_value() {
        let p = rosenbrock(2).unwrap();
        let (f, _) = eval(&p, &[0.0, 0.0]);
        assert_relative_eq!(f[0], 1.0);
        assert_eq!(p.xu()[0], 2.048);
    }

    #[test]
    fn test_zakharov_value() {
        let p = zakharov(2).unwrap();
        // a = 0.5 + 1.0 = 1.5
        let (f, _) = eval(&p, &[1.0, 1.0]);
        assert_relative_eq!(f[0], 2.0 + 2.25 + 5.0625);
    }

    #[test]
    fn test_bounds() {
        assert_eq!(ackley(2).unwrap().xl()[1], -32.768);
        assert_eq!(griewank(2).unwrap().xu()[0], 600.0);
        assert_eq!(sphere(3).unwrap().xl()[0], 0.0);
    }
}
