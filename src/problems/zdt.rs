//! ZDT bi-objective problems.
//!
//! All share `f1 = h(x1)` and `f2 = g(x2..xn) * shape(f1 / g)`; the true
//! front is reached at `g = 1` and has a closed form.

use std::f64::consts::PI;

use ndarray::{s, ArrayView1};

use super::{curve, require, rowwise, DEFAULT_FRONT_POINTS};
use crate::error::Result;
use crate::front::{linspace, ClosedForm};
use crate::problem::{Bounds, Problem, ProblemBuilder};

/// Disconnected front segments of ZDT3, as ranges of `f1`.
const ZDT3_REGIONS: [(f64, f64); 5] = [
    (0.0, 0.083_001_534_9),
    (0.182_228_780, 0.257_762_363_4),
    (0.409_313_674_8, 0.453_882_104_1),
    (0.618_396_794_4, 0.652_511_703_8),
    (0.823_331_798_3, 0.851_832_865_4),
];

/// Smallest `f1` on the ZDT6 front.
const ZDT6_F1_MIN: f64 = 0.280_775_319_1;

fn tail_mean(x: ArrayView1<'_, f64>) -> f64 {
    x.slice(s![1..]).sum() / (x.len() - 1) as f64
}

fn build(
    name: &str,
    n_var: usize,
    xl: impl Into<Bounds>,
    xu: impl Into<Bounds>,
    body: fn(ArrayView1<'_, f64>) -> [f64; 2],
    front: ClosedForm,
) -> Result<Problem> {
    require(n_var >= 2, || format!("{name} needs n_var >= 2, got {n_var}"))?;
    ProblemBuilder::new(name, n_var)
        .with_n_obj(2)
        .with_bounds(xl, xu)
        .with_formula(rowwise(move |x, mut f| {
            let [f1, f2] = body(x);
            f[0] = f1;
            f[1] = f2;
        }))
        .with_front(front)
        .build()
}

/// ZDT1: convex front `f2 = 1 - sqrt(f1)`. Default `n_var = 30`.
pub fn zdt1(n_var: usize) -> Result<Problem> {
    build(
        "zdt1",
        n_var,
        0.0,
        1.0,
        |x| {
            let f1 = x[0];
            let g = 1.0 + 9.0 * tail_mean(x);
            [f1, g * (1.0 - (f1 / g).sqrt())]
        },
        ClosedForm::new(|| curve(linspace(0.0, 1.0, DEFAULT_FRONT_POINTS), |t| 1.0 - t.sqrt())),
    )
}

/// ZDT2: concave front `f2 = 1 - f1²`. Default `n_var = 30`.
pub fn zdt2(n_var: usize) -> Result<Problem> {
    build(
        "zdt2",
        n_var,
        0.0,
        1.0,
        |x| {
            let f1 = x[0];
            let g = 1.0 + 9.0 * tail_mean(x);
            [f1, g * (1.0 - (f1 / g).powi(2))]
        },
        ClosedForm::new(|| curve(linspace(0.0, 1.0, DEFAULT_FRONT_POINTS), |t| 1.0 - t * t)),
    )
}

/// ZDT3: front in five disconnected segments. Default `n_var = 30`.
pub fn zdt3(n_var: usize) -> Result<Problem> {
    build(
        "zdt3",
        n_var,
        0.0,
        1.0,
        |x| {
            let f1 = x[0];
            let g = 1.0 + 9.0 * tail_mean(x);
            let r = f1 / g;
            [f1, g * (1.0 - r.sqrt() - r * (10.0 * PI * f1).sin())]
        },
        ClosedForm::new(|| {
            let per_region = DEFAULT_FRONT_POINTS / ZDT3_REGIONS.len();
            let ts = ZDT3_REGIONS
                .iter()
                .flat_map(|&(lo, hi)| linspace(lo, hi, per_region));
            curve(ts, |t| 1.0 - t.sqrt() - t * (10.0 * PI * t).sin())
        }),
    )
}

/// ZDT4: ZDT1's front behind `21^9` local fronts. Default `n_var = 10`;
/// `x1 ∈ [0, 1]`, the rest in `[-5, 5]`.
pub fn zdt4(n_var: usize) -> Result<Problem> {
    require(n_var >= 2, || format!("zdt4 needs n_var >= 2, got {n_var}"))?;
    let mut xl = vec![-5.0; n_var];
    let mut xu = vec![5.0; n_var];
    xl[0] = 0.0;
    xu[0] = 1.0;
    build(
        "zdt4",
        n_var,
        xl,
        xu,
        |x| {
            let f1 = x[0];
            let tail = x.slice(s![1..]);
            let g = 1.0
                + 10.0 * tail.len() as f64
                + tail.fold(0.0, |acc, &v| acc + v * v - 10.0 * (4.0 * PI * v).cos());
            [f1, g * (1.0 - (f1 / g).sqrt())]
        },
        ClosedForm::new(|| curve(linspace(0.0, 1.0, DEFAULT_FRONT_POINTS), |t| 1.0 - t.sqrt())),
    )
}

/// ZDT6: non-uniform density along a concave front. Default `n_var = 10`.
pub fn zdt6(n_var: usize) -> Result<Problem> {
    build(
        "zdt6",
        n_var,
        0.0,
        1.0,
        |x| {
            let f1 = 1.0 - (-4.0 * x[0]).exp() * (6.0 * PI * x[0]).sin().powi(6);
            let g = 1.0 + 9.0 * tail_mean(x).powf(0.25);
            [f1, g * (1.0 - (f1 / g).powi(2))]
        },
        ClosedForm::new(|| curve(linspace(ZDT6_F1_MIN, 1.0, DEFAULT_FRONT_POINTS), |t| 1.0 - t * t)),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::problems::testing::eval;
    use approx::assert_relative_eq;

    #[test]
    fn test_zdt1_on_front() {
        let p = zdt1(30).unwrap();
        let mut x = vec![0.0; 30];
        x[0] = 0.25;
        let (f, g) = eval(&p, &x);
        assert_relative_eq!(f[0], 0.25);
        assert_relative_eq!(f[1], 0.5);
        assert!(g.is_empty());
    }

    #[test]
    fn test_zdt1_off_front() {
        let p = zdt1(3).unwrap();
        let (f, _) = eval(&p, &[0.0, 1.0, 1.0]);
        assert_relative_eq!(f[1], 10.0);
    }

    #[test]
    fn test_zdt2_front_shape() {
        let front = zdt2(30).unwrap().pareto_front().unwrap().clone();
        assert_eq!(front.nrows(), DEFAULT_FRONT_POINTS);
        for row in front.rows() {
            assert_relative_eq!(row[1], 1.0 - row[0] * row[0], epsilon = 1e-12);
        }
    }

    #[test]
    fn test_zdt3_front_segments() {
        let p = zdt3(30).unwrap();
        let front = p.pareto_front().unwrap();
        assert_eq!(front.nrows(), DEFAULT_FRONT_POINTS);
        assert!(front.column(0).iter().all(|&t| t <= 0.86));
        let ideal = p.ideal_point().unwrap();
        assert!(ideal[1] < -0.7);
    }

    #[test]
    fn test_zdt4_bounds_and_optimum() {
        let p = zdt4(10).unwrap();
        assert_eq!(p.xl()[0], 0.0);
        assert_eq!(p.xl()[1], -5.0);
        let mut x = vec![0.0; 10];
        x[0] = 1.0;
        let (f, _) = eval(&p, &x);
        assert_relative_eq!(f[0], 1.0);
        assert_relative_eq!(f[1], 0.0, epsilon = 1e-12);
    }

    #[test]
    fn test_zdt6_front_start() {
        let p = zdt6(10).unwrap();
        let front = p.pareto_front().unwrap();
        assert_relative_eq!(front[[0, 0]], ZDT6_F1_MIN);
        let (f, _) = eval(&p, &[0.0; 10]);
        assert_relative_eq!(f[0], 1.0);
        assert_relative_eq!(f[1], 0.0);
    }

    #[test]
    fn test_requires_two_variables() {
        assert!(zdt1(1).is_err());
        assert!(zdt4(1).is_err());
    }
}
