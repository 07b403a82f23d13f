//! Constrained DTLZ problems (C-DTLZ).
//!
//! Each wraps a DTLZ objective function and adds constraints on the
//! objective values:
//!
//! - **C1**: the front stays as is but a band in front of it is infeasible.
//! - **C2**: only parts of the front are feasible.
//! - **C3**: the constraints themselves form the front.

use ndarray::{Array2, ArrayView1, ArrayView2, ArrayViewMut1, Axis};

use super::dtlz::{check_sizes, linear_front, sphere_front, DtlzObjectives, Variant, DTLZ4_ALPHA};
use super::{front_config, require, rowwise_constrained, DEFAULT_FRONT_POINTS};
use crate::error::Result;
use crate::front::{project_to_sphere, FrontProvider, SimplexFront};
use crate::problem::{Problem, ProblemBuilder};

/// Default C1-DTLZ3 radius for `n_obj` objectives.
pub fn c1dtlz3_default_radius(n_obj: usize) -> f64 {
    match n_obj {
        0..=4 => 9.0,
        5..=12 => 12.5,
        _ => 15.0,
    }
}

/// Default C2-DTLZ2 radius for `n_obj` objectives.
pub fn c2dtlz2_default_radius(n_obj: usize) -> f64 {
    match n_obj {
        2 => 0.2,
        3 => 0.4,
        _ => 0.5,
    }
}

/// C2 constraint: feasible inside `n_obj + 1` hyperspheres of radius `r`,
/// centred at the axis extremes and at the front's centre.
pub fn constraint_c2(f: ArrayView1<'_, f64>, r: f64) -> f64 {
    let m = f.len();
    let total_sq = f.dot(&f);
    let r_sq = r * r;
    let corners = (0..m)
        .map(|i| (f[i] - 1.0).powi(2) + (total_sq - f[i] * f[i]) - r_sq)
        .fold(f64::INFINITY, f64::min);
    let centre = 1.0 / (m as f64).sqrt();
    let middle = f.fold(0.0, |acc, &v| acc + (v - centre).powi(2)) - r_sq;
    corners.min(middle)
}

fn build(
    name: &str,
    n_var: usize,
    n_obj: usize,
    n_constr: usize,
    objectives: DtlzObjectives,
    constraints: impl Fn(ArrayView1<'_, f64>, ArrayViewMut1<'_, f64>) + Send + Sync + 'static,
    front: impl FrontProvider + 'static,
) -> Result<Problem> {
    check_sizes(name, n_var, n_obj)?;
    ProblemBuilder::new(name, n_var)
        .with_n_obj(n_obj)
        .with_n_constr(n_constr)
        .with_formula(rowwise_constrained(move |x, mut f, g| {
            objectives.fill(x, f.view_mut());
            constraints(f.view(), g);
        }))
        .with_front(front)
        .build()
}

/// C1-DTLZ1. Defaults: `n_var = 7`, `n_obj = 3`.
pub fn c1dtlz1(n_var: usize, n_obj: usize) -> Result<Problem> {
    let objectives = DtlzObjectives {
        variant: Variant::Dtlz1,
        n_obj,
        alpha: 1.0,
    };
    build(
        "c1dtlz1",
        n_var,
        n_obj,
        1,
        objectives,
        |f, mut g| {
            let m = f.len();
            let head: f64 = f.iter().take(m - 1).map(|v| v / 0.5).sum();
            g[0] = -(1.0 - f[m - 1] / 0.6 - head);
        },
        linear_front(),
    )
}

/// C1-DTLZ3 with the default radius. Defaults: `n_var = 12`, `n_obj = 3`.
pub fn c1dtlz3(n_var: usize, n_obj: usize) -> Result<Problem> {
    c1dtlz3_with_radius(n_var, n_obj, c1dtlz3_default_radius(n_obj))
}

/// C1-DTLZ3: the shell `16 < Σ f² < r²` is infeasible.
pub fn c1dtlz3_with_radius(n_var: usize, n_obj: usize, r: f64) -> Result<Problem> {
    require(r > 4.0, || format!("c1dtlz3 needs r > 4, got {r}"))?;
    let objectives = DtlzObjectives {
        variant: Variant::Dtlz3,
        n_obj,
        alpha: 1.0,
    };
    build(
        "c1dtlz3",
        n_var,
        n_obj,
        1,
        objectives,
        move |f, mut g| {
            let radius = f.dot(&f);
            g[0] = -(radius - 16.0) * (radius - r * r);
        },
        sphere_front(),
    )
}

/// C2-DTLZ2 with the default radius. Defaults: `n_var = 12`, `n_obj = 3`.
pub fn c2dtlz2(n_var: usize, n_obj: usize) -> Result<Problem> {
    c2dtlz2_with_radius(n_var, n_obj, c2dtlz2_default_radius(n_obj))
}

/// C2-DTLZ2: the sphere front restricted to the feasible caps.
pub fn c2dtlz2_with_radius(n_var: usize, n_obj: usize, r: f64) -> Result<Problem> {
    require(r > 0.0, || format!("c2dtlz2 needs r > 0, got {r}"))?;
    let objectives = DtlzObjectives {
        variant: Variant::Dtlz2,
        n_obj,
        alpha: 1.0,
    };
    let front = SimplexFront::new(DEFAULT_FRONT_POINTS, move |dirs| {
        let sphere = project_to_sphere(dirs);
        let keep: Vec<usize> = sphere
            .rows()
            .into_iter()
            .enumerate()
            .filter(|(_, row)| constraint_c2(row.view(), r) <= 0.0)
            .map(|(i, _)| i)
            .collect();
        sphere.select(Axis(0), &keep)
    })
    .with_config(front_config());
    build(
        "c2dtlz2",
        n_var,
        n_obj,
        1,
        objectives,
        move |f, mut g| g[0] = constraint_c2(f, r),
        front,
    )
}

/// C3-DTLZ4. Defaults: `n_var = 7`, `n_obj = 3`.
///
/// One constraint per objective; the front lies on their boundary.
pub fn c3dtlz4(n_var: usize, n_obj: usize) -> Result<Problem> {
    let objectives = DtlzObjectives {
        variant: Variant::Dtlz4,
        n_obj,
        alpha: DTLZ4_ALPHA,
    };
    let front = SimplexFront::new(DEFAULT_FRONT_POINTS, c3_front).with_config(front_config());
    build(
        "c3dtlz4",
        n_var,
        n_obj,
        n_obj,
        objectives,
        |f, mut g| {
            let total_sq = f.dot(&f);
            for (j, slot) in g.iter_mut().enumerate() {
                let fj_sq = f[j] * f[j];
                *slot = 1.0 - fj_sq / 4.0 - (total_sq - fj_sq);
            }
        },
        front,
    )
}

fn c3_front(dirs: ArrayView2<'_, f64>) -> Array2<f64> {
    let mut front = project_to_sphere(dirs);
    for mut row in front.rows_mut() {
        let total_sq = row.dot(&row);
        let max_sq = row.fold(0.0_f64, |acc, &v| acc.max(v * v));
        let scale = (total_sq - 0.75 * max_sq).sqrt();
        if scale > 0.0 {
            row /= scale;
        }
    }
    front
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::problems::testing::eval;
    use approx::assert_relative_eq;
    use ndarray::array;

    #[test]
    fn test_c1dtlz1_band() {
        let p = c1dtlz1(7, 3).unwrap();
        assert_eq!(p.n_constr(), 1);
        // on the DTLZ1 front: feasible
        let (f, g) = eval(&p, &[0.5, 0.5, 0.5, 0.5, 0.5, 0.5, 0.5]);
        assert_relative_eq!(f.sum(), 0.5, epsilon = 1e-12);
        assert!(g[0] <= 0.0);
    }

    #[test]
    fn test_c1dtlz3_shell() {
        let p = c1dtlz3(12, 3).unwrap();
        let (_, g) = eval(&p, &[0.5; 12]);
        // on the unit sphere, inside the inner radius: feasible
        assert!(g[0] < 0.0);
        assert!(c1dtlz3_with_radius(12, 3, 3.0).is_err());
        assert_eq!(c1dtlz3_default_radius(8), 12.5);
    }

    #[test]
    fn test_constraint_c2() {
        // the axis extreme is inside its own sphere
        assert!(constraint_c2(array![1.0, 0.0, 0.0].view(), 0.4) < 0.0);
        // halfway between extreme and centre is outside all
        let s = 1.0 / 3f64.sqrt();
        let mid = array![(1.0 + s) / 2.0, s / 2.0, s / 2.0];
        assert!(constraint_c2(mid.view(), 0.1) > 0.0);
    }

    #[test]
    fn test_c2dtlz2_front_is_feasible() {
        let p = c2dtlz2(12, 3).unwrap();
        let front = p.pareto_front().unwrap();
        assert!(front.nrows() > 0);
        assert!(front.nrows() < 105);
        for row in front.rows() {
            assert!(constraint_c2(row, 0.4) <= 0.0);
            assert_relative_eq!(row.dot(&row), 1.0, epsilon = 1e-9);
        }
    }

    #[test]
    fn test_c3dtlz4_constraints_and_front() {
        let p = c3dtlz4(7, 3).unwrap();
        assert_eq!(p.n_constr(), 3);
        let front = p.pareto_front().unwrap();
        for row in front.rows() {
            let total_sq = row.dot(&row);
            let worst = row
                .iter()
                .map(|&v| 1.0 - v * v / 4.0 - (total_sq - v * v))
                .fold(f64::NEG_INFINITY, f64::max);
            assert_relative_eq!(worst, 0.0, epsilon = 1e-9);
        }
    }

    #[test]
    fn test_c3dtlz4_origin_is_infeasible() {
        let p = c3dtlz4(7, 3).unwrap();
        let (f, g) = eval(&p, &[0.0, 0.0, 0.5, 0.5, 0.5, 0.5, 0.5]);
        assert_relative_eq!(f.dot(&f), 1.0, epsilon = 1e-12);
        assert!(g.iter().any(|&v| v > 0.0));
    }
}
