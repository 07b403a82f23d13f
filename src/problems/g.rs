//! G1 – G10: single-objective constrained benchmarks.
//!
//! Each problem's front is its best known objective value as a `1×1`
//! matrix, and its Pareto set the decision vector attaining it.
//!
//! # References
//!
//! - Michalewicz & Schoenauer (1996), "Evolutionary Algorithms for
//!   Constrained Parameter Optimization Problems"
//! - Runarsson & Yao (2000), "Stochastic Ranking for Constrained
//!   Evolutionary Optimization"

use std::f64::consts::PI;

use ndarray::{s, Array1, ArrayView1, ArrayViewMut1, Axis};

use super::rowwise_constrained;
use crate::error::Result;
use crate::front::ClosedForm;
use crate::problem::{Bounds, Problem, ProblemBuilder};

#[allow(clippy::too_many_arguments)]
fn build(
    name: &str,
    n_var: usize,
    n_constr: usize,
    xl: impl Into<Bounds>,
    xu: impl Into<Bounds>,
    optimum: f64,
    optimum_x: &[f64],
    body: impl Fn(ArrayView1<'_, f64>, ArrayViewMut1<'_, f64>, ArrayViewMut1<'_, f64>)
        + Send
        + Sync
        + 'static,
) -> Result<Problem> {
    ProblemBuilder::new(name, n_var)
        .with_n_obj(1)
        .with_n_constr(n_constr)
        .with_bounds(xl, xu)
        .with_formula(rowwise_constrained(body))
        .with_front(ClosedForm::point(vec![optimum]))
        .with_pareto_set(Array1::from(optimum_x.to_vec()).insert_axis(Axis(0)))
        .build()
}

const G01_X: [f64; 13] = [1.0, 1.0, 1.0, 1.0, 1.0, 1.0, 1.0, 1.0, 1.0, 3.0, 3.0, 3.0, 1.0];

/// G1: quadratic objective, nine linear constraints. Optimum `-15`.
pub fn g01() -> Result<Problem> {
    let mut xu = vec![1.0; 13];
    xu[9] = 100.0;
    xu[10] = 100.0;
    xu[11] = 100.0;
    build("g01", 13, 9, 0.0, xu, -15.0, &G01_X, |x, mut f, mut g| {
        let head = x.slice(s![0..4]);
        f[0] = 5.0 * head.sum() - 5.0 * head.dot(&head) - x.slice(s![4..]).sum();

        g[0] = 2.0 * x[0] + 2.0 * x[1] + x[9] + x[10] - 10.0;
        g[1] = 2.0 * x[0] + 2.0 * x[2] + x[9] + x[11] - 10.0;
        g[2] = 2.0 * x[1] + 2.0 * x[2] + x[10] + x[11] - 10.0;
        g[3] = -8.0 * x[0] + x[9];
        g[4] = -8.0 * x[1] + x[10];
        g[5] = -8.0 * x[2] + x[11];
        g[6] = -2.0 * x[3] - x[4] + x[9];
        g[7] = -2.0 * x[5] - x[6] + x[10];
        g[8] = -2.0 * x[7] - x[8] + x[11];
    })
}

const G02_X: [f64; 20] = [
    3.16246061572185, 3.12833142812967, 3.09479212988791, 3.06145059523469, 3.02792915885555,
    2.9938260670173, 2.95866871765285, 2.9218422731245, 0.49482511456933, 0.4883571100549,
    0.48231642711865, 0.47664475092742, 0.47129550835493, 0.46623099264167, 0.46142004984199,
    0.45683664767217, 0.45245876903267, 0.44826762241853, 0.4442470095876, 0.44038285956317,
];

/// G2: highly multimodal, 20 variables.
pub fn g02() -> Result<Problem> {
    const N: usize = 20;
    build("g02", N, 2, 0.0, 10.0, -0.803_619_104_125_59, &G02_X, |x, mut f, mut g| {
        let weighted: f64 = x
            .iter()
            .enumerate()
            .map(|(j, &v)| (j + 1) as f64 * v * v)
            .sum();
        let a: f64 = x.iter().map(|v| v.cos().powi(4)).sum();
        let b = 2.0 * x.iter().map(|v| v.cos().powi(2)).product::<f64>();
        f[0] = -((a - b) / weighted.sqrt()).abs();

        g[0] = 0.75 - x.product();
        g[1] = x.sum() - 7.5 * N as f64;
    })
}

const G03_X: [f64; 10] = [
    0.3162435764728307, 0.31624357741433834, 0.3162435780123459, 0.3162435756640179,
    0.31624357820552607, 0.3162435773885507, 0.3162435754729495, 0.31624357716488394,
    0.3162435781559203, 0.3162435761473749,
];

/// G3: product objective on a thin spherical shell.
pub fn g03() -> Result<Problem> {
    const N: usize = 10;
    build("g03", N, 1, 0.0, 1.0, -1.000_500_100_010_00, &G03_X, |x, mut f, mut g| {
        f[0] = -(N as f64).sqrt().powi(N as i32) * x.product();
        g[0] = (x.dot(&x) - 1.0).abs() - 1e-4;
    })
}

const G04_X: [f64; 5] = [78.0, 33.0, 29.9952560256816, 45.0, 36.77581290578821];

/// G4: quadratic objective with six nonlinear constraints.
pub fn g04() -> Result<Problem> {
    build(
        "g04",
        5,
        6,
        [78.0, 33.0, 27.0, 27.0, 27.0],
        [102.0, 45.0, 45.0, 45.0, 45.0],
        -30_665.538_671_783_32,
        &G04_X,
        |x, mut f, mut g| {
            f[0] = 5.3578547 * x[2] * x[2] + 0.8356891 * x[0] * x[4] + 37.293239 * x[0]
                - 40792.141;

            let u = 85.334407 + 0.0056858 * x[1] * x[4] + 0.0006262 * x[0] * x[3]
                - 0.0022053 * x[2] * x[4];
            let v = 80.51249 + 0.0071317 * x[1] * x[4] + 0.0029955 * x[0] * x[1]
                + 0.0021813 * x[2] * x[2];
            let w = 9.300961 + 0.0047026 * x[2] * x[4] + 0.0012547 * x[0] * x[2]
                + 0.0019085 * x[2] * x[3];
            g[0] = -u;
            g[1] = u - 92.0;
            g[2] = 90.0 - v;
            g[3] = v - 110.0;
            g[4] = 20.0 - w;
            g[5] = w - 25.0;
        },
    )
}

const G05_X: [f64; 4] = [
    679.9451482970287, 1026.066976000047, 0.11887636909441043, -0.39623348521517826,
];

/// G5: cubic objective, three equality constraints relaxed by `1e-4`.
pub fn g05() -> Result<Problem> {
    build(
        "g05",
        4,
        5,
        [0.0, 0.0, -0.55, -0.55],
        [1200.0, 1200.0, 0.55, 0.55],
        5126.496_714_007_1,
        &G05_X,
        |x, mut f, mut g| {
            f[0] = 3.0 * x[0] + 1e-6 * x[0].powi(3) + 2.0 * x[1] + 2e-6 / 3.0 * x[1].powi(3);

            g[0] = x[2] - x[3] - 0.55;
            g[1] = x[3] - x[2] - 0.55;
            g[2] = (1000.0 * ((-x[2] - 0.25).sin() + (-x[3] - 0.25).sin()) + 894.8 - x[0]).abs()
                - 1e-4;
            g[3] = (1000.0 * ((x[2] - 0.25).sin() + (x[2] - x[3] - 0.25).sin()) + 894.8 - x[1])
                .abs()
                - 1e-4;
            g[4] = (1000.0 * ((x[3] - 0.25).sin() + (x[3] - x[2] - 0.25).sin()) + 1294.8).abs()
                - 1e-4;
        },
    )
}

const G06_X: [f64; 2] = [14.095, 0.8429607892154796];

/// G6: cubic objective in a crescent-shaped feasible region.
pub fn g06() -> Result<Problem> {
    build(
        "g06",
        2,
        2,
        [13.0, 0.0],
        [100.0, 100.0],
        -6961.813_875_580_15,
        &G06_X,
        |x, mut f, mut g| {
            f[0] = (x[0] - 10.0).powi(3) + (x[1] - 20.0).powi(3);
            g[0] = 100.0 - (x[0] - 5.0).powi(2) - (x[1] - 5.0).powi(2);
            g[1] = (x[0] - 6.0).powi(2) + (x[1] - 5.0).powi(2) - 82.81;
        },
    )
}

const G07_X: [f64; 10] = [
    2.17199634142692, 2.3636830416034, 8.77392573913157, 5.09598443745173, 0.990654756560493,
    1.43057392853463, 1.32164415364306, 9.82872576524495, 8.2800915887356, 8.3759266477347,
];

/// G7: quadratic objective, ten variables, eight constraints.
pub fn g07() -> Result<Problem> {
    build("g07", 10, 8, -10.0, 10.0, 24.306_209_068_18, &G07_X, |x, mut f, mut g| {
        f[0] = x[0] * x[0] + x[1] * x[1] + x[0] * x[1] - 14.0 * x[0] - 16.0 * x[1]
            + (x[2] - 10.0).powi(2)
            + 4.0 * (x[3] - 5.0).powi(2)
            + (x[4] - 3.0).powi(2)
            + 2.0 * (x[5] - 1.0).powi(2)
            + 5.0 * x[6] * x[6]
            + 7.0 * (x[7] - 11.0).powi(2)
            + 2.0 * (x[8] - 10.0).powi(2)
            + (x[9] - 7.0).powi(2)
            + 45.0;

        g[0] = 4.0 * x[0] + 5.0 * x[1] - 3.0 * x[6] + 9.0 * x[7] - 105.0;
        g[1] = 10.0 * x[0] - 8.0 * x[1] - 17.0 * x[6] + 2.0 * x[7];
        g[2] = -8.0 * x[0] + 2.0 * x[1] + 5.0 * x[8] - 2.0 * x[9] - 12.0;
        g[3] = 3.0 * (x[0] - 2.0).powi(2) + 4.0 * (x[1] - 3.0).powi(2) + 2.0 * x[2] * x[2]
            - 7.0 * x[3]
            - 120.0;
        g[4] = 5.0 * x[0] * x[0] + 8.0 * x[1] + (x[2] - 6.0).powi(2) - 2.0 * x[3] - 40.0;
        g[5] = 0.5 * (x[0] - 8.0).powi(2) + 2.0 * (x[1] - 4.0).powi(2) + 3.0 * x[4] * x[4]
            - x[5]
            - 30.0;
        g[6] = x[0] * x[0] + 2.0 * (x[1] - 2.0).powi(2) - 2.0 * x[0] * x[1] + 14.0 * x[4]
            - 6.0 * x[5];
        g[7] = -3.0 * x[0] + 6.0 * x[1] + 12.0 * (x[8] - 8.0).powi(2) - 7.0 * x[9];
    })
}

const G08_X: [f64; 2] = [1.227971352607526, 4.245373366122749];

/// G8: sinusoidal objective with many local optima.
pub fn g08() -> Result<Problem> {
    build("g08", 2, 2, 0.0, 10.0, -0.095_825_041_418_035_9, &G08_X, |x, mut f, mut g| {
        f[0] = -((2.0 * PI * x[0]).sin().powi(3) * (2.0 * PI * x[1]).sin())
            / (x[0].powi(3) * (x[0] + x[1]));
        g[0] = x[0] * x[0] - x[1] + 1.0;
        g[1] = 1.0 - x[0] + (x[1] - 4.0).powi(2);
    })
}

const G09_X: [f64; 7] = [
    2.3304993514740517, 1.951372368471146, -0.4775413995106158, 4.365726249236259,
    -0.624486959100389, 1.0381309941096217, 1.594226678067152,
];

/// G9: polynomial objective, seven variables in `[-10, 10]`.
pub fn g09() -> Result<Problem> {
    build("g09", 7, 4, -10.0, 10.0, 680.630_057_374_402, &G09_X, |x, mut f, mut g| {
        f[0] = (x[0] - 10.0).powi(2)
            + 5.0 * (x[1] - 12.0).powi(2)
            + x[2].powi(4)
            + 3.0 * (x[3] - 11.0).powi(2)
            + 10.0 * x[4].powi(6)
            + 7.0 * x[5] * x[5]
            + x[6].powi(4)
            - 4.0 * x[5] * x[6]
            - 10.0 * x[5]
            - 8.0 * x[6];

        let v1 = 2.0 * x[0] * x[0];
        let v2 = x[1] * x[1];
        g[0] = v1 + 3.0 * v2 * v2 + x[2] + 4.0 * x[3] * x[3] + 5.0 * x[4] - 127.0;
        g[1] = 7.0 * x[0] + 3.0 * x[1] + 10.0 * x[2] * x[2] + x[3] - x[4] - 282.0;
        g[2] = 23.0 * x[0] + v2 + 6.0 * x[5] * x[5] - 8.0 * x[6] - 196.0;
        g[3] = 2.0 * v1 + v2 - 3.0 * x[0] * x[1] + 2.0 * x[2] * x[2] + 5.0 * x[5] - 11.0 * x[6];
    })
}

const G10_X: [f64; 8] = [
    579.3066850179796, 1359.970678079356, 5109.970657431333, 182.01769963061534,
    295.6011737027468, 217.98230036938463, 286.4165259278685, 395.60117370274673,
];

/// G10: linear objective, all six constraints active at the optimum.
pub fn g10() -> Result<Problem> {
    build(
        "g10",
        8,
        6,
        [100.0, 1000.0, 1000.0, 10.0, 10.0, 10.0, 10.0, 10.0],
        [10000.0, 10000.0, 10000.0, 1000.0, 1000.0, 1000.0, 1000.0, 1000.0],
        7049.248_020_528_67,
        &G10_X,
        |x, mut f, mut g| {
            f[0] = x[0] + x[1] + x[2];
            g[0] = -1.0 + 0.0025 * (x[3] + x[5]);
            g[1] = -1.0 + 0.0025 * (-x[3] + x[4] + x[6]);
            g[2] = -1.0 + 0.01 * (-x[4] + x[7]);
            g[3] = 100.0 * x[0] - x[0] * x[5] + 833.33252 * x[3] - 83333.333;
            g[4] = x[1] * x[3] - x[1] * x[6] - 1250.0 * x[3] + 1250.0 * x[4];
            g[5] = x[2] * x[4] - x[2] * x[7] - 2500.0 * x[4] + 1_250_000.0;
        },
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::problems::testing::eval;
    use approx::assert_relative_eq;

    #[test]
    fn test_g01_optimum_is_feasible() {
        let p = g01().unwrap();
        let x = [1.0, 1.0, 1.0, 1.0, 1.0, 1.0, 1.0, 1.0, 1.0, 3.0, 3.0, 3.0, 1.0];
        let (f, g) = eval(&p, &x);
        assert_eq!(f[0], -15.0);
        assert!(g.iter().all(|&v| v <= 0.0));
        assert_eq!(p.pareto_front().unwrap()[[0, 0]], -15.0);
    }

    #[test]
    fn test_g09_lower_bound() {
        let p = g09().unwrap();
        assert!(p.xl().iter().all(|&v| v == -10.0));
    }

    fn all() -> Vec<Problem> {
        [g01(), g02(), g03(), g04(), g05(), g06(), g07(), g08(), g09(), g10()]
            .into_iter()
            .map(|p| p.unwrap())
            .collect()
    }

    #[test]
    fn test_pareto_sets_attain_the_optimum() {
        for p in all() {
            let set = p.pareto_set().unwrap();
            assert_eq!(set.shape(), &[1, p.n_var()], "{}", p.name());
            let x = set.row(0);
            assert!(
                x.iter().zip(p.xl()).zip(p.xu()).all(|((&v, &lo), &hi)| lo <= v && v <= hi),
                "{} optimum outside bounds",
                p.name()
            );

            let (f, g) = eval(&p, x.as_slice().unwrap());
            let optimum = p.pareto_front().unwrap()[[0, 0]];
            assert_relative_eq!(f[0], optimum, max_relative = 1e-9);
            assert!(
                g.iter().all(|&v| v <= 1e-9),
                "{} optimum violates {g}",
                p.name()
            );
        }
    }

    #[test]
    fn test_sizes() {
        let sizes: Vec<(usize, usize)> = [g01(), g02(), g03(), g04(), g05(), g06(), g07(), g08(), g09(), g10()]
            .into_iter()
            .map(|p| {
                let p = p.unwrap();
                (p.n_var(), p.n_constr())
            })
            .collect();
        assert_eq!(
            sizes,
            vec![(13, 9), (20, 2), (10, 1), (5, 6), (4, 5), (2, 2), (10, 8), (2, 2), (7, 4), (8, 6)]
        );
    }

    #[test]
    fn test_g02_and_g05_and_g07_evaluate() {
        let (f, g) = eval(&g02().unwrap(), &[1.0; 20]);
        assert!(f[0] < 0.0);
        assert_eq!(g[0], -0.25);
        let (f, _) = eval(&g05().unwrap(), &[0.0; 4]);
        assert_eq!(f[0], 0.0);
        let (f, _) = eval(&g07().unwrap(), &[0.0; 10]);
        assert!(f[0] > 24.306);
    }
}
