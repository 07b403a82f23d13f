//! Classic bi-objective problems: BNH, OSY, TNK, Kursawe.
//!
//! OSY, TNK and Kursawe have no closed-form front. Pass a
//! [`FrontStore`] holding entries keyed `osy`, `tnk`, `kursawe` to make
//! their fronts available; without one they report the front unavailable.

use std::sync::Arc;

use super::{curve, rowwise, rowwise_constrained, DEFAULT_FRONT_POINTS};
use crate::error::Result;
use crate::front::{linspace, ClosedForm, FrontProvider, FrontStore, NoFront, Sidecar};
use crate::problem::{Problem, ProblemBuilder};

fn sidecar(store: Option<Arc<dyn FrontStore>>, key: &str) -> Box<dyn FrontProvider> {
    match store {
        Some(store) => Box::new(Sidecar::new(store, key)),
        None => Box::new(NoFront),
    }
}

/// Binh and Korn: two quadratic objectives, two constraints.
pub fn bnh() -> Result<Problem> {
    ProblemBuilder::new("bnh", 2)
        .with_n_obj(2)
        .with_n_constr(2)
        .with_bounds(0.0, [5.0, 3.0])
        .with_formula(rowwise_constrained(|x, mut f, mut g| {
            f[0] = 4.0 * x[0] * x[0] + 4.0 * x[1] * x[1];
            f[1] = (x[0] - 5.0).powi(2) + (x[1] - 5.0).powi(2);
            g[0] = ((x[0] - 5.0).powi(2) + x[1] * x[1] - 25.0) / 25.0;
            g[1] = -((x[0] - 8.0).powi(2) + (x[1] + 3.0).powi(2) - 7.7) / 7.7;
        }))
        .with_front(ClosedForm::new(|| {
            let x1 = linspace(0.0, 5.0, DEFAULT_FRONT_POINTS);
            let mut front = curve(x1, |_| 0.0);
            for mut row in front.rows_mut() {
                let x1 = row[0];
                let x2 = x1.min(3.0);
                row[0] = 4.0 * x1 * x1 + 4.0 * x2 * x2;
                row[1] = (x1 - 5.0).powi(2) + (x2 - 5.0).powi(2);
            }
            front
        }))
        .build()
}

/// Osyczka and Kundu: six variables, six constraints.
pub fn osy(store: Option<Arc<dyn FrontStore>>) -> Result<Problem> {
    ProblemBuilder::new("osy", 6)
        .with_n_obj(2)
        .with_n_constr(6)
        .with_bounds([0.0, 0.0, 1.0, 0.0, 1.0, 0.0], [10.0, 10.0, 5.0, 6.0, 5.0, 10.0])
        .with_formula(rowwise_constrained(|x, mut f, mut g| {
            f[0] = -(25.0 * (x[0] - 2.0).powi(2)
                + (x[1] - 2.0).powi(2)
                + (x[2] - 1.0).powi(2)
                + (x[3] - 4.0).powi(2)
                + (x[4] - 1.0).powi(2));
            f[1] = x.dot(&x);

            g[0] = -(x[0] + x[1] - 2.0) / 2.0;
            g[1] = -(6.0 - x[0] - x[1]) / 6.0;
            g[2] = -(2.0 - x[1] + x[0]) / 2.0;
            g[3] = -(2.0 - x[0] + 3.0 * x[1]) / 2.0;
            g[4] = -(4.0 - (x[2] - 3.0).powi(2) - x[3]) / 4.0;
            g[5] = -((x[4] - 3.0).powi(2) + x[5] - 4.0) / 4.0;
        }))
        .with_front(sidecar(store, "osy"))
        .build()
}

/// Tanaka: the objectives are the variables; the feasible region is
/// bounded by a wavy curve.
pub fn tnk(store: Option<Arc<dyn FrontStore>>) -> Result<Problem> {
    ProblemBuilder::new("tnk", 2)
        .with_n_obj(2)
        .with_n_constr(2)
        .with_bounds([0.0, 1e-30], [std::f64::consts::PI, std::f64::consts::PI])
        .with_formula(rowwise_constrained(|x, mut f, mut g| {
            f[0] = x[0];
            f[1] = x[1];
            g[0] = -(x[0] * x[0] + x[1] * x[1] - 1.0 - 0.1 * (16.0 * (x[0] / x[1]).atan()).cos());
            g[1] = 2.0 * ((x[0] - 0.5).powi(2) + (x[1] - 0.5).powi(2)) - 1.0;
        }))
        .with_front(sidecar(store, "tnk"))
        .build()
}

/// Kursawe: three variables in `[-5, 5]`, disconnected front.
pub fn kursawe(store: Option<Arc<dyn FrontStore>>) -> Result<Problem> {
    ProblemBuilder::new("kursawe", 3)
        .with_n_obj(2)
        .with_bounds(-5.0, 5.0)
        .with_formula(rowwise(|x, mut f| {
            f[0] = (0..2)
                .map(|i| -10.0 * (-0.2 * (x[i] * x[i] + x[i + 1] * x[i + 1]).sqrt()).exp())
                .sum::<f64>();
            f[1] = x.fold(0.0, |acc, &v| acc + v.abs().powf(0.8) + 5.0 * v.powi(3).sin());
        }))
        .with_front(sidecar(store, "kursawe"))
        .build()
}
