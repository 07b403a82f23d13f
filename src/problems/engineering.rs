//! Engineering design problems: welded beam, two-bar truss, knapsack.
//!
//! None of these has a known front; [`Problem::pareto_front`] reports it
//! unavailable.

use ndarray::Array1;
use rand::Rng;

use super::{require, rowwise_constrained};
use crate::error::Result;
use crate::problem::{Problem, ProblemBuilder};

const WELD_LOAD: f64 = 6000.0;
const WELD_LENGTH: f64 = 14.0;
const WELD_MAX_SHEAR: f64 = 13600.0;
const WELD_MAX_STRESS: f64 = 30000.0;

/// Welded beam: fabrication cost vs. end deflection, four constraints on
/// shear stress, bending stress, geometry and buckling load.
pub fn welded_beam() -> Result<Problem> {
    ProblemBuilder::new("welded_beam", 4)
        .with_n_obj(2)
        .with_n_constr(4)
        .with_bounds([0.125, 0.1, 0.1, 0.125], [5.0, 10.0, 10.0, 5.0])
        .with_formula(rowwise_constrained(|x, mut f, mut g| {
            let (h, l, t, b) = (x[0], x[1], x[2], x[3]);
            f[0] = 1.10471 * h * h * l + 0.04811 * t * b * (14.0 + l);
            f[1] = 2.1952 / (b * t.powi(3));

            let r = (0.25 * (l * l + (h + t).powi(2))).sqrt();
            let m = WELD_LOAD * (WELD_LENGTH + l / 2.0);
            let j = 2.0 * 0.5f64.sqrt() * h * l * (l * l / 12.0 + 0.25 * (h + t).powi(2));
            let t1 = WELD_LOAD / (2.0f64.sqrt() * h * l);
            let t2 = m * r / j;
            let shear = (t1 * t1 + t2 * t2 + t1 * t2 * l / r).sqrt();
            let stress = 6.0 * WELD_LOAD * WELD_LENGTH / (b * t * t);
            let buckling = 64746.022 * (1.0 - 0.0282346 * t) * t * b.powi(3);

            g[0] = (shear - WELD_MAX_SHEAR) / WELD_MAX_SHEAR;
            g[1] = (stress - WELD_MAX_STRESS) / WELD_MAX_STRESS;
            g[2] = (h - b) / (5.0 - 0.125);
            g[3] = (WELD_LOAD - buckling) / WELD_LOAD;
        }))
        .build()
}

/// Two-bar truss: volume vs. maximum member stress, stress capped at `1e5`.
pub fn truss2d() -> Result<Problem> {
    const MAX_AREA: f64 = 0.01;
    const MAX_STRESS: f64 = 1e5;

    ProblemBuilder::new("truss2d", 3)
        .with_n_obj(2)
        .with_n_constr(1)
        .with_bounds([0.0, 0.0, 1.0], [MAX_AREA, MAX_AREA, 3.0])
        .with_formula(rowwise_constrained(|x, mut f, mut g| {
            let (a1, a2, y) = (x[0], x[1], x[2]);
            let long = (16.0 + y * y).sqrt();
            let short = (1.0 + y * y).sqrt();
            f[0] = a1 * long + a2 * short;
            let sigma_ac = 20.0 * long / (y * a1);
            let sigma_bc = 80.0 * short / (y * a2);
            f[1] = sigma_ac.max(sigma_bc);
            g[0] = f[1] - MAX_STRESS;
        }))
        .build()
}

/// 0/1 knapsack relaxed to `[0, 1]` per item: maximise profit (minimise
/// its negation) subject to total weight at most `capacity`.
pub fn knapsack(weights: Vec<f64>, profits: Vec<f64>, capacity: f64) -> Result<Problem> {
    let n_items = weights.len();
    require(n_items > 0, || "knapsack needs at least one item".to_string())?;
    require(profits.len() == n_items, || {
        format!(
            "knapsack has {n_items} weights but {} profits",
            profits.len()
        )
    })?;
    require(capacity.is_finite(), || {
        format!("knapsack capacity must be finite, got {capacity}")
    })?;

    let weights = Array1::from(weights);
    let profits = Array1::from(profits);
    ProblemBuilder::new("knp", n_items)
        .with_n_obj(1)
        .with_n_constr(1)
        .with_bounds(0.0, 1.0)
        .with_formula(rowwise_constrained(move |x, mut f, mut g| {
            g[0] = x.dot(&weights) - capacity;
            f[0] = -x.dot(&profits);
        }))
        .build()
}

/// A knapsack with weights and profits drawn from `1..100`; the capacity
/// is half the total weight.
pub fn random_knapsack<R: Rng>(n_items: usize, rng: &mut R) -> Result<Problem> {
    let mut draw = |n: usize| -> Vec<f64> {
        (0..n).map(|_| f64::from(rng.random_range(1u32..100))).collect()
    };
    let profits = draw(n_items);
    let weights = draw(n_items);
    let capacity = weights.iter().sum::<f64>() / 2.0;
    knapsack(weights, profits, capacity)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::problems::testing::eval;
    use approx::assert_relative_eq;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_welded_beam_objectives() {
        let p = welded_beam().unwrap();
        let (f, g) = eval(&p, &[1.0, 1.0, 1.0, 1.0]);
        assert_relative_eq!(f[0], 1.10471 + 0.04811 * 15.0, epsilon = 1e-12);
        assert_relative_eq!(f[1], 2.1952, epsilon = 1e-12);
        assert_eq!(g.len(), 4);
        assert_relative_eq!(g[2], 0.0);
        // stress 6*6000*14 = 504000 far exceeds the limit
        assert!(g[1] > 0.0);
    }

    #[test]
    fn test_welded_beam_has_no_front() {
        let p = welded_beam().unwrap();
        assert!(matches!(
            p.pareto_front(),
            Err(Error::ParetoFrontUnavailable { .. })
        ));
    }

    #[test]
    fn test_truss2d() {
        let p = truss2d().unwrap();
        let (f, g) = eval(&p, &[0.005, 0.005, 2.0]);
        assert_relative_eq!(f[0], 0.005 * (20f64.sqrt() + 5f64.sqrt()), epsilon = 1e-12);
        assert_relative_eq!(f[1], 80.0 * 5f64.sqrt() / 0.01, epsilon = 1e-9);
        assert!(g[0] < 0.0);
    }

    #[test]
    fn test_knapsack() {
        let p = knapsack(vec![1.0, 2.0, 3.0], vec![4.0, 5.0, 6.0], 3.0).unwrap();
        let (f, g) = eval(&p, &[1.0, 1.0, 0.0]);
        assert_eq!(f[0], -9.0);
        assert_eq!(g[0], 0.0);
        let (_, g) = eval(&p, &[1.0, 1.0, 1.0]);
        assert_eq!(g[0], 3.0);
    }

    #[test]
    fn test_knapsack_rejects_mismatched_items() {
        assert!(knapsack(vec![1.0], vec![1.0, 2.0], 1.0).is_err());
        assert!(knapsack(vec![], vec![], 1.0).is_err());
    }

    #[test]
    fn test_random_knapsack_is_seeded() {
        let a = random_knapsack(20, &mut StdRng::seed_from_u64(3)).unwrap();
        let b = random_knapsack(20, &mut StdRng::seed_from_u64(3)).unwrap();
        assert_eq!(a.n_var(), 20);
        let x = vec![1.0; 20];
        assert_eq!(eval(&a, &x), eval(&b, &x));
        // taking everything always exceeds half the total weight
        assert!(eval(&a, &x).1[0] > 0.0);
    }
}
