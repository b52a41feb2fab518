//! Nelder-Mead maximum-likelihood estimation.
//!
//! Wraps the `argmin` crate to minimize the mean negative log-likelihood of
//! a family over an unconstrained parameter vector `theta`. Each family
//! supplies the mapping `theta -> FitParams` (returning `None` outside the
//! feasible region) and one or more starting points.
//!
//! **Not part of the public API.**

use argmin::core::{CostFunction, Executor, State, TerminationReason};
use argmin::solver::neldermead::NelderMead;
use tracing::{trace, warn};

use crate::config::FitConfig;
use crate::error::DistError;
use crate::family::ContinuousFamily;
use crate::params::FitParams;

/// Maps an unconstrained parameter vector onto family parameters.
pub(crate) type FromTheta = fn(&[f64]) -> Option<FitParams>;

/// Cost function for argmin: mean negative log-likelihood.
struct NegLogLik<'a, F: ?Sized> {
    family: &'a F,
    sample: &'a [f64],
    from_theta: FromTheta,
}

impl<F: ContinuousFamily + ?Sized> NegLogLik<'_, F> {
    fn evaluate(&self, theta: &[f64]) -> f64 {
        let Some(params) = (self.from_theta)(theta) else {
            return f64::MAX;
        };
        if !params.is_valid() {
            return f64::MAX;
        }
        let mut total = 0.0;
        for &x in self.sample {
            let lp = self.family.ln_pdf(&params, x);
            if !lp.is_finite() {
                return f64::MAX;
            }
            total -= lp;
        }
        let mean = total / self.sample.len() as f64;
        if mean.is_finite() { mean } else { f64::MAX }
    }
}

impl<F: ContinuousFamily + ?Sized> CostFunction for NegLogLik<'_, F> {
    type Param = Vec<f64>;
    type Output = f64;

    fn cost(&self, theta: &Self::Param) -> Result<Self::Output, argmin::core::Error> {
        Ok(self.evaluate(theta))
    }
}

/// Nelder-Mead iterations per restart.
const ROUND_ITERS: u64 = 500;

/// Outcome of one Nelder-Mead round.
struct Round {
    theta: Vec<f64>,
    cost: f64,
    iters: u64,
    converged: bool,
}

/// Maximizes the likelihood of `sample` under `family`.
///
/// Starts from the seed with the lowest cost and runs Nelder-Mead in
/// rounds of at most [`ROUND_ITERS`] iterations, each restarted around the
/// best point so far. The search stops when a round converges on the
/// simplex cost spread (`sd_tolerance`), when a round improves the best
/// cost by no more than `f_tolerance` relative to it, or when
/// `max_iters` is spent. In the last case the best parameters are kept and
/// a warning is logged. Infeasible points cost `f64::MAX`, which keeps the
/// simplex inside the feasible region.
///
/// # Errors
///
/// - [`DistError::NoFeasibleStart`] if every seed is infeasible.
/// - [`DistError::NonConvergence`] if the best point has no finite cost or
///   maps outside the feasible region.
/// - [`DistError::OptimizationFailed`] if argmin reports an error.
pub(crate) fn maximize_likelihood<F: ContinuousFamily + ?Sized>(
    family: &F,
    sample: &[f64],
    seeds: &[Vec<f64>],
    from_theta: FromTheta,
    config: &FitConfig,
) -> Result<FitParams, DistError> {
    let name = family.name();
    let cost = NegLogLik {
        family,
        sample,
        from_theta,
    };

    let (mut theta, mut best) = seeds
        .iter()
        .map(|s| (s, cost.evaluate(s)))
        .filter(|(_, c)| *c < f64::MAX)
        .min_by(|a, b| a.1.total_cmp(&b.1))
        .map(|(s, c)| (s.clone(), c))
        .ok_or(DistError::NoFeasibleStart { family: name })?;

    let mut used = 0;
    while used < config.max_iters() {
        let budget = ROUND_ITERS.min(config.max_iters() - used);
        let round = run_round(family, sample, from_theta, &theta, budget, config)?;
        used += round.iters.max(1);

        let improvement = best - round.cost;
        if round.cost < best {
            theta = round.theta;
            best = round.cost;
        }
        if round.converged {
            break;
        }
        if improvement <= config.f_tolerance() * best.abs().max(1.0) {
            trace!(family = name, iters = used, "likelihood plateau reached");
            break;
        }
        if used >= config.max_iters() {
            warn!(
                family = name,
                iters = used,
                cost = best,
                "iteration limit reached, keeping best parameters"
            );
        }
    }
    trace!(family = name, iters = used, cost = best, "likelihood maximized");

    let non_convergence = DistError::NonConvergence {
        family: name,
        iters: config.max_iters(),
    };
    if !best.is_finite() || best == f64::MAX {
        return Err(non_convergence);
    }
    match from_theta(&theta) {
        Some(params) if params.is_valid() => Ok(params),
        _ => Err(non_convergence),
    }
}

/// One Nelder-Mead run of at most `budget` iterations from a simplex around
/// `start`.
fn run_round<F: ContinuousFamily + ?Sized>(
    family: &F,
    sample: &[f64],
    from_theta: FromTheta,
    start: &[f64],
    budget: u64,
    config: &FitConfig,
) -> Result<Round, DistError> {
    let failed = |e: argmin::core::Error| DistError::OptimizationFailed {
        family: family.name(),
        reason: e.to_string(),
    };
    let cost = NegLogLik {
        family,
        sample,
        from_theta,
    };
    let solver = NelderMead::new(initial_simplex(start))
        .with_sd_tolerance(config.sd_tolerance())
        .map_err(failed)?;
    let result = Executor::new(cost, solver)
        .configure(|state| state.max_iters(budget))
        .run()
        .map_err(failed)?;

    let state = result.state();
    let converged = matches!(
        state.get_termination_reason(),
        Some(TerminationReason::SolverConverged)
    );
    let theta = state
        .best_param
        .clone()
        .ok_or_else(|| DistError::OptimizationFailed {
            family: family.name(),
            reason: "optimizer returned no parameters".to_string(),
        })?;
    Ok(Round {
        theta,
        cost: state.get_best_cost(),
        iters: state.get_iter(),
        converged,
    })
}

/// `start` plus one vertex per axis, displaced by 10% of the coordinate
/// (at least 0.1).
fn initial_simplex(start: &[f64]) -> Vec<Vec<f64>> {
    let mut simplex = Vec::with_capacity(start.len() + 1);
    simplex.push(start.to_vec());
    for i in 0..start.len() {
        let mut vertex = start.to_vec();
        vertex[i] += 0.1 * start[i].abs().max(1.0);
        simplex.push(vertex);
    }
    simplex
}
