//! Selector: picks exactly one Variant per Deal maximizing total
//! 30-day profit subject to a budget ceiling, via a multiple-choice
//! knapsack formulation.
//!
//! Grounded on `original_source/optimization/solver.py`'s CP-SAT
//! formulation (x1000 fixed-point scale, one boolean per (deal,
//! variant) pair, one-per-deal constraint, budget constraint). The
//! in-process backend is the [`crate::knapsack`] DP solver; an
//! alternate OR-Tools-backed implementation is available behind the
//! `ffi` feature (see [`ffi`]).

#[cfg(feature = "ffi")]
pub mod ffi;

use crate::error::Error;
use crate::knapsack::{Choice, MultipleChoiceKnapsackProblem, solve_multiple_choice};
use crate::types::SolverStatus;
use crate::variants::Variant;

/// The chosen Variant index for each Deal, and the run's totals.
#[derive(Debug, Clone)]
pub struct Selection {
    /// Index into each Deal's variant list of the chosen Variant, in
    /// deal order
    pub chosen_variant: Vec<usize>,
    /// Total budget of the selection, x1000 fixed-point
    pub total_budget: i64,
    /// Total efficiency (objective) of the selection, x1000 fixed-point
    pub total_efficiency: i64,
}

/// Select one variant per deal maximizing total efficiency subject to
/// `budget_limit` (x1000 fixed-point units, matching
/// [`Variant::budget`]).
///
/// # Errors
/// [`Error::Infeasible`] if the solver proves no selection fits within
/// `budget_limit`; [`Error::InputValidation`] if any deal has no
/// variants.
#[tracing::instrument(skip(variants_per_deal), fields(deals = variants_per_deal.len(), budget_limit))]
pub fn select(variants_per_deal: &[Vec<Variant>], budget_limit: i64) -> Result<Selection, Error> {
    let groups: Vec<Vec<Choice>> = variants_per_deal
        .iter()
        .enumerate()
        .map(|(g, variants)| {
            if variants.is_empty() {
                return Err(Error::invalid_input(format!("deal {g} has no variants")));
            }
            Ok(variants
                .iter()
                .map(|v| Choice { cost: v.budget, value: (v.efficiency * 1000.0).round() as i64 })
                .collect())
        })
        .collect::<Result<_, Error>>()?;

    let problem = MultipleChoiceKnapsackProblem { groups, capacity: budget_limit };
    let solution = solve_multiple_choice(&problem)?;

    match solution.status {
        SolverStatus::Optimal | SolverStatus::Feasible => {
            tracing::info!(
                status = ?solution.status,
                objective = solution.total_value,
                budget = solution.total_cost,
                "selector finished"
            );
            Ok(Selection {
                chosen_variant: solution.chosen,
                total_budget: solution.total_cost,
                total_efficiency: solution.total_value,
            })
        }
        SolverStatus::Infeasible => Err(Error::infeasible(format!(
            "no selection of one variant per deal fits within budget {budget_limit}"
        ))),
        SolverStatus::Timeout => Err(Error::SolverTimeout { seconds: solution.stats.solve_time_seconds }),
        other => Err(Error::infeasible(format!("solver returned unexpected status {other:?}"))),
    }
}
