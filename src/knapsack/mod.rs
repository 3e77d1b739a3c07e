//! Knapsack problem solvers
//!
//! The knapsack problem: select items to maximize value within capacity.
//!
//! ## Variants
//!
//! - 0-1 Knapsack: Take or leave each item
//! - Bounded: Limited copies of each item
//! - Unbounded: Unlimited copies
//! - Multidimensional: Multiple capacity constraints

use crate::{Error, Result, SolverParams, SolverStats, SolverStatus, Value, Weight};
use serde::{Deserialize, Serialize};

/// A knapsack problem instance
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KnapsackProblem {
    /// Weight of each item
    pub weights: Vec<Weight>,
    /// Value of each item
    pub values: Vec<Value>,
    /// Knapsack capacity
    pub capacity: Weight,
}

impl KnapsackProblem {
    /// Create a new knapsack problem
    pub fn new(weights: Vec<Weight>, values: Vec<Value>, capacity: Weight) -> Result<Self> {
        if weights.len() != values.len() {
            return Err(Error::dimension_mismatch(weights.len(), values.len()));
        }
        Ok(Self { weights, values, capacity })
    }

    /// Number of items
    pub fn num_items(&self) -> usize {
        self.weights.len()
    }

    /// Validate the problem
    pub fn validate(&self) -> Result<()> {
        if self.weights.len() != self.values.len() {
            return Err(Error::dimension_mismatch(
                self.weights.len(),
                self.values.len(),
            ));
        }
        if self.capacity < 0 {
            return Err(Error::invalid_input("negative capacity"));
        }
        for &w in &self.weights {
            if w < 0 {
                return Err(Error::invalid_input("negative weight"));
            }
        }
        Ok(())
    }
}

/// Solution to a knapsack problem
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KnapsackSolution {
    /// Selected items (indices)
    pub selected: Vec<usize>,
    /// Total value of selected items
    pub total_value: Value,
    /// Total weight of selected items
    pub total_weight: Weight,
    /// Solver status
    pub status: SolverStatus,
    /// Solver statistics
    pub stats: SolverStats,
}

/// Trait for knapsack solvers
pub trait KnapsackSolver {
    /// Solve the knapsack problem
    fn solve(&self, problem: &KnapsackProblem, params: &SolverParams) -> Result<KnapsackSolution>;

    /// Solver name
    fn name(&self) -> &'static str;
}

/// Dynamic programming solver for 0-1 knapsack
pub struct DynamicProgrammingSolver;

impl KnapsackSolver for DynamicProgrammingSolver {
    fn solve(&self, problem: &KnapsackProblem, _params: &SolverParams) -> Result<KnapsackSolution> {
        solve_dp(problem)
    }

    fn name(&self) -> &'static str {
        "dynamic_programming"
    }
}

/// Solve 0-1 knapsack using dynamic programming
pub fn solve(problem: &KnapsackProblem) -> Result<KnapsackSolution> {
    problem.validate()?;
    solve_dp(problem)
}

fn solve_dp(problem: &KnapsackProblem) -> Result<KnapsackSolution> {
    let start = std::time::Instant::now();
    let n = problem.num_items();
    let capacity = problem.capacity as usize;

    if n == 0 || capacity == 0 {
        return Ok(KnapsackSolution {
            selected: vec![],
            total_value: 0,
            total_weight: 0,
            status: SolverStatus::Optimal,
            stats: SolverStats::default(),
        });
    }

    // Check for overflow potential
    if capacity > 10_000_000 {
        return Err(Error::invalid_input(
            "capacity too large for DP (use branch-and-bound instead)"
        ));
    }

    // dp[w] = max value achievable with capacity w
    let mut dp = vec![0i64; capacity + 1];

    // Track which items were used
    let mut keep = vec![vec![false; capacity + 1]; n];

    for i in 0..n {
        let w = problem.weights[i] as usize;
        let v = problem.values[i];

        // Process in reverse to avoid using item multiple times
        for c in (w..=capacity).rev() {
            if dp[c - w] + v > dp[c] {
                dp[c] = dp[c - w] + v;
                keep[i][c] = true;
            }
        }
    }

    // Backtrack to find selected items
    let mut selected = Vec::new();
    let mut remaining = capacity;

    for i in (0..n).rev() {
        if keep[i][remaining] {
            selected.push(i);
            remaining -= problem.weights[i] as usize;
        }
    }

    selected.reverse();

    let total_value = dp[capacity];
    let total_weight: Weight = selected.iter()
        .map(|&i| problem.weights[i])
        .sum();

    let elapsed = start.elapsed().as_secs_f64();

    Ok(KnapsackSolution {
        selected,
        total_value,
        total_weight,
        status: SolverStatus::Optimal,
        stats: SolverStats {
            solve_time_seconds: elapsed,
            iterations: n * capacity,
            objective_value: Some(total_value as f64),
            ..Default::default()
        },
    })
}

/// One choice within a [`MultipleChoiceKnapsackProblem`] group: a
/// variant's cost and value.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Choice {
    /// Cost of selecting this choice (e.g. a Variant's scaled budget)
    pub cost: Weight,
    /// Value of selecting this choice (e.g. a Variant's scaled efficiency)
    pub value: Value,
}

/// Multiple-choice knapsack: groups of mutually exclusive choices,
/// exactly one choice must be selected per group, maximizing total
/// value subject to a shared capacity.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MultipleChoiceKnapsackProblem {
    /// Groups of mutually exclusive choices; every group must be
    /// non-empty
    pub groups: Vec<Vec<Choice>>,
    /// Shared capacity
    pub capacity: Weight,
}

impl MultipleChoiceKnapsackProblem {
    /// Validate the problem: every group non-empty, no negative cost,
    /// non-negative capacity.
    pub fn validate(&self) -> Result<()> {
        if self.capacity < 0 {
            return Err(Error::invalid_input("negative capacity"));
        }
        for (g, group) in self.groups.iter().enumerate() {
            if group.is_empty() {
                return Err(Error::invalid_input(format!("group {g} has no choices")));
            }
            for choice in group {
                if choice.cost < 0 {
                    return Err(Error::invalid_input("negative choice cost"));
                }
            }
        }
        Ok(())
    }
}

/// Solution to a multiple-choice knapsack problem.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MultipleChoiceKnapsackSolution {
    /// Index of the chosen choice within each group, in group order
    pub chosen: Vec<usize>,
    /// Total value of the selection
    pub total_value: Value,
    /// Total cost of the selection
    pub total_cost: Weight,
    /// Solver status
    pub status: SolverStatus,
    /// Solver statistics
    pub stats: SolverStats,
}

/// Solve a multiple-choice knapsack problem by dynamic programming:
/// `dp[g][c]` = best value achievable using the first `g` groups
/// within cost `c`, each group contributing exactly one choice.
///
/// Returns `status: Infeasible` (zero-value, empty selection) if no
/// group can be afforded within `capacity`.
pub fn solve_multiple_choice(problem: &MultipleChoiceKnapsackProblem) -> Result<MultipleChoiceKnapsackSolution> {
    problem.validate()?;
    let start = std::time::Instant::now();
    let num_groups = problem.groups.len();
    let capacity = problem.capacity as usize;

    if capacity > 10_000_000 {
        return Err(Error::invalid_input("capacity too large for DP (use branch-and-bound instead)"));
    }

    if num_groups == 0 {
        return Ok(MultipleChoiceKnapsackSolution {
            chosen: vec![],
            total_value: 0,
            total_cost: 0,
            status: SolverStatus::Optimal,
            stats: SolverStats::default(),
        });
    }

    const NEG_INFINITY: i64 = i64::MIN / 2;
    // dp[c] = best value reachable after processing groups so far,
    // using exactly that much cost. Unreachable states start at
    // -infinity so "no selection yet" never looks better than a real
    // partial selection.
    let mut dp = vec![NEG_INFINITY; capacity + 1];
    dp[0] = 0;
    // pick[g][c] = which choice index in group g was used to reach dp[c]
    // after group g was processed, or None if dp[c] is unreachable at
    // that step.
    let mut pick: Vec<Vec<Option<usize>>> = Vec::with_capacity(num_groups);

    for group in &problem.groups {
        let mut next_dp = vec![NEG_INFINITY; capacity + 1];
        let mut chosen_at = vec![None; capacity + 1];

        for c in 0..=capacity {
            if dp[c] <= NEG_INFINITY {
                continue;
            }
            for (idx, choice) in group.iter().enumerate() {
                let cost = choice.cost as usize;
                let new_c = c + cost;
                if new_c > capacity {
                    continue;
                }
                let candidate = dp[c] + choice.value;
                if candidate > next_dp[new_c] {
                    next_dp[new_c] = candidate;
                    chosen_at[new_c] = Some(idx);
                }
            }
        }

        pick.push(chosen_at);
        dp = next_dp;
    }

    let (best_cost, best_value) = dp
        .iter()
        .enumerate()
        .filter(|(_, &v)| v > NEG_INFINITY)
        .max_by_key(|(_, &v)| v)
        .map(|(c, &v)| (c, v))
        .unzip();

    let elapsed = start.elapsed().as_secs_f64();

    let (Some(mut cost), Some(value)) = (best_cost, best_value) else {
        return Ok(MultipleChoiceKnapsackSolution {
            chosen: vec![],
            total_value: 0,
            total_cost: 0,
            status: SolverStatus::Infeasible,
            stats: SolverStats { solve_time_seconds: elapsed, ..Default::default() },
        });
    };

    // Backtrack through `pick`, group by group, from the end.
    let mut chosen = vec![0usize; num_groups];
    for g in (0..num_groups).rev() {
        let idx = pick[g][cost].expect("reachable dp state must have a recorded choice");
        chosen[g] = idx;
        cost -= problem.groups[g][idx].cost as usize;
    }

    Ok(MultipleChoiceKnapsackSolution {
        chosen,
        total_value: value,
        total_cost: best_cost.unwrap_or(0) as Weight,
        status: SolverStatus::Optimal,
        stats: SolverStats {
            solve_time_seconds: elapsed,
            iterations: num_groups * (capacity + 1),
            objective_value: Some(value as f64),
            ..Default::default()
        },
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_simple_knapsack() {
        let problem = KnapsackProblem::new(
            vec![10, 20, 30],
            vec![60, 100, 120],
            50,
        ).unwrap();

        let solution = solve(&problem).unwrap();

        // Optimal: items 1 and 2 (weights 20+30=50, values 100+120=220)
        assert_eq!(solution.total_value, 220);
        assert_eq!(solution.total_weight, 50);
        assert!(solution.selected.contains(&1));
        assert!(solution.selected.contains(&2));
    }

    #[test]
    fn test_empty_knapsack() {
        let problem = KnapsackProblem::new(vec![], vec![], 100).unwrap();
        let solution = solve(&problem).unwrap();
        assert_eq!(solution.total_value, 0);
        assert!(solution.selected.is_empty());
    }

    #[test]
    fn test_zero_capacity() {
        let problem = KnapsackProblem::new(vec![10, 20], vec![100, 200], 0).unwrap();
        let solution = solve(&problem).unwrap();
        assert_eq!(solution.total_value, 0);
    }

    #[test]
    fn test_single_item_fits() {
        let problem = KnapsackProblem::new(vec![5], vec![10], 10).unwrap();
        let solution = solve(&problem).unwrap();
        assert_eq!(solution.total_value, 10);
        assert_eq!(solution.selected, vec![0]);
    }

    #[test]
    fn test_single_item_too_heavy() {
        let problem = KnapsackProblem::new(vec![15], vec![10], 10).unwrap();
        let solution = solve(&problem).unwrap();
        assert_eq!(solution.total_value, 0);
        assert!(solution.selected.is_empty());
    }

    #[test]
    fn mck_picks_one_choice_per_group() {
        let problem = MultipleChoiceKnapsackProblem {
            groups: vec![
                vec![Choice { cost: 10, value: 5 }, Choice { cost: 20, value: 12 }],
                vec![Choice { cost: 5, value: 3 }, Choice { cost: 15, value: 10 }],
            ],
            capacity: 30,
        };
        let solution = solve_multiple_choice(&problem).unwrap();
        assert_eq!(solution.status, SolverStatus::Optimal);
        assert_eq!(solution.chosen.len(), 2);
        assert!(solution.total_cost <= 30);
        // Best: group0 choice1 (20,12) + group1 choice0 (5,3) = cost25 value15
        assert_eq!(solution.total_value, 15);
    }

    #[test]
    fn mck_reports_infeasible_when_cheapest_combination_exceeds_capacity() {
        let problem = MultipleChoiceKnapsackProblem {
            groups: vec![vec![Choice { cost: 50, value: 1 }], vec![Choice { cost: 50, value: 1 }]],
            capacity: 10,
        };
        let solution = solve_multiple_choice(&problem).unwrap();
        assert_eq!(solution.status, SolverStatus::Infeasible);
    }

    #[test]
    fn mck_rejects_empty_group() {
        let problem = MultipleChoiceKnapsackProblem { groups: vec![vec![]], capacity: 10 };
        assert!(problem.validate().is_err());
    }

    #[test]
    fn mck_no_groups_is_trivially_optimal() {
        let problem = MultipleChoiceKnapsackProblem { groups: vec![], capacity: 10 };
        let solution = solve_multiple_choice(&problem).unwrap();
        assert_eq!(solution.status, SolverStatus::Optimal);
        assert_eq!(solution.total_value, 0);
    }
}
