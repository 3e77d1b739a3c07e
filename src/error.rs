//! Error types for replenishment-optimization

use thiserror::Error;

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while forecasting, enumerating variants, or
/// selecting an order. Each variant corresponds to a row of the error
/// handling design's kind/trigger table.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    /// An item with no price tiers, an item where no tier is ever
    /// profitable, or a duplicate SKU across brands. Fatal; aborts the
    /// run.
    #[error("invalid input: {0}")]
    InputValidation(String),

    /// Phase 2 was called with a budget outside `[min_budget, max_budget]`.
    #[error("budget {requested} out of range [{min}, {max}]")]
    BudgetOutOfRange {
        /// Lower bound computed in Phase 1 (fixed-point, scaled)
        min: i64,
        /// Upper bound computed in Phase 1 (fixed-point, scaled)
        max: i64,
        /// Budget actually requested (fixed-point, scaled)
        requested: i64,
    },

    /// The Selector found no feasible selection of one variant per deal
    /// within budget.
    #[error("no optimal solution within budget: {0}")]
    Infeasible(String),

    /// The Selector hit its wall-clock bound without a feasible
    /// incumbent. Surfaced identically to `Infeasible`.
    #[error("solver timeout after {seconds} seconds with no feasible solution")]
    SolverTimeout {
        /// Seconds elapsed before the bound was hit
        seconds: f64,
    },

    /// Phase 2 or commit was attempted on a report that is not in the
    /// expected lifecycle state.
    #[error("report {report_id} is in state {status}, not DRAFT")]
    StateConflict {
        /// Report identifier
        report_id: u64,
        /// Current status, rendered for display
        status: String,
    },

    /// Dimension mismatch in input (mismatched vector lengths).
    #[error("dimension mismatch: expected {expected}, got {got}")]
    DimensionMismatch {
        /// Expected dimension
        expected: usize,
        /// Actual dimension
        got: usize,
    },

    /// Numeric overflow during computation: decimal scaling or
    /// fixed-point conversion for the solver.
    #[error("numeric overflow: {0}")]
    Overflow(String),

    /// Feature requires the `ffi` build feature but it is not enabled.
    #[error("ffi feature required for {0}")]
    FfiRequired(String),

    /// Internal error (bug): a condition the algorithms assume can't
    /// happen did.
    #[error("internal error: {0}")]
    Internal(String),
}

impl Error {
    /// Create an invalid-input error
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InputValidation(msg.into())
    }

    /// Create an infeasible error
    pub fn infeasible(msg: impl Into<String>) -> Self {
        Self::Infeasible(msg.into())
    }

    /// Create a dimension mismatch error
    pub fn dimension_mismatch(expected: usize, got: usize) -> Self {
        Self::DimensionMismatch { expected, got }
    }

    /// Create a budget-out-of-range error
    pub fn budget_out_of_range(min: i64, max: i64, requested: i64) -> Self {
        Self::BudgetOutOfRange { min, max, requested }
    }

    /// Create a state-conflict error
    pub fn state_conflict(report_id: u64, status: impl Into<String>) -> Self {
        Self::StateConflict { report_id, status: status.into() }
    }
}
