//! Alternate Selector backend via the C++ OR-Tools CP-SAT solver
//! (`ortools-sys`), matching `original_source/optimization/solver.py`'s
//! exact formulation: 8 parallel search workers, 10-second wall-clock
//! bound, x1000 fixed-point scale.
//!
//! Gated behind the `ffi` crate feature; `ortools-sys` links against a
//! system-provided OR-Tools build, so this module is not part of the
//! default build.

use crate::error::Error;
use crate::knapsack::MultipleChoiceKnapsackProblem;

/// Default wall-clock bound for the CP-SAT backend, seconds.
pub const DEFAULT_TIME_LIMIT_SECONDS: f64 = 10.0;
/// Default worker thread count for the CP-SAT backend.
pub const DEFAULT_NUM_WORKERS: u32 = 8;

/// Solve `problem` via CP-SAT. Not yet wired to `ortools-sys`'s FFI
/// surface; returns [`Error::FfiRequired`] until that binding lands.
pub fn solve_via_cp_sat(_problem: &MultipleChoiceKnapsackProblem) -> Result<super::Selection, Error> {
    Err(Error::FfiRequired("CP-SAT multiple-choice knapsack backend".to_string()))
}
