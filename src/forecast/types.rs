//! Types shared by the aggregator and the seasonal model.

use crate::types::ProductId;
use serde::{Deserialize, Serialize};

/// Configuration for the seasonal additive model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastConfig {
    /// Days beyond the last observed date to forecast and average over
    pub horizon_days: u32,
    /// Minimum daily observations required to attempt a fit
    pub min_observations: usize,
    /// Period, in days, of the monthly payday seasonality component
    pub monthly_period: f64,
    /// Fourier order of the monthly payday seasonality component
    pub monthly_fourier_order: usize,
    /// Ridge prior scale applied to the monthly seasonality coefficients
    pub monthly_prior_scale: f64,
    /// Fourier order used for automatic weekly seasonality
    pub weekly_fourier_order: usize,
}

impl Default for ForecastConfig {
    fn default() -> Self {
        Self {
            horizon_days: 30,
            min_observations: 15,
            monthly_period: 30.5,
            monthly_fourier_order: 10,
            monthly_prior_scale: 15.0,
            // Prophet's "auto" weekly seasonality resolves to fourier
            // order 3 once a series has enough history to support it.
            weekly_fourier_order: 3,
        }
    }
}

/// Why a product's ADS was not updated by a forecast run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum SkipReason {
    /// Fewer than `min_observations` daily points after gap-filling.
    TooFewObservations {
        /// Observation count found
        observed: usize,
        /// Minimum required
        required: usize,
    },
    /// All observed quantities were zero.
    AllZero,
    /// The regression fit failed (e.g. a singular design matrix).
    FitFailed {
        /// Human-readable failure detail
        reason: String,
    },
}

/// A per-product forecast skip, surfaced alongside the ADS table rather
/// than as a hard error: a recoverable per-item condition, not one that
/// should abort the whole run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastWarning {
    /// Product that was skipped
    pub product_id: ProductId,
    /// Why it was skipped
    pub reason: SkipReason,
}
