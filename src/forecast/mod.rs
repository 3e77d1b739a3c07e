//! Demand Forecaster: aggregates posted sales into daily series, fits
//! the seasonal model per product, and produces an ADS table plus any
//! per-product skip warnings.
//!
//! Grounded on `original_source/replenishment/utils.py`'s
//! `run_prophet_forecast_logic`, which loops over distinct products and
//! fits one model per product; here that loop is expressed as a
//! `rayon` parallel iterator, following the same par-iter-over-
//! independent-units fan-out style as `monistowl-gat`'s `gat-batch`
//! crate.

pub mod aggregator;
pub mod model;
pub mod types;

use crate::model::{AdsSnapshot, SaleLine};
use crate::types::ProductId;
use chrono::{NaiveDate, Utc};
use rayon::prelude::*;
use rust_decimal::Decimal;
use rust_decimal::prelude::FromPrimitive;
use types::{ForecastConfig, ForecastWarning, SkipReason};

/// The result of one forecast run: updated ADS snapshots plus
/// per-product warnings for skipped or failed fits.
#[derive(Debug, Clone)]
pub struct ForecastRun {
    /// New ADS values, one per product with a sufficient, non-zero series
    pub snapshots: Vec<AdsSnapshot>,
    /// Products that were skipped, and why
    pub warnings: Vec<ForecastWarning>,
}

/// Run the full forecast: aggregate `lines` over `[start, end]`, then
/// fit and predict per product in parallel.
///
/// A product with fewer than `cfg.min_observations`
/// daily points, or whose observations are all zero, is skipped with a
/// warning and its ADS is left untouched by the caller (no snapshot is
/// emitted for it here). A product whose fit fails for any other
/// reason is also skipped with a warning.
#[tracing::instrument(skip(lines, cfg), fields(lines = lines.len()))]
pub fn run(lines: &[SaleLine], start: NaiveDate, end: NaiveDate, cfg: &ForecastConfig) -> ForecastRun {
    let series = aggregator::aggregate(lines, start, end);
    let now = Utc::now();

    let results: Vec<Result<AdsSnapshot, ForecastWarning>> = series
        .par_iter()
        .map(|s| fit_one(s, cfg, now))
        .collect();

    let mut snapshots = Vec::new();
    let mut warnings = Vec::new();
    for r in results {
        match r {
            Ok(snap) => snapshots.push(snap),
            Err(w) => warnings.push(w),
        }
    }
    ForecastRun { snapshots, warnings }
}

fn fit_one(
    series: &crate::model::DailySeries,
    cfg: &ForecastConfig,
    now: chrono::DateTime<Utc>,
) -> Result<AdsSnapshot, ForecastWarning> {
    let product_id: ProductId = series.product_id;

    if series.len() < cfg.min_observations {
        return Err(ForecastWarning {
            product_id,
            reason: SkipReason::TooFewObservations { observed: series.len(), required: cfg.min_observations },
        });
    }
    if series.total() == 0.0 {
        return Err(ForecastWarning { product_id, reason: SkipReason::AllZero });
    }

    match model::forecast_ads(series, cfg) {
        Ok(ads) => {
            let rounded = (ads * 100.0).round() / 100.0;
            let ads_decimal = Decimal::from_f64(rounded).unwrap_or_default();
            Ok(AdsSnapshot { product_id, ads: ads_decimal, last_updated: now })
        }
        Err(reason) => {
            tracing::warn!(product_id = product_id.0, %reason, "forecast fit failed, ADS left unchanged");
            Err(ForecastWarning { product_id, reason: SkipReason::FitFailed { reason } })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc as ChronoUtc};

    fn line(product: u64, date: &str, qty: f64) -> SaleLine {
        let ts = ChronoUtc.from_utc_datetime(
            &NaiveDate::parse_from_str(date, "%Y-%m-%d").unwrap().and_hms_opt(12, 0, 0).unwrap(),
        );
        SaleLine { product_id: ProductId(product), timestamp: ts, quantity: Decimal::from_f64(qty).unwrap() }
    }

    #[test]
    fn skips_product_below_min_observations() {
        let lines = vec![line(1, "2024-01-01", 1.0), line(1, "2024-01-02", 1.0)];
        let run = run(
            &lines,
            NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            NaiveDate::from_ymd_opt(2024, 1, 31).unwrap(),
            &ForecastConfig::default(),
        );
        assert!(run.snapshots.is_empty());
        assert_eq!(run.warnings.len(), 1);
        assert!(matches!(run.warnings[0].reason, SkipReason::TooFewObservations { .. }));
    }

    #[test]
    fn fits_product_with_enough_history() {
        let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let lines: Vec<_> = (0..60)
            .map(|d| line(1, &(start + chrono::Duration::days(d)).format("%Y-%m-%d").to_string(), 5.0))
            .collect();
        let run = run(&lines, start, start + chrono::Duration::days(90), &ForecastConfig::default());
        assert_eq!(run.snapshots.len(), 1);
        assert!(run.warnings.is_empty());
        assert!(run.snapshots[0].ads >= Decimal::ZERO);
    }
}
