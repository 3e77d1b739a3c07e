//! Sales Aggregator.
//!
//! Groups posted sale lines by product and calendar day, then produces
//! a dense daily series over `[first_sale, last_sale] ∩ [start, end]`
//! with gaps filled with zero. Products with no sales in range are
//! omitted rather than emitted with an all-zero series.
//!
//! Grounded on `original_source/replenishment/utils.py`'s
//! `run_prophet_forecast_logic`: it truncates `document__doc_date` to a
//! date (`TruncDate`), sums quantity per `(product, date)`, then
//! reindexes onto the full date range with `fill_value=0` before the
//! `len(df) < 15 or df['y'].sum() == 0` skip check — reproduced here as
//! the `>= 15 observations` / `sum > 0` contract.

use crate::model::{DailySeries, SaleLine};
use crate::types::ProductId;
use chrono::NaiveDate;
use std::collections::BTreeMap;

/// Aggregate posted sale lines into dense per-product daily series
/// over `[start, end]`.
///
/// Only sale lines already known to be posted and of type "sale" may
/// be passed in — filtering by document status/type is the
/// responsibility of the [`crate::store::SalesReader`] collaborator,
/// not this function.
pub fn aggregate(lines: &[SaleLine], start: NaiveDate, end: NaiveDate) -> Vec<DailySeries> {
    let mut by_product: BTreeMap<ProductId, BTreeMap<NaiveDate, f64>> = BTreeMap::new();

    for line in lines {
        let date = line.timestamp.date_naive();
        if date < start || date > end {
            continue;
        }
        let qty: f64 = line.quantity.to_string().parse().unwrap_or(0.0);
        *by_product.entry(line.product_id).or_default().entry(date).or_insert(0.0) += qty;
    }

    by_product
        .into_iter()
        .filter_map(|(product_id, daily)| densify(product_id, daily))
        .collect()
}

/// Turn a sparse `date -> quantity` map into a dense, gap-filled
/// series spanning its own min/max date. Returns `None` if the
/// product had no sales at all (an empty map never reaches here, since
/// [`aggregate`] only inserts entries for dates actually seen).
fn densify(product_id: ProductId, daily: BTreeMap<NaiveDate, f64>) -> Option<DailySeries> {
    let first = *daily.keys().next()?;
    let last = *daily.keys().next_back()?;

    let mut dates = Vec::new();
    let mut quantities = Vec::new();
    let mut d = first;
    while d <= last {
        dates.push(d);
        quantities.push(*daily.get(&d).unwrap_or(&0.0));
        d += chrono::Duration::days(1);
    }

    Some(DailySeries { product_id, dates, quantities })
}
