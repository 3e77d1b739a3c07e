//! Report Materializer.
//!
//! Given the Selector's chosen Variant per Deal, writes each Item's
//! final `best_quantity`/`purchase_price`/`pricelevel_minimum_quantity`
//! and computes the Report's totals.
//!
//! Grounded on
//! `original_source/replenishment/admin_views/process_report.py`'s
//! final pass over `ReplenishmentItem` rows after a Selector run.

use crate::error::Error;
use crate::model::Deal;
use crate::pricing;
use crate::selector::Selection;
use crate::types::ProductId;
use crate::variants::Variant;
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use serde::Serialize;

/// The materialized outcome for a single Item.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MaterializedItem {
    /// Item this outcome belongs to
    pub product_id: ProductId,
    /// Final order quantity
    pub best_quantity: u32,
    /// Purchase price at the Deal's committed sum
    pub purchase_price: Decimal,
    /// The tier's `minimal_quantity` that produced `purchase_price`
    pub pricelevel_minimum_quantity: u32,
}

/// The materialized outcome for a single Deal.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MaterializedDeal {
    /// Brand this Deal belongs to
    pub brand_id: crate::types::BrandId,
    /// Per-item outcomes, in the Deal's item order
    pub items: Vec<MaterializedItem>,
    /// Sample standard deviation of `(inventory + best_quantity) / ads`
    /// over items with `ads > 0`; `None` if fewer than 2 such items.
    pub days_for_sale_stdev: Option<f64>,
}

/// Totals and per-deal outcomes for a committed optimization run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MaterializedReport {
    /// Per-deal outcomes
    pub deals: Vec<MaterializedDeal>,
    /// Σ best_quantity · purchase_price over all items
    pub total_budget: Decimal,
    /// Σ (sale_price − purchase_price) · best_quantity over all items
    pub total_profit: Decimal,
}

/// Materialize `selection` (one chosen variant index per deal) against
/// `deals` and their enumerated `variants_per_deal`.
///
/// Panics if `selection`/`variants_per_deal`/`deals` have mismatched
/// lengths, or a chosen index is out of range — both are programmer
/// errors (the Selector only ever returns indices into the variant
/// lists it was given), not user-facing ones.
#[tracing::instrument(skip(deals, variants_per_deal, selection), fields(deals = deals.len()))]
pub fn materialize(deals: &[Deal], variants_per_deal: &[Vec<Variant>], selection: &Selection) -> MaterializedReport {
    let mut total_budget = Decimal::ZERO;
    let mut total_profit = Decimal::ZERO;
    let mut materialized_deals = Vec::with_capacity(deals.len());

    for ((deal, variants), &chosen_idx) in deals.iter().zip(variants_per_deal.iter()).zip(selection.chosen_variant.iter()) {
        let variant = &variants[chosen_idx];

        let mut items = Vec::with_capacity(deal.items.len());
        let mut days_for_sale: Vec<f64> = Vec::new();

        for (item, alloc) in deal.items.iter().zip(variant.allocations.iter()) {
            let resolved = pricing::resolve(item.tiers_sorted(), variant.moq);
            debug_assert_eq!(resolved.unit_price, alloc.purchase_price, "allocator/pricing disagree on purchase price");

            let line_cost = Decimal::from(alloc.quantity) * alloc.purchase_price;
            total_budget += line_cost;
            total_profit += (item.sale_price - alloc.purchase_price) * Decimal::from(alloc.quantity);

            if item.ads > Decimal::ZERO {
                let days = (item.inventory + Decimal::from(alloc.quantity)) / item.ads;
                if let Some(d) = days.to_f64() {
                    days_for_sale.push(d);
                }
            }

            items.push(MaterializedItem {
                product_id: item.product_id,
                best_quantity: alloc.quantity,
                purchase_price: alloc.purchase_price,
                pricelevel_minimum_quantity: resolved.minimal_quantity,
            });
        }

        materialized_deals.push(MaterializedDeal {
            brand_id: deal.brand_id,
            items,
            days_for_sale_stdev: sample_stdev(&days_for_sale),
        });
    }

    MaterializedReport { deals: materialized_deals, total_budget, total_profit }
}

/// Render a materialized report as a pretty-printed JSON summary, for
/// audit logging and triage rather than for round-tripping (the
/// authoritative between-phase format is [`super::blob`]'s bincode
/// schema).
pub fn to_json(report: &MaterializedReport) -> Result<String, Error> {
    serde_json::to_string_pretty(report).map_err(|e| Error::Internal(format!("report JSON summary failed: {e}")))
}

fn sample_stdev(values: &[f64]) -> Option<f64> {
    if values.len() < 2 {
        return None;
    }
    let mean = values.iter().sum::<f64>() / values.len() as f64;
    let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / (values.len() - 1) as f64;
    Some(variance.sqrt())
}
