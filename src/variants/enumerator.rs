//! Variant Enumerator — the central piece of the optimizer.
//!
//! For a Deal, computes the feasible range of deal-level order sums
//! (MOQ candidates), and for each candidate produces a [`Variant`] via
//! the [`super::allocator`].
//!
//! Grounded on
//! `original_source/optimization/from_matlab/MinMOQByDeal.py`,
//! `GetAllDealVariants.py`, `ItemBudget.py`, `ThirtyDaysProfit.py` and
//! `ValidMOQs.py`.

use super::allocator::{self, AllocatorItem};
use super::types::{ItemAllocation, Variant};
use crate::model::Deal;
use crate::pricing;
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use std::collections::BTreeSet;

fn f64_of(d: Decimal) -> f64 {
    d.to_f64().unwrap_or(0.0)
}

/// `MinMOQByDeal`: floored at the deal's suggested sum, then raised
/// for any item whose *smallest* tier is not profitable (that item
/// can't be ordered at all below the min_qty of its first profitable
/// tier, so the deal-level sum must reach at least that far).
///
/// Mirrors `MinMOQByDeal.py` directly: it starts from
/// `DealSumByDealSQ(deal)` and only bumps the bound for items with
/// `system_suggested_quantity > 0` whose smallest tier price is not
/// below the sale price, taking the *smallest* (not largest)
/// min_qty at which that item does clear a profit — under the
/// monotone-decreasing-price-by-quantity convention, that's also the
/// largest min_qty the deal could ever need to satisfy for this item.
pub fn min_moq_by_deal(deal: &Deal) -> u64 {
    let mut min_moq = deal.suggested_sum();
    for item in &deal.items {
        if item.system_suggested_quantity == 0 {
            continue;
        }
        let tiers = item.tiers_sorted();
        let Some(smallest) = tiers.first() else { continue };
        if !smallest.is_profitable(item.sale_price) {
            if let Some(tier) = tiers.iter().find(|t| t.is_profitable(item.sale_price)) {
                min_moq = min_moq.max(u64::from(tier.minimal_quantity));
            }
        }
    }
    min_moq
}

/// `CanBeSoldTotalDeal`: sum over items of
/// `max(can_be_sold_total_i, system_suggested_quantity_i)`.
pub fn can_be_sold_total_deal(deal: &Deal) -> u64 {
    deal.items
        .iter()
        .map(|i| u64::from(i.can_be_sold_total.max(i.system_suggested_quantity)))
        .sum()
}

/// Candidate M values: every tier `minimal_quantity` across items,
/// plus the deal's suggested sum, filtered to
/// `[min_moq, can_be_sold_total]`. Falls back to `{min_moq}` if empty.
fn candidate_moqs(deal: &Deal, min_moq: u64, max_moq: u64) -> Vec<u64> {
    let mut set: BTreeSet<u64> = BTreeSet::new();
    for item in &deal.items {
        for tier in item.tiers_sorted() {
            set.insert(u64::from(tier.minimal_quantity));
        }
    }
    set.insert(deal.suggested_sum());

    let filtered: Vec<u64> = set.into_iter().filter(|&m| m >= min_moq && m <= max_moq).collect();
    if filtered.is_empty() {
        vec![min_moq]
    } else {
        filtered
    }
}

/// Whether `item` is eligible for the variance-minimization loop at
/// target sum `moq`.
fn is_eligible(item: &crate::model::Item, moq: u64) -> bool {
    let purchase_price = pricing::resolve(item.tiers_sorted(), moq).unit_price;
    let profit = item.sale_price - purchase_price;
    profit > Decimal::ZERO && item.ads > Decimal::ZERO && item.system_suggested_quantity < item.can_be_sold_total
}

/// Build one [`Variant`] for `deal` at target sum `moq`.
fn build_variant(deal: &Deal, moq: u64) -> Variant {
    let allocator_items: Vec<AllocatorItem> = deal
        .items
        .iter()
        .map(|item| AllocatorItem {
            product_id: item.product_id,
            inventory: f64_of(item.inventory),
            system_suggested_quantity: f64::from(item.system_suggested_quantity),
            ads: f64_of(item.ads),
            eligible: is_eligible(item, moq),
        })
        .collect();

    let quantities = allocator::allocate(&allocator_items, moq);

    let mut allocations = Vec::with_capacity(deal.items.len());
    let mut budget = Decimal::ZERO;
    let mut efficiency = 0.0f64;

    for (item, &quantity) in deal.items.iter().zip(quantities.iter()) {
        let resolved = pricing::resolve(item.tiers_sorted(), moq);
        let purchase_price = resolved.unit_price;

        budget += Decimal::from(quantity) * purchase_price;

        let profit = item.sale_price - purchase_price;
        let ads_f = f64_of(item.ads);
        let thirty_day_cap = (30.0 * ads_f - f64_of(item.inventory)).max(0.0);
        let quantity_factor = f64::from(quantity).min(thirty_day_cap);

        let profit_f = f64_of(profit);
        let thirty_days_profit = if profit_f < 0.0 && quantity_factor > 0.0 {
            // Loss-making variant: penalize via the inverse rather than
            // the raw (unbounded, sign-misleading) product.
            100.0 / (profit_f * quantity_factor)
        } else {
            profit_f * quantity_factor
        };
        efficiency += thirty_days_profit;

        allocations.push(ItemAllocation { product_id: item.product_id, quantity, purchase_price });
    }

    // Fixed-point budget at x1000 scale for the Selector.
    let budget_scaled = (budget * Decimal::from(1000)).round().to_i64().unwrap_or(i64::MAX);

    Variant { moq, allocations, budget: budget_scaled, efficiency }
}

/// Enumerate all Variants for `deal`, ascending by `moq`.
#[tracing::instrument(skip(deal), fields(deal_id = deal.brand_id.0))]
pub fn enumerate(deal: &Deal) -> Vec<Variant> {
    let min_moq = min_moq_by_deal(deal);
    let max_moq = can_be_sold_total_deal(deal).max(min_moq);
    let moqs = candidate_moqs(deal, min_moq, max_moq);
    let variants: Vec<Variant> = moqs.into_iter().map(|m| build_variant(deal, m)).collect();
    tracing::info!(deal_id = deal.brand_id.0, variants = variants.len(), "enumerated variants");
    variants
}
