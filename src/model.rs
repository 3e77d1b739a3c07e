//! Entity vocabulary shared by every component: Product, Price Tier,
//! Stock, Sale Record, ADS Snapshot, Item, Deal.
//!
//! Item/Deal are the denormalized, optimization-time shapes built by
//! [`crate::deals`] from the catalogue/stock/ADS inputs; they are not
//! persisted here (persistence is an out-of-scope collaborator, see
//! [`crate::store`]).

use crate::types::{BrandId, ProductId, WarehouseId};
use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A catalogue product.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    /// Catalogue identifier
    pub id: ProductId,
    /// Unique SKU
    pub sku: String,
    /// Human-readable name
    pub name: String,
    /// Brand this product belongs to
    pub brand_id: BrandId,
    /// Base sale price (non-negative)
    pub sale_price: Decimal,
}

/// One (minimal_quantity, unit_price) pair in a Product's purchase
/// pricing schedule. `minimal_quantity` is unique within a Product;
/// by convention larger `minimal_quantity` implies a lower
/// `unit_price`, though this is not enforced here.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PriceTier {
    /// Minimum deal-level order quantity at which this price applies
    pub minimal_quantity: u32,
    /// Unit purchase price at or above `minimal_quantity`
    pub unit_price: Decimal,
}

impl PriceTier {
    /// Whether this tier is ever profitable against `sale_price`.
    pub fn is_profitable(&self, sale_price: Decimal) -> bool {
        self.unit_price < sale_price
    }
}

/// A single posted sale line, truncated to calendar date by the
/// Sales Aggregator. Only sales from documents whose
/// status is "posted" and type is "sale" ever reach this type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SaleLine {
    /// Product sold
    pub product_id: ProductId,
    /// Timestamp of the sale document
    pub timestamp: DateTime<Utc>,
    /// Quantity sold
    pub quantity: Decimal,
}

/// A dense daily series for one product: one point per calendar day
/// over `[first_sale, last_sale] ∩ [start, end]`, gaps filled with 0.
#[derive(Debug, Clone, PartialEq)]
pub struct DailySeries {
    /// Product this series belongs to
    pub product_id: ProductId,
    /// Calendar dates, ascending, contiguous (no gaps)
    pub dates: Vec<NaiveDate>,
    /// Quantity sold on each date, aligned with `dates`
    pub quantities: Vec<f64>,
}

impl DailySeries {
    /// Number of daily observations.
    pub fn len(&self) -> usize {
        self.dates.len()
    }

    /// Whether the series has no observations.
    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }

    /// Sum of all observed quantities.
    pub fn total(&self) -> f64 {
        self.quantities.iter().sum()
    }
}

/// Average Daily Sales, as produced by the Forecaster and persisted by
/// the external catalogue collaborator via [`crate::store::AdsWriter`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AdsSnapshot {
    /// Product this ADS value applies to
    pub product_id: ProductId,
    /// Average daily sales, rounded to 2 decimal places, non-negative
    pub ads: Decimal,
    /// When this snapshot was written
    pub last_updated: DateTime<Utc>,
}

/// An Item: a denormalized record bound to a specific Deal and
/// warehouse at optimization time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
    /// Product this Item represents
    pub product_id: ProductId,
    /// SKU, snapshotted for report auditability
    pub sku: String,
    /// Product name, snapshotted for report auditability
    pub name: String,
    /// Current warehouse inventory
    pub inventory: Decimal,
    /// Forecast average daily sales
    pub ads: Decimal,
    /// Current sale price
    pub sale_price: Decimal,
    /// Purchase price tiers, sorted ascending by `minimal_quantity`
    pub tiers: Vec<PriceTier>,
    /// `max(0, ceil(ads * coverage_days - inventory))`
    pub system_suggested_quantity: u32,
    /// Supplier credit window, in days (informational)
    pub credit_terms: u32,
    /// Target days of forward demand to cover
    pub system_coverage_days: u32,
    /// `max(0, floor(ads * max_investment_period - inventory))`
    pub can_be_sold_total: u32,
    /// Mutable outcome: the order quantity chosen for this Item by the
    /// most recent allocation/selection pass. Starts equal to
    /// `system_suggested_quantity`.
    pub best_quantity: u32,
}

impl Item {
    /// Sorted tiers, ascending by `minimal_quantity`. Tiers are stored
    /// pre-sorted by [`crate::deals`], so this is just a debug check
    /// in practice; kept as a method so call sites don't have to
    /// re-derive the invariant.
    pub fn tiers_sorted(&self) -> &[PriceTier] {
        debug_assert!(self.tiers.windows(2).all(|w| w[0].minimal_quantity < w[1].minimal_quantity));
        &self.tiers
    }

    /// Whether at least one tier is profitable against `sale_price`.
    /// Every Item is expected to have at least one profitable tier.
    pub fn has_profitable_tier(&self) -> bool {
        self.tiers.iter().any(|t| t.is_profitable(self.sale_price))
    }
}

/// A Deal: the collection of Items sharing a brand, plus the brand
/// identity, at optimization time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Deal {
    /// Brand (Deal ID) these items share
    pub brand_id: BrandId,
    /// Brand name, snapshotted for report auditability
    pub brand_name: String,
    /// Warehouse this Deal's Items are drawn from
    pub warehouse_id: WarehouseId,
    /// Items sharing this brand
    pub items: Vec<Item>,
}

impl Deal {
    /// `deal_sum`: the sum of `best_quantity` over all Items.
    pub fn deal_sum(&self) -> u64 {
        self.items.iter().map(|i| u64::from(i.best_quantity)).sum()
    }

    /// Sum of `system_suggested_quantity` over all Items.
    pub fn suggested_sum(&self) -> u64 {
        self.items.iter().map(|i| u64::from(i.system_suggested_quantity)).sum()
    }
}
