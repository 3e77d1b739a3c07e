//! Types shared by the variant enumerator and allocator.

use crate::types::ProductId;
use serde::{Deserialize, Serialize};

/// One feasible deal-level order sum, together with the per-item
/// allocation that realizes it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Variant {
    /// Target deal-level order sum this variant realizes
    pub moq: u64,
    /// Per-item allocation, in the Deal's item order
    pub allocations: Vec<ItemAllocation>,
    /// Total purchase cost of this variant
    pub budget: i64,
    /// 30-day profit scalar used as the Selector's objective
    pub efficiency: f64,
}

/// The outcome of allocation for a single item within a variant.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ItemAllocation {
    /// Item this allocation is for
    pub product_id: ProductId,
    /// Order quantity for this item in this variant
    pub quantity: u32,
    /// Purchase price resolved for this item at this variant's `moq`
    pub purchase_price: rust_decimal::Decimal,
}
