//! Variant Enumerator: produces, for each Deal, the set of
//! feasible deal-level order-sum Variants and their per-item
//! allocations.

pub mod allocator;
pub mod enumerator;
pub mod types;

pub use enumerator::{can_be_sold_total_deal, enumerate, min_moq_by_deal};
pub use types::{ItemAllocation, Variant};
