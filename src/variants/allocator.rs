//! Per-variant quantity allocator ("GetDealToMOQ"): distributes a
//! deal-level target sum `M` across a Deal's items so as to minimize
//! the variance of days-for-sale, `(inventory + quantity) / ads`,
//! across eligible items.
//!
//! Grounded on
//! `original_source/optimization/from_matlab/GetDealToMOQ.py`: the
//! iterative "move the item that most reduces variance" loop is
//! reproduced exactly, but using an incremental mean/second-moment
//! update instead of the original's full-array recompute per step.

use crate::types::ProductId;
use ordered_float::OrderedFloat;
use smallvec::SmallVec;

/// One item as seen by the allocator: its current state and whether it
/// participates in the variance-minimization loop.
#[derive(Debug, Clone, Copy)]
pub struct AllocatorItem {
    /// Item identity, carried through to the result
    pub product_id: ProductId,
    /// Current inventory
    pub inventory: f64,
    /// `system_suggested_quantity`, this item's starting allocation
    pub system_suggested_quantity: f64,
    /// Forecast average daily sales
    pub ads: f64,
    /// Whether this item is "eligible" for this variant:
    /// `Profit(item, M) > 0 && ads > 0 && system_suggested_quantity
    /// < can_be_sold_total`
    pub eligible: bool,
}

/// Allocate `moq` across `items`. Returns one quantity per item, in
/// the same order as `items`, already clamped to `>= 0`.
///
/// If no item is eligible, or the eligible items' ads all sum to zero,
/// every item is treated as eligible with no fixed allocation from
/// ineligible items.
pub fn allocate(items: &[AllocatorItem], moq: u64) -> Vec<u32> {
    let any_eligible = items.iter().any(|i| i.eligible);
    let eligible_ads_sum: f64 = items.iter().filter(|i| i.eligible).map(|i| i.ads).sum();

    let treat_all_eligible = !any_eligible || eligible_ads_sum == 0.0;

    let eligible_idx: SmallVec<[usize; 16]> = if treat_all_eligible {
        (0..items.len()).collect()
    } else {
        items.iter().enumerate().filter(|(_, i)| i.eligible).map(|(idx, _)| idx).collect()
    };

    let fixed: f64 = if treat_all_eligible {
        0.0
    } else {
        items.iter().filter(|i| !i.eligible).map(|i| i.system_suggested_quantity).sum()
    };

    let invs_sum: f64 = eligible_idx.iter().map(|&i| items[i].inventory).sum();
    let target = moq as f64 + invs_sum - fixed;

    // x_i starts at min_q_i + invs_i for every eligible item.
    let mut x: SmallVec<[f64; 16]> = eligible_idx.iter().map(|&i| items[i].system_suggested_quantity + items[i].inventory).collect();
    let ads: SmallVec<[f64; 16]> = eligible_idx.iter().map(|&i| items[i].ads).collect();

    let sum_x: f64 = x.iter().sum();
    let diff = (target - sum_x).round() as i64;
    let step: f64 = if diff >= 0 { 1.0 } else { -1.0 };
    let steps = diff.unsigned_abs();

    let n = x.len();
    if n > 0 {
        let mut z: SmallVec<[f64; 16]> = x.iter().zip(ads.iter()).map(|(&xi, &a)| if a > 0.0 { xi / a } else { 0.0 }).collect();
        let mut sum_z: f64 = z.iter().sum();
        let mut sum_z2: f64 = z.iter().map(|v| v * v).sum();

        for _ in 0..steps {
            let best_idx = (0..n)
                .filter(|&k| ads[k] > 0.0)
                .min_by_key(|&k| {
                    let delta_z = step / ads[k];
                    let new_zk = z[k] + delta_z;
                    let new_sum_z = sum_z - z[k] + new_zk;
                    let new_sum_z2 = sum_z2 - z[k] * z[k] + new_zk * new_zk;
                    let mean = new_sum_z / n as f64;
                    let variance = new_sum_z2 / n as f64 - mean * mean;
                    OrderedFloat(variance)
                })
                .unwrap_or(0);
            // Apply the chosen update.
            x[best_idx] += step;
            let new_zk = z[best_idx] + step / ads[best_idx];
            sum_z = sum_z - z[best_idx] + new_zk;
            sum_z2 = sum_z2 - z[best_idx] * z[best_idx] + new_zk * new_zk;
            z[best_idx] = new_zk;
        }
    }

    // Items left out of the variance-minimization pool keep their own
    // suggested quantity unchanged.
    let mut result: Vec<u32> = items.iter().map(|i| i.system_suggested_quantity.round() as u32).collect();
    for (pos, &idx) in eligible_idx.iter().enumerate() {
        // Clamp to 0 rather than reject the variant if the loop drove
        // x below inventory.
        let quantity = (x[pos] - items[idx].inventory).max(0.0);
        result[idx] = quantity.round() as u32;
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(id: u64, inventory: f64, suggested: f64, ads: f64, eligible: bool) -> AllocatorItem {
        AllocatorItem { product_id: ProductId(id), inventory, system_suggested_quantity: suggested, ads, eligible }
    }

    #[test]
    fn allocation_sums_to_moq_minus_fixed_plus_inventory() {
        // sum(quantity) should reconstruct M once inventories are
        // added back (quantity = x - inventory).
        let items = vec![item(1, 0.0, 10.0, 1.0, true), item(2, 0.0, 10.0, 1.0, true)];
        let qty = allocate(&items, 20);
        let total: u32 = qty.iter().sum();
        assert_eq!(total, 20);
    }

    #[test]
    fn unequal_inventory_is_equalized_via_days_for_sale() {
        // ads=1 both, inventories 0 and 10, M=20 -> orders (15,5).
        let items = vec![item(1, 0.0, 0.0, 1.0, true), item(2, 10.0, 0.0, 1.0, true)];
        let qty = allocate(&items, 20);
        assert_eq!(qty, vec![15, 5]);
    }

    #[test]
    fn ineligible_items_keep_their_fixed_quantity_out_of_the_pool() {
        let items = vec![item(1, 0.0, 5.0, 1.0, true), item(2, 0.0, 3.0, 1.0, false)];
        let qty = allocate(&items, 13);
        // Ineligible item keeps its own suggested quantity (3); the
        // eligible item absorbs the remainder, moq - fixed(3) = 10.
        assert_eq!(qty[1], 3);
        assert_eq!(qty[0], 10);
    }

    #[test]
    fn falls_back_to_all_eligible_when_none_qualify() {
        let items = vec![item(1, 0.0, 5.0, 1.0, false), item(2, 0.0, 5.0, 1.0, false)];
        let qty = allocate(&items, 10);
        let total: u32 = qty.iter().sum();
        assert_eq!(total, 10);
    }

    #[test]
    fn never_produces_negative_quantities() {
        let items = vec![item(1, 100.0, 0.0, 1.0, true)];
        let qty = allocate(&items, 1);
        assert!(qty[0] == 0);
    }
}
