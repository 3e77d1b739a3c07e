//! Price-Tier Resolver.
//!
//! Maps a target deal-level quantity to the (min_qty, unit_price) tier
//! that applies: the tier with the largest `minimal_quantity <= q`, or
//! the smallest tier if `q` is below every `minimal_quantity`.
//!
//! Grounded on `original_source/optimization/from_matlab/CurrentMOQ.py`
//! and `PurchasePrice.py`: both scan every tier and keep the largest
//! `minimal_quantity` not exceeding the target, defaulting to the first
//! tier when nothing qualifies.

use crate::model::PriceTier;

/// The tier chosen for a given target quantity, and its resolved price.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResolvedTier {
    /// The `minimal_quantity` of the tier that was used
    pub minimal_quantity: u32,
    /// The `unit_price` of the tier that was used
    pub unit_price: rust_decimal::Decimal,
}

/// Resolve the active tier for `target_quantity` against `tiers`.
///
/// `tiers` need not be pre-sorted; this scans all of them. Panics in
/// debug builds if `tiers` is empty — callers must have already
/// rejected Items with no tiers, so an empty slice here is a
/// programmer error, not a user-facing one.
pub fn resolve(tiers: &[PriceTier], target_quantity: u64) -> ResolvedTier {
    debug_assert!(!tiers.is_empty(), "Item must have at least one price tier");

    let mut best: Option<&PriceTier> = None;
    for tier in tiers {
        let qualifies = u64::from(tier.minimal_quantity) <= target_quantity;
        let better = match best {
            None => true,
            Some(b) => qualifies && tier.minimal_quantity > b.minimal_quantity,
        };
        if qualifies && better {
            best = Some(tier);
        }
    }

    // Fallback: target below every tier's minimal_quantity - use the
    // smallest tier.
    let chosen = best.unwrap_or_else(|| {
        tiers
            .iter()
            .min_by_key(|t| t.minimal_quantity)
            .expect("checked non-empty above")
    });

    ResolvedTier {
        minimal_quantity: chosen.minimal_quantity,
        unit_price: chosen.unit_price,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn tiers() -> Vec<PriceTier> {
        vec![
            PriceTier { minimal_quantity: 1, unit_price: dec!(10.0) },
            PriceTier { minimal_quantity: 50, unit_price: dec!(8.0) },
            PriceTier { minimal_quantity: 200, unit_price: dec!(6.5) },
        ]
    }

    #[test]
    fn exact_tier_boundary() {
        let r = resolve(&tiers(), 50);
        assert_eq!(r.minimal_quantity, 50);
        assert_eq!(r.unit_price, dec!(8.0));
    }

    #[test]
    fn between_tiers_uses_lower_boundary() {
        let r = resolve(&tiers(), 75);
        assert_eq!(r.minimal_quantity, 50);
    }

    #[test]
    fn below_smallest_tier_falls_back_to_smallest() {
        let r = resolve(&tiers(), 0);
        assert_eq!(r.minimal_quantity, 1);
        assert_eq!(r.unit_price, dec!(10.0));
    }

    #[test]
    fn above_largest_tier_uses_largest() {
        let r = resolve(&tiers(), 10_000);
        assert_eq!(r.minimal_quantity, 200);
        assert_eq!(r.unit_price, dec!(6.5));
    }

    #[test]
    fn single_tier_always_applies() {
        let single = vec![PriceTier { minimal_quantity: 1, unit_price: dec!(6.0) }];
        assert_eq!(resolve(&single, 0).unit_price, dec!(6.0));
        assert_eq!(resolve(&single, 1_000).unit_price, dec!(6.0));
    }

    #[test]
    fn idempotent_on_committed_deal_sum() {
        // Resolving twice at the same deal_sum must agree.
        let t = tiers();
        let a = resolve(&t, 60);
        let b = resolve(&t, 60);
        assert_eq!(a, b);
    }
}
