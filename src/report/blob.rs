//! Versioned binary schema for persisting a Report's enumerated
//! Variants between Phase 1 and Phase 2, in place of relying on
//! language-specific serialization.
//!
//! Grounded on
//! `original_source/replenishment/admin_views/process_report.py`'s use
//! of `pickle.dumps`/`pickle.loads` to round-trip the per-deal variant
//! lists between the two optimization passes; here that opaque pickle
//! blob becomes a versioned `bincode` payload.

use crate::error::Error;
use crate::variants::Variant;
use serde::{Deserialize, Serialize};

/// The serialized form of a Report's Phase 1 output: one Variant list
/// per Deal, in the same order as the Report's Deals.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Blob {
    /// Version 1: a plain per-deal list of Variants.
    V1(BlobV1),
}

/// Version 1 payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BlobV1 {
    /// Brand id of each Deal, in order, for a cheap sanity check on load
    pub brand_ids: Vec<u64>,
    /// Variant lists, aligned with `brand_ids`
    pub variants_per_deal: Vec<Vec<Variant>>,
}

/// Serialize `variants_per_deal` (alongside `brand_ids` for later
/// sanity-checking) into the current blob version.
pub fn encode(brand_ids: &[u64], variants_per_deal: &[Vec<Variant>]) -> Result<Vec<u8>, Error> {
    let blob = Blob::V1(BlobV1 { brand_ids: brand_ids.to_vec(), variants_per_deal: variants_per_deal.to_vec() });
    bincode::serialize(&blob).map_err(|e| {
        tracing::error!(error = %e, "variant blob encode failed");
        Error::Internal(format!("variant blob encode failed: {e}"))
    })
}

/// Decode a blob previously produced by [`encode`]. Checks that
/// `expected_brand_ids` matches the blob's own record of brand order,
/// surfacing a mismatch as [`Error::Internal`] (a Deal set change
/// between Phase 1 and Phase 2 is a programmer/data error, not a
/// recoverable user input).
pub fn decode(bytes: &[u8], expected_brand_ids: &[u64]) -> Result<Vec<Vec<Variant>>, Error> {
    let blob: Blob = bincode::deserialize(bytes).map_err(|e| {
        tracing::error!(error = %e, "variant blob decode failed");
        Error::Internal(format!("variant blob decode failed: {e}"))
    })?;
    match blob {
        Blob::V1(v1) => {
            if v1.brand_ids != expected_brand_ids {
                tracing::error!("variant blob brand order does not match report's deals");
                return Err(Error::Internal("variant blob brand order does not match report's deals".to_string()));
            }
            Ok(v1.variants_per_deal)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn variant(moq: u64) -> Variant {
        Variant { moq, allocations: vec![], budget: 1000, efficiency: 5.0 }
    }

    #[test]
    fn round_trips_variants() {
        let brand_ids = vec![1, 2];
        let variants = vec![vec![variant(10)], vec![variant(20), variant(30)]];
        let bytes = encode(&brand_ids, &variants).unwrap();
        let decoded = decode(&bytes, &brand_ids).unwrap();
        assert_eq!(decoded.len(), 2);
        assert_eq!(decoded[1].len(), 2);
        assert_eq!(decoded[1][1].moq, 30);
    }

    #[test]
    fn rejects_mismatched_brand_order_on_decode() {
        let bytes = encode(&[1, 2], &[vec![variant(10)], vec![variant(20)]]).unwrap();
        let result = decode(&bytes, &[2, 1]);
        assert!(result.is_err());
    }
}
