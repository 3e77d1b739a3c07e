//! External interface traits — the out-of-scope
//! collaborators this crate reads from and writes to: catalogue,
//! stock, posted sales, ADS upsert, and purchase-document creation.
//!
//! Narrow trait boundaries at the edge of the optimization core, one
//! per external collaborator; `memory` supplies an in-memory fixture
//! implementation of all four for tests.

use crate::model::{AdsSnapshot, PriceTier, Product, SaleLine};
use crate::types::{ProductId, PurchaseDocumentId, WarehouseId};
use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;

/// Read access to the product catalogue.
pub trait CatalogueReader {
    /// All products in the catalogue.
    fn list_products(&self) -> Vec<Product>;
    /// Purchase tiers for one product, any order.
    fn list_tiers(&self, product_id: ProductId) -> Vec<PriceTier>;
}

/// Read access to per-warehouse stock levels.
pub trait StockReader {
    /// Current stock of `product_id` at `warehouse_id`, 0 if absent.
    fn stock(&self, warehouse_id: WarehouseId, product_id: ProductId) -> Decimal;
}

/// Read access to posted sales.
pub trait SalesReader {
    /// Posted "sale"-type document lines with a date in `[start, end]`.
    fn posted_sales(&self, start: NaiveDate, end: NaiveDate) -> Vec<SaleLine>;
}

/// Write access for ADS upserts.
pub trait AdsWriter {
    /// Upsert the ADS snapshot for one product.
    fn upsert_ads(&mut self, snapshot: AdsSnapshot);
}

/// One line of a committed Purchase Document.
#[derive(Debug, Clone, PartialEq)]
pub struct PurchaseDocumentLine {
    /// Product being purchased
    pub product_id: ProductId,
    /// Quantity ordered
    pub quantity: u32,
    /// Line price: `quantity * purchase_price`
    pub line_price: Decimal,
}

/// Write access for committing a Purchase Document.
pub trait PurchaseDocumentWriter {
    /// Create a Purchase Document with the given lines, returning its
    /// identifier. Only called with `quantity > 0` lines.
    fn create_purchase_document(
        &mut self,
        warehouse_id: WarehouseId,
        lines: Vec<PurchaseDocumentLine>,
        created_at: DateTime<Utc>,
    ) -> PurchaseDocumentId;
}

/// An in-memory fixture implementing all four interfaces, for tests
/// and examples.
pub mod memory {
    use super::*;
    use std::collections::HashMap;

    /// In-memory store backing the external-interface traits.
    #[derive(Debug, Default)]
    pub struct InMemoryStore {
        /// Catalogue products
        pub products: Vec<Product>,
        /// Purchase tiers, keyed by product
        pub tiers: HashMap<ProductId, Vec<PriceTier>>,
        /// Stock, keyed by (warehouse, product)
        pub stock: HashMap<(WarehouseId, ProductId), Decimal>,
        /// Posted sale lines
        pub sales: Vec<SaleLine>,
        /// Latest ADS snapshots, keyed by product
        pub ads: HashMap<ProductId, AdsSnapshot>,
        /// Committed purchase documents, in creation order
        pub purchase_documents: Vec<(PurchaseDocumentId, WarehouseId, Vec<PurchaseDocumentLine>)>,
        next_purchase_document_id: u64,
    }

    impl CatalogueReader for InMemoryStore {
        fn list_products(&self) -> Vec<Product> {
            self.products.clone()
        }

        fn list_tiers(&self, product_id: ProductId) -> Vec<PriceTier> {
            self.tiers.get(&product_id).cloned().unwrap_or_default()
        }
    }

    impl StockReader for InMemoryStore {
        fn stock(&self, warehouse_id: WarehouseId, product_id: ProductId) -> Decimal {
            self.stock.get(&(warehouse_id, product_id)).copied().unwrap_or(Decimal::ZERO)
        }
    }

    impl SalesReader for InMemoryStore {
        fn posted_sales(&self, start: NaiveDate, end: NaiveDate) -> Vec<SaleLine> {
            self.sales
                .iter()
                .filter(|s| {
                    let date = s.timestamp.date_naive();
                    date >= start && date <= end
                })
                .cloned()
                .collect()
        }
    }

    impl AdsWriter for InMemoryStore {
        fn upsert_ads(&mut self, snapshot: AdsSnapshot) {
            self.ads.insert(snapshot.product_id, snapshot);
        }
    }

    impl PurchaseDocumentWriter for InMemoryStore {
        fn create_purchase_document(
            &mut self,
            warehouse_id: WarehouseId,
            lines: Vec<PurchaseDocumentLine>,
            _created_at: DateTime<Utc>,
        ) -> PurchaseDocumentId {
            self.next_purchase_document_id += 1;
            let id = PurchaseDocumentId(self.next_purchase_document_id);
            self.purchase_documents.push((id, warehouse_id, lines));
            id
        }
    }
}

#[cfg(test)]
mod tests {
    use super::memory::InMemoryStore;
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn in_memory_stock_defaults_to_zero() {
        let store = InMemoryStore::default();
        assert_eq!(store.stock(WarehouseId(1), ProductId(1)), Decimal::ZERO);
    }

    #[test]
    fn in_memory_purchase_document_ids_increment() {
        let mut store = InMemoryStore::default();
        let a = store.create_purchase_document(WarehouseId(1), vec![], Utc::now());
        let b = store.create_purchase_document(WarehouseId(1), vec![], Utc::now());
        assert_ne!(a, b);
    }

    #[test]
    fn in_memory_posted_sales_filters_by_range() {
        use chrono::TimeZone;
        let mut store = InMemoryStore::default();
        store.sales.push(SaleLine {
            product_id: ProductId(1),
            timestamp: chrono::Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
            quantity: dec!(5),
        });
        let in_range =
            store.posted_sales(NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(), NaiveDate::from_ymd_opt(2024, 1, 31).unwrap());
        assert_eq!(in_range.len(), 1);
        let out_of_range =
            store.posted_sales(NaiveDate::from_ymd_opt(2023, 1, 1).unwrap(), NaiveDate::from_ymd_opt(2023, 1, 31).unwrap());
        assert!(out_of_range.is_empty());
    }
}
