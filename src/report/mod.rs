//! Optimization Run lifecycle: a Report owns Phase 1 (enumerate
//! variants, compute budget bounds), Phase 2 (select one variant per
//! deal within a chosen budget), and commit (materialize a Purchase
//! Document and freeze the Report).
//!
//! Grounded on `original_source/replenishment/utils.py`'s
//! `execute_initial_optimization_pass` / `execute_final_optimization_pass`
//! and `admin_views/process_report.py` / `admin_views/create_order.py`
//! for the DRAFT → ORDER_CREATED transition.

pub mod blob;
pub mod materializer;

use crate::budget::{self, BudgetBounds};
use crate::deals::{self, AssemblyInput};
use crate::error::Error;
use crate::model::Deal;
use crate::selector;
use crate::store::{PurchaseDocumentLine, PurchaseDocumentWriter};
use crate::types::{PurchaseDocumentId, ReportId, WarehouseId};
use crate::variants::{self, Variant};
use chrono::Utc;
use materializer::MaterializedReport;
use rust_decimal::Decimal;

/// A Report's lifecycle state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    /// Phase 1/2 may still run; not yet committed.
    Draft,
    /// Committed: a Purchase Document was materialized; immutable from
    /// here on.
    OrderCreated,
}

impl std::fmt::Display for Status {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Status::Draft => write!(f, "DRAFT"),
            Status::OrderCreated => write!(f, "ORDER_CREATED"),
        }
    }
}

/// An optimization run. Owns the Deals it was assembled from, the
/// enumerated Variants kept for Phase 2, and the most recent
/// Selector/materializer outcome.
pub struct Report {
    /// Report identifier
    pub id: ReportId,
    /// Target warehouse
    pub warehouse_id: WarehouseId,
    /// Target days of forward demand to cover
    pub coverage_days: u32,
    /// Supplier credit window, in days
    pub credit_terms: u32,
    /// Lifecycle state
    pub status: Status,
    /// Phase 1 output: feasible budget range, x1000 fixed-point
    pub budget_bounds: Option<BudgetBounds>,
    /// Phase 1 output: optimizer's max investment horizon, in days
    pub max_investment_period: Option<u32>,
    deals: Vec<Deal>,
    variants_per_deal: Vec<Vec<Variant>>,
    /// Most recent Phase 2 materialization, if any
    pub materialized: Option<MaterializedReport>,
}

impl Report {
    /// Start a new Report in DRAFT, with no Phase 1 output yet.
    pub fn new(id: ReportId, warehouse_id: WarehouseId, coverage_days: u32, credit_terms: u32) -> Self {
        Self {
            id,
            warehouse_id,
            coverage_days,
            credit_terms,
            status: Status::Draft,
            budget_bounds: None,
            max_investment_period: None,
            deals: Vec::new(),
            variants_per_deal: Vec::new(),
            materialized: None,
        }
    }

    fn require_draft(&self) -> Result<(), Error> {
        if self.status != Status::Draft {
            return Err(Error::state_conflict(self.id.0, self.status.to_string()));
        }
        Ok(())
    }

    /// Phase 1: assemble Deals from `input`, enumerate Variants for
    /// each, and compute the feasible budget range. Status stays
    /// DRAFT. Serializes the enumerated Variants into an opaque blob
    /// for external persistence between phases.
    ///
    /// # Errors
    /// [`Error::StateConflict`] if the Report is not DRAFT;
    /// [`Error::InputValidation`] if `deals::assemble` rejects the input.
    #[tracing::instrument(skip(self, input), fields(report_id = self.id.0))]
    pub fn phase1(&mut self, input: &AssemblyInput<'_>, max_investment_period: u32) -> Result<Vec<u8>, Error> {
        self.require_draft()?;

        let assembled = deals::assemble(input)?;
        let variants_per_deal: Vec<Vec<Variant>> = assembled.iter().map(variants::enumerate).collect();
        let bounds = budget::estimate(&variants_per_deal);

        let brand_ids: Vec<u64> = assembled.iter().map(|d| d.brand_id.0).collect();
        let serialized = blob::encode(&brand_ids, &variants_per_deal)?;

        self.deals = assembled;
        self.variants_per_deal = variants_per_deal;
        self.budget_bounds = Some(bounds);
        self.max_investment_period = Some(max_investment_period);

        Ok(serialized)
    }

    /// Phase 2: select one Variant per Deal maximizing total
    /// efficiency within `final_budget` (x1000 fixed-point), then
    /// materialize the outcome. Status stays DRAFT.
    ///
    /// # Errors
    /// [`Error::StateConflict`] if not DRAFT; [`Error::BudgetOutOfRange`]
    /// if `final_budget` falls outside Phase 1's computed bounds;
    /// [`Error::Infeasible`] / [`Error::SolverTimeout`] from the Selector.
    #[tracing::instrument(skip(self), fields(report_id = self.id.0, final_budget))]
    pub fn phase2(&mut self, final_budget: i64) -> Result<&MaterializedReport, Error> {
        self.require_draft()?;
        let bounds = self.budget_bounds.ok_or_else(|| Error::Internal("phase1 must run before phase2".to_string()))?;

        if final_budget < bounds.min_budget || final_budget > bounds.max_budget {
            return Err(Error::budget_out_of_range(bounds.min_budget, bounds.max_budget, final_budget));
        }

        let selection = selector::select(&self.variants_per_deal, final_budget)?;
        let materialized = materializer::materialize(&self.deals, &self.variants_per_deal, &selection);

        for (deal, mat_deal) in self.deals.iter_mut().zip(materialized.deals.iter()) {
            for (item, mat_item) in deal.items.iter_mut().zip(mat_deal.items.iter()) {
                item.best_quantity = mat_item.best_quantity;
            }
        }

        self.materialized = Some(materialized);
        Ok(self.materialized.as_ref().expect("just set"))
    }

    /// Commit: transition DRAFT → ORDER_CREATED, materializing a
    /// Purchase Document with one line per Item having
    /// `best_quantity > 0`. Once committed, further
    /// `phase1`/`phase2`/`commit` calls fail with
    /// [`Error::StateConflict`].
    ///
    /// # Errors
    /// [`Error::StateConflict`] if not DRAFT or Phase 2 has not run yet.
    #[tracing::instrument(skip(self, writer), fields(report_id = self.id.0))]
    pub fn commit<W: PurchaseDocumentWriter>(&mut self, writer: &mut W) -> Result<PurchaseDocumentId, Error> {
        self.require_draft()?;
        let materialized = self
            .materialized
            .as_ref()
            .ok_or_else(|| Error::state_conflict(self.id.0, "DRAFT (phase2 not yet run)"))?;

        let lines: Vec<PurchaseDocumentLine> = materialized
            .deals
            .iter()
            .flat_map(|d| d.items.iter())
            .filter(|item| item.best_quantity > 0)
            .map(|item| PurchaseDocumentLine {
                product_id: item.product_id,
                quantity: item.best_quantity,
                line_price: Decimal::from(item.best_quantity) * item.purchase_price,
            })
            .collect();

        let document_id = writer.create_purchase_document(self.warehouse_id, lines, Utc::now());
        self.status = Status::OrderCreated;
        Ok(document_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{AdsSnapshot, PriceTier, Product};
    use crate::store::memory::InMemoryStore;
    use crate::types::{BrandId, ProductId};
    use rust_decimal_macros::dec;
    use std::collections::HashMap;

    fn single_deal_input<'a>(
        products: &'a [Product],
        tiers: &'a HashMap<ProductId, Vec<PriceTier>>,
        ads: &'a HashMap<ProductId, AdsSnapshot>,
        brand_names: &'a HashMap<BrandId, String>,
    ) -> AssemblyInput<'a> {
        AssemblyInput {
            products,
            tiers,
            stock: &HashMap::new(),
            ads,
            brand_names,
            warehouse_id: WarehouseId(1),
            coverage_days: 14,
            credit_terms: 30,
            max_investment_period: 60,
        }
    }

    #[test]
    fn full_lifecycle_commits_an_order() {
        let products = vec![Product { id: ProductId(1), sku: "A".into(), name: "A".into(), brand_id: BrandId(1), sale_price: dec!(10) }];
        let mut tiers = HashMap::new();
        tiers.insert(ProductId(1), vec![PriceTier { minimal_quantity: 1, unit_price: dec!(6) }]);
        let mut ads = HashMap::new();
        ads.insert(ProductId(1), AdsSnapshot { product_id: ProductId(1), ads: dec!(1), last_updated: Utc::now() });
        let brand_names = HashMap::new();

        let mut report = Report::new(ReportId(1), WarehouseId(1), 14, 30);
        let input = single_deal_input(&products, &tiers, &ads, &brand_names);
        report.phase1(&input, 60).unwrap();

        let bounds = report.budget_bounds.unwrap();
        report.phase2(bounds.max_budget).unwrap();

        let mut store = InMemoryStore::default();
        let doc_id = report.commit(&mut store).unwrap();
        assert_eq!(store.purchase_documents.len(), 1);
        assert_eq!(store.purchase_documents[0].0, doc_id);
        assert_eq!(report.status, Status::OrderCreated);
    }

    #[test]
    fn phase2_rejects_budget_out_of_range() {
        let products = vec![Product { id: ProductId(1), sku: "A".into(), name: "A".into(), brand_id: BrandId(1), sale_price: dec!(10) }];
        let mut tiers = HashMap::new();
        tiers.insert(ProductId(1), vec![PriceTier { minimal_quantity: 1, unit_price: dec!(6) }]);
        let mut ads = HashMap::new();
        ads.insert(ProductId(1), AdsSnapshot { product_id: ProductId(1), ads: dec!(1), last_updated: Utc::now() });
        let brand_names = HashMap::new();

        let mut report = Report::new(ReportId(1), WarehouseId(1), 14, 30);
        let input = single_deal_input(&products, &tiers, &ads, &brand_names);
        report.phase1(&input, 60).unwrap();

        let err = report.phase2(1).unwrap_err();
        assert!(matches!(err, Error::BudgetOutOfRange { .. }));
    }

    #[test]
    fn commit_is_rejected_once_already_order_created() {
        let products = vec![Product { id: ProductId(1), sku: "A".into(), name: "A".into(), brand_id: BrandId(1), sale_price: dec!(10) }];
        let mut tiers = HashMap::new();
        tiers.insert(ProductId(1), vec![PriceTier { minimal_quantity: 1, unit_price: dec!(6) }]);
        let mut ads = HashMap::new();
        ads.insert(ProductId(1), AdsSnapshot { product_id: ProductId(1), ads: dec!(1), last_updated: Utc::now() });
        let brand_names = HashMap::new();

        let mut report = Report::new(ReportId(1), WarehouseId(1), 14, 30);
        let input = single_deal_input(&products, &tiers, &ads, &brand_names);
        report.phase1(&input, 60).unwrap();
        let bounds = report.budget_bounds.unwrap();
        report.phase2(bounds.max_budget).unwrap();

        let mut store = InMemoryStore::default();
        report.commit(&mut store).unwrap();

        let err = report.commit(&mut store).unwrap_err();
        assert!(matches!(err, Error::StateConflict { .. }));
    }
}
