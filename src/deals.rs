//! Deal Assembler.
//!
//! Builds Item/Deal records from the catalogue, current stock, and the
//! latest ADS snapshots, groups Items by brand, drops Deals with no
//! demand, and rejects Deals containing an Item with no profitable
//! tier.
//!
//! Grounded on `original_source/replenishment/admin_views/budget_input.py`
//! and `optimization/from_matlab/DaysForSale.py` for the
//! `system_suggested_quantity` / `can_be_sold_total` formulas.

use crate::error::Error;
use crate::model::{AdsSnapshot, Deal, Item, PriceTier, Product};
use crate::types::{BrandId, ProductId, WarehouseId};
use indexmap::IndexMap;
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use std::collections::HashMap;

/// Catalogue/stock/ADS inputs needed to assemble Deals for one
/// warehouse. Callers (the [`crate::store`] collaborators) populate
/// this from external persistence; this module performs no I/O.
pub struct AssemblyInput<'a> {
    /// Products in the catalogue, any brand
    pub products: &'a [Product],
    /// Purchase tiers, keyed by product, each pre-sorted ascending by
    /// `minimal_quantity` (or assembled here from an unsorted slice —
    /// see [`sorted_tiers`])
    pub tiers: &'a HashMap<ProductId, Vec<PriceTier>>,
    /// Current stock at the target warehouse, keyed by product
    pub stock: &'a HashMap<ProductId, Decimal>,
    /// Latest ADS snapshot, keyed by product
    pub ads: &'a HashMap<ProductId, AdsSnapshot>,
    /// Brand names, keyed by brand, for report auditability
    pub brand_names: &'a HashMap<BrandId, String>,
    /// Target warehouse
    pub warehouse_id: WarehouseId,
    /// Target days of forward demand to cover (`H_cov`)
    pub coverage_days: u32,
    /// Supplier credit window, in days (informational)
    pub credit_terms: u32,
    /// Optimizer's max investment horizon (`H_max`), in days
    pub max_investment_period: u32,
}

/// Tiers, sorted ascending by `minimal_quantity`. Exposed so callers
/// assembling `AssemblyInput::tiers` from an unordered source can
/// normalize before calling [`assemble`].
pub fn sorted_tiers(mut tiers: Vec<PriceTier>) -> Vec<PriceTier> {
    tiers.sort_by_key(|t| t.minimal_quantity);
    tiers
}

fn decimal_to_f64(d: Decimal) -> f64 {
    d.to_f64().unwrap_or(0.0)
}

/// Assemble Deals from `input`. Returns one Deal per brand that has at
/// least one product with positive suggested demand, in brand-insertion
/// order (first product seen for that brand).
///
/// # Errors
/// [`Error::InputValidation`] if any included Item has no tiers, or no
/// tier is ever profitable against its sale price.
#[tracing::instrument(skip(input), fields(warehouse_id = input.warehouse_id.0, products = input.products.len()))]
pub fn assemble(input: &AssemblyInput<'_>) -> Result<Vec<Deal>, Error> {
    let mut by_brand: IndexMap<BrandId, Vec<Item>> = IndexMap::new();
    let mut seen_skus: HashMap<&str, BrandId> = HashMap::new();

    for product in input.products {
        if let Some(&first_brand) = seen_skus.get(product.sku.as_str()) {
            if first_brand != product.brand_id {
                return Err(Error::invalid_input(format!(
                    "sku {} is used by both brand {} and brand {}",
                    product.sku, first_brand, product.brand_id
                )));
            }
        } else {
            seen_skus.insert(product.sku.as_str(), product.brand_id);
        }

        let tiers = input.tiers.get(&product.id).cloned().unwrap_or_default();
        if tiers.is_empty() {
            return Err(Error::invalid_input(format!(
                "product {} (sku {}) has no purchase tiers",
                product.id, product.sku
            )));
        }
        let tiers = sorted_tiers(tiers);
        if !tiers.iter().any(|t| t.is_profitable(product.sale_price)) {
            return Err(Error::invalid_input(format!(
                "product {} (sku {}) has no price tier cheaper than its sale price",
                product.id, product.sku
            )));
        }

        let inventory = *input.stock.get(&product.id).unwrap_or(&Decimal::ZERO);
        let ads = input.ads.get(&product.id).map(|s| s.ads).unwrap_or(Decimal::ZERO);

        let ads_f = decimal_to_f64(ads);
        let inventory_f = decimal_to_f64(inventory);

        let raw_need = (ads_f * f64::from(input.coverage_days) - inventory_f).ceil();
        let system_suggested_quantity = raw_need.max(0.0) as u32;

        let raw_cap = (ads_f * f64::from(input.max_investment_period) - inventory_f).floor();
        let can_be_sold_total = raw_cap.max(0.0) as u32;

        let item = Item {
            product_id: product.id,
            sku: product.sku.clone(),
            name: product.name.clone(),
            inventory,
            ads,
            sale_price: product.sale_price,
            tiers,
            system_suggested_quantity,
            credit_terms: input.credit_terms,
            system_coverage_days: input.coverage_days,
            can_be_sold_total,
            best_quantity: system_suggested_quantity,
        };

        by_brand.entry(product.brand_id).or_default().push(item);
    }

    let deals: Vec<Deal> = by_brand
        .into_iter()
        .filter(|(_, items)| items.iter().map(|i| u64::from(i.system_suggested_quantity)).sum::<u64>() > 0)
        .map(|(brand_id, items)| Deal {
            brand_id,
            brand_name: input.brand_names.get(&brand_id).cloned().unwrap_or_default(),
            warehouse_id: input.warehouse_id,
            items,
        })
        .collect();

    tracing::info!(deals = deals.len(), "assembled deals");
    Ok(deals)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn product(id: u64, brand: u64, sale_price: Decimal) -> Product {
        Product { id: ProductId(id), sku: format!("SKU{id}"), name: format!("Product {id}"), brand_id: BrandId(brand), sale_price }
    }

    #[test]
    fn rejects_duplicate_sku_across_brands() {
        let mut products = vec![product(1, 1, dec!(10)), product(2, 2, dec!(10))];
        products[1].sku = products[0].sku.clone();
        let mut tiers = HashMap::new();
        tiers.insert(ProductId(1), vec![PriceTier { minimal_quantity: 1, unit_price: dec!(6) }]);
        tiers.insert(ProductId(2), vec![PriceTier { minimal_quantity: 1, unit_price: dec!(6) }]);
        let input = AssemblyInput {
            products: &products,
            tiers: &tiers,
            stock: &HashMap::new(),
            ads: &HashMap::new(),
            brand_names: &HashMap::new(),
            warehouse_id: WarehouseId(1),
            coverage_days: 14,
            credit_terms: 30,
            max_investment_period: 60,
        };
        let result = assemble(&input);
        assert!(matches!(result, Err(Error::InputValidation(_))));
    }

    #[test]
    fn rejects_product_with_no_profitable_tier() {
        let products = vec![product(1, 1, dec!(10))];
        let mut tiers = HashMap::new();
        tiers.insert(ProductId(1), vec![PriceTier { minimal_quantity: 1, unit_price: dec!(12) }]);
        let input = AssemblyInput {
            products: &products,
            tiers: &tiers,
            stock: &HashMap::new(),
            ads: &HashMap::new(),
            brand_names: &HashMap::new(),
            warehouse_id: WarehouseId(1),
            coverage_days: 14,
            credit_terms: 30,
            max_investment_period: 60,
        };
        let result = assemble(&input);
        assert!(matches!(result, Err(Error::InputValidation(_))));
    }

    #[test]
    fn rejects_product_with_no_tiers() {
        let products = vec![product(1, 1, dec!(10))];
        let input = AssemblyInput {
            products: &products,
            tiers: &HashMap::new(),
            stock: &HashMap::new(),
            ads: &HashMap::new(),
            brand_names: &HashMap::new(),
            warehouse_id: WarehouseId(1),
            coverage_days: 14,
            credit_terms: 30,
            max_investment_period: 60,
        };
        assert!(assemble(&input).is_err());
    }

    #[test]
    fn forecast_skip_propagates_to_zero_demand_and_dropped_deal() {
        // A product the Forecaster skipped (no ADS snapshot written,
        // simulating a <15-observation series) gets ads=0 here,
        // suggested_quantity=0, and its single-item deal is dropped
        // for having no demand.
        let products = vec![product(1, 1, dec!(10))];
        let mut tiers = HashMap::new();
        tiers.insert(ProductId(1), vec![PriceTier { minimal_quantity: 1, unit_price: dec!(6) }]);
        let input = AssemblyInput {
            products: &products,
            tiers: &tiers,
            stock: &HashMap::new(),
            ads: &HashMap::new(), // Forecaster never wrote a snapshot for this product
            brand_names: &HashMap::new(),
            warehouse_id: WarehouseId(1),
            coverage_days: 14,
            credit_terms: 30,
            max_investment_period: 60,
        };
        let deals = assemble(&input).unwrap();
        assert!(deals.is_empty(), "deal with ads=0 everywhere must be dropped, not emitted with zero quantities");
    }

    #[test]
    fn drops_deals_with_no_demand() {
        let products = vec![product(1, 1, dec!(10))];
        let mut tiers = HashMap::new();
        tiers.insert(ProductId(1), vec![PriceTier { minimal_quantity: 1, unit_price: dec!(6) }]);
        let input = AssemblyInput {
            products: &products,
            tiers: &tiers,
            stock: &HashMap::new(),
            ads: &HashMap::new(), // no ADS => ads=0 => suggested=0
            brand_names: &HashMap::new(),
            warehouse_id: WarehouseId(1),
            coverage_days: 14,
            credit_terms: 30,
            max_investment_period: 60,
        };
        let deals = assemble(&input).unwrap();
        assert!(deals.is_empty());
    }

    #[test]
    fn computes_suggested_quantity_from_ads_and_coverage() {
        // sale_price=10, tier (1,6), inventory=0, ads=1, coverage=14.
        let products = vec![product(1, 1, dec!(10))];
        let mut tiers = HashMap::new();
        tiers.insert(ProductId(1), vec![PriceTier { minimal_quantity: 1, unit_price: dec!(6) }]);
        let mut ads = HashMap::new();
        ads.insert(ProductId(1), AdsSnapshot { product_id: ProductId(1), ads: dec!(1), last_updated: chrono::Utc::now() });
        let input = AssemblyInput {
            products: &products,
            tiers: &tiers,
            stock: &HashMap::new(),
            ads: &ads,
            brand_names: &HashMap::new(),
            warehouse_id: WarehouseId(1),
            coverage_days: 14,
            credit_terms: 30,
            max_investment_period: 60,
        };
        let deals = assemble(&input).unwrap();
        assert_eq!(deals.len(), 1);
        assert_eq!(deals[0].items[0].system_suggested_quantity, 14);
    }
}
