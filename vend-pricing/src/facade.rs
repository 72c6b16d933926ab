use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;

use vend_catalog::{Catalog, CatalogError};
use vend_currency::{CurrencyError, Ledger};

/// Pricing facade errors. Catalog and ledger failures pass through
/// unchanged so callers keep the original taxonomy (not-found vs unknown
/// currency vs storage).
#[derive(Debug, thiserror::Error)]
pub enum PricingError {
    #[error(transparent)]
    Catalog(#[from] CatalogError),

    #[error(transparent)]
    Currency(#[from] CurrencyError),
}

/// A presentation-ready price/stock answer for one variant.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VariantQuote {
    pub product_id: Uuid,
    pub variant_id: Uuid,
    pub sku: String,
    pub price: f64,
    pub currency: String,
    pub in_stock: bool,
}

/// Single entry point combining catalog and currency data for display.
/// Collaborators are injected, not located.
pub struct PricingFacade {
    ledger: Arc<Ledger>,
    catalog: Arc<Catalog>,
}

impl PricingFacade {
    pub fn new(ledger: Arc<Ledger>, catalog: Arc<Catalog>) -> Self {
        Self { ledger, catalog }
    }

    /// A variant's price converted into `target_iso`.
    pub async fn price(&self, variant_id: Uuid, target_iso: &str) -> Result<f64, PricingError> {
        let variant = self.catalog.variant(variant_id).await?;
        Ok(self.ledger.convert(variant.price, target_iso).await?)
    }

    /// Price and availability of a product's default variant in
    /// `target_iso`.
    pub async fn quote(
        &self,
        product_id: Uuid,
        target_iso: &str,
    ) -> Result<VariantQuote, PricingError> {
        let variant = self.catalog.default_variant(product_id).await?;
        let price = self.ledger.convert(variant.price, target_iso).await?;

        Ok(VariantQuote {
            product_id,
            variant_id: variant.id,
            sku: variant.sku,
            price,
            currency: target_iso.trim().to_uppercase(),
            in_stock: variant.unlimited_stock || variant.stock > 0,
        })
    }

    /// Immutable point-in-time copy of a product's attributes, for freezing
    /// onto historical records.
    pub async fn snapshot(&self, product_id: Uuid) -> Result<serde_json::Value, PricingError> {
        Ok(self.catalog.product(product_id).await?.snapshot())
    }
}
