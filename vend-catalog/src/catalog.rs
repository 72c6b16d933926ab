use std::sync::Arc;
use uuid::Uuid;

use crate::product::Product;
use crate::repository::{ProductRepository, VariantRepository};
use crate::variant::Variant;

/// Catalog-related errors
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("Product not found: {0}")]
    ProductNotFound(Uuid),

    #[error("Variant not found: {0}")]
    VariantNotFound(Uuid),

    #[error("Invalid catalog data: {0}")]
    Validation(String),

    #[error("Storage failure: {0}")]
    Storage(String),
}

/// Products and their variants: default resolution, stock aggregates, and
/// validated writes.
pub struct Catalog {
    products: Arc<dyn ProductRepository>,
    variants: Arc<dyn VariantRepository>,
}

impl Catalog {
    pub fn new(products: Arc<dyn ProductRepository>, variants: Arc<dyn VariantRepository>) -> Self {
        Self { products, variants }
    }

    pub async fn product(&self, id: Uuid) -> Result<Product, CatalogError> {
        self.products
            .find(id)
            .await
            .map_err(|e| CatalogError::Storage(e.to_string()))?
            .ok_or(CatalogError::ProductNotFound(id))
    }

    pub async fn list_products(&self) -> Result<Vec<Product>, CatalogError> {
        self.products
            .list()
            .await
            .map_err(|e| CatalogError::Storage(e.to_string()))
    }

    pub async fn variant(&self, id: Uuid) -> Result<Variant, CatalogError> {
        self.variants
            .find(id)
            .await
            .map_err(|e| CatalogError::Storage(e.to_string()))?
            .ok_or(CatalogError::VariantNotFound(id))
    }

    /// A product's variants in display order. A product always exposes at
    /// least one variant: when none are persisted, a placeholder is
    /// synthesized in memory and never written back.
    pub async fn variants(&self, product_id: Uuid) -> Result<Vec<Variant>, CatalogError> {
        // Resolve the product first so an unknown id is a NotFound, not an
        // empty placeholder list.
        self.product(product_id).await?;

        let variants = self
            .variants
            .list_for_product(product_id)
            .await
            .map_err(|e| CatalogError::Storage(e.to_string()))?;

        if variants.is_empty() {
            return Ok(vec![Variant::placeholder(product_id)]);
        }

        Ok(variants)
    }

    /// The first variant flagged as default, falling back to the first in
    /// display order when none is flagged.
    pub async fn default_variant(&self, product_id: Uuid) -> Result<Variant, CatalogError> {
        let variants = self.variants(product_id).await?;

        let default = variants
            .iter()
            .find(|v| v.is_default)
            .or_else(|| variants.first())
            .cloned();

        // The placeholder rule guarantees a non-empty sequence.
        default.ok_or(CatalogError::ProductNotFound(product_id))
    }

    /// Total stock across variants. Variants with unlimited stock are
    /// excluded from the sum, not treated as infinite.
    pub async fn total_stock(&self, product_id: Uuid) -> Result<i32, CatalogError> {
        Ok(self
            .variants(product_id)
            .await?
            .iter()
            .filter(|v| !v.unlimited_stock)
            .map(|v| v.stock)
            .sum())
    }

    /// Does at least one variant have unlimited stock?
    pub async fn has_unlimited_stock(&self, product_id: Uuid) -> Result<bool, CatalogError> {
        Ok(self
            .variants(product_id)
            .await?
            .iter()
            .any(|v| v.unlimited_stock))
    }

    /// Validate and persist a product together with its variant sequence.
    /// The slice order becomes the display order.
    pub async fn save_product(
        &self,
        product: &Product,
        variants: &[Variant],
    ) -> Result<(), CatalogError> {
        if product.title.trim().is_empty() {
            return Err(CatalogError::Validation("title must not be empty".into()));
        }

        for variant in variants {
            if variant.product_id != product.id {
                return Err(CatalogError::Validation(format!(
                    "variant {} does not belong to product {}",
                    variant.id, product.id
                )));
            }
            if variant.sku.trim().is_empty() {
                return Err(CatalogError::Validation(format!(
                    "variant {} has an empty SKU",
                    variant.id
                )));
            }
            if !variant.price.is_finite() || variant.price < 0.0 {
                return Err(CatalogError::Validation(format!(
                    "variant {} has an invalid price {}",
                    variant.sku, variant.price
                )));
            }
            if variant.stock < 0 {
                return Err(CatalogError::Validation(format!(
                    "variant {} has negative stock",
                    variant.sku
                )));
            }
            for dimension in [variant.weight, variant.length, variant.width, variant.height] {
                if !dimension.is_finite() || dimension < 0.0 {
                    return Err(CatalogError::Validation(format!(
                        "variant {} has an invalid dimension",
                        variant.sku
                    )));
                }
            }
        }

        self.products
            .save(product)
            .await
            .map_err(|e| CatalogError::Storage(e.to_string()))?;

        self.variants
            .replace_for_product(product.id, variants)
            .await
            .map_err(|e| CatalogError::Storage(e.to_string()))
    }

    /// Delete a product and its variants. Deleting an absent id is a no-op.
    pub async fn delete_product(&self, id: Uuid) -> Result<(), CatalogError> {
        self.variants
            .replace_for_product(id, &[])
            .await
            .map_err(|e| CatalogError::Storage(e.to_string()))?;

        self.products
            .delete(id)
            .await
            .map_err(|e| CatalogError::Storage(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::{MemoryProductRepository, MemoryVariantRepository};

    fn catalog() -> Catalog {
        Catalog::new(
            Arc::new(MemoryProductRepository::new()),
            Arc::new(MemoryVariantRepository::new()),
        )
    }

    fn product() -> Product {
        Product::new("Shirt", Uuid::new_v4(), Uuid::new_v4(), Uuid::new_v4())
    }

    #[tokio::test]
    async fn empty_product_synthesizes_a_placeholder() {
        let catalog = catalog();
        let p = product();
        catalog.save_product(&p, &[]).await.unwrap();

        let variants = catalog.variants(p.id).await.unwrap();
        assert_eq!(variants.len(), 1);
        assert!(variants[0].is_placeholder());
        assert!(variants[0].is_default);
        assert_eq!(variants[0].price, 0.0);
        assert_eq!(variants[0].stock, 0);

        // The placeholder is synthesized on read, never persisted.
        let variants_again = catalog.variants(p.id).await.unwrap();
        assert!(variants_again[0].is_placeholder());
        assert_eq!(catalog.total_stock(p.id).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn unknown_product_is_not_found() {
        let catalog = catalog();
        let err = catalog.variants(Uuid::new_v4()).await.unwrap_err();
        assert!(matches!(err, CatalogError::ProductNotFound(_)));
    }

    #[tokio::test]
    async fn default_variant_prefers_first_flagged() {
        let catalog = catalog();
        let p = product();

        let a = Variant::new(p.id, "SKU-A", 10.0);
        let mut b = Variant::new(p.id, "SKU-B", 20.0);
        b.is_default = true;
        let mut c = Variant::new(p.id, "SKU-C", 30.0);
        c.is_default = true;

        catalog
            .save_product(&p, &[a.clone(), b.clone(), c])
            .await
            .unwrap();

        assert_eq!(catalog.default_variant(p.id).await.unwrap().id, b.id);
    }

    #[tokio::test]
    async fn default_variant_falls_back_to_first() {
        let catalog = catalog();
        let p = product();

        let a = Variant::new(p.id, "SKU-A", 10.0);
        let b = Variant::new(p.id, "SKU-B", 20.0);
        catalog
            .save_product(&p, &[a.clone(), b])
            .await
            .unwrap();

        assert_eq!(catalog.default_variant(p.id).await.unwrap().id, a.id);
    }

    #[tokio::test]
    async fn stock_sum_excludes_unlimited_variants() {
        let catalog = catalog();
        let p = product();

        let mut v1 = Variant::new(p.id, "SKU-1", 10.0);
        v1.stock = 5;
        let mut v2 = Variant::new(p.id, "SKU-2", 10.0);
        v2.stock = 0;
        v2.unlimited_stock = true;

        catalog
            .save_product(&p, &[v1.clone(), v2.clone()])
            .await
            .unwrap();

        assert_eq!(catalog.total_stock(p.id).await.unwrap(), 5);
        assert!(catalog.has_unlimited_stock(p.id).await.unwrap());

        // Changing an unlimited variant's counter never moves the total.
        v2.stock = 900;
        catalog.save_product(&p, &[v1, v2]).await.unwrap();
        assert_eq!(catalog.total_stock(p.id).await.unwrap(), 5);
    }

    #[tokio::test]
    async fn save_rejects_bad_variant_data() {
        let catalog = catalog();
        let p = product();

        let mut negative_stock = Variant::new(p.id, "SKU-1", 10.0);
        negative_stock.stock = -1;
        let err = catalog
            .save_product(&p, &[negative_stock])
            .await
            .unwrap_err();
        assert!(matches!(err, CatalogError::Validation(_)));

        let empty_sku = Variant::new(p.id, " ", 10.0);
        let err = catalog.save_product(&p, &[empty_sku]).await.unwrap_err();
        assert!(matches!(err, CatalogError::Validation(_)));

        let nan_price = Variant::new(p.id, "SKU-2", f64::NAN);
        let err = catalog.save_product(&p, &[nan_price]).await.unwrap_err();
        assert!(matches!(err, CatalogError::Validation(_)));

        let foreign = Variant::new(Uuid::new_v4(), "SKU-3", 10.0);
        let err = catalog.save_product(&p, &[foreign]).await.unwrap_err();
        assert!(matches!(err, CatalogError::Validation(_)));
    }

    #[tokio::test]
    async fn variants_keep_display_order() {
        let catalog = catalog();
        let p = product();

        let skus = ["SKU-C", "SKU-A", "SKU-B"];
        let variants: Vec<_> = skus
            .iter()
            .map(|sku| Variant::new(p.id, *sku, 10.0))
            .collect();
        catalog.save_product(&p, &variants).await.unwrap();

        let listed: Vec<_> = catalog
            .variants(p.id)
            .await
            .unwrap()
            .into_iter()
            .map(|v| v.sku)
            .collect();
        assert_eq!(listed, skus);
    }

    #[tokio::test]
    async fn delete_is_idempotent_and_clears_variants() {
        let catalog = catalog();
        let p = product();
        catalog
            .save_product(&p, &[Variant::new(p.id, "SKU-1", 10.0)])
            .await
            .unwrap();

        catalog.delete_product(p.id).await.unwrap();
        catalog.delete_product(p.id).await.unwrap();

        let err = catalog.product(p.id).await.unwrap_err();
        assert!(matches!(err, CatalogError::ProductNotFound(_)));
    }
}
