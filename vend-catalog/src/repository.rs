use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::product::Product;
use crate::variant::Variant;

/// Repository trait for product records
#[async_trait]
pub trait ProductRepository: Send + Sync {
    async fn find(
        &self,
        id: Uuid,
    ) -> Result<Option<Product>, Box<dyn std::error::Error + Send + Sync>>;

    async fn list(&self) -> Result<Vec<Product>, Box<dyn std::error::Error + Send + Sync>>;

    /// Upsert a product record.
    async fn save(&self, product: &Product)
        -> Result<(), Box<dyn std::error::Error + Send + Sync>>;

    /// Delete by id. Deleting an absent id is a no-op.
    async fn delete(&self, id: Uuid) -> Result<(), Box<dyn std::error::Error + Send + Sync>>;
}

/// Repository trait for variant records
#[async_trait]
pub trait VariantRepository: Send + Sync {
    async fn find(
        &self,
        id: Uuid,
    ) -> Result<Option<Variant>, Box<dyn std::error::Error + Send + Sync>>;

    /// Variants of a product in display order.
    async fn list_for_product(
        &self,
        product_id: Uuid,
    ) -> Result<Vec<Variant>, Box<dyn std::error::Error + Send + Sync>>;

    /// Atomically replace a product's variant sequence. The slice order
    /// becomes the display order.
    async fn replace_for_product(
        &self,
        product_id: Uuid,
        variants: &[Variant],
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>>;
}

/// In-memory product store, used by tests and single-process setups
pub struct MemoryProductRepository {
    rows: RwLock<HashMap<Uuid, Product>>,
}

impl MemoryProductRepository {
    pub fn new() -> Self {
        Self {
            rows: RwLock::new(HashMap::new()),
        }
    }
}

impl Default for MemoryProductRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ProductRepository for MemoryProductRepository {
    async fn find(
        &self,
        id: Uuid,
    ) -> Result<Option<Product>, Box<dyn std::error::Error + Send + Sync>> {
        Ok(self.rows.read().await.get(&id).cloned())
    }

    async fn list(&self) -> Result<Vec<Product>, Box<dyn std::error::Error + Send + Sync>> {
        let mut products: Vec<_> = self.rows.read().await.values().cloned().collect();
        products.sort_by(|a, b| a.title.cmp(&b.title));
        Ok(products)
    }

    async fn save(
        &self,
        product: &Product,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        self.rows.write().await.insert(product.id, product.clone());
        Ok(())
    }

    async fn delete(&self, id: Uuid) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        self.rows.write().await.remove(&id);
        Ok(())
    }
}

/// In-memory variant store keyed by product, kept in display order
pub struct MemoryVariantRepository {
    rows: RwLock<HashMap<Uuid, Vec<Variant>>>,
}

impl MemoryVariantRepository {
    pub fn new() -> Self {
        Self {
            rows: RwLock::new(HashMap::new()),
        }
    }
}

impl Default for MemoryVariantRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl VariantRepository for MemoryVariantRepository {
    async fn find(
        &self,
        id: Uuid,
    ) -> Result<Option<Variant>, Box<dyn std::error::Error + Send + Sync>> {
        Ok(self
            .rows
            .read()
            .await
            .values()
            .flatten()
            .find(|v| v.id == id)
            .cloned())
    }

    async fn list_for_product(
        &self,
        product_id: Uuid,
    ) -> Result<Vec<Variant>, Box<dyn std::error::Error + Send + Sync>> {
        Ok(self
            .rows
            .read()
            .await
            .get(&product_id)
            .cloned()
            .unwrap_or_default())
    }

    async fn replace_for_product(
        &self,
        product_id: Uuid,
        variants: &[Variant],
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        let mut rows = self.rows.write().await;
        if variants.is_empty() {
            rows.remove(&product_id);
        } else {
            rows.insert(product_id, variants.to_vec());
        }
        Ok(())
    }
}
