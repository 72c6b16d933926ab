use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A purchasable SKU-level unit belonging to a product. Its price is in the
/// primary currency.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Variant {
    pub id: Uuid,
    pub product_id: Uuid,
    pub sku: String,
    pub price: f64,
    pub stock: i32,
    pub unlimited_stock: bool,
    pub is_default: bool,
    pub weight: f64,
    pub length: f64,
    pub width: f64,
    pub height: f64,
}

impl Variant {
    pub fn new(product_id: Uuid, sku: impl Into<String>, price: f64) -> Self {
        Self {
            id: Uuid::new_v4(),
            product_id,
            sku: sku.into(),
            price,
            stock: 0,
            unlimited_stock: false,
            is_default: false,
            weight: 0.0,
            length: 0.0,
            width: 0.0,
            height: 0.0,
        }
    }

    /// Synthesized stand-in for a product with no persisted variants. The
    /// nil id marks it as unsaved; it must never be written to storage.
    pub fn placeholder(product_id: Uuid) -> Self {
        Self {
            id: Uuid::nil(),
            product_id,
            sku: String::new(),
            price: 0.0,
            stock: 0,
            unlimited_stock: false,
            is_default: true,
            weight: 0.0,
            length: 0.0,
            width: 0.0,
            height: 0.0,
        }
    }

    pub fn is_placeholder(&self) -> bool {
        self.id.is_nil()
    }
}
