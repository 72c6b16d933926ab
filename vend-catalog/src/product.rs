use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Derived product status. Never stored; recomputed against the clock on
/// every read.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ProductStatus {
    Live,
    Pending,
    Expired,
    Disabled,
}

/// A sellable product. Prices, stock and dimensions live on its variants.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Product {
    pub id: Uuid,
    pub title: String,
    pub type_id: Uuid,
    pub tax_category_id: Uuid,
    pub shipping_category_id: Uuid,
    pub post_date: Option<DateTime<Utc>>,
    pub expiry_date: Option<DateTime<Utc>>,
    pub promotable: bool,
    pub free_shipping: bool,
    pub enabled: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Product {
    pub fn new(
        title: impl Into<String>,
        type_id: Uuid,
        tax_category_id: Uuid,
        shipping_category_id: Uuid,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            title: title.into(),
            type_id,
            tax_category_id,
            shipping_category_id,
            post_date: None,
            expiry_date: None,
            promotable: true,
            free_shipping: false,
            enabled: true,
            created_at: now,
            updated_at: now,
        }
    }

    /// Status as of `now`, a pure function of the product's own fields.
    ///
    /// A product posts the instant `post_date` is reached (`post_date ==
    /// now` is Live) and expires the instant `expiry_date` is reached.
    pub fn status_at(&self, now: DateTime<Utc>) -> ProductStatus {
        if !self.enabled {
            return ProductStatus::Disabled;
        }

        let posted = self.post_date.map_or(true, |d| d <= now);
        let expired = self.expiry_date.map_or(false, |d| d <= now);

        if posted && !expired {
            ProductStatus::Live
        } else if self.post_date.map_or(false, |d| d > now) {
            ProductStatus::Pending
        } else {
            ProductStatus::Expired
        }
    }

    /// Flatten the full attribute set into a point-in-time record, used to
    /// freeze catalog data onto historical documents (order lines, quotes)
    /// so later edits cannot rewrite them.
    pub fn snapshot(&self) -> serde_json::Value {
        serde_json::json!({
            "id": self.id,
            "title": self.title,
            "type_id": self.type_id,
            "tax_category_id": self.tax_category_id,
            "shipping_category_id": self.shipping_category_id,
            "post_date": self.post_date,
            "expiry_date": self.expiry_date,
            "promotable": self.promotable,
            "free_shipping": self.free_shipping,
            "enabled": self.enabled,
            "created_at": self.created_at,
            "updated_at": self.updated_at,
        })
    }
}
