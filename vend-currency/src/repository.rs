use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::currency::PaymentCurrency;

/// Repository trait for payment currency records
#[async_trait]
pub trait CurrencyRepository: Send + Sync {
    async fn list(&self) -> Result<Vec<PaymentCurrency>, Box<dyn std::error::Error + Send + Sync>>;

    /// Upsert a currency record. When the record is primary, every other
    /// record loses its primary flag in the same atomic write.
    async fn save(
        &self,
        record: &PaymentCurrency,
    ) -> Result<PaymentCurrency, Box<dyn std::error::Error + Send + Sync>>;

    /// Delete by id. Deleting an absent id is a no-op.
    async fn delete(&self, id: Uuid) -> Result<(), Box<dyn std::error::Error + Send + Sync>>;
}

/// In-memory currency store, used by tests and single-process setups
pub struct MemoryCurrencyRepository {
    rows: RwLock<HashMap<Uuid, PaymentCurrency>>,
}

impl MemoryCurrencyRepository {
    pub fn new() -> Self {
        Self {
            rows: RwLock::new(HashMap::new()),
        }
    }
}

impl Default for MemoryCurrencyRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CurrencyRepository for MemoryCurrencyRepository {
    async fn list(&self) -> Result<Vec<PaymentCurrency>, Box<dyn std::error::Error + Send + Sync>> {
        Ok(self.rows.read().await.values().cloned().collect())
    }

    async fn save(
        &self,
        record: &PaymentCurrency,
    ) -> Result<PaymentCurrency, Box<dyn std::error::Error + Send + Sync>> {
        // Demotion and insert happen under one write lock so no reader can
        // observe two primary rows.
        let mut rows = self.rows.write().await;

        if record.is_primary {
            for row in rows.values_mut() {
                row.is_primary = false;
            }
        }

        rows.insert(record.id, record.clone());
        Ok(record.clone())
    }

    async fn delete(&self, id: Uuid) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        self.rows.write().await.remove(&id);
        Ok(())
    }
}
