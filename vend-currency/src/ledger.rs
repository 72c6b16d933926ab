use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::currency::{CurrencyError, PaymentCurrency};
use crate::repository::CurrencyRepository;

/// The set of supported currencies and their exchange rates.
///
/// The full list is cached in-process after the first read. Every write
/// invalidates the cache before returning, so a read issued after a write
/// completes always observes the new rates.
pub struct Ledger {
    repo: Arc<dyn CurrencyRepository>,
    cache: RwLock<Option<Vec<PaymentCurrency>>>,
    generation: AtomicU64,
}

impl Ledger {
    pub fn new(repo: Arc<dyn CurrencyRepository>) -> Self {
        Self {
            repo,
            cache: RwLock::new(None),
            generation: AtomicU64::new(0),
        }
    }

    /// All currencies, primary first, then alphabetical by ISO code.
    pub async fn all(&self) -> Result<Vec<PaymentCurrency>, CurrencyError> {
        if let Some(cached) = self.cache.read().await.clone() {
            return Ok(cached);
        }

        let generation = self.generation.load(Ordering::Acquire);
        let mut rows = self
            .repo
            .list()
            .await
            .map_err(|e| CurrencyError::Storage(e.to_string()))?;
        rows.sort_by(|a, b| b.is_primary.cmp(&a.is_primary).then_with(|| a.iso.cmp(&b.iso)));

        let mut slot = self.cache.write().await;
        // A fill that started before an invalidation must not resurrect
        // pre-write rates.
        if self.generation.load(Ordering::Acquire) == generation {
            *slot = Some(rows.clone());
        }

        Ok(rows)
    }

    /// Lookup by ISO code, case-insensitive. Returns `None` when no such
    /// currency exists.
    pub async fn by_iso(&self, iso: &str) -> Result<Option<PaymentCurrency>, CurrencyError> {
        let iso = iso.trim().to_uppercase();
        Ok(self.all().await?.into_iter().find(|c| c.iso == iso))
    }

    /// Lookup by record id. Returns `None` when no such currency exists.
    pub async fn by_id(&self, id: Uuid) -> Result<Option<PaymentCurrency>, CurrencyError> {
        Ok(self.all().await?.into_iter().find(|c| c.id == id))
    }

    /// The currency all prices are entered in.
    pub async fn primary(&self) -> Result<PaymentCurrency, CurrencyError> {
        match self.all().await?.into_iter().find(|c| c.is_primary) {
            Some(currency) => Ok(currency),
            None => {
                tracing::error!("currency ledger holds no primary entry");
                Err(CurrencyError::MissingPrimary)
            }
        }
    }

    /// ISO code of the primary currency.
    pub async fn primary_iso(&self) -> Result<String, CurrencyError> {
        Ok(self.primary().await?.iso)
    }

    /// Convert an amount given in the primary currency into `target_iso`.
    pub async fn convert(&self, amount: f64, target_iso: &str) -> Result<f64, CurrencyError> {
        let target = self
            .by_iso(target_iso)
            .await?
            .ok_or_else(|| CurrencyError::UnknownCurrency(target_iso.trim().to_uppercase()))?;

        Ok(amount * target.rate)
    }

    /// Validate and persist a currency.
    ///
    /// The ISO code is uppercased. A primary currency's rate is pinned to
    /// 1.0 no matter what was submitted, since it is the unit all prices
    /// are entered in. Saving a new primary demotes the previous one in the
    /// same atomic write.
    pub async fn save(
        &self,
        mut record: PaymentCurrency,
    ) -> Result<PaymentCurrency, CurrencyError> {
        record.iso = record.iso.trim().to_uppercase();

        if record.is_primary {
            record.rate = 1.0;
        }

        if record.iso.len() != 3 || !record.iso.bytes().all(|b| b.is_ascii_uppercase()) {
            return Err(CurrencyError::Validation(format!(
                "ISO code must be 3 letters, got {:?}",
                record.iso
            )));
        }

        if !record.rate.is_finite() || record.rate <= 0.0 {
            return Err(CurrencyError::Validation(format!(
                "rate must be positive, got {}",
                record.rate
            )));
        }

        if let Some(other) = self.by_iso(&record.iso).await? {
            if other.id != record.id {
                return Err(CurrencyError::Validation(format!(
                    "ISO code {} is already in use",
                    record.iso
                )));
            }
        }

        let saved = self
            .repo
            .save(&record)
            .await
            .map_err(|e| CurrencyError::Storage(e.to_string()))?;

        self.invalidate().await;
        Ok(saved)
    }

    /// Delete a currency by id. Deleting an absent id is a no-op.
    pub async fn delete(&self, id: Uuid) -> Result<(), CurrencyError> {
        self.repo
            .delete(id)
            .await
            .map_err(|e| CurrencyError::Storage(e.to_string()))?;

        self.invalidate().await;
        Ok(())
    }

    async fn invalidate(&self) {
        // Bump the generation before clearing so an in-flight fill started
        // against the old rows fails its generation check.
        self.generation.fetch_add(1, Ordering::AcqRel);
        *self.cache.write().await = None;
    }
}
