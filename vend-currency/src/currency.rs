use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A currency accepted at checkout, with its exchange rate relative to the
/// primary currency.
///
/// All catalog prices are stored in the primary currency, so the primary
/// row always carries a rate of exactly 1.0.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaymentCurrency {
    pub id: Uuid,
    pub iso: String,
    pub rate: f64,
    pub is_primary: bool,
}

impl PaymentCurrency {
    pub fn new(iso: impl Into<String>, rate: f64, is_primary: bool) -> Self {
        Self {
            id: Uuid::new_v4(),
            iso: iso.into().to_uppercase(),
            rate,
            is_primary,
        }
    }
}

/// Currency-related errors
#[derive(Debug, thiserror::Error)]
pub enum CurrencyError {
    #[error("Invalid currency: {0}")]
    Validation(String),

    #[error("Unknown currency: {0}")]
    UnknownCurrency(String),

    /// The data store holds no primary currency. Prior writes must never
    /// let this happen; readers still have to handle it.
    #[error("No primary currency is configured")]
    MissingPrimary,

    #[error("Storage failure: {0}")]
    Storage(String),
}
