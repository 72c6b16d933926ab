pub mod currency;
pub mod ledger;
pub mod repository;

pub use currency::{CurrencyError, PaymentCurrency};
pub use ledger::Ledger;
pub use repository::{CurrencyRepository, MemoryCurrencyRepository};
