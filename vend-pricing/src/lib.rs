pub mod facade;

pub use facade::{PricingError, PricingFacade, VariantQuote};
