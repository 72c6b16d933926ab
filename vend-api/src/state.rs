use std::sync::Arc;

use vend_catalog::Catalog;
use vend_currency::Ledger;
use vend_pricing::PricingFacade;

#[derive(Clone)]
pub struct AppState {
    pub ledger: Arc<Ledger>,
    pub catalog: Arc<Catalog>,
    pub pricing: Arc<PricingFacade>,
}

impl AppState {
    pub fn new(ledger: Arc<Ledger>, catalog: Arc<Catalog>) -> Self {
        let pricing = Arc::new(PricingFacade::new(ledger.clone(), catalog.clone()));
        Self {
            ledger,
            catalog,
            pricing,
        }
    }
}
