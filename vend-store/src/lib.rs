pub mod app_config;
pub mod catalog_repo;
pub mod currency_repo;
pub mod database;

pub use catalog_repo::{PgProductRepository, PgVariantRepository};
pub use currency_repo::PgCurrencyRepository;
pub use database::DbClient;
