pub mod catalog;
pub mod product;
pub mod repository;
pub mod variant;

pub use catalog::{Catalog, CatalogError};
pub use product::{Product, ProductStatus};
pub use repository::{
    MemoryProductRepository, MemoryVariantRepository, ProductRepository, VariantRepository,
};
pub use variant::Variant;
