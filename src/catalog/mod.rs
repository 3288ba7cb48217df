#[cfg(test)]
pub mod mock_catalog;
pub mod types;
pub mod woo_commerce;

pub use types::{PER_PAGE, PageQuery, Product, ProductCatalog};
pub use woo_commerce::WooCommerceCatalog;
