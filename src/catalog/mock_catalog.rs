use std::sync::{
  Mutex,
  atomic::{AtomicBool, Ordering},
};

use async_trait::async_trait;
use reqwest::StatusCode;

use super::{PageQuery, Product, ProductCatalog};
use crate::error::Error;

/// In-memory catalog that pages and filters like the real API and records every
/// request it receives.
#[derive(Debug, Default)]
pub struct MockCatalog {
  products: Vec<Product>,
  failing: AtomicBool,
  page_requests: Mutex<Vec<PageQuery>>,
  lookups: Mutex<Vec<String>>,
}

impl MockCatalog {
  pub fn new(products: Vec<Product>) -> Self {
    MockCatalog { products, ..MockCatalog::default() }
  }

  /// Catalog with `count` products named "Product 1" through "Product {count}".
  pub fn numbered(count: usize) -> Self {
    MockCatalog::new((1..=count).map(|n| Product::new(n.to_string(), format!("Product {}", n))).collect())
  }

  pub fn set_failing(&self, failing: bool) {
    self.failing.store(failing, Ordering::SeqCst);
  }

  pub fn page_requests(&self) -> Vec<PageQuery> {
    self.page_requests.lock().unwrap().clone()
  }

  pub fn lookups(&self) -> Vec<String> {
    self.lookups.lock().unwrap().clone()
  }

  fn check_available(&self) -> Result<(), Error> {
    if self.failing.load(Ordering::SeqCst) {
      return Err(Error::Api { status: StatusCode::SERVICE_UNAVAILABLE, message: "Catalog unavailable".to_string() });
    }
    Ok(())
  }
}

#[async_trait]
impl ProductCatalog for MockCatalog {
  async fn product(&self, id: &str) -> Result<Product, Error> {
    self.lookups.lock().unwrap().push(id.to_string());
    self.check_available()?;
    self
      .products
      .iter()
      .find(|product| product.id == id)
      .cloned()
      .ok_or_else(|| Error::NotFound(format!("products/{}", id)))
  }

  async fn products(&self, query: &PageQuery) -> Result<Vec<Product>, Error> {
    self.page_requests.lock().unwrap().push(query.clone());
    self.check_available()?;
    let search = query.search.to_lowercase();
    Ok(
      self
        .products
        .iter()
        .filter(|product| search.is_empty() || product.name.to_lowercase().contains(&search))
        .skip(query.offset)
        .take(query.per_page)
        .cloned()
        .collect(),
    )
  }
}
