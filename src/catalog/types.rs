use async_trait::async_trait;
use serde::{Deserialize, Deserializer};

use crate::error::Error;

/// Number of products requested per page. A page shorter than this means the
/// catalog has no further results for the current search.
pub const PER_PAGE: usize = 10;

#[derive(Debug, Default, Clone, PartialEq, Eq, Deserialize)]
pub struct Product {
  #[serde(deserialize_with = "deserialize_product_id")]
  pub id: String,
  #[serde(default)]
  pub name: String,
}

impl Product {
  pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
    Product { id: id.into(), name: name.into() }
  }
}

// WooCommerce sends numeric ids, other catalogs send strings.
fn deserialize_product_id<'de, D>(deserializer: D) -> Result<String, D::Error>
where
  D: Deserializer<'de>,
{
  #[derive(Deserialize)]
  #[serde(untagged)]
  enum RawId {
    Number(u64),
    Text(String),
  }

  Ok(match RawId::deserialize(deserializer)? {
    RawId::Number(id) => id.to_string(),
    RawId::Text(id) => id,
  })
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageQuery {
  pub per_page: usize,
  pub offset: usize,
  pub search: String,
}

impl PageQuery {
  pub fn first_page(search: &str) -> Self {
    PageQuery { per_page: PER_PAGE, offset: 0, search: String::from(search) }
  }

  pub fn next_page(offset: usize, search: &str) -> Self {
    PageQuery { per_page: PER_PAGE, offset, search: String::from(search) }
  }

  /// Whether a page of `count` results was full, which is the only signal used
  /// to decide that more results may exist.
  pub fn is_full_page(&self, count: usize) -> bool {
    count == self.per_page
  }
}

#[async_trait]
pub trait ProductCatalog: Send + Sync {
  async fn product(&self, id: &str) -> Result<Product, Error>;
  async fn products(&self, query: &PageQuery) -> Result<Vec<Product>, Error>;
}

#[cfg(test)]
mod tests {
  use pretty_assertions::assert_eq;

  use super::*;

  #[test]
  fn test_decode_numeric_id() {
    let product: Product = serde_json::from_str(r#"{"id": 42, "name": "Widget", "price": "9.99"}"#).unwrap();

    assert_eq!(product, Product::new("42", "Widget"));
  }

  #[test]
  fn test_decode_string_id() {
    let product: Product = serde_json::from_str(r#"{"id": "sku-7", "name": "Gadget"}"#).unwrap();

    assert_eq!(product.id, "sku-7");
  }

  #[test]
  fn test_decode_missing_name() {
    let product: Product = serde_json::from_str(r#"{"id": 1}"#).unwrap();

    assert_eq!(product.name, "");
  }

  #[test]
  fn test_decode_rejects_missing_id() {
    assert!(serde_json::from_str::<Product>(r#"{"name": "Nameless"}"#).is_err());
  }

  #[test]
  fn test_full_page_heuristic() {
    let query = PageQuery::first_page("");

    assert!(query.is_full_page(PER_PAGE));
    assert!(!query.is_full_page(PER_PAGE - 1));
    assert!(!query.is_full_page(0));
  }
}
