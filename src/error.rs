use reqwest::StatusCode;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("Network error: {0}")]
  Network(#[from] reqwest::Error),
  #[error("Product not found: {0}")]
  NotFound(String),
  #[error("Configuration error: {0}")]
  Config(String),
  #[error("Catalog API returned {status}: {message}")]
  Api { status: StatusCode, message: String },
  #[error("Malformed catalog response: {0}")]
  Decode(#[from] serde_json::Error),
  #[error(transparent)]
  Io(#[from] std::io::Error),
  #[error("Field store error: {0}")]
  Store(String),
}
