use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, StatusCode, Url};
use serde::de::DeserializeOwned;
use tracing::{error, info};

use crate::{
  catalog::types::{PageQuery, Product, ProductCatalog},
  config::CatalogConfig,
  error::Error,
};

const API_PATH: &str = "wp-json/wc/v3/";

pub struct WooCommerceCatalog {
  client: Client,
  base_url: Url,
  consumer_key: String,
  consumer_secret: String,
  query_string_auth: bool,
}

impl WooCommerceCatalog {
  pub fn new(config: &CatalogConfig) -> Result<WooCommerceCatalog, Error> {
    let mut api_url = config.validate()?;
    if !api_url.path().ends_with('/') {
      let path = format!("{}/", api_url.path());
      api_url.set_path(&path);
    }
    let base_url = api_url.join(API_PATH).map_err(|err| Error::Config(format!("invalid api_url: {}", err)))?;

    let client = Client::builder()
      .timeout(Duration::from_secs(config.timeout_secs))
      .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
      .build()?;

    info!("Using WooCommerce catalog at {}", base_url);
    Ok(WooCommerceCatalog {
      client,
      base_url,
      consumer_key: config.api_key.clone(),
      consumer_secret: config.api_secret.clone(),
      query_string_auth: config.query_string_auth,
    })
  }

  fn endpoint(&self, segments: &[&str]) -> Result<Url, Error> {
    let mut url = self.base_url.clone();
    url
      .path_segments_mut()
      .map_err(|_| Error::Config(format!("{} cannot be used as a base url", self.base_url)))?
      .pop_if_empty()
      .extend(segments);
    Ok(url)
  }

  fn authenticate(&self, request: RequestBuilder) -> RequestBuilder {
    if self.query_string_auth {
      request.query(&[("consumer_key", &self.consumer_key), ("consumer_secret", &self.consumer_secret)])
    } else {
      request.basic_auth(&self.consumer_key, Some(&self.consumer_secret))
    }
  }

  async fn get_json<T: DeserializeOwned>(
    &self,
    segments: &[&str],
    params: &[(&'static str, String)],
  ) -> Result<T, Error> {
    let url = self.endpoint(segments)?;
    let resource = segments.join("/");
    info!("GET {} {:?}", resource, params);

    let request = self.authenticate(self.client.get(url).query(params));
    let response = request.send().await.inspect_err(|err| error!("Request to {} failed: {}", resource, err))?;
    let status = response.status();
    let body = response.text().await?;

    if !status.is_success() {
      let err = classify_status(status, &resource, &body);
      error!("{}", err);
      return Err(err);
    }

    Ok(serde_json::from_str(&body)?)
  }
}

#[async_trait]
impl ProductCatalog for WooCommerceCatalog {
  async fn product(&self, id: &str) -> Result<Product, Error> {
    self.get_json(&["products", id], &[]).await
  }

  async fn products(&self, query: &PageQuery) -> Result<Vec<Product>, Error> {
    let products: Vec<Product> = self.get_json(&["products"], &page_params(query)).await?;
    info!("Received {} products at offset {}", products.len(), query.offset);
    Ok(products)
  }
}

fn page_params(query: &PageQuery) -> Vec<(&'static str, String)> {
  let mut params = vec![("per_page", query.per_page.to_string())];
  if query.offset > 0 {
    params.push(("skip", query.offset.to_string()));
  }
  if !query.search.is_empty() {
    params.push(("search", query.search.clone()));
  }
  params
}

fn classify_status(status: StatusCode, resource: &str, body: &str) -> Error {
  // WooCommerce error bodies look like {"code": "...", "message": "...", "data": {"status": 404}}
  let message = serde_json::from_str::<serde_json::Value>(body)
    .ok()
    .and_then(|value| value.get("message").and_then(|m| m.as_str()).map(String::from))
    .unwrap_or_else(|| status.canonical_reason().unwrap_or("unknown error").to_string());

  match status {
    StatusCode::NOT_FOUND => Error::NotFound(resource.to_string()),
    StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
      Error::Config(format!("catalog rejected the credentials ({}): {}", status, message))
    },
    _ => Error::Api { status, message },
  }
}
