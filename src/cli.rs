use std::path::PathBuf;

use clap::Parser;

use crate::{config::Config, utils::version};

#[derive(Parser, Debug, Default)]
#[command(author, version = version(), about)]
pub struct Cli {
  /// Root url of the WooCommerce site
  #[arg(long, value_name = "URL", env = "WOO_API_URL")]
  pub api_url: Option<String>,

  /// REST API consumer key
  #[arg(long, value_name = "KEY", env = "WOO_API_KEY")]
  pub api_key: Option<String>,

  /// REST API consumer secret
  #[arg(long, value_name = "SECRET", env = "WOO_API_SECRET", hide_env_values = true)]
  pub api_secret: Option<String>,

  /// Send credentials as query parameters instead of Basic auth
  #[arg(long)]
  pub query_string_auth: bool,

  /// File that stores the selected product id
  #[arg(short, long, value_name = "PATH")]
  pub field: Option<PathBuf>,

  /// Keep the selection in memory only
  #[arg(long, conflicts_with = "field")]
  pub ephemeral: bool,

  /// Tick rate, i.e. number of ticks per second
  #[arg(short, long, value_name = "FLOAT", default_value_t = 4.0)]
  pub tick_rate: f64,

  /// Frame rate, i.e. number of frames per second
  #[arg(long, value_name = "FLOAT", default_value_t = 30.0)]
  pub frame_rate: f64,

  /// Print the stored product id after quitting
  #[arg(short, long)]
  pub print_selection: bool,
}

impl Cli {
  /// Command line values win over the config file and environment.
  pub fn apply_to(&self, config: &mut Config) {
    if let Some(api_url) = &self.api_url {
      config.catalog.api_url = api_url.clone();
    }
    if let Some(api_key) = &self.api_key {
      config.catalog.api_key = api_key.clone();
    }
    if let Some(api_secret) = &self.api_secret {
      config.catalog.api_secret = api_secret.clone();
    }
    if self.query_string_auth {
      config.catalog.query_string_auth = true;
    }
    if let Some(field) = &self.field {
      config.field.path = Some(field.clone());
    }
  }
}

#[cfg(test)]
mod tests {
  use pretty_assertions::assert_eq;

  use super::*;

  #[test]
  fn test_defaults() {
    let cli = Cli::try_parse_from(["product-picker"]).unwrap();

    assert_eq!(cli.tick_rate, 4.0);
    assert_eq!(cli.frame_rate, 30.0);
    assert!(!cli.ephemeral);
    assert!(!cli.print_selection);
  }

  #[test]
  fn test_apply_overrides_catalog_settings() {
    let cli = Cli::try_parse_from([
      "product-picker",
      "--api-url",
      "https://shop.example.com",
      "--api-key",
      "ck_123",
      "--api-secret",
      "cs_456",
      "--query-string-auth",
      "--field",
      "/tmp/field.json",
    ])
    .unwrap();
    let mut config = Config::default();

    cli.apply_to(&mut config);

    assert_eq!(config.catalog.api_url, "https://shop.example.com");
    assert_eq!(config.catalog.api_key, "ck_123");
    assert_eq!(config.catalog.api_secret, "cs_456");
    assert!(config.catalog.query_string_auth);
    assert_eq!(config.field.path, Some(PathBuf::from("/tmp/field.json")));
  }

  #[test]
  fn test_apply_keeps_config_when_flags_absent() {
    let cli = Cli { api_url: None, ..Cli::default() };
    let mut config = Config::default();
    config.catalog.api_url = "https://configured.example.com".to_string();

    cli.apply_to(&mut config);

    assert_eq!(config.catalog.api_url, "https://configured.example.com");
    assert!(!config.catalog.query_string_auth);
  }

  #[test]
  fn test_field_conflicts_with_ephemeral() {
    assert!(Cli::try_parse_from(["product-picker", "--ephemeral", "--field", "x.json"]).is_err());
  }
}
