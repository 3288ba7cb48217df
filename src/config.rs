use std::{collections::HashMap, path::PathBuf};

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use derive_deref::{Deref, DerefMut};
use reqwest::Url;
use serde::{Deserialize, Deserializer, de};

use crate::{
  action::Action,
  error::Error,
  mode::Mode,
  utils::{get_config_dir, get_data_dir},
};

const CONFIG: &str = include_str!("../.config/config.json5");

#[derive(Clone, Debug, Deserialize, Default)]
pub struct AppConfig {
  #[serde(default)]
  pub _data_dir: PathBuf,
  #[serde(default)]
  pub _config_dir: PathBuf,
}

/// Credentials and connection settings for the WooCommerce REST API.
#[derive(Clone, Debug, Deserialize)]
pub struct CatalogConfig {
  #[serde(default)]
  pub api_url: String,
  #[serde(default)]
  pub api_key: String,
  #[serde(default)]
  pub api_secret: String,
  /// Send the consumer key/secret as query parameters instead of HTTP Basic auth.
  #[serde(default)]
  pub query_string_auth: bool,
  #[serde(default = "default_timeout_secs")]
  pub timeout_secs: u64,
}

fn default_timeout_secs() -> u64 {
  30
}

impl Default for CatalogConfig {
  fn default() -> Self {
    CatalogConfig {
      api_url: String::new(),
      api_key: String::new(),
      api_secret: String::new(),
      query_string_auth: false,
      timeout_secs: default_timeout_secs(),
    }
  }
}

impl CatalogConfig {
  /// Checks that every credential is present and returns the parsed API url.
  pub fn validate(&self) -> Result<Url, Error> {
    if self.api_url.trim().is_empty() {
      return Err(Error::Config("api_url is not set".to_string()));
    }
    if self.api_key.trim().is_empty() {
      return Err(Error::Config("api_key is not set".to_string()));
    }
    if self.api_secret.trim().is_empty() {
      return Err(Error::Config("api_secret is not set".to_string()));
    }
    let url =
      Url::parse(self.api_url.trim()).map_err(|err| Error::Config(format!("invalid api_url {}: {}", self.api_url, err)))?;
    match url.scheme() {
      "http" | "https" => Ok(url),
      scheme => Err(Error::Config(format!("api_url must use http or https, got {}", scheme))),
    }
  }
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct FieldConfig {
  /// File holding the selected product id. Defaults to `field.json` in the data directory.
  #[serde(default)]
  pub path: Option<PathBuf>,
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct Config {
  #[serde(default, flatten)]
  pub config: AppConfig,
  #[serde(default)]
  pub catalog: CatalogConfig,
  #[serde(default)]
  pub field: FieldConfig,
  #[serde(default)]
  pub keybindings: KeyBindings,
}

impl Config {
  pub fn new() -> Result<Self, config::ConfigError> {
    let data_dir = get_data_dir();
    let config_dir = get_config_dir();
    let mut builder = config::Config::builder()
      .set_default("_data_dir", data_dir.to_string_lossy().to_string())?
      .set_default("_config_dir", config_dir.to_string_lossy().to_string())?
      .add_source(config::File::from_str(CONFIG, config::FileFormat::Json5));

    let config_files = [
      ("config.json5", config::FileFormat::Json5),
      ("config.json", config::FileFormat::Json),
      ("config.toml", config::FileFormat::Toml),
    ];
    for (file, format) in &config_files {
      builder = builder.add_source(config::File::from(config_dir.join(file)).format(*format).required(false));
    }
    builder = builder
      .add_source(config::Environment::with_prefix("PRODUCT_PICKER").prefix_separator("_").separator("__").try_parsing(true));

    builder.build()?.try_deserialize()
  }

  pub fn field_path(&self) -> PathBuf {
    self.field.path.clone().unwrap_or_else(|| self.config._data_dir.join("field.json"))
  }
}

#[derive(Clone, Debug, Default, Deref, DerefMut)]
pub struct KeyBindings(pub HashMap<Mode, HashMap<KeyEvent, Action>>);

impl KeyBindings {
  pub fn action_for(&self, mode: Mode, key: &KeyEvent) -> Option<Action> {
    let key = KeyEvent::new(key.code, key.modifiers);
    self.get(&mode).and_then(|bindings| bindings.get(&key)).cloned()
  }
}

impl<'de> Deserialize<'de> for KeyBindings {
  fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
  where
    D: Deserializer<'de>,
  {
    let parsed_map = HashMap::<Mode, HashMap<String, Action>>::deserialize(deserializer)?;

    let mut keybindings = HashMap::new();
    for (mode, inner_map) in parsed_map {
      let mut bindings = HashMap::new();
      for (key_str, action) in inner_map {
        bindings.insert(parse_key_event(&key_str).map_err(de::Error::custom)?, action);
      }
      keybindings.insert(mode, bindings);
    }

    Ok(KeyBindings(keybindings))
  }
}

/// Parses a binding such as `<q>`, `<ctrl-c>` or `<shift-tab>`.
pub fn parse_key_event(raw: &str) -> Result<KeyEvent, String> {
  let raw_lower = raw.to_ascii_lowercase();
  let inner = raw_lower
    .strip_prefix('<')
    .and_then(|rest| rest.strip_suffix('>'))
    .ok_or_else(|| format!("Key binding must be wrapped in <>: {}", raw))?;

  let (remaining, modifiers) = extract_modifiers(inner);
  parse_key_code_with_modifiers(remaining, modifiers).ok_or_else(|| format!("Unable to parse key binding {}", raw))
}

fn extract_modifiers(raw: &str) -> (&str, KeyModifiers) {
  let mut modifiers = KeyModifiers::empty();
  let mut current = raw;

  loop {
    match current {
      rest if rest.starts_with("ctrl-") => {
        modifiers.insert(KeyModifiers::CONTROL);
        current = &rest[5..];
      },
      rest if rest.starts_with("alt-") => {
        modifiers.insert(KeyModifiers::ALT);
        current = &rest[4..];
      },
      rest if rest.starts_with("shift-") => {
        modifiers.insert(KeyModifiers::SHIFT);
        current = &rest[6..];
      },
      _ => break,
    };
  }

  (current, modifiers)
}

fn parse_key_code_with_modifiers(raw: &str, mut modifiers: KeyModifiers) -> Option<KeyEvent> {
  let code = match raw {
    "esc" => KeyCode::Esc,
    "enter" => KeyCode::Enter,
    "left" => KeyCode::Left,
    "right" => KeyCode::Right,
    "up" => KeyCode::Up,
    "down" => KeyCode::Down,
    "home" => KeyCode::Home,
    "end" => KeyCode::End,
    "pageup" => KeyCode::PageUp,
    "pagedown" => KeyCode::PageDown,
    "backtab" => {
      modifiers.insert(KeyModifiers::SHIFT);
      KeyCode::BackTab
    },
    "backspace" => KeyCode::Backspace,
    "delete" => KeyCode::Delete,
    "insert" => KeyCode::Insert,
    "tab" => KeyCode::Tab,
    "space" => KeyCode::Char(' '),
    "hyphen" | "minus" => KeyCode::Char('-'),
    function if function.len() > 1 && function.starts_with('f') => KeyCode::F(function[1..].parse().ok()?),
    single if single.chars().count() == 1 => {
      let mut c = single.chars().next()?;
      if modifiers.contains(KeyModifiers::SHIFT) {
        c = c.to_ascii_uppercase();
      }
      KeyCode::Char(c)
    },
    _ => return None,
  };
  Some(KeyEvent::new(code, modifiers))
}

#[cfg(test)]
mod tests {
  use pretty_assertions::assert_eq;

  use super::*;

  #[test]
  fn test_parse_simple_key() {
    assert_eq!(parse_key_event("<q>").unwrap(), KeyEvent::new(KeyCode::Char('q'), KeyModifiers::NONE));
  }

  #[test]
  fn test_parse_with_modifiers() {
    assert_eq!(parse_key_event("<ctrl-c>").unwrap(), KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL));
    assert_eq!(
      parse_key_event("<Ctrl-Alt-Enter>").unwrap(),
      KeyEvent::new(KeyCode::Enter, KeyModifiers::CONTROL | KeyModifiers::ALT)
    );
    assert_eq!(parse_key_event("<shift-a>").unwrap(), KeyEvent::new(KeyCode::Char('A'), KeyModifiers::SHIFT));
  }

  #[test]
  fn test_parse_special_keys() {
    assert_eq!(parse_key_event("<f5>").unwrap(), KeyEvent::new(KeyCode::F(5), KeyModifiers::NONE));
    assert_eq!(parse_key_event("<space>").unwrap(), KeyEvent::new(KeyCode::Char(' '), KeyModifiers::NONE));
  }

  #[test]
  fn test_parse_invalid_keys() {
    assert!(parse_key_event("q").is_err());
    assert!(parse_key_event("<notakey>").is_err());
  }

  #[test]
  fn test_default_config_bindings() {
    let config: Config = json5::from_str(CONFIG).unwrap();
    let quit = KeyEvent::new(KeyCode::Char('q'), KeyModifiers::NONE);
    let ctrl_c = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);

    assert_eq!(config.keybindings.action_for(Mode::Default, &quit), Some(Action::Quit));
    assert_eq!(config.keybindings.action_for(Mode::Input, &quit), None);
    assert_eq!(config.keybindings.action_for(Mode::Input, &ctrl_c), Some(Action::Quit));
    assert_eq!(config.catalog.timeout_secs, 30);
  }

  #[test]
  fn test_catalog_validation() {
    let mut catalog = CatalogConfig {
      api_url: "https://shop.example.com".to_string(),
      api_key: "ck".to_string(),
      api_secret: "cs".to_string(),
      ..CatalogConfig::default()
    };
    assert_eq!(catalog.validate().unwrap().host_str(), Some("shop.example.com"));

    catalog.api_url = "ftp://shop.example.com".to_string();
    assert!(matches!(catalog.validate(), Err(Error::Config(_))));

    catalog.api_url = "not a url".to_string();
    assert!(matches!(catalog.validate(), Err(Error::Config(_))));

    catalog.api_url = "https://shop.example.com".to_string();
    catalog.api_key = " ".to_string();
    assert!(matches!(catalog.validate(), Err(Error::Config(message)) if message.contains("api_key")));
  }

  #[test]
  fn test_field_path_defaults_to_data_dir() {
    let config = Config {
      config: AppConfig { _data_dir: PathBuf::from("/tmp/picker"), _config_dir: PathBuf::new() },
      ..Config::default()
    };

    assert_eq!(config.field_path(), PathBuf::from("/tmp/picker/field.json"));
  }
}
