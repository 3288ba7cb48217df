use std::{fs, path::PathBuf, sync::Mutex};

use serde::{Deserialize, Serialize};
use tracing::{error, info};

use super::store::FieldStore;
use crate::error::Error;

#[derive(Debug, Default, Serialize, Deserialize)]
struct StoredField {
  value: Option<String>,
}

/// Field store backed by a small JSON document, `{ "value": "<id>" }`.
/// The file is created on first write.
#[derive(Debug)]
pub struct FileFieldStore {
  path: PathBuf,
  value: Mutex<Option<String>>,
}

impl FileFieldStore {
  pub fn open(path: impl Into<PathBuf>) -> Result<FileFieldStore, Error> {
    let path = path.into();
    let value = if path.exists() {
      let contents = fs::read_to_string(&path)?;
      if contents.trim().is_empty() { None } else { serde_json::from_str::<StoredField>(&contents)?.value }
    } else {
      None
    };
    info!("Opened field store {} with value {:?}", path.display(), value);
    Ok(FileFieldStore { path, value: Mutex::new(value) })
  }

  fn write(&self, value: Option<String>) -> Result<(), Error> {
    if let Some(parent) = self.path.parent() {
      fs::create_dir_all(parent)?;
    }
    let contents = serde_json::to_string_pretty(&StoredField { value: value.clone() })?;
    fs::write(&self.path, contents).map_err(|err| {
      error!("Failed to write field store {}: {}", self.path.display(), err);
      Error::Store(format!("could not write {}: {}", self.path.display(), err))
    })?;
    *self.value.lock().unwrap() = value;
    Ok(())
  }
}

impl FieldStore for FileFieldStore {
  fn get_value(&self) -> Option<String> {
    self.value.lock().unwrap().clone()
  }

  fn set_value(&self, value: &str) -> Result<(), Error> {
    self.write(Some(value.to_string()))
  }

  fn remove_value(&self) -> Result<(), Error> {
    self.write(None)
  }
}
