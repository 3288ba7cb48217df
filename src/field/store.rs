use std::sync::Mutex;

use crate::error::Error;

/// The host-owned value this widget persists: the id of the chosen product.
pub trait FieldStore: Send + Sync {
  fn get_value(&self) -> Option<String>;
  fn set_value(&self, value: &str) -> Result<(), Error>;
  fn remove_value(&self) -> Result<(), Error>;
}

#[derive(Debug, Default)]
pub struct MemoryFieldStore {
  value: Mutex<Option<String>>,
}

impl MemoryFieldStore {
  pub fn new(initial: Option<String>) -> Self {
    MemoryFieldStore { value: Mutex::new(initial) }
  }
}

impl FieldStore for MemoryFieldStore {
  fn get_value(&self) -> Option<String> {
    self.value.lock().unwrap().clone()
  }

  fn set_value(&self, value: &str) -> Result<(), Error> {
    *self.value.lock().unwrap() = Some(value.to_string());
    Ok(())
  }

  fn remove_value(&self) -> Result<(), Error> {
    *self.value.lock().unwrap() = None;
    Ok(())
  }
}

#[cfg(test)]
mod tests {
  use pretty_assertions::assert_eq;

  use super::*;

  #[test]
  fn test_memory_store_round_trip() {
    let store = MemoryFieldStore::new(Some("42".to_string()));
    assert_eq!(store.get_value(), Some("42".to_string()));

    store.set_value("99").unwrap();
    assert_eq!(store.get_value(), Some("99".to_string()));

    store.remove_value().unwrap();
    assert_eq!(store.get_value(), None);
  }
}
