use std::sync::{Arc, Mutex};

use tracing::info;

use super::state::{Applied, PickerState};
use crate::{catalog::ProductCatalog, error::Error, field::FieldStore};

/// Drives a [`PickerState`] against a catalog and the host field store.
///
/// Cheap to clone; clones share the same state, so operations can be spawned
/// onto separate tasks. The state lock is never held across a request.
#[derive(Clone)]
pub struct ProductPicker {
  catalog: Arc<dyn ProductCatalog>,
  field: Arc<dyn FieldStore>,
  state: Arc<Mutex<PickerState>>,
}

impl ProductPicker {
  pub fn new(catalog: Arc<dyn ProductCatalog>, field: Arc<dyn FieldStore>) -> Self {
    ProductPicker { catalog, field, state: Arc::new(Mutex::new(PickerState::default())) }
  }

  pub fn snapshot(&self) -> PickerState {
    self.state.lock().unwrap().clone()
  }

  /// The stored product id, if the field holds a non-empty value.
  pub fn stored_value(&self) -> Option<String> {
    self.field.get_value().filter(|value| !value.is_empty())
  }

  /// Resolves the stored id to a product and loads the first, unfiltered page.
  /// Both requests run concurrently and each result is applied as soon as it
  /// arrives.
  pub async fn initialize(&self) {
    let stored = self.stored_value();
    info!("Initializing picker, stored value {:?}", stored);

    let lookup_ticket = stored.as_deref().map(|id| self.state.lock().unwrap().begin_lookup(id));
    let page_ticket = self.state.lock().unwrap().begin_initial_page();

    let lookup = async {
      if let Some(ticket) = &lookup_ticket {
        let result = self.catalog.product(&ticket.id).await;
        self.state.lock().unwrap().apply_lookup(ticket, result);
      }
    };
    let page = async {
      let result = self.catalog.products(&page_ticket.query).await;
      self.state.lock().unwrap().apply_page(&page_ticket, result);
    };
    tokio::join!(lookup, page);
  }

  pub async fn search(&self, term: &str) -> Applied {
    info!("Searching products for {:?}", term);
    let ticket = self.state.lock().unwrap().begin_search(term);
    let result = self.catalog.products(&ticket.query).await;
    self.state.lock().unwrap().apply_page(&ticket, result)
  }

  /// Fetches the next page. Returns `None` without a request when there is
  /// nothing more to load or a list request is already pending.
  pub async fn load_more(&self) -> Option<Applied> {
    let ticket = self.state.lock().unwrap().begin_load_more();
    let Some(ticket) = ticket else {
      info!("Ignoring load more, nothing to load or a request is pending");
      return None;
    };
    info!("Loading more products from offset {}", ticket.query.offset);
    let result = self.catalog.products(&ticket.query).await;
    Some(self.state.lock().unwrap().apply_page(&ticket, result))
  }

  /// Stores `id` in the field, then resolves it to a product for display.
  /// An empty id clears the selection instead.
  pub async fn select(&self, id: &str) -> Result<Applied, Error> {
    if id.is_empty() {
      self.clear_selection()?;
      return Ok(Applied::Current);
    }

    info!("Selecting product {}", id);
    self.field.set_value(id)?;
    let ticket = self.state.lock().unwrap().begin_lookup(id);
    let result = self.catalog.product(id).await;
    Ok(self.state.lock().unwrap().apply_lookup(&ticket, result))
  }

  pub fn clear_selection(&self) -> Result<(), Error> {
    info!("Clearing product selection");
    self.field.remove_value()?;
    self.state.lock().unwrap().clear_selection();
    Ok(())
  }

  pub fn dismiss_error(&self) {
    self.state.lock().unwrap().dismiss_error();
  }

  pub fn display_label(&self) -> String {
    self.state.lock().unwrap().display_label(self.field.get_value().as_deref())
  }
}
