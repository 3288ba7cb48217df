use strum::Display;
use tracing::{debug, warn};

use crate::{
  catalog::{PageQuery, Product},
  error::Error,
};

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Display)]
pub enum Phase {
  #[default]
  Idle,
  Loading,
  Ready,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum PickerErrorKind {
  Network,
  NotFound,
  Config,
  Other,
}

/// A failed request, kept around so it can be shown inline next to the picker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PickerError {
  pub kind: PickerErrorKind,
  pub message: String,
}

impl From<&Error> for PickerError {
  fn from(err: &Error) -> Self {
    let kind = match err {
      Error::Network(_) => PickerErrorKind::Network,
      Error::NotFound(_) => PickerErrorKind::NotFound,
      Error::Config(_) => PickerErrorKind::Config,
      _ => PickerErrorKind::Other,
    };
    PickerError { kind, message: err.to_string() }
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListUpdate {
  Replace,
  Append,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListTicket {
  generation: u64,
  update: ListUpdate,
  pub query: PageQuery,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LookupTicket {
  generation: u64,
  pub id: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Applied {
  Current,
  Stale,
}

/// View state of the picker. Every request is split into a `begin_*` call that
/// hands out a ticket and an `apply_*` call that folds the response back in;
/// responses whose ticket was superseded in the meantime are dropped.
///
/// `search_term` always names the filter `items` were fetched with, so it only
/// changes once a search response lands.
#[derive(Debug, Default, Clone)]
pub struct PickerState {
  pub items: Vec<Product>,
  pub can_load_more: bool,
  pub search_term: String,
  pub active_product: Option<Product>,
  list_error: Option<PickerError>,
  lookup_error: Option<PickerError>,
  phase: Phase,
  list_generation: u64,
  selection_generation: u64,
  list_in_flight: bool,
  lookup_in_flight: bool,
}

impl PickerState {
  pub fn phase(&self) -> Phase {
    self.phase
  }

  pub fn is_loading(&self) -> bool {
    self.list_in_flight || self.lookup_in_flight
  }

  /// The failure to show inline. List and lookup failures are tracked apart so
  /// a successful page does not hide a failed lookup, and the other way round.
  pub fn last_error(&self) -> Option<&PickerError> {
    self.list_error.as_ref().or(self.lookup_error.as_ref())
  }

  pub fn begin_initial_page(&mut self) -> ListTicket {
    self.phase = Phase::Loading;
    self.begin_search("")
  }

  pub fn begin_search(&mut self, term: &str) -> ListTicket {
    self.list_generation += 1;
    self.list_in_flight = true;
    ListTicket {
      generation: self.list_generation,
      update: ListUpdate::Replace,
      query: PageQuery::first_page(term),
    }
  }

  /// Returns `None` when there is nothing more to load or another list request
  /// is still pending.
  pub fn begin_load_more(&mut self) -> Option<ListTicket> {
    if !self.can_load_more || self.list_in_flight {
      return None;
    }
    self.list_in_flight = true;
    Some(ListTicket {
      generation: self.list_generation,
      update: ListUpdate::Append,
      query: PageQuery::next_page(self.items.len(), &self.search_term),
    })
  }

  pub fn apply_page(&mut self, ticket: &ListTicket, result: Result<Vec<Product>, Error>) -> Applied {
    if ticket.generation != self.list_generation {
      debug!("Dropping stale page for {:?}", ticket.query);
      return Applied::Stale;
    }
    self.list_in_flight = false;
    self.phase = Phase::Ready;

    match result {
      Ok(page) => {
        self.can_load_more = ticket.query.is_full_page(page.len());
        match ticket.update {
          ListUpdate::Replace => {
            self.items = page;
            self.search_term = ticket.query.search.clone();
          },
          ListUpdate::Append => self.items.extend(page),
        }
        self.list_error = None;
      },
      Err(err) => {
        warn!("Failed to load products: {}", err);
        self.list_error = Some(PickerError::from(&err));
      },
    }
    Applied::Current
  }

  pub fn begin_lookup(&mut self, id: &str) -> LookupTicket {
    self.selection_generation += 1;
    self.lookup_in_flight = true;
    LookupTicket { generation: self.selection_generation, id: id.to_string() }
  }

  pub fn apply_lookup(&mut self, ticket: &LookupTicket, result: Result<Product, Error>) -> Applied {
    if ticket.generation != self.selection_generation {
      debug!("Dropping stale lookup for {}", ticket.id);
      return Applied::Stale;
    }
    self.lookup_in_flight = false;

    match result {
      Ok(product) => {
        self.active_product = Some(Product::new(product.id, product.name));
        self.lookup_error = None;
      },
      Err(err) => {
        warn!("Failed to look up product {}: {}", ticket.id, err);
        // Keep the previous product only while it still describes the stored id.
        if self.active_product.as_ref().is_some_and(|product| product.id != ticket.id) {
          self.active_product = None;
        }
        self.lookup_error = Some(PickerError::from(&err));
      },
    }
    Applied::Current
  }

  pub fn clear_selection(&mut self) {
    self.selection_generation += 1;
    self.lookup_in_flight = false;
    self.active_product = None;
    self.lookup_error = None;
  }

  pub fn dismiss_error(&mut self) {
    self.list_error = None;
    self.lookup_error = None;
  }

  pub fn display_label(&self, stored_value: Option<&str>) -> String {
    if let Some(product) = self.active_product.as_ref().filter(|product| !product.name.is_empty()) {
      return product.name.clone();
    }
    match stored_value {
      Some(value) if !value.is_empty() => value.to_string(),
      _ => String::from("none"),
    }
  }
}
