use color_eyre::Result;
use ratatui::layout::Rect;
use tokio::sync::mpsc::UnboundedSender;

use crate::{
  action::Action,
  tui::{Event, Frame},
};

pub mod shared;
pub mod views;

pub use views::{ErrorView, ProductPickerView};

pub trait Component: Send + Sync {
  /// Register an action handler that can send actions for processing if necessary.
  fn register_action_handler(&mut self, _tx: UnboundedSender<Action>) -> Result<()> {
    Ok(())
  }

  /// Render the component on the screen.
  fn draw(&mut self, frame: &mut Frame<'_>, area: Rect) -> Result<()>;
}

#[async_trait::async_trait]
pub trait AsyncComponent: Component {
  /// Handle an incoming event and produce an action if necessary.
  async fn handle_events(&mut self, event: Option<Event>) -> Result<Option<Action>>;

  /// Update the state of the component based on a received action.
  async fn update(&mut self, action: Action) -> Result<Option<Action>>;
}
