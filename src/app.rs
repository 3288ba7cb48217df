use color_eyre::eyre::Result;
use crossterm::event::KeyEvent;
use ratatui::prelude::Rect;
use tokio::sync::mpsc::{self, UnboundedSender};

use crate::{
  action::Action,
  components::{AsyncComponent, Component, ErrorView, ProductPickerView},
  config::Config,
  mode::Mode,
  picker::ProductPicker,
  tui::{self, Tui},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
  Picker,
  Error,
}

pub struct App {
  pub config: Config,
  pub picker_view: ProductPickerView,
  pub error_view: ErrorView,
  pub should_quit: bool,
  pub should_suspend: bool,
  pub mode: Mode,
  pub view: View,
  tick_rate: f64,
  frame_rate: f64,
}

impl App {
  pub fn new(config: Config, picker: ProductPicker, tick_rate: f64, frame_rate: f64) -> Self {
    Self {
      config,
      picker_view: ProductPickerView::new(picker),
      error_view: ErrorView::default(),
      should_quit: false,
      should_suspend: false,
      mode: Mode::Default,
      view: View::Picker,
      tick_rate,
      frame_rate,
    }
  }

  fn active_component(&mut self) -> &mut dyn AsyncComponent {
    match self.view {
      View::Picker => &mut self.picker_view,
      View::Error => &mut self.error_view,
    }
  }

  fn key_binding(&self, key: &KeyEvent) -> Option<Action> {
    match self.view {
      View::Picker => self.config.keybindings.action_for(self.mode, key),
      View::Error => None,
    }
  }

  /// Applies app level state changes, then lets the owning view react.
  async fn handle_action(&mut self, action: Action) -> Result<Option<Action>> {
    let action = match action {
      Action::Error(message) => {
        self.view = View::Error;
        return self.error_view.update(Action::Error(message)).await;
      },
      Action::ExitError => {
        self.view = View::Picker;
        return Ok(Some(Action::Render));
      },
      other => other,
    };
    match action {
      Action::StartInputMode => self.mode = Mode::Input,
      Action::EndInputMode => self.mode = Mode::Default,
      Action::Quit => self.should_quit = true,
      Action::Suspend => self.should_suspend = true,
      Action::Resume => self.should_suspend = false,
      _ => {},
    }
    self.picker_view.update(action).await
  }

  fn render(&mut self, tui: &mut Tui, action_tx: &UnboundedSender<Action>) -> Result<()> {
    let component = self.active_component();
    let mut result = Ok(());
    tui.draw(|f| result = component.draw(f, f.area()))?;
    if let Err(e) = result {
      action_tx.send(Action::Error(format!("Failed to draw: {:?}", e)))?;
    }
    Ok(())
  }

  pub async fn run(&mut self) -> Result<()> {
    let (action_tx, mut action_rx) = mpsc::unbounded_channel();

    let mut tui = Tui::new()?.tick_rate(self.tick_rate).frame_rate(self.frame_rate);
    tui.enter()?;

    self.picker_view.register_action_handler(action_tx.clone())?;
    self.error_view.register_action_handler(action_tx.clone())?;

    loop {
      if let Some(e) = tui.next().await {
        match e {
          tui::Event::Quit => action_tx.send(Action::Quit)?,
          tui::Event::Tick => action_tx.send(Action::Tick)?,
          tui::Event::Render => action_tx.send(Action::Render)?,
          tui::Event::Resize(x, y) => action_tx.send(Action::Resize(x, y))?,
          tui::Event::Key(key) => {
            if let Some(action) = self.key_binding(&key) {
              action_tx.send(action)?;
            }
          },
          _ => {},
        }

        if let Some(action) = self.active_component().handle_events(Some(e.clone())).await? {
          action_tx.send(action)?;
        }
      }

      while let Ok(action) = action_rx.try_recv() {
        if action != Action::Tick && action != Action::Render {
          log::debug!("{action:?}");
        }
        match action {
          Action::Resize(w, h) => {
            tui.resize(Rect::new(0, 0, w, h))?;
            self.render(&mut tui, &action_tx)?;
          },
          Action::Render => self.render(&mut tui, &action_tx)?,
          _ => {},
        }
        if let Some(action) = self.handle_action(action).await? {
          action_tx.send(action)?
        };
      }
      if self.should_suspend {
        tui.suspend()?;
        action_tx.send(Action::Resume)?;
        tui = Tui::new()?.tick_rate(self.tick_rate).frame_rate(self.frame_rate);
        tui.enter()?;
      } else if self.should_quit {
        tui.stop()?;
        break;
      }
    }
    tui.exit()?;
    Ok(())
  }
}

#[cfg(test)]
mod tests {
  use std::{collections::HashMap, sync::Arc};

  use crossterm::event::{KeyCode, KeyModifiers};
  use pretty_assertions::assert_eq;

  use super::*;
  use crate::{catalog::mock_catalog::MockCatalog, field::MemoryFieldStore};

  fn app() -> App {
    let picker = ProductPicker::new(Arc::new(MockCatalog::numbered(3)), Arc::new(MemoryFieldStore::new(None)));
    let mut config = Config::default();
    config.keybindings.insert(
      Mode::Default,
      HashMap::from([(KeyEvent::new(KeyCode::Char('q'), KeyModifiers::NONE), Action::Quit)]),
    );
    App::new(config, picker, 4.0, 30.0)
  }

  #[tokio::test]
  async fn test_input_mode_tracks_search_focus() {
    let mut app = app();

    app.handle_action(Action::StartInputMode).await.unwrap();
    assert_eq!(app.mode, Mode::Input);

    app.handle_action(Action::EndInputMode).await.unwrap();
    assert_eq!(app.mode, Mode::Default);
  }

  #[tokio::test]
  async fn test_keybindings_follow_mode() {
    let mut app = app();
    let q = KeyEvent::new(KeyCode::Char('q'), KeyModifiers::NONE);

    assert_eq!(app.key_binding(&q), Some(Action::Quit));

    app.mode = Mode::Input;
    assert_eq!(app.key_binding(&q), None);
  }

  #[tokio::test]
  async fn test_error_view_round_trip() {
    let mut app = app();

    let next = app.handle_action(Action::Error("Store error: read only".to_string())).await.unwrap();
    assert_eq!(next, Some(Action::Render));
    assert_eq!(app.view, View::Error);
    assert_eq!(app.error_view.message(), Some("Store error: read only"));

    let q = KeyEvent::new(KeyCode::Char('q'), KeyModifiers::NONE);
    assert_eq!(app.key_binding(&q), None);

    let next = app.handle_action(Action::ExitError).await.unwrap();
    assert_eq!(next, Some(Action::Render));
    assert_eq!(app.view, View::Picker);
  }

  #[tokio::test]
  async fn test_quit() {
    let mut app = app();

    app.handle_action(Action::Quit).await.unwrap();

    assert!(app.should_quit);
  }
}
