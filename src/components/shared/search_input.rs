use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
  layout::Rect,
  prelude::Color,
  style::Style,
  widgets::{Block, Borders},
};
use tui_textarea::{CursorMove, Input, TextArea};

use crate::{action::Action, tui::Frame};

/// Single line search box. Enter submits whatever is typed, including nothing,
/// which searches the whole catalog.
#[derive(Debug)]
pub struct SearchInput {
  text_input: TextArea<'static>,
}

impl Default for SearchInput {
  fn default() -> Self {
    let mut search_input = SearchInput { text_input: TextArea::default() };
    search_input.text_input.set_placeholder_text("Search");
    search_input.set_focused(false);
    search_input
  }
}

impl SearchInput {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn set_focused(&mut self, focused: bool) {
    let color = if focused { Color::LightGreen } else { Color::White };
    self.text_input.set_style(Style::default().fg(Color::White));
    self.text_input.set_block(Block::default().borders(Borders::ALL).border_style(Style::default().fg(color)).title("Search"));
    self.text_input.set_cursor_style(if focused { Style::default().bg(Color::White) } else { Style::default() });
  }

  pub fn get_text(&self) -> String {
    self.text_input.lines().first().map(|line| String::from(line.trim())).unwrap_or_default()
  }

  pub fn clear(&mut self) {
    self.text_input.move_cursor(CursorMove::Head);
    self.text_input.delete_line_by_end();
  }

  pub fn handle_key_event(&mut self, key_event: KeyEvent) -> Option<Action> {
    match key_event {
      KeyEvent { code: KeyCode::Esc, .. } => Some(Action::EndInputMode),
      KeyEvent { code: KeyCode::Enter, .. } => Some(Action::SearchProducts(self.get_text())),
      _ => {
        self.text_input.input(Input::from(key_event));
        None
      },
    }
  }

  pub fn render(&self, f: &mut Frame<'_>, area: Rect) {
    f.render_widget(&self.text_input, area);
  }
}

#[cfg(test)]
mod tests {
  use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
  use pretty_assertions::assert_eq;

  use super::*;

  fn press(code: KeyCode) -> KeyEvent {
    KeyEvent::new(code, KeyModifiers::NONE)
  }

  #[test]
  fn test_get_text_trims() {
    let mut search_input = SearchInput::new();
    search_input.text_input.insert_str("  red shoe ");

    assert_eq!(search_input.get_text(), "red shoe");
  }

  #[test]
  fn test_typing_then_enter_submits_search() {
    let mut search_input = SearchInput::new();

    assert_eq!(search_input.handle_key_event(press(KeyCode::Char('h'))), None);
    assert_eq!(search_input.handle_key_event(press(KeyCode::Char('i'))), None);
    let action = search_input.handle_key_event(press(KeyCode::Enter));

    assert_eq!(action, Some(Action::SearchProducts("hi".to_string())));
    assert_eq!(search_input.get_text(), "hi");
  }

  #[test]
  fn test_enter_on_empty_input_searches_everything() {
    let mut search_input = SearchInput::new();

    assert_eq!(search_input.handle_key_event(press(KeyCode::Enter)), Some(Action::SearchProducts(String::new())));
  }

  #[test]
  fn test_escape_keeps_text() {
    let mut search_input = SearchInput::new();
    search_input.text_input.insert_str("boot");

    assert_eq!(search_input.handle_key_event(press(KeyCode::Esc)), Some(Action::EndInputMode));
    assert_eq!(search_input.get_text(), "boot");
  }

  #[test]
  fn test_clear() {
    let mut search_input = SearchInput::new();
    search_input.text_input.insert_str("boot");

    search_input.clear();

    assert_eq!(search_input.get_text(), "");
  }
}
