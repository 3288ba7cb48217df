use color_eyre::Result;
use crossterm::event::KeyCode;
use ratatui::{
  layout::{Constraint, Direction, Layout, Rect},
  style::{Color, Style},
  widgets::{Block, Borders, Paragraph, Wrap},
};

use crate::{
  action::Action,
  components::{AsyncComponent, Component, shared::InstructionFooter},
  tui::{Event, Frame},
};

/// Full screen report for failures that are not tied to a catalog request,
/// such as the field store refusing a write.
#[derive(Default)]
pub struct ErrorView {
  message: Option<String>,
  scroll: u16,
  last_height: u16,
  instruction_footer: InstructionFooter,
}

impl ErrorView {
  pub fn set_message(&mut self, message: String) {
    self.scroll = 0;
    self.message = Some(message);
  }

  pub fn message(&self) -> Option<&str> {
    self.message.as_deref()
  }

  fn dismiss(&mut self) {
    self.scroll = 0;
    self.message = None;
    self.last_height = 0;
  }

  fn has_scrolled_to_bottom(&self) -> bool {
    match &self.message {
      Some(message) => {
        let total_lines = message.lines().count() as u16;
        self.scroll + self.last_height >= total_lines
      },
      None => true,
    }
  }
}

impl Component for ErrorView {
  fn draw(&mut self, frame: &mut Frame<'_>, area: Rect) -> Result<()> {
    let chunks =
      Layout::default().direction(Direction::Vertical).constraints([Constraint::Min(3), Constraint::Length(3)]).split(area);

    self.last_height = chunks[0].height.saturating_sub(2);
    let message = self.message.clone().unwrap_or_default();
    let paragraph = Paragraph::new(message)
      .block(Block::default().title("Error").style(Style::default().fg(Color::Red)).borders(Borders::ALL))
      .wrap(Wrap { trim: false })
      .scroll((self.scroll, 0));
    frame.render_widget(paragraph, chunks[0]);

    self.instruction_footer.render(frame, chunks[1], &["↑/↓: Scroll", "Any other key: Back to products"]);
    Ok(())
  }
}

#[async_trait::async_trait]
impl AsyncComponent for ErrorView {
  async fn handle_events(&mut self, event: Option<Event>) -> Result<Option<Action>> {
    let Some(Event::Key(key)) = event else {
      return Ok(None);
    };
    let action = match key.code {
      KeyCode::Up => {
        self.scroll = self.scroll.saturating_sub(1);
        None
      },
      KeyCode::Down => {
        if !self.has_scrolled_to_bottom() {
          self.scroll += 1;
        }
        None
      },
      _ => {
        self.dismiss();
        Some(Action::ExitError)
      },
    };
    Ok(action)
  }

  async fn update(&mut self, action: Action) -> Result<Option<Action>> {
    if let Action::Error(message) = action {
      self.set_message(message);
      return Ok(Some(Action::Render));
    }
    Ok(None)
  }
}
