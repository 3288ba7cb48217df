use std::{future::Future, time::SystemTime};

use color_eyre::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::{
  layout::{Constraint, Direction, Layout, Rect},
  style::{Color, Modifier, Style},
  text::{Line, Span},
  widgets::{Block, Borders, List, ListItem, ListState, Paragraph},
};
use tokio::{sync::mpsc::UnboundedSender, task::spawn};
use tracing::{error, info, warn};

use super::picker_row::PickerRow;
use crate::{
  action::Action,
  components::{
    AsyncComponent, Component,
    shared::{InstructionFooter, SearchInput},
  },
  error::Error,
  picker::{Phase, ProductPicker},
  tui::{Event, Frame},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
  Selection,
  Input,
}

pub struct ProductPickerView {
  picker: ProductPicker,
  mode: Mode,
  selected_index: usize,
  list_state: ListState,
  search_input: SearchInput,
  instruction_footer: InstructionFooter,
  action_tx: Option<UnboundedSender<Action>>,
  loading_since: Option<SystemTime>,
}

impl ProductPickerView {
  pub fn new(picker: ProductPicker) -> Self {
    ProductPickerView {
      picker,
      mode: Mode::Selection,
      selected_index: 0,
      list_state: ListState::default(),
      search_input: SearchInput::new(),
      instruction_footer: InstructionFooter::default(),
      action_tx: None,
      loading_since: None,
    }
  }

  fn send_action(&self, action: Action) {
    if let Some(tx) = &self.action_tx {
      if let Err(e) = tx.send(action) {
        error!("Failed to send action: {}", e);
      }
    }
  }

  /// Runs a picker operation in the background and asks for a redraw once it
  /// settles. Only field store failures surface as `Action::Error`; request
  /// failures are kept in the picker state and shown inline.
  fn spawn_operation<F>(&self, operation: F)
  where
    F: Future<Output = Result<(), Error>> + Send + 'static,
  {
    let tx = self.action_tx.clone();
    self.send_action(Action::Render);
    spawn(async move {
      let result = operation.await;
      if let Some(tx) = tx {
        if let Err(err) = result {
          error!("{}", err);
          let _ = tx.send(Action::Error(err.to_string()));
        }
        let _ = tx.send(Action::Render);
      }
    });
  }

  fn rows(&self) -> Vec<PickerRow> {
    PickerRow::rows_for(&self.picker.snapshot())
  }

  fn select_next(&mut self) {
    let count = self.rows().len();
    self.selected_index = if self.selected_index + 1 >= count { 0 } else { self.selected_index + 1 };
  }

  fn select_previous(&mut self) {
    let count = self.rows().len();
    self.selected_index = if self.selected_index == 0 || self.selected_index >= count {
      count.saturating_sub(1)
    } else {
      self.selected_index - 1
    };
  }

  fn selected_row(&self) -> Option<PickerRow> {
    self.rows().get(self.selected_index).cloned()
  }

  fn activate_selected(&self) -> Option<Action> {
    let action = match self.selected_row()? {
      PickerRow::ChooseProduct => Action::ClearSelection,
      PickerRow::Product(product) => Action::SelectProduct(product.id),
      PickerRow::LoadMore => Action::LoadMoreProducts,
    };
    Some(action)
  }

  fn set_mode(&mut self, mode: Mode) {
    self.mode = mode;
    self.search_input.set_focused(mode == Mode::Input);
  }

  fn handle_key_events(&mut self, key: KeyEvent) -> Option<Action> {
    if self.mode == Mode::Input {
      return self.search_input.handle_key_event(key);
    }
    match key {
      KeyEvent { code: KeyCode::Up, .. } => Some(Action::SelectPrevious),
      KeyEvent { code: KeyCode::Down, .. } => Some(Action::SelectNext),
      KeyEvent { code: KeyCode::Enter, .. } => Some(Action::ActivateSelected),
      KeyEvent { code: KeyCode::Char('/'), .. } => Some(Action::FocusSearch),
      KeyEvent { code: KeyCode::Char('m' | 'M'), modifiers: KeyModifiers::NONE | KeyModifiers::SHIFT, .. } => {
        Some(Action::LoadMoreProducts)
      },
      KeyEvent { code: KeyCode::Char('r' | 'R'), modifiers: KeyModifiers::NONE | KeyModifiers::SHIFT, .. } => {
        Some(Action::Refresh)
      },
      KeyEvent { code: KeyCode::Esc, .. } if self.picker.snapshot().last_error().is_some() => Some(Action::DismissError),
      _ => None,
    }
  }

  fn instructions(&self, has_error: bool) -> Vec<&'static str> {
    if self.mode == Mode::Input {
      return vec!["Enter: Search", "Esc: Back to list"];
    }
    let mut instructions = vec!["↑/↓: Move", "Enter: Choose", "/: Search", "M: Load more", "R: Reset search"];
    if has_error {
      instructions.push("Esc: Dismiss error");
    }
    instructions.push("Q: Quit");
    instructions
  }

  fn render_list(&mut self, f: &mut Frame<'_>, area: Rect, rows: &[PickerRow], title: String, active_id: Option<&str>) {
    let render_items: Vec<ListItem> = rows.iter().map(|row| row.render(active_id)).collect();
    let list = List::new(render_items)
      .block(Block::default().title(title).borders(Borders::ALL))
      .style(Style::default().fg(Color::White))
      .highlight_style(Style::default().add_modifier(Modifier::BOLD))
      .highlight_symbol("→")
      .repeat_highlight_symbol(true);

    if self.selected_index >= rows.len() {
      self.selected_index = rows.len().saturating_sub(1);
    }
    self.list_state.select(Some(self.selected_index));
    f.render_stateful_widget(list, area, &mut self.list_state);
  }
}

impl Component for ProductPickerView {
  fn register_action_handler(&mut self, tx: UnboundedSender<Action>) -> Result<()> {
    self.action_tx = Some(tx);
    self.send_action(Action::Initialize);
    Ok(())
  }

  fn draw(&mut self, frame: &mut Frame<'_>, area: Rect) -> Result<()> {
    let state = self.picker.snapshot();
    let label = self.picker.display_label();
    let rows = PickerRow::rows_for(&state);

    let mut title = if state.search_term.is_empty() {
      String::from("Products")
    } else {
      format!("Products matching \"{}\"", state.search_term)
    };
    if state.phase() == Phase::Ready && state.items.is_empty() {
      title = format!("{} - no matches", title);
    }
    if state.is_loading() {
      let since = *self.loading_since.get_or_insert_with(SystemTime::now);
      title = format!("{} - Loading...({})", title, format_time_elapsed(since));
    } else {
      self.loading_since = None;
    }

    let chunks = Layout::default()
      .direction(Direction::Vertical)
      .constraints([
        Constraint::Length(1),
        Constraint::Length(3),
        Constraint::Min(3),
        Constraint::Length(if state.last_error().is_some() { 1 } else { 0 }),
        Constraint::Length(3),
      ])
      .split(area);

    let selection = Paragraph::new(Line::from(vec![
      Span::styled("Current selection: ", Style::default().add_modifier(Modifier::DIM)),
      Span::styled(label, Style::default().add_modifier(Modifier::BOLD)),
    ]));
    frame.render_widget(selection, chunks[0]);

    self.search_input.render(frame, chunks[1]);

    let active_id = state.active_product.as_ref().map(|product| product.id.clone()).or_else(|| self.picker.stored_value());
    self.render_list(frame, chunks[2], &rows, title, active_id.as_deref());

    if let Some(err) = state.last_error() {
      let message = Paragraph::new(format!("{} error: {}", err.kind, err.message)).style(Style::default().fg(Color::Red));
      frame.render_widget(message, chunks[3]);
    }

    let instructions = self.instructions(state.last_error().is_some());
    self.instruction_footer.render(frame, chunks[4], &instructions);
    Ok(())
  }
}

#[async_trait::async_trait]
impl AsyncComponent for ProductPickerView {
  async fn handle_events(&mut self, event: Option<Event>) -> Result<Option<Action>> {
    match event {
      Some(Event::Key(key)) => Ok(self.handle_key_events(key)),
      _ => Ok(None),
    }
  }

  async fn update(&mut self, action: Action) -> Result<Option<Action>> {
    match action {
      Action::Initialize => {
        let picker = self.picker.clone();
        self.spawn_operation(async move {
          picker.initialize().await;
          Ok(())
        });
        Ok(None)
      },
      Action::SelectNext => {
        self.select_next();
        Ok(Some(Action::Render))
      },
      Action::SelectPrevious => {
        self.select_previous();
        Ok(Some(Action::Render))
      },
      Action::ActivateSelected => Ok(self.activate_selected()),
      Action::FocusSearch => {
        self.set_mode(Mode::Input);
        Ok(Some(Action::StartInputMode))
      },
      Action::EndInputMode => {
        self.set_mode(Mode::Selection);
        Ok(Some(Action::Render))
      },
      Action::SearchProducts(term) => {
        info!("ProductPicker: searching for {:?}", term);
        self.selected_index = 0;
        let picker = self.picker.clone();
        self.spawn_operation(async move {
          picker.search(&term).await;
          Ok(())
        });
        if self.mode == Mode::Input {
          self.set_mode(Mode::Selection);
          return Ok(Some(Action::EndInputMode));
        }
        Ok(None)
      },
      Action::Refresh => {
        self.search_input.clear();
        Ok(Some(Action::SearchProducts(String::new())))
      },
      Action::LoadMoreProducts => {
        let picker = self.picker.clone();
        self.spawn_operation(async move {
          picker.load_more().await;
          Ok(())
        });
        Ok(None)
      },
      Action::SelectProduct(id) => {
        info!("ProductPicker: selecting {}", id);
        let picker = self.picker.clone();
        self.spawn_operation(async move { picker.select(&id).await.map(|_| ()) });
        Ok(None)
      },
      Action::ClearSelection => match self.picker.clear_selection() {
        Ok(()) => Ok(Some(Action::Render)),
        Err(err) => {
          error!("{}", err);
          Ok(Some(Action::Error(err.to_string())))
        },
      },
      Action::DismissError => {
        self.picker.dismiss_error();
        Ok(Some(Action::Render))
      },
      _ => Ok(None),
    }
  }
}

fn format_time_elapsed(time: SystemTime) -> String {
  match time.elapsed() {
    Ok(elapsed) => format!("{:.1}s", elapsed.as_secs_f64()),
    Err(err) => {
      warn!("Failed to get system time {}", err);
      String::from("xs")
    },
  }
}
