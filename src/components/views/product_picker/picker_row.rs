use ratatui::{
  style::{Color, Modifier, Style},
  text::{Line, Span},
  widgets::ListItem,
};

use crate::{catalog::Product, picker::PickerState};

/// One line of the product dropdown.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PickerRow {
  ChooseProduct,
  Product(Product),
  LoadMore,
}

impl PickerRow {
  /// The blank "Choose product" row, every loaded product, then "Load more"
  /// while another page may exist.
  pub fn rows_for(state: &PickerState) -> Vec<PickerRow> {
    let mut rows = Vec::with_capacity(state.items.len() + 2);
    rows.push(PickerRow::ChooseProduct);
    rows.extend(state.items.iter().cloned().map(PickerRow::Product));
    if state.can_load_more {
      rows.push(PickerRow::LoadMore);
    }
    rows
  }

  pub fn render(&self, active_id: Option<&str>) -> ListItem<'static> {
    let line = match self {
      PickerRow::ChooseProduct => {
        Line::from(Span::styled("Choose product", Style::default().add_modifier(Modifier::DIM | Modifier::ITALIC)))
      },
      PickerRow::Product(product) => {
        let is_active = active_id == Some(product.id.as_str());
        let name_style = if is_active { Style::default().fg(Color::LightGreen) } else { Style::default() };
        let mut parts = vec![
          Span::styled(product.name.clone(), name_style),
          Span::styled(format!(" #{}", product.id), Style::default().add_modifier(Modifier::DIM)),
        ];
        if is_active {
          parts.push(Span::styled(" (selected)", Style::default().add_modifier(Modifier::DIM)));
        }
        Line::from(parts)
      },
      PickerRow::LoadMore => Line::from(Span::styled("Load more", Style::default().fg(Color::Cyan))),
    };
    ListItem::from(line)
  }
}

#[cfg(test)]
mod tests {
  use pretty_assertions::assert_eq;

  use super::*;

  fn state_with(items: Vec<Product>, can_load_more: bool) -> PickerState {
    let mut state = PickerState::default();
    state.items = items;
    state.can_load_more = can_load_more;
    state
  }

  #[test]
  fn test_rows_without_more_results() {
    let state = state_with(vec![Product::new("1", "Shoe")], false);

    assert_eq!(PickerRow::rows_for(&state), vec![PickerRow::ChooseProduct, PickerRow::Product(Product::new("1", "Shoe"))]);
  }

  #[test]
  fn test_rows_with_more_results() {
    let state = state_with(vec![Product::new("1", "Shoe")], true);
    let rows = PickerRow::rows_for(&state);

    assert_eq!(rows.len(), 3);
    assert_eq!(rows.last(), Some(&PickerRow::LoadMore));
  }

  #[test]
  fn test_empty_state_only_offers_blank_row() {
    assert_eq!(PickerRow::rows_for(&PickerState::default()), vec![PickerRow::ChooseProduct]);
  }
}
