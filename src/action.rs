use serde::{Deserialize, Serialize};
use strum::Display;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Display, Deserialize)]
pub enum Action {
  ActivateSelected,
  ClearSelection,
  DismissError,
  EndInputMode,
  Error(String),
  ExitError,
  FocusSearch,
  Initialize,
  LoadMoreProducts,
  Quit,
  Refresh,
  Render,
  Resize(u16, u16),
  Resume,
  SearchProducts(String),
  SelectNext,
  SelectPrevious,
  SelectProduct(String),
  StartInputMode,
  Suspend,
  Tick,
}
