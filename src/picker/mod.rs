pub mod product_picker;
pub mod state;

pub use product_picker::ProductPicker;
pub use state::{Applied, Phase, PickerError, PickerErrorKind, PickerState};
