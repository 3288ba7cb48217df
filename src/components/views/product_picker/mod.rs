pub mod picker_row;
pub mod picker_view;

pub use picker_row::PickerRow;
pub use picker_view::ProductPickerView;
