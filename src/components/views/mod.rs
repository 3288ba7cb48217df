pub mod error_view;
pub mod product_picker;

pub use error_view::ErrorView;
pub use product_picker::ProductPickerView;
