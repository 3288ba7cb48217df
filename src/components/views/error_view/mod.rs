pub mod view;

pub use view::ErrorView;
