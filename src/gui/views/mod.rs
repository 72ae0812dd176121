//! View rendering functions, one module per section.

pub mod history;
pub mod settings;

pub use history::view_history;
pub use settings::view_settings;
