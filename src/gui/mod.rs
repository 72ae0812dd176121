//! GUI module for the Wtview application
//!
//! This module provides the graphical user interface built with egui/eframe.
//!
//! ## Module Structure
//!
//! - `app` - Main GuiApp struct, section navigation, and source wiring
//! - `theme` - Centralized theme and styling (AppTheme)
//! - `notifications` - Notification feed entries (new-tip events, actions)
//! - `views` - View rendering functions (history table, settings)
//!
//! ## Usage
//!
//! ```no_run
//! use wtview::config::Config;
//! use wtview::gui;
//!
//! let config = Config::default();
//! gui::launch(config).expect("Failed to launch GUI");
//! ```

mod app;
pub mod notifications;
pub mod theme;
pub mod views;

// Re-export main public API
pub use app::{launch, GuiApp, GuiSection};

pub use notifications::NotificationEntry;
pub use theme::{configure_style, AppTheme};
