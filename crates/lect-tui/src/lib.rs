//! lect-tui: Terminal UI components
//!
//! Presentation glue on top of ratatui and crossterm: input actions, theme,
//! and the widgets the session screen is built from. No session or playback
//! state lives here.

pub mod input;
pub mod theme;
pub mod widgets;

pub use theme::Theme;
