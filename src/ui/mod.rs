//! Terminal UI components.
//!
//! This module contains all UI-related code including:
//! - [`render`]: Screen layout, editor pane and preview pane
//! - [`style`]: Theming and colors
//! - menu drop-downs and modal dialogs

pub mod style;

mod overlays;
mod render;
mod status;

pub use overlays::{menu_dropdown_rect, menu_item_at};
pub use render::{
    ScreenLayout, char_display_width, line_number_width, render, screen_layout,
};

/// Bounds for the editor share of the screen width, in percent.
pub const MIN_SPLIT_PERCENT: u16 = 10;
pub const MAX_SPLIT_PERCENT: u16 = 90;

#[cfg(test)]
mod tests;
