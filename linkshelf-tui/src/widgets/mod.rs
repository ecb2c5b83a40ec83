//! Widgets for the link manager screen.
//!
//! Every widget borrows what it shows from the `LinkStore`; none of them
//! keeps state of its own.

mod form;
mod list;
mod overlays;
mod stats;

pub use form::LinkForm;
pub use list::{LinkCard, LinkList};
pub use overlays::{ConfirmDialog, LoadingOverlay, MessageOverlay, centered_rect};
pub use stats::StatsPanel;

use linkshelf_core::Category;
use linkshelf_core::category::{CategoryColor, color_for};
use ratatui::style::{Color, Modifier, Style};

pub fn category_color(color: CategoryColor) -> Color {
    match color {
        CategoryColor::Blue => Color::Blue,
        CategoryColor::Green => Color::Green,
        CategoryColor::Yellow => Color::Yellow,
        CategoryColor::Indigo => Color::Rgb(79, 70, 229),
        CategoryColor::Red => Color::Red,
        CategoryColor::Pink => Color::LightMagenta,
        CategoryColor::Purple => Color::Magenta,
        CategoryColor::Gray => Color::Gray,
        CategoryColor::Fallback => Color::White,
    }
}

/// Style of the `[label]` badge for a category.
pub fn badge_style(category: Category) -> Style {
    Style::default()
        .fg(Color::Black)
        .bg(category_color(color_for(category)))
        .add_modifier(Modifier::BOLD)
}

#[cfg(test)]
pub(crate) fn buffer_text(buffer: &ratatui::buffer::Buffer) -> String {
    buffer.content.iter().map(|c| c.symbol()).collect()
}
