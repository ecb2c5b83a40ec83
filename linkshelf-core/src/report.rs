// Plain-text rendering of links and stats for the CLI

use crate::category::{CategoryColor, color_for};
use colored::{Color, Colorize};
use linkshelf_api::{Category, Link, StatEntry};

pub const EMPTY_LINKS_TEXT: &str = "You haven't saved any links yet!";
pub const EMPTY_STATS_TEXT: &str = "No saved links to show statistics for.";

const RULE: &str = "━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━";
const BAR_WIDTH: usize = 30;

/// Share of `count` in `total`, as a percentage. Zero when there is no total.
pub fn share_percent(count: u64, total: u64) -> f64 {
    if total == 0 {
        0.0
    } else {
        count as f64 / total as f64 * 100.0
    }
}

pub fn terminal_color(color: CategoryColor) -> Color {
    match color {
        CategoryColor::Blue => Color::Blue,
        CategoryColor::Green => Color::Green,
        CategoryColor::Yellow => Color::Yellow,
        CategoryColor::Indigo => Color::TrueColor {
            r: 79,
            g: 70,
            b: 229,
        },
        CategoryColor::Red => Color::Red,
        CategoryColor::Pink => Color::BrightMagenta,
        CategoryColor::Purple => Color::Magenta,
        CategoryColor::Gray => Color::BrightBlack,
        CategoryColor::Fallback => Color::White,
    }
}

fn badge(category: Category) -> String {
    format!("[{}]", category)
        .color(terminal_color(color_for(category)))
        .bold()
        .to_string()
}

/// Render the links in the order given, one card per link.
pub fn generate_link_report(links: &[Link]) -> String {
    let mut report = String::new();
    report.push_str(&format!("{}\n\n", RULE));
    report.push_str(&format!("# Your Saved Links ({})\n\n", links.len()));

    if links.is_empty() {
        report.push_str(&format!("  {}\n", EMPTY_LINKS_TEXT));
        report.push_str("  Use `linkshelf add --url <URL>` to get started.\n");
        return report;
    }

    for link in links {
        report.push_str(&format!(
            "  {} {}\n",
            link.display_title().bold(),
            badge(link.category)
        ));
        report.push_str(&format!("    {}\n", link.url.dimmed()));
        report.push_str(&format!("    id: {}\n\n", link.id));
    }

    report
}

/// Render per-category stats with proportional bars.
pub fn generate_stats_report(stats: &[StatEntry], total: u64) -> String {
    let mut report = String::new();
    report.push_str(&format!("{}\n\n", RULE));
    report.push_str("# Statistics by Category\n\n");

    if total == 0 {
        report.push_str(&format!("  {}\n", EMPTY_STATS_TEXT));
        return report;
    }

    report.push_str(&format!("  Total links: {}\n\n", total));

    let label_width = stats
        .iter()
        .map(|s| s.category.as_str().chars().count())
        .max()
        .unwrap_or(0);

    for stat in stats {
        let percent = share_percent(stat.count, total);
        let filled = ((percent / 100.0) * BAR_WIDTH as f64).round() as usize;
        let bar = format!(
            "{}{}",
            "█".repeat(filled),
            "░".repeat(BAR_WIDTH.saturating_sub(filled))
        );
        let label = stat.category.as_str();
        let padding = " ".repeat(label_width - label.chars().count());

        report.push_str(&format!(
            "  {}{}  {} {} ({:.0}%)\n",
            label,
            padding,
            bar.color(terminal_color(color_for(stat.category))),
            stat.count,
            percent
        ));
    }

    report
}
