use super::category_color;
use linkshelf_core::StatEntry;
use linkshelf_core::category::color_for;
use linkshelf_core::report::{EMPTY_STATS_TEXT, share_percent};
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Widget, Wrap},
};

/// Per-category counts with a proportional bar for each.
pub struct StatsPanel<'a> {
    stats: &'a [StatEntry],
    total: u64,
}

impl<'a> StatsPanel<'a> {
    pub fn new(stats: &'a [StatEntry], total: u64) -> Self {
        Self { stats, total }
    }

    fn rows(&self, width: u16) -> Vec<Line<'a>> {
        let label_width = self
            .stats
            .iter()
            .map(|s| s.category.as_str().chars().count())
            .max()
            .unwrap_or(0);
        // label, two spaces, bar, then " count (pct%)"
        let bar_width = (width as usize)
            .saturating_sub(label_width + 14)
            .max(1);

        let mut lines = vec![
            Line::from(vec![
                Span::raw("Total links: "),
                Span::styled(
                    self.total.to_string(),
                    Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
                ),
            ]),
            Line::from(""),
        ];

        for stat in self.stats {
            let percent = share_percent(stat.count, self.total);
            let filled = ((percent / 100.0) * bar_width as f64).round() as usize;
            let label = stat.category.as_str();
            let color = category_color(color_for(stat.category));

            lines.push(Line::from(vec![
                Span::styled(
                    format!("{:<width$}  ", label, width = label_width),
                    Style::default().fg(color),
                ),
                Span::styled("█".repeat(filled), Style::default().fg(color)),
                Span::styled(
                    "░".repeat(bar_width.saturating_sub(filled)),
                    Style::default().fg(Color::DarkGray),
                ),
                Span::raw(format!(" {} ({:.0}%)", stat.count, percent)),
            ]));
        }

        lines
    }
}

impl Widget for StatsPanel<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let block = Block::default()
            .borders(Borders::ALL)
            .title(" Statistics by Category ")
            .border_style(Style::default().fg(Color::Magenta));

        let inner = block.inner(area);
        block.render(area, buf);

        if self.total == 0 {
            Paragraph::new(EMPTY_STATS_TEXT)
                .style(Style::default().fg(Color::DarkGray))
                .wrap(Wrap { trim: true })
                .render(inner, buf);
            return;
        }

        Paragraph::new(self.rows(inner.width)).render(inner, buf);
    }
}
