use linkshelf_core::{Message, MessageKind};
use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Widget, Wrap},
};

const SPINNER: [&str; 10] = ["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];

/// Center a fixed-size rect within `area`, clamped to its size.
pub fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let w = width.min(area.width);
    let h = height.min(area.height);
    let x = area.x + (area.width.saturating_sub(w)) / 2;
    let y = area.y + (area.height.saturating_sub(h)) / 2;
    Rect::new(x, y, w, h)
}

/// Spinner box shown while any request is in flight.
pub struct LoadingOverlay {
    loading: bool,
    frame: usize,
}

impl LoadingOverlay {
    pub fn new(loading: bool) -> Self {
        Self { loading, frame: 0 }
    }

    pub fn frame(mut self, frame: usize) -> Self {
        self.frame = frame;
        self
    }
}

impl Widget for LoadingOverlay {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if !self.loading {
            return;
        }

        let popup = centered_rect(20, 3, area);
        Clear.render(popup, buf);
        Paragraph::new(Line::from(vec![
            Span::styled(
                SPINNER[self.frame % SPINNER.len()],
                Style::default().fg(Color::Cyan),
            ),
            Span::raw(" Loading..."),
        ]))
        .alignment(Alignment::Center)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Cyan)),
        )
        .render(popup, buf);
    }
}

/// Status toast in the top-right corner.
pub struct MessageOverlay<'a> {
    message: Option<&'a Message>,
}

impl<'a> MessageOverlay<'a> {
    pub fn new(message: Option<&'a Message>) -> Self {
        Self { message }
    }
}

impl Widget for MessageOverlay<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let Some(message) = self.message else {
            return;
        };

        let (color, icon) = match message.kind {
            MessageKind::Success => (Color::Green, "✓"),
            MessageKind::Error => (Color::Red, "✗"),
        };

        let max_width = area.width.saturating_sub(4).max(1);
        let text_width = message.text.chars().count() as u16 + 6;
        let width = text_width.min(max_width).min(60);
        let height = if text_width > width { 4 } else { 3 };
        let popup = Rect::new(
            area.x + area.width.saturating_sub(width + 2),
            area.y + 1,
            width,
            height,
        )
        .intersection(area);
        if popup.is_empty() {
            return;
        }

        Clear.render(popup, buf);
        Paragraph::new(Line::from(vec![
            Span::styled(icon, Style::default().fg(color).add_modifier(Modifier::BOLD)),
            Span::raw(" "),
            Span::styled(message.text.as_str(), Style::default().fg(color)),
        ]))
        .wrap(Wrap { trim: true })
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(color)),
        )
        .render(popup, buf);
    }
}

/// Yes/no guard shown before a delete.
pub struct ConfirmDialog<'a> {
    prompt: &'a str,
}

impl<'a> ConfirmDialog<'a> {
    pub fn new(prompt: &'a str) -> Self {
        Self { prompt }
    }
}

impl Widget for ConfirmDialog<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let popup = centered_rect(56, 7, area);
        Clear.render(popup, buf);

        let key = Style::default().fg(Color::Black).bg(Color::Gray);
        Paragraph::new(vec![
            Line::from(self.prompt),
            Line::from(""),
            Line::from(vec![
                Span::styled(" y ", key),
                Span::raw(" Delete  "),
                Span::styled(" any other key ", key),
                Span::raw(" Cancel"),
            ]),
        ])
        .wrap(Wrap { trim: true })
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" Confirm ")
                .border_style(Style::default().fg(Color::Red)),
        )
        .render(popup, buf);
    }
}
