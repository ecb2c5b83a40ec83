use super::badge_style;
use crate::Focus;
use linkshelf_core::draft::{DraftTarget, LinkDraft};
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Widget},
};

/// Create/edit form for the active draft.
pub struct LinkForm<'a> {
    draft: &'a LinkDraft,
    target: DraftTarget,
    focus: Focus,
    loading: bool,
    analyzing: bool,
}

impl<'a> LinkForm<'a> {
    pub fn new(draft: &'a LinkDraft, target: DraftTarget) -> Self {
        Self {
            draft,
            target,
            focus: Focus::List,
            loading: false,
            analyzing: false,
        }
    }

    pub fn focus(mut self, focus: Focus) -> Self {
        self.focus = focus;
        self
    }

    pub fn loading(mut self, loading: bool) -> Self {
        self.loading = loading;
        self
    }

    pub fn analyzing(mut self, analyzing: bool) -> Self {
        self.analyzing = analyzing;
        self
    }

    pub fn title(&self) -> &'static str {
        match self.target {
            DraftTarget::Create => "Add New Link",
            DraftTarget::Edit => "Edit Link",
        }
    }

    pub fn submit_label(&self) -> &'static str {
        match self.target {
            DraftTarget::Create => "Create Link",
            DraftTarget::Edit => "Save Changes",
        }
    }

    /// Whether Enter would submit right now.
    pub fn submit_enabled(&self) -> bool {
        if self.loading || self.analyzing {
            return false;
        }
        self.target == DraftTarget::Edit || !self.draft.url.trim().is_empty()
    }

    fn label(&self, text: &'static str, field: Focus) -> Line<'a> {
        let style = if self.focus == field {
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::DarkGray)
        };
        Line::from(Span::styled(text, style))
    }

    fn text_value(&self, value: &'a str, placeholder: &'static str, field: Focus) -> Line<'a> {
        let focused = self.focus == field;
        let mut spans = vec![Span::raw("  ")];
        if value.is_empty() && !focused {
            spans.push(Span::styled(placeholder, Style::default().fg(Color::DarkGray)));
        } else {
            spans.push(Span::styled(value, Style::default().fg(Color::White)));
        }
        if focused {
            spans.push(Span::styled("█", Style::default().fg(Color::Cyan)));
        }
        Line::from(spans)
    }

    fn lines(&self) -> Vec<Line<'a>> {
        let draft: &'a LinkDraft = self.draft;
        let mut url_line = self.text_value(&draft.url, "https://...", Focus::Url);
        if self.analyzing {
            url_line.spans.push(Span::styled(
                "  analyzing...",
                Style::default().fg(Color::Yellow).add_modifier(Modifier::ITALIC),
            ));
        }

        let category = draft.category;
        let arrows = if self.focus == Focus::Category {
            Style::default().fg(Color::Cyan)
        } else {
            Style::default().fg(Color::DarkGray)
        };
        let category_line = Line::from(vec![
            Span::raw("  "),
            Span::styled("◀ ", arrows),
            Span::styled(format!(" {} ", category), badge_style(category)),
            Span::styled(" ▶", arrows),
        ]);

        let button_style = if self.submit_enabled() {
            Style::default()
                .fg(Color::Black)
                .bg(Color::Green)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::DarkGray).bg(Color::Black)
        };
        let mut button_line = vec![
            Span::raw("  "),
            Span::styled(format!(" {} ", self.submit_label()), button_style),
        ];
        if self.target == DraftTarget::Edit {
            button_line.push(Span::raw("   "));
            button_line.push(Span::styled(
                " Cancel ",
                Style::default().fg(Color::Black).bg(Color::Gray),
            ));
            button_line.push(Span::styled(" Esc", Style::default().fg(Color::DarkGray)));
        }

        vec![
            self.label("URL", Focus::Url),
            url_line,
            Line::from(""),
            self.label("Title (optional)", Focus::Title),
            self.text_value(&draft.title, "fetched from the page", Focus::Title),
            Line::from(""),
            self.label("Category", Focus::Category),
            category_line,
            Line::from(""),
            Line::from(button_line),
        ]
    }
}

impl Widget for LinkForm<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let border = if self.focus == Focus::List {
            Color::DarkGray
        } else {
            Color::Cyan
        };
        let block = Block::default()
            .borders(Borders::ALL)
            .title(format!(" {} ", self.title()))
            .border_style(Style::default().fg(border));

        let inner = block.inner(area);
        block.render(area, buf);
        Paragraph::new(self.lines()).render(inner, buf);
    }
}
