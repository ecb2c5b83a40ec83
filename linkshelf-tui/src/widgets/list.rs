use super::badge_style;
use linkshelf_core::Link;
use linkshelf_core::report::EMPTY_LINKS_TEXT;
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph, StatefulWidget, Widget, Wrap},
};

/// One saved link: title, category badge and url.
pub struct LinkCard<'a> {
    link: &'a Link,
}

impl<'a> LinkCard<'a> {
    pub fn new(link: &'a Link) -> Self {
        Self { link }
    }

    fn lines(&self) -> Vec<Line<'a>> {
        let link: &'a Link = self.link;
        vec![
            Line::from(vec![
                Span::styled(
                    link.display_title(),
                    Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
                ),
                Span::raw("  "),
                Span::styled(format!(" {} ", link.category), badge_style(link.category)),
            ]),
            Line::from(Span::styled(
                link.url.as_str(),
                Style::default().fg(Color::Blue).add_modifier(Modifier::UNDERLINED),
            )),
            Line::from(""),
        ]
    }
}

impl<'a> From<LinkCard<'a>> for ListItem<'a> {
    fn from(card: LinkCard<'a>) -> Self {
        ListItem::new(Text::from(card.lines()))
    }
}

impl Widget for LinkCard<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        Paragraph::new(self.lines()).render(area, buf);
    }
}

/// The saved links in display order, with the selected card highlighted.
pub struct LinkList<'a> {
    links: &'a [Link],
    loading: bool,
    selected: Option<usize>,
    focused: bool,
}

impl<'a> LinkList<'a> {
    pub fn new(links: &'a [Link]) -> Self {
        Self {
            links,
            loading: false,
            selected: None,
            focused: false,
        }
    }

    pub fn loading(mut self, loading: bool) -> Self {
        self.loading = loading;
        self
    }

    pub fn selected(mut self, selected: Option<usize>) -> Self {
        self.selected = selected;
        self
    }

    pub fn focused(mut self, focused: bool) -> Self {
        self.focused = focused;
        self
    }
}

impl Widget for LinkList<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let border = if self.focused {
            Color::Cyan
        } else {
            Color::DarkGray
        };
        let block = Block::default()
            .borders(Borders::ALL)
            .title(format!(" Your Saved Links ({}) ", self.links.len()))
            .title_bottom(Line::from(" r: refresh ").right_aligned())
            .border_style(Style::default().fg(border));

        let inner = block.inner(area);
        block.render(area, buf);

        if self.links.is_empty() {
            if !self.loading {
                Paragraph::new(EMPTY_LINKS_TEXT)
                    .style(Style::default().fg(Color::DarkGray))
                    .wrap(Wrap { trim: true })
                    .render(inner, buf);
            }
            return;
        }

        let items: Vec<ListItem> = self
            .links
            .iter()
            .map(|link| LinkCard::new(link).into())
            .collect();

        let highlight = if self.focused {
            Style::default().bg(Color::DarkGray)
        } else {
            Style::default()
        };
        let list = List::new(items)
            .highlight_style(highlight)
            .highlight_symbol("▌ ");

        let mut state = ListState::default().with_selected(self.selected);
        StatefulWidget::render(list, inner, buf, &mut state);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::widgets::buffer_text;
    use linkshelf_core::Category;
    use ratatui::{Terminal, backend::TestBackend};

    fn render(list: LinkList<'_>) -> String {
        let backend = TestBackend::new(70, 14);
        let mut terminal = Terminal::new(backend).unwrap();
        terminal.draw(|f| f.render_widget(list, f.area())).unwrap();
        buffer_text(terminal.backend().buffer())
    }

    fn links() -> Vec<Link> {
        vec![
            Link {
                id: "2".to_string(),
                url: "https://rust-lang.org".to_string(),
                title: "Rust".to_string(),
                category: Category::Programming,
            },
            Link {
                id: "1".to_string(),
                url: "https://untitled.io".to_string(),
                title: String::new(),
                category: Category::Other,
            },
        ]
    }

    #[test]
    fn test_empty_list_shows_empty_state() {
        let content = render(LinkList::new(&[]));
        assert!(content.contains("Your Saved Links (0)"));
        assert!(content.contains(EMPTY_LINKS_TEXT));
    }

    #[test]
    fn test_empty_list_while_loading_hides_empty_state() {
        let content = render(LinkList::new(&[]).loading(true));
        assert!(!content.contains(EMPTY_LINKS_TEXT));
    }

    #[test]
    fn test_list_renders_one_card_per_link() {
        let links = links();
        let content = render(LinkList::new(&links).selected(Some(0)).focused(true));

        assert!(content.contains("Your Saved Links (2)"));
        assert!(content.contains("Rust"));
        assert!(content.contains("Programación"));
        assert!(content.contains("https://rust-lang.org"));
        // No title: the url stands in as the heading
        assert_eq!(content.matches("https://untitled.io").count(), 2);
        assert!(!content.contains(EMPTY_LINKS_TEXT));
    }
}
