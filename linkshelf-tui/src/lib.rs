use anyhow::Result;
use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use linkshelf_core::debounce::{ANALYSIS_DEBOUNCE, Debouncer};
use linkshelf_core::draft::DraftTarget;
use linkshelf_core::service::delete_prompt;
use linkshelf_core::LinkService;
use ratatui::{
    Frame, Terminal,
    backend::{Backend, CrosstermBackend},
    layout::{Alignment, Constraint, Direction, Layout},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
};
use std::io;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::runtime::Handle;
use tracing::{debug, info};

pub mod widgets;

use widgets::{ConfirmDialog, LinkForm, LinkList, LoadingOverlay, MessageOverlay, StatsPanel};

/// Which part of the screen receives key input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    Url,
    Title,
    Category,
    List,
}

impl Focus {
    pub fn next(self) -> Self {
        match self {
            Focus::Url => Focus::Title,
            Focus::Title => Focus::Category,
            Focus::Category => Focus::List,
            Focus::List => Focus::Url,
        }
    }

    pub fn previous(self) -> Self {
        match self {
            Focus::Url => Focus::List,
            Focus::Title => Focus::Url,
            Focus::Category => Focus::Title,
            Focus::List => Focus::Category,
        }
    }
}

/// A delete waiting for the user's answer.
#[derive(Debug, Clone)]
struct PendingDelete {
    id: String,
    label: String,
}

pub struct App {
    service: Arc<LinkService>,
    handle: Handle,
    debouncer: Debouncer,
    focus: Focus,
    selected: usize,
    confirm: Option<PendingDelete>,
    last_url: String,
    frame: usize,
    should_quit: bool,
}

impl App {
    pub fn new(service: Arc<LinkService>, handle: Handle) -> Self {
        let debouncer = Debouncer::new(ANALYSIS_DEBOUNCE, handle.clone());
        Self {
            service,
            handle,
            debouncer,
            focus: Focus::Url,
            selected: 0,
            confirm: None,
            last_url: String::new(),
            frame: 0,
            should_quit: false,
        }
    }

    pub fn service(&self) -> &LinkService {
        &self.service
    }

    pub fn focus(&self) -> Focus {
        self.focus
    }

    pub fn selected(&self) -> usize {
        self.selected
    }

    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    /// Prompt of the delete awaiting confirmation, if any.
    pub fn confirm_prompt(&self) -> Option<String> {
        self.confirm.as_ref().map(|p| delete_prompt(&p.label))
    }

    pub fn analysis_pending(&self) -> bool {
        self.debouncer.is_pending()
    }

    /// Refetch links and stats in the background.
    pub fn refresh(&self) {
        let service = self.service.clone();
        self.handle.spawn(async move {
            service.fetch_all().await;
        });
    }

    /// Per-frame housekeeping: expire the message and keep the selection
    /// and the analysis timer in step with the store.
    pub fn tick(&mut self, now: Instant) {
        self.frame = self.frame.wrapping_add(1);
        let count = {
            let mut store = self.service.lock();
            store.expire_message(now);
            store.sorted_links().len()
        };
        self.selected = self.selected.min(count.saturating_sub(1));
        self.sync_analysis();
    }

    pub fn handle_key(&mut self, key: KeyEvent) {
        if key.kind != KeyEventKind::Press {
            return;
        }

        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            self.should_quit = true;
            return;
        }

        if self.confirm.is_some() {
            let accepted = matches!(key.code, KeyCode::Char('y') | KeyCode::Char('Y'));
            self.answer_delete(accepted);
            return;
        }

        match key.code {
            KeyCode::Tab => self.focus = self.focus.next(),
            KeyCode::BackTab => self.focus = self.focus.previous(),
            KeyCode::Esc => {
                let editing = self.service.lock().is_editing();
                if editing {
                    self.service.update_store(|store| store.cancel_edit());
                    self.focus = Focus::Url;
                } else {
                    self.should_quit = true;
                }
            }
            KeyCode::Enter if self.focus != Focus::List => self.submit(),
            _ => match self.focus {
                Focus::Url | Focus::Title => self.edit_text(key),
                Focus::Category => self.cycle_category(key.code),
                Focus::List => self.handle_list_key(key.code),
            },
        }

        self.sync_analysis();
    }

    fn edit_text(&mut self, key: KeyEvent) {
        let focus = self.focus;
        self.service.update_store(|store| {
            let draft = store.active_draft_mut();
            let field = if focus == Focus::Url {
                &mut draft.url
            } else {
                &mut draft.title
            };
            match key.code {
                KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => field.push(c),
                KeyCode::Backspace => {
                    field.pop();
                }
                _ => {}
            }
        });
    }

    fn cycle_category(&mut self, code: KeyCode) {
        self.service.update_store(|store| {
            let draft = store.active_draft_mut();
            match code {
                KeyCode::Right => draft.category = draft.category.next(),
                KeyCode::Left => draft.category = draft.category.previous(),
                _ => {}
            }
        });
    }

    fn handle_list_key(&mut self, code: KeyCode) {
        match code {
            KeyCode::Up => self.selected = self.selected.saturating_sub(1),
            KeyCode::Down => {
                let count = self.service.lock().sorted_links().len();
                self.selected = (self.selected + 1).min(count.saturating_sub(1));
            }
            KeyCode::Char('e') => {
                let started = self.service.update_store(|store| {
                    let link = store.sorted_links().get(self.selected).cloned();
                    link.map(|link| store.start_edit(&link)).is_some()
                });
                if started {
                    self.focus = Focus::Url;
                }
            }
            KeyCode::Char('d') => {
                let store = self.service.lock();
                if let Some(link) = store.sorted_links().get(self.selected) {
                    self.confirm = Some(PendingDelete {
                        id: link.id.clone(),
                        label: link.display_title().to_string(),
                    });
                }
            }
            KeyCode::Char('r') => self.refresh(),
            KeyCode::Char('q') => self.should_quit = true,
            _ => {}
        }
    }

    /// Create or update depending on the mode, then resync.
    fn submit(&mut self) {
        let (draft, target) = {
            let store = self.service.lock();
            if store.is_loading() || store.is_analyzing() {
                debug!("Submit ignored while a request is in flight");
                return;
            }
            (store.active_draft().clone(), store.target())
        };
        if target == DraftTarget::Create && draft.url.trim().is_empty() {
            return;
        }

        let service = self.service.clone();
        self.handle.spawn(async move {
            let outcome = match target {
                DraftTarget::Create => service.create(draft).await,
                DraftTarget::Edit => service.update(draft).await,
            };
            service.resync(outcome).await;
        });
    }

    fn answer_delete(&mut self, accepted: bool) {
        let Some(pending) = self.confirm.take() else {
            return;
        };
        if !accepted {
            debug!("Delete of {} cancelled", pending.id);
            return;
        }

        info!("Deleting link {}", pending.id);
        let service = self.service.clone();
        self.handle.spawn(async move {
            let outcome = service.remove(&pending.id, &pending.label, |_| true).await;
            service.resync(outcome).await;
        });
    }

    /// Re-arm the analysis timer when the active url has changed. A blank
    /// url only disarms it.
    fn sync_analysis(&mut self) {
        let url = self.service.lock().active_draft().url.clone();
        if url == self.last_url {
            return;
        }
        self.last_url = url;

        if self.last_url.trim().is_empty() {
            self.debouncer.cancel();
            return;
        }

        let service = self.service.clone();
        self.debouncer.schedule(async move {
            service.analyze_active().await;
        });
    }
}

/// Run the link manager TUI (blocking, should be run on a blocking thread).
/// Requests are spawned on `handle`.
pub fn run(service: Arc<LinkService>, handle: Handle) -> Result<()> {
    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::new(service, handle);
    app.refresh();

    let result = run_app(&mut terminal, &mut app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

fn run_app<B: Backend>(terminal: &mut Terminal<B>, app: &mut App) -> Result<()> {
    loop {
        app.tick(Instant::now());
        terminal.draw(|f| ui(f, app))?;

        // Poll for keyboard events (non-blocking with timeout)
        if event::poll(Duration::from_millis(100))?
            && let Event::Key(key) = event::read()?
        {
            app.handle_key(key);
        }

        if app.should_quit {
            break;
        }
    }

    Ok(())
}

pub fn ui(f: &mut Frame, app: &App) {
    let store = app.service.lock();

    let vertical_chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Min(10),   // Main area
            Constraint::Length(1), // Hints bar
        ])
        .split(f.area());

    let main_chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(40), // Form + stats (left)
            Constraint::Percentage(60), // Links (right)
        ])
        .split(vertical_chunks[1]);

    let left_chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(12), // Form
            Constraint::Min(5),     // Stats
        ])
        .split(main_chunks[0]);

    render_header(f, app, vertical_chunks[0]);

    let loading = store.is_loading();
    f.render_widget(
        LinkForm::new(store.active_draft(), store.target())
            .focus(app.focus)
            .loading(loading)
            .analyzing(store.is_analyzing()),
        left_chunks[0],
    );
    f.render_widget(
        StatsPanel::new(store.stats(), store.total_links()),
        left_chunks[1],
    );

    let links = store.sorted_links();
    let selected = (!links.is_empty()).then_some(app.selected);
    f.render_widget(
        LinkList::new(links)
            .loading(loading)
            .selected(selected)
            .focused(app.focus == Focus::List),
        main_chunks[1],
    );

    render_hints(f, app, store.is_editing(), vertical_chunks[2]);

    f.render_widget(LoadingOverlay::new(loading).frame(app.frame), f.area());
    f.render_widget(MessageOverlay::new(store.message()), f.area());
    if let Some(prompt) = app.confirm_prompt() {
        f.render_widget(ConfirmDialog::new(&prompt), f.area());
    }
}

fn render_header(f: &mut Frame, app: &App, area: ratatui::layout::Rect) {
    let header = Paragraph::new(Line::from(vec![
        Span::styled(
            "Link Manager PRO",
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            format!("  {}", app.service.api().base_url()),
            Style::default().fg(Color::DarkGray),
        ),
    ]))
    .alignment(Alignment::Center)
    .block(
        Block::default()
            .borders(Borders::BOTTOM)
            .border_style(Style::default().fg(Color::DarkGray)),
    );
    f.render_widget(header, area);
}

fn render_hints(f: &mut Frame, app: &App, editing: bool, area: ratatui::layout::Rect) {
    let key = Style::default().fg(Color::Black).bg(Color::Gray);
    let mut spans = vec![
        Span::styled(" Tab ", key),
        Span::raw(" Focus  "),
    ];

    match app.focus {
        Focus::List => spans.extend([
            Span::styled(" ↑/↓ ", key),
            Span::raw(" Select  "),
            Span::styled(" e ", key),
            Span::raw(" Edit  "),
            Span::styled(" d ", key),
            Span::raw(" Delete  "),
            Span::styled(" r ", key),
            Span::raw(" Refresh  "),
            Span::styled(" q ", key),
            Span::raw(" Quit  "),
        ]),
        Focus::Category => spans.extend([
            Span::styled(" ←/→ ", key),
            Span::raw(" Category  "),
            Span::styled(" Enter ", key),
            Span::raw(" Submit  "),
        ]),
        Focus::Url | Focus::Title => spans.extend([
            Span::styled(" Enter ", key),
            Span::raw(" Submit  "),
        ]),
    }

    spans.push(Span::styled(" Esc ", key));
    spans.push(Span::raw(if editing { " Cancel edit" } else { " Quit" }));

    let paragraph = Paragraph::new(Line::from(spans))
        .style(Style::default().bg(Color::Black).fg(Color::Gray));
    f.render_widget(paragraph, area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::widgets::buffer_text;
    use linkshelf_core::{ApiClient, Category, Link, MessageKind, StatEntry};
    use ratatui::backend::TestBackend;

    fn app() -> App {
        let api = ApiClient::new("http://127.0.0.1:9").unwrap();
        App::new(Arc::new(LinkService::new(api)), Handle::current())
    }

    fn press(app: &mut App, code: KeyCode) {
        app.handle_key(KeyEvent::new(code, KeyModifiers::NONE));
    }

    fn type_text(app: &mut App, text: &str) {
        for c in text.chars() {
            press(app, KeyCode::Char(c));
        }
    }

    fn seed(app: &App) {
        app.service().update_store(|store| {
            let seq = store.begin_fetch();
            store.apply_links(
                seq,
                vec![
                    Link {
                        id: "a1".to_string(),
                        url: "https://old.io".to_string(),
                        title: "Old".to_string(),
                        category: Category::Music,
                    },
                    Link {
                        id: "b2".to_string(),
                        url: "https://new.io".to_string(),
                        title: String::new(),
                        category: Category::Finance,
                    },
                ],
            );
            store.apply_stats(
                seq,
                vec![
                    StatEntry { category: Category::Music, count: 1 },
                    StatEntry { category: Category::Finance, count: 1 },
                ],
            );
        });
    }

    fn draw(app: &App) -> String {
        let backend = TestBackend::new(120, 40);
        let mut terminal = Terminal::new(backend).unwrap();
        terminal.draw(|f| ui(f, app)).unwrap();
        buffer_text(terminal.backend().buffer())
    }

    #[tokio::test]
    async fn test_tab_cycles_focus() {
        let mut app = app();
        assert_eq!(app.focus(), Focus::Url);

        press(&mut app, KeyCode::Tab);
        assert_eq!(app.focus(), Focus::Title);
        press(&mut app, KeyCode::Tab);
        assert_eq!(app.focus(), Focus::Category);
        press(&mut app, KeyCode::Tab);
        assert_eq!(app.focus(), Focus::List);
        press(&mut app, KeyCode::Tab);
        assert_eq!(app.focus(), Focus::Url);

        press(&mut app, KeyCode::BackTab);
        assert_eq!(app.focus(), Focus::List);
    }

    #[tokio::test]
    async fn test_typing_edits_focused_field() {
        let mut app = app();
        type_text(&mut app, "https://q.io");
        press(&mut app, KeyCode::Backspace);

        press(&mut app, KeyCode::Tab);
        type_text(&mut app, "Quiz");

        let store = app.service().lock();
        assert_eq!(store.form().url, "https://q.i");
        assert_eq!(store.form().title, "Quiz");
        // 'q' typed into a field does not quit
        drop(store);
        assert!(!app.should_quit());
    }

    #[tokio::test]
    async fn test_url_change_arms_analysis() {
        let mut app = app();
        assert!(!app.analysis_pending());

        type_text(&mut app, "https://example.com");
        assert!(app.analysis_pending());

        // Clearing the url disarms the timer
        for _ in 0.."https://example.com".len() {
            press(&mut app, KeyCode::Backspace);
        }
        assert!(!app.analysis_pending());
    }

    #[tokio::test]
    async fn test_arrows_cycle_category() {
        let mut app = app();
        press(&mut app, KeyCode::Tab);
        press(&mut app, KeyCode::Tab);

        press(&mut app, KeyCode::Right);
        assert_eq!(app.service().lock().form().category, Category::Other.next());

        press(&mut app, KeyCode::Left);
        press(&mut app, KeyCode::Left);
        assert_eq!(app.service().lock().form().category, Category::Other.previous());
    }

    #[tokio::test]
    async fn test_enter_with_blank_url_does_nothing() {
        let mut app = app();
        press(&mut app, KeyCode::Enter);
        tokio::task::yield_now().await;

        let store = app.service().lock();
        assert!(!store.is_loading());
        assert!(store.message().is_none());
    }

    #[tokio::test]
    async fn test_edit_selected_and_escape() {
        let mut app = app();
        seed(&app);
        press(&mut app, KeyCode::BackTab);
        assert_eq!(app.focus(), Focus::List);

        // Newest id first, so the first card is b2
        press(&mut app, KeyCode::Char('e'));
        assert_eq!(app.focus(), Focus::Url);
        {
            let store = app.service().lock();
            assert!(store.is_editing());
            assert_eq!(store.active_draft().url, "https://new.io");
            assert_eq!(store.active_draft().category, Category::Finance);
        }
        // Entering edit mode changes the active url
        assert!(app.analysis_pending());

        press(&mut app, KeyCode::Esc);
        assert!(!app.service().lock().is_editing());
        assert!(!app.should_quit());
        assert!(!app.analysis_pending());

        press(&mut app, KeyCode::Esc);
        assert!(app.should_quit());
    }

    #[tokio::test]
    async fn test_list_selection_is_clamped() {
        let mut app = app();
        seed(&app);
        press(&mut app, KeyCode::BackTab);

        press(&mut app, KeyCode::Down);
        press(&mut app, KeyCode::Down);
        press(&mut app, KeyCode::Down);
        assert_eq!(app.selected(), 1);

        press(&mut app, KeyCode::Up);
        press(&mut app, KeyCode::Up);
        assert_eq!(app.selected(), 0);
    }

    #[tokio::test]
    async fn test_delete_requires_confirmation() {
        let mut app = app();
        seed(&app);
        press(&mut app, KeyCode::BackTab);
        press(&mut app, KeyCode::Down);

        press(&mut app, KeyCode::Char('d'));
        assert_eq!(app.confirm_prompt(), Some(delete_prompt("Old")));
        assert!(draw(&app).contains("Confirm"));

        press(&mut app, KeyCode::Char('n'));
        assert!(app.confirm_prompt().is_none());
        tokio::task::yield_now().await;

        let store = app.service().lock();
        assert!(!store.is_loading());
        assert_eq!(store.links().len(), 2);
    }

    #[tokio::test]
    async fn test_ctrl_c_quits_from_a_text_field() {
        let mut app = app();
        app.handle_key(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL));
        assert!(app.should_quit());
        assert!(app.service().lock().form().url.is_empty());
    }

    #[tokio::test]
    async fn test_tick_expires_message() {
        let mut app = app();
        let now = Instant::now();
        app.service()
            .update_store(|store| store.show_message_at("Saved", MessageKind::Success, now));

        app.tick(now);
        assert!(app.service().lock().message().is_some());

        app.tick(now + Duration::from_secs(3));
        assert!(app.service().lock().message().is_none());
    }

    #[tokio::test]
    async fn test_screen_renders_store() {
        let app = app();
        seed(&app);
        let content = draw(&app);

        assert!(content.contains("Link Manager PRO"));
        assert!(content.contains("Add New Link"));
        assert!(content.contains("Create Link"));
        assert!(content.contains("Your Saved Links (2)"));
        assert!(content.contains("Statistics by Category"));
        assert!(content.contains("Total links: 2"));
        assert!(content.contains("https://new.io"));
    }

    #[tokio::test]
    async fn test_screen_in_edit_mode() {
        let mut app = app();
        seed(&app);
        press(&mut app, KeyCode::BackTab);
        press(&mut app, KeyCode::Char('e'));

        let content = draw(&app);
        assert!(content.contains("Edit Link"));
        assert!(content.contains("Save Changes"));
        assert!(content.contains("Cancel"));
    }
}
