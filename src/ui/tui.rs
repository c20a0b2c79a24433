//! Ratatui search form wired to the in-memory catalog index.
//!
//! All UI state lives in [`App`]; the draw pass reads it (including the theme)
//! and never mutates it. Key handling is separated from terminal I/O so the
//! form logic can be driven from tests.

use std::io;
use std::time::Duration;

use anyhow::Result;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::cursor;
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Cell, Paragraph, Row, Table};

use crate::model::types::SearchHit;
use crate::search::{CatalogIndex, SearchQuery};
use crate::ui::components::theme::ThemeMode;
use crate::ui::table::{NO_RESULTS_MESSAGE, format_rating};

pub const BLANK_QUERY_MESSAGE: &str = "Please enter at least one search field.";

const FOOTER: &str = "Tab/↓ next · Shift-Tab/↑ prev · Enter search · Ctrl-T theme · Ctrl-U clear · Esc quit";

/// Form fields, in on-screen order.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FormField {
    Language,
    Title,
    Genre,
    Overview,
    Tagline,
    Company,
}

impl FormField {
    pub const ALL: [FormField; 6] = [
        FormField::Language,
        FormField::Title,
        FormField::Genre,
        FormField::Overview,
        FormField::Tagline,
        FormField::Company,
    ];

    pub fn label(self) -> &'static str {
        match self {
            FormField::Language => "Language",
            FormField::Title => "Title",
            FormField::Genre => "Genre",
            FormField::Overview => "Overview Keywords",
            FormField::Tagline => "Tagline",
            FormField::Company => "Production Company",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Status {
    Ready(String),
    Warning(String),
    Info(String),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AppAction {
    None,
    Search,
    Quit,
}

#[derive(Debug, Clone)]
pub struct App {
    fields: [String; 6],
    focus: usize,
    results: Vec<SearchHit>,
    status: Status,
    theme: ThemeMode,
}

impl App {
    pub fn new(theme: ThemeMode, catalog_len: usize) -> Self {
        Self {
            fields: Default::default(),
            focus: 0,
            results: Vec::new(),
            status: Status::Ready(format!("{catalog_len} movies loaded")),
            theme,
        }
    }

    pub fn theme(&self) -> ThemeMode {
        self.theme
    }

    pub fn status(&self) -> &Status {
        &self.status
    }

    pub fn results(&self) -> &[SearchHit] {
        &self.results
    }

    pub fn focused(&self) -> FormField {
        FormField::ALL[self.focus]
    }

    pub fn field(&self, field: FormField) -> &str {
        &self.fields[Self::slot(field)]
    }

    pub fn set_field(&mut self, field: FormField, value: impl Into<String>) {
        self.fields[Self::slot(field)] = value.into();
    }

    fn slot(field: FormField) -> usize {
        FormField::ALL
            .iter()
            .position(|f| *f == field)
            .unwrap_or_default()
    }

    /// Current form contents as a query; every field trimmed.
    pub fn query(&self) -> SearchQuery {
        let get = |f: FormField| self.field(f).trim().to_string();
        SearchQuery {
            title: get(FormField::Title),
            genres: get(FormField::Genre),
            language: get(FormField::Language),
            overview: get(FormField::Overview),
            tagline: get(FormField::Tagline),
            company: get(FormField::Company),
        }
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> AppAction {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        match key.code {
            KeyCode::Esc => return AppAction::Quit,
            KeyCode::Char('c') if ctrl => return AppAction::Quit,
            KeyCode::Char('t') if ctrl => self.theme = self.theme.toggled(),
            KeyCode::Char('u') if ctrl => self.fields[self.focus].clear(),
            KeyCode::Enter => return AppAction::Search,
            KeyCode::Tab | KeyCode::Down => self.focus = (self.focus + 1) % FormField::ALL.len(),
            KeyCode::BackTab | KeyCode::Up => {
                self.focus = (self.focus + FormField::ALL.len() - 1) % FormField::ALL.len();
            }
            KeyCode::Backspace => {
                self.fields[self.focus].pop();
            }
            KeyCode::Char(c) if !ctrl => self.fields[self.focus].push(c),
            _ => {}
        }
        AppAction::None
    }

    /// Validate the form and run the search. Blank forms never reach the index.
    pub fn submit(&mut self, index: &CatalogIndex) {
        let query = self.query();
        if query.is_blank() {
            self.results.clear();
            self.status = Status::Warning(BLANK_QUERY_MESSAGE.to_string());
            return;
        }
        self.results = index.search(&query);
        self.status = if self.results.is_empty() {
            Status::Info(NO_RESULTS_MESSAGE.to_string())
        } else {
            Status::Ready(format!("{} recommendations", self.results.len()))
        };
    }

    pub fn render(&self, frame: &mut Frame) {
        let palette = self.theme.palette();
        let area = frame.area();
        frame.render_widget(Block::default().style(palette.base()), area);

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(11), // form
                Constraint::Length(1),  // status
                Constraint::Min(3),     // results
                Constraint::Length(1),  // footer
            ])
            .split(area);

        self.render_form(frame, chunks[0]);

        let (text, style) = match &self.status {
            Status::Ready(msg) => (msg.as_str(), palette.base()),
            Status::Warning(msg) => (msg.as_str(), palette.warning_style()),
            Status::Info(msg) => (msg.as_str(), palette.info_style()),
        };
        frame.render_widget(Paragraph::new(format!(" {text}")).style(style), chunks[1]);

        let rows = self.results.iter().map(|hit| {
            Row::new(vec![
                Cell::from(hit.title.clone()),
                Cell::from(format_rating(hit.vote_average)),
                Cell::from(hit.release_date.clone()),
            ])
        });
        let table = Table::new(
            rows,
            [
                Constraint::Min(20),
                Constraint::Length(8),
                Constraint::Length(14),
            ],
        )
        .header(Row::new(vec!["Title", "Rating", "Release Date"]).style(palette.header_style()))
        .style(palette.table_style())
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(Span::styled(" Recommendations ", palette.title()))
                .border_style(palette.border_style()),
        );
        frame.render_widget(table, chunks[2]);

        frame.render_widget(
            Paragraph::new(format!(" {FOOTER} · theme: {}", self.theme)).style(palette.base()),
            chunks[3],
        );
    }

    fn render_form(&self, frame: &mut Frame, area: Rect) {
        let palette = self.theme.palette();
        let outer = Block::default()
            .borders(Borders::ALL)
            .title(Span::styled(" Search Criteria ", palette.title()))
            .border_style(palette.border_style())
            .style(palette.surface_style());
        let inner = outer.inner(area);
        frame.render_widget(outer, area);

        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(3); 3])
            .split(inner);

        for (row_idx, row_area) in rows.iter().enumerate() {
            let cols = Layout::default()
                .direction(Direction::Horizontal)
                .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
                .split(*row_area);
            for (col_idx, cell_area) in cols.iter().enumerate() {
                let slot = row_idx * 2 + col_idx;
                let field = FormField::ALL[slot];
                let border = if slot == self.focus {
                    palette.border_focus_style()
                } else {
                    palette.border_style()
                };
                let input = Paragraph::new(self.fields[slot].as_str())
                    .style(palette.input_style())
                    .block(
                        Block::default()
                            .borders(Borders::ALL)
                            .title(field.label())
                            .border_style(border),
                    );
                frame.render_widget(input, *cell_area);
            }
        }
    }
}

/// Runs `restore` exactly once when dropped, including on early `?` returns.
struct RestoreGuard<F: FnOnce()> {
    restore: Option<F>,
}

impl<F: FnOnce()> RestoreGuard<F> {
    fn new(restore: F) -> Self {
        Self {
            restore: Some(restore),
        }
    }
}

impl<F: FnOnce()> Drop for RestoreGuard<F> {
    fn drop(&mut self) {
        if let Some(restore) = self.restore.take() {
            restore();
        }
    }
}

fn restore_terminal() {
    let _ = disable_raw_mode();
    let _ = execute!(io::stdout(), LeaveAlternateScreen, cursor::Show);
}

/// Run the interactive form until the user quits.
pub fn run_tui(index: &CatalogIndex, theme: ThemeMode) -> Result<()> {
    enable_raw_mode()?;
    // Declared before the terminal so it drops last.
    let _restore = RestoreGuard::new(restore_terminal);
    execute!(io::stdout(), EnterAlternateScreen)?;
    let mut terminal = Terminal::new(CrosstermBackend::new(io::stdout()))?;

    event_loop(&mut terminal, index, theme)
}

fn event_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    index: &CatalogIndex,
    theme: ThemeMode,
) -> Result<()> {
    let mut app = App::new(theme, index.len());
    loop {
        terminal.draw(|f| app.render(f))?;
        if !event::poll(Duration::from_millis(250))? {
            continue;
        }
        if let Event::Key(key) = event::read()? {
            if key.kind != KeyEventKind::Press {
                continue;
            }
            match app.handle_key(key) {
                AppAction::Quit => break,
                AppAction::Search => app.submit(index),
                AppAction::None => {}
            }
        }
    }
    tracing::debug!(theme = %app.theme(), "tui_exit");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::types::MovieRecord;
    use ratatui::backend::TestBackend;

    fn guarded_setup(step: io::Result<()>, restored: &std::cell::Cell<u32>) -> io::Result<()> {
        let _restore = RestoreGuard::new(|| restored.set(restored.get() + 1));
        step?;
        Ok(())
    }

    #[test]
    fn terminal_is_restored_when_setup_fails() {
        let restored = std::cell::Cell::new(0);
        let failed = guarded_setup(Err(io::Error::other("no alternate screen")), &restored);
        assert!(failed.is_err());
        assert_eq!(restored.get(), 1);

        assert!(guarded_setup(Ok(()), &restored).is_ok());
        assert_eq!(restored.get(), 2);
    }

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn ctrl(c: char) -> KeyEvent {
        KeyEvent::new(KeyCode::Char(c), KeyModifiers::CONTROL)
    }

    fn type_text(app: &mut App, text: &str) {
        for c in text.chars() {
            app.handle_key(press(KeyCode::Char(c)));
        }
    }

    fn index() -> CatalogIndex {
        CatalogIndex::build(vec![
            MovieRecord::titled("Inception")
                .with_language("en")
                .with_vote_average(8.4)
                .with_release_date("2010-07-15"),
            MovieRecord::titled("Amélie").with_language("fr"),
        ])
    }

    #[test]
    fn typing_goes_to_focused_field_and_tab_cycles() {
        let mut app = App::new(ThemeMode::Light, 0);
        assert_eq!(app.focused(), FormField::Language);
        type_text(&mut app, "en");
        app.handle_key(press(KeyCode::Tab));
        type_text(&mut app, "Inceptionx");
        app.handle_key(press(KeyCode::Backspace));
        assert_eq!(app.field(FormField::Language), "en");
        assert_eq!(app.field(FormField::Title), "Inception");

        app.handle_key(press(KeyCode::BackTab));
        app.handle_key(press(KeyCode::BackTab));
        assert_eq!(app.focused(), FormField::Company);
    }

    #[test]
    fn ctrl_t_toggles_theme_without_touching_fields() {
        let mut app = App::new(ThemeMode::Light, 0);
        type_text(&mut app, "fr");
        assert_eq!(app.handle_key(ctrl('t')), AppAction::None);
        assert_eq!(app.theme(), ThemeMode::Dark);
        assert_eq!(app.field(FormField::Language), "fr");
        app.handle_key(ctrl('t'));
        assert_eq!(app.theme(), ThemeMode::Light);
    }

    #[test]
    fn ctrl_u_clears_and_escape_quits() {
        let mut app = App::new(ThemeMode::Light, 0);
        type_text(&mut app, "abc");
        app.handle_key(ctrl('u'));
        assert_eq!(app.field(FormField::Language), "");
        assert_eq!(app.handle_key(press(KeyCode::Esc)), AppAction::Quit);
        assert_eq!(app.handle_key(ctrl('c')), AppAction::Quit);
    }

    #[test]
    fn blank_submission_is_rejected() {
        let index = index();
        let mut app = App::new(ThemeMode::Light, index.len());
        app.set_field(FormField::Title, "   ");
        assert_eq!(app.handle_key(press(KeyCode::Enter)), AppAction::Search);
        app.submit(&index);
        assert_eq!(app.status(), &Status::Warning(BLANK_QUERY_MESSAGE.to_string()));
        assert!(app.results().is_empty());
    }

    #[test]
    fn submission_fills_results_or_reports_none() {
        let index = index();
        let mut app = App::new(ThemeMode::Light, index.len());
        app.set_field(FormField::Title, "Inception");
        app.submit(&index);
        assert_eq!(app.results()[0].title, "Inception");

        app.set_field(FormField::Title, "qwertyuiop");
        app.submit(&index);
        assert_eq!(app.status(), &Status::Info(NO_RESULTS_MESSAGE.to_string()));
    }

    #[test]
    fn render_shows_form_and_results() {
        let index = index();
        let mut app = App::new(ThemeMode::Dark, index.len());
        app.set_field(FormField::Language, "fr");
        app.submit(&index);

        let mut terminal = Terminal::new(TestBackend::new(100, 30)).unwrap();
        terminal.draw(|f| app.render(f)).unwrap();
        let screen: String = terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|cell| cell.symbol())
            .collect();
        assert!(screen.contains("Search Criteria"));
        assert!(screen.contains("Production Company"));
        assert!(screen.contains("Amélie"));
        assert!(!screen.contains("Inception"));
    }
}
