use std::mem;
use std::sync::Arc;

use anyhow::Result;
use crossterm::event::KeyCode;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::prelude::*;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};
use ratatui::Frame;
use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tracing::{error, info, warn};

use crate::audio::{AudioBackend, Player};
use crate::data::{
    fetch_catalog, fetch_chapter, ChapterResolution, ContentStore, LoadError, INVOCATION,
};
use crate::models::{ChapterSummary, Verse};
use crate::search::ChapterFilter;

use super::helpers::{centered_rect, meta_line, surface_error, visible_window};
use super::screens::{DetailScreen, ListScreen, LoadState};

/// Title of the list screen.
const APP_TITLE: &str = "Al-Quran Al-Kareem";
/// Footer space reserved for status messages and instructions.
const FOOTER_HEIGHT: u16 = 3;
/// Height allocation per chapter card in the list.
const CHAPTER_CARD_HEIGHT: u16 = 5;
/// Rows skipped by PageUp/PageDown.
const PAGE_STEP: isize = 5;

type CatalogTask = JoinHandle<Result<Vec<ChapterSummary>, LoadError>>;
type ChapterTask = JoinHandle<Result<ChapterResolution, LoadError>>;

/// High-level navigation states.
enum Screen {
    List,
    Detail(DetailScreen),
}

/// Fine-grained modes scoped to the current screen.
enum Mode {
    Normal,
    Searching(SearchState),
}

/// State for an active inline search on the list screen.
struct SearchState {
    query: String,
}

/// Holds the footer message text plus its severity.
struct StatusMessage {
    text: String,
    kind: StatusKind,
}

/// Severity levels shown in the footer.
enum StatusKind {
    Info,
    Error,
}

impl StatusKind {
    fn style(&self) -> Style {
        match self {
            StatusKind::Info => Style::default().fg(Color::Green),
            StatusKind::Error => Style::default().fg(Color::Red),
        }
    }
}

/// Central application state shared across the TUI. Fetches run on the tokio
/// runtime behind `runtime`; their handles are collected in [`App::tick`].
pub struct App<B: AudioBackend> {
    runtime: Handle,
    store: Arc<ContentStore>,
    player: Player<B>,
    list: ListScreen,
    screen: Screen,
    mode: Mode,
    status: Option<StatusMessage>,
    catalog_task: Option<CatalogTask>,
    chapter_task: Option<ChapterTask>,
}

impl<B: AudioBackend> App<B> {
    /// Build the app and immediately start loading the catalog.
    pub fn new(runtime: Handle, store: Arc<ContentStore>, player: Player<B>) -> Self {
        let mut app = Self {
            runtime,
            store,
            player,
            list: ListScreen::loading(),
            screen: Screen::List,
            mode: Mode::Normal,
            status: None,
            catalog_task: None,
            chapter_task: None,
        };
        app.load_catalog();
        app
    }

    /// Route a key press. Returns `true` when the user asked to quit.
    pub fn handle_key(&mut self, code: KeyCode) -> Result<bool> {
        let mut exit = false;
        let mode = mem::replace(&mut self.mode, Mode::Normal);

        self.mode = match mode {
            Mode::Normal => self.handle_normal_key(code, &mut exit)?,
            Mode::Searching(state) => self.handle_search(code, state)?,
        };

        Ok(exit)
    }

    /// Collect finished fetches and poll the player. Called once per frame.
    pub fn tick(&mut self) -> Result<()> {
        self.collect_catalog();
        self.collect_chapter();

        match self.player.tick() {
            Ok(Some(verse)) => info!(verse, "recitation finished"),
            Ok(None) => {}
            Err(err) => self.set_status(format!("Playback failed: {err}"), StatusKind::Error),
        }
        Ok(())
    }

    /// `true` while a fetch is still running.
    pub fn is_loading(&self) -> bool {
        self.catalog_task.is_some() || self.chapter_task.is_some()
    }

    fn handle_normal_key(&mut self, code: KeyCode, exit: &mut bool) -> Result<Mode> {
        match self.screen {
            Screen::List => match code {
                KeyCode::Char('q') => *exit = true,
                KeyCode::Esc => {
                    if self.list.has_query() {
                        self.list.set_query(None);
                        self.clear_status();
                    } else {
                        *exit = true;
                    }
                }
                KeyCode::Up => self.list.move_selection(-1),
                KeyCode::Down => self.list.move_selection(1),
                KeyCode::PageUp => self.list.move_selection(-PAGE_STEP),
                KeyCode::PageDown => self.list.move_selection(PAGE_STEP),
                KeyCode::Home => self.list.select_first(),
                KeyCode::End => self.list.select_last(),
                KeyCode::Enter => self.open_current_chapter(),
                KeyCode::Char('f') | KeyCode::Char('/') => {
                    if self.list.filter().is_some() {
                        self.clear_status();
                        let query = self
                            .list
                            .filter()
                            .and_then(ChapterFilter::query)
                            .unwrap_or_default()
                            .to_string();
                        return Ok(Mode::Searching(SearchState { query }));
                    }
                }
                KeyCode::Char('r') | KeyCode::Char('R') => {
                    if !matches!(self.list.state, LoadState::Loading) {
                        self.clear_status();
                        self.load_catalog();
                    }
                }
                _ => {}
            },
            Screen::Detail(ref mut detail) => {
                let mut back_to_list = false;
                let mut toggle: Option<u32> = None;
                let mut stop = false;

                match code {
                    KeyCode::Char('q') => *exit = true,
                    KeyCode::Esc | KeyCode::Backspace => back_to_list = true,
                    KeyCode::Up => detail.move_selection(-1),
                    KeyCode::Down => detail.move_selection(1),
                    KeyCode::PageUp => detail.move_selection(-PAGE_STEP),
                    KeyCode::PageDown => detail.move_selection(PAGE_STEP),
                    KeyCode::Home => detail.select_first(),
                    KeyCode::End => detail.select_last(),
                    KeyCode::Char('t') | KeyCode::Char('T') => {
                        detail.show_transliteration = !detail.show_transliteration;
                    }
                    KeyCode::Enter | KeyCode::Char(' ') => {
                        toggle = detail.current_verse().map(|verse| verse.global_number);
                    }
                    KeyCode::Char('s') | KeyCode::Char('S') => stop = true,
                    _ => {}
                }

                if back_to_list {
                    self.close_detail();
                } else if let Some(verse) = toggle {
                    self.toggle_playback(verse);
                } else if stop {
                    self.stop_playback();
                }
            }
        }
        Ok(Mode::Normal)
    }

    fn handle_search(&mut self, code: KeyCode, mut state: SearchState) -> Result<Mode> {
        match code {
            KeyCode::Esc => {
                self.list.set_query(None);
                return Ok(Mode::Normal);
            }
            KeyCode::Up => {
                self.list.move_selection(-1);
                return Ok(Mode::Searching(state));
            }
            KeyCode::Down => {
                self.list.move_selection(1);
                return Ok(Mode::Searching(state));
            }
            KeyCode::PageUp => {
                self.list.move_selection(-PAGE_STEP);
                return Ok(Mode::Searching(state));
            }
            KeyCode::PageDown => {
                self.list.move_selection(PAGE_STEP);
                return Ok(Mode::Searching(state));
            }
            KeyCode::Enter => {
                self.open_current_chapter();
                return Ok(Mode::Normal);
            }
            KeyCode::Backspace => {
                state.query.pop();
            }
            KeyCode::Char(ch) if !ch.is_control() => state.query.push(ch),
            _ => {}
        }

        if state.query.trim().is_empty() {
            self.list.set_query(None);
        } else {
            self.list.set_query(Some(state.query.clone()));
        }

        Ok(Mode::Searching(state))
    }

    fn load_catalog(&mut self) {
        if let Some(task) = self.catalog_task.take() {
            task.abort();
        }
        self.list = ListScreen::loading();
        let store = Arc::clone(&self.store);
        self.catalog_task = Some(self.runtime.spawn(async move { fetch_catalog(&store).await }));
    }

    fn collect_catalog(&mut self) {
        if !self.catalog_task.as_ref().is_some_and(JoinHandle::is_finished) {
            return;
        }
        let Some(task) = self.catalog_task.take() else {
            return;
        };

        self.list.state = match self.runtime.block_on(task) {
            Ok(Ok(chapters)) => LoadState::Loaded(ChapterFilter::new(chapters)),
            Ok(Err(err)) => {
                let err = anyhow::Error::new(err);
                error!(error = %format!("{err:#}"), "error loading sura list");
                LoadState::Failed(surface_error(&err))
            }
            Err(err) => {
                error!(error = %err, "catalog task did not complete");
                LoadState::Failed(err.to_string())
            }
        };
    }

    fn open_current_chapter(&mut self) {
        let Some(summary) = self.list.current().cloned() else {
            self.set_status("No sura selected.", StatusKind::Error);
            return;
        };
        self.clear_status();
        self.open_chapter(summary);
    }

    fn open_chapter(&mut self, summary: ChapterSummary) {
        if let Some(task) = self.chapter_task.take() {
            task.abort();
        }
        let number = summary.number;
        let store = Arc::clone(&self.store);
        self.chapter_task = Some(
            self.runtime
                .spawn(async move { fetch_chapter(&store, number).await }),
        );
        self.screen = Screen::Detail(DetailScreen::loading(summary));
    }

    fn collect_chapter(&mut self) {
        if !self.chapter_task.as_ref().is_some_and(JoinHandle::is_finished) {
            return;
        }
        let Some(task) = self.chapter_task.take() else {
            return;
        };
        let outcome = self.runtime.block_on(task);

        let Screen::Detail(detail) = &mut self.screen else {
            return;
        };
        detail.state = match outcome {
            Ok(Ok(resolution)) => {
                if let ChapterResolution::Resolved(chapter) = &resolution {
                    if chapter.number != detail.summary.number {
                        warn!(
                            requested = detail.summary.number,
                            received = chapter.number,
                            "resolved chapter number mismatch"
                        );
                    }
                }
                detail.selected = 0;
                LoadState::Loaded(resolution)
            }
            Ok(Err(err)) => {
                let err = anyhow::Error::new(err);
                error!(error = %format!("{err:#}"), "error loading sura data");
                LoadState::Failed(surface_error(&err))
            }
            Err(err) => {
                error!(error = %err, "chapter task did not complete");
                LoadState::Failed(err.to_string())
            }
        };
    }

    fn close_detail(&mut self) {
        if let Some(task) = self.chapter_task.take() {
            task.abort();
        }
        self.stop_playback();
        self.screen = Screen::List;
    }

    fn toggle_playback(&mut self, verse: u32) {
        match self.player.toggle(verse) {
            Ok(true) => self.set_status(format!("Playing ayah {verse}."), StatusKind::Info),
            Ok(false) => self.set_status("Stopped.", StatusKind::Info),
            Err(err) => self.set_status(format!("Playback failed: {err}"), StatusKind::Error),
        }
    }

    fn stop_playback(&mut self) {
        if let Err(err) = self.player.stop() {
            self.set_status(format!("Failed to stop: {err}"), StatusKind::Error);
        }
    }

    fn set_status<S: Into<String>>(&mut self, text: S, kind: StatusKind) {
        self.status = Some(StatusMessage {
            text: text.into(),
            kind,
        });
    }

    fn clear_status(&mut self) {
        self.status = None;
    }

    pub(crate) fn draw(&self, frame: &mut Frame) {
        let area = frame.area();
        let footer_height = FOOTER_HEIGHT.min(area.height);

        let (content_area, footer_area) = if area.height > footer_height {
            let chunks = Layout::default()
                .direction(Direction::Vertical)
                .constraints([Constraint::Min(0), Constraint::Length(footer_height)])
                .split(area);
            (chunks[0], chunks[1])
        } else {
            (area, area)
        };

        match &self.screen {
            Screen::List => self.draw_list(frame, content_area),
            Screen::Detail(detail) => self.draw_detail(frame, content_area, detail),
        }

        if area.height >= footer_height {
            self.draw_footer(frame, footer_area);
        }

        if let Mode::Searching(state) = &self.mode {
            self.draw_search_bar(frame, area, state);
        }
    }

    fn draw_list(&self, frame: &mut Frame, area: Rect) {
        let title = match self.list.filter().and_then(ChapterFilter::query) {
            Some(query) => format!("{APP_TITLE}  •  filter: {query}"),
            None => APP_TITLE.to_string(),
        };
        let block = Block::default().borders(Borders::ALL).title(title);
        frame.render_widget(block.clone(), area);
        let inner = block.inner(area);

        match &self.list.state {
            LoadState::Loading => draw_message(frame, inner, "Loading Surahs...", None),
            LoadState::Failed(message) => draw_message(
                frame,
                inner,
                "Failed to load Surahs",
                Some(format!("{message}  (press r to retry)")),
            ),
            LoadState::Loaded(filter) if filter.visible().is_empty() => {
                draw_message(frame, inner, "No suras match the search.", None)
            }
            LoadState::Loaded(filter) => {
                self.render_chapter_cards(frame, inner, filter.visible(), filter.selected())
            }
        }
    }

    fn render_chapter_cards(
        &self,
        frame: &mut Frame,
        area: Rect,
        chapters: &[ChapterSummary],
        selected: usize,
    ) {
        if chapters.is_empty() || area.height == 0 {
            return;
        }

        let capacity = (area.height / CHAPTER_CARD_HEIGHT).max(1) as usize;
        let (start, end) = visible_window(selected, capacity, chapters.len());
        let constraints: Vec<Constraint> = (start..end)
            .map(|_| Constraint::Length(CHAPTER_CARD_HEIGHT))
            .collect();
        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints(constraints)
            .split(area);

        for (chunk, (index, chapter)) in rows
            .iter()
            .zip(chapters.iter().enumerate().skip(start).take(end - start))
        {
            if chunk.height == 0 {
                continue;
            }
            let is_selected = index == selected;
            let mut block = Block::default().borders(Borders::ALL);
            let mut style = Style::default();
            if is_selected {
                block = block.style(Style::default().fg(Color::Yellow));
                style = Style::default().fg(Color::Yellow);
            }

            let marker = if is_selected { "▶ " } else { "" };
            let lines = vec![
                Line::from(vec![
                    Span::styled(
                        format!("{marker}{:>3}  {}", chapter.number, chapter.transliterated_name),
                        Style::default().add_modifier(Modifier::BOLD),
                    ),
                    Span::raw("   "),
                    Span::styled(chapter.native_name.clone(), Style::default().fg(Color::Green)),
                ]),
                Line::from(Span::styled(
                    chapter.translated_title.clone(),
                    Style::default().fg(Color::Gray),
                )),
                Line::from(Span::styled(
                    meta_line(&chapter.origin_category, chapter.verse_count),
                    Style::default().fg(Color::DarkGray),
                )),
            ];

            let card = Paragraph::new(lines)
                .block(block)
                .wrap(Wrap { trim: true })
                .style(style);
            frame.render_widget(card, *chunk);
        }
    }

    fn draw_detail(&self, frame: &mut Frame, area: Rect, detail: &DetailScreen) {
        let block = Block::default()
            .borders(Borders::ALL)
            .title(detail.title().to_string());
        frame.render_widget(block.clone(), area);
        let inner = block.inner(area);

        let resolution = match &detail.state {
            LoadState::Loading => {
                draw_message(frame, inner, "Loading Surah...", None);
                return;
            }
            LoadState::Failed(message) => {
                draw_message(frame, inner, "Failed to load Surah data", Some(message.clone()));
                return;
            }
            LoadState::Loaded(resolution) => resolution,
        };
        let chapter = resolution.chapter();

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(4),
                Constraint::Length(if resolution.is_placeholder() { 2 } else { 1 }),
                Constraint::Min(0),
            ])
            .split(inner);

        let header = Paragraph::new(vec![
            Line::from(Span::styled(
                chapter.native_name.clone(),
                Style::default()
                    .fg(Color::Green)
                    .add_modifier(Modifier::BOLD),
            )),
            Line::from(Span::styled(
                chapter.transliterated_name.clone(),
                Style::default().add_modifier(Modifier::BOLD),
            )),
            Line::from(Span::styled(
                chapter.translated_title.clone(),
                Style::default().fg(Color::Gray),
            )),
            Line::from(Span::styled(
                meta_line(&chapter.origin_category, chapter.verse_count),
                Style::default().fg(Color::DarkGray),
            )),
        ])
        .alignment(Alignment::Center);
        frame.render_widget(header, chunks[0]);

        let mut banner = vec![Line::from(Span::styled(
            INVOCATION,
            Style::default().fg(Color::Green),
        ))];
        if resolution.is_placeholder() {
            banner.push(Line::from(Span::styled(
                "Sample content: the full text of this sura is not bundled yet.",
                Style::default().fg(Color::Yellow),
            )));
        }
        frame.render_widget(
            Paragraph::new(banner).alignment(Alignment::Center),
            chunks[1],
        );

        self.render_verses(frame, chunks[2], detail, &chapter.verses);
    }

    fn render_verses(&self, frame: &mut Frame, area: Rect, detail: &DetailScreen, verses: &[Verse]) {
        if verses.is_empty() || area.height == 0 {
            return;
        }

        let card_height: u16 = if detail.show_transliteration { 4 } else { 3 };
        let capacity = (area.height / card_height).max(1) as usize;
        let (start, end) = visible_window(detail.selected, capacity, verses.len());
        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints(vec![Constraint::Length(card_height); end - start])
            .split(area);

        for (chunk, (index, verse)) in rows
            .iter()
            .zip(verses.iter().enumerate().skip(start).take(end - start))
        {
            let is_selected = index == detail.selected;
            let playing = self.player.is_playing(verse.global_number);
            let icon = if playing { "■" } else { "▶" };

            let mut block = Block::default()
                .borders(Borders::ALL)
                .title(format!(" {icon} {} ", verse.number_in_chapter));
            if is_selected {
                block = block.style(Style::default().fg(Color::Yellow));
            }
            if verse.prostration_required {
                block = block.title_bottom(" sajda ");
            }

            let mut lines = vec![Line::from(verse.text.clone())];
            if detail.show_transliteration {
                lines.push(Line::from(Span::styled(
                    verse.transliteration.clone(),
                    Style::default().fg(Color::Gray),
                )));
            }

            let paragraph = Paragraph::new(lines)
                .block(block)
                .alignment(Alignment::Right)
                .wrap(Wrap { trim: true });
            frame.render_widget(paragraph, *chunk);
        }
    }

    fn draw_footer(&self, frame: &mut Frame, area: Rect) {
        let block = Block::default().borders(Borders::TOP);
        frame.render_widget(block.clone(), area);
        let inner = block.inner(area);

        let status_line = if let Some(status) = &self.status {
            Line::from(vec![Span::styled(status.text.clone(), status.kind.style())])
        } else {
            Line::from("")
        };

        let paragraph = Paragraph::new(vec![status_line, self.footer_instructions()])
            .wrap(Wrap { trim: true });
        frame.render_widget(paragraph, inner);
    }

    fn draw_search_bar(&self, frame: &mut Frame, area: Rect, state: &SearchState) {
        let height = 3u16.min(area.height);
        let popup_area = Rect {
            x: area.x,
            y: area.y,
            width: area.width,
            height,
        };
        frame.render_widget(Clear, popup_area);

        let block = Block::default().borders(Borders::ALL).title("Search");
        let paragraph = Paragraph::new(Span::raw(format!("Search: {}", state.query)))
            .block(block.clone())
            .wrap(Wrap { trim: true });
        frame.render_widget(paragraph, popup_area);

        let inner = block.inner(popup_area);
        let typed = u16::try_from("Search: ".len() + state.query.chars().count()).unwrap_or(u16::MAX);
        let cursor_x = inner
            .x
            .saturating_add(typed)
            .min(inner.right().saturating_sub(1));
        frame.set_cursor_position((cursor_x, inner.y));
    }

    fn footer_instructions(&self) -> Line<'static> {
        let key_style = Style::default()
            .fg(Color::Cyan)
            .add_modifier(Modifier::BOLD);
        let hints: &[(&str, &str)] = match (&self.screen, &self.mode) {
            (_, Mode::Searching(_)) => &[
                ("[↑↓]", " Navigate   "),
                ("[Enter]", " Open   "),
                ("[Esc]", " Clear search"),
            ],
            (Screen::List, Mode::Normal) => &[
                ("[↑↓]", " Navigate   "),
                ("[Enter]", " Open   "),
                ("[f]", " Search   "),
                ("[r]", " Reload   "),
                ("[q]", " Quit"),
            ],
            (Screen::Detail(_), Mode::Normal) => &[
                ("[↑↓]", " Ayah   "),
                ("[Enter]", " Play/Stop   "),
                ("[s]", " Stop   "),
                ("[t]", " Transliteration   "),
                ("[Esc]", " Back   "),
                ("[q]", " Quit"),
            ],
        };

        Line::from(
            hints
                .iter()
                .flat_map(|(key, label)| {
                    [
                        Span::styled(key.to_string(), key_style),
                        Span::raw(label.to_string()),
                    ]
                })
                .collect::<Vec<_>>(),
        )
    }
}

/// Centered headline with an optional detail line below it.
fn draw_message(frame: &mut Frame, area: Rect, headline: &str, detail: Option<String>) {
    let mut lines = vec![Line::from(Span::styled(
        headline.to_string(),
        Style::default().add_modifier(Modifier::BOLD),
    ))];
    if let Some(detail) = detail {
        lines.push(Line::from(Span::styled(
            detail,
            Style::default().fg(Color::Red),
        )));
    }
    let paragraph = Paragraph::new(lines)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true });
    frame.render_widget(paragraph, centered_rect(80, 40, area));
}
