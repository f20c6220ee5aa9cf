use crate::add_lane::{AddLaneFlow, ConfirmStep, VerifyStep};
use crate::event::AppEvent;
use crate::manager::LaneManager;
use anyhow::Result;
use crossterm::{
    event::{Event, EventStream, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use futures::StreamExt;
use log::{error, info, warn};
use ratatui::{Terminal, backend::Backend};
use std::io;
use std::process::{Command, Stdio};
use tokio::sync::mpsc::UnboundedReceiver;

pub struct App {
    pub should_quit: bool,
    pub manager: LaneManager,
    pub add_flow: AddLaneFlow,
    pub focused_lane: usize,
    pub selected_post: Option<usize>,
    /// Shown in the status line until the next key press.
    pub notice: Option<String>,
}

impl App {
    /// Takes over the manager and builds every saved lane.
    pub fn new(mut manager: LaneManager) -> App {
        manager.render_all();
        App {
            should_quit: false,
            manager,
            add_flow: AddLaneFlow::new(),
            focused_lane: 0,
            selected_post: None,
            notice: None,
        }
    }

    // ===================================== Focus & selection =====================================

    fn focus_lane(&mut self, index: usize) {
        self.focused_lane = index;
        self.selected_post = None;
    }

    pub fn focus_next_lane(&mut self) {
        let count = self.manager.regions().len();
        if count > 0 {
            self.focus_lane((self.focused_lane + 1) % count);
        }
    }

    pub fn focus_prev_lane(&mut self) {
        let count = self.manager.regions().len();
        if count > 0 {
            self.focus_lane((self.focused_lane + count - 1) % count);
        }
    }

    fn focused_post_count(&self) -> usize {
        self.manager
            .regions()
            .get(self.focused_lane)
            .map_or(0, |lane| lane.view().entries().len())
    }

    pub fn select_next_post(&mut self) {
        let count = self.focused_post_count();
        if count == 0 {
            self.selected_post = None;
            return;
        }
        self.selected_post = Some(self.selected_post.map_or(0, |i| (i + 1).min(count - 1)));
    }

    pub fn select_prev_post(&mut self) {
        let count = self.focused_post_count();
        if count == 0 {
            self.selected_post = None;
            return;
        }
        self.selected_post = Some(self.selected_post.map_or(0, |i| i.saturating_sub(1)));
    }

    // ========================================= Lane actions ======================================

    pub fn refresh_focused(&mut self) {
        self.selected_post = None;
        self.manager.refresh_lane(self.focused_lane);
    }

    pub fn refresh_all(&mut self) {
        self.selected_post = None;
        self.manager.refresh_all();
    }

    pub fn delete_focused(&mut self) {
        let Some(id) = self.manager.regions().get(self.focused_lane).map(|lane| lane.id().clone())
        else {
            return;
        };
        if let Err(e) = self.manager.remove_lane(&id) {
            error!("delete of r/{} failed: {}", id, e);
            self.notice = Some(e.to_string());
            return;
        }
        let count = self.manager.regions().len();
        self.focus_lane(self.focused_lane.min(count.saturating_sub(1)));
    }

    pub fn open_selected_post(&mut self) {
        let url = self
            .selected_post
            .and_then(|i| self.manager.regions().get(self.focused_lane)?.view().entries().get(i))
            .map(|entry| entry.url.clone());
        let Some(url) = url else {
            return;
        };
        if let Err(e) = open_in_browser(&url) {
            warn!("could not open {}: {}", url, e);
            self.notice = Some(format!("Could not open browser: {}", e));
        }
    }

    fn confirm_add(&mut self) {
        match self.add_flow.confirm(self.manager.lanes()) {
            ConfirmStep::Ignore => {}
            ConfirmStep::Reject(notice) => self.notice = Some(notice),
            ConfirmStep::Verify(id) => self.manager.spawn_verify(id),
        }
    }

    // ======================================== Event handling =====================================

    pub fn on_event(&mut self, event: AppEvent) {
        match event {
            AppEvent::LaneVerified { id, outcome } => match self.add_flow.finish(id, outcome) {
                VerifyStep::Accept(id) => match self.manager.add_lane(id) {
                    Ok(()) => self.focus_lane(0),
                    Err(e) => self.notice = Some(e.to_string()),
                },
                VerifyStep::Reject(notice) => self.notice = Some(notice),
            },
            loaded @ AppEvent::PostsLoaded { .. } => {
                self.manager.apply(loaded);
            }
        }
    }

    pub fn on_key(&mut self, key: KeyEvent) {
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            self.should_quit = true;
            return;
        }
        self.notice = None;

        if self.add_flow.is_open() {
            match key.code {
                KeyCode::Enter => self.confirm_add(),
                KeyCode::Esc => self.add_flow.cancel(),
                KeyCode::Backspace => self.add_flow.backspace(),
                KeyCode::Char(c) => self.add_flow.push_char(c),
                _ => {}
            }
            return;
        }

        match key.code {
            KeyCode::Char('q') => self.should_quit = true,
            KeyCode::Char('a') => self.add_flow.open(),
            KeyCode::Char('r') => self.refresh_focused(),
            KeyCode::Char('R') => self.refresh_all(),
            KeyCode::Char('d') => self.delete_focused(),
            KeyCode::Char('o') | KeyCode::Enter => self.open_selected_post(),
            KeyCode::Right | KeyCode::Tab => self.focus_next_lane(),
            KeyCode::Left | KeyCode::BackTab => self.focus_prev_lane(),
            KeyCode::Down => self.select_next_post(),
            KeyCode::Up => self.select_prev_post(),
            _ => {}
        }
    }
}

/// Hands the URL to the desktop's browser as a detached process.
pub fn open_in_browser(url: &str) -> io::Result<()> {
    let mut command = if cfg!(target_os = "macos") {
        let mut c = Command::new("open");
        c.arg(url);
        c
    } else if cfg!(target_os = "windows") {
        let mut c = Command::new("cmd");
        c.args(["/C", "start", "", url]);
        c
    } else {
        let mut c = Command::new("xdg-open");
        c.arg(url);
        c
    };
    command.stdin(Stdio::null()).stdout(Stdio::null()).stderr(Stdio::null()).spawn()?;
    info!("opened {}", url);
    Ok(())
}

pub async fn start_ui(mut app: App, events: UnboundedReceiver<AppEvent>) -> Result<()> {
    // Set up the terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = ratatui::backend::CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let res = run_app_loop(&mut terminal, &mut app, events).await;

    // Restore the terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    res
}

pub async fn run_app_loop<B: Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
    mut events: UnboundedReceiver<AppEvent>,
) -> Result<()> {
    let mut input = EventStream::new();

    while !app.should_quit {
        terminal.draw(|f| crate::ui::ui(f, app))?;

        tokio::select! {
            maybe_input = input.next() => match maybe_input {
                Some(Ok(Event::Key(key))) if key.kind == KeyEventKind::Press => app.on_key(key),
                Some(Ok(_)) => {}
                Some(Err(e)) => return Err(e.into()),
                None => break,
            },
            Some(event) = events.recv() => app.on_event(event),
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::display::LaneDisplayState;
    use crate::feed::FeedId;
    use crate::fetch::{DEFAULT_HOST, FakeSource, FeedFetcher, RawResponse};
    use crate::storage::{LaneStore, MemoryStore};
    use std::sync::Arc;
    use tokio::sync::mpsc;

    const BASE: &str = "https://www.reddit.com/r";

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn type_text(app: &mut App, text: &str) {
        text.chars().for_each(|c| app.on_key(key(KeyCode::Char(c))));
    }

    fn app_with(source: FakeSource) -> (App, UnboundedReceiver<AppEvent>, MemoryStore) {
        let store = MemoryStore::new();
        let fetcher = Arc::new(FeedFetcher::new(DEFAULT_HOST, Arc::new(source)).unwrap());
        let (tx, rx) = mpsc::unbounded_channel();
        let manager = LaneManager::new(LaneStore::new(Box::new(store.clone())), fetcher, tx);
        (App::new(manager), rx, store)
    }

    async fn next_verification(app: &mut App, rx: &mut UnboundedReceiver<AppEvent>) {
        loop {
            let event = rx.recv().await.unwrap();
            let done = matches!(event, AppEvent::LaneVerified { .. });
            app.on_event(event);
            if done {
                return;
            }
        }
    }

    fn lane_names(app: &App) -> Vec<String> {
        app.manager.lanes().ids().iter().map(FeedId::to_string).collect()
    }

    #[tokio::test]
    async fn adding_a_verified_subreddit_prepends_a_lane() {
        let source = FakeSource::new()
            .respond(&format!("{}/typescript/about.json", BASE), RawResponse::ok(r#"{"kind":"t5"}"#));
        let (mut app, mut rx, store) = app_with(source);

        app.on_key(key(KeyCode::Char('a')));
        type_text(&mut app, "r/typescript");
        app.on_key(key(KeyCode::Enter));
        assert!(app.add_flow.is_pending());

        next_verification(&mut app, &mut rx).await;
        assert_eq!(lane_names(&app), vec!["typescript", "learnprogramming", "javascript"]);
        assert_eq!(app.manager.regions()[0].id().as_str(), "typescript");
        assert!(!app.add_flow.is_open());
        assert_eq!(store.writes(), 1);
    }

    #[tokio::test]
    async fn adding_a_present_subreddit_is_rejected() {
        let (mut app, _rx, store) = app_with(FakeSource::new());

        app.on_key(key(KeyCode::Char('a')));
        type_text(&mut app, "JAVASCRIPT");
        app.on_key(key(KeyCode::Enter));

        assert_eq!(app.notice.as_deref(), Some("Subreddit already added"));
        assert!(!app.add_flow.is_open());
        assert_eq!(lane_names(&app), vec!["learnprogramming", "javascript"]);
        assert_eq!(store.writes(), 0);
    }

    #[tokio::test]
    async fn unknown_subreddit_keeps_modal_open() {
        let (mut app, mut rx, _store) = app_with(FakeSource::new());

        app.on_key(key(KeyCode::Char('a')));
        type_text(&mut app, "doesnotexist");
        app.on_key(key(KeyCode::Enter));
        next_verification(&mut app, &mut rx).await;

        assert_eq!(app.notice.as_deref(), Some("Subreddit not found or inaccessible: doesnotexist"));
        assert!(app.add_flow.is_open());
        assert!(!app.add_flow.is_pending());
        assert_eq!(app.manager.lanes().len(), 2);
    }

    #[tokio::test]
    async fn keys_typed_in_modal_do_not_trigger_lane_actions() {
        let (mut app, _rx, _store) = app_with(FakeSource::new());
        app.on_key(key(KeyCode::Char('a')));
        type_text(&mut app, "dq");
        assert!(!app.should_quit);
        assert_eq!(app.manager.regions().len(), 2);
        assert_eq!(app.add_flow.input(), "dq");

        app.on_key(key(KeyCode::Esc));
        assert!(!app.add_flow.is_open());
    }

    #[tokio::test]
    async fn delete_removes_focused_lane() {
        let (mut app, _rx, store) = app_with(FakeSource::new());
        app.on_key(key(KeyCode::Right));
        app.on_key(key(KeyCode::Char('d')));

        assert_eq!(lane_names(&app), vec!["learnprogramming"]);
        assert_eq!(app.focused_lane, 0);
        assert_eq!(store.writes(), 1);
    }

    #[tokio::test]
    async fn refresh_puts_lane_back_into_loading() {
        let body = r#"{"data":{"children":[]}}"#;
        let source = FakeSource::new()
            .respond(&format!("{}/learnprogramming.json", BASE), RawResponse::ok(body))
            .respond(&format!("{}/javascript.json", BASE), RawResponse::ok(body));
        let (mut app, mut rx, _store) = app_with(source);
        for _ in 0..2 {
            let event = rx.recv().await.unwrap();
            app.on_event(event);
        }
        assert_eq!(app.manager.regions()[0].view().state(), &LaneDisplayState::Empty);

        app.on_key(key(KeyCode::Char('r')));
        assert_eq!(app.manager.regions()[0].view().state(), &LaneDisplayState::Loading);
        assert_eq!(app.manager.regions()[1].view().state(), &LaneDisplayState::Empty);
    }

    #[tokio::test]
    async fn quit_keys() {
        let (mut app, _rx, _store) = app_with(FakeSource::new());
        app.on_key(key(KeyCode::Char('q')));
        assert!(app.should_quit);

        let (mut app, _rx, _store) = app_with(FakeSource::new());
        app.on_key(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL));
        assert!(app.should_quit);
    }
}
