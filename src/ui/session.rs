//! Interactive search session
//!
//! Runs the as-you-type search loop: keystrokes edit the input line, every
//! text change goes through the suggestion engine, completed requests come
//! back over a channel, and the dropdown below the prompt is replaced per
//! response. Arrow keys move the highlight with wraparound, Enter opens the
//! highlighted catalog page in the browser, Esc or a mouse click outside
//! the widget dismisses the dropdown.
//!
//! All widget state lives in this struct; event handlers receive it
//! explicitly instead of capturing it.

use std::io::{self, Write};

use crossterm::event::{
    DisableMouseCapture, EnableMouseCapture, Event, EventStream, KeyCode, KeyEvent, KeyEventKind,
    KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
};
use crossterm::{cursor, execute, terminal};
use futures::StreamExt;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use super::input::{InputChange, SearchInput};
use super::render::Renderer;
use crate::error::Result;
use crate::history::SearchHistory;
use crate::server::CatalogClient;
use crate::suggest::{Acceptance, QueryAction, SuggestEngine, SuggestOutcome};

/// Capacity of the fetch-outcome channel
const OUTCOME_CHANNEL_SIZE: usize = 16;

/// Options controlling session behavior
pub struct SessionOptions {
    /// Prompt shown before the input text
    pub prompt: String,

    /// Enable colored output
    pub color_enabled: bool,

    /// Maximum number of dropdown rows drawn
    pub max_dropdown_rows: usize,

    /// Capture mouse events for click activation and click-away dismissal
    pub mouse_enabled: bool,
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self {
            prompt: "search> ".to_string(),
            color_enabled: true,
            max_dropdown_rows: 12,
            mouse_enabled: true,
        }
    }
}

/// Interactive search session state
pub struct SearchSession {
    /// Suggestion engine (gating, sequencing, dropdown construction)
    engine: SuggestEngine,

    /// Catalog client for resolving target URLs
    client: CatalogClient,

    /// Search input line
    input: SearchInput,

    /// Open dropdown, if any
    dropdown: Option<crate::suggest::Dropdown>,

    /// History of activated searches
    history: SearchHistory,

    /// Widget renderer
    renderer: Renderer,

    /// Capture mouse events
    mouse_enabled: bool,

    /// Terminal row of the input line
    origin_row: u16,

    /// Dropdown rows currently on screen
    rendered_rows: u16,

    /// Query text of the last engine dispatch, for change detection
    last_query: String,

    /// Widget needs redrawing
    dirty: bool,
}

impl SearchSession {
    /// Create a new session
    ///
    /// # Arguments
    /// * `engine` - Suggestion engine
    /// * `client` - Catalog client
    /// * `history` - Search history
    /// * `options` - Session options
    ///
    /// # Returns
    /// * `Self` - New session
    pub fn new(
        engine: SuggestEngine,
        client: CatalogClient,
        history: SearchHistory,
        options: SessionOptions,
    ) -> Self {
        let renderer = Renderer::new(
            options.prompt.clone(),
            options.color_enabled,
            options.max_dropdown_rows,
        );
        Self {
            engine,
            client,
            input: SearchInput::new(),
            dropdown: None,
            history,
            renderer,
            mouse_enabled: options.mouse_enabled,
            origin_row: 0,
            rendered_rows: 0,
            last_query: String::new(),
            dirty: false,
        }
    }

    /// Run the session until the user quits
    ///
    /// Enters raw mode (and mouse capture when enabled) for the duration of
    /// the loop and restores the terminal afterwards, also on error.
    ///
    /// # Returns
    /// * `Result<()>` - Ok when the session ended normally
    pub async fn run(&mut self) -> Result<()> {
        let mut stdout = io::stdout();

        terminal::enable_raw_mode()?;
        if self.mouse_enabled {
            execute!(stdout, EnableMouseCapture)?;
        }

        let outcome = self.event_loop(&mut stdout).await;

        if self.mouse_enabled {
            let _ = execute!(stdout, DisableMouseCapture);
        }
        let _ = terminal::disable_raw_mode();
        let _ = execute!(
            stdout,
            cursor::MoveTo(0, self.origin_row),
            terminal::Clear(terminal::ClearType::FromCursorDown),
            cursor::Show
        );
        let _ = writeln!(stdout);

        if let Err(e) = self.history.save() {
            warn!(error = %e, "Failed to save search history");
        }

        outcome
    }

    /// The select loop over terminal events and fetch outcomes
    async fn event_loop(&mut self, out: &mut (impl Write + Send)) -> Result<()> {
        self.origin_row = cursor::position().map(|(_, row)| row).unwrap_or(0);

        let (tx, mut rx) = mpsc::channel::<SuggestOutcome>(OUTCOME_CHANNEL_SIZE);
        let mut events = EventStream::new();

        self.redraw(out)?;

        loop {
            tokio::select! {
                maybe_event = events.next() => {
                    match maybe_event {
                        Some(Ok(event)) => {
                            if !self.handle_event(event, &tx) {
                                break;
                            }
                        }
                        Some(Err(e)) => {
                            warn!(error = %e, "Terminal event stream failed");
                            break;
                        }
                        None => break,
                    }
                }
                Some(outcome) = rx.recv() => {
                    self.handle_outcome(outcome);
                }
            }

            if self.dirty {
                self.redraw(out)?;
            }
        }

        Ok(())
    }

    /// Handle one terminal event
    ///
    /// # Returns
    /// * `bool` - False when the session should end
    fn handle_event(&mut self, event: Event, tx: &mpsc::Sender<SuggestOutcome>) -> bool {
        match event {
            Event::Key(key) if key.kind == KeyEventKind::Press => self.handle_key(&key, tx),
            Event::Mouse(mouse) => {
                self.handle_mouse(&mouse);
                true
            }
            Event::Resize(..) => {
                self.dirty = true;
                true
            }
            _ => true,
        }
    }

    /// Handle one key press
    ///
    /// # Returns
    /// * `bool` - False when the session should end
    fn handle_key(&mut self, key: &KeyEvent, tx: &mpsc::Sender<SuggestOutcome>) -> bool {
        match (key.code, key.modifiers) {
            (KeyCode::Char('c'), KeyModifiers::CONTROL)
            | (KeyCode::Char('d'), KeyModifiers::CONTROL) => return false,
            (KeyCode::Esc, _) => {
                if self.dropdown.is_some() {
                    self.dismiss();
                } else {
                    return false;
                }
            }
            (KeyCode::Enter, _) => {
                self.activate_selection();
            }
            (KeyCode::Down, _) => {
                if let Some(dropdown) = self.dropdown.as_mut() {
                    dropdown.select_next();
                    self.dirty = true;
                }
            }
            (KeyCode::Up, _) => {
                if let Some(dropdown) = self.dropdown.as_mut() {
                    dropdown.select_prev();
                    self.dirty = true;
                }
            }
            _ => match self.input.handle_key(key) {
                InputChange::Edited => {
                    self.dirty = true;
                    self.refresh_query(tx);
                }
                InputChange::CursorMoved => {
                    self.dirty = true;
                }
                InputChange::Ignored => {}
            },
        }
        true
    }

    /// Handle a mouse event
    ///
    /// Left click on a dropdown item activates it; a click anywhere outside
    /// the input line and dropdown dismisses the dropdown; a click inside
    /// leaves it open.
    fn handle_mouse(&mut self, mouse: &MouseEvent) {
        if mouse.kind != MouseEventKind::Down(MouseButton::Left) {
            return;
        }

        let bottom = self.origin_row + self.rendered_rows;
        let inside = mouse.row >= self.origin_row && mouse.row <= bottom;
        if !inside {
            if self.dropdown.is_some() {
                self.dismiss();
            }
            return;
        }

        if mouse.row == self.origin_row {
            return;
        }

        let row_index = (mouse.row - self.origin_row - 1) as usize;
        let clicked = self
            .dropdown
            .as_mut()
            .and_then(|dropdown| {
                let item = dropdown.item_at_row(row_index)?;
                dropdown.set_active(Some(item));
                Some(item)
            })
            .is_some();

        if clicked {
            self.dirty = true;
            self.activate_selection();
        }
    }

    /// Dispatch a fetch for the current input text, if it changed
    ///
    /// The open dropdown is removed on every text change; a qualifying
    /// query recreates it when its response arrives.
    fn refresh_query(&mut self, tx: &mpsc::Sender<SuggestOutcome>) {
        let query = self.input.text().to_string();
        if query == self.last_query {
            return;
        }
        self.last_query = query.clone();
        self.dropdown = None;

        if let QueryAction::Fetch(request) = self.engine.begin(&query) {
            self.engine.dispatch(request, tx.clone());
        }
    }

    /// Apply a completed fetch to the dropdown
    fn handle_outcome(&mut self, outcome: SuggestOutcome) {
        match self.engine.accept(outcome) {
            Acceptance::Stale => {}
            Acceptance::Failed(e) => {
                warn!(error = %e, "Suggestion request failed");
                self.dropdown = None;
                self.dirty = true;
            }
            Acceptance::Empty => {
                self.dropdown = None;
                self.dirty = true;
            }
            Acceptance::Fresh(dropdown) => {
                debug!(items = dropdown.item_count(), "Dropdown updated");
                self.dropdown = Some(dropdown);
                self.dirty = true;
            }
        }
    }

    /// Open the highlighted target, if any
    ///
    /// With no highlight this does nothing.
    fn activate_selection(&mut self) {
        let url = self
            .dropdown
            .as_ref()
            .and_then(|dropdown| dropdown.activate())
            .map(|target| target.url(&self.client));

        let Some(url) = url else {
            return;
        };

        info!(url = %url, "Opening catalog page");
        if let Err(e) = open::that(&url) {
            warn!(error = %e, url = %url, "Failed to open browser");
        }
        self.history.record(self.input.text());
        self.dismiss();
    }

    /// Close the dropdown
    fn dismiss(&mut self) {
        self.dropdown = None;
        self.dirty = true;
    }

    /// Redraw the widget and remember its extent for mouse hit-testing
    fn redraw(&mut self, out: &mut impl Write) -> Result<()> {
        let area = terminal::size()?;
        let (origin, rows) = self.renderer.draw(
            out,
            area,
            self.origin_row,
            self.input.text(),
            self.input.cursor_chars(),
            self.dropdown.as_ref(),
        )?;
        self.origin_row = origin;
        self.rendered_rows = rows;
        self.dirty = false;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ServerConfig;
    use crate::server::{SuggestionResponse, TitleHit};
    use crate::suggest::SuggestionProvider;
    use std::sync::Arc;

    struct StaticProvider {
        response: SuggestionResponse,
    }

    #[async_trait::async_trait]
    impl SuggestionProvider for StaticProvider {
        async fn suggest(&self, _query: &str) -> crate::error::Result<SuggestionResponse> {
            Ok(self.response.clone())
        }
    }

    fn sample_response() -> SuggestionResponse {
        SuggestionResponse {
            titles: vec![TitleHit {
                id: "1".to_string(),
                title: "Foo".to_string(),
            }],
            topics: vec!["Bar".to_string()],
        }
    }

    fn test_session() -> SearchSession {
        let client = CatalogClient::new(&ServerConfig::default()).expect("valid config");
        let provider = Arc::new(StaticProvider {
            response: sample_response(),
        });
        SearchSession::new(
            SuggestEngine::new(provider, 2),
            client,
            SearchHistory::in_memory(10),
            SessionOptions {
                mouse_enabled: false,
                color_enabled: false,
                ..SessionOptions::default()
            },
        )
    }

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn click(row: u16) -> MouseEvent {
        MouseEvent {
            kind: MouseEventKind::Down(MouseButton::Left),
            column: 0,
            row,
            modifiers: KeyModifiers::NONE,
        }
    }

    async fn type_query(session: &mut SearchSession, text: &str) -> Vec<SuggestOutcome> {
        let (tx, mut rx) = mpsc::channel(OUTCOME_CHANNEL_SIZE);
        for c in text.chars() {
            session.handle_key(&press(KeyCode::Char(c)), &tx);
        }
        drop(tx);
        let mut outcomes = Vec::new();
        while let Some(outcome) = rx.recv().await {
            outcomes.push(outcome);
        }
        outcomes
    }

    /// Drive a full typed query and apply the surviving outcome
    async fn open_dropdown(session: &mut SearchSession) {
        let outcomes = type_query(session, "fo").await;
        for outcome in outcomes {
            session.handle_outcome(outcome);
        }
        assert!(session.dropdown.is_some());
    }

    #[tokio::test]
    async fn test_short_query_issues_no_request() {
        let mut session = test_session();
        let outcomes = type_query(&mut session, "f").await;

        assert!(outcomes.is_empty());
        assert!(session.dropdown.is_none());
    }

    #[tokio::test]
    async fn test_qualifying_query_opens_dropdown() {
        let mut session = test_session();
        open_dropdown(&mut session).await;

        let dropdown = session.dropdown.as_ref().expect("open dropdown");
        assert_eq!(dropdown.item_count(), 3);
    }

    #[tokio::test]
    async fn test_stale_outcomes_are_discarded() {
        let mut session = test_session();
        let outcomes = type_query(&mut session, "fo").await;

        // Typing "f" then "fo" dispatches one request ("fo"); its seq is
        // the engine's newest, so the outcome survives. Outcomes replayed
        // afterwards with the same seq are idempotent; a replay of an older
        // seq must not clear the fresh dropdown.
        for outcome in outcomes {
            session.handle_outcome(outcome);
        }
        let before = session.dropdown.as_ref().map(|d| d.query().to_string());

        session.handle_outcome(SuggestOutcome {
            seq: 0,
            query: "f".to_string(),
            result: Ok(SuggestionResponse::default()),
        });

        let after = session.dropdown.as_ref().map(|d| d.query().to_string());
        assert_eq!(before, after);
    }

    #[tokio::test]
    async fn test_arrow_navigation_wraps() {
        let mut session = test_session();
        open_dropdown(&mut session).await;
        let (tx, _rx) = mpsc::channel(1);

        session.handle_key(&press(KeyCode::Down), &tx);
        assert_eq!(session.dropdown.as_ref().unwrap().active(), Some(0));

        session.handle_key(&press(KeyCode::Up), &tx);
        session.handle_key(&press(KeyCode::Up), &tx);
        assert_eq!(session.dropdown.as_ref().unwrap().active(), Some(1));
    }

    #[tokio::test]
    async fn test_escape_dismisses_then_quits() {
        let mut session = test_session();
        open_dropdown(&mut session).await;
        let (tx, _rx) = mpsc::channel(1);

        assert!(session.handle_key(&press(KeyCode::Esc), &tx));
        assert!(session.dropdown.is_none());

        assert!(!session.handle_key(&press(KeyCode::Esc), &tx));
    }

    #[tokio::test]
    async fn test_enter_without_selection_does_nothing() {
        let mut session = test_session();
        open_dropdown(&mut session).await;
        let (tx, _rx) = mpsc::channel(1);

        session.handle_key(&press(KeyCode::Enter), &tx);

        // No selection: no navigation, dropdown stays, nothing recorded
        assert!(session.dropdown.is_some());
        assert!(session.history.entries().is_empty());
    }

    #[tokio::test]
    async fn test_click_outside_dismisses() {
        let mut session = test_session();
        open_dropdown(&mut session).await;
        session.rendered_rows = 5;

        session.handle_mouse(&click(20));
        assert!(session.dropdown.is_none());
    }

    #[tokio::test]
    async fn test_click_inside_keeps_dropdown() {
        let mut session = test_session();
        open_dropdown(&mut session).await;
        session.rendered_rows = 5;

        // The input line itself and header rows are inside the widget
        session.handle_mouse(&click(0));
        assert!(session.dropdown.is_some());
        session.handle_mouse(&click(2));
        assert!(session.dropdown.is_some());
    }

    #[tokio::test]
    async fn test_failed_outcome_clears_dropdown() {
        let mut session = test_session();
        open_dropdown(&mut session).await;

        let (tx, mut rx) = mpsc::channel(OUTCOME_CHANNEL_SIZE);
        session.handle_key(&press(KeyCode::Char('x')), &tx);
        drop(tx);
        let outcome = rx.recv().await.expect("outcome");

        session.handle_outcome(SuggestOutcome {
            seq: outcome.seq,
            query: outcome.query,
            result: Err(crate::error::ServerError::BadStatus(500).into()),
        });
        assert!(session.dropdown.is_none());
    }

    #[tokio::test]
    async fn test_clearing_query_removes_dropdown() {
        let mut session = test_session();
        open_dropdown(&mut session).await;
        let (tx, _rx) = mpsc::channel(OUTCOME_CHANNEL_SIZE);

        session.handle_key(&press(KeyCode::Backspace), &tx);
        assert!(session.dropdown.is_none());
    }
}
