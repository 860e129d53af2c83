// TUI module - Terminal User Interface
//
// This module manages the terminal UI using ratatui. It handles:
// - Terminal initialization and cleanup
// - Event loop (keyboard and mouse input, animation ticks, fetch results)
// - Layered input dispatch into the app state

pub mod app;
pub mod components;
pub mod input;
pub mod popover;
pub mod portal;
pub mod scroll;
pub mod theme;
pub mod traits;
pub mod views;

use crate::api::SharedSource;
use crate::config::Config;
use crate::events::AppEvent;
use crate::logging::LogBuffer;
use anyhow::{Context, Result};
use app::{App, View};
use crossterm::{
    event::{
        self, DisableFocusChange, DisableMouseCapture, EnableFocusChange, EnableMouseCapture,
        Event, KeyCode, KeyEvent, KeyEventKind, MouseButton, MouseEvent, MouseEventKind,
    },
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use popover::{DocumentEvent, Propagation};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io;
use std::time::{Duration, Instant};
use tokio::sync::mpsc;
use traits::{Interactive, Scrollable};

/// Animation frame interval (~30 FPS)
const TICK: Duration = Duration::from_millis(33);

/// Run the TUI
///
/// Sets up the terminal, starts the first list load, runs the event loop and
/// restores the terminal when done.
pub async fn run_tui(
    config: Config,
    source: SharedSource,
    source_name: String,
    log_buffer: LogBuffer,
) -> Result<()> {
    // Set up terminal
    enable_raw_mode().context("Failed to enable raw mode")?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture, EnableFocusChange)
        .context("Failed to setup terminal")?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend).context("Failed to create terminal")?;

    let (event_tx, mut event_rx) = mpsc::unbounded_channel();
    let mut app = App::new(&config, source, source_name, log_buffer, event_tx);
    app.reload();

    // Run the event loop
    let result = run_event_loop(&mut terminal, &mut app, &mut event_rx).await;

    // Restore terminal
    disable_raw_mode().context("Failed to disable raw mode")?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture,
        DisableFocusChange
    )
    .context("Failed to restore terminal")?;
    terminal.show_cursor().context("Failed to show cursor")?;

    result
}

/// Main event loop
///
/// Waits on three sources and handles whichever is ready first:
/// 1. Terminal input (keys, mouse, focus)
/// 2. Animation ticks
/// 3. Fetch results from background tasks
async fn run_event_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    event_rx: &mut mpsc::UnboundedReceiver<AppEvent>,
) -> Result<()> {
    let mut tick_interval = tokio::time::interval(TICK);
    let mut last_tick = Instant::now();
    // Idle screens are not redrawn on every tick
    let mut dirty = true;

    loop {
        if dirty {
            terminal
                .draw(|f| views::draw(f, app))
                .context("Failed to draw terminal")?;
            dirty = false;
        }

        tokio::select! {
            // Keyboard, mouse or focus input
            read = async {
                if !event::poll(Duration::from_millis(10)).unwrap_or(false) {
                    return false;
                }
                match event::read() {
                    Ok(Event::Key(key_event)) => handle_key_event(app, key_event),
                    Ok(Event::Mouse(mouse_event)) => handle_mouse_event(app, mouse_event),
                    Ok(Event::FocusLost) => app.release_keys(),
                    Ok(Event::Resize(..)) => {}
                    _ => return false,
                }
                true
            } => dirty |= read,

            _ = tick_interval.tick() => {
                let now = Instant::now();
                let animating = app.is_animating();
                app.tick(now.duration_since(last_tick));
                last_tick = now;
                dirty |= animating;
            }

            Some(app_event) = event_rx.recv() => {
                app.handle_app_event(app_event);
                dirty = true;
            }
        }

        if app.should_quit {
            break;
        }
    }

    Ok(())
}

/// Handle keyboard input
/// Layered dispatch: Document listeners → Open overlay → Global → View
fn handle_key_event(app: &mut App, key_event: KeyEvent) {
    match key_event.kind {
        KeyEventKind::Press => {}
        KeyEventKind::Release => {
            app.handle_key_release(key_event.code);
            return;
        }
        _ => return,
    }

    let key = key_event.code;
    if !app.handle_key_press(key) {
        return;
    }

    // Layer 1: dismissal listeners (Escape on the newest open overlay)
    if app.document.dispatch(&DocumentEvent::KeyDown(key)) == Propagation::Stop {
        app.sync_overlays();
        return;
    }

    // Layer 2: an open overlay captures everything else
    if handle_overlay_input(app, key_event) {
        app.sync_overlays();
        return;
    }

    // Layer 3: global keys
    if handle_global_keys(app, key) {
        return;
    }

    // Layer 4: the current view
    match app.view {
        View::Tabs => match key {
            KeyCode::Enter | KeyCode::Char(' ') => {
                let active = app.tabs.active();
                app.read_more(active);
            }
            _ => {
                app.tabs.handle_key(key_event);
            }
        },
        View::Gallery => {
            app.grid.handle_key(key_event);
        }
    }
    app.sync_overlays();
}

/// Route a key to the topmost open overlay - returns true if one absorbed it
fn handle_overlay_input(app: &mut App, key_event: KeyEvent) -> bool {
    if app.help_open() {
        if key_event.code == KeyCode::Char('?') {
            app.close_help();
        }
        return true;
    }

    if let Some(card) = app.open_card_mut() {
        card.handle_key(key_event);
        return true;
    }

    if app.grid.is_open() {
        app.grid.handle_key(key_event);
        return true;
    }

    false
}

/// Handle global keys - returns true if handled
fn handle_global_keys(app: &mut App, key: KeyCode) -> bool {
    match key {
        KeyCode::Char('q') | KeyCode::Char('Q') => app.should_quit = true,
        KeyCode::Char('?') => app.open_help(),
        KeyCode::Char('g') | KeyCode::F(2) => {
            let view = app.view.toggle();
            app.set_view(view);
        }
        KeyCode::Char('r') => app.reload(),
        KeyCode::Char('t') => app.next_theme(),
        _ => return false,
    }
    true
}

/// Handle mouse input
fn handle_mouse_event(app: &mut App, mouse_event: MouseEvent) {
    match mouse_event.kind {
        MouseEventKind::Down(MouseButton::Left) => {
            handle_click(app, mouse_event.column, mouse_event.row)
        }
        MouseEventKind::ScrollUp => scroll_overlay(app, true),
        MouseEventKind::ScrollDown => scroll_overlay(app, false),
        _ => {}
    }
}

fn handle_click(app: &mut App, column: u16, row: u16) {
    // An open overlay's backdrop takes the click even when it closes it
    let covered = app.overlay_open();
    let propagation = app
        .document
        .dispatch(&DocumentEvent::PointerDown { column, row });

    if covered {
        if propagation == Propagation::Stop {
            click_topmost_overlay(app, column, row);
        }
        app.sync_overlays();
        return;
    }

    match app.view {
        View::Tabs => {
            if let Some(index) = app.tabs.tab_at(column, row) {
                app.tabs.select(index);
                return;
            }
            let active = app.tabs.active();
            if app
                .cards
                .get(active)
                .is_some_and(|card| card.trigger_contains(column, row))
            {
                app.read_more(active);
            }
        }
        View::Gallery => {
            if let Some(id) = app.grid.card_at(column, row) {
                app.grid.select(id);
            }
        }
    }
}

/// Click that landed inside overlay content
fn click_topmost_overlay(app: &mut App, column: u16, row: u16) {
    if app.help_open() {
        if app.help.hits_close_button(column, row) {
            app.close_help();
        }
        return;
    }

    if let Some(card) = app.open_card_mut() {
        card.click_overlay(column, row);
        return;
    }

    if app.grid.is_open() {
        app.grid.click_overlay(column, row);
    }
}

fn scroll_overlay(app: &mut App, up: bool) {
    if app.help_open() {
        return;
    }

    if let Some(card) = app.open_card_mut() {
        if up {
            card.scroll_up();
        } else {
            card.scroll_down();
        }
    } else if app.grid.is_open() {
        if up {
            app.grid.scroll_up();
        } else {
            app.grid.scroll_down();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{BlogSource, FetchError};
    use crate::demo::DemoSource;
    use crossterm::event::{KeyEventState, KeyModifiers};
    use ratatui::{backend::TestBackend, buffer::Buffer};
    use std::sync::Arc;

    struct Harness {
        app: App,
        source: Arc<DemoSource>,
        rx: mpsc::UnboundedReceiver<AppEvent>,
    }

    impl Harness {
        fn new(source: DemoSource) -> Self {
            let source = Arc::new(source);
            let shared: SharedSource = source.clone();
            let (tx, rx) = mpsc::unbounded_channel();
            let app = App::new(&Config::default(), shared, "demo".to_string(), LogBuffer::new(), tx);
            Self { app, source, rx }
        }

        /// Reload and apply the list response
        async fn load(source: DemoSource) -> Self {
            let mut harness = Self::new(source);
            harness.app.reload();
            harness.pump().await;
            harness
        }

        async fn pump(&mut self) {
            let event = self.rx.recv().await.expect("fetch task reports back");
            self.app.handle_app_event(event);
        }

        /// Let spawned tasks run, then confirm none reported anything
        async fn assert_quiet(&mut self) {
            for _ in 0..5 {
                tokio::task::yield_now().await;
            }
            assert!(self.rx.try_recv().is_err(), "unexpected fetch");
        }

        fn press(&mut self, code: KeyCode) {
            handle_key_event(&mut self.app, KeyEvent::new(code, KeyModifiers::NONE));
            handle_key_event(
                &mut self.app,
                KeyEvent::new_with_kind_and_state(
                    code,
                    KeyModifiers::NONE,
                    KeyEventKind::Release,
                    KeyEventState::NONE,
                ),
            );
        }

        fn click(&mut self, column: u16, row: u16) {
            handle_mouse_event(
                &mut self.app,
                MouseEvent {
                    kind: MouseEventKind::Down(MouseButton::Left),
                    column,
                    row,
                    modifiers: KeyModifiers::NONE,
                },
            );
        }

        fn render(&mut self) -> Buffer {
            let mut terminal = Terminal::new(TestBackend::new(100, 40)).unwrap();
            terminal.draw(|f| views::draw(f, &mut self.app)).unwrap();
            terminal.backend().buffer().clone()
        }

        fn settle(&mut self) {
            for _ in 0..60 {
                self.app.tick(TICK);
            }
        }
    }

    fn screen_text(buffer: &Buffer) -> String {
        buffer
            .content()
            .chunks(buffer.area.width as usize)
            .map(|row| row.iter().map(|c| c.symbol()).collect::<String>())
            .collect::<Vec<_>>()
            .join("\n")
    }

    fn demo() -> DemoSource {
        DemoSource::new(Duration::ZERO)
    }

    #[tokio::test]
    async fn opening_a_card_fetches_its_detail_once() {
        let mut h = Harness::load(demo()).await;
        assert_eq!(h.app.list, app::ListState::Loaded);
        assert_eq!(h.app.cards.len(), 3);

        h.press(KeyCode::Enter);
        assert!(h.app.cards[0].is_open());
        h.pump().await;
        assert_eq!(h.source.detail_calls(), 1);
        assert!(h.app.cards[0].loader().detail().is_some());

        // Close and reopen without remounting the card
        h.press(KeyCode::Char('x'));
        assert!(!h.app.cards[0].is_open());
        h.press(KeyCode::Enter);
        assert!(h.app.cards[0].is_open());

        h.assert_quiet().await;
        assert_eq!(h.source.detail_calls(), 1);
    }

    #[tokio::test]
    async fn reopening_while_pending_does_not_refetch() {
        let mut h = Harness::load(demo()).await;

        h.press(KeyCode::Enter);
        h.press(KeyCode::Esc);
        h.press(KeyCode::Enter);
        h.pump().await;

        h.assert_quiet().await;
        assert_eq!(h.source.detail_calls(), 1);
    }

    #[tokio::test]
    async fn escape_closes_and_is_a_no_op_when_closed() {
        let mut h = Harness::load(demo()).await;

        h.press(KeyCode::Enter);
        assert!(h.app.cards[0].is_open());
        assert_eq!(h.app.document.listener_count(), 2);

        h.press(KeyCode::Esc);
        assert!(!h.app.cards[0].is_open());
        assert_eq!(h.app.document.listener_count(), 0);

        h.press(KeyCode::Esc);
        assert!(!h.app.cards[0].is_open());
        assert!(!h.app.overlay_open());
        assert!(!h.app.should_quit);
    }

    #[tokio::test]
    async fn empty_list_renders_no_tabs_and_no_pane() {
        let mut h = Harness::load(DemoSource::with_posts(Vec::new(), Duration::ZERO)).await;

        assert_eq!(h.app.list, app::ListState::Loaded);
        assert!(h.app.tabs.is_empty());

        h.press(KeyCode::Enter);
        h.press(KeyCode::Right);
        assert!(!h.app.overlay_open());

        let text = screen_text(&h.render());
        assert!(text.contains("Latest Insights"));
        assert!(!text.contains("Read More"));
        assert_eq!(h.source.detail_calls(), 0);
    }

    #[tokio::test]
    async fn rejected_list_shows_error_without_skeleton() {
        let mut h = Harness::new(demo().failing_list(FetchError::Http { status: 500 }));
        h.app.reload();

        let loading = screen_text(&h.render());
        assert!(loading.contains('░') || loading.contains('▒'));

        h.pump().await;
        assert!(matches!(h.app.list, app::ListState::Failed(_)));

        let text = screen_text(&h.render());
        assert!(text.contains("Failed to load blogs. Please try again later."));
        assert!(!text.contains('░') && !text.contains('▒'));
    }

    #[tokio::test]
    async fn stale_list_response_is_ignored() {
        let mut h = Harness::new(demo());
        h.app.reload();
        h.app.reload();

        h.app.handle_app_event(AppEvent::ListLoaded {
            generation: 1,
            result: Ok(Vec::new()),
        });
        assert_eq!(h.app.list, app::ListState::Loading);

        h.app.handle_app_event(AppEvent::ListLoaded {
            generation: 2,
            result: Ok(crate::demo::demo_posts().into_iter().map(|d| d.post).collect()),
        });
        assert_eq!(h.app.list, app::ListState::Loaded);
        assert_eq!(h.app.cards.len(), 3);
    }

    #[tokio::test]
    async fn detail_for_a_removed_card_is_discarded() {
        let mut h = Harness::load(demo()).await;
        h.press(KeyCode::Enter);
        let old = h.app.cards[0].instance_id();
        let detail = h.source.detail("6650a1").await;

        // The open overlay takes every key; close it while the fetch is pending
        h.press(KeyCode::Esc);
        assert!(!h.app.overlay_open());
        assert!(h.app.cards[0].loader().is_loading());

        h.press(KeyCode::Char('r'));
        assert!(h.app.cards.is_empty());
        assert_eq!(h.app.document.listener_count(), 0, "remount drops listeners");

        h.app.handle_app_event(AppEvent::DetailLoaded {
            instance: old,
            post_id: "6650a1".to_string(),
            result: detail,
        });

        // Drain the old detail fetch and the reload, in whatever order
        h.pump().await;
        h.pump().await;
        assert_eq!(h.app.list, app::ListState::Loaded);
        assert!(h.app.cards.iter().all(|c| c.loader().detail().is_none()));
        assert_ne!(h.app.cards[0].instance_id(), old);
    }

    #[tokio::test]
    async fn outside_click_closes_and_is_absorbed() {
        let mut h = Harness::load(demo()).await;
        h.settle();
        h.render();

        // Click the active card's "Read More" trigger
        let trigger = (0..40u16)
            .flat_map(|row| (0..100u16).map(move |col| (col, row)))
            .find(|&(col, row)| h.app.cards[0].trigger_contains(col, row))
            .expect("trigger is on screen");
        h.click(trigger.0, trigger.1);
        assert!(h.app.cards[0].is_open());

        h.settle();
        h.render();

        // Inside the content: stays open
        h.click(50, 20);
        assert!(h.app.cards[0].is_open());

        // Backdrop: closes, and the tab bar underneath does not react
        let active = h.app.tabs.active();
        h.click(0, 0);
        assert!(!h.app.cards[0].is_open());
        assert_eq!(h.app.tabs.active(), active);
        assert_eq!(h.app.document.listener_count(), 0);
    }

    #[tokio::test]
    async fn help_overlay_shields_the_card_underneath() {
        let mut h = Harness::load(demo()).await;

        h.press(KeyCode::Enter);
        // Help cannot open over a card from the keyboard; open it directly
        h.app.open_help();
        assert_eq!(h.app.document.listener_count(), 4);

        h.press(KeyCode::Esc);
        assert!(!h.app.help_open());
        assert!(h.app.cards[0].is_open(), "Escape only closes the newest overlay");

        h.press(KeyCode::Esc);
        assert!(!h.app.cards[0].is_open());
    }

    #[tokio::test]
    async fn help_toggles_with_question_mark() {
        let mut h = Harness::load(demo()).await;

        h.press(KeyCode::Char('?'));
        assert!(h.app.help_open());
        h.press(KeyCode::Char('q'));
        assert!(!h.app.should_quit, "help absorbs keys");
        h.press(KeyCode::Char('?'));
        assert!(!h.app.help_open());
        h.press(KeyCode::Char('q'));
        assert!(h.app.should_quit);
    }

    #[tokio::test]
    async fn gallery_swaps_selection_in_place() {
        let mut h = Harness::load(demo()).await;
        h.press(KeyCode::Char('g'));
        assert_eq!(h.app.view, View::Gallery);

        h.press(KeyCode::Enter);
        let first = h.app.grid.selection().selected.expect("selected");
        h.press(KeyCode::Right);
        let selection = h.app.grid.selection();
        assert_ne!(selection.selected, Some(first));
        assert_eq!(selection.last_selected, Some(first));
        assert_eq!(h.app.document.listener_count(), 2, "one expanded card");

        h.press(KeyCode::Esc);
        assert!(!h.app.grid.is_open());
        assert_eq!(h.app.grid.selection().selected, None);
    }

    #[tokio::test]
    async fn grid_ids_survive_reload() {
        let mut h = Harness::load(demo()).await;
        let before: Vec<u32> = h.app.grid.cards().iter().map(|c| c.id).collect();

        h.press(KeyCode::Char('r'));
        h.pump().await;
        let after: Vec<u32> = h.app.grid.cards().iter().map(|c| c.id).collect();

        assert_eq!(before, after);
        assert_eq!(h.source.list_calls(), 2);
        assert!(h.app.toast.is_some());
    }

    #[tokio::test]
    async fn reload_keeps_the_active_tab() {
        let mut h = Harness::load(demo()).await;
        h.press(KeyCode::Char('2'));
        let active = h.app.tabs.active_id().map(str::to_string);

        h.press(KeyCode::Char('r'));
        h.pump().await;

        assert_eq!(h.app.tabs.active(), 1);
        assert_eq!(h.app.tabs.active_id().map(str::to_string), active);
    }

    #[tokio::test]
    async fn failed_detail_shows_message_in_overlay() {
        let mut h = Harness::load(demo().failing_detail(FetchError::Network("offline".into()))).await;

        h.press(KeyCode::Enter);
        h.pump().await;
        h.settle();

        let text = screen_text(&h.render());
        assert!(text.contains("Failed to load blog details."));
    }
}
