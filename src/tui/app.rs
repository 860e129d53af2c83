// TUI application state
//
// Owns everything on screen: the post list and its load state, one
// `BlogCard` per post (tabs view), the same posts as grid cards (gallery
// view), the help overlay and the shared `Document` their dismissal
// listeners hang off. Background fetches report back through `AppEvent`s.

use super::components::{skeleton, AnimatedTabs, BlogCard, Card, LayoutGrid, Tab, Toast};
use super::input::InputHandler;
use super::popover::{Document, InstanceId, MorphRegistry, OverlayPresenter, PopoverConfig, PopoverHandle};
use super::theme::{Theme, ThemeKind};
use super::traits::Interactive;
use crate::api::{BlogPost, BlogSource, FetchError, SharedSource};
use crate::config::{Config, StartView};
use crate::events::AppEvent;
use crate::logging::LogBuffer;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span, Text};
use std::collections::HashMap;
use std::time::Duration;
use tokio::sync::mpsc;

/// Different views the TUI can display
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum View {
    /// One tab per post, "Read More" overlays
    #[default]
    Tabs,
    /// Expandable card grid
    Gallery,
}

impl View {
    pub fn toggle(self) -> Self {
        match self {
            View::Tabs => View::Gallery,
            View::Gallery => View::Tabs,
        }
    }

    /// Display name for the status bar
    pub fn name(&self) -> &'static str {
        match self {
            View::Tabs => "Tabs",
            View::Gallery => "Gallery",
        }
    }
}

impl From<StartView> for View {
    fn from(start: StartView) -> Self {
        match start {
            StartView::Tabs => View::Tabs,
            StartView::Gallery => View::Gallery,
        }
    }
}

/// Where the post list is
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListState {
    Loading,
    Failed(FetchError),
    Loaded,
}

/// Spawns fetches on the runtime and reports results over the app channel
pub struct Fetcher {
    source: SharedSource,
    tx: mpsc::UnboundedSender<AppEvent>,
}

impl Fetcher {
    pub fn new(source: SharedSource, tx: mpsc::UnboundedSender<AppEvent>) -> Self {
        Self { source, tx }
    }

    pub fn fetch_list(&self, generation: u64) {
        let source = self.source.clone();
        let tx = self.tx.clone();
        tokio::spawn(async move {
            tracing::debug!("Fetching post list from {}", source.name());
            let result = source.list().await;
            // Receiver gone means the UI already quit
            let _ = tx.send(AppEvent::ListLoaded { generation, result });
        });
    }

    pub fn fetch_detail(&self, instance: InstanceId, post_id: String) {
        let source = self.source.clone();
        let tx = self.tx.clone();
        tokio::spawn(async move {
            tracing::debug!("Fetching detail for {} ({})", post_id, instance);
            let result = source.detail(&post_id).await;
            let _ = tx.send(AppEvent::DetailLoaded {
                instance,
                post_id,
                result,
            });
        });
    }
}

/// Main application state for the TUI
pub struct App {
    pub view: View,
    pub theme: Theme,
    pub should_quit: bool,
    pub toast: Option<Toast>,

    /// Log buffer for the status bar
    pub log_buffer: LogBuffer,

    /// Shown in the status bar ("demo" or the API host)
    pub source_name: String,

    pub list: ListState,

    /// One card per post, same order as the tabs
    pub cards: Vec<BlogCard>,
    pub tabs: AnimatedTabs,
    pub grid: LayoutGrid,

    help_popover: PopoverHandle,
    pub help: OverlayPresenter,

    /// Registry the overlays' dismissal listeners live in
    pub document: Document,
    pub morph: MorphRegistry,

    fetcher: Fetcher,
    input_handler: InputHandler,

    /// Time since start, drives skeleton pulses
    clock: Duration,

    /// Bumped per list load; older responses are dropped
    generation: u64,

    /// Grid card ids by post id, stable across reloads
    card_ids: HashMap<String, u32>,

    /// Post id of the tab that was active before a reload
    restore_tab: Option<String>,
}

impl App {
    pub fn new(
        config: &Config,
        source: SharedSource,
        source_name: String,
        log_buffer: LogBuffer,
        tx: mpsc::UnboundedSender<AppEvent>,
    ) -> Self {
        let document = Document::new();
        let help_popover = PopoverHandle::new(PopoverConfig::uncontrolled(false));

        Self {
            view: View::from(config.start_view),
            theme: ThemeKind::from_name(&config.theme).theme(),
            should_quit: false,
            toast: None,
            log_buffer,
            source_name,
            list: ListState::Loading,
            cards: Vec::new(),
            tabs: AnimatedTabs::new(Vec::new(), None),
            grid: LayoutGrid::new(Vec::new(), &document),
            help: OverlayPresenter::new(help_popover.clone(), document.clone()),
            help_popover,
            document,
            morph: MorphRegistry::new(),
            fetcher: Fetcher::new(source, tx),
            input_handler: InputHandler::with_default_config(),
            clock: Duration::ZERO,
            generation: 0,
            card_ids: HashMap::new(),
            restore_tab: None,
        }
    }

    /// (Re)load the post list
    ///
    /// Cards are dropped right away, so their listeners go with them and any
    /// detail still in flight finds no card to land in.
    pub fn reload(&mut self) {
        self.generation += 1;
        self.list = ListState::Loading;
        if let Some(id) = self.tabs.active_id() {
            self.restore_tab = Some(id.to_string());
        }
        self.cards.clear();
        self.tabs = AnimatedTabs::new(Vec::new(), None);
        self.grid.reconcile(Vec::new());
        self.morph.clear();

        tracing::info!("Loading posts (request #{})", self.generation);
        self.fetcher.fetch_list(self.generation);
    }

    pub fn handle_app_event(&mut self, event: AppEvent) {
        match event {
            AppEvent::ListLoaded { generation, result } => {
                if generation != self.generation {
                    tracing::debug!("Dropping stale post list #{}", generation);
                    return;
                }
                match result {
                    Ok(posts) => self.set_posts(posts),
                    Err(e) => {
                        tracing::warn!("Failed to load blogs: {}", e);
                        self.list = ListState::Failed(e);
                    }
                }
            }
            AppEvent::DetailLoaded {
                instance,
                post_id,
                result,
            } => match self.cards.iter_mut().find(|c| c.instance_id() == instance) {
                Some(card) => {
                    if result.is_ok() {
                        tracing::debug!("Detail for {} loaded", post_id);
                    }
                    card.complete_detail(result);
                }
                None => {
                    tracing::debug!("Dropping detail for {}: card {} is gone", post_id, instance);
                }
            },
        }
    }

    fn set_posts(&mut self, posts: Vec<BlogPost>) {
        tracing::info!("Loaded {} posts", posts.len());

        let tabs = posts
            .iter()
            .map(|p| Tab::new(p.id.clone(), p.tab_label()))
            .collect();
        let grid_cards = posts
            .iter()
            .enumerate()
            .map(|(i, p)| self.grid_card(i, p))
            .collect();

        self.cards = posts
            .into_iter()
            .map(|post| BlogCard::new(post, &self.document))
            .collect();
        // Falls back to the first tab when the post is gone
        self.tabs = AnimatedTabs::new(tabs, self.restore_tab.take().as_deref());
        self.grid.reconcile(grid_cards);
        self.list = ListState::Loaded;

        if self.generation > 1 {
            self.show_toast(format!("Reloaded {} posts", self.cards.len()));
        }
    }

    fn grid_card(&mut self, index: usize, post: &BlogPost) -> Card {
        let next = self.card_ids.len() as u32 + 1;
        let id = *self.card_ids.entry(post.id.clone()).or_insert(next);

        let content = Text::from(vec![
            Line::from(Span::styled(
                post.title.clone(),
                Style::default()
                    .fg(self.theme.title)
                    .add_modifier(Modifier::BOLD),
            )),
            Line::from(Span::styled(
                format!("{} • {}", post.author_name, post.author_role),
                Style::default().fg(self.theme.accent),
            )),
            Line::raw(""),
            Line::raw(post.small_description.clone()),
        ]);

        Card {
            id,
            content,
            thumbnail_url: post.image.url.clone(),
            // Every third card is a wide one
            layout_class: if index % 3 == 0 {
                "md:col-span-2".to_string()
            } else {
                "col-span-1".to_string()
            },
        }
    }

    /// Open the active card's overlay and fetch its detail if needed
    pub fn read_more(&mut self, index: usize) {
        let Some(card) = self.cards.get_mut(index) else {
            return;
        };
        tracing::info!("Opening \"{}\"", card.post().title);
        if card.read_more() {
            self.fetcher
                .fetch_detail(card.instance_id(), card.post().id.clone());
        }
    }

    pub fn open_help(&mut self) {
        self.help_popover.open();
        self.help.sync();
    }

    pub fn close_help(&mut self) {
        self.help_popover.close();
        self.help.sync();
    }

    pub fn help_open(&self) -> bool {
        self.help_popover.is_open()
    }

    /// Card whose overlay is open, if any
    pub fn open_card_mut(&mut self) -> Option<&mut BlogCard> {
        self.cards.iter_mut().find(|c| c.is_open())
    }

    pub fn overlay_open(&self) -> bool {
        self.help_open() || self.cards.iter().any(BlogCard::is_open) || self.grid.is_open()
    }

    /// Bring presenters in line after listeners or keys changed popover state
    pub fn sync_overlays(&mut self) {
        self.help.sync();
        self.cards.iter_mut().for_each(BlogCard::sync);
        self.grid.sync();
    }

    pub fn set_view(&mut self, view: View) {
        if view == self.view {
            return;
        }
        self.grid.dismiss();
        if let Some(card) = self.open_card_mut() {
            card.close();
        }
        self.view = view;
    }

    pub fn next_theme(&mut self) {
        let kind = self.theme.kind.next();
        self.theme = kind.theme();
        self.show_toast(format!("Theme: {}", kind.name()));
    }

    pub fn show_toast(&mut self, message: impl Into<String>) {
        self.toast = Some(Toast::new(message));
    }

    pub fn tick(&mut self, dt: Duration) {
        self.clock += dt;
        self.tabs.advance(dt);
        self.cards.iter_mut().for_each(|c| c.advance(dt));
        self.grid.advance(dt);
        self.help.advance(dt);

        if let Some(toast) = &mut self.toast {
            toast.advance(dt);
            if toast.is_expired() {
                self.toast = None;
            }
        }
    }

    /// Whether the next tick changes anything on screen
    pub fn is_animating(&self) -> bool {
        self.list == ListState::Loading
            || self.toast.is_some()
            || self.tabs.is_animating()
            || self.grid.is_animating()
            || self.help.is_animating()
            || self
                .cards
                .iter()
                .any(|c| c.is_animating() || (c.is_open() && c.loader().is_loading()))
    }

    /// Skeleton pulse for the current frame
    pub fn pulse(&self) -> f32 {
        skeleton::pulse(self.clock)
    }

    /// Key hints for whatever has focus
    pub fn focus_hint(&self) -> &'static str {
        if self.help_open() {
            return "?/Esc:close help";
        }
        if let Some(card) = self.cards.iter().find(|c| c.is_open()) {
            return card.focus_hint().unwrap_or_default();
        }
        let hint = match self.view {
            View::Tabs => self.tabs.focus_hint(),
            View::Gallery => self.grid.focus_hint(),
        };
        hint.unwrap_or("q:quit  ?:help")
    }

    pub fn handle_key_press(&mut self, key: crossterm::event::KeyCode) -> bool {
        self.input_handler.handle_key_press(key)
    }

    pub fn handle_key_release(&mut self, key: crossterm::event::KeyCode) {
        self.input_handler.handle_key_release(key);
    }

    pub fn release_keys(&mut self) {
        self.input_handler.release_all();
    }
}
