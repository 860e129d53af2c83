//! Blog card: summary pane plus a "Read More" popover with the full post
//!
//! The card owns its popover in controlled mode. The open flag lives in the
//! card (`is_open`); the controller's `on_open_change` writes it, and the
//! close affordance (`x` / `[x]`) writes it directly, bypassing the
//! controller the way a parent overriding a controlled prop would.
//!
//! Opening asks the card's `DetailLoader` for the full post. Whether that
//! turns into a network fetch is the loader's call; the app spawns the fetch
//! and routes the result back by instance id.

use super::detail_loader::{DetailLoader, DetailState};
use super::skeleton::{self, Bone};
use crate::api::{BlogDetail, BlogPost, FetchError};
use crate::tui::popover::{
    fade, ControlledOpen, Document, InstanceId, MorphRegistry, OverlayPresenter, PopoverConfig,
    PopoverHandle, PopoverTrigger, Transition,
};
use crate::tui::scroll::ScrollState;
use crate::tui::theme::Theme;
use crate::tui::traits::{Handled, Interactive, Scrollable};
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    layout::{Alignment, Constraint, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span, Text},
    widgets::{
        Block, Borders, Paragraph, Scrollbar, ScrollbarOrientation, ScrollbarState, Wrap,
    },
    Frame,
};
use std::time::Duration;
use unicode_width::UnicodeWidthStr;

const READ_MORE: &str = " Read More ";
const FAILED: &str = "Failed to load blog details.";

const INTRO_DURATION: Duration = Duration::from_millis(400);
const SECTION_DURATION: Duration = Duration::from_millis(300);
const SECTION_STAGGER: Duration = Duration::from_millis(100);

/// Skeleton for the overlay body: banner, title, two text lines
const DETAIL_BONES: [Bone; 4] = [
    Bone::new(6, 1.0),
    Bone::new(2, 0.75),
    Bone::new(1, 1.0),
    Bone::new(1, 1.0),
];

pub struct BlogCard {
    post: BlogPost,
    is_open: ControlledOpen,
    trigger: PopoverTrigger,
    presenter: OverlayPresenter,
    loader: DetailLoader,
    scroll: ScrollState,
    /// Image, then text column, staggered on mount
    intro: [Transition; 2],
    /// One per detail section, staggered each time the overlay shows them
    sections: Vec<Transition>,
}

impl BlogCard {
    pub fn new(post: BlogPost, document: &Document) -> Self {
        let is_open = ControlledOpen::new(false);
        let sink = is_open.clone();
        let popover = PopoverHandle::new(
            PopoverConfig::controlled(is_open.clone()).on_open_change(move |open| sink.set(open)),
        );

        let mut intro = [
            Transition::new(INTRO_DURATION).with_delay(Duration::from_millis(100)),
            Transition::new(INTRO_DURATION).with_delay(Duration::from_millis(200)),
        ];
        intro.iter_mut().for_each(Transition::show);

        Self {
            loader: DetailLoader::new(post.id.clone()),
            post,
            is_open,
            trigger: PopoverTrigger::new(popover.clone()),
            presenter: OverlayPresenter::new(popover, document.clone()),
            scroll: ScrollState::new(),
            intro,
            sections: Vec::new(),
        }
    }

    pub fn instance_id(&self) -> InstanceId {
        self.trigger.instance_id()
    }

    pub fn post(&self) -> &BlogPost {
        &self.post
    }

    pub fn is_open(&self) -> bool {
        self.is_open.get()
    }

    pub fn loader(&self) -> &DetailLoader {
        &self.loader
    }

    #[allow(dead_code)] // Inspected by tests
    pub fn presenter(&self) -> &OverlayPresenter {
        &self.presenter
    }

    /// Activate "Read More"; returns true if the detail must be fetched
    pub fn read_more(&mut self) -> bool {
        self.trigger.activate();
        self.presenter.sync();
        self.scroll.reset();
        self.restart_sections();
        self.loader.request()
    }

    /// Close via the card's own affordance, overriding the controlled flag
    pub fn close(&mut self) {
        self.is_open.set(false);
        self.presenter.sync();
    }

    pub fn sync(&mut self) {
        self.presenter.sync();
    }

    pub fn complete_detail(&mut self, result: Result<BlogDetail, FetchError>) {
        self.loader.complete(result);
        self.restart_sections();
    }

    fn restart_sections(&mut self) {
        let count = self.loader.detail().map_or(0, |d| d.detail_info.len());
        self.sections = (0..count)
            .map(|i| {
                let mut t = Transition::new(SECTION_DURATION).with_delay(SECTION_STAGGER * i as u32);
                t.show();
                t
            })
            .collect();
    }

    pub fn advance(&mut self, dt: Duration) {
        self.presenter.advance(dt);
        self.intro.iter_mut().for_each(|t| t.advance(dt));
        self.sections.iter_mut().for_each(|t| t.advance(dt));
    }

    pub fn is_animating(&self) -> bool {
        self.presenter.is_animating()
            || self.intro.iter().any(Transition::is_animating)
            || self.sections.iter().any(Transition::is_animating)
    }

    pub fn trigger_contains(&self, column: u16, row: u16) -> bool {
        self.trigger.contains(column, row)
    }

    /// Click inside the open overlay; returns true if it closed the card
    pub fn click_overlay(&mut self, column: u16, row: u16) -> bool {
        if self.presenter.hits_close_button(column, row) {
            self.close();
            return true;
        }
        false
    }

    /// Draw the summary into a tab pane
    pub fn render(
        &self,
        f: &mut Frame,
        area: Rect,
        theme: &Theme,
        opacity: f32,
        morph: &mut MorphRegistry,
    ) {
        let wide = area.width >= 60;
        let [image_area, text_area] = if wide {
            Layout::horizontal([Constraint::Percentage(45), Constraint::Percentage(55)])
                .spacing(2)
                .areas(area)
        } else {
            Layout::vertical([Constraint::Length(5), Constraint::Min(0)])
                .spacing(1)
                .areas(area)
        };

        let image_opacity = opacity.min(self.intro[0].progress());
        render_image(f, image_area, &self.post.image.file_name, &self.post.image.url, theme, image_opacity);

        let text_opacity = opacity.min(self.intro[1].progress());
        let text = Text::from(
            summary_lines(&self.post, theme)
                .into_iter()
                .map(|line| fade_line(line, text_opacity))
                .collect::<Vec<_>>(),
        );
        let trigger_row = text_area
            .y
            .saturating_add(rows(wrapped_height(&text, text_area.width)).saturating_add(1));
        f.render_widget(Paragraph::new(text).wrap(Wrap { trim: true }), text_area);

        if trigger_row < text_area.bottom() {
            let width = (READ_MORE.width() as u16).min(text_area.width);
            let button = Style::default()
                .fg(theme.background)
                .bg(theme.accent)
                .add_modifier(Modifier::BOLD);
            self.trigger.render(
                f,
                Rect::new(text_area.x, trigger_row, width, 1),
                Line::raw(READ_MORE),
                fade(button, text_opacity),
                morph,
            );
        }
    }

    /// Draw the overlay into the portal; no-op while unmounted
    pub fn render_overlay(&mut self, f: &mut Frame, theme: &Theme, morph: &MorphRegistry, pulse: f32) {
        let Self {
            post,
            presenter,
            loader,
            scroll,
            sections,
            ..
        } = self;

        presenter.render(f, morph, theme, &post.title, |f, frame| {
            let area = inset(frame, 2, 1);
            if loader.is_loading() {
                skeleton::render_bones(f, area, &DETAIL_BONES, theme, pulse);
                return;
            }

            match loader.state() {
                DetailState::Loaded(detail) => {
                    let text = detail_text(detail, sections, theme);
                    scroll.update_dimensions(wrapped_height(&text, area.width), area.height as usize);
                    f.render_widget(
                        Paragraph::new(text)
                            .wrap(Wrap { trim: true })
                            .scroll((rows(scroll.offset()), 0)),
                        area,
                    );

                    if scroll.needs_scrollbar() {
                        let mut state = ScrollbarState::new(scroll.total()).position(scroll.offset());
                        f.render_stateful_widget(
                            Scrollbar::new(ScrollbarOrientation::VerticalRight)
                                .style(Style::default().fg(theme.border)),
                            frame,
                            &mut state,
                        );
                    }
                }
                _ => {
                    let middle = Rect::new(area.x, area.y + area.height / 2, area.width, 1);
                    f.render_widget(
                        Paragraph::new(FAILED)
                            .alignment(Alignment::Center)
                            .style(Style::default().fg(theme.muted)),
                        middle,
                    );
                }
            }
        });
    }
}

impl Scrollable for BlogCard {
    fn scroll_state(&self) -> &ScrollState {
        &self.scroll
    }

    fn scroll_state_mut(&mut self) -> &mut ScrollState {
        &mut self.scroll
    }
}

/// Keys while the overlay has focus; Escape is handled by its listener
impl Interactive for BlogCard {
    fn handle_key(&mut self, key: KeyEvent) -> Handled {
        match key.code {
            KeyCode::Char('x') => {
                self.close();
                Handled::Yes
            }
            _ => self.handle_scroll_keys(key),
        }
    }

    fn focus_hint(&self) -> Option<&'static str> {
        Some("↑↓:scroll  x/Esc:close")
    }
}

fn summary_lines<'a>(post: &'a BlogPost, theme: &Theme) -> Vec<Line<'a>> {
    let badge = post
        .author_initial()
        .map(|c| format!(" {} ", c.to_uppercase()))
        .unwrap_or_default();

    vec![
        Line::from(Span::styled(
            post.title.as_str(),
            Style::default().fg(theme.title).add_modifier(Modifier::BOLD),
        )),
        Line::raw(""),
        Line::from(vec![
            Span::styled(badge, Style::default().fg(theme.accent).bg(theme.skeleton)),
            Span::raw(" "),
            Span::styled(post.author_name.as_str(), Style::default().fg(theme.foreground)),
            Span::styled(format!("  {}", post.author_role), Style::default().fg(theme.muted)),
        ]),
        Line::raw(""),
        Line::from(Span::styled(
            post.small_description.as_str(),
            Style::default().fg(theme.muted),
        )),
    ]
}

fn fade_line(mut line: Line<'_>, opacity: f32) -> Line<'_> {
    for span in line.spans.iter_mut() {
        span.style = fade(span.style, opacity);
    }
    line
}

/// Image placeholder: terminals get the file name and URL
fn render_image(f: &mut Frame, area: Rect, name: &str, url: &str, theme: &Theme, opacity: f32) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(theme.border_type)
        .border_style(fade(Style::default().fg(theme.border), opacity));
    let label = if name.is_empty() { "image" } else { name };

    let text = Text::from(vec![
        Line::from(Span::styled(format!("▣ {}", label), Style::default().fg(theme.foreground))),
        Line::from(Span::styled(url, Style::default().fg(theme.muted))),
    ]);
    f.render_widget(
        Paragraph::new(text)
            .wrap(Wrap { trim: true })
            .style(fade(Style::default(), opacity))
            .block(block),
        area,
    );
}

fn detail_text<'a>(detail: &'a BlogDetail, sections: &[Transition], theme: &Theme) -> Text<'a> {
    let post = &detail.post;
    let strong = Style::default().fg(theme.foreground).add_modifier(Modifier::BOLD);
    let muted = Style::default().fg(theme.muted);

    let mut lines = vec![
        Line::from(Span::styled(format!("▣ {}", detail.banner_url()), muted)),
        Line::from(Span::styled(
            post.title.as_str(),
            Style::default().fg(theme.title).add_modifier(Modifier::BOLD),
        )),
        Line::from(vec![
            Span::styled(format!("By {}", post.author_name), Style::default().fg(theme.foreground)),
            Span::styled(" • ", muted),
            Span::styled(post.author_role.as_str(), muted),
        ]),
        Line::raw(""),
        Line::from(Span::styled(post.small_description.as_str(), muted)),
    ];

    for (i, info) in detail.detail_info.iter().enumerate() {
        let opacity = sections.get(i).map_or(1.0, Transition::progress);
        lines.push(Line::raw(""));
        lines.push(Line::from(Span::styled(info.title.as_str(), fade(strong, opacity))));
        lines.push(Line::from(Span::styled(
            info.paragraph.as_str(),
            fade(Style::default().fg(theme.foreground), opacity),
        )));
    }

    Text::from(lines)
}

/// Rows `text` needs once wrapped to `width` (estimate, never short)
/// Row count as a terminal coordinate, saturating at `u16::MAX`
fn rows(n: usize) -> u16 {
    u16::try_from(n).unwrap_or(u16::MAX)
}

fn wrapped_height(text: &Text<'_>, width: u16) -> usize {
    let width = width.max(1) as usize;
    text.lines
        .iter()
        .map(|line| {
            let w = line.width();
            if w == 0 {
                1
            } else {
                w.div_ceil(width) + usize::from(w > width)
            }
        })
        .sum()
}

fn inset(area: Rect, dx: u16, dy: u16) -> Rect {
    let dx = dx.min(area.width / 2);
    let dy = dy.min(area.height / 2);
    Rect::new(
        area.x + dx,
        area.y + dy,
        area.width - dx * 2,
        area.height - dy * 2,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::demo::demo_posts;
    use crate::tui::popover::DocumentEvent;
    use crossterm::event::KeyModifiers;
    use ratatui::{backend::TestBackend, Terminal};

    fn card(document: &Document) -> BlogCard {
        BlogCard::new(demo_posts().remove(0).post, document)
    }

    fn draw_overlay(card: &mut BlogCard) -> String {
        let mut terminal = Terminal::new(TestBackend::new(100, 40)).unwrap();
        let morph = MorphRegistry::new();
        terminal
            .draw(|f| card.render_overlay(f, &Theme::default(), &morph, 0.0))
            .unwrap();
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|c| c.symbol())
            .collect()
    }

    #[test]
    fn read_more_opens_and_fetches_once() {
        let document = Document::new();
        let mut card = card(&document);

        assert!(card.read_more());
        assert!(card.is_open());
        assert_eq!(document.listener_count(), 2);

        card.complete_detail(Ok(demo_posts().remove(0)));
        card.close();
        assert!(!card.is_open());
        assert_eq!(document.listener_count(), 0);

        assert!(!card.read_more(), "cached detail must not refetch");
        assert!(card.is_open());
    }

    #[test]
    fn x_key_overrides_controlled_flag() {
        let document = Document::new();
        let mut card = card(&document);
        card.read_more();

        let handled = card.handle_key(KeyEvent::new(KeyCode::Char('x'), KeyModifiers::NONE));
        assert_eq!(handled, Handled::Yes);
        assert!(!card.is_open());
        assert!(!card.presenter().listeners_attached());
    }

    #[test]
    fn escape_closes_through_listener() {
        let document = Document::new();
        let mut card = card(&document);
        card.read_more();

        document.dispatch(&DocumentEvent::KeyDown(KeyCode::Esc));
        assert!(!card.is_open());
        card.sync();
        assert_eq!(document.listener_count(), 0);
    }

    #[test]
    fn overlay_shows_skeleton_then_detail() {
        let document = Document::new();
        let mut card = card(&document);
        card.read_more();
        card.advance(Duration::from_secs(2));

        let loading = draw_overlay(&mut card);
        assert!(loading.contains('░'));
        assert!(!loading.contains(FAILED));

        card.complete_detail(Ok(demo_posts().remove(0)));
        card.advance(Duration::from_secs(2));
        let loaded = draw_overlay(&mut card);
        assert!(loaded.contains("By Priya Raman"));
        assert!(loaded.contains("6650a1-large.jpg"));
    }

    #[test]
    fn overlay_shows_failure_message() {
        let document = Document::new();
        let mut card = card(&document);
        card.read_more();
        card.complete_detail(Err(FetchError::Network("refused".into())));
        card.advance(Duration::from_secs(2));

        assert!(draw_overlay(&mut card).contains(FAILED));
    }

    #[test]
    fn close_button_click() {
        let document = Document::new();
        let mut card = card(&document);
        card.read_more();
        card.advance(Duration::from_secs(2));
        draw_overlay(&mut card);

        let target = crate::tui::portal::target(Rect::new(0, 0, 100, 40));
        assert!(!card.click_overlay(target.x + 2, target.y + 2));
        assert!(card.is_open());
        assert!(card.click_overlay(target.right() - 3, target.y));
        assert!(!card.is_open());
    }

    #[test]
    fn row_counts_saturate() {
        assert_eq!(rows(12), 12);
        assert_eq!(rows(70_000), u16::MAX);

        let tall = Text::from(vec![Line::raw("x"); 70_000]);
        assert_eq!(rows(wrapped_height(&tall, 10)), u16::MAX);
    }

    #[test]
    fn wrapped_height_never_short() {
        let text = Text::from(vec![Line::raw("a".repeat(25)), Line::raw(""), Line::raw("abc")]);
        assert!(wrapped_height(&text, 10) >= 3 + 1 + 1);
    }
}
