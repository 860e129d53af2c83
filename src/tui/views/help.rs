// Help overlay: key bindings, drawn through the help popover's presenter

use crate::tui::popover::{MorphRegistry, OverlayPresenter};
use crate::tui::portal;
use crate::tui::theme::Theme;
use ratatui::{
    style::{Modifier, Style},
    text::{Line, Span, Text},
    widgets::Paragraph,
    Frame,
};

const WIDTH: u16 = 48;

pub fn render(
    f: &mut Frame,
    help: &OverlayPresenter,
    theme: &Theme,
    morph: &MorphRegistry,
    source: &str,
) {
    let key_style = Style::default().fg(theme.accent);
    let desc_style = Style::default().fg(theme.foreground);
    let header_style = Style::default()
        .fg(theme.highlight)
        .add_modifier(Modifier::BOLD);
    let divider_style = Style::default().fg(theme.border);

    // "    key         description"
    let kb = |key: &str, desc: &str| -> Line<'static> {
        Line::from(vec![
            Span::raw("    "),
            Span::styled(format!("{:<12}", key), key_style),
            Span::styled(desc.to_string(), desc_style),
        ])
    };

    let content = Text::from(vec![
        Line::from(Span::styled("  Views", header_style)),
        kb("g, F2", "Switch tabs / gallery"),
        Line::raw(""),
        Line::from(Span::styled("  Tabs", header_style)),
        kb("←/→, Tab", "Previous / next post"),
        kb("1-9", "Jump to post"),
        kb("Enter", "Read more"),
        Line::raw(""),
        Line::from(Span::styled("  Gallery", header_style)),
        kb("Arrows", "Move between cards"),
        kb("Enter", "Expand card"),
        kb("←/→", "Next card while expanded"),
        Line::raw(""),
        Line::from(Span::styled("  Overlays", header_style)),
        kb("↑/↓, j/k", "Scroll"),
        kb("PgUp/PgDn", "Scroll a page"),
        kb("Esc, x", "Close"),
        kb("Click", "Outside to close"),
        Line::raw(""),
        Line::from(Span::styled("  General", header_style)),
        kb("r", "Reload posts"),
        kb("t", "Cycle theme"),
        kb("?", "Toggle this help"),
        kb("q", "Quit"),
        Line::raw(""),
        Line::from(Span::styled(
            "  ──────────────────────────────────",
            divider_style,
        )),
        Line::from(vec![
            Span::styled("  Theme: ", desc_style),
            Span::styled(theme.kind.name(), key_style),
            Span::styled("  |  Source: ", desc_style),
            Span::styled(source.to_string(), key_style),
        ]),
    ]);

    let height = content.lines.len() as u16;
    help.render(f, morph, theme, "Help", |f, area| {
        f.render_widget(Paragraph::new(content), portal::centered(WIDTH, height, area));
    });
}
