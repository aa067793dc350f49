use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Layout, Rect},
    style::{Color, Modifier, Style, Stylize},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Clear, List, ListItem, Paragraph, Wrap},
};
use votd_core::{Translation, VerseState};

use crate::app::App;

pub fn render(app: &mut App, frame: &mut Frame) {
    let area = frame.area();

    // Main layout: header, body, footer
    let [header_area, body_area, footer_area] = Layout::vertical([
        Constraint::Length(1),
        Constraint::Min(0),
        Constraint::Length(1),
    ])
    .areas(area);

    render_header(app, frame, header_area);
    render_verse_card(app, frame, body_area);
    render_footer(app, frame, footer_area);

    if app.show_translation_picker {
        render_translation_picker(app, frame, area);
    }
}

fn render_header(app: &App, frame: &mut Frame, area: Rect) {
    let title = Line::from(vec![
        Span::styled(" Verse of the Day ", Style::default().fg(Color::Cyan).bold()),
        Span::styled(
            format!(" {} ", app.fetcher.translation().display_name()),
            Style::default().fg(Color::White),
        ),
        Span::styled(
            format!("v{}", env!("CARGO_PKG_VERSION")),
            Style::default().fg(Color::DarkGray),
        ),
    ]);

    let header = Paragraph::new(title).style(Style::default().bg(Color::DarkGray));
    frame.render_widget(header, area);
}

fn render_verse_card(app: &App, frame: &mut Frame, area: Rect) {
    let card_area = centered_rect(area, 70, 60);
    let state = app.fetcher.state();

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan))
        .title(format!(" {} ", state.translation))
        .title_alignment(Alignment::Center);

    let mut lines = verse_lines(state, app.animation_frame);

    lines.push(Line::default());
    lines.push(status_line(state, app.fetcher.is_copied()));

    let card = Paragraph::new(Text::from(lines))
        .block(block)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true });
    frame.render_widget(card, card_area);
}

/// The body of the card: loading, error, or the verse itself.
fn verse_lines(state: &VerseState, animation_frame: u8) -> Vec<Line<'static>> {
    let mut lines = vec![Line::default()];

    if state.loading {
        let dots = ".".repeat(animation_frame as usize + 1);
        lines.push(Line::styled(
            format!("Loading verse{}", dots),
            Style::default().fg(Color::DarkGray),
        ));
        return lines;
    }

    if state.has_error() {
        lines.push(Line::styled(
            "Could not load verse. Press r to try again.",
            Style::default().fg(Color::Red),
        ));
        lines.push(Line::default());
    }

    match &state.payload {
        Some(payload) => {
            let style = if state.has_error() {
                Style::default().fg(Color::DarkGray).add_modifier(Modifier::ITALIC)
            } else {
                Style::default().add_modifier(Modifier::ITALIC)
            };
            lines.push(Line::styled(format!("\u{201c}{}\u{201d}", payload.plain_text()), style));
            lines.push(Line::default());
            lines.push(Line::styled(
                payload.reference.clone(),
                Style::default().fg(Color::Yellow).bold(),
            ));
        }
        None if !state.has_error() => {
            lines.push(Line::styled(
                "Press r for a verse.",
                Style::default().fg(Color::DarkGray),
            ));
        }
        None => {}
    }

    lines
}

fn status_line(state: &VerseState, copied: bool) -> Line<'static> {
    if copied {
        return Line::styled("\u{2713} Copied!", Style::default().fg(Color::Green));
    }
    match &state.notice {
        Some(notice) => Line::styled(notice.clone(), Style::default().fg(Color::Magenta)),
        None => Line::default(),
    }
}

fn render_footer(app: &App, frame: &mut Frame, area: Rect) {
    // Key style: dark background with bright text for visibility on both light/dark terminals
    let key_style = Style::default().bg(Color::DarkGray).fg(Color::White);
    let label_style = Style::default().bg(Color::Black).fg(Color::White);

    let hints = if app.show_translation_picker {
        vec![
            Span::styled(" j/k ", key_style),
            Span::styled(" nav ", label_style),
            Span::styled(" Enter ", key_style),
            Span::styled(" select ", label_style),
            Span::styled(" Esc ", key_style),
            Span::styled(" close ", label_style),
        ]
    } else {
        vec![
            Span::styled(" r ", key_style),
            Span::styled(" another verse ", label_style),
            Span::styled(" t ", key_style),
            Span::styled(" version ", label_style),
            Span::styled(" c ", key_style),
            Span::styled(" copy ", label_style),
            Span::styled(" s ", key_style),
            Span::styled(" share ", label_style),
            Span::styled(" q ", key_style),
            Span::styled(" quit ", label_style),
        ]
    };

    frame.render_widget(Paragraph::new(Line::from(hints)), area);
}

fn render_translation_picker(app: &mut App, frame: &mut Frame, area: Rect) {
    let popup_area = centered_rect(area, 50, 40);
    frame.render_widget(Clear, popup_area);

    let current = app.fetcher.translation();
    let items: Vec<ListItem> = Translation::all()
        .into_iter()
        .enumerate()
        .map(|(i, t)| {
            let marker = if t == current { "\u{25cf}" } else { " " };
            ListItem::new(format!("{} {}. {}", marker, i + 1, t.display_name()))
        })
        .collect();

    let list = List::new(items)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Yellow))
                .title(" Version "),
        )
        .highlight_style(Style::default().bg(Color::DarkGray).add_modifier(Modifier::BOLD))
        .highlight_symbol("> ");

    frame.render_stateful_widget(list, popup_area, &mut app.translation_state);
}

/// A rect of `percent_x` by `percent_y` centered in `area`.
fn centered_rect(area: Rect, percent_x: u16, percent_y: u16) -> Rect {
    let [_, middle, _] = Layout::vertical([
        Constraint::Percentage((100 - percent_y) / 2),
        Constraint::Percentage(percent_y),
        Constraint::Percentage((100 - percent_y) / 2),
    ])
    .areas(area);

    let [_, center, _] = Layout::horizontal([
        Constraint::Percentage((100 - percent_x) / 2),
        Constraint::Percentage(percent_x),
        Constraint::Percentage((100 - percent_x) / 2),
    ])
    .areas(middle);

    center
}
