use deckview_core::{RunState, Slot};
use ratatui::{
    layout::{Alignment, Constraint, Layout, Rect},
    style::{Color, Modifier, Style, Stylize},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, Paragraph, Wrap},
    Frame,
};

use crate::app::{App, DirectoryStatus};

/// Cards per row on the board
const CARDS_PER_ROW: usize = 5;

pub fn render(app: &mut App, frame: &mut Frame) {
    let area = frame.area();

    // Main layout: header, body, footer
    let [header_area, body_area, footer_area] = Layout::vertical([
        Constraint::Length(1),
        Constraint::Min(0),
        Constraint::Length(1),
    ])
    .areas(area);

    let [users_area, cards_area] =
        Layout::horizontal([Constraint::Length(28), Constraint::Min(0)]).areas(body_area);

    render_header(app, frame, header_area);
    render_users(app, frame, users_area);
    render_cards(app, frame, cards_area);
    render_footer(app, frame, footer_area);
}

fn render_header(app: &App, frame: &mut Frame, area: Rect) {
    let caption = app.board.caption();
    let progress = match app.current_run() {
        Some(run) => progress_label(run.state(), run.cards()),
        None => String::new(),
    };

    let title = Line::from(vec![
        Span::styled(" deckview ", Style::default().fg(Color::Cyan).bold()),
        Span::styled(caption, Style::default().fg(Color::White)),
        Span::styled(progress, Style::default().fg(Color::Yellow)),
        Span::raw(" "),
        Span::styled(
            format!("v{}", env!("CARGO_PKG_VERSION")),
            Style::default().fg(Color::DarkGray),
        ),
    ]);

    let header = Paragraph::new(title).style(Style::default().bg(Color::DarkGray));
    frame.render_widget(header, area);
}

fn render_users(app: &mut App, frame: &mut Frame, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan))
        .title(" Users ");

    let items: Vec<ListItem> = match &app.status {
        DirectoryStatus::Loading if app.selector.is_empty() => {
            vec![ListItem::new(format!(" Loading{} ", dots(app.animation_frame)))
                .style(Style::default().fg(Color::DarkGray))]
        }
        DirectoryStatus::Failed(_) => {
            vec![ListItem::new(" No users ").style(Style::default().fg(Color::Red))]
        }
        _ => app
            .selector
            .names()
            .into_iter()
            .map(|name| ListItem::new(format!(" {} ", name)))
            .collect(),
    };

    let list = List::new(items)
        .block(block)
        .highlight_style(
            Style::default()
                .bg(Color::Blue)
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
        )
        .highlight_symbol("> ");

    frame.render_stateful_widget(list, area, &mut app.user_state);
}

fn render_cards(app: &App, frame: &mut Frame, area: Rect) {
    let slots = app.board.snapshot();
    let rows = slots.len().div_ceil(CARDS_PER_ROW);
    let row_areas = Layout::vertical(vec![Constraint::Ratio(1, rows.max(1) as u32); rows]).split(area);

    for (row, row_area) in row_areas.iter().enumerate() {
        let col_areas =
            Layout::horizontal([Constraint::Ratio(1, CARDS_PER_ROW as u32); CARDS_PER_ROW]).split(*row_area);
        for (col, card_area) in col_areas.iter().enumerate() {
            let index = row * CARDS_PER_ROW + col;
            if let Some(slot) = slots.get(index) {
                render_card(app, frame, *card_area, index, slot);
            }
        }
    }
}

fn render_card(app: &App, frame: &mut Frame, area: Rect, index: usize, slot: &Slot) {
    let loading = slot.loading;
    let border_color = match (&slot.image, loading) {
        (Some(_), _) => Color::Green,
        (None, true) => Color::DarkGray,
        (None, false) => Color::Gray,
    };

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border_color))
        .title(format!(" {} ", index + 1));

    let inner = block.inner(area);
    frame.render_widget(block, area);

    let [art_area, name_area] =
        Layout::vertical([Constraint::Min(1), Constraint::Length(2)]).areas(inner);

    let art = match &slot.image {
        Some(image) => Paragraph::new(vec![
            Line::from("▣").green().bold(),
            Line::from(format!("{} · {}", image.format(), human_size(image.len())))
                .fg(Color::DarkGray),
        ]),
        None if loading => Paragraph::new(Line::from("·").fg(Color::DarkGray)),
        None => Paragraph::new(Line::from("no image").fg(Color::DarkGray)),
    };
    frame.render_widget(art.alignment(Alignment::Center), art_area);

    let name = if loading {
        Line::from(format!("Loading{}", dots(app.animation_frame))).fg(Color::DarkGray)
    } else if slot.text.is_empty() {
        Line::default()
    } else {
        Line::from(slot.text.clone()).fg(Color::White).bold()
    };
    frame.render_widget(
        Paragraph::new(name)
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true }),
        name_area,
    );
}

fn render_footer(app: &App, frame: &mut Frame, area: Rect) {
    // Key style: dark background with bright text for visibility on both light/dark terminals
    let key_style = Style::default().bg(Color::DarkGray).fg(Color::White);
    let label_style = Style::default().bg(Color::Black).fg(Color::White);

    let mut spans = vec![
        Span::styled(" j/k ", key_style),
        Span::styled(" user ", label_style),
        Span::styled(" Enter ", key_style),
        Span::styled(" load deck ", label_style),
        Span::styled(" Esc ", key_style),
        Span::styled(" stop ", label_style),
        Span::styled(" q ", key_style),
        Span::styled(" quit ", label_style),
    ];

    match &app.status {
        DirectoryStatus::Loading => spans.push(Span::styled(
            "  fetching users",
            Style::default().fg(Color::DarkGray),
        )),
        DirectoryStatus::Ready(count) => spans.push(Span::styled(
            format!("  {} users", count),
            Style::default().fg(Color::DarkGray),
        )),
        DirectoryStatus::Failed(message) => spans.push(Span::styled(
            format!("  Could not load users: {}", message),
            Style::default().fg(Color::Red),
        )),
    }

    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

/// Header suffix for a run filling `cards` slots
fn progress_label(state: RunState, cards: usize) -> String {
    match state {
        RunState::Resetting | RunState::Pacing => " loading".to_string(),
        RunState::FetchingSlot(i) => format!(" card {}/{}", i + 1, cards),
        RunState::Cancelled => " cancelled".to_string(),
        RunState::Done | RunState::Idle => String::new(),
    }
}

fn dots(frame: u8) -> &'static str {
    match frame {
        0 => ".",
        1 => "..",
        _ => "...",
    }
}

fn human_size(bytes: usize) -> String {
    if bytes < 1024 {
        format!("{} B", bytes)
    } else {
        format!("{:.1} KiB", bytes as f64 / 1024.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_human_size() {
        assert_eq!(human_size(512), "512 B");
        assert_eq!(human_size(2048), "2.0 KiB");
        assert_eq!(human_size(15 * 1024 + 512), "15.5 KiB");
    }

    #[test]
    fn test_progress_counts_the_running_deck() {
        assert_eq!(progress_label(RunState::FetchingSlot(1), 2), " card 2/2");
        assert_eq!(progress_label(RunState::FetchingSlot(0), 10), " card 1/10");
        assert_eq!(progress_label(RunState::Pacing, 2), " loading");
        assert_eq!(progress_label(RunState::Done, 2), "");
    }

    #[test]
    fn test_dots_follow_animation_frame() {
        assert_eq!(dots(0), ".");
        assert_eq!(dots(1), "..");
        assert_eq!(dots(2), "...");
    }
}
