//! Rendering. Reads only committed session state.

use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
};

use crate::app::App;
use crate::theme::{Palette, styles};

const KEY_HINTS: &str = "space/+ inc  - dec  p pause  r reset  q quit";

pub fn draw(frame: &mut Frame, app: &App, palette: &Palette) {
    let bg_block = Block::default().style(Style::default().bg(palette.bg_dark));
    frame.render_widget(bg_block, frame.area());

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints([
            Constraint::Length(4), // Counter
            Constraint::Length(5), // Memo
            Constraint::Min(0),
            Constraint::Length(1), // Status bar
        ])
        .split(frame.area());

    draw_counter(frame, app, chunks[0], palette);
    draw_memo(frame, app, chunks[1], palette);
    draw_status_bar(frame, app, chunks[3], palette);
}

fn panel<'a>(title: &'a str, palette: &Palette) -> Block<'a> {
    Block::default()
        .borders(Borders::ALL)
        .border_style(styles::border(palette))
        .title(Span::styled(format!(" {title} "), styles::title(palette)))
        .style(Style::default().bg(palette.bg_panel))
}

fn draw_counter(frame: &mut Frame, app: &App, area: Rect, palette: &Palette) {
    let (raw, view) = app.counter().parts();
    let state = if raw.paused {
        Span::styled("paused", Style::default().fg(palette.warning))
    } else {
        Span::styled("running", Style::default().fg(palette.success))
    };

    let lines = vec![
        Line::from(vec![
            Span::styled("count ", styles::muted(palette)),
            Span::styled(raw.count.to_string(), styles::value(palette)),
            Span::raw("  "),
            state,
        ]),
        Line::from(Span::styled(
            view.status.as_str(),
            Style::default().fg(palette.text_primary),
        )),
    ];
    frame.render_widget(Paragraph::new(lines).block(panel("Counter", palette)), area);
}

fn draw_memo(frame: &mut Frame, app: &App, area: Rect, palette: &Palette) {
    let view = app.counter().derived();
    let milestone = view.milestone.as_deref().unwrap_or("-");

    let lines = vec![
        Line::from(vec![
            Span::styled("decade ", styles::muted(palette)),
            Span::styled(view.decade.as_str(), styles::value(palette)),
        ]),
        Line::from(vec![
            Span::styled("memo ", styles::muted(palette)),
            Span::styled(view.memo.to_string(), styles::value(palette)),
            Span::styled(
                format!("  (computed {}x)", view.memo_runs),
                styles::muted(palette),
            ),
        ]),
        Line::from(vec![
            Span::styled("milestone ", styles::muted(palette)),
            Span::styled(milestone, Style::default().fg(palette.text_primary)),
        ]),
    ];
    frame.render_widget(Paragraph::new(lines).block(panel("Memo", palette)), area);
}

fn draw_status_bar(frame: &mut Frame, app: &App, area: Rect, palette: &Palette) {
    let uptime = app.clock().derived();
    let line = Line::from(vec![
        Span::styled(format!(" {} ", uptime.label), styles::value(palette)),
        Span::styled(KEY_HINTS, styles::muted(palette)),
    ]);
    frame.render_widget(Paragraph::new(line), area);
}
