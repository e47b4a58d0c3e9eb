use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Gauge, Paragraph, Widget},
};
use unicode_width::UnicodeWidthStr;

use super::digits::{big_width, render_big, GLYPH_HEIGHT};
use super::{bold, dim, status_style, ACID, NEON_PINK};
use crate::app::App;
use crate::progress::{bar_ratio, BarPhase};
use crate::sampler::Sample;
use crate::share::to_query;

const HORIZONTAL_MARGIN: u16 = 2;
const SCHEDULE_WIDTH: u16 = 38;
const MARKERS: [&str; 5] = ["000%", "025%", "050%", "075%", "100%"];

pub fn render(app: &App, area: Rect, buf: &mut Buffer) {
    let Some(sample) = app.sample() else {
        return;
    };

    let title_height = app.config.title_lines().count().max(2) as u16;
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .horizontal_margin(HORIZONTAL_MARGIN)
        .constraints([
            Constraint::Length(1),            // marquee
            Constraint::Length(title_height), // title + schedule
            Constraint::Min(0),               // percent box
            Constraint::Length(4),            // metric cards
            Constraint::Length(u16::from(app.show_share)),
            Constraint::Length(1), // footer
        ])
        .split(area);

    let marquee = format!(
        "SYSTEM_READY // TRACKING_TEMPORAL_FLOW // PRECISION_MODE: {} // STATUS: {} //",
        app.config.precision, sample.progress.status
    );
    Paragraph::new(Span::styled(marquee, dim())).render(chunks[0], buf);

    render_header(app, chunks[1], buf);
    render_percent_box(sample, chunks[2], buf);
    render_cards(sample, chunks[3], buf);

    if app.show_share {
        Paragraph::new(Span::styled(format!("share: ?{}", to_query(&app.config)), dim()))
            .render(chunks[4], buf);
    }

    let footer = Paragraph::new(Line::from(vec![
        Span::styled("CHRONO_CRUNCH", dim()),
        Span::styled(
            "  (c)onfig  (+/-) precision  (y)ears  (s)hare  (q)uit",
            dim().add_modifier(Modifier::ITALIC),
        ),
    ]));
    footer.render(chunks[5], buf);
}

fn render_header(app: &App, area: Rect, buf: &mut Buffer) {
    let title_width = app
        .config
        .title_lines()
        .map(|l| l.width())
        .max()
        .unwrap_or(0) as u16;

    // The schedule only shows when it fits beside the title
    let show_schedule = area.width >= title_width.saturating_add(SCHEDULE_WIDTH);
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Min(0),
            Constraint::Length(if show_schedule { SCHEDULE_WIDTH } else { 0 }),
        ])
        .split(area);

    let title_style = bold().fg(Color::White);
    let title: Vec<Line> = app
        .config
        .title_lines()
        .map(|l| Line::from(Span::styled(l.to_uppercase(), title_style)))
        .collect();
    Paragraph::new(title).render(columns[0], buf);

    if show_schedule {
        let fmt = "%Y-%m-%d %H:%M";
        let schedule = vec![
            Line::from(Span::styled(
                "START SEQUENCE     TARGET SEQUENCE",
                dim(),
            )),
            Line::from(vec![
                Span::styled(app.config.start.format(fmt).to_string(), bold()),
                Span::styled(" │ ", dim()),
                Span::styled(app.config.end.format(fmt).to_string(), bold()),
            ]),
        ];
        Paragraph::new(schedule)
            .alignment(Alignment::Right)
            .render(columns[1], buf);
    }
}

fn render_percent_box(sample: &Sample, area: Rect, buf: &mut Buffer) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Thick)
        .border_style(Style::default().fg(Color::White));
    let inner = block.inner(area);
    block.render(area, buf);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // label
            Constraint::Min(1),    // number
            Constraint::Length(1), // markers
            Constraint::Length(3), // gauge
            Constraint::Length(1), // phase
        ])
        .split(inner);

    Paragraph::new(Span::styled("⚡ PERCENT_COMPLETE", bold().fg(ACID)))
        .alignment(Alignment::Center)
        .render(rows[0], buf);

    Paragraph::new(percent_lines(&sample.percent_text, rows[1]))
        .alignment(Alignment::Center)
        .render(rows[1], buf);

    Paragraph::new(Span::styled(marker_line(rows[2].width), dim())).render(rows[2], buf);

    Gauge::default()
        .block(Block::default().borders(Borders::ALL))
        .gauge_style(Style::default().fg(ACID).bg(Color::Black))
        .ratio(bar_ratio(sample.progress.percent))
        .label("")
        .use_unicode(true)
        .render(rows[3], buf);

    let phase = BarPhase::from_percent(sample.progress.percent);
    let (dot, dot_style) = match phase {
        BarPhase::Complete => ("●", bold().fg(ACID)),
        _ => ("○", dim()),
    };
    Paragraph::new(Line::from(vec![
        Span::styled(dot, dot_style),
        Span::raw(" "),
        Span::styled(phase.to_string(), Style::default().fg(ACID)),
        Span::styled("   SYS.MONITOR_V2", dim()),
    ]))
    .render(rows[4], buf);
}

/// Block digits when they fit, plain text otherwise; vertically centered
fn percent_lines(text: &str, area: Rect) -> Vec<Line<'static>> {
    let number_style = bold().fg(Color::White);
    let suffix = Span::styled(" %", bold().fg(Color::DarkGray));

    let big = area.height >= GLYPH_HEIGHT && big_width(text) + 2 <= area.width as usize;
    let mut rows: Vec<Line> = if big {
        let glyph_rows = render_big(text);
        let last = glyph_rows.len().saturating_sub(1);
        glyph_rows
            .into_iter()
            .enumerate()
            .map(|(i, row)| {
                let pad = if i == last { suffix.clone() } else { Span::raw("  ") };
                Line::from(vec![Span::styled(row, number_style), pad])
            })
            .collect()
    } else {
        vec![Line::from(vec![
            Span::styled(text.to_string(), number_style),
            suffix,
        ])]
    };

    let top = (area.height as usize).saturating_sub(rows.len()) / 2;
    rows.splice(0..0, std::iter::repeat(Line::default()).take(top));
    rows
}

fn render_cards(sample: &Sample, area: Rect, buf: &mut Buffer) {
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Ratio(1, 3),
            Constraint::Ratio(1, 3),
            Constraint::Ratio(1, 3),
        ])
        .split(area);

    let status = sample.progress.status;
    let cards = [
        ("Time Remaining", sample.remaining_text.clone(), NEON_PINK, bold().fg(NEON_PINK)),
        (sample.elapsed_label(), sample.elapsed_text.clone(), ACID, bold().fg(ACID)),
        ("System Status", status.to_string(), Color::White, status_style(status)),
    ];

    for ((label, value, border, value_style), rect) in cards.into_iter().zip(columns.iter()) {
        let card = Paragraph::new(Span::styled(value, value_style)).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(border))
                .title(Span::styled(label.to_uppercase(), dim())),
        );
        card.render(*rect, buf);
    }
}

/// `000% … 100%` spread across `width` columns
pub fn marker_line(width: u16) -> String {
    let label_width = MARKERS[0].len();
    let width = width as usize;
    if width < label_width * MARKERS.len() {
        return String::new();
    }

    let mut line = vec![' '; width];
    let span = width - label_width;
    for (i, label) in MARKERS.iter().enumerate() {
        let pos = i * span / (MARKERS.len() - 1);
        for (offset, c) in label.chars().enumerate() {
            line[pos + offset] = c;
        }
    }
    line.into_iter().collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn marker_line_spans_width() {
        let line = marker_line(40);
        assert_eq!(line.len(), 40);
        assert!(line.starts_with("000%"));
        assert!(line.ends_with("100%"));
        assert!(line.contains("050%"));
    }

    #[test]
    fn marker_line_too_narrow_is_empty() {
        assert_eq!(marker_line(10), "");
    }

    #[test]
    fn percent_uses_block_digits_when_room() {
        let lines = percent_lines("42.00", Rect::new(0, 0, 60, 7));
        assert_eq!(lines.len(), 1 + GLYPH_HEIGHT as usize);
        assert_eq!(lines[0], Line::default());
    }

    #[test]
    fn percent_falls_back_to_text() {
        let lines = percent_lines("42.00000000000000", Rect::new(0, 0, 30, 7));
        assert_eq!(lines.len(), 4);
        assert_eq!(lines[3].to_string(), "42.00000000000000 %");
    }
}
