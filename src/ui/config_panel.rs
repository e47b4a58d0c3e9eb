use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, Paragraph, Widget, Wrap},
};

use super::{bold, centered_rect, dim, ACID, NEON_PINK};
use crate::config::MAX_PRECISION;
use crate::form::{ConfigForm, Field};
use crate::presets::Preset;

const PANEL_WIDTH_PERCENT: u16 = 70;
const CURSOR: &str = "▏";

pub fn render(form: &ConfigForm, area: Rect, buf: &mut Buffer) {
    let lines = panel_lines(form);
    let popup = centered_rect(PANEL_WIDTH_PERCENT, lines.len() as u16 + 2, area);

    Clear.render(popup, buf);
    Paragraph::new(lines)
        .wrap(Wrap { trim: false })
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_type(BorderType::Thick)
                .border_style(Style::default().fg(ACID))
                .title(Span::styled(" ⌖ SYSTEM_CONFIG ", bold().fg(Color::Black).bg(ACID))),
        )
        .render(popup, buf);
}

fn label(form: &ConfigForm, field: Field, accent: Color) -> Line<'static> {
    let focused = form.focus == field;
    let marker = if focused { "▶ " } else { "  " };
    let style = if focused {
        bold().fg(accent)
    } else {
        dim()
    };
    Line::from(Span::styled(
        format!("{marker}{}", field.to_string().to_uppercase()),
        style,
    ))
}

fn value(text: &str, focused: bool) -> Line<'static> {
    let mut spans = vec![Span::raw("    "), Span::styled(text.to_string(), bold())];
    if focused {
        spans.push(Span::styled(CURSOR, Style::default().fg(ACID)));
    }
    Line::from(spans)
}

fn panel_lines(form: &ConfigForm) -> Vec<Line<'static>> {
    let mut lines = Vec::new();

    lines.push(label(form, Field::Title, Color::White));
    let title_lines: Vec<&str> = form.title.split('\n').collect();
    let last = title_lines.len() - 1;
    for (i, l) in title_lines.iter().enumerate() {
        lines.push(value(l, form.focus == Field::Title && i == last));
    }

    lines.push(label(form, Field::Start, ACID));
    lines.push(value(&form.start, form.focus == Field::Start));

    lines.push(label(form, Field::End, NEON_PINK));
    lines.push(value(&form.end, form.focus == Field::End));

    lines.push(label(form, Field::Precision, Color::White));
    lines.push(Line::from(vec![
        Span::raw("    "),
        Span::styled(precision_slider(form.precision), Style::default().fg(ACID)),
        Span::styled(format!("  {} DECIMALS", form.precision), bold().fg(ACID)),
    ]));

    lines.push(Line::default());
    lines.push(label(form, Field::Presets, ACID));
    let mut presets = vec![Span::raw("    ")];
    for preset in Preset::ALL {
        let style = if preset == form.preset {
            bold().fg(Color::Black).bg(ACID)
        } else {
            Style::default().fg(ACID)
        };
        presets.push(Span::styled(format!(" {preset} "), style));
        presets.push(Span::raw(" "));
    }
    lines.push(Line::from(presets));

    lines.push(Line::default());
    let engage_style = if form.focus == Field::Engage {
        bold().fg(Color::Black).bg(ACID)
    } else {
        bold().fg(ACID)
    };
    lines.push(Line::from(Span::styled("  [ ⚡ ENGAGE TRACKING ]", engage_style)));

    if let Some(err) = &form.error {
        lines.push(Line::from(Span::styled(
            format!("  ! {err}"),
            bold().fg(Color::Red),
        )));
    }

    lines.push(Line::default());
    lines.push(Line::from(Span::styled(
        "  tab/↑↓ move · alt+enter newline · ←/→ adjust · enter select · ctrl+s engage · esc close",
        dim().add_modifier(Modifier::ITALIC),
    )));

    lines
}

fn precision_slider(precision: u8) -> String {
    let filled = precision.min(MAX_PRECISION) as usize;
    format!(
        "[{}{}]",
        "█".repeat(filled),
        "░".repeat(MAX_PRECISION as usize - filled)
    )
}
