pub mod config_panel;
pub mod dashboard;
pub mod digits;

use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    widgets::Widget,
};

use crate::app::{App, Mode};
use crate::progress::Status;

pub const ACID: Color = Color::Rgb(204, 255, 0);
pub const NEON_PINK: Color = Color::Rgb(255, 0, 255);

pub(crate) fn bold() -> Style {
    Style::default().add_modifier(Modifier::BOLD)
}

pub(crate) fn dim() -> Style {
    Style::default().fg(Color::DarkGray)
}

pub(crate) fn status_style(status: Status) -> Style {
    match status {
        Status::Complete => bold().fg(ACID),
        Status::Active => bold().fg(Color::White),
        Status::Pending => bold().fg(Color::Gray),
    }
}

/// Rect of `percent_x` by `height` centered in `area`
pub(crate) fn centered_rect(percent_x: u16, height: u16, area: Rect) -> Rect {
    let height = height.min(area.height);
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length((area.height - height) / 2),
            Constraint::Length(height),
            Constraint::Min(0),
        ])
        .split(area);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(vertical[1])[1]
}

impl Widget for &App {
    fn render(self, area: Rect, buf: &mut Buffer) {
        dashboard::render(self, area, buf);

        if let Mode::Configuring(form) = &self.mode {
            config_panel::render(form, area, buf);
        }
    }
}
