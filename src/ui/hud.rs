use ratatui::Frame;
use ratatui::layout::{Alignment, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::config::Palette;
use crate::renderer::DisplayList;

/// Renders the status and points rows from the last painted frame.
pub fn render_hud(
    frame: &mut Frame<'_>,
    status_area: Rect,
    points_area: Rect,
    list: &DisplayList,
    palette: &Palette,
) {
    frame.render_widget(
        Paragraph::new(labeled("Status: ", list.status_text(), palette))
            .alignment(Alignment::Center),
        status_area,
    );
    frame.render_widget(
        Paragraph::new(labeled("Points: ", list.points_text(), palette))
            .alignment(Alignment::Center),
        points_area,
    );
}

fn labeled<'a>(label: &'static str, value: &'a str, palette: &Palette) -> Line<'a> {
    Line::from(vec![
        Span::styled(label, Style::new().fg(palette.grid)),
        Span::styled(
            value,
            Style::new().fg(palette.status).add_modifier(Modifier::BOLD),
        ),
    ])
}
