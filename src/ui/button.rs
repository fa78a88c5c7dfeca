use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Flex, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::widgets::{Block, Paragraph};

use crate::config::Palette;

/// Horizontal padding on each side of the label, inside the border.
const LABEL_PADDING: u16 = 2;

/// Draws the control button centered in `area` and returns its clickable box.
pub fn render_button(frame: &mut Frame<'_>, area: Rect, label: &str, palette: &Palette) -> Rect {
    let label_width = u16::try_from(label.chars().count()).unwrap_or(u16::MAX);
    let width = label_width
        .saturating_add(LABEL_PADDING * 2)
        .saturating_add(2);
    let [button] = Layout::horizontal([Constraint::Length(width)])
        .flex(Flex::Center)
        .areas(area);

    frame.render_widget(
        Paragraph::new(label)
            .alignment(Alignment::Center)
            .style(
                Style::new()
                    .fg(palette.button_fg)
                    .bg(palette.button_bg)
                    .add_modifier(Modifier::BOLD),
            )
            .block(Block::bordered().border_style(Style::new().fg(palette.button_bg))),
        button,
    );

    button
}

#[cfg(test)]
mod tests {
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;
    use ratatui::layout::Rect;

    use crate::config::PALETTE;

    use super::render_button;

    #[test]
    fn button_box_fits_label_and_is_centered() {
        let mut terminal = Terminal::new(TestBackend::new(30, 3)).expect("test terminal");
        let mut drawn = Rect::default();

        terminal
            .draw(|frame| drawn = render_button(frame, frame.area(), "Try Again", &PALETTE))
            .expect("draw succeeds");

        assert_eq!(drawn.width, 15);
        assert_eq!(drawn.height, 3);
        assert!((7..=8).contains(&drawn.x));
    }
}
