pub mod button;
pub mod hud;

use ratatui::Frame;
use ratatui::layout::{Constraint, Flex, Layout, Rect};
use ratatui::style::Style;
use ratatui::symbols::Marker;
use ratatui::widgets::Block;
use ratatui::widgets::canvas::Canvas;

use crate::config::{COLUMNS_PER_CELL, HUD_HEIGHT, PALETTE};
use crate::session::Session;
use crate::world::WorldAdapter;

/// Screen regions produced by one frame, used for mouse hit-testing.
#[derive(Debug, Clone, Copy, Default, Eq, PartialEq)]
pub struct FrameAreas {
    pub canvas: Rect,
    pub button: Rect,
}

/// Terminal size (columns, rows) needed for a board `width` cells wide.
#[must_use]
pub fn required_size(width: usize) -> Option<(u16, u16)> {
    let width = u16::try_from(width).ok()?;
    let cols = width.checked_mul(COLUMNS_PER_CELL)?.checked_add(2)?;
    let rows = width.checked_add(2)?.checked_add(HUD_HEIGHT)?;
    Some((cols, rows))
}

/// Draws the board, HUD rows and control button for `session`.
pub fn render(frame: &mut Frame<'_>, session: &Session) -> FrameAreas {
    let game = session.game();
    let list = game.surface();
    let (cols, rows) = required_size(game.world().width()).unwrap_or((u16::MAX, u16::MAX));

    let [column] = Layout::horizontal([Constraint::Length(cols)])
        .flex(Flex::Center)
        .areas(frame.area());
    let [board, status_row, points_row, button_row] = Layout::vertical([
        Constraint::Length(rows.saturating_sub(HUD_HEIGHT)),
        Constraint::Length(1),
        Constraint::Length(1),
        Constraint::Length(HUD_HEIGHT - 2),
    ])
    .flex(Flex::Center)
    .areas(column);

    let block = Block::bordered()
        .title(" rusty snake ")
        .border_style(Style::new().fg(PALETTE.grid));
    let canvas = block.inner(board);
    frame.render_widget(
        Canvas::default()
            .block(block)
            .marker(Marker::HalfBlock)
            .x_bounds([0.0, list.extent()])
            .y_bounds([0.0, list.extent()])
            .paint(|ctx| ctx.draw(list)),
        board,
    );

    hud::render_hud(frame, status_row, points_row, list, &PALETTE);
    let button = button::render_button(frame, button_row, game.button_label(), &PALETTE);

    FrameAreas { canvas, button }
}
