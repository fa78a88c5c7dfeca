use ratatui::style::Color;
use ratatui::widgets::canvas::{Line, Painter, Shape};

use crate::config::{CELL_SIZE, Palette};
use crate::world::{CellPosition, WorldAdapter};

/// Sub-samples per cell edge when rasterizing filled cells onto the canvas.
const FILL_SAMPLES: usize = 12;

/// A point in canvas units, origin top-left, y growing downwards.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

/// Drawing target for [`paint`].
pub trait Surface {
    fn clear(&mut self);
    fn stroke_line(&mut self, from: Point, to: Point, color: Color);
    fn fill_square(&mut self, origin: Point, size: f64, color: Color);
    fn set_status_text(&mut self, text: &str);
    fn set_points_text(&mut self, text: &str);
}

/// One recorded drawing operation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DrawCommand {
    Line { from: Point, to: Point, color: Color },
    Fill { origin: Point, size: f64, color: Color },
}

/// Retained surface: records commands for the next frame and rasterizes
/// them as a ratatui canvas shape.
#[derive(Debug, Clone, Default)]
pub struct DisplayList {
    extent: f64,
    commands: Vec<DrawCommand>,
    status_text: String,
    points_text: String,
}

impl DisplayList {
    /// Creates an empty list for a square canvas `extent` units wide.
    #[must_use]
    pub fn new(extent: f64) -> Self {
        Self {
            extent,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn extent(&self) -> f64 {
        self.extent
    }

    #[must_use]
    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    #[must_use]
    pub fn status_text(&self) -> &str {
        &self.status_text
    }

    #[must_use]
    pub fn points_text(&self) -> &str {
        &self.points_text
    }

    /// Converts a top-left based y coordinate to the canvas' bottom-left one.
    fn flip(&self, y: f64) -> f64 {
        self.extent - y
    }
}

impl Surface for DisplayList {
    fn clear(&mut self) {
        self.commands.clear();
    }

    fn stroke_line(&mut self, from: Point, to: Point, color: Color) {
        self.commands.push(DrawCommand::Line { from, to, color });
    }

    fn fill_square(&mut self, origin: Point, size: f64, color: Color) {
        self.commands.push(DrawCommand::Fill {
            origin,
            size,
            color,
        });
    }

    fn set_status_text(&mut self, text: &str) {
        text.clone_into(&mut self.status_text);
    }

    fn set_points_text(&mut self, text: &str) {
        text.clone_into(&mut self.points_text);
    }
}

impl Shape for DisplayList {
    fn draw(&self, painter: &mut Painter<'_, '_>) {
        for command in &self.commands {
            match *command {
                DrawCommand::Line { from, to, color } => Line::new(
                    from.x,
                    self.flip(from.y),
                    to.x,
                    self.flip(to.y),
                    color,
                )
                .draw(painter),
                DrawCommand::Fill {
                    origin,
                    size,
                    color,
                } => {
                    let step = size / FILL_SAMPLES as f64;
                    for i in 0..FILL_SAMPLES {
                        for j in 0..FILL_SAMPLES {
                            let x = origin.x + (i as f64 + 0.5) * step;
                            let y = self.flip(origin.y + (j as f64 + 0.5) * step);
                            if let Some((px, py)) = painter.get_point(x, y) {
                                painter.paint(px, py, color);
                            }
                        }
                    }
                }
            }
        }
    }
}

/// Paints the world onto `surface`: grid, snake (tail to head), reward, text.
///
/// The caller clears the surface beforehand.
pub fn paint<W, S>(world: &W, surface: &mut S, palette: &Palette)
where
    W: WorldAdapter + ?Sized,
    S: Surface + ?Sized,
{
    let width = world.width();

    draw_grid(surface, width, palette.grid);
    draw_snake(surface, width, &world.snake_cells(), palette);
    if let Some(cell) = world.reward_cell() {
        draw_cell(surface, width, cell, palette.reward);
    }

    surface.set_status_text(&world.status_text());
    surface.set_points_text(&world.points().to_string());
}

fn draw_grid<S: Surface + ?Sized>(surface: &mut S, width: usize, color: Color) {
    let extent = width as f64 * CELL_SIZE;

    for x in 0..=width {
        let x = x as f64 * CELL_SIZE;
        surface.stroke_line(Point { x, y: 0.0 }, Point { x, y: extent }, color);
    }

    for y in 0..=width {
        let y = y as f64 * CELL_SIZE;
        surface.stroke_line(Point { x: 0.0, y }, Point { x: extent, y }, color);
    }
}

// Head last: it must win over any body segment drawn on the same cell.
fn draw_snake<S: Surface + ?Sized>(surface: &mut S, width: usize, cells: &[usize], palette: &Palette) {
    for (offset, &cell) in cells.iter().enumerate().rev() {
        let color = if offset == 0 {
            palette.snake_head
        } else {
            palette.snake_body
        };
        draw_cell(surface, width, cell, color);
    }
}

fn draw_cell<S: Surface + ?Sized>(surface: &mut S, width: usize, cell: usize, color: Color) {
    if cell >= width * width {
        return;
    }

    let CellPosition { row, col } = CellPosition::from_index(cell, width);
    let origin = Point {
        x: col as f64 * CELL_SIZE,
        y: row as f64 * CELL_SIZE,
    };
    surface.fill_square(origin, CELL_SIZE, color);
}
