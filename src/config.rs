use ratatui::style::Color;

/// Side length of the square world grid, in cells.
pub const DEFAULT_WORLD_WIDTH: usize = 16;

/// Largest accepted grid side length.
pub const MAX_WORLD_WIDTH: usize = 256;

/// Side length of one cell in canvas units.
pub const CELL_SIZE: f64 = 26.0;

/// Nominal simulation rate in steps per second.
pub const DEFAULT_FPS: u32 = 60;

/// Number of cells the snake spawns with.
pub const SNAKE_SPAWN_LENGTH: usize = 3;

/// Control button label before the first start.
pub const LABEL_PLAY: &str = "Play";

/// Control button label while a session is running.
pub const LABEL_PLAYING: &str = "Playing ..";

/// Control button label once the session reached a terminal status.
pub const LABEL_TRY_AGAIN: &str = "Try Again";

/// Terminal rows reserved below the canvas: status, points, button.
pub const HUD_HEIGHT: u16 = 5;

/// Terminal columns per grid cell. Two columns keep cells roughly square.
pub const COLUMNS_PER_CELL: u16 = 2;

/// Colors used to paint the board.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub struct Palette {
    pub grid: Color,
    pub snake_head: Color,
    pub snake_body: Color,
    pub reward: Color,
    pub status: Color,
    pub button_fg: Color,
    pub button_bg: Color,
}

/// Default palette: blue-violet head on a dark body, red reward.
pub const PALETTE: Palette = Palette {
    grid: Color::DarkGray,
    snake_head: Color::Rgb(0x78, 0x78, 0xdb),
    snake_body: Color::White,
    reward: Color::Rgb(0xff, 0x00, 0x00),
    status: Color::Gray,
    button_fg: Color::Black,
    button_bg: Color::Green,
};

/// Runtime settings resolved from defaults and command-line flags.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub struct Settings {
    pub width: usize,
    pub fps: u32,
    pub spawn_index: Option<usize>,
    pub seed: Option<u64>,
    pub mouse: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            width: DEFAULT_WORLD_WIDTH,
            fps: DEFAULT_FPS,
            spawn_index: None,
            seed: None,
            mouse: true,
        }
    }
}

impl Settings {
    /// Returns the canvas side length in canvas units.
    #[must_use]
    pub fn canvas_size(&self) -> f64 {
        self.width as f64 * CELL_SIZE
    }
}
