use std::io;

use thiserror::Error;

use crate::world::WorldError;

/// Failures that abort startup or the terminal session.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("terminal I/O failed: {0}")]
    Io(#[from] io::Error),
    #[error("cannot initialize world: {0}")]
    World(#[from] WorldError),
    #[error("terminal is {actual_cols}x{actual_rows}, the board needs at least {needed_cols}x{needed_rows}")]
    TerminalTooSmall {
        needed_cols: u16,
        needed_rows: u16,
        actual_cols: u16,
        actual_rows: u16,
    },
    #[error("grid width {0} does not fit on a terminal")]
    WidthTooLarge(usize),
    #[error("cannot encode report: {0}")]
    Json(#[from] serde_json::Error),
}
