use std::io;
use std::panic;

use crossterm::cursor::{Hide, Show};
use crossterm::event::{
    DisableFocusChange, DisableMouseCapture, EnableFocusChange, EnableMouseCapture,
};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode, size,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;

use crate::error::AppError;

/// Concrete terminal type used by the runtime.
pub type AppTerminal = Terminal<CrosstermBackend<io::Stdout>>;

/// Owns terminal lifecycle (raw mode, alternate screen, focus and mouse
/// reporting) for the lifetime of the application.
///
/// On drop, this type restores terminal state best-effort.
pub struct TerminalSession {
    terminal: AppTerminal,
    mouse: bool,
}

impl TerminalSession {
    /// Enters raw mode, switches to alternate screen, and creates a ratatui terminal.
    pub fn enter(mouse: bool) -> io::Result<Self> {
        enable_raw_mode()?;

        let mut stdout = io::stdout();
        let entered = if mouse {
            execute!(
                stdout,
                EnterAlternateScreen,
                Hide,
                EnableFocusChange,
                EnableMouseCapture
            )
        } else {
            execute!(stdout, EnterAlternateScreen, Hide, EnableFocusChange)
        };
        if let Err(error) = entered {
            let _ = cleanup_terminal_best_effort(mouse);
            return Err(error);
        }

        let backend = CrosstermBackend::new(stdout);
        match Terminal::new(backend) {
            Ok(terminal) => Ok(Self { terminal, mouse }),
            Err(error) => {
                let _ = cleanup_terminal_best_effort(mouse);
                Err(error)
            }
        }
    }

    /// Returns mutable access to the inner ratatui terminal.
    pub fn terminal_mut(&mut self) -> &mut AppTerminal {
        &mut self.terminal
    }
}

impl Drop for TerminalSession {
    fn drop(&mut self) {
        let _ = cleanup_terminal_best_effort(self.mouse);
    }
}

/// Fails when the terminal cannot hold a board of `cols` x `rows` cells.
pub fn ensure_fits(cols: u16, rows: u16) -> Result<(), AppError> {
    let (actual_cols, actual_rows) = size()?;
    if actual_cols < cols || actual_rows < rows {
        return Err(AppError::TerminalTooSmall {
            needed_cols: cols,
            needed_rows: rows,
            actual_cols,
            actual_rows,
        });
    }

    Ok(())
}

/// Restores the terminal before the default panic report is printed.
pub fn install_panic_hook() {
    let default_hook = panic::take_hook();

    panic::set_hook(Box::new(move |panic_info| {
        let _ = cleanup_terminal_best_effort(true);
        default_hook(panic_info);
    }));
}

fn cleanup_terminal_best_effort(mouse: bool) -> io::Result<()> {
    let _ = disable_raw_mode();
    let mut stdout = io::stdout();
    if mouse {
        let _ = execute!(stdout, DisableMouseCapture);
    }
    execute!(stdout, DisableFocusChange, Show, LeaveAlternateScreen)
}
