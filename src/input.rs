use crossterm::event::{
    Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEventKind,
};

use crate::world::WorldAdapter;

/// Canonical movement directions for snake input.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

/// High-level host events consumed by the game loop.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum GameInput {
    /// A movement key; forwarded through [`apply_key`].
    Key(KeyCode),
    /// Keyboard activation of the control button.
    Activate,
    /// Left click at a terminal cell.
    Click { column: u16, row: u16 },
    /// The surface became visible (`true`) or hidden (`false`).
    Visibility(bool),
    Quit,
}

/// Maps a key to a movement intent using the fixed `h j k l` table.
///
/// Modifiers are not inspected, so `H` maps like `h`.
#[must_use]
pub fn map_key_to_direction(code: KeyCode) -> Option<Direction> {
    let KeyCode::Char(ch) = code else {
        return None;
    };

    match ch.to_ascii_lowercase() {
        'h' => Some(Direction::Left),
        'j' => Some(Direction::Down),
        'k' => Some(Direction::Up),
        'l' => Some(Direction::Right),
        _ => None,
    }
}

/// Maps `code` and, when it names a direction, issues the change on `world`.
pub fn apply_key<W: WorldAdapter + ?Sized>(world: &mut W, code: KeyCode) -> Option<Direction> {
    let direction = map_key_to_direction(code)?;
    world.change_direction(direction);
    Some(direction)
}

/// Translates a raw terminal event into a game input.
///
/// Key repeats pass through; only releases are dropped.
#[must_use]
pub fn translate_event(event: &Event) -> Option<GameInput> {
    match event {
        Event::Key(key) => translate_key(*key),
        Event::Mouse(mouse) => match mouse.kind {
            MouseEventKind::Down(MouseButton::Left) => Some(GameInput::Click {
                column: mouse.column,
                row: mouse.row,
            }),
            _ => None,
        },
        Event::FocusGained => Some(GameInput::Visibility(true)),
        Event::FocusLost => Some(GameInput::Visibility(false)),
        _ => None,
    }
}

fn translate_key(key: KeyEvent) -> Option<GameInput> {
    if key.kind == KeyEventKind::Release {
        return None;
    }

    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        return Some(GameInput::Quit);
    }

    match key.code {
        KeyCode::Char('q') | KeyCode::Esc => Some(GameInput::Quit),
        KeyCode::Enter | KeyCode::Char(' ') => Some(GameInput::Activate),
        code => Some(GameInput::Key(code)),
    }
}
