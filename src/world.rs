use std::collections::VecDeque;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Serialize;
use thiserror::Error;

use crate::config::{MAX_WORLD_WIDTH, SNAKE_SPAWN_LENGTH};
use crate::input::Direction;

/// Progress of a session once it has been started.
///
/// A session that was never started reports `None` from
/// [`WorldAdapter::status`].
#[derive(Debug, Clone, Copy, Eq, PartialEq, Serialize)]
pub enum GameStatus {
    Playing,
    Won,
    Lost,
}

impl GameStatus {
    /// Returns true for the statuses that end active play.
    #[must_use]
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Won | Self::Lost)
    }
}

/// Construction-time failures of a world session.
#[derive(Debug, Error, Clone, Copy, Eq, PartialEq)]
pub enum WorldError {
    #[error("world width must be greater than zero")]
    ZeroWidth,
    #[error("cell index {index} lies outside the {cells}-cell grid")]
    SpawnOutOfBounds { index: usize, cells: usize },
    #[error("snake body must contain at least one cell")]
    EmptyBody,
    #[error("world width {width} exceeds the maximum of {max}")]
    GridTooLarge { width: usize, max: usize },
}

/// Row/column of a cell on the square grid.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Serialize)]
pub struct CellPosition {
    pub row: usize,
    pub col: usize,
}

impl CellPosition {
    /// Projects a linear cell index onto the grid.
    #[must_use]
    pub fn from_index(index: usize, width: usize) -> Self {
        Self {
            row: index / width,
            col: index % width,
        }
    }
}

/// Owned copy of everything the presentation layer reads in one tick.
#[derive(Debug, Clone, Eq, PartialEq, Serialize)]
pub struct Snapshot {
    pub width: usize,
    /// Occupied cells, head first.
    pub snake_cells: Vec<usize>,
    pub reward_cell: Option<usize>,
    pub status: Option<GameStatus>,
    pub points: u32,
    pub status_text: String,
}

/// Boundary to the simulation engine.
///
/// The loop and renderer only ever talk to the engine through this trait;
/// every mutation goes through [`start`](Self::start),
/// [`change_direction`](Self::change_direction) or [`step`](Self::step).
pub trait WorldAdapter {
    fn width(&self) -> usize;

    /// `None` until the session has been started.
    fn status(&self) -> Option<GameStatus>;

    /// Moves a not-started session into play. No-op once started.
    fn start(&mut self);

    /// Queues the heading for the next [`step`](Self::step).
    fn change_direction(&mut self, direction: Direction);

    /// Advances the simulation by exactly one tick.
    fn step(&mut self);

    /// Occupied cells, head first. Always a fresh copy.
    fn snake_cells(&self) -> Vec<usize>;

    fn snake_length(&self) -> usize;

    /// The reward cell, or `None` when no free cell is left.
    fn reward_cell(&self) -> Option<usize>;

    fn points(&self) -> u32;

    /// Human-readable status for the HUD.
    fn status_text(&self) -> String;

    /// Reads every accessor into an owned [`Snapshot`].
    fn snapshot(&self) -> Snapshot {
        Snapshot {
            width: self.width(),
            snake_cells: self.snake_cells(),
            reward_cell: self.reward_cell(),
            status: self.status(),
            points: self.points(),
            status_text: self.status_text(),
        }
    }
}

/// Bundled simulation engine: wrapping square grid, one reward at a time.
#[derive(Debug, Clone)]
pub struct World {
    width: usize,
    size: usize,
    body: VecDeque<usize>,
    heading: Direction,
    pending_heading: Option<Direction>,
    reward_cell: Option<usize>,
    status: Option<GameStatus>,
    points: u32,
    rng: StdRng,
}

impl World {
    /// Creates a session with the snake head at `spawn_index`.
    pub fn new(width: usize, spawn_index: usize) -> Result<Self, WorldError> {
        Self::with_rng(width, spawn_index, StdRng::from_entropy())
    }

    /// Creates a deterministic session for tests and reproducible runs.
    pub fn with_seed(width: usize, spawn_index: usize, seed: u64) -> Result<Self, WorldError> {
        Self::with_rng(width, spawn_index, StdRng::seed_from_u64(seed))
    }

    /// Creates a deterministic session from explicit body cells (head first).
    pub fn with_body(
        width: usize,
        cells: Vec<usize>,
        heading: Direction,
        seed: u64,
    ) -> Result<Self, WorldError> {
        let size = grid_cells(width)?;
        if cells.is_empty() {
            return Err(WorldError::EmptyBody);
        }
        if let Some(&index) = cells.iter().find(|&&index| index >= size) {
            return Err(WorldError::SpawnOutOfBounds { index, cells: size });
        }

        Ok(Self::assemble(
            width,
            VecDeque::from(cells),
            heading,
            StdRng::seed_from_u64(seed),
        ))
    }

    fn with_rng(width: usize, spawn_index: usize, rng: StdRng) -> Result<Self, WorldError> {
        let size = grid_cells(width)?;
        if spawn_index >= size {
            return Err(WorldError::SpawnOutOfBounds {
                index: spawn_index,
                cells: size,
            });
        }

        let spawn = CellPosition::from_index(spawn_index, width);
        let body = (0..SNAKE_SPAWN_LENGTH.min(width))
            .map(|offset| spawn.row * width + (spawn.col + width - offset) % width)
            .collect();

        Ok(Self::assemble(width, body, Direction::Right, rng))
    }

    fn assemble(width: usize, body: VecDeque<usize>, heading: Direction, mut rng: StdRng) -> Self {
        let size = width * width;
        let reward_cell = free_cell(&mut rng, size, &body);

        Self {
            width,
            size,
            body,
            heading,
            pending_heading: None,
            reward_cell,
            status: None,
            points: 0,
            rng,
        }
    }

    /// Moves the reward to `cell`, bypassing random placement.
    pub fn place_reward(&mut self, cell: Option<usize>) {
        self.reward_cell = cell.filter(|&index| index < self.size);
    }

    /// Returns the current head cell.
    #[must_use]
    pub fn head(&self) -> usize {
        self.body[0]
    }

    fn next_cell(&self, direction: Direction) -> usize {
        let width = self.width;
        let CellPosition { row, col } = CellPosition::from_index(self.head(), width);

        match direction {
            Direction::Right => row * width + (col + 1) % width,
            Direction::Left => row * width + (col + width - 1) % width,
            Direction::Up => ((row + width - 1) % width) * width + col,
            Direction::Down => ((row + 1) % width) * width + col,
        }
    }
}

impl WorldAdapter for World {
    fn width(&self) -> usize {
        self.width
    }

    fn status(&self) -> Option<GameStatus> {
        self.status
    }

    fn start(&mut self) {
        if self.status.is_none() {
            self.status = Some(GameStatus::Playing);
        }
    }

    fn change_direction(&mut self, direction: Direction) {
        // Never turn back into the neck segment.
        if self.body.get(1) == Some(&self.next_cell(direction)) {
            return;
        }

        self.pending_heading = Some(direction);
    }

    fn step(&mut self) {
        if self.status != Some(GameStatus::Playing) {
            return;
        }

        if let Some(heading) = self.pending_heading.take() {
            self.heading = heading;
        }

        let next = self.next_cell(self.heading);
        let vacated = self.body.pop_back();
        self.body.push_front(next);

        if self.body.iter().skip(1).any(|&cell| cell == next) {
            self.status = Some(GameStatus::Lost);
            return;
        }

        if self.reward_cell != Some(next) {
            return;
        }

        self.points += 1;
        if let Some(tail) = vacated {
            self.body.push_back(tail);
        }

        if self.body.len() >= self.size {
            self.reward_cell = None;
            self.status = Some(GameStatus::Won);
        } else {
            self.reward_cell = free_cell(&mut self.rng, self.size, &self.body);
        }
    }

    fn snake_cells(&self) -> Vec<usize> {
        self.body.iter().copied().collect()
    }

    fn snake_length(&self) -> usize {
        self.body.len()
    }

    fn reward_cell(&self) -> Option<usize> {
        self.reward_cell
    }

    fn points(&self) -> u32 {
        self.points
    }

    fn status_text(&self) -> String {
        match self.status {
            None => "Zzz",
            Some(GameStatus::Playing) => "Playing",
            Some(GameStatus::Won) => "You have won",
            Some(GameStatus::Lost) => "You have Lost",
        }
        .to_owned()
    }
}

/// Validates `width` and returns the number of cells on the grid.
pub fn grid_cells(width: usize) -> Result<usize, WorldError> {
    if width == 0 {
        return Err(WorldError::ZeroWidth);
    }

    let too_large = WorldError::GridTooLarge {
        width,
        max: MAX_WORLD_WIDTH,
    };
    if width > MAX_WORLD_WIDTH {
        return Err(too_large);
    }

    width.checked_mul(width).ok_or(too_large)
}

/// Picks a uniformly random cell not covered by `body`.
fn free_cell<R: Rng + ?Sized>(rng: &mut R, size: usize, body: &VecDeque<usize>) -> Option<usize> {
    let candidates: Vec<usize> = (0..size).filter(|cell| !body.contains(cell)).collect();
    if candidates.is_empty() {
        return None;
    }

    Some(candidates[rng.gen_range(0..candidates.len())])
}
