use std::time::Instant;

use rand::Rng;
use ratatui::layout::Rect;
use serde::Serialize;
use tracing::info;

use crate::config::Settings;
use crate::controller::{ControlOutcome, GameLoop, Phase};
use crate::input::GameInput;
use crate::renderer::DisplayList;
use crate::world::{self, Snapshot, World, WorldAdapter, WorldError};

/// The concrete loop driven by the binary.
pub type Game = GameLoop<World, DisplayList>;

/// What the host should do after an input was handled.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum SessionSignal {
    Continue,
    /// Tear this session down and load a fresh one.
    Reload,
    Quit,
}

/// One page-load worth of state: a world, its loop and host visibility.
#[derive(Debug)]
pub struct Session {
    game: Game,
    visible: bool,
}

impl Session {
    /// Builds a new session, drawing the spawn index from `rng` unless fixed.
    pub fn load<R: Rng + ?Sized>(settings: &Settings, rng: &mut R) -> Result<Self, WorldError> {
        let cells = world::grid_cells(settings.width)?;
        let spawn_index = settings
            .spawn_index
            .unwrap_or_else(|| rng.gen_range(0..cells));

        let world = match settings.seed {
            Some(seed) => World::with_seed(settings.width, spawn_index, seed)?,
            None => World::new(settings.width, spawn_index)?,
        };
        info!(width = settings.width, spawn_index, "session loaded");

        Ok(Self {
            game: GameLoop::new(world, DisplayList::new(settings.canvas_size()), settings.fps),
            visible: true,
        })
    }

    #[must_use]
    pub fn game(&self) -> &Game {
        &self.game
    }

    /// Whether display refreshes are currently delivered.
    #[must_use]
    pub fn is_visible(&self) -> bool {
        self.visible
    }

    /// Routes one host input; `button` is where the control button was drawn.
    pub fn handle_input(&mut self, input: GameInput, button: Rect, now: Instant) -> SessionSignal {
        match input {
            GameInput::Quit => SessionSignal::Quit,
            GameInput::Key(code) => {
                self.game.key(code);
                SessionSignal::Continue
            }
            GameInput::Activate => self.press_button(now),
            GameInput::Click { column, row } if contains(button, column, row) => {
                self.press_button(now)
            }
            GameInput::Click { .. } => SessionSignal::Continue,
            GameInput::Visibility(visible) => {
                self.visible = visible;
                SessionSignal::Continue
            }
        }
    }

    /// Runs the timer stage; returns true when a tick ran.
    ///
    /// The terminal host calls this before drawing a frame.
    pub fn run_due_tick(&mut self, now: Instant) -> bool {
        self.game.poll(now)
    }

    /// Delivers the refresh stage once a frame has been drawn.
    ///
    /// Nothing is delivered while the surface is hidden.
    pub fn frame_presented(&mut self, now: Instant) {
        if self.visible {
            self.game.on_refresh(now);
        }
    }

    /// Timer stage followed by the refresh stage, for hosts without frames.
    pub fn advance(&mut self, now: Instant) -> bool {
        let ticked = self.run_due_tick(now);
        self.frame_presented(now);
        ticked
    }

    fn press_button(&mut self, now: Instant) -> SessionSignal {
        match self.game.click(now) {
            ControlOutcome::Reload => {
                info!("reload requested");
                SessionSignal::Reload
            }
            ControlOutcome::Started | ControlOutcome::Ignored => SessionSignal::Continue,
        }
    }
}

/// Result of a run without a terminal.
#[derive(Debug, Clone, Serialize)]
pub struct HeadlessReport {
    pub ticks: u64,
    pub ended: bool,
    pub button_label: &'static str,
    pub snapshot: Snapshot,
}

/// Starts a session and runs up to `max_ticks` ticks on a virtual clock.
pub fn run_headless<R: Rng + ?Sized>(
    settings: &Settings,
    rng: &mut R,
    max_ticks: u64,
) -> Result<HeadlessReport, WorldError> {
    let mut session = Session::load(settings, rng)?;
    let mut now = Instant::now();
    let interval = session.game.scheduler().interval();

    session.press_button(now);
    while session.game.ticks() < max_ticks && session.game.phase() == Phase::Running {
        now += interval;
        session.advance(now);
    }

    let game = &session.game;
    Ok(HeadlessReport {
        ticks: game.ticks(),
        ended: game.phase() == Phase::Ended,
        button_label: game.button_label(),
        snapshot: game.world().snapshot(),
    })
}

fn contains(area: Rect, column: u16, row: u16) -> bool {
    column >= area.x && column < area.right() && row >= area.y && row < area.bottom()
}

#[cfg(test)]
mod tests {
    use std::time::Instant;

    use crossterm::event::KeyCode;
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use ratatui::layout::Rect;

    use crate::config::Settings;
    use crate::controller::Phase;
    use crate::input::GameInput;
    use crate::scheduler::Stage;
    use crate::world::{GameStatus, WorldAdapter, WorldError};

    use super::{Session, SessionSignal, run_headless};

    fn settings() -> Settings {
        Settings {
            seed: Some(9),
            spawn_index: Some(0),
            ..Settings::default()
        }
    }

    const BUTTON: Rect = Rect {
        x: 10,
        y: 20,
        width: 12,
        height: 3,
    };

    #[test]
    fn load_respects_fixed_spawn() {
        let mut rng = StdRng::seed_from_u64(1);
        let session = Session::load(&settings(), &mut rng).expect("valid settings");

        assert_eq!(session.game().world().snake_cells()[0], 0);
        assert_eq!(session.game().world().status(), None);
    }

    #[test]
    fn random_spawn_lies_inside_grid() {
        let mut rng = StdRng::seed_from_u64(3);
        let settings = Settings {
            width: 5,
            ..Settings::default()
        };

        for _ in 0..20 {
            let session = Session::load(&settings, &mut rng).expect("valid settings");
            assert!(session.game().world().snake_cells()[0] < 25);
        }
    }

    #[test]
    fn invalid_spawn_aborts_load() {
        let mut rng = StdRng::seed_from_u64(1);
        let settings = Settings {
            spawn_index: Some(300),
            ..Settings::default()
        };

        assert_eq!(
            Session::load(&settings, &mut rng).unwrap_err(),
            WorldError::SpawnOutOfBounds {
                index: 300,
                cells: 256
            }
        );
    }

    #[test]
    fn click_outside_button_is_ignored() {
        let mut rng = StdRng::seed_from_u64(1);
        let mut session = Session::load(&settings(), &mut rng).expect("valid settings");
        let now = Instant::now();

        let signal = session.handle_input(GameInput::Click { column: 0, row: 0 }, BUTTON, now);
        assert_eq!(signal, SessionSignal::Continue);
        assert_eq!(session.game().phase(), Phase::Idle);

        session.handle_input(GameInput::Click { column: 12, row: 21 }, BUTTON, now);
        assert_eq!(session.game().world().status(), Some(GameStatus::Playing));
        assert_eq!(session.game().button_label(), "Playing ..");
    }

    #[test]
    fn hidden_session_does_not_rearm() {
        let mut rng = StdRng::seed_from_u64(1);
        let mut session = Session::load(&settings(), &mut rng).expect("valid settings");
        let mut now = Instant::now();
        session.handle_input(GameInput::Activate, BUTTON, now);
        session.handle_input(GameInput::Visibility(false), BUTTON, now);

        for _ in 0..5 {
            now += session.game().scheduler().interval();
            session.advance(now);
        }
        assert_eq!(session.game().ticks(), 1);

        session.handle_input(GameInput::Visibility(true), BUTTON, now);
        session.advance(now);
        now += session.game().scheduler().interval();
        assert!(session.advance(now));
        assert_eq!(session.game().ticks(), 2);
    }

    #[test]
    fn refresh_stage_waits_for_presented_frame() {
        let mut rng = StdRng::seed_from_u64(1);
        let mut session = Session::load(&settings(), &mut rng).expect("valid settings");
        let mut now = Instant::now();
        session.handle_input(GameInput::Activate, BUTTON, now);

        now += session.game().scheduler().interval();
        assert!(session.run_due_tick(now));
        assert_eq!(session.game().scheduler().stage(), Stage::AwaitRefresh);
        assert!(session.game().next_deadline().is_none());

        session.frame_presented(now);
        assert_eq!(
            session.game().next_deadline(),
            Some(now + session.game().scheduler().interval())
        );
    }

    #[test]
    fn oversized_width_aborts_load() {
        let mut rng = StdRng::seed_from_u64(1);
        let settings = Settings {
            width: 1usize << 32,
            ..Settings::default()
        };

        assert!(matches!(
            Session::load(&settings, &mut rng),
            Err(WorldError::GridTooLarge { .. })
        ));
        assert!(run_headless(&settings, &mut rng, 1).is_err());
    }

    #[test]
    fn quit_and_movement_keys_route() {
        let mut rng = StdRng::seed_from_u64(1);
        let mut session = Session::load(&settings(), &mut rng).expect("valid settings");
        let now = Instant::now();

        assert_eq!(
            session.handle_input(GameInput::Key(KeyCode::Char('k')), BUTTON, now),
            SessionSignal::Continue
        );
        assert_eq!(
            session.handle_input(GameInput::Quit, BUTTON, now),
            SessionSignal::Quit
        );
    }

    #[test]
    fn headless_run_counts_ticks() {
        let mut rng = StdRng::seed_from_u64(1);
        let report = run_headless(&settings(), &mut rng, 25).expect("valid settings");

        assert!(report.ticks <= 25);
        assert_eq!(report.ended, report.ticks < 25);
        if !report.ended {
            assert_eq!(report.button_label, "Playing ..");
            assert_eq!(report.snapshot.status, Some(GameStatus::Playing));
        }
    }
}
