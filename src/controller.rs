use std::time::Instant;

use crossterm::event::KeyCode;
use tracing::{debug, info};

use crate::config::{LABEL_PLAY, LABEL_PLAYING, LABEL_TRY_AGAIN, PALETTE};
use crate::input::{Direction, apply_key};
use crate::renderer::{Surface, paint};
use crate::scheduler::FrameScheduler;
use crate::world::WorldAdapter;

/// Lifecycle of the loop within one session.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum Phase {
    /// Not started yet; the button offers to play.
    Idle,
    /// Ticking.
    Running,
    /// Won or lost; only a reload leaves this phase.
    Ended,
}

/// Result of pressing the control button.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum ControlOutcome {
    Started,
    Ignored,
    /// The session is over and must be rebuilt from scratch.
    Reload,
}

/// Game loop controller: owns the world, the surface it paints into and the
/// frame scheduler that paces stepping.
#[derive(Debug)]
pub struct GameLoop<W, S> {
    world: W,
    surface: S,
    scheduler: FrameScheduler,
    phase: Phase,
    ticks: u64,
}

impl<W, S> GameLoop<W, S>
where
    W: WorldAdapter,
    S: Surface,
{
    /// Wraps a freshly initialized world and paints the idle board once.
    pub fn new(world: W, surface: S, fps: u32) -> Self {
        let mut game = Self {
            world,
            surface,
            scheduler: FrameScheduler::new(fps),
            phase: Phase::Idle,
            ticks: 0,
        };
        game.repaint();
        game
    }

    #[must_use]
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Label the control button shows in the current phase.
    #[must_use]
    pub fn button_label(&self) -> &'static str {
        match self.phase {
            Phase::Idle => LABEL_PLAY,
            Phase::Running => LABEL_PLAYING,
            Phase::Ended => LABEL_TRY_AGAIN,
        }
    }

    #[must_use]
    pub fn world(&self) -> &W {
        &self.world
    }

    #[must_use]
    pub fn surface(&self) -> &S {
        &self.surface
    }

    #[must_use]
    pub fn scheduler(&self) -> &FrameScheduler {
        &self.scheduler
    }

    /// Number of step-and-paint cycles run so far.
    #[must_use]
    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    /// Handles a control button press.
    pub fn click(&mut self, now: Instant) -> ControlOutcome {
        match self.phase {
            Phase::Idle => {
                self.world.start();
                self.phase = Phase::Running;
                self.scheduler.delay_then_run(now);
                self.repaint();
                info!(status = %self.world.status_text(), "game started");
                ControlOutcome::Started
            }
            Phase::Running => ControlOutcome::Ignored,
            Phase::Ended => ControlOutcome::Reload,
        }
    }

    /// Forwards a key to the world when it maps to a direction.
    pub fn key(&mut self, code: KeyCode) -> Option<Direction> {
        let direction = apply_key(&mut self.world, code)?;
        debug!(?direction, "direction change requested");
        Some(direction)
    }

    /// Timer stage: runs one tick when the armed delay has elapsed.
    pub fn poll(&mut self, now: Instant) -> bool {
        if !self.scheduler.poll_timer(now) {
            return false;
        }

        self.tick();
        true
    }

    /// Refresh stage: arms the next delay if a refresh was awaited.
    pub fn on_refresh(&mut self, now: Instant) {
        if self.scheduler.poll_refresh() {
            self.scheduler.delay_then_run(now);
        }
    }

    /// Next instant the timer stage needs attention.
    #[must_use]
    pub fn next_deadline(&self) -> Option<Instant> {
        self.scheduler.next_deadline()
    }

    fn tick(&mut self) {
        self.world.step();
        self.repaint();
        self.ticks += 1;

        match self.world.status() {
            Some(status) if status.is_terminal() => {
                self.scheduler.stop();
                self.phase = Phase::Ended;
                info!(
                    ?status,
                    points = self.world.points(),
                    ticks = self.ticks,
                    "game ended"
                );
            }
            _ => self.scheduler.run_on_next_refresh(),
        }
    }

    fn repaint(&mut self) {
        self.surface.clear();
        paint(&self.world, &mut self.surface, &PALETTE);
    }
}

#[cfg(test)]
mod tests {
    use std::time::{Duration, Instant};

    use crossterm::event::KeyCode;

    use crate::config::CELL_SIZE;
    use crate::input::Direction;
    use crate::renderer::DisplayList;
    use crate::scheduler::Stage;
    use crate::world::{GameStatus, World, WorldAdapter};

    use super::{ControlOutcome, GameLoop, Phase};

    fn game(world: World) -> GameLoop<World, DisplayList> {
        let extent = world.width() as f64 * CELL_SIZE;
        GameLoop::new(world, DisplayList::new(extent), 60)
    }

    fn advance(game: &mut GameLoop<World, DisplayList>, now: &mut Instant) -> bool {
        *now += game.scheduler().interval();
        let ticked = game.poll(*now);
        game.on_refresh(*now);
        ticked
    }

    #[test]
    fn fresh_session_is_idle_and_painted() {
        let game = game(World::with_seed(16, 0, 1).expect("valid spawn"));

        assert_eq!(game.phase(), Phase::Idle);
        assert_eq!(game.button_label(), "Play");
        assert_eq!(game.world().status(), None);
        assert_eq!(game.surface().status_text(), "Zzz");
        assert!(!game.surface().commands().is_empty());
        assert_eq!(game.next_deadline(), None);
    }

    #[test]
    fn click_starts_once_and_arms_delay() {
        let now = Instant::now();
        let mut game = game(World::with_seed(16, 0, 1).expect("valid spawn"));

        assert_eq!(game.click(now), ControlOutcome::Started);
        assert_eq!(game.phase(), Phase::Running);
        assert_eq!(game.button_label(), "Playing ..");
        assert_eq!(game.world().status(), Some(GameStatus::Playing));
        assert_eq!(game.surface().status_text(), "Playing");
        assert!(game.next_deadline().is_some());

        assert_eq!(game.click(now), ControlOutcome::Ignored);
        assert_eq!(game.ticks(), 0);
    }

    #[test]
    fn tick_steps_then_paints() {
        let mut now = Instant::now();
        let mut world = World::with_seed(16, 20, 1).expect("valid spawn");
        world.place_reward(Some(200));
        let mut game = game(world);
        game.click(now);

        assert!(!game.poll(now));
        assert!(advance(&mut game, &mut now));

        assert_eq!(game.ticks(), 1);
        assert_eq!(game.world().snake_cells()[0], 21);
        assert_eq!(game.world().snake_length(), 3);
        assert_eq!(game.surface().points_text(), "0");
        assert!(matches!(game.scheduler().stage(), Stage::Delay { .. }));
    }

    #[test]
    fn hidden_surface_pauses_instead_of_queueing() {
        let mut now = Instant::now();
        let mut world = World::with_seed(16, 20, 1).expect("valid spawn");
        world.place_reward(None);
        let mut game = game(world);
        game.click(now);

        now += Duration::from_secs(1);
        assert!(game.poll(now));
        // No refresh delivered: further polls must not step.
        assert!(!game.poll(now + Duration::from_secs(10)));
        assert_eq!(game.ticks(), 1);
        assert_eq!(game.scheduler().stage(), Stage::AwaitRefresh);

        game.on_refresh(now);
        assert!(advance(&mut game, &mut now));
        assert_eq!(game.ticks(), 2);
    }

    #[test]
    fn loss_stops_the_loop_within_the_tick() {
        let mut now = Instant::now();
        let mut world =
            World::with_body(4, vec![5, 6, 10, 9, 8, 4, 0], Direction::Left, 0).expect("body");
        world.place_reward(None);
        let mut game = game(world);
        game.click(now);

        assert!(advance(&mut game, &mut now));

        assert_eq!(game.world().status(), Some(GameStatus::Lost));
        assert_eq!(game.phase(), Phase::Ended);
        assert_eq!(game.button_label(), "Try Again");
        assert_eq!(game.surface().status_text(), "You have Lost");
        assert_eq!(game.next_deadline(), None);

        for _ in 0..10 {
            assert!(!advance(&mut game, &mut now));
        }
        assert_eq!(game.ticks(), 1);
    }

    #[test]
    fn click_after_end_requests_reload() {
        let mut now = Instant::now();
        let mut world = World::with_body(2, vec![1, 0, 2], Direction::Down, 0).expect("body");
        world.place_reward(Some(3));
        let mut game = game(world);
        game.click(now);
        advance(&mut game, &mut now);

        assert_eq!(game.world().status(), Some(GameStatus::Won));
        assert_eq!(game.click(now), ControlOutcome::Reload);
        assert_eq!(game.phase(), Phase::Ended);
    }

    #[test]
    fn unmapped_key_changes_nothing() {
        let mut now = Instant::now();
        let mut world = World::with_seed(16, 20, 1).expect("valid spawn");
        world.place_reward(None);
        let mut game = game(world);
        let before = game.world().snapshot();

        assert_eq!(game.key(KeyCode::Char('x')), None);
        assert_eq!(game.world().snapshot(), before);

        game.click(now);
        advance(&mut game, &mut now);
        assert_eq!(game.world().snake_cells()[0], 21);
    }

    #[test]
    fn mapped_key_takes_effect_on_next_step() {
        let mut now = Instant::now();
        let mut world = World::with_seed(16, 20, 1).expect("valid spawn");
        world.place_reward(None);
        let mut game = game(world);
        game.click(now);

        assert_eq!(game.key(KeyCode::Char('j')), Some(Direction::Down));
        assert_eq!(game.world().snake_cells()[0], 20);

        advance(&mut game, &mut now);
        assert_eq!(game.world().snake_cells()[0], 36);
    }
}
