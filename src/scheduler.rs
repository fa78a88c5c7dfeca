use std::time::{Duration, Instant};

/// What the scheduler is currently waiting for.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum Stage {
    /// Nothing armed; no tick will fire.
    Idle,
    /// Timer stage: the next tick fires once `due` has passed.
    Delay { due: Instant },
    /// Refresh stage: waiting for the next display refresh.
    AwaitRefresh,
}

/// Two-stage frame pacing: a timer delay before each tick, then a
/// refresh-aligned callback that arms the following delay.
///
/// Refreshes only arrive while the surface is visible, so a hidden surface
/// parks the scheduler in [`Stage::AwaitRefresh`] instead of queueing ticks.
#[derive(Debug, Clone)]
pub struct FrameScheduler {
    interval: Duration,
    stage: Stage,
}

impl FrameScheduler {
    /// Creates an idle scheduler targeting `fps` ticks per second.
    #[must_use]
    pub fn new(fps: u32) -> Self {
        Self {
            interval: Duration::from_secs_f64(1.0 / f64::from(fps.max(1))),
            stage: Stage::Idle,
        }
    }

    /// Nominal delay between ticks.
    #[must_use]
    pub fn interval(&self) -> Duration {
        self.interval
    }

    #[must_use]
    pub fn stage(&self) -> Stage {
        self.stage
    }

    /// Arms the timer stage: a tick becomes due one interval after `now`.
    pub fn delay_then_run(&mut self, now: Instant) {
        self.stage = Stage::Delay {
            due: now + self.interval,
        };
    }

    /// Arms the refresh stage.
    pub fn run_on_next_refresh(&mut self) {
        self.stage = Stage::AwaitRefresh;
    }

    /// Disarms both stages.
    pub fn stop(&mut self) {
        self.stage = Stage::Idle;
    }

    /// Returns true exactly once when an armed delay has elapsed.
    ///
    /// The scheduler goes idle afterwards; the caller re-arms it.
    pub fn poll_timer(&mut self, now: Instant) -> bool {
        match self.stage {
            Stage::Delay { due } if now >= due => {
                self.stage = Stage::Idle;
                true
            }
            _ => false,
        }
    }

    /// Delivers a display refresh. Returns true when a refresh was awaited.
    pub fn poll_refresh(&mut self) -> bool {
        if self.stage != Stage::AwaitRefresh {
            return false;
        }

        self.stage = Stage::Idle;
        true
    }

    /// Instant at which the timer stage fires, if armed.
    #[must_use]
    pub fn next_deadline(&self) -> Option<Instant> {
        match self.stage {
            Stage::Delay { due } => Some(due),
            _ => None,
        }
    }
}
