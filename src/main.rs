use std::path::PathBuf;
use std::time::{Duration, Instant};

use clap::Parser;
use clap::builder::RangedU64ValueParser;
use crossterm::event;
use rand::Rng;
use rand::SeedableRng;
use rand::rngs::StdRng;
use rusty_snake::config::{DEFAULT_FPS, DEFAULT_WORLD_WIDTH, MAX_WORLD_WIDTH, Settings};
use rusty_snake::error::AppError;
use rusty_snake::input::translate_event;
use rusty_snake::logging::{self, LogTarget};
use rusty_snake::session::{self, Session, SessionSignal};
use rusty_snake::terminal_runtime::{self, AppTerminal, TerminalSession};
use rusty_snake::ui::{self, FrameAreas};
use tracing::{error, info};

/// Upper bound on how long the loop blocks waiting for input.
const IDLE_POLL: Duration = Duration::from_millis(100);

#[derive(Debug, Parser)]
#[command(version, about)]
struct Cli {
    /// Grid side length in cells.
    #[arg(
        long,
        default_value_t = DEFAULT_WORLD_WIDTH,
        value_parser = RangedU64ValueParser::<usize>::new().range(1..=MAX_WORLD_WIDTH as u64)
    )]
    width: usize,
    /// Cell index the snake head spawns on. Random when omitted.
    #[arg(long)]
    spawn: Option<usize>,
    /// Seed for reward placement.
    #[arg(long)]
    seed: Option<u64>,
    /// Simulation steps per second.
    #[arg(long, default_value_t = DEFAULT_FPS, value_parser = clap::value_parser!(u32).range(1..))]
    fps: u32,
    /// Disable mouse capture; the button then reacts to Enter/Space only.
    #[arg(long = "no-mouse")]
    no_mouse: bool,
    /// Run TICKS ticks without a terminal and print the final state as JSON.
    #[arg(long, value_name = "TICKS")]
    headless: Option<u64>,
    /// Append logs to PATH, or to the default log file when PATH is omitted.
    #[arg(long, value_name = "PATH", num_args = 0..=1)]
    log: Option<Option<PathBuf>>,
}

impl Cli {
    fn settings(&self) -> Settings {
        Settings {
            width: self.width,
            fps: self.fps,
            spawn_index: self.spawn,
            seed: self.seed,
            mouse: !self.no_mouse,
        }
    }

    fn log_target(&self) -> LogTarget {
        match &self.log {
            Some(Some(path)) => LogTarget::File(path.clone()),
            Some(None) => LogTarget::File(logging::default_log_path()),
            None if self.headless.is_some() => LogTarget::Stderr,
            None => LogTarget::Off,
        }
    }
}

fn main() -> Result<(), AppError> {
    let cli = Cli::parse();
    logging::init(&cli.log_target())?;

    let result = launch(&cli);
    if let Err(error) = &result {
        error!(%error, "startup aborted");
    }
    result
}

fn launch(cli: &Cli) -> Result<(), AppError> {
    let settings = cli.settings();
    let mut rng = StdRng::from_entropy();

    if let Some(ticks) = cli.headless {
        let report = session::run_headless(&settings, &mut rng, ticks)?;
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    let (cols, rows) =
        ui::required_size(settings.width).ok_or(AppError::WidthTooLarge(settings.width))?;
    terminal_runtime::ensure_fits(cols, rows)?;
    let session = Session::load(&settings, &mut rng)?;

    terminal_runtime::install_panic_hook();
    let mut terminal = TerminalSession::enter(settings.mouse)?;
    run(terminal.terminal_mut(), session, &settings, &mut rng)
}

fn run<R: Rng>(
    terminal: &mut AppTerminal,
    mut session: Session,
    settings: &Settings,
    rng: &mut R,
) -> Result<(), AppError> {
    let mut areas = FrameAreas::default();

    loop {
        session.run_due_tick(Instant::now());

        if session.is_visible() {
            terminal.draw(|frame| areas = ui::render(frame, &session))?;
        }
        session.frame_presented(Instant::now());

        if !event::poll(poll_timeout(&session))? {
            continue;
        }
        let Some(input) = translate_event(&event::read()?) else {
            continue;
        };

        match session.handle_input(input, areas.button, Instant::now()) {
            SessionSignal::Continue => {}
            SessionSignal::Reload => {
                session = Session::load(settings, rng)?;
                terminal.clear()?;
            }
            SessionSignal::Quit => break,
        }
    }

    info!("quit");
    Ok(())
}

fn poll_timeout(session: &Session) -> Duration {
    session
        .game()
        .next_deadline()
        .map_or(IDLE_POLL, |due| {
            due.saturating_duration_since(Instant::now()).min(IDLE_POLL)
        })
}
