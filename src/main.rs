mod display;

use std::fs::{self, File};
use std::io::{stdout, BufWriter, Write};
use std::path::PathBuf;
use std::thread;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use crossbeam_channel::{unbounded, Sender};
use crossterm::{
    cursor,
    event::{
        self, DisableMouseCapture, EnableMouseCapture, Event as TermEvent, KeyCode, KeyEvent,
        KeyEventKind, KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
    },
    terminal, ExecutableCommand,
};
use log::{error, info, warn};
use rand::rngs::StdRng;
use rand::SeedableRng;

use flappy_ghost::actions::{ActionStream, Command, Event};
use flappy_ghost::config::GameConfig;
use flappy_ghost::recorder::Session;
use flappy_ghost::schedule::parse_schedule;

/// How long the game-over screen waits for a key before re-checking.
const IDLE_POLL: Duration = Duration::from_millis(250);

#[derive(Parser, Debug)]
#[command(name = "flappy_ghost", about = "Flap through a scheduled course and race your own ghosts")]
struct Args {
    /// Pipe schedule (CSV: gapCenter,gapHeight,appearSecs after a header line).
    #[arg(short, long, default_value = "data/schedule.csv")]
    schedule: PathBuf,

    /// JSON file overriding any of the game constants.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Seed for bounce randomness; omit for a random seed.
    #[arg(long)]
    seed: Option<u64>,

    /// Where log output goes; the terminal itself is taken by the game.
    #[arg(long)]
    log_file: Option<PathBuf>,

    /// How many of the best past runs to show as ghosts.
    #[arg(short, long, default_value_t = 3)]
    ghosts: usize,
}

// ── Logging ───────────────────────────────────────────────────────────────────

fn init_logging(path: Option<PathBuf>) -> Result<()> {
    let path = path.unwrap_or_else(|| std::env::temp_dir().join("flappy_ghost.log"));
    let file = File::create(&path)
        .with_context(|| format!("cannot open log file {}", path.display()))?;
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .target(env_logger::Target::Pipe(Box::new(file)))
        .init();
    Ok(())
}

// ── Input thread ──────────────────────────────────────────────────────────────

fn command_for(event: &TermEvent) -> Option<Command> {
    match event {
        TermEvent::Key(KeyEvent {
            code,
            kind: KeyEventKind::Press,
            modifiers,
            ..
        }) => match code {
            KeyCode::Char(' ') | KeyCode::Up | KeyCode::Char('w') | KeyCode::Char('W') => {
                Some(Command::Flap)
            }
            KeyCode::Char('r') | KeyCode::Char('R') => Some(Command::Restart),
            KeyCode::Char('c') if modifiers.contains(KeyModifiers::CONTROL) => {
                Some(Command::Quit)
            }
            KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => Some(Command::Quit),
            _ => None,
        },
        TermEvent::Mouse(MouseEvent {
            kind: MouseEventKind::Down(MouseButton::Left),
            ..
        }) => Some(Command::Flap),
        _ => None,
    }
}

/// Dedicate a thread exclusively to blocking event reads, translating them
/// to commands so the game loop never has to block on I/O.
fn spawn_input_thread(tx: Sender<Command>) {
    thread::spawn(move || loop {
        match event::read() {
            Ok(ev) => {
                if let Some(cmd) = command_for(&ev) {
                    if tx.send(cmd).is_err() {
                        break; // receiver dropped → program exiting
                    }
                }
            }
            Err(e) => {
                warn!("Input thread stopped: {e}");
                break;
            }
        }
    });
}

// ── Game loop ─────────────────────────────────────────────────────────────────

/// Fold every event from the merged stream into the session until the player
/// quits.  While an attempt is over only commands are awaited.
fn game_loop<W: Write>(
    out: &mut W,
    session: &mut Session,
    stream: &mut ActionStream,
    rng: &mut StdRng,
    ghosts: usize,
) -> std::io::Result<()> {
    display::render(out, session, ghosts)?;

    loop {
        let event = if session.state().is_over() {
            match stream.next_command(IDLE_POLL) {
                Some(event) => event,
                None => continue,
            }
        } else {
            stream.next()
        };

        match event {
            Event::Quit => break,
            Event::Restart => {
                if stream.restart() == Some(Event::Quit) {
                    break;
                }
                session.restart();
            }
            Event::Act(action) => {
                if let Some(run) = session.apply(action, rng) {
                    info!("Attempt finished: run #{} scored {}", run.id, run.score);
                }
            }
        }

        display::render(out, session, ghosts)?;
    }

    info!("Leaving after {} completed runs", session.history().len());
    Ok(())
}

// ── Entry point ───────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.log_file.clone())?;

    let config = match &args.config {
        Some(path) => GameConfig::load(path)?,
        None => GameConfig::default(),
    };
    let text = fs::read_to_string(&args.schedule)
        .with_context(|| format!("cannot read schedule {}", args.schedule.display()))?;
    let schedule = parse_schedule(&text, &config)
        .with_context(|| format!("invalid schedule {}", args.schedule.display()))?;

    let mut rng = match args.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    let mut session = Session::new(schedule, config);

    let raw_out = stdout();
    let mut out = BufWriter::new(raw_out);

    terminal::enable_raw_mode()?;
    out.execute(terminal::EnterAlternateScreen)?;
    out.execute(EnableMouseCapture)?;
    out.execute(cursor::Hide)?;

    let (tx, rx) = unbounded::<Command>();
    spawn_input_thread(tx);
    let mut stream = ActionStream::new(rx, session.config().tick_interval());

    info!("Starting attempt 1");
    let result = game_loop(&mut out, &mut session, &mut stream, &mut rng, args.ghosts);
    if let Err(e) = &result {
        error!("Game loop failed: {e}");
    }

    // Always restore the terminal
    let _ = out.execute(cursor::Show);
    let _ = out.execute(DisableMouseCapture);
    let _ = out.execute(terminal::LeaveAlternateScreen);
    let _ = terminal::disable_raw_mode();

    result?;
    Ok(())
}
