//! Rendering layer — all terminal I/O lives here.
//!
//! Each function receives a mutable writer and an immutable view of the
//! session.  No game logic is performed; this module only translates state
//! into terminal commands.  The playfield is kept in pixel units by the core
//! and scaled onto whatever terminal size is available here.

use std::io::Write;

use crossterm::{
    cursor,
    style::{self, Color, Print},
    terminal,
    QueueableCommand,
};
use flappy_ghost::config::GameConfig;
use flappy_ghost::entities::{Bird, GameState, Obstacle};
use flappy_ghost::recorder::{RunHistory, Session};

// ── Colour palette ────────────────────────────────────────────────────────────

const C_BORDER: Color = Color::DarkBlue;
const C_HUD_SCORE: Color = Color::Yellow;
const C_HUD_LIVES: Color = Color::Red;
const C_HUD_INFO: Color = Color::Grey;
const C_BIRD: Color = Color::Yellow;
const C_PIPE: Color = Color::Green;
const C_GHOST: Color = Color::DarkGrey;
const C_HINT: Color = Color::DarkGrey;

/// How many leaderboard rows the game-over box lists.
const LEADERBOARD_ROWS: usize = 5;

// ── Pixel → cell mapping ──────────────────────────────────────────────────────

/// Maps playfield pixels onto the terminal cells inside the border.
struct Viewport {
    width: u16,
    height: u16,
    sx: f64,
    sy: f64,
}

impl Viewport {
    fn new(config: &GameConfig) -> std::io::Result<Self> {
        let (width, height) = terminal::size()?;
        // Row 0 is the HUD, rows 1 and h-2 are the border, h-1 is the hint.
        let inner_w = width.saturating_sub(2).max(1) as f64;
        let inner_h = height.saturating_sub(4).max(1) as f64;
        Ok(Viewport {
            width,
            height,
            sx: inner_w / config.playfield_width,
            sy: inner_h / config.playfield_height,
        })
    }

    fn col(&self, x: f64) -> i32 {
        1 + (x * self.sx).floor() as i32
    }

    fn row(&self, y: f64) -> i32 {
        2 + (y * self.sy).floor() as i32
    }

    fn contains(&self, col: i32, row: i32) -> bool {
        col >= 1
            && row >= 2
            && col < self.width as i32 - 1
            && row < self.height as i32 - 2
    }
}

// ── Public entry point ────────────────────────────────────────────────────────

/// Render one complete frame.
pub fn render<W: Write>(out: &mut W, session: &Session, ghosts: usize) -> std::io::Result<()> {
    let state = session.state();
    let config = session.config();
    let view = Viewport::new(config)?;

    out.queue(terminal::Clear(terminal::ClearType::All))?;

    draw_border(out, &view)?;
    draw_hud(out, &view, session)?;

    for obstacle in &state.obstacles {
        draw_pipe(out, &view, obstacle, config)?;
    }
    draw_ghosts(out, &view, session.history(), state.elapsed_ms, ghosts)?;
    draw_bird(out, &view, &state.bird, config)?;
    draw_controls_hint(out, &view)?;

    if state.is_over() {
        draw_game_over(out, &view, state, session.history())?;
    }

    // Park cursor in a harmless spot and flush
    out.queue(style::ResetColor)?;
    out.queue(cursor::MoveTo(0, view.height.saturating_sub(1)))?;
    out.flush()?;
    Ok(())
}

// ── Border ────────────────────────────────────────────────────────────────────

fn draw_border<W: Write>(out: &mut W, view: &Viewport) -> std::io::Result<()> {
    let w = view.width as usize;
    let h = view.height;

    out.queue(style::SetForegroundColor(C_BORDER))?;

    out.queue(cursor::MoveTo(0, 1))?;
    out.queue(Print(format!("┌{}┐", "─".repeat(w.saturating_sub(2)))))?;

    out.queue(cursor::MoveTo(0, h.saturating_sub(2)))?;
    out.queue(Print(format!("└{}┘", "─".repeat(w.saturating_sub(2)))))?;

    for row in 2..h.saturating_sub(2) {
        out.queue(cursor::MoveTo(0, row))?;
        out.queue(Print("│"))?;
        out.queue(cursor::MoveTo(view.width.saturating_sub(1), row))?;
        out.queue(Print("│"))?;
    }

    Ok(())
}

// ── HUD (row 0) ───────────────────────────────────────────────────────────────

fn draw_hud<W: Write>(out: &mut W, view: &Viewport, session: &Session) -> std::io::Result<()> {
    let state = session.state();

    out.queue(cursor::MoveTo(1, 0))?;
    out.queue(style::SetForegroundColor(C_HUD_SCORE))?;
    match session.history().best() {
        Some(best) => out.queue(Print(format!(
            "Score:{:>4}  Best:{:>4}",
            state.score, best.score
        )))?,
        None => out.queue(Print(format!("Score:{:>4}", state.score)))?,
    };

    let info = format!(
        "[ Attempt {}  {:>5.1}s ]",
        session.attempt(),
        state.elapsed_ms as f64 / 1000.0
    );
    let ix = (view.width / 2).saturating_sub(info.chars().count() as u16 / 2);
    out.queue(cursor::MoveTo(ix, 0))?;
    out.queue(style::SetForegroundColor(C_HUD_INFO))?;
    out.queue(Print(&info))?;

    let lives_str = format!("Lives:{}", "♥".repeat(state.lives as usize));
    let rx = view
        .width
        .saturating_sub(lives_str.chars().count() as u16 + 1);
    out.queue(cursor::MoveTo(rx, 0))?;
    out.queue(style::SetForegroundColor(C_HUD_LIVES))?;
    out.queue(Print(&lives_str))?;

    Ok(())
}

// ── Entities ──────────────────────────────────────────────────────────────────

fn draw_pipe<W: Write>(
    out: &mut W,
    view: &Viewport,
    obstacle: &Obstacle,
    config: &GameConfig,
) -> std::io::Result<()> {
    let left = view.col(obstacle.x);
    let right = view.col(obstacle.x + config.obstacle_width).max(left + 1);
    let gap_top = view.row(obstacle.gap_top());
    let gap_bottom = view.row(obstacle.gap_bottom());

    out.queue(style::SetForegroundColor(C_PIPE))?;
    for row in 2..view.height as i32 - 2 {
        if row >= gap_top && row < gap_bottom {
            continue;
        }
        for col in left..right {
            if view.contains(col, row) {
                out.queue(cursor::MoveTo(col as u16, row as u16))?;
                out.queue(Print("█"))?;
            }
        }
    }
    Ok(())
}

fn draw_bird<W: Write>(
    out: &mut W,
    view: &Viewport,
    bird: &Bird,
    config: &GameConfig,
) -> std::io::Result<()> {
    // Sprite is anchored on the bird's centre so it lines up with the hitbox
    // at any scale:   (o>
    let col = view.col(bird.x + config.bird_width / 2.0) - 1;
    let row = view.row(bird.y + config.bird_height / 2.0);
    out.queue(style::SetForegroundColor(C_BIRD))?;
    for (i, glyph) in ["(", "o", ">"].iter().enumerate() {
        let c = col + i as i32;
        if view.contains(c, row) {
            out.queue(cursor::MoveTo(c as u16, row as u16))?;
            out.queue(Print(*glyph))?;
        }
    }
    Ok(())
}

/// Overlay the best past runs at the same point in time as the live bird.
fn draw_ghosts<W: Write>(
    out: &mut W,
    view: &Viewport,
    history: &RunHistory,
    elapsed_ms: u64,
    ghosts: usize,
) -> std::io::Result<()> {
    out.queue(style::SetForegroundColor(C_GHOST))?;
    for run in history.leaderboard().into_iter().take(ghosts) {
        if let Some(sample) = run.sample_at(elapsed_ms) {
            let col = view.col(sample.x);
            let row = view.row(sample.y);
            if view.contains(col, row) {
                out.queue(cursor::MoveTo(col as u16, row as u16))?;
                out.queue(Print("◌"))?;
            }
        }
    }
    Ok(())
}

// ── Controls hint (last row) ──────────────────────────────────────────────────

fn draw_controls_hint<W: Write>(out: &mut W, view: &Viewport) -> std::io::Result<()> {
    out.queue(cursor::MoveTo(1, view.height.saturating_sub(1)))?;
    out.queue(style::SetForegroundColor(C_HINT))?;
    out.queue(Print("SPACE / ↑ / click : Flap   R : Restart   Q : Quit"))?;
    Ok(())
}

// ── Game-over overlay ─────────────────────────────────────────────────────────

fn draw_game_over<W: Write>(
    out: &mut W,
    view: &Viewport,
    state: &GameState,
    history: &RunHistory,
) -> std::io::Result<()> {
    let (banner, banner_color) = if state.lives > 0 {
        ("║   COURSE CLEAR     ║", Color::Green)
    } else {
        ("║    GAME  OVER      ║", Color::Red)
    };
    let mut lines: Vec<(String, Color)> = vec![
        ("╔════════════════════╗".to_string(), banner_color),
        (banner.to_string(), banner_color),
        ("╚════════════════════╝".to_string(), banner_color),
        (format!("Final Score: {:>4}", state.score), Color::Yellow),
        (String::new(), Color::White),
        ("Leaderboard".to_string(), Color::White),
    ];
    for (rank, run) in history.leaderboard().iter().take(LEADERBOARD_ROWS).enumerate() {
        lines.push((
            format!(
                "{}. Run #{:<3} {:>4} pts {:>5.1}s",
                rank + 1,
                run.id,
                run.score,
                run.duration_ms() as f64 / 1000.0
            ),
            Color::DarkYellow,
        ));
    }
    lines.push((String::new(), Color::White));
    lines.push(("R - Play Again  Q - Quit".to_string(), Color::White));

    let cx = view.width / 2;
    let start_row = (view.height / 2).saturating_sub(lines.len() as u16 / 2);

    for (i, (msg, color)) in lines.iter().enumerate() {
        let row = start_row + i as u16;
        let col = cx.saturating_sub(msg.chars().count() as u16 / 2);
        out.queue(cursor::MoveTo(col, row))?;
        out.queue(style::SetForegroundColor(*color))?;
        out.queue(Print(msg))?;
    }

    Ok(())
}
