//! Terminal front-end
//!
//! Implements the input source and render sink on top of crossterm. The
//! playfield is scaled onto the character grid below a one-line HUD.

use std::io::{self, Write};
use std::time::Duration;

use crossterm::{
    ExecutableCommand, QueueableCommand, cursor,
    event::{
        self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind,
        KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
    },
    style::{self, Color, Print},
    terminal,
};
use glam::Vec2;

use wave_siege::consts::{PLAYFIELD_HEIGHT, PLAYFIELD_WIDTH};
use wave_siege::renderer::{self, Shape, colors};
use wave_siege::sim::{GameState, SessionPhase, TickInput, WavePhase};
use wave_siege::{FrameStats, InputSample, InputSource, RenderSink, Settings};

/// Rows reserved above the playfield for the HUD
const HUD_ROWS: u16 = 1;
/// Shapes fainter than this are not drawn
const MIN_ALPHA: f32 = 0.12;

// ── Terminal lifetime ─────────────────────────────────────────────────────────

/// Raw mode + alternate screen + mouse capture, undone on drop
pub struct TerminalGuard;

impl TerminalGuard {
    pub fn enter() -> io::Result<Self> {
        terminal::enable_raw_mode()?;
        let mut out = io::stdout();
        out.execute(terminal::EnterAlternateScreen)?;
        out.execute(EnableMouseCapture)?;
        out.execute(cursor::Hide)?;
        Ok(Self)
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let mut out = io::stdout();
        let _ = out.execute(style::ResetColor);
        let _ = out.execute(cursor::Show);
        let _ = out.execute(DisableMouseCapture);
        let _ = out.execute(terminal::LeaveAlternateScreen);
        let _ = terminal::disable_raw_mode();
    }
}

// ── Coordinate mapping ────────────────────────────────────────────────────────

/// Mapping between playfield units and terminal cells
#[derive(Debug, Clone, Copy)]
struct Viewport {
    cols: u16,
    rows: u16,
}

impl Viewport {
    fn from_terminal(cols: u16, rows: u16) -> Self {
        Self {
            cols: cols.max(1),
            rows: rows.saturating_sub(HUD_ROWS).max(1),
        }
    }

    /// Playfield units per cell
    fn scale(&self) -> Vec2 {
        Vec2::new(
            PLAYFIELD_WIDTH / self.cols as f32,
            PLAYFIELD_HEIGHT / self.rows as f32,
        )
    }

    /// Cell containing a playfield point (may lie off-grid)
    fn to_cell(&self, p: Vec2) -> (i32, i32) {
        let c = p / self.scale();
        (c.x.floor() as i32, c.y.floor() as i32)
    }

    /// Centre of a terminal cell in playfield units
    fn to_playfield(&self, column: u16, row: u16) -> Vec2 {
        let row = row.saturating_sub(HUD_ROWS);
        (Vec2::new(column as f32, row as f32) + 0.5) * self.scale()
    }
}

// ── Input ─────────────────────────────────────────────────────────────────────

/// Keyboard and mouse input from crossterm events
#[derive(Debug, Default)]
pub struct TerminalInput {
    pointer: Vec2,
}

impl TerminalInput {
    /// The one action a click or Space means in each phase
    fn press(input: &mut TickInput, phase: SessionPhase) {
        match phase {
            SessionPhase::Start => input.confirm = true,
            SessionPhase::Playing => input.fire = true,
            SessionPhase::GameOver => input.restart = true,
        }
    }
}

impl InputSource for TerminalInput {
    fn poll(&mut self, phase: SessionPhase) -> io::Result<InputSample> {
        let mut sample = InputSample::default();
        let (cols, rows) = terminal::size()?;
        let viewport = Viewport::from_terminal(cols, rows);

        while event::poll(Duration::ZERO)? {
            match event::read()? {
                Event::Key(KeyEvent {
                    code,
                    modifiers,
                    kind: KeyEventKind::Press | KeyEventKind::Repeat,
                    ..
                }) => match code {
                    KeyCode::Esc | KeyCode::Char('q') | KeyCode::Char('Q') => sample.quit = true,
                    KeyCode::Char('c') if modifiers.contains(KeyModifiers::CONTROL) => {
                        sample.quit = true
                    }
                    KeyCode::Char(' ') | KeyCode::Enter => Self::press(&mut sample.input, phase),
                    KeyCode::Char('r') | KeyCode::Char('R') => sample.input.restart = true,
                    _ => {}
                },
                Event::Mouse(MouseEvent {
                    kind, column, row, ..
                }) => {
                    self.pointer = viewport.to_playfield(column, row);
                    if kind == MouseEventKind::Down(MouseButton::Left) {
                        Self::press(&mut sample.input, phase);
                    }
                }
                _ => {}
            }
        }

        sample.input.pointer = self.pointer;
        Ok(sample)
    }
}

// ── Rendering ─────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq)]
struct Cell {
    glyph: char,
    fg: [f32; 3],
    bg: [f32; 3],
}

fn rgb(c: renderer::Color) -> [f32; 3] {
    [c[0], c[1], c[2]]
}

/// Alpha-composite `src` over `dst`
fn blend(dst: [f32; 3], src: renderer::Color) -> [f32; 3] {
    let a = src[3].clamp(0.0, 1.0);
    [
        src[0] * a + dst[0] * (1.0 - a),
        src[1] * a + dst[1] * (1.0 - a),
        src[2] * a + dst[2] * (1.0 - a),
    ]
}

fn term_color(c: [f32; 3]) -> Color {
    let q = |v: f32| (v.clamp(0.0, 1.0) * 255.0).round() as u8;
    Color::Rgb {
        r: q(c[0]),
        g: q(c[1]),
        b: q(c[2]),
    }
}

/// Character grid the scene is rasterized into
struct Canvas {
    viewport: Viewport,
    cells: Vec<Cell>,
}

impl Canvas {
    fn new(viewport: Viewport) -> Self {
        let blank = Cell {
            glyph: ' ',
            fg: rgb(colors::PLAYER),
            bg: rgb(colors::BACKGROUND),
        };
        Self {
            viewport,
            cells: vec![blank; viewport.cols as usize * viewport.rows as usize],
        }
    }

    fn cell_mut(&mut self, col: i32, row: i32) -> Option<&mut Cell> {
        if col < 0
            || row < 0
            || col >= self.viewport.cols as i32
            || row >= self.viewport.rows as i32
        {
            return None;
        }
        let idx = row as usize * self.viewport.cols as usize + col as usize;
        self.cells.get_mut(idx)
    }

    fn fill(&mut self, col: i32, row: i32, color: renderer::Color) {
        if let Some(cell) = self.cell_mut(col, row) {
            cell.bg = blend(cell.bg, color);
            cell.glyph = ' ';
        }
    }

    fn glyph(&mut self, col: i32, row: i32, glyph: char, color: renderer::Color) {
        if let Some(cell) = self.cell_mut(col, row) {
            cell.fg = blend(cell.bg, color);
            cell.glyph = glyph;
        }
    }

    fn text(&mut self, col: i32, row: i32, text: &str, color: renderer::Color) {
        for (i, ch) in text.chars().enumerate() {
            self.glyph(col + i as i32, row, ch, color);
        }
    }

    /// Text centred horizontally on `row`
    fn centered(&mut self, row: i32, text: &str, color: renderer::Color) {
        let col = (self.viewport.cols as i32 - text.chars().count() as i32) / 2;
        self.text(col.max(0), row, text, color);
    }

    fn draw(&mut self, shape: &Shape) {
        if shape.color()[3] < MIN_ALPHA {
            return;
        }
        let scale = self.viewport.scale();
        match *shape {
            Shape::Circle {
                center,
                radius,
                color,
            } => {
                if radius * 2.0 < scale.x.min(scale.y) {
                    let (c, r) = self.viewport.to_cell(center);
                    self.glyph(c, r, '•', color);
                    return;
                }
                let (c0, r0) = self.viewport.to_cell(center - radius);
                let (c1, r1) = self.viewport.to_cell(center + radius);
                let mut any = false;
                for r in r0..=r1 {
                    for c in c0..=c1 {
                        let mid = (Vec2::new(c as f32, r as f32) + 0.5) * scale;
                        if mid.distance(center) <= radius {
                            self.fill(c, r, color);
                            any = true;
                        }
                    }
                }
                if !any {
                    let (c, r) = self.viewport.to_cell(center);
                    self.glyph(c, r, '●', color);
                }
            }
            Shape::Ring { center, color, .. } => {
                let (c, r) = self.viewport.to_cell(center);
                self.glyph(c, r, 'o', color);
            }
            Shape::Line {
                from, to, color, ..
            } => {
                let d = (to - from) / scale;
                let glyph = if d.x.abs() > 2.0 * d.y.abs() {
                    '─'
                } else if d.y.abs() > 2.0 * d.x.abs() {
                    '│'
                } else if d.x * d.y > 0.0 {
                    '╲'
                } else {
                    '╱'
                };
                let steps = d.x.abs().max(d.y.abs()).ceil().max(1.0) as u32;
                for i in 0..=steps {
                    let p = from.lerp(to, i as f32 / steps as f32);
                    let (c, r) = self.viewport.to_cell(p);
                    self.glyph(c, r, glyph, color);
                }
            }
            Shape::Rect { min, max, color } => {
                let (c0, r0) = self.viewport.to_cell(min);
                let (c1, r1) = self.viewport.to_cell(max);
                for r in r0..=r1 {
                    for c in c0..=c1 {
                        self.fill(c, r, color);
                    }
                }
            }
        }
    }
}

/// Crossterm render sink
pub struct TerminalRenderer<W: Write> {
    out: W,
    settings: Settings,
}

impl<W: Write> TerminalRenderer<W> {
    pub fn new(out: W, settings: Settings) -> Self {
        Self { out, settings }
    }

    fn hud_line(&self, state: &GameState, stats: &FrameStats) -> String {
        let mut line = match state.phase {
            SessionPhase::Start => "WAVE SIEGE".to_string(),
            SessionPhase::GameOver => format!("GAME OVER  Score: {}", state.score),
            SessionPhase::Playing => {
                let player = &state.player;
                let wave = &state.wave;
                let mut line = format!(
                    "Health: {}/{}  Score: {}  Wave: {}",
                    player.health, player.max_health, state.score, wave.wave
                );
                match wave.phase {
                    WavePhase::Spawning => {
                        line.push_str(&format!("  Enemies: {}", state.enemies_remaining()))
                    }
                    WavePhase::Break => line.push_str(&format!(
                        "  Next wave in: {}  + Health restored!",
                        wave.break_seconds_remaining()
                    )),
                }
                line
            }
        };
        if self.settings.show_fps {
            line.push_str(&format!("  FPS: {}", stats.fps));
        }
        line
    }

    fn overlay(canvas: &mut Canvas, state: &GameState) {
        let mid = canvas.viewport.rows as i32 / 2;
        match state.phase {
            SessionPhase::Start => {
                canvas.centered(mid - 4, "W A V E   S I E G E", colors::PLAYER);
                canvas.centered(mid - 2, "Survive the waves of enemies!", colors::GUN);
                canvas.centered(mid, "[ Click or SPACE to start ]", colors::PLAYER);
                canvas.centered(mid + 2, "Mouse - Aim", colors::PLAYER);
                canvas.centered(mid + 3, "Click / SPACE - Shoot", colors::PLAYER);
                canvas.centered(mid + 4, "ESC - Quit", colors::PLAYER);
            }
            SessionPhase::GameOver => {
                canvas.centered(mid - 3, "G A M E   O V E R", colors::ENEMY);
                canvas.centered(mid - 1, &format!("Final Score: {}", state.score), colors::PLAYER);
                canvas.centered(
                    mid,
                    &format!("Waves Survived: {}", state.wave.waves_survived()),
                    colors::PLAYER,
                );
                canvas.centered(mid + 2, "[ Click or R to restart ]", colors::PLAYER);
            }
            SessionPhase::Playing => {}
        }
    }

    fn present(&mut self, canvas: &Canvas, hud: &str) -> io::Result<()> {
        let out = &mut self.out;
        out.queue(cursor::MoveTo(0, 0))?;
        out.queue(style::SetBackgroundColor(Color::Black))?;
        out.queue(style::SetForegroundColor(Color::White))?;
        let width = canvas.viewport.cols as usize;
        out.queue(Print(format!("{:<width$.width$}", hud)))?;

        let mut last: Option<([f32; 3], [f32; 3])> = None;
        for (row, line) in canvas.cells.chunks(width).enumerate() {
            out.queue(cursor::MoveTo(0, row as u16 + HUD_ROWS))?;
            for cell in line {
                let colors = (cell.fg, cell.bg);
                if last != Some(colors) {
                    out.queue(style::SetForegroundColor(term_color(cell.fg)))?;
                    out.queue(style::SetBackgroundColor(term_color(cell.bg)))?;
                    last = Some(colors);
                }
                out.queue(Print(cell.glyph))?;
            }
        }
        out.queue(style::ResetColor)?;
        out.flush()
    }
}

impl<W: Write> RenderSink for TerminalRenderer<W> {
    fn render(&mut self, state: &GameState, stats: &FrameStats) -> io::Result<()> {
        let (cols, rows) = terminal::size()?;
        let mut canvas = Canvas::new(Viewport::from_terminal(cols, rows));

        for shape in renderer::scene(state, &self.settings) {
            canvas.draw(&shape);
        }
        Self::overlay(&mut canvas, state);

        let hud = self.hud_line(state, stats);
        self.present(&canvas, &hud)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_viewport_round_trip_lands_in_same_cell() {
        let viewport = Viewport::from_terminal(100, 36);
        let p = viewport.to_playfield(42, 10);
        assert_eq!(viewport.to_cell(p), (42, 10 - HUD_ROWS as i32));
    }

    #[test]
    fn test_click_maps_to_phase_action() {
        let mut input = TickInput::default();
        TerminalInput::press(&mut input, SessionPhase::Start);
        assert!(input.confirm && !input.fire);

        let mut input = TickInput::default();
        TerminalInput::press(&mut input, SessionPhase::Playing);
        assert!(input.fire && !input.restart);

        let mut input = TickInput::default();
        TerminalInput::press(&mut input, SessionPhase::GameOver);
        assert!(input.restart && !input.confirm);
    }

    #[test]
    fn test_canvas_draws_enemy_in_bounds() {
        let mut canvas = Canvas::new(Viewport::from_terminal(80, 25));
        canvas.draw(&Shape::Circle {
            center: Vec2::new(500.0, 350.0),
            radius: 40.0,
            color: colors::ENEMY,
        });
        // Off-grid shapes are clipped, not a panic
        canvas.draw(&Shape::Rect {
            min: Vec2::new(-100.0, -100.0),
            max: Vec2::new(-10.0, -10.0),
            color: colors::ENEMY,
        });
        let painted = canvas
            .cells
            .iter()
            .filter(|c| c.bg != rgb(colors::BACKGROUND))
            .count();
        assert!(painted > 0);
    }

    #[test]
    fn test_blend_respects_alpha() {
        let mixed = blend([0.0, 0.0, 0.0], [1.0, 1.0, 1.0, 0.5]);
        assert_eq!(mixed, [0.5, 0.5, 0.5]);
    }
}
