/// Presentation layer: double-buffered, diff-based terminal renderer.
///
/// How it works:
///   1. Build the next frame into `front` buffer (array of Glyph)
///   2. Compare each glyph with `back` buffer (previous frame)
///   3. Only emit terminal commands for glyphs that changed
///   4. All commands are batched with `queue!`, flushed once at the end
///   5. Swap front/back
///
/// Because only changed glyphs are written, every change in score, time,
/// pause state or mole position reaches the screen on the frame it
/// happens, and nothing else is redrawn.
///
/// The renderer also owns the grid layout, so it answers "which cell is at
/// this terminal position?" for mouse clicks.

use std::io::{self, BufWriter, Write};
use std::time::Instant;

use crossterm::{
    cursor::{self, MoveTo},
    event::{DisableMouseCapture, EnableMouseCapture},
    execute, queue,
    style::{Color, Print, ResetColor, SetBackgroundColor, SetForegroundColor},
    terminal::{self, Clear, ClearType},
};

use crate::domain::cell::{self, Cell, GRID_SIZE};
use crate::domain::difficulty::Difficulty;
use crate::domain::timer::{TimerState, SESSION_SECS};
use crate::sim::world::{Arcade, Phase};
use super::view::ViewState;

// ── Glyph: the unit of the back-buffer ──

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
struct Glyph {
    ch: char,
    fg: Color,
    bg: Color,
}

impl Glyph {
    /// Same RGB for Clear and every glyph background, so there are no
    /// visible seams between rows.
    const BASE_BG: Color = Color::Rgb { r: 24, g: 32, b: 20 };

    const BLANK: Glyph = Glyph { ch: ' ', fg: Color::White, bg: Glyph::BASE_BG };

    /// Sentinel used to invalidate the back buffer.
    const INVALID: Glyph = Glyph { ch: '?', fg: Color::Magenta, bg: Color::Magenta };

    fn new(ch: char, fg: Color, bg: Color) -> Self {
        let bg = match bg {
            Color::Reset => Self::BASE_BG,
            other => other,
        };
        Glyph { ch, fg, bg }
    }
}

// ── FrameBuffer: a 2D grid of Glyphs ──

#[derive(Debug)]
struct FrameBuffer {
    width: usize,
    height: usize,
    cells: Vec<Glyph>,
}

impl FrameBuffer {
    fn new(w: usize, h: usize) -> Self {
        FrameBuffer {
            width: w,
            height: h,
            cells: vec![Glyph::BLANK; w * h],
        }
    }

    fn resize(&mut self, w: usize, h: usize) {
        if self.width != w || self.height != h {
            self.width = w;
            self.height = h;
            self.cells = vec![Glyph::BLANK; w * h];
        }
    }

    fn clear(&mut self) {
        self.cells.fill(Glyph::BLANK);
    }

    fn set(&mut self, x: usize, y: usize, g: Glyph) {
        if x < self.width && y < self.height {
            self.cells[y * self.width + x] = g;
        }
    }

    fn get(&self, x: usize, y: usize) -> Glyph {
        if x < self.width && y < self.height {
            self.cells[y * self.width + x]
        } else {
            Glyph::BLANK
        }
    }

    /// Write a string at (x, y). Each char occupies 1 column.
    fn put_str(&mut self, x: usize, y: usize, s: &str, fg: Color, bg: Color) {
        for (i, ch) in s.chars().enumerate() {
            if x + i >= self.width { break; }
            self.set(x + i, y, Glyph::new(ch, fg, bg));
        }
    }

    fn fill_row(&mut self, y: usize, bg: Color) {
        for x in 0..self.width {
            self.set(x, y, Glyph::new(' ', Color::White, bg));
        }
    }

    fn fill_rect(&mut self, x: usize, y: usize, w: usize, h: usize, bg: Color) {
        for yy in y..y + h {
            for xx in x..x + w {
                self.set(xx, yy, Glyph::new(' ', Color::White, bg));
            }
        }
    }
}

// ── Layout ──

/// Terminal columns / rows of one cell box, borders included.
const CELL_W: usize = 14;
const CELL_H: usize = 6;
/// Columns between neighbouring boxes.
const GAP_X: usize = 2;

const HUD_ROW: usize = 0;
const GRID_ROW: usize = 2;

/// Where the 3x3 grid sits on screen.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct GridLayout {
    pub x: usize,
    pub y: usize,
}

impl GridLayout {
    pub const WIDTH: usize = GRID_SIZE * CELL_W + (GRID_SIZE - 1) * GAP_X;
    pub const HEIGHT: usize = GRID_SIZE * CELL_H;

    /// Centered horizontally, fixed below the HUD.
    pub fn for_terminal(term_w: usize) -> Self {
        GridLayout {
            x: term_w.saturating_sub(Self::WIDTH) / 2,
            y: GRID_ROW,
        }
    }

    /// Top-left corner of a cell's box.
    pub fn cell_origin(&self, c: Cell) -> (usize, usize) {
        (
            self.x + c.col() * (CELL_W + GAP_X),
            self.y + c.row() * CELL_H,
        )
    }

    /// Hit-test a terminal position. Gaps between boxes are not cells.
    pub fn cell_at(&self, col: u16, row: u16) -> Option<Cell> {
        let (col, row) = (col as usize, row as usize);
        if col < self.x || row < self.y {
            return None;
        }
        let dx = col - self.x;
        let dy = row - self.y;
        let grid_col = dx / (CELL_W + GAP_X);
        if dx % (CELL_W + GAP_X) >= CELL_W {
            return None;
        }
        Cell::new(dy / CELL_H, grid_col)
    }

    /// First row below the grid.
    pub fn bottom(&self) -> usize {
        self.y + Self::HEIGHT
    }
}

// ── Sprites (inner area: CELL_W-2 x CELL_H-2) ──

const HOLE: [&str; 4] = [
    "            ",
    "            ",
    "            ",
    "  (______)  ",
];

const MOLE: [&str; 4] = [
    "   .----.   ",
    "  / o  o \\  ",
    "  |  \\/  |  ",
    " ~~~~~~~~~~ ",
];

const BONK: [&str; 4] = [
    "  \\  |  /   ",
    " -- BONK! --",
    "  /  |  \\   ",
    "  (______)  ",
];

// ── Palette ──

const HUD_BG: Color = Color::Rgb { r: 40, g: 60, b: 30 };
const SOIL: Color = Color::Rgb { r: 90, g: 60, b: 35 };
const SOIL_DARK: Color = Color::Rgb { r: 55, g: 38, b: 22 };
const MOLE_FG: Color = Color::Rgb { r: 230, g: 190, b: 140 };
const BORDER: Color = Color::Rgb { r: 120, g: 150, b: 90 };
const CURSOR: Color = Color::Rgb { r: 255, g: 220, b: 60 };
const HIT: Color = Color::Rgb { r: 120, g: 255, b: 120 };
const MSG_BG: Color = Color::Rgb { r: 200, g: 180, b: 50 };
const HI: Color = Color::Rgb { r: 80, g: 255, b: 80 };

/// How the composer should draw one cell this frame.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
enum CellLook {
    Empty,
    Mole,
    Bonk,
}

// ── Renderer ──

pub struct Renderer {
    writer: BufWriter<io::Stdout>,
    front: FrameBuffer,
    back: FrameBuffer,
    term_w: usize,
    term_h: usize,
    last_phase: Option<Phase>,
    layout: GridLayout,
}

impl std::fmt::Debug for Renderer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Renderer")
            .field("term_w", &self.term_w)
            .field("term_h", &self.term_h)
            .field("layout", &self.layout)
            .finish()
    }
}

impl Renderer {
    pub fn new() -> Self {
        Renderer {
            writer: BufWriter::with_capacity(16384, io::stdout()),
            front: FrameBuffer::new(0, 0),
            back: FrameBuffer::new(0, 0),
            term_w: 0,
            term_h: 0,
            last_phase: None,
            layout: GridLayout::for_terminal(0),
        }
    }

    pub fn init(&mut self) -> io::Result<()> {
        terminal::enable_raw_mode()?;
        execute!(
            self.writer,
            terminal::EnterAlternateScreen,
            EnableMouseCapture,
            cursor::Hide,
            SetBackgroundColor(Glyph::BASE_BG),
            Clear(ClearType::All)
        )?;

        let (tw, th) = terminal::size().unwrap_or((80, 24));
        self.apply_size(tw as usize, th as usize);
        Ok(())
    }

    pub fn cleanup(&mut self) -> io::Result<()> {
        execute!(
            self.writer,
            ResetColor,
            DisableMouseCapture,
            cursor::Show,
            terminal::LeaveAlternateScreen
        )?;
        terminal::disable_raw_mode()
    }

    /// Hit-test against the layout of the last rendered frame.
    pub fn cell_at(&self, col: u16, row: u16) -> Option<Cell> {
        self.layout.cell_at(col, row)
    }

    fn apply_size(&mut self, w: usize, h: usize) {
        self.term_w = w;
        self.term_h = h;
        self.front.resize(w, h);
        self.back.resize(w, h);
        self.layout = GridLayout::for_terminal(w);
        // Force full repaint: back ≠ front for every glyph.
        self.back.cells.fill(Glyph::INVALID);
    }

    pub fn render(&mut self, arcade: &Arcade, view: &ViewState) -> io::Result<()> {
        // Detect terminal resize
        let (tw, th) = terminal::size().unwrap_or((80, 24));
        if tw as usize != self.term_w || th as usize != self.term_h {
            self.apply_size(tw as usize, th as usize);
            queue!(self.writer, SetBackgroundColor(Glyph::BASE_BG), Clear(ClearType::All))?;
        }

        // Phase change → clear for clean transition
        if self.last_phase != Some(arcade.phase) {
            self.back.cells.fill(Glyph::INVALID);
            queue!(self.writer, SetBackgroundColor(Glyph::BASE_BG), Clear(ClearType::All))?;
            self.last_phase = Some(arcade.phase);
        }

        self.front.clear();
        compose(&mut self.front, &self.layout, arcade, view, Instant::now());

        self.flush_diff()?;
        std::mem::swap(&mut self.front, &mut self.back);
        Ok(())
    }

    // ── Diff flush: only write changed glyphs ──

    fn flush_diff(&mut self) -> io::Result<()> {
        let mut last_fg = Color::White;
        let mut last_bg = Glyph::BASE_BG;
        let mut need_move = true;

        // Explicit base colors, not ResetColor: the terminal default may
        // differ from BASE_BG.
        queue!(self.writer,
            SetForegroundColor(Color::White),
            SetBackgroundColor(Glyph::BASE_BG),
        )?;

        for y in 0..self.front.height {
            need_move = true;
            for x in 0..self.front.width {
                let g = self.front.get(x, y);
                if g == self.back.get(x, y) {
                    need_move = true;
                    continue;
                }

                if need_move {
                    queue!(self.writer, MoveTo(x as u16, y as u16))?;
                    need_move = false;
                }
                if g.fg != last_fg {
                    queue!(self.writer, SetForegroundColor(g.fg))?;
                    last_fg = g.fg;
                }
                if g.bg != last_bg {
                    queue!(self.writer, SetBackgroundColor(g.bg))?;
                    last_bg = g.bg;
                }
                queue!(self.writer, Print(g.ch))?;
            }
        }

        self.writer.flush()
    }
}

// ── Compose: build front buffer content ──

fn compose(buf: &mut FrameBuffer, layout: &GridLayout, arcade: &Arcade, view: &ViewState, now: Instant) {
    compose_hud(buf, arcade);

    let session = arcade.session();
    let paused = arcade.is_paused();
    let flash = view.flash_cell(now);
    let show_cursor = view.cursor_visible && arcade.phase == Phase::Playing && !paused;

    // Hide the mole while paused so pausing can't be used to aim.
    let mole_visible = arcade.phase == Phase::Playing && !paused;
    let states: Vec<(Cell, bool)> = match session {
        Some(s) => s.grid().states().collect(),
        None => cell::cells().map(|c| (c, false)).collect(),
    };
    for (c, has_mole) in states {
        let look = if flash == Some(c) {
            CellLook::Bonk
        } else if has_mole && mole_visible {
            CellLook::Mole
        } else {
            CellLook::Empty
        };
        compose_cell(buf, layout, c, look, show_cursor && view.cursor == c);
    }

    match arcade.phase {
        Phase::Title => compose_title(buf, layout, arcade.difficulty),
        Phase::GameOver => compose_game_over(buf, layout, arcade),
        Phase::Playing if paused => compose_pause_overlay(buf, layout),
        Phase::Playing => {}
    }

    // Message bar
    let msg_row = layout.bottom() + 1;
    if !view.message.is_empty() && msg_row < buf.height {
        buf.fill_row(msg_row, MSG_BG);
        buf.put_str(0, msg_row, &format!(" * {} ", view.message), Color::Black, MSG_BG);
    }

    // Help bar
    let help_row = layout.bottom() + 3;
    if help_row < buf.height {
        let help = match arcade.phase {
            Phase::Playing => " Click / 1-9 / QWE-ASD-ZXC: Whack   Arrows+Enter: Cursor   P: Pause   Esc: End",
            _ => " Enter: Start   Tab: Difficulty   Esc: Quit",
        };
        buf.put_str(0, help_row, help, Color::DarkGrey, Color::Reset);
    }
}

fn compose_hud(buf: &mut FrameBuffer, arcade: &Arcade) {
    let (score, remaining, state) = match arcade.session() {
        Some(s) => (s.score(), s.remaining_secs(), s.state()),
        None => (0, SESSION_SECS, TimerState::Running),
    };
    let time = match state {
        TimerState::Ended if remaining == 0 => "Time's Up!".to_string(),
        TimerState::Paused => format!("Time Left: {remaining:>2} (paused)"),
        _ => format!("Time Left: {remaining:>2}"),
    };
    let hud = format!(
        " MOLE WHACK   Score: {:<4} Best: {:<4} {}   [{}] ",
        score,
        arcade.best_score(),
        time,
        arcade.difficulty.label(),
    );
    buf.fill_row(HUD_ROW, HUD_BG);
    buf.put_str(0, HUD_ROW, &hud, Color::White, HUD_BG);

    // Timer turns red in the last 5 seconds
    if arcade.phase == Phase::Playing && state == TimerState::Running && remaining <= 5 {
        if let Some(pos) = hud.find("Time Left") {
            let x = hud[..pos].chars().count();
            buf.put_str(x, HUD_ROW, &time, Color::Rgb { r: 255, g: 80, b: 80 }, HUD_BG);
        }
    }
}

fn compose_cell(buf: &mut FrameBuffer, layout: &GridLayout, c: Cell, look: CellLook, cursor: bool) {
    let (x0, y0) = layout.cell_origin(c);
    let border = match (cursor, look) {
        (_, CellLook::Bonk) => HIT,
        (true, _) => CURSOR,
        _ => BORDER,
    };

    // Frame
    let horiz = "─".repeat(CELL_W - 2);
    buf.put_str(x0, y0, &format!("┌{horiz}┐"), border, Color::Reset);
    buf.put_str(x0, y0 + CELL_H - 1, &format!("└{horiz}┘"), border, Color::Reset);
    for dy in 1..CELL_H - 1 {
        buf.set(x0, y0 + dy, Glyph::new('│', border, Color::Reset));
        buf.set(x0 + CELL_W - 1, y0 + dy, Glyph::new('│', border, Color::Reset));
    }

    // Contents
    let (sprite, fg) = match look {
        CellLook::Empty => (&HOLE, SOIL_DARK),
        CellLook::Mole => (&MOLE, MOLE_FG),
        CellLook::Bonk => (&BONK, HIT),
    };
    for (dy, line) in sprite.iter().enumerate() {
        buf.put_str(x0 + 1, y0 + 1 + dy, line, fg, SOIL);
    }
}

fn compose_panel(buf: &mut FrameBuffer, layout: &GridLayout, lines: &[(&str, Color)]) {
    let box_w = GridLayout::WIDTH.saturating_sub(8);
    let box_h = lines.len() + 2;
    let box_x = layout.x + 4;
    let box_y = layout.y + GridLayout::HEIGHT.saturating_sub(box_h) / 2;
    let bg = Color::Rgb { r: 30, g: 30, b: 30 };

    buf.fill_rect(box_x, box_y, box_w, box_h, bg);
    for (i, (text, fg)) in lines.iter().enumerate() {
        let x = box_x + box_w.saturating_sub(text.chars().count()) / 2;
        buf.put_str(x, box_y + 1 + i, text, *fg, bg);
    }
}

fn compose_title(buf: &mut FrameBuffer, layout: &GridLayout, difficulty: Difficulty) {
    let diff = format!("Difficulty: < {} >", difficulty.label());
    compose_panel(buf, layout, &[
        ("W H A C K - A - M O L E", CURSOR),
        ("", Color::White),
        ("30 seconds. Hit as many as you can.", Color::White),
        ("", Color::White),
        (&diff, Color::Rgb { r: 100, g: 200, b: 255 }),
        ("", Color::White),
        ("ENTER  Start", HI),
        ("TAB    Difficulty", Color::White),
        ("ESC    Quit", Color::DarkGrey),
    ]);
}

fn compose_game_over(buf: &mut FrameBuffer, layout: &GridLayout, arcade: &Arcade) {
    let score = arcade.session().map_or(0, |s| s.score());
    let final_line = format!("Final Score: {score}");
    let best_line = format!("Best ({}): {}", arcade.difficulty.label(), arcade.best_score());
    let banner = if arcade.last_was_best { "* NEW BEST SCORE! *" } else { "GAME OVER" };
    compose_panel(buf, layout, &[
        (banner, CURSOR),
        ("", Color::White),
        (&final_line, Color::White),
        (&best_line, Color::White),
        ("", Color::White),
        ("ENTER  Play again", HI),
        ("TAB    Difficulty", Color::White),
        ("ESC    Quit", Color::DarkGrey),
    ]);
}

fn compose_pause_overlay(buf: &mut FrameBuffer, layout: &GridLayout) {
    compose_panel(buf, layout, &[
        ("PAUSED", CURSOR),
        ("", Color::White),
        ("P / F1   Resume", Color::Rgb { r: 100, g: 200, b: 255 }),
        ("ESC      End session", Color::Rgb { r: 100, g: 200, b: 255 }),
    ]);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text_at(buf: &FrameBuffer, y: usize) -> String {
        (0..buf.width).map(|x| buf.get(x, y).ch).collect()
    }

    fn screen(buf: &FrameBuffer) -> String {
        (0..buf.height).map(|y| text_at(buf, y)).collect::<Vec<_>>().join("\n")
    }

    fn render_to_buffer(arcade: &Arcade, view: &ViewState) -> (FrameBuffer, GridLayout) {
        let mut buf = FrameBuffer::new(80, 24);
        let layout = GridLayout::for_terminal(80);
        compose(&mut buf, &layout, arcade, view, Instant::now());
        (buf, layout)
    }

    #[test]
    fn layout_fits_standard_terminal() {
        let layout = GridLayout::for_terminal(80);
        assert!(layout.x + GridLayout::WIDTH <= 80);
        assert!(layout.bottom() + 3 < 24);
    }

    #[test]
    fn hit_test_round_trips_every_cell_interior() {
        let layout = GridLayout::for_terminal(80);
        for c in cell::cells() {
            let (x, y) = layout.cell_origin(c);
            // corners and center of the box
            for (dx, dy) in [(0, 0), (CELL_W - 1, CELL_H - 1), (CELL_W / 2, CELL_H / 2)] {
                assert_eq!(layout.cell_at((x + dx) as u16, (y + dy) as u16), Some(c));
            }
        }
    }

    #[test]
    fn hit_test_misses_gaps_and_outside() {
        let layout = GridLayout::for_terminal(80);
        let (x, y) = layout.cell_origin(Cell::new(0, 0).unwrap());
        assert_eq!(layout.cell_at((x + CELL_W) as u16, y as u16), None); // gap
        assert_eq!(layout.cell_at(0, y as u16), None); // left margin
        assert_eq!(layout.cell_at(x as u16, HUD_ROW as u16), None); // HUD
        assert_eq!(layout.cell_at(x as u16, layout.bottom() as u16), None); // below
        assert_eq!(layout.cell_at((layout.x + GridLayout::WIDTH) as u16, y as u16), None);
    }

    #[test]
    fn title_screen_shows_difficulty() {
        let arcade = Arcade::with_seed(Difficulty::Hard, 1);
        let (buf, _) = render_to_buffer(&arcade, &ViewState::new());
        let s = screen(&buf);
        assert!(s.contains("Difficulty: < Hard >"));
        assert!(s.contains("Score: 0"));
        assert!(s.contains("Time Left: 30"));
    }

    #[test]
    fn playing_draws_exactly_one_mole() {
        let mut arcade = Arcade::with_seed(Difficulty::Medium, 2);
        arcade.start_new_session();
        let (buf, layout) = render_to_buffer(&arcade, &ViewState::new());
        let mole_cell = arcade.session().and_then(|s| s.active_mole()).unwrap();

        let mut drawn = vec![];
        for c in cell::cells() {
            let (x, y) = layout.cell_origin(c);
            let eyes: String = (0..CELL_W - 2).map(|dx| buf.get(x + 1 + dx, y + 2).ch).collect();
            if eyes == MOLE[1] {
                drawn.push(c);
            }
        }
        assert_eq!(drawn, vec![mole_cell]);
    }

    #[test]
    fn paused_hides_mole_and_shows_overlay() {
        let mut arcade = Arcade::with_seed(Difficulty::Medium, 3);
        arcade.start_new_session();
        arcade.pause_session();
        let (buf, _) = render_to_buffer(&arcade, &ViewState::new());
        let s = screen(&buf);
        assert!(s.contains("PAUSED"));
        assert!(!s.contains("/ o  o \\"));
    }

    #[test]
    fn game_over_shows_final_score() {
        let mut arcade = Arcade::with_seed(Difficulty::Easy, 4);
        arcade.start_new_session();
        let cell = arcade.session().and_then(|s| s.active_mole()).unwrap();
        arcade.click(cell);
        arcade.end_session();
        let (buf, _) = render_to_buffer(&arcade, &ViewState::new());
        let s = screen(&buf);
        assert!(s.contains("NEW BEST SCORE"));
        assert!(s.contains("Final Score: 1"));
        assert!(s.contains("Best (Easy): 1"));
    }
}
