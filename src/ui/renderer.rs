/// Presentation layer: double-buffered, diff-based terminal renderer.
///
/// How it works:
///   1. Build the next frame into `front` buffer (array of Cell)
///   2. Compare each cell with `back` buffer (previous frame)
///   3. Only emit terminal commands for cells that changed
///   4. All commands are batched with `queue!`, flushed once at the end
///   5. Swap front/back
///
/// ## Field projection
///
/// One terminal column per field column, one terminal row per two field
/// rows (terminal cells are about twice as tall as wide). The top of the
/// field is drawn first since field `y` grows upward. A 4×4 actor becomes
/// a 4×2 block.

use std::io::{self, BufWriter, Write};

use crossterm::{
    cursor::{self, MoveTo},
    execute, queue,
    style::{Color, Print, ResetColor, SetBackgroundColor, SetForegroundColor},
    terminal::{self, Clear, ClearType},
};

use frackfield::domain::entity::{ActorKind, Direction};
use frackfield::domain::terrain::{FOOTPRINT, VIEW_SIZE};
use frackfield::sim::world::{Drawable, Simulation};

// ── Cell: the unit of the back-buffer ──

#[derive(Clone, Copy, PartialEq, Eq)]
struct Cell {
    ch: char,
    fg: Color,
    bg: Color,
}

impl Cell {
    const BASE_BG: Color = Color::Rgb { r: 22, g: 22, b: 35 };
    const DIRT_BG: Color = Color::Rgb { r: 92, g: 64, b: 36 };

    const BLANK: Cell = Cell { ch: ' ', fg: Color::White, bg: Cell::BASE_BG };

    /// Sentinel cell used to invalidate the back buffer.
    const INVALID: Cell = Cell { ch: '?', fg: Color::Magenta, bg: Color::Magenta };
}

// ── FrameBuffer: a 2D grid of Cells ──

struct FrameBuffer {
    width: usize,
    height: usize,
    cells: Vec<Cell>,
}

impl FrameBuffer {
    fn new(w: usize, h: usize) -> Self {
        FrameBuffer { width: w, height: h, cells: vec![Cell::BLANK; w * h] }
    }

    fn resize(&mut self, w: usize, h: usize) {
        if self.width != w || self.height != h {
            self.width = w;
            self.height = h;
            self.cells = vec![Cell::BLANK; w * h];
        }
    }

    fn clear(&mut self) {
        self.cells.fill(Cell::BLANK);
    }

    fn set(&mut self, x: usize, y: usize, cell: Cell) {
        if x < self.width && y < self.height {
            self.cells[y * self.width + x] = cell;
        }
    }

    fn get(&self, x: usize, y: usize) -> Cell {
        if x < self.width && y < self.height {
            self.cells[y * self.width + x]
        } else {
            Cell::BLANK
        }
    }

    fn put_str(&mut self, x: usize, y: usize, s: &str, fg: Color, bg: Color) {
        for (i, ch) in s.chars().enumerate() {
            if x + i >= self.width { break; }
            self.set(x + i, y, Cell { ch, fg, bg });
        }
    }
}

// ── Renderer ──

const STATUS_ROW: usize = 0;
const FIELD_ROW: usize = 2;
const FIELD_COL: usize = 1;
const FIELD_ROWS: usize = (VIEW_SIZE / 2) as usize;
const HELP: &str = "arrows/wasd move  space squirt  tab bribe  z sonar  esc give up  q quit";

pub struct Renderer {
    writer: BufWriter<io::Stdout>,
    front: FrameBuffer,
    back: FrameBuffer,
    term_w: usize,
    term_h: usize,
}

impl Renderer {
    pub fn new() -> Self {
        Renderer {
            writer: BufWriter::with_capacity(16384, io::stdout()),
            front: FrameBuffer::new(0, 0),
            back: FrameBuffer::new(0, 0),
            term_w: 0,
            term_h: 0,
        }
    }

    pub fn init(&mut self) -> io::Result<()> {
        terminal::enable_raw_mode()?;
        execute!(
            self.writer,
            terminal::EnterAlternateScreen,
            cursor::Hide,
            SetBackgroundColor(Cell::BASE_BG),
            Clear(ClearType::All)
        )?;

        let (tw, th) = terminal::size().unwrap_or((80, 40));
        self.term_w = tw as usize;
        self.term_h = th as usize;
        self.front.resize(self.term_w, self.term_h);
        self.back.resize(self.term_w, self.term_h);
        self.back.cells.fill(Cell::INVALID);
        Ok(())
    }

    pub fn cleanup(&mut self) -> io::Result<()> {
        execute!(self.writer, ResetColor, cursor::Show, terminal::LeaveAlternateScreen)?;
        terminal::disable_raw_mode()
    }

    /// Draw the field, the status line and an optional centred banner.
    pub fn render(&mut self, sim: &Simulation, status: &str, banner: Option<&str>) -> io::Result<()> {
        let (tw, th) = terminal::size().unwrap_or((80, 40));
        if tw as usize != self.term_w || th as usize != self.term_h {
            self.term_w = tw as usize;
            self.term_h = th as usize;
            self.front.resize(self.term_w, self.term_h);
            self.back.resize(self.term_w, self.term_h);
            self.back.cells.fill(Cell::INVALID);
            queue!(self.writer, SetBackgroundColor(Cell::BASE_BG), Clear(ClearType::All))?;
        }

        self.front.clear();
        self.front.put_str(FIELD_COL, STATUS_ROW, status, Color::White, Cell::BASE_BG);
        self.compose_terrain(sim);
        for d in sim.drawables() {
            self.compose_actor(&d);
        }
        self.front.put_str(FIELD_COL, FIELD_ROW + FIELD_ROWS + 1, HELP, Color::DarkGrey, Cell::BASE_BG);
        if let Some(text) = banner {
            self.compose_banner(text);
        }

        self.flush_diff()?;
        std::mem::swap(&mut self.front, &mut self.back);
        Ok(())
    }

    // ── Diff flush: only write changed cells ──

    fn flush_diff(&mut self) -> io::Result<()> {
        let mut last_fg = Color::White;
        let mut last_bg = Cell::BASE_BG;
        let mut cursor_at: Option<(usize, usize)> = None;

        queue!(self.writer, SetForegroundColor(Color::White), SetBackgroundColor(Cell::BASE_BG))?;

        for y in 0..self.front.height {
            for x in 0..self.front.width {
                let cell = self.front.get(x, y);
                if cell == self.back.get(x, y) { continue; }

                if cursor_at != Some((x, y)) {
                    queue!(self.writer, MoveTo(x as u16, y as u16))?;
                }
                if cell.fg != last_fg {
                    queue!(self.writer, SetForegroundColor(cell.fg))?;
                    last_fg = cell.fg;
                }
                if cell.bg != last_bg {
                    queue!(self.writer, SetBackgroundColor(cell.bg))?;
                    last_bg = cell.bg;
                }
                queue!(self.writer, Print(cell.ch))?;
                cursor_at = Some((x + 1, y));
            }
        }

        self.writer.flush()
    }

    // ── Compose: build front buffer content ──

    fn compose_terrain(&mut self, sim: &Simulation) {
        let terrain = sim.terrain();
        for row in 0..FIELD_ROWS {
            let (hi, lo) = field_rows(row);
            for x in 0..VIEW_SIZE {
                let dirt = terrain.is_dirt(x, hi) || terrain.is_dirt(x, lo);
                let cell = if dirt {
                    Cell { ch: '░', fg: Color::Rgb { r: 140, g: 100, b: 60 }, bg: Cell::DIRT_BG }
                } else {
                    Cell::BLANK
                };
                self.front.set(FIELD_COL + x as usize, FIELD_ROW + row, cell);
            }
        }
    }

    fn compose_actor(&mut self, d: &Drawable) {
        let (glyph, fg) = glyph_for(d.kind);
        let top = row_of(d.y + FOOTPRINT - 1);
        let bottom = row_of(d.y);
        for row in top..=bottom {
            for dx in 0..FOOTPRINT {
                let col = FIELD_COL as i32 + d.x + dx;
                if col < 0 { continue; }
                let bg = self.front.get(col as usize, FIELD_ROW + row).bg;
                self.front.set(col as usize, FIELD_ROW + row, Cell { ch: glyph, fg, bg });
            }
        }
        if matches!(d.kind, ActorKind::Player | ActorKind::RegularProtester | ActorKind::HardcoreProtester) {
            let (col, row) = facing_mark(d);
            let bg = self.front.get(col, FIELD_ROW + row).bg;
            self.front.set(col, FIELD_ROW + row, Cell { ch: arrow(d.facing), fg: Color::White, bg });
        }
    }

    fn compose_banner(&mut self, text: &str) {
        let width = text.chars().count() + 4;
        let col = FIELD_COL + (VIEW_SIZE as usize).saturating_sub(width) / 2;
        let row = FIELD_ROW + FIELD_ROWS / 2;
        let pad = " ".repeat(width);
        self.front.put_str(col, row - 1, &pad, Color::White, Color::DarkBlue);
        self.front.put_str(col, row, &format!("  {text}  "), Color::White, Color::DarkBlue);
        self.front.put_str(col, row + 1, &pad, Color::White, Color::DarkBlue);
    }
}

/// Field rows `(upper, lower)` shown on terminal row `row`.
fn field_rows(row: usize) -> (i32, i32) {
    let hi = VIEW_SIZE - 1 - 2 * row as i32;
    (hi, hi - 1)
}

/// Terminal row (relative to the field) showing field row `y`.
fn row_of(y: i32) -> usize {
    ((VIEW_SIZE - 1 - y.clamp(0, VIEW_SIZE - 1)) / 2) as usize
}

fn facing_mark(d: &Drawable) -> (usize, usize) {
    let (dx, dy) = match d.facing {
        Direction::Up => (1, FOOTPRINT - 1),
        Direction::Down => (1, 0),
        Direction::Left => (0, 1),
        Direction::Right => (FOOTPRINT - 1, 1),
    };
    (FIELD_COL + (d.x + dx).max(0) as usize, row_of(d.y + dy))
}

fn arrow(dir: Direction) -> char {
    match dir {
        Direction::Up => '▲',
        Direction::Down => '▼',
        Direction::Left => '◀',
        Direction::Right => '▶',
    }
}

fn glyph_for(kind: ActorKind) -> (char, Color) {
    match kind {
        ActorKind::Player => ('@', Color::Cyan),
        ActorKind::Boulder => ('O', Color::Grey),
        ActorKind::RegularProtester => ('p', Color::Yellow),
        ActorKind::HardcoreProtester => ('H', Color::Red),
        ActorKind::Squirt => ('~', Color::Blue),
        ActorKind::Barrel => ('B', Color::Magenta),
        ActorKind::Gold | ActorKind::Bribe => ('$', Color::Yellow),
        ActorKind::Sonar => ('S', Color::Green),
        ActorKind::WaterPool => ('w', Color::Blue),
    }
}
