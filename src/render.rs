use anyhow::Context;
use cellular::{Grid, Simulation};
use crossterm::{
    cursor,
    event::{DisableMouseCapture, EnableMouseCapture},
    execute, queue,
    style::{Color, Print, ResetColor, SetBackgroundColor, SetForegroundColor},
    terminal::{
        self, BeginSynchronizedUpdate, ClearType, DisableLineWrap, EnableLineWrap,
        EndSynchronizedUpdate, EnterAlternateScreen, LeaveAlternateScreen,
    },
};
use std::io::{self, Stdout, Write};

pub(crate) const HUD_ROWS: u16 = 3;

const BG: Color = Color::Rgb { r: 32, g: 32, b: 32 };
const LIVE: Color = Color::White;
const HUD: Color = Color::DarkCyan;

// Braille: each terminal cell shows a 2x4 block of grid cells.
pub(crate) const BLOCK_W: usize = 2;
pub(crate) const BLOCK_H: usize = 4;

fn braille_bit(dx: usize, dy: usize) -> u8 {
    match (dx, dy) {
        (0, 0) => 0x01,
        (0, 1) => 0x02,
        (0, 2) => 0x04,
        (1, 0) => 0x08,
        (1, 1) => 0x10,
        (1, 2) => 0x20,
        (0, 3) => 0x40,
        (1, 3) => 0x80,
        _ => 0,
    }
}

pub(crate) fn braille_char(mask: u8) -> char {
    char::from_u32(0x2800 + mask as u32).unwrap_or(' ')
}

/// Dot mask for the block drawn at terminal cell `(cx, cy)` of the field.
/// Cells past the grid edge read as dead.
pub(crate) fn block_mask(grid: &Grid, cx: usize, cy: usize) -> u8 {
    let cells = grid.cells();
    let w = grid.width();
    let mut mask = 0u8;
    for dy in 0..BLOCK_H {
        for dx in 0..BLOCK_W {
            let x = cx * BLOCK_W + dx;
            let y = cy * BLOCK_H + dy;
            if x < w && y < grid.height() && cells[y * w + x] {
                mask |= braille_bit(dx, dy);
            }
        }
    }
    mask
}

/// How many grid cells one terminal cell shows.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Zoom {
    /// 2x4 cells per character as braille dots; the whole grid fits.
    Braille,
    /// One cell per character; the mouse addresses single cells.
    Cell,
}

impl Zoom {
    pub(crate) fn toggled(self) -> Self {
        match self {
            Zoom::Braille => Zoom::Cell,
            Zoom::Cell => Zoom::Braille,
        }
    }

    fn block(self) -> (usize, usize) {
        match self {
            Zoom::Braille => (BLOCK_W, BLOCK_H),
            Zoom::Cell => (1, 1),
        }
    }

    fn name(self) -> &'static str {
        match self {
            Zoom::Braille => "braille",
            Zoom::Cell => "1:1",
        }
    }
}

/// Character drawn at terminal cell `(cx, cy)` of the field.
pub(crate) fn glyph(grid: &Grid, zoom: Zoom, cx: usize, cy: usize) -> char {
    match zoom {
        Zoom::Braille => braille_char(block_mask(grid, cx, cy)),
        Zoom::Cell => {
            if grid.get(cx, cy).unwrap_or(false) {
                '█'
            } else {
                ' '
            }
        }
    }
}

/// Where the grid sits on screen.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct Viewport {
    pub(crate) cols: u16,
    pub(crate) rows: u16,
    pub(crate) grid_w: usize,
    pub(crate) grid_h: usize,
    pub(crate) zoom: Zoom,
}

impl Viewport {
    /// Grid cells covered by terminal cell `(col, row)`, clipped to the grid.
    pub(crate) fn block_at(&self, col: u16, row: u16) -> Vec<(usize, usize)> {
        if row < HUD_ROWS || row >= self.rows || col >= self.cols {
            return Vec::new();
        }
        let (bw, bh) = self.zoom.block();
        let x0 = col as usize * bw;
        let y0 = (row - HUD_ROWS) as usize * bh;
        let mut out = Vec::with_capacity(bw * bh);
        for y in y0..y0 + bh {
            for x in x0..x0 + bw {
                if x < self.grid_w && y < self.grid_h {
                    out.push((x, y));
                }
            }
        }
        out
    }
}

pub(crate) fn hud_lines(sim: &Simulation, zoom: Zoom) -> [String; 3] {
    let paused = if sim.is_running() {
        String::new()
    } else {
        "Press SPACE to Unpause".to_string()
    };
    [
        format!(
            "Press R to randomize cells   gen:{}  alive:{}  grid:{}x{}",
            sim.generation(),
            sim.grid().population(),
            sim.grid().width(),
            sim.grid().height()
        ),
        format!(
            "Press C to clear cells   Q quit   Z zoom ({})   mouse: left paint, right erase",
            zoom.name()
        ),
        paused,
    ]
}

pub(crate) struct Terminal {
    out: Stdout,
    pub(crate) cols: u16,
    pub(crate) rows: u16,
    last_frame: Vec<char>,
    zoom: Zoom,
    active: bool,
}

impl Terminal {
    pub(crate) fn begin() -> anyhow::Result<Self> {
        let mut out = io::stdout();
        terminal::enable_raw_mode().context("failed to enable raw mode")?;
        let r = execute!(
            out,
            EnterAlternateScreen,
            EnableMouseCapture,
            DisableLineWrap,
            cursor::Hide,
            SetBackgroundColor(BG),
            terminal::Clear(ClearType::All)
        );
        restore_on_err(&mut out, r).context("failed to enter alternate screen")?;

        let size = terminal::size();
        let (cols, rows) = restore_on_err(&mut out, size)?;
        Ok(Self {
            out,
            cols,
            rows,
            last_frame: Vec::new(),
            zoom: Zoom::Braille,
            active: true,
        })
    }

    pub(crate) fn end(&mut self) -> anyhow::Result<()> {
        if !self.active {
            return Ok(());
        }
        self.active = false;
        execute!(
            self.out,
            EndSynchronizedUpdate,
            ResetColor,
            DisableMouseCapture,
            cursor::Show,
            EnableLineWrap,
            LeaveAlternateScreen
        )?;
        terminal::disable_raw_mode()?;
        Ok(())
    }

    pub(crate) fn resize(&mut self, cols: u16, rows: u16) -> anyhow::Result<()> {
        self.cols = cols;
        self.rows = rows;
        self.last_frame.clear();
        execute!(
            self.out,
            SetBackgroundColor(BG),
            terminal::Clear(ClearType::All)
        )?;
        Ok(())
    }

    pub(crate) fn toggle_zoom(&mut self) -> anyhow::Result<()> {
        self.zoom = self.zoom.toggled();
        self.resize(self.cols, self.rows)
    }

    pub(crate) fn viewport(&self, grid: &Grid) -> Viewport {
        Viewport {
            cols: self.cols,
            rows: self.rows,
            grid_w: grid.width(),
            grid_h: grid.height(),
            zoom: self.zoom,
        }
    }

    pub(crate) fn draw(&mut self, sim: &Simulation) -> anyhow::Result<()> {
        let grid = sim.grid();
        let w = self.cols as usize;
        let h = self.rows.saturating_sub(HUD_ROWS) as usize;
        if self.last_frame.len() != w * h {
            // '\0' never matches a glyph, so everything is redrawn
            self.last_frame = vec!['\0'; w * h];
        }

        queue!(
            self.out,
            BeginSynchronizedUpdate,
            SetBackgroundColor(BG),
            SetForegroundColor(LIVE)
        )?;

        for ty in 0..h {
            for tx in 0..w {
                let ch = glyph(grid, self.zoom, tx, ty);
                let fi = ty * w + tx;
                if self.last_frame[fi] != ch {
                    queue!(
                        self.out,
                        cursor::MoveTo(tx as u16, ty as u16 + HUD_ROWS),
                        Print(ch)
                    )?;
                    self.last_frame[fi] = ch;
                }
            }
        }

        queue!(self.out, SetForegroundColor(HUD))?;
        for (row, line) in hud_lines(sim, self.zoom).iter().enumerate() {
            let mut text: String = line.chars().take(w).collect();
            let len = text.chars().count();
            if len < w {
                text.push_str(&" ".repeat(w - len));
            }
            queue!(self.out, cursor::MoveTo(0, row as u16), Print(text))?;
        }

        queue!(self.out, ResetColor, EndSynchronizedUpdate)?;
        self.out.flush()?;
        Ok(())
    }
}

// No `Terminal` exists yet to restore the screen on drop.
fn restore_on_err<T, W: Write>(out: &mut W, r: io::Result<T>) -> io::Result<T> {
    if r.is_err() {
        let _ = execute!(
            out,
            DisableMouseCapture,
            cursor::Show,
            EnableLineWrap,
            LeaveAlternateScreen
        );
        let _ = terminal::disable_raw_mode();
    }
    r
}

impl Drop for Terminal {
    fn drop(&mut self) {
        let _ = self.end();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn full_block_is_all_dots() {
        let mut g = Grid::new(2, 4).unwrap();
        for y in 0..4 {
            for x in 0..2 {
                g.set(x, y, true).unwrap();
            }
        }
        assert_eq!(block_mask(&g, 0, 0), 0xFF);
        assert_eq!(braille_char(0xFF), '⣿');
        assert_eq!(braille_char(0), '\u{2800}');
    }

    #[test]
    fn block_mask_uses_braille_dot_order() {
        let mut g = Grid::new(4, 8).unwrap();
        g.set(2, 4, true).unwrap(); // top-left of block (1, 1)
        g.set(3, 7, true).unwrap(); // bottom-right of block (1, 1)
        assert_eq!(block_mask(&g, 1, 1), 0x01 | 0x80);
        assert_eq!(block_mask(&g, 0, 0), 0);
    }

    #[test]
    fn blocks_past_the_grid_are_empty() {
        let mut g = Grid::new(3, 3).unwrap();
        g.set(2, 2, true).unwrap();
        assert_eq!(block_mask(&g, 1, 0), 0x04);
        assert_eq!(block_mask(&g, 5, 5), 0);
    }

    #[test]
    fn block_at_skips_hud_and_clips_to_grid() {
        let vp = Viewport {
            cols: 10,
            rows: 10,
            grid_w: 3,
            grid_h: 5,
            zoom: Zoom::Braille,
        };
        assert!(vp.block_at(0, 0).is_empty());
        assert_eq!(vp.block_at(1, HUD_ROWS), vec![(2, 0), (2, 1), (2, 2), (2, 3)]);
        assert_eq!(vp.block_at(0, HUD_ROWS + 1), vec![(0, 4), (1, 4)]);
        assert!(vp.block_at(5, HUD_ROWS).is_empty());
    }

    #[test]
    fn hud_mentions_unpause_only_while_paused() {
        let mut sim = Simulation::new(Grid::new(2, 2).unwrap());
        assert_eq!(hud_lines(&sim, Zoom::Braille)[2], "Press SPACE to Unpause");
        let mut rng = rand::thread_rng();
        sim.apply(cellular::Command::TogglePause, &mut rng).unwrap();
        assert!(hud_lines(&sim, Zoom::Braille)[2].is_empty());
        assert!(hud_lines(&sim, Zoom::Braille)[0].starts_with("Press R to randomize cells"));
    }

    #[test]
    fn cell_zoom_addresses_single_cells() {
        let vp = Viewport {
            cols: 10,
            rows: 10,
            grid_w: 6,
            grid_h: 6,
            zoom: Zoom::Cell,
        };
        assert_eq!(vp.block_at(4, HUD_ROWS + 2), vec![(4, 2)]);
        assert!(vp.block_at(6, HUD_ROWS).is_empty());
        assert_eq!(Zoom::Cell.toggled(), Zoom::Braille);
    }

    #[test]
    fn cell_zoom_glyphs() {
        let mut g = Grid::new(3, 3).unwrap();
        g.set(1, 2, true).unwrap();
        assert_eq!(glyph(&g, Zoom::Cell, 1, 2), '█');
        assert_eq!(glyph(&g, Zoom::Cell, 0, 0), ' ');
        assert_eq!(glyph(&g, Zoom::Cell, 7, 7), ' ');
        assert_eq!(glyph(&g, Zoom::Braille, 0, 0), braille_char(0x20));
    }

    #[test]
    fn failed_setup_restores_the_screen() {
        let mut out = Vec::new();
        assert_eq!(restore_on_err(&mut out, Ok(7)).unwrap(), 7);
        assert!(out.is_empty());

        let err = restore_on_err::<(), _>(
            &mut out,
            Err(io::Error::new(io::ErrorKind::Other, "no tty")),
        );
        assert_eq!(err.unwrap_err().to_string(), "no tty");
        let written = String::from_utf8(out).unwrap();
        assert!(written.contains("\x1b[?25h"), "cursor shown: {written:?}");
        assert!(written.contains("\x1b[?1049l"), "alternate screen left: {written:?}");
    }
}
