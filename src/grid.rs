use rand::Rng;
use thiserror::Error;
use tracing::{debug, trace};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GridError {
    #[error("grid dimensions must be non-zero, got {width}x{height}")]
    InvalidDimensions { width: usize, height: usize },
    #[error("grid of {width}x{height} cells is too large to allocate")]
    TooLarge { width: usize, height: usize },
    #[error("cell ({x}, {y}) is outside the {width}x{height} grid")]
    OutOfBounds {
        x: usize,
        y: usize,
        width: usize,
        height: usize,
    },
}

/// B3/S23: born on exactly 3, survives on 2 or 3.
///
/// The next state starts dead and is only raised to alive by one of the two
/// qualifying conditions.
#[inline]
pub fn next_state(alive: bool, neighbors: u8) -> bool {
    let mut next = false;
    if neighbors == 3 {
        next = true;
    }
    if alive && neighbors == 2 {
        next = true;
    }
    next
}

/// Toroidal Game of Life grid.
///
/// Cells are stored row-major. The grid owns two buffers of the same size:
/// `cells` holds the current generation and `next` is scratch space that
/// `step` fills before the two are swapped.
#[derive(Clone, Debug)]
pub struct Grid {
    w: usize,
    h: usize,
    cells: Vec<bool>,
    next: Vec<bool>,
}

impl Grid {
    pub fn new(width: usize, height: usize) -> Result<Self, GridError> {
        if width == 0 || height == 0 {
            return Err(GridError::InvalidDimensions { width, height });
        }
        let n = width
            .checked_mul(height)
            .filter(|&n| n <= isize::MAX as usize)
            .ok_or(GridError::TooLarge { width, height })?;
        debug!(width, height, "allocated grid");
        Ok(Self {
            w: width,
            h: height,
            cells: vec![false; n],
            next: vec![false; n],
        })
    }

    pub fn width(&self) -> usize {
        self.w
    }

    pub fn height(&self) -> usize {
        self.h
    }

    /// Current generation, row-major (`y * width + x`).
    pub fn cells(&self) -> &[bool] {
        &self.cells
    }

    #[inline]
    fn idx(&self, x: usize, y: usize) -> usize {
        y * self.w + x
    }

    fn check(&self, x: usize, y: usize) -> Result<usize, GridError> {
        if x >= self.w || y >= self.h {
            return Err(GridError::OutOfBounds {
                x,
                y,
                width: self.w,
                height: self.h,
            });
        }
        Ok(self.idx(x, y))
    }

    pub fn get(&self, x: usize, y: usize) -> Result<bool, GridError> {
        let i = self.check(x, y)?;
        Ok(self.cells[i])
    }

    pub fn set(&mut self, x: usize, y: usize, alive: bool) -> Result<(), GridError> {
        let i = self.check(x, y)?;
        self.cells[i] = alive;
        Ok(())
    }

    /// Flips a cell and returns its new state.
    pub fn toggle(&mut self, x: usize, y: usize) -> Result<bool, GridError> {
        let i = self.check(x, y)?;
        self.cells[i] = !self.cells[i];
        Ok(self.cells[i])
    }

    pub fn randomize<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        for c in &mut self.cells {
            *c = rng.gen_bool(0.5);
        }
        debug!(population = self.population(), "randomized grid");
    }

    pub fn clear(&mut self) {
        self.cells.fill(false);
        debug!("cleared grid");
    }

    pub fn population(&self) -> usize {
        self.cells.iter().filter(|&&c| c).count()
    }

    pub fn live_neighbors(&self, x: usize, y: usize) -> Result<u8, GridError> {
        self.check(x, y)?;
        Ok(count_neighbors(&self.cells, self.w, self.h, x, y))
    }

    /// Advances the grid by one generation.
    pub fn step(&mut self) {
        advance(&self.cells, &mut self.next, self.w, self.h);
        std::mem::swap(&mut self.cells, &mut self.next);
        trace!(population = self.population(), "stepped grid");
    }
}

#[inline]
fn count_neighbors(cells: &[bool], w: usize, h: usize, x: usize, y: usize) -> u8 {
    let mut count = 0u8;
    for dy in [-1isize, 0, 1] {
        for dx in [-1isize, 0, 1] {
            if dx == 0 && dy == 0 {
                continue;
            }
            let nx = (x as isize + dx).rem_euclid(w as isize) as usize;
            let ny = (y as isize + dy).rem_euclid(h as isize) as usize;
            if cells[ny * w + nx] {
                count += 1;
            }
        }
    }
    count
}

// `prev` and `next` are disjoint borrows, so no cell of the generation being
// built can be observed by the neighbour count.
fn advance(prev: &[bool], next: &mut [bool], w: usize, h: usize) {
    next.fill(false);
    for y in 0..h {
        for x in 0..w {
            let i = y * w + x;
            let n = count_neighbors(prev, w, h, x, y);
            if next_state(prev[i], n) {
                next[i] = true;
            }
        }
    }
}
