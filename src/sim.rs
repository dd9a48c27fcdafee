use crate::grid::{Grid, GridError};
use rand::Rng;
use std::time::Duration;
use tracing::{info, warn};

/// Virtual tick rate of the simulation, independent of the render rate.
pub const TICKS_PER_SECOND: u32 = 100;

/// Upper bound on generations stepped by a single `advance` call.
pub const MAX_TICKS_PER_ADVANCE: usize = 8;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SimState {
    Paused,
    Running,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Command {
    TogglePause,
    Randomize,
    Clear,
    Paint { x: usize, y: usize, alive: bool },
    Quit,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Control {
    Continue,
    Quit,
}

/// Drives a [`Grid`] on a fixed-timestep clock.
///
/// The grid knows nothing about time or pausing; that state lives here.
pub struct Simulation {
    grid: Grid,
    state: SimState,
    tick: Duration,
    accum: Duration,
    generation: u64,
}

impl Simulation {
    pub fn new(grid: Grid) -> Self {
        Self {
            grid,
            state: SimState::Paused,
            tick: Duration::from_secs(1) / TICKS_PER_SECOND,
            accum: Duration::ZERO,
            generation: 0,
        }
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn state(&self) -> SimState {
        self.state
    }

    pub fn is_running(&self) -> bool {
        self.state == SimState::Running
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn tick_period(&self) -> Duration {
        self.tick
    }

    pub fn apply<R: Rng + ?Sized>(
        &mut self,
        command: Command,
        rng: &mut R,
    ) -> Result<Control, GridError> {
        match command {
            Command::TogglePause => {
                self.state = match self.state {
                    SimState::Paused => SimState::Running,
                    SimState::Running => SimState::Paused,
                };
                info!(state = ?self.state, generation = self.generation, "toggled simulation");
            }
            Command::Randomize => self.grid.randomize(rng),
            Command::Clear => self.grid.clear(),
            Command::Paint { x, y, alive } => {
                if let Err(e) = self.grid.set(x, y, alive) {
                    warn!(error = %e, "rejected paint");
                    return Err(e);
                }
            }
            Command::Quit => return Ok(Control::Quit),
        }
        Ok(Control::Continue)
    }

    /// Feeds wall-clock time into the tick accumulator and returns how many
    /// generations were stepped.
    ///
    /// Ticks elapse while paused but do not step the grid. Backlog beyond
    /// [`MAX_TICKS_PER_ADVANCE`] ticks is dropped.
    pub fn advance(&mut self, elapsed: Duration) -> usize {
        self.accum = self.accum.saturating_add(elapsed);

        let mut ticks = 0usize;
        while self.accum >= self.tick && ticks < MAX_TICKS_PER_ADVANCE {
            self.accum -= self.tick;
            ticks += 1;
        }
        if self.accum >= self.tick {
            self.accum = Duration::from_nanos((self.accum.as_nanos() % self.tick.as_nanos()) as u64);
        }

        if self.state == SimState::Paused {
            return 0;
        }
        for _ in 0..ticks {
            self.grid.step();
            self.generation += 1;
        }
        ticks
    }
}
