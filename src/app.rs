use crate::config::{init_logging, Args, Settings};
use crate::input::{collect_input_nonblocking, map_event, Action, Input};
use crate::render::Terminal;
use anyhow::{Context, Result};
use cellular::{Control, Grid, Simulation};
use clap::Parser;
use rand::{rngs::StdRng, SeedableRng};
use std::time::{Duration, Instant};
use tracing::info;

const FRAMES_PER_SECOND: u32 = 60;

pub(crate) struct App {
    sim: Simulation,
    term: Terminal,
    rng: StdRng,
    should_quit: bool,
}

impl App {
    fn init(settings: &Settings) -> Result<Self> {
        // validate before taking over the screen
        let grid = Grid::new(settings.width, settings.height).context("invalid grid size")?;
        let term = Terminal::begin()?;
        info!(width = settings.width, height = settings.height, "starting simulation");
        Ok(Self {
            sim: Simulation::new(grid),
            term,
            rng: StdRng::from_entropy(),
            should_quit: false,
        })
    }

    fn run(&mut self) -> Result<()> {
        let frame_dt = Duration::from_secs(1) / FRAMES_PER_SECOND;
        let mut last_frame = Instant::now();

        while !self.should_quit {
            self.handle_input(frame_dt)?;
            if self.should_quit {
                break;
            }

            // sim fixed-step
            let now = Instant::now();
            let real_dt = now.saturating_duration_since(last_frame);
            last_frame = now;
            self.sim.advance(real_dt);

            self.term.draw(&self.sim)?;

            // frame cap
            spin_sleep(frame_dt, now);
        }

        info!(generation = self.sim.generation(), "exiting");
        self.term.end()?;
        Ok(())
    }

    fn handle_input(&mut self, frame_dt: Duration) -> Result<()> {
        for input in collect_input_nonblocking(frame_dt)? {
            match input {
                Input::Resize(cols, rows) => self.term.resize(cols, rows)?,
                Input::Event(ev) => {
                    let vp = self.term.viewport(self.sim.grid());
                    for action in map_event(&ev, &vp) {
                        match action {
                            Action::Zoom => self.term.toggle_zoom()?,
                            Action::Sim(command) => {
                                if self.sim.apply(command, &mut self.rng)? == Control::Quit {
                                    self.should_quit = true;
                                    return Ok(());
                                }
                            }
                        }
                    }
                }
            }
        }
        Ok(())
    }
}

pub(crate) fn run() -> Result<()> {
    let args = Args::parse();
    init_logging(args.log_file.as_ref())?;

    let size = crossterm::terminal::size().context("could not query terminal size")?;
    let settings = Settings::resolve(&args, size);
    let mut app = App::init(&settings)?;
    app.run()
}

/* -----------------------------
   Frame pacing helper
------------------------------ */

fn spin_sleep(target: Duration, now: Instant) {
    let end = now + target;
    loop {
        let t = Instant::now();
        if t >= end {
            break;
        }
        let left = end - t;
        if left > Duration::from_millis(2) {
            std::thread::sleep(Duration::from_millis(1));
        } else {
            std::hint::spin_loop();
        }
    }
}
