use crate::render::{BLOCK_H, BLOCK_W, HUD_ROWS};
use anyhow::{Context, Result};
use clap::Parser;
use std::{fs::File, path::PathBuf, sync::Mutex};
use tracing_subscriber::EnvFilter;

/// Conway's Game of Life in the terminal.
///
/// SPACE pauses/resumes, R randomizes, C clears, Z switches between the
/// braille overview and a 1:1 view, Q quits. Left mouse paints cells alive,
/// right mouse erases them.
#[derive(Parser, Debug)]
#[command(name = "cellular", version)]
pub(crate) struct Args {
    /// grid width in cells (defaults to the terminal width at braille resolution)
    #[arg(long)]
    pub(crate) width: Option<usize>,

    /// grid height in cells (defaults to the terminal height at braille resolution)
    #[arg(long)]
    pub(crate) height: Option<usize>,

    /// write logs to this file; filter with RUST_LOG
    #[arg(long)]
    pub(crate) log_file: Option<PathBuf>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct Settings {
    pub(crate) width: usize,
    pub(crate) height: usize,
}

impl Settings {
    /// Fills in missing dimensions from a `cols` x `rows` terminal.
    pub(crate) fn resolve(args: &Args, (cols, rows): (u16, u16)) -> Self {
        let fit_w = (cols as usize * BLOCK_W).max(1);
        let fit_h = (rows.saturating_sub(HUD_ROWS) as usize * BLOCK_H).max(1);
        Self {
            width: args.width.unwrap_or(fit_w),
            height: args.height.unwrap_or(fit_h),
        }
    }
}

pub(crate) fn init_logging(path: Option<&PathBuf>) -> Result<()> {
    let Some(path) = path else {
        return Ok(());
    };
    let file = File::create(path)
        .with_context(|| format!("could not create log file {}", path.display()))?;
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_ansi(false)
        .with_writer(Mutex::new(file))
        .init();
    Ok(())
}
