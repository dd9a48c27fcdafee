//! Conway's Game of Life on a torus.
//!
//! [`grid::Grid`] holds the cells and the B3/S23 step; [`sim::Simulation`]
//! adds the pause flag and the fixed-timestep clock a front end drives it
//! with.

pub mod grid;
pub mod sim;

pub use grid::{next_state, Grid, GridError};
pub use sim::{Command, Control, SimState, Simulation};
