//! Conway's Game of Life on a fixed-size, non-wrapping board (B3/S23).

pub mod life;

pub use life::{Cell, Grid};
