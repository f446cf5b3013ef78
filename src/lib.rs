//! **maze-walls** generates perfect rectangular mazes as grids of per-cell wall states.
//!
//! `generators::generate` is the entry point. The `WallGrid` it returns tells a consumer, cell by
//! cell, which of the four walls are standing; what gets drawn for them is up to the consumer.

pub mod cells;
pub mod errors;
pub mod generators;
pub mod grid;
pub mod grid_iterators;
pub mod pathing;
pub mod units;
