pub mod command;
pub mod engine;
pub mod field;
pub mod preset;
pub mod rule;
pub mod screen;

mod parse_util;

/// A logical cell coordinate, before toroidal normalization.
pub type Coord = i64;
