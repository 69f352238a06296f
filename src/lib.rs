//! Terminal snake where the body is stored as ages in the grid cells.

pub mod config;
pub mod food;
pub mod game;
pub mod grid;
pub mod signals;
pub mod snake;
pub mod term;

pub type TermInt = u16;
pub type Coords = (u16, u16);
