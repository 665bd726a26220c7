//! Board layouts and save snapshots

pub mod board;
pub mod snapshot;

pub use board::{BoardLayout, BoardPlanet};
pub use snapshot::{GameSnapshot, OrderRecord, PlanetRecord, PlayerRecord};
