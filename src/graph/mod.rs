//! Connection graph and shortest-path distance index

pub mod distance;
pub mod network;

pub use distance::{DistanceEntry, DistanceIndex};
pub use network::{Connection, ConnectionGraph, Location, Path};
