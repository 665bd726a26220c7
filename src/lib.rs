//! Orbital Economy - turn-based multi-planet economy simulation

pub mod core;
pub mod graph;
pub mod logistics;
pub mod orders;
pub mod persistence;
pub mod planet;
pub mod simulation;
