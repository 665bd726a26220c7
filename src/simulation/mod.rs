//! Simulation driver: planet arena, economy tick and turn orchestration

pub mod galaxy;
pub mod orchestrator;
pub mod tick;

pub use galaxy::Galaxy;
pub use orchestrator::{OrderView, Simulation};
pub use tick::run_economy_tick;
