pub mod config;
pub mod error;
pub mod types;

pub use config::{EconomyConfig, PlanetTypeData, StrategyModifiers};
pub use error::{EconomyError, Result};
pub use types::{PlanetId, PlayerId, Turn, Vec2};
