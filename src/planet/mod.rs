//! Per-planet economy: population, worker strategies, production and events

pub mod events;
pub mod ledger;
pub mod population;
pub mod production;
pub mod strategy;

pub use events::{sort_by_priority, EventPriority, UpdateEvent, UpdateKind};
pub use ledger::{Planet, PlanetType};
pub use population::{Inhabitant, Population};
pub use production::{CatalogItem, ProductionCatalog, ProductionItem, ProductionQueue};
pub use strategy::{
    allocate, worker_requirement, PlanetStrategy, ResourceKind, WorkerAllocation,
    WorkerRequirements,
};
