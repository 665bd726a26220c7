use thiserror::Error;

use crate::core::types::PlayerId;
use crate::planet::PlanetType;

#[derive(Error, Debug)]
pub enum EconomyError {
    #[error("Planet not found: {0}")]
    UnknownPlanet(String),

    #[error("Player not found: {0}")]
    UnknownPlayer(PlayerId),

    #[error("No catalog item named {0}")]
    UnknownItem(String),

    #[error("No resource data for planet type {0:?}")]
    UnknownPlanetType(PlanetType),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Snapshot does not match the loaded board: {0}")]
    SnapshotMismatch(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Config parse error: {0}")]
    Toml(#[from] toml::de::Error),
}

pub type Result<T> = std::result::Result<T, EconomyError>;
