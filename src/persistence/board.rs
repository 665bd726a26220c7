//! Board layout: the fixed set of planets a game is played on

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::core::error::Result;
use crate::core::types::Vec2;
use crate::planet::PlanetType;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoardPlanet {
    pub name: String,
    pub planet_type: PlanetType,
    pub position: Vec2,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BoardLayout {
    pub planets: Vec<BoardPlanet>,
}

impl BoardLayout {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_planet(mut self, name: impl Into<String>, planet_type: PlanetType, position: Vec2) -> Self {
        self.planets.push(BoardPlanet {
            name: name.into(),
            planet_type,
            position,
        });
        self
    }

    pub fn len(&self) -> usize {
        self.planets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.planets.is_empty()
    }

    /// Number of players, one per `Prime` planet
    pub fn player_count(&self) -> usize {
        self.planets
            .iter()
            .filter(|p| p.planet_type == PlanetType::Prime)
            .count()
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    /// Two-player 4x3 grid, 300 units apart so only orthogonal neighbours connect
    pub fn demo() -> Self {
        use PlanetType::*;
        let layout = [
            ("Sol", Prime),
            ("Ceres", Farm),
            ("Tarsis", Normal),
            ("Kepler", Industrial),
            ("Ymir", Desolate),
            ("Nereid", Ocean),
            ("Dune", Desert),
            ("Arbor", Verdant),
            ("Helion", Normal),
            ("Khepri", Farm),
            ("Pyre", Industrial),
            ("Vega", Prime),
        ];
        layout
            .into_iter()
            .enumerate()
            .fold(Self::new(), |board, (i, (name, planet_type))| {
                let position = Vec2::new((i % 4) as f32 * 300.0, (i / 4) as f32 * 300.0);
                board.with_planet(name, planet_type, position)
            })
    }
}
