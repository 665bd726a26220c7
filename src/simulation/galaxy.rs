//! Planet arena
//!
//! Planets live in a `Vec` addressed by `PlanetId`, in board order, so the
//! same index addresses a planet here and its location in the connection
//! graph. Names resolve through a side table.

use ahash::AHashMap;

use crate::core::config::EconomyConfig;
use crate::core::error::{EconomyError, Result};
use crate::core::types::{PlanetId, PlayerId};
use crate::persistence::board::BoardLayout;
use crate::planet::{Planet, PlanetType};

#[derive(Debug, Clone, Default)]
pub struct Galaxy {
    planets: Vec<Planet>,
    by_name: AHashMap<String, PlanetId>,
    /// Capital planet of each player, indexed by player id
    capitals: Vec<PlanetId>,
}

impl Galaxy {
    /// Create planets from a board; every `Prime` planet becomes the
    /// capital of the next player and its inhabitants belong to them
    pub fn from_board(board: &BoardLayout, config: &EconomyConfig) -> Result<Self> {
        let mut galaxy = Self::default();
        for record in &board.planets {
            if galaxy.by_name.contains_key(&record.name) {
                return Err(EconomyError::InvalidConfig(format!(
                    "duplicate planet name {}",
                    record.name
                )));
            }
            let id = PlanetId(galaxy.planets.len() as u32);
            let data = config.planet_type_data(record.planet_type)?;
            let mut planet = Planet::new(
                id,
                record.name.clone(),
                record.position,
                data,
                config.baseline_morale,
            );

            if record.planet_type == PlanetType::Prime {
                let player = PlayerId(galaxy.capitals.len() as u32);
                planet.claim(player);
                galaxy.capitals.push(id);
                tracing::debug!("{} is the capital of {}", planet.name, player);
            }

            galaxy.by_name.insert(record.name.clone(), id);
            galaxy.planets.push(planet);
        }
        Ok(galaxy)
    }

    pub fn len(&self) -> usize {
        self.planets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.planets.is_empty()
    }

    pub fn planets(&self) -> &[Planet] {
        &self.planets
    }

    pub fn planets_mut(&mut self) -> &mut [Planet] {
        &mut self.planets
    }

    pub fn planet(&self, id: PlanetId) -> Option<&Planet> {
        self.planets.get(id.index())
    }

    pub fn id_of(&self, name: &str) -> Result<PlanetId> {
        self.by_name
            .get(name)
            .copied()
            .ok_or_else(|| EconomyError::UnknownPlanet(name.to_string()))
    }

    pub fn get(&self, name: &str) -> Result<&Planet> {
        let id = self.id_of(name)?;
        Ok(&self.planets[id.index()])
    }

    pub fn get_mut(&mut self, name: &str) -> Result<&mut Planet> {
        let id = self.id_of(name)?;
        Ok(&mut self.planets[id.index()])
    }

    /// Planet name for an id, empty for ids outside the arena
    pub fn name_of(&self, id: PlanetId) -> &str {
        self.planet(id).map(|p| p.name.as_str()).unwrap_or("")
    }

    pub fn player_count(&self) -> usize {
        self.capitals.len()
    }

    /// The player's home planet, while they still own it
    pub fn capital(&self, player: PlayerId) -> Option<&Planet> {
        let id = self.capitals.get(player.index())?;
        self.planet(*id).filter(|p| p.owner == Some(player))
    }

    /// Inhabitants belonging to `player` across every planet
    pub fn player_population(&self, player: PlayerId) -> u32 {
        self.planets
            .iter()
            .map(|p| p.population.count_for(Some(player)))
            .sum()
    }

    /// Planets `player` currently owns
    pub fn owned_by(&self, player: PlayerId) -> impl Iterator<Item = &Planet> + '_ {
        self.planets.iter().filter(move |p| p.owner == Some(player))
    }
}
