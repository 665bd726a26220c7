//! Save snapshot shape
//!
//! Everything needed to resume a game on the same board: turn, players,
//! per-planet ledgers, pending orders and the random source. Orders reference planets by name
//! so a snapshot stays readable outside the simulation.

use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::core::error::{EconomyError, Result};
use crate::core::types::{PlayerId, Turn};
use crate::logistics::{AiStrategy, Player};
use crate::orders::{Order, OrderKind, OrderTiming, Quantity};
use crate::planet::{Planet, PlanetStrategy, PlanetType, ProductionQueue, WorkerAllocation};
use crate::simulation::galaxy::Galaxy;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerRecord {
    pub id: PlayerId,
    pub strategy: AiStrategy,
    pub research_points: f32,
}

impl From<&Player> for PlayerRecord {
    fn from(player: &Player) -> Self {
        Self {
            id: player.id,
            strategy: player.strategy,
            research_points: player.research_points,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanetRecord {
    pub name: String,
    pub planet_type: PlanetType,
    pub strategy: PlanetStrategy,
    pub food: f32,
    pub goods: f32,
    pub industry: f32,
    pub research: f32,
    pub morale: f32,
    pub owner: Option<PlayerId>,
    /// Inhabitants per player, indexed by player id
    pub population_by_player: Vec<u32>,
    pub unowned_population: u32,
    pub population_transfer_in_progress: Vec<PlayerId>,
    pub food_transfer_in_progress: bool,
    pub goods_transfer_in_progress: bool,
    #[serde(default)]
    pub production: ProductionQueue,
    /// Last turn's projections, shown until the next update recomputes them
    #[serde(default)]
    pub projected_food: f32,
    #[serde(default)]
    pub projected_goods: f32,
    #[serde(default)]
    pub projected_industry: f32,
    #[serde(default)]
    pub projected_research: f32,
    #[serde(default)]
    pub workers: WorkerAllocation,
    #[serde(default)]
    pub projected_workers: WorkerAllocation,
}

impl PlanetRecord {
    pub fn capture(planet: &Planet, player_count: usize) -> Self {
        let population_by_player = (0..player_count)
            .map(|i| planet.population.count_for(Some(PlayerId(i as u32))))
            .collect();
        Self {
            name: planet.name.clone(),
            planet_type: planet.planet_type,
            strategy: planet.strategy,
            food: planet.food,
            goods: planet.goods,
            industry: planet.industry,
            research: planet.research,
            morale: planet.morale,
            owner: planet.owner,
            population_by_player,
            unowned_population: planet.population.count_for(None),
            population_transfer_in_progress: planet.population_transfer_in_progress.clone(),
            food_transfer_in_progress: planet.food_transfer_in_progress,
            goods_transfer_in_progress: planet.goods_transfer_in_progress,
            production: planet.production.clone(),
            projected_food: planet.projected_food,
            projected_goods: planet.projected_goods,
            projected_industry: planet.projected_industry,
            projected_research: planet.projected_research,
            workers: planet.workers,
            projected_workers: planet.projected_workers,
        }
    }

    /// Overwrite `planet`'s mutable state with this record
    pub fn apply_to(&self, planet: &mut Planet) -> Result<()> {
        if planet.name != self.name || planet.planet_type != self.planet_type {
            return Err(EconomyError::SnapshotMismatch(format!(
                "expected {} ({:?}), found {} ({:?})",
                planet.name, planet.planet_type, self.name, self.planet_type
            )));
        }
        planet.strategy = self.strategy;
        planet.food = self.food;
        planet.goods = self.goods;
        planet.industry = self.industry;
        planet.research = self.research;
        planet.morale = self.morale;

        planet.population.clear();
        planet.population.add(None, self.unowned_population);
        for (i, count) in self.population_by_player.iter().enumerate() {
            planet.population.add(Some(PlayerId(i as u32)), *count);
        }
        // The saved owner wins over a recount so ties restore as saved
        planet.owner = self.owner;

        planet.population_transfer_in_progress = self.population_transfer_in_progress.clone();
        planet.food_transfer_in_progress = self.food_transfer_in_progress;
        planet.goods_transfer_in_progress = self.goods_transfer_in_progress;
        planet.production = self.production.clone();

        planet.projected_food = self.projected_food;
        planet.projected_goods = self.projected_goods;
        planet.projected_industry = self.projected_industry;
        planet.projected_research = self.projected_research;
        planet.workers = self.workers;
        planet.projected_workers = self.projected_workers;
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderRecord {
    pub kind: OrderKind,
    pub origin: String,
    pub target: String,
    pub quantity: Quantity,
    pub player: Option<PlayerId>,
    pub timing: OrderTiming,
    pub delay: i32,
    pub total_delay: i32,
}

impl OrderRecord {
    pub fn capture(order: &Order, galaxy: &Galaxy) -> Self {
        Self {
            kind: order.kind,
            origin: galaxy.name_of(order.origin).to_string(),
            target: galaxy.name_of(order.target).to_string(),
            quantity: order.quantity,
            player: order.player,
            timing: order.timing,
            delay: order.delay,
            total_delay: order.total_delay,
        }
    }

    pub fn resolve(&self, galaxy: &Galaxy) -> Result<Order> {
        Ok(Order {
            kind: self.kind,
            origin: galaxy.id_of(&self.origin)?,
            target: galaxy.id_of(&self.target)?,
            quantity: self.quantity,
            player: self.player,
            timing: self.timing,
            delay: self.delay,
            total_delay: self.total_delay,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameSnapshot {
    pub turn: Turn,
    pub players: Vec<PlayerRecord>,
    pub planets: Vec<PlanetRecord>,
    pub orders: Vec<OrderRecord>,
    /// Random source state; without it a resumed game draws from a fresh seed
    #[serde(default)]
    pub rng: Option<ChaCha8Rng>,
}

impl GameSnapshot {
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        std::fs::write(path, self.to_json()?)?;
        Ok(())
    }

    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content)
    }
}
