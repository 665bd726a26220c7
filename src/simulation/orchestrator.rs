//! Turn orchestrator
//!
//! `Simulation` owns every piece of mutable game state and sequences one
//! turn as: apply matured orders, run the economy tick, let each player's
//! AI match the event stream, queue the new orders.

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use super::galaxy::Galaxy;
use super::tick::run_economy_tick;
use crate::core::config::EconomyConfig;
use crate::core::error::{EconomyError, Result};
use crate::core::types::{PlayerId, Turn};
use crate::graph::{ConnectionGraph, DistanceIndex, Path};
use crate::logistics::{plan_turn, AiStrategy, MatchContext, Player};
use crate::orders::{Order, OrderQueue};
use crate::persistence::board::BoardLayout;
use crate::persistence::snapshot::{GameSnapshot, OrderRecord, PlanetRecord, PlayerRecord};
use crate::planet::{CatalogItem, Planet, PlanetStrategy, ProductionCatalog, UpdateEvent};

/// Read-only view of a pending order
#[derive(Debug, Clone, Copy)]
pub struct OrderView<'a> {
    pub order: &'a Order,
    pub origin: &'a str,
    pub target: &'a str,
    /// Fraction of the trip completed
    pub progress: f32,
}

pub struct Simulation {
    config: EconomyConfig,
    graph: ConnectionGraph,
    distances: DistanceIndex,
    galaxy: Galaxy,
    players: Vec<Player>,
    orders: OrderQueue,
    catalog: ProductionCatalog,
    turn: Turn,
    rng: ChaCha8Rng,
    last_events: Vec<UpdateEvent>,
}

impl Simulation {
    /// Build graph, distance index and planets for `board`
    pub fn initialize(board: &BoardLayout, config: EconomyConfig) -> Result<Self> {
        config.validate()?;

        let graph = ConnectionGraph::build(
            board.planets.iter().map(|p| (p.name.clone(), p.position)),
            config.max_connection_distance,
        );
        let distances = DistanceIndex::build(&graph, config.parallel_threshold);
        let galaxy = Galaxy::from_board(board, &config)?;
        let players = (0..galaxy.player_count())
            .map(|i| Player::new(PlayerId(i as u32)))
            .collect();
        let rng = ChaCha8Rng::seed_from_u64(config.seed);

        tracing::info!(
            "Initialized {} planets, {} players, {} connections",
            galaxy.len(),
            galaxy.player_count(),
            graph.edges().count()
        );

        Ok(Self {
            config,
            graph,
            distances,
            galaxy,
            players,
            orders: OrderQueue::new(),
            catalog: ProductionCatalog::with_defaults(),
            turn: 0,
            rng,
            last_events: Vec::new(),
        })
    }

    /// Run one full turn
    pub fn advance_turn(&mut self) {
        tracing::debug!("Turn {} start", self.turn);

        let matured = self.orders.process(self.galaxy.planets_mut());

        let events = run_economy_tick(self.galaxy.planets_mut(), &self.config, &mut self.rng);

        // Players match in id order; immediate orders land before the next player looks
        let mut issued = 0;
        for player in &mut self.players {
            let ctx = MatchContext {
                planets: self.galaxy.planets(),
                distances: &self.distances,
                config: &self.config,
            };
            let orders = plan_turn(player, &events, &ctx);
            issued += orders.len();
            self.orders.submit(orders, self.galaxy.planets_mut());
        }

        tracing::debug!(
            "Turn {} end: {} orders matured, {} events, {} orders issued, {} pending",
            self.turn,
            matured,
            events.len(),
            issued,
            self.orders.len()
        );

        self.last_events = events;
        self.turn += 1;
    }

    pub fn turn(&self) -> Turn {
        self.turn
    }

    pub fn config(&self) -> &EconomyConfig {
        &self.config
    }

    pub fn graph(&self) -> &ConnectionGraph {
        &self.graph
    }

    pub fn distances(&self) -> &DistanceIndex {
        &self.distances
    }

    pub fn find_path(&self, origin: &str, destination: &str) -> Result<Path> {
        self.graph.find_path_by_name(origin, destination)
    }

    pub fn get_planet(&self, name: &str) -> Result<&Planet> {
        self.galaxy.get(name)
    }

    pub fn planets(&self) -> &[Planet] {
        self.galaxy.planets()
    }

    pub fn capital(&self, player: PlayerId) -> Option<&Planet> {
        self.galaxy.capital(player)
    }

    pub fn player_population(&self, player: PlayerId) -> u32 {
        self.galaxy.player_population(player)
    }

    pub fn owned_planets(&self, player: PlayerId) -> impl Iterator<Item = &Planet> + '_ {
        self.galaxy.owned_by(player)
    }

    /// Events produced by the most recent turn, priority ordered
    pub fn last_events(&self) -> &[UpdateEvent] {
        &self.last_events
    }

    pub fn players(&self) -> &[Player] {
        &self.players
    }

    pub fn player(&self, id: PlayerId) -> Result<&Player> {
        self.players
            .get(id.index())
            .ok_or(EconomyError::UnknownPlayer(id))
    }

    pub fn set_player_strategy(&mut self, id: PlayerId, strategy: AiStrategy) -> Result<()> {
        let player = self
            .players
            .get_mut(id.index())
            .ok_or(EconomyError::UnknownPlayer(id))?;
        player.strategy = strategy;
        Ok(())
    }

    pub fn set_planet_strategy(&mut self, name: &str, strategy: PlanetStrategy) -> Result<()> {
        self.galaxy.get_mut(name)?.strategy = strategy;
        Ok(())
    }

    pub fn enqueue_production(&mut self, name: &str, item: CatalogItem) -> Result<()> {
        self.galaxy.get_mut(name)?.enqueue_production(item);
        Ok(())
    }

    pub fn catalog(&self) -> &ProductionCatalog {
        &self.catalog
    }

    pub fn set_catalog(&mut self, catalog: ProductionCatalog) {
        self.catalog = catalog;
    }

    /// Queue the catalog item called `item` on planet `name`
    pub fn build(&mut self, name: &str, item: &str) -> Result<()> {
        let item = self
            .catalog
            .get(item)
            .cloned()
            .ok_or_else(|| EconomyError::UnknownItem(item.to_string()))?;
        tracing::debug!("{} queued {}", name, item.name);
        self.enqueue_production(name, item)
    }

    /// Pending orders with their transit progress
    pub fn current_orders(&self) -> Vec<OrderView<'_>> {
        self.orders
            .orders()
            .iter()
            .map(|order| OrderView {
                order,
                origin: self.galaxy.name_of(order.origin),
                target: self.galaxy.name_of(order.target),
                progress: order.transit_progress(),
            })
            .collect()
    }

    pub fn pending_orders(&self) -> &[Order] {
        self.orders.orders()
    }

    pub fn export_snapshot(&self) -> GameSnapshot {
        let player_count = self.players.len();
        GameSnapshot {
            turn: self.turn,
            players: self.players.iter().map(PlayerRecord::from).collect(),
            planets: self
                .galaxy
                .planets()
                .iter()
                .map(|p| PlanetRecord::capture(p, player_count))
                .collect(),
            orders: self
                .orders
                .orders()
                .iter()
                .map(|o| OrderRecord::capture(o, &self.galaxy))
                .collect(),
            rng: Some(self.rng.clone()),
        }
    }

    /// Replace game state with a snapshot taken on the same board
    ///
    /// Nothing is changed unless the whole snapshot checks out.
    pub fn restore_snapshot(&mut self, snapshot: &GameSnapshot) -> Result<()> {
        if snapshot.planets.len() != self.galaxy.len() {
            return Err(EconomyError::SnapshotMismatch(format!(
                "snapshot has {} planets, board has {}",
                snapshot.planets.len(),
                self.galaxy.len()
            )));
        }
        if snapshot.players.len() != self.players.len() {
            return Err(EconomyError::SnapshotMismatch(format!(
                "snapshot has {} players, board has {}",
                snapshot.players.len(),
                self.players.len()
            )));
        }
        if let Some((i, record)) = snapshot
            .players
            .iter()
            .enumerate()
            .find(|(i, r)| r.id.index() != *i)
        {
            return Err(EconomyError::SnapshotMismatch(format!(
                "player record {} has id {}",
                i, record.id.0
            )));
        }

        let players = self.players.len();
        let known = |player: &PlayerId| player.index() < players;
        for record in &snapshot.planets {
            if record.population_by_player.len() > players
                || !record.owner.iter().all(known)
                || !record.population_transfer_in_progress.iter().all(known)
            {
                return Err(EconomyError::SnapshotMismatch(format!(
                    "{} refers to players beyond the {} in this game",
                    record.name, players
                )));
            }
        }
        if snapshot.orders.iter().any(|r| !r.player.iter().all(known)) {
            return Err(EconomyError::SnapshotMismatch(format!(
                "order issued by a player beyond the {} in this game",
                players
            )));
        }

        let orders = snapshot
            .orders
            .iter()
            .map(|r| r.resolve(&self.galaxy))
            .collect::<Result<Vec<_>>>()?;

        let mut galaxy = self.galaxy.clone();
        for (planet, record) in galaxy.planets_mut().iter_mut().zip(&snapshot.planets) {
            record.apply_to(planet)?;
        }

        self.galaxy = galaxy;
        for (player, record) in self.players.iter_mut().zip(&snapshot.players) {
            player.strategy = record.strategy;
            player.research_points = record.research_points;
        }
        self.orders.clear();
        for order in orders {
            self.orders.push(order);
        }
        self.turn = snapshot.turn;
        self.rng = match &snapshot.rng {
            Some(rng) => rng.clone(),
            None => ChaCha8Rng::seed_from_u64(self.config.seed.wrapping_add(u64::from(self.turn))),
        };
        self.last_events.clear();

        tracing::info!(
            "Restored snapshot at turn {} with {} pending orders",
            self.turn,
            self.orders.len()
        );
        Ok(())
    }
}
