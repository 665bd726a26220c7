//! Planet resource ledger
//!
//! A planet holds its population, four stockpiles with next-turn
//! projections, worker assignment and morale. `update` runs one turn of
//! production and consumption and reports what happened as `UpdateEvent`s.

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::events::{UpdateEvent, UpdateKind};
use super::population::Population;
use super::production::{CatalogItem, ProductionQueue};
use super::strategy::{allocate, worker_requirement, PlanetStrategy, WorkerAllocation, WorkerRequirements};
use crate::core::config::{EconomyConfig, PlanetTypeData, StrategyModifiers};
use crate::core::types::{PlanetId, PlayerId, Vec2};

/// Biome/role category of a planet
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PlanetType {
    /// Player capital
    Prime,
    Normal,
    Farm,
    Verdant,
    Industrial,
    Desolate,
    Ocean,
    Desert,
}

impl PlanetType {
    pub const ALL: [PlanetType; 8] = [
        Self::Prime,
        Self::Normal,
        Self::Farm,
        Self::Verdant,
        Self::Industrial,
        Self::Desolate,
        Self::Ocean,
        Self::Desert,
    ];
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Planet {
    pub id: PlanetId,
    pub name: String,
    pub position: Vec2,
    pub planet_type: PlanetType,
    pub owner: Option<PlayerId>,
    pub strategy: PlanetStrategy,
    pub morale: f32,
    pub population: Population,

    pub food: f32,
    pub projected_food: f32,
    pub goods: f32,
    pub projected_goods: f32,
    pub industry: f32,
    pub projected_industry: f32,
    pub research: f32,
    pub projected_research: f32,

    pub workers: WorkerAllocation,
    pub projected_workers: WorkerAllocation,

    /// Static per-type rates and caps
    pub resources: PlanetTypeData,

    /// Players with colonists on the way here
    pub population_transfer_in_progress: Vec<PlayerId>,
    pub food_transfer_in_progress: bool,
    pub goods_transfer_in_progress: bool,

    pub production: ProductionQueue,
}

impl Planet {
    pub fn new(
        id: PlanetId,
        name: impl Into<String>,
        position: Vec2,
        resources: &PlanetTypeData,
        baseline_morale: f32,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            position,
            planet_type: resources.planet_type,
            owner: None,
            strategy: resources.initial_strategy,
            morale: baseline_morale,
            population: Population::unowned(resources.initial_population),
            food: resources.initial_food,
            projected_food: 0.0,
            goods: resources.initial_goods,
            projected_goods: 0.0,
            industry: 0.0,
            projected_industry: 0.0,
            research: 0.0,
            projected_research: 0.0,
            workers: WorkerAllocation::default(),
            projected_workers: WorkerAllocation::default(),
            resources: resources.clone(),
            population_transfer_in_progress: Vec::new(),
            food_transfer_in_progress: false,
            goods_transfer_in_progress: false,
            production: ProductionQueue::new(),
        }
    }

    pub fn population_count(&self) -> u32 {
        self.population.len()
    }

    pub fn max_population(&self) -> u32 {
        self.resources.max_population
    }

    /// Share of this planet's inhabitants owned by `player`
    pub fn population_fraction(&self, player: PlayerId) -> f32 {
        self.population.fraction(player)
    }

    /// Goods consumed per turn to hold morale
    pub fn maintenance_cost(&self) -> f32 {
        self.population.len() as f32
    }

    fn efficiency(&self, config: &EconomyConfig) -> f32 {
        self.morale / config.baseline_morale
    }

    fn event(&self, kind: UpdateKind) -> UpdateEvent {
        UpdateEvent::new(self.id, self.name.clone(), kind)
    }

    /// Population after next turn's growth, if there is room for it
    fn projected_population(&self) -> u32 {
        let count = self.population.len();
        if count < self.max_population() {
            count + 1
        } else {
            count
        }
    }

    // ------------------------------------------------------------------
    // Worker assignment
    // ------------------------------------------------------------------

    /// Workers each resource needs to support `population` inhabitants
    pub fn worker_requirements(
        &self,
        population: u32,
        modifiers: &StrategyModifiers,
        config: &EconomyConfig,
    ) -> WorkerRequirements {
        let pop = population as f32;
        let need = |requirement: f32, rate: f32| {
            worker_requirement(requirement, rate, self.morale, config.baseline_morale, population)
        };

        let mut food = pop * modifiers.food;
        if self.food > food * 3.0 {
            food = pop;
        }

        let maintenance = pop;
        let mut goods = maintenance;
        let balance = self.goods - maintenance;
        if balance <= 0.0 {
            goods += -balance * modifiers.goods;
        }

        WorkerRequirements {
            food: need(food, self.resources.food_production),
            goods: need(goods, self.resources.goods_production),
            research: need(pop * modifiers.research, self.resources.research_production),
            industry: need(pop * modifiers.industry, self.resources.industry_production),
        }
    }

    /// Recompute current worker assignment from strategy and stockpiles
    pub fn assign_workers(&mut self, config: &EconomyConfig) {
        let modifiers = config.modifiers_for(self.strategy);
        let population = self.population.len();
        let requirements = self.worker_requirements(population, &modifiers, config);
        self.workers = allocate(self.strategy, population, &requirements);
    }

    fn project_workers(&mut self, config: &EconomyConfig) {
        let modifiers = config.modifiers_for(self.strategy);
        let population = self.projected_population();
        let requirements = self.worker_requirements(population, &modifiers, config);
        self.projected_workers = allocate(self.strategy, population, &requirements);
    }

    // ------------------------------------------------------------------
    // Turn update
    // ------------------------------------------------------------------

    /// Run one turn of production and consumption
    pub fn update<R: Rng + ?Sized>(
        &mut self,
        config: &EconomyConfig,
        rng: &mut R,
        events: &mut Vec<UpdateEvent>,
    ) {
        if self.population.is_empty() {
            self.workers = WorkerAllocation::default();
            self.projected_workers = WorkerAllocation::default();
            return;
        }

        self.shed_overflow(rng, events);
        self.assign_workers(config);
        self.produce(config);

        self.consume_food(config, rng, events);
        if self.population.is_empty() {
            return;
        }
        self.consume_goods(config, events);
        self.consume_industry(config, events);
        self.consume_research(config, events);
    }

    /// Trim arrivals that pushed the count past max population
    fn shed_overflow<R: Rng + ?Sized>(&mut self, rng: &mut R, events: &mut Vec<UpdateEvent>) {
        let max = self.max_population();
        let count = self.population.len();
        if count <= max {
            return;
        }
        let excess = count - max;
        for _ in 0..excess {
            self.remove_random_inhabitant(rng);
        }
        tracing::info!("{}: {} inhabitants over capacity left", self.name, excess);
        events.push(self.event(UpdateKind::PopulationSurplus).with_amount(excess as f32));
    }

    fn produce(&mut self, config: &EconomyConfig) {
        let efficiency = self.efficiency(config);
        let data = &self.resources;
        let food = self.workers.food as f32 * data.food_production * efficiency;
        let goods = self.workers.goods as f32 * data.goods_production * efficiency;
        let industry = self.workers.industry as f32 * data.industry_production * efficiency;
        let research = self.workers.research as f32 * data.research_production * efficiency;

        self.food = (self.food + food).clamp(0.0, data.max_food_storage);
        self.goods = (self.goods + goods).clamp(0.0, data.max_goods_storage);
        self.industry = (self.industry + industry).max(0.0);
        self.research = (self.research + research).max(0.0);
    }

    fn consume_food<R: Rng + ?Sized>(
        &mut self,
        config: &EconomyConfig,
        rng: &mut R,
        events: &mut Vec<UpdateEvent>,
    ) {
        let pop = self.population.len() as f32;
        let mut shortage = 0.0;

        if self.food < pop {
            shortage = pop - self.food;
            // Emergency ration: one unit per turn until the store runs dry
            self.food -= 1.0;
            if self.food <= 0.0 {
                let lost = self.remove_random_inhabitant(rng);
                self.food = self.population.len() as f32;
                events.push(
                    self.event(UpdateKind::PopulationLoss)
                        .with_amount(1.0)
                        .with_player(lost),
                );
                if self.population.is_empty() {
                    tracing::info!("{} has died out", self.name);
                    events.push(self.event(UpdateKind::Dead));
                    self.projected_food = 0.0;
                    self.projected_workers = WorkerAllocation::default();
                    return;
                }
            }
        } else {
            self.food -= pop;
            let max = self.max_population();
            if self.food >= config.food_for_new_population && self.population.len() < max {
                self.food -= config.food_for_new_population;
                let gained = self.add_random_inhabitant(rng);
                events.push(
                    self.event(UpdateKind::PopulationGain)
                        .with_amount(1.0)
                        .with_player(gained),
                );
            } else if self.population.len() >= max {
                events.push(self.event(UpdateKind::PopulationMax).with_amount(1.0));
            }
        }

        self.project_workers(config);
        let projected_pop = self.projected_population() as f32;
        self.projected_food = self.projected_workers.food as f32
            * self.resources.food_production
            * self.efficiency(config);

        if self.projected_food + self.food > projected_pop && shortage <= 0.0 {
            if self.food > projected_pop {
                events.push(
                    self.event(UpdateKind::FoodSurplus)
                        .with_amount(self.food - projected_pop),
                );
            }
        } else if self.projected_food < projected_pop {
            shortage += projected_pop - self.projected_food;
        }

        if shortage > 0.0 {
            events.push(self.event(UpdateKind::FoodShortage).with_amount(shortage));
        }
    }

    fn consume_goods(&mut self, config: &EconomyConfig, events: &mut Vec<UpdateEvent>) {
        let maintenance = self.maintenance_cost();
        let mut balance = 0.0;

        if self.goods < maintenance {
            balance = self.goods - maintenance;
            self.goods = 0.0;
            self.morale -= config.morale_step;
        } else {
            self.goods -= maintenance;
            self.morale += config.morale_step;
        }
        self.morale = self.morale.clamp(0.0, config.max_morale);

        let projected_pop = self.projected_population() as f32;
        let produced = self.projected_workers.goods as f32
            * self.resources.goods_production
            * self.efficiency(config);
        self.projected_goods = (self.goods + produced).clamp(0.0, self.resources.max_goods_storage);

        let requirement = maintenance + projected_pop;
        if self.projected_goods >= requirement {
            balance += self.projected_goods - requirement;
            if self.goods > requirement {
                events.push(
                    self.event(UpdateKind::GoodsSurplus)
                        .with_amount(self.goods - requirement),
                );
            }
        } else {
            balance += self.projected_goods - projected_pop;
        }

        if balance < 0.0 {
            events.push(self.event(UpdateKind::GoodsShortage).with_amount(-balance));
        }
    }

    fn consume_industry(&mut self, config: &EconomyConfig, events: &mut Vec<UpdateEvent>) {
        for item in self.production.advance(&mut self.industry) {
            tracing::debug!("{} completed {}", self.name, item.name);
            events.push(
                self.event(UpdateKind::ProductionComplete)
                    .with_amount(item.cost)
                    .with_item(item.name),
            );
        }
        if !self.production.is_active() {
            events.push(self.event(UpdateKind::IndustrySurplus).with_amount(self.industry));
        }
        self.projected_industry = self.industry
            + self.projected_workers.industry as f32
                * self.resources.industry_production
                * self.efficiency(config);
    }

    fn consume_research(&mut self, config: &EconomyConfig, events: &mut Vec<UpdateEvent>) {
        events.push(self.event(UpdateKind::ResearchProduced).with_amount(self.research));
        self.projected_research = self.research
            + self.projected_workers.research as f32
                * self.resources.research_production
                * self.efficiency(config);
    }

    // ------------------------------------------------------------------
    // Population and ownership
    // ------------------------------------------------------------------

    fn remove_random_inhabitant<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Option<PlayerId> {
        let group = self.population.pick_weighted(rng)?;
        self.population.remove(group, 1);
        self.update_owner();
        group
    }

    fn add_random_inhabitant<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Option<PlayerId> {
        let group = self.population.pick_weighted(rng).unwrap_or(self.owner);
        self.population.add(group, 1);
        self.update_owner();
        group
    }

    /// Add `count` inhabitants for `player`
    pub fn add_population(&mut self, player: Option<PlayerId>, count: u32) {
        self.population.add(player, count);
        self.update_owner();
    }

    /// Remove up to `count` inhabitants of `player`; returns how many left
    pub fn remove_population(&mut self, player: Option<PlayerId>, count: u32) -> u32 {
        let removed = self.population.remove(player, count);
        if removed < count {
            tracing::warn!(
                "{}: asked to remove {} inhabitants of {:?}, only {} present",
                self.name,
                count,
                player,
                removed
            );
        }
        self.update_owner();
        removed
    }

    /// Recompute the owner from the population majority; true if it changed
    pub fn update_owner(&mut self) -> bool {
        let owner = self.population.majority_player();
        if owner == self.owner {
            return false;
        }
        tracing::info!("{} changed owner: {:?} -> {:?}", self.name, self.owner, owner);
        self.owner = owner;
        true
    }

    /// Make `player` the owner of every inhabitant
    pub fn claim(&mut self, player: PlayerId) {
        self.population.assign_all(player);
        self.update_owner();
    }

    pub fn has_population_transfer(&self, player: PlayerId) -> bool {
        self.population_transfer_in_progress.contains(&player)
    }

    pub fn set_population_transfer(&mut self, player: PlayerId, in_progress: bool) {
        if in_progress {
            if !self.has_population_transfer(player) {
                self.population_transfer_in_progress.push(player);
            }
        } else {
            self.population_transfer_in_progress.retain(|p| *p != player);
        }
    }

    // ------------------------------------------------------------------
    // Stockpile adjustments from orders
    // ------------------------------------------------------------------

    pub fn change_food(&mut self, delta: f32) {
        self.food = self.clamped("food", self.food + delta, self.resources.max_food_storage);
    }

    pub fn change_goods(&mut self, delta: f32) {
        self.goods = self.clamped("goods", self.goods + delta, self.resources.max_goods_storage);
    }

    pub fn change_research(&mut self, delta: f32) {
        self.research = self.clamped("research", self.research + delta, f32::INFINITY);
    }

    fn clamped(&self, what: &str, value: f32, max: f32) -> f32 {
        if value < 0.0 {
            tracing::warn!("{}: {} would drop to {}, clamping to 0", self.name, what, value);
        }
        value.clamp(0.0, max)
    }

    pub fn enqueue_production(&mut self, item: CatalogItem) {
        self.production.enqueue(item);
    }
}
