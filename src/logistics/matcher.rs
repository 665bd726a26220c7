//! Per-player logistics AI
//!
//! Reads the turn's update events and turns them into orders: colonists
//! from crowded planets to empty or foreign ones, food and goods from
//! surplus planets to shortage planets, and research collected into the
//! player's pool.

use serde::{Deserialize, Serialize};

use super::score::{Candidate, ScoreMatrix};
use crate::core::config::EconomyConfig;
use crate::core::types::{PlanetId, PlayerId};
use crate::graph::DistanceIndex;
use crate::orders::{Order, OrderKind, Quantity};
use crate::planet::{Planet, UpdateEvent, UpdateKind};

/// What a player's AI does each turn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum AiStrategy {
    /// No automatic orders
    Manual,
    /// Colonize, balance food and goods, collect research
    #[default]
    Expand,
    /// Like `Expand` without colonization
    Consolidate,
    /// Collect research only
    Amass,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Player {
    pub id: PlayerId,
    pub strategy: AiStrategy,
    pub research_points: f32,
}

impl Player {
    pub fn new(id: PlayerId) -> Self {
        Self {
            id,
            strategy: AiStrategy::default(),
            research_points: 0.0,
        }
    }
}

/// Read-only state the matcher works against
#[derive(Clone, Copy)]
pub struct MatchContext<'a> {
    pub planets: &'a [Planet],
    pub distances: &'a DistanceIndex,
    pub config: &'a EconomyConfig,
}

impl<'a> MatchContext<'a> {
    fn planet(&self, id: PlanetId) -> Option<&'a Planet> {
        self.planets.get(id.index())
    }

    /// Path cost from `from` to `to` if within the hop limit
    fn eligible_cost(&self, from: PlanetId, to: PlanetId) -> Option<f32> {
        let entry = self.distances.entry(from, to)?;
        (entry.node_count <= self.config.max_path_nodes).then_some(entry.cost)
    }

    fn travel_delay(&self, cost: f32) -> i32 {
        (cost / self.config.default_travel_speed).round() as i32
    }
}

/// A resource that moves between planets in bulk
struct ShipmentClass {
    surplus: UpdateKind,
    shortage: UpdateKind,
    transport: OrderKind,
    change: OrderKind,
    in_progress: OrderKind,
    incoming: fn(&Planet) -> bool,
}

fn food_incoming(planet: &Planet) -> bool {
    planet.food_transfer_in_progress
}

fn goods_incoming(planet: &Planet) -> bool {
    planet.goods_transfer_in_progress
}

const FOOD: ShipmentClass = ShipmentClass {
    surplus: UpdateKind::FoodSurplus,
    shortage: UpdateKind::FoodShortage,
    transport: OrderKind::FoodTransport,
    change: OrderKind::FoodChange,
    in_progress: OrderKind::FoodTransportInProgress,
    incoming: food_incoming,
};

const GOODS: ShipmentClass = ShipmentClass {
    surplus: UpdateKind::GoodsSurplus,
    shortage: UpdateKind::GoodsShortage,
    transport: OrderKind::GoodsTransport,
    change: OrderKind::GoodsChange,
    in_progress: OrderKind::GoodsTransportInProgress,
    incoming: goods_incoming,
};

/// All orders `player` issues for this turn's events
pub fn plan_turn(player: &mut Player, events: &[UpdateEvent], ctx: &MatchContext) -> Vec<Order> {
    let mut orders = Vec::new();
    match player.strategy {
        AiStrategy::Manual => {}
        AiStrategy::Expand => {
            orders.extend(match_colonizers(player.id, events, ctx));
            orders.extend(match_food(player.id, events, ctx));
            orders.extend(match_goods(player.id, events, ctx));
            orders.extend(collect_research(player, events, ctx));
        }
        AiStrategy::Consolidate => {
            orders.extend(match_food(player.id, events, ctx));
            orders.extend(match_goods(player.id, events, ctx));
            orders.extend(collect_research(player, events, ctx));
        }
        AiStrategy::Amass => {
            orders.extend(collect_research(player, events, ctx));
        }
    }
    if !orders.is_empty() {
        tracing::debug!("{} issued {} orders", player.id, orders.len());
    }
    orders
}

pub fn match_food(player: PlayerId, events: &[UpdateEvent], ctx: &MatchContext) -> Vec<Order> {
    match_shipments(player, events, ctx, &FOOD)
}

pub fn match_goods(player: PlayerId, events: &[UpdateEvent], ctx: &MatchContext) -> Vec<Order> {
    match_shipments(player, events, ctx, &GOODS)
}

fn match_shipments(
    player: PlayerId,
    events: &[UpdateEvent],
    ctx: &MatchContext,
    class: &ShipmentClass,
) -> Vec<Order> {
    let shortages: Vec<&UpdateEvent> = events
        .iter()
        .filter(|e| e.kind == class.shortage)
        .filter(|e| ctx.planet(e.planet).is_some_and(|p| !(class.incoming)(p)))
        .collect();
    if shortages.is_empty() {
        return Vec::new();
    }

    // Only planets holding some of the player's citizens can export for them
    let surpluses = events.iter().filter(|e| {
        e.kind == class.surplus
            && ctx
                .planet(e.planet)
                .is_some_and(|p| p.population_fraction(player) > 0.0)
    });

    let mut matrix = ScoreMatrix::new();
    let mut row_events = Vec::new();
    for surplus in surpluses {
        let candidates: Vec<Candidate> = shortages
            .iter()
            .filter_map(|shortage| {
                let cost = ctx.eligible_cost(surplus.planet, shortage.planet)?;
                Some(Candidate {
                    target: shortage.planet,
                    cost,
                    surplus: surplus.magnitude(),
                })
            })
            .collect();
        if !candidates.is_empty() {
            row_events.push(surplus);
            matrix.add_row(surplus.planet, candidates);
        }
    }

    let mut orders = Vec::new();
    for assignment in matrix.assign() {
        let Some(origin) = ctx.planet(assignment.origin) else {
            continue;
        };
        let amount = row_events[assignment.row].magnitude() * origin.population_fraction(player);
        if amount <= 0.0 {
            continue;
        }
        let delay = ctx.travel_delay(assignment.cost);
        orders.push(Order::delayed(
            class.transport,
            assignment.origin,
            assignment.target,
            Quantity::Float(amount),
            Some(player),
            delay,
        ));
        orders.push(Order::immediate(
            class.change,
            assignment.origin,
            assignment.origin,
            Quantity::Float(-amount),
            Some(player),
        ));
        orders.push(Order::immediate(
            class.in_progress,
            assignment.origin,
            assignment.target,
            Quantity::Float(amount),
            Some(player),
        ));
    }
    orders
}

fn is_colonizer(player: PlayerId, event: &UpdateEvent, ctx: &MatchContext) -> bool {
    if !matches!(event.kind, UpdateKind::PopulationGain | UpdateKind::PopulationMax) {
        return false;
    }
    ctx.planet(event.planet).is_some_and(|p| {
        p.owner == Some(player)
            && p.population_count() as f32
                >= p.max_population() as f32 * ctx.config.expand_population_trigger
    })
}

/// Empty planets, or unfilled ones `player` does not already lead
pub fn is_colonization_target(player: PlayerId, planet: &Planet) -> bool {
    if planet.has_population_transfer(player) {
        return false;
    }
    let count = planet.population_count();
    if count == 0 {
        return true;
    }
    if count >= planet.max_population() {
        return false;
    }
    planet.population.majority_player() != Some(player)
}

pub fn match_colonizers(player: PlayerId, events: &[UpdateEvent], ctx: &MatchContext) -> Vec<Order> {
    let colonizers: Vec<&UpdateEvent> = events
        .iter()
        .filter(|e| is_colonizer(player, e, ctx))
        .collect();
    if colonizers.is_empty() {
        return Vec::new();
    }

    let targets: Vec<&Planet> = ctx
        .planets
        .iter()
        .filter(|p| is_colonization_target(player, p))
        .collect();
    if targets.is_empty() {
        return Vec::new();
    }

    let mut matrix = ScoreMatrix::new();
    let mut row_events = Vec::new();
    for colonizer in colonizers {
        let candidates: Vec<Candidate> = targets
            .iter()
            .filter_map(|target| {
                let cost = ctx.eligible_cost(colonizer.planet, target.id)?;
                Some(Candidate {
                    target: target.id,
                    cost,
                    surplus: 1.0,
                })
            })
            .collect();
        if !candidates.is_empty() {
            row_events.push(colonizer);
            matrix.add_row(colonizer.planet, candidates);
        }
    }

    let mut orders = Vec::new();
    for assignment in matrix.assign() {
        let Some(origin) = ctx.planet(assignment.origin) else {
            continue;
        };
        let colonists = (row_events[assignment.row].magnitude()
            * origin.population_fraction(player))
        .round() as i32;
        if colonists <= 0 {
            continue;
        }
        tracing::debug!(
            "{} sends {} colonists from {} to planet {}",
            player,
            colonists,
            origin.name,
            assignment.target.0
        );
        let delay = ctx.travel_delay(assignment.cost);
        orders.push(Order::delayed(
            OrderKind::PopulationTransport,
            assignment.origin,
            assignment.target,
            Quantity::Int(colonists),
            Some(player),
            delay,
        ));
        orders.push(Order::immediate(
            OrderKind::PopulationChange,
            assignment.origin,
            assignment.origin,
            Quantity::Int(-colonists),
            Some(player),
        ));
        orders.push(Order::immediate(
            OrderKind::PopulationTransferInProgress,
            assignment.origin,
            assignment.target,
            Quantity::Int(colonists),
            Some(player),
        ));
    }
    orders
}

/// Move research produced on the player's planets into their pool
pub fn collect_research(
    player: &mut Player,
    events: &[UpdateEvent],
    ctx: &MatchContext,
) -> Vec<Order> {
    let mut orders = Vec::new();
    for event in events {
        if event.kind != UpdateKind::ResearchProduced || event.magnitude() <= 0.0 {
            continue;
        }
        let owned = ctx
            .planet(event.planet)
            .is_some_and(|p| p.owner == Some(player.id));
        if !owned {
            continue;
        }
        let amount = event.magnitude();
        player.research_points += amount;
        orders.push(Order::immediate(
            OrderKind::ResearchChange,
            event.planet,
            event.planet,
            Quantity::Float(-amount),
            Some(player.id),
        ));
    }
    orders
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::Vec2;
    use crate::graph::ConnectionGraph;
    use crate::orders::OrderTiming;
    use crate::planet::PlanetType;

    struct Board {
        planets: Vec<Planet>,
        distances: DistanceIndex,
        config: EconomyConfig,
    }

    impl Board {
        fn ctx(&self) -> MatchContext<'_> {
            MatchContext {
                planets: &self.planets,
                distances: &self.distances,
                config: &self.config,
            }
        }
    }

    /// Planets on a line 100 apart, all owned by player 0
    fn board(count: usize) -> Board {
        let config = EconomyConfig::default();
        let points: Vec<(String, Vec2)> = (0..count)
            .map(|i| (format!("P{}", i), Vec2::new(i as f32 * 100.0, 0.0)))
            .collect();
        let graph = ConnectionGraph::build(points.clone(), 150.0);
        let distances = DistanceIndex::build(&graph, usize::MAX);
        let data = config.planet_type_data(PlanetType::Normal).unwrap();
        let planets = points
            .into_iter()
            .enumerate()
            .map(|(i, (name, pos))| {
                let mut p = Planet::new(PlanetId(i as u32), name, pos, data, 100.0);
                p.claim(PlayerId(0));
                p
            })
            .collect();
        Board {
            planets,
            distances,
            config,
        }
    }

    fn event(planet: u32, kind: UpdateKind, amount: f32) -> UpdateEvent {
        UpdateEvent::new(PlanetId(planet), format!("P{}", planet), kind).with_amount(amount)
    }

    #[test]
    fn test_food_shipment_orders() {
        let board = board(2);
        let events = vec![
            event(0, UpdateKind::FoodSurplus, 30.0),
            event(1, UpdateKind::FoodShortage, 4.0),
        ];
        let orders = match_food(PlayerId(0), &events, &board.ctx());
        assert_eq!(orders.len(), 3);

        assert_eq!(orders[0].kind, OrderKind::FoodTransport);
        assert_eq!(orders[0].timing, OrderTiming::Delayed);
        assert_eq!(orders[0].delay, 10);
        assert_eq!(orders[0].total_delay, 10);
        assert_eq!(orders[0].quantity, Quantity::Float(30.0));

        assert_eq!(orders[1].kind, OrderKind::FoodChange);
        assert_eq!(orders[1].target, PlanetId(0));
        assert_eq!(orders[1].quantity, Quantity::Float(-30.0));

        assert_eq!(orders[2].kind, OrderKind::FoodTransportInProgress);
        assert_eq!(orders[2].target, PlanetId(1));
    }

    #[test]
    fn test_incoming_shipment_blocks_target() {
        let mut board = board(2);
        board.planets[1].food_transfer_in_progress = true;
        let events = vec![
            event(0, UpdateKind::FoodSurplus, 30.0),
            event(1, UpdateKind::FoodShortage, 4.0),
        ];
        assert!(match_food(PlayerId(0), &events, &board.ctx()).is_empty());
    }

    #[test]
    fn test_hop_limit() {
        let board = board(6);
        // P0 -> P5 needs 6 nodes, over the default limit of 4
        let events = vec![
            event(0, UpdateKind::GoodsSurplus, 30.0),
            event(5, UpdateKind::GoodsShortage, 4.0),
        ];
        assert!(match_goods(PlayerId(0), &events, &board.ctx()).is_empty());

        let events = vec![
            event(0, UpdateKind::GoodsSurplus, 30.0),
            event(3, UpdateKind::GoodsShortage, 4.0),
        ];
        assert_eq!(match_goods(PlayerId(0), &events, &board.ctx()).len(), 3);
    }

    #[test]
    fn test_export_scaled_by_population_fraction() {
        let mut board = board(2);
        // P0: 3 of player 0 plus 3 of player 1
        board.planets[0].add_population(Some(PlayerId(1)), 3);
        let events = vec![
            event(0, UpdateKind::FoodSurplus, 30.0),
            event(1, UpdateKind::FoodShortage, 4.0),
        ];
        let orders = match_food(PlayerId(0), &events, &board.ctx());
        assert_eq!(orders[0].quantity, Quantity::Float(15.0));
        assert!(match_food(PlayerId(2), &events, &board.ctx()).is_empty());
    }

    #[test]
    fn test_one_shipment_per_target() {
        let board = board(3);
        let events = vec![
            event(0, UpdateKind::FoodSurplus, 30.0),
            event(2, UpdateKind::FoodSurplus, 30.0),
            event(1, UpdateKind::FoodShortage, 4.0),
        ];
        let orders = match_food(PlayerId(0), &events, &board.ctx());
        let transports: Vec<_> = orders
            .iter()
            .filter(|o| o.kind == OrderKind::FoodTransport)
            .collect();
        assert_eq!(transports.len(), 1);
        // Equal scores resolve to the earlier surplus event
        assert_eq!(transports[0].origin, PlanetId(0));
    }

    #[test]
    fn test_colonizers_target_empty_planet() {
        let mut board = board(2);
        // Fill P0 past the trigger, empty P1
        board.planets[0].add_population(Some(PlayerId(0)), 7);
        board.planets[1].remove_population(Some(PlayerId(0)), 3);
        assert!(is_colonization_target(PlayerId(0), &board.planets[1]));

        let events = vec![event(0, UpdateKind::PopulationGain, 1.0)];
        let orders = match_colonizers(PlayerId(0), &events, &board.ctx());
        assert_eq!(orders.len(), 3);
        assert_eq!(orders[0].kind, OrderKind::PopulationTransport);
        assert_eq!(orders[0].quantity, Quantity::Int(1));
        assert_eq!(orders[1].quantity, Quantity::Int(-1));
        assert_eq!(orders[2].kind, OrderKind::PopulationTransferInProgress);
    }

    #[test]
    fn test_colonization_target_rules() {
        let mut board = board(1);
        let planet = &mut board.planets[0];
        // Player 0 leads already
        assert!(!is_colonization_target(PlayerId(0), planet));
        assert!(is_colonization_target(PlayerId(1), planet));
        planet.set_population_transfer(PlayerId(1), true);
        assert!(!is_colonization_target(PlayerId(1), planet));
        planet.set_population_transfer(PlayerId(1), false);
        planet.add_population(None, 9);
        // Full
        assert!(!is_colonization_target(PlayerId(1), planet));
    }

    #[test]
    fn test_small_planet_does_not_colonize() {
        let board = board(2);
        let events = vec![event(0, UpdateKind::PopulationGain, 1.0)];
        assert!(match_colonizers(PlayerId(0), &events, &board.ctx()).is_empty());
    }

    #[test]
    fn test_research_collected_from_owned_planets() {
        let mut board = board(2);
        board.planets[1].population.clear();
        board.planets[1].update_owner();
        let mut player = Player::new(PlayerId(0));
        let events = vec![
            event(0, UpdateKind::ResearchProduced, 2.5),
            event(1, UpdateKind::ResearchProduced, 4.0),
        ];
        let orders = collect_research(&mut player, &events, &board.ctx());
        assert_eq!(orders.len(), 1);
        assert_eq!(orders[0].quantity, Quantity::Float(-2.5));
        assert_eq!(player.research_points, 2.5);
    }

    #[test]
    fn test_strategy_selects_passes() {
        let board = board(2);
        let events = vec![
            event(0, UpdateKind::FoodSurplus, 30.0),
            event(1, UpdateKind::FoodShortage, 4.0),
            event(0, UpdateKind::ResearchProduced, 1.0),
        ];
        let mut player = Player::new(PlayerId(0));
        player.strategy = AiStrategy::Manual;
        assert!(plan_turn(&mut player, &events, &board.ctx()).is_empty());

        player.strategy = AiStrategy::Amass;
        let orders = plan_turn(&mut player, &events, &board.ctx());
        assert!(orders.iter().all(|o| o.kind == OrderKind::ResearchChange));

        player.strategy = AiStrategy::Consolidate;
        let orders = plan_turn(&mut player, &events, &board.ctx());
        assert_eq!(orders.len(), 4);
    }

    #[test]
    fn test_matching_is_deterministic() {
        let board = board(5);
        let events = vec![
            event(0, UpdateKind::FoodSurplus, 20.0),
            event(4, UpdateKind::FoodSurplus, 25.0),
            event(2, UpdateKind::FoodShortage, 4.0),
            event(3, UpdateKind::FoodShortage, 2.0),
        ];
        let first = match_food(PlayerId(0), &events, &board.ctx());
        let second = match_food(PlayerId(0), &events, &board.ctx());
        assert_eq!(first, second);
        assert_eq!(first.len(), 6);
    }
}
