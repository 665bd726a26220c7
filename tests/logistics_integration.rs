//! Integration tests for the logistics matcher and order scheduling

use orbital_economy::core::config::EconomyConfig;
use orbital_economy::core::types::{PlanetId, PlayerId, Vec2};
use orbital_economy::graph::{ConnectionGraph, DistanceIndex};
use orbital_economy::logistics::{match_colonizers, match_food, MatchContext};
use orbital_economy::orders::{OrderKind, OrderQueue, OrderTiming, Quantity};
use orbital_economy::planet::{Planet, PlanetType, UpdateEvent, UpdateKind};

const P0: PlayerId = PlayerId(0);

fn planet(config: &EconomyConfig, id: u32, name: &str, planet_type: PlanetType, x: f32) -> Planet {
    let data = config.planet_type_data(planet_type).unwrap();
    let mut planet = Planet::new(
        PlanetId(id),
        name,
        Vec2::new(x, 0.0),
        data,
        config.baseline_morale,
    );
    planet.population.clear();
    planet
}

fn line_graph(planets: &[Planet], max_distance: f32) -> (ConnectionGraph, DistanceIndex) {
    let graph = ConnectionGraph::build(
        planets.iter().map(|p| (p.name.clone(), p.position)),
        max_distance,
    );
    let index = DistanceIndex::build(&graph, 64);
    (graph, index)
}

fn approx(a: f32, b: f32) -> bool {
    (a - b).abs() < 1e-3
}

// ============================================================================
// Food shipments
// ============================================================================

/// A exports to B over a single 100-unit edge at speed 10
fn two_planet_setup(config: &EconomyConfig) -> Vec<Planet> {
    let mut a = planet(config, 0, "A", PlanetType::Normal, 0.0);
    a.add_population(Some(P0), 4);
    a.add_population(None, 1);
    a.food = 50.0;

    let mut b = planet(config, 1, "B", PlanetType::Normal, 100.0);
    b.add_population(Some(P0), 5);
    b.food = 2.0;

    vec![a, b]
}

fn food_events() -> Vec<UpdateEvent> {
    vec![
        UpdateEvent::new(PlanetId(0), "A", UpdateKind::FoodSurplus).with_amount(30.0),
        UpdateEvent::new(PlanetId(1), "B", UpdateKind::FoodShortage).with_amount(3.0),
    ]
}

#[test]
fn test_food_shipment_orders() {
    let config = EconomyConfig::default();
    let planets = two_planet_setup(&config);
    let (_graph, index) = line_graph(&planets, 150.0);
    let ctx = MatchContext {
        planets: &planets,
        distances: &index,
        config: &config,
    };

    let orders = match_food(P0, &food_events(), &ctx);
    assert_eq!(orders.len(), 3);

    let transport = &orders[0];
    assert_eq!(transport.kind, OrderKind::FoodTransport);
    assert_eq!(transport.timing, OrderTiming::Delayed);
    assert_eq!(transport.origin, PlanetId(0));
    assert_eq!(transport.target, PlanetId(1));
    assert_eq!(transport.delay, 10);
    // 30 surplus scaled by A's 4/5 share of player 0
    assert!(approx(transport.quantity.as_f32(), 24.0));

    let deduction = &orders[1];
    assert_eq!(deduction.kind, OrderKind::FoodChange);
    assert_eq!(deduction.timing, OrderTiming::Immediate);
    assert_eq!(deduction.target, PlanetId(0));
    assert!(approx(deduction.quantity.as_f32(), -24.0));

    let flag = &orders[2];
    assert_eq!(flag.kind, OrderKind::FoodTransportInProgress);
    assert_eq!(flag.target, PlanetId(1));
}

#[test]
fn test_food_shipment_lifecycle() {
    let config = EconomyConfig::default();
    let mut planets = two_planet_setup(&config);
    let (_graph, index) = line_graph(&planets, 150.0);
    let events = food_events();

    let orders = {
        let ctx = MatchContext {
            planets: &planets,
            distances: &index,
            config: &config,
        };
        match_food(P0, &events, &ctx)
    };
    let mut queue = OrderQueue::new();
    queue.submit(orders, &mut planets);

    assert!(approx(planets[0].food, 26.0));
    assert!(planets[1].food_transfer_in_progress);
    assert_eq!(queue.len(), 1);

    // The incoming flag keeps B out of a second pass
    {
        let ctx = MatchContext {
            planets: &planets,
            distances: &index,
            config: &config,
        };
        assert!(match_food(P0, &events, &ctx).is_empty());
    }

    for _ in 0..9 {
        assert_eq!(queue.process(&mut planets), 0);
    }
    assert!(approx(planets[1].food, 2.0));
    assert!(approx(queue.orders()[0].transit_progress(), 0.9));

    assert_eq!(queue.process(&mut planets), 1);
    assert!(queue.is_empty());
    assert!(approx(planets[1].food, 26.0));
    assert!(!planets[1].food_transfer_in_progress);
}

#[test]
fn test_surplus_without_citizens_not_exported() {
    let config = EconomyConfig::default();
    let mut planets = two_planet_setup(&config);
    planets[0].population.clear();
    planets[0].add_population(Some(PlayerId(1)), 5);
    let (_graph, index) = line_graph(&planets, 150.0);
    let ctx = MatchContext {
        planets: &planets,
        distances: &index,
        config: &config,
    };
    assert!(match_food(P0, &food_events(), &ctx).is_empty());
}

#[test]
fn test_hop_limit_blocks_long_routes() {
    let config = EconomyConfig {
        max_path_nodes: 2,
        ..Default::default()
    };
    let mut planets = two_planet_setup(&config);
    // Move B out of direct range and bridge through a relay
    planets[1].position = Vec2::new(200.0, 0.0);
    planets.push(planet(&config, 2, "Relay", PlanetType::Desolate, 100.0));
    let (_graph, index) = line_graph(&planets, 150.0);

    let entry = index.entry(PlanetId(0), PlanetId(1)).unwrap();
    assert_eq!(entry.node_count, 3);

    let ctx = MatchContext {
        planets: &planets,
        distances: &index,
        config: &config,
    };
    assert!(match_food(P0, &food_events(), &ctx).is_empty());
}

// ============================================================================
// Colonization
// ============================================================================

#[test]
fn test_crowded_planet_sends_colonists() {
    let config = EconomyConfig::default();
    let mut home = planet(&config, 0, "Home", PlanetType::Normal, 0.0);
    home.add_population(Some(P0), 9);
    let empty = planet(&config, 1, "Rock", PlanetType::Desolate, 100.0);
    let mut planets = vec![home, empty];
    let (_graph, index) = line_graph(&planets, 150.0);

    let events = vec![UpdateEvent::new(PlanetId(0), "Home", UpdateKind::PopulationGain)
        .with_amount(2.0)
        .with_player(Some(P0))];
    let orders = {
        let ctx = MatchContext {
            planets: &planets,
            distances: &index,
            config: &config,
        };
        match_colonizers(P0, &events, &ctx)
    };
    assert_eq!(orders.len(), 3);
    assert_eq!(orders[0].kind, OrderKind::PopulationTransport);
    assert_eq!(orders[0].quantity, Quantity::Int(2));
    assert_eq!(orders[0].target, PlanetId(1));

    let mut queue = OrderQueue::new();
    queue.submit(orders, &mut planets);
    assert_eq!(planets[0].population_count(), 7);
    assert!(planets[1].has_population_transfer(P0));

    while !queue.is_empty() {
        queue.process(&mut planets);
    }
    assert_eq!(planets[1].population_count(), 2);
    assert_eq!(planets[1].owner, Some(P0));
    assert!(!planets[1].has_population_transfer(P0));
}
