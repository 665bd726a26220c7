//! Economy Simulator
//! Runs the AI players on a board for a number of turns and reports planet ledgers

use clap::Parser;
use orbital_economy::core::config::EconomyConfig;
use orbital_economy::core::error::{EconomyError, Result};
use orbital_economy::persistence::{BoardLayout, GameSnapshot};
use orbital_economy::planet::ProductionCatalog;
use orbital_economy::simulation::Simulation;
use std::path::PathBuf;

/// Economy Simulator - AI players trade food, goods and colonists
#[derive(Parser, Debug)]
#[command(name = "economy_sim")]
#[command(about = "Run a multi-planet economy simulation")]
struct Args {
    /// Board layout JSON (defaults to the built-in demo board)
    #[arg(long)]
    board: Option<PathBuf>,

    /// Economy configuration TOML
    #[arg(long)]
    config: Option<PathBuf>,

    /// Number of turns to run
    #[arg(long, default_value_t = 50)]
    turns: u32,

    /// Production catalog TOML (defaults to the built-in items)
    #[arg(long)]
    catalog: Option<PathBuf>,

    /// Queue a catalog item before the first turn, as PLANET=ITEM (repeatable)
    #[arg(long = "build", value_name = "PLANET=ITEM")]
    builds: Vec<String>,

    /// Random seed, overrides the config file
    #[arg(long)]
    seed: Option<u64>,

    /// Resume from a snapshot
    #[arg(long)]
    load: Option<PathBuf>,

    /// Write a snapshot when done
    #[arg(long)]
    save: Option<PathBuf>,

    /// Print a report every N turns (0 = only at the end)
    #[arg(long, default_value_t = 10)]
    report_every: u32,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter("orbital_economy=info")
        .init();

    let args = Args::parse();

    let board = match &args.board {
        Some(path) => BoardLayout::load(path)?,
        None => BoardLayout::demo(),
    };
    let mut config = match &args.config {
        Some(path) => EconomyConfig::load(path)?,
        None => EconomyConfig::default(),
    };
    if let Some(seed) = args.seed {
        config.seed = seed;
    }

    let mut sim = Simulation::initialize(&board, config)?;
    if let Some(path) = &args.load {
        let snapshot = GameSnapshot::load(path)?;
        sim.restore_snapshot(&snapshot)?;
    }
    if let Some(path) = &args.catalog {
        sim.set_catalog(ProductionCatalog::load_from_toml(path)?);
    }
    for build in &args.builds {
        let Some((planet, item)) = build.split_once('=') else {
            return Err(EconomyError::InvalidConfig(format!(
                "--build expects PLANET=ITEM, got {}",
                build
            )));
        };
        sim.build(planet.trim(), item.trim())?;
    }

    println!("=== ECONOMY SIMULATION ===");
    println!(
        "{} planets, {} players, {} turns from turn {}",
        sim.planets().len(),
        sim.players().len(),
        args.turns,
        sim.turn()
    );

    for _ in 0..args.turns {
        sim.advance_turn();
        if args.report_every > 0 && sim.turn() % args.report_every == 0 {
            print_report(&sim);
        }
    }
    if args.report_every == 0 || sim.turn() % args.report_every != 0 {
        print_report(&sim);
    }

    if let Some(path) = &args.save {
        sim.export_snapshot().save(path)?;
        println!("Saved snapshot to {}", path.display());
    }

    Ok(())
}

fn print_report(sim: &Simulation) {
    println!("\n--- Turn {} ---", sim.turn());
    println!(
        "{:<10} {:<10} {:>5} {:>8} {:>8} {:>8} {:>7}  owner",
        "planet", "type", "pop", "food", "goods", "industry", "morale"
    );
    for planet in sim.planets() {
        let owner = planet
            .owner
            .map(|p| p.to_string())
            .unwrap_or_else(|| "-".into());
        println!(
            "{:<10} {:<10} {:>5} {:>8.1} {:>8.1} {:>8.1} {:>7.1}  {}",
            planet.name,
            format!("{:?}", planet.planet_type),
            planet.population_count(),
            planet.food,
            planet.goods,
            planet.industry,
            planet.morale,
            owner
        );
    }

    for player in sim.players() {
        let owned = sim.owned_planets(player.id).count();
        println!(
            "{}: {:?}, {} planets, {} inhabitants, {:.1} research",
            player.id,
            player.strategy,
            owned,
            sim.player_population(player.id),
            player.research_points
        );
    }

    let orders = sim.current_orders();
    if !orders.is_empty() {
        println!("{} orders in transit:", orders.len());
        for view in orders {
            println!(
                "  {:?} {} -> {} ({}) {:.0}%",
                view.order.kind,
                view.origin,
                view.target,
                view.order.quantity,
                view.progress * 100.0
            );
        }
    }
}
