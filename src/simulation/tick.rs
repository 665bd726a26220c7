//! Economy tick - runs production and consumption on every planet
//!
//! Planets update one after another in arena order because they share the
//! turn's random source; the order of draws must not depend on scheduling.
//! The collected events are sorted by priority before anyone reads them.

use rand::Rng;

use crate::core::config::EconomyConfig;
use crate::planet::{sort_by_priority, Planet, UpdateEvent, UpdateKind};

/// Update every planet once and return the priority-ordered event stream
pub fn run_economy_tick<R: Rng + ?Sized>(
    planets: &mut [Planet],
    config: &EconomyConfig,
    rng: &mut R,
) -> Vec<UpdateEvent> {
    let mut events = Vec::with_capacity(planets.len() * 4);
    for planet in planets.iter_mut() {
        planet.update(config, rng, &mut events);
    }
    sort_by_priority(&mut events);

    let deaths = events.iter().filter(|e| e.kind == UpdateKind::Dead).count();
    tracing::debug!(
        "Economy tick: {} planets, {} events, {} deaths",
        planets.len(),
        events.len(),
        deaths
    );
    events
}
