//! Economy configuration with documented constants
//!
//! All tunable numbers live here. Nothing in the simulation hard-codes a
//! production rate, storage cap or AI threshold; they are read from an
//! `EconomyConfig` that can be loaded from TOML.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::core::error::{EconomyError, Result};
use crate::planet::{PlanetStrategy, PlanetType};

/// Per-strategy multipliers applied to the population when computing
/// how many workers a resource needs
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StrategyModifiers {
    pub strategy: PlanetStrategy,
    #[serde(default = "one")]
    pub food: f32,
    #[serde(default = "one")]
    pub goods: f32,
    #[serde(default = "one")]
    pub research: f32,
    #[serde(default = "one")]
    pub industry: f32,
}

fn one() -> f32 {
    1.0
}

impl StrategyModifiers {
    /// Modifiers of 1.0 for every resource
    pub fn neutral(strategy: PlanetStrategy) -> Self {
        Self {
            strategy,
            food: 1.0,
            goods: 1.0,
            research: 1.0,
            industry: 1.0,
        }
    }
}

/// Static resource data for one planet type
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanetTypeData {
    pub planet_type: PlanetType,
    pub initial_population: u32,
    pub initial_food: f32,
    pub initial_goods: f32,
    /// Units produced per worker per turn at baseline morale
    pub food_production: f32,
    pub goods_production: f32,
    pub industry_production: f32,
    pub research_production: f32,
    pub max_population: u32,
    pub initial_strategy: PlanetStrategy,
    #[serde(default = "default_storage")]
    pub max_food_storage: f32,
    #[serde(default = "default_storage")]
    pub max_goods_storage: f32,
}

fn default_storage() -> f32 {
    600.0
}

/// Configuration for the economy simulation
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EconomyConfig {
    // === MORALE ===
    /// Morale gained when goods demand is met, lost when it is not
    pub morale_step: f32,

    /// Morale every planet starts at; production is scaled by morale / baseline
    pub baseline_morale: f32,

    /// Upper morale clamp (lower clamp is always 0)
    pub max_morale: f32,

    // === POPULATION ===
    /// Food left after feeding everyone that buys one new inhabitant
    pub food_for_new_population: f32,

    /// Fraction of max population a planet must reach before it sends colonists
    pub expand_population_trigger: f32,

    // === LOGISTICS ===
    /// Distance units travelled per turn; converts path cost into order delay
    pub default_travel_speed: f32,

    /// Paths with more nodes than this are not eligible for shipments
    pub max_path_nodes: usize,

    /// Locations closer than this are connected by an edge
    pub max_connection_distance: f32,

    /// Planet count at which the distance index is built in parallel
    pub parallel_threshold: usize,

    // === DETERMINISM ===
    /// Seed for the shared random source (population loss/gain owner picks)
    pub seed: u64,

    // === TABLES ===
    pub strategy_modifiers: Vec<StrategyModifiers>,
    pub planet_types: Vec<PlanetTypeData>,
}

impl Default for EconomyConfig {
    fn default() -> Self {
        Self {
            morale_step: 5.0,
            baseline_morale: 100.0,
            max_morale: 200.0,

            food_for_new_population: 10.0,
            expand_population_trigger: 0.75,

            default_travel_speed: 10.0,
            max_path_nodes: 4,
            max_connection_distance: 400.0,
            parallel_threshold: 64,

            seed: 42,

            strategy_modifiers: default_strategy_modifiers(),
            planet_types: default_planet_types(),
        }
    }
}

fn default_strategy_modifiers() -> Vec<StrategyModifiers> {
    use PlanetStrategy::*;
    let with = |strategy, food, goods, research, industry| StrategyModifiers {
        strategy,
        food,
        goods,
        research,
        industry,
    };
    vec![
        StrategyModifiers::neutral(Balanced),
        with(Growth, 2.0, 1.0, 1.0, 1.0),
        with(Food, 2.0, 1.0, 1.0, 1.0),
        with(FocusedFood, 3.0, 1.0, 1.0, 1.0),
        with(Goods, 1.0, 2.0, 1.0, 1.0),
        with(FocusedGoods, 1.0, 3.0, 1.0, 1.0),
        with(Research, 1.0, 1.0, 2.0, 1.0),
        with(FocusedResearch, 1.0, 1.0, 3.0, 1.0),
        with(Industry, 1.0, 1.0, 1.0, 2.0),
        with(FocusedIndustry, 1.0, 1.0, 1.0, 3.0),
    ]
}

fn default_planet_types() -> Vec<PlanetTypeData> {
    use PlanetStrategy as S;
    use PlanetType as T;
    #[allow(clippy::too_many_arguments)]
    fn data(
        planet_type: PlanetType,
        initial_population: u32,
        initial_food: f32,
        initial_goods: f32,
        rates: [f32; 4],
        max_population: u32,
        initial_strategy: PlanetStrategy,
    ) -> PlanetTypeData {
        PlanetTypeData {
            planet_type,
            initial_population,
            initial_food,
            initial_goods,
            food_production: rates[0],
            goods_production: rates[1],
            industry_production: rates[2],
            research_production: rates[3],
            max_population,
            initial_strategy,
            max_food_storage: default_storage(),
            max_goods_storage: default_storage(),
        }
    }
    vec![
        data(T::Prime, 10, 50.0, 50.0, [1.5, 1.5, 1.0, 1.0], 20, S::Balanced),
        data(T::Normal, 3, 20.0, 20.0, [1.2, 1.0, 0.8, 0.8], 12, S::Balanced),
        data(T::Farm, 3, 30.0, 10.0, [2.0, 0.8, 0.5, 0.5], 15, S::Food),
        data(T::Verdant, 4, 30.0, 20.0, [1.8, 1.2, 0.6, 0.8], 18, S::Growth),
        data(T::Industrial, 2, 10.0, 20.0, [0.8, 1.5, 2.0, 0.6], 10, S::Industry),
        data(T::Desolate, 0, 0.0, 0.0, [0.5, 0.5, 1.0, 0.5], 5, S::Balanced),
        data(T::Ocean, 2, 20.0, 10.0, [1.5, 0.8, 0.5, 1.2], 10, S::Research),
        data(T::Desert, 1, 5.0, 15.0, [0.6, 1.2, 1.2, 0.8], 6, S::Goods),
    ]
}

impl EconomyConfig {
    /// Create a new config with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a config from TOML; missing keys fall back to defaults
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: EconomyConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load a config from a TOML file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Modifiers for a strategy; a missing entry means 1.0 everywhere
    pub fn modifiers_for(&self, strategy: PlanetStrategy) -> StrategyModifiers {
        self.strategy_modifiers
            .iter()
            .find(|m| m.strategy == strategy)
            .copied()
            .unwrap_or_else(|| StrategyModifiers::neutral(strategy))
    }

    /// Resource data for a planet type
    pub fn planet_type_data(&self, planet_type: PlanetType) -> Result<&PlanetTypeData> {
        self.planet_types
            .iter()
            .find(|d| d.planet_type == planet_type)
            .ok_or(EconomyError::UnknownPlanetType(planet_type))
    }

    /// Validate configuration for internal consistency
    pub fn validate(&self) -> Result<()> {
        if self.default_travel_speed <= 0.0 {
            return Err(EconomyError::InvalidConfig(format!(
                "default_travel_speed ({}) must be positive",
                self.default_travel_speed
            )));
        }

        if self.expand_population_trigger <= 0.0 || self.expand_population_trigger > 1.0 {
            return Err(EconomyError::InvalidConfig(format!(
                "expand_population_trigger ({}) must be in (0, 1]",
                self.expand_population_trigger
            )));
        }

        if self.max_morale <= 0.0 || self.baseline_morale <= 0.0 {
            return Err(EconomyError::InvalidConfig(
                "morale bounds must be positive".into(),
            ));
        }

        if self.max_path_nodes == 0 {
            return Err(EconomyError::InvalidConfig(
                "max_path_nodes must be at least 1".into(),
            ));
        }

        for (i, data) in self.planet_types.iter().enumerate() {
            if self.planet_types[..i]
                .iter()
                .any(|d| d.planet_type == data.planet_type)
            {
                return Err(EconomyError::InvalidConfig(format!(
                    "duplicate resource data for planet type {:?}",
                    data.planet_type
                )));
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(EconomyConfig::default().validate().is_ok());
    }

    #[test]
    fn test_missing_modifier_is_neutral() {
        let mut config = EconomyConfig::default();
        config.strategy_modifiers.clear();
        let modifiers = config.modifiers_for(PlanetStrategy::FocusedFood);
        assert_eq!(modifiers, StrategyModifiers::neutral(PlanetStrategy::FocusedFood));
    }

    #[test]
    fn test_every_planet_type_has_data() {
        let config = EconomyConfig::default();
        for planet_type in PlanetType::ALL {
            assert!(config.planet_type_data(planet_type).is_ok());
        }
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let config = EconomyConfig::from_toml_str(
            r#"
            morale_step = 2.5
            default_travel_speed = 20.0
            "#,
        )
        .unwrap();
        assert_eq!(config.morale_step, 2.5);
        assert_eq!(config.default_travel_speed, 20.0);
        assert_eq!(config.max_path_nodes, 4);
        assert_eq!(config.planet_types.len(), 8);
    }

    #[test]
    fn test_toml_strategy_table() {
        let config = EconomyConfig::from_toml_str(
            r#"
            [[strategy_modifiers]]
            strategy = "FocusedIndustry"
            industry = 4.0
            "#,
        )
        .unwrap();
        let modifiers = config.modifiers_for(PlanetStrategy::FocusedIndustry);
        assert_eq!(modifiers.industry, 4.0);
        assert_eq!(modifiers.food, 1.0);
        // Table replaced wholesale, other strategies fall back to neutral
        assert_eq!(config.modifiers_for(PlanetStrategy::Food).food, 1.0);
    }

    #[test]
    fn test_invalid_travel_speed_rejected() {
        let config = EconomyConfig {
            default_travel_speed: 0.0,
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(EconomyError::InvalidConfig(_))));
    }

    #[test]
    fn test_duplicate_planet_type_rejected() {
        let mut config = EconomyConfig::default();
        let dup = config.planet_types[0].clone();
        config.planet_types.push(dup);
        assert!(config.validate().is_err());
    }
}
