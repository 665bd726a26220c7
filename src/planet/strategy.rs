//! Worker allocation policies
//!
//! Each strategy is a row in a fixed table: the order in which the
//! non-food resources are saturated after food, and where leftover workers
//! go. Food requirements are always met first.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PlanetStrategy {
    #[default]
    Balanced,
    Growth,
    Food,
    FocusedFood,
    Goods,
    FocusedGoods,
    Research,
    FocusedResearch,
    Industry,
    FocusedIndustry,
}

impl PlanetStrategy {
    pub const ALL: [PlanetStrategy; 10] = [
        Self::Balanced,
        Self::Growth,
        Self::Food,
        Self::FocusedFood,
        Self::Goods,
        Self::FocusedGoods,
        Self::Research,
        Self::FocusedResearch,
        Self::Industry,
        Self::FocusedIndustry,
    ];
}

/// The four resource classes a planet works on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ResourceKind {
    Food,
    /// Consumer goods; keep morale up
    Goods,
    Research,
    Industry,
}

/// Workers each resource wants; `None` means the resource cannot be
/// produced at all (zero rate or zero morale), `Some(0)` that nothing is needed
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WorkerRequirements {
    pub food: Option<u32>,
    pub goods: Option<u32>,
    pub research: Option<u32>,
    pub industry: Option<u32>,
}

impl WorkerRequirements {
    pub fn get(&self, kind: ResourceKind) -> Option<u32> {
        match kind {
            ResourceKind::Food => self.food,
            ResourceKind::Goods => self.goods,
            ResourceKind::Research => self.research,
            ResourceKind::Industry => self.industry,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkerAllocation {
    pub food: u32,
    pub goods: u32,
    pub research: u32,
    pub industry: u32,
}

impl WorkerAllocation {
    pub fn get(&self, kind: ResourceKind) -> u32 {
        match kind {
            ResourceKind::Food => self.food,
            ResourceKind::Goods => self.goods,
            ResourceKind::Research => self.research,
            ResourceKind::Industry => self.industry,
        }
    }

    fn slot(&mut self, kind: ResourceKind) -> &mut u32 {
        match kind {
            ResourceKind::Food => &mut self.food,
            ResourceKind::Goods => &mut self.goods,
            ResourceKind::Research => &mut self.research,
            ResourceKind::Industry => &mut self.industry,
        }
    }

    pub fn total(&self) -> u32 {
        self.food + self.goods + self.research + self.industry
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Remainder {
    /// Half to food, half to industry, odd worker to food
    SplitFoodIndustry,
    To(ResourceKind),
}

#[derive(Debug, Clone, Copy)]
struct AllocationRule {
    order: [ResourceKind; 3],
    remainder: Remainder,
}

const fn rule(order: [ResourceKind; 3], remainder: Remainder) -> AllocationRule {
    AllocationRule { order, remainder }
}

use ResourceKind::{Food as F, Goods as G, Industry as I, Research as R};

/// Indexed by `PlanetStrategy as usize`
const ALLOCATION_TABLE: [AllocationRule; 10] = [
    rule([G, I, R], Remainder::SplitFoodIndustry), // Balanced
    rule([G, I, R], Remainder::To(F)),             // Growth
    rule([G, I, R], Remainder::To(F)),             // Food
    rule([G, I, R], Remainder::To(F)),             // FocusedFood
    rule([G, I, R], Remainder::To(G)),             // Goods
    rule([G, I, R], Remainder::To(G)),             // FocusedGoods
    rule([R, G, I], Remainder::To(R)),             // Research
    rule([R, G, I], Remainder::To(R)),             // FocusedResearch
    rule([I, R, G], Remainder::To(I)),             // Industry
    rule([I, R, G], Remainder::To(I)),             // FocusedIndustry
];

/// Divide `population` workers among the four resources
///
/// Every worker is assigned: the result always sums to `population`.
pub fn allocate(
    strategy: PlanetStrategy,
    population: u32,
    requirements: &WorkerRequirements,
) -> WorkerAllocation {
    let rule = ALLOCATION_TABLE[strategy as usize];
    let mut allocation = WorkerAllocation {
        food: requirements.food.unwrap_or(0).min(population),
        ..Default::default()
    };
    let mut remaining = population - allocation.food;

    for kind in rule.order {
        let assigned = requirements.get(kind).unwrap_or(0).min(remaining);
        *allocation.slot(kind) = assigned;
        remaining -= assigned;
    }

    match rule.remainder {
        Remainder::SplitFoodIndustry => {
            let half = remaining / 2;
            allocation.food += half + remaining % 2;
            allocation.industry += half;
        }
        Remainder::To(kind) => *allocation.slot(kind) += remaining,
    }

    allocation
}

/// Workers needed to produce `requirement` units per turn
///
/// `ceil(requirement / (rate * morale / baseline))`, clamped to the population.
pub fn worker_requirement(
    requirement: f32,
    production_rate: f32,
    morale: f32,
    baseline_morale: f32,
    population: u32,
) -> Option<u32> {
    if production_rate <= 0.0 || morale <= 0.0 || baseline_morale <= 0.0 {
        return None;
    }
    if requirement <= 0.0 {
        return Some(0);
    }
    let effective_rate = production_rate * (morale / baseline_morale);
    let workers = (requirement / effective_rate).ceil();
    Some((workers.max(0.0) as u32).min(population))
}
