//! Update events emitted by planet production and consumption

use serde::{Deserialize, Serialize};

use crate::core::types::{PlanetId, PlayerId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum UpdateKind {
    /// Last inhabitant is gone
    Dead,
    PopulationGain,
    PopulationLoss,
    PopulationMax,
    PopulationSurplus,
    FoodShortage,
    FoodSurplus,
    GoodsShortage,
    GoodsSurplus,
    IndustrySurplus,
    ProductionComplete,
    ResearchProduced,
}

/// Processing order of events; higher runs first
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum EventPriority {
    None,
    Low,
    Medium,
    High,
    Urgent,
}

impl UpdateKind {
    pub fn priority(self) -> EventPriority {
        match self {
            UpdateKind::PopulationLoss => EventPriority::Urgent,
            UpdateKind::Dead
            | UpdateKind::PopulationMax
            | UpdateKind::PopulationSurplus
            | UpdateKind::FoodShortage
            | UpdateKind::GoodsShortage
            | UpdateKind::ProductionComplete => EventPriority::High,
            UpdateKind::PopulationGain
            | UpdateKind::FoodSurplus
            | UpdateKind::IndustrySurplus
            | UpdateKind::ResearchProduced => EventPriority::Medium,
            UpdateKind::GoodsSurplus => EventPriority::Low,
        }
    }
}

/// One result of a planet update
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UpdateEvent {
    pub planet: PlanetId,
    pub planet_name: String,
    pub kind: UpdateKind,
    /// Magnitude of the change; `None` for events without one
    pub amount: Option<f32>,
    /// Player whose inhabitant was gained or lost
    pub player: Option<PlayerId>,
    /// Finished item for `ProductionComplete`
    pub item: Option<String>,
}

impl UpdateEvent {
    pub fn new(planet: PlanetId, planet_name: impl Into<String>, kind: UpdateKind) -> Self {
        Self {
            planet,
            planet_name: planet_name.into(),
            kind,
            amount: None,
            player: None,
            item: None,
        }
    }

    pub fn with_amount(mut self, amount: f32) -> Self {
        self.amount = Some(amount);
        self
    }

    pub fn with_player(mut self, player: Option<PlayerId>) -> Self {
        self.player = player;
        self
    }

    pub fn with_item(mut self, item: impl Into<String>) -> Self {
        self.item = Some(item.into());
        self
    }

    pub fn priority(&self) -> EventPriority {
        self.kind.priority()
    }

    /// Payload magnitude, zero when absent
    pub fn magnitude(&self) -> f32 {
        self.amount.unwrap_or(0.0)
    }
}

/// Stable sort, highest priority first; equal priorities keep emission order
pub fn sort_by_priority(events: &mut [UpdateEvent]) {
    events.sort_by_key(|e| std::cmp::Reverse(e.priority()));
}
