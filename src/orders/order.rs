//! Scheduled state changes between planets

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::core::types::{PlanetId, PlayerId};

/// Order payload that keeps its numeric kind through serialization
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Quantity {
    Int(i32),
    Float(f32),
}

impl Quantity {
    pub fn as_f32(self) -> f32 {
        match self {
            Quantity::Int(n) => n as f32,
            Quantity::Float(x) => x,
        }
    }

    pub fn as_i32(self) -> i32 {
        match self {
            Quantity::Int(n) => n,
            Quantity::Float(x) => x.round() as i32,
        }
    }

    pub fn is_int(self) -> bool {
        matches!(self, Quantity::Int(_))
    }
}

impl fmt::Display for Quantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Quantity::Int(n) => write!(f, "{}", n),
            Quantity::Float(x) => write!(f, "{:.1}", x),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OrderKind {
    FoodTransport,
    FoodChange,
    FoodTransportInProgress,
    GoodsTransport,
    GoodsChange,
    GoodsTransportInProgress,
    PopulationTransport,
    PopulationChange,
    PopulationTransferInProgress,
    ResearchChange,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OrderTiming {
    /// Applied the turn it is issued
    Immediate,
    /// Queued until its delay runs out
    Delayed,
    /// Queued but never matured
    Held,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    pub kind: OrderKind,
    pub origin: PlanetId,
    /// Planet the order acts on
    pub target: PlanetId,
    pub quantity: Quantity,
    pub player: Option<PlayerId>,
    pub timing: OrderTiming,
    /// Turns left before the order matures
    pub delay: i32,
    pub total_delay: i32,
}

impl Order {
    pub fn immediate(
        kind: OrderKind,
        origin: PlanetId,
        target: PlanetId,
        quantity: Quantity,
        player: Option<PlayerId>,
    ) -> Self {
        Self {
            kind,
            origin,
            target,
            quantity,
            player,
            timing: OrderTiming::Immediate,
            delay: 0,
            total_delay: 0,
        }
    }

    pub fn delayed(
        kind: OrderKind,
        origin: PlanetId,
        target: PlanetId,
        quantity: Quantity,
        player: Option<PlayerId>,
        delay: i32,
    ) -> Self {
        Self {
            timing: OrderTiming::Delayed,
            delay,
            total_delay: delay,
            ..Self::immediate(kind, origin, target, quantity, player)
        }
    }

    /// Ready to apply: delay ran out and the order is not held
    pub fn is_matured(&self) -> bool {
        self.timing != OrderTiming::Held && self.delay <= 0
    }

    /// Fraction of the trip completed, `(total - remaining) / total`
    pub fn transit_progress(&self) -> f32 {
        if self.total_delay <= 0 {
            return 1.0;
        }
        let elapsed = (self.total_delay - self.delay.max(0)) as f32;
        (elapsed / self.total_delay as f32).clamp(0.0, 1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quantity_kinds() {
        assert!(Quantity::Int(3).is_int());
        assert!(!Quantity::Float(3.0).is_int());
        assert_eq!(Quantity::Int(3).as_f32(), 3.0);
        assert_eq!(Quantity::Float(2.6).as_i32(), 3);
    }

    #[test]
    fn test_quantity_serde_keeps_kind() {
        let json = serde_json::to_string(&vec![Quantity::Int(4), Quantity::Float(4.0)]).unwrap();
        let back: Vec<Quantity> = serde_json::from_str(&json).unwrap();
        assert_eq!(back, vec![Quantity::Int(4), Quantity::Float(4.0)]);
    }

    #[test]
    fn test_transit_progress() {
        let mut order = Order::delayed(
            OrderKind::FoodTransport,
            PlanetId(0),
            PlanetId(1),
            Quantity::Float(5.0),
            Some(PlayerId(0)),
            4,
        );
        assert_eq!(order.transit_progress(), 0.0);
        order.delay = 1;
        assert_eq!(order.transit_progress(), 0.75);

        let immediate = Order::immediate(
            OrderKind::FoodChange,
            PlanetId(0),
            PlanetId(0),
            Quantity::Float(-5.0),
            None,
        );
        assert_eq!(immediate.transit_progress(), 1.0);
        assert!(immediate.is_matured());
    }

    #[test]
    fn test_held_never_matures() {
        let mut order = Order::delayed(
            OrderKind::GoodsTransport,
            PlanetId(0),
            PlanetId(1),
            Quantity::Float(1.0),
            None,
            0,
        );
        order.timing = OrderTiming::Held;
        assert!(!order.is_matured());
    }
}
