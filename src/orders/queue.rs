//! Order queue and scheduler
//!
//! Delayed orders wait here while their countdown runs. Every turn the
//! countdown of each non-held order drops by one and matured orders are
//! applied to their target planet and retired.

use serde::{Deserialize, Serialize};

use super::order::{Order, OrderKind, OrderTiming};
use crate::planet::Planet;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OrderQueue {
    orders: Vec<Order>,
}

impl OrderQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.orders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.orders.is_empty()
    }

    pub fn orders(&self) -> &[Order] {
        &self.orders
    }

    pub fn push(&mut self, order: Order) {
        self.orders.push(order);
    }

    pub fn clear(&mut self) {
        self.orders.clear();
    }

    /// Tick every pending countdown and take out the matured orders
    pub fn advance(&mut self) -> Vec<Order> {
        for order in &mut self.orders {
            if order.timing != OrderTiming::Held {
                order.delay -= 1;
            }
        }
        let (matured, pending): (Vec<Order>, Vec<Order>) = std::mem::take(&mut self.orders)
            .into_iter()
            .partition(Order::is_matured);
        self.orders = pending;
        matured
    }

    /// Run one scheduler step: advance and apply everything that matured
    pub fn process(&mut self, planets: &mut [Planet]) -> usize {
        let matured = self.advance();
        for order in &matured {
            tracing::debug!(
                "Order matured: {:?} {} -> {} ({})",
                order.kind,
                order.origin.0,
                order.target.0,
                order.quantity
            );
            apply_order(order, planets);
        }
        matured.len()
    }

    /// Apply immediate orders now and queue the rest
    pub fn submit<I>(&mut self, orders: I, planets: &mut [Planet])
    where
        I: IntoIterator<Item = Order>,
    {
        for order in orders {
            match order.timing {
                OrderTiming::Immediate => {
                    apply_order(&order, planets);
                }
                OrderTiming::Delayed | OrderTiming::Held => self.orders.push(order),
            }
        }
    }
}

/// Apply one order to its target planet; false if the target is missing
pub fn apply_order(order: &Order, planets: &mut [Planet]) -> bool {
    let Some(planet) = planets.get_mut(order.target.index()) else {
        tracing::warn!("Order {:?} targets unknown planet {}", order.kind, order.target.0);
        return false;
    };

    let amount = order.quantity.as_f32();
    match order.kind {
        OrderKind::FoodTransport => {
            planet.change_food(amount);
            planet.food_transfer_in_progress = false;
        }
        OrderKind::FoodChange => planet.change_food(amount),
        OrderKind::FoodTransportInProgress => planet.food_transfer_in_progress = true,

        OrderKind::GoodsTransport => {
            planet.change_goods(amount);
            planet.goods_transfer_in_progress = false;
        }
        OrderKind::GoodsChange => planet.change_goods(amount),
        OrderKind::GoodsTransportInProgress => planet.goods_transfer_in_progress = true,

        OrderKind::PopulationTransport => {
            let count = order.quantity.as_i32().max(0) as u32;
            planet.add_population(order.player, count);
            if let Some(player) = order.player {
                planet.set_population_transfer(player, false);
            }
        }
        OrderKind::PopulationChange => {
            let count = order.quantity.as_i32();
            if count < 0 {
                planet.remove_population(order.player, count.unsigned_abs());
            } else {
                planet.add_population(order.player, count as u32);
            }
        }
        OrderKind::PopulationTransferInProgress => {
            if let Some(player) = order.player {
                planet.set_population_transfer(player, true);
            }
        }

        OrderKind::ResearchChange => planet.change_research(amount),
    }
    true
}
