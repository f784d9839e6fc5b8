//! Active order state machine
//!
//! Pure transitions, no timers. The engine decides *when* a transition is
//! attempted; this module decides *whether* it applies.
//!
//! ```text
//! Preparing ──(preparation delay)──▶ Delivering ──(tick × max_ticks)──▶ Completed
//! ```

use shared::models::{Coordinates, DeliveryPosition};
use shared::order::{ActiveOrderSnapshot, Order, OrderStatus};

/// Result of one delivery tick
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TickOutcome {
    /// Courier moved, delivery continues
    Moved {
        tick: u32,
        position: DeliveryPosition,
    },
    /// Final tick: position equals the destination, status is `Completed`
    Arrived {
        tick: u32,
        position: DeliveryPosition,
    },
}

impl TickOutcome {
    pub fn tick(&self) -> u32 {
        match self {
            TickOutcome::Moved { tick, .. } | TickOutcome::Arrived { tick, .. } => *tick,
        }
    }

    pub fn position(&self) -> DeliveryPosition {
        match self {
            TickOutcome::Moved { position, .. } | TickOutcome::Arrived { position, .. } => {
                *position
            }
        }
    }
}

/// The order being tracked plus its derived, unpersisted delivery position
#[derive(Debug, Clone)]
pub struct ActiveOrder {
    order: Order,
    origin: Coordinates,
    position: DeliveryPosition,
    tick: u32,
    max_ticks: u32,
}

impl ActiveOrder {
    /// Track `order`; the courier waits at `origin`
    pub fn new(order: Order, origin: Coordinates, max_ticks: u32) -> Self {
        Self {
            order,
            origin,
            position: origin,
            tick: 0,
            max_ticks: max_ticks.max(1),
        }
    }

    pub fn id(&self) -> &str {
        &self.order.id
    }

    pub fn status(&self) -> OrderStatus {
        self.order.status
    }

    pub fn order(&self) -> &Order {
        &self.order
    }

    pub fn position(&self) -> DeliveryPosition {
        self.position
    }

    /// `Preparing → Delivering`. Resets the courier to the origin.
    ///
    /// Returns `false` (and changes nothing) in any other status.
    pub fn begin_delivery(&mut self) -> bool {
        if self.order.status != OrderStatus::Preparing {
            return false;
        }
        self.order.status = OrderStatus::Delivering;
        self.position = self.origin;
        self.tick = 0;
        true
    }

    /// Advance one delivery tick.
    ///
    /// At tick `k`: `position = origin + (destination - origin) * k / max_ticks`.
    /// The last tick lands exactly on the destination and completes the
    /// order. Returns `None` (and changes nothing) unless `Delivering`.
    pub fn advance(&mut self) -> Option<TickOutcome> {
        if self.order.status != OrderStatus::Delivering {
            return None;
        }
        self.tick += 1;
        let destination = self.order.delivery.coordinates;

        if self.tick >= self.max_ticks {
            self.tick = self.max_ticks;
            self.position = destination;
            self.order.status = OrderStatus::Completed;
            return Some(TickOutcome::Arrived {
                tick: self.tick,
                position: self.position,
            });
        }

        let fraction = f64::from(self.tick) / f64::from(self.max_ticks);
        self.position = self.origin.lerp(&destination, fraction);
        Some(TickOutcome::Moved {
            tick: self.tick,
            position: self.position,
        })
    }

    pub fn snapshot(&self) -> ActiveOrderSnapshot {
        ActiveOrderSnapshot {
            order: self.order.clone(),
            position: self.position,
            tick: self.tick,
            max_ticks: self.max_ticks,
        }
    }

    pub fn into_order(self) -> Order {
        self.order
    }
}
