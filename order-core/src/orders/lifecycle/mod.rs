//! Order Lifecycle Engine
//!
//! Owns the single active order and drives it through the scripted status
//! simulation:
//!
//! ```text
//! start(order)
//!     ├─ 1. Reject if an order is already active
//!     ├─ 2. Install order (Preparing, courier at origin)
//!     ├─ 3. Spawn simulation task (TaskHandle kept with the order)
//!     │       ├─ sleep(preparation_delay) → CAS(order_id, Preparing) → Delivering
//!     │       └─ every tick_interval      → CAS(order_id, Delivering) → move / Completed
//!     └─ 4. Return OrderTracking (resolves on Completed or Cancelled)
//! ```
//!
//! Every timer-driven mutation is a compare-and-set on order identity plus
//! expected status. A callback whose order was cleared or replaced finds no
//! match and is discarded silently; clearing the active order also cancels
//! the task synchronously, so no callback runs after `clear_active_order`
//! returns.

mod state;

pub use state::{ActiveOrder, TickOutcome};

use super::{OrderError, OrderResult};
use crate::core::{SimulationConfig, TaskHandle, spawn_cancellable};
use parking_lot::Mutex;
use shared::order::{ActiveOrderSnapshot, LifecycleEvent, Order, OrderStatus};
use std::sync::{Arc, Weak};
use tokio::sync::{broadcast, oneshot};
use tokio::time::{Instant, interval_at};

/// Event broadcast channel capacity (one order emits ~45 events)
const EVENT_CHANNEL_CAPACITY: usize = 256;

type Completion = oneshot::Sender<OrderResult<Order>>;

/// Active order slot plus the resources tied to it
struct Tracked {
    state: ActiveOrder,
    timer: Option<TaskHandle>,
    completion: Option<Completion>,
}

impl Tracked {
    fn cancel_timer(&mut self) {
        if let Some(timer) = self.timer.take() {
            timer.cancel();
        }
    }
}

#[derive(Default)]
struct EngineInner {
    active: Option<Tracked>,
}

impl EngineInner {
    /// Compare-and-set guard: the tracked order, only if it is `order_id`
    /// and currently in `expected` status.
    fn tracked_if(&mut self, order_id: &str, expected: OrderStatus) -> Option<&mut Tracked> {
        self.active
            .as_mut()
            .filter(|t| t.state.id() == order_id && t.state.status() == expected)
    }
}

/// Outcome of a timer callback
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Step {
    /// Mutation applied, keep going
    Applied,
    /// Order reached a terminal state, stop the task
    Finished,
    /// Order cleared or replaced, mutation discarded
    Stale,
}

/// Handle returned by [`LifecycleEngine::start`]
#[derive(Debug)]
pub struct OrderTracking {
    order_id: String,
    completion: oneshot::Receiver<OrderResult<Order>>,
}

impl OrderTracking {
    pub fn order_id(&self) -> &str {
        &self.order_id
    }

    /// Wait until the order is `Completed`.
    ///
    /// Fails with [`OrderError::Cancelled`] when the order is cleared first
    /// (or the engine is dropped).
    pub async fn completed(self) -> OrderResult<Order> {
        match self.completion.await {
            Ok(result) => result,
            Err(_) => Err(OrderError::Cancelled {
                order_id: self.order_id,
            }),
        }
    }
}

/// Lifecycle engine for the session's single active order
pub struct LifecycleEngine {
    config: SimulationConfig,
    inner: Arc<Mutex<EngineInner>>,
    event_tx: broadcast::Sender<LifecycleEvent>,
}

impl std::fmt::Debug for LifecycleEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LifecycleEngine")
            .field("config", &self.config)
            .field("event_tx", &"<broadcast::Sender>")
            .finish()
    }
}

impl LifecycleEngine {
    pub fn new(config: SimulationConfig) -> Self {
        let (event_tx, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        Self {
            config: config.normalized(),
            inner: Arc::new(Mutex::new(EngineInner::default())),
            event_tx,
        }
    }

    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    /// Subscribe to lifecycle events (status changes, courier movement)
    pub fn subscribe(&self) -> broadcast::Receiver<LifecycleEvent> {
        self.event_tx.subscribe()
    }

    /// Install `order` as the active order and start its simulation.
    ///
    /// Must be called from within a Tokio runtime.
    ///
    /// # Errors
    ///
    /// - [`OrderError::ActiveOrderExists`] when another order is active
    ///   (including a completed one not yet moved to history)
    /// - [`OrderError::InvalidState`] when `order` is not `Preparing`
    pub fn start(&self, order: Order) -> OrderResult<OrderTracking> {
        let mut inner = self.inner.lock();
        if let Some(existing) = &inner.active {
            return Err(OrderError::ActiveOrderExists {
                order_id: existing.state.id().to_string(),
            });
        }
        if order.status != OrderStatus::Preparing {
            return Err(OrderError::InvalidState {
                order_id: order.id,
                status: order.status,
                expected: OrderStatus::Preparing,
            });
        }

        let order_id = order.id.clone();
        let (completion_tx, completion_rx) = oneshot::channel();
        let timer = spawn_cancellable("order_simulation", {
            let inner = Arc::downgrade(&self.inner);
            let events = self.event_tx.clone();
            let config = self.config.clone();
            let order_id = order_id.clone();
            move |_token| run_simulation(inner, events, config, order_id)
        });

        inner.active = Some(Tracked {
            state: ActiveOrder::new(order, self.config.origin, self.config.max_ticks),
            timer: Some(timer),
            completion: Some(completion_tx),
        });
        let _ = self.event_tx.send(LifecycleEvent::Placed {
            order_id: order_id.clone(),
        });
        tracing::info!(
            order_id = %order_id,
            preparation_ms = self.config.preparation_delay.as_millis() as u64,
            ticks = self.config.max_ticks,
            "Order tracking started"
        );

        Ok(OrderTracking {
            order_id,
            completion: completion_rx,
        })
    }

    /// Live snapshot of the active order, `None` when nothing is tracked
    pub fn active_order(&self) -> Option<ActiveOrderSnapshot> {
        self.inner.lock().active.as_ref().map(|t| t.state.snapshot())
    }

    pub fn has_active_order(&self) -> bool {
        self.inner.lock().active.is_some()
    }

    /// Clear the active order, cancelling its timers.
    ///
    /// An order cleared before `Completed` resolves its tracking with
    /// [`OrderError::Cancelled`]. Returns the removed order, if any.
    pub fn clear_active_order(&self) -> Option<Order> {
        let mut inner = self.inner.lock();
        let mut tracked = inner.active.take()?;
        tracked.cancel_timer();

        let order_id = tracked.state.id().to_string();
        let status = tracked.state.status();
        if status != OrderStatus::Completed {
            if let Some(completion) = tracked.completion.take() {
                let _ = completion.send(Err(OrderError::Cancelled {
                    order_id: order_id.clone(),
                }));
            }
            let _ = self.event_tx.send(LifecycleEvent::Cancelled {
                order_id: order_id.clone(),
            });
            tracing::info!(order_id = %order_id, status = %status, "Active order cancelled");
        } else {
            tracing::debug!(order_id = %order_id, "Completed order cleared");
        }

        Some(tracked.state.into_order())
    }

    /// Remove the active order once it is `Completed` (after it has been
    /// written to history).
    pub fn release_completed(&self, order_id: &str) -> OrderResult<Order> {
        let mut inner = self.inner.lock();
        let tracked = match &inner.active {
            Some(t) if t.state.id() == order_id => t,
            _ => return Err(OrderError::NoActiveOrder),
        };
        if tracked.state.status() != OrderStatus::Completed {
            return Err(OrderError::InvalidState {
                order_id: order_id.to_string(),
                status: tracked.state.status(),
                expected: OrderStatus::Completed,
            });
        }

        let mut tracked = inner.active.take().ok_or(OrderError::NoActiveOrder)?;
        tracked.cancel_timer();
        tracing::info!(order_id = %order_id, "Completed order released");
        Ok(tracked.state.into_order())
    }
}

impl Drop for LifecycleEngine {
    fn drop(&mut self) {
        if let Some(mut tracked) = self.inner.lock().active.take() {
            tracked.cancel_timer();
            tracing::debug!(order_id = %tracked.state.id(), "Engine dropped with active order");
        }
    }
}

// ============================================================================
// Timer callbacks
// ============================================================================

/// Preparation delay elapsed for `order_id`
fn on_preparation_elapsed(
    inner: &Mutex<EngineInner>,
    events: &broadcast::Sender<LifecycleEvent>,
    order_id: &str,
) -> Step {
    let mut inner = inner.lock();
    let Some(tracked) = inner.tracked_if(order_id, OrderStatus::Preparing) else {
        tracing::debug!(order_id = %order_id, "Stale preparation timer discarded");
        return Step::Stale;
    };
    if !tracked.state.begin_delivery() {
        return Step::Stale;
    }

    let _ = events.send(LifecycleEvent::StatusChanged {
        order_id: order_id.to_string(),
        status: OrderStatus::Delivering,
    });
    tracing::info!(order_id = %order_id, "Order ready, delivery started");
    Step::Applied
}

/// One delivery tick elapsed for `order_id`
fn on_delivery_tick(
    inner: &Mutex<EngineInner>,
    events: &broadcast::Sender<LifecycleEvent>,
    order_id: &str,
) -> Step {
    let mut inner = inner.lock();
    let Some(tracked) = inner.tracked_if(order_id, OrderStatus::Delivering) else {
        tracing::debug!(order_id = %order_id, "Stale delivery tick discarded");
        return Step::Stale;
    };
    let Some(outcome) = tracked.state.advance() else {
        return Step::Stale;
    };

    let _ = events.send(LifecycleEvent::PositionUpdated {
        order_id: order_id.to_string(),
        tick: outcome.tick(),
        position: outcome.position(),
    });

    match outcome {
        TickOutcome::Moved { .. } => Step::Applied,
        TickOutcome::Arrived { .. } => {
            // the task finishes on its own; nothing left to cancel
            tracked.timer = None;
            if let Some(completion) = tracked.completion.take() {
                let _ = completion.send(Ok(tracked.state.order().clone()));
            }
            let _ = events.send(LifecycleEvent::StatusChanged {
                order_id: order_id.to_string(),
                status: OrderStatus::Completed,
            });
            tracing::info!(order_id = %order_id, "Order delivered");
            Step::Finished
        }
    }
}

/// Simulation task body. Holds only a weak reference to the engine state.
async fn run_simulation(
    inner: Weak<Mutex<EngineInner>>,
    events: broadcast::Sender<LifecycleEvent>,
    config: SimulationConfig,
    order_id: String,
) {
    tokio::time::sleep(config.preparation_delay).await;
    let Some(state) = inner.upgrade() else {
        return;
    };
    if on_preparation_elapsed(&state, &events, &order_id) != Step::Applied {
        return;
    }
    drop(state);

    let mut ticker = interval_at(Instant::now() + config.tick_interval, config.tick_interval);
    loop {
        ticker.tick().await;
        let Some(state) = inner.upgrade() else {
            return;
        };
        if on_delivery_tick(&state, &events, &order_id) != Step::Applied {
            return;
        }
    }
}

#[cfg(test)]
mod tests;
