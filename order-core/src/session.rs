//! User session
//!
//! Created at login, destroyed at logout. Owns the cart, the lifecycle
//! engine (and with it the single active order) and the history store for
//! one identity. Nothing here is global: embedders hold the `Session` and
//! pass it where it is needed.

use crate::cart::CartStore;
use crate::core::SimulationConfig;
use crate::orders::{
    HistoryStore, LifecycleEngine, OrderError, OrderResult, OrderTracking, ProfileRepository,
    create_order,
};
use crate::utils::validation::validate_rating;
use shared::models::UserProfile;
use shared::order::{
    ActiveOrderSnapshot, DeliveryDraft, LifecycleEvent, Order, OrderStatus, PaymentMethod,
};
use shared::util::now_millis;
use std::sync::Arc;
use tokio::sync::broadcast;
use uuid::Uuid;

pub struct Session {
    id: Uuid,
    identity_id: String,
    profile: UserProfile,
    repo: Arc<dyn ProfileRepository>,
    cart: CartStore,
    engine: LifecycleEngine,
    history: HistoryStore,
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("id", &self.id)
            .field("identity_id", &self.identity_id)
            .field("cart_lines", &self.cart.line_count())
            .field("engine", &self.engine)
            .finish_non_exhaustive()
    }
}

impl Session {
    /// Start a session for an authenticated identity.
    ///
    /// Loads the profile through `repo`; an identity without a stored
    /// profile gets an empty one.
    pub async fn login(
        identity_id: impl Into<String>,
        repo: Arc<dyn ProfileRepository>,
        simulation: SimulationConfig,
    ) -> OrderResult<Self> {
        let identity_id = identity_id.into();
        if identity_id.trim().is_empty() {
            return Err(OrderError::Validation("identity id is required".to_string()));
        }

        let profile = repo.get_profile(&identity_id).await?.unwrap_or_default();
        let session = Self {
            id: Uuid::new_v4(),
            history: HistoryStore::new(repo.clone()),
            engine: LifecycleEngine::new(simulation),
            cart: CartStore::new(),
            profile,
            repo,
            identity_id,
        };
        tracing::info!(session_id = %session.id, identity_id = %session.identity_id, "Session started");
        Ok(session)
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn identity_id(&self) -> &str {
        &self.identity_id
    }

    pub fn profile(&self) -> &UserProfile {
        &self.profile
    }

    /// Replace the profile, writing it through to the repository first
    pub async fn update_profile(&mut self, profile: UserProfile) -> OrderResult<()> {
        self.repo.save_profile(&self.identity_id, &profile).await?;
        self.profile = profile;
        tracing::debug!(identity_id = %self.identity_id, "Profile updated");
        Ok(())
    }

    pub fn cart(&self) -> &CartStore {
        &self.cart
    }

    pub fn cart_mut(&mut self) -> &mut CartStore {
        &mut self.cart
    }

    /// Delivery form prefilled from the profile
    pub fn delivery_draft(&self) -> DeliveryDraft {
        DeliveryDraft::from_profile(&self.profile)
    }

    /// Place an order for the current cart.
    ///
    /// The cart is cleared only once the order is installed as the active
    /// order; on any error it is left untouched.
    pub fn checkout(
        &mut self,
        draft: &DeliveryDraft,
        payment_method: PaymentMethod,
    ) -> OrderResult<OrderTracking> {
        let order = create_order(self.cart.lines(), draft, payment_method)?;
        let tracking = self.engine.start(order)?;
        self.cart.clear();
        Ok(tracking)
    }

    pub fn active_order(&self) -> Option<ActiveOrderSnapshot> {
        self.engine.active_order()
    }

    pub fn subscribe(&self) -> broadcast::Receiver<LifecycleEvent> {
        self.engine.subscribe()
    }

    /// Abandon the active order. Its timers stop before this returns.
    pub fn cancel_active_order(&mut self) -> Option<Order> {
        self.engine.clear_active_order()
    }

    /// Move the completed active order into history.
    ///
    /// Stamps `completed_at` and the optional 1..=5 `rating`. The active
    /// order is released only after the history write succeeds, so a
    /// [`OrderError::Persistence`] leaves it in place and the call can be
    /// retried.
    pub async fn finalize_active_order(&mut self, rating: Option<u8>) -> OrderResult<Order> {
        let snapshot = self.engine.active_order().ok_or(OrderError::NoActiveOrder)?;
        let mut order = snapshot.order;
        if order.status != OrderStatus::Completed {
            return Err(OrderError::InvalidState {
                order_id: order.id,
                status: order.status,
                expected: OrderStatus::Completed,
            });
        }

        order.rating = rating.map(validate_rating).transpose()?;
        order.completed_at = Some(now_millis());
        self.history.append(&self.identity_id, &order).await?;
        self.engine.release_completed(&order.id)?;

        tracing::info!(order_id = %order.id, rating = ?order.rating, "Order finalized");
        Ok(order)
    }

    /// Completed orders of this identity, most recent first
    pub async fn order_history(&self) -> OrderResult<Vec<Order>> {
        self.history.list(&self.identity_id).await
    }

    /// End the session: clears the cart and cancels any active order
    pub fn logout(mut self) {
        self.cart.clear();
        if let Some(order) = self.engine.clear_active_order() {
            tracing::info!(order_id = %order.id, status = %order.status, "Active order dropped at logout");
        }
        tracing::info!(session_id = %self.id, identity_id = %self.identity_id, "Session ended");
    }
}
