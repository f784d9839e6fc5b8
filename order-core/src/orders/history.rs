//! Order History Store
//!
//! Durable record of completed orders, one list per identity. Only
//! `Completed` orders are accepted; appending an order id that is already
//! stored replaces it (the operation is safe to retry).

use super::storage::ProfileRepository;
use super::{OrderError, OrderResult};
use shared::order::{Order, OrderStatus};
use std::sync::Arc;

#[derive(Clone)]
pub struct HistoryStore {
    repo: Arc<dyn ProfileRepository>,
}

impl std::fmt::Debug for HistoryStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HistoryStore").finish_non_exhaustive()
    }
}

impl HistoryStore {
    pub fn new(repo: Arc<dyn ProfileRepository>) -> Self {
        Self { repo }
    }

    /// Persist a completed order under `identity_id`.
    ///
    /// # Errors
    ///
    /// - [`OrderError::InvalidState`] when `order` is not `Completed`
    /// - [`OrderError::Persistence`] when the write fails; nothing is retried
    pub async fn append(&self, identity_id: &str, order: &Order) -> OrderResult<()> {
        if order.status != OrderStatus::Completed {
            return Err(OrderError::InvalidState {
                order_id: order.id.clone(),
                status: order.status,
                expected: OrderStatus::Completed,
            });
        }

        self.repo
            .save_completed_order(identity_id, order)
            .await
            .inspect_err(|e| {
                tracing::warn!(order_id = %order.id, error = %e, "Failed to persist completed order");
            })?;

        tracing::info!(order_id = %order.id, total_minor = order.total_minor, "Order added to history");
        Ok(())
    }

    /// Completed orders of `identity_id`, most recent first
    pub async fn list(&self, identity_id: &str) -> OrderResult<Vec<Order>> {
        let mut orders = self.repo.load_completed_orders(identity_id).await?;
        // 按创建时间倒序，同一毫秒内按订单号倒序
        orders.sort_by(|a, b| {
            b.created_at
                .cmp(&a.created_at)
                .then_with(|| b.id.cmp(&a.id))
        });
        Ok(orders)
    }
}
