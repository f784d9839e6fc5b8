//! In-process profile store
//!
//! Keeps profiles and completed orders in memory. The availability switch
//! lets embedders (and tests) simulate the identity provider being offline.

use super::storage::{PersistenceError, PersistenceResult, ProfileRepository};
use async_trait::async_trait;
use parking_lot::RwLock;
use shared::models::UserProfile;
use shared::order::Order;
use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::{AtomicBool, Ordering};

#[derive(Debug)]
pub struct MemoryProfileStore {
    profiles: RwLock<HashMap<String, UserProfile>>,
    /// identity_id -> (order_id -> order)
    history: RwLock<HashMap<String, BTreeMap<String, Order>>>,
    available: AtomicBool,
}

impl Default for MemoryProfileStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryProfileStore {
    pub fn new() -> Self {
        Self {
            profiles: RwLock::new(HashMap::new()),
            history: RwLock::new(HashMap::new()),
            available: AtomicBool::new(true),
        }
    }

    /// Store seeded with one profile
    pub fn with_profile(identity_id: impl Into<String>, profile: UserProfile) -> Self {
        let store = Self::new();
        store.profiles.write().insert(identity_id.into(), profile);
        store
    }

    /// Toggle availability; while unavailable every call fails
    pub fn set_available(&self, available: bool) {
        self.available.store(available, Ordering::SeqCst);
    }

    /// Number of stored orders for `identity_id`
    pub fn order_count(&self, identity_id: &str) -> usize {
        self.history
            .read()
            .get(identity_id)
            .map_or(0, |orders| orders.len())
    }

    fn ensure_available(&self) -> PersistenceResult<()> {
        if self.available.load(Ordering::SeqCst) {
            Ok(())
        } else {
            Err(PersistenceError::Unavailable(
                "profile store is offline".to_string(),
            ))
        }
    }
}

#[async_trait]
impl ProfileRepository for MemoryProfileStore {
    async fn get_profile(&self, identity_id: &str) -> PersistenceResult<Option<UserProfile>> {
        self.ensure_available()?;
        Ok(self.profiles.read().get(identity_id).cloned())
    }

    async fn save_profile(
        &self,
        identity_id: &str,
        profile: &UserProfile,
    ) -> PersistenceResult<()> {
        self.ensure_available()?;
        self.profiles
            .write()
            .insert(identity_id.to_string(), profile.clone());
        Ok(())
    }

    async fn save_completed_order(
        &self,
        identity_id: &str,
        order: &Order,
    ) -> PersistenceResult<()> {
        self.ensure_available()?;
        self.history
            .write()
            .entry(identity_id.to_string())
            .or_default()
            .insert(order.id.clone(), order.clone());
        Ok(())
    }

    async fn load_completed_orders(&self, identity_id: &str) -> PersistenceResult<Vec<Order>> {
        self.ensure_available()?;
        Ok(self
            .history
            .read()
            .get(identity_id)
            .map(|orders| orders.values().cloned().collect())
            .unwrap_or_default())
    }
}
