//! Identity / persistence collaborator
//!
//! The core never talks to the identity provider directly; it goes through
//! [`ProfileRepository`]. [`RedbProfileStore`] is the embedded implementation.
//!
//! # Tables
//!
//! | Table | Key | Value | Purpose |
//! |-------|-----|-------|---------|
//! | `profiles` | `identity_id` | `UserProfile` (JSON) | Profile documents |
//! | `order_history` | `(identity_id, order_id)` | `Order` (JSON) | Completed orders |
//!
//! # Durability
//!
//! redb commits with `Durability::Immediate` by default: once `commit()`
//! returns the order is on disk, and the file is always consistent after a
//! crash (copy-on-write with atomic pointer swap).

use async_trait::async_trait;
use redb::{Database, ReadableDatabase, TableDefinition};
use shared::models::UserProfile;
use shared::order::Order;
use std::path::Path;
use std::sync::Arc;
use thiserror::Error;

/// Table for profiles: key = identity_id, value = JSON-serialized UserProfile
const PROFILES_TABLE: TableDefinition<&str, &[u8]> = TableDefinition::new("profiles");

/// Table for completed orders: key = (identity_id, order_id), value = JSON-serialized Order
const HISTORY_TABLE: TableDefinition<(&str, &str), &[u8]> = TableDefinition::new("order_history");

/// Persistence errors
#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error("Database error: {0}")]
    Database(#[from] redb::DatabaseError),

    #[error("Transaction error: {0}")]
    Transaction(#[from] redb::TransactionError),

    #[error("Table error: {0}")]
    Table(#[from] redb::TableError),

    #[error("Storage error: {0}")]
    Storage(#[from] redb::StorageError),

    #[error("Commit error: {0}")]
    Commit(#[from] redb::CommitError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Persistence unavailable: {0}")]
    Unavailable(String),
}

pub type PersistenceResult<T> = Result<T, PersistenceError>;

/// Identity/profile collaborator used by the session and the history store
#[async_trait]
pub trait ProfileRepository: Send + Sync {
    /// Read the profile of `identity_id`, `None` when the identity has none
    async fn get_profile(&self, identity_id: &str) -> PersistenceResult<Option<UserProfile>>;

    /// Create or replace the profile of `identity_id`
    async fn save_profile(&self, identity_id: &str, profile: &UserProfile)
    -> PersistenceResult<()>;

    /// Upsert a completed order under `identity_id`, keyed by order id
    async fn save_completed_order(&self, identity_id: &str, order: &Order)
    -> PersistenceResult<()>;

    /// All completed orders of `identity_id`, in no particular order
    async fn load_completed_orders(&self, identity_id: &str) -> PersistenceResult<Vec<Order>>;
}

/// Profile store backed by redb
#[derive(Clone)]
pub struct RedbProfileStore {
    db: Arc<Database>,
}

impl std::fmt::Debug for RedbProfileStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RedbProfileStore")
            .field("db", &"<redb::Database>")
            .finish()
    }
}

impl RedbProfileStore {
    /// Open or create the database at the given path
    pub fn open(path: impl AsRef<Path>) -> PersistenceResult<Self> {
        let db = Database::create(path)?;
        Self::init(db)
    }

    /// Open an in-memory database (for tests and ephemeral sessions)
    pub fn open_in_memory() -> PersistenceResult<Self> {
        let db = Database::builder().create_with_backend(redb::backends::InMemoryBackend::new())?;
        Self::init(db)
    }

    fn init(db: Database) -> PersistenceResult<Self> {
        // Create all tables if they don't exist
        let write_txn = db.begin_write()?;
        {
            let _ = write_txn.open_table(PROFILES_TABLE)?;
            let _ = write_txn.open_table(HISTORY_TABLE)?;
        }
        write_txn.commit()?;
        Ok(Self { db: Arc::new(db) })
    }

    /// Run a redb operation off the async executor
    async fn blocking<T, F>(&self, op: F) -> PersistenceResult<T>
    where
        T: Send + 'static,
        F: FnOnce(&Database) -> PersistenceResult<T> + Send + 'static,
    {
        let db = self.db.clone();
        tokio::task::spawn_blocking(move || op(&db))
            .await
            .map_err(|e| PersistenceError::Unavailable(format!("storage task failed: {e}")))?
    }

    fn read_profile(db: &Database, identity_id: &str) -> PersistenceResult<Option<UserProfile>> {
        let read_txn = db.begin_read()?;
        let table = read_txn.open_table(PROFILES_TABLE)?;
        match table.get(identity_id)? {
            Some(guard) => Ok(Some(serde_json::from_slice(guard.value())?)),
            None => Ok(None),
        }
    }

    fn write_profile(db: &Database, identity_id: &str, bytes: &[u8]) -> PersistenceResult<()> {
        let txn = db.begin_write()?;
        {
            let mut table = txn.open_table(PROFILES_TABLE)?;
            table.insert(identity_id, bytes)?;
        }
        txn.commit()?;
        Ok(())
    }

    fn write_order(
        db: &Database,
        identity_id: &str,
        order_id: &str,
        bytes: &[u8],
    ) -> PersistenceResult<()> {
        let txn = db.begin_write()?;
        {
            let mut table = txn.open_table(HISTORY_TABLE)?;
            // insert replaces an existing value: appending the same order twice is an upsert
            table.insert((identity_id, order_id), bytes)?;
        }
        txn.commit()?;
        Ok(())
    }

    fn read_orders(db: &Database, identity_id: &str) -> PersistenceResult<Vec<Order>> {
        let read_txn = db.begin_read()?;
        let table = read_txn.open_table(HISTORY_TABLE)?;

        let mut orders = Vec::new();
        for result in table.range((identity_id, "")..)? {
            let (key, value) = result?;
            if key.value().0 != identity_id {
                break;
            }
            let order: Order = serde_json::from_slice(value.value())?;
            orders.push(order);
        }
        Ok(orders)
    }
}

#[async_trait]
impl ProfileRepository for RedbProfileStore {
    async fn get_profile(&self, identity_id: &str) -> PersistenceResult<Option<UserProfile>> {
        let identity_id = identity_id.to_string();
        self.blocking(move |db| Self::read_profile(db, &identity_id))
            .await
    }

    async fn save_profile(
        &self,
        identity_id: &str,
        profile: &UserProfile,
    ) -> PersistenceResult<()> {
        let identity_id = identity_id.to_string();
        let bytes = serde_json::to_vec(profile)?;
        self.blocking(move |db| Self::write_profile(db, &identity_id, &bytes))
            .await
    }

    async fn save_completed_order(
        &self,
        identity_id: &str,
        order: &Order,
    ) -> PersistenceResult<()> {
        let identity_id = identity_id.to_string();
        let order_id = order.id.clone();
        let bytes = serde_json::to_vec(order)?;
        self.blocking(move |db| Self::write_order(db, &identity_id, &order_id, &bytes))
            .await
    }

    async fn load_completed_orders(&self, identity_id: &str) -> PersistenceResult<Vec<Order>> {
        let identity_id = identity_id.to_string();
        self.blocking(move |db| Self::read_orders(db, &identity_id))
            .await
    }
}
