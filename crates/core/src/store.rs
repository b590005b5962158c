//! Storage seam for vehicle status overrides.
//!
//! The store is built once at startup and handed to request handlers, so
//! the backing implementation (Postgres in production, in-memory for local
//! runs and tests) is chosen by whoever wires the application together.

use std::collections::HashMap;
use std::sync::atomic::{AtomicI64, Ordering};

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::status::{index_overrides, OverrideMap, StatusOverride, UpsertStatusOverride};
use crate::types::DbId;

/// Errors raised by a [`StatusStore`] backend.
#[derive(Debug, thiserror::Error)]
pub enum StatusStoreError {
    #[error("Status store backend error: {0}")]
    Backend(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl StatusStoreError {
    pub fn backend(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Backend(Box::new(err))
    }
}

/// Read/write access to the `offline_status` overlay.
///
/// No optimistic-concurrency check is made: concurrent upserts for the same
/// vehicle resolve as last-write-wins.
#[async_trait]
pub trait StatusStore: Send + Sync {
    /// All stored overrides.
    async fn list_all(&self) -> Result<Vec<StatusOverride>, StatusStoreError>;

    /// The override for one vehicle, if any.
    async fn find(&self, vehicle_number: &str) -> Result<Option<StatusOverride>, StatusStoreError>;

    /// Insert or replace the override for `vehicle_number`, stamping the
    /// current time and `updated_by`.
    async fn upsert(
        &self,
        vehicle_number: &str,
        input: &UpsertStatusOverride,
        updated_by: &str,
    ) -> Result<StatusOverride, StatusStoreError>;

    /// Cheap reachability probe for the health endpoint.
    async fn health_check(&self) -> Result<(), StatusStoreError> {
        Ok(())
    }

    /// All overrides indexed by vehicle number.
    async fn overrides_by_vehicle(&self) -> Result<OverrideMap, StatusStoreError> {
        Ok(index_overrides(self.list_all().await?))
    }
}

/// Process-local [`StatusStore`].
///
/// Thread-safe via interior `RwLock`; designed to be wrapped in `Arc` and
/// shared across the application. Contents are lost on restart.
pub struct InMemoryStatusStore {
    rows: RwLock<HashMap<String, StatusOverride>>,
    next_id: AtomicI64,
}

impl InMemoryStatusStore {
    pub fn new() -> Self {
        Self {
            rows: RwLock::new(HashMap::new()),
            next_id: AtomicI64::new(1),
        }
    }

    fn allocate_id(&self) -> DbId {
        self.next_id.fetch_add(1, Ordering::Relaxed)
    }
}

impl Default for InMemoryStatusStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl StatusStore for InMemoryStatusStore {
    async fn list_all(&self) -> Result<Vec<StatusOverride>, StatusStoreError> {
        let mut rows: Vec<_> = self.rows.read().await.values().cloned().collect();
        rows.sort_by_key(|row| row.id);
        Ok(rows)
    }

    async fn find(&self, vehicle_number: &str) -> Result<Option<StatusOverride>, StatusStoreError> {
        Ok(self.rows.read().await.get(vehicle_number).cloned())
    }

    async fn upsert(
        &self,
        vehicle_number: &str,
        input: &UpsertStatusOverride,
        updated_by: &str,
    ) -> Result<StatusOverride, StatusStoreError> {
        let mut rows = self.rows.write().await;
        let id = match rows.get(vehicle_number) {
            Some(existing) => existing.id,
            None => self.allocate_id(),
        };

        let row = StatusOverride {
            id,
            vehicle_number: vehicle_number.to_string(),
            current_status: input.current_status,
            reason: input.normalized_reason(),
            updated_at: chrono::Utc::now(),
            updated_by: Some(updated_by.to_string()),
        };
        rows.insert(vehicle_number.to_string(), row.clone());

        Ok(row)
    }
}
