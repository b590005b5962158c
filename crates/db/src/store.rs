//! [`StatusStore`] backed by Postgres.

use async_trait::async_trait;
use fleetwatch_core::status::{StatusOverride, UpsertStatusOverride};
use fleetwatch_core::store::{StatusStore, StatusStoreError};
use sqlx::PgPool;

use crate::repositories::OfflineStatusRepo;

/// Status store over the `offline_status` table.
#[derive(Clone)]
pub struct PgStatusStore {
    pool: PgPool,
}

impl PgStatusStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl StatusStore for PgStatusStore {
    async fn list_all(&self) -> Result<Vec<StatusOverride>, StatusStoreError> {
        let rows = OfflineStatusRepo::list_all(&self.pool)
            .await
            .map_err(StatusStoreError::backend)?;
        rows.into_iter()
            .map(|row| StatusOverride::try_from(row).map_err(StatusStoreError::backend))
            .collect()
    }

    async fn find(&self, vehicle_number: &str) -> Result<Option<StatusOverride>, StatusStoreError> {
        OfflineStatusRepo::find_by_vehicle(&self.pool, vehicle_number)
            .await
            .map_err(StatusStoreError::backend)?
            .map(|row| StatusOverride::try_from(row).map_err(StatusStoreError::backend))
            .transpose()
    }

    async fn upsert(
        &self,
        vehicle_number: &str,
        input: &UpsertStatusOverride,
        updated_by: &str,
    ) -> Result<StatusOverride, StatusStoreError> {
        let reason = input.normalized_reason();
        let row = OfflineStatusRepo::upsert(
            &self.pool,
            vehicle_number,
            input.current_status.as_str(),
            reason.as_deref(),
            updated_by,
        )
        .await
        .map_err(StatusStoreError::backend)?;

        tracing::info!(
            vehicle_number,
            status = %input.current_status,
            "Status override saved",
        );
        StatusOverride::try_from(row).map_err(StatusStoreError::backend)
    }

    async fn health_check(&self) -> Result<(), StatusStoreError> {
        crate::health_check(&self.pool)
            .await
            .map_err(StatusStoreError::backend)
    }
}
