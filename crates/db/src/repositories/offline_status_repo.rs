//! Repository for the `offline_status` table.

use sqlx::PgPool;

use crate::models::offline_status::OfflineStatusRow;

/// Column list for `offline_status` queries.
const COLUMNS: &str = "id, vehicle_number, current_status, reason, updated_at, updated_by";

/// Provides data access for status overrides.
pub struct OfflineStatusRepo;

impl OfflineStatusRepo {
    /// List every override, oldest first.
    pub async fn list_all(pool: &PgPool) -> Result<Vec<OfflineStatusRow>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM offline_status ORDER BY id");
        sqlx::query_as::<_, OfflineStatusRow>(&query)
            .fetch_all(pool)
            .await
    }

    /// Find the override for one vehicle.
    pub async fn find_by_vehicle(
        pool: &PgPool,
        vehicle_number: &str,
    ) -> Result<Option<OfflineStatusRow>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM offline_status WHERE vehicle_number = $1");
        sqlx::query_as::<_, OfflineStatusRow>(&query)
            .bind(vehicle_number)
            .fetch_optional(pool)
            .await
    }

    /// Insert or replace the override for a vehicle.
    ///
    /// Uses `ON CONFLICT (vehicle_number) DO UPDATE`; every field is
    /// overwritten and `updated_at` is reset to `NOW()`.
    pub async fn upsert(
        pool: &PgPool,
        vehicle_number: &str,
        current_status: &str,
        reason: Option<&str>,
        updated_by: &str,
    ) -> Result<OfflineStatusRow, sqlx::Error> {
        let query = format!(
            "INSERT INTO offline_status \
                 (vehicle_number, current_status, reason, updated_by, updated_at) \
             VALUES ($1, $2, $3, $4, NOW()) \
             ON CONFLICT (vehicle_number) DO UPDATE SET \
                 current_status = EXCLUDED.current_status, \
                 reason = EXCLUDED.reason, \
                 updated_by = EXCLUDED.updated_by, \
                 updated_at = NOW() \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, OfflineStatusRow>(&query)
            .bind(vehicle_number)
            .bind(current_status)
            .bind(reason)
            .bind(updated_by)
            .fetch_one(pool)
            .await
    }
}
