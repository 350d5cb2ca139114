//! Repository for the append-only `case_status_history` table.
//!
//! Entries are keyed by the human-readable case code, so archiving or
//! restoring a case never touches its history. There is deliberately no
//! update or delete operation here.

use sqlx::PgPool;

use crate::models::status_history::StatusHistoryEntry;

/// Column list for `case_status_history` SELECT queries.
const COLUMNS: &str = "id, case_code, status, updated_by, created_at";

/// Append and read operations for the status audit trail.
pub struct StatusHistoryRepo;

impl StatusHistoryRepo {
    /// Append a status transition for a case.
    ///
    /// Generic over the executor so it can participate in the case
    /// repository's create/update transactions.
    pub async fn append<'e, E>(
        executor: E,
        case_code: &str,
        status: &str,
        updated_by: &str,
    ) -> Result<StatusHistoryEntry, sqlx::Error>
    where
        E: sqlx::PgExecutor<'e>,
    {
        let query = format!(
            "INSERT INTO case_status_history (case_code, status, updated_by) \
             VALUES ($1, $2, $3) RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, StatusHistoryEntry>(&query)
            .bind(case_code)
            .bind(status)
            .bind(updated_by)
            .fetch_one(executor)
            .await
    }

    /// Fetch a case's history in chronological order.
    ///
    /// Returns an empty vec for an unknown case code; the API layer turns
    /// that into 404 (every real case has at least its creation entry).
    pub async fn list_for_case(
        pool: &PgPool,
        case_code: &str,
    ) -> Result<Vec<StatusHistoryEntry>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM case_status_history \
             WHERE case_code = $1 ORDER BY created_at ASC, id ASC"
        );
        sqlx::query_as::<_, StatusHistoryEntry>(&query)
            .bind(case_code)
            .fetch_all(pool)
            .await
    }
}
