//! Status-history entry model. Append-only: entries are never updated or
//! deleted, and carry no `updated_at` (same shape discipline as any audit
//! log table).

use hrm_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A single status transition for a case, keyed by the human-readable
/// case code rather than the storage id so it survives archive/restore.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct StatusHistoryEntry {
    pub id: DbId,
    pub case_code: String,
    pub status: String,
    pub updated_by: String,
    pub created_at: Timestamp,
}
