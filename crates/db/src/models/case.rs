//! Case entity model.
//!
//! A case lives in exactly one of two logical collections, active or
//! archived, selected by the nullable `archived_at` tag. Archive/restore
//! flips the tag in a single row update, so the record itself (identity,
//! fields, history linkage) is untouched by the move.

use hrm_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A tracked human-rights incident record.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Case {
    /// Storage identifier (BIGSERIAL), used in URLs.
    pub id: DbId,
    /// Stable business-facing case code (e.g. `HRM-2023-4001`), used as
    /// the status-history foreign key.
    pub case_code: String,
    pub title: String,
    pub description: String,
    pub violation_types: Vec<String>,
    pub status: String,
    pub priority: String,
    #[sqlx(flatten)]
    pub location: CaseLocation,
    pub created_by: String,
    pub victims: Vec<String>,
    pub source_reports: Vec<String>,
    /// Null while the case is active.
    pub archived_at: Option<Timestamp>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Where the incident took place. Stored as flat columns, serialized as a
/// nested object.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct CaseLocation {
    pub country: String,
    pub region: Option<String>,
    pub city: Option<String>,
    pub address: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

/// One page of list results plus the total match count for pagination.
#[derive(Debug, Clone)]
pub struct CasePage {
    pub cases: Vec<Case>,
    pub total_count: i64,
}
