//! Shared response envelope types for API handlers.
//!
//! List endpoints return `{ cases, pagination, filters_applied }`; write
//! endpoints return `{ message, case }` or `{ message, case_id }`. Typed
//! envelopes are used instead of ad-hoc `serde_json::json!` so the shapes
//! stay consistent across handlers.

use hrm_core::filter::{FilterSet, FiltersApplied};
use hrm_core::types::DbId;
use hrm_db::models::case::{Case, CasePage};
use serde::Serialize;

/// Pagination metadata for list responses.
#[derive(Debug, Serialize)]
pub struct Pagination {
    pub total_count: i64,
    pub current_skip: i64,
    pub current_limit: i64,
    pub returned_count: i64,
    pub has_next: bool,
    pub has_prev: bool,
}

/// Envelope for `GET /cases` and `GET /cases/archive`.
#[derive(Debug, Serialize)]
pub struct CaseListResponse {
    pub cases: Vec<Case>,
    pub pagination: Pagination,
    pub filters_applied: FiltersApplied,
}

impl CaseListResponse {
    pub fn new(page: CasePage, filter: &FilterSet) -> Self {
        let returned_count = page.cases.len() as i64;
        Self {
            pagination: Pagination {
                total_count: page.total_count,
                current_skip: filter.skip,
                current_limit: filter.limit,
                returned_count,
                has_next: filter.skip + returned_count < page.total_count,
                has_prev: filter.skip > 0,
            },
            filters_applied: filter.applied.clone(),
            cases: page.cases,
        }
    }
}

/// Envelope for write endpoints that return the full record.
#[derive(Debug, Serialize)]
pub struct CaseResponse {
    pub message: &'static str,
    pub case: Case,
}

/// Envelope for write endpoints that return only the storage id
/// (archive/restore).
#[derive(Debug, Serialize)]
pub struct CaseRefResponse {
    pub message: &'static str,
    pub case_id: DbId,
}
