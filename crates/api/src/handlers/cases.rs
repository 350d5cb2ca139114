//! Handlers for the `/cases` resource.
//!
//! Covers filtered listing and single-record reads over both the active
//! and archived collections, creation, partial update, and the
//! archive/restore moves. Request-shape validation happens here (via
//! `hrm_core`) before any storage call; repositories signal "not found"
//! with `None`/`false` and handlers map that to 404.

use axum::extract::{Path, State};
use axum::Json;
use hrm_core::case::{CreateCase, UpdateCase};
use hrm_core::error::CoreError;
use hrm_core::filter::{CaseFilterInput, FilterSet};
use hrm_core::types::DbId;
use hrm_db::models::case::Case;
use hrm_db::repositories::{CaseRepo, CaseScope};

use crate::error::{AppError, AppResult};
use crate::query::FilterQuery;
use crate::response::{CaseListResponse, CaseRefResponse, CaseResponse};
use crate::state::AppState;

/// GET /api/v1/cases
///
/// List active cases, filtered and paginated.
pub async fn list_active(
    State(state): State<AppState>,
    FilterQuery(params): FilterQuery,
) -> AppResult<Json<CaseListResponse>> {
    list_scope(state, params, CaseScope::Active).await
}

/// GET /api/v1/cases/archive
///
/// List archived cases; accepts the same filters as the active listing.
pub async fn list_archived(
    State(state): State<AppState>,
    FilterQuery(params): FilterQuery,
) -> AppResult<Json<CaseListResponse>> {
    list_scope(state, params, CaseScope::Archived).await
}

/// GET /api/v1/cases/{case_id}
pub async fn get_active(
    State(state): State<AppState>,
    Path(case_id): Path<String>,
) -> AppResult<Json<Case>> {
    fetch_one(state, case_id, CaseScope::Active).await
}

/// GET /api/v1/cases/archive/{case_id}
pub async fn get_archived(
    State(state): State<AppState>,
    Path(case_id): Path<String>,
) -> AppResult<Json<Case>> {
    fetch_one(state, case_id, CaseScope::Archived).await
}

/// POST /api/v1/cases
///
/// Create a case. Status defaults to `new`; the initial status-history
/// entry is written in the same transaction as the insert.
pub async fn create(
    State(state): State<AppState>,
    Json(body): Json<CreateCase>,
) -> AppResult<Json<CaseResponse>> {
    let new_case = body.validate()?;
    let case = CaseRepo::create(&state.pool, &new_case).await?;
    Ok(Json(CaseResponse {
        message: "Case created successfully",
        case,
    }))
}

/// PATCH /api/v1/cases/{case_id}
///
/// Partial update of an active case. Only `status`, `victims`, and
/// `source_reports` are mutable; a status change requires `updated_by`
/// and appends a history entry.
pub async fn update(
    State(state): State<AppState>,
    Path(case_id): Path<String>,
    Json(body): Json<UpdateCase>,
) -> AppResult<Json<CaseResponse>> {
    let id = parse_case_id(&case_id)?;
    let changes = body.validate()?;

    let case = CaseRepo::update(&state.pool, id, &changes)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Case",
            id: case_id,
        }))?;

    Ok(Json(CaseResponse {
        message: "Case updated successfully",
        case,
    }))
}

/// DELETE /api/v1/cases/{case_id}
///
/// Soft delete: move the case from the active to the archived collection.
pub async fn archive(
    State(state): State<AppState>,
    Path(case_id): Path<String>,
) -> AppResult<Json<CaseRefResponse>> {
    let id = parse_case_id(&case_id)?;

    if CaseRepo::archive(&state.pool, id).await? {
        Ok(Json(CaseRefResponse {
            message: "Case archived successfully",
            case_id: id,
        }))
    } else {
        Err(AppError::Core(CoreError::NotFound {
            entity: "Case",
            id: case_id,
        }))
    }
}

/// POST /api/v1/cases/archive/{case_id}/restore
///
/// Move an archived case back to the active collection.
pub async fn restore(
    State(state): State<AppState>,
    Path(case_id): Path<String>,
) -> AppResult<Json<CaseRefResponse>> {
    let id = parse_case_id(&case_id)?;

    if CaseRepo::restore(&state.pool, id).await? {
        Ok(Json(CaseRefResponse {
            message: "Case restored successfully",
            case_id: id,
        }))
    } else {
        Err(AppError::Core(CoreError::NotFound {
            entity: "ArchivedCase",
            id: case_id,
        }))
    }
}

// ── Private helpers ──────────────────────────────────────────────────────

async fn list_scope(
    state: AppState,
    params: CaseFilterInput,
    scope: CaseScope,
) -> AppResult<Json<CaseListResponse>> {
    let filter = FilterSet::build(params, state.config.date_range_policy)?;
    let page = CaseRepo::list(&state.pool, scope, &filter).await?;
    Ok(Json(CaseListResponse::new(page, &filter)))
}

async fn fetch_one(state: AppState, raw_id: String, scope: CaseScope) -> AppResult<Json<Case>> {
    let id = parse_case_id(&raw_id)?;
    let entity = match scope {
        CaseScope::Active => "Case",
        CaseScope::Archived => "ArchivedCase",
    };

    let case = CaseRepo::find_by_id(&state.pool, scope, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity, id: raw_id }))?;

    Ok(Json(case))
}

/// Parse a path id into a storage id.
///
/// A malformed id is a 400 validation error, distinct from the 404 a
/// well-formed-but-absent id produces.
fn parse_case_id(raw: &str) -> Result<DbId, AppError> {
    match raw.parse::<DbId>() {
        Ok(id) if id > 0 => Ok(id),
        _ => Err(AppError::Core(CoreError::Validation(format!(
            "Invalid case id format: {raw}"
        )))),
    }
}
