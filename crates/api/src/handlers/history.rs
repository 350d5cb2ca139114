//! Handler for the status-history endpoint.

use axum::extract::{Path, State};
use axum::Json;
use hrm_core::error::CoreError;
use hrm_db::models::status_history::StatusHistoryEntry;
use hrm_db::repositories::StatusHistoryRepo;
use serde::Serialize;

use crate::error::{AppError, AppResult};
use crate::state::AppState;

/// Response payload for the history endpoint.
#[derive(Debug, Serialize)]
pub struct CaseHistoryResponse {
    pub case_id: String,
    pub history: Vec<StatusHistoryEntry>,
}

/// GET /api/v1/cases/history/{case_id}
///
/// Status history by human-readable case code, in chronological order.
/// An unknown code is a 404: every case writes its initial entry at
/// creation, so an empty history means the code never existed.
pub async fn get_history(
    State(state): State<AppState>,
    Path(case_code): Path<String>,
) -> AppResult<Json<CaseHistoryResponse>> {
    let history = StatusHistoryRepo::list_for_case(&state.pool, &case_code).await?;

    if history.is_empty() {
        return Err(AppError::Core(CoreError::NotFound {
            entity: "CaseHistory",
            id: case_code,
        }));
    }

    Ok(Json(CaseHistoryResponse {
        case_id: case_code,
        history,
    }))
}
