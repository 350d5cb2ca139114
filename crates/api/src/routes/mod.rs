pub mod cases;
pub mod health;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// ```text
/// /cases                               list, create
/// /cases/{case_id}                     get, patch, archive
/// /cases/archive                       list archived
/// /cases/archive/{case_id}             get archived
/// /cases/archive/{case_id}/restore     restore (POST)
/// /cases/history/{case_id}             status history by case code
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new().nest("/cases", cases::router())
}
