//! Route definitions for the `/cases` resource.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::{cases, history};
use crate::state::AppState;

/// Routes mounted at `/cases`.
///
/// ```text
/// GET    /                              -> list_active (filtered + paginated)
/// POST   /                              -> create
/// GET    /archive                       -> list_archived (same filters)
/// GET    /archive/{case_id}             -> get_archived
/// POST   /archive/{case_id}/restore     -> restore
/// GET    /history/{case_id}             -> get_history (by case code)
/// GET    /{case_id}                     -> get_active
/// PATCH  /{case_id}                     -> update (status/victims/source_reports)
/// DELETE /{case_id}                     -> archive (soft delete)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(cases::list_active).post(cases::create))
        .route("/archive", get(cases::list_archived))
        .route("/archive/{case_id}", get(cases::get_archived))
        .route("/archive/{case_id}/restore", post(cases::restore))
        .route("/history/{case_id}", get(history::get_history))
        .route(
            "/{case_id}",
            get(cases::get_active)
                .patch(cases::update)
                .delete(cases::archive),
        )
}
