//! Query-string extraction.
//!
//! Axum's `Query` rejects malformed parameters with a plain-text body;
//! wrapping it keeps those failures on the same `{error, code}` JSON
//! envelope as every other 400.

use axum::extract::{FromRequestParts, Query};
use axum::http::request::Parts;
use hrm_core::error::CoreError;
use hrm_core::filter::CaseFilterInput;

use crate::error::AppError;

/// List-filter parameters from the query string.
pub struct FilterQuery(pub CaseFilterInput);

impl<S> FromRequestParts<S> for FilterQuery
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Query(input) = Query::<CaseFilterInput>::from_request_parts(parts, state)
            .await
            .map_err(|rejection| CoreError::Validation(rejection.body_text()))?;
        Ok(FilterQuery(input))
    }
}
