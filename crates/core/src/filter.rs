//! Filter Builder: turns raw, all-optional list-query parameters into a
//! normalized [`FilterSet`] or a validation error.
//!
//! The builder runs before any storage call. It also produces the
//! [`FiltersApplied`] echo returned in list responses, which records
//! exactly which filters the caller supplied (absent filters stay null,
//! never their defaults).

use chrono::{NaiveDate, NaiveTime, TimeDelta};
use serde::{Deserialize, Serialize};

use crate::case::{CasePriority, CaseStatus};
use crate::error::CoreError;
use crate::types::Timestamp;

/// Page size applied when the caller does not send `limit`.
pub const DEFAULT_LIMIT: i64 = 100;
/// Hard ceiling for `limit`. Out-of-range values are clamped, not rejected.
pub const MAX_LIMIT: i64 = 500;

/// What to do when `date_from` is after `date_to`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DateRangePolicy {
    /// Pass the inverted range through; it matches nothing.
    #[default]
    Allow,
    /// Fail with a validation error.
    Reject,
}

/// Raw query parameters as they arrive on the wire.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CaseFilterInput {
    /// Comma-separated violation-type tags.
    pub violation_types: Option<String>,
    pub status: Option<String>,
    pub country: Option<String>,
    pub region: Option<String>,
    pub priority: Option<String>,
    pub search: Option<String>,
    /// `YYYY-MM-DD`, inclusive lower bound on creation timestamp.
    pub date_from: Option<String>,
    /// `YYYY-MM-DD`, inclusive upper bound (extends to end of day).
    pub date_to: Option<String>,
    pub skip: Option<i64>,
    pub limit: Option<i64>,
}

/// Echo of the filters the caller actually supplied. Serialized into every
/// list response; fields the caller omitted remain null.
#[derive(Debug, Clone, Default, Serialize)]
pub struct FiltersApplied {
    pub violation_types: Option<Vec<String>>,
    pub status: Option<String>,
    pub country: Option<String>,
    pub region: Option<String>,
    pub priority: Option<String>,
    pub search: Option<String>,
    pub date_from: Option<String>,
    pub date_to: Option<String>,
}

/// Normalized, validated filter criteria for listing cases.
#[derive(Debug, Clone)]
pub struct FilterSet {
    /// Matching cases must carry every one of these tags (superset, AND).
    /// Empty means the filter is inactive.
    pub violation_types: Vec<String>,
    pub status: Option<CaseStatus>,
    pub country: Option<String>,
    pub region: Option<String>,
    pub priority: Option<CasePriority>,
    /// Case-insensitive substring on title OR description.
    pub search: Option<String>,
    pub created_from: Option<Timestamp>,
    pub created_to: Option<Timestamp>,
    pub skip: i64,
    pub limit: i64,
    pub applied: FiltersApplied,
}

impl FilterSet {
    /// Build a normalized filter set from raw parameters.
    ///
    /// `status`/`priority` are checked against their enumerations and
    /// dates against `YYYY-MM-DD`; any failure is a validation error.
    /// `skip` and `limit` are clamped rather than rejected.
    pub fn build(input: CaseFilterInput, policy: DateRangePolicy) -> Result<FilterSet, CoreError> {
        let violation_types: Vec<String> = input
            .violation_types
            .as_deref()
            .unwrap_or("")
            .split(',')
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .map(str::to_string)
            .collect();

        let status = match input.status.as_deref() {
            None | Some("") => None,
            Some(s) => Some(s.parse::<CaseStatus>()?),
        };

        let priority = match input.priority.as_deref() {
            None | Some("") => None,
            Some(p) => Some(p.parse::<CasePriority>()?),
        };

        // An empty string is an absent filter, same as status/priority.
        let country = non_empty(input.country);
        let region = non_empty(input.region);
        let search = non_empty(input.search);
        let date_from = non_empty(input.date_from);
        let date_to = non_empty(input.date_to);

        let from_date = date_from.as_deref().map(parse_date).transpose()?;
        let to_date = date_to.as_deref().map(parse_date).transpose()?;

        if let (Some(from), Some(to)) = (from_date, to_date) {
            if from > to && policy == DateRangePolicy::Reject {
                return Err(CoreError::Validation(
                    "date_from must be on or before date_to".to_string(),
                ));
            }
        }

        let applied = FiltersApplied {
            violation_types: (!violation_types.is_empty()).then(|| violation_types.clone()),
            status: status.map(|s| s.as_str().to_string()),
            country: country.clone(),
            region: region.clone(),
            priority: priority.map(|p| p.as_str().to_string()),
            search: search.clone(),
            date_from,
            date_to,
        };

        Ok(FilterSet {
            violation_types,
            status,
            country,
            region,
            priority,
            search,
            created_from: from_date.map(day_start),
            created_to: to_date.map(day_end),
            skip: input.skip.unwrap_or(0).max(0),
            limit: input.limit.unwrap_or(DEFAULT_LIMIT).clamp(1, MAX_LIMIT),
            applied,
        })
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

fn parse_date(s: &str) -> Result<NaiveDate, CoreError> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .map_err(|_| CoreError::Validation("Invalid date format. Use YYYY-MM-DD".to_string()))
}

fn day_start(d: NaiveDate) -> Timestamp {
    d.and_time(NaiveTime::MIN).and_utc()
}

/// Inclusive upper bound: the whole day counts.
fn day_end(d: NaiveDate) -> Timestamp {
    day_start(d) + TimeDelta::seconds(86_399)
}
