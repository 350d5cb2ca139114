//! Case domain types: status/priority enumerations, write-request DTOs,
//! and the validation that turns loosely-typed request bodies into
//! well-formed values before anything touches storage.
//!
//! Request bodies are deliberately lenient (all fields optional, single
//! value or list accepted for reference arrays); validation here produces
//! `Missing required field: <name>` style errors so the API layer can map
//! them straight to 400 responses.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

// ---------------------------------------------------------------------------
// Enumerations
// ---------------------------------------------------------------------------

/// Lifecycle status of a case. Stored as TEXT; every transition is
/// recorded in the status history log.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CaseStatus {
    New,
    Open,
    UnderInvestigation,
    Closed,
}

impl CaseStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            CaseStatus::New => "new",
            CaseStatus::Open => "open",
            CaseStatus::UnderInvestigation => "under_investigation",
            CaseStatus::Closed => "closed",
        }
    }
}

impl fmt::Display for CaseStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CaseStatus {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "new" => Ok(CaseStatus::New),
            "open" => Ok(CaseStatus::Open),
            "under_investigation" => Ok(CaseStatus::UnderInvestigation),
            "closed" => Ok(CaseStatus::Closed),
            other => Err(CoreError::Validation(format!(
                "Invalid status '{other}'. Must be one of: new, open, under_investigation, closed"
            ))),
        }
    }
}

/// Triage priority of a case.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CasePriority {
    Low,
    Medium,
    High,
}

impl CasePriority {
    pub fn as_str(&self) -> &'static str {
        match self {
            CasePriority::Low => "low",
            CasePriority::Medium => "medium",
            CasePriority::High => "high",
        }
    }
}

impl fmt::Display for CasePriority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CasePriority {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "low" => Ok(CasePriority::Low),
            "medium" => Ok(CasePriority::Medium),
            "high" => Ok(CasePriority::High),
            other => Err(CoreError::Validation(format!(
                "Invalid priority '{other}'. Must be one of: low, medium, high"
            ))),
        }
    }
}

// ---------------------------------------------------------------------------
// Case code
// ---------------------------------------------------------------------------

/// Format the human-readable case code from a year and a sequence value
/// (e.g. `HRM-2023-4001`). Uniqueness comes from the sequence; the year is
/// informational.
pub fn format_case_code(year: i32, seq: i64) -> String {
    format!("HRM-{year}-{seq}")
}

// ---------------------------------------------------------------------------
// One-or-many reference lists
// ---------------------------------------------------------------------------

/// Accepts either a single reference or a list of references in request
/// bodies (`"victims": "v1"` and `"victims": ["v1", "v2"]` are both valid).
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum OneOrMany {
    One(String),
    Many(Vec<String>),
}

impl OneOrMany {
    /// Normalize to an ordered, deduplicated list.
    pub fn into_refs(self) -> Vec<String> {
        let raw = match self {
            OneOrMany::One(v) => vec![v],
            OneOrMany::Many(vs) => vs,
        };
        let mut out: Vec<String> = Vec::with_capacity(raw.len());
        for item in raw {
            if !item.is_empty() && !out.contains(&item) {
                out.push(item);
            }
        }
        out
    }
}

// ---------------------------------------------------------------------------
// Create request
// ---------------------------------------------------------------------------

/// Raw create-case request body. Everything is optional at the serde level
/// so missing fields surface as field-naming validation errors (400)
/// instead of deserialization failures.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CreateCase {
    pub title: Option<String>,
    pub description: Option<String>,
    #[serde(default)]
    pub violation_types: Vec<String>,
    pub status: Option<String>,
    pub priority: Option<String>,
    pub location: Option<CreateLocation>,
    pub created_by: Option<String>,
    pub victims: Option<OneOrMany>,
    pub source_reports: Option<OneOrMany>,
}

/// Location portion of a create request. Only `country` is required.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CreateLocation {
    pub country: Option<String>,
    pub region: Option<String>,
    pub city: Option<String>,
    pub address: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

/// A fully validated create request, ready for insertion.
#[derive(Debug, Clone)]
pub struct NewCase {
    pub title: String,
    pub description: String,
    pub violation_types: Vec<String>,
    pub status: CaseStatus,
    pub priority: CasePriority,
    pub country: String,
    pub region: Option<String>,
    pub city: Option<String>,
    pub address: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub created_by: String,
    pub victims: Vec<String>,
    pub source_reports: Vec<String>,
}

impl CreateCase {
    /// Validate required fields and normalize into a [`NewCase`].
    ///
    /// Status defaults to `new` when omitted. `violation_types` must be
    /// non-empty after trimming; `victims`/`source_reports` default to
    /// empty lists.
    pub fn validate(self) -> Result<NewCase, CoreError> {
        let title = required(self.title, "title")?;
        let description = required(self.description, "description")?;

        let violation_types: Vec<String> = self
            .violation_types
            .into_iter()
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .collect();
        if violation_types.is_empty() {
            return Err(missing("violation_types"));
        }

        let status = match self.status.as_deref() {
            None | Some("") => CaseStatus::New,
            Some(s) => s.parse()?,
        };

        let priority: CasePriority = required(self.priority, "priority")?.parse()?;

        let location = self.location.unwrap_or_default();
        let country = required(location.country, "location.country")?;

        let created_by = required(self.created_by, "created_by")?;

        Ok(NewCase {
            title,
            description,
            violation_types,
            status,
            priority,
            country,
            region: location.region,
            city: location.city,
            address: location.address,
            latitude: location.latitude,
            longitude: location.longitude,
            created_by,
            victims: self.victims.map(OneOrMany::into_refs).unwrap_or_default(),
            source_reports: self
                .source_reports
                .map(OneOrMany::into_refs)
                .unwrap_or_default(),
        })
    }
}

// ---------------------------------------------------------------------------
// Update request
// ---------------------------------------------------------------------------

/// Raw partial-update request body. Only `status`, `victims`, and
/// `source_reports` are mutable after creation.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateCase {
    pub status: Option<String>,
    pub victims: Option<OneOrMany>,
    pub source_reports: Option<OneOrMany>,
    pub updated_by: Option<String>,
}

/// A status transition: the new value together with the actor recorded
/// in the history log. A transition without an actor cannot be
/// constructed through validation.
#[derive(Debug, Clone)]
pub struct StatusChange {
    pub status: CaseStatus,
    pub updated_by: String,
}

/// A validated set of changes to apply to an active case.
/// `victims`/`source_reports`, when present, replace the stored lists.
#[derive(Debug, Clone)]
pub struct CaseChanges {
    pub status: Option<StatusChange>,
    pub victims: Option<Vec<String>>,
    pub source_reports: Option<Vec<String>>,
}

impl UpdateCase {
    /// Validate the partial update.
    ///
    /// At least one mutable field must be provided. A status change also
    /// requires `updated_by`, which attributes the history entry.
    pub fn validate(self) -> Result<CaseChanges, CoreError> {
        if self.status.is_none() && self.victims.is_none() && self.source_reports.is_none() {
            return Err(CoreError::Validation(
                "No fields provided for update".to_string(),
            ));
        }

        let updated_by = match self.updated_by {
            Some(u) if !u.is_empty() => Some(u),
            _ => None,
        };

        let status = match self.status.as_deref() {
            None => None,
            Some(s) => {
                let status = s.parse::<CaseStatus>()?;
                let updated_by = updated_by.ok_or_else(|| {
                    CoreError::Validation(
                        "Missing required field: updated_by (required when status changes)"
                            .to_string(),
                    )
                })?;
                Some(StatusChange { status, updated_by })
            }
        };

        Ok(CaseChanges {
            status,
            victims: self.victims.map(OneOrMany::into_refs),
            source_reports: self.source_reports.map(OneOrMany::into_refs),
        })
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn required(value: Option<String>, field: &str) -> Result<String, CoreError> {
    match value {
        Some(v) if !v.trim().is_empty() => Ok(v),
        _ => Err(missing(field)),
    }
}

fn missing(field: &str) -> CoreError {
    CoreError::Validation(format!("Missing required field: {field}"))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
