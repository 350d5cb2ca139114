//! Repository for the `cases` table.
//!
//! Every read and the archive/restore moves are parameterized by
//! [`CaseScope`], which selects the active or archived logical collection
//! via the `archived_at` tag. Create and update run in a transaction so
//! the case row and its status-history entry land together.

use chrono::Datelike;
use hrm_core::case::{format_case_code, CaseChanges, NewCase};
use hrm_core::filter::FilterSet;
use hrm_core::types::{DbId, Timestamp};
use sqlx::postgres::PgArguments;
use sqlx::query::{QueryAs, QueryScalar};
use sqlx::{PgPool, Postgres};

use crate::models::case::{Case, CasePage};
use crate::repositories::status_history_repo::StatusHistoryRepo;

/// Column list for `cases` SELECT queries.
const COLUMNS: &str = "\
    id, case_code, title, description, violation_types, status, priority, \
    country, region, city, address, latitude, longitude, \
    created_by, victims, source_reports, archived_at, created_at, updated_at";

/// Column list for INSERT (excludes generated `id`, `case_code` is bound,
/// timestamps and `archived_at` take their defaults).
const INSERT_COLUMNS: &str = "\
    case_code, title, description, violation_types, status, priority, \
    country, region, city, address, latitude, longitude, \
    created_by, victims, source_reports";

/// Which logical collection an operation targets. A case is always in
/// exactly one of the two.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaseScope {
    Active,
    Archived,
}

impl CaseScope {
    /// WHERE predicate selecting this collection.
    fn predicate(self) -> &'static str {
        match self {
            CaseScope::Active => "archived_at IS NULL",
            CaseScope::Archived => "archived_at IS NOT NULL",
        }
    }
}

/// Query and mutation operations for case records.
pub struct CaseRepo;

impl CaseRepo {
    /// List cases in the given scope matching the filter, newest first
    /// (ties broken by storage id), plus the total match count.
    pub async fn list(
        pool: &PgPool,
        scope: CaseScope,
        filter: &FilterSet,
    ) -> Result<CasePage, sqlx::Error> {
        let (conditions, bind_values, bind_idx) = build_case_filter(filter);

        let mut where_parts = vec![scope.predicate().to_string()];
        where_parts.extend(conditions);
        let where_clause = format!("WHERE {}", where_parts.join(" AND "));

        let query = format!(
            "SELECT {COLUMNS} FROM cases {where_clause} \
             ORDER BY created_at DESC, id DESC \
             LIMIT ${bind_idx} OFFSET ${}",
            bind_idx + 1
        );

        let q = bind_case_values(sqlx::query_as::<_, Case>(&query), &bind_values);
        let cases = q.bind(filter.limit).bind(filter.skip).fetch_all(pool).await?;

        let count_query = format!("SELECT COUNT(*)::BIGINT FROM cases {where_clause}");
        let total_count = bind_case_values_scalar(sqlx::query_scalar(&count_query), &bind_values)
            .fetch_one(pool)
            .await?;

        Ok(CasePage { cases, total_count })
    }

    /// Find a case by storage id within the given scope.
    pub async fn find_by_id(
        pool: &PgPool,
        scope: CaseScope,
        id: DbId,
    ) -> Result<Option<Case>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM cases WHERE id = $1 AND {}",
            scope.predicate()
        );
        sqlx::query_as::<_, Case>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Insert a new case into the active collection and record its initial
    /// status-history entry, atomically.
    ///
    /// The case code is drawn from `case_code_seq` and formatted as
    /// `HRM-{year}-{seq}`.
    pub async fn create(pool: &PgPool, new_case: &NewCase) -> Result<Case, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let seq: i64 = sqlx::query_scalar("SELECT nextval('case_code_seq')")
            .fetch_one(&mut *tx)
            .await?;
        let case_code = format_case_code(chrono::Utc::now().year(), seq);

        let query = format!(
            "INSERT INTO cases ({INSERT_COLUMNS}) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15) \
             RETURNING {COLUMNS}"
        );
        let case = sqlx::query_as::<_, Case>(&query)
            .bind(&case_code)
            .bind(&new_case.title)
            .bind(&new_case.description)
            .bind(&new_case.violation_types)
            .bind(new_case.status.as_str())
            .bind(new_case.priority.as_str())
            .bind(&new_case.country)
            .bind(&new_case.region)
            .bind(&new_case.city)
            .bind(&new_case.address)
            .bind(new_case.latitude)
            .bind(new_case.longitude)
            .bind(&new_case.created_by)
            .bind(&new_case.victims)
            .bind(&new_case.source_reports)
            .fetch_one(&mut *tx)
            .await?;

        StatusHistoryRepo::append(
            &mut *tx,
            &case.case_code,
            new_case.status.as_str(),
            &new_case.created_by,
        )
        .await?;

        tx.commit().await?;
        tracing::debug!(case_code = %case.case_code, "Created case");
        Ok(case)
    }

    /// Apply a partial update to an active case.
    ///
    /// Returns `Ok(None)` when the id is not in the active collection.
    /// When the status value actually changes, a history entry is appended
    /// in the same transaction. `victims`/`source_reports` replace the
    /// stored lists wholesale.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        changes: &CaseChanges,
    ) -> Result<Option<Case>, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let select = format!(
            "SELECT {COLUMNS} FROM cases WHERE id = $1 AND archived_at IS NULL FOR UPDATE"
        );
        let existing = sqlx::query_as::<_, Case>(&select)
            .bind(id)
            .fetch_optional(&mut *tx)
            .await?;
        let Some(existing) = existing else {
            return Ok(None);
        };

        let mut sets = vec!["updated_at = now()".to_string()];
        let mut bind_idx = 2u32; // $1 is the id
        let mut bind_values: Vec<BindValue> = Vec::new();

        if let Some(ref change) = changes.status {
            sets.push(format!("status = ${bind_idx}"));
            bind_idx += 1;
            bind_values.push(BindValue::Text(change.status.as_str().to_string()));
        }

        if let Some(ref victims) = changes.victims {
            sets.push(format!("victims = ${bind_idx}"));
            bind_idx += 1;
            bind_values.push(BindValue::TextArray(victims.clone()));
        }

        if let Some(ref source_reports) = changes.source_reports {
            sets.push(format!("source_reports = ${bind_idx}"));
            bind_values.push(BindValue::TextArray(source_reports.clone()));
        }

        let query = format!(
            "UPDATE cases SET {} WHERE id = $1 RETURNING {COLUMNS}",
            sets.join(", ")
        );
        let q = bind_case_values(sqlx::query_as::<_, Case>(&query).bind(id), &bind_values);
        let updated = q.fetch_one(&mut *tx).await?;

        if let Some(ref change) = changes.status {
            if change.status.as_str() != existing.status {
                StatusHistoryRepo::append(
                    &mut *tx,
                    &updated.case_code,
                    change.status.as_str(),
                    &change.updated_by,
                )
                .await?;
            }
        }

        tx.commit().await?;
        Ok(Some(updated))
    }

    /// Move a case from the active to the archived collection.
    ///
    /// A single-row UPDATE of the `archived_at` tag: the move is atomic
    /// and leaves every other field untouched. Returns `false` when the
    /// id is not currently active.
    pub async fn archive(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result =
            sqlx::query("UPDATE cases SET archived_at = now() WHERE id = $1 AND archived_at IS NULL")
                .bind(id)
                .execute(pool)
                .await?;
        let moved = result.rows_affected() > 0;
        if moved {
            tracing::debug!(%id, "Archived case");
        }
        Ok(moved)
    }

    /// Move a case from the archived collection back to active.
    ///
    /// Inverse of [`CaseRepo::archive`]; does not touch `updated_at`, so
    /// an archive/restore round trip leaves the record identical.
    pub async fn restore(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE cases SET archived_at = NULL WHERE id = $1 AND archived_at IS NOT NULL",
        )
        .bind(id)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }
}

// ---------------------------------------------------------------------------
// Internal helpers for dynamic query building
// ---------------------------------------------------------------------------

/// Typed bind value for dynamically-built case queries.
enum BindValue {
    Text(String),
    TextArray(Vec<String>),
    Timestamp(Timestamp),
}

/// Build WHERE conditions and bind values from an already-normalized
/// [`FilterSet`].
///
/// Returns `(conditions, bind_values, next_bind_index)`. The scope
/// predicate is not included; callers prepend it.
fn build_case_filter(filter: &FilterSet) -> (Vec<String>, Vec<BindValue>, u32) {
    let mut conditions: Vec<String> = Vec::new();
    let mut bind_idx = 1u32;
    let mut bind_values: Vec<BindValue> = Vec::new();

    if !filter.violation_types.is_empty() {
        // Superset semantics: the case must carry every requested tag.
        conditions.push(format!("violation_types @> ${bind_idx}"));
        bind_idx += 1;
        bind_values.push(BindValue::TextArray(filter.violation_types.clone()));
    }

    if let Some(status) = filter.status {
        conditions.push(format!("status = ${bind_idx}"));
        bind_idx += 1;
        bind_values.push(BindValue::Text(status.as_str().to_string()));
    }

    if let Some(ref country) = filter.country {
        conditions.push(format!("country = ${bind_idx}"));
        bind_idx += 1;
        bind_values.push(BindValue::Text(country.clone()));
    }

    if let Some(ref region) = filter.region {
        conditions.push(format!("region = ${bind_idx}"));
        bind_idx += 1;
        bind_values.push(BindValue::Text(region.clone()));
    }

    if let Some(priority) = filter.priority {
        conditions.push(format!("priority = ${bind_idx}"));
        bind_idx += 1;
        bind_values.push(BindValue::Text(priority.as_str().to_string()));
    }

    if let Some(ref search) = filter.search {
        conditions.push(format!(
            "(title ILIKE ${bind_idx} ESCAPE '\\' OR description ILIKE ${} ESCAPE '\\')",
            bind_idx + 1
        ));
        bind_idx += 2;
        // Substring match, so LIKE metacharacters in the term are literal.
        let pattern = format!("%{}%", escape_like(search));
        bind_values.push(BindValue::Text(pattern.clone()));
        bind_values.push(BindValue::Text(pattern));
    }

    if let Some(from) = filter.created_from {
        conditions.push(format!("created_at >= ${bind_idx}"));
        bind_idx += 1;
        bind_values.push(BindValue::Timestamp(from));
    }

    if let Some(to) = filter.created_to {
        conditions.push(format!("created_at <= ${bind_idx}"));
        bind_idx += 1;
        bind_values.push(BindValue::Timestamp(to));
    }

    (conditions, bind_values, bind_idx)
}

/// Escape `\`, `%`, and `_` so a search term matches them literally
/// inside a LIKE pattern.
fn escape_like(term: &str) -> String {
    term.replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_")
}

fn bind_case_values<'q>(
    mut q: QueryAs<'q, Postgres, Case, PgArguments>,
    values: &'q [BindValue],
) -> QueryAs<'q, Postgres, Case, PgArguments> {
    for val in values {
        q = match val {
            BindValue::Text(v) => q.bind(v),
            BindValue::TextArray(v) => q.bind(v),
            BindValue::Timestamp(v) => q.bind(*v),
        };
    }
    q
}

fn bind_case_values_scalar<'q>(
    mut q: QueryScalar<'q, Postgres, i64, PgArguments>,
    values: &'q [BindValue],
) -> QueryScalar<'q, Postgres, i64, PgArguments> {
    for val in values {
        q = match val {
            BindValue::Text(v) => q.bind(v),
            BindValue::TextArray(v) => q.bind(v),
            BindValue::Timestamp(v) => q.bind(*v),
        };
    }
    q
}
