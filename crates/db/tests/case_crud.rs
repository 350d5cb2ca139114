//! Integration tests for case creation, reads, filtering, and update.
//!
//! Exercises the repository layer against a real database to verify that:
//! - Create assigns a unique case code and writes the initial history entry
//! - List filtering composes (superset tags, exact match, search, dates)
//! - Pagination is clamped and ordered newest-first
//! - Update only touches the mutable fields and records status changes

use hrm_core::case::{CaseChanges, CasePriority, CaseStatus, NewCase, StatusChange};
use hrm_core::filter::{CaseFilterInput, DateRangePolicy, FilterSet};
use hrm_db::repositories::{CaseRepo, CaseScope, StatusHistoryRepo};
use sqlx::PgPool;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn new_case(title: &str) -> NewCase {
    NewCase {
        title: title.to_string(),
        description: "repository test case".to_string(),
        violation_types: vec!["torture".to_string()],
        status: CaseStatus::New,
        priority: CasePriority::Medium,
        country: "Freedonia".to_string(),
        region: None,
        city: None,
        address: None,
        latitude: None,
        longitude: None,
        created_by: "investigator-1".to_string(),
        victims: Vec::new(),
        source_reports: Vec::new(),
    }
}

fn filter(input: CaseFilterInput) -> FilterSet {
    FilterSet::build(input, DateRangePolicy::Allow).unwrap()
}

// ---------------------------------------------------------------------------
// Create
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn create_assigns_case_code_and_initial_history(pool: PgPool) {
    let case = CaseRepo::create(&pool, &new_case("Initial History"))
        .await
        .unwrap();

    assert!(case.case_code.starts_with("HRM-"));
    assert_eq!(case.status, "new");
    assert!(case.archived_at.is_none());

    let history = StatusHistoryRepo::list_for_case(&pool, &case.case_code)
        .await
        .unwrap();
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].status, "new");
    assert_eq!(history[0].updated_by, "investigator-1");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn case_codes_are_unique_and_sequential(pool: PgPool) {
    let a = CaseRepo::create(&pool, &new_case("First")).await.unwrap();
    let b = CaseRepo::create(&pool, &new_case("Second")).await.unwrap();
    assert_ne!(a.case_code, b.case_code);
}

// ---------------------------------------------------------------------------
// List: filtering
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn violation_types_filter_requires_all_tags(pool: PgPool) {
    let mut both = new_case("Both Tags");
    both.violation_types = vec!["torture".to_string(), "illegal detention".to_string()];
    let both = CaseRepo::create(&pool, &both).await.unwrap();

    let mut one = new_case("One Tag");
    one.violation_types = vec!["torture".to_string()];
    CaseRepo::create(&pool, &one).await.unwrap();

    let fs = filter(CaseFilterInput {
        violation_types: Some("torture,illegal detention".to_string()),
        ..Default::default()
    });
    let page = CaseRepo::list(&pool, CaseScope::Active, &fs).await.unwrap();

    assert_eq!(page.total_count, 1);
    assert_eq!(page.cases[0].id, both.id);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn status_and_country_filters_are_exact(pool: PgPool) {
    let mut abroad = new_case("Abroad");
    abroad.country = "Sylvania".to_string();
    CaseRepo::create(&pool, &abroad).await.unwrap();
    CaseRepo::create(&pool, &new_case("Home")).await.unwrap();

    let fs = filter(CaseFilterInput {
        country: Some("Freedonia".to_string()),
        status: Some("new".to_string()),
        ..Default::default()
    });
    let page = CaseRepo::list(&pool, CaseScope::Active, &fs).await.unwrap();
    assert_eq!(page.total_count, 1);
    assert_eq!(page.cases[0].location.country, "Freedonia");

    // Country match is case-sensitive as stored.
    let fs = filter(CaseFilterInput {
        country: Some("freedonia".to_string()),
        ..Default::default()
    });
    let page = CaseRepo::list(&pool, CaseScope::Active, &fs).await.unwrap();
    assert_eq!(page.total_count, 0);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn search_matches_title_or_description_case_insensitively(pool: PgPool) {
    let mut by_title = new_case("Checkpoint Incident");
    by_title.description = "nothing remarkable".to_string();
    CaseRepo::create(&pool, &by_title).await.unwrap();

    let mut by_desc = new_case("Unrelated");
    by_desc.description = "Seen near the checkpoint".to_string();
    CaseRepo::create(&pool, &by_desc).await.unwrap();

    CaseRepo::create(&pool, &new_case("Other")).await.unwrap();

    let fs = filter(CaseFilterInput {
        search: Some("CHECKPOINT".to_string()),
        ..Default::default()
    });
    let page = CaseRepo::list(&pool, CaseScope::Active, &fs).await.unwrap();
    assert_eq!(page.total_count, 2);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn search_matches_like_metacharacters_literally(pool: PgPool) {
    let mut with_percent = new_case("Detained 50% of residents");
    with_percent.description = "mass arrest".to_string();
    CaseRepo::create(&pool, &with_percent).await.unwrap();

    let mut without = new_case("Detained 50 residents");
    without.description = "mass arrest".to_string();
    CaseRepo::create(&pool, &without).await.unwrap();

    // "%" in the term is a literal character, not a wildcard.
    let fs = filter(CaseFilterInput {
        search: Some("50%".to_string()),
        ..Default::default()
    });
    let page = CaseRepo::list(&pool, CaseScope::Active, &fs).await.unwrap();
    assert_eq!(page.total_count, 1);
    assert_eq!(page.cases[0].title, "Detained 50% of residents");

    // "_" would otherwise match any single character ("50 " here).
    let fs = filter(CaseFilterInput {
        search: Some("50_".to_string()),
        ..Default::default()
    });
    let page = CaseRepo::list(&pool, CaseScope::Active, &fs).await.unwrap();
    assert_eq!(page.total_count, 0);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn date_range_bounds_creation_timestamp_inclusively(pool: PgPool) {
    let case = CaseRepo::create(&pool, &new_case("Dated")).await.unwrap();
    let today = case.created_at.date_naive().format("%Y-%m-%d").to_string();

    let fs = filter(CaseFilterInput {
        date_from: Some(today.clone()),
        date_to: Some(today),
        ..Default::default()
    });
    let page = CaseRepo::list(&pool, CaseScope::Active, &fs).await.unwrap();
    assert_eq!(page.total_count, 1);

    let fs = filter(CaseFilterInput {
        date_from: Some("2099-01-01".to_string()),
        ..Default::default()
    });
    let page = CaseRepo::list(&pool, CaseScope::Active, &fs).await.unwrap();
    assert_eq!(page.total_count, 0);
}

// ---------------------------------------------------------------------------
// List: pagination and ordering
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn list_pages_newest_first(pool: PgPool) {
    let mut ids = Vec::new();
    for i in 0..5 {
        let case = CaseRepo::create(&pool, &new_case(&format!("Case {i}")))
            .await
            .unwrap();
        ids.push(case.id);
    }

    let fs = filter(CaseFilterInput {
        limit: Some(2),
        ..Default::default()
    });
    let page = CaseRepo::list(&pool, CaseScope::Active, &fs).await.unwrap();
    assert_eq!(page.total_count, 5);
    assert_eq!(page.cases.len(), 2);
    // Newest first; creation order is ascending so the last id comes back first.
    assert_eq!(page.cases[0].id, ids[4]);
    assert_eq!(page.cases[1].id, ids[3]);

    let fs = filter(CaseFilterInput {
        limit: Some(2),
        skip: Some(4),
        ..Default::default()
    });
    let page = CaseRepo::list(&pool, CaseScope::Active, &fs).await.unwrap();
    assert_eq!(page.cases.len(), 1);
    assert_eq!(page.cases[0].id, ids[0]);
}

// ---------------------------------------------------------------------------
// find_by_id
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn find_by_id_respects_scope(pool: PgPool) {
    let case = CaseRepo::create(&pool, &new_case("Scoped")).await.unwrap();

    assert!(CaseRepo::find_by_id(&pool, CaseScope::Active, case.id)
        .await
        .unwrap()
        .is_some());
    assert!(CaseRepo::find_by_id(&pool, CaseScope::Archived, case.id)
        .await
        .unwrap()
        .is_none());
}

// ---------------------------------------------------------------------------
// Update
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn status_update_appends_history_and_bumps_updated_at(pool: PgPool) {
    let case = CaseRepo::create(&pool, &new_case("Status Change"))
        .await
        .unwrap();

    let changes = CaseChanges {
        status: Some(StatusChange {
            status: CaseStatus::Open,
            updated_by: "supervisor-1".to_string(),
        }),
        victims: None,
        source_reports: None,
    };
    let updated = CaseRepo::update(&pool, case.id, &changes)
        .await
        .unwrap()
        .unwrap();

    assert_eq!(updated.status, "open");
    assert!(updated.updated_at > case.updated_at);

    let history = StatusHistoryRepo::list_for_case(&pool, &case.case_code)
        .await
        .unwrap();
    assert_eq!(history.len(), 2);
    assert_eq!(history[1].status, "open");
    assert_eq!(history[1].updated_by, "supervisor-1");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn same_status_update_does_not_append_history(pool: PgPool) {
    let case = CaseRepo::create(&pool, &new_case("No-op Status"))
        .await
        .unwrap();

    let changes = CaseChanges {
        status: Some(StatusChange {
            status: CaseStatus::New,
            updated_by: "supervisor-1".to_string(),
        }),
        victims: None,
        source_reports: None,
    };
    CaseRepo::update(&pool, case.id, &changes).await.unwrap();

    let history = StatusHistoryRepo::list_for_case(&pool, &case.case_code)
        .await
        .unwrap();
    assert_eq!(history.len(), 1);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn victims_update_replaces_the_stored_list(pool: PgPool) {
    let mut seed = new_case("Victim List");
    seed.victims = vec!["v1".to_string(), "v2".to_string()];
    let case = CaseRepo::create(&pool, &seed).await.unwrap();

    let changes = CaseChanges {
        status: None,
        victims: Some(vec!["v3".to_string()]),
        source_reports: None,
    };
    let updated = CaseRepo::update(&pool, case.id, &changes)
        .await
        .unwrap()
        .unwrap();

    // Replacement, not a merge.
    assert_eq!(updated.victims, vec!["v3".to_string()]);
    assert_eq!(updated.status, "new");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn update_misses_archived_cases(pool: PgPool) {
    let case = CaseRepo::create(&pool, &new_case("Archived Then Updated"))
        .await
        .unwrap();
    assert!(CaseRepo::archive(&pool, case.id).await.unwrap());

    let changes = CaseChanges {
        status: Some(StatusChange {
            status: CaseStatus::Open,
            updated_by: "supervisor-1".to_string(),
        }),
        victims: None,
        source_reports: None,
    };
    let result = CaseRepo::update(&pool, case.id, &changes).await.unwrap();
    assert!(result.is_none(), "archived cases must not be updatable");
}
