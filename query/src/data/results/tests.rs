use std::sync::Arc;

use chrono::NaiveDate;
use proptest::prelude::*;

use super::*;
use crate::core::config::QueryConfig;
use crate::data::error::{QueryError, ResolutionError};
use crate::data::filters::{FieldRef, FilterOperator, FilterSpec, Join, WorkPackageFields};
use crate::data::sqlite::{SqlitePool, open_in_memory};
use crate::utils::time::FixedClock;

const FIXTURE: &str = "
INSERT INTO projects (id, name) VALUES (1, 'Alpha'), (2, 'Beta');
INSERT INTO users (id, login) VALUES (1, 'alice'), (2, 'bob'), (3, 'carol');
INSERT INTO roles (id, name) VALUES (1, 'Developer'), (2, 'Reporter');
INSERT INTO members (id, user_id, project_id) VALUES (1, 1, 1), (2, 2, 1), (3, 2, 2), (4, 3, 2);
INSERT INTO member_roles (member_id, role_id) VALUES (1, 1), (2, 2), (3, 1), (4, 2);
INSERT INTO statuses (id, name, is_closed) VALUES (3, 'In progress', 0), (5, 'Closed', 1);
INSERT INTO work_packages
    (id, project_id, subject, status_id, assigned_to_id, responsible_id, start_date, due_date, created_at, updated_at)
VALUES
    (1, 1, 'Set up CI', NULL, 1, 1, '2024-03-12', '2024-03-20', '2024-03-15 09:00:00', '2024-03-15 09:00:00'),
    (2, 1, 'Write docs', 3, 2, 2, '2024-03-01', '2024-03-14', '2024-03-01 12:00:00', '2024-03-02 12:00:00'),
    (3, 1, 'Release 1.0', 5, NULL, NULL, NULL, NULL, '2024-02-01 08:00:00', '2024-02-05 08:00:00'),
    (4, 2, 'Fix O''Brien login', 3, 3, 1, NULL, '2024-03-18', '2024-03-14 10:00:00', '2024-03-14 10:00:00'),
    (5, 2, 'Archive old builds', 5, 2, NULL, NULL, NULL, '2023-12-31 23:00:00', '2024-01-02 10:00:00');
INSERT INTO custom_fields (id, name, field_format) VALUES (1, 'Points', 'int'), (2, 'Story points', 'int');
INSERT INTO custom_values (customized_id, custom_field_id, value) VALUES
    (1, 1, ''), (2, 1, '10'), (3, 1, 'abc'),
    (1, 2, '42'), (2, 2, '42');
";

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 3, 15).unwrap()
}

async fn setup_pool() -> SqlitePool {
    let pool = open_in_memory().await.unwrap();
    sqlx::query(FIXTURE).execute(&pool).await.unwrap();
    pool
}

async fn setup() -> Aggregator<WorkPackageFields> {
    let pool = setup_pool().await;
    let fields = WorkPackageFields::load(&pool).await.unwrap();
    Aggregator::new(pool, fields, QueryConfig::default()).with_clock(Arc::new(FixedClock(today())))
}

fn everyone() -> ResultQuery {
    ResultQuery::new(&VisibilityScope::all())
}

fn spec(field: &str, op: FilterOperator, values: &[&str]) -> FilterSpec {
    FilterSpec::new(FieldRef::parse(field), op, values.iter().copied())
}

async fn ids(aggregator: &Aggregator<WorkPackageFields>, query: &ResultQuery) -> Vec<i64> {
    let page = aggregator
        .work_packages(query, Pagination::new(1, 100))
        .await
        .unwrap();
    let mut ids: Vec<i64> = page.items.iter().map(|wp| wp.id).collect();
    ids.sort_unstable();
    ids
}

fn sum(counts: &GroupCount) -> u64 {
    counts.values().sum()
}

// =============================================================================
// Filtering
// =============================================================================

#[tokio::test]
async fn test_status_equals_with_null_sentinel() {
    let aggregator = setup().await;
    let query = everyone()
        .project(1)
        .filter(spec("status_id", FilterOperator::Equals, &["-1", "3"]));

    assert_eq!(ids(&aggregator, &query).await, vec![1, 2]);
}

#[tokio::test]
async fn test_custom_numeric_threshold_skips_blank_and_garbage() {
    let aggregator = setup().await;
    let query = everyone().filter(spec("cf_1", FilterOperator::GreaterOrEqual, &["5"]));

    assert_eq!(ids(&aggregator, &query).await, vec![2]);
}

#[tokio::test]
async fn test_open_and_closed_status() {
    let aggregator = setup().await;
    let open = everyone()
        .project(1)
        .filter(FilterSpec::unary(FieldRef::attribute("status_id"), FilterOperator::OpenStatus));
    let closed = everyone()
        .project(1)
        .filter(FilterSpec::unary(FieldRef::attribute("status_id"), FilterOperator::ClosedStatus));

    assert_eq!(ids(&aggregator, &open).await, vec![2]);
    assert_eq!(ids(&aggregator, &closed).await, vec![3]);

    let clause = aggregator.build_where(&open).await.unwrap();
    assert_eq!(clause.joins, vec![Join::Status]);
}

#[tokio::test]
async fn test_relative_date_and_text_filters() {
    let aggregator = setup().await;

    let recent = everyone().filter(spec("created_at", FilterOperator::DateOnOrAfterRelative, &["1"]));
    assert_eq!(ids(&aggregator, &recent).await, vec![1, 4]);

    let overdue = everyone().filter(spec("due_date", FilterOperator::DateOnOrBeforeRelative, &["0"]));
    assert_eq!(ids(&aggregator, &overdue).await, vec![2]);

    let quoted = everyone().filter(spec("subject", FilterOperator::TextContains, &["O'BRIEN"]));
    assert_eq!(ids(&aggregator, &quoted).await, vec![4]);

    let this_week = everyone().filter(FilterSpec::unary(
        FieldRef::attribute("start_date"),
        FilterOperator::DateThisWeek,
    ));
    assert_eq!(ids(&aggregator, &this_week).await, vec![1]);
}

#[tokio::test]
async fn test_far_future_offsets_keep_their_direction() {
    let aggregator = setup().await;

    let after = everyone().filter(spec("due_date", FilterOperator::DateOnOrAfterFuture, &["3000000"]));
    assert!(ids(&aggregator, &after).await.is_empty());

    let before = everyone().filter(spec("due_date", FilterOperator::DateOnOrBeforeFuture, &["3000000"]));
    assert_eq!(ids(&aggregator, &before).await, vec![1, 2, 4]);

    let created = everyone().filter(spec(
        "created_at",
        FilterOperator::DateOnOrAfterFuture,
        &["99999999999999"],
    ));
    assert!(ids(&aggregator, &created).await.is_empty());

    let long_ago = everyone().filter(spec(
        "created_at",
        FilterOperator::DateOnOrAfterRelative,
        &["99999999999999"],
    ));
    assert_eq!(ids(&aggregator, &long_ago).await, vec![1, 2, 3, 4, 5]);
}

#[tokio::test]
async fn test_blank_custom_value() {
    let aggregator = setup().await;
    let blank = everyone().filter(FilterSpec::unary(FieldRef::Custom(1), FilterOperator::IsBlank));
    let present =
        everyone().filter(FilterSpec::unary(FieldRef::Custom(1), FilterOperator::IsPresent));

    assert_eq!(ids(&aggregator, &blank).await, vec![1, 4, 5]);
    assert_eq!(ids(&aggregator, &present).await, vec![2, 3]);
}

#[tokio::test]
async fn test_assigned_to_role() {
    let aggregator = setup().await;

    let developers = everyone().filter(spec("assigned_to_role", FilterOperator::Equals, &["1"]));
    assert_eq!(ids(&aggregator, &developers).await, vec![1, 2, 5]);

    let in_alpha = developers.clone().project(1);
    assert_eq!(ids(&aggregator, &in_alpha).await, vec![1]);

    let not_developers = everyone()
        .project(1)
        .filter(spec("assigned_to_role", FilterOperator::NotEquals, &["1"]));
    assert_eq!(ids(&aggregator, &not_developers).await, vec![2, 3]);

    let ignored = everyone().filter(spec("assigned_to_role", FilterOperator::TextContains, &["1"]));
    assert_eq!(aggregator.count(&ignored).await.unwrap(), 5);
}

#[tokio::test]
async fn test_assigned_to_role_respects_visibility() {
    let aggregator = setup().await;
    let query = ResultQuery::new(&VisibilityScope::member_of(3)).filter(spec(
        "assigned_to_role",
        FilterOperator::Equals,
        &["1"],
    ));

    assert_eq!(ids(&aggregator, &query).await, vec![5]);
}

#[tokio::test]
async fn test_members_with_roles() {
    let pool = setup_pool().await;
    let reporters = vec!["2".to_string()];

    assert_eq!(members_with_roles(&pool, &reporters, None).await.unwrap(), vec![2, 3]);
    assert_eq!(members_with_roles(&pool, &reporters, Some(2)).await.unwrap(), vec![3]);
    assert!(members_with_roles(&pool, &[], None).await.unwrap().is_empty());
}

// =============================================================================
// Visibility and errors
// =============================================================================

#[tokio::test]
async fn test_visibility_cannot_be_widened_by_filters() {
    let aggregator = setup().await;

    let hidden = ResultQuery::new(&VisibilityScope::none())
        .filter(spec("status_id", FilterOperator::NotEquals, &[]));
    assert_eq!(aggregator.count(&hidden).await.unwrap(), 0);

    let beta_only = ResultQuery::new(&VisibilityScope::projects(&[2]))
        .filter(spec("project_id", FilterOperator::Equals, &["1", "2"]));
    assert_eq!(ids(&aggregator, &beta_only).await, vec![4, 5]);

    let escape_attempt = ResultQuery::new(&VisibilityScope::projects(&[2]))
        .filter(spec("subject", FilterOperator::Equals, &["x') OR (1=1"]));
    assert_eq!(aggregator.count(&escape_attempt).await.unwrap(), 0);

    let clause = aggregator.build_where(&beta_only).await.unwrap();
    assert!(clause.sql.starts_with("(work_packages.project_id IN (2)) AND "));
}

#[tokio::test]
async fn test_unknown_field_is_an_error() {
    let aggregator = setup().await;
    let query = everyone().filter(spec("colour", FilterOperator::Equals, &["red"]));

    let err = aggregator.count(&query).await.unwrap_err();
    assert!(matches!(
        err,
        QueryError::Resolution(ResolutionError::UnknownField(ref name)) if name == "colour"
    ));

    let err = aggregator
        .count_by_group(&everyone(), &FieldRef::Custom(99))
        .await
        .unwrap_err();
    assert_eq!(err.code(), "UNKNOWN_CUSTOM_FIELD");

    let unsortable = everyone().order_by(SortKey::asc(FieldRef::attribute("project_id")));
    let err = aggregator
        .work_packages(&unsortable, Pagination::default())
        .await
        .unwrap_err();
    assert_eq!(err.code(), "UNSORTABLE_FIELD");
}

#[tokio::test]
async fn test_store_error_surfaces_verbatim() {
    let aggregator = setup().await;
    let query = ResultQuery::new(&VisibilityScope::from_trusted_sql("no_such_column = 1"));

    let err = aggregator.count(&query).await.unwrap_err();
    assert!(matches!(err, QueryError::Store(sqlx::Error::Database(_))));
    assert!(!err.is_transient());
}

// =============================================================================
// Ordering and pagination
// =============================================================================

#[tokio::test]
async fn test_default_order_is_newest_first() {
    let aggregator = setup().await;
    let page = aggregator
        .work_packages(&everyone(), Pagination::default())
        .await
        .unwrap();

    let ids: Vec<i64> = page.items.iter().map(|wp| wp.id).collect();
    assert_eq!(ids, vec![5, 4, 3, 2, 1]);
    assert_eq!(page.total, 5);
    assert_eq!(page.per_page, 25);
}

#[tokio::test]
async fn test_pages_are_disjoint_and_tie_broken_by_id() {
    let aggregator = setup().await;
    let query = everyone().order_by(SortKey::asc(FieldRef::attribute("status_id")));

    let mut seen = Vec::new();
    for page_number in 1..=3 {
        let page = aggregator
            .work_packages(&query, Pagination::new(page_number, 2))
            .await
            .unwrap();
        assert_eq!(page.total, 5);
        assert_eq!(page.total_pages(), 3);
        seen.extend(page.items.iter().map(|wp| wp.id));
    }

    // status 3 (ids 2, 4), status 5 (ids 3, 5), then no status
    assert_eq!(seen, vec![2, 4, 3, 5, 1]);
}

#[tokio::test]
async fn test_order_by_custom_field() {
    let aggregator = setup().await;
    let query = everyone()
        .project(1)
        .order_by(SortKey::desc(FieldRef::Custom(2)))
        .order_by(SortKey::desc(FieldRef::attribute("id")));

    let page = aggregator
        .work_packages(&query, Pagination::default())
        .await
        .unwrap();
    let ids: Vec<i64> = page.items.iter().map(|wp| wp.id).collect();
    assert_eq!(ids, vec![2, 1, 3]);
    assert_eq!(page.items[2].subject, "Release 1.0");
}

// =============================================================================
// Grouping
// =============================================================================

#[tokio::test]
async fn test_group_by_custom_field_includes_null() {
    let aggregator = setup().await;
    let counts = aggregator
        .count_by_group(&everyone().project(1), &FieldRef::Custom(2))
        .await
        .unwrap();

    let expected: GroupCount = [(GroupKey::Int(42), 2), (GroupKey::Null, 1)].into_iter().collect();
    assert_eq!(counts, expected);
}

#[tokio::test]
async fn test_group_by_responsible() {
    let aggregator = setup().await;
    let counts = aggregator
        .count_by_group(&everyone().project(1), &FieldRef::attribute("responsible_id"))
        .await
        .unwrap();

    let expected: GroupCount = [
        (GroupKey::Int(1), 1),
        (GroupKey::Int(2), 1),
        (GroupKey::Null, 1),
    ]
    .into_iter()
    .collect();
    assert_eq!(counts, expected);
}

#[tokio::test]
async fn test_group_blank_custom_value_counts_as_null() {
    let aggregator = setup().await;
    let counts = aggregator
        .count_by_group(&everyone(), &FieldRef::Custom(1))
        .await
        .unwrap();

    assert_eq!(counts.get(&GroupKey::Null), Some(&3));
    assert_eq!(counts.get(&GroupKey::Int(10)), Some(&1));
    assert_eq!(counts.get(&GroupKey::Text("abc".to_string())), Some(&1));
}

#[tokio::test]
async fn test_group_counts_sum_to_total() {
    let aggregator = setup().await;
    let queries = [
        everyone(),
        everyone().project(2),
        everyone().filter(spec("cf_1", FilterOperator::IsPresent, &[])),
        ResultQuery::new(&VisibilityScope::member_of(1))
            .filter(spec("status_id", FilterOperator::Equals, &["-1", "5"])),
    ];
    let dimensions = [
        FieldRef::attribute("status_id"),
        FieldRef::attribute("assigned_to_id"),
        FieldRef::attribute("responsible_id"),
        FieldRef::attribute("due_date"),
        FieldRef::Custom(1),
        FieldRef::Custom(2),
    ];

    for query in &queries {
        let total = aggregator.count(query).await.unwrap();
        for dimension in &dimensions {
            let counts = aggregator.count_by_group(query, dimension).await.unwrap();
            assert_eq!(sum(&counts), total, "dimension {}", dimension);
        }
    }
}

// =============================================================================
// Properties
// =============================================================================

fn runtime() -> tokio::runtime::Runtime {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .unwrap()
}

fn status_value() -> impl Strategy<Value = String> {
    prop_oneof![
        Just("-1".to_string()),
        Just("3".to_string()),
        Just("5".to_string()),
        Just("7".to_string()),
    ]
}

/// Text for the quoting round-trip; NUL is dropped since SQLite ends
/// statement text at a NUL byte
fn literal_text() -> impl Strategy<Value = String> {
    prop_oneof![
        "[a-zA-Z0-9 '\"\\\\%_]{0,24}",
        "\\PC{0,24}",
        any::<String>().prop_map(|s| s.replace('\0', "")),
    ]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn equals_and_not_equals_complement(values in proptest::collection::vec(status_value(), 0..4)) {
        let (equal, not_equal, total) = runtime().block_on(async {
            let aggregator = setup().await;
            let values: Vec<&str> = values.iter().map(String::as_str).collect();
            let equal = everyone().filter(spec("status_id", FilterOperator::Equals, &values));
            let not_equal = everyone().filter(spec("status_id", FilterOperator::NotEquals, &values));
            (
                aggregator.count(&equal).await.unwrap(),
                aggregator.count(&not_equal).await.unwrap(),
                aggregator.count(&everyone()).await.unwrap(),
            )
        });

        // Only work package 1 has no status; a "-1" value counts it on both sides
        let overlap = u64::from(values.iter().any(|v| v == "-1"));
        prop_assert_eq!(equal + not_equal, total + overlap);
        if values.is_empty() {
            prop_assert_eq!(equal, 0);
            prop_assert_eq!(not_equal, total);
        }
    }

    #[test]
    fn quoted_literals_read_back_unchanged(s in literal_text()) {
        let literal = crate::data::sql::Backend::Sqlite.dialect().quoted_literal(&s);
        let read_back: String = runtime().block_on(async {
            let pool = open_in_memory().await.unwrap();
            let (value,): (String,) = sqlx::query_as(&format!("SELECT {}", literal))
                .fetch_one(&pool)
                .await
                .unwrap();
            value
        });
        prop_assert_eq!(read_back, s);
    }
}
