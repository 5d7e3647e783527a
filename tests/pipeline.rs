//! End-to-end pipeline runs against the in-memory store.
//!
//! These cover the spec-level behavior of a whole run: teardown order,
//! per-table row counts, the classroom teacher-set and composite
//! enrollment invariants, failure propagation and determinism.

use chrono::NaiveTime;
use school_seed::rows::{Table, RESET_ORDER};
use school_seed::store::mem::MemStore;
use school_seed::{SeedConfig, SeedError, Seeder};
use std::collections::{HashMap, HashSet};

const SEED: u64 = 42;

fn test_config() -> SeedConfig {
    SeedConfig {
        year_label: 2026,
        teacher_count: 30,
        student_count: 100,
        batch_size: 1000,
        seed: SEED,
    }
}

async fn run_seeder(config: SeedConfig) -> Seeder<MemStore> {
    let mut seeder = Seeder::new(MemStore::new(), config);
    seeder.run().await.expect("seeding should succeed");
    seeder
}

#[tokio::test]
async fn full_run_produces_expected_row_counts() {
    let seeder = run_seeder(test_config()).await;
    let store = seeder.store();

    assert_eq!(store.row_count(Table::AcademicYears).await, 1);
    assert_eq!(store.row_count(Table::Teachers).await, 30);
    assert_eq!(store.row_count(Table::Courses).await, 10);
    assert_eq!(store.row_count(Table::Classrooms).await, 10);
    // 10 classrooms x 5 offerings, both pools large enough for a full draw.
    assert_eq!(store.row_count(Table::CourseOfferings).await, 50);
    assert_eq!(store.row_count(Table::Schedules).await, 100);
    assert_eq!(store.row_count(Table::Students).await, 100);
    assert_eq!(store.row_count(Table::Enrollments).await, 100);
}

#[tokio::test]
async fn classrooms_keep_their_teacher_set_invariant() {
    let seeder = run_seeder(test_config()).await;

    for (_, classroom) in seeder.store().rows(Table::Classrooms).await {
        let homeroom = classroom["homeroom_teacher_id"].as_i64().unwrap();
        let teacher_ids: Vec<i64> = classroom["teacher_ids"]
            .as_array()
            .unwrap()
            .iter()
            .map(|v| v.as_i64().unwrap())
            .collect();

        assert_eq!(teacher_ids.len(), 3);
        assert!(teacher_ids.contains(&homeroom));
        let unique: HashSet<i64> = teacher_ids.iter().copied().collect();
        assert_eq!(unique.len(), teacher_ids.len());
    }
}

#[tokio::test]
async fn offerings_never_repeat_a_classroom_course_pair() {
    let seeder = run_seeder(test_config()).await;

    let mut pairs = HashSet::new();
    for (_, offering) in seeder.store().rows(Table::CourseOfferings).await {
        let pair = (
            offering["classroom_id"].as_i64().unwrap(),
            offering["course_id"].as_i64().unwrap(),
        );
        assert!(pairs.insert(pair), "duplicate offering {pair:?}");
    }
}

#[tokio::test]
async fn schedules_end_ninety_minutes_after_they_start() {
    let seeder = run_seeder(test_config()).await;

    for (_, slot) in seeder.store().rows(Table::Schedules).await {
        let starts =
            NaiveTime::parse_from_str(slot["starts_at"].as_str().unwrap(), "%H:%M:%S").unwrap();
        let ends =
            NaiveTime::parse_from_str(slot["ends_at"].as_str().unwrap(), "%H:%M:%S").unwrap();
        assert_eq!((ends - starts).num_minutes(), 90);
    }
}

#[tokio::test]
async fn enrollments_match_their_classroom_year() {
    let seeder = run_seeder(test_config()).await;
    let store = seeder.store();

    let classroom_years: HashMap<i64, i64> = store
        .rows(Table::Classrooms)
        .await
        .into_iter()
        .map(|(id, row)| (id, row["academic_year_id"].as_i64().unwrap()))
        .collect();

    let enrollments = store.rows(Table::Enrollments).await;
    assert_eq!(enrollments.len(), 100);
    for (_, enrollment) in enrollments {
        let classroom_id = enrollment["classroom_id"].as_i64().unwrap();
        let year_id = enrollment["academic_year_id"].as_i64().unwrap();
        assert_eq!(
            classroom_years[&classroom_id], year_id,
            "enrollment year diverges from its classroom"
        );
    }
}

#[tokio::test]
async fn reset_runs_first_and_is_idempotent() {
    let config = test_config();
    let mut seeder = Seeder::new(MemStore::new(), config.clone());
    seeder.run().await.unwrap();

    let log = seeder.store().delete_log().await;
    assert_eq!(log, RESET_ORDER.to_vec());

    // A second full run resets populated tables and succeeds again.
    let mut second = Seeder::new(MemStore::new(), config);
    second.run().await.unwrap();
    second.run().await.unwrap();

    let log = second.store().delete_log().await;
    assert_eq!(log.len(), 2 * RESET_ORDER.len());
    assert_eq!(&log[RESET_ORDER.len()..], &RESET_ORDER[..]);
    assert_eq!(second.store().row_count(Table::Enrollments).await, 100);
}

#[tokio::test]
async fn stage_failure_aborts_the_run_and_names_the_table() {
    let mut seeder = Seeder::new(MemStore::failing_on(Table::Classrooms), test_config());
    let err = seeder.run().await.unwrap_err();

    match err {
        SeedError::Stage { table, .. } => assert_eq!(table, Table::Classrooms),
        other => panic!("expected a stage error, got {other}"),
    }

    let store = seeder.store();
    // Earlier stages stay persisted; nothing after the failure ran.
    assert_eq!(store.row_count(Table::Teachers).await, 30);
    assert_eq!(store.row_count(Table::Courses).await, 10);
    assert_eq!(store.row_count(Table::Classrooms).await, 0);
    assert_eq!(store.row_count(Table::CourseOfferings).await, 0);
    assert_eq!(store.row_count(Table::Schedules).await, 0);
    assert_eq!(store.row_count(Table::Students).await, 0);
    assert_eq!(store.row_count(Table::Enrollments).await, 0);
}

#[tokio::test]
async fn reset_failure_aborts_before_any_insert() {
    let mut seeder = Seeder::new(MemStore::failing_on_delete(Table::Courses), test_config());
    let err = seeder.run().await.unwrap_err();

    match err {
        SeedError::Stage { table, .. } => assert_eq!(table, Table::Courses),
        other => panic!("expected a stage error, got {other}"),
    }

    let store = seeder.store();
    // Only the tables ahead of courses in the teardown order were cleared.
    assert_eq!(store.delete_log().await, RESET_ORDER[..4].to_vec());
    assert_eq!(store.row_count(Table::Teachers).await, 0);
    assert_eq!(store.row_count(Table::AcademicYears).await, 0);
}

#[tokio::test]
async fn small_batches_still_load_everything() {
    let config = SeedConfig {
        batch_size: 7,
        ..test_config()
    };
    let seeder = run_seeder(config).await;

    assert_eq!(seeder.store().row_count(Table::Students).await, 100);
    assert_eq!(seeder.store().row_count(Table::Enrollments).await, 100);
}

#[tokio::test]
async fn small_pools_shrink_offerings_without_failing() {
    let config = SeedConfig {
        teacher_count: 3,
        ..test_config()
    };
    let seeder = run_seeder(config).await;
    let store = seeder.store();

    assert_eq!(store.row_count(Table::Teachers).await, 3);
    // Offerings pair courses with teachers positionally, so 3 teachers cap
    // each classroom at 3 offerings.
    assert_eq!(store.row_count(Table::CourseOfferings).await, 30);

    for (_, classroom) in store.rows(Table::Classrooms).await {
        // The whole pool fits in one teacher set.
        let teacher_ids = classroom["teacher_ids"].as_array().unwrap();
        assert_eq!(teacher_ids.len(), 3);
    }
}

#[tokio::test]
async fn identical_seeds_produce_identical_data() {
    let first = run_seeder(test_config()).await;
    let second = run_seeder(test_config()).await;

    assert_eq!(
        first.store().rows(Table::Teachers).await,
        second.store().rows(Table::Teachers).await
    );
    assert_eq!(
        first.store().rows(Table::Enrollments).await,
        second.store().rows(Table::Enrollments).await
    );
}

#[tokio::test]
async fn summary_reports_per_stage_counts() {
    let mut seeder = Seeder::new(MemStore::new(), test_config());
    let summary = seeder.run().await.unwrap();

    assert_eq!(summary.academic_years, 1);
    assert_eq!(summary.teachers, 30);
    assert_eq!(summary.courses, 10);
    assert_eq!(summary.classrooms, 10);
    assert_eq!(summary.course_offerings, 50);
    assert_eq!(summary.schedules, 100);
    assert_eq!(summary.students, 100);
    assert_eq!(summary.enrollments, 100);
    assert_eq!(summary.total_rows(), 401);
}
