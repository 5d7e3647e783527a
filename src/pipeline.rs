//! The dependency-ordered seeding pipeline.
//!
//! One stage per table, strictly sequential with no backward transitions:
//! Reset → academic_years → teachers → courses → classrooms →
//! course_offerings → schedules → students → enrollments. Each stage
//! synthesizes rows from identifiers minted by earlier stages, persists
//! them in bounded batches, and reads the assigned ids back for the next
//! stage. The first failure aborts the run with the failing table attached;
//! there is no retry, no rollback and no resumability. The operator
//! re-runs the whole pipeline and the reset stage clears any partial data.

use crate::args::SeedConfig;
use crate::error::{SeedError, StoreError};
use crate::generate;
use crate::rows::{ClassroomRef, Table, TableRow, RESET_ORDER};
use crate::sampler::for_each_chunk;
use crate::store::SeedStore;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::time::{Duration, Instant};
use tracing::{debug, info};

/// Row counts from a completed run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SeedSummary {
    pub academic_years: u64,
    pub teachers: u64,
    pub courses: u64,
    pub classrooms: u64,
    pub course_offerings: u64,
    pub schedules: u64,
    pub students: u64,
    pub enrollments: u64,
}

impl SeedSummary {
    /// Total rows inserted across all stages.
    pub fn total_rows(&self) -> u64 {
        self.academic_years
            + self.teachers
            + self.courses
            + self.classrooms
            + self.course_offerings
            + self.schedules
            + self.students
            + self.enrollments
    }
}

/// Runs the pipeline against any [`SeedStore`].
pub struct Seeder<S> {
    store: S,
    config: SeedConfig,
    rng: StdRng,
}

impl<S: SeedStore> Seeder<S> {
    pub fn new(store: S, config: SeedConfig) -> Self {
        let rng = StdRng::seed_from_u64(config.seed);
        Self { store, config, rng }
    }

    /// The backing store, for post-run inspection.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Run the full pipeline: reset, then every stage in dependency order.
    pub async fn run(&mut self) -> Result<SeedSummary, SeedError> {
        let started = Instant::now();
        let mut summary = SeedSummary::default();

        self.reset().await?;

        let academic_year_id = self.seed_academic_year(&mut summary).await?;
        let teacher_ids = self.seed_teachers(&mut summary).await?;
        let course_ids = self.seed_courses(&mut summary).await?;
        let classrooms = self
            .seed_classrooms(academic_year_id, &teacher_ids, &mut summary)
            .await?;
        let offering_ids = self
            .seed_course_offerings(&classrooms, &course_ids, &teacher_ids, &mut summary)
            .await?;
        self.seed_schedules(&offering_ids, &mut summary).await?;
        let student_ids = self.seed_students(&mut summary).await?;
        self.seed_enrollments(&student_ids, &classrooms, &mut summary)
            .await?;

        info!(
            "seed complete: {} rows in {}",
            summary.total_rows(),
            human_duration(started.elapsed())
        );
        Ok(summary)
    }

    /// Clear every table, children strictly before parents.
    async fn reset(&self) -> Result<(), SeedError> {
        info!("resetting {} tables", RESET_ORDER.len());
        for table in RESET_ORDER {
            let removed = self
                .store
                .delete_all(table)
                .await
                .map_err(|e| SeedError::stage(table, e))?;
            debug!("cleared {removed} rows from {table}");
        }
        Ok(())
    }

    /// Persist `rows` in batches of at most the configured size.
    async fn persist<R: TableRow>(&self, rows: Vec<R>) -> Result<u64, SeedError> {
        let count = rows.len() as u64;
        let batch_size = self.config.batch_size;
        let store = &self.store;
        for_each_chunk(rows, batch_size, |batch| async move {
            debug!("inserting {} rows into {}", batch.len(), R::TABLE);
            store.insert_many(&batch).await
        })
        .await
        .map_err(|e| SeedError::stage(R::TABLE, e))?;
        Ok(count)
    }

    async fn fetch_ids(&self, table: Table) -> Result<Vec<i64>, SeedError> {
        self.store
            .fetch_ids(table)
            .await
            .map_err(|e| SeedError::stage(table, e))
    }

    async fn seed_academic_year(&mut self, summary: &mut SeedSummary) -> Result<i64, SeedError> {
        info!(
            "seeding academic_years (label {})",
            self.config.year_label
        );
        let row = generate::academic_year(self.config.year_label);
        summary.academic_years = self.persist(vec![row]).await?;

        let ids = self.fetch_ids(Table::AcademicYears).await?;
        ids.first().copied().ok_or_else(|| {
            SeedError::stage(
                Table::AcademicYears,
                StoreError::Backend("no academic year id assigned".to_string()),
            )
        })
    }

    async fn seed_teachers(&mut self, summary: &mut SeedSummary) -> Result<Vec<i64>, SeedError> {
        info!("seeding {} teachers", self.config.teacher_count);
        let rows = generate::teachers(&mut self.rng, self.config.teacher_count);
        summary.teachers = self.persist(rows).await?;
        self.fetch_ids(Table::Teachers).await
    }

    async fn seed_courses(&mut self, summary: &mut SeedSummary) -> Result<Vec<i64>, SeedError> {
        info!("seeding {} courses", generate::COURSE_CATALOG.len());
        summary.courses = self.persist(generate::courses()).await?;
        self.fetch_ids(Table::Courses).await
    }

    async fn seed_classrooms(
        &mut self,
        academic_year_id: i64,
        teacher_ids: &[i64],
        summary: &mut SeedSummary,
    ) -> Result<Vec<ClassroomRef>, SeedError> {
        info!("seeding classrooms");
        let rows = generate::classrooms(&mut self.rng, academic_year_id, teacher_ids);
        summary.classrooms = self.persist(rows).await?;
        self.store
            .fetch_classrooms()
            .await
            .map_err(|e| SeedError::stage(Table::Classrooms, e))
    }

    async fn seed_course_offerings(
        &mut self,
        classrooms: &[ClassroomRef],
        course_ids: &[i64],
        teacher_ids: &[i64],
        summary: &mut SeedSummary,
    ) -> Result<Vec<i64>, SeedError> {
        info!("seeding course_offerings");
        let rows = generate::course_offerings(&mut self.rng, classrooms, course_ids, teacher_ids);
        summary.course_offerings = self.persist(rows).await?;
        self.fetch_ids(Table::CourseOfferings).await
    }

    async fn seed_schedules(
        &mut self,
        offering_ids: &[i64],
        summary: &mut SeedSummary,
    ) -> Result<(), SeedError> {
        info!("seeding schedules");
        let rows = generate::schedules(&mut self.rng, offering_ids);
        summary.schedules = self.persist(rows).await?;
        Ok(())
    }

    async fn seed_students(&mut self, summary: &mut SeedSummary) -> Result<Vec<i64>, SeedError> {
        info!("seeding {} students", self.config.student_count);
        let rows = generate::students(&mut self.rng, self.config.student_count);
        summary.students = self.persist(rows).await?;
        self.fetch_ids(Table::Students).await
    }

    async fn seed_enrollments(
        &mut self,
        student_ids: &[i64],
        classrooms: &[ClassroomRef],
        summary: &mut SeedSummary,
    ) -> Result<(), SeedError> {
        info!("seeding enrollments");
        let rows = generate::enrollments(
            &mut self.rng,
            self.config.year_label,
            student_ids,
            classrooms,
        );
        summary.enrollments = self.persist(rows).await?;
        Ok(())
    }
}

fn human_duration(d: Duration) -> String {
    format!("{:.2}s", d.as_secs_f64())
}
