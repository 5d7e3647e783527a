//! Dependency-ordered fixture seeding for the school management database.
//!
//! A seeding run tears down every table in reverse-dependency order, then
//! rebuilds the academic structure one entity type at a time: the academic
//! year, the teacher pool, the course catalog, classrooms, course
//! offerings, schedules, students and finally enrollments. Each stage only
//! consumes identifiers the destination assigned to earlier stages, which
//! keeps every foreign key valid by construction, including the composite
//! (classroom_id, academic_year_id) reference on enrollments.
//!
//! # CLI usage
//!
//! ```bash
//! # Seed a local database (credentials from the environment)
//! SEED_DATABASE_URL=postgresql://postgres@localhost:5432/school \
//! SEED_DATABASE_PASSWORD=postgres \
//! school-seed --year-label 2026
//!
//! # Exercise the whole pipeline without a database
//! school-seed --dry-run
//! ```

pub mod args;
pub mod error;
pub mod generate;
pub mod pipeline;
pub mod rows;
pub mod sampler;
pub mod store;
pub mod value;

pub use args::{SeedArgs, SeedConfig};
pub use error::{SeedError, StoreError};
pub use pipeline::{SeedSummary, Seeder};
