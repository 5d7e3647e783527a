//! CLI argument definitions and configuration resolution.

use crate::error::SeedError;
use chrono::{Datelike, Utc};
use clap::Parser;

/// Populate the school management database with synthetic fixture data.
///
/// The destination connection is env-backed so the tool can run from CI
/// without flags; missing required values are reported as configuration
/// errors (exit code 1) before any database access.
#[derive(Parser, Clone, Debug)]
#[command(name = "school-seed")]
#[command(about = "Populate the school management database with synthetic fixture data")]
pub struct SeedArgs {
    /// PostgreSQL connection string (e.g. postgresql://postgres@localhost:5432/school)
    #[arg(long, env = "SEED_DATABASE_URL")]
    pub database_url: Option<String>,

    /// Password of the privileged role used for seeding
    #[arg(long, env = "SEED_DATABASE_PASSWORD", hide_env_values = true)]
    pub database_password: Option<String>,

    /// Academic year label to seed (default: current calendar year)
    #[arg(long, env = "SEED_YEAR_LABEL")]
    pub year_label: Option<i32>,

    /// Number of teachers to generate
    #[arg(long, default_value = "30")]
    pub teacher_count: usize,

    /// Number of students to generate
    #[arg(long, default_value = "100")]
    pub student_count: usize,

    /// Batch size for database inserts
    #[arg(long, default_value = "1000")]
    pub batch_size: usize,

    /// Random seed for deterministic generation (same seed = same data)
    #[arg(long, default_value = "42")]
    pub seed: u64,

    /// Run the full pipeline against an in-memory store without touching
    /// PostgreSQL
    #[arg(long)]
    pub dry_run: bool,
}

impl SeedArgs {
    /// Validate the tunables into a runnable configuration.
    pub fn resolve(&self) -> Result<SeedConfig, SeedError> {
        if self.batch_size == 0 {
            return Err(SeedError::Config("--batch-size must be at least 1".into()));
        }
        if self.teacher_count == 0 {
            // Every classroom needs a homeroom teacher.
            return Err(SeedError::Config("--teacher-count must be at least 1".into()));
        }

        Ok(SeedConfig {
            year_label: self.year_label.unwrap_or_else(|| Utc::now().year()),
            teacher_count: self.teacher_count,
            student_count: self.student_count,
            batch_size: self.batch_size,
            seed: self.seed,
        })
    }

    /// Build the PostgreSQL connection config from the two required
    /// env-backed values.
    pub fn pg_config(&self) -> Result<tokio_postgres::Config, SeedError> {
        let url = self
            .database_url
            .as_deref()
            .ok_or_else(|| SeedError::Config("SEED_DATABASE_URL is not set".into()))?;
        let password = self
            .database_password
            .as_deref()
            .ok_or_else(|| SeedError::Config("SEED_DATABASE_PASSWORD is not set".into()))?;

        let mut config: tokio_postgres::Config = url
            .parse()
            .map_err(|e| SeedError::Config(format!("invalid SEED_DATABASE_URL: {e}")))?;
        config.password(password);
        Ok(config)
    }
}

/// Validated knobs of one seeding run.
#[derive(Debug, Clone)]
pub struct SeedConfig {
    pub year_label: i32,
    pub teacher_count: usize,
    pub student_count: usize,
    pub batch_size: usize,
    pub seed: u64,
}

impl Default for SeedConfig {
    fn default() -> Self {
        Self {
            year_label: Utc::now().year(),
            teacher_count: 30,
            student_count: 100,
            batch_size: 1000,
            seed: 42,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args() -> SeedArgs {
        SeedArgs {
            database_url: None,
            database_password: None,
            year_label: Some(2026),
            teacher_count: 30,
            student_count: 100,
            batch_size: 1000,
            seed: 42,
            dry_run: false,
        }
    }

    #[test]
    fn resolve_accepts_defaults() {
        let config = args().resolve().unwrap();
        assert_eq!(config.year_label, 2026);
        assert_eq!(config.teacher_count, 30);
        assert_eq!(config.batch_size, 1000);
    }

    #[test]
    fn resolve_defaults_year_label_to_current_year() {
        let mut a = args();
        a.year_label = None;
        let config = a.resolve().unwrap();
        assert_eq!(config.year_label, Utc::now().year());
    }

    #[test]
    fn resolve_rejects_zero_batch_size() {
        let mut a = args();
        a.batch_size = 0;
        assert!(matches!(a.resolve(), Err(SeedError::Config(_))));
    }

    #[test]
    fn resolve_rejects_empty_teacher_pool() {
        let mut a = args();
        a.teacher_count = 0;
        assert!(matches!(a.resolve(), Err(SeedError::Config(_))));
    }

    #[test]
    fn pg_config_requires_url_and_password() {
        let a = args();
        assert!(matches!(a.pg_config(), Err(SeedError::Config(_))));

        let mut a = args();
        a.database_url = Some("postgresql://postgres@localhost:5432/school".to_string());
        assert!(matches!(a.pg_config(), Err(SeedError::Config(_))));

        a.database_password = Some("secret".to_string());
        assert!(a.pg_config().is_ok());
    }

    #[test]
    fn pg_config_rejects_garbage_urls() {
        let mut a = args();
        a.database_url = Some("not a connection string".to_string());
        a.database_password = Some("secret".to_string());
        assert!(matches!(a.pg_config(), Err(SeedError::Config(_))));
    }
}
