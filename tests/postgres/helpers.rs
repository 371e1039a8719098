//! Shared test helpers for `PostgreSQL` integration tests.

pub use super::cluster::{BoxError, ManagedCluster, PostgresCluster, postgres_cluster};
use chrono::{DateTime, TimeZone, Utc};
use diesel::prelude::*;
use diesel_migrations::MigrationHarness;
use rstest::fixture;
use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use taskboard::task::{
    adapters::postgres::{MIGRATIONS, PostgresTaskRepository},
    domain::{NewTask, TaskDescription, TaskTitle},
};
use tokio::runtime::Runtime;

/// Template database name for the pre-migrated schema.
pub const TEMPLATE_DB: &str = "taskboard_test_template";

static DATABASE_COUNTER: AtomicU64 = AtomicU64::new(0);

/// Builds a current-thread runtime for driving async repository calls.
///
/// # Errors
///
/// Returns an error if the runtime cannot be created.
pub fn test_runtime() -> Result<Runtime, BoxError> {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(|err| Box::new(err) as BoxError)
}

/// Applies the embedded migrations to the database at `url`.
fn apply_migrations(url: &str) -> Result<(), BoxError> {
    let mut conn = PgConnection::establish(url).map_err(|err| Box::new(err) as BoxError)?;
    conn.run_pending_migrations(MIGRATIONS)?;
    Ok(())
}

/// Database created from the template and dropped with the guard.
pub struct TemporaryDatabase {
    cluster: &'static ManagedCluster,
    name: String,
}

impl TemporaryDatabase {
    /// Returns the connection URL for this database.
    #[must_use]
    pub fn url(&self) -> String {
        self.cluster.database_url(&self.name)
    }
}

impl Drop for TemporaryDatabase {
    fn drop(&mut self) {
        drop(self.cluster.drop_database(&self.name));
    }
}

/// Repository over a fresh database, with a runtime to drive it.
///
/// Fields drop in declaration order, so the pool closes before the database
/// is dropped.
pub struct PreparedRepo {
    /// Repository under test.
    pub repo: PostgresTaskRepository,
    /// Runtime for blocking on repository futures.
    pub rt: Runtime,
    /// Backing database.
    pub database: TemporaryDatabase,
}

impl PreparedRepo {
    /// Runs `future` to completion on the context runtime.
    pub fn block_on<F: Future>(&self, future: F) -> F::Output {
        self.rt.block_on(future)
    }
}

/// Prepares a repository over a database cloned from the migrated template.
///
/// Yields `Ok(None)` when no `PostgreSQL` cluster is available.
///
/// # Errors
///
/// Returns an error if template creation, database creation or pool
/// construction fails.
#[fixture]
pub fn prepared_repo(postgres_cluster: PostgresCluster) -> Result<Option<PreparedRepo>, BoxError> {
    let Some(cluster) = postgres_cluster else {
        return Ok(None);
    };
    cluster.ensure_template_exists(TEMPLATE_DB, apply_migrations)?;

    let name = unique_database_name();
    cluster.create_database_from_template(&name, TEMPLATE_DB)?;
    connect(TemporaryDatabase { cluster, name }).map(Some)
}

/// Prepares a repository over an empty database with no schema.
///
/// Yields `Ok(None)` when no `PostgreSQL` cluster is available.
///
/// # Errors
///
/// Returns an error if database creation or pool construction fails.
#[fixture]
pub fn unmigrated_repo(
    postgres_cluster: PostgresCluster,
) -> Result<Option<PreparedRepo>, BoxError> {
    let Some(cluster) = postgres_cluster else {
        return Ok(None);
    };
    let name = unique_database_name();
    cluster.create_database(&name)?;
    connect(TemporaryDatabase { cluster, name }).map(Some)
}

fn connect(database: TemporaryDatabase) -> Result<PreparedRepo, BoxError> {
    let repo = PostgresTaskRepository::connect(&database.url(), 2)?;
    Ok(PreparedRepo {
        repo,
        rt: test_runtime()?,
        database,
    })
}

fn unique_database_name() -> String {
    format!(
        "taskboard_test_{}_{}",
        std::process::id(),
        DATABASE_COUNTER.fetch_add(1, Ordering::Relaxed)
    )
}

/// Fixed instant with whole-second precision, which survives a round trip
/// through `TIMESTAMPTZ`.
#[must_use]
pub fn epoch() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 1, 1, 12, 0, 0)
        .single()
        .unwrap_or_default()
}

/// Builds a validated new task created at `created_at`.
///
/// # Errors
///
/// Returns an error if `title` is blank.
pub fn new_task(title: &str, created_at: DateTime<Utc>) -> Result<NewTask, BoxError> {
    Ok(NewTask {
        title: TaskTitle::new(title)?,
        description: TaskDescription::new("stored in postgres")?,
        due_date: None,
        created_at,
    })
}
