//! `PostgreSQL` repository implementation for task storage.

use super::{
    models::{NewTaskRow, TaskChangesetRow, TaskRow},
    schema::tasks,
};
use crate::task::{
    domain::{
        DueDate, NewTask, PersistedTaskData, Task, TaskChanges, TaskDescription, TaskId,
        TaskTitle, TaskVersion,
    },
    ports::{TaskRepository, TaskRepositoryError, TaskRepositoryResult},
};
use async_trait::async_trait;
use diesel::pg::PgConnection;
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, Pool};
use diesel_migrations::{EmbeddedMigrations, MigrationHarness, embed_migrations};
use std::sync::Arc;

/// `PostgreSQL` connection pool type used by task adapters.
pub type TaskPgPool = Pool<ConnectionManager<PgConnection>>;

/// Schema migrations embedded from the crate's `migrations/` directory.
pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

/// `PostgreSQL`-backed task repository.
#[derive(Debug, Clone)]
pub struct PostgresTaskRepository {
    pool: TaskPgPool,
}

impl PostgresTaskRepository {
    /// Creates a new repository from a `PostgreSQL` connection pool.
    #[must_use]
    pub const fn new(pool: TaskPgPool) -> Self {
        Self { pool }
    }

    /// Builds a connection pool for `database_url` and wraps it.
    ///
    /// # Errors
    ///
    /// Returns [`TaskRepositoryError::Persistence`] when the pool cannot open
    /// its initial connections.
    pub fn connect(database_url: &str, max_size: u32) -> TaskRepositoryResult<Self> {
        let manager = ConnectionManager::<PgConnection>::new(database_url);
        let pool = Pool::builder()
            .max_size(max_size)
            .build(manager)
            .map_err(TaskRepositoryError::persistence)?;
        Ok(Self::new(pool))
    }

    /// Applies pending schema migrations and returns how many ran.
    ///
    /// # Errors
    ///
    /// Returns [`TaskRepositoryError::Persistence`] when a migration fails.
    pub async fn run_migrations(&self) -> TaskRepositoryResult<usize> {
        self.run_blocking(|connection| {
            connection
                .run_pending_migrations(MIGRATIONS)
                .map(|applied| applied.len())
                .map_err(|err| TaskRepositoryError::Persistence(Arc::from(err)))
        })
        .await
    }

    async fn run_blocking<F, T>(&self, f: F) -> TaskRepositoryResult<T>
    where
        F: FnOnce(&mut PgConnection) -> TaskRepositoryResult<T> + Send + 'static,
        T: Send + 'static,
    {
        let pool = self.pool.clone();
        tokio::task::spawn_blocking(move || {
            let mut connection = pool.get().map_err(TaskRepositoryError::persistence)?;
            f(&mut connection)
        })
        .await
        .map_err(TaskRepositoryError::persistence)?
    }
}

#[async_trait]
impl TaskRepository for PostgresTaskRepository {
    async fn list(&self) -> TaskRepositoryResult<Vec<Task>> {
        self.run_blocking(|connection| {
            let rows = tasks::table
                .order((tasks::created_at.desc(), tasks::id.desc()))
                .select(TaskRow::as_select())
                .load::<TaskRow>(connection)
                .map_err(TaskRepositoryError::persistence)?;
            rows.into_iter().map(row_to_task).collect()
        })
        .await
    }

    async fn find_by_id(&self, id: TaskId) -> TaskRepositoryResult<Option<Task>> {
        self.run_blocking(move |connection| {
            find_row(connection, id)?.map(row_to_task).transpose()
        })
        .await
    }

    async fn insert(&self, task: &NewTask) -> TaskRepositoryResult<Task> {
        let new_row = to_new_row(task);
        self.run_blocking(move |connection| {
            let row = diesel::insert_into(tasks::table)
                .values(&new_row)
                .returning(TaskRow::as_returning())
                .get_result::<TaskRow>(connection)
                .map_err(TaskRepositoryError::persistence)?;
            row_to_task(row)
        })
        .await
    }

    async fn update(&self, id: TaskId, changes: &TaskChanges) -> TaskRepositoryResult<Task> {
        let changeset = to_changeset(changes);
        let expected_version = changes.expected_version;
        self.run_blocking(move |connection| {
            let bump_version = tasks::version.eq(tasks::version + 1_i64);
            let target = tasks::table.filter(tasks::id.eq(id.value()));

            // The version predicate makes the conditional update atomic; a
            // miss is disambiguated afterwards.
            let updated = match expected_version {
                Some(expected) => diesel::update(target.filter(tasks::version.eq(expected.value())))
                    .set((&changeset, bump_version))
                    .returning(TaskRow::as_returning())
                    .get_result::<TaskRow>(connection)
                    .optional(),
                None => diesel::update(target)
                    .set((&changeset, bump_version))
                    .returning(TaskRow::as_returning())
                    .get_result::<TaskRow>(connection)
                    .optional(),
            }
            .map_err(TaskRepositoryError::persistence)?;

            if let Some(row) = updated {
                return row_to_task(row);
            }

            match (expected_version, find_row(connection, id)?) {
                (Some(expected), Some(current)) => Err(TaskRepositoryError::VersionConflict {
                    id,
                    expected,
                    actual: TaskVersion::new(current.version)
                        .map_err(TaskRepositoryError::persistence)?,
                }),
                _ => Err(TaskRepositoryError::NotFound(id)),
            }
        })
        .await
    }

    async fn delete(&self, id: TaskId) -> TaskRepositoryResult<Task> {
        self.run_blocking(move |connection| {
            let removed = diesel::delete(tasks::table.filter(tasks::id.eq(id.value())))
                .returning(TaskRow::as_returning())
                .get_result::<TaskRow>(connection)
                .optional()
                .map_err(TaskRepositoryError::persistence)?;
            removed
                .map(row_to_task)
                .transpose()?
                .ok_or(TaskRepositoryError::NotFound(id))
        })
        .await
    }
}

fn find_row(connection: &mut PgConnection, id: TaskId) -> TaskRepositoryResult<Option<TaskRow>> {
    tasks::table
        .filter(tasks::id.eq(id.value()))
        .select(TaskRow::as_select())
        .first::<TaskRow>(connection)
        .optional()
        .map_err(TaskRepositoryError::persistence)
}

fn to_new_row(task: &NewTask) -> NewTaskRow {
    NewTaskRow {
        title: task.title.as_str().to_owned(),
        description: task.description.as_str().to_owned(),
        completed: false,
        due_date: task.due_date.map(DueDate::as_datetime),
        version: TaskVersion::INITIAL.value(),
        created_at: task.created_at,
        updated_at: task.created_at,
    }
}

fn to_changeset(changes: &TaskChanges) -> TaskChangesetRow {
    TaskChangesetRow {
        title: changes.title.as_ref().map(|title| title.as_str().to_owned()),
        description: changes
            .description
            .as_ref()
            .map(|description| description.as_str().to_owned()),
        completed: changes.completed,
        due_date: changes
            .due_date
            .map(|due_date| due_date.map(DueDate::as_datetime)),
        updated_at: changes.updated_at,
    }
}

fn row_to_task(row: TaskRow) -> TaskRepositoryResult<Task> {
    let TaskRow {
        id,
        title,
        description,
        completed,
        due_date,
        version,
        created_at,
        updated_at,
    } = row;

    let data = PersistedTaskData {
        id: TaskId::new(id).map_err(TaskRepositoryError::persistence)?,
        title: TaskTitle::new(title).map_err(TaskRepositoryError::persistence)?,
        description: TaskDescription::new(description)
            .map_err(TaskRepositoryError::persistence)?,
        completed,
        due_date: due_date.map(DueDate::from_datetime),
        created_at,
        updated_at,
        version: TaskVersion::new(version).map_err(TaskRepositoryError::persistence)?,
    };
    Ok(Task::from_persisted(data))
}
