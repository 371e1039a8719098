//! `PostgreSQL` integration tests for the task repository adapter.

use super::helpers::{BoxError, PreparedRepo, epoch, new_task, prepared_repo};
use chrono::Duration;
use rstest::rstest;
use taskboard::task::{
    domain::{DueDate, Task, TaskChanges, TaskId, TaskTitle, TaskVersion},
    ports::{TaskRepository, TaskRepositoryError},
};

fn completion(expected_version: Option<TaskVersion>) -> TaskChanges {
    TaskChanges {
        title: None,
        description: None,
        due_date: None,
        completed: Some(true),
        expected_version,
        updated_at: epoch() + Duration::minutes(5),
    }
}

#[rstest]
fn insert_assigns_ids_and_round_trips_columns(
    prepared_repo: Result<Option<PreparedRepo>, BoxError>,
) -> Result<(), BoxError> {
    let Some(ctx) = prepared_repo? else {
        return Ok(());
    };
    let mut task = new_task("write migrations", epoch())?;
    task.due_date = Some(DueDate::from_datetime(epoch() + Duration::days(3)));

    let first = ctx.block_on(ctx.repo.insert(&task))?;
    let second = ctx.block_on(ctx.repo.insert(&new_task("second", epoch())?))?;
    let found = ctx
        .block_on(ctx.repo.find_by_id(first.id()))?
        .ok_or("inserted task should be found")?;

    assert!(second.id().value() > first.id().value());
    assert_eq!(found, first);
    assert_eq!(found.title().as_str(), "write migrations");
    assert_eq!(found.due_date(), task.due_date);
    assert_eq!(found.version(), TaskVersion::INITIAL);
    assert!(!found.completed());
    assert_eq!(found.created_at(), epoch());
    assert_eq!(found.updated_at(), epoch());
    Ok(())
}

#[rstest]
fn list_orders_by_creation_descending_then_id(
    prepared_repo: Result<Option<PreparedRepo>, BoxError>,
) -> Result<(), BoxError> {
    let Some(ctx) = prepared_repo? else {
        return Ok(());
    };
    let older = ctx.block_on(ctx.repo.insert(&new_task("older", epoch())?))?;
    let newer = ctx.block_on(
        ctx.repo
            .insert(&new_task("newer", epoch() + Duration::seconds(1))?),
    )?;
    let same_instant = ctx.block_on(ctx.repo.insert(&new_task("same instant", epoch())?))?;

    let ids: Vec<TaskId> = ctx
        .block_on(ctx.repo.list())?
        .iter()
        .map(Task::id)
        .collect();

    assert_eq!(ids, vec![newer.id(), same_instant.id(), older.id()]);
    Ok(())
}

#[rstest]
fn update_with_matching_version_bumps_version(
    prepared_repo: Result<Option<PreparedRepo>, BoxError>,
) -> Result<(), BoxError> {
    let Some(ctx) = prepared_repo? else {
        return Ok(());
    };
    let task = ctx.block_on(ctx.repo.insert(&new_task("task", epoch())?))?;

    let updated = ctx.block_on(
        ctx.repo
            .update(task.id(), &completion(Some(TaskVersion::INITIAL))),
    )?;

    assert!(updated.completed());
    assert_eq!(updated.version(), TaskVersion::INITIAL.next());
    assert_eq!(updated.updated_at(), epoch() + Duration::minutes(5));
    assert_eq!(updated.created_at(), task.created_at());
    Ok(())
}

#[rstest]
fn update_with_stale_version_conflicts_and_keeps_row(
    prepared_repo: Result<Option<PreparedRepo>, BoxError>,
) -> Result<(), BoxError> {
    let Some(ctx) = prepared_repo? else {
        return Ok(());
    };
    let task = ctx.block_on(ctx.repo.insert(&new_task("task", epoch())?))?;
    let first = ctx.block_on(ctx.repo.update(task.id(), &completion(None)))?;

    let stale = TaskChanges {
        title: Some(TaskTitle::new("overwritten")?),
        completed: Some(false),
        ..completion(Some(TaskVersion::INITIAL))
    };
    let result = ctx.block_on(ctx.repo.update(task.id(), &stale));

    assert!(matches!(
        result,
        Err(TaskRepositoryError::VersionConflict { expected, actual, .. })
            if expected == TaskVersion::INITIAL && actual == TaskVersion::INITIAL.next()
    ));
    let stored = ctx
        .block_on(ctx.repo.find_by_id(task.id()))?
        .ok_or("task should still exist")?;
    assert_eq!(stored, first);
    assert_eq!(stored.title().as_str(), "task");
    assert!(stored.completed());
    Ok(())
}

#[rstest]
fn null_due_date_clears_and_absent_due_date_keeps(
    prepared_repo: Result<Option<PreparedRepo>, BoxError>,
) -> Result<(), BoxError> {
    let Some(ctx) = prepared_repo? else {
        return Ok(());
    };
    let due = DueDate::from_datetime(epoch() + Duration::days(1));
    let mut task = new_task("dated", epoch())?;
    task.due_date = Some(due);
    let task = ctx.block_on(ctx.repo.insert(&task))?;

    let untouched = ctx.block_on(ctx.repo.update(task.id(), &completion(None)))?;
    assert_eq!(untouched.due_date(), Some(due));

    let clear = TaskChanges {
        due_date: Some(None),
        completed: None,
        ..completion(None)
    };
    let cleared = ctx.block_on(ctx.repo.update(task.id(), &clear))?;
    let stored = ctx
        .block_on(ctx.repo.find_by_id(task.id()))?
        .ok_or("task should still exist")?;

    assert_eq!(cleared.due_date(), None);
    assert_eq!(stored.due_date(), None);
    assert!(stored.completed());
    Ok(())
}

#[rstest]
fn update_and_delete_report_missing_tasks(
    prepared_repo: Result<Option<PreparedRepo>, BoxError>,
) -> Result<(), BoxError> {
    let Some(ctx) = prepared_repo? else {
        return Ok(());
    };
    let missing = TaskId::new(99)?;

    let unconditional = ctx.block_on(ctx.repo.update(missing, &completion(None)));
    let conditional = ctx.block_on(
        ctx.repo
            .update(missing, &completion(Some(TaskVersion::INITIAL))),
    );
    let delete = ctx.block_on(ctx.repo.delete(missing));

    assert!(matches!(unconditional, Err(TaskRepositoryError::NotFound(id)) if id == missing));
    assert!(matches!(conditional, Err(TaskRepositoryError::NotFound(id)) if id == missing));
    assert!(matches!(delete, Err(TaskRepositoryError::NotFound(id)) if id == missing));
    Ok(())
}

#[rstest]
fn delete_returns_removed_row(
    prepared_repo: Result<Option<PreparedRepo>, BoxError>,
) -> Result<(), BoxError> {
    let Some(ctx) = prepared_repo? else {
        return Ok(());
    };
    let task = ctx.block_on(ctx.repo.insert(&new_task("short lived", epoch())?))?;

    let removed = ctx.block_on(ctx.repo.delete(task.id()))?;
    let lookup = ctx.block_on(ctx.repo.find_by_id(task.id()))?;

    assert_eq!(removed, task);
    assert!(lookup.is_none());
    Ok(())
}
