//! Given steps for task CRUD BDD scenarios.

use super::world::TaskBoardWorld;
use crate::test_helpers::memory_state;
use axum::http::Method;
use rstest_bdd_macros::given;
use serde_json::json;
use taskboard::http::router;

#[given("an empty task board")]
fn empty_board(world: &mut TaskBoardWorld) {
    *world = TaskBoardWorld::new();
}

#[given(r#"a task board protected by token "{token}""#)]
fn protected_board(world: &mut TaskBoardWorld, token: String) {
    world.app = router(memory_state().with_api_token(token));
}

#[given(r#"a task titled "{title}" exists"#)]
fn task_exists(world: &mut TaskBoardWorld, title: String) -> Result<(), eyre::Report> {
    let body = json!({ "title": title, "description": "scenario setup" }).to_string();
    world.request(Method::POST, "/api/tasks", Some(&body))?;
    eyre::ensure!(world.last_task_id.is_some(), "setup task was not created");
    Ok(())
}
