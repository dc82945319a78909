use cucumber::{then, when};
use todo_client::controller::{ControllerError, DeleteOutcome, LoadState};

use super::common_steps::task_id;
use crate::TodoWorld;

fn record(world: &mut TodoWorld, result: Result<(), ControllerError>) {
    match result {
        Ok(()) => world.last_error = None,
        Err(e) => {
            world.last_route = e.redirect();
            world.last_error = Some(e.to_string());
        }
    }
}

fn titles(world: &mut TodoWorld) -> Vec<String> {
    world
        .controller()
        .tasks()
        .iter()
        .map(|t| t.title.clone())
        .collect()
}

// ---------------------------------------------------------------------------
// When steps
// ---------------------------------------------------------------------------

#[when("I refresh the task list")]
async fn i_refresh_the_task_list(world: &mut TodoWorld) {
    let result = world.controller().refresh().await;
    record(world, result);
}

#[when(expr = "I add a task {string} with description {string}")]
async fn i_add_a_task(world: &mut TodoWorld, title: String, description: String) {
    let result = world.controller().create(&title, &description).await;
    record(world, result);
}

#[when(expr = "I toggle the task {string}")]
async fn i_toggle_the_task(world: &mut TodoWorld, title: String) {
    let id = task_id(world, &title);
    let result = world.controller().toggle(id).await;
    record(world, result);
}

#[when(expr = "I toggle task {int}")]
async fn i_toggle_task_by_id(world: &mut TodoWorld, id: i64) {
    let result = world.controller().toggle(id).await;
    record(world, result);
}

async fn delete(world: &mut TodoWorld, id: i64, answer: bool) {
    match world.controller().delete(id, |_| answer).await {
        Ok(outcome) => {
            world.last_delete = Some(outcome);
            world.last_error = None;
        }
        Err(e) => {
            world.last_delete = None;
            world.last_route = e.redirect();
            world.last_error = Some(e.to_string());
        }
    }
}

#[when(expr = "I delete the task {string} and confirm")]
async fn i_delete_and_confirm(world: &mut TodoWorld, title: String) {
    let id = task_id(world, &title);
    delete(world, id, true).await;
}

#[when(expr = "I delete the task {string} and decline")]
async fn i_delete_and_decline(world: &mut TodoWorld, title: String) {
    let id = task_id(world, &title);
    delete(world, id, false).await;
}

#[when(expr = "I delete task {int} and confirm")]
async fn i_delete_task_by_id(world: &mut TodoWorld, id: i64) {
    delete(world, id, true).await;
}

// ---------------------------------------------------------------------------
// Then steps
// ---------------------------------------------------------------------------

#[then(expr = "the list contains exactly one task titled {string}")]
async fn the_list_contains_exactly_one(world: &mut TodoWorld, title: String) {
    let count = titles(world).iter().filter(|t| **t == title).count();
    assert_eq!(count, 1, "expected one '{title}' in {:?}", titles(world));
}

#[then(expr = "the list contains task {string}")]
async fn the_list_contains(world: &mut TodoWorld, title: String) {
    assert!(
        titles(world).contains(&title),
        "'{title}' missing from {:?}",
        titles(world)
    );
}

#[then(expr = "the list does not contain task {string}")]
async fn the_list_does_not_contain(world: &mut TodoWorld, title: String) {
    assert!(
        !titles(world).contains(&title),
        "'{title}' still present in {:?}",
        titles(world)
    );
}

#[then(expr = "the list has {int} tasks")]
async fn the_list_has_n_tasks(world: &mut TodoWorld, expected: usize) {
    assert_eq!(world.controller().tasks().len(), expected);
}

#[then(expr = "the task {string} is completed")]
async fn the_task_is_completed(world: &mut TodoWorld, title: String) {
    let id = task_id(world, &title);
    let task = world.controller().task(id).expect("task not in list");
    assert!(task.completed, "'{title}' should be completed");
}

#[then(expr = "the task {string} is not completed")]
async fn the_task_is_not_completed(world: &mut TodoWorld, title: String) {
    let id = task_id(world, &title);
    let task = world.controller().task(id).expect("task not in list");
    assert!(!task.completed, "'{title}' should be pending");
}

#[then(expr = "the task {string} has description {string}")]
async fn the_task_has_description(world: &mut TodoWorld, title: String, description: String) {
    let id = task_id(world, &title);
    let task = world.controller().task(id).expect("task not in list");
    assert_eq!(task.description, description);
}

#[then(expr = "the backend served {int} task lists")]
async fn the_backend_served_n_lists(world: &mut TodoWorld, expected: usize) {
    assert_eq!(world.backend().with(|s| s.list_calls), expected);
}

#[then("the backend received no delete requests")]
async fn the_backend_received_no_deletes(world: &mut TodoWorld) {
    assert_eq!(world.backend().with(|s| s.delete_calls), 0);
}

#[then(expr = "the delete outcome is {string}")]
async fn the_delete_outcome_is(world: &mut TodoWorld, expected: String) {
    let expected = match expected.as_str() {
        "deleted" => DeleteOutcome::Deleted,
        "already gone" => DeleteOutcome::AlreadyGone,
        "declined" => DeleteOutcome::Declined,
        other => panic!("unknown delete outcome '{other}'"),
    };
    assert_eq!(
        world.last_delete,
        Some(expected),
        "last error: {:?}",
        world.last_error
    );
}

#[then("the action succeeds")]
async fn the_action_succeeds(world: &mut TodoWorld) {
    assert_eq!(world.last_error, None);
}

#[then(expr = "the action fails with {string}")]
async fn the_action_fails_with(world: &mut TodoWorld, expected: String) {
    let err = world.last_error.as_deref().unwrap_or("");
    assert!(
        err.contains(&expected),
        "expected error containing '{expected}', got '{err}'"
    );
}

#[then("the list is loaded")]
async fn the_list_is_loaded(world: &mut TodoWorld) {
    assert_eq!(world.controller().load_state(), &LoadState::Ready);
}

#[then("the list failed to load")]
async fn the_list_failed_to_load(world: &mut TodoWorld) {
    assert!(
        matches!(world.controller().load_state(), LoadState::Failed(_)),
        "load state was {:?}",
        world.controller().load_state()
    );
}
