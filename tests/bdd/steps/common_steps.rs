use cucumber::given;
use todo_client::auth::{self, LoginForm, Route};
use todo_client::controller::TaskListController;

use crate::TodoWorld;
use crate::backend;

/// Look up a task id by title in the backend's store.
pub fn task_id(world: &TodoWorld, title: &str) -> i64 {
    if let Some(id) = world.task_ids.get(title) {
        return *id;
    }
    world.backend().with(|state| {
        state
            .tasks
            .iter()
            .find(|t| t.task.title == title)
            .map(|t| t.task.id)
            .unwrap_or_else(|| panic!("no task titled '{title}' on the backend"))
    })
}

#[given("the backend is running")]
async fn the_backend_is_running(world: &mut TodoWorld) {
    world.backend = Some(backend::start().await);
}

#[given(expr = "an account {string} named {string} with password {string}")]
async fn an_account_exists(world: &mut TodoWorld, email: String, name: String, password: String) {
    world
        .backend()
        .with(|state| state.add_account(&email, &name, &password));
}

#[given(expr = "I am logged in as {string} with password {string}")]
async fn i_am_logged_in(world: &mut TodoWorld, email: String, password: String) {
    let api = world.client();
    let session = world.session();
    let form = LoginForm { email, password };
    let route = auth::submit_login(&api, session.as_ref(), &form)
        .await
        .unwrap_or_else(|e| panic!("login failed during setup: {e}"));
    assert_eq!(route, Route::Tasks);
}

#[given("the task list is open")]
async fn the_task_list_is_open(world: &mut TodoWorld) {
    let mut controller = TaskListController::new(world.client());
    controller
        .mount()
        .await
        .unwrap_or_else(|e| panic!("mounting the task list failed: {e}"));
    world.controller = Some(controller);
}

#[given(expr = "the backend has tasks {string} for {string}")]
async fn the_backend_has_tasks(world: &mut TodoWorld, titles: String, owner: String) {
    let created: Vec<(String, i64)> = world.backend().with(|state| {
        titles
            .split(',')
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .map(|title| (title.to_string(), state.add_task(&owner, title, "").id))
            .collect()
    });
    world.task_ids.extend(created);
}

#[given(expr = "the backend has a completed task {string} for {string}")]
async fn the_backend_has_a_completed_task(world: &mut TodoWorld, title: String, owner: String) {
    let id = world.backend().with(|state| {
        let id = state.add_task(&owner, &title, "").id;
        if let Some(t) = state.tasks.iter_mut().find(|t| t.task.id == id) {
            t.task.completed = true;
        }
        id
    });
    world.task_ids.insert(title, id);
}

#[given(expr = "the task {string} is deleted on the server")]
async fn the_task_is_deleted_on_the_server(world: &mut TodoWorld, title: String) {
    let id = task_id(world, &title);
    world
        .backend()
        .with(|state| state.tasks.retain(|t| t.task.id != id));
}

#[given("the backend revokes all sessions")]
async fn the_backend_revokes_all_sessions(world: &mut TodoWorld) {
    world.backend().with(|state| state.tokens.clear());
}

#[given("the backend fails task listing")]
async fn the_backend_fails_task_listing(world: &mut TodoWorld) {
    world.backend().with(|state| state.fail_listing = true);
}
