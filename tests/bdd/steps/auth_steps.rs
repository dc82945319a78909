use cucumber::{then, when};
use todo_client::api::{ApiError, TaskApi};
use todo_client::auth::{self, LoginForm, Route, SignupForm};
use todo_client::session::SessionStore;

use crate::TodoWorld;

// ---------------------------------------------------------------------------
// When steps
// ---------------------------------------------------------------------------

#[when(expr = "I log in as {string} with password {string}")]
async fn i_log_in(world: &mut TodoWorld, email: String, password: String) {
    let api = world.client();
    let session = world.session();
    let form = LoginForm { email, password };
    match auth::submit_login(&api, session.as_ref(), &form).await {
        Ok(route) => {
            world.last_route = Some(route);
            world.last_error = None;
        }
        Err(e) => {
            world.last_route = None;
            world.last_error = Some(e.to_string());
        }
    }
}

#[when(expr = "I sign up as {string} named {string} with password {string}")]
async fn i_sign_up(world: &mut TodoWorld, email: String, name: String, password: String) {
    let api = world.client();
    let form = SignupForm {
        email,
        name,
        password,
    };
    match auth::submit_signup(&api, &form).await {
        Ok(route) => {
            world.last_route = Some(route);
            world.last_error = None;
        }
        Err(e) => {
            world.last_route = None;
            world.last_error = Some(e.to_string());
        }
    }
}

#[when("I log out")]
async fn i_log_out(world: &mut TodoWorld) {
    let session = world.session();
    let route = match world.controller.as_mut() {
        Some(controller) => controller.logout(session.as_ref()),
        None => auth::logout(session.as_ref()),
    }
    .expect("logout failed");
    world.last_route = Some(route);
}

// ---------------------------------------------------------------------------
// Then steps
// ---------------------------------------------------------------------------

#[then("I am sent to the task list")]
async fn i_am_sent_to_the_task_list(world: &mut TodoWorld) {
    assert_eq!(
        world.last_route,
        Some(Route::Tasks),
        "expected to land on the task list, last error: {:?}",
        world.last_error
    );
}

#[then("I am sent to login")]
async fn i_am_sent_to_login(world: &mut TodoWorld) {
    assert!(
        matches!(world.last_route, Some(Route::Login { .. })),
        "expected a redirect to login but route was {:?}",
        world.last_route
    );
}

#[then(expr = "I am sent to login with notice {string}")]
async fn i_am_sent_to_login_with_notice(world: &mut TodoWorld, notice: String) {
    assert_eq!(
        world.last_route,
        Some(Route::Login {
            notice: Some(notice)
        }),
        "last error: {:?}",
        world.last_error
    );
}

#[then(expr = "the form shows {string}")]
async fn the_form_shows(world: &mut TodoWorld, expected: String) {
    assert_eq!(world.last_error.as_deref(), Some(expected.as_str()));
}

#[then("a session token is stored")]
async fn a_session_token_is_stored(world: &mut TodoWorld) {
    let token = world.session().get_token().expect("session read failed");
    assert!(
        token.is_some_and(|t| !t.is_empty()),
        "expected a non-empty token in the session slot"
    );
}

#[then("no session token is stored")]
async fn no_session_token_is_stored(world: &mut TodoWorld) {
    let token = world.session().get_token().expect("session read failed");
    assert_eq!(token, None);
}

#[then(expr = "I can log in as {string} with password {string}")]
async fn i_can_log_in(world: &mut TodoWorld, email: String, password: String) {
    i_log_in(world, email, password).await;
    i_am_sent_to_the_task_list(world).await;
}

#[then("the token endpoint saw no authorization header")]
async fn the_token_endpoint_saw_no_authorization_header(world: &mut TodoWorld) {
    let count = world.backend().with(|s| s.token_calls_with_auth);
    assert_eq!(count, 0, "login sent a bearer token to /api/token");
}

#[then("the backend received no signup requests")]
async fn the_backend_received_no_signup_requests(world: &mut TodoWorld) {
    assert_eq!(world.backend().with(|s| s.signup_calls), 0);
}

#[then("listing tasks directly fails with an auth error")]
async fn listing_tasks_fails_with_auth_error(world: &mut TodoWorld) {
    let api = world.client();
    assert_eq!(api.list_tasks().await, Err(ApiError::Auth));
}
