use todo_client::auth::{self, LoginForm};

use super::{Context, read_password, route_hint};

pub async fn run(ctx: &Context, email: &str, password: Option<String>) -> Result<(), String> {
    let form = LoginForm {
        email: email.to_string(),
        password: read_password(password)?,
    };
    let route = auth::submit_login(&ctx.api, ctx.session.as_ref(), &form)
        .await
        .map_err(|e| e.to_string())?;

    println!("Logged in as {}; {}", form.email.trim(), route_hint(&route));
    Ok(())
}
