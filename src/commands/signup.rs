use todo_client::auth::{self, SignupForm};

use super::{Context, read_password, route_hint};

pub async fn run(
    ctx: &Context,
    email: &str,
    name: &str,
    password: Option<String>,
) -> Result<(), String> {
    let form = SignupForm {
        email: email.to_string(),
        name: name.to_string(),
        password: read_password(password)?,
    };
    let route = auth::submit_signup(&ctx.api, &form)
        .await
        .map_err(|e| e.to_string())?;

    println!("{}", route_hint(&route));
    Ok(())
}
