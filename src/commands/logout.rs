use todo_client::auth;

use super::{Context, route_hint};

pub fn run(ctx: &Context) -> Result<(), String> {
    let route = auth::logout(ctx.session.as_ref()).map_err(|e| e.to_string())?;
    println!("Logged out of {}; {}", ctx.session.origin(), route_hint(&route));
    Ok(())
}
