use serde_json::json;
use todo_client::session::SessionStore;

use super::Context;

/// Show which backend is configured, whether a session exists, and who it belongs to.
pub async fn run(ctx: &Context) -> Result<(), String> {
    let token = ctx.session.get_token().map_err(|e| e.to_string())?;
    let saved_at = ctx.session.saved_at().map_err(|e| e.to_string())?;

    let health = ctx.api.health().await;
    let user = match token {
        Some(_) => Some(ctx.api.current_user().await),
        None => None,
    };

    if ctx.json {
        let value = json!({
            "api_url": ctx.api.base_url().as_str(),
            "origin": ctx.session.origin(),
            "session_db": ctx.config.session_db.display().to_string(),
            "logged_in": token.is_some(),
            "saved_at": saved_at.map(|t| t.to_rfc3339()),
            "user": user.as_ref().and_then(|u| u.as_ref().ok()),
            "backend": health.as_ref().ok(),
        });
        let j = serde_json::to_string_pretty(&value).map_err(|e| format!("json error: {e}"))?;
        println!("{j}");
        return Ok(());
    }

    println!("API:         {}", ctx.api.base_url());
    println!("Session DB:  {}", ctx.config.session_db.display());
    match &health {
        Ok(h) => println!("Backend:     {}", h.status),
        Err(e) => println!("Backend:     unreachable ({e})"),
    }
    match (saved_at, &user) {
        (Some(at), Some(Ok(u))) => {
            let who = u.name.as_deref().unwrap_or(&u.email);
            println!("Session:     {who} <{}> (since {})", u.email, at.format("%Y-%m-%d %H:%M"));
        }
        (Some(at), Some(Err(e))) => {
            println!(
                "Session:     stored {} but not usable ({e}); run 'todo login'",
                at.format("%Y-%m-%d %H:%M")
            );
        }
        _ => println!("Session:     none; run 'todo login'"),
    }
    Ok(())
}
