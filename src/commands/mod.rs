pub mod add;
pub mod delete;
pub mod edit;
pub mod list;
pub mod login;
pub mod logout;
pub mod shell;
pub mod signup;
pub mod status;
pub mod toggle;

use std::io::{BufRead, Write};
use std::sync::Arc;

use colored::Colorize;

use todo_client::api::ApiClient;
use todo_client::auth::Route;
use todo_client::config::Config;
use todo_client::controller::{ControllerError, LoadState, TaskListController};
use todo_client::models::{Filter, Task};
use todo_client::session::{SessionStore, SqliteSessionStore};

/// Everything a command needs: settings, the persisted session, and a client bound to it.
pub struct Context {
    pub config: Config,
    pub session: Arc<SqliteSessionStore>,
    pub api: ApiClient,
    pub json: bool,
}

impl Context {
    pub fn open(config: Config, json: bool) -> Result<Self, String> {
        let session = Arc::new(
            SqliteSessionStore::open(&config.session_db, &config.api_url)
                .map_err(|e| e.to_string())?,
        );
        let store: Arc<dyn SessionStore> = session.clone();
        let api = ApiClient::new(config.api_url.clone(), store);
        Ok(Context {
            config,
            session,
            api,
            json,
        })
    }

    /// A controller that has already fetched the list.
    pub async fn mounted(&self) -> Result<TaskListController<ApiClient>, String> {
        let mut controller = TaskListController::new(self.api.clone());
        controller.mount().await.map_err(|e| describe(&e))?;
        Ok(controller)
    }
}

/// User-facing text for a controller error, pointing at login when the session is gone.
pub fn describe(e: &ControllerError) -> String {
    match e.redirect() {
        Some(route) => format!("{e}; {}", route_hint(&route)),
        None => e.to_string(),
    }
}

pub fn route_hint(route: &Route) -> String {
    match route {
        Route::Login { notice: Some(n) } => format!("{n} Run 'todo login'."),
        Route::Login { notice: None } => "run 'todo login'".to_string(),
        Route::Tasks => "run 'todo list'".to_string(),
    }
}

/// Format a completion flag as a colored checkbox.
pub fn format_completed(completed: bool) -> String {
    if completed {
        "[x] done".bright_black().to_string()
    } else {
        "[ ] pending".yellow().to_string()
    }
}

/// Print the controller's visible tasks as a table or JSON.
pub fn print_view(controller: &TaskListController<ApiClient>, json: bool) -> Result<(), String> {
    if let LoadState::Failed(reason) = controller.load_state() {
        eprintln!("{} could not load tasks: {reason}", "warning:".yellow().bold());
    }
    print_tasks(&controller.visible(), controller.filter(), json)
}

pub fn print_tasks(tasks: &[&Task], filter: Filter, json: bool) -> Result<(), String> {
    if json {
        let j = serde_json::to_string_pretty(tasks).map_err(|e| format!("json error: {e}"))?;
        println!("{j}");
        return Ok(());
    }

    if tasks.is_empty() {
        match filter {
            Filter::All => println!("No tasks yet. Ready to be productive?"),
            f => println!("No {f} tasks."),
        }
        return Ok(());
    }

    println!("{:<6} {:<12} {:<40} DESCRIPTION", "ID", "STATUS", "TITLE");
    println!("{}", "-".repeat(80));
    for t in tasks {
        let title = truncate(&t.title, 38);
        let title = if t.completed {
            title.strikethrough().bright_black().to_string()
        } else {
            title
        };
        println!(
            "{:<6} {:<12} {:<40} {}",
            t.id,
            format_completed(t.completed),
            title,
            truncate(&t.description, 40),
        );
    }
    Ok(())
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() > max {
        format!("{}...", s.chars().take(max - 3).collect::<String>())
    } else {
        s.to_string()
    }
}

/// Ask a yes/no question on stdin. Anything but `y`/`yes` is a no.
pub fn confirm_stdin(prompt: &str) -> bool {
    print!("{prompt} [y/N] ");
    let _ = std::io::stdout().flush();
    let mut answer = String::new();
    if std::io::stdin().lock().read_line(&mut answer).is_err() {
        return false;
    }
    is_yes(&answer)
}

pub fn is_yes(answer: &str) -> bool {
    matches!(answer.trim().to_lowercase().as_str(), "y" | "yes")
}

/// Take a password from the flag/env value, or read one line from stdin.
pub fn read_password(given: Option<String>) -> Result<String, String> {
    if let Some(p) = given {
        return Ok(p);
    }
    let mut line = String::new();
    std::io::stdin()
        .lock()
        .read_line(&mut line)
        .map_err(|e| format!("failed to read password: {e}"))?;
    Ok(line.trim_end_matches(['\r', '\n']).to_string())
}
