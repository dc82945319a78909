mod commands;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use todo_client::config::Config;
use todo_client::logging;
use todo_client::models::Filter;

#[derive(Parser)]
#[command(
    name = "todo",
    version,
    about = "Terminal client for a task tracking backend"
)]
struct Cli {
    /// Backend base URL
    #[arg(long, env = "TODO_API_URL", global = true)]
    api_url: Option<String>,

    /// Path to the session database (default: ~/.todo/session.db)
    #[arg(long, env = "TODO_SESSION_DB", global = true)]
    session_db: Option<PathBuf>,

    /// Output as JSON instead of table
    #[arg(long, global = true)]
    json: bool,

    /// Log requests to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Log in and store the session token
    Login {
        /// Account email
        #[arg(short, long)]
        email: String,
        /// Password (read from stdin if omitted)
        #[arg(short, long, env = "TODO_PASSWORD", hide_env_values = true)]
        password: Option<String>,
    },
    /// Create an account
    Signup {
        /// Account email
        #[arg(short, long)]
        email: String,
        /// Display name
        #[arg(short, long)]
        name: String,
        /// Password, at least 8 characters (read from stdin if omitted)
        #[arg(short, long, env = "TODO_PASSWORD", hide_env_values = true)]
        password: Option<String>,
    },
    /// Forget the stored session token
    Logout,
    /// Show backend, session, and current user
    Status,
    /// List tasks
    List {
        /// Which tasks to show (all, pending, completed)
        #[arg(short, long, default_value = "all", value_parser = Filter::from_str)]
        filter: Filter,
    },
    /// Add a task
    Add {
        /// Task title
        title: String,
        /// Task description
        #[arg(short, long)]
        description: Option<String>,
    },
    /// Change a task's title and/or description
    Edit {
        /// Task ID
        id: i64,
        /// New title
        #[arg(long)]
        title: Option<String>,
        /// New description
        #[arg(short, long)]
        description: Option<String>,
    },
    /// Flip a task between pending and completed
    Toggle {
        /// Task ID
        id: i64,
    },
    /// Delete a task
    Delete {
        /// Task ID
        id: i64,
        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
    /// Interactive task view reading commands from stdin
    Shell,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    logging::init_logging(cli.verbose);

    if let Err(e) = run(cli).await {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), String> {
    let config = Config::resolve(cli.api_url.as_deref(), cli.session_db)?;
    let ctx = commands::Context::open(config, cli.json)?;

    match cli.command {
        Commands::Login { email, password } => commands::login::run(&ctx, &email, password).await,
        Commands::Signup {
            email,
            name,
            password,
        } => commands::signup::run(&ctx, &email, &name, password).await,
        Commands::Logout => commands::logout::run(&ctx),
        Commands::Status => commands::status::run(&ctx).await,
        Commands::List { filter } => commands::list::run(&ctx, filter).await,
        Commands::Add { title, description } => {
            commands::add::run(&ctx, &title, description.as_deref()).await
        }
        Commands::Edit {
            id,
            title,
            description,
        } => commands::edit::run(&ctx, id, title.as_deref(), description.as_deref()).await,
        Commands::Toggle { id } => commands::toggle::run(&ctx, id).await,
        Commands::Delete { id, yes } => commands::delete::run(&ctx, id, yes).await,
        Commands::Shell => commands::shell::run(&ctx).await,
    }
}
