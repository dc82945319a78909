use std::io::IsTerminal;

use tracing_subscriber::EnvFilter;

/// Filter used when neither `TODO_LOG` nor `RUST_LOG` is set.
pub const DEFAULT_FILTER: &str = "warn";
pub const VERBOSE_FILTER: &str = "warn,todo_client=debug";

/// Pick the filter directive: `TODO_LOG`, then `RUST_LOG`, then the default.
pub fn filter_directives(verbose: bool) -> String {
    let default_directives = if verbose { VERBOSE_FILTER } else { DEFAULT_FILTER };
    ["TODO_LOG", "RUST_LOG"]
        .iter()
        .find_map(|key| {
            std::env::var(key)
                .ok()
                .filter(|value| !value.trim().is_empty())
        })
        .unwrap_or_else(|| default_directives.to_string())
}

/// Install the stderr subscriber. Safe to call more than once.
pub fn init_logging(verbose: bool) {
    let directives = filter_directives(verbose);
    let filter = EnvFilter::try_new(&directives).unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_ansi(std::io::stderr().is_terminal())
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
