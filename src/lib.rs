/// HTTP client for the task backend and its error taxonomy.
pub mod api;
/// Login, signup, and logout flows.
pub mod auth;
/// Base URL and session location.
pub mod config;
/// Task list state: cache, filter, inline edit, reload-after-mutation.
pub mod controller;
/// SQLite file backing the persistent session.
pub mod db;
pub mod logging;
/// Data types: Task, Filter, request and response payloads.
pub mod models;
/// Bearer token storage.
pub mod session;
