//! HTTP surface of the hospital resource service

use crate::db::Database;

pub mod handlers;
pub mod routes;

pub use routes::configure;

/// Shared by every worker; the pool inside `Database` is reference counted.
#[derive(Clone)]
pub struct AppState {
    pub db: Database,
    pub hospital_name: String,
}
