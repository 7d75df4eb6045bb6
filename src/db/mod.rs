//! Database module for Health Dome
//!
//! This module handles database connections and query execution.

use sqlx::mysql::{MySqlPool, MySqlPoolOptions};
use sqlx::pool::PoolConnection;
use sqlx::MySql;
use tracing::error;

use crate::config::DatabaseConfig;
use crate::{Error, Result};

pub mod executor;
pub mod schema;
pub mod session;

pub use executor::{execute_query, QueryOutcome, Row, StatusObject};
pub use session::Session;

/// Database connection pool
#[derive(Clone)]
pub struct Database {
    pool: MySqlPool,
}

impl Database {
    /// Create the pool without touching the server. Connections are opened
    /// on first use, so the service starts even while MySQL is still booting.
    pub fn connect_lazy(config: &DatabaseConfig) -> Self {
        let pool = MySqlPoolOptions::new()
            .max_connections(config.max_connections)
            .acquire_timeout(config.acquire_timeout())
            .connect_lazy_with(config.connect_options());
        Self { pool }
    }

    /// Check out one connection for the duration of a request. It goes back
    /// to the pool when the guard is dropped.
    pub async fn acquire(&self) -> Result<PoolConnection<MySql>> {
        self.pool.acquire().await.map_err(|e| {
            error!("Unable to establish connection to the database: {}", e);
            Error::ConnectionUnavailable(e)
        })
    }
}
