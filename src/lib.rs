//! Health Dome core library
//!
//! This module exports the core functionality of the Health Dome hospital
//! resource backend: filter parsing, statement building, query execution
//! and the HTTP handlers built on top of them.

pub mod api;
pub mod db;
pub mod error;
pub mod models;
pub mod query;
pub mod seed;

pub use error::{Error, Result};

/// Application configuration
pub mod config {
    use config::builder::DefaultState;
    use config::{ConfigBuilder, ConfigError, Environment, File};
    use serde::Deserialize;
    use sqlx::mysql::MySqlConnectOptions;
    use std::time::Duration;

    #[derive(Debug, Clone, Deserialize)]
    pub struct Config {
        pub server: ServerConfig,
        pub database: DatabaseConfig,
        pub hospital: HospitalConfig,
    }

    #[derive(Debug, Clone, Deserialize)]
    pub struct ServerConfig {
        pub host: String,
        pub port: u16,
    }

    #[derive(Debug, Clone, Deserialize)]
    pub struct DatabaseConfig {
        pub host: String,
        pub port: u16,
        pub user: String,
        pub password: String,
        pub name: String,
        pub max_connections: u32,
        pub acquire_timeout_secs: u64,
    }

    impl DatabaseConfig {
        pub fn connect_options(&self) -> MySqlConnectOptions {
            MySqlConnectOptions::new()
                .host(&self.host)
                .port(self.port)
                .username(&self.user)
                .password(&self.password)
                .database(&self.name)
        }

        pub fn acquire_timeout(&self) -> Duration {
            Duration::from_secs(self.acquire_timeout_secs)
        }
    }

    #[derive(Debug, Clone, Deserialize)]
    pub struct HospitalConfig {
        pub name: String,
    }

    fn with_defaults() -> Result<ConfigBuilder<DefaultState>, ConfigError> {
        config::Config::builder()
            .set_default("server.host", "0.0.0.0")?
            .set_default("server.port", 5000)?
            .set_default("database.host", "127.0.0.1")?
            .set_default("database.port", 3306)?
            .set_default("database.user", "root")?
            .set_default("database.password", "password")?
            .set_default("database.name", "hospital_db")?
            .set_default("database.max_connections", 5)?
            .set_default("database.acquire_timeout_secs", 5)?
            .set_default("hospital.name", "Vasant Kunj Hospital")
    }

    /// Load configuration from defaults, files and the environment
    pub fn load_config() -> Result<Config, ConfigError> {
        let env = std::env::var("HEALTHDOME_ENV").unwrap_or_else(|_| "development".into());

        with_defaults()?
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{}", env)).required(false))
            .add_source(Environment::with_prefix("HEALTHDOME").separator("__"))
            // Plain variables used by the docker deployment win over everything else
            .set_override_option("database.host", std::env::var("MYSQL_HOST").ok())?
            .set_override_option("database.user", std::env::var("MYSQL_USER").ok())?
            .set_override_option("database.password", std::env::var("MYSQL_PASSWORD").ok())?
            .set_override_option("database.name", std::env::var("MYSQL_DATABASE").ok())?
            .set_override_option("hospital.name", std::env::var("HOSPITAL_NAME").ok())?
            .build()?
            .try_deserialize()
    }

}
