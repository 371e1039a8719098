//! Server configuration from command-line flags and environment variables.

use clap::{Parser, ValueEnum};
use std::net::SocketAddr;
use thiserror::Error;

/// Backing store for task records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum StoreKind {
    /// `PostgreSQL` through Diesel; requires a database URL.
    Postgres,
    /// Process-local memory; data is lost on exit.
    Memory,
}

/// Configuration for the `taskboard` server.
#[derive(Debug, Clone, Parser)]
#[command(name = "taskboard", version, about = "Task management REST API")]
pub struct ServerConfig {
    /// Address to listen on.
    #[arg(long, env = "TASKBOARD_BIND", default_value = "127.0.0.1:3000")]
    pub bind: SocketAddr,

    /// Backing store for tasks.
    #[arg(long, env = "TASKBOARD_STORE", value_enum, default_value_t = StoreKind::Postgres)]
    pub store: StoreKind,

    /// `PostgreSQL` connection URL.
    #[arg(long, env = "DATABASE_URL", hide_env_values = true)]
    pub database_url: Option<String>,

    /// Maximum number of pooled database connections.
    #[arg(long, env = "TASKBOARD_POOL_SIZE", default_value_t = 8)]
    pub pool_size: u32,

    /// Bearer token required on task routes; unset leaves them open.
    #[arg(long, env = "TASKBOARD_API_TOKEN", hide_env_values = true)]
    pub api_token: Option<String>,

    /// Log filter used when `RUST_LOG` is unset.
    #[arg(long, env = "TASKBOARD_LOG", default_value = "info,taskboard=debug")]
    pub log_filter: String,
}

/// Errors raised while validating configuration.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// The `PostgreSQL` store was selected without a database URL.
    #[error("the postgres store requires --database-url or DATABASE_URL")]
    MissingDatabaseUrl,

    /// The pool size is zero.
    #[error("pool size must be at least 1")]
    EmptyPool,
}

impl ServerConfig {
    /// Returns the database URL for the `PostgreSQL` store.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingDatabaseUrl`] when no non-blank URL was
    /// provided.
    pub fn database_url(&self) -> Result<&str, ConfigError> {
        self.database_url
            .as_deref()
            .map(str::trim)
            .filter(|url| !url.is_empty())
            .ok_or(ConfigError::MissingDatabaseUrl)
    }

    /// Returns the configured pool size.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::EmptyPool`] when the pool size is zero.
    pub const fn pool_size(&self) -> Result<u32, ConfigError> {
        if self.pool_size == 0 {
            return Err(ConfigError::EmptyPool);
        }
        Ok(self.pool_size)
    }

    /// Returns the API token, treating a blank value as unset.
    #[must_use]
    pub fn api_token(&self) -> Option<&str> {
        self.api_token
            .as_deref()
            .map(str::trim)
            .filter(|token| !token.is_empty())
    }
}
