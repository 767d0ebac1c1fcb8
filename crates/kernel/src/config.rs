//! Configuration loaded from environment variables.

use std::env;

use anyhow::{Context, Result};

/// Application configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// HTTP server port (default: 3000).
    pub port: u16,

    /// PostgreSQL connection URL.
    pub database_url: String,

    /// Maximum database connections in pool (default: 10).
    pub database_max_connections: u32,

    /// CORS allowed origins (comma-separated, default: "*").
    pub cors_allowed_origins: Vec<String>,

    /// Restrict field validation to top-level fields, matching the
    /// behavior of deployments that never validated collection children
    /// (default: false, i.e. validate the whole tree).
    pub compat_shallow_validation: bool,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self> {
        let port = env::var("PORT")
            .unwrap_or_else(|_| "3000".to_string())
            .parse()
            .context("PORT must be a valid u16")?;

        let database_url =
            env::var("DATABASE_URL").context("DATABASE_URL environment variable is required")?;

        let database_max_connections = env::var("DATABASE_MAX_CONNECTIONS")
            .unwrap_or_else(|_| "10".to_string())
            .parse()
            .context("DATABASE_MAX_CONNECTIONS must be a valid u32")?;

        let cors_allowed_origins = parse_origins(env::var("CORS_ALLOWED_ORIGINS").ok());

        let compat_shallow_validation =
            parse_flag(env::var("COMPAT_SHALLOW_VALIDATION").ok().as_deref());

        Ok(Self {
            port,
            database_url,
            database_max_connections,
            cors_allowed_origins,
            compat_shallow_validation,
        })
    }
}

fn parse_origins(raw: Option<String>) -> Vec<String> {
    match raw {
        Some(v) => v.split(',').map(|s| s.trim().to_string()).collect(),
        None => vec!["*".to_string()],
    }
}

fn parse_flag(raw: Option<&str>) -> bool {
    matches!(raw, Some("1") | Some("true") | Some("yes"))
}
