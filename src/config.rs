use anyhow::{Context, Result};

#[derive(Debug, Clone)]
pub struct AppConfig {
    /// SQLite connection string, e.g. "sqlite:./linkfolio.db"
    pub database_url: String,

    /// Host to bind the HTTP server to, e.g. "0.0.0.0"
    pub host: String,

    /// Port to listen on
    pub port: u16,

    /// How many days of daily counters the prune job keeps.
    pub retention_days: u32,
}

impl AppConfig {
    /// Load configuration from environment variables (populated by dotenvy
    /// before this is called).
    pub fn from_env() -> Result<Self> {
        let port = std::env::var("PORT")
            .unwrap_or_else(|_| "3000".into())
            .parse::<u16>()
            .context("PORT must be a valid port number (1–65535)")?;

        let retention_days = std::env::var("RETENTION_DAYS")
            .unwrap_or_else(|_| "90".into())
            .parse::<u32>()
            .unwrap_or(90);

        Ok(Self {
            database_url: std::env::var("DATABASE_URL")
                .unwrap_or_else(|_| "sqlite:./linkfolio.db".into()),
            host: std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into()),
            port,
            retention_days,
        })
    }
}
