use anyhow::{Context, Result};
use dotenvy::dotenv;
use resolver::ResolutionPolicy;
use std::env;

/// Application configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub policy: ResolutionPolicy,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        // Load .env file if present (development)
        let _ = dotenv();

        let policy = match env::var("RESOLVER_POLICY") {
            Ok(value) => value
                .parse()
                .map_err(|e: String| anyhow::anyhow!(e))
                .context("RESOLVER_POLICY is invalid")?,
            Err(_) => ResolutionPolicy::default(),
        };

        Ok(Self {
            port: env::var("PORT")
                .unwrap_or_else(|_| "3000".to_string())
                .parse()
                .context("PORT must be a valid number")?,
            policy,
        })
    }
}
