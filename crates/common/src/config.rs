//! Configuration management following 12-factor app principles
//!
//! All configuration is loaded from environment variables.

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::env;

#[derive(Clone, Serialize, Deserialize)]
pub struct Config {
    /// PostgreSQL connection URL
    pub database_url: String,

    /// HS256 secret used to verify member session tokens
    pub jwt_secret: String,
    pub jwt_issuer: Option<String>,
    pub jwt_audience: Option<String>,

    /// Member-data store backend (`openhumans` or `mock`)
    pub memberdata_provider: String,
    pub openhumans_base_url: String,

    /// Runtime configuration
    pub rust_log: String,
    pub port: u16,
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("jwt_issuer", &self.jwt_issuer)
            .field("jwt_audience", &self.jwt_audience)
            .field("memberdata_provider", &self.memberdata_provider)
            .field("openhumans_base_url", &self.openhumans_base_url)
            .field("rust_log", &self.rust_log)
            .field("port", &self.port)
            .finish_non_exhaustive()
    }
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();

        let config = Self {
            database_url: env::var("DATABASE_URL")
                .map_err(|_| anyhow::anyhow!("DATABASE_URL is required"))?,

            jwt_secret: env::var("JWT_SECRET")
                .map_err(|_| anyhow::anyhow!("JWT_SECRET is required"))?,
            jwt_issuer: env::var("JWT_ISSUER").ok(),
            jwt_audience: env::var("JWT_AUDIENCE").ok(),

            memberdata_provider: env::var("MEMBERDATA_PROVIDER")
                .unwrap_or_else(|_| "openhumans".to_string()),
            openhumans_base_url: env::var("OPENHUMANS_BASE_URL")
                .unwrap_or_else(|_| "https://www.openhumans.org".to_string()),

            rust_log: env::var("RUST_LOG").unwrap_or_else(|_| "autspaces=debug".to_string()),
            port: env::var("PORT")
                .unwrap_or_else(|_| "3000".to_string())
                .parse()
                .unwrap_or(3000),
        };

        Ok(config)
    }
}
