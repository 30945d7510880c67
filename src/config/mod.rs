//! Application configuration management

use std::env;
use std::path::PathBuf;

use anyhow::{Context, Result};

/// Application configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    /// Bind host
    pub host: String,

    /// Server port
    pub port: u16,

    /// Archive root: read-only tree of YYYY_MM_DD date folders written by
    /// the importer
    pub archive_path: PathBuf,

    /// How many years back to probe for anniversaries
    pub lookback_years: u32,

    /// Default resize width for mobile clients that request no dimensions
    pub mobile_default_width: u32,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            host: env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),

            port: env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse()
                .context("Invalid PORT")?,

            archive_path: PathBuf::from(
                env::var("ARCHIVE_PATH").unwrap_or_else(|_| "./data/pics".to_string()),
            ),

            lookback_years: env::var("LOOKBACK_YEARS")
                .unwrap_or_else(|_| "10".to_string())
                .parse()
                .context("Invalid LOOKBACK_YEARS")?,

            mobile_default_width: env::var("MOBILE_DEFAULT_WIDTH")
                .unwrap_or_else(|_| "800".to_string())
                .parse()
                .context("Invalid MOBILE_DEFAULT_WIDTH")?,
        })
    }
}
