// src/config.rs

use std::{env, path::PathBuf, str::FromStr, time::Duration};
use tracing::warn;

use crate::dataset::SchemaVariant;
use crate::error::{LookupError, Result};

pub const DEFAULT_API_URL: &str = "https://api.telegram.org";
pub const DEFAULT_NODES_FILE: &str = "nodes_file.xlsx";
const DEFAULT_POLL_TIMEOUT_SECS: u64 = 30;
const DEFAULT_MAX_CONCURRENT_CHATS: usize = 4;

/// Runtime settings of the bot.
#[derive(Debug, Clone)]
pub struct Config {
    pub token: String,
    pub api_url: String,
    pub nodes_file: PathBuf,
    pub schema: SchemaVariant,
    pub poll_timeout: Duration,
    pub max_concurrent_chats: usize,
    pub new_year_countdown: bool,
}

impl Config {
    /// Read `.env` (if any) and then the process environment.
    pub fn from_env() -> Result<Self> {
        // a missing .env is normal in production
        let _ = dotenv::dotenv();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build from an arbitrary key lookup; `from_env` passes the process
    /// environment.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let token = lookup("TELEGRAM_TOKEN")
            .filter(|t| !t.trim().is_empty())
            .ok_or_else(|| LookupError::config("TELEGRAM_TOKEN is not set"))?;

        let schema = SchemaVariant::resolve(&lookup("NODES_SCHEMA").unwrap_or_default())?;

        let poll_timeout_secs = parse_or(&lookup, "POLL_TIMEOUT_SECS", DEFAULT_POLL_TIMEOUT_SECS);
        let max_concurrent_chats =
            parse_or(&lookup, "MAX_CONCURRENT_CHATS", DEFAULT_MAX_CONCURRENT_CHATS).max(1);

        Ok(Self {
            token,
            api_url: lookup("TELEGRAM_API_URL").unwrap_or_else(|| DEFAULT_API_URL.to_string()),
            nodes_file: lookup("NODES_FILE")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_NODES_FILE)),
            schema,
            poll_timeout: Duration::from_secs(poll_timeout_secs),
            max_concurrent_chats,
            new_year_countdown: lookup("NEW_YEAR_COUNTDOWN")
                .map(|v| parse_flag(&v))
                .unwrap_or(true),
        })
    }
}

fn parse_or<F, T>(lookup: &F, key: &str, default: T) -> T
where
    F: Fn(&str) -> Option<String>,
    T: FromStr + std::fmt::Display,
{
    match lookup(key) {
        None => default,
        Some(raw) => raw.trim().parse().unwrap_or_else(|_| {
            warn!("{}={:?} is not a valid number, using {}", key, raw, default);
            default
        }),
    }
}

fn parse_flag(raw: &str) -> bool {
    !matches!(
        raw.trim().to_lowercase().as_str(),
        "false" | "0" | "no" | "off"
    )
}
