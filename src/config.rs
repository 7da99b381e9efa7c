//! Application configuration parsed from environment variables.
//!
//! Required:
//! - `SUPABASE_URL`: project URL, e.g. `https://xyzcompany.supabase.co`
//! - `SUPABASE_ANON_KEY`: public anon key sent as `apikey`
//!
//! Optional:
//! - `PORT`: default 3000
//! - `SUPABASE_REQUEST_TIMEOUT_SECS`: default 30
//! - `SUPABASE_CONNECT_TIMEOUT_SECS`: default 10
//! - `TASKS_STALE_SECS`: default 0 (every read refetches)
//! - `TASKS_GC_SECS`: default 300
//! - `COOKIE_SECURE`: defaults to true when `SUPABASE_URL` is https
//! - `ASSETS_DIR`: default `./assets`

use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_PORT: u16 = 3000;
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 10;
pub const DEFAULT_STALE_SECS: u64 = 0;
pub const DEFAULT_GC_SECS: u64 = 300;
pub const DEFAULT_ASSETS_DIR: &str = "./assets";

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("missing required env var {0}")]
    Missing(&'static str),
    #[error("invalid value for {key}: {value}")]
    Invalid { key: &'static str, value: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timeouts {
    pub request: Duration,
    pub connect: Duration,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SupabaseConfig {
    /// Project URL without trailing slash.
    pub url: String,
    pub anon_key: String,
    pub timeouts: Timeouts,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CacheConfig {
    pub stale_time: Duration,
    pub gc_time: Duration,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self { stale_time: Duration::from_secs(DEFAULT_STALE_SECS), gc_time: Duration::from_secs(DEFAULT_GC_SECS) }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub port: u16,
    pub supabase: SupabaseConfig,
    pub cache: CacheConfig,
    pub cookie_secure: bool,
    pub assets_dir: PathBuf,
}

impl AppConfig {
    /// Build typed config from the process environment.
    ///
    /// # Errors
    ///
    /// Returns an error if a required variable is missing or a value does not parse.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build typed config from an arbitrary key lookup.
    ///
    /// # Errors
    ///
    /// Returns an error if a required variable is missing or a value does not parse.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let url = required(&lookup, "SUPABASE_URL")?.trim_end_matches('/').to_owned();
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            return Err(ConfigError::Invalid { key: "SUPABASE_URL", value: url });
        }
        let anon_key = required(&lookup, "SUPABASE_ANON_KEY")?;

        let timeouts = Timeouts {
            request: Duration::from_secs(parse_or(&lookup, "SUPABASE_REQUEST_TIMEOUT_SECS", DEFAULT_REQUEST_TIMEOUT_SECS)?),
            connect: Duration::from_secs(parse_or(&lookup, "SUPABASE_CONNECT_TIMEOUT_SECS", DEFAULT_CONNECT_TIMEOUT_SECS)?),
        };
        let cache = CacheConfig {
            stale_time: Duration::from_secs(parse_or(&lookup, "TASKS_STALE_SECS", DEFAULT_STALE_SECS)?),
            gc_time: Duration::from_secs(parse_or(&lookup, "TASKS_GC_SECS", DEFAULT_GC_SECS)?),
        };

        let cookie_secure = match lookup("COOKIE_SECURE") {
            Some(raw) => parse_bool(&raw).ok_or(ConfigError::Invalid { key: "COOKIE_SECURE", value: raw })?,
            None => url.starts_with("https://"),
        };

        Ok(Self {
            port: parse_or(&lookup, "PORT", DEFAULT_PORT)?,
            supabase: SupabaseConfig { url, anon_key, timeouts },
            cache,
            cookie_secure,
            assets_dir: lookup("ASSETS_DIR").map_or_else(|| PathBuf::from(DEFAULT_ASSETS_DIR), PathBuf::from),
        })
    }
}

fn required<F>(lookup: &F, key: &'static str) -> Result<String, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    lookup(key)
        .map(|v| v.trim().to_owned())
        .filter(|v| !v.is_empty())
        .ok_or(ConfigError::Missing(key))
}

fn parse_or<F, T>(lookup: &F, key: &'static str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
{
    match lookup(key) {
        Some(raw) => raw.trim().parse::<T>().map_err(|_| ConfigError::Invalid { key, value: raw }),
        None => Ok(default),
    }
}

pub(crate) fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
