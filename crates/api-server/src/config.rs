//! Server configuration
//!
//! Read once at startup from the process environment, falling back to an
//! optional `.env` file in the working directory. Variables already set in
//! the environment win over the file.

use std::collections::HashMap;
use std::net::SocketAddr;
use std::path::Path;
use std::time::Duration;

use thiserror::Error;

/// Store or cache URL that selects the in-process backend
pub const MEMORY_URL: &str = "memory://";

/// Optional dotenv file read by [`Config::from_env`]
pub const ENV_FILE: &str = ".env";

/// Upper bound for `CACHE_TTL_SECS` (30 days)
pub const MAX_CACHE_TTL_SECS: u64 = 30 * 24 * 60 * 60;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),

    #[error("{name} has invalid value {value:?}: {reason}")]
    Invalid {
        name: &'static str,
        value: String,
        reason: String,
    },

    #[error("failed to read {path}: {reason}")]
    EnvFile { path: String, reason: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub http_addr: SocketAddr,
    pub database_url: String,
    pub redis_url: Option<String>,
    pub db_max_connections: u32,
    pub cache_ttl: Duration,
    pub store_timeout: Duration,
    pub cache_timeout: Duration,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        let file = read_env_file(Path::new(ENV_FILE))?;
        if !file.is_empty() {
            tracing::info!(path = ENV_FILE, vars = file.len(), "Loaded env file");
        }
        Self::from_sources(|name| std::env::var(name).ok(), &file)
    }

    /// Build from a primary lookup, using `file` for anything it lacks
    pub fn from_sources<F>(lookup: F, file: &HashMap<String, String>) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        Self::from_lookup(|name| lookup(name).or_else(|| file.get(name).cloned()))
    }

    /// Build from an arbitrary variable source
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        let http_addr = match (var("HTTP_ADDR"), var("HTTP_PORT")) {
            (Some(addr), _) => parse("HTTP_ADDR", &addr)?,
            (None, Some(port)) => parse_port_addr(&port)?,
            (None, None) => SocketAddr::from(([0, 0, 0, 0], 8080)),
        };

        let database_url = var("DATABASE_URL")
            .or_else(|| var("POSTGRES_DSN"))
            .ok_or(ConfigError::Missing("DATABASE_URL"))?;

        let redis_url = var("REDIS_URL").or_else(|| var("REDIS_DSN"));

        Ok(Self {
            http_addr,
            database_url,
            redis_url,
            db_max_connections: parse_or("DB_MAX_CONNECTIONS", var("DB_MAX_CONNECTIONS"), 10)?,
            cache_ttl: parse_cache_ttl(var("CACHE_TTL_SECS"))?,
            store_timeout: Duration::from_millis(parse_or(
                "STORE_TIMEOUT_MS",
                var("STORE_TIMEOUT_MS"),
                5000,
            )?),
            cache_timeout: Duration::from_millis(parse_or(
                "CACHE_TIMEOUT_MS",
                var("CACHE_TIMEOUT_MS"),
                500,
            )?),
        })
    }

    pub fn uses_memory_store(&self) -> bool {
        self.database_url == MEMORY_URL
    }
}

fn parse<T>(name: &'static str, raw: &str) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    raw.trim().parse::<T>().map_err(|e: T::Err| ConfigError::Invalid {
        name,
        value: raw.to_string(),
        reason: e.to_string(),
    })
}

fn parse_or<T>(name: &'static str, raw: Option<String>, default: T) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match raw {
        Some(raw) => parse(name, &raw),
        None => Ok(default),
    }
}

/// Read `KEY=VALUE` pairs from a dotenv file; a missing file is empty
pub fn read_env_file(path: &Path) -> Result<HashMap<String, String>, ConfigError> {
    let env_file_error = |e: dotenvy::Error| ConfigError::EnvFile {
        path: path.display().to_string(),
        reason: e.to_string(),
    };

    let iter = match dotenvy::from_path_iter(path) {
        Ok(iter) => iter,
        Err(e) if e.not_found() => return Ok(HashMap::new()),
        Err(e) => return Err(env_file_error(e)),
    };

    iter.map(|item| item.map_err(env_file_error)).collect()
}

fn parse_cache_ttl(raw: Option<String>) -> Result<Duration, ConfigError> {
    let secs: u64 = parse_or("CACHE_TTL_SECS", raw.clone(), 300)?;
    if secs > MAX_CACHE_TTL_SECS {
        return Err(ConfigError::Invalid {
            name: "CACHE_TTL_SECS",
            value: raw.unwrap_or_default(),
            reason: format!("must be at most {}", MAX_CACHE_TTL_SECS),
        });
    }
    Ok(Duration::from_secs(secs))
}

/// Accepts `8080` or `:8080`
fn parse_port_addr(raw: &str) -> Result<SocketAddr, ConfigError> {
    let port: u16 = parse("HTTP_PORT", raw.trim().trim_start_matches(':'))?;
    Ok(SocketAddr::from(([0, 0, 0, 0], port)))
}
