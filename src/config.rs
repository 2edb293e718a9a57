//! Application configuration loaded from environment variables.
//!
//! Configuration is loaded once at startup and validated before the server starts.
//! An explicit [`Config`] value is then handed to every constructor that needs it.
//!
//! ## Example
//!
//! ```bash
//! export DATABASE_URL="sqlite://mirrors.db?mode=rwc"
//! export SEARCH_PROVIDER="serper"
//! export SERPER_API_KEY="..."
//! ```
//!
//! ## Optional Variables
//!
//! - `LISTEN` - Bind address (default: `0.0.0.0:8000`)
//! - `RUST_LOG` - Log level (default: `info`)
//! - `LOG_FORMAT` - Log format: `text` or `json` (default: `text`)
//! - `DB_MAX_CONNECTIONS` / `DB_CONNECT_TIMEOUT` - Pool settings (default: 5 / 30s)
//! - `SEARCH_PROVIDER` - `serper` or `serpapi` (default: `serper`)
//! - `SERPER_ENDPOINT` / `SERPAPI_ENDPOINT` - Override search API URLs
//! - `SEARCH_TIMEOUT_SECONDS` - Search timeout (default: 20 for serper, 30 for serpapi)
//! - `RESOLVE_TIMEOUT_SECONDS` - HTTP redirect-following timeout (default: 25)
//! - `BROWSER_WAIT_SECONDS` - Default browser navigation budget (default: 8)
//! - `BROWSER_SETTLE_MS` - Pause after a consent click (default: 3000)
//! - `CLICK_TEXTS` - Comma-separated consent button texts
//! - `CHROME_EXECUTABLE` - Chromium binary (default: autodetect)
//! - `JOB_QUEUE_CAPACITY` - Background job buffer size (default: 32)
//! - `BEHIND_PROXY` - Read client IP from proxy headers for rate limiting

use anyhow::{Context, Result};
use std::env;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use crate::domain::providers::{DEFAULT_CLICK_TEXTS, ResolveOptions};

pub const DEFAULT_DATABASE_URL: &str = "sqlite://mirrors.db?mode=rwc";

/// Which search API is live.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchBackend {
    Serper,
    SerpApi,
}

impl FromStr for SearchBackend {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "serper" => Ok(Self::Serper),
            "serpapi" => Ok(Self::SerpApi),
            other => anyhow::bail!("SEARCH_PROVIDER must be 'serper' or 'serpapi', got '{other}'"),
        }
    }
}

impl fmt::Display for SearchBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Serper => f.write_str("serper"),
            Self::SerpApi => f.write_str("serpapi"),
        }
    }
}

/// Service configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub listen_addr: String,
    pub log_level: String,
    pub log_format: String,
    /// When true, rate limiting reads client IP from X-Forwarded-For / X-Real-IP headers.
    /// Enable only when the service is behind a trusted reverse proxy.
    pub behind_proxy: bool,
    pub job_queue_capacity: usize,

    // ── Pool settings ───────────────────────────────────────────────────────
    /// Maximum number of connections in the pool (`DB_MAX_CONNECTIONS`, default: 5).
    pub db_max_connections: u32,
    /// Timeout for acquiring a connection from the pool in seconds
    /// (`DB_CONNECT_TIMEOUT`, default: 30).
    pub db_connect_timeout: u64,

    // ── Search ──────────────────────────────────────────────────────────────
    pub search_backend: SearchBackend,
    pub serper_api_key: Option<String>,
    pub serpapi_api_key: Option<String>,
    pub serper_endpoint: Option<String>,
    pub serpapi_endpoint: Option<String>,
    /// `None` keeps the backend's own default.
    pub search_timeout: Option<Duration>,

    // ── Resolution ──────────────────────────────────────────────────────────
    pub resolve_timeout: Duration,
    pub browser_wait_seconds: u64,
    pub browser_settle: Duration,
    pub click_texts: Vec<String>,
    pub chrome_executable: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database_url: DEFAULT_DATABASE_URL.to_string(),
            listen_addr: "0.0.0.0:8000".to_string(),
            log_level: "info".to_string(),
            log_format: "text".to_string(),
            behind_proxy: false,
            job_queue_capacity: 32,
            db_max_connections: 5,
            db_connect_timeout: 30,
            search_backend: SearchBackend::Serper,
            serper_api_key: None,
            serpapi_api_key: None,
            serper_endpoint: None,
            serpapi_endpoint: None,
            search_timeout: None,
            resolve_timeout: Duration::from_secs(25),
            browser_wait_seconds: 8,
            browser_settle: Duration::from_millis(3000),
            click_texts: DEFAULT_CLICK_TEXTS.iter().map(|t| t.to_string()).collect(),
            chrome_executable: None,
        }
    }
}

impl Config {
    /// Loads configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if `SEARCH_PROVIDER` names an unknown backend.
    pub fn from_env() -> Result<Self> {
        let defaults = Self::default();

        let search_backend = match non_empty_var("SEARCH_PROVIDER") {
            Some(v) => v.parse().context("Failed to load search configuration")?,
            None => defaults.search_backend,
        };

        let click_texts = non_empty_var("CLICK_TEXTS")
            .map(|v| parse_click_texts(&v))
            .filter(|texts| !texts.is_empty())
            .unwrap_or(defaults.click_texts);

        Ok(Self {
            database_url: non_empty_var("DATABASE_URL").unwrap_or(defaults.database_url),
            listen_addr: env::var("LISTEN").unwrap_or(defaults.listen_addr),
            log_level: env::var("RUST_LOG").unwrap_or(defaults.log_level),
            log_format: env::var("LOG_FORMAT").unwrap_or(defaults.log_format),
            behind_proxy: env::var("BEHIND_PROXY")
                .map(|v| v.eq_ignore_ascii_case("true") || v == "1")
                .unwrap_or(false),
            job_queue_capacity: parsed_var("JOB_QUEUE_CAPACITY")
                .unwrap_or(defaults.job_queue_capacity),
            db_max_connections: parsed_var("DB_MAX_CONNECTIONS")
                .unwrap_or(defaults.db_max_connections),
            db_connect_timeout: parsed_var("DB_CONNECT_TIMEOUT")
                .unwrap_or(defaults.db_connect_timeout),
            search_backend,
            serper_api_key: non_empty_var("SERPER_API_KEY"),
            serpapi_api_key: non_empty_var("SERPAPI_API_KEY"),
            serper_endpoint: non_empty_var("SERPER_ENDPOINT"),
            serpapi_endpoint: non_empty_var("SERPAPI_ENDPOINT"),
            search_timeout: parsed_var::<u64>("SEARCH_TIMEOUT_SECONDS").map(Duration::from_secs),
            resolve_timeout: parsed_var::<u64>("RESOLVE_TIMEOUT_SECONDS")
                .map(Duration::from_secs)
                .unwrap_or(defaults.resolve_timeout),
            browser_wait_seconds: parsed_var("BROWSER_WAIT_SECONDS")
                .unwrap_or(defaults.browser_wait_seconds),
            browser_settle: parsed_var::<u64>("BROWSER_SETTLE_MS")
                .map(Duration::from_millis)
                .unwrap_or(defaults.browser_settle),
            click_texts,
            chrome_executable: non_empty_var("CHROME_EXECUTABLE").map(PathBuf::from),
        })
    }

    /// Validates the configuration.
    ///
    /// The search credential is not checked here: it is required only by the
    /// commands that search, and is enforced when the provider is built.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - `job_queue_capacity` is outside `1..=10000`
    /// - `log_format` is not `text` or `json`
    /// - `listen_addr` is invalid
    /// - `database_url` is not a SQLite URL
    /// - a timeout or pool setting is zero
    pub fn validate(&self) -> Result<()> {
        if self.job_queue_capacity == 0 || self.job_queue_capacity > 10_000 {
            anyhow::bail!(
                "JOB_QUEUE_CAPACITY must be between 1 and 10000, got {}",
                self.job_queue_capacity
            );
        }

        if self.log_format != "text" && self.log_format != "json" {
            anyhow::bail!(
                "LOG_FORMAT must be 'text' or 'json', got '{}'",
                self.log_format
            );
        }

        if !self.listen_addr.contains(':') {
            anyhow::bail!(
                "LISTEN must be in format 'host:port', got '{}'",
                self.listen_addr
            );
        }

        if !self.database_url.starts_with("sqlite:") {
            anyhow::bail!(
                "DATABASE_URL must start with 'sqlite:', got '{}'",
                self.database_url
            );
        }

        if self.db_max_connections == 0 {
            anyhow::bail!("DB_MAX_CONNECTIONS must be at least 1");
        }
        if self.db_connect_timeout == 0 {
            anyhow::bail!("DB_CONNECT_TIMEOUT must be greater than 0");
        }

        if self.search_timeout.is_some_and(|t| t.is_zero()) {
            anyhow::bail!("SEARCH_TIMEOUT_SECONDS must be greater than 0");
        }
        if self.resolve_timeout.is_zero() {
            anyhow::bail!("RESOLVE_TIMEOUT_SECONDS must be greater than 0");
        }
        if self.browser_wait_seconds == 0 {
            anyhow::bail!("BROWSER_WAIT_SECONDS must be greater than 0");
        }

        Ok(())
    }

    /// API key of the selected search backend, if configured.
    pub fn search_api_key(&self) -> Option<&str> {
        match self.search_backend {
            SearchBackend::Serper => self.serper_api_key.as_deref(),
            SearchBackend::SerpApi => self.serpapi_api_key.as_deref(),
        }
    }

    /// Default options for interactive resolution.
    pub fn resolve_options(&self) -> ResolveOptions {
        ResolveOptions {
            wait_seconds: self.browser_wait_seconds,
            click_texts: self.click_texts.clone(),
        }
    }

    /// Prints configuration summary (without sensitive data).
    pub fn print_summary(&self) {
        tracing::info!("Configuration loaded:");
        tracing::info!("  Listen address: {}", self.listen_addr);
        tracing::info!("  Database: {}", self.database_url);
        tracing::info!(
            "  Search provider: {} (key: {})",
            self.search_backend,
            self.search_api_key().map(mask_secret).unwrap_or_else(|| "missing".into())
        );
        tracing::info!("  HTTP resolve timeout: {:?}", self.resolve_timeout);
        tracing::info!(
            "  Browser: wait {}s, settle {:?}, {} click texts",
            self.browser_wait_seconds,
            self.browser_settle,
            self.click_texts.len()
        );
        tracing::info!("  Log level: {}", self.log_level);
        tracing::info!("  Log format: {}", self.log_format);
        tracing::info!("  Job queue capacity: {}", self.job_queue_capacity);
    }
}

fn non_empty_var(key: &str) -> Option<String> {
    env::var(key).ok().filter(|v| !v.trim().is_empty())
}

fn parsed_var<T: FromStr>(key: &str) -> Option<T> {
    env::var(key).ok().and_then(|v| v.trim().parse().ok())
}

/// Splits a comma-separated list, dropping blank entries.
fn parse_click_texts(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .collect()
}

/// Keeps the last four characters of a secret.
fn mask_secret(secret: &str) -> String {
    let chars: Vec<char> = secret.chars().collect();
    if chars.len() <= 8 {
        return "***".to_string();
    }
    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("***{tail}")
}

/// Loads and validates configuration from environment variables.
///
/// # Errors
///
/// Returns an error if a variable is malformed or validation fails.
///
/// # Note
///
/// This function expects environment variables to be already loaded
/// (e.g., via `dotenvy::dotenv()` in `main.rs`).
pub fn load_from_env() -> Result<Config> {
    let config = Config::from_env()?;
    config.validate()?;
    Ok(config)
}
