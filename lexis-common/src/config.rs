//! Configuration management for Lexis services.
//!
//! Services share one configuration file at `~/.lexis/config.json`.
//!
//! # Configuration Priority
//!
//! 1. Environment variables (`LEXIS_*` prefix)
//! 2. Explicit config file values
//! 3. Default values
//!
//! # Environment Variable Mapping
//!
//! - `LEXIS_HOST` → server.host
//! - `LEXIS_PORT` → server.port
//! - `LEXIS_JWT_SECRET` → auth.jwt_secret
//! - `LEXIS_STORAGE_BACKEND` → storage.backend
//! - `LEXIS_STORAGE_PATH` → storage.path
//! - `LEXIS_LEXICON_PATH` → lexicon.path
//! - `LEXIS_LOG_LEVEL` → observability.log_level
//! - `LEXIS_LOG_FORMAT` → observability.log_format

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::net::{IpAddr, SocketAddr};
use std::path::{Path, PathBuf};

/// Get the configuration directory path.
pub fn config_dir() -> PathBuf {
    directories::UserDirs::new().map_or_else(
        || PathBuf::from(".lexis"),
        |dirs| dirs.home_dir().join(".lexis"),
    )
}

/// Get the configuration file path.
pub fn config_path() -> PathBuf {
    config_dir().join("config.json")
}

/// Expand `~` and environment variables in a configured path.
fn expand_path(raw: &str) -> PathBuf {
    match shellexpand::full(raw) {
        Ok(expanded) => PathBuf::from(expanded.as_ref()),
        Err(_) => PathBuf::from(raw),
    }
}

// ============================================================================
// Server Configuration
// ============================================================================

/// HTTP server configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Bind address. Default is `127.0.0.1` (local only).
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    /// Upper bound on request body size
    #[serde(default = "default_max_body_bytes")]
    pub max_body_bytes: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            max_body_bytes: default_max_body_bytes(),
        }
    }
}

fn default_host() -> String {
    "127.0.0.1".into()
}

fn default_port() -> u16 {
    4480
}

fn default_max_body_bytes() -> usize {
    64 * 1024
}

// ============================================================================
// Auth Configuration
// ============================================================================

/// Authentication for the moderation endpoints.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    /// JWT secret. When unset, moderator endpoints reject every token.
    #[serde(default)]
    pub jwt_secret: Option<String>,

    /// Token expiry in seconds
    #[serde(default = "default_token_expiry")]
    pub token_expiry_secs: u64,

    /// Roles allowed to submit label corrections
    #[serde(default = "default_moderator_roles")]
    pub moderator_roles: Vec<String>,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            jwt_secret: None,
            token_expiry_secs: default_token_expiry(),
            moderator_roles: default_moderator_roles(),
        }
    }
}

fn default_token_expiry() -> u64 {
    86400
}

fn default_moderator_roles() -> Vec<String> {
    vec!["moderator".into(), "admin".into()]
}

// ============================================================================
// Storage Configuration
// ============================================================================

/// Persistence backend selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    #[default]
    Sqlite,
    Memory,
}

impl std::str::FromStr for StorageBackend {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "sqlite" => Ok(Self::Sqlite),
            "memory" => Ok(Self::Memory),
            other => Err(format!("unknown storage backend: {other}")),
        }
    }
}

/// Storage for analysis results and the adaptive lexicon.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct StorageConfig {
    #[serde(default)]
    pub backend: StorageBackend,

    /// Database path (for `SQLite`). Defaults to `~/.lexis/lexis.db`.
    #[serde(default)]
    pub path: Option<String>,
}

impl StorageConfig {
    /// Resolve the database path, expanding `~`.
    pub fn resolved_path(&self) -> PathBuf {
        self.path
            .as_deref()
            .map(expand_path)
            .unwrap_or_else(|| config_dir().join("lexis.db"))
    }
}

// ============================================================================
// Lexicon Configuration
// ============================================================================

/// Built-in lexicon source and learning limits.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LexiconConfig {
    /// JSON lexicon definition replacing the bundled vocabulary
    #[serde(default)]
    pub path: Option<String>,

    /// Shortest token (in characters) the feedback learner will adopt
    #[serde(default = "default_min_learned_token_chars")]
    pub min_learned_token_chars: usize,
}

impl Default for LexiconConfig {
    fn default() -> Self {
        Self {
            path: None,
            min_learned_token_chars: default_min_learned_token_chars(),
        }
    }
}

impl LexiconConfig {
    /// Resolve the definition path, expanding `~`.
    pub fn resolved_path(&self) -> Option<PathBuf> {
        self.path.as_deref().map(expand_path)
    }
}

/// Tokens must be longer than two characters to be learned.
pub const MIN_LEARNED_TOKEN_CHARS: usize = 3;

fn default_min_learned_token_chars() -> usize {
    MIN_LEARNED_TOKEN_CHARS
}

// ============================================================================
// Scoring Configuration
// ============================================================================

/// Texts of 1..=4 words are short.
pub const SHORT_TEXT_MAX_WORDS: usize = 4;
/// Amplification applied to the raw score of short texts.
pub const SHORT_TEXT_MULTIPLIER: f64 = 1.8;
/// Texts of 5..=9 words are medium.
pub const MEDIUM_TEXT_MAX_WORDS: usize = 9;
/// Amplification applied to the raw score of medium texts.
pub const MEDIUM_TEXT_MULTIPLIER: f64 = 1.3;
/// Texts with more words than this are scored by polarity ratio.
pub const LONG_TEXT_MIN_WORDS: usize = 50;
/// Damping applied to questions.
pub const INTERROGATIVE_PENALTY: f64 = 0.7;
/// Scores strictly above this are positive.
pub const POSITIVE_THRESHOLD: f64 = 0.5;
/// Scores strictly below this are negative.
pub const NEGATIVE_THRESHOLD: f64 = -0.5;
/// Words that mark a text as a question even without a question mark.
pub const INTERROGATIVE_KEYWORDS: &[&str] = &["why", "how", "what", "when", "where", "who", "which"];

/// Scoring policy: length buckets, interrogative damping, label thresholds.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ScoringConfig {
    #[serde(default = "default_short_text_max_words")]
    pub short_text_max_words: usize,

    #[serde(default = "default_short_text_multiplier")]
    pub short_text_multiplier: f64,

    #[serde(default = "default_medium_text_max_words")]
    pub medium_text_max_words: usize,

    #[serde(default = "default_medium_text_multiplier")]
    pub medium_text_multiplier: f64,

    #[serde(default = "default_long_text_min_words")]
    pub long_text_min_words: usize,

    #[serde(default = "default_interrogative_penalty")]
    pub interrogative_penalty: f64,

    #[serde(default = "default_positive_threshold")]
    pub positive_threshold: f64,

    #[serde(default = "default_negative_threshold")]
    pub negative_threshold: f64,

    #[serde(default = "default_interrogative_keywords")]
    pub interrogative_keywords: Vec<String>,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            short_text_max_words: SHORT_TEXT_MAX_WORDS,
            short_text_multiplier: SHORT_TEXT_MULTIPLIER,
            medium_text_max_words: MEDIUM_TEXT_MAX_WORDS,
            medium_text_multiplier: MEDIUM_TEXT_MULTIPLIER,
            long_text_min_words: LONG_TEXT_MIN_WORDS,
            interrogative_penalty: INTERROGATIVE_PENALTY,
            positive_threshold: POSITIVE_THRESHOLD,
            negative_threshold: NEGATIVE_THRESHOLD,
            interrogative_keywords: default_interrogative_keywords(),
        }
    }
}

fn default_short_text_max_words() -> usize {
    SHORT_TEXT_MAX_WORDS
}

fn default_short_text_multiplier() -> f64 {
    SHORT_TEXT_MULTIPLIER
}

fn default_medium_text_max_words() -> usize {
    MEDIUM_TEXT_MAX_WORDS
}

fn default_medium_text_multiplier() -> f64 {
    MEDIUM_TEXT_MULTIPLIER
}

fn default_long_text_min_words() -> usize {
    LONG_TEXT_MIN_WORDS
}

fn default_interrogative_penalty() -> f64 {
    INTERROGATIVE_PENALTY
}

fn default_positive_threshold() -> f64 {
    POSITIVE_THRESHOLD
}

fn default_negative_threshold() -> f64 {
    NEGATIVE_THRESHOLD
}

fn default_interrogative_keywords() -> Vec<String> {
    INTERROGATIVE_KEYWORDS.iter().map(|k| (*k).to_string()).collect()
}

// ============================================================================
// Observability Configuration
// ============================================================================

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level", alias = "level")]
    pub log_level: String,

    /// Log format (json, pretty)
    #[serde(default = "default_log_format", alias = "format")]
    pub log_format: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            log_format: default_log_format(),
        }
    }
}

fn default_log_level() -> String {
    "info".into()
}

fn default_log_format() -> String {
    "pretty".into()
}

// ============================================================================
// Root Configuration
// ============================================================================

/// Root configuration structure for Lexis services.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub auth: AuthConfig,

    #[serde(default)]
    pub storage: StorageConfig,

    #[serde(default)]
    pub lexicon: LexiconConfig,

    #[serde(default)]
    pub scoring: ScoringConfig,

    #[serde(default)]
    pub observability: ObservabilityConfig,
}

impl Config {
    /// Load configuration from the default path.
    pub fn load() -> Result<Self> {
        let path = config_path();
        if !path.exists() {
            tracing::info!("Config file not found, using defaults");
            return Ok(Self::default());
        }

        Self::load_from(&path)
    }

    /// Load configuration from a specific path.
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config from {}", path.display()))?;

        serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse config from {}", path.display()))
    }

    /// Load configuration with environment variable overrides.
    pub fn load_with_env() -> Result<Self> {
        let mut config = Self::load()?;
        config.apply_env_overrides();
        Ok(config)
    }

    /// Apply `LEXIS_*` environment variable overrides.
    pub fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    /// Apply overrides from an arbitrary variable source.
    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(host) = lookup("LEXIS_HOST") {
            self.server.host = host;
        }
        if let Some(port) = lookup("LEXIS_PORT") {
            match port.parse() {
                Ok(p) => self.server.port = p,
                Err(_) => tracing::warn!(value = %port, "Ignoring invalid LEXIS_PORT"),
            }
        }
        if let Some(secret) = lookup("LEXIS_JWT_SECRET") {
            self.auth.jwt_secret = Some(secret);
        }
        if let Some(backend) = lookup("LEXIS_STORAGE_BACKEND") {
            match backend.parse() {
                Ok(b) => self.storage.backend = b,
                Err(e) => tracing::warn!(error = %e, "Ignoring invalid LEXIS_STORAGE_BACKEND"),
            }
        }
        if let Some(path) = lookup("LEXIS_STORAGE_PATH") {
            self.storage.path = Some(path);
        }
        if let Some(path) = lookup("LEXIS_LEXICON_PATH") {
            self.lexicon.path = Some(path);
        }
        if let Some(level) = lookup("LEXIS_LOG_LEVEL") {
            self.observability.log_level = level;
        }
        if let Some(format) = lookup("LEXIS_LOG_FORMAT") {
            self.observability.log_format = format;
        }
    }

    /// Socket address the HTTP server binds to.
    pub fn server_address(&self) -> Result<SocketAddr> {
        let ip: IpAddr = self
            .server
            .host
            .parse()
            .with_context(|| format!("Invalid server.host: {}", self.server.host))?;
        Ok(SocketAddr::new(ip, self.server.port))
    }
}
