//! Configuration settings for the entitylink core.

use crate::error::{ConfigError, Result};
use serde::{Deserialize, Deserializer, Serialize};
use std::path::{Path, PathBuf};

/// Default width of the external worker pool.
pub const DEFAULT_WORKERS: usize = 20;

/// Default capacity of the bounded in-memory same-as cache.
pub const DEFAULT_MEMORY_CACHE_CAPACITY: u64 = 10_000;

/// Main configuration structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub runtime: RuntimeConfig,
    pub hierarchy: HierarchyConfig,
    pub sameas: SameAsConfig,
    pub cache: CacheConfig,
    pub checker: CheckerConfig,
    pub kb: KbConfig,
    pub output: OutputConfig,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(ConfigError::ReadFile)?;
        Self::from_toml_str(&content)
    }

    /// Parse configuration from a TOML string.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: Config = toml::from_str(content).map_err(ConfigError::Parse)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from default locations or use defaults.
    pub fn load() -> Result<Self> {
        let config_paths = [
            PathBuf::from("entitylink.toml"),
            PathBuf::from("config.toml"),
            dirs::config_dir()
                .map(|p| p.join("entitylink/config.toml"))
                .unwrap_or_default(),
        ];

        for path in &config_paths {
            if path.exists() {
                tracing::info!("Loading config from: {}", path.display());
                return Self::from_file(path);
            }
        }

        tracing::info!("No config file found, using defaults");
        Ok(Config::default())
    }

    /// Validate the configuration.
    fn validate(&self) -> Result<()> {
        if self.output.enabled && self.output.directory.trim().is_empty() {
            return Err(ConfigError::MissingField("output.directory".to_string()).into());
        }

        if self.hierarchy.files.len() % 3 != 0 {
            tracing::warn!(
                "hierarchy.files length {} is not a multiple of 3; the trailing \
                 incomplete (path, encoding, base URI) triple will be ignored",
                self.hierarchy.files.len()
            );
        }

        Ok(())
    }
}

/// Runtime configuration for the surrounding worker pool.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RuntimeConfig {
    /// Width of the external worker pool invoking the core.
    #[serde(deserialize_with = "lenient_usize")]
    pub workers: usize,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            workers: DEFAULT_WORKERS,
        }
    }
}

/// Class-hierarchy file configuration.
///
/// `files` is a flat token list consumed three entries at a time:
/// (file path, character encoding, base URI).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct HierarchyConfig {
    pub files: Vec<String>,
}

/// Same-as retrieval configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SameAsConfig {
    /// Domains served by the generic HTTP linked-data retriever.
    pub http_domains: Vec<String>,
    /// Maximum re-resolution rounds of the crawling decorator.
    pub crawl_max_rounds: usize,
    /// Maximum URIs the crawling decorator visits per call.
    pub crawl_max_visited: usize,
    /// Per-request timeout for HTTP-based retrieval.
    pub http_timeout_secs: u64,
}

impl Default for SameAsConfig {
    fn default() -> Self {
        Self {
            http_domains: Vec::new(),
            crawl_max_rounds: 3,
            crawl_max_visited: 100,
            http_timeout_secs: 10,
        }
    }
}

/// Same-as cache configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// Path of the durable cache file. When set and usable, the file-backed
    /// cache is preferred over the in-memory one.
    pub file: Option<String>,
    /// Entry bound of the in-memory fallback cache.
    #[serde(deserialize_with = "lenient_capacity")]
    pub memory_capacity: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            file: None,
            memory_capacity: DEFAULT_MEMORY_CACHE_CAPACITY,
        }
    }
}

/// Entity-existence checker configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CheckerConfig {
    /// Namespace prefixes handled by the HTTP entity checker.
    pub namespaces: Vec<String>,
    /// Per-request timeout for existence probes.
    pub http_timeout_secs: u64,
}

impl Default for CheckerConfig {
    fn default() -> Self {
        Self {
            namespaces: Vec::new(),
            http_timeout_secs: 10,
        }
    }
}

/// Well-known knowledge-base whitelist.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct KbConfig {
    /// Canonicalized namespace prefixes, e.g. `dbpedia.org/resource/`.
    pub namespaces: Vec<String>,
}

/// Result-dumping collaborator configuration. The writer itself lives
/// outside this crate; only the switch and target directory are parsed here.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub enabled: bool,
    pub directory: String,
}

/// Integer-or-string TOML value. Property files reaching this layer have a
/// history of quoting numeric values, so a string that fails to parse is
/// replaced by the field default with a warning instead of aborting startup.
#[derive(Deserialize)]
#[serde(untagged)]
enum LenientInt {
    Int(i64),
    Text(String),
}

fn lenient_u64_or(default: u64, field: &str, value: LenientInt) -> u64 {
    match value {
        LenientInt::Int(n) if n >= 0 => n as u64,
        LenientInt::Int(n) => {
            tracing::warn!("Ignoring negative value {n} for {field}, using default {default}");
            default
        }
        LenientInt::Text(s) => match s.trim().parse::<u64>() {
            Ok(n) => n,
            Err(_) => {
                tracing::warn!("Cannot parse {field} value {s:?}, using default {default}");
                default
            }
        },
    }
}

fn lenient_capacity<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> std::result::Result<u64, D::Error> {
    let value = LenientInt::deserialize(deserializer)?;
    Ok(lenient_u64_or(
        DEFAULT_MEMORY_CACHE_CAPACITY,
        "cache.memory_capacity",
        value,
    ))
}

fn lenient_usize<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> std::result::Result<usize, D::Error> {
    let value = LenientInt::deserialize(deserializer)?;
    Ok(lenient_u64_or(DEFAULT_WORKERS as u64, "runtime.workers", value) as usize)
}
