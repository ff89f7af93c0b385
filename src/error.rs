//! Error types for the entitylink resolution core.

use thiserror::Error;

/// Main error type for entitylink operations.
#[derive(Error, Debug)]
pub enum EntitylinkError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Hierarchy error: {0}")]
    Hierarchy(#[from] HierarchyError),

    #[error("Cache error: {0}")]
    Cache(#[from] CacheError),

    #[error("Resolution error: {0}")]
    Resolution(#[from] ResolutionError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Configuration-related errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    ReadFile(#[source] std::io::Error),

    #[error("Failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),

    #[error("Missing required field: {0}")]
    MissingField(String),
}

/// Class-hierarchy loading errors. Each carries enough context to log the
/// failing (file, encoding, base URI) triple before loading moves on.
#[derive(Error, Debug)]
pub enum HierarchyError {
    #[error("Failed to read hierarchy file {path}: {source}")]
    ReadFile {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Unsupported encoding \"{encoding}\" for hierarchy file {path}")]
    UnsupportedEncoding { path: String, encoding: String },

    #[error("Failed to decode hierarchy file {path} as {encoding}")]
    Decode { path: String, encoding: String },

    #[error("Invalid statement in {path} line {line}: {reason}")]
    ParseStatement {
        path: String,
        line: usize,
        reason: String,
    },

    #[error("Incomplete hierarchy file triple: {0:?}")]
    IncompleteTriple(Vec<String>),
}

/// Same-as cache backend errors.
#[derive(Error, Debug)]
pub enum CacheError {
    #[error("Failed to open cache file {path}: {source}")]
    OpenFile {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write cache entry: {0}")]
    Write(#[source] std::io::Error),

    #[error("Failed to encode cache entry: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Resolution-strategy errors. These never escape a retriever's public
/// contract; a failing strategy degrades to the singleton set of its input.
#[derive(Error, Debug)]
pub enum ResolutionError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Malformed response from {uri}: {reason}")]
    MalformedResponse { uri: String, reason: String },
}

/// Result type alias using [`EntitylinkError`].
pub type Result<T> = std::result::Result<T, EntitylinkError>;
