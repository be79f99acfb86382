//! Error types for the linter
//!
//! Configuration and connection errors are fatal for a whole run, validation
//! errors only for the file being linted.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for linter operations
pub type Result<T> = std::result::Result<T, Error>;

/// Any error the linter can report
#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Connection(#[from] ConnectionError),

    #[error(transparent)]
    Validation(#[from] ValidationError),
}

/// Profile file could not be loaded or lacks required settings
#[derive(Debug, Error)]
pub enum ConfigError {
    /// None of the candidate files exists
    #[error("Unable to load configuration file{} {}", plural(.paths), join_paths(.paths))]
    NotFound { paths: Vec<PathBuf> },

    #[error("Unable to read configuration file {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Unable to parse configuration file {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: ini::ParseError,
    },

    #[error("File contains no section headers: {}", .path.display())]
    MissingSectionHeader { path: PathBuf },

    #[error("Missing profile `{profile}` in configuration file {}", .path.display())]
    MissingProfile { profile: String, path: PathBuf },

    #[error("Missing `url` key for profile `{profile}` in configuration file {}", .path.display())]
    MissingUrl { profile: String, path: PathBuf },
}

/// Failure talking to the Jenkins server
#[derive(Debug, Error)]
pub enum ConnectionError {
    /// Transport failure, timeout, TLS failure or non-2xx status
    #[error("{source}")]
    Request {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("Unable to retrieve crumb from {url}. Crumb issuer is probably blocked.")]
    CrumbUnavailable { url: String },

    #[error("Session with {url} is closed")]
    Closed { url: String },

    #[error("Unable to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),
}

/// Failure linting a single Jenkinsfile
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("{}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// File content is not valid UTF-8
    #[error("{}: {source}", .path.display())]
    Decode {
        path: PathBuf,
        #[source]
        source: std::string::FromUtf8Error,
    },

    #[error("{}: {source}", .path.display())]
    Submit {
        path: PathBuf,
        #[source]
        source: ConnectionError,
    },

    /// Server answered with a body that does not follow the validator contract
    #[error("{}: invalid response from Jenkins: {reason}", .path.display())]
    Protocol { path: PathBuf, reason: String },
}

fn plural(paths: &[PathBuf]) -> &'static str {
    if paths.len() == 1 { "" } else { "s" }
}

fn join_paths(paths: &[PathBuf]) -> String {
    paths
        .iter()
        .map(|p| p.display().to_string())
        .collect::<Vec<_>>()
        .join(" or ")
}
