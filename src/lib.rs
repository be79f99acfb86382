//! Jenkinsfile Linter
//!
//! Validates declarative pipelines against a Jenkins server's
//! `pipeline-model-converter` endpoint and reports compiler-style
//! diagnostics.
//!
//! This library provides:
//! - Jenkins sessions with crumb (CSRF) handling
//! - Validator response parsing and diagnostic ordering
//! - Profile and environment configuration

pub mod cli;
pub mod config;
pub mod error;
pub mod jenkins;
pub mod validation;

// Re-exports for clean public API
pub use config::{Args, ServerSettings};
pub use error::{ConfigError, ConnectionError, Error, ValidationError};
pub use jenkins::{Credentials, Crumb, Session};
pub use validation::{Diagnostic, Linter, lint};
