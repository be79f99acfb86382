//! Validation
//!
//! Server-side Jenkinsfile validation and diagnostic reporting.

pub mod engine;
pub mod message;
pub mod payload;

pub use engine::{Linter, lint, lint_files, report};
pub use message::{Diagnostic, parse_message};
pub use payload::ValidationResponse;
