//! Validation Engine
//!
//! Submits Jenkinsfiles to the server-side validator and reports the
//! diagnostics it returns.

use std::fs;
use std::io::Write;
use std::path::Path;

use super::message::{Diagnostic, sort_diagnostics};
use super::payload::{SUCCESS, ValidationResponse};
use crate::error::{ConnectionError, ValidationError};
use crate::jenkins::Session;

/// Validator endpoint, relative to the server base URL
pub const VALIDATOR_PATH: &str = "pipeline-model-converter/validateJenkinsfile";

/// Something that can lint a Jenkinsfile
pub trait Linter {
    /// Lint `path`, writing diagnostics to `out`. Returns whether the file is valid.
    fn lint(&mut self, path: &Path, out: &mut dyn Write) -> Result<bool, ValidationError>;
}

impl Linter for Session {
    fn lint(&mut self, path: &Path, out: &mut dyn Write) -> Result<bool, ValidationError> {
        lint(self, path, out)
    }
}

/// Validate one Jenkinsfile through `session`
pub fn lint(session: &Session, path: &Path, out: &mut dyn Write) -> Result<bool, ValidationError> {
    let content = read_jenkinsfile(path)?;

    let submit_error = |source: ConnectionError| ValidationError::Submit {
        path: path.to_path_buf(),
        source,
    };
    let response = session
        .post_form(VALIDATOR_PATH, &[("jenkinsfile", content.as_str())])
        .map_err(submit_error)?;
    let body = response.text().map_err(|source| {
        submit_error(ConnectionError::Request {
            url: format!("{}/{}", session.url(), VALIDATOR_PATH),
            source,
        })
    })?;

    let valid = report(path, &body, out)?;
    log::debug!("{}: {}", path.display(), if valid { "valid" } else { "invalid" });
    Ok(valid)
}

/// Print the diagnostics of a validator response body and return the verdict
pub fn report(path: &Path, body: &str, out: &mut dyn Write) -> Result<bool, ValidationError> {
    let protocol_error = |reason: String| ValidationError::Protocol {
        path: path.to_path_buf(),
        reason,
    };

    let response = ValidationResponse::from_json(body).map_err(|e| protocol_error(e.to_string()))?;
    let result = response.data().result().map(str::to_string);

    let mut diagnostics: Vec<Diagnostic> = response
        .into_messages()
        .into_iter()
        .map(|(severity, message)| Diagnostic::new(severity, &message))
        .collect();
    sort_diagnostics(&mut diagnostics);

    for diagnostic in &diagnostics {
        writeln!(out, "{}", diagnostic.display(path)).map_err(|source| ValidationError::Io {
            path: path.to_path_buf(),
            source,
        })?;
    }

    // Diagnostics are printed even when the verdict is missing
    let result = result.ok_or_else(|| protocol_error("missing `data.result`".to_string()))?;
    Ok(result == SUCCESS)
}

/// Lint every file in order. A failing file never stops the others.
///
/// Returns `true` only if every file is valid.
pub fn lint_files<L, P>(linter: &mut L, paths: &[P], out: &mut dyn Write) -> bool
where
    L: Linter + ?Sized,
    P: AsRef<Path>,
{
    let mut status = true;
    for path in paths {
        match linter.lint(path.as_ref(), out) {
            Ok(valid) => status &= valid,
            Err(e) => {
                log::error!("{}", e);
                status = false;
            }
        }
    }
    status
}

fn read_jenkinsfile(path: &Path) -> Result<String, ValidationError> {
    let bytes = fs::read(path).map_err(|source| ValidationError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    String::from_utf8(bytes).map_err(|source| ValidationError::Decode {
        path: path.to_path_buf(),
        source,
    })
}
