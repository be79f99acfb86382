//! Validator message parsing
//!
//! Jenkins reports positions inside the message text, e.g.
//! `Expected a stage @ line 4, column 5.`. Messages without a position are
//! reported at the start of the file.

use regex::Regex;
use std::fmt;
use std::path::Path;
use std::sync::LazyLock;

static LOCATION_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)^(?P<message>.*?)(?::?\s*@ line\s*(?P<line>\d+), column (?P<column>\d+)\.)?\n?$")
        .expect("location pattern is valid")
});

static CONTENT_ECHO_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)^Jenkinsfile content '.+' did not").expect("content echo pattern is valid")
});

/// A positioned validator message
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub line: u32,
    pub column: u32,
    pub severity: String,
    pub message: String,
}

impl Diagnostic {
    pub fn new(severity: impl Into<String>, raw_message: &str) -> Self {
        let (line, column, message) = parse_message(raw_message);
        Diagnostic {
            line,
            column,
            severity: severity.into(),
            message,
        }
    }

    /// Compiler-style rendering: `<path>:<line>:<column>: <severity>: <message>`
    pub fn display<'a>(&'a self, path: &'a Path) -> DiagnosticDisplay<'a> {
        DiagnosticDisplay {
            diagnostic: self,
            path,
        }
    }
}

pub struct DiagnosticDisplay<'a> {
    diagnostic: &'a Diagnostic,
    path: &'a Path,
}

impl fmt::Display for DiagnosticDisplay<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let d = self.diagnostic;
        write!(
            f,
            "{}:{}:{}: {}: {}",
            self.path.display(),
            d.line,
            d.column,
            d.severity,
            d.message
        )
    }
}

/// Split a raw message into `(line, column, text)`.
///
/// Never fails: without a position suffix the message maps to line 1,
/// column 1. Positions are at least 1.
pub fn parse_message(raw: &str) -> (u32, u32, String) {
    let mut line = 1;
    let mut column = 1;
    let mut message = raw;

    if let Some(caps) = LOCATION_RE.captures(raw) {
        if let Some(m) = caps.name("message") {
            message = m.as_str();
        }
        line = position(caps.name("line"));
        column = position(caps.name("column"));
    }

    let message = CONTENT_ECHO_RE.replace(message, "Jenkinsfile did not");
    (line, column, message.into_owned())
}

fn position(m: Option<regex::Match<'_>>) -> u32 {
    m.and_then(|m| m.as_str().parse::<u32>().ok())
        .filter(|n| *n >= 1)
        .unwrap_or(1)
}

/// Order diagnostics by line, keeping server order for equal lines
pub fn sort_diagnostics(diagnostics: &mut [Diagnostic]) {
    diagnostics.sort_by_key(|d| d.line);
}
