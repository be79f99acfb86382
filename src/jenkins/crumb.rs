//! CSRF crumb handling
//!
//! Jenkins rejects POST requests that lack the crumb header issued by its
//! crumb issuer. The issuer is asked to render `<field>:<crumb>` as plain text.

use crate::error::ConnectionError;

/// Path of the crumb issuer query, relative to the server base URL
pub const CRUMB_PATH: &str = r#"crumbIssuer/api/xml?xpath=concat(//crumbRequestField,":",//crumb)"#;

const CRUMB_PREFIX: &str = "jenkins-crumb:";

/// Header name/value pair attached to every mutating request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Crumb {
    pub name: String,
    pub value: String,
}

impl Crumb {
    /// Parse the crumb issuer response body.
    ///
    /// `url` only serves the error message.
    pub fn parse(text: &str, url: &str) -> Result<Self, ConnectionError> {
        let starts_with_prefix = text
            .get(..CRUMB_PREFIX.len())
            .is_some_and(|head| head.eq_ignore_ascii_case(CRUMB_PREFIX));
        if !starts_with_prefix {
            return Err(ConnectionError::CrumbUnavailable {
                url: url.to_string(),
            });
        }

        let (name, value) = text
            .split_once(':')
            .ok_or_else(|| ConnectionError::CrumbUnavailable {
                url: url.to_string(),
            })?;

        Ok(Crumb {
            name: name.trim().to_string(),
            value: value.trim().to_string(),
        })
    }
}
