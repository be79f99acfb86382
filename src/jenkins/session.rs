//! Jenkins HTTP session
//!
//! One session is bound to one server. It carries the credentials, the TLS
//! policy, the request timeout and the crumb fetched when it was opened.

use reqwest::Method;
use reqwest::blocking::{Client, Response};
use std::time::Duration;

use super::crumb::{CRUMB_PATH, Crumb};
use super::tls;
use crate::error::ConnectionError;

/// HTTP Basic credentials
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credentials {
    pub username: String,
    pub password: Option<String>,
}

impl Credentials {
    /// Build credentials from optional settings, `None` without a username
    pub fn from_parts(username: Option<String>, password: Option<String>) -> Option<Self> {
        username
            .filter(|u| !u.is_empty())
            .map(|username| Credentials { username, password })
    }
}

/// An open, crumb-carrying session with a Jenkins server
#[derive(Debug)]
pub struct Session {
    endpoint: Endpoint,
    client: Option<Client>,
    crumb: Crumb,
}

/// Where and how requests are sent
#[derive(Debug)]
struct Endpoint {
    url: String,
    credentials: Option<Credentials>,
    insecure: bool,
}

impl Session {
    /// Default request timeout
    pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

    /// Open a session and acquire the crumb.
    ///
    /// When `insecure` is set, certificate verification is disabled for this
    /// session and unverified-request warnings are silenced for the whole
    /// process (see [`tls::suppress_insecure_warnings`]).
    pub fn connect(
        url: &str,
        credentials: Option<Credentials>,
        insecure: bool,
        timeout: Duration,
    ) -> Result<Self, ConnectionError> {
        let endpoint = Endpoint {
            url: url.trim_end_matches('/').to_string(),
            credentials,
            insecure,
        };

        if insecure {
            tls::suppress_insecure_warnings();
        }

        let client = Client::builder()
            .danger_accept_invalid_certs(insecure)
            .timeout(timeout)
            .build()
            .map_err(ConnectionError::Client)?;

        let crumb = endpoint.fetch_crumb(&client)?;
        log::debug!("Using crumb header {} for {}", crumb.name, endpoint.url);

        Ok(Session {
            endpoint,
            client: Some(client),
            crumb,
        })
    }

    /// Base URL without trailing slash
    pub fn url(&self) -> &str {
        &self.endpoint.url
    }

    pub fn crumb(&self) -> &Crumb {
        &self.crumb
    }

    pub fn is_closed(&self) -> bool {
        self.client.is_none()
    }

    /// Issue a request against `<base>/<path>`.
    ///
    /// Non-2xx responses are returned as errors.
    pub fn request(
        &self,
        method: Method,
        path: &str,
        form: Option<&[(&str, &str)]>,
        headers: &[(&str, &str)],
    ) -> Result<Response, ConnectionError> {
        let client = self.client.as_ref().ok_or_else(|| ConnectionError::Closed {
            url: self.endpoint.url.clone(),
        })?;
        self.endpoint.send(client, method, path, form, headers)
    }

    /// POST a form with the crumb header attached
    pub fn post_form(&self, path: &str, form: &[(&str, &str)]) -> Result<Response, ConnectionError> {
        let crumb = [(self.crumb.name.as_str(), self.crumb.value.as_str())];
        self.request(Method::POST, path, Some(form), &crumb)
    }

    /// Release the underlying HTTP client. Calling it again is a no-op.
    pub fn close(&mut self) {
        if self.client.take().is_some() {
            log::debug!("Closed session with {}", self.endpoint.url);
        }
    }
}

impl Drop for Session {
    fn drop(&mut self) {
        self.close();
    }
}

impl Endpoint {
    fn fetch_crumb(&self, client: &Client) -> Result<Crumb, ConnectionError> {
        let response = self.send(client, Method::GET, CRUMB_PATH, None, &[])?;
        let text = response.text().map_err(|source| ConnectionError::Request {
            url: self.url.clone(),
            source,
        })?;
        Crumb::parse(&text, &self.url)
    }

    fn send(
        &self,
        client: &Client,
        method: Method,
        path: &str,
        form: Option<&[(&str, &str)]>,
        headers: &[(&str, &str)],
    ) -> Result<Response, ConnectionError> {
        let target = format!("{}/{}", self.url, path);
        log::debug!("{} {}", method, target);
        if self.insecure {
            tls::warn_unverified_request(&target);
        }

        let mut request = client.request(method, &target);
        if let Some(credentials) = &self.credentials {
            request = request.basic_auth(
                &credentials.username,
                Some(credentials.password.as_deref().unwrap_or("")),
            );
        }
        for (name, value) in headers {
            request = request.header(*name, *value);
        }
        if let Some(form) = form {
            request = request.form(form);
        }

        request
            .send()
            .and_then(Response::error_for_status)
            .map_err(|source| ConnectionError::Request {
                url: target,
                source,
            })
    }
}
