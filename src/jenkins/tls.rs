//! Insecure TLS warning handling
//!
//! A request made without certificate verification logs a warning, unless
//! warnings have been suppressed. Suppression is process-wide: once an
//! insecure session has been opened, no session in the process warns again.

use std::sync::Once;
use std::sync::atomic::{AtomicBool, Ordering};

static SUPPRESS: Once = Once::new();
static SUPPRESSED: AtomicBool = AtomicBool::new(false);

/// One-time initialization run when an insecure session is constructed.
///
/// Affects the whole process, not only the calling session.
pub fn suppress_insecure_warnings() {
    SUPPRESS.call_once(|| {
        SUPPRESSED.store(true, Ordering::SeqCst);
        log::debug!("Insecure TLS warnings suppressed for this process");
    });
}

/// Whether insecure-TLS warnings are silenced for this process
pub fn insecure_warnings_suppressed() -> bool {
    SUPPRESSED.load(Ordering::SeqCst)
}

/// Warning text for an unverified request to `target`, if one is due
pub fn unverified_request_warning(target: &str) -> Option<String> {
    if insecure_warnings_suppressed() || !is_https(target) {
        return None;
    }
    Some(format!(
        "Unverified HTTPS request is being made to {}. Adding certificate verification is strongly advised.",
        target
    ))
}

/// Log the unverified-request warning for `target` unless suppressed
pub fn warn_unverified_request(target: &str) {
    if let Some(warning) = unverified_request_warning(target) {
        log::warn!("{}", warning);
    }
}

fn is_https(target: &str) -> bool {
    target
        .get(..8)
        .is_some_and(|scheme| scheme.eq_ignore_ascii_case("https://"))
}

#[cfg(test)]
mod tests {
    use super::*;

    // Single test: suppression is process-wide and cannot be undone
    #[test]
    fn test_warning_until_suppressed() {
        assert_eq!(unverified_request_warning("http://jenkins.local/crumbIssuer"), None);
        let warning = unverified_request_warning("https://jenkins.local/crumbIssuer").unwrap();
        assert!(warning.contains("https://jenkins.local/crumbIssuer"));
        assert!(!insecure_warnings_suppressed());

        suppress_insecure_warnings();
        assert!(insecure_warnings_suppressed());
        assert_eq!(unverified_request_warning("https://jenkins.local/crumbIssuer"), None);

        suppress_insecure_warnings();
        assert!(insecure_warnings_suppressed());
    }
}
