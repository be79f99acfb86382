//! Jenkins Client
//!
//! Session handling, credentials and CSRF crumb negotiation.

pub mod crumb;
pub mod session;
pub mod tls;

pub use crumb::Crumb;
pub use session::{Credentials, Session};
