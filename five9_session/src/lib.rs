//! SOAP sessions against the Five9 admin and supervisor web services.
//!
//! A [`Five9Session`] wraps one authenticated endpoint, keeps a short
//! history of exchanged envelopes for troubleshooting, and implements
//! [`five9_core::ConfigService`] for the admin operations.

pub mod config;
pub mod credentials;
pub mod errors;
pub mod history;
mod service;
pub mod session;
pub mod soap;
pub mod transport;

pub use config::{HostAlias, SessionConfig, SessionType};
pub use credentials::{CredentialStore, Credentials};
pub use errors::SessionError;
pub use history::{Exchange, History};
pub use session::Five9Session;
pub use transport::{HttpTransport, Transport, TransportResponse};
