//! Failure taxonomy for the bootstrap boundary.

use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
/// Errors raised while fetching location data or refreshing the user session.
///
/// None of these cross the bootstrap boundary: they are logged and turned into a `bool` or
/// degraded data there.
pub enum BootstrapError {
    /// The backend answered with its `204` sentinel.
    #[error("no content")]
    NotFound,
    /// The request never produced a response.
    #[error("transport failed: {0}")]
    Transport(String),
    /// The backend answered with a non-2xx status.
    #[error("unexpected status {0}")]
    Status(u16),
    /// The response or token could not be decoded.
    #[error("decode failed: {0}")]
    Decode(String),
    /// The session store could not be read.
    #[error("session store unavailable: {0}")]
    SessionStore(String),
}
