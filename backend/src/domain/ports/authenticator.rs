//! Port resolving bearer credentials into a principal.
//!
//! Token issuance and credential hashing are handled elsewhere; adapters only
//! look tokens up.

use async_trait::async_trait;

use crate::domain::Principal;

use super::define_port_error;

define_port_error! {
    /// Errors raised while resolving credentials.
    pub enum AuthenticationError {
        /// The identity backend cannot be reached.
        Unavailable { message: String } => "authentication backend unavailable: {message}",
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Authenticator: Send + Sync {
    /// Resolve `token`; `Ok(None)` means the token is unknown or revoked.
    async fn authenticate(&self, token: &str) -> Result<Option<Principal>, AuthenticationError>;
}
