//! Token verifier seam used by the auth gate.
//!
//! The gate only needs two questions answered about a bearer token:
//! - which identity does it claim?
//! - is it a valid token for that identity?
//!
//! Signature/claim details stay behind this trait (see `access_jwt`).

use thiserror::Error;

#[derive(Debug, Error)]
pub enum TokenError {
    #[error("jwt verification failed: {0}")]
    Jwt(#[from] jsonwebtoken::errors::Error),
    #[error("missing or invalid 'aud' claim")]
    MissingOrInvalidAud,
    #[error("empty '{0}' claim")]
    EmptyClaim(&'static str),
    #[error("invalid key material: {0}")]
    Key(String),
}

pub trait TokenVerifier: Send + Sync {
    /// Returns the identity claimed by `token`, or `None` when the token names nobody.
    ///
    /// `Err` means the token could not be read at all (malformed, bad signature, expired, ...).
    fn extract_identity(&self, token: &str) -> Result<Option<String>, TokenError>;

    /// Whether `token` is currently valid for `identity`.
    fn validate(&self, token: &str, identity: &str) -> bool;
}
