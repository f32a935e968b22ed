//! Error types for the CVE Registry application

use thiserror::Error;

/// Authentication failure kinds
///
/// These are diagnostic only. Every variant collapses into the same
/// unauthorized response at the HTTP boundary.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthError {
    #[error("Authorization header is not in 'SCHEME VALUE' form")]
    MalformedHeader,

    #[error("Unsupported authorization scheme")]
    UnsupportedScheme,

    #[error("Token signature is invalid")]
    InvalidSignature,

    #[error("Token expired")]
    Expired,

    #[error("Token could not be decoded")]
    MalformedToken,

    #[error("Basic credentials could not be decoded")]
    MalformedCredentials,

    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("User not found")]
    UserNotFound,
}
