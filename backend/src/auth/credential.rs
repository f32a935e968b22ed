//! Authorization header parsing
//!
//! The scheme is decided once here; everything downstream matches on
//! [`Credential`] instead of comparing strings.

use base64::{engine::general_purpose::STANDARD, Engine};
use cve_registry_shared::AuthError;
use std::fmt;

/// A parsed `Authorization` header value
#[derive(Clone, PartialEq, Eq)]
pub enum Credential {
    Bearer(String),
    Basic { email: String, password: String },
    Unsupported(String),
}

impl Credential {
    /// Parse `<scheme> <value>`, splitting on the first space
    pub fn parse(header: &str) -> Result<Self, AuthError> {
        let (scheme, value) = header
            .trim()
            .split_once(' ')
            .ok_or(AuthError::MalformedHeader)?;
        let value = value.trim_start();

        if scheme.eq_ignore_ascii_case("bearer") {
            Ok(Credential::Bearer(value.to_string()))
        } else if scheme.eq_ignore_ascii_case("basic") {
            Self::parse_basic(value)
        } else {
            Ok(Credential::Unsupported(scheme.to_string()))
        }
    }

    fn parse_basic(value: &str) -> Result<Self, AuthError> {
        let decoded = STANDARD
            .decode(value)
            .map_err(|_| AuthError::MalformedCredentials)?;
        let decoded = String::from_utf8(decoded).map_err(|_| AuthError::MalformedCredentials)?;
        let (email, password) = decoded
            .split_once(':')
            .ok_or(AuthError::MalformedCredentials)?;

        Ok(Credential::Basic {
            email: email.to_string(),
            password: password.to_string(),
        })
    }
}

// Keep tokens and passwords out of logs
impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Credential::Bearer(_) => f.write_str("Bearer(..)"),
            Credential::Basic { email, .. } => {
                f.debug_struct("Basic").field("email", email).finish_non_exhaustive()
            }
            Credential::Unsupported(scheme) => f.debug_tuple("Unsupported").field(scheme).finish(),
        }
    }
}
