//! Per-request authentication
//!
//! `Start -> ParsedHeader -> {Bearer | Basic} -> {Authenticated | Rejected}`.
//! Every rejection is an [`AuthError`]; the HTTP layer collapses them into a
//! single unauthorized response.

use super::credential::Credential;
use super::jwt::TokenService;
use super::password::PasswordService;
use crate::repositories::{CredentialStore, UserRecord};
use cve_registry_shared::{AuthError, User};
use serde::Serialize;
use std::sync::{Arc, OnceLock};
use tracing::{debug, error, info};

/// Identity attached to an authenticated request
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AuthenticatedIdentity {
    pub email: String,
    pub display_name: String,
}

impl From<UserRecord> for AuthenticatedIdentity {
    fn from(user: UserRecord) -> Self {
        Self {
            email: user.email,
            display_name: user.display_name,
        }
    }
}

impl From<AuthenticatedIdentity> for User {
    fn from(identity: AuthenticatedIdentity) -> Self {
        Self {
            email: identity.email,
            full_name: identity.display_name,
        }
    }
}

/// Hash verified against when the email is unknown, so both cases cost one verification
fn timing_pad_hash() -> Option<&'static str> {
    static HASH: OnceLock<Option<String>> = OnceLock::new();
    HASH.get_or_init(|| PasswordService::hash("unknown-user-timing-pad").ok())
        .as_deref()
}

/// Resolves credentials to an identity
///
/// Holds only shared read-only state; clone freely across requests.
#[derive(Clone)]
pub struct AuthGateway {
    tokens: TokenService,
    users: Arc<dyn CredentialStore>,
}

impl AuthGateway {
    pub fn new(tokens: TokenService, users: Arc<dyn CredentialStore>) -> Self {
        Self { tokens, users }
    }

    /// Resolve an `Authorization` header value
    pub async fn resolve(&self, header: &str) -> Result<AuthenticatedIdentity, AuthError> {
        match Credential::parse(header)? {
            Credential::Bearer(token) => self.resolve_bearer(&token).await,
            Credential::Basic { email, password } => self.authenticate(&email, &password).await,
            Credential::Unsupported(scheme) => {
                debug!(%scheme, "Unsupported authorization scheme");
                Err(AuthError::UnsupportedScheme)
            }
        }
    }

    async fn resolve_bearer(&self, token: &str) -> Result<AuthenticatedIdentity, AuthError> {
        let email = self.tokens.verify(token)?;

        match self.users.find_by_email(&email).await {
            Ok(Some(user)) => Ok(user.into()),
            Ok(None) => Err(AuthError::UserNotFound),
            Err(e) => {
                error!(%email, "Credential store lookup failed: {:#}", e);
                Err(AuthError::UserNotFound)
            }
        }
    }

    /// Check an email/password pair
    ///
    /// Shared by the Basic scheme and the login endpoint.
    pub async fn authenticate(
        &self,
        email: &str,
        password: &str,
    ) -> Result<AuthenticatedIdentity, AuthError> {
        debug!(%email, "Authenticating user");

        let user = match self.users.find_by_email(email).await {
            Ok(user) => user,
            Err(e) => {
                error!(%email, "Credential store lookup failed: {:#}", e);
                None
            }
        };

        let Some(user) = user else {
            let password = password.to_string();
            // Result is ignored; the call only equalises response time
            let _ = tokio::task::spawn_blocking(move || {
                if let Some(hash) = timing_pad_hash() {
                    PasswordService::verify(&password, hash);
                }
            })
            .await;
            return Err(AuthError::InvalidCredentials);
        };

        let valid =
            PasswordService::verify_async(password.to_string(), user.password_hash.clone()).await;
        if !valid {
            return Err(AuthError::InvalidCredentials);
        }

        if PasswordService::needs_rehash(&user.password_hash) {
            info!(email = %user.email, "Stored password hash uses a deprecated scheme");
        }

        Ok(user.into())
    }

    pub fn tokens(&self) -> &TokenService {
        &self.tokens
    }
}
