//! User service for registration and login
//!
//! # Performance Optimizations
//!
//! - Password hashing/verification runs on blocking thread pool
//! - Token service is shared by reference (pre-computed keys)

use crate::auth::{AuthGateway, PasswordService};
use crate::error::ApiError;
use crate::repositories::{CredentialStore, UserRecord};
use cve_registry_shared::validation::{validate_full_name, validate_password};
use cve_registry_shared::{AccessToken, CreateUserRequest, User};
use std::time::Duration;
use tracing::info;
use validator::ValidateEmail;

/// User service for authentication operations
pub struct UserService;

impl UserService {
    /// Register a new user
    ///
    /// # Performance
    /// Password hashing is offloaded to blocking thread pool via `spawn_blocking`.
    pub async fn register(
        users: &dyn CredentialStore,
        req: CreateUserRequest,
    ) -> Result<User, ApiError> {
        // Validate email format
        if !req.email.validate_email() {
            return Err(ApiError::Validation("Invalid email format".to_string()));
        }
        validate_full_name(&req.full_name).map_err(ApiError::Validation)?;
        validate_password(&req.password).map_err(ApiError::Validation)?;

        // Skip the expensive hash when the email is obviously taken
        if users
            .find_by_email(&req.email)
            .await
            .map_err(ApiError::Internal)?
            .is_some()
        {
            return Err(ApiError::BadRequest("Email already registered".to_string()));
        }

        // Hash password on blocking thread pool (CPU-intensive)
        let password_hash = PasswordService::hash_async(req.password)
            .await
            .map_err(ApiError::Internal)?;

        let record = UserRecord {
            email: req.email,
            display_name: req.full_name.trim().to_string(),
            password_hash,
        };

        // The store enforces uniqueness atomically; a concurrent registration loses here
        if !users.create(&record).await.map_err(ApiError::Internal)? {
            return Err(ApiError::BadRequest("Email already registered".to_string()));
        }

        info!(email = %record.email, "User registered");

        Ok(User {
            email: record.email,
            full_name: record.display_name,
        })
    }

    /// Login with email and password
    ///
    /// Any failure is the generic unauthorized error.
    pub async fn login(
        gateway: &AuthGateway,
        ttl: Duration,
        email: &str,
        password: &str,
    ) -> Result<AccessToken, ApiError> {
        let identity = gateway.authenticate(email, password).await?;

        let access_token = gateway
            .tokens()
            .issue(&identity.email, Some(ttl))
            .map_err(ApiError::Internal)?;

        info!(email = %identity.email, "Access token issued");

        Ok(AccessToken {
            access_token,
            token_type: "bearer".to_string(),
            expires_in: i64::try_from(ttl.as_secs()).unwrap_or(i64::MAX),
        })
    }
}
