//! Application state management
//!
//! This module provides the shared application state that is passed
//! to all request handlers via Axum's state extraction.
//!
//! # Design Principles
//!
//! 1. **Pre-compute expensive resources**: JWT keys, DB pools are created once
//! 2. **Cheap cloning**: All fields use Arc or are already Clone-cheap
//! 3. **Immutable after creation**: State is read-only during request handling

use crate::auth::{AuthGateway, TokenService};
use crate::config::{AppConfig, StartupError};
use crate::repositories::{CredentialStore, CveStore, Storage};
use sqlx::PgPool;
use std::sync::Arc;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// Application configuration
    pub config: Arc<AppConfig>,
    /// Credential and CVE stores
    pub storage: Storage,
    /// Authentication gateway, owning the token service
    pub gateway: AuthGateway,
}

impl AppState {
    /// Create a new application state
    ///
    /// Fails when no signing secret is configured; the server must not start
    /// without one.
    pub fn new(config: AppConfig, storage: Storage) -> Result<Self, StartupError> {
        let tokens = TokenService::new(
            config.auth.signing_secret()?,
            config.auth.default_token_ttl(),
        );
        let gateway = AuthGateway::new(tokens, storage.users.clone());

        Ok(Self {
            config: Arc::new(config),
            storage,
            gateway,
        })
    }

    /// Get a reference to the configuration
    #[inline]
    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    #[inline]
    pub fn gateway(&self) -> &AuthGateway {
        &self.gateway
    }

    /// Get a reference to the token service
    #[inline]
    pub fn tokens(&self) -> &TokenService {
        self.gateway.tokens()
    }

    #[inline]
    pub fn users(&self) -> &dyn CredentialStore {
        self.storage.users.as_ref()
    }

    #[inline]
    pub fn cves(&self) -> &dyn CveStore {
        self.storage.cves.as_ref()
    }

    /// Database pool, when running on PostgreSQL
    #[inline]
    pub fn db(&self) -> Option<&PgPool> {
        self.storage.pool.as_ref()
    }
}
