//! Credential store

use anyhow::Result;
use async_trait::async_trait;
use sqlx::PgPool;
use std::collections::HashMap;
use tokio::sync::RwLock;

/// User record as stored
///
/// `password_hash` is only ever produced by `PasswordService::hash`.
#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct UserRecord {
    pub email: String,
    pub display_name: String,
    pub password_hash: String,
}

/// Persistence for user credentials, keyed by email
#[async_trait]
pub trait CredentialStore: Send + Sync {
    /// Find user by email
    async fn find_by_email(&self, email: &str) -> Result<Option<UserRecord>>;

    /// Insert a new user. Returns `false` when the email is already registered.
    async fn create(&self, user: &UserRecord) -> Result<bool>;
}

/// PostgreSQL-backed credential store
#[derive(Clone)]
pub struct PgCredentialStore {
    pool: PgPool,
}

impl PgCredentialStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CredentialStore for PgCredentialStore {
    async fn find_by_email(&self, email: &str) -> Result<Option<UserRecord>> {
        let user = sqlx::query_as::<_, UserRecord>(
            r#"
            SELECT email, display_name, password_hash
            FROM users
            WHERE email = $1
            "#,
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    async fn create(&self, user: &UserRecord) -> Result<bool> {
        let inserted = sqlx::query_scalar::<_, String>(
            r#"
            INSERT INTO users (email, display_name, password_hash)
            VALUES ($1, $2, $3)
            ON CONFLICT (email) DO NOTHING
            RETURNING email
            "#,
        )
        .bind(&user.email)
        .bind(&user.display_name)
        .bind(&user.password_hash)
        .fetch_optional(&self.pool)
        .await?;

        Ok(inserted.is_some())
    }
}

/// In-process credential store
#[derive(Default)]
pub struct InMemoryCredentialStore {
    users: RwLock<HashMap<String, UserRecord>>,
}

impl InMemoryCredentialStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CredentialStore for InMemoryCredentialStore {
    async fn find_by_email(&self, email: &str) -> Result<Option<UserRecord>> {
        Ok(self.users.read().await.get(email).cloned())
    }

    async fn create(&self, user: &UserRecord) -> Result<bool> {
        let mut users = self.users.write().await;
        if users.contains_key(&user.email) {
            return Ok(false);
        }
        users.insert(user.email.clone(), user.clone());
        Ok(true)
    }
}
