//! Storage backends
//!
//! Each store is a trait with a PostgreSQL implementation and an in-process
//! implementation. [`Storage`] bundles whichever pair the configuration selects.

pub mod cve;
pub mod user;

pub use cve::{CveStore, InMemoryCveStore, PgCveStore, UpdateOutcome};
pub use user::{CredentialStore, InMemoryCredentialStore, PgCredentialStore, UserRecord};

use sqlx::PgPool;
use std::sync::Arc;

/// The stores handed to application state
#[derive(Clone)]
pub struct Storage {
    pub users: Arc<dyn CredentialStore>,
    pub cves: Arc<dyn CveStore>,
    /// Present only for the PostgreSQL backend; used by readiness checks
    pub pool: Option<PgPool>,
}

impl Storage {
    pub fn postgres(pool: PgPool) -> Self {
        Self {
            users: Arc::new(PgCredentialStore::new(pool.clone())),
            cves: Arc::new(PgCveStore::new(pool.clone())),
            pool: Some(pool),
        }
    }

    pub fn in_memory() -> Self {
        Self {
            users: Arc::new(InMemoryCredentialStore::new()),
            cves: Arc::new(InMemoryCveStore::new()),
            pool: None,
        }
    }
}
