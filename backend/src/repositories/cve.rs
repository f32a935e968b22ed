//! CVE repository
//!
//! Every operation is keyed on `cve_id`.

use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use cve_registry_shared::{Cve, Severity, UpdateCveRequest};
use sqlx::PgPool;
use std::collections::BTreeMap;
use tokio::sync::RwLock;

/// CVE row from database
#[derive(Debug, Clone, sqlx::FromRow)]
struct CveRow {
    cve_id: String,
    description: String,
    severity: String,
    published_date: DateTime<Utc>,
}

impl CveRow {
    fn into_cve(self) -> Result<Cve> {
        let severity = self
            .severity
            .parse::<Severity>()
            .map_err(|e| anyhow::anyhow!(e))
            .with_context(|| format!("Stored CVE {} has a bad severity", self.cve_id))?;
        Ok(Cve {
            cve_id: self.cve_id,
            description: self.description,
            severity,
            published_date: self.published_date,
        })
    }
}

/// Result of applying a partial update
#[derive(Debug, Clone, PartialEq)]
pub enum UpdateOutcome {
    Updated(Cve),
    /// No CVE has the requested id
    NotFound,
    /// The new `cve_id` belongs to another record
    IdTaken,
}

/// Persistence for CVE records
#[async_trait]
pub trait CveStore: Send + Sync {
    /// List CVEs ordered by id
    async fn list(&self, skip: i64, limit: i64) -> Result<Vec<Cve>>;

    async fn find(&self, cve_id: &str) -> Result<Option<Cve>>;

    /// Insert a CVE. Returns `false` if the id is already taken.
    async fn create(&self, cve: &Cve) -> Result<bool>;

    /// Apply the supplied fields. A rename onto an existing id is reported,
    /// not applied.
    async fn update(&self, cve_id: &str, changes: &UpdateCveRequest) -> Result<UpdateOutcome>;

    /// Remove and return the CVE
    async fn delete(&self, cve_id: &str) -> Result<Option<Cve>>;
}

/// PostgreSQL-backed CVE store
#[derive(Clone)]
pub struct PgCveStore {
    pool: PgPool,
}

impl PgCveStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CveStore for PgCveStore {
    async fn list(&self, skip: i64, limit: i64) -> Result<Vec<Cve>> {
        let rows = sqlx::query_as::<_, CveRow>(
            r#"
            SELECT cve_id, description, severity, published_date
            FROM cves
            ORDER BY cve_id
            LIMIT $1 OFFSET $2
            "#,
        )
        .bind(limit)
        .bind(skip)
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(CveRow::into_cve).collect()
    }

    async fn find(&self, cve_id: &str) -> Result<Option<Cve>> {
        let row = sqlx::query_as::<_, CveRow>(
            r#"
            SELECT cve_id, description, severity, published_date
            FROM cves
            WHERE cve_id = $1
            "#,
        )
        .bind(cve_id)
        .fetch_optional(&self.pool)
        .await?;

        row.map(CveRow::into_cve).transpose()
    }

    async fn create(&self, cve: &Cve) -> Result<bool> {
        let inserted = sqlx::query_scalar::<_, String>(
            r#"
            INSERT INTO cves (cve_id, description, severity, published_date)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (cve_id) DO NOTHING
            RETURNING cve_id
            "#,
        )
        .bind(&cve.cve_id)
        .bind(&cve.description)
        .bind(cve.severity.as_str())
        .bind(cve.published_date)
        .fetch_optional(&self.pool)
        .await?;

        Ok(inserted.is_some())
    }

    async fn update(&self, cve_id: &str, changes: &UpdateCveRequest) -> Result<UpdateOutcome> {
        let result = sqlx::query_as::<_, CveRow>(
            r#"
            UPDATE cves SET
                cve_id = COALESCE($2, cve_id),
                description = COALESCE($3, description),
                severity = COALESCE($4, severity),
                published_date = COALESCE($5, published_date),
                updated_at = NOW()
            WHERE cve_id = $1
            RETURNING cve_id, description, severity, published_date
            "#,
        )
        .bind(cve_id)
        .bind(&changes.cve_id)
        .bind(&changes.description)
        .bind(changes.severity.map(|s| s.as_str()))
        .bind(changes.published_date)
        .fetch_optional(&self.pool)
        .await;

        match result {
            Ok(Some(row)) => Ok(UpdateOutcome::Updated(row.into_cve()?)),
            Ok(None) => Ok(UpdateOutcome::NotFound),
            Err(sqlx::Error::Database(e)) if e.is_unique_violation() => Ok(UpdateOutcome::IdTaken),
            Err(e) => Err(e.into()),
        }
    }

    async fn delete(&self, cve_id: &str) -> Result<Option<Cve>> {
        let row = sqlx::query_as::<_, CveRow>(
            r#"
            DELETE FROM cves
            WHERE cve_id = $1
            RETURNING cve_id, description, severity, published_date
            "#,
        )
        .bind(cve_id)
        .fetch_optional(&self.pool)
        .await?;

        row.map(CveRow::into_cve).transpose()
    }
}

/// In-process CVE store
#[derive(Default)]
pub struct InMemoryCveStore {
    cves: RwLock<BTreeMap<String, Cve>>,
}

impl InMemoryCveStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CveStore for InMemoryCveStore {
    async fn list(&self, skip: i64, limit: i64) -> Result<Vec<Cve>> {
        let skip = usize::try_from(skip).unwrap_or(0);
        let limit = usize::try_from(limit).unwrap_or(0);
        Ok(self
            .cves
            .read()
            .await
            .values()
            .skip(skip)
            .take(limit)
            .cloned()
            .collect())
    }

    async fn find(&self, cve_id: &str) -> Result<Option<Cve>> {
        Ok(self.cves.read().await.get(cve_id).cloned())
    }

    async fn create(&self, cve: &Cve) -> Result<bool> {
        let mut cves = self.cves.write().await;
        if cves.contains_key(&cve.cve_id) {
            return Ok(false);
        }
        cves.insert(cve.cve_id.clone(), cve.clone());
        Ok(true)
    }

    async fn update(&self, cve_id: &str, changes: &UpdateCveRequest) -> Result<UpdateOutcome> {
        let mut cves = self.cves.write().await;
        if !cves.contains_key(cve_id) {
            return Ok(UpdateOutcome::NotFound);
        }
        if let Some(new_id) = changes.cve_id.as_deref() {
            if new_id != cve_id && cves.contains_key(new_id) {
                return Ok(UpdateOutcome::IdTaken);
            }
        }
        let Some(mut cve) = cves.remove(cve_id) else {
            return Ok(UpdateOutcome::NotFound);
        };

        if let Some(new_id) = &changes.cve_id {
            cve.cve_id = new_id.clone();
        }
        if let Some(description) = &changes.description {
            cve.description = description.clone();
        }
        if let Some(severity) = changes.severity {
            cve.severity = severity;
        }
        if let Some(published_date) = changes.published_date {
            cve.published_date = published_date;
        }

        cves.insert(cve.cve_id.clone(), cve.clone());
        Ok(UpdateOutcome::Updated(cve))
    }

    async fn delete(&self, cve_id: &str) -> Result<Option<Cve>> {
        Ok(self.cves.write().await.remove(cve_id))
    }
}
