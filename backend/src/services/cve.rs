//! CVE service
//!
//! Validation and error mapping around the CVE store.

use crate::error::ApiError;
use crate::repositories::{CveStore, UpdateOutcome};
use cve_registry_shared::validation::{validate_cve_id, validate_description};
use cve_registry_shared::{CreateCveRequest, Cve, CveListQuery, UpdateCveRequest};
use tracing::info;

pub struct CveService;

impl CveService {
    pub async fn list(store: &dyn CveStore, query: &CveListQuery) -> Result<Vec<Cve>, ApiError> {
        let (skip, limit) = query.normalize();
        store.list(skip, limit).await.map_err(ApiError::Internal)
    }

    pub async fn get(store: &dyn CveStore, cve_id: &str) -> Result<Cve, ApiError> {
        store
            .find(cve_id)
            .await
            .map_err(ApiError::Internal)?
            .ok_or_else(|| ApiError::NotFound("CVE not found".to_string()))
    }

    pub async fn create(store: &dyn CveStore, req: CreateCveRequest) -> Result<Cve, ApiError> {
        validate_cve_id(&req.cve_id).map_err(ApiError::Validation)?;
        validate_description(&req.description).map_err(ApiError::Validation)?;

        let cve = Cve {
            cve_id: req.cve_id,
            description: req.description,
            severity: req.severity,
            published_date: req.published_date,
        };

        if !store.create(&cve).await.map_err(ApiError::Internal)? {
            return Err(ApiError::BadRequest(
                "CVE with this ID already exists".to_string(),
            ));
        }

        info!(cve_id = %cve.cve_id, "CVE created");
        Ok(cve)
    }

    pub async fn update(
        store: &dyn CveStore,
        cve_id: &str,
        changes: UpdateCveRequest,
    ) -> Result<Cve, ApiError> {
        if changes.is_empty() {
            return Self::get(store, cve_id).await;
        }
        if let Some(new_id) = changes.cve_id.as_deref() {
            validate_cve_id(new_id).map_err(ApiError::Validation)?;
        }
        if let Some(description) = changes.description.as_deref() {
            validate_description(description).map_err(ApiError::Validation)?;
        }

        match store.update(cve_id, &changes).await.map_err(ApiError::Internal)? {
            UpdateOutcome::Updated(cve) => {
                info!(cve_id = %cve_id, "CVE updated");
                Ok(cve)
            }
            UpdateOutcome::NotFound => Err(ApiError::NotFound("CVE not found".to_string())),
            UpdateOutcome::IdTaken => Err(ApiError::Conflict(
                "CVE with this ID already exists".to_string(),
            )),
        }
    }

    pub async fn delete(store: &dyn CveStore, cve_id: &str) -> Result<Cve, ApiError> {
        let deleted = store
            .delete(cve_id)
            .await
            .map_err(ApiError::Internal)?
            .ok_or_else(|| ApiError::NotFound("CVE not found".to_string()))?;

        info!(cve_id = %cve_id, "CVE deleted");
        Ok(deleted)
    }
}
