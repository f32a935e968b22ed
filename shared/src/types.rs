//! API request and response types

use crate::models::Severity;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Access token response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccessToken {
    pub access_token: String,
    pub token_type: String,
    /// Token lifetime in seconds
    pub expires_in: i64,
}

/// Login request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Registration request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateUserRequest {
    pub email: String,
    pub full_name: String,
    pub password: String,
}

// ============================================================================
// CVE Types
// ============================================================================

/// Create CVE request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateCveRequest {
    pub cve_id: String,
    pub description: String,
    pub severity: Severity,
    pub published_date: DateTime<Utc>,
}

/// Partial CVE update; only supplied fields change
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateCveRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cve_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub severity: Option<Severity>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub published_date: Option<DateTime<Utc>>,
}

impl UpdateCveRequest {
    pub fn is_empty(&self) -> bool {
        self.cve_id.is_none()
            && self.description.is_none()
            && self.severity.is_none()
            && self.published_date.is_none()
    }
}

/// Query parameters for listing CVEs
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CveListQuery {
    pub skip: Option<i64>,
    pub limit: Option<i64>,
}

impl CveListQuery {
    pub const DEFAULT_LIMIT: i64 = 100;
    pub const MAX_LIMIT: i64 = 1000;

    /// Clamp to a usable (skip, limit) pair
    pub fn normalize(&self) -> (i64, i64) {
        let skip = self.skip.unwrap_or(0).max(0);
        let limit = self
            .limit
            .unwrap_or(Self::DEFAULT_LIMIT)
            .clamp(0, Self::MAX_LIMIT);
        (skip, limit)
    }
}
