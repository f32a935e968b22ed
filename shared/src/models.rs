//! Data models for the CVE Registry application

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// CVE severity rating
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Severity {
    Critical,
    High,
    Moderate,
    Low,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Critical => "CRITICAL",
            Severity::High => "HIGH",
            Severity::Moderate => "MODERATE",
            Severity::Low => "LOW",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for Severity {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "CRITICAL" => Ok(Severity::Critical),
            "HIGH" => Ok(Severity::High),
            "MODERATE" => Ok(Severity::Moderate),
            "LOW" => Ok(Severity::Low),
            _ => Err(format!("Unknown severity: {}", s)),
        }
    }
}

/// Vulnerability record as exposed by the API
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Cve {
    pub cve_id: String,
    pub description: String,
    pub severity: Severity,
    pub published_date: DateTime<Utc>,
}

/// Public view of a user account
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct User {
    pub email: String,
    pub full_name: String,
}
