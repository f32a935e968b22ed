//! Input validation functions

use regex_lite::Regex;
use std::sync::OnceLock;

fn cve_id_regex() -> &'static Regex {
    static CVE_ID: OnceLock<Regex> = OnceLock::new();
    CVE_ID.get_or_init(|| Regex::new(r"^CVE-\d{4}-\d{4,}$").expect("valid CVE id pattern"))
}

/// Validate password strength
pub fn validate_password(password: &str) -> Result<(), String> {
    let length = password.chars().count();
    if length < 8 {
        return Err("Password must be at least 8 characters".to_string());
    }
    if length > 128 {
        return Err("Password too long".to_string());
    }
    Ok(())
}

/// Validate display name
pub fn validate_full_name(name: &str) -> Result<(), String> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err("Full name cannot be empty".to_string());
    }
    if trimmed.len() > 255 {
        return Err("Full name too long".to_string());
    }
    Ok(())
}

/// Validate a CVE identifier such as `CVE-2023-12345`
pub fn validate_cve_id(cve_id: &str) -> Result<(), String> {
    if !cve_id_regex().is_match(cve_id) {
        return Err("CVE id must look like CVE-YYYY-NNNN".to_string());
    }
    Ok(())
}

/// Validate CVE description
pub fn validate_description(description: &str) -> Result<(), String> {
    if description.trim().is_empty() {
        return Err("Description cannot be empty".to_string());
    }
    if description.len() > 10_000 {
        return Err("Description too long".to_string());
    }
    Ok(())
}
