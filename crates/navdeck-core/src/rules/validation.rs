use crate::errors::{NavError, Result};
use crate::model::NewSite;

/// Validate and normalize a group name
///
/// Returns the trimmed name.
///
/// # Errors
/// `InvalidInput` when the name is empty after trimming.
pub fn validate_group_name(name: &str) -> Result<String> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(NavError::InvalidInput {
            reason: "group name must not be empty".to_string(),
        });
    }
    Ok(trimmed.to_string())
}

/// Validate a new site and return its normalized form
///
/// # Errors
/// `InvalidInput` when the name or url is empty after trimming.
pub fn validate_site(site: NewSite) -> Result<NewSite> {
    let site = site.normalized();
    if site.name.is_empty() {
        return Err(NavError::InvalidInput {
            reason: "site name must not be empty".to_string(),
        });
    }
    if site.url.is_empty() {
        return Err(NavError::InvalidInput {
            reason: "site url must not be empty".to_string(),
        });
    }
    Ok(site)
}
