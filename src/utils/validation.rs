use crate::utils::error::{Result, ToolkitError};
use regex::Regex;
use std::sync::OnceLock;
use url::Url;

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

fn version_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^\d+\.\d+\.\d+(-[0-9A-Za-z.-]+)?(\+[0-9A-Za-z.-]+)?$")
            .unwrap_or_else(|e| panic!("invalid version pattern: {}", e))
    })
}

/// Versions are bare semver, without the leading `v` (that is added when
/// building release URLs).
pub fn validate_version(field_name: &str, version: &str) -> Result<()> {
    if version_pattern().is_match(version) {
        Ok(())
    } else {
        Err(ToolkitError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: version.to_string(),
            reason: "Expected a semantic version like 3.2.4 (no leading 'v')".to_string(),
        })
    }
}

/// Download URLs are built internally; this guards user-supplied locations
/// such as the kops state store, whose backends use their own schemes.
pub fn validate_url(field_name: &str, url_str: &str, allowed_schemes: &[&str]) -> Result<()> {
    if url_str.is_empty() {
        return Err(ToolkitError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: url_str.to_string(),
            reason: "URL cannot be empty".to_string(),
        });
    }

    match Url::parse(url_str) {
        Ok(url) => {
            let scheme = url.scheme();
            if allowed_schemes.iter().any(|allowed| *allowed == scheme) {
                Ok(())
            } else {
                Err(ToolkitError::InvalidConfigValueError {
                    field: field_name.to_string(),
                    value: url_str.to_string(),
                    reason: format!(
                        "Unsupported URL scheme: {} (expected one of: {})",
                        scheme,
                        allowed_schemes.join(", ")
                    ),
                })
            }
        }
        Err(e) => Err(ToolkitError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: url_str.to_string(),
            reason: format!("Invalid URL format: {}", e),
        }),
    }
}

pub fn validate_non_empty_string(field_name: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(ToolkitError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: "Value cannot be empty or whitespace-only".to_string(),
        });
    }
    Ok(())
}

pub fn validate_positive_integer(field_name: &str, value: &str) -> Result<()> {
    match value.parse::<u64>() {
        Ok(n) if n > 0 => Ok(()),
        _ => Err(ToolkitError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: "Expected a positive integer".to_string(),
        }),
    }
}

pub fn validate_path(field_name: &str, path: &str) -> Result<()> {
    if path.is_empty() {
        return Err(ToolkitError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: path.to_string(),
            reason: "Path cannot be empty".to_string(),
        });
    }

    if path.contains('\0') {
        return Err(ToolkitError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: path.to_string(),
            reason: "Path contains null bytes".to_string(),
        });
    }

    Ok(())
}
