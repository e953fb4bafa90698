use crate::utils::error::{FindRecordsError, Result};
use url::Url;

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

pub fn validate_url(field_name: &str, url_str: &str) -> Result<Url> {
    if url_str.is_empty() {
        return Err(FindRecordsError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: url_str.to_string(),
            reason: "URL cannot be empty".to_string(),
        });
    }

    match Url::parse(url_str) {
        Ok(url) => match url.scheme() {
            "http" | "https" => Ok(url),
            scheme => Err(FindRecordsError::InvalidConfigValueError {
                field: field_name.to_string(),
                value: url_str.to_string(),
                reason: format!("Unsupported URL scheme: {}", scheme),
            }),
        },
        Err(e) => Err(FindRecordsError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: url_str.to_string(),
            reason: format!("Invalid URL format: {}", e),
        }),
    }
}

pub fn validate_non_empty_string(field_name: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(FindRecordsError::ValidationError {
            message: format!("{} cannot be empty or whitespace-only", field_name),
        });
    }
    Ok(())
}

pub fn validate_range<T: PartialOrd + std::fmt::Display + Copy>(
    field_name: &str,
    value: T,
    min: T,
    max: T,
) -> Result<()> {
    if value < min || value > max {
        return Err(FindRecordsError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: format!("Value must be between {} and {}", min, max),
        });
    }
    Ok(())
}

/// Solr core names end up as a URL path segment.
pub fn validate_core_name(field_name: &str, core: &str) -> Result<()> {
    let valid = !core.is_empty()
        && core
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-' || c == '.');

    if !valid {
        return Err(FindRecordsError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: core.to_string(),
            reason: "Core name may only contain letters, digits, '_', '-' and '.'".to_string(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_url() {
        assert!(validate_url("SOLR_INDEX", "https://example.com/solr").is_ok());
        assert!(validate_url("SOLR_INDEX", "http://example.com").is_ok());
        assert!(validate_url("SOLR_INDEX", "").is_err());
        assert!(validate_url("SOLR_INDEX", "invalid-url").is_err());
        assert!(validate_url("SOLR_INDEX", "ftp://example.com").is_err());
    }

    #[test]
    fn test_validate_non_empty_string() {
        assert!(validate_non_empty_string("query_term", "hamlet").is_ok());
        assert!(validate_non_empty_string("query_term", "   ").is_err());
    }

    #[test]
    fn test_validate_range() {
        assert!(validate_range("timeout", 30u64, 1, 600).is_ok());
        assert!(validate_range("timeout", 0u64, 1, 600).is_err());
        assert!(validate_range("timeout", 601u64, 1, 600).is_err());
    }

    #[test]
    fn test_validate_core_name() {
        assert!(validate_core_name("SOLR_CORE", "ole").is_ok());
        assert!(validate_core_name("SOLR_CORE", "bib-core_2").is_ok());
        assert!(validate_core_name("SOLR_CORE", "").is_err());
        assert!(validate_core_name("SOLR_CORE", "ole/select").is_err());
    }
}
