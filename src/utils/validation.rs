use crate::utils::error::{DirectoryError, Result};
use url::Url;

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

pub fn validate_url(field_name: &str, url_str: &str) -> Result<()> {
    if url_str.is_empty() {
        return Err(DirectoryError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: url_str.to_string(),
            reason: "URL cannot be empty".to_string(),
        });
    }

    match Url::parse(url_str) {
        Ok(url) => match url.scheme() {
            "http" | "https" => Ok(()),
            scheme => Err(DirectoryError::InvalidConfigValueError {
                field: field_name.to_string(),
                value: url_str.to_string(),
                reason: format!("Unsupported URL scheme: {}", scheme),
            }),
        },
        Err(e) => Err(DirectoryError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: url_str.to_string(),
            reason: format!("Invalid URL format: {}", e),
        }),
    }
}

pub fn validate_path(field_name: &str, path: &str) -> Result<()> {
    if path.is_empty() {
        return Err(DirectoryError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: path.to_string(),
            reason: "Path cannot be empty".to_string(),
        });
    }

    if path.contains('\0') {
        return Err(DirectoryError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: path.to_string(),
            reason: "Path contains null bytes".to_string(),
        });
    }

    Ok(())
}

pub fn validate_positive_number(field_name: &str, value: usize, min_value: usize) -> Result<()> {
    if value < min_value {
        return Err(DirectoryError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: format!("Value must be at least {}", min_value),
        });
    }
    Ok(())
}

pub fn validate_required_field<'a, T>(field_name: &str, value: &'a Option<T>) -> Result<&'a T> {
    value.as_ref().ok_or_else(|| DirectoryError::MissingConfigError {
        field: field_name.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_url() {
        assert!(validate_url("backend_url", "https://example.com/contacts").is_ok());
        assert!(validate_url("backend_url", "http://localhost:8080").is_ok());
        assert!(validate_url("backend_url", "").is_err());
        assert!(validate_url("backend_url", "test").is_err());
        assert!(validate_url("backend_url", "ftp://example.com").is_err());
    }

    #[test]
    fn test_validate_positive_number() {
        assert!(validate_positive_number("cache_capacity", 5, 1).is_ok());
        assert!(validate_positive_number("cache_capacity", 0, 1).is_err());
    }

    #[test]
    fn test_validate_required_field() {
        let missing: Option<String> = None;
        let err = validate_required_field("backend_url", &missing).unwrap_err();
        assert!(matches!(err, DirectoryError::MissingConfigError { field } if field == "backend_url"));

        let present = Some("https://example.com".to_string());
        assert_eq!(
            validate_required_field("backend_url", &present).unwrap(),
            "https://example.com"
        );
    }

    #[test]
    fn test_validate_path() {
        assert!(validate_path("data.committee", "./data/committee_data.json").is_ok());
        assert!(validate_path("data.committee", "").is_err());
        assert!(validate_path("data.committee", "a\0b").is_err());
    }
}
