use crate::utils::error::{FacadeError, Result};
use std::net::SocketAddr;
use url::Url;

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

pub fn validate_url(field_name: &str, url_str: &str) -> Result<()> {
    if url_str.is_empty() {
        return Err(FacadeError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: url_str.to_string(),
            reason: "URL cannot be empty".to_string(),
        });
    }

    match Url::parse(url_str) {
        Ok(url) => match url.scheme() {
            "http" | "https" => Ok(()),
            scheme => Err(FacadeError::InvalidConfigValueError {
                field: field_name.to_string(),
                value: url_str.to_string(),
                reason: format!("Unsupported URL scheme: {}", scheme),
            }),
        },
        Err(e) => Err(FacadeError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: url_str.to_string(),
            reason: format!("Invalid URL format: {}", e),
        }),
    }
}

pub fn validate_socket_addr(field_name: &str, addr: &str) -> Result<SocketAddr> {
    addr.parse::<SocketAddr>()
        .map_err(|e| FacadeError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: addr.to_string(),
            reason: format!("Invalid socket address: {}", e),
        })
}

pub fn validate_non_empty_string(field_name: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(FacadeError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: "Value cannot be empty or whitespace-only".to_string(),
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
        return Err(FacadeError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: format!("Value must be between {} and {}", min, max),
        });
    }
    Ok(())
}

/// Presence check for an inbound email parameter.
///
/// Matching semantics belong to the CRM, so this only rejects values that
/// could never match a contact.
pub fn validate_email(value: Option<&str>) -> Result<&str> {
    let email = value.map(str::trim).unwrap_or_default();
    if email.is_empty() {
        return Err(FacadeError::ValidationError {
            message: "query parameter 'email' is required".to_string(),
        });
    }
    Ok(email)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_url() {
        assert!(validate_url("dynamics.instance", "https://org.crm.dynamics.com").is_ok());
        assert!(validate_url("dynamics.instance", "http://localhost:8080").is_ok());
        assert!(validate_url("dynamics.instance", "").is_err());
        assert!(validate_url("dynamics.instance", "invalid-url").is_err());
        assert!(validate_url("dynamics.instance", "ftp://example.com").is_err());
    }

    #[test]
    fn test_validate_socket_addr() {
        assert!(validate_socket_addr("server.bind", "127.0.0.1:8080").is_ok());
        assert!(validate_socket_addr("server.bind", "localhost").is_err());
    }

    #[test]
    fn test_validate_range() {
        assert!(validate_range("dynamics.timeout_seconds", 30, 1, 300).is_ok());
        assert!(validate_range("dynamics.timeout_seconds", 0, 1, 300).is_err());
    }

    #[test]
    fn test_validate_email() {
        assert_eq!(validate_email(Some(" a@x.com ")).unwrap(), "a@x.com");
        assert!(validate_email(None).is_err());
        assert!(validate_email(Some("   ")).is_err());
        assert_eq!(validate_email(Some("joao.silva")).unwrap(), "joao.silva");
    }
}
