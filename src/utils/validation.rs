use crate::utils::error::{DeckError, Result};

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

pub fn validate_host(field_name: &str, host: &str) -> Result<()> {
    validate_non_empty_string(field_name, host)?;

    if host.chars().any(|c| c.is_whitespace() || c == '/' || c == '@') {
        return Err(DeckError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: host.to_string(),
            reason: "Host must be a bare hostname or IP address".to_string(),
        });
    }

    Ok(())
}

pub fn validate_positive_number(field_name: &str, value: u64, min_value: u64) -> Result<()> {
    if value < min_value {
        return Err(DeckError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: format!("Value must be at least {}", min_value),
        });
    }
    Ok(())
}

pub fn validate_required_field<'a, T>(field_name: &str, value: &'a Option<T>) -> Result<&'a T> {
    value.as_ref().ok_or_else(|| DeckError::MissingConfigError {
        field: field_name.to_string(),
    })
}

pub fn validate_non_empty_string(field_name: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(DeckError::InvalidConfigValueError {
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
        return Err(DeckError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: format!("Value must be between {} and {}", min, max),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_host() {
        assert!(validate_host("redis.host", "localhost").is_ok());
        assert!(validate_host("redis.host", "10.0.0.7").is_ok());
        assert!(validate_host("redis.host", "").is_err());
        assert!(validate_host("redis.host", "   ").is_err());
        assert!(validate_host("redis.host", "redis://localhost").is_err());
        assert!(validate_host("redis.host", "user@localhost").is_err());
    }

    #[test]
    fn test_validate_positive_number() {
        assert!(validate_positive_number("redis.port", 6379, 1).is_ok());
        assert!(validate_positive_number("redis.port", 0, 1).is_err());
    }

    #[test]
    fn test_validate_range() {
        assert!(validate_range("redis.connect_timeout_secs", 5, 1, 60).is_ok());
        assert!(validate_range("redis.connect_timeout_secs", 0, 1, 60).is_err());
        assert!(validate_range("redis.connect_timeout_secs", 61, 1, 60).is_err());
    }

    #[test]
    fn test_validate_required_field() {
        let present = Some("redis".to_string());
        let missing: Option<String> = None;

        assert_eq!(validate_required_field("redis", &present).unwrap(), "redis");
        assert!(matches!(
            validate_required_field("redis", &missing),
            Err(DeckError::MissingConfigError { .. })
        ));
    }
}
