use crate::utils::error::{FirmhouseError, Result};
use std::collections::BTreeMap;
use url::Url;

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

pub fn validate_url(field_name: &str, url_str: &str) -> Result<()> {
    if url_str.is_empty() {
        return Err(FirmhouseError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: url_str.to_string(),
            reason: "URL cannot be empty".to_string(),
        });
    }

    match Url::parse(url_str) {
        Ok(url) => match url.scheme() {
            "http" | "https" => Ok(()),
            scheme => Err(FirmhouseError::InvalidConfigValueError {
                field: field_name.to_string(),
                value: url_str.to_string(),
                reason: format!("Unsupported URL scheme: {}", scheme),
            }),
        },
        Err(e) => Err(FirmhouseError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: url_str.to_string(),
            reason: format!("Invalid URL format: {}", e),
        }),
    }
}

pub fn validate_required_field<'a, T>(field_name: &str, value: &'a Option<T>) -> Result<&'a T> {
    value.as_ref().ok_or_else(|| FirmhouseError::MissingConfigError {
        field: field_name.to_string(),
    })
}

pub fn validate_non_empty_string(field_name: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(FirmhouseError::InvalidConfigValueError {
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
        return Err(FirmhouseError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: format!("Value must be between {} and {}", min, max),
        });
    }
    Ok(())
}

/// Caller input the API would refuse, reported as a `Validation` error keyed
/// by the camelCase field name.
pub fn input_error(field: &str, message: impl Into<String>) -> FirmhouseError {
    let message = message.into();
    let mut details = BTreeMap::new();
    details.insert(field.to_string(), message.clone());
    FirmhouseError::Validation {
        message: format!("{} {}", field, message),
        details,
    }
}

pub fn require_input(field: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(input_error(field, "can't be blank"));
    }
    Ok(())
}

pub fn require_at_least(field: &str, value: i64, min: i64) -> Result<()> {
    if value < min {
        return Err(input_error(field, format!("must be at least {}", min)));
    }
    Ok(())
}

pub fn require_within<T: PartialOrd + std::fmt::Display + Copy>(
    field: &str,
    value: T,
    min: T,
    max: T,
) -> Result<()> {
    if value < min || value > max {
        return Err(input_error(field, format!("must be between {} and {}", min, max)));
    }
    Ok(())
}

pub fn require_url(field: &str, value: &str) -> Result<()> {
    validate_url(field, value).map_err(|e| match e {
        FirmhouseError::InvalidConfigValueError { reason, .. } => input_error(field, reason),
        other => other,
    })
}
