use crate::utils::error::{LinkError, Result};
use regex::Regex;
use std::sync::OnceLock;

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

pub fn validate_positive<T: PartialOrd + Default + std::fmt::Display + Copy>(
    field_name: &str,
    value: T,
) -> Result<()> {
    if value <= T::default() {
        return Err(LinkError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: "Value must be greater than zero".to_string(),
        });
    }
    Ok(())
}

pub fn validate_non_negative<T: PartialOrd + Default + std::fmt::Display + Copy>(
    field_name: &str,
    value: T,
) -> Result<()> {
    if value < T::default() {
        return Err(LinkError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: "Value cannot be negative".to_string(),
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
        return Err(LinkError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: format!("Value must be between {} and {}", min, max),
        });
    }
    Ok(())
}

/// `lower <= upper`, reported against the field holding `lower`.
pub fn validate_ordered<T: PartialOrd + std::fmt::Display + Copy>(
    field_name: &str,
    lower: T,
    upper: T,
) -> Result<()> {
    if lower > upper {
        return Err(LinkError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: lower.to_string(),
            reason: format!("Value must not exceed {}", upper),
        });
    }
    Ok(())
}

fn namespaced_id_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^([a-z0-9_.-]+:)?[a-z0-9_./-]+$").expect("namespaced id pattern is valid")
    })
}

/// Block identifiers look like `minecraft:obsidian` or `obsidian`.
pub fn is_namespaced_id(value: &str) -> bool {
    namespaced_id_pattern().is_match(value)
}
