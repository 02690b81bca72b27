//! Field checks for run configuration
//!
//! Configuration types implement [`Validate`]; each check names the offending
//! field so the error can be reported before any node or queue is built.

use std::fmt::Display;

pub type ValidationResult<T> = Result<T, ValidationError>;

#[derive(Debug, thiserror::Error)]
pub enum ValidationError {
    #[error("'{field}' is {value}, expected a finite number")]
    NotFinite { field: String, value: f64 },

    #[error("'{field}' is {value}, expected a value {bound}")]
    OutOfBounds {
        field: String,
        value: String,
        bound: &'static str,
    },
}

pub trait Validate {
    fn validate(&self) -> ValidationResult<()>;
}

fn out_of_bounds<T: Display>(field: &str, value: T, bound: &'static str) -> ValidationError {
    ValidationError::OutOfBounds {
        field: field.to_string(),
        value: value.to_string(),
        bound,
    }
}

/// `value > 0`; `NaN` fails.
pub fn validate_positive<T: PartialOrd + Default + Display>(
    field: &str,
    value: T,
) -> ValidationResult<()> {
    if value > T::default() {
        return Ok(());
    }
    Err(out_of_bounds(field, value, "greater than zero"))
}

/// `value >= 0`; `NaN` fails.
pub fn validate_non_negative<T: PartialOrd + Default + Display>(
    field: &str,
    value: T,
) -> ValidationResult<()> {
    if value >= T::default() {
        return Ok(());
    }
    Err(out_of_bounds(field, value, "of at least zero"))
}

pub fn validate_finite(field: &str, value: f64) -> ValidationResult<()> {
    if value.is_finite() {
        return Ok(());
    }
    Err(ValidationError::NotFinite {
        field: field.to_string(),
        value,
    })
}
