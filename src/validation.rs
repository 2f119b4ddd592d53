//! Record validation.
//!
//! A [`CarRecord`] is well formed when:
//! - `id` and `model` are non-empty,
//! - `condition` is one of the five known conditions,
//! - `price_per_day` is finite and strictly positive.
//!
//! The condition rule is carried by the [`Condition`](crate::Condition) type
//! itself: text outside the closed set never becomes a `Condition`, so the
//! codec reports it as a validation failure at conversion time.
//!
//! # Example
//!
//! ```
//! use fleetstore::{CarRecord, Condition};
//! use fleetstore::validation::{Validate, is_valid};
//!
//! let ok = CarRecord::new("car-001", "Horizon", Condition::Excellent, 2500.0);
//! assert!(is_valid(&ok));
//!
//! let bad = CarRecord::new("", "Horizon", Condition::Good, -1.0);
//! let errors = bad.validate().unwrap_err();
//! assert_eq!(errors.len(), 2);
//! ```

use crate::record::CarRecord;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Result type for validation operations.
pub type ValidationResult = Result<(), Vec<ValidationError>>;

/// Trait for types that can be validated.
pub trait Validate {
    /// Validate this instance and return every rule it breaks.
    fn validate(&self) -> ValidationResult;
}

/// A single broken rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationError {
    /// The field that failed validation (optional)
    pub field: Option<String>,
    /// Human-readable error message
    pub message: String,
}

impl ValidationError {
    /// Create a new validation error with just a message.
    pub fn new<S: Into<String>>(message: S) -> Self {
        Self {
            field: None,
            message: message.into(),
        }
    }

    /// Create a validation error for a specific field.
    pub fn field<S: Into<String>, M: Into<String>>(field: S, message: M) -> Self {
        Self {
            field: Some(field.into()),
            message: message.into(),
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(ref field) = self.field {
            write!(f, "[{}] {}", field, self.message)
        } else {
            write!(f, "{}", self.message)
        }
    }
}

impl std::error::Error for ValidationError {}

/// Join a list of errors for log and error messages.
#[must_use]
pub fn format_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Validation helpers for common field rules.
pub mod validators {
    use super::{ValidationError, ValidationResult};

    /// Validate that a string is not empty.
    pub fn not_empty(field: &str, value: &str) -> ValidationResult {
        if value.is_empty() {
            Err(vec![ValidationError::field(field, "must not be empty")])
        } else {
            Ok(())
        }
    }

    /// Validate that a number is finite and greater than zero.
    pub fn positive_finite(field: &str, value: f64) -> ValidationResult {
        if value.is_finite() && value > 0.0 {
            Ok(())
        } else {
            Err(vec![ValidationError::field(
                field,
                format!("must be a finite number greater than zero (got {value})"),
            )])
        }
    }
}

/// Combine multiple validation results.
pub fn combine_validations(results: Vec<ValidationResult>) -> ValidationResult {
    let mut all_errors = Vec::new();
    for result in results {
        if let Err(mut errors) = result {
            all_errors.append(&mut errors);
        }
    }
    if all_errors.is_empty() {
        Ok(())
    } else {
        Err(all_errors)
    }
}

impl Validate for CarRecord {
    fn validate(&self) -> ValidationResult {
        combine_validations(vec![
            validators::not_empty("id", &self.id),
            validators::not_empty("model", &self.model),
            validators::positive_finite("price_per_day", self.price_per_day),
        ])
    }
}

/// Pure predicate: is `record` well formed?
#[must_use]
pub fn is_valid(record: &CarRecord) -> bool {
    record.validate().is_ok()
}
