//! Error types for the claiming-age estimator
//!
//! The benefit and projection engines never fail: out-of-range inputs are
//! clamped and NaN flows through the arithmetic. Errors only come from the
//! input layer (text parsing, parameter validation) and from I/O.

use std::fmt;
use thiserror::Error;

/// A specialized Result type for CLAGESS operations.
pub type Result<T> = std::result::Result<T, ClagessError>;

/// The main error type for CLAGESS operations.
#[derive(Error, Debug)]
pub enum ClagessError {
    /// An age string could not be parsed as `years` or `years:months`.
    #[error("Invalid age '{text}': {reason}")]
    InvalidAgeText {
        /// The offending text.
        text: String,
        /// Why it was rejected.
        reason: String,
    },

    /// A claiming-age list (or range shorthand) was malformed.
    #[error("Invalid claiming ages '{text}': {reason}")]
    InvalidClaimingAges {
        /// The offending text.
        text: String,
        /// Why it was rejected.
        reason: String,
    },

    /// Projection parameters failed validation.
    #[error("{0}")]
    Validation(ValidationErrors),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

impl From<ValidationErrors> for ClagessError {
    fn from(errors: ValidationErrors) -> Self {
        ClagessError::Validation(errors)
    }
}

/// Every validation failure found in one set of parameters.
///
/// The input layer reports all problems at once rather than stopping at
/// the first one, so this is a list rather than a single message.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ValidationErrors {
    messages: Vec<String>,
}

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one failure
    pub fn push(&mut self, message: impl Into<String>) {
        self.messages.push(message.into());
    }

    pub fn messages(&self) -> &[String] {
        &self.messages
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    /// `Ok(())` when nothing was recorded, otherwise `Err(self)`
    pub fn into_result(self) -> std::result::Result<(), ValidationErrors> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(self)
        }
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} validation error(s): {}", self.messages.len(), self.messages.join("; "))
    }
}

impl std::error::Error for ValidationErrors {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_errors_are_ok() {
        assert!(ValidationErrors::new().into_result().is_ok());
    }

    #[test]
    fn test_errors_collect_all_messages() {
        let mut errors = ValidationErrors::new();
        errors.push("PIA=-1, value seems out of range.");
        errors.push("Birth month=13, expecting value of between 1 and 12.");

        let err = ClagessError::from(errors.into_result().unwrap_err());
        let text = err.to_string();
        assert!(text.starts_with("2 validation error(s)"));
        assert!(text.contains("PIA=-1"));
        assert!(text.contains("Birth month=13"));
    }
}
