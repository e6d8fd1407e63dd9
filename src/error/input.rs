// Input validation error types

use crate::error::ErrorCode;
use std::fmt;

/// Feature vectors rejected before they reach the interpretation core
///
/// Error code range: 2001-2003
#[derive(Debug, Clone, PartialEq)]
pub enum InputError {
    /// Feature value is NaN or infinite
    NonFinite { field: &'static str, value: f64 },

    /// Feature value is negative
    Negative { field: &'static str, value: f64 },

    /// Clip duration must be strictly positive
    NonPositiveDuration { value: f64 },
}

impl ErrorCode for InputError {
    fn code(&self) -> i32 {
        match self {
            InputError::NonFinite { .. } => 2001,
            InputError::Negative { .. } => 2002,
            InputError::NonPositiveDuration { .. } => 2003,
        }
    }

    fn message(&self) -> String {
        match self {
            InputError::NonFinite { field, value } => {
                format!("{} must be finite (got {})", field, value)
            }
            InputError::Negative { field, value } => {
                format!("{} must be non-negative (got {})", field, value)
            }
            InputError::NonPositiveDuration { value } => {
                format!("duration_seconds must be greater than 0 (got {})", value)
            }
        }
    }
}

impl fmt::Display for InputError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "InputError::{:?} (code {}): {}",
            self,
            self.code(),
            self.message()
        )
    }
}

impl std::error::Error for InputError {}
