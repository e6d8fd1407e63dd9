// Ensemble model loading error types

use crate::error::ErrorCode;
use log::error;
use std::fmt;

/// Log a model error with structured context
///
/// Model failures are never fatal: the ensemble degrades to its heuristic
/// fallback, so these are reported and then swallowed by the caller.
pub fn log_model_error(err: &ModelError, context: &str) {
    error!(
        "Model error in {}: code={}, component=EnsembleAdapter, message={}",
        context,
        err.code(),
        err.message()
    );
}

/// Errors raised while loading trained model weights
///
/// Error code range: 3001-3003
#[derive(Debug, Clone, PartialEq)]
pub enum ModelError {
    /// Weight file could not be read
    Read { path: String, reason: String },

    /// Weight file is not valid JSON for a linear model
    Parse { path: String, reason: String },

    /// Weight matrix dimensions disagree with labels or feature names
    Shape { model: String, reason: String },
}

impl ErrorCode for ModelError {
    fn code(&self) -> i32 {
        match self {
            ModelError::Read { .. } => 3001,
            ModelError::Parse { .. } => 3002,
            ModelError::Shape { .. } => 3003,
        }
    }

    fn message(&self) -> String {
        match self {
            ModelError::Read { path, reason } => {
                format!("Failed to read model weights {}: {}", path, reason)
            }
            ModelError::Parse { path, reason } => {
                format!("Failed to parse model weights {}: {}", path, reason)
            }
            ModelError::Shape { model, reason } => {
                format!("Model '{}' has inconsistent shape: {}", model, reason)
            }
        }
    }
}

impl fmt::Display for ModelError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "ModelError::{:?} (code {}): {}",
            self,
            self.code(),
            self.message()
        )
    }
}

impl std::error::Error for ModelError {}
