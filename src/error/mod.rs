// Error types for the meow interpreter
//
// The interpretation core is total over validated input and never fails.
// These errors cover the edges around it: decoding recordings, validating
// caller-supplied feature vectors, and loading ensemble model weights.

mod feature;
mod input;
mod model;

pub use feature::{log_feature_error, FeatureError};
pub use input::InputError;
pub use model::{log_model_error, ModelError};

/// Error codes for structured error reporting
///
/// Gives every error type a stable numeric code plus a human-readable
/// message, so CLI and JSON reports can surface failures consistently.
pub trait ErrorCode {
    /// Get the numeric error code
    fn code(&self) -> i32;

    /// Get the human-readable error message
    fn message(&self) -> String;
}
