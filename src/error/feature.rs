// Feature extraction error types

use crate::error::ErrorCode;
use log::error;
use std::fmt;

/// Log a feature extraction error with structured context
pub fn log_feature_error(err: &FeatureError, context: &str) {
    error!(
        "Feature error in {}: code={}, component=FeatureExtractor, message={}",
        context,
        err.code(),
        err.message()
    );
}

/// Errors raised while turning a recording into acoustic features
///
/// Error code range: 1001-1005
#[derive(Debug, Clone, PartialEq)]
pub enum FeatureError {
    /// Recording could not be opened or read
    Io { path: String, reason: String },

    /// WAV payload could not be decoded
    Decode { reason: String },

    /// Sample format is not supported (e.g. 8-bit integer PCM)
    UnsupportedFormat { bits_per_sample: u16 },

    /// Recording contains no samples
    EmptyAudio,

    /// Recording is shorter than a single analysis frame
    TooShort { samples: usize, required: usize },
}

impl ErrorCode for FeatureError {
    fn code(&self) -> i32 {
        match self {
            FeatureError::Io { .. } => 1001,
            FeatureError::Decode { .. } => 1002,
            FeatureError::UnsupportedFormat { .. } => 1003,
            FeatureError::EmptyAudio => 1004,
            FeatureError::TooShort { .. } => 1005,
        }
    }

    fn message(&self) -> String {
        match self {
            FeatureError::Io { path, reason } => {
                format!("Failed to read {}: {}", path, reason)
            }
            FeatureError::Decode { reason } => format!("Failed to decode audio: {}", reason),
            FeatureError::UnsupportedFormat { bits_per_sample } => {
                format!("Unsupported bits per sample: {}", bits_per_sample)
            }
            FeatureError::EmptyAudio => "Recording contains no samples".to_string(),
            FeatureError::TooShort { samples, required } => format!(
                "Recording too short: {} samples (need at least {})",
                samples, required
            ),
        }
    }
}

impl fmt::Display for FeatureError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "FeatureError::{:?} (code {}): {}",
            self,
            self.code(),
            self.message()
        )
    }
}

impl std::error::Error for FeatureError {}

impl From<hound::Error> for FeatureError {
    fn from(err: hound::Error) -> Self {
        match err {
            hound::Error::IoError(io) => FeatureError::Io {
                path: String::from("<stream>"),
                reason: io.to_string(),
            },
            other => FeatureError::Decode {
                reason: other.to_string(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_feature_error_codes() {
        assert_eq!(FeatureError::EmptyAudio.code(), 1004);
        assert_eq!(
            FeatureError::TooShort {
                samples: 10,
                required: 2048
            }
            .code(),
            1005
        );
        assert_eq!(
            FeatureError::UnsupportedFormat { bits_per_sample: 8 }.code(),
            1003
        );
    }

    #[test]
    fn test_feature_error_display_includes_code() {
        let err = FeatureError::TooShort {
            samples: 10,
            required: 2048,
        };
        let text = err.to_string();
        assert!(text.contains("1005"));
        assert!(text.contains("2048"));
    }
}
