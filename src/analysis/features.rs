// Features - input vectors for the interpretation core
//
// AcousticFeatures is the only required input. VisualFeatures is optional
// and only feeds the audio-visual correlation. Both are plain immutable
// records; FeatureValidator enforces the finite/non-negative precondition
// at the boundary so the core itself can stay total.

use serde::{Deserialize, Serialize};

use crate::error::InputError;

/// Acoustic summary of one vocalization clip or segment
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AcousticFeatures {
    /// Clip length in seconds (> 0)
    pub duration_seconds: f64,
    /// Mean pitch in Hz; 0 means no pitch was detected
    pub avg_pitch_hz: f64,
    /// Standard deviation of the per-frame pitch in Hz
    pub pitch_variation_hz: f64,
    /// Mean RMS amplitude (unitless, roughly 0..1)
    pub avg_loudness: f64,
    /// Standard deviation of the RMS amplitude
    pub loudness_variation: f64,
    /// Spectral centroid in Hz
    pub spectral_centroid_hz: f64,
    /// Zero-crossing rate (0..1), used as a roughness proxy
    pub zero_crossing_rate: f64,
}

impl AcousticFeatures {
    /// Build a feature vector from positional values
    ///
    /// Argument order follows the field order: duration, pitch, pitch
    /// variation, loudness, loudness variation, centroid, zcr.
    pub fn new(
        duration_seconds: f64,
        avg_pitch_hz: f64,
        pitch_variation_hz: f64,
        avg_loudness: f64,
        loudness_variation: f64,
        spectral_centroid_hz: f64,
        zero_crossing_rate: f64,
    ) -> Self {
        Self {
            duration_seconds,
            avg_pitch_hz,
            pitch_variation_hz,
            avg_loudness,
            loudness_variation,
            spectral_centroid_hz,
            zero_crossing_rate,
        }
    }

    /// Check the precondition required by the interpretation core
    pub fn validate(&self) -> Result<(), InputError> {
        FeatureValidator::validate(self)
    }

    /// Loudness in decibels relative to full scale amplitude
    ///
    /// Diagnostic only; no band reads it.
    pub fn loudness_db(&self) -> f64 {
        20.0 * (self.avg_loudness + 1e-10).log10()
    }
}

/// Coarse activity classification from the video collaborator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum ActivityLevel {
    Low,
    Medium,
    High,
    #[default]
    Unknown,
}

/// Motion and brightness summary of the paired video clip
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct VisualFeatures {
    pub duration_seconds: f64,
    pub avg_motion: f64,
    pub motion_std: f64,
    pub avg_brightness: f64,
    #[serde(default)]
    pub dominant_activity: ActivityLevel,
    /// Number of sampled frames that produced an activity reading
    #[serde(default)]
    pub activity_samples: u32,
}

/// Stateless validator for caller-supplied feature vectors
pub struct FeatureValidator;

impl FeatureValidator {
    /// Validate every acoustic field is finite and non-negative
    ///
    /// # Returns
    /// * `Ok(())` - Features satisfy the core precondition
    /// * `Err(InputError)` - First offending field
    pub fn validate(features: &AcousticFeatures) -> Result<(), InputError> {
        let fields = [
            ("duration_seconds", features.duration_seconds),
            ("avg_pitch_hz", features.avg_pitch_hz),
            ("pitch_variation_hz", features.pitch_variation_hz),
            ("avg_loudness", features.avg_loudness),
            ("loudness_variation", features.loudness_variation),
            ("spectral_centroid_hz", features.spectral_centroid_hz),
            ("zero_crossing_rate", features.zero_crossing_rate),
        ];

        for (field, value) in fields {
            Self::check_non_negative(field, value)?;
        }

        if features.duration_seconds <= 0.0 {
            return Err(InputError::NonPositiveDuration {
                value: features.duration_seconds,
            });
        }

        Ok(())
    }

    /// Validate the numeric fields of a visual feature vector
    pub fn validate_visual(visual: &VisualFeatures) -> Result<(), InputError> {
        let fields = [
            ("duration_seconds", visual.duration_seconds),
            ("avg_motion", visual.avg_motion),
            ("motion_std", visual.motion_std),
            ("avg_brightness", visual.avg_brightness),
        ];

        for (field, value) in fields {
            Self::check_non_negative(field, value)?;
        }
        Ok(())
    }

    fn check_non_negative(field: &'static str, value: f64) -> Result<(), InputError> {
        if !value.is_finite() {
            return Err(InputError::NonFinite { field, value });
        }
        if value < 0.0 {
            return Err(InputError::Negative { field, value });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;

    fn sample() -> AcousticFeatures {
        AcousticFeatures::new(1.0, 350.0, 40.0, 0.05, 0.03, 2000.0, 0.04)
    }

    #[test]
    fn test_valid_features_pass() {
        assert!(sample().validate().is_ok());
    }

    #[test]
    fn test_zero_pitch_is_valid() {
        let features = AcousticFeatures {
            avg_pitch_hz: 0.0,
            ..sample()
        };
        assert!(features.validate().is_ok());
    }

    #[test]
    fn test_nan_rejected() {
        let features = AcousticFeatures {
            spectral_centroid_hz: f64::NAN,
            ..sample()
        };
        let err = features.validate().unwrap_err();
        assert_eq!(err.code(), 2001);
    }

    #[test]
    fn test_negative_rejected() {
        let features = AcousticFeatures {
            avg_loudness: -0.1,
            ..sample()
        };
        assert_eq!(
            features.validate(),
            Err(InputError::Negative {
                field: "avg_loudness",
                value: -0.1
            })
        );
    }

    #[test]
    fn test_zero_duration_rejected() {
        let features = AcousticFeatures {
            duration_seconds: 0.0,
            ..sample()
        };
        assert_eq!(features.validate().unwrap_err().code(), 2003);
    }

    #[test]
    fn test_visual_defaults_when_fields_missing() {
        let json = r#"{"duration_seconds": 3.0, "avg_motion": 0.2, "motion_std": 0.1, "avg_brightness": 120.0}"#;
        let visual: VisualFeatures = serde_json::from_str(json).unwrap();
        assert_eq!(visual.dominant_activity, ActivityLevel::Unknown);
        assert_eq!(visual.activity_samples, 0);
        assert!(FeatureValidator::validate_visual(&visual).is_ok());
    }

    #[test]
    fn test_loudness_db_of_silence_is_finite() {
        let features = AcousticFeatures {
            avg_loudness: 0.0,
            ..sample()
        };
        assert!((features.loudness_db() - (-200.0)).abs() < 1e-6);
    }
}
