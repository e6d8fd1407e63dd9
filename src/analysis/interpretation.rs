// Interpretation - the frozen output record of the core
//
// Field names are stable JSON keys consumed by report and presentation
// layers. Built once by `analysis::interpret`, never mutated afterwards.

use serde::{Deserialize, Serialize};

use crate::analysis::behavior::CombinedBehavior;
use crate::analysis::context::ContextIndicator;
use crate::analysis::features::AcousticFeatures;
use crate::analysis::health::HealthIndicator;
use crate::analysis::insights::BehavioralInsight;
use crate::analysis::patterns::VocalPattern;
use crate::analysis::state::{ConfidenceLevel, EmotionalState, PrimaryMeaning, UrgencyLevel};

/// Rounded echo of the input features
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AcousticMetrics {
    pub duration_ms: f64,
    pub pitch_hz: f64,
    pub pitch_variation_hz: f64,
    pub loudness_rms: f64,
    /// Diagnostic only
    pub loudness_db: f64,
    pub loudness_variation: f64,
    pub spectral_centroid_hz: f64,
    pub zero_crossing_rate: f64,
}

fn round_to(value: f64, places: i32) -> f64 {
    let factor = 10f64.powi(places);
    (value * factor).round() / factor
}

impl AcousticMetrics {
    pub fn from_features(features: &AcousticFeatures) -> Self {
        Self {
            duration_ms: round_to(features.duration_seconds * 1000.0, 1),
            pitch_hz: round_to(features.avg_pitch_hz, 1),
            pitch_variation_hz: round_to(features.pitch_variation_hz, 1),
            loudness_rms: round_to(features.avg_loudness, 4),
            loudness_db: round_to(features.loudness_db(), 1),
            loudness_variation: round_to(features.loudness_variation, 4),
            spectral_centroid_hz: round_to(features.spectral_centroid_hz, 1),
            zero_crossing_rate: round_to(features.zero_crossing_rate, 4),
        }
    }
}

/// Complete interpretation of one clip
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Interpretation {
    pub primary_meaning: PrimaryMeaning,
    pub emotional_state: EmotionalState,
    pub urgency_level: UrgencyLevel,
    pub confidence: ConfidenceLevel,
    /// Raw confidence points, used for best-of-N selection
    pub confidence_score: u32,
    pub details: Vec<String>,
    pub vocal_patterns: Vec<VocalPattern>,
    pub contextual_indicators: Vec<ContextIndicator>,
    pub health_indicators: Vec<HealthIndicator>,
    pub behavioral_insights: Vec<BehavioralInsight>,
    pub acoustic_metrics: AcousticMetrics,
    #[serde(default)]
    pub combined_behavior: CombinedBehavior,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metrics_are_rounded() {
        let features = AcousticFeatures::new(
            0.123456, 345.678, 12.345, 0.123456, 0.0345678, 2345.678, 0.0456789,
        );
        let metrics = AcousticMetrics::from_features(&features);
        assert_eq!(metrics.duration_ms, 123.5);
        assert_eq!(metrics.pitch_hz, 345.7);
        assert_eq!(metrics.loudness_rms, 0.1235);
        assert_eq!(metrics.loudness_variation, 0.0346);
        assert_eq!(metrics.zero_crossing_rate, 0.0457);
        assert_eq!(metrics.loudness_db, -18.2);
    }
}
