// CombinedBehavior - audio-visual correlation
//
// Pairs the acoustic reading with the dominant activity from video.
// Without visual features the result keeps its Unknown defaults.

use serde::{Deserialize, Serialize};

use crate::analysis::features::{ActivityLevel, VisualFeatures};
use crate::analysis::state::{
    Baseline, ConfidenceLevel, EmotionKind, EmotionalState, UrgencyLevel,
};

const UNKNOWN: &str = "Unknown";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CombinedBehavior {
    pub overall_mood: String,
    pub behavior_pattern: String,
    pub recommendations: Vec<String>,
    pub confidence: ConfidenceLevel,
}

impl Default for CombinedBehavior {
    fn default() -> Self {
        Self {
            overall_mood: UNKNOWN.to_string(),
            behavior_pattern: UNKNOWN.to_string(),
            recommendations: Vec::new(),
            confidence: ConfidenceLevel::Low,
        }
    }
}

/// Minimum sampled frames for a High combined confidence
const MIN_ACTIVITY_SAMPLES: u32 = 5;

impl CombinedBehavior {
    /// Correlate the acoustic reading with optional visual activity
    ///
    /// # Arguments
    /// * `state` - Final emotional state from the primary interpreter
    /// * `urgency` - Final urgency level
    /// * `confidence` - Acoustic confidence bucket
    /// * `visual` - Visual features, if a video was analyzed
    pub fn correlate(
        state: EmotionalState,
        urgency: UrgencyLevel,
        confidence: ConfidenceLevel,
        visual: Option<&VisualFeatures>,
    ) -> Self {
        let Some(visual) = visual else {
            return Self::default();
        };

        let mut combined = Self::default();
        let activity = visual.dominant_activity;

        match state {
            EmotionalState::Generic(Baseline::AttentionSeeking | Baseline::SocialFriendly) => {
                match activity {
                    ActivityLevel::High => combined.set(
                        "Playful and attention-seeking",
                        "Active communication",
                        &["Engage in interactive play"],
                    ),
                    ActivityLevel::Low => combined.set(
                        "Calm but wanting attention",
                        "Gentle request",
                        &["Provide gentle petting or attention"],
                    ),
                    ActivityLevel::Medium | ActivityLevel::Unknown => {}
                }
            }
            EmotionalState::Derived(EmotionKind::DistressedUnwell) => {
                if activity == ActivityLevel::High {
                    combined.set(
                        "Agitated and distressed",
                        "Stress response",
                        &[
                            "Check for sources of stress",
                            "Consider veterinary consultation",
                            "Provide calm environment",
                        ],
                    );
                } else {
                    combined.set(
                        "Quietly distressed",
                        "Subdued distress",
                        &["Monitor closely", "Check for illness signs"],
                    );
                }
            }
            _ if urgency >= UrgencyLevel::High => combined.set(
                "Demanding and urgent",
                "High-priority communication",
                &[
                    "Address immediate needs (food, water, litter)",
                    "Check for any urgent issues",
                ],
            ),
            _ => {}
        }

        combined.confidence = if confidence >= ConfidenceLevel::High
            && visual.activity_samples > MIN_ACTIVITY_SAMPLES
        {
            ConfidenceLevel::High
        } else if confidence >= ConfidenceLevel::Medium {
            ConfidenceLevel::Medium
        } else {
            ConfidenceLevel::Low
        };

        combined
    }

    fn set(&mut self, mood: &str, pattern: &str, recommendations: &[&str]) {
        self.overall_mood = mood.to_string();
        self.behavior_pattern = pattern.to_string();
        self.recommendations = recommendations.iter().map(|r| r.to_string()).collect();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn visual(activity: ActivityLevel, samples: u32) -> VisualFeatures {
        VisualFeatures {
            duration_seconds: 5.0,
            avg_motion: 0.4,
            motion_std: 0.1,
            avg_brightness: 110.0,
            dominant_activity: activity,
            activity_samples: samples,
        }
    }

    #[test]
    fn test_no_visual_keeps_unknown_defaults() {
        let combined = CombinedBehavior::correlate(
            EmotionalState::Generic(Baseline::AttentionSeeking),
            UrgencyLevel::VeryHigh,
            ConfidenceLevel::VeryHigh,
            None,
        );
        assert_eq!(combined, CombinedBehavior::default());
        assert_eq!(combined.overall_mood, "Unknown");
    }

    #[test]
    fn test_attention_seeking_with_high_activity() {
        let v = visual(ActivityLevel::High, 10);
        let combined = CombinedBehavior::correlate(
            EmotionalState::Generic(Baseline::SocialFriendly),
            UrgencyLevel::Low,
            ConfidenceLevel::High,
            Some(&v),
        );
        assert_eq!(combined.overall_mood, "Playful and attention-seeking");
        assert_eq!(combined.confidence, ConfidenceLevel::High);
    }

    #[test]
    fn test_distress_without_activity_is_subdued() {
        let v = visual(ActivityLevel::Medium, 3);
        let combined = CombinedBehavior::correlate(
            EmotionalState::Derived(EmotionKind::DistressedUnwell),
            UrgencyLevel::High,
            ConfidenceLevel::High,
            Some(&v),
        );
        assert_eq!(combined.behavior_pattern, "Subdued distress");
        assert_eq!(combined.recommendations.len(), 2);
        // Too few activity samples for High
        assert_eq!(combined.confidence, ConfidenceLevel::Medium);
    }

    #[test]
    fn test_high_urgency_fallback() {
        let v = visual(ActivityLevel::Low, 8);
        let combined = CombinedBehavior::correlate(
            EmotionalState::Derived(EmotionKind::UrgentAnxious),
            UrgencyLevel::VeryHigh,
            ConfidenceLevel::Low,
            Some(&v),
        );
        assert_eq!(combined.overall_mood, "Demanding and urgent");
        assert_eq!(combined.confidence, ConfidenceLevel::Low);
    }

    #[test]
    fn test_attention_seeking_with_medium_activity_stays_unknown() {
        let v = visual(ActivityLevel::Medium, 8);
        let combined = CombinedBehavior::correlate(
            EmotionalState::Generic(Baseline::AttentionSeeking),
            UrgencyLevel::VeryHigh,
            ConfidenceLevel::Medium,
            Some(&v),
        );
        assert_eq!(combined.overall_mood, "Unknown");
        assert_eq!(combined.confidence, ConfidenceLevel::Medium);
    }
}
