// ConfidenceScorer - additive plausibility and richness score
//
// Points:
//   pitch in [100, 800] Hz          +20
//   duration in [0.2, 5.0] s        +15
//   centroid in [300, 6000] Hz      +15
//   details >= 5 (+20) or >= 3      +10
//   urgency extreme (+15) or High/Low (+10)
//   emotional state derived         +15
//   all three ranges plausible      +10
//
// Buckets: >= 85 Very High, >= 70 High, >= 50 Medium, >= 30 Low.

use crate::analysis::features::AcousticFeatures;
use crate::analysis::primary::PrimaryReading;
use crate::analysis::state::{ConfidenceLevel, UrgencyLevel};

/// Every signal the scorer reads, gathered in one place
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConfidenceInputs {
    pub avg_pitch_hz: f64,
    pub duration_seconds: f64,
    pub spectral_centroid_hz: f64,
    pub detail_count: usize,
    pub urgency_level: UrgencyLevel,
    pub state_is_derived: bool,
}

impl ConfidenceInputs {
    pub fn from_reading(features: &AcousticFeatures, reading: &PrimaryReading) -> Self {
        Self {
            avg_pitch_hz: features.avg_pitch_hz,
            duration_seconds: features.duration_seconds,
            spectral_centroid_hz: features.spectral_centroid_hz,
            detail_count: reading.details.len(),
            urgency_level: reading.urgency_level,
            state_is_derived: !reading.emotional_state.is_generic(),
        }
    }
}

/// Maximum attainable score
pub const MAX_SCORE: u32 = 110;

pub struct ConfidenceScorer;

impl ConfidenceScorer {
    /// Sum the point table for the given inputs
    pub fn score(inputs: &ConfidenceInputs) -> u32 {
        let mut score = 0;
        let mut plausible = 0;

        if (100.0..=800.0).contains(&inputs.avg_pitch_hz) {
            score += 20;
            plausible += 1;
        }
        if (0.2..=5.0).contains(&inputs.duration_seconds) {
            score += 15;
            plausible += 1;
        }
        if (300.0..=6000.0).contains(&inputs.spectral_centroid_hz) {
            score += 15;
            plausible += 1;
        }

        if inputs.detail_count >= 5 {
            score += 20;
        } else if inputs.detail_count >= 3 {
            score += 10;
        }

        score += match inputs.urgency_level {
            UrgencyLevel::VeryHigh | UrgencyLevel::VeryLow => 15,
            UrgencyLevel::High | UrgencyLevel::Low => 10,
            UrgencyLevel::Medium => 0,
        };

        if inputs.state_is_derived {
            score += 15;
        }
        if plausible == 3 {
            score += 10;
        }

        score
    }

    /// Discretize a score into a confidence bucket
    pub fn level(score: u32) -> ConfidenceLevel {
        if score >= 85 {
            ConfidenceLevel::VeryHigh
        } else if score >= 70 {
            ConfidenceLevel::High
        } else if score >= 50 {
            ConfidenceLevel::Medium
        } else if score >= 30 {
            ConfidenceLevel::Low
        } else {
            ConfidenceLevel::VeryLow
        }
    }

    /// Score and bucket in one step
    pub fn evaluate(inputs: &ConfidenceInputs) -> (u32, ConfidenceLevel) {
        let score = Self::score(inputs);
        (score, Self::level(score))
    }
}
