// PatternDetector - independent vocal pattern predicates
//
// Each pattern is a conjunction of feature-range checks. Predicates never
// suppress one another: a clip matching k predicates yields k tags.

use serde::{Deserialize, Serialize};

use crate::analysis::features::AcousticFeatures;
use crate::analysis::state::Strength;

/// Identifier of a detected vocal pattern
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PatternId {
    #[serde(rename = "trill_pattern")]
    Trill,
    #[serde(rename = "chirp_pattern")]
    Chirp,
    PurrMeowCombo,
    #[serde(rename = "yowling_pattern")]
    Yowling,
    SilentMeow,
    RapidSequence,
    #[serde(rename = "descending_pitch")]
    DescendingPitch,
    #[serde(rename = "ascending_pitch")]
    AscendingPitch,
    HarmonicRichness,
}

/// A pattern tag attached to an interpretation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VocalPattern {
    pub pattern: PatternId,
    pub description: String,
    pub confidence: Strength,
    pub behavioral_meaning: String,
}

struct PatternRule {
    id: PatternId,
    matches: fn(&AcousticFeatures) -> bool,
    description: &'static str,
    confidence: Strength,
    behavioral_meaning: &'static str,
}

const PATTERN_RULES: [PatternRule; 9] = [
    PatternRule {
        id: PatternId::Trill,
        matches: |f| {
            f.pitch_variation_hz > 80.0
                && f.duration_seconds > 0.5
                && f.spectral_centroid_hz > 2000.0
                && f.avg_pitch_hz > 200.0
                && f.zero_crossing_rate < 0.05
        },
        description: "Trill or chirrup - rolling, rising sound",
        confidence: Strength::High,
        behavioral_meaning: "Friendly greeting, often used to call kittens or humans to follow",
    },
    PatternRule {
        id: PatternId::Chirp,
        matches: |f| {
            f.duration_seconds < 0.4
                && f.avg_pitch_hz > 400.0
                && f.pitch_variation_hz > 60.0
                && f.spectral_centroid_hz > 3000.0
        },
        description: "Short, bird-like chirp",
        confidence: Strength::High,
        behavioral_meaning: "Excitement or hunting instinct, often directed at prey or toys",
    },
    PatternRule {
        id: PatternId::PurrMeowCombo,
        matches: |f| {
            f.zero_crossing_rate < 0.03
                && f.spectral_centroid_hz < 1500.0
                && f.duration_seconds > 0.8
                && f.avg_loudness > 0.03
                && f.pitch_variation_hz < 30.0
        },
        description: "Meow blended with purring undertones",
        confidence: Strength::Medium,
        behavioral_meaning: "Contented request, a polite ask from a relaxed cat",
    },
    PatternRule {
        id: PatternId::Yowling,
        matches: |f| {
            f.duration_seconds > 2.0
                && f.avg_pitch_hz > 300.0
                && f.pitch_variation_hz > 100.0
                && f.avg_loudness > 0.1
        },
        description: "Long, drawn-out yowl",
        confidence: Strength::High,
        behavioral_meaning: "Strong distress, territorial warning, or mating call",
    },
    PatternRule {
        id: PatternId::SilentMeow,
        matches: |f| {
            f.avg_loudness < 0.01 && f.duration_seconds > 0.3 && f.pitch_variation_hz < 20.0
        },
        description: "Nearly silent meow - mouth opens with little sound",
        confidence: Strength::Medium,
        behavioral_meaning: "Sign of deep trust and affection toward a bonded human",
    },
    PatternRule {
        id: PatternId::RapidSequence,
        matches: |f| {
            f.duration_seconds < 0.5 && f.avg_loudness > 0.08 && f.pitch_variation_hz > 40.0
        },
        description: "Short, loud, rapidly modulated call",
        confidence: Strength::Medium,
        behavioral_meaning: "Excitement or impatience, often part of a rapid series of meows",
    },
    PatternRule {
        id: PatternId::DescendingPitch,
        matches: |f| {
            f.pitch_variation_hz > 50.0
                && f.avg_pitch_hz > 250.0
                && f.spectral_centroid_hz < 2000.0
        },
        description: "Pitch falling over the course of the call",
        confidence: Strength::Low,
        behavioral_meaning: "Complaint or disappointment, a request that was not met",
    },
    PatternRule {
        id: PatternId::AscendingPitch,
        matches: |f| {
            f.pitch_variation_hz > 60.0
                && f.duration_seconds < 1.0
                && f.spectral_centroid_hz > 2500.0
        },
        description: "Pitch rising toward the end of the call",
        confidence: Strength::Low,
        behavioral_meaning: "Question-like inflection, curiosity or an invitation to interact",
    },
    PatternRule {
        id: PatternId::HarmonicRichness,
        matches: |f| {
            f.spectral_centroid_hz > 2000.0
                && f.spectral_centroid_hz < 4000.0
                && f.zero_crossing_rate < 0.06
                && f.pitch_variation_hz > 30.0
        },
        description: "Rich harmonic content with clear overtones",
        confidence: Strength::Medium,
        behavioral_meaning: "Confident, healthy vocalization from an engaged cat",
    },
];

/// Evaluates the fixed set of vocal pattern predicates
pub struct PatternDetector;

impl PatternDetector {
    /// Detect every pattern whose predicate holds, in table order
    pub fn detect(features: &AcousticFeatures) -> Vec<VocalPattern> {
        PATTERN_RULES
            .iter()
            .filter(|rule| (rule.matches)(features))
            .map(|rule| VocalPattern {
                pattern: rule.id,
                description: rule.description.to_string(),
                confidence: rule.confidence,
                behavioral_meaning: rule.behavioral_meaning.to_string(),
            })
            .collect()
    }
}
