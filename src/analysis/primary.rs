// PrimaryInterpreter - cascading band classifier
//
// Walks six feature bands in a fixed order. Each band appends one detail
// and may update the shared emotional state, primary meaning, or urgency:
//
// 1. Duration           -> urgency_base
// 2. Pitch              -> baseline state and meaning (unconditional)
// 3. Pitch variation    -> upgrades a generic state
// 4. Loudness           -> urgency, refines a generic meaning
//    (loudness variation adds a detail only)
// 5. Spectral centroid  -> upgrades selected generic states
// 6. Roughness (ZCR)    -> unconditional distress override at the top band
//
// Thresholds within a band are strictly descending and the first match
// wins. Band order matters: swapping bands changes boundary outputs.

use tracing::trace;

use crate::analysis::features::AcousticFeatures;
use crate::analysis::state::{
    Baseline, EmotionKind, EmotionalState, PrimaryMeaning, UrgencyLevel,
};

/// Output of the cascading classifier before confidence is attached
#[derive(Debug, Clone, PartialEq)]
pub struct PrimaryReading {
    pub primary_meaning: PrimaryMeaning,
    pub emotional_state: EmotionalState,
    /// Urgency suggested by duration alone
    pub urgency_base: UrgencyLevel,
    /// Final urgency after the loudness band
    pub urgency_level: UrgencyLevel,
    /// Band details in evaluation order
    pub details: Vec<String>,
}

/// Centroid upgrade allow-lists
const BRIGHT_UPGRADABLE: [Baseline; 3] = [
    Baseline::AttentionSeeking,
    Baseline::SocialFriendly,
    Baseline::Neutral,
];
const FRIENDLY_OR_NEUTRAL: [Baseline; 2] = [Baseline::SocialFriendly, Baseline::Neutral];
const MELLOW_UPGRADABLE: [Baseline; 3] = [
    Baseline::SocialFriendly,
    Baseline::Neutral,
    Baseline::SeriousAssertive,
];

/// Distress phrase set by the roughness override
pub const DISTRESS_MEANING: &str = "Possible distress or discomfort - monitor closely";

/// Rule-based interpreter for acoustic features
pub struct PrimaryInterpreter;

impl PrimaryInterpreter {
    /// Classify a validated feature vector
    ///
    /// Pure and total: every band ends in an `else`, so any finite,
    /// non-negative input produces a reading.
    ///
    /// # Arguments
    /// * `features` - Acoustic features of one clip
    ///
    /// # Returns
    /// PrimaryReading with state, meaning, urgency and ordered details
    pub fn classify(features: &AcousticFeatures) -> PrimaryReading {
        let mut details = Vec::with_capacity(8);

        let urgency_base = Self::duration_band(features.duration_seconds, &mut details);
        let (mut state, mut meaning) = Self::pitch_band(features.avg_pitch_hz, &mut details);
        state = Self::variation_band(features.pitch_variation_hz, state, &mut details);

        let (urgency_level, refined) =
            Self::loudness_band(features.avg_loudness, urgency_base, meaning, &mut details);
        meaning = refined;
        Self::loudness_variation_detail(features.loudness_variation, &mut details);

        state = Self::centroid_band(features.spectral_centroid_hz, state, &mut details);
        let (state, meaning) =
            Self::roughness_band(features.zero_crossing_rate, state, meaning, &mut details);

        trace!(
            state = state.label(),
            meaning = %meaning,
            urgency = urgency_level.label(),
            details = details.len(),
            "primary reading"
        );

        PrimaryReading {
            primary_meaning: meaning,
            emotional_state: state,
            urgency_base,
            urgency_level,
            details,
        }
    }

    fn duration_band(duration: f64, details: &mut Vec<String>) -> UrgencyLevel {
        if duration < 0.3 {
            details.push(format!(
                "Very short vocalization ({:.2}s) - chirp-like greeting or acknowledgment",
                duration
            ));
            UrgencyLevel::VeryLow
        } else if duration < 0.8 {
            details.push(format!(
                "Short meow ({:.2}s) - casual greeting or quick request",
                duration
            ));
            UrgencyLevel::Low
        } else if duration < 1.5 {
            details.push(format!(
                "Medium-length meow ({:.2}s) - general conversation",
                duration
            ));
            UrgencyLevel::Medium
        } else if duration < 3.0 {
            details.push(format!(
                "Long meow ({:.2}s) - strong desire or persistent request",
                duration
            ));
            UrgencyLevel::High
        } else {
            details.push(format!(
                "Very long vocalization ({:.2}s) - sustained complaint or strong demand",
                duration
            ));
            UrgencyLevel::VeryHigh
        }
    }

    fn pitch_band(pitch: f64, details: &mut Vec<String>) -> (EmotionalState, PrimaryMeaning) {
        if pitch > 600.0 {
            details.push(format!(
                "Very high pitch ({:.0} Hz) - kitten-like, urgent attention seeking",
                pitch
            ));
            (
                EmotionalState::Generic(Baseline::AttentionSeeking),
                PrimaryMeaning::derived("Demanding attention or food"),
            )
        } else if pitch > 400.0 {
            details.push(format!(
                "High pitch ({:.0} Hz) - friendly, seeking interaction",
                pitch
            ));
            (
                EmotionalState::Generic(Baseline::SocialFriendly),
                PrimaryMeaning::generic("Friendly greeting or request"),
            )
        } else if pitch > 250.0 {
            details.push(format!(
                "Medium pitch ({:.0} Hz) - typical adult communication",
                pitch
            ));
            (
                EmotionalState::Generic(Baseline::Neutral),
                PrimaryMeaning::generic("General communication"),
            )
        } else if pitch > 150.0 {
            details.push(format!(
                "Low pitch ({:.0} Hz) - serious, assertive tone",
                pitch
            ));
            (
                EmotionalState::Generic(Baseline::SeriousAssertive),
                PrimaryMeaning::generic("Assertive request"),
            )
        } else {
            if pitch == 0.0 {
                details.push(
                    "No clear pitch detected - breathy or unvoiced vocalization".to_string(),
                );
            } else {
                details.push(format!(
                    "Very low pitch ({:.0} Hz) - complaining or displeased",
                    pitch
                ));
            }
            (
                EmotionalState::Generic(Baseline::SeriousComplaining),
                PrimaryMeaning::derived("Complaint or discomfort"),
            )
        }
    }

    fn variation_band(
        variation: f64,
        state: EmotionalState,
        details: &mut Vec<String>,
    ) -> EmotionalState {
        if variation > 100.0 {
            details.push(format!(
                "Extreme pitch variation ({:.0} Hz) - highly emotional or urgent",
                variation
            ));
            state.upgrade_generic(EmotionKind::UrgentAnxious)
        } else if variation > 50.0 {
            details.push(format!(
                "High pitch variation ({:.0} Hz) - expressive, emotional meow",
                variation
            ));
            state.upgrade_generic(EmotionKind::ExpressiveEmotional)
        } else if variation > 25.0 {
            details.push(format!(
                "Moderate pitch variation ({:.0} Hz) - conversational intonation",
                variation
            ));
            state
        } else if variation > 10.0 {
            details.push(format!(
                "Stable pitch ({:.0} Hz variation) - calm, controlled communication",
                variation
            ));
            state.upgrade_from(&[Baseline::Neutral], EmotionKind::CalmControlled)
        } else {
            details.push("Monotone pitch - flat, minimal inflection".to_string());
            state
        }
    }

    fn loudness_band(
        loudness: f64,
        urgency_base: UrgencyLevel,
        meaning: PrimaryMeaning,
        details: &mut Vec<String>,
    ) -> (UrgencyLevel, PrimaryMeaning) {
        if loudness > 0.15 {
            details.push(format!(
                "Very loud meow (amplitude {:.3}) - urgent demand",
                loudness
            ));
            (UrgencyLevel::VeryHigh, meaning.refine("Urgent demand for attention"))
        } else if loudness > 0.08 {
            details.push(format!(
                "Loud meow (amplitude {:.3}) - demanding attention",
                loudness
            ));
            (UrgencyLevel::High, meaning.refine("Demanding attention"))
        } else if loudness > 0.04 {
            details.push(format!(
                "Moderate volume (amplitude {:.3}) - normal communication",
                loudness
            ));
            (urgency_base, meaning)
        } else if loudness > 0.02 {
            details.push(format!(
                "Quiet meow (amplitude {:.3}) - gentle request",
                loudness
            ));
            (UrgencyLevel::Low, meaning.refine("Gentle request or greeting"))
        } else {
            details.push(format!(
                "Very quiet vocalization (amplitude {:.3}) - soft, intimate communication",
                loudness
            ));
            (
                UrgencyLevel::Low,
                meaning.refine("Soft acknowledgment or contentment"),
            )
        }
    }

    fn loudness_variation_detail(variation: f64, details: &mut Vec<String>) {
        if variation > 0.05 {
            details.push("Highly variable intensity - fluctuating emotional state".to_string());
        } else if variation < 0.02 {
            details.push("Steady intensity - consistent, controlled delivery".to_string());
        }
    }

    fn centroid_band(
        centroid: f64,
        state: EmotionalState,
        details: &mut Vec<String>,
    ) -> EmotionalState {
        if centroid > 4000.0 {
            details.push(format!(
                "Very bright, sharp tone ({:.0} Hz) - highly alert or excited",
                centroid
            ));
            state.upgrade_from(&BRIGHT_UPGRADABLE, EmotionKind::AlertExcited)
        } else if centroid > 2500.0 {
            details.push(format!(
                "Bright tone ({:.0} Hz) - alert and engaged",
                centroid
            ));
            state.upgrade_from(&FRIENDLY_OR_NEUTRAL, EmotionKind::AlertExcited)
        } else if centroid > 1800.0 {
            details.push(format!(
                "Balanced tone ({:.0} Hz) - normal vocal quality",
                centroid
            ));
            state
        } else if centroid > 1200.0 {
            details.push(format!(
                "Warm tone ({:.0} Hz) - relaxed and comfortable",
                centroid
            ));
            state.upgrade_from(&FRIENDLY_OR_NEUTRAL, EmotionKind::RelaxedContent)
        } else {
            details.push(format!(
                "Mellow, dark tone ({:.0} Hz) - very relaxed or content",
                centroid
            ));
            state.upgrade_from(&MELLOW_UPGRADABLE, EmotionKind::RelaxedContent)
        }
    }

    fn roughness_band(
        zcr: f64,
        state: EmotionalState,
        meaning: PrimaryMeaning,
        details: &mut Vec<String>,
    ) -> (EmotionalState, PrimaryMeaning) {
        if zcr > 0.15 {
            details.push(format!(
                "Very rough, raspy voice (ZCR {:.3}) - possible distress or illness",
                zcr
            ));
            (
                EmotionalState::Derived(EmotionKind::DistressedUnwell),
                PrimaryMeaning::derived(DISTRESS_MEANING),
            )
        } else if zcr > 0.08 {
            details.push(format!(
                "Slightly rough voice (ZCR {:.3}) - mild strain or excitement",
                zcr
            ));
            let meaning = if meaning.mentions("demand") {
                PrimaryMeaning::derived("Insistent demand with vocal strain")
            } else if meaning.mentions("greeting") {
                PrimaryMeaning::derived("Greeting with a slightly hoarse voice")
            } else {
                meaning
            };
            (state, meaning)
        } else if zcr > 0.04 {
            details.push("Normal vocal texture".to_string());
            (state, meaning)
        } else {
            details.push("Smooth, clear tone - healthy vocal quality".to_string());
            (state, meaning)
        }
    }
}

#[cfg(test)]
#[path = "primary_tests.rs"]
mod tests;
