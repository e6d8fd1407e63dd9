// HealthAssessor - vocal health flags
//
// Roughness is a top-down band (> 0.12 high, > 0.08 mild). Strain, low
// energy, pitch control and age-related checks are independent.

use serde::{Deserialize, Serialize};

use crate::analysis::features::AcousticFeatures;
use crate::analysis::state::Strength;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HealthCategory {
    VocalRoughness,
    VocalStrain,
    LowEnergy,
    PitchControl,
    AgeRelated,
}

/// A health flag attached to an interpretation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthIndicator {
    pub category: HealthCategory,
    pub severity: Strength,
    pub description: String,
    pub recommendation: String,
}

impl HealthIndicator {
    fn new(
        category: HealthCategory,
        severity: Strength,
        description: &str,
        recommendation: &str,
    ) -> Self {
        Self {
            category,
            severity,
            description: description.to_string(),
            recommendation: recommendation.to_string(),
        }
    }
}

/// Evaluates health predicates over acoustic features
pub struct HealthAssessor;

impl HealthAssessor {
    /// Emit health indicators in fixed order
    pub fn assess(features: &AcousticFeatures) -> Vec<HealthIndicator> {
        let mut indicators = Vec::new();

        if features.zero_crossing_rate > 0.12 {
            indicators.push(HealthIndicator::new(
                HealthCategory::VocalRoughness,
                Strength::High,
                "Pronounced roughness or raspiness in the voice",
                "Schedule a veterinary check to rule out respiratory infection",
            ));
        } else if features.zero_crossing_rate > 0.08 {
            indicators.push(HealthIndicator::new(
                HealthCategory::VocalRoughness,
                Strength::Low,
                "Mild roughness in the voice",
                "Monitor for changes; mild hoarseness can follow heavy vocalizing",
            ));
        }

        if features.avg_loudness > 0.15 && features.loudness_variation > 0.05 {
            indicators.push(HealthIndicator::new(
                HealthCategory::VocalStrain,
                Strength::Medium,
                "Loud, highly variable calls may strain the voice",
                "Look for the cause of persistent loud calling and address it",
            ));
        }

        if features.avg_loudness < 0.02 && features.spectral_centroid_hz < 1000.0 {
            indicators.push(HealthIndicator::new(
                HealthCategory::LowEnergy,
                Strength::Medium,
                "Very weak, dull vocalization",
                "Watch appetite and activity; consult a vet if lethargy persists",
            ));
        }

        if features.pitch_variation_hz > 150.0 && features.duration_seconds > 1.0 {
            indicators.push(HealthIndicator::new(
                HealthCategory::PitchControl,
                Strength::Medium,
                "Unusually unstable pitch over a long call",
                "Note when this occurs; sudden changes in voice control deserve a vet visit",
            ));
        }

        if features.avg_pitch_hz < 150.0
            && features.zero_crossing_rate > 0.06
            && features.spectral_centroid_hz < 1200.0
        {
            indicators.push(HealthIndicator::new(
                HealthCategory::AgeRelated,
                Strength::Low,
                "Low, slightly rough voice consistent with an older cat",
                "Regular senior wellness checks are recommended",
            ));
        }

        indicators
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn categories(features: &AcousticFeatures) -> Vec<(HealthCategory, Strength)> {
        HealthAssessor::assess(features)
            .into_iter()
            .map(|h| (h.category, h.severity))
            .collect()
    }

    #[test]
    fn test_roughness_bands_are_exclusive() {
        let high = AcousticFeatures::new(1.0, 300.0, 20.0, 0.05, 0.03, 2000.0, 0.13);
        assert_eq!(
            categories(&high),
            vec![(HealthCategory::VocalRoughness, Strength::High)]
        );

        let mild = AcousticFeatures::new(1.0, 300.0, 20.0, 0.05, 0.03, 2000.0, 0.1);
        assert_eq!(
            categories(&mild),
            vec![(HealthCategory::VocalRoughness, Strength::Low)]
        );

        let boundary = AcousticFeatures::new(1.0, 300.0, 20.0, 0.05, 0.03, 2000.0, 0.08);
        assert!(categories(&boundary).is_empty());
    }

    #[test]
    fn test_independent_checks_accumulate() {
        // Strain + pitch control + high roughness together
        let features = AcousticFeatures::new(2.0, 400.0, 160.0, 0.2, 0.06, 2000.0, 0.14);
        assert_eq!(
            categories(&features),
            vec![
                (HealthCategory::VocalRoughness, Strength::High),
                (HealthCategory::VocalStrain, Strength::Medium),
                (HealthCategory::PitchControl, Strength::Medium),
            ]
        );
    }

    #[test]
    fn test_low_energy_and_age_related() {
        let features = AcousticFeatures::new(1.0, 120.0, 10.0, 0.01, 0.005, 900.0, 0.07);
        assert_eq!(
            categories(&features),
            vec![
                (HealthCategory::LowEnergy, Strength::Medium),
                (HealthCategory::AgeRelated, Strength::Low),
            ]
        );
    }

    #[test]
    fn test_all_zero_features_flag_low_energy() {
        let features = AcousticFeatures::new(1.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0);
        assert_eq!(
            categories(&features),
            vec![(HealthCategory::LowEnergy, Strength::Medium)]
        );
    }
}
