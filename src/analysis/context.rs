// ContextAnalyzer - timing, urgency-cluster and breathing indicators
//
// Three independent groups, each internally exclusive:
// - timing: morning demand or evening social (at most one)
// - urgency cluster: high or moderate (at most one)
// - breathing: irregular or controlled (at most one)

use serde::{Deserialize, Serialize};

use crate::analysis::features::AcousticFeatures;

/// Identifier of a contextual indicator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContextId {
    MorningDemand,
    EveningSocial,
    HighUrgencyCluster,
    ModerateUrgencyCluster,
    IrregularBreathing,
    ControlledBreathing,
}

/// A contextual tag attached to an interpretation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContextIndicator {
    pub context: ContextId,
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub likely_timing: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub urgency_level: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub health_concern: Option<String>,
}

impl ContextIndicator {
    fn new(context: ContextId, description: &str) -> Self {
        Self {
            context,
            description: description.to_string(),
            likely_timing: None,
            urgency_level: None,
            health_concern: None,
        }
    }
}

/// Result of the weighted urgency-cluster predicate
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UrgencyCluster {
    High,
    Moderate,
    None,
}

/// Evaluates timing, urgency-cluster and breathing predicates
pub struct ContextAnalyzer;

impl ContextAnalyzer {
    /// Emit context indicators in group order: timing, urgency, breathing
    pub fn analyze(features: &AcousticFeatures) -> Vec<ContextIndicator> {
        let mut indicators = Vec::new();

        if features.avg_loudness > 0.1
            && features.avg_pitch_hz > 350.0
            && features.duration_seconds < 1.0
        {
            let mut indicator = ContextIndicator::new(
                ContextId::MorningDemand,
                "Loud, high, short call typical of breakfast demands",
            );
            indicator.likely_timing = Some("morning".to_string());
            indicators.push(indicator);
        } else if features.avg_pitch_hz < 300.0
            && features.pitch_variation_hz > 40.0
            && features.duration_seconds > 0.5
            && features.spectral_centroid_hz > 1500.0
            && features.spectral_centroid_hz < 3000.0
        {
            let mut indicator = ContextIndicator::new(
                ContextId::EveningSocial,
                "Low, melodic, conversational call typical of evening socializing",
            );
            indicator.likely_timing = Some("evening".to_string());
            indicators.push(indicator);
        }

        let score = Self::urgency_score(features);
        match Self::urgency_cluster(score) {
            UrgencyCluster::High => {
                let mut indicator = ContextIndicator::new(
                    ContextId::HighUrgencyCluster,
                    "Several urgency markers present at once",
                );
                indicator.urgency_level = Some(format!("high (score {})", score));
                indicators.push(indicator);
            }
            UrgencyCluster::Moderate => {
                let mut indicator = ContextIndicator::new(
                    ContextId::ModerateUrgencyCluster,
                    "Some urgency markers present",
                );
                indicator.urgency_level = Some(format!("moderate (score {})", score));
                indicators.push(indicator);
            }
            UrgencyCluster::None => {}
        }

        if features.loudness_variation > 0.04 && features.zero_crossing_rate > 0.08 {
            let mut indicator = ContextIndicator::new(
                ContextId::IrregularBreathing,
                "Uneven intensity with a rough texture suggests irregular breathing",
            );
            indicator.health_concern =
                Some("possible respiratory stress or strong agitation".to_string());
            indicators.push(indicator);
        } else if features.loudness_variation < 0.02 && features.zero_crossing_rate < 0.04 {
            indicators.push(ContextIndicator::new(
                ContextId::ControlledBreathing,
                "Steady, smooth delivery suggests calm, controlled breathing",
            ));
        }

        indicators
    }

    /// Weighted sum of urgency markers
    ///
    /// loudness > 0.08 (+2), duration < 0.5 (+1), pitch variation > 50 (+2),
    /// pitch > 400 (+1)
    pub fn urgency_score(features: &AcousticFeatures) -> u32 {
        let mut score = 0;
        if features.avg_loudness > 0.08 {
            score += 2;
        }
        if features.duration_seconds < 0.5 {
            score += 1;
        }
        if features.pitch_variation_hz > 50.0 {
            score += 2;
        }
        if features.avg_pitch_hz > 400.0 {
            score += 1;
        }
        score
    }

    pub fn urgency_cluster(score: u32) -> UrgencyCluster {
        if score >= 4 {
            UrgencyCluster::High
        } else if score >= 2 {
            UrgencyCluster::Moderate
        } else {
            UrgencyCluster::None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn contexts(features: &AcousticFeatures) -> Vec<ContextId> {
        ContextAnalyzer::analyze(features)
            .into_iter()
            .map(|c| c.context)
            .collect()
    }

    #[test]
    fn test_morning_demand_with_high_urgency() {
        let features = AcousticFeatures::new(0.6, 450.0, 60.0, 0.12, 0.03, 2500.0, 0.05);
        assert_eq!(
            contexts(&features),
            vec![ContextId::MorningDemand, ContextId::HighUrgencyCluster]
        );
        let morning = &ContextAnalyzer::analyze(&features)[0];
        assert_eq!(morning.likely_timing.as_deref(), Some("morning"));
    }

    #[test]
    fn test_timing_tags_are_exclusive() {
        // Satisfies the evening predicate, morning fails on pitch
        let features = AcousticFeatures::new(0.8, 280.0, 45.0, 0.12, 0.03, 2000.0, 0.05);
        let found = contexts(&features);
        assert!(found.contains(&ContextId::EveningSocial));
        assert!(!found.contains(&ContextId::MorningDemand));
    }

    #[test]
    fn test_urgency_score_weights() {
        let features = AcousticFeatures::new(0.3, 450.0, 60.0, 0.1, 0.03, 2000.0, 0.05);
        assert_eq!(ContextAnalyzer::urgency_score(&features), 6);

        let quiet = AcousticFeatures::new(0.3, 200.0, 60.0, 0.01, 0.03, 2000.0, 0.05);
        assert_eq!(ContextAnalyzer::urgency_score(&quiet), 3);
        assert_eq!(ContextAnalyzer::urgency_cluster(3), UrgencyCluster::Moderate);
        assert_eq!(ContextAnalyzer::urgency_cluster(1), UrgencyCluster::None);
        assert_eq!(ContextAnalyzer::urgency_cluster(4), UrgencyCluster::High);
    }

    #[test]
    fn test_breathing_irregular_takes_precedence() {
        let irregular = AcousticFeatures::new(1.0, 300.0, 20.0, 0.05, 0.05, 2000.0, 0.1);
        let found = contexts(&irregular);
        assert!(found.contains(&ContextId::IrregularBreathing));
        assert!(!found.contains(&ContextId::ControlledBreathing));

        let controlled = AcousticFeatures::new(1.0, 300.0, 20.0, 0.05, 0.01, 2000.0, 0.03);
        assert_eq!(contexts(&controlled), vec![ContextId::ControlledBreathing]);
    }

    #[test]
    fn test_neither_breath_tag_in_middle_band() {
        let features = AcousticFeatures::new(1.0, 300.0, 20.0, 0.05, 0.03, 2000.0, 0.05);
        assert!(contexts(&features).is_empty());
    }

    #[test]
    fn test_optional_fields_are_omitted_in_json() {
        let features = AcousticFeatures::new(1.0, 300.0, 20.0, 0.05, 0.01, 2000.0, 0.03);
        let json = serde_json::to_value(ContextAnalyzer::analyze(&features)).unwrap();
        assert_eq!(json[0]["context"], "controlled_breathing");
        assert!(json[0].get("likely_timing").is_none());
    }
}
