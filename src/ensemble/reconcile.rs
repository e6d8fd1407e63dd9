// ConfidenceReconciler - merges the rule-based and ensemble paths
//
// overall = mean of both confidences when both are present, the single
// present confidence x 0.8 otherwise, 0.5 when neither is.
// Quality: > 0.8 excellent, > 0.6 good, > 0.4 fair, else poor.

use serde::{Deserialize, Serialize};

use crate::analysis::{ConfidenceLevel, EmotionKind, EmotionalState, Interpretation, UrgencyLevel};
use crate::ensemble::model::BehaviorLabel;
use crate::ensemble::validation::{cross_validate, CrossValidation};
use crate::ensemble::MlResult;

/// Penalty applied when only one path produced a confidence
pub const SINGLE_METHOD_PENALTY: f64 = 0.8;

/// Upper bound on comprehensive recommendations
pub const MAX_RECOMMENDATIONS: usize = 6;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DataQuality {
    Excellent,
    Good,
    Fair,
    Poor,
}

impl DataQuality {
    pub fn from_score(score: f64) -> Self {
        if score > 0.8 {
            DataQuality::Excellent
        } else if score > 0.6 {
            DataQuality::Good
        } else if score > 0.4 {
            DataQuality::Fair
        } else {
            DataQuality::Poor
        }
    }

    pub fn recommendation(self) -> &'static str {
        match self {
            DataQuality::Excellent => "high_confidence_results",
            DataQuality::Good => "reliable_results",
            DataQuality::Fair => "moderate_confidence",
            DataQuality::Poor => "results_require_verification",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConfidenceAssessment {
    pub overall_score: f64,
    pub traditional_confidence: f64,
    pub ml_confidence: f64,
    pub data_quality: DataQuality,
    pub recommendation: String,
}

pub struct ConfidenceReconciler;

impl ConfidenceReconciler {
    /// Numeric value of a rule-based confidence bucket
    pub fn level_score(level: ConfidenceLevel) -> f64 {
        match level {
            ConfidenceLevel::VeryHigh => 0.95,
            ConfidenceLevel::High => 0.9,
            ConfidenceLevel::Medium => 0.6,
            ConfidenceLevel::Low => 0.3,
            ConfidenceLevel::VeryLow => 0.1,
        }
    }

    /// Combine whichever confidences are available
    pub fn assess(
        traditional: Option<&Interpretation>,
        ml: Option<&MlResult>,
    ) -> ConfidenceAssessment {
        let traditional_confidence =
            traditional.map_or(0.0, |interp| Self::level_score(interp.confidence));
        let ml_confidence = ml.map_or(0.0, |result| result.confidence_score.max(0.0));

        let overall_score = match (traditional_confidence > 0.0, ml_confidence > 0.0) {
            (true, true) => (traditional_confidence + ml_confidence) / 2.0,
            (true, false) => traditional_confidence * SINGLE_METHOD_PENALTY,
            (false, true) => ml_confidence * SINGLE_METHOD_PENALTY,
            (false, false) => 0.5,
        };

        let data_quality = DataQuality::from_score(overall_score);
        ConfidenceAssessment {
            overall_score,
            traditional_confidence,
            ml_confidence,
            data_quality,
            recommendation: data_quality.recommendation().to_string(),
        }
    }
}

/// Behavior summary combining both paths
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnhancedInterpretation {
    pub overall_behavior: String,
    pub emotional_state: String,
    pub activity_level: String,
    pub vocal_patterns: String,
    pub behavioral_complexity: String,
    pub analysis_method: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cross_validation: Option<CrossValidation>,
}

impl EnhancedInterpretation {
    pub fn build(traditional: Option<&Interpretation>, ml: Option<&MlResult>) -> Self {
        let mut enhanced = Self {
            overall_behavior: "unknown".to_string(),
            emotional_state: "uncertain".to_string(),
            activity_level: "unknown".to_string(),
            vocal_patterns: "not_analyzed".to_string(),
            behavioral_complexity: "simple".to_string(),
            analysis_method: "hybrid".to_string(),
            cross_validation: None,
        };

        if let Some(interp) = traditional {
            enhanced.emotional_state = interp.emotional_state.label().to_string();
            enhanced.vocal_patterns = interp.primary_meaning.text.clone();
        }

        if let Some(result) = ml.filter(|result| result.is_available()) {
            let mapped = match result.ml_prediction {
                BehaviorLabel::Excited => Some(("highly_active", "high")),
                BehaviorLabel::Active => Some(("moderately_active", "medium")),
                BehaviorLabel::Vocal => Some(("communicative", "medium")),
                BehaviorLabel::Calm => Some(("relaxed", "low")),
                BehaviorLabel::Unknown | BehaviorLabel::AnalysisUnavailable => None,
            };
            if let Some((behavior, activity)) = mapped {
                enhanced.overall_behavior = behavior.to_string();
                enhanced.activity_level = activity.to_string();
                enhanced.behavioral_complexity = "complex".to_string();
            }
        }

        if let (Some(interp), Some(result)) = (traditional, ml) {
            enhanced.analysis_method = "validated_hybrid".to_string();
            enhanced.cross_validation = Some(cross_validate(interp.emotional_state, result));
        }

        enhanced
    }
}

/// Up to six recommendations drawn from both paths
pub fn comprehensive_recommendations(
    traditional: Option<&Interpretation>,
    ml: Option<&MlResult>,
) -> Vec<String> {
    let mut recommendations = Vec::new();

    if let Some(interp) = traditional {
        recommendations.extend(
            interp
                .details
                .iter()
                .take(3)
                .map(|detail| format!("Traditional analysis: {}", detail)),
        );
    }

    if let Some(result) = ml {
        recommendations.extend(
            result
                .recommendations
                .iter()
                .take(3)
                .map(|rec| format!("ML analysis: {}", rec)),
        );
    }

    if let (Some(interp), Some(result)) = (traditional, ml) {
        recommendations.push("Dual-method analysis provides enhanced reliability".to_string());

        if interp.urgency_level >= UrgencyLevel::High
            && matches!(result.ml_prediction, BehaviorLabel::Excited | BehaviorLabel::Vocal)
        {
            recommendations.push(
                "High urgency detected by both methods - immediate attention recommended"
                    .to_string(),
            );
        }

        if interp.emotional_state == EmotionalState::Derived(EmotionKind::RelaxedContent)
            && result.ml_prediction == BehaviorLabel::Calm
        {
            recommendations.push(
                "Both analyses indicate contentment - continue current care routine".to_string(),
            );
        }
    }

    if recommendations.len() < 3 {
        recommendations.extend([
            "Consider recording longer video segments for better analysis".to_string(),
            "Ensure good audio quality for optimal vocal analysis".to_string(),
            "Record in well-lit conditions for better visual analysis".to_string(),
        ]);
    }

    recommendations.truncate(MAX_RECOMMENDATIONS);
    recommendations
}

/// Full report for one clip when both paths may have run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CombinedAnalysis {
    pub traditional_analysis: Option<Interpretation>,
    pub ml_analysis: Option<MlResult>,
    pub enhanced_interpretation: EnhancedInterpretation,
    pub confidence_assessment: ConfidenceAssessment,
    pub comprehensive_recommendations: Vec<String>,
}

impl CombinedAnalysis {
    pub fn build(traditional: Option<Interpretation>, ml: Option<MlResult>) -> Self {
        let enhanced_interpretation =
            EnhancedInterpretation::build(traditional.as_ref(), ml.as_ref());
        let confidence_assessment = ConfidenceReconciler::assess(traditional.as_ref(), ml.as_ref());
        let comprehensive_recommendations =
            comprehensive_recommendations(traditional.as_ref(), ml.as_ref());

        Self {
            traditional_analysis: traditional,
            ml_analysis: ml,
            enhanced_interpretation,
            confidence_assessment,
            comprehensive_recommendations,
        }
    }
}
