// Analysis module - feature-to-interpretation inference core
//
// Pipeline:
//   AcousticFeatures (+ optional VisualFeatures)
//     -> PrimaryInterpreter, PatternDetector, ContextAnalyzer, HealthAssessor
//     -> ConfidenceScorer
//     -> InsightSynthesizer
//     -> Interpretation
//
// Every stage is a pure function of its inputs. Callers validate features
// with `FeatureValidator` first; the core itself never fails.

pub mod behavior;
pub mod confidence;
pub mod context;
pub mod features;
pub mod health;
pub mod insights;
pub mod interpretation;
pub mod patterns;
pub mod primary;
pub mod state;

pub use behavior::CombinedBehavior;
pub use confidence::{ConfidenceInputs, ConfidenceScorer};
pub use context::{ContextAnalyzer, ContextId, ContextIndicator};
pub use features::{AcousticFeatures, ActivityLevel, FeatureValidator, VisualFeatures};
pub use health::{HealthAssessor, HealthCategory, HealthIndicator};
pub use insights::{BehavioralInsight, InsightCategory, InsightSynthesizer};
pub use interpretation::{AcousticMetrics, Interpretation};
pub use patterns::{PatternDetector, PatternId, VocalPattern};
pub use primary::{PrimaryInterpreter, PrimaryReading};
pub use state::{
    Baseline, ConfidenceLevel, EmotionKind, EmotionalState, PrimaryMeaning, Specificity,
    Strength, UrgencyLevel,
};

/// Interpret one clip
///
/// # Arguments
/// * `features` - Validated acoustic features
/// * `visual` - Optional visual features from the paired video
///
/// # Returns
/// Fully populated Interpretation; absent visual input leaves
/// `combined_behavior` at its Unknown defaults
pub fn interpret(features: &AcousticFeatures, visual: Option<&VisualFeatures>) -> Interpretation {
    let reading = PrimaryInterpreter::classify(features);
    let vocal_patterns = PatternDetector::detect(features);
    let contextual_indicators = ContextAnalyzer::analyze(features);
    let health_indicators = HealthAssessor::assess(features);

    let inputs = ConfidenceInputs::from_reading(features, &reading);
    let (confidence_score, confidence) = ConfidenceScorer::evaluate(&inputs);

    let behavioral_insights = InsightSynthesizer::synthesize(
        &vocal_patterns,
        &contextual_indicators,
        &health_indicators,
        confidence,
    );

    let combined_behavior = CombinedBehavior::correlate(
        reading.emotional_state,
        reading.urgency_level,
        confidence,
        visual,
    );

    tracing::debug!(
        "[Interpret] state={} urgency={} confidence={} ({} pts) patterns={}",
        reading.emotional_state,
        reading.urgency_level,
        confidence,
        confidence_score,
        vocal_patterns.len()
    );

    Interpretation {
        primary_meaning: reading.primary_meaning,
        emotional_state: reading.emotional_state,
        urgency_level: reading.urgency_level,
        confidence,
        confidence_score,
        details: reading.details,
        vocal_patterns,
        contextual_indicators,
        health_indicators,
        behavioral_insights,
        acoustic_metrics: AcousticMetrics::from_features(features),
        combined_behavior,
    }
}

/// Pick the candidate with the highest confidence score
///
/// Ties keep the earliest candidate. Returns `None` for an empty list.
pub fn select_best(candidates: Vec<Interpretation>) -> Option<Interpretation> {
    let mut best: Option<Interpretation> = None;
    for candidate in candidates {
        let replace = match &best {
            Some(current) => candidate.confidence_score > current.confidence_score,
            None => true,
        };
        if replace {
            best = Some(candidate);
        }
    }
    best
}
