// Ensemble module - ML augmentation path
//
// Runs the larger feature map through every configured member, replaces
// unavailable members with the heuristic at fixed confidence, combines the
// votes, and cross-validates the result against the rule-based reading.
//
// Degradation is designed in: missing weights, unreadable weights or an
// empty feature map never fail the analysis.

pub mod feature_map;
pub mod heuristic;
pub mod model;
pub mod reconcile;
pub mod validation;
pub mod vote;

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::config::EnsembleConfig;
use crate::error::log_model_error;

pub use feature_map::MlFeatureMap;
pub use heuristic::{heuristic_classification, HEURISTIC_CONFIDENCE};
pub use model::{
    BehaviorLabel, BehaviorModel, LinearModel, LinearWeights, ModelVote, UntrainedModel,
};
pub use reconcile::{
    CombinedAnalysis, ConfidenceAssessment, ConfidenceReconciler, DataQuality,
    EnhancedInterpretation,
};
pub use validation::{cross_validate, AgreementLevel, CrossValidation};
pub use vote::{combine_predictions, VoteShare};

/// Narrative profile for a predicted behavior
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BehaviorProfile {
    pub description: String,
    pub indicators: Vec<String>,
    pub likely_causes: Vec<String>,
}

impl BehaviorProfile {
    fn new(description: &str, indicators: [&str; 3], likely_causes: [&str; 3]) -> Self {
        Self {
            description: description.to_string(),
            indicators: indicators.iter().map(|s| s.to_string()).collect(),
            likely_causes: likely_causes.iter().map(|s| s.to_string()).collect(),
        }
    }

    /// Profile for a predicted label
    pub fn for_label(label: BehaviorLabel) -> Self {
        match label {
            BehaviorLabel::Excited => Self::new(
                "Cat shows signs of excitement or high arousal",
                ["High pitch vocalizations", "Increased movement", "Elevated energy levels"],
                ["Play time", "Feeding time", "Environmental stimulation"],
            ),
            BehaviorLabel::Active => Self::new(
                "Cat is engaged and moderately active",
                ["Moderate movement", "Varied vocalizations", "Environmental interaction"],
                ["Exploration", "Normal daily activity", "Social interaction"],
            ),
            BehaviorLabel::Vocal => Self::new(
                "Cat is primarily using vocal communication",
                ["Strong vocal signals", "Varied pitch patterns", "Sustained communication"],
                ["Attention seeking", "Communication with humans", "Territorial behavior"],
            ),
            BehaviorLabel::Calm => Self::new(
                "Cat appears relaxed and content",
                ["Low activity levels", "Gentle vocalizations", "Stable behavior patterns"],
                ["Resting state", "Contentment", "Comfortable environment"],
            ),
            BehaviorLabel::AnalysisUnavailable => Self {
                description: "Analysis requires manual review".to_string(),
                indicators: vec!["Insufficient data for automated analysis".to_string()],
                likely_causes: vec!["Technical limitations or data quality issues".to_string()],
            },
            BehaviorLabel::Unknown => Self {
                description: "Behavioral pattern requires further analysis".to_string(),
                indicators: vec!["Mixed signals detected".to_string()],
                likely_causes: vec!["Complex behavioral state".to_string()],
            },
        }
    }
}

/// Output of the ensemble path
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MlResult {
    pub ml_prediction: BehaviorLabel,
    pub model_confidences: BTreeMap<String, f64>,
    pub feature_analysis: Vec<String>,
    pub behavioral_insights: BehaviorProfile,
    pub recommendations: Vec<String>,
    /// Mean member confidence (0..1)
    pub confidence_score: f64,
    /// True when at least one member fell back to the heuristic
    #[serde(default)]
    pub heuristic_fallback: bool,
}

impl MlResult {
    /// Result returned when there is nothing to classify
    pub fn unavailable() -> Self {
        Self {
            ml_prediction: BehaviorLabel::AnalysisUnavailable,
            model_confidences: BTreeMap::new(),
            feature_analysis: vec![
                "Unable to extract sufficient features for ML analysis".to_string(),
            ],
            behavioral_insights: BehaviorProfile::for_label(BehaviorLabel::AnalysisUnavailable),
            recommendations: vec![
                "Ensure video contains clear cat behavior".to_string(),
                "Check audio quality and presence of vocalizations".to_string(),
                "Consider re-recording with better lighting and audio".to_string(),
            ],
            confidence_score: 0.0,
            heuristic_fallback: false,
        }
    }

    pub fn is_available(&self) -> bool {
        self.ml_prediction != BehaviorLabel::AnalysisUnavailable
    }
}

/// Ensemble of behavior models with heuristic fallback
pub struct EnsembleAdapter {
    models: Vec<Box<dyn BehaviorModel>>,
}

impl EnsembleAdapter {
    /// Adapter whose members are all untrained
    pub fn untrained(names: &[String]) -> Self {
        Self {
            models: names
                .iter()
                .map(|name| Box::new(UntrainedModel::new(name.clone())) as Box<dyn BehaviorModel>)
                .collect(),
        }
    }

    pub fn with_models(models: Vec<Box<dyn BehaviorModel>>) -> Self {
        Self { models }
    }

    /// Build members from config, loading `<model_dir>/<name>.json` when present
    ///
    /// A missing or invalid weight file leaves that member untrained.
    pub fn from_config(config: &EnsembleConfig) -> Self {
        let models = config
            .models
            .iter()
            .map(|name| -> Box<dyn BehaviorModel> {
                let Some(dir) = &config.model_dir else {
                    return Box::new(UntrainedModel::new(name.clone()));
                };
                let path = dir.join(format!("{}.json", name));
                if !path.exists() {
                    log::warn!(
                        "[Ensemble] No weights for '{}' at {:?}; using heuristic fallback",
                        name,
                        path
                    );
                    return Box::new(UntrainedModel::new(name.clone()));
                }
                match LinearModel::from_json_file(name, &path) {
                    Ok(model) => {
                        log::info!("[Ensemble] Loaded '{}' from {:?}", name, path);
                        Box::new(model)
                    }
                    Err(err) => {
                        log_model_error(&err, "EnsembleAdapter::from_config");
                        Box::new(UntrainedModel::new(name.clone()))
                    }
                }
            })
            .collect();
        Self { models }
    }

    pub fn model_names(&self) -> Vec<&str> {
        self.models.iter().map(|model| model.name()).collect()
    }

    /// Classify a feature map
    ///
    /// # Arguments
    /// * `features` - Ordered ML feature map (audio + optional video)
    ///
    /// # Returns
    /// MlResult; an empty map yields `MlResult::unavailable()`
    pub fn analyze(&self, features: &MlFeatureMap) -> MlResult {
        if features.is_empty() {
            log::warn!("[Ensemble] Empty feature map; returning default analysis");
            return MlResult::unavailable();
        }

        let mut votes = Vec::with_capacity(self.models.len());
        let mut model_confidences = BTreeMap::new();
        let mut heuristic_fallback = false;

        for model in &self.models {
            let vote = match model.predict(features) {
                Some(vote) => vote,
                None => {
                    heuristic_fallback = true;
                    ModelVote {
                        label: heuristic_classification(features),
                        confidence: HEURISTIC_CONFIDENCE,
                    }
                }
            };
            tracing::debug!(
                "[Ensemble] {} -> {} ({:.2})",
                model.name(),
                vote.label,
                vote.confidence
            );
            votes.push((vote.label, vote.confidence));
            model_confidences.insert(model.name().to_string(), vote.confidence);
        }

        let (ml_prediction, _) = combine_predictions(&votes);
        let confidence_score = if votes.is_empty() {
            0.5
        } else {
            votes.iter().map(|(_, c)| c).sum::<f64>() / votes.len() as f64
        };

        MlResult {
            ml_prediction,
            model_confidences,
            feature_analysis: analyze_features(features),
            behavioral_insights: BehaviorProfile::for_label(ml_prediction),
            recommendations: recommendations(ml_prediction, features),
            confidence_score,
            heuristic_fallback,
        }
    }
}

impl Default for EnsembleAdapter {
    fn default() -> Self {
        Self::from_config(&EnsembleConfig::default())
    }
}

/// Observations about the raw feature values
pub fn analyze_features(features: &MlFeatureMap) -> Vec<String> {
    let mut notes = Vec::new();

    let pitch = features.value("pitch_mean");
    if pitch > 300.0 {
        notes.push(
            "High-pitched vocalizations detected - may indicate excitement or distress".to_string(),
        );
    } else if pitch < 100.0 {
        notes.push(
            "Low-pitched vocalizations detected - may indicate contentment or warning".to_string(),
        );
    }

    if features.value("rms_energy") > 0.15 {
        notes.push("High vocal energy detected - cat is actively communicating".to_string());
    }

    let motion = features.value("avg_motion");
    if motion > 0.7 {
        notes.push("High activity level detected - cat is very active".to_string());
    } else if features.get("avg_motion").is_some() && motion < 0.2 {
        notes.push("Low activity level detected - cat appears calm or resting".to_string());
    }

    if features.value("avg_edge_density") > 0.1 {
        notes.push("Complex visual environment detected - enriched surroundings".to_string());
    }

    notes
}

/// Care recommendations for a predicted label
pub fn recommendations(label: BehaviorLabel, features: &MlFeatureMap) -> Vec<String> {
    let base: &[&str] = match label {
        BehaviorLabel::Excited => &[
            "Provide appropriate outlets for high energy (interactive toys, climbing structures)",
            "Monitor for signs of overstimulation",
            "Ensure safe environment for active behavior",
        ],
        BehaviorLabel::Vocal => &[
            "Pay attention to vocal communication patterns",
            "Check for basic needs (food, water, litter box)",
            "Consider if cat is seeking social interaction",
        ],
        BehaviorLabel::Calm => &[
            "Maintain current comfortable environment",
            "Continue providing consistent care routine",
            "Monitor for any changes in behavior patterns",
        ],
        BehaviorLabel::Active | BehaviorLabel::Unknown | BehaviorLabel::AnalysisUnavailable => &[],
    };
    let mut recommendations: Vec<String> = base.iter().map(|s| s.to_string()).collect();

    if features.value("duration") > 300.0 {
        recommendations.push(
            "Extended observation period provides reliable behavioral assessment".to_string(),
        );
    }
    if features.get("avg_motion").is_some_and(|motion| motion < 0.1) {
        recommendations
            .push("Consider encouraging more activity with interactive play".to_string());
    }

    recommendations
}

#[cfg(test)]
mod tests;
