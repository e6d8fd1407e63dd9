// Cross-validation of the rule-based state against the ensemble label

use serde::{Deserialize, Serialize};

use crate::analysis::EmotionalState;
use crate::ensemble::model::BehaviorLabel;
use crate::ensemble::MlResult;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AgreementLevel {
    High,
    Moderate,
    Low,
    Unknown,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CrossValidation {
    pub agreement_level: AgreementLevel,
    pub conflicting_indicators: Vec<String>,
    pub supporting_evidence: Vec<String>,
    pub reliability_score: f64,
}

impl Default for CrossValidation {
    fn default() -> Self {
        Self {
            agreement_level: AgreementLevel::Unknown,
            conflicting_indicators: Vec::new(),
            supporting_evidence: Vec::new(),
            reliability_score: 0.5,
        }
    }
}

/// Substring of the lowercased state -> compatible ensemble labels
const COMPATIBILITY: [(&str, &[BehaviorLabel]); 4] = [
    ("content", &[BehaviorLabel::Calm, BehaviorLabel::Vocal]),
    ("excited", &[BehaviorLabel::Excited, BehaviorLabel::Active]),
    ("distressed", &[BehaviorLabel::Vocal, BehaviorLabel::Active]),
    ("attention-seeking", &[BehaviorLabel::Vocal, BehaviorLabel::Excited]),
];

/// True when any compatibility entry matching the state accepts `label`
pub fn is_compatible(state: EmotionalState, label: BehaviorLabel) -> bool {
    let state = state.label().to_lowercase();
    COMPATIBILITY
        .iter()
        .filter(|(key, _)| state.contains(key))
        .any(|(_, labels)| labels.contains(&label))
}

/// Compare the emotional state with the ensemble prediction
///
/// An unavailable ensemble result contributes no comparison, leaving the
/// default reliability of 0.5 and an unknown agreement level.
pub fn cross_validate(state: EmotionalState, ml: &MlResult) -> CrossValidation {
    let mut validation = CrossValidation::default();
    if !ml.is_available() {
        return validation;
    }

    // Emotional state is currently the only compared signal
    let trad = state.label().to_lowercase();
    let predicted = ml.ml_prediction.as_str();
    let comparisons = [is_compatible(state, ml.ml_prediction)];

    if comparisons[0] {
        validation
            .supporting_evidence
            .push(format!("Emotional state agreement: {} <-> {}", trad, predicted));
    } else {
        validation
            .conflicting_indicators
            .push(format!("Emotional state mismatch: {} vs {}", trad, predicted));
    }

    let agreements = comparisons.iter().filter(|agreed| **agreed).count();
    validation.reliability_score = agreements as f64 / comparisons.len() as f64;
    validation.agreement_level = if validation.reliability_score > 0.7 {
        AgreementLevel::High
    } else if validation.reliability_score > 0.4 {
        AgreementLevel::Moderate
    } else {
        AgreementLevel::Low
    };

    validation
}
