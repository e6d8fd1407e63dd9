// Ensemble members
//
// A member either produces a vote or reports itself unavailable, in which
// case the adapter substitutes the heuristic. Trained members are linear
// softmax classifiers loaded from JSON weight files.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::Path;

use crate::ensemble::feature_map::MlFeatureMap;
use crate::error::ModelError;

/// Behavior classes predicted by the ensemble
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BehaviorLabel {
    Excited,
    Active,
    Vocal,
    Calm,
    /// No votes were cast
    Unknown,
    /// Feature extraction produced nothing to classify
    AnalysisUnavailable,
}

impl BehaviorLabel {
    pub fn as_str(self) -> &'static str {
        match self {
            BehaviorLabel::Excited => "excited",
            BehaviorLabel::Active => "active",
            BehaviorLabel::Vocal => "vocal",
            BehaviorLabel::Calm => "calm",
            BehaviorLabel::Unknown => "unknown",
            BehaviorLabel::AnalysisUnavailable => "analysis_unavailable",
        }
    }
}

impl fmt::Display for BehaviorLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single member's prediction
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ModelVote {
    pub label: BehaviorLabel,
    /// Probability of the predicted class (0..1)
    pub confidence: f64,
}

/// Inference contract for an ensemble member
pub trait BehaviorModel: Send + Sync {
    fn name(&self) -> &str;

    /// Predict a label, or `None` when the model cannot run
    fn predict(&self, features: &MlFeatureMap) -> Option<ModelVote>;
}

/// Member with no trained weights
pub struct UntrainedModel {
    name: String,
}

impl UntrainedModel {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

impl BehaviorModel for UntrainedModel {
    fn name(&self) -> &str {
        &self.name
    }

    fn predict(&self, _features: &MlFeatureMap) -> Option<ModelVote> {
        None
    }
}

/// On-disk layout of a linear model
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LinearWeights {
    pub feature_names: Vec<String>,
    pub labels: Vec<BehaviorLabel>,
    /// One row per label, one column per feature
    pub weights: Vec<Vec<f64>>,
    pub bias: Vec<f64>,
}

/// Softmax classifier over a fixed feature list
///
/// Missing features read as 0.0; an empty feature map makes the model
/// unavailable.
pub struct LinearModel {
    name: String,
    params: LinearWeights,
}

impl LinearModel {
    /// Build a model, checking that all dimensions agree
    pub fn new(name: impl Into<String>, params: LinearWeights) -> Result<Self, ModelError> {
        let name = name.into();
        let shape_error = |reason: String| ModelError::Shape {
            model: name.clone(),
            reason,
        };

        if params.labels.is_empty() {
            return Err(shape_error("no labels".to_string()));
        }
        if params.weights.len() != params.labels.len() {
            return Err(shape_error(format!(
                "{} weight rows for {} labels",
                params.weights.len(),
                params.labels.len()
            )));
        }
        if params.bias.len() != params.labels.len() {
            return Err(shape_error(format!(
                "{} bias terms for {} labels",
                params.bias.len(),
                params.labels.len()
            )));
        }
        if let Some(row) = params
            .weights
            .iter()
            .position(|row| row.len() != params.feature_names.len())
        {
            return Err(shape_error(format!(
                "row {} has {} weights for {} features",
                row,
                params.weights[row].len(),
                params.feature_names.len()
            )));
        }

        Ok(Self { name, params })
    }

    /// Load weights from `<path>` as JSON
    pub fn from_json_file(name: &str, path: &Path) -> Result<Self, ModelError> {
        let contents = fs::read_to_string(path).map_err(|err| ModelError::Read {
            path: path.display().to_string(),
            reason: err.to_string(),
        })?;
        let params: LinearWeights =
            serde_json::from_str(&contents).map_err(|err| ModelError::Parse {
                path: path.display().to_string(),
                reason: err.to_string(),
            })?;
        Self::new(name, params)
    }

    /// Class probabilities in label order
    pub fn probabilities(&self, features: &MlFeatureMap) -> Vec<f64> {
        let inputs: Vec<f64> = self
            .params
            .feature_names
            .iter()
            .map(|name| features.value(name))
            .collect();

        let logits: Vec<f64> = self
            .params
            .weights
            .iter()
            .zip(&self.params.bias)
            .map(|(row, bias)| row.iter().zip(&inputs).map(|(w, x)| w * x).sum::<f64>() + bias)
            .collect();

        let max_logit = logits.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
        let exps: Vec<f64> = logits.iter().map(|l| (l - max_logit).exp()).collect();
        let total: f64 = exps.iter().sum();
        exps.iter().map(|e| e / total).collect()
    }
}

impl BehaviorModel for LinearModel {
    fn name(&self) -> &str {
        &self.name
    }

    fn predict(&self, features: &MlFeatureMap) -> Option<ModelVote> {
        if features.is_empty() {
            return None;
        }

        let probabilities = self.probabilities(features);
        let mut best: Option<(usize, f64)> = None;
        for (index, probability) in probabilities.iter().enumerate() {
            if !probability.is_finite() {
                return None;
            }
            match best {
                Some((_, current)) if *probability <= current => {}
                _ => best = Some((index, *probability)),
            }
        }

        best.map(|(index, confidence)| ModelVote {
            label: self.params.labels[index],
            confidence,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;

    fn weights() -> LinearWeights {
        LinearWeights {
            feature_names: vec!["avg_motion".to_string(), "rms_energy".to_string()],
            labels: vec![BehaviorLabel::Active, BehaviorLabel::Calm],
            weights: vec![vec![10.0, 0.0], vec![-10.0, 0.0]],
            bias: vec![0.0, 0.0],
        }
    }

    #[test]
    fn test_untrained_model_is_unavailable() {
        let model = UntrainedModel::new("svm");
        let mut features = MlFeatureMap::new();
        features.insert("avg_motion", 0.9);
        assert_eq!(model.name(), "svm");
        assert!(model.predict(&features).is_none());
    }

    #[test]
    fn test_linear_model_predicts_argmax() {
        let model = LinearModel::new("random_forest", weights()).unwrap();
        let mut features = MlFeatureMap::new();
        features.insert("avg_motion", 0.5);

        let vote = model.predict(&features).unwrap();
        assert_eq!(vote.label, BehaviorLabel::Active);
        assert!(vote.confidence > 0.99);

        let probabilities = model.probabilities(&features);
        assert!((probabilities.iter().sum::<f64>() - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_linear_model_tie_keeps_first_label() {
        let model = LinearModel::new("svm", weights()).unwrap();
        let mut features = MlFeatureMap::new();
        features.insert("rms_energy", 0.3);
        let vote = model.predict(&features).unwrap();
        assert_eq!(vote.label, BehaviorLabel::Active);
        assert!((vote.confidence - 0.5).abs() < 1e-9);
    }

    #[test]
    fn test_shape_mismatch_rejected() {
        let mut params = weights();
        params.bias.pop();
        let err = LinearModel::new("gradient_boost", params).err().unwrap();
        assert_eq!(err.code(), 3003);
    }

    #[test]
    fn test_missing_file_is_read_error() {
        let err = LinearModel::from_json_file("svm", Path::new("/nonexistent/svm.json"))
            .err()
            .unwrap();
        assert_eq!(err.code(), 3001);
    }

    #[test]
    fn test_labels_deserialize_from_snake_case() {
        let json = r#"{"feature_names": ["pitch_mean"], "labels": ["excited", "vocal"],
            "weights": [[0.01], [-0.01]], "bias": [0.0, 0.0]}"#;
        let params: LinearWeights = serde_json::from_str(json).unwrap();
        assert_eq!(params.labels, vec![BehaviorLabel::Excited, BehaviorLabel::Vocal]);
    }
}
