// Tests for the ensemble adapter

use super::*;
use crate::analysis::{interpret, AcousticFeatures, ActivityLevel, VisualFeatures};
use std::fs;
use std::path::PathBuf;

fn map(entries: &[(&str, f64)]) -> MlFeatureMap {
    entries
        .iter()
        .map(|(key, value)| (key.to_string(), *value))
        .collect()
}

fn names() -> Vec<String> {
    vec![
        "random_forest".to_string(),
        "gradient_boost".to_string(),
        "svm".to_string(),
    ]
}

fn temp_dir(tag: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("meow_ensemble_{}_{}", tag, std::process::id()));
    let _ = fs::remove_dir_all(&dir);
    fs::create_dir_all(&dir).unwrap();
    dir
}

#[test]
fn test_untrained_members_fall_back_to_heuristic() {
    let adapter = EnsembleAdapter::untrained(&names());
    let result = adapter.analyze(&map(&[("avg_motion", 0.6), ("pitch_mean", 250.0)]));

    assert_eq!(result.ml_prediction, BehaviorLabel::Excited);
    assert!((result.confidence_score - 0.6).abs() < 1e-12);
    assert!(result.heuristic_fallback);
    assert_eq!(result.model_confidences.len(), 3);
    assert!(result.model_confidences.values().all(|c| (*c - 0.6).abs() < 1e-12));
    assert_eq!(
        result.behavioral_insights.description,
        "Cat shows signs of excitement or high arousal"
    );
    assert!(result.recommendations[0].contains("outlets for high energy"));
}

#[test]
fn test_model_confidences_sorted_by_name() {
    let adapter = EnsembleAdapter::untrained(&names());
    let result = adapter.analyze(&map(&[("rms_energy", 0.2)]));
    let keys: Vec<&str> = result.model_confidences.keys().map(|k| k.as_str()).collect();
    assert_eq!(keys, vec!["gradient_boost", "random_forest", "svm"]);
    assert_eq!(result.ml_prediction, BehaviorLabel::Vocal);
}

#[test]
fn test_empty_map_is_unavailable() {
    let adapter = EnsembleAdapter::untrained(&names());
    let result = adapter.analyze(&MlFeatureMap::new());
    assert_eq!(result.ml_prediction, BehaviorLabel::AnalysisUnavailable);
    assert_eq!(result.confidence_score, 0.0);
    assert!(!result.is_available());
    assert_eq!(result.recommendations.len(), 3);
}

#[test]
fn test_no_members_yields_unknown() {
    let adapter = EnsembleAdapter::with_models(Vec::new());
    let result = adapter.analyze(&map(&[("rms_energy", 0.2)]));
    assert_eq!(result.ml_prediction, BehaviorLabel::Unknown);
    assert_eq!(result.confidence_score, 0.5);
    assert!(!result.heuristic_fallback);
}

#[test]
fn test_from_config_without_dir_is_untrained() {
    let adapter = EnsembleAdapter::from_config(&EnsembleConfig::default());
    assert_eq!(adapter.model_names(), vec!["random_forest", "gradient_boost", "svm"]);
    let result = adapter.analyze(&map(&[("avg_motion", 0.6), ("pitch_mean", 150.0)]));
    assert_eq!(result.ml_prediction, BehaviorLabel::Active);
    assert!(result.heuristic_fallback);
}

#[test]
fn test_from_config_missing_dir_falls_back() {
    let config = EnsembleConfig {
        model_dir: Some(PathBuf::from("/nonexistent/meow_models")),
        ..EnsembleConfig::default()
    };
    let adapter = EnsembleAdapter::from_config(&config);
    let result = adapter.analyze(&map(&[("rms_energy", 0.01)]));
    assert_eq!(result.ml_prediction, BehaviorLabel::Calm);
    assert!(result.heuristic_fallback);
}

#[test]
fn test_from_config_loads_weights_and_skips_bad_files() {
    let dir = temp_dir("load");
    fs::write(
        dir.join("random_forest.json"),
        r#"{"feature_names": ["avg_motion"], "labels": ["calm", "active"],
            "weights": [[-20.0], [20.0]], "bias": [0.0, 0.0]}"#,
    )
    .unwrap();
    fs::write(dir.join("svm.json"), "not json").unwrap();

    let config = EnsembleConfig {
        model_dir: Some(dir.clone()),
        models: vec!["random_forest".to_string(), "svm".to_string()],
    };
    let adapter = EnsembleAdapter::from_config(&config);
    let result = adapter.analyze(&map(&[("avg_motion", 0.4), ("rms_energy", 0.2)]));

    // Trained member: active with ~1.0; svm falls back to vocal at 0.6
    assert!(result.model_confidences["random_forest"] > 0.99);
    assert!((result.model_confidences["svm"] - 0.6).abs() < 1e-12);
    assert_eq!(result.ml_prediction, BehaviorLabel::Active);
    assert!(result.heuristic_fallback);

    let _ = fs::remove_dir_all(&dir);
}

#[test]
fn test_feature_analysis_notes() {
    let notes = analyze_features(&map(&[
        ("pitch_mean", 350.0),
        ("rms_energy", 0.2),
        ("avg_motion", 0.1),
    ]));
    assert_eq!(notes.len(), 3);
    assert!(notes[0].starts_with("High-pitched"));
    assert!(notes[2].starts_with("Low activity"));

    // Audio-only maps say nothing about activity
    let audio_only = analyze_features(&map(&[("pitch_mean", 200.0)]));
    assert!(audio_only.is_empty());
}

#[test]
fn test_recommendation_extras() {
    let recs = recommendations(
        BehaviorLabel::Calm,
        &map(&[("duration", 400.0), ("avg_motion", 0.05)]),
    );
    assert_eq!(recs.len(), 5);
    assert!(recs[3].starts_with("Extended observation"));
    assert!(recs[4].contains("interactive play"));

    assert!(recommendations(BehaviorLabel::Active, &map(&[("duration", 2.0)])).is_empty());
}

#[test]
fn test_visual_excitement_scenario() {
    let acoustic = AcousticFeatures::new(1.2, 250.0, 30.0, 0.02, 0.01, 2000.0, 0.05);
    let visual = VisualFeatures {
        duration_seconds: 8.0,
        avg_motion: 0.6,
        motion_std: 0.2,
        avg_brightness: 120.0,
        dominant_activity: ActivityLevel::High,
        activity_samples: 16,
    };

    let features = MlFeatureMap::from_features(&acoustic, Some(&visual));
    let ml = EnsembleAdapter::default().analyze(&features);
    assert_eq!(ml.ml_prediction, BehaviorLabel::Excited);
    assert!((ml.confidence_score - 0.6).abs() < 1e-12);

    let traditional = interpret(&acoustic, Some(&visual));
    let combined = CombinedAnalysis::build(Some(traditional), Some(ml));
    assert_eq!(combined.enhanced_interpretation.overall_behavior, "highly_active");
    assert_eq!(combined.enhanced_interpretation.activity_level, "high");
    // Three details plus three ML tips fill the cap before the dual-method line
    let recs = &combined.comprehensive_recommendations;
    assert_eq!(recs.len(), 6);
    assert!(recs[..3].iter().all(|r| r.starts_with("Traditional analysis: ")));
    assert!(recs[3..].iter().all(|r| r.starts_with("ML analysis: ")));
    assert!(!recs
        .iter()
        .any(|r| r == "Dual-method analysis provides enhanced reliability"));
}
