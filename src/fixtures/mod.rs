//! Fixture utilities for the deterministic CLI harness.
//!
//! A fixture is a `<name>.features.json` acoustic feature vector with an
//! optional `<name>.visual.json` and an optional `<name>.expect.json`
//! describing the interpretation it must produce. The catalog discovers
//! fixtures on disk and the processor runs them through the same pipeline
//! the CLI uses.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::analysis::{
    interpret, AcousticFeatures, ConfidenceLevel, FeatureValidator, Interpretation, PatternId,
    UrgencyLevel, VisualFeatures,
};
use crate::config::AppConfig;
use crate::ensemble::{BehaviorLabel, EnsembleAdapter, MlFeatureMap, MlResult};

/// Default location for fixture JSON assets.
pub const DEFAULT_FIXTURE_ROOT: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/fixtures");

const FEATURES_SUFFIX: &str = ".features.json";

/// Metadata describing an available fixture.
#[derive(Clone, Debug, Serialize)]
pub struct FixtureMetadata {
    pub name: String,
    pub features_path: PathBuf,
    pub visual_path: Option<PathBuf>,
    pub expect_path: Option<PathBuf>,
}

/// Loaded fixture data.
#[derive(Clone, Debug)]
pub struct FixtureData {
    pub metadata: FixtureMetadata,
    pub features: AcousticFeatures,
    pub visual: Option<VisualFeatures>,
    pub expectations: Option<FixtureExpectations>,
}

/// JSON expectation schema for fixture verification.
///
/// Every field except `fixture` is optional; only present fields are checked.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FixtureExpectations {
    pub fixture: String,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub emotional_state: Option<String>,
    #[serde(default)]
    pub urgency_level: Option<UrgencyLevel>,
    #[serde(default)]
    pub confidence: Option<ConfidenceLevel>,
    #[serde(default)]
    pub confidence_score: Option<u32>,
    /// Case-insensitive substring of the primary meaning
    #[serde(default)]
    pub primary_meaning_contains: Option<String>,
    /// Exact pattern list in detection order
    #[serde(default)]
    pub vocal_patterns: Option<Vec<PatternId>>,
    #[serde(default)]
    pub overall_mood: Option<String>,
    #[serde(default)]
    pub ml_prediction: Option<BehaviorLabel>,
}

impl FixtureExpectations {
    pub fn verify(
        &self,
        actual: &Interpretation,
        ml: Option<&MlResult>,
    ) -> std::result::Result<(), ExpectationDiff> {
        let mut failures = Vec::new();
        let mut check = |field: &str, expected: Value, actual: Value, matched: bool| {
            if !matched {
                failures.push(ExpectationFailure {
                    field: field.to_string(),
                    expected,
                    actual,
                });
            }
        };

        if let Some(state) = &self.emotional_state {
            let label = actual.emotional_state.label();
            check(
                "emotional_state",
                Value::from(state.as_str()),
                Value::from(label),
                state == label,
            );
        }
        if let Some(urgency) = self.urgency_level {
            check(
                "urgency_level",
                Value::from(urgency.label()),
                Value::from(actual.urgency_level.label()),
                urgency == actual.urgency_level,
            );
        }
        if let Some(confidence) = self.confidence {
            check(
                "confidence",
                Value::from(confidence.label()),
                Value::from(actual.confidence.label()),
                confidence == actual.confidence,
            );
        }
        if let Some(score) = self.confidence_score {
            check(
                "confidence_score",
                Value::from(score),
                Value::from(actual.confidence_score),
                score == actual.confidence_score,
            );
        }
        if let Some(fragment) = &self.primary_meaning_contains {
            check(
                "primary_meaning",
                Value::from(fragment.as_str()),
                Value::from(actual.primary_meaning.text.as_str()),
                actual.primary_meaning.mentions(fragment),
            );
        }
        if let Some(patterns) = &self.vocal_patterns {
            let detected: Vec<PatternId> =
                actual.vocal_patterns.iter().map(|p| p.pattern).collect();
            check(
                "vocal_patterns",
                serde_json::to_value(patterns).unwrap_or(Value::Null),
                serde_json::to_value(&detected).unwrap_or(Value::Null),
                *patterns == detected,
            );
        }
        if let Some(mood) = &self.overall_mood {
            let actual_mood = actual.combined_behavior.overall_mood.as_str();
            check(
                "overall_mood",
                Value::from(mood.as_str()),
                Value::from(actual_mood),
                mood == actual_mood,
            );
        }
        if let Some(label) = self.ml_prediction {
            let predicted = ml.map(|result| result.ml_prediction);
            check(
                "ml_prediction",
                Value::from(label.as_str()),
                predicted.map_or(Value::Null, |p| Value::from(p.as_str())),
                predicted == Some(label),
            );
        }

        if failures.is_empty() {
            Ok(())
        } else {
            Err(ExpectationDiff {
                fixture: self.fixture.clone(),
                failures,
            })
        }
    }
}

/// Outcome of comparing actual results with expectations.
#[derive(Debug)]
pub struct ExpectationDiff {
    pub fixture: String,
    pub failures: Vec<ExpectationFailure>,
}

impl ExpectationDiff {
    pub fn to_json(&self) -> Value {
        serde_json::json!({
            "fixture": self.fixture,
            "failures": self.failures.iter().map(|failure| {
                serde_json::json!({
                    "field": failure.field,
                    "expected": failure.expected,
                    "actual": failure.actual,
                })
            }).collect::<Vec<_>>()
        })
    }
}

/// Detailed diff entry for a single field.
#[derive(Debug)]
pub struct ExpectationFailure {
    pub field: String,
    pub expected: Value,
    pub actual: Value,
}

/// Catalog responsible for discovering fixtures on disk.
pub struct FixtureCatalog {
    root: PathBuf,
}

impl FixtureCatalog {
    pub fn new<P: Into<PathBuf>>(root: P) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// List all fixtures by their metadata.
    pub fn discover(&self) -> Result<Vec<FixtureMetadata>> {
        let mut fixtures = Vec::new();
        if !self.root.exists() {
            return Ok(fixtures);
        }

        for entry in fs::read_dir(&self.root)? {
            let entry = entry?;
            if !entry.file_type()?.is_file() {
                continue;
            }
            let path = entry.path();
            let is_features = path
                .file_name()
                .and_then(|name| name.to_str())
                .is_some_and(|name| name.ends_with(FEATURES_SUFFIX));
            if is_features {
                fixtures.push(self.metadata_for_path(&path)?);
            }
        }

        fixtures.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(fixtures)
    }

    /// Load fixture features + expectations for provided name or path.
    pub fn load(&self, fixture: &str, override_expect: Option<PathBuf>) -> Result<FixtureData> {
        let features_path = self.resolve_fixture_path(fixture)?;
        let metadata = self.metadata_for_path(&features_path)?;

        let features: AcousticFeatures = read_json(&metadata.features_path)?;
        let visual = match &metadata.visual_path {
            Some(path) => Some(read_json(path)?),
            None => None,
        };

        let expectation_path = override_expect.or(metadata.expect_path.clone());
        let expectations = match expectation_path {
            Some(path) => Some(read_json(&path)?),
            None => None,
        };

        Ok(FixtureData {
            metadata,
            features,
            visual,
            expectations,
        })
    }

    fn resolve_fixture_path(&self, fixture: &str) -> Result<PathBuf> {
        let as_path = Path::new(fixture);
        if as_path.is_file() {
            return Ok(as_path.to_path_buf());
        }

        let candidate = self.root.join(format!("{fixture}{FEATURES_SUFFIX}"));
        if candidate.exists() {
            Ok(candidate)
        } else {
            Err(anyhow!(
                "Fixture '{fixture}' not found in {}",
                self.root.display()
            ))
        }
    }

    fn metadata_for_path(&self, features_path: &Path) -> Result<FixtureMetadata> {
        let name = features_path
            .file_name()
            .and_then(|s| s.to_str())
            .and_then(|s| s.strip_suffix(FEATURES_SUFFIX))
            .ok_or_else(|| anyhow!("Invalid fixture name for {}", features_path.display()))?
            .to_string();
        let dir = features_path.parent().unwrap_or_else(|| Path::new("."));
        let sibling = |suffix: &str| {
            let path = dir.join(format!("{name}{suffix}"));
            path.exists().then_some(path)
        };
        Ok(FixtureMetadata {
            visual_path: sibling(".visual.json"),
            expect_path: sibling(".expect.json"),
            features_path: features_path.to_path_buf(),
            name,
        })
    }
}

impl Default for FixtureCatalog {
    fn default() -> Self {
        Self::new(DEFAULT_FIXTURE_ROOT)
    }
}

/// Result of running a fixture.
#[derive(Debug, Clone, Serialize)]
pub struct FixtureRun {
    pub fixture: String,
    pub interpretation: Interpretation,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ml_analysis: Option<MlResult>,
}

/// Executes fixtures through the interpretation pipeline.
pub struct FixtureProcessor {
    ensemble: Option<EnsembleAdapter>,
}

impl FixtureProcessor {
    pub fn new(app_config: &AppConfig) -> Self {
        Self {
            ensemble: Some(EnsembleAdapter::from_config(&app_config.ensemble)),
        }
    }

    /// Rule-based interpretation only
    pub fn without_ensemble() -> Self {
        Self { ensemble: None }
    }

    pub fn run(&self, data: &FixtureData) -> Result<FixtureRun> {
        FeatureValidator::validate(&data.features)
            .with_context(|| format!("fixture {} has invalid features", data.metadata.name))?;
        if let Some(visual) = &data.visual {
            FeatureValidator::validate_visual(visual).with_context(|| {
                format!("fixture {} has invalid visual features", data.metadata.name)
            })?;
        }

        let interpretation = interpret(&data.features, data.visual.as_ref());
        let ml_analysis = self.ensemble.as_ref().map(|adapter| {
            adapter.analyze(&MlFeatureMap::from_features(&data.features, data.visual.as_ref()))
        });

        Ok(FixtureRun {
            fixture: data.metadata.name.clone(),
            interpretation,
            ml_analysis,
        })
    }
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T> {
    let json =
        fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    serde_json::from_str(&json).with_context(|| format!("parsing {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_discovers_bundled_fixtures() {
        let fixtures = FixtureCatalog::default().discover().unwrap();
        let names: Vec<&str> = fixtures.iter().map(|f| f.name.as_str()).collect();
        assert!(names.contains(&"short_high_chirp"));
        assert!(names.contains(&"playful_video"));
        let playful = fixtures.iter().find(|f| f.name == "playful_video").unwrap();
        assert!(playful.visual_path.is_some());
        assert!(playful.expect_path.is_some());
    }

    #[test]
    fn test_bundled_expectations_hold() {
        let catalog = FixtureCatalog::default();
        let processor = FixtureProcessor::new(&AppConfig::default());
        for metadata in catalog.discover().unwrap() {
            let data = catalog.load(&metadata.name, None).unwrap();
            let run = processor.run(&data).unwrap();
            if let Some(expectations) = &data.expectations {
                if let Err(diff) =
                    expectations.verify(&run.interpretation, run.ml_analysis.as_ref())
                {
                    panic!("{} failed: {}", metadata.name, diff.to_json());
                }
            }
        }
    }

    #[test]
    fn test_mismatch_produces_diff() {
        let catalog = FixtureCatalog::default();
        let override_path = catalog.root().join("short_high_chirp.mismatch.json");
        let data = catalog.load("short_high_chirp", Some(override_path)).unwrap();
        let run = FixtureProcessor::without_ensemble().run(&data).unwrap();

        let diff = data
            .expectations
            .unwrap()
            .verify(&run.interpretation, run.ml_analysis.as_ref())
            .unwrap_err();
        let json = diff.to_json();
        assert_eq!(json["fixture"], "short_high_chirp");
        let fields: Vec<&str> = diff.failures.iter().map(|f| f.field.as_str()).collect();
        assert_eq!(fields, vec!["emotional_state", "ml_prediction"]);
        assert_eq!(json["failures"][1]["actual"], Value::Null);
    }

    #[test]
    fn test_unknown_fixture_is_an_error() {
        let err = FixtureCatalog::default().load("no_such_fixture", None).err().unwrap();
        assert!(err.to_string().contains("no_such_fixture"));
    }
}
