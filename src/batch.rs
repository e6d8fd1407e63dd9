//! Batch analysis of many clips
//!
//! Each clip runs the full pipeline on the blocking thread pool; a
//! semaphore caps how many run at once. Outcomes come back in input order
//! and are reduced into a summary on the calling task, so no state is
//! shared between clips beyond the read-only config and ensemble.

use anyhow::{Context, Result};
use serde::Serialize;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;

use crate::analysis::{interpret, AcousticFeatures, FeatureValidator, VisualFeatures};
use crate::config::AppConfig;
use crate::ensemble::{CombinedAnalysis, EnsembleAdapter, MlFeatureMap};
use crate::extract;

/// Where a clip's acoustic features come from
#[derive(Debug, Clone, PartialEq)]
pub enum ClipSource {
    /// Pre-computed feature vector
    Features(AcousticFeatures),
    /// WAV recording to extract from
    Wav(PathBuf),
}

#[derive(Debug, Clone, PartialEq)]
pub struct BatchJob {
    pub name: String,
    pub source: ClipSource,
    pub visual: Option<VisualFeatures>,
}

/// Result for one clip
#[derive(Debug, Clone, Serialize)]
pub struct BatchOutcome {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub analysis: Option<CombinedAnalysis>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Aggregate counts over a batch
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct BatchSummary {
    pub total: usize,
    pub succeeded: usize,
    pub failed: usize,
    pub by_emotional_state: BTreeMap<String, usize>,
    pub by_urgency: BTreeMap<String, usize>,
    pub mean_confidence_score: f64,
}

impl BatchSummary {
    pub fn from_outcomes(outcomes: &[BatchOutcome]) -> Self {
        let mut summary = BatchSummary {
            total: outcomes.len(),
            ..Default::default()
        };
        let mut score_total = 0u64;

        for interp in outcomes
            .iter()
            .filter_map(|outcome| outcome.analysis.as_ref())
            .filter_map(|analysis| analysis.traditional_analysis.as_ref())
        {
            summary.succeeded += 1;
            score_total += interp.confidence_score as u64;
            *summary
                .by_emotional_state
                .entry(interp.emotional_state.label().to_string())
                .or_insert(0) += 1;
            *summary
                .by_urgency
                .entry(interp.urgency_level.label().to_string())
                .or_insert(0) += 1;
        }

        summary.failed = summary.total - summary.succeeded;
        if summary.succeeded > 0 {
            summary.mean_confidence_score = score_total as f64 / summary.succeeded as f64;
        }
        summary
    }
}

/// Run one clip through interpretation and, when given, the ensemble
pub fn analyze_job(
    job: &BatchJob,
    config: &AppConfig,
    ensemble: Option<&EnsembleAdapter>,
) -> Result<CombinedAnalysis> {
    if let Some(visual) = &job.visual {
        FeatureValidator::validate_visual(visual)
            .with_context(|| format!("invalid visual features for {}", job.name))?;
    }

    let (interpretation, mut ml_features) = match &job.source {
        ClipSource::Features(features) => {
            FeatureValidator::validate(features)
                .with_context(|| format!("invalid features for {}", job.name))?;
            (
                interpret(features, job.visual.as_ref()),
                MlFeatureMap::from_features(features, None),
            )
        }
        ClipSource::Wav(path) => {
            let analysis = extract::analyze_wav(path, config, job.visual.as_ref())
                .with_context(|| format!("extracting features from {}", path.display()))?;
            (analysis.interpretation, analysis.clip_features.ml_features)
        }
    };

    if let Some(visual) = &job.visual {
        ml_features.merge(&MlFeatureMap::from_visual(visual));
    }

    let ml = ensemble.map(|adapter| adapter.analyze(&ml_features));
    Ok(CombinedAnalysis::build(Some(interpretation), ml))
}

/// Analyze every job concurrently
///
/// # Arguments
/// * `jobs` - Clips to analyze
/// * `config` - Shared configuration (`batch.max_concurrency` caps parallelism)
/// * `ensemble` - Ensemble adapter, or `None` for rule-based analysis only
///
/// # Returns
/// Outcomes in input order plus their summary
pub async fn run_batch(
    jobs: Vec<BatchJob>,
    config: Arc<AppConfig>,
    ensemble: Option<Arc<EnsembleAdapter>>,
) -> (Vec<BatchOutcome>, BatchSummary) {
    let limit = config.batch.max_concurrency.max(1);
    let permits = Arc::new(Semaphore::new(limit));
    let names: Vec<String> = jobs.iter().map(|job| job.name.clone()).collect();
    let mut slots: Vec<Option<BatchOutcome>> = vec![None; jobs.len()];

    tracing::info!("[Batch] Analyzing {} clip(s), concurrency {}", jobs.len(), limit);

    let mut tasks = JoinSet::new();
    for (index, job) in jobs.into_iter().enumerate() {
        let permits = Arc::clone(&permits);
        let config = Arc::clone(&config);
        let ensemble = ensemble.clone();
        tasks.spawn(async move {
            // The semaphore is never closed, so acquire only fails after shutdown
            let _permit = permits.acquire_owned().await.ok();
            let handle = tokio::task::spawn_blocking(move || {
                let result = analyze_job(&job, &config, ensemble.as_deref());
                (job.name, result)
            });
            (index, handle.await)
        });
    }

    while let Some(joined) = tasks.join_next().await {
        let (index, blocking) = match joined {
            Ok(pair) => pair,
            Err(err) => {
                tracing::error!("[Batch] Task failed: {}", err);
                continue;
            }
        };
        let outcome = match blocking {
            Ok((name, Ok(analysis))) => BatchOutcome {
                name,
                analysis: Some(analysis),
                error: None,
            },
            Ok((name, Err(err))) => {
                tracing::warn!("[Batch] {} failed: {:#}", name, err);
                BatchOutcome {
                    name,
                    analysis: None,
                    error: Some(format!("{:#}", err)),
                }
            }
            Err(err) => BatchOutcome {
                name: names[index].clone(),
                analysis: None,
                error: Some(format!("analysis task panicked: {}", err)),
            },
        };
        slots[index] = Some(outcome);
    }

    let outcomes: Vec<BatchOutcome> = slots
        .into_iter()
        .zip(names)
        .map(|(slot, name)| {
            slot.unwrap_or(BatchOutcome {
                name,
                analysis: None,
                error: Some("analysis task was cancelled".to_string()),
            })
        })
        .collect();

    let summary = BatchSummary::from_outcomes(&outcomes);
    tracing::info!(
        "[Batch] Done: {} succeeded, {} failed",
        summary.succeeded,
        summary.failed
    );
    (outcomes, summary)
}

/// Collect jobs from a directory
///
/// Picks up `*.wav` recordings and `*.features.json` feature vectors. A
/// sibling `<name>.visual.json` supplies visual features for either.
/// Jobs are sorted by name.
pub fn collect_jobs(dir: &Path) -> Result<Vec<BatchJob>> {
    let entries =
        fs::read_dir(dir).with_context(|| format!("reading batch directory {}", dir.display()))?;

    let mut jobs = Vec::new();
    for entry in entries {
        let path = entry
            .with_context(|| format!("listing {}", dir.display()))?
            .path();
        let Some(file_name) = path.file_name().and_then(|name| name.to_str()) else {
            continue;
        };

        let (name, source) = if let Some(name) = file_name.strip_suffix(".features.json") {
            let features: AcousticFeatures = read_json(&path)?;
            (name.to_string(), ClipSource::Features(features))
        } else if let Some(name) = file_name.strip_suffix(".wav") {
            (name.to_string(), ClipSource::Wav(path.clone()))
        } else {
            continue;
        };

        let visual_path = dir.join(format!("{}.visual.json", name));
        let visual = if visual_path.exists() {
            Some(read_json(&visual_path)?)
        } else {
            None
        };

        jobs.push(BatchJob {
            name,
            source,
            visual,
        });
    }

    jobs.sort_by(|a, b| a.name.cmp(&b.name));
    Ok(jobs)
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T> {
    let contents =
        fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    serde_json::from_str(&contents).with_context(|| format!("parsing {}", path.display()))
}
