//! Configuration management for the extraction and ensemble layers
//!
//! Runtime parameters are loaded from a JSON file so extraction and batch
//! behaviour can be tuned without recompiling. Interpretation thresholds
//! are fixed constants and deliberately absent from this file.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Complete application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub extraction: ExtractionConfig,
    pub segmentation: SegmentationConfig,
    pub ensemble: EnsembleConfig,
    pub batch: BatchConfig,
}

/// Frame-level feature extraction parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractionConfig {
    /// Analysis frame length in samples
    pub frame_size: usize,
    /// Hop between frames in samples
    pub hop_size: usize,
    /// Lowest pitch searched by the autocorrelation tracker (Hz)
    pub min_pitch_hz: f32,
    /// Highest pitch searched by the autocorrelation tracker (Hz)
    pub max_pitch_hz: f32,
    /// Normalized autocorrelation peak required to call a frame voiced
    pub voicing_threshold: f32,
    /// Frames quieter than this RMS are never voiced
    pub silence_rms: f32,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            frame_size: 2048,
            hop_size: 512,
            min_pitch_hz: 80.0,
            max_pitch_hz: 1200.0,
            voicing_threshold: 0.3,
            silence_rms: 0.001,
        }
    }
}

/// Candidate meow segmentation parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SegmentationConfig {
    pub enabled: bool,
    /// Band-pass edges applied before segmentation (Hz); 0 leaves an edge open
    pub bandpass_low_hz: f32,
    pub bandpass_high_hz: f32,
    /// RMS window length in milliseconds
    pub window_ms: f32,
    /// RMS hop in milliseconds
    pub hop_ms: f32,
    /// Energy percentile a window must exceed to count as active
    pub energy_percentile: f32,
    pub min_segment_seconds: f32,
    pub max_segment_seconds: f32,
    /// Mean pitch range of a meow-like segment (Hz, inclusive)
    pub meow_min_pitch_hz: f32,
    pub meow_max_pitch_hz: f32,
    /// Pitch standard deviation a meow-like segment must exceed (Hz)
    pub meow_min_pitch_variation_hz: f32,
}

impl Default for SegmentationConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            bandpass_low_hz: 100.0,
            bandpass_high_hz: 2000.0,
            window_ms: 100.0,
            hop_ms: 50.0,
            energy_percentile: 75.0,
            min_segment_seconds: 0.2,
            max_segment_seconds: 3.0,
            meow_min_pitch_hz: 100.0,
            meow_max_pitch_hz: 800.0,
            meow_min_pitch_variation_hz: 10.0,
        }
    }
}

/// Ensemble model configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EnsembleConfig {
    /// Directory holding `<model>.json` weight files; none means untrained
    pub model_dir: Option<PathBuf>,
    /// Ensemble members in vote order
    pub models: Vec<String>,
}

impl Default for EnsembleConfig {
    fn default() -> Self {
        Self {
            model_dir: None,
            models: vec![
                "random_forest".to_string(),
                "gradient_boost".to_string(),
                "svm".to_string(),
            ],
        }
    }
}

/// Batch processing configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BatchConfig {
    /// Maximum clips analyzed concurrently
    pub max_concurrency: usize,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self { max_concurrency: 4 }
    }
}

impl AppConfig {
    /// Load configuration from JSON file
    ///
    /// # Arguments
    /// * `path` - Path to JSON config file
    ///
    /// # Returns
    /// Loaded configuration, or defaults when the file is missing or invalid
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Self {
        match fs::read_to_string(&path) {
            Ok(contents) => match serde_json::from_str(&contents) {
                Ok(config) => {
                    log::info!("[Config] Loaded configuration from {:?}", path.as_ref());
                    config
                }
                Err(err) => {
                    log::warn!(
                        "[Config] Failed to parse JSON from {:?}: {}. Using defaults.",
                        path.as_ref(),
                        err
                    );
                    Self::default()
                }
            },
            Err(err) => {
                log::warn!(
                    "[Config] Failed to read config file {:?}: {}. Using defaults.",
                    path.as_ref(),
                    err
                );
                Self::default()
            }
        }
    }
}
