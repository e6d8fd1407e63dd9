// Extract module - reference acoustic feature extraction from WAV audio
//
// Pipeline:
//   WAV (hound, down-mixed to mono)
//     -> frames (frame_size / hop_size)
//     -> per frame: RMS, ZCR, FFT centroid/bandwidth/rolloff, autocorrelation pitch
//     -> clip statistics (AcousticFeatures + ensemble feature map)
//
// `analyze_clip` adds segmentation: every meow-like segment is interpreted
// and the most confident candidate wins, falling back to the whole clip.
//
// Module organization:
// - fft: windowed magnitude spectra
// - filter: zero-phase band-pass ahead of segmentation
// - spectral: centroid, bandwidth, rolloff
// - temporal: RMS, power, zero-crossing rate
// - pitch: autocorrelation pitch tracker
// - segment: energy-based candidate segmentation

pub mod fft;
pub mod filter;
pub mod pitch;
pub mod segment;
pub mod spectral;
pub mod temporal;

use serde::Serialize;
use std::path::Path;

use crate::analysis::{interpret, select_best, AcousticFeatures, Interpretation, VisualFeatures};
use crate::config::{AppConfig, ExtractionConfig};
use crate::ensemble::MlFeatureMap;
use crate::error::FeatureError;

use fft::FftProcessor;
use pitch::PitchTracker;
use segment::Segmenter;
use spectral::SpectralFeatures;

/// Shortest signal the extractor accepts
pub const MIN_ANALYSIS_SAMPLES: usize = 256;

/// Mono audio at a fixed sample rate
#[derive(Debug, Clone, PartialEq)]
pub struct AudioClip {
    pub samples: Vec<f32>,
    pub sample_rate: u32,
}

impl AudioClip {
    pub fn new(samples: Vec<f32>, sample_rate: u32) -> Self {
        Self {
            samples,
            sample_rate,
        }
    }

    pub fn duration_seconds(&self) -> f64 {
        if self.sample_rate == 0 {
            return 0.0;
        }
        self.samples.len() as f64 / self.sample_rate as f64
    }
}

fn with_path(err: hound::Error, path: &Path) -> FeatureError {
    match FeatureError::from(err) {
        FeatureError::Io { reason, .. } => FeatureError::Io {
            path: path.display().to_string(),
            reason,
        },
        other => other,
    }
}

/// Decode a WAV file to mono f32 samples
///
/// Integer PCM is scaled by its bit depth; multi-channel audio is averaged.
pub fn read_wav(path: &Path) -> Result<AudioClip, FeatureError> {
    let mut reader = hound::WavReader::open(path).map_err(|err| with_path(err, path))?;
    let spec = reader.spec();
    if spec.channels == 0 {
        return Err(FeatureError::Decode {
            reason: format!("{} has zero channels", path.display()),
        });
    }

    let samples: Vec<f32> = match spec.sample_format {
        hound::SampleFormat::Float => reader
            .samples::<f32>()
            .collect::<Result<_, _>>()
            .map_err(|err| with_path(err, path))?,
        hound::SampleFormat::Int => match spec.bits_per_sample {
            16 => reader
                .samples::<i16>()
                .map(|sample| sample.map(|v| v as f32 / 32_768.0))
                .collect::<Result<_, _>>()
                .map_err(|err| with_path(err, path))?,
            bits @ (24 | 32) => {
                let scale = (1u64 << (bits - 1)) as f32;
                reader
                    .samples::<i32>()
                    .map(|sample| sample.map(|v| v as f32 / scale))
                    .collect::<Result<_, _>>()
                    .map_err(|err| with_path(err, path))?
            }
            bits => {
                return Err(FeatureError::UnsupportedFormat {
                    bits_per_sample: bits,
                })
            }
        },
    };

    if samples.is_empty() {
        return Err(FeatureError::EmptyAudio);
    }

    let channels = spec.channels as usize;
    let mono = if channels == 1 {
        samples
    } else {
        samples
            .chunks(channels)
            .map(|frame| frame.iter().sum::<f32>() / frame.len() as f32)
            .collect()
    };

    log::info!(
        "[Extract] Loaded {} ({} Hz, {} channel(s), {} samples)",
        path.display(),
        spec.sample_rate,
        spec.channels,
        mono.len()
    );
    Ok(AudioClip::new(mono, spec.sample_rate))
}

/// Per-clip extraction output
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClipFeatures {
    pub acoustic: AcousticFeatures,
    /// Audio keys in extraction order
    pub ml_features: MlFeatureMap,
    pub frames: usize,
    pub voiced_frames: usize,
}

fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Population standard deviation
fn std_dev(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let m = mean(values);
    (values.iter().map(|v| (v - m) * (v - m)).sum::<f64>() / values.len() as f64).sqrt()
}

/// FeatureExtractor coordinates the framewise DSP pipeline
pub struct FeatureExtractor {
    sample_rate: u32,
    frame_size: usize,
    hop_size: usize,
    fft_processor: FftProcessor,
    spectral_features: SpectralFeatures,
    pitch_tracker: PitchTracker,
}

impl FeatureExtractor {
    /// # Arguments
    /// * `sample_rate` - Audio sample rate in Hz
    /// * `config` - Frame and pitch-search parameters
    pub fn new(sample_rate: u32, config: &ExtractionConfig) -> Self {
        let frame_size = config.frame_size.max(MIN_ANALYSIS_SAMPLES);
        Self {
            sample_rate,
            frame_size,
            hop_size: config.hop_size.max(1),
            fft_processor: FftProcessor::new(frame_size),
            spectral_features: SpectralFeatures::new(sample_rate, frame_size),
            pitch_tracker: PitchTracker::new(sample_rate, config),
        }
    }

    fn frames<'a>(&self, samples: &'a [f32]) -> Vec<&'a [f32]> {
        if samples.len() <= self.frame_size {
            return vec![samples];
        }
        (0..=samples.len() - self.frame_size)
            .step_by(self.hop_size)
            .map(|start| &samples[start..start + self.frame_size])
            .collect()
    }

    /// Extract clip-level features
    ///
    /// # Arguments
    /// * `samples` - Mono audio
    ///
    /// # Returns
    /// ClipFeatures, or `EmptyAudio` / `TooShort` for unusable input
    pub fn extract(&self, samples: &[f32]) -> Result<ClipFeatures, FeatureError> {
        if samples.is_empty() {
            return Err(FeatureError::EmptyAudio);
        }
        if samples.len() < MIN_ANALYSIS_SAMPLES {
            return Err(FeatureError::TooShort {
                samples: samples.len(),
                required: MIN_ANALYSIS_SAMPLES,
            });
        }

        let frames = self.frames(samples);
        let mut rms = Vec::with_capacity(frames.len());
        let mut zcr = Vec::with_capacity(frames.len());
        let mut centroid = Vec::with_capacity(frames.len());
        let mut bandwidth = Vec::with_capacity(frames.len());
        let mut rolloff = Vec::with_capacity(frames.len());
        let mut pitches = Vec::new();

        for frame in &frames {
            rms.push(temporal::rms(frame) as f64);
            zcr.push(temporal::zero_crossing_rate(frame) as f64);

            let spectrum = self.fft_processor.magnitude_spectrum(frame);
            let frame_centroid = self.spectral_features.centroid(&spectrum);
            centroid.push(frame_centroid as f64);
            bandwidth.push(self.spectral_features.bandwidth(&spectrum, frame_centroid) as f64);
            rolloff.push(self.spectral_features.rolloff(&spectrum) as f64);

            if let Some(pitch) = self.pitch_tracker.detect(frame) {
                pitches.push(pitch as f64);
            }
        }

        let duration = samples.len() as f64 / self.sample_rate as f64;
        let acoustic = AcousticFeatures::new(
            duration,
            mean(&pitches),
            std_dev(&pitches),
            mean(&rms),
            std_dev(&rms),
            mean(&centroid),
            mean(&zcr),
        );

        let pitch_min = pitches.iter().cloned().fold(f64::INFINITY, f64::min);
        let pitch_max = pitches.iter().cloned().fold(f64::NEG_INFINITY, f64::max);

        let mut ml_features = MlFeatureMap::new();
        ml_features.insert("spectral_centroid", acoustic.spectral_centroid_hz);
        ml_features.insert("spectral_bandwidth", mean(&bandwidth));
        ml_features.insert("spectral_rolloff", mean(&rolloff));
        ml_features.insert("zero_crossing_rate", acoustic.zero_crossing_rate);
        ml_features.insert("duration", duration);
        ml_features.insert("rms_energy", acoustic.avg_loudness);
        ml_features.insert("rms_std", acoustic.loudness_variation);
        ml_features.insert("power", temporal::power(samples) as f64);
        ml_features.insert("pitch_mean", acoustic.avg_pitch_hz);
        ml_features.insert("pitch_std", acoustic.pitch_variation_hz);
        ml_features.insert("pitch_min", if pitches.is_empty() { 0.0 } else { pitch_min });
        ml_features.insert("pitch_max", if pitches.is_empty() { 0.0 } else { pitch_max });

        tracing::trace!(
            frames = frames.len(),
            voiced = pitches.len(),
            "extracted clip features"
        );

        Ok(ClipFeatures {
            acoustic,
            ml_features,
            frames: frames.len(),
            voiced_frames: pitches.len(),
        })
    }
}

/// Interpretation of one recording
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClipAnalysis {
    /// Whole-clip features
    pub clip_features: ClipFeatures,
    /// Number of meow-like segments interpreted
    pub candidates: usize,
    /// Best candidate (or whole clip when no segment qualified)
    pub interpretation: Interpretation,
}

/// Extract, segment and interpret a clip
///
/// # Arguments
/// * `clip` - Decoded mono audio
/// * `config` - Extraction and segmentation settings
/// * `visual` - Optional visual features for audio-visual correlation
pub fn analyze_clip(
    clip: &AudioClip,
    config: &AppConfig,
    visual: Option<&VisualFeatures>,
) -> Result<ClipAnalysis, FeatureError> {
    let extractor = FeatureExtractor::new(clip.sample_rate, &config.extraction);
    let clip_features = extractor.extract(&clip.samples)?;

    let segments = if config.segmentation.enabled {
        Segmenter::new(&config.segmentation).meow_candidates(clip, &extractor)
    } else {
        Vec::new()
    };
    let candidates = segments.len();

    let interpretation = if segments.is_empty() {
        tracing::debug!("[Extract] No meow-like segments; interpreting whole clip");
        interpret(&clip_features.acoustic, visual)
    } else {
        let interpreted = segments
            .iter()
            .map(|features| interpret(features, visual))
            .collect();
        select_best(interpreted).ok_or(FeatureError::EmptyAudio)?
    };

    Ok(ClipAnalysis {
        clip_features,
        candidates,
        interpretation,
    })
}

/// Decode and analyze a WAV file
pub fn analyze_wav(
    path: &Path,
    config: &AppConfig,
    visual: Option<&VisualFeatures>,
) -> Result<ClipAnalysis, FeatureError> {
    let clip = read_wav(path)?;
    analyze_clip(&clip, config, visual)
}
