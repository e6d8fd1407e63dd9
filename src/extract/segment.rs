// Candidate meow segmentation
//
// The clip is band-passed to the meow range first. Windowed RMS energy
// is thresholded at a percentile of its own distribution. Contiguous runs
// of windows strictly above the threshold become segments; a run still
// open at the end of the clip closes at the last sample. Runs outside
// [min_segment_seconds, max_segment_seconds] are dropped, and survivors
// must look like a meow (pitch and variation) to be analyzed as
// candidates.

use serde::Serialize;

use crate::analysis::AcousticFeatures;
use crate::config::SegmentationConfig;
use crate::error::FeatureError;
use crate::extract::filter::BandPass;
use crate::extract::temporal;
use crate::extract::{AudioClip, FeatureExtractor};

/// Sample range of one candidate vocalization
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Segment {
    pub start_sample: usize,
    pub end_sample: usize,
}

impl Segment {
    pub fn len(&self) -> usize {
        self.end_sample - self.start_sample
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn duration_seconds(&self, sample_rate: u32) -> f64 {
        self.len() as f64 / sample_rate as f64
    }
}

/// Value at `pct` (0-100) with linear interpolation between ranks
pub fn percentile(values: &[f32], pct: f32) -> f32 {
    if values.is_empty() {
        return 0.0;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));

    let rank = (pct.clamp(0.0, 100.0) / 100.0) * (sorted.len() - 1) as f32;
    let lower = rank.floor() as usize;
    let upper = rank.ceil() as usize;
    let fraction = rank - lower as f32;
    sorted[lower] + (sorted[upper] - sorted[lower]) * fraction
}

pub struct Segmenter {
    config: SegmentationConfig,
}

impl Segmenter {
    pub fn new(config: &SegmentationConfig) -> Self {
        Self {
            config: config.clone(),
        }
    }

    fn samples_for_ms(ms: f32, sample_rate: u32) -> usize {
        ((ms / 1000.0) * sample_rate as f32).round().max(1.0) as usize
    }

    /// RMS of each analysis window and the hop between windows (samples)
    pub fn window_energies(&self, samples: &[f32], sample_rate: u32) -> (Vec<f32>, usize) {
        let window = Self::samples_for_ms(self.config.window_ms, sample_rate);
        let hop = Self::samples_for_ms(self.config.hop_ms, sample_rate);

        if samples.len() <= window {
            return (vec![temporal::rms(samples)], hop);
        }

        let energies = (0..=samples.len() - window)
            .step_by(hop)
            .map(|start| temporal::rms(&samples[start..start + window]))
            .collect();
        (energies, hop)
    }

    /// Segments whose duration falls within the configured range
    pub fn find_segments(&self, samples: &[f32], sample_rate: u32) -> Vec<Segment> {
        let (energies, hop) = self.window_energies(samples, sample_rate);
        let threshold = percentile(&energies, self.config.energy_percentile);

        let mut runs = Vec::new();
        let mut open: Option<usize> = None;
        for (i, &energy) in energies.iter().enumerate() {
            match (energy > threshold, open) {
                (true, None) => open = Some(i * hop),
                (false, Some(start)) => {
                    runs.push(Segment {
                        start_sample: start,
                        end_sample: (i * hop).min(samples.len()),
                    });
                    open = None;
                }
                _ => {}
            }
        }
        if let Some(start) = open {
            runs.push(Segment {
                start_sample: start,
                end_sample: samples.len(),
            });
        }

        let min = self.config.min_segment_seconds as f64;
        let max = self.config.max_segment_seconds as f64;
        runs.into_iter()
            .filter(|segment| {
                let duration = segment.duration_seconds(sample_rate);
                duration >= min && duration <= max
            })
            .collect()
    }

    /// Meow-like: mean pitch within range, some variation, plausible length
    pub fn is_likely_meow(&self, features: &AcousticFeatures) -> bool {
        let pitch = features.avg_pitch_hz;
        pitch >= self.config.meow_min_pitch_hz as f64
            && pitch <= self.config.meow_max_pitch_hz as f64
            && features.pitch_variation_hz > self.config.meow_min_pitch_variation_hz as f64
            && features.duration_seconds >= self.config.min_segment_seconds as f64
            && features.duration_seconds <= self.config.max_segment_seconds as f64
    }

    /// Features of every meow-like segment, in time order
    ///
    /// Segments are cut from the band-passed signal. Segments too short to
    /// extract are skipped.
    pub fn meow_candidates(
        &self,
        clip: &AudioClip,
        extractor: &FeatureExtractor,
    ) -> Vec<AcousticFeatures> {
        let filtered = BandPass::new(
            clip.sample_rate,
            self.config.bandpass_low_hz,
            self.config.bandpass_high_hz,
        )
        .apply(&clip.samples);
        let segments = self.find_segments(&filtered, clip.sample_rate);
        tracing::debug!("[Segmenter] {} segment(s) in duration range", segments.len());

        segments
            .iter()
            .filter_map(|segment| {
                let samples = &filtered[segment.start_sample..segment.end_sample];
                match extractor.extract(samples) {
                    Ok(features) => Some(features.acoustic),
                    Err(err @ FeatureError::TooShort { .. }) => {
                        tracing::debug!("[Segmenter] skipping segment: {}", err);
                        None
                    }
                    Err(err) => {
                        tracing::warn!("[Segmenter] segment extraction failed: {}", err);
                        None
                    }
                }
            })
            .filter(|features| self.is_likely_meow(features))
            .collect()
    }
}
