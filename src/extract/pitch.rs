// Autocorrelation pitch tracker
//
// For each frame the biased autocorrelation r[lag] = Σ x[n]·x[n+lag] is
// searched over the lag range implied by [min_pitch_hz, max_pitch_hz].
// The frame is voiced when the best normalized peak r[lag]/r[0] reaches
// the voicing threshold and the frame RMS exceeds the silence floor.
// The biased sum decays with lag, so the first period outranks its
// multiples and octave-down errors stay rare.

use crate::config::ExtractionConfig;
use crate::extract::temporal;

pub struct PitchTracker {
    sample_rate: u32,
    min_lag: usize,
    max_lag: usize,
    voicing_threshold: f32,
    silence_rms: f32,
}

impl PitchTracker {
    pub fn new(sample_rate: u32, config: &ExtractionConfig) -> Self {
        let rate = sample_rate as f32;
        let min_lag = (rate / config.max_pitch_hz.max(1.0)).floor().max(2.0) as usize;
        let max_lag = (rate / config.min_pitch_hz.max(1.0)).ceil() as usize;
        Self {
            sample_rate,
            min_lag,
            max_lag: max_lag.max(min_lag + 1),
            voicing_threshold: config.voicing_threshold,
            silence_rms: config.silence_rms,
        }
    }

    /// Fundamental frequency of a frame in Hz, or `None` when unvoiced
    pub fn detect(&self, frame: &[f32]) -> Option<f32> {
        if temporal::rms(frame) <= self.silence_rms {
            return None;
        }

        let max_lag = self.max_lag.min(frame.len().saturating_sub(1));
        if max_lag <= self.min_lag {
            return None;
        }

        let r0 = autocorrelation(frame, 0);
        if r0 <= 0.0 {
            return None;
        }

        // Scan one lag either side so the peak can be interpolated
        let lo = self.min_lag - 1;
        let hi = max_lag + 1;
        let r: Vec<f32> = (lo..=hi.min(frame.len() - 1))
            .map(|lag| autocorrelation(frame, lag) / r0)
            .collect();

        let mut best: Option<(usize, f32)> = None;
        for lag in self.min_lag..=max_lag {
            let idx = lag - lo;
            let value = r[idx];
            let is_peak = value >= r[idx - 1] && r.get(idx + 1).map_or(true, |next| value >= *next);
            if !is_peak {
                continue;
            }
            match best {
                Some((_, current)) if value <= current => {}
                _ => best = Some((lag, value)),
            }
        }

        let (lag, value) = best?;
        if value < self.voicing_threshold {
            return None;
        }

        let idx = lag - lo;
        let refined = match r.get(idx + 1) {
            Some(&next) => lag as f32 + parabolic_offset(r[idx - 1], r[idx], next),
            None => lag as f32,
        };
        Some(self.sample_rate as f32 / refined)
    }
}

fn autocorrelation(frame: &[f32], lag: usize) -> f32 {
    frame
        .iter()
        .zip(&frame[lag..])
        .map(|(a, b)| a * b)
        .sum()
}

/// Vertex offset of the parabola through three equally spaced points
fn parabolic_offset(left: f32, center: f32, right: f32) -> f32 {
    let denom = left - 2.0 * center + right;
    if denom.abs() < 1e-12 {
        return 0.0;
    }
    (0.5 * (left - right) / denom).clamp(-0.5, 0.5)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    fn sine(frequency: f32, sample_rate: u32, len: usize) -> Vec<f32> {
        (0..len)
            .map(|i| {
                0.5 * (2.0 * std::f32::consts::PI * frequency * i as f32 / sample_rate as f32).sin()
            })
            .collect()
    }

    fn tracker(sample_rate: u32) -> PitchTracker {
        PitchTracker::new(sample_rate, &ExtractionConfig::default())
    }

    #[test]
    fn test_detects_sine_pitch() {
        for frequency in [150.0, 440.0, 700.0] {
            let pitch = tracker(22050)
                .detect(&sine(frequency, 22050, 2048))
                .unwrap();
            assert!(
                (pitch - frequency).abs() < frequency * 0.02,
                "expected {} got {}",
                frequency,
                pitch
            );
        }
    }

    #[test]
    fn test_silence_is_unvoiced() {
        assert!(tracker(22050).detect(&[0.0; 2048]).is_none());
        assert!(tracker(22050).detect(&[0.0005; 2048]).is_none());
    }

    #[test]
    fn test_white_noise_is_unvoiced() {
        let mut rng = StdRng::seed_from_u64(7);
        let noise: Vec<f32> = (0..2048).map(|_| rng.gen_range(-0.5..0.5)).collect();
        assert!(tracker(22050).detect(&noise).is_none());
    }

    #[test]
    fn test_frame_shorter_than_lag_range() {
        assert!(tracker(22050).detect(&sine(440.0, 22050, 10)).is_none());
    }
}
