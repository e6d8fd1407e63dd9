// Zero-phase band-pass filter applied before meow segmentation
//
// Second-order Butterworth high-pass and low-pass sections (bilinear
// transform), each run forward then backward so the cascade has no phase
// shift and the magnitude response of each edge is squared.

use std::f64::consts::{FRAC_1_SQRT_2, PI};

/// One direct-form I biquad section
#[derive(Debug, Clone, Copy, PartialEq)]
struct Biquad {
    b: [f64; 3],
    a: [f64; 2],
}

impl Biquad {
    fn high_pass(cutoff_hz: f64, sample_rate: f64) -> Self {
        let (cos_w0, alpha) = Self::prewarp(cutoff_hz, sample_rate);
        let a0 = 1.0 + alpha;
        let gain = (1.0 + cos_w0) / 2.0;
        Self {
            b: [gain / a0, -2.0 * gain / a0, gain / a0],
            a: [-2.0 * cos_w0 / a0, (1.0 - alpha) / a0],
        }
    }

    fn low_pass(cutoff_hz: f64, sample_rate: f64) -> Self {
        let (cos_w0, alpha) = Self::prewarp(cutoff_hz, sample_rate);
        let a0 = 1.0 + alpha;
        let gain = (1.0 - cos_w0) / 2.0;
        Self {
            b: [gain / a0, 2.0 * gain / a0, gain / a0],
            a: [-2.0 * cos_w0 / a0, (1.0 - alpha) / a0],
        }
    }

    fn prewarp(cutoff_hz: f64, sample_rate: f64) -> (f64, f64) {
        let w0 = 2.0 * PI * cutoff_hz / sample_rate;
        (w0.cos(), w0.sin() / (2.0 * FRAC_1_SQRT_2))
    }

    fn run(&self, signal: &mut [f64]) {
        let (mut x1, mut x2, mut y1, mut y2) = (0.0, 0.0, 0.0, 0.0);
        for sample in signal.iter_mut() {
            let x0 = *sample;
            let y0 = self.b[0] * x0 + self.b[1] * x1 + self.b[2] * x2
                - self.a[0] * y1
                - self.a[1] * y2;
            x2 = x1;
            x1 = x0;
            y2 = y1;
            y1 = y0;
            *sample = y0;
        }
    }
}

/// Band-pass over [low_hz, high_hz]
///
/// An edge at 0 Hz, or at or above Nyquist, is left open.
#[derive(Debug, Clone, PartialEq)]
pub struct BandPass {
    sections: Vec<Biquad>,
}

impl BandPass {
    pub fn new(sample_rate: u32, low_hz: f32, high_hz: f32) -> Self {
        let rate = sample_rate as f64;
        let nyquist = rate / 2.0;
        let mut sections = Vec::with_capacity(2);
        if low_hz > 0.0 && (low_hz as f64) < nyquist {
            sections.push(Biquad::high_pass(low_hz as f64, rate));
        }
        if high_hz > 0.0 && (high_hz as f64) < nyquist {
            sections.push(Biquad::low_pass(high_hz as f64, rate));
        }
        Self { sections }
    }

    /// True when neither edge is active
    pub fn is_passthrough(&self) -> bool {
        self.sections.is_empty()
    }

    /// Filter `samples` forward and backward
    pub fn apply(&self, samples: &[f32]) -> Vec<f32> {
        if self.is_passthrough() {
            return samples.to_vec();
        }

        let mut signal: Vec<f64> = samples.iter().map(|&s| s as f64).collect();
        for section in &self.sections {
            section.run(&mut signal);
            signal.reverse();
            section.run(&mut signal);
            signal.reverse();
        }
        signal.into_iter().map(|s| s as f32).collect()
    }
}
