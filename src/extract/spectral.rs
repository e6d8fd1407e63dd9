// Spectral module - frequency-domain frame features
//
// All features are computed from the magnitude spectrum of one frame.
// A silent frame (magnitude sum below 1e-10) yields 0.0 for every feature.

/// Spectral rolloff threshold (85% of spectral energy)
const ROLLOFF_THRESHOLD: f32 = 0.85;

/// Spectral feature computation functions
pub struct SpectralFeatures {
    sample_rate: u32,
    fft_size: usize,
}

impl SpectralFeatures {
    /// # Arguments
    /// * `sample_rate` - Audio sample rate in Hz
    /// * `fft_size` - FFT window size
    pub fn new(sample_rate: u32, fft_size: usize) -> Self {
        Self {
            sample_rate,
            fft_size,
        }
    }

    fn bin_width(&self) -> f32 {
        self.sample_rate as f32 / self.fft_size as f32
    }

    /// Spectral centroid (weighted mean frequency) in Hz
    ///
    /// Formula: centroid = Σ(f_i × |X[i]|) / Σ|X[i]|
    pub fn centroid(&self, spectrum: &[f32]) -> f32 {
        let bin_width = self.bin_width();
        let magnitude_sum: f32 = spectrum.iter().sum();
        if magnitude_sum <= 1e-10 {
            return 0.0;
        }

        let weighted_sum: f32 = spectrum
            .iter()
            .enumerate()
            .map(|(i, &mag)| i as f32 * bin_width * mag)
            .sum();
        weighted_sum / magnitude_sum
    }

    /// Spectral bandwidth (magnitude-weighted spread around the centroid) in Hz
    ///
    /// Formula: bandwidth = sqrt(Σ(|X[i]| × (f_i - centroid)²) / Σ|X[i]|)
    pub fn bandwidth(&self, spectrum: &[f32], centroid: f32) -> f32 {
        let bin_width = self.bin_width();
        let magnitude_sum: f32 = spectrum.iter().sum();
        if magnitude_sum <= 1e-10 {
            return 0.0;
        }

        let spread: f32 = spectrum
            .iter()
            .enumerate()
            .map(|(i, &mag)| {
                let offset = i as f32 * bin_width - centroid;
                mag * offset * offset
            })
            .sum();
        (spread / magnitude_sum).sqrt()
    }

    /// Frequency below which 85% of the spectral energy is contained
    pub fn rolloff(&self, spectrum: &[f32]) -> f32 {
        let total_energy: f32 = spectrum.iter().map(|&mag| mag * mag).sum();
        if total_energy < 1e-10 {
            return 0.0;
        }

        let threshold = ROLLOFF_THRESHOLD * total_energy;
        let bin_width = self.bin_width();

        let mut cumulative_energy = 0.0;
        for (i, &mag) in spectrum.iter().enumerate() {
            cumulative_energy += mag * mag;
            if cumulative_energy >= threshold {
                return i as f32 * bin_width;
            }
        }

        // Rounding left the threshold unreached; report Nyquist
        (spectrum.len() - 1) as f32 * bin_width
    }
}
