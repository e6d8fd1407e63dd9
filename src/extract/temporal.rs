// Temporal module - time-domain frame features

/// Root-mean-square amplitude of a frame
pub fn rms(frame: &[f32]) -> f32 {
    if frame.is_empty() {
        return 0.0;
    }
    let energy: f32 = frame.iter().map(|&x| x * x).sum();
    (energy / frame.len() as f32).sqrt()
}

/// Mean of squared samples over the whole signal
pub fn power(samples: &[f32]) -> f32 {
    if samples.is_empty() {
        return 0.0;
    }
    samples.iter().map(|&x| x * x).sum::<f32>() / samples.len() as f32
}

/// Zero-crossing rate (0.0 to 1.0)
///
/// Fraction of adjacent sample pairs whose sign differs; zero counts as
/// positive.
pub fn zero_crossing_rate(frame: &[f32]) -> f32 {
    if frame.len() < 2 {
        return 0.0;
    }

    let crossings = frame
        .windows(2)
        .filter(|pair| (pair[0] >= 0.0) != (pair[1] >= 0.0))
        .count();
    crossings as f32 / (frame.len() - 1) as f32
}
