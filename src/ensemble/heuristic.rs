// Heuristic fallback used in place of an unavailable ensemble member

use crate::ensemble::feature_map::MlFeatureMap;
use crate::ensemble::model::BehaviorLabel;

/// Confidence assigned to each heuristic pseudo-vote
pub const HEURISTIC_CONFIDENCE: f64 = 0.6;

/// Four-branch rule over motion, pitch and vocal energy
///
/// motion > 0.5 and pitch > 200 -> excited; motion > 0.5 -> active;
/// energy > 0.1 -> vocal; otherwise calm. Absent keys read as 0.
pub fn heuristic_classification(features: &MlFeatureMap) -> BehaviorLabel {
    if features.value("avg_motion") > 0.5 {
        if features.value("pitch_mean") > 200.0 {
            BehaviorLabel::Excited
        } else {
            BehaviorLabel::Active
        }
    } else if features.value("rms_energy") > 0.1 {
        BehaviorLabel::Vocal
    } else {
        BehaviorLabel::Calm
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn map(entries: &[(&str, f64)]) -> MlFeatureMap {
        entries
            .iter()
            .map(|(key, value)| (key.to_string(), *value))
            .collect()
    }

    #[test]
    fn test_heuristic_branches() {
        assert_eq!(
            heuristic_classification(&map(&[("avg_motion", 0.6), ("pitch_mean", 250.0)])),
            BehaviorLabel::Excited
        );
        assert_eq!(
            heuristic_classification(&map(&[("avg_motion", 0.6), ("pitch_mean", 150.0)])),
            BehaviorLabel::Active
        );
        assert_eq!(
            heuristic_classification(&map(&[("avg_motion", 0.2), ("rms_energy", 0.2)])),
            BehaviorLabel::Vocal
        );
        assert_eq!(
            heuristic_classification(&map(&[("avg_motion", 0.5), ("rms_energy", 0.1)])),
            BehaviorLabel::Calm
        );
    }
}
