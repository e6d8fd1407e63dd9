// MlFeatureMap - ordered name -> value map fed to the ensemble
//
// Insertion order is preserved. Re-inserting an existing key keeps its
// position and replaces its value, so merging video features after audio
// features lets the video duration win.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::analysis::{AcousticFeatures, VisualFeatures};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MlFeatureMap {
    entries: IndexMap<String, f64>,
}

impl MlFeatureMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: impl Into<String>, value: f64) {
        self.entries.insert(name.into(), value);
    }

    pub fn get(&self, name: &str) -> Option<f64> {
        self.entries.get(name).copied()
    }

    /// Value for `name`, or 0.0 when absent
    pub fn value(&self, name: &str) -> f64 {
        self.get(name).unwrap_or(0.0)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.entries.iter().map(|(key, value)| (key.as_str(), *value))
    }

    /// Merge `other` into this map; its values win on shared keys
    pub fn merge(&mut self, other: &MlFeatureMap) {
        for (name, value) in other.iter() {
            self.insert(name, value);
        }
    }

    /// Build the ensemble feature map from the core feature vectors
    pub fn from_features(acoustic: &AcousticFeatures, visual: Option<&VisualFeatures>) -> Self {
        let mut map = Self::new();
        map.insert("spectral_centroid", acoustic.spectral_centroid_hz);
        map.insert("zero_crossing_rate", acoustic.zero_crossing_rate);
        map.insert("duration", acoustic.duration_seconds);
        map.insert("rms_energy", acoustic.avg_loudness);
        map.insert("rms_std", acoustic.loudness_variation);
        map.insert("pitch_mean", acoustic.avg_pitch_hz);
        map.insert("pitch_std", acoustic.pitch_variation_hz);

        if let Some(visual) = visual {
            map.merge(&Self::from_visual(visual));
        }
        map
    }

    pub fn from_visual(visual: &VisualFeatures) -> Self {
        let mut map = Self::new();
        map.insert("avg_motion", visual.avg_motion);
        map.insert("motion_std", visual.motion_std);
        map.insert("avg_brightness", visual.avg_brightness);
        map.insert("duration", visual.duration_seconds);
        map
    }
}

impl FromIterator<(String, f64)> for MlFeatureMap {
    fn from_iter<T: IntoIterator<Item = (String, f64)>>(iter: T) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::ActivityLevel;

    #[test]
    fn test_insert_replaces_in_place() {
        let mut map = MlFeatureMap::new();
        map.insert("a", 1.0);
        map.insert("b", 2.0);
        map.insert("a", 3.0);
        let keys: Vec<&str> = map.iter().map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["a", "b"]);
        assert_eq!(map.get("a"), Some(3.0));
        assert_eq!(map.value("missing"), 0.0);
    }

    #[test]
    fn test_visual_duration_wins() {
        let acoustic = AcousticFeatures::new(1.5, 300.0, 20.0, 0.05, 0.01, 2000.0, 0.04);
        let visual = VisualFeatures {
            duration_seconds: 12.0,
            avg_motion: 0.6,
            motion_std: 0.1,
            avg_brightness: 90.0,
            dominant_activity: ActivityLevel::High,
            activity_samples: 10,
        };
        let map = MlFeatureMap::from_features(&acoustic, Some(&visual));
        assert_eq!(map.get("duration"), Some(12.0));
        assert_eq!(map.get("avg_motion"), Some(0.6));
        assert_eq!(map.get("pitch_mean"), Some(300.0));
        assert_eq!(map.len(), 10);
    }

    #[test]
    fn test_json_preserves_order() {
        let json = r#"{"pitch_mean": 250.0, "avg_motion": 0.6, "rms_energy": 0.02}"#;
        let map: MlFeatureMap = serde_json::from_str(json).unwrap();
        let keys: Vec<&str> = map.iter().map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["pitch_mean", "avg_motion", "rms_energy"]);
        assert_eq!(
            serde_json::to_string(&map).unwrap(),
            r#"{"pitch_mean":250.0,"avg_motion":0.6,"rms_energy":0.02}"#
        );
    }
}
