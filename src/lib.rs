// Meow Interpreter Core - cat vocalization interpretation
// Rule-based acoustic interpretation with an optional ML ensemble path

// Module declarations
pub mod analysis;
pub mod batch;
pub mod config;
pub mod ensemble;
pub mod error;
pub mod extract;
pub mod fixtures;

// Re-exports for convenience
pub use analysis::{interpret, select_best, AcousticFeatures, Interpretation, VisualFeatures};
pub use config::AppConfig;
pub use ensemble::{CombinedAnalysis, EnsembleAdapter, MlFeatureMap, MlResult};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_module_structure() {
        let features = AcousticFeatures::new(1.0, 300.0, 30.0, 0.05, 0.03, 2000.0, 0.05);
        let interpretation = interpret(&features, None);
        let ml = EnsembleAdapter::default().analyze(&MlFeatureMap::from_features(&features, None));
        let combined = CombinedAnalysis::build(Some(interpretation), Some(ml));
        assert_eq!(combined.enhanced_interpretation.analysis_method, "validated_hybrid");
    }
}
