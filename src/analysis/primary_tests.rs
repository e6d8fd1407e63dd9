use super::*;
use crate::analysis::state::Specificity;

/// Helper to build a neutral feature vector that triggers no upgrades
fn baseline_features() -> AcousticFeatures {
    AcousticFeatures::new(1.0, 300.0, 30.0, 0.05, 0.03, 2000.0, 0.05)
}

fn with_pitch(pitch: f64) -> AcousticFeatures {
    AcousticFeatures {
        avg_pitch_hz: pitch,
        ..baseline_features()
    }
}

#[test]
fn test_duration_band_boundaries() {
    let cases = [
        (0.29, UrgencyLevel::VeryLow),
        (0.3, UrgencyLevel::Low),
        (0.79, UrgencyLevel::Low),
        (0.8, UrgencyLevel::Medium),
        (1.5, UrgencyLevel::High),
        (2.99, UrgencyLevel::High),
        (3.0, UrgencyLevel::VeryHigh),
    ];

    for (duration, expected) in cases {
        let features = AcousticFeatures {
            duration_seconds: duration,
            ..baseline_features()
        };
        let reading = PrimaryInterpreter::classify(&features);
        assert_eq!(
            reading.urgency_base, expected,
            "duration {} should map to {:?}",
            duration, expected
        );
    }
}

#[test]
fn test_duration_detail_interpolates_value() {
    let features = AcousticFeatures {
        duration_seconds: 0.25,
        ..baseline_features()
    };
    let reading = PrimaryInterpreter::classify(&features);
    assert!(reading.details[0].contains("0.25s"));
    assert!(reading.details[0].contains("chirp"));
}

#[test]
fn test_pitch_band_boundaries_select_baseline() {
    let cases = [
        (601.0, Baseline::AttentionSeeking),
        (600.0, Baseline::SocialFriendly),
        (400.0, Baseline::Neutral),
        (250.0, Baseline::SeriousAssertive),
        (150.0, Baseline::SeriousComplaining),
        (0.0, Baseline::SeriousComplaining),
    ];

    for (pitch, expected) in cases {
        let reading = PrimaryInterpreter::classify(&with_pitch(pitch));
        assert_eq!(
            reading.emotional_state,
            EmotionalState::Generic(expected),
            "pitch {} should select {:?}",
            pitch,
            expected
        );
    }
}

#[test]
fn test_zero_pitch_reports_no_clear_pitch() {
    let reading = PrimaryInterpreter::classify(&with_pitch(0.0));
    assert!(reading.details[1].starts_with("No clear pitch detected"));
    assert_eq!(reading.primary_meaning.text, "Complaint or discomfort");
}

#[test]
fn test_top_pitch_band_detail() {
    let reading = PrimaryInterpreter::classify(&with_pitch(650.0));
    assert!(reading.details[1].starts_with("Very high pitch"));
    assert_eq!(reading.primary_meaning.specificity, Specificity::Derived);
}

#[test]
fn test_extreme_variation_upgrades_any_generic_state() {
    for pitch in [650.0, 450.0, 300.0, 200.0, 100.0] {
        let features = AcousticFeatures {
            pitch_variation_hz: 101.0,
            ..with_pitch(pitch)
        };
        let reading = PrimaryInterpreter::classify(&features);
        assert_eq!(
            reading.emotional_state,
            EmotionalState::Derived(EmotionKind::UrgentAnxious),
            "pitch {} with extreme variation",
            pitch
        );
    }
}

#[test]
fn test_stable_variation_only_upgrades_neutral() {
    let neutral = AcousticFeatures {
        pitch_variation_hz: 15.0,
        ..with_pitch(300.0)
    };
    assert_eq!(
        PrimaryInterpreter::classify(&neutral).emotional_state,
        EmotionalState::Derived(EmotionKind::CalmControlled)
    );

    let friendly = AcousticFeatures {
        pitch_variation_hz: 15.0,
        spectral_centroid_hz: 2000.0,
        ..with_pitch(450.0)
    };
    assert_eq!(
        PrimaryInterpreter::classify(&friendly).emotional_state,
        EmotionalState::Generic(Baseline::SocialFriendly)
    );
}

#[test]
fn test_loudness_band_urgency() {
    let cases = [
        (0.16, UrgencyLevel::VeryHigh),
        (0.15, UrgencyLevel::High),
        (0.08, UrgencyLevel::Medium),
        (0.04, UrgencyLevel::Low),
        (0.02, UrgencyLevel::Low),
        (0.0, UrgencyLevel::Low),
    ];

    for (loudness, expected) in cases {
        let features = AcousticFeatures {
            avg_loudness: loudness,
            ..baseline_features()
        };
        let reading = PrimaryInterpreter::classify(&features);
        assert_eq!(
            reading.urgency_level, expected,
            "loudness {} should give {:?}",
            loudness, expected
        );
    }
}

#[test]
fn test_loudness_refines_generic_meaning_only() {
    let generic = AcousticFeatures {
        avg_loudness: 0.1,
        ..with_pitch(300.0)
    };
    assert_eq!(
        PrimaryInterpreter::classify(&generic).primary_meaning.text,
        "Demanding attention"
    );

    let derived = AcousticFeatures {
        avg_loudness: 0.1,
        ..with_pitch(100.0)
    };
    assert_eq!(
        PrimaryInterpreter::classify(&derived).primary_meaning.text,
        "Complaint or discomfort"
    );
}

#[test]
fn test_loudness_variation_adds_detail_only() {
    let steady = AcousticFeatures {
        loudness_variation: 0.01,
        ..baseline_features()
    };
    let medium = AcousticFeatures {
        loudness_variation: 0.03,
        ..baseline_features()
    };
    let variable = AcousticFeatures {
        loudness_variation: 0.06,
        ..baseline_features()
    };

    let steady_reading = PrimaryInterpreter::classify(&steady);
    let medium_reading = PrimaryInterpreter::classify(&medium);
    let variable_reading = PrimaryInterpreter::classify(&variable);

    assert_eq!(steady_reading.details.len(), medium_reading.details.len() + 1);
    assert_eq!(variable_reading.details.len(), medium_reading.details.len() + 1);
    assert_eq!(steady_reading.emotional_state, medium_reading.emotional_state);
    assert_eq!(variable_reading.urgency_level, medium_reading.urgency_level);
    assert!(steady_reading
        .details
        .iter()
        .any(|d| d.starts_with("Steady intensity")));
}

#[test]
fn test_centroid_allow_lists() {
    // Attention-seeking is only upgraded by the brightest band
    let bright = AcousticFeatures {
        spectral_centroid_hz: 4100.0,
        pitch_variation_hz: 30.0,
        ..with_pitch(650.0)
    };
    assert_eq!(
        PrimaryInterpreter::classify(&bright).emotional_state,
        EmotionalState::Derived(EmotionKind::AlertExcited)
    );

    let less_bright = AcousticFeatures {
        spectral_centroid_hz: 3000.0,
        ..bright
    };
    assert_eq!(
        PrimaryInterpreter::classify(&less_bright).emotional_state,
        EmotionalState::Generic(Baseline::AttentionSeeking)
    );

    // Serious/Assertive is only upgraded by the mellowest band
    let mellow = AcousticFeatures {
        spectral_centroid_hz: 1000.0,
        pitch_variation_hz: 30.0,
        ..with_pitch(200.0)
    };
    assert_eq!(
        PrimaryInterpreter::classify(&mellow).emotional_state,
        EmotionalState::Derived(EmotionKind::RelaxedContent)
    );

    let complaining = AcousticFeatures {
        spectral_centroid_hz: 1000.0,
        pitch_variation_hz: 30.0,
        ..with_pitch(100.0)
    };
    assert_eq!(
        PrimaryInterpreter::classify(&complaining).emotional_state,
        EmotionalState::Generic(Baseline::SeriousComplaining)
    );
}

#[test]
fn test_roughness_override_dominates() {
    let inputs = [
        AcousticFeatures::new(0.25, 650.0, 110.0, 0.18, 0.02, 4200.0, 0.16),
        AcousticFeatures::new(2.5, 320.0, 120.0, 0.15, 0.01, 1800.0, 0.2),
        AcousticFeatures::new(1.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.5),
    ];

    for features in inputs {
        let reading = PrimaryInterpreter::classify(&features);
        assert_eq!(
            reading.emotional_state,
            EmotionalState::Derived(EmotionKind::DistressedUnwell)
        );
        assert!(reading.primary_meaning.text.contains("distress"));
    }
}

#[test]
fn test_mild_roughness_rewrites_by_substring() {
    let demanding = AcousticFeatures {
        avg_loudness: 0.1,
        zero_crossing_rate: 0.1,
        ..with_pitch(300.0)
    };
    assert_eq!(
        PrimaryInterpreter::classify(&demanding).primary_meaning.text,
        "Insistent demand with vocal strain"
    );

    let greeting = AcousticFeatures {
        avg_loudness: 0.03,
        zero_crossing_rate: 0.1,
        ..with_pitch(300.0)
    };
    assert_eq!(
        PrimaryInterpreter::classify(&greeting).primary_meaning.text,
        "Greeting with a slightly hoarse voice"
    );

    let complaint = AcousticFeatures {
        zero_crossing_rate: 0.1,
        ..with_pitch(100.0)
    };
    assert_eq!(
        PrimaryInterpreter::classify(&complaint).primary_meaning.text,
        "Complaint or discomfort"
    );
}

#[test]
fn test_one_detail_per_band() {
    // Loudness variation of 0.03 adds no extra detail
    let reading = PrimaryInterpreter::classify(&baseline_features());
    assert_eq!(reading.details.len(), 6);
}

#[test]
fn test_classify_is_deterministic() {
    let features = AcousticFeatures::new(0.7, 480.0, 55.0, 0.09, 0.06, 2600.0, 0.09);
    let first = PrimaryInterpreter::classify(&features);
    let second = PrimaryInterpreter::classify(&features);
    assert_eq!(first, second);
}
