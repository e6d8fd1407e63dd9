// State - ordered levels and tagged interpretation state
//
// Levels are ordered enums so comparisons like "at least Medium" are
// structural. Emotional state and primary meaning carry an explicit
// Generic/Derived tag; later bands may only replace a Generic value.

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// Urgency of a vocalization, lowest to highest
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum UrgencyLevel {
    #[serde(rename = "Very Low")]
    VeryLow,
    Low,
    Medium,
    High,
    #[serde(rename = "Very High")]
    VeryHigh,
}

impl UrgencyLevel {
    pub fn label(self) -> &'static str {
        match self {
            UrgencyLevel::VeryLow => "Very Low",
            UrgencyLevel::Low => "Low",
            UrgencyLevel::Medium => "Medium",
            UrgencyLevel::High => "High",
            UrgencyLevel::VeryHigh => "Very High",
        }
    }
}

impl fmt::Display for UrgencyLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Discretized confidence bucket, lowest to highest
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ConfidenceLevel {
    #[serde(rename = "Very Low")]
    VeryLow,
    Low,
    Medium,
    High,
    #[serde(rename = "Very High")]
    VeryHigh,
}

impl ConfidenceLevel {
    pub fn label(self) -> &'static str {
        match self {
            ConfidenceLevel::VeryLow => "Very Low",
            ConfidenceLevel::Low => "Low",
            ConfidenceLevel::Medium => "Medium",
            ConfidenceLevel::High => "High",
            ConfidenceLevel::VeryHigh => "Very High",
        }
    }

    /// Parse a human label such as `"Very High"`
    pub fn from_label(label: &str) -> Option<Self> {
        match label {
            "Very Low" => Some(ConfidenceLevel::VeryLow),
            "Low" => Some(ConfidenceLevel::Low),
            "Medium" => Some(ConfidenceLevel::Medium),
            "High" => Some(ConfidenceLevel::High),
            "Very High" => Some(ConfidenceLevel::VeryHigh),
            _ => None,
        }
    }

    /// True for the two outermost buckets
    pub fn is_extreme(self) -> bool {
        matches!(self, ConfidenceLevel::VeryLow | ConfidenceLevel::VeryHigh)
    }
}

impl fmt::Display for ConfidenceLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Three-step strength used for pattern confidence and health severity
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Strength {
    Low,
    Medium,
    High,
}

impl fmt::Display for Strength {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Strength::Low => "Low",
            Strength::Medium => "Medium",
            Strength::High => "High",
        };
        f.write_str(label)
    }
}

/// Baseline emotional states set by the pitch band
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Baseline {
    AttentionSeeking,
    SocialFriendly,
    Neutral,
    SeriousAssertive,
    SeriousComplaining,
}

impl Baseline {
    pub fn label(self) -> &'static str {
        match self {
            Baseline::AttentionSeeking => "Attention-Seeking",
            Baseline::SocialFriendly => "Social/Friendly",
            Baseline::Neutral => "Neutral",
            Baseline::SeriousAssertive => "Serious/Assertive",
            Baseline::SeriousComplaining => "Serious/Complaining",
        }
    }
}

/// Specific emotional states produced by later bands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EmotionKind {
    UrgentAnxious,
    ExpressiveEmotional,
    CalmControlled,
    AlertExcited,
    RelaxedContent,
    DistressedUnwell,
}

impl EmotionKind {
    pub fn label(self) -> &'static str {
        match self {
            EmotionKind::UrgentAnxious => "Urgent/Anxious",
            EmotionKind::ExpressiveEmotional => "Expressive/Emotional",
            EmotionKind::CalmControlled => "Calm/Controlled",
            EmotionKind::AlertExcited => "Alert/Excited",
            EmotionKind::RelaxedContent => "Relaxed/Content",
            EmotionKind::DistressedUnwell => "Distressed/Unwell",
        }
    }
}

const BASELINES: [Baseline; 5] = [
    Baseline::AttentionSeeking,
    Baseline::SocialFriendly,
    Baseline::Neutral,
    Baseline::SeriousAssertive,
    Baseline::SeriousComplaining,
];

const EMOTION_KINDS: [EmotionKind; 6] = [
    EmotionKind::UrgentAnxious,
    EmotionKind::ExpressiveEmotional,
    EmotionKind::CalmControlled,
    EmotionKind::AlertExcited,
    EmotionKind::RelaxedContent,
    EmotionKind::DistressedUnwell,
];

/// Emotional state of an interpretation
///
/// A `Generic` baseline is a placeholder that later bands are allowed to
/// replace. Once `Derived`, only the roughness override can change it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EmotionalState {
    Generic(Baseline),
    Derived(EmotionKind),
}

impl EmotionalState {
    pub fn label(self) -> &'static str {
        match self {
            EmotionalState::Generic(baseline) => baseline.label(),
            EmotionalState::Derived(kind) => kind.label(),
        }
    }

    pub fn is_generic(self) -> bool {
        matches!(self, EmotionalState::Generic(_))
    }

    /// Replace any generic baseline with `kind`
    pub fn upgrade_generic(self, kind: EmotionKind) -> Self {
        match self {
            EmotionalState::Generic(_) => EmotionalState::Derived(kind),
            derived => derived,
        }
    }

    /// Replace the baseline with `kind` only when it is one of `allowed`
    pub fn upgrade_from(self, allowed: &[Baseline], kind: EmotionKind) -> Self {
        match self {
            EmotionalState::Generic(baseline) if allowed.contains(&baseline) => {
                EmotionalState::Derived(kind)
            }
            other => other,
        }
    }

    /// Parse a label back into a state
    pub fn from_label(label: &str) -> Option<Self> {
        BASELINES
            .iter()
            .find(|baseline| baseline.label() == label)
            .map(|baseline| EmotionalState::Generic(*baseline))
            .or_else(|| {
                EMOTION_KINDS
                    .iter()
                    .find(|kind| kind.label() == label)
                    .map(|kind| EmotionalState::Derived(*kind))
            })
    }
}

impl fmt::Display for EmotionalState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl Serialize for EmotionalState {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.label())
    }
}

impl<'de> Deserialize<'de> for EmotionalState {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let label = String::deserialize(deserializer)?;
        EmotionalState::from_label(&label)
            .ok_or_else(|| D::Error::custom(format!("unknown emotional state '{}'", label)))
    }
}

/// Whether a primary meaning is still a replaceable placeholder
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Specificity {
    Generic,
    Derived,
}

/// Primary meaning phrase tagged with its specificity
///
/// Serializes as the bare phrase; the tag only guards later overwrites.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrimaryMeaning {
    pub text: String,
    pub specificity: Specificity,
}

impl PrimaryMeaning {
    pub fn generic(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            specificity: Specificity::Generic,
        }
    }

    pub fn derived(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            specificity: Specificity::Derived,
        }
    }

    pub fn is_generic(&self) -> bool {
        self.specificity == Specificity::Generic
    }

    /// Replace a generic placeholder with a specific phrase
    pub fn refine(self, text: &str) -> Self {
        if self.is_generic() {
            PrimaryMeaning::derived(text)
        } else {
            self
        }
    }

    pub fn mentions(&self, word: &str) -> bool {
        self.text.to_lowercase().contains(word)
    }
}

impl fmt::Display for PrimaryMeaning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

impl Serialize for PrimaryMeaning {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.text)
    }
}

impl<'de> Deserialize<'de> for PrimaryMeaning {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        String::deserialize(deserializer).map(PrimaryMeaning::derived)
    }
}
