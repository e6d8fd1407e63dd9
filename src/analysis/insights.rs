// InsightSynthesizer - narrative insights from detector tags
//
// Scan order is fixed: patterns, contexts, health (Medium/High only),
// pattern-count synthetic, confidence synthetic.

use serde::{Deserialize, Serialize};

use crate::analysis::context::{ContextId, ContextIndicator};
use crate::analysis::health::HealthIndicator;
use crate::analysis::patterns::{PatternId, VocalPattern};
use crate::analysis::state::{ConfidenceLevel, Strength};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InsightCategory {
    SocialBonding,
    PlayHunting,
    DistressAlert,
    Contentment,
    TrustAffection,
    Excitement,
    FeedingRoutine,
    EveningSocial,
    UrgentNeeds,
    BreathingConcern,
    HealthMonitoring,
    ComplexCommunication,
    AnalysisConfidence,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BehavioralInsight {
    pub category: InsightCategory,
    pub insight: String,
    pub recommendation: String,
}

impl BehavioralInsight {
    fn new(category: InsightCategory, insight: &str, recommendation: &str) -> Self {
        Self {
            category,
            insight: insight.to_string(),
            recommendation: recommendation.to_string(),
        }
    }
}

fn pattern_template(id: PatternId) -> Option<BehavioralInsight> {
    let (category, insight, recommendation) = match id {
        PatternId::Trill => (
            InsightCategory::SocialBonding,
            "Your cat is using a trill, a warm greeting reserved for trusted companions",
            "Respond with a soft voice or slow blink to reinforce the bond",
        ),
        PatternId::Chirp => (
            InsightCategory::PlayHunting,
            "Chirping signals excitement, often triggered by birds or moving toys",
            "Offer an interactive play session to channel the hunting drive",
        ),
        PatternId::Yowling => (
            InsightCategory::DistressAlert,
            "Yowling is a strong emotional call that may signal distress, territory or mating behavior",
            "Check for stressors or unmet needs; consult a vet if yowling is new or persistent",
        ),
        PatternId::PurrMeowCombo => (
            InsightCategory::Contentment,
            "A meow mixed with purring shows a relaxed cat making a polite request",
            "This is a good moment for gentle attention or a treat",
        ),
        PatternId::SilentMeow => (
            InsightCategory::TrustAffection,
            "The silent meow is a sign of deep affection and trust",
            "Acknowledge it calmly; your cat feels safe with you",
        ),
        PatternId::RapidSequence => (
            InsightCategory::Excitement,
            "Short, loud, rapid calls indicate excitement or impatience",
            "Identify what your cat is anticipating, such as food or play, and keep routines consistent",
        ),
        PatternId::DescendingPitch
        | PatternId::AscendingPitch
        | PatternId::HarmonicRichness => return None,
    };
    Some(BehavioralInsight::new(category, insight, recommendation))
}

fn context_template(id: ContextId) -> Option<BehavioralInsight> {
    let (category, insight, recommendation) = match id {
        ContextId::MorningDemand => (
            InsightCategory::FeedingRoutine,
            "This call matches the classic morning food demand",
            "An automatic feeder or consistent breakfast time can reduce early wake-up calls",
        ),
        ContextId::EveningSocial => (
            InsightCategory::EveningSocial,
            "Melodic evening calls are an invitation to socialize",
            "Set aside some quiet interaction time in the evening",
        ),
        ContextId::HighUrgencyCluster => (
            InsightCategory::UrgentNeeds,
            "Several urgency markers suggest your cat needs something right now",
            "Check food, water, litter box and access to favorite spaces",
        ),
        ContextId::IrregularBreathing => (
            InsightCategory::BreathingConcern,
            "Irregular breathing patterns were detected in the vocalization",
            "Watch for labored breathing at rest and consult a vet if it continues",
        ),
        ContextId::ModerateUrgencyCluster | ContextId::ControlledBreathing => return None,
    };
    Some(BehavioralInsight::new(category, insight, recommendation))
}

/// Combines detector outputs into ordered narrative insights
pub struct InsightSynthesizer;

impl InsightSynthesizer {
    pub fn synthesize(
        patterns: &[VocalPattern],
        contexts: &[ContextIndicator],
        health: &[HealthIndicator],
        confidence: ConfidenceLevel,
    ) -> Vec<BehavioralInsight> {
        let mut insights: Vec<BehavioralInsight> = patterns
            .iter()
            .filter_map(|p| pattern_template(p.pattern))
            .collect();

        insights.extend(contexts.iter().filter_map(|c| context_template(c.context)));

        insights.extend(
            health
                .iter()
                .filter(|h| h.severity >= Strength::Medium)
                .map(|h| BehavioralInsight {
                    category: InsightCategory::HealthMonitoring,
                    insight: format!("Health note: {}", h.description),
                    recommendation: h.recommendation.clone(),
                }),
        );

        if patterns.len() >= 3 {
            insights.push(BehavioralInsight::new(
                InsightCategory::ComplexCommunication,
                "Multiple vocal patterns in one call show sophisticated communication",
                "Your cat is highly expressive; keep responding to reinforce the dialogue",
            ));
        }

        match confidence {
            ConfidenceLevel::VeryHigh => insights.push(BehavioralInsight::new(
                InsightCategory::AnalysisConfidence,
                "The acoustic signals are clear and consistent, so this reading is very reliable",
                "Use this interpretation as a strong guide to your cat's current needs",
            )),
            ConfidenceLevel::VeryLow => insights.push(BehavioralInsight::new(
                InsightCategory::AnalysisConfidence,
                "The acoustic signals are weak or ambiguous, so this reading is uncertain",
                "Record in a quieter setting or capture a longer vocalization",
            )),
            _ => {}
        }

        insights
    }
}
