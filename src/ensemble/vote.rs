// Confidence-weighted majority vote
//
// Weights are accumulated per label in first-seen order and normalized by
// the total. The winner is the largest normalized weight; an exact tie
// keeps the label that was encountered first.

use crate::ensemble::model::BehaviorLabel;

/// Normalized vote share for one label
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VoteShare {
    pub label: BehaviorLabel,
    pub weight: f64,
}

/// Combine `(label, confidence)` votes into a single label
///
/// # Returns
/// Winning label and the normalized share of every label seen.
/// No votes yields `BehaviorLabel::Unknown`.
pub fn combine_predictions(votes: &[(BehaviorLabel, f64)]) -> (BehaviorLabel, Vec<VoteShare>) {
    let mut shares: Vec<VoteShare> = Vec::new();
    let mut total = 0.0;

    for &(label, confidence) in votes {
        match shares.iter_mut().find(|share| share.label == label) {
            Some(share) => share.weight += confidence,
            None => shares.push(VoteShare {
                label,
                weight: confidence,
            }),
        }
        total += confidence;
    }

    if total > 0.0 {
        for share in &mut shares {
            share.weight /= total;
        }
    }

    let mut winner: Option<VoteShare> = None;
    for share in &shares {
        match winner {
            Some(best) if share.weight <= best.weight => {}
            _ => winner = Some(*share),
        }
    }

    let label = winner.map_or(BehaviorLabel::Unknown, |share| share.label);
    (label, shares)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_weighted_majority() {
        let votes = [
            (BehaviorLabel::Calm, 0.9),
            (BehaviorLabel::Vocal, 0.6),
            (BehaviorLabel::Vocal, 0.6),
        ];
        let (label, shares) = combine_predictions(&votes);
        assert_eq!(label, BehaviorLabel::Vocal);
        assert!((shares[1].weight - 0.571_428_571).abs() < 1e-6);
    }

    #[test]
    fn test_confidence_outweighs_count() {
        let votes = [
            (BehaviorLabel::Active, 0.3),
            (BehaviorLabel::Active, 0.3),
            (BehaviorLabel::Excited, 0.95),
        ];
        assert_eq!(combine_predictions(&votes).0, BehaviorLabel::Excited);
    }

    #[test]
    fn test_tie_keeps_first_encountered() {
        let votes = [(BehaviorLabel::Calm, 0.6), (BehaviorLabel::Vocal, 0.6)];
        assert_eq!(combine_predictions(&votes).0, BehaviorLabel::Calm);

        let reversed = [(BehaviorLabel::Vocal, 0.6), (BehaviorLabel::Calm, 0.6)];
        assert_eq!(combine_predictions(&reversed).0, BehaviorLabel::Vocal);
    }

    #[test]
    fn test_no_votes_is_unknown() {
        let (label, shares) = combine_predictions(&[]);
        assert_eq!(label, BehaviorLabel::Unknown);
        assert!(shares.is_empty());
    }
}
