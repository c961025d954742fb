use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::models::{Axis, AxisScores, EvaluationRecord, Verdict, WeightVector};

/// Totals and verdict for one record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Scorecard {
    pub total_a: i32,
    pub total_b: i32,
    /// Absolute difference between the totals
    pub margin: u32,
    /// Verdict the totals alone would produce
    pub auto_winner: Verdict,
    /// Final verdict after any manual override
    pub winner: Verdict,
}

/// Weighted sum of the six weighted axes, rounded, minus the fallacy
/// penalty. The result is not clamped.
pub fn compute_total(scores: &AxisScores, weights: &WeightVector) -> i32 {
    let weighted: f64 = Axis::WEIGHTED
        .iter()
        .map(|&axis| weights.get(axis) * f64::from(scores.get(axis)))
        .sum();
    weighted.round() as i32 - scores.fallacy
}

/// Decide the winner.
///
/// A manual override always wins. Otherwise a difference below
/// `draw_threshold` is a draw, and A must be strictly ahead to win, so equal
/// totals with a zero threshold go to B.
pub fn determine_winner(
    total_a: i32,
    total_b: i32,
    draw_threshold: u32,
    winner_override: Option<Verdict>,
) -> Verdict {
    if let Some(verdict) = winner_override {
        return verdict;
    }
    if total_a.abs_diff(total_b) < draw_threshold {
        Verdict::Draw
    } else if total_a > total_b {
        Verdict::A
    } else {
        Verdict::B
    }
}

/// Compute totals and the verdict for a record
pub fn evaluate(record: &EvaluationRecord, weights: &WeightVector) -> Scorecard {
    let total_a = compute_total(&record.scores.a, weights);
    let total_b = compute_total(&record.scores.b, weights);
    let auto_winner = determine_winner(total_a, total_b, record.draw_threshold, None);
    let winner = determine_winner(
        total_a,
        total_b,
        record.draw_threshold,
        record.winner_override,
    );

    debug!(
        "Totals A={} B={} (threshold {}), auto={}, final={}",
        total_a, total_b, record.draw_threshold, auto_winner, winner
    );

    Scorecard {
        total_a,
        total_b,
        margin: total_a.abs_diff(total_b),
        auto_winner,
        winner,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn uniform(value: i32, fallacy: i32) -> AxisScores {
        AxisScores {
            validity: value,
            consistency: value,
            interpretation: value,
            clarity: value,
            persuasiveness: value,
            stance: value,
            fallacy,
        }
    }

    #[test]
    fn test_compute_total_default_record() {
        let record = EvaluationRecord::default();
        let weights = WeightVector::default();
        // 14 + 13 + 12 + 9 + 9 + 4.5 = 61.5 -> 62, minus 40
        assert_eq!(compute_total(&record.scores.a, &weights), 22);
        // 10 + 11 + 6 + 7.5 + 7.8 + 5.1 = 47.4 -> 47, minus 55
        assert_eq!(compute_total(&record.scores.b, &weights), -8);
    }

    #[test]
    fn test_compute_total_is_pure() {
        let scores = uniform(73, 12);
        let weights = WeightVector::default();
        let first = compute_total(&scores, &weights);
        let second = compute_total(&scores, &weights);
        assert_eq!(first, second);
        assert_eq!(first, 61);
        assert_eq!(scores, uniform(73, 12));
    }

    #[test]
    fn test_compute_total_is_not_clamped() {
        let weights = WeightVector::default();
        assert_eq!(compute_total(&uniform(0, 60), &weights), -60);
        assert_eq!(compute_total(&uniform(100, 0), &weights), 100);
    }

    #[test]
    fn test_equal_totals_with_zero_threshold_go_to_b() {
        assert_eq!(determine_winner(100, 100, 0, None), Verdict::B);
    }

    #[test]
    fn test_threshold_boundary() {
        assert_eq!(determine_winner(60, 50, 10, None), Verdict::A);
        assert_eq!(determine_winner(60, 51, 10, None), Verdict::Draw);
        assert_eq!(determine_winner(50, 60, 10, None), Verdict::B);
        assert_eq!(determine_winner(-5, 3, 0, None), Verdict::B);
    }

    #[test]
    fn test_override_always_wins() {
        assert_eq!(determine_winner(90, 10, 0, Some(Verdict::Draw)), Verdict::Draw);
        assert_eq!(determine_winner(10, 90, 50, Some(Verdict::A)), Verdict::A);
        assert_eq!(determine_winner(50, 50, 10, Some(Verdict::B)), Verdict::B);
    }

    #[test]
    fn test_evaluate_reports_auto_and_final_verdicts() {
        let record = EvaluationRecord {
            winner_override: Some(Verdict::B),
            ..Default::default()
        };
        let card = evaluate(&record, &WeightVector::default());

        assert_eq!(card.total_a, 22);
        assert_eq!(card.total_b, -8);
        assert_eq!(card.margin, 30);
        assert_eq!(card.auto_winner, Verdict::A);
        assert_eq!(card.winner, Verdict::B);
    }
}
