use crate::models::{Axis, AxisScores, clamp_penalty, clamp_round};

use super::SpeakerStats;

/// Maximum topic length in UTF-16 code units
pub const TOPIC_MAX_LEN: usize = 80;

const SCORE_FLOOR: f64 = 15.0;
const SCORE_CEILING: f64 = 95.0;
const STANCE_FLOOR: f64 = 20.0;
const STANCE_CEILING: f64 = 92.0;

/// Baseline each synthesized axis is mirrored around
pub fn baseline(axis: Axis) -> f64 {
    match axis {
        Axis::Validity => 60.0,
        Axis::Consistency => 58.0,
        Axis::Interpretation => 62.0,
        Axis::Clarity => 57.0,
        Axis::Persuasiveness => 60.0,
        Axis::Stance => 70.0,
        Axis::Fallacy => 0.0,
    }
}

fn bounds(axis: Axis) -> (f64, f64) {
    match axis {
        Axis::Stance => (STANCE_FLOOR, STANCE_CEILING),
        _ => (SCORE_FLOOR, SCORE_CEILING),
    }
}

/// Signed differential in A's favour for a weighted axis
pub fn differential(axis: Axis, a: &SpeakerStats, b: &SpeakerStats) -> f64 {
    let f = f64::from;
    let reference = (f(a.questions) - f(b.questions)) * 2.0;
    match axis {
        Axis::Validity => (f(a.lines) - f(b.lines)) * 1.5,
        Axis::Consistency => (a.avg_len() - b.avg_len()) * 6.0,
        Axis::Interpretation => reference,
        Axis::Clarity => (f(b.exclaims) - f(a.exclaims)) * 1.4,
        Axis::Persuasiveness => (f(a.chars) - f(b.chars)) * 0.04 + reference * 0.3,
        Axis::Stance => {
            (f(b.negatives) + f(b.exclaims) * 0.5 - f(a.negatives) - f(a.exclaims) * 0.5) * 3.0
        }
        Axis::Fallacy => 0.0,
    }
}

/// Fallacy penalty from interjections and hostility
pub fn fallacy_penalty(stats: &SpeakerStats) -> i32 {
    clamp_penalty(20.0 + f64::from(stats.exclaims) * 2.0 + f64::from(stats.negatives) * 5.0)
}

/// Build mirror-symmetric scores for both sides
pub fn synthesize_scores(a: &SpeakerStats, b: &SpeakerStats) -> (AxisScores, AxisScores) {
    let mut scores_a = AxisScores::default();
    let mut scores_b = AxisScores::default();

    for axis in Axis::WEIGHTED {
        let base = baseline(axis);
        let diff = differential(axis, a, b);
        let (min, max) = bounds(axis);
        scores_a.set(axis, f64::from(clamp_round(base + diff, min, max)));
        scores_b.set(axis, f64::from(clamp_round(base - diff, min, max)));
    }

    scores_a.set(Axis::Fallacy, f64::from(fallacy_penalty(a)));
    scores_b.set(Axis::Fallacy, f64::from(fallacy_penalty(b)));

    (scores_a, scores_b)
}

/// Topic from the first line with its speaker label removed
pub fn derive_topic(first_line: Option<&str>, side_a: &str, side_b: &str) -> String {
    let line = first_line
        .map(|line| super::strip_speaker_label(line).trim())
        .unwrap_or("");
    let candidate = truncate_utf16(line, TOPIC_MAX_LEN);

    if candidate.is_empty() {
        format!("{} vs {} のレスバログ", side_a, side_b)
    } else {
        candidate.to_string()
    }
}

/// Longest prefix of at most `max` UTF-16 code units. A character that
/// would straddle the limit is dropped whole.
fn truncate_utf16(text: &str, max: usize) -> &str {
    let mut units = 0;
    for (idx, ch) in text.char_indices() {
        units += ch.len_utf16();
        if units > max {
            return &text[..idx];
        }
    }
    text
}

/// The three summary lines: turn counts, questions, penalties
pub fn summary_reasons(
    side_a: &str,
    side_b: &str,
    a: &SpeakerStats,
    b: &SpeakerStats,
    scores_a: &AxisScores,
    scores_b: &AxisScores,
) -> Vec<String> {
    let lead = if a.lines >= b.lines {
        "議論を主導"
    } else {
        "控えめ"
    };

    vec![
        format!(
            "{}は{}発言で、{}の{}発言と比較して{}。",
            side_a, a.lines, side_b, b.lines, lead
        ),
        format!(
            "疑問・ツッコミの回数：{} {} 回 / {} {} 回。",
            side_a, a.questions, side_b, b.questions
        ),
        format!(
            "詭弁ペナルティ：{} {} 点 / {} {} 点。",
            side_a, scores_a.fallacy, side_b, scores_b.fallacy
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stats(lines: u32, chars: u32, questions: u32, exclaims: u32, negatives: u32) -> SpeakerStats {
        SpeakerStats {
            lines,
            chars,
            questions,
            exclaims,
            negatives,
        }
    }

    #[test]
    fn test_equal_stats_give_baselines() {
        let s = stats(3, 30, 1, 1, 0);
        let (a, b) = synthesize_scores(&s, &s);

        assert_eq!(a, b);
        assert_eq!(a.validity, 60);
        assert_eq!(a.consistency, 58);
        assert_eq!(a.interpretation, 62);
        assert_eq!(a.clarity, 57);
        assert_eq!(a.persuasiveness, 60);
        assert_eq!(a.stance, 70);
        assert_eq!(a.fallacy, 22);
    }

    #[test]
    fn test_scores_mirror_around_baseline() {
        let a = stats(4, 60, 2, 0, 0);
        let b = stats(3, 45, 1, 2, 1);
        let (sa, sb) = synthesize_scores(&a, &b);

        for axis in Axis::WEIGHTED {
            let base = baseline(axis);
            let diff = differential(axis, &a, &b);
            let (min, max) = bounds(axis);
            if base + diff > min && base + diff < max && base - diff > min && base - diff < max {
                let sum = sa.get(axis) + sb.get(axis);
                assert!(
                    (f64::from(sum) - 2.0 * base).abs() <= 1.0,
                    "{:?}: {} + {} not mirrored around {}",
                    axis,
                    sa.get(axis),
                    sb.get(axis),
                    base
                );
            }
        }
        // validity diff is exactly 1.5
        assert_eq!(sa.validity, 62);
        assert_eq!(sb.validity, 59);
    }

    #[test]
    fn test_clamping_at_boundaries() {
        let a = stats(40, 4000, 30, 0, 0);
        let b = stats(1, 2, 0, 20, 12);
        let (sa, sb) = synthesize_scores(&a, &b);

        assert_eq!(sa.validity, 95);
        assert_eq!(sb.validity, 15);
        assert_eq!(sa.stance, 92);
        assert_eq!(sb.stance, 20);
        assert_eq!(sa.fallacy, 20);
        assert_eq!(sb.fallacy, 60);
    }

    #[test]
    fn test_fallacy_penalty() {
        assert_eq!(fallacy_penalty(&SpeakerStats::default()), 20);
        assert_eq!(fallacy_penalty(&stats(1, 1, 0, 3, 2)), 36);
        assert_eq!(fallacy_penalty(&stats(1, 1, 0, 0, 9)), 60);
    }

    #[test]
    fn test_derive_topic() {
        assert_eq!(
            derive_topic(Some("Alice: 消費税は上げるべきか"), "Alice", "Bob"),
            "消費税は上げるべきか"
        );
        assert_eq!(
            derive_topic(Some("Alice:"), "Alice", "Bob"),
            "Alice vs Bob のレスバログ"
        );
        assert_eq!(derive_topic(None, "Aサイド", "Bサイド"), "Aサイド vs Bサイド のレスバログ");

        let long = format!("X: {}", "あ".repeat(120));
        assert_eq!(derive_topic(Some(&long), "X", "相手").chars().count(), 80);
    }

    #[test]
    fn test_topic_limit_counts_surrogate_pairs() {
        let emoji = format!("X: {}", "😀".repeat(50));
        let topic = derive_topic(Some(&emoji), "X", "相手");
        assert_eq!(topic.chars().count(), 40);
        assert_eq!(topic.encode_utf16().count(), 80);

        // 79 units of kana leave no room for a two-unit emoji
        let straddling = format!("X: {}😀", "あ".repeat(79));
        assert_eq!(derive_topic(Some(&straddling), "X", "相手"), "あ".repeat(79));
    }

    #[test]
    fn test_summary_reasons() {
        let a = stats(1, 10, 0, 0, 0);
        let b = stats(2, 10, 3, 0, 0);
        let sa = AxisScores {
            fallacy: 20,
            ..Default::default()
        };
        let sb = AxisScores {
            fallacy: 26,
            ..Default::default()
        };
        let reasons = summary_reasons("Alice", "Bob", &a, &b, &sa, &sb);

        assert_eq!(reasons.len(), 3);
        assert_eq!(reasons[0], "Aliceは1発言で、Bobの2発言と比較して控えめ。");
        assert_eq!(reasons[1], "疑問・ツッコミの回数：Alice 0 回 / Bob 3 回。");
        assert_eq!(reasons[2], "詭弁ペナルティ：Alice 20 点 / Bob 26 点。");
    }
}
