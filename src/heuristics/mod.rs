pub mod speakers;
pub mod synthesis;

pub use speakers::*;
pub use synthesis::*;

use tracing::{debug, info};

use crate::models::{
    AxisScores, DEFAULT_SIDE_A, DEFAULT_SIDE_B, PayloadAxisScores, PayloadMeta, PayloadScores,
    ScorePayload, Verdict,
};
use crate::scoring::{ScoringConfig, compute_total, determine_winner};

/// Side B name when the transcript has a single speaker
pub const LONE_OPPONENT: &str = "相手";

/// Result of the offline transcript analysis
#[derive(Debug, Clone)]
pub struct Analysis {
    /// Distinct speakers in first-seen order
    pub participants: Vec<String>,
    /// Number of non-empty lines
    pub turns: usize,
    pub side_a: String,
    pub side_b: String,
    pub stats_a: SpeakerStats,
    pub stats_b: SpeakerStats,
    pub scores_a: AxisScores,
    pub scores_b: AxisScores,
    pub total_a: i32,
    pub total_b: i32,
    pub winner: Verdict,
    pub topic: String,
    pub summary_reasons: Vec<String>,
}

impl Analysis {
    /// Payload in the same shape the relay returns
    pub fn to_payload(&self) -> ScorePayload {
        ScorePayload {
            meta: Some(PayloadMeta {
                topic: Some(self.topic.clone()),
                side_a: Some(self.side_a.clone()),
                side_b: Some(self.side_b.clone()),
                turns: Some(self.turns),
            }),
            scores: Some(PayloadScores {
                a: Some(PayloadAxisScores::from_scores(&self.scores_a)),
                b: Some(PayloadAxisScores::from_scores(&self.scores_b)),
            }),
            winner: Some(self.winner),
            summary_reasons: Some(self.summary_reasons.clone()),
        }
    }
}

/// Synthesize a plausible evaluation from a raw `name: content` transcript.
///
/// Never fails: transcripts without labels, or with no lines at all, fall
/// back to default names and all-zero stats. Callers reject blank input
/// beforehand.
pub fn analyze_transcript(transcript: &str, config: &ScoringConfig) -> Analysis {
    let parsed = ParsedTranscript::parse(transcript);

    let side_a = parsed
        .participants
        .first()
        .cloned()
        .unwrap_or_else(|| DEFAULT_SIDE_A.to_string());
    let side_b = match parsed.participants.len() {
        0 => DEFAULT_SIDE_B.to_string(),
        1 => LONE_OPPONENT.to_string(),
        _ => parsed.participants[1].clone(),
    };

    let stats_a = parsed.stats_for(&side_a);
    let stats_b = parsed.stats_for(&side_b);
    debug!("{}: {:?}", side_a, stats_a);
    debug!("{}: {:?}", side_b, stats_b);

    let (scores_a, scores_b) = synthesize_scores(&stats_a, &stats_b);
    let total_a = compute_total(&scores_a, &config.weights);
    let total_b = compute_total(&scores_b, &config.weights);
    let winner = determine_winner(total_a, total_b, config.draw_threshold, None);

    let topic = derive_topic(parsed.lines.first().map(String::as_str), &side_a, &side_b);
    let summary_reasons =
        summary_reasons(&side_a, &side_b, &stats_a, &stats_b, &scores_a, &scores_b);

    info!(
        "Analyzed {} lines from {} speakers: {} {} vs {} {} -> {}",
        parsed.lines.len(),
        parsed.participants.len(),
        side_a,
        total_a,
        side_b,
        total_b,
        winner
    );

    Analysis {
        turns: parsed.lines.len(),
        participants: parsed.participants,
        side_a,
        side_b,
        stats_a,
        stats_b,
        scores_a,
        scores_b,
        total_a,
        total_b,
        winner,
        topic,
        summary_reasons,
    }
}
