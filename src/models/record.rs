use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::{AxisScores, Side};

/// Default display name for side A
pub const DEFAULT_SIDE_A: &str = "Aサイド";
/// Default display name for side B
pub const DEFAULT_SIDE_B: &str = "Bサイド";
/// Draw threshold used when none is configured
pub const DEFAULT_DRAW_THRESHOLD: u32 = 10;
/// Upper bound of the draw threshold
pub const MAX_DRAW_THRESHOLD: f64 = 50.0;

/// Outcome of a debate, either computed or chosen manually
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Verdict {
    A,
    B,
    #[serde(rename = "draw")]
    Draw,
}

impl Verdict {
    pub fn winning_side(self) -> Option<Side> {
        match self {
            Verdict::A => Some(Side::A),
            Verdict::B => Some(Side::B),
            Verdict::Draw => None,
        }
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Verdict::A => write!(f, "A"),
            Verdict::B => write!(f, "B"),
            Verdict::Draw => write!(f, "draw"),
        }
    }
}

impl FromStr for Verdict {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "A" | "a" => Ok(Verdict::A),
            "B" | "b" => Ok(Verdict::B),
            "draw" | "Draw" => Ok(Verdict::Draw),
            other => Err(format!("unknown verdict '{}' (expected A, B or draw)", other)),
        }
    }
}

/// Scores of both sides
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SideScores {
    #[serde(rename = "A")]
    pub a: AxisScores,
    #[serde(rename = "B")]
    pub b: AxisScores,
}

impl SideScores {
    pub fn side(&self, side: Side) -> &AxisScores {
        match side {
            Side::A => &self.a,
            Side::B => &self.b,
        }
    }
}

/// The unit of work: everything needed to compute totals and a verdict.
///
/// Records are rebuilt from a [`ScoreSheet`](super::ScoreSheet) on every
/// update rather than mutated in place.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EvaluationRecord {
    pub topic: String,
    pub side_a_name: String,
    pub side_b_name: String,
    pub scores: SideScores,
    /// Manual verdict; always beats the computed one
    pub winner_override: Option<Verdict>,
    /// Minimum total difference for a non-draw verdict, within `[0, 50]`
    pub draw_threshold: u32,
    pub summary_reasons: Vec<String>,
}

impl Default for EvaluationRecord {
    fn default() -> Self {
        Self {
            topic: String::new(),
            side_a_name: DEFAULT_SIDE_A.to_string(),
            side_b_name: DEFAULT_SIDE_B.to_string(),
            scores: SideScores {
                a: AxisScores {
                    validity: 70,
                    consistency: 65,
                    interpretation: 80,
                    clarity: 60,
                    persuasiveness: 60,
                    stance: 30,
                    fallacy: 40,
                },
                b: AxisScores {
                    validity: 50,
                    consistency: 55,
                    interpretation: 40,
                    clarity: 50,
                    persuasiveness: 52,
                    stance: 34,
                    fallacy: 55,
                },
            },
            winner_override: None,
            draw_threshold: DEFAULT_DRAW_THRESHOLD,
            summary_reasons: Vec::new(),
        }
    }
}

impl EvaluationRecord {
    pub fn side_name(&self, side: Side) -> &str {
        match side {
            Side::A => &self.side_a_name,
            Side::B => &self.side_b_name,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_verdict_wire_names() {
        assert_eq!(serde_json::to_string(&Verdict::Draw).unwrap(), "\"draw\"");
        assert_eq!(serde_json::to_string(&Verdict::A).unwrap(), "\"A\"");
        let parsed: Verdict = serde_json::from_str("\"B\"").unwrap();
        assert_eq!(parsed, Verdict::B);
    }

    #[test]
    fn test_record_serializes_camel_case() {
        let record = EvaluationRecord::default();
        let value = serde_json::to_value(&record).unwrap();
        assert_eq!(value["sideAName"], "Aサイド");
        assert_eq!(value["drawThreshold"], 10);
        assert_eq!(value["scores"]["B"]["fallacy"], 55);
        assert!(value["winnerOverride"].is_null());
    }
}
