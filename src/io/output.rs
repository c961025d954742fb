use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};
use serde::Serialize;

use crate::models::{Axis, AxisScores, EvaluationRecord, SCORE_MAX, ScorePayload, Side, Verdict};
use crate::scoring::Scorecard;

pub const REPORT_TITLE: &str = "レスバ判定レポート（7軸評価）";

/// One side's polygon on the radar chart
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RadarDataset {
    pub label: String,
    pub data: Vec<i32>,
}

/// Radar comparison of both sides. The penalty spoke is inverted
/// (`100 - fallacy`) so that larger is better on every spoke.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RadarSeries {
    pub labels: Vec<String>,
    pub datasets: Vec<RadarDataset>,
}

impl RadarSeries {
    pub fn from_record(record: &EvaluationRecord) -> Self {
        let labels = Axis::ALL
            .iter()
            .enumerate()
            .map(|(i, &axis)| {
                let marker = char::from_u32(0x2460 + i as u32).unwrap_or('・');
                if axis.is_penalty() {
                    format!("{}（100 - {}）", marker, axis.label())
                } else {
                    format!("{} {}", marker, axis.label())
                }
            })
            .collect();

        let datasets = Side::BOTH
            .iter()
            .map(|&side| RadarDataset {
                label: record.side_name(side).to_string(),
                data: radar_values(record.scores.side(side)),
            })
            .collect();

        Self { labels, datasets }
    }
}

fn radar_values(scores: &AxisScores) -> Vec<i32> {
    Axis::ALL
        .iter()
        .map(|&axis| {
            if axis.is_penalty() {
                SCORE_MAX as i32 - scores.get(axis)
            } else {
                scores.get(axis)
            }
        })
        .collect()
}

/// Evaluated record, ready for export
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EvaluationReport {
    pub report_id: String,
    /// RFC 3339 timestamp
    pub generated_at: String,
    pub record: EvaluationRecord,
    pub scorecard: Scorecard,
    pub radar: RadarSeries,
}

impl EvaluationReport {
    pub fn new(record: EvaluationRecord, scorecard: Scorecard) -> Self {
        let radar = RadarSeries::from_record(&record);
        Self {
            report_id: uuid::Uuid::new_v4().to_string(),
            generated_at: chrono::Utc::now().to_rfc3339(),
            record,
            scorecard,
            radar,
        }
    }

    /// Write to a JSON file
    pub fn write_json(&self, path: &Path) -> Result<()> {
        let file = std::fs::File::create(path)
            .with_context(|| format!("Failed to create file: {:?}", path))?;
        serde_json::to_writer_pretty(file, self).context("Failed to write JSON")?;
        Ok(())
    }

    /// Format the report as human-readable text
    pub fn format(&self) -> String {
        let record = &self.record;
        let card = &self.scorecard;
        let name_a = record.side_name(Side::A);
        let name_b = record.side_name(Side::B);
        let mut output = String::new();

        output.push_str(REPORT_TITLE);
        output.push('\n');
        output.push_str(&format_topic(&record.topic));
        output.push_str("\n\n");

        output.push_str(&format_badge(card.winner, name_a, name_b));
        output.push('\n');
        output.push_str(&format!(
            "総合点：{} {} 点 / {} {} 点（点差 {}、引き分け閾値 {}）\n",
            name_a, card.total_a, name_b, card.total_b, card.margin, record.draw_threshold
        ));
        if record.winner_override.is_some() && card.auto_winner != card.winner {
            output.push_str(&format!(
                "（自動判定：{}）\n",
                verdict_text(card.auto_winner, name_a, name_b)
            ));
        }
        output.push('\n');

        let width = Axis::ALL
            .iter()
            .map(|axis| display_width(axis.label()))
            .max()
            .unwrap_or(0);
        output.push_str(&format!(
            "{}  {:>6}  {:>6}\n",
            pad("", width),
            truncate(name_a, 6),
            truncate(name_b, 6)
        ));
        for axis in Axis::ALL {
            output.push_str(&format!(
                "{}  {:>6}  {:>6}\n",
                pad(axis.label(), width),
                record.scores.a.get(axis),
                record.scores.b.get(axis)
            ));
        }

        if !record.summary_reasons.is_empty() {
            output.push_str("\n判定理由\n");
            for reason in &record.summary_reasons {
                output.push_str(&format!("- {}\n", reason));
            }
        }

        output
    }

    /// Write the text report to a file
    pub fn write_text(&self, path: &Path) -> Result<()> {
        let mut file = std::fs::File::create(path)
            .with_context(|| format!("Failed to create file: {:?}", path))?;
        write!(file, "{}", self.format())?;
        Ok(())
    }
}

/// Write a payload (e.g. the analyzer's output) as pretty JSON
pub fn write_payload(payload: &ScorePayload, path: &Path) -> Result<()> {
    std::fs::write(path, payload.to_json_pretty())
        .with_context(|| format!("Failed to write payload: {:?}", path))
}

fn format_topic(topic: &str) -> String {
    if topic.trim().is_empty() {
        "テーマ：入力パネルからテーマを設定してください。".to_string()
    } else {
        format!("テーマ：{}", topic.trim())
    }
}

fn verdict_text(verdict: Verdict, name_a: &str, name_b: &str) -> String {
    match verdict {
        Verdict::Draw => "引き分け".to_string(),
        Verdict::A => format!("{} 勝利", name_a),
        Verdict::B => format!("{} 勝利", name_b),
    }
}

fn format_badge(verdict: Verdict, name_a: &str, name_b: &str) -> String {
    format!("判定：{}", verdict_text(verdict, name_a, name_b))
}

/// Terminal column width; CJK and full-width characters take two columns
fn display_width(text: &str) -> usize {
    text.chars()
        .map(|c| if (c as u32) >= 0x1100 { 2 } else { 1 })
        .sum()
}

fn pad(text: &str, width: usize) -> String {
    let fill = width.saturating_sub(display_width(text));
    format!("{}{}", text, " ".repeat(fill))
}

fn truncate(text: &str, max_chars: usize) -> String {
    text.chars().take(max_chars).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::WeightVector;
    use crate::scoring::evaluate;

    fn report(record: EvaluationRecord) -> EvaluationReport {
        let card = evaluate(&record, &WeightVector::default());
        EvaluationReport::new(record, card)
    }

    #[test]
    fn test_radar_inverts_penalty() {
        let radar = RadarSeries::from_record(&EvaluationRecord::default());

        assert_eq!(radar.labels.len(), 7);
        assert_eq!(radar.labels[0], "① データ妥当性");
        assert_eq!(radar.labels[6], "⑦（100 - 詭弁ペナルティ）");
        assert_eq!(radar.datasets[0].label, "Aサイド");
        assert_eq!(radar.datasets[0].data, vec![70, 65, 80, 60, 60, 30, 60]);
        assert_eq!(radar.datasets[1].data, vec![50, 55, 40, 50, 52, 34, 45]);
    }

    #[test]
    fn test_format_default_report() {
        let text = report(EvaluationRecord::default()).format();

        assert!(text.starts_with(REPORT_TITLE));
        assert!(text.contains("テーマ：入力パネルからテーマを設定してください。"));
        assert!(text.contains("判定：Aサイド 勝利"));
        assert!(text.contains("総合点：Aサイド 22 点 / Bサイド -8 点（点差 30、引き分け閾値 10）"));
        assert!(!text.contains("判定理由"));
    }

    #[test]
    fn test_format_override_and_reasons() {
        let record = EvaluationRecord {
            topic: "税制".to_string(),
            winner_override: Some(Verdict::Draw),
            summary_reasons: vec!["理由その1".to_string()],
            ..Default::default()
        };
        let text = report(record).format();

        assert!(text.contains("テーマ：税制"));
        assert!(text.contains("判定：引き分け"));
        assert!(text.contains("（自動判定：Aサイド 勝利）"));
        assert!(text.contains("- 理由その1"));
    }

    #[test]
    fn test_write_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("report.json");
        report(EvaluationRecord::default()).write_json(&path).unwrap();

        let value: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(value["scorecard"]["totalA"], 22);
        assert_eq!(value["scorecard"]["winner"], "A");
        assert_eq!(value["record"]["sideBName"], "Bサイド");
        assert!(value["reportId"].as_str().is_some_and(|id| id.len() == 36));
    }

    #[test]
    fn test_display_width() {
        assert_eq!(display_width("abc"), 3);
        assert_eq!(display_width("説得力"), 6);
    }
}
