use super::{
    Axis, AxisScores, DEFAULT_SIDE_A, DEFAULT_SIDE_B, EvaluationRecord, MAX_DRAW_THRESHOLD,
    PayloadAxisScores, ScorePayload, Side, SideScores, Verdict, clamp_round,
};

/// Raw per-side values as typed or imported. `None` means missing or not a
/// number; such fields fall back to the previous record on rebuild.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct RawAxisScores {
    pub validity: Option<f64>,
    pub consistency: Option<f64>,
    pub interpretation: Option<f64>,
    pub clarity: Option<f64>,
    pub persuasiveness: Option<f64>,
    pub stance: Option<f64>,
    pub fallacy: Option<f64>,
}

impl RawAxisScores {
    pub fn from_scores(scores: &AxisScores) -> Self {
        let mut raw = Self::default();
        for axis in Axis::ALL {
            raw.set(axis, Some(f64::from(scores.get(axis))));
        }
        raw
    }

    pub fn get(&self, axis: Axis) -> Option<f64> {
        match axis {
            Axis::Validity => self.validity,
            Axis::Consistency => self.consistency,
            Axis::Interpretation => self.interpretation,
            Axis::Clarity => self.clarity,
            Axis::Persuasiveness => self.persuasiveness,
            Axis::Stance => self.stance,
            Axis::Fallacy => self.fallacy,
        }
    }

    pub fn set(&mut self, axis: Axis, value: Option<f64>) {
        let slot = match axis {
            Axis::Validity => &mut self.validity,
            Axis::Consistency => &mut self.consistency,
            Axis::Interpretation => &mut self.interpretation,
            Axis::Clarity => &mut self.clarity,
            Axis::Persuasiveness => &mut self.persuasiveness,
            Axis::Stance => &mut self.stance,
            Axis::Fallacy => &mut self.fallacy,
        };
        *slot = value;
    }

    /// Merge the fields an import actually carries
    fn merge(&mut self, incoming: &PayloadAxisScores) {
        for axis in Axis::ALL {
            if let Some(value) = incoming.get(axis) {
                self.set(axis, Some(value));
            }
        }
    }

    /// Clamp every field into its domain, falling back to `previous` for
    /// missing or non-finite values.
    fn resolve(&self, previous: &AxisScores) -> AxisScores {
        let mut scores = *previous;
        for axis in Axis::ALL {
            if let Some(value) = self.get(axis) {
                scores.set(axis, value);
            }
        }
        scores
    }
}

/// Replace `slot` only when a value is present
fn apply_if_present<T>(slot: &mut T, incoming: Option<T>) {
    if let Some(value) = incoming {
        *slot = value;
    }
}

/// Editable score sheet: the raw input an [`EvaluationRecord`] is built from.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoreSheet {
    pub topic: String,
    pub side_a_name: String,
    pub side_b_name: String,
    pub scores_a: RawAxisScores,
    pub scores_b: RawAxisScores,
    /// Manual verdict selection; `None` means automatic
    pub winner: Option<Verdict>,
    pub draw_threshold: Option<f64>,
    /// One reason per line
    pub summary_reasons: String,
}

impl Default for ScoreSheet {
    fn default() -> Self {
        let mut sheet = Self::from_record(&EvaluationRecord::default());
        sheet.side_a_name.clear();
        sheet.side_b_name.clear();
        sheet
    }
}

impl ScoreSheet {
    /// Sheet that rebuilds exactly into `record`
    pub fn from_record(record: &EvaluationRecord) -> Self {
        Self {
            topic: record.topic.clone(),
            side_a_name: record.side_a_name.clone(),
            side_b_name: record.side_b_name.clone(),
            scores_a: RawAxisScores::from_scores(&record.scores.a),
            scores_b: RawAxisScores::from_scores(&record.scores.b),
            winner: record.winner_override,
            draw_threshold: Some(f64::from(record.draw_threshold)),
            summary_reasons: record.summary_reasons.join("\n"),
        }
    }

    /// Back to the default values
    pub fn reset(&self) -> Self {
        Self::default()
    }

    /// Manual entry of a single field
    pub fn with_field(&self, side: Side, axis: Axis, value: Option<f64>) -> Self {
        let mut next = self.clone();
        match side {
            Side::A => next.scores_a.set(axis, value),
            Side::B => next.scores_b.set(axis, value),
        }
        next
    }

    /// Partial merge of an imported payload. Absent, empty or wrongly typed
    /// fields leave the current values untouched. The payload's `winner` is
    /// informational and never becomes a manual override.
    pub fn apply_payload(&self, payload: &ScorePayload) -> Self {
        let mut next = self.clone();

        if let Some(meta) = &payload.meta {
            apply_if_present(&mut next.topic, non_empty(&meta.topic));
            apply_if_present(&mut next.side_a_name, non_empty(&meta.side_a));
            apply_if_present(&mut next.side_b_name, non_empty(&meta.side_b));
        }

        if let Some(scores) = &payload.scores {
            if let Some(a) = &scores.a {
                next.scores_a.merge(a);
            }
            if let Some(b) = &scores.b {
                next.scores_b.merge(b);
            }
        }

        apply_if_present(
            &mut next.summary_reasons,
            payload.summary_reasons.as_ref().map(|reasons| reasons.join("\n")),
        );

        next
    }

    /// Rebuild a record, clamping every numeric field
    pub fn to_record(&self, previous: &EvaluationRecord) -> EvaluationRecord {
        let draw_threshold = self
            .draw_threshold
            .filter(|value| value.is_finite())
            .map(|value| clamp_round(value, 0.0, MAX_DRAW_THRESHOLD) as u32)
            .unwrap_or(previous.draw_threshold);

        EvaluationRecord {
            topic: self.topic.trim().to_string(),
            side_a_name: name_or_default(&self.side_a_name, DEFAULT_SIDE_A),
            side_b_name: name_or_default(&self.side_b_name, DEFAULT_SIDE_B),
            scores: SideScores {
                a: self.scores_a.resolve(&previous.scores.a),
                b: self.scores_b.resolve(&previous.scores.b),
            },
            winner_override: self.winner,
            draw_threshold,
            summary_reasons: self
                .summary_reasons
                .lines()
                .map(str::trim)
                .filter(|line| !line.is_empty())
                .map(str::to_string)
                .collect(),
        }
    }
}

fn non_empty(value: &Option<String>) -> Option<String> {
    value.as_ref().filter(|s| !s.is_empty()).cloned()
}

fn name_or_default(name: &str, default: &str) -> String {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        default.to_string()
    } else {
        trimmed.to_string()
    }
}
