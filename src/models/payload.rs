use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};

use crate::error::InputError;

use super::{Axis, AxisScores, Verdict};

/// Deserialize an optional field, discarding it when it has the wrong type
/// instead of failing the whole payload.
fn lenient<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(value.and_then(|v| serde_json::from_value(v).ok()))
}

/// Import/export payload shared by manual paste, the relay and the
/// heuristic analyzer.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScorePayload {
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub meta: Option<PayloadMeta>,
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub scores: Option<PayloadScores>,
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub winner: Option<Verdict>,
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub summary_reasons: Option<Vec<String>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PayloadMeta {
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub topic: Option<String>,
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub side_a: Option<String>,
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub side_b: Option<String>,
    /// Number of transcript lines the payload was derived from
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub turns: Option<usize>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PayloadScores {
    #[serde(rename = "A", default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub a: Option<PayloadAxisScores>,
    #[serde(rename = "B", default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub b: Option<PayloadAxisScores>,
}

/// Per-side scores as they appear on the wire. Values are kept raw; clamping
/// happens when a record is rebuilt.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PayloadAxisScores {
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub validity: Option<f64>,
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub consistency: Option<f64>,
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub interpretation: Option<f64>,
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub clarity: Option<f64>,
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub persuasiveness: Option<f64>,
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub stance: Option<f64>,
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub fallacy: Option<f64>,
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub fallacy_penalty: Option<f64>,
}

impl PayloadAxisScores {
    /// Export clamped scores, writing the penalty under both of its names
    pub fn from_scores(scores: &AxisScores) -> Self {
        let fallacy = Some(f64::from(scores.fallacy));
        Self {
            validity: Some(f64::from(scores.validity)),
            consistency: Some(f64::from(scores.consistency)),
            interpretation: Some(f64::from(scores.interpretation)),
            clarity: Some(f64::from(scores.clarity)),
            persuasiveness: Some(f64::from(scores.persuasiveness)),
            stance: Some(f64::from(scores.stance)),
            fallacy,
            fallacy_penalty: fallacy,
        }
    }

    /// Raw value for an axis. `fallacyPenalty` takes precedence over `fallacy`.
    pub fn get(&self, axis: Axis) -> Option<f64> {
        match axis {
            Axis::Validity => self.validity,
            Axis::Consistency => self.consistency,
            Axis::Interpretation => self.interpretation,
            Axis::Clarity => self.clarity,
            Axis::Persuasiveness => self.persuasiveness,
            Axis::Stance => self.stance,
            Axis::Fallacy => self.fallacy_penalty.or(self.fallacy),
        }
    }
}

impl ScorePayload {
    /// Parse a payload. Only structurally invalid JSON (or a non-object
    /// document) is an error; wrongly typed fields are dropped.
    pub fn from_json(text: &str) -> Result<Self, InputError> {
        let value: serde_json::Value = serde_json::from_str(text.trim())?;
        if !value.is_object() {
            return Err(InputError::NotAnObject(json_type_name(&value)));
        }
        Ok(serde_json::from_value(value)?)
    }

    pub fn to_json_pretty(&self) -> String {
        serde_json::to_string_pretty(self).unwrap_or_else(|_| "{}".to_string())
    }
}

fn json_type_name(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "boolean",
        serde_json::Value::Number(_) => "number",
        serde_json::Value::String(_) => "string",
        serde_json::Value::Array(_) => "array",
        serde_json::Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_full_payload() {
        let json = r#"{
            "meta": {"topic": "税制", "sideA": "Alice", "sideB": "Bob"},
            "scores": {
                "A": {"validity": 80, "consistency": 70, "interpretation": 65,
                      "clarity": 60, "persuasiveness": 75, "stance": 50, "fallacyPenalty": 12},
                "B": {"validity": 40, "consistency": 45, "interpretation": 30,
                      "clarity": 55, "persuasiveness": 35, "stance": 60, "fallacy": 30}
            },
            "winner": "A",
            "summaryReasons": ["one", "two"]
        }"#;

        let payload = ScorePayload::from_json(json).unwrap();
        let meta = payload.meta.unwrap();
        assert_eq!(meta.side_a.as_deref(), Some("Alice"));
        let scores = payload.scores.unwrap();
        assert_eq!(scores.a.as_ref().unwrap().get(Axis::Fallacy), Some(12.0));
        assert_eq!(scores.b.as_ref().unwrap().get(Axis::Fallacy), Some(30.0));
        assert_eq!(payload.winner, Some(Verdict::A));
        assert_eq!(payload.summary_reasons.unwrap().len(), 2);
    }

    #[test]
    fn test_fallacy_penalty_beats_fallacy() {
        let json = r#"{"scores": {"A": {"fallacy": 10, "fallacyPenalty": 25}}}"#;
        let payload = ScorePayload::from_json(json).unwrap();
        let a = payload.scores.unwrap().a.unwrap();
        assert_eq!(a.get(Axis::Fallacy), Some(25.0));
    }

    #[test]
    fn test_wrong_typed_fields_are_dropped() {
        let json = r#"{
            "meta": {"topic": 42, "sideA": "Alice"},
            "scores": {"A": {"validity": "80", "clarity": 61}, "B": "nope"},
            "winner": "nobody",
            "summaryReasons": "not a list"
        }"#;

        let payload = ScorePayload::from_json(json).unwrap();
        let meta = payload.meta.unwrap();
        assert_eq!(meta.topic, None);
        assert_eq!(meta.side_a.as_deref(), Some("Alice"));
        let scores = payload.scores.unwrap();
        let a = scores.a.unwrap();
        assert_eq!(a.validity, None);
        assert_eq!(a.clarity, Some(61.0));
        assert!(scores.b.is_none());
        assert!(payload.winner.is_none());
        assert!(payload.summary_reasons.is_none());
    }

    #[test]
    fn test_malformed_json_is_an_error() {
        assert!(matches!(
            ScorePayload::from_json("{\"scores\": "),
            Err(InputError::Json(_))
        ));
        assert!(matches!(
            ScorePayload::from_json("[1, 2]"),
            Err(InputError::NotAnObject("array"))
        ));
    }

    #[test]
    fn test_export_writes_both_penalty_names() {
        let scores = AxisScores {
            fallacy: 22,
            ..Default::default()
        };
        let value = serde_json::to_value(PayloadAxisScores::from_scores(&scores)).unwrap();
        assert_eq!(value["fallacy"], 22.0);
        assert_eq!(value["fallacyPenalty"], 22.0);
    }
}
