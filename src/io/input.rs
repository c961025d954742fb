use std::path::Path;

use anyhow::{Context, Result};

use crate::error::InputError;
use crate::models::{Axis, ScorePayload, Side};

/// Reject blank transcripts before they reach the analyzer or the relay
pub fn require_transcript(text: &str) -> Result<&str, InputError> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        Err(InputError::EmptyTranscript)
    } else {
        Ok(trimmed)
    }
}

/// Read a transcript file, rejecting blank content
pub fn read_transcript_file(path: &Path) -> Result<String> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read transcript: {:?}", path))?;
    let transcript = require_transcript(&content)
        .with_context(|| format!("No transcript text in {:?}", path))?;
    Ok(transcript.to_string())
}

/// Read and parse a score payload file
pub fn read_payload_file(path: &Path) -> Result<ScorePayload> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read payload: {:?}", path))?;
    ScorePayload::from_json(&content).with_context(|| format!("Failed to parse payload: {:?}", path))
}

/// A manual `SIDE.AXIS=VALUE` entry
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FieldAssignment {
    pub side: Side,
    pub axis: Axis,
    /// `None` when the value is not a number
    pub value: Option<f64>,
}

/// Parse `A.validity=80`. A value that is not a number is kept as `None`
/// so the field falls back to its previous value.
pub fn parse_field_assignment(input: &str) -> Result<FieldAssignment, InputError> {
    let invalid = || InputError::InvalidAssignment(input.to_string());

    let (target, value) = input.split_once('=').ok_or_else(invalid)?;
    let (side, axis) = target.split_once('.').ok_or_else(invalid)?;
    let side: Side = side.parse().map_err(|_| invalid())?;
    let axis: Axis = axis.parse().map_err(|_| invalid())?;
    let value = value.trim().parse::<f64>().ok();

    Ok(FieldAssignment { side, axis, value })
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn test_require_transcript() {
        assert!(matches!(
            require_transcript("  \n\t "),
            Err(InputError::EmptyTranscript)
        ));
        assert_eq!(require_transcript("  A: hi \n").unwrap(), "A: hi");
    }

    #[test]
    fn test_parse_field_assignment() {
        let assignment = parse_field_assignment("B.fallacyPenalty=12.5").unwrap();
        assert_eq!(assignment.side, Side::B);
        assert_eq!(assignment.axis, Axis::Fallacy);
        assert_eq!(assignment.value, Some(12.5));

        let fallback = parse_field_assignment("A.clarity=abc").unwrap();
        assert_eq!(fallback.value, None);

        assert!(parse_field_assignment("A.charisma=3").is_err());
        assert!(parse_field_assignment("C.validity=3").is_err());
        assert!(parse_field_assignment("validity=3").is_err());
    }

    #[test]
    fn test_read_files() {
        let mut transcript = tempfile::NamedTempFile::new().unwrap();
        writeln!(transcript, "\nAlice: hello\n").unwrap();
        assert_eq!(read_transcript_file(transcript.path()).unwrap(), "Alice: hello");

        let blank = tempfile::NamedTempFile::new().unwrap();
        assert!(read_transcript_file(blank.path()).is_err());

        let mut payload = tempfile::NamedTempFile::new().unwrap();
        write!(payload, r#"{{"scores": {{"A": {{"validity": 99}}}}}}"#).unwrap();
        let parsed = read_payload_file(payload.path()).unwrap();
        assert_eq!(parsed.scores.unwrap().a.unwrap().validity, Some(99.0));

        let mut broken = tempfile::NamedTempFile::new().unwrap();
        write!(broken, "{{not json").unwrap();
        assert!(read_payload_file(broken.path()).is_err());
    }
}
