pub mod error;
pub mod heuristics;
pub mod io;
pub mod models;
pub mod relay;
pub mod scoring;

pub use error::{InputError, RelayError};
pub use heuristics::{Analysis, ParsedTranscript, SpeakerStats, analyze_transcript};
pub use io::{
    EvaluationReport, FieldAssignment, RadarSeries, parse_field_assignment, read_payload_file,
    read_transcript_file, require_transcript,
};
pub use models::{
    Axis, AxisScores, EvaluationRecord, ScorePayload, ScoreSheet, Side, Verdict, WeightVector,
};
pub use relay::{RelayClient, RelayConfig, RelayRequest, RelaySession};
pub use scoring::{Scorecard, ScoringConfig, compute_total, determine_winner, evaluate};
