use thiserror::Error;

/// Problems with user-supplied input (transcripts, pasted payloads, `--set`)
#[derive(Error, Debug)]
pub enum InputError {
    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("payload must be a JSON object, got {0}")]
    NotAnObject(&'static str),

    #[error("transcript is empty")]
    EmptyTranscript,

    #[error("invalid field assignment '{0}' (expected SIDE.AXIS=VALUE)")]
    InvalidAssignment(String),
}

/// Failures of a relay round trip. None of them changes the current record.
#[derive(Error, Debug)]
pub enum RelayError {
    #[error("relay endpoint is not configured")]
    MissingEndpoint,

    #[error("relay transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("relay returned HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("relay error (HTTP {status}): {error}")]
    Remote {
        status: u16,
        error: String,
        detail: Option<String>,
    },

    #[error("could not parse model output")]
    ModelOutput { raw: String },

    #[error("could not parse relay response")]
    UnparsableResponse { raw: String },

    #[error("relay request was cancelled")]
    Cancelled,
}

impl RelayError {
    /// Raw text kept for diagnosis, when the failure carries any
    pub fn raw_text(&self) -> Option<&str> {
        match self {
            RelayError::ModelOutput { raw } | RelayError::UnparsableResponse { raw } => Some(raw.as_str()),
            RelayError::Status { body, .. } => Some(body.as_str()),
            RelayError::Remote { detail, .. } => detail.as_deref(),
            _ => None,
        }
    }
}
