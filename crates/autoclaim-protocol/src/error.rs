use thiserror::Error;

/// Errors raised while decoding or validating protocol payloads.
#[derive(Debug, Error)]
pub enum ProtocolError {
    #[error("missing required field: {0}")]
    MissingField(&'static str),

    #[error("unknown {kind} status '{value}'")]
    UnknownStatus { kind: &'static str, value: String },

    #[error("malformed payload: {0}")]
    Malformed(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
