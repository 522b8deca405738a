use autoclaim_protocol::{ProtocolError, Role};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StateError {
    #[error("no {role} record with id '{id}'")]
    UnknownRecord { role: Role, id: String },

    #[error("cannot leave step {step}: {reason}")]
    StepBlocked { step: u8, reason: String },

    #[error("expected {expected} media, got '{mime}'")]
    InvalidMedia { expected: &'static str, mime: String },

    #[error("no video at index {0}")]
    NoSuchVideo(usize),

    #[error("description exceeds {max} characters")]
    DescriptionTooLong { max: usize },

    #[error("notarize service rejected the report: {0}")]
    NotarizeRejected(String),

    #[error(transparent)]
    Protocol(#[from] ProtocolError),
}
