//! AutoClaim Protocol - record types and wire messages
//!
//! Defines the claim records each stakeholder sees (claimer, police,
//! insurance), the dispatch timeline step shape, and the JSON bodies
//! exchanged with the summarizer and notarize upstreams.

pub mod types;
pub mod messages;
pub mod error;
pub mod constants;
pub mod hashing;

pub use types::*;
pub use messages::*;
pub use error::*;
pub use constants::*;
pub use hashing::{compute_report_hash, decorative_token, sha256};
