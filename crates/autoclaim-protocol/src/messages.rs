//! JSON bodies exchanged with the proxy routes and their upstreams.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{ProtocolError, MSG_NOTARIZE_FAILED};

// ---------------------------------------------------------------------------
// Summarizer
// ---------------------------------------------------------------------------

/// Inbound body of `POST /api/accident-report`.
///
/// `transcription` is kept as raw JSON and forwarded as-is; only its
/// truthiness is checked.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SummarizeRequest {
    #[serde(default)]
    pub transcription: Option<Value>,
}

impl SummarizeRequest {
    pub fn new(transcription: impl Into<String>) -> Self {
        Self {
            transcription: Some(Value::String(transcription.into())),
        }
    }

    /// Pick `transcription` out of any JSON body. Non-object bodies carry none.
    pub fn from_body(body: &Value) -> Self {
        Self {
            transcription: body.get("transcription").cloned(),
        }
    }

    /// The transcription, unless it is missing or falsy
    /// (`null`, `false`, `0`, `""`).
    pub fn require_transcription(&self) -> Result<&Value, ProtocolError> {
        match &self.transcription {
            Some(t) if is_truthy(t) => Ok(t),
            _ => Err(ProtocolError::MissingField("transcription")),
        }
    }
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SummaryResponse {
    pub summary: Value,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}

impl ErrorBody {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            error: message.into(),
        }
    }
}

/// Event handed to the summarizer function: the request body travels
/// as a JSON-encoded string, the way an HTTP gateway would pass it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FunctionEvent {
    pub body: String,
}

impl FunctionEvent {
    pub fn for_transcription(transcription: &Value) -> Result<Self, ProtocolError> {
        let body = serde_json::to_string(&SummarizeRequest {
            transcription: Some(transcription.clone()),
        })?;
        Ok(Self { body })
    }
}

/// Result payload returned by the summarizer function.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FunctionResult {
    #[serde(default)]
    pub status_code: Option<u16>,
    #[serde(default)]
    pub body: Option<String>,
}

impl FunctionResult {
    /// Decode the JSON-encoded `body` into the summary value.
    ///
    /// The function returns the summary text as a JSON string. Bodies that
    /// are already wrapped as `{"summary": ...}` are unwrapped so the route
    /// never nests the envelope twice. `<reasoning>` blocks emitted by the
    /// model are removed from string summaries.
    pub fn decode_summary(&self) -> Result<Value, ProtocolError> {
        let body = self
            .body
            .as_deref()
            .ok_or(ProtocolError::MissingField("body"))?;
        let decoded: Value = serde_json::from_str(body)?;
        let summary = match decoded {
            Value::Object(mut map) if map.contains_key("summary") => {
                map.remove("summary").unwrap_or(Value::Null)
            }
            other => other,
        };
        Ok(match summary {
            Value::String(text) => Value::String(strip_reasoning(&text)),
            other => other,
        })
    }
}

/// Remove every `<reasoning>...</reasoning>` block and trim the result.
pub fn strip_reasoning(text: &str) -> String {
    const OPEN: &str = "<reasoning>";
    const CLOSE: &str = "</reasoning>";

    let mut out = String::with_capacity(text.len());
    let mut rest = text;
    while let Some(start) = rest.find(OPEN) {
        let after_open = &rest[start + OPEN.len()..];
        match after_open.find(CLOSE) {
            Some(end) => {
                out.push_str(&rest[..start]);
                rest = &after_open[end + CLOSE.len()..];
            }
            None => break,
        }
    }
    out.push_str(rest);
    out.trim().to_string()
}

// ---------------------------------------------------------------------------
// Notarize relay
// ---------------------------------------------------------------------------

/// Envelope returned by the notarize relay when the upstream is unreachable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelayFailure {
    pub status: String,
    pub message: String,
}

impl RelayFailure {
    pub fn notarize() -> Self {
        Self {
            status: "error".into(),
            message: MSG_NOTARIZE_FAILED.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotarizeMetadata {
    pub claim_id: String,
    pub report_type: String,
    pub police_report_number: String,
}

impl NotarizeMetadata {
    /// Metadata for an accident report filed at `millis` since the epoch.
    pub fn accident_report(millis: i64) -> Self {
        Self {
            claim_id: format!("CLAIM-{millis}"),
            report_type: "accident_report".into(),
            police_report_number: format!("PR-{millis}"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotarizeRequest {
    pub report_hash: String,
    pub metadata: NotarizeMetadata,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotarizeResponse {
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub object_id: Option<String>,
}

impl NotarizeResponse {
    /// The notarized object id, if the upstream reported success.
    pub fn object_id(&self) -> Option<&str> {
        match (self.status.as_deref(), self.object_id.as_deref()) {
            (Some("success"), Some(id)) if !id.is_empty() => Some(id),
            _ => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Dashboard actions
// ---------------------------------------------------------------------------

/// Body of a dashboard status action (`POST .../:id/status`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusChangeRequest {
    pub status: String,
}

/// Acknowledgement for a dashboard action. Actions are logged only;
/// `persisted` is always false.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActionAck {
    pub id: String,
    pub requested_status: String,
    pub persisted: bool,
}

/// An upstream the demo knows about, as listed on the API test page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceDescriptor {
    pub name: String,
    pub endpoint: Option<String>,
    pub method: String,
    pub description: String,
    pub test_payload: Value,
    pub available: bool,
}
