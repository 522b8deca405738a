//! Four-step guided accident report.
//!
//! The wizard collects evidence (photos, videos, a written description),
//! asks the summarizer for an AI summary, then builds the notarize request
//! whose response carries the claim token. It holds no I/O of its own:
//! callers perform the HTTP calls and feed results back in.

use std::fmt::Display;

use chrono::NaiveTime;
use serde::Serialize;
use serde_json::Value;

use autoclaim_protocol::{
    compute_report_hash, Location, MediaCapture, NotarizeMetadata, NotarizeRequest, NotarizeResponse,
    SummarizeRequest, MAX_DESCRIPTION_CHARS, MIN_DESCRIPTION_CHARS, MIN_VIDEO_COUNT,
    MSG_NO_AI_RESPONSE, PLACEHOLDER_CLAIM_TOKEN, REQUIRED_PHOTO_COUNT,
};

use crate::StateError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum WizardStep {
    SnapScene = 1,
    UploadVideo = 2,
    Describe = 3,
    AiSummary = 4,
}

impl WizardStep {
    pub const ALL: [WizardStep; 4] = [
        WizardStep::SnapScene,
        WizardStep::UploadVideo,
        WizardStep::Describe,
        WizardStep::AiSummary,
    ];

    pub fn number(self) -> u8 {
        self as u8
    }

    pub fn from_number(n: u8) -> Option<Self> {
        Self::ALL.get(usize::from(n).checked_sub(1)?).copied()
    }

    pub fn title(self) -> &'static str {
        match self {
            WizardStep::SnapScene => "Snap the Scene",
            WizardStep::UploadVideo => "Upload Video Evidence",
            WizardStep::Describe => "Describe What Happened",
            WizardStep::AiSummary => "AI Summary",
        }
    }

    pub fn instruction(self) -> &'static str {
        match self {
            WizardStep::SnapScene => "Capture the incident area from at least four angles.",
            WizardStep::UploadVideo => {
                "Connect to your webcam or upload videos showing the incident in motion."
            }
            WizardStep::Describe => "Explain what occurred in your own words.",
            WizardStep::AiSummary => "Review your AI-generated incident summary.",
        }
    }

    fn following(self) -> Self {
        Self::from_number(self.number() + 1).unwrap_or(self)
    }

    fn preceding(self) -> Self {
        Self::from_number(self.number() - 1).unwrap_or(self)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PhotoSlot {
    Front,
    Back,
    Left,
    Right,
}

impl PhotoSlot {
    pub const ALL: [PhotoSlot; 4] = [
        PhotoSlot::Front,
        PhotoSlot::Back,
        PhotoSlot::Left,
        PhotoSlot::Right,
    ];

    pub fn label(self) -> &'static str {
        match self {
            PhotoSlot::Front => "Front View",
            PhotoSlot::Back => "Back View",
            PhotoSlot::Left => "Left Side",
            PhotoSlot::Right => "Right Side",
        }
    }

    fn index(self) -> usize {
        self as usize
    }
}

/// The content hashed into the notarized report.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportData {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<Location>,
    pub photos: usize,
    pub videos: usize,
    pub description: String,
    pub ai_summary: String,
    pub timestamp: i64,
}

#[derive(Debug, Clone)]
pub struct SubmissionWizard {
    step: WizardStep,
    photos: [Option<MediaCapture>; REQUIRED_PHOTO_COUNT],
    videos: Vec<MediaCapture>,
    description: String,
    location: Option<Location>,
    ai_summary: Option<String>,
    claim_token: Option<String>,
}

impl Default for SubmissionWizard {
    fn default() -> Self {
        Self::new()
    }
}

impl SubmissionWizard {
    pub fn new() -> Self {
        Self {
            step: WizardStep::SnapScene,
            photos: Default::default(),
            videos: Vec::new(),
            description: String::new(),
            location: None,
            ai_summary: None,
            claim_token: None,
        }
    }

    pub fn step(&self) -> WizardStep {
        self.step
    }

    /// Where the incident happened, usually from a map pick.
    pub fn set_location(&mut self, location: Location) {
        self.location = Some(location);
    }

    pub fn location(&self) -> Option<&Location> {
        self.location.as_ref()
    }

    // -- Step 1: photos ------------------------------------------------------

    pub fn capture_photo(&mut self, slot: PhotoSlot, capture: MediaCapture) -> Result<(), StateError> {
        if !capture.is_image() {
            return Err(StateError::InvalidMedia {
                expected: "image/",
                mime: capture.mime_type,
            });
        }
        self.photos[slot.index()] = Some(capture);
        Ok(())
    }

    pub fn remove_photo(&mut self, slot: PhotoSlot) -> Option<MediaCapture> {
        self.photos[slot.index()].take()
    }

    pub fn photo(&self, slot: PhotoSlot) -> Option<&MediaCapture> {
        self.photos[slot.index()].as_ref()
    }

    pub fn completed_photos(&self) -> usize {
        self.photos.iter().filter(|p| p.is_some()).count()
    }

    // -- Step 2: videos ------------------------------------------------------

    /// Attach a video. Anything that is not `video/*` is refused.
    pub fn add_video(&mut self, capture: MediaCapture) -> Result<(), StateError> {
        if !capture.is_video() {
            return Err(StateError::InvalidMedia {
                expected: "video/",
                mime: capture.mime_type,
            });
        }
        self.videos.push(capture);
        Ok(())
    }

    pub fn remove_video(&mut self, index: usize) -> Result<MediaCapture, StateError> {
        if index >= self.videos.len() {
            return Err(StateError::NoSuchVideo(index));
        }
        Ok(self.videos.remove(index))
    }

    pub fn videos(&self) -> &[MediaCapture] {
        &self.videos
    }

    // -- Step 3: description -------------------------------------------------

    pub fn set_description(&mut self, text: impl Into<String>) -> Result<(), StateError> {
        let text = text.into();
        if text.chars().count() > MAX_DESCRIPTION_CHARS {
            return Err(StateError::DescriptionTooLong {
                max: MAX_DESCRIPTION_CHARS,
            });
        }
        self.description = text;
        Ok(())
    }

    /// Append a finished voice transcript, separated by a single space.
    pub fn append_transcript(&mut self, transcript: &str) {
        let transcript = transcript.trim();
        if transcript.is_empty() {
            return;
        }
        if !self.description.is_empty() {
            self.description.push(' ');
        }
        self.description.push_str(transcript);
    }

    /// Fill the description from the evidence counts.
    pub fn auto_generate_description(&mut self, at: NaiveTime) {
        let videos = self.videos.len();
        let plural = if videos == 1 { "" } else { "s" };
        self.description = format!(
            "At approximately {time}, I was involved in a vehicular incident. \
             Based on the {photos} photos I captured showing damage from multiple angles \
             and the {videos} video{plural} I uploaded, the incident appears to have caused \
             significant damage to my vehicle. The damage is visible on multiple sides of \
             the vehicle, with the most noticeable impact on the exterior panels. The \
             incident occurred in what appears to be a parking area or driveway setting. \
             I have documented all visible damage and the surrounding area to provide a \
             complete picture of what happened. The evidence clearly shows the extent of \
             the damage and the circumstances surrounding the incident.",
            time = at.format("%-I:%M:%S %p"),
            photos = self.completed_photos(),
        );
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    // -- Navigation ----------------------------------------------------------

    /// Check whether `step` has what it needs to move on.
    pub fn gate(&self, step: WizardStep) -> Result<(), StateError> {
        let blocked = |reason: String| {
            Err(StateError::StepBlocked {
                step: step.number(),
                reason,
            })
        };
        match step {
            WizardStep::SnapScene if self.completed_photos() < REQUIRED_PHOTO_COUNT => blocked(
                format!(
                    "{} of {REQUIRED_PHOTO_COUNT} photos captured",
                    self.completed_photos()
                ),
            ),
            WizardStep::UploadVideo if self.videos.len() < MIN_VIDEO_COUNT => {
                blocked(format!("at least {MIN_VIDEO_COUNT} video required"))
            }
            WizardStep::Describe
                if self.description.trim().chars().count() < MIN_DESCRIPTION_CHARS =>
            {
                blocked(format!(
                    "description needs at least {MIN_DESCRIPTION_CHARS} characters"
                ))
            }
            _ => Ok(()),
        }
    }

    pub fn can_proceed(&self) -> bool {
        self.gate(self.step).is_ok()
    }

    /// Advance one step if the current one is satisfied. Stays on the last step.
    pub fn next(&mut self) -> Result<WizardStep, StateError> {
        self.gate(self.step)?;
        self.step = self.step.following();
        Ok(self.step)
    }

    /// Go back one step. Stays on the first step.
    pub fn prev(&mut self) -> WizardStep {
        self.step = self.step.preceding();
        self.step
    }

    // -- Step 4: summary and submission -------------------------------------

    pub fn summary_request(&self) -> SummarizeRequest {
        SummarizeRequest::new(self.description.clone())
    }

    /// Record the outcome of a summarize call as display text.
    pub fn apply_summary_result<E: Display>(&mut self, result: Result<Value, E>) -> &str {
        let text = match result {
            Ok(Value::String(s)) if !s.is_empty() => s,
            Ok(Value::Null) | Ok(Value::String(_)) => MSG_NO_AI_RESPONSE.to_string(),
            Ok(other) => other.to_string(),
            Err(e) => {
                tracing::warn!(error = %e, "AI summary failed");
                format!("Error generating AI summary: {e}")
            }
        };
        self.ai_summary.insert(text).as_str()
    }

    pub fn ai_summary(&self) -> Option<&str> {
        self.ai_summary.as_deref()
    }

    pub fn report_data(&self, timestamp_ms: i64) -> ReportData {
        ReportData {
            location: self.location.clone(),
            photos: self.completed_photos(),
            videos: self.videos.len(),
            description: self.description.clone(),
            ai_summary: self.ai_summary.clone().unwrap_or_default(),
            timestamp: timestamp_ms,
        }
    }

    /// Build the notarize body for a report filed at `timestamp_ms`.
    pub fn notarize_request(&self, timestamp_ms: i64) -> Result<NotarizeRequest, StateError> {
        let report_hash = compute_report_hash(&self.report_data(timestamp_ms))?;
        Ok(NotarizeRequest {
            report_hash,
            metadata: NotarizeMetadata::accident_report(timestamp_ms),
        })
    }

    /// Take the claim token from a notarize response.
    pub fn accept_notarize_response(&mut self, response: &NotarizeResponse) -> Result<&str, StateError> {
        let id = response
            .object_id()
            .ok_or_else(|| StateError::NotarizeRejected("Invalid response from server".into()))?;
        tracing::info!(object_id = %id, "Report notarized");
        Ok(self.claim_token.insert(id.to_string()).as_str())
    }

    /// The notarized token, or the placeholder shown before submission.
    pub fn claim_token(&self) -> &str {
        self.claim_token.as_deref().unwrap_or(PLACEHOLDER_CLAIM_TOKEN)
    }

    pub fn is_notarized(&self) -> bool {
        self.claim_token.is_some()
    }
}
