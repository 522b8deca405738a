use serde::{Deserialize, Serialize};

use crate::ProtocolError;

/// Declares a closed status vocabulary with its wire strings.
///
/// Every variant gets a fixed wire spelling used by serde, `Display`
/// and `FromStr`, plus an `ALL` table in declaration order.
macro_rules! wire_enum {
    (
        $(#[$meta:meta])*
        $name:ident, $kind:literal {
            $($variant:ident => $wire:literal),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub enum $name {
            $(#[serde(rename = $wire)] $variant),+
        }

        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            pub fn as_str(self) -> &'static str {
                match self {
                    $($name::$variant => $wire),+
                }
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.as_str())
            }
        }

        impl std::str::FromStr for $name {
            type Err = ProtocolError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s.trim().to_ascii_lowercase().as_str() {
                    $($wire => Ok($name::$variant),)+
                    other => Err(ProtocolError::UnknownStatus {
                        kind: $kind,
                        value: other.to_string(),
                    }),
                }
            }
        }
    };
}

// ---------------------------------------------------------------------------
// Roles
// ---------------------------------------------------------------------------

wire_enum! {
    /// Stakeholder whose dashboard is being viewed.
    Role, "role" {
        Claimer => "claimer",
        Police => "police",
        Insurance => "insurance",
    }
}

// ---------------------------------------------------------------------------
// Shared value types
// ---------------------------------------------------------------------------

wire_enum! {
    Priority, "priority" {
        Low => "low",
        Medium => "medium",
        High => "high",
    }
}

/// A picked map point with its human-readable address.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub lat: f64,
    pub lng: f64,
    pub address: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub lat: f64,
    pub lng: f64,
}

/// Incident site as shown on the police and insurance dashboards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SiteLocation {
    pub address: String,
    pub coordinates: Coordinates,
    pub context: String,
}

/// Media file names attached to a claimer submission.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MediaSet {
    pub images: Vec<String>,
    pub videos: Vec<String>,
    pub voice: Vec<String>,
}

impl MediaSet {
    pub fn total(&self) -> usize {
        self.images.len() + self.videos.len() + self.voice.len()
    }
}

/// Ephemeral capture made during report submission. Never uploaded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MediaCapture {
    pub id: uuid::Uuid,
    pub file_name: String,
    pub mime_type: String,
    pub preview_url: String,
}

impl MediaCapture {
    /// Create a capture with a freshly generated preview handle.
    pub fn new(file_name: impl Into<String>, mime_type: impl Into<String>) -> Self {
        let id = uuid::Uuid::new_v4();
        Self {
            id,
            file_name: file_name.into(),
            mime_type: mime_type.into(),
            preview_url: format!("blob:autoclaim/{id}"),
        }
    }

    pub fn is_image(&self) -> bool {
        self.mime_type.starts_with("image/")
    }

    pub fn is_video(&self) -> bool {
        self.mime_type.starts_with("video/")
    }

    pub fn is_audio(&self) -> bool {
        self.mime_type.starts_with("audio/")
    }
}

// ---------------------------------------------------------------------------
// Claimer dashboard
// ---------------------------------------------------------------------------

wire_enum! {
    /// Lifecycle of a claimer's own submission.
    SubmissionStatus, "submission" {
        Draft => "draft",
        Submitted => "submitted",
        InReview => "in-review",
        Approved => "approved",
        Rejected => "rejected",
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Submission {
    pub id: String,
    pub submission_no: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token_id: Option<String>,
    pub title: String,
    pub date: String,
    pub status: SubmissionStatus,
    pub description: String,
    pub location: Location,
    pub media: MediaSet,
}

// ---------------------------------------------------------------------------
// Police dashboard
// ---------------------------------------------------------------------------

wire_enum! {
    /// Lifecycle of a report as seen by the police.
    ReportStatus, "report" {
        Pending => "pending",
        Verified => "verified",
        Contacted => "contacted",
        Flagged => "flagged",
        Closed => "closed",
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportingParty {
    pub name: String,
    pub ic: String,
    pub contact: String,
    pub email: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Suspect {
    pub vehicle: String,
    pub plate: String,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IncidentDetails {
    pub time: String,
    pub description: String,
    pub damage: String,
    pub webcam_source: String,
    pub ai_summary: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PoliceReport {
    pub id: String,
    pub token_id: String,
    pub title: String,
    pub submission_date: String,
    pub status: ReportStatus,
    pub location: SiteLocation,
    pub claimer: ReportingParty,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suspect: Option<Suspect>,
    pub incident: IncidentDetails,
    pub priority: Priority,
}

// ---------------------------------------------------------------------------
// Insurance dashboard
// ---------------------------------------------------------------------------

wire_enum! {
    /// Lifecycle of a claim as seen by the insurer.
    ClaimStatus, "claim" {
        Pending => "pending",
        Review => "review",
        Approved => "approved",
        Rejected => "rejected",
        Processing => "processing",
        Completed => "completed",
    }
}

wire_enum! {
    ClaimSeverity, "severity" {
        Minor => "minor",
        Moderate => "moderate",
        Severe => "severe",
        TotalLoss => "total-loss",
    }
}

wire_enum! {
    ClaimType, "claim type" {
        Collision => "collision",
        Theft => "theft",
        Vandalism => "vandalism",
        Weather => "weather",
        Fire => "fire",
        Flood => "flood",
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Vehicle {
    pub make: String,
    pub model: String,
    pub color: String,
    pub registration: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClaimerContact {
    pub name: String,
    pub contact: String,
    pub email: String,
}

/// The police report an insurance claim is linked to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LinkedPoliceReport {
    pub token_id: String,
    pub title: String,
    pub date: String,
    pub ai_narrative: String,
    pub status: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepairComponent {
    pub component: String,
    pub description: String,
    pub cost: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RepairEstimate {
    pub components: Vec<RepairComponent>,
    pub total: u64,
    pub workshop_quote: String,
}

impl RepairEstimate {
    /// Sum of the itemised component costs.
    pub fn itemised_total(&self) -> u64 {
        self.components.iter().map(|c| c.cost).sum()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhotoEvidence {
    pub filename: String,
    pub timestamp: String,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VideoEvidence {
    pub filename: String,
    pub duration: String,
    pub description: String,
    pub source: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Multimedia {
    pub photos: Vec<PhotoEvidence>,
    pub videos: Vec<VideoEvidence>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InsuranceClaim {
    pub id: String,
    pub claim_number: String,
    pub incident_type: String,
    pub severity: ClaimSeverity,
    #[serde(rename = "type")]
    pub claim_type: ClaimType,
    pub vehicle: Vehicle,
    pub status: ClaimStatus,
    pub submission_date: String,
    pub location: SiteLocation,
    pub claimer: ClaimerContact,
    pub police_report: LinkedPoliceReport,
    pub repair_estimate: RepairEstimate,
    pub multimedia: Multimedia,
    pub priority: Priority,
}

// ---------------------------------------------------------------------------
// Dispatch timeline
// ---------------------------------------------------------------------------

wire_enum! {
    /// State of one step on a dispatch timeline. Ordered: a step only
    /// ever moves forward through these states.
    StepStatus, "step" {
        Pending => "pending",
        Processing => "processing",
        Completed => "completed",
    }
}

impl StepStatus {
    /// Status of a step scheduled at `offset` after `elapsed` seconds,
    /// given it stays in processing for `dwell` seconds.
    pub fn at(offset: u64, dwell: u64, elapsed: u64) -> Self {
        if elapsed < offset {
            StepStatus::Pending
        } else if elapsed < offset.saturating_add(dwell) {
            StepStatus::Processing
        } else {
            StepStatus::Completed
        }
    }

    fn rank(self) -> u8 {
        match self {
            StepStatus::Pending => 0,
            StepStatus::Processing => 1,
            StepStatus::Completed => 2,
        }
    }
}

impl PartialOrd for StepStatus {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for StepStatus {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.rank().cmp(&other.rank())
    }
}

/// One named step on a dispatch timeline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimelineStep {
    pub id: String,
    pub title: String,
    pub description: String,
    /// Decorative hex token shown next to the step.
    pub token: String,
    /// Seconds after submission at which the step starts processing.
    pub offset_secs: u64,
    pub status: StepStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub eta: Option<String>,
}
