/// Serverless function invoked by `POST /api/accident-report`.
pub const SUMMARIZER_FUNCTION_NAME: &str = "accident-report-summarizer";

/// Public gateway in front of the summarizer function.
pub const DEFAULT_SUMMARIZE_URL: &str =
    "https://tno21drqkk.execute-api.us-east-1.amazonaws.com/prod/summarize";

/// Upstream notarization webhook relayed by `POST /api/notarize`.
pub const DEFAULT_NOTARIZE_URL: &str = "https://2f2279683902.ngrok-free.app/notarize";

pub const DEFAULT_AWS_REGION: &str = "us-east-1";

pub const DEFAULT_BIND_ADDR: &str = "127.0.0.1:3000";

/// Seconds a timeline step stays in `processing` before completing.
pub const STEP_DWELL_SECS: u64 = 2;

/// Timeline clock resolution.
pub const TICK_INTERVAL_MS: u64 = 1_000;

pub const REQUIRED_PHOTO_COUNT: usize = 4;
pub const MIN_VIDEO_COUNT: usize = 1;
pub const MIN_DESCRIPTION_CHARS: usize = 20;
pub const MAX_DESCRIPTION_CHARS: usize = 1_000;

/// Default map center (Dengkil, Selangor).
pub const DEFAULT_MAP_LAT: f64 = 2.861422;
pub const DEFAULT_MAP_LNG: f64 = 101.675189;

/// Claim token shown before the notarize service assigns one.
pub const PLACEHOLDER_CLAIM_TOKEN: &str = "0x9e8e...5b52";

pub const MSG_TRANSCRIPTION_REQUIRED: &str = "Transcription is required";
pub const MSG_SUMMARIZER_FAILED: &str = "Failed to process request";
pub const MSG_NOTARIZE_FAILED: &str = "Failed to contact notarize service";
pub const MSG_NO_AI_RESPONSE: &str = "No response from AI service";
