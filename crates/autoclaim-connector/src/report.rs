//! Guided accident report from the command line.
//!
//! Walks the four wizard steps with demo photos, the given videos and
//! description, asks for an AI summary, notarizes the report and then
//! follows the dispatch timeline until every step completes.

use std::sync::Arc;
use std::time::Duration;

use chrono::{Local, Utc};

use autoclaim_protocol::{MediaCapture, NotarizeResponse};
use autoclaim_state::{
    format_elapsed, LocationPicker, PhotoSlot, PinDropPicker, StateError, SubmissionWizard,
    SystemClock, Timeline, TimelinePreset,
};

use crate::config::AppConfig;
use crate::dispatch::DispatchRegistry;
use crate::relay::NotarizeRelay;
use crate::summarizer::SummarizeClient;

#[derive(Debug, Clone, Default)]
pub struct ReportOptions {
    /// Typed description. Auto-generated from the evidence when absent.
    pub description: Option<String>,
    /// Voice transcript appended to the description.
    pub transcript: Option<String>,
    /// Video file names. A dashcam clip is used when empty.
    pub videos: Vec<String>,
    /// Incident pin as `(lat, lng)`. The map center is used when absent.
    pub location: Option<(f64, f64)>,
    /// Skip the summarize and notarize calls.
    pub offline: bool,
    /// Follow the dispatch timeline after submission.
    pub follow_dispatch: bool,
}

#[derive(Debug, Clone)]
pub struct ReportOutcome {
    pub claim_token: String,
    pub notarized: bool,
    pub report_hash: String,
    pub summary: String,
}

fn mime_for(file_name: &str) -> &'static str {
    let ext = file_name
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase())
        .unwrap_or_default();
    match ext.as_str() {
        "mp4" | "m4v" => "video/mp4",
        "webm" => "video/webm",
        "mov" => "video/quicktime",
        "jpg" | "jpeg" => "image/jpeg",
        "png" => "image/png",
        _ => "application/octet-stream",
    }
}

/// Run steps 1 to 3 of the wizard and stop on the AI summary step.
pub fn collect_evidence(opts: &ReportOptions) -> Result<SubmissionWizard, StateError> {
    let mut wizard = SubmissionWizard::new();

    let mut picker = PinDropPicker::new();
    picker.on_location_pick(Box::new(|loc| {
        tracing::info!(address = %loc.address, "Incident location set");
    }));
    let (lat, lng) = opts.location.unwrap_or_else(|| picker.center());
    wizard.set_location(picker.pick(lat, lng));

    for slot in PhotoSlot::ALL {
        let name = format!("{}-demo.jpg", slot.label().to_lowercase().replace(' ', "-"));
        wizard.capture_photo(slot, MediaCapture::new(name, "image/jpeg"))?;
    }
    wizard.next()?;

    let videos = if opts.videos.is_empty() {
        vec!["dashcam-footage.mp4".to_string()]
    } else {
        opts.videos.clone()
    };
    for name in videos {
        let mime = mime_for(&name);
        if let Err(e) = wizard.add_video(MediaCapture::new(name.as_str(), mime)) {
            tracing::warn!(file = %name, error = %e, "Skipping file");
        }
    }
    wizard.next()?;

    match &opts.description {
        Some(text) => wizard.set_description(text.clone())?,
        None => wizard.auto_generate_description(Local::now().time()),
    }
    if let Some(transcript) = &opts.transcript {
        wizard.append_transcript(transcript);
    }
    wizard.next()?;
    Ok(wizard)
}

pub async fn run_report(config: &AppConfig, opts: ReportOptions) -> Result<ReportOutcome, anyhow::Error> {
    let mut wizard = collect_evidence(&opts)?;
    println!(
        "Step {}: {} ({} photos, {} videos)",
        wizard.step().number(),
        wizard.step().title(),
        wizard.completed_photos(),
        wizard.videos().len()
    );

    let summary = if opts.offline {
        wizard.apply_summary_result(Err::<serde_json::Value, _>("offline mode"))
    } else {
        let client = SummarizeClient::new(config.summarize_url.clone());
        let result = client.summarize(&wizard.summary_request()).await;
        wizard.apply_summary_result(result)
    }
    .to_string();
    println!("\nAI summary:\n{summary}\n");

    let request = wizard.notarize_request(Utc::now().timestamp_millis())?;
    if !opts.offline {
        let relay = NotarizeRelay::new(config.notarize_url.clone());
        match relay.forward(serde_json::to_vec(&request)?.into()).await {
            Ok(upstream) => {
                let response: NotarizeResponse =
                    serde_json::from_value(upstream.body).unwrap_or(NotarizeResponse {
                        status: None,
                        object_id: None,
                    });
                if let Err(e) = wizard.accept_notarize_response(&response) {
                    tracing::warn!(status = upstream.status, error = %e, "Notarization rejected");
                }
            }
            Err(e) => tracing::warn!(error = %e, "Notarize service unreachable"),
        }
    }

    let outcome = ReportOutcome {
        claim_token: wizard.claim_token().to_string(),
        notarized: wizard.is_notarized(),
        report_hash: request.report_hash,
        summary,
    };
    println!(
        "Report submitted. Claim token: {}{}",
        outcome.claim_token,
        if outcome.notarized { "" } else { " (not notarized)" }
    );

    if opts.follow_dispatch {
        follow_dispatch(config, &outcome.claim_token).await;
    }
    Ok(outcome)
}

/// Extra wall time allowed past the schedule before giving up on a timeline.
const FOLLOW_GRACE: Duration = Duration::from_secs(5);

async fn follow_dispatch(config: &AppConfig, token: &str) {
    let registry = DispatchRegistry::new(
        Arc::new(SystemClock::new()),
        Duration::from_millis(config.dispatch.tick_ms),
        config.dispatch.dwell_secs,
    );
    let ticket = registry
        .start_with_token(token.to_string(), TimelinePreset::Dispatch)
        .await;
    let Some(mut updates) = registry.subscribe(&ticket.token).await else {
        return;
    };
    let schedule = Timeline::new(ticket.preset.steps(), config.dispatch.dwell_secs);
    let deadline = Duration::from_secs(schedule.finish_secs()) + FOLLOW_GRACE;

    let follow = async {
        let mut last_completed = usize::MAX;
        loop {
            let snapshot = updates.borrow_and_update().clone();
            if snapshot.completed != last_completed {
                last_completed = snapshot.completed;
                let current = snapshot
                    .steps
                    .iter()
                    .find(|s| Some(&s.id) == snapshot.processing.as_ref())
                    .map(|s| s.title.as_str())
                    .unwrap_or("waiting");
                println!(
                    "[{}] {}/{} complete, now: {}",
                    format_elapsed(snapshot.elapsed_secs),
                    snapshot.completed,
                    snapshot.total,
                    current
                );
            }
            if snapshot.finished {
                println!("All dispatch steps complete.");
                break;
            }
            if updates.changed().await.is_err() {
                break;
            }
        }
    };
    if tokio::time::timeout(deadline, follow).await.is_err() {
        tracing::warn!(token, deadline_secs = deadline.as_secs(), "Dispatch did not finish in time");
    }
}
