//! Dispatch timeline state machine.
//!
//! A timeline is a fixed, ordered list of steps, each scheduled at an
//! offset (in seconds) after submission. A single elapsed-seconds clock
//! drives every step:
//!
//! 1. **Pending** until elapsed time reaches the step's offset.
//! 2. **Processing** for `dwell_secs` seconds after that.
//! 3. **Completed** from `offset + dwell_secs` onwards.
//!
//! Steps never regress. A step that starts out completed (the
//! post-submission "registered" receipt) stays completed, and moving the
//! clock backwards is ignored.

use serde::{Deserialize, Serialize};

use autoclaim_protocol::{StepStatus, TimelineStep, STEP_DWELL_SECS};

// ---------------------------------------------------------------------------
// Presets
// ---------------------------------------------------------------------------

fn step(
    id: &str,
    title: &str,
    description: &str,
    token: &str,
    offset_secs: u64,
    status: StepStatus,
    eta: Option<&str>,
) -> TimelineStep {
    TimelineStep {
        id: id.into(),
        title: title.into(),
        description: description.into(),
        token: token.into(),
        offset_secs,
        status,
        eta: eta.map(Into::into),
    }
}

/// Steps shown on the post-submission status page. The registration
/// receipt is already complete when the page opens.
pub fn post_submission_steps() -> Vec<TimelineStep> {
    vec![
        step(
            "registered",
            "Report Registered",
            "Your incident report has been received and validated",
            "0x9e8e...5b52",
            0,
            StepStatus::Completed,
            None,
        ),
        step(
            "police",
            "Police Dispatch Notified",
            "Local authorities have been alerted to your incident",
            "0x6afc...e911",
            2,
            StepStatus::Pending,
            None,
        ),
        step(
            "insurance",
            "Insurance Verification Approved",
            "Your policy has been verified and claim pre-approved",
            "0xa91b...c033",
            5,
            StepStatus::Pending,
            None,
        ),
        step(
            "towing",
            "Nearest Tow Truck En Route",
            "Emergency towing service has been dispatched to your location",
            "0x7c1a...db20",
            8,
            StepStatus::Pending,
            Some("12 minutes"),
        ),
    ]
}

/// Steps run by the guided report right after it is submitted.
pub fn dispatch_steps() -> Vec<TimelineStep> {
    vec![
        step(
            "registered",
            "Report Registered",
            "Your incident report has been received and validated",
            "0x9e8e...5b52",
            0,
            StepStatus::Pending,
            None,
        ),
        step(
            "police",
            "Police Report: Approved",
            "Local authorities have verified and approved your report",
            "0x6afc...e911",
            2,
            StepStatus::Pending,
            None,
        ),
        step(
            "insurance",
            "Insurance Verification Approved",
            "Your policy has been verified and claim pre-approved",
            "0xa91b...c033",
            4,
            StepStatus::Pending,
            None,
        ),
        step(
            "towing",
            "Nearest Tow Truck En Route",
            "Emergency towing service has been dispatched to your location",
            "0x7c1a...db20",
            6,
            StepStatus::Pending,
            Some("~15 minutes"),
        ),
    ]
}

/// Which preset schedule a timeline runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TimelinePreset {
    PostSubmission,
    Dispatch,
}

impl TimelinePreset {
    pub fn steps(self) -> Vec<TimelineStep> {
        match self {
            TimelinePreset::PostSubmission => post_submission_steps(),
            TimelinePreset::Dispatch => dispatch_steps(),
        }
    }
}

// ---------------------------------------------------------------------------
// State machine
// ---------------------------------------------------------------------------

/// A step moving from one status to a later one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StepTransition {
    pub step_id: String,
    pub from: StepStatus,
    pub to: StepStatus,
    pub at_secs: u64,
}

/// Point-in-time view of a timeline for rendering.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimelineSnapshot {
    pub elapsed_secs: u64,
    pub elapsed_display: String,
    pub completed: usize,
    pub total: usize,
    pub processing: Option<String>,
    pub next_pending: Option<String>,
    pub finished: bool,
    pub steps: Vec<TimelineStep>,
}

#[derive(Debug, Clone)]
pub struct Timeline {
    steps: Vec<TimelineStep>,
    dwell_secs: u64,
    elapsed: u64,
}

impl Timeline {
    /// Build a timeline and settle it at elapsed zero.
    pub fn new(steps: Vec<TimelineStep>, dwell_secs: u64) -> Self {
        let mut timeline = Self {
            steps,
            dwell_secs,
            elapsed: 0,
        };
        timeline.recompute();
        timeline
    }

    pub fn from_preset(preset: TimelinePreset) -> Self {
        Self::new(preset.steps(), STEP_DWELL_SECS)
    }

    /// Advance the clock by one second.
    pub fn tick(&mut self) -> Vec<StepTransition> {
        self.advance_to(self.elapsed + 1)
    }

    /// Move the clock to `elapsed`. Earlier values are ignored.
    pub fn advance_to(&mut self, elapsed: u64) -> Vec<StepTransition> {
        if elapsed <= self.elapsed {
            return Vec::new();
        }
        self.elapsed = elapsed;
        self.recompute()
    }

    fn recompute(&mut self) -> Vec<StepTransition> {
        let mut transitions = Vec::new();
        for step in &mut self.steps {
            let scheduled = StepStatus::at(step.offset_secs, self.dwell_secs, self.elapsed);
            let next = step.status.max(scheduled);
            if next != step.status {
                transitions.push(StepTransition {
                    step_id: step.id.clone(),
                    from: step.status,
                    to: next,
                    at_secs: self.elapsed,
                });
                step.status = next;
            }
        }
        transitions
    }

    pub fn elapsed(&self) -> u64 {
        self.elapsed
    }

    pub fn dwell_secs(&self) -> u64 {
        self.dwell_secs
    }

    pub fn steps(&self) -> &[TimelineStep] {
        &self.steps
    }

    pub fn status_of(&self, step_id: &str) -> Option<StepStatus> {
        self.steps.iter().find(|s| s.id == step_id).map(|s| s.status)
    }

    pub fn completed_count(&self) -> usize {
        self.steps
            .iter()
            .filter(|s| s.status == StepStatus::Completed)
            .count()
    }

    pub fn processing_step(&self) -> Option<&TimelineStep> {
        self.steps.iter().find(|s| s.status == StepStatus::Processing)
    }

    pub fn next_pending(&self) -> Option<&TimelineStep> {
        self.steps.iter().find(|s| s.status == StepStatus::Pending)
    }

    pub fn is_finished(&self) -> bool {
        self.steps.iter().all(|s| s.status == StepStatus::Completed)
    }

    /// Elapsed time at which every step will have completed.
    pub fn finish_secs(&self) -> u64 {
        self.steps
            .iter()
            .map(|s| s.offset_secs + self.dwell_secs)
            .max()
            .unwrap_or(0)
    }

    pub fn snapshot(&self) -> TimelineSnapshot {
        TimelineSnapshot {
            elapsed_secs: self.elapsed,
            elapsed_display: format_elapsed(self.elapsed),
            completed: self.completed_count(),
            total: self.steps.len(),
            processing: self.processing_step().map(|s| s.id.clone()),
            next_pending: self.next_pending().map(|s| s.id.clone()),
            finished: self.is_finished(),
            steps: self.steps.clone(),
        }
    }
}

/// Format seconds as `MM:SS`.
pub fn format_elapsed(secs: u64) -> String {
    format!("{:02}:{:02}", secs / 60, secs % 60)
}
