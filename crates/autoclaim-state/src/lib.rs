//! Client-side state for AutoClaim: the dispatch timeline state machine,
//! the four-step submission wizard, role dashboards and their fixtures.

pub mod clock;
pub mod dashboard;
pub mod draft;
pub mod error;
pub mod fixtures;
pub mod location;
pub mod timeline;
pub mod wizard;

pub use clock::{Clock, ManualClock, SystemClock};
pub use dashboard::{ActionRecord, DashboardRecord, DashboardView};
pub use draft::{DraftClaim, LabeledImage};
pub use error::StateError;
pub use fixtures::Fixtures;
pub use location::{format_address, LocationPicker, PinDropPicker};
pub use timeline::{
    dispatch_steps, format_elapsed, post_submission_steps, StepTransition, Timeline,
    TimelinePreset, TimelineSnapshot,
};
pub use wizard::{PhotoSlot, ReportData, SubmissionWizard, WizardStep};
