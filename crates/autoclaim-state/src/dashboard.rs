use std::fmt::Display;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use autoclaim_protocol::{
    ClaimStatus, InsuranceClaim, PoliceReport, ProtocolError, ReportStatus, Role, Submission,
    SubmissionStatus,
};

use crate::StateError;

/// A record that can be listed and inspected on a role dashboard.
pub trait DashboardRecord {
    type Status: Copy + Display + FromStr<Err = ProtocolError>;

    const ROLE: Role;

    fn id(&self) -> &str;
    fn title(&self) -> &str;
    fn status(&self) -> Self::Status;
}

impl DashboardRecord for Submission {
    type Status = SubmissionStatus;
    const ROLE: Role = Role::Claimer;

    fn id(&self) -> &str {
        &self.id
    }
    fn title(&self) -> &str {
        &self.title
    }
    fn status(&self) -> SubmissionStatus {
        self.status
    }
}

impl DashboardRecord for PoliceReport {
    type Status = ReportStatus;
    const ROLE: Role = Role::Police;

    fn id(&self) -> &str {
        &self.id
    }
    fn title(&self) -> &str {
        &self.title
    }
    fn status(&self) -> ReportStatus {
        self.status
    }
}

impl DashboardRecord for InsuranceClaim {
    type Status = ClaimStatus;
    const ROLE: Role = Role::Insurance;

    fn id(&self) -> &str {
        &self.id
    }
    fn title(&self) -> &str {
        &self.incident_type
    }
    fn status(&self) -> ClaimStatus {
        self.status
    }
}

/// A requested status change. Recorded, never applied.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActionRecord {
    pub role: Role,
    pub record_id: String,
    pub current_status: String,
    pub requested_status: String,
    pub at: DateTime<Utc>,
}

/// List/detail view over a fixed set of records for one role.
#[derive(Debug, Clone)]
pub struct DashboardView<R: DashboardRecord> {
    records: Vec<R>,
    selected: Option<usize>,
    actions: Vec<ActionRecord>,
}

impl<R: DashboardRecord> DashboardView<R> {
    /// The first record, if any, starts selected.
    pub fn new(records: Vec<R>) -> Self {
        let selected = if records.is_empty() { None } else { Some(0) };
        Self {
            records,
            selected,
            actions: Vec::new(),
        }
    }

    pub fn role(&self) -> Role {
        R::ROLE
    }

    pub fn records(&self) -> &[R] {
        &self.records
    }

    pub fn get(&self, id: &str) -> Option<&R> {
        self.records.iter().find(|r| r.id() == id)
    }

    /// Select the record with `id`. An unknown id leaves the selection as is.
    pub fn select(&mut self, id: &str) -> Result<&R, StateError> {
        let index = self
            .position(id)
            .ok_or_else(|| self.unknown(id))?;
        self.selected = Some(index);
        Ok(&self.records[index])
    }

    /// Move the selection by `delta` rows, wrapping at both ends.
    pub fn select_offset(&mut self, delta: isize) {
        let len = self.records.len() as isize;
        if len == 0 {
            return;
        }
        let current = self.selected.unwrap_or(0) as isize;
        self.selected = Some((current + delta).rem_euclid(len) as usize);
    }

    pub fn selected(&self) -> Option<&R> {
        self.selected.and_then(|i| self.records.get(i))
    }

    pub fn selected_index(&self) -> Option<usize> {
        self.selected
    }

    /// Log a requested status change for `id`. The record keeps its status.
    pub fn request_status(
        &mut self,
        id: &str,
        status: R::Status,
    ) -> Result<ActionRecord, StateError> {
        let record = self.get(id).ok_or_else(|| self.unknown(id))?;
        let action = ActionRecord {
            role: R::ROLE,
            record_id: record.id().to_string(),
            current_status: record.status().to_string(),
            requested_status: status.to_string(),
            at: Utc::now(),
        };
        tracing::info!(
            role = %action.role,
            id = %action.record_id,
            current = %action.current_status,
            requested = %action.requested_status,
            "Status change requested"
        );
        self.actions.push(action.clone());
        Ok(action)
    }

    /// Same as [`request_status`](Self::request_status) with the status
    /// given in its wire spelling.
    pub fn request_status_str(&mut self, id: &str, status: &str) -> Result<ActionRecord, StateError> {
        let parsed = status.parse::<R::Status>()?;
        self.request_status(id, parsed)
    }

    pub fn actions(&self) -> &[ActionRecord] {
        &self.actions
    }

    fn position(&self, id: &str) -> Option<usize> {
        self.records.iter().position(|r| r.id() == id)
    }

    fn unknown(&self, id: &str) -> StateError {
        StateError::UnknownRecord {
            role: R::ROLE,
            id: id.to_string(),
        }
    }
}

// ---------------------------------------------------------------------------
// Role actions
// ---------------------------------------------------------------------------

/// Police buttons: verify, contact reporter, flag for review.
impl DashboardView<PoliceReport> {
    pub fn verify(&mut self, id: &str) -> Result<ActionRecord, StateError> {
        self.request_status(id, ReportStatus::Verified)
    }

    pub fn contact(&mut self, id: &str) -> Result<ActionRecord, StateError> {
        self.request_status(id, ReportStatus::Contacted)
    }

    pub fn flag(&mut self, id: &str) -> Result<ActionRecord, StateError> {
        self.request_status(id, ReportStatus::Flagged)
    }
}

/// Insurer buttons: approve, request more info, reject.
impl DashboardView<InsuranceClaim> {
    pub fn approve(&mut self, id: &str) -> Result<ActionRecord, StateError> {
        self.request_status(id, ClaimStatus::Approved)
    }

    pub fn request_info(&mut self, id: &str) -> Result<ActionRecord, StateError> {
        self.request_status(id, ClaimStatus::Pending)
    }

    pub fn reject(&mut self, id: &str) -> Result<ActionRecord, StateError> {
        self.request_status(id, ClaimStatus::Rejected)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Fixtures;

    #[test]
    fn empty_view_has_no_selection() {
        let view: DashboardView<Submission> = DashboardView::new(Vec::new());
        assert!(view.selected().is_none());
    }

    #[test]
    fn select_offset_wraps() {
        let mut view = DashboardView::new(Fixtures::demo().police_reports);
        view.select_offset(-1);
        assert_eq!(view.selected_index(), Some(2));
        view.select_offset(1);
        assert_eq!(view.selected_index(), Some(0));
    }

    #[test]
    fn request_status_str_rejects_foreign_vocabulary() {
        let mut view = DashboardView::new(Fixtures::demo().police_reports);
        let err = view.request_status_str("report-001", "approved").unwrap_err();
        assert!(matches!(err, StateError::Protocol(_)));
        assert!(view.actions().is_empty());
    }
}
