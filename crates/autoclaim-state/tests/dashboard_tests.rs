use autoclaim_protocol::{ClaimStatus, ReportStatus, Role, SubmissionStatus};
use autoclaim_state::{DashboardRecord, DashboardView, Fixtures, StateError};

#[test]
fn test_first_record_selected() {
    let view = DashboardView::new(Fixtures::demo().police_reports);
    assert_eq!(view.selected().map(|r| r.id.as_str()), Some("report-001"));
    assert_eq!(view.role(), Role::Police);
}

#[test]
fn test_select_swaps_detail() {
    let mut view = DashboardView::new(Fixtures::demo().insurance_claims);
    let claim = view.select("claim-002").unwrap();
    assert_eq!(claim.vehicle.make, "Honda");
    assert_eq!(view.selected().unwrap().id, "claim-002");
}

#[test]
fn test_select_unknown_keeps_selection() {
    let mut view = DashboardView::new(Fixtures::demo().submissions);
    view.select("sub-002").unwrap();
    let err = view.select("sub-999").unwrap_err();
    assert!(matches!(err, StateError::UnknownRecord { role: Role::Claimer, .. }));
    assert_eq!(view.selected().unwrap().id, "sub-002");
}

#[test]
fn test_police_actions_are_logged_not_applied() {
    let mut view = DashboardView::new(Fixtures::demo().police_reports);
    let action = view.verify("report-001").unwrap();
    assert_eq!(action.current_status, "pending");
    assert_eq!(action.requested_status, "verified");
    view.contact("report-001").unwrap();
    view.flag("report-003").unwrap();

    assert_eq!(view.actions().len(), 3);
    assert_eq!(view.get("report-001").unwrap().status(), ReportStatus::Pending);
    assert_eq!(view.get("report-003").unwrap().status(), ReportStatus::Verified);
}

#[test]
fn test_insurance_actions() {
    let mut view = DashboardView::new(Fixtures::demo().insurance_claims);
    assert_eq!(view.approve("claim-001").unwrap().requested_status, "approved");
    assert_eq!(view.request_info("claim-001").unwrap().requested_status, "pending");
    assert_eq!(view.reject("claim-001").unwrap().requested_status, "rejected");
    assert_eq!(view.get("claim-001").unwrap().status(), ClaimStatus::Review);
}

#[test]
fn test_action_on_unknown_record_fails() {
    let mut view = DashboardView::new(Fixtures::demo().insurance_claims);
    assert!(view.approve("claim-404").is_err());
    assert!(view.actions().is_empty());
}

#[test]
fn test_request_status_by_wire_name() {
    let mut view = DashboardView::new(Fixtures::demo().submissions);
    let action = view.request_status_str("sub-001", "Approved").unwrap();
    assert_eq!(action.requested_status, "approved");
    assert_eq!(view.get("sub-001").unwrap().status(), SubmissionStatus::InReview);
}

#[test]
fn test_action_record_json() {
    let mut view = DashboardView::new(Fixtures::demo().police_reports);
    let action = view.flag("report-002").unwrap();
    let json = serde_json::to_value(&action).unwrap();
    assert_eq!(json["role"], "police");
    assert_eq!(json["recordId"], "report-002");
    assert_eq!(json["requestedStatus"], "flagged");
}
