use autoclaim_protocol::*;

fn sample_submission() -> Submission {
    Submission {
        id: "sub-001".into(),
        submission_no: 1,
        token_id: None,
        title: "Driveway Mirror Damage".into(),
        date: "19 Jul 2025".into(),
        status: SubmissionStatus::InReview,
        description: "Side mirror damaged".into(),
        location: Location {
            lat: DEFAULT_MAP_LAT,
            lng: DEFAULT_MAP_LNG,
            address: "Jalan Cempaka, Selangor".into(),
        },
        media: MediaSet {
            images: vec!["mirror_damage.jpg".into()],
            videos: vec![],
            voice: vec![],
        },
    }
}

#[test]
fn test_submission_uses_camel_case_fields() {
    let json = serde_json::to_value(sample_submission()).unwrap();
    assert_eq!(json["submissionNo"], 1);
    assert_eq!(json["status"], "in-review");
    assert!(json.get("tokenId").is_none(), "absent token must be omitted");
}

#[test]
fn test_timeline_step_wire_shape() {
    let step = TimelineStep {
        id: "towing".into(),
        title: "Nearest Tow Truck En Route".into(),
        description: "Emergency towing service dispatched".into(),
        token: "0x7c1a...db20".into(),
        offset_secs: 8,
        status: StepStatus::Pending,
        eta: Some("12 minutes".into()),
    };
    let json = serde_json::to_value(&step).unwrap();
    assert_eq!(json["offsetSecs"], 8);
    assert_eq!(json["status"], "pending");
    assert_eq!(json["eta"], "12 minutes");
}

#[test]
fn test_notarize_request_wire_shape() {
    let req = NotarizeRequest {
        report_hash: "ab".repeat(32),
        metadata: NotarizeMetadata::accident_report(42),
    };
    let json = serde_json::to_value(&req).unwrap();
    assert_eq!(json["reportHash"].as_str().unwrap().len(), 64);
    assert_eq!(json["metadata"]["claimId"], "CLAIM-42");
    assert_eq!(json["metadata"]["policeReportNumber"], "PR-42");
}

#[test]
fn test_relay_failure_envelope() {
    let json = serde_json::to_value(RelayFailure::notarize()).unwrap();
    assert_eq!(
        json,
        serde_json::json!({"status": "error", "message": "Failed to contact notarize service"})
    );
}

#[test]
fn test_status_vocabularies_are_distinct_per_role() {
    assert_eq!(SubmissionStatus::ALL.len(), 5);
    assert_eq!(ReportStatus::ALL.len(), 5);
    assert_eq!(ClaimStatus::ALL.len(), 6);
    assert!("review".parse::<SubmissionStatus>().is_err());
    assert!("in-review".parse::<ClaimStatus>().is_err());
}
