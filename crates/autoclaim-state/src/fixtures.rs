//! Read-only demo records for the three dashboards.
//!
//! Built once and handed to whichever view needs them; nothing writes
//! back into a `Fixtures` value.

use serde_json::json;

use autoclaim_protocol::*;

#[derive(Debug, Clone)]
pub struct Fixtures {
    pub submissions: Vec<Submission>,
    pub police_reports: Vec<PoliceReport>,
    pub insurance_claims: Vec<InsuranceClaim>,
    pub services: Vec<ServiceDescriptor>,
}

impl Fixtures {
    pub fn demo() -> Self {
        Self {
            submissions: claimer_submissions(),
            police_reports: police_reports(),
            insurance_claims: insurance_claims(),
            services: service_catalog(),
        }
    }

    pub fn submission(&self, id: &str) -> Option<&Submission> {
        self.submissions.iter().find(|s| s.id == id)
    }

    pub fn police_report(&self, id: &str) -> Option<&PoliceReport> {
        self.police_reports.iter().find(|r| r.id == id)
    }

    pub fn insurance_claim(&self, id: &str) -> Option<&InsuranceClaim> {
        self.insurance_claims.iter().find(|c| c.id == id)
    }
}

fn site(address: &str, lat: f64, lng: f64, context: &str) -> SiteLocation {
    SiteLocation {
        address: address.into(),
        coordinates: Coordinates { lat, lng },
        context: context.into(),
    }
}

fn names(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

fn claimer_submissions() -> Vec<Submission> {
    vec![
        Submission {
            id: "sub-001".into(),
            submission_no: 1,
            token_id: Some("0x9e8e…5b52".into()),
            title: "Driveway Mirror Damage".into(),
            date: "19 Jul 2025".into(),
            status: SubmissionStatus::InReview,
            description: "Side mirror damaged in shared driveway near Dengkil Cafe".into(),
            location: Location {
                lat: 2.861422,
                lng: 101.675189,
                address: "Jalan Cempaka, Selangor".into(),
            },
            media: MediaSet {
                images: names(&["mirror_damage.jpg"]),
                videos: names(&["incident_video.mp4"]),
                voice: names(&["voice_report.mp3"]),
            },
        },
        Submission {
            id: "sub-002".into(),
            submission_no: 2,
            token_id: None,
            title: "Parking Lot Scratch".into(),
            date: "15 Jul 2025".into(),
            status: SubmissionStatus::Approved,
            description: "Minor scratch on rear bumper in shopping mall parking".into(),
            location: Location {
                lat: 3.0738,
                lng: 101.6065,
                address: "Sunway Pyramid, Petaling Jaya".into(),
            },
            media: MediaSet {
                images: names(&["scratch_photo.jpg"]),
                videos: vec![],
                voice: vec![],
            },
        },
        Submission {
            id: "sub-003".into(),
            submission_no: 3,
            token_id: None,
            title: "Traffic Light Collision".into(),
            date: "10 Jul 2025".into(),
            status: SubmissionStatus::Rejected,
            description: "Rear-end collision at traffic intersection".into(),
            location: Location {
                lat: 3.1569,
                lng: 101.7158,
                address: "Jalan Ampang, Kuala Lumpur".into(),
            },
            media: MediaSet {
                images: names(&["collision_1.jpg", "collision_2.jpg"]),
                videos: names(&["traffic_cam.mp4"]),
                voice: vec![],
            },
        },
    ]
}

fn police_reports() -> Vec<PoliceReport> {
    vec![
        PoliceReport {
            id: "report-001".into(),
            token_id: "0x9e8e…5b52".into(),
            title: "Side Mirror Damage – Suspect Fled Scene from Driveway near Dengkil Cafe".into(),
            submission_date: "19 July 2025 – 08:42 MYT".into(),
            status: ReportStatus::Pending,
            location: site(
                "Private driveway adjacent to Dengkil Cafe, Jalan Cempaka, Selangor",
                2.861422,
                101.675189,
                "Residential driveway shared by multiple tenants. Borders busy pedestrian walkway and popular breakfast venue.",
            ),
            claimer: ReportingParty {
                name: "Ahmad R.".into(),
                ic: "XXXXXXXXXXXX".into(),
                contact: "+60-1X-XXX-XXXX".into(),
                email: "ahmad.report@example.my".into(),
            },
            suspect: Some(Suspect {
                vehicle: "White Perodua Axia".into(),
                plate: "BKL 92XX (Partial)".into(),
                description: "Male driver, identity unknown. Captured fleeing scene within seconds.".into(),
            }),
            incident: IncidentDetails {
                time: "08:36:48 MYT".into(),
                description: "Glancing side-swipe against claimer's stationary car in shared driveway".into(),
                damage: "Left side mirror visibly torn off".into(),
                webcam_source: "USB cam provided by local store, mounted on window frame facing driveway access".into(),
                ai_summary: "Minor vehicular collision in shared driveway. Reporting party's parked car suffered left side mirror damage from passing white Perodua Axia. Camera footage confirms rapid suspect departure. Likely qualifies for hit-and-run classification.".into(),
            },
            priority: Priority::Medium,
        },
        PoliceReport {
            id: "report-002".into(),
            token_id: "0xbb23…8e4e".into(),
            title: "Motorcycle Theft from Shopping Mall Parking".into(),
            submission_date: "19 July 2025 – 14:15 MYT".into(),
            status: ReportStatus::Flagged,
            location: site(
                "Sunway Pyramid Shopping Mall, Parking Level B2, Petaling Jaya",
                3.0738,
                101.6065,
                "Covered parking area with CCTV coverage. High-traffic shopping district.",
            ),
            claimer: ReportingParty {
                name: "Siti N.".into(),
                ic: "YYYYYYYYYYYY".into(),
                contact: "+60-1Y-YYY-YYYY".into(),
                email: "siti.n@example.my".into(),
            },
            suspect: Some(Suspect {
                vehicle: "Unknown".into(),
                plate: "Not captured".into(),
                description: "Two individuals, faces obscured by helmets".into(),
            }),
            incident: IncidentDetails {
                time: "13:45:22 MYT".into(),
                description: "Motorcycle stolen from designated parking bay".into(),
                damage: "Vehicle missing, lock mechanism damaged".into(),
                webcam_source: "Mall security camera system".into(),
                ai_summary: "Organized theft of motorcycle from secured parking area. Two suspects worked in coordination to bypass security measures.".into(),
            },
            priority: Priority::High,
        },
        PoliceReport {
            id: "report-003".into(),
            token_id: "0xb233…832e".into(),
            title: "Minor Fender Bender at Traffic Light".into(),
            submission_date: "18 July 2025 – 16:30 MYT".into(),
            status: ReportStatus::Verified,
            location: site(
                "Intersection of Jalan Ampang & Jalan Tun Razak, Kuala Lumpur",
                3.1569,
                101.7158,
                "Busy intersection with traffic light control. Multiple CCTV cameras present.",
            ),
            claimer: ReportingParty {
                name: "David L.".into(),
                ic: "ZZZZZZZZZZZZ".into(),
                contact: "+60-1Z-ZZZ-ZZZZ".into(),
                email: "david.l@example.my".into(),
            },
            suspect: None,
            incident: IncidentDetails {
                time: "16:15:33 MYT".into(),
                description: "Rear-end collision at red traffic light".into(),
                damage: "Minor bumper scratches and dent".into(),
                webcam_source: "Traffic management system camera".into(),
                ai_summary: "Standard rear-end collision at controlled intersection. Both parties remained at scene and exchanged information.".into(),
            },
            priority: Priority::Low,
        },
    ]
}

fn insurance_claims() -> Vec<InsuranceClaim> {
    vec![
        InsuranceClaim {
            id: "claim-001".into(),
            claim_number: "0x9e8e...5b52".into(),
            incident_type: "Vehicle Collision – Hit-and-Run in Driveway".into(),
            severity: ClaimSeverity::Moderate,
            claim_type: ClaimType::Collision,
            vehicle: Vehicle {
                make: "Proton".into(),
                model: "Saga FLX".into(),
                color: "Blue".into(),
                registration: "WXY 9218".into(),
            },
            status: ClaimStatus::Review,
            submission_date: "19 July 2025 – 08:42 MYT".into(),
            location: site(
                "Driveway near Dengkil Cafe, Jalan Cempaka, Selangor",
                2.861422,
                101.675189,
                "Shared driveway with morning traffic. Webcam footage provided by adjacent retail shop.",
            ),
            claimer: ClaimerContact {
                name: "Ahmad R.".into(),
                contact: "+60-1X-XXX-XXXX".into(),
                email: "ahmad.report@example.my".into(),
            },
            police_report: LinkedPoliceReport {
                token_id: "0x9e8e…5b52".into(),
                title: "Side Mirror Damage – Suspect Fled Scene from Driveway".into(),
                date: "19 July 2025 – 08:42 MYT".into(),
                ai_narrative: "At 08:36 MYT, a white Perodua Axia side-swiped the parked Proton Saga, damaging its left mirror. The driver exited the scene rapidly. Incident captured by third-party webcam.".into(),
                status: "✅ Acknowledged".into(),
            },
            repair_estimate: RepairEstimate {
                components: vec![
                    RepairComponent {
                        component: "Side Mirror (Left)".into(),
                        description: "Torn off, fragments visible".into(),
                        cost: 250,
                    },
                    RepairComponent {
                        component: "Panel Touch-Up".into(),
                        description: "Light scrape below mirror".into(),
                        cost: 150,
                    },
                ],
                total: 400,
                workshop_quote: "Pending final approval".into(),
            },
            multimedia: Multimedia {
                photos: vec![PhotoEvidence {
                    filename: "20250719_mirror_damage.jpg".into(),
                    timestamp: "08:37 MYT".into(),
                    description: "Fractured mirror, parked Proton Saga in blue".into(),
                }],
                videos: vec![VideoEvidence {
                    filename: "DengkilCam_0840_clip01.mp4".into(),
                    duration: "12s".into(),
                    description: "Suspect vehicle scraping mirror, immediate departure".into(),
                    source: "USB Webcam, Retail Shop Window Frame".into(),
                }],
            },
            priority: Priority::Medium,
        },
        InsuranceClaim {
            id: "claim-002".into(),
            claim_number: "0x6b1e...4f93".into(),
            incident_type: "Motorcycle Theft from Shopping Mall".into(),
            severity: ClaimSeverity::TotalLoss,
            claim_type: ClaimType::Theft,
            vehicle: Vehicle {
                make: "Honda".into(),
                model: "Wave 125".into(),
                color: "Red".into(),
                registration: "ABC 1234".into(),
            },
            status: ClaimStatus::Approved,
            submission_date: "19 July 2025 – 14:15 MYT".into(),
            location: site(
                "Sunway Pyramid Shopping Mall, Parking Level B2, Petaling Jaya",
                3.0738,
                101.6065,
                "Covered parking area with CCTV coverage. High-traffic shopping district.",
            ),
            claimer: ClaimerContact {
                name: "Siti N.".into(),
                contact: "+60-1Y-YYY-YYYY".into(),
                email: "siti.n@example.my".into(),
            },
            police_report: LinkedPoliceReport {
                token_id: "0xb233…832e".into(),
                title: "Motorcycle Theft from Shopping Mall Parking".into(),
                date: "19 July 2025 – 14:15 MYT".into(),
                ai_narrative: "Organized theft of motorcycle from secured parking area. Two suspects worked in coordination.".into(),
                status: "✅ Acknowledged".into(),
            },
            repair_estimate: RepairEstimate {
                components: vec![RepairComponent {
                    component: "Total Loss".into(),
                    description: "Vehicle stolen, not recovered".into(),
                    cost: 8500,
                }],
                total: 8500,
                workshop_quote: "N/A - Total Loss".into(),
            },
            multimedia: Multimedia {
                photos: vec![PhotoEvidence {
                    filename: "20250719_empty_parking.jpg".into(),
                    timestamp: "14:20 MYT".into(),
                    description: "Empty parking bay where motorcycle was parked".into(),
                }],
                videos: vec![VideoEvidence {
                    filename: "mall_security_cam.mp4".into(),
                    duration: "45s".into(),
                    description: "Two suspects stealing motorcycle".into(),
                    source: "Mall Security Camera System".into(),
                }],
            },
            priority: Priority::High,
        },
        InsuranceClaim {
            id: "claim-003".into(),
            claim_number: "0x93...4341".into(),
            incident_type: "Minor Fender Bender at Traffic Light".into(),
            severity: ClaimSeverity::Minor,
            claim_type: ClaimType::Collision,
            vehicle: Vehicle {
                make: "Toyota".into(),
                model: "Vios".into(),
                color: "White".into(),
                registration: "DEF 5678".into(),
            },
            status: ClaimStatus::Completed,
            submission_date: "18 July 2025 – 16:30 MYT".into(),
            location: site(
                "Intersection of Jalan Ampang & Jalan Tun Razak, Kuala Lumpur",
                3.1569,
                101.7158,
                "Busy intersection with traffic light control. Multiple CCTV cameras present.",
            ),
            claimer: ClaimerContact {
                name: "David L.".into(),
                contact: "+60-1Z-ZZZ-ZZZZ".into(),
                email: "david.l@example.my".into(),
            },
            police_report: LinkedPoliceReport {
                token_id: "0xbb23…8e4e".into(),
                title: "Minor Fender Bender at Traffic Light".into(),
                date: "18 July 2025 – 16:30 MYT".into(),
                ai_narrative: "Standard rear-end collision at controlled intersection. Both parties remained at scene.".into(),
                status: "✅ Acknowledged".into(),
            },
            repair_estimate: RepairEstimate {
                components: vec![RepairComponent {
                    component: "Rear Bumper".into(),
                    description: "Minor scratches and small dent".into(),
                    cost: 180,
                }],
                total: 180,
                workshop_quote: "Completed - Paid".into(),
            },
            multimedia: Multimedia {
                photos: vec![PhotoEvidence {
                    filename: "20250718_bumper_damage.jpg".into(),
                    timestamp: "16:35 MYT".into(),
                    description: "Minor rear bumper damage".into(),
                }],
                videos: vec![VideoEvidence {
                    filename: "traffic_cam_collision.mp4".into(),
                    duration: "8s".into(),
                    description: "Rear-end collision at red light".into(),
                    source: "Traffic Management System Camera".into(),
                }],
            },
            priority: Priority::Low,
        },
    ]
}

fn service_catalog() -> Vec<ServiceDescriptor> {
    vec![
        ServiceDescriptor {
            name: "Accident Report Summarizer".into(),
            endpoint: Some(DEFAULT_SUMMARIZE_URL.into()),
            method: "POST".into(),
            description: "Generate accident incident summary from transcription".into(),
            test_payload: json!({
                "transcription": "I was driving when the van stopped suddenly and I crashed into it"
            }),
            available: true,
        },
        ServiceDescriptor {
            name: "Accident Cost Estimator".into(),
            endpoint: None,
            method: "POST".into(),
            description: "Estimate repair costs and damages based on accident details".into(),
            test_payload: json!({
                "vehicleType": "sedan",
                "damageLevel": "moderate",
                "location": "front-end"
            }),
            available: false,
        },
        ServiceDescriptor {
            name: "Accident Claim Agent".into(),
            endpoint: None,
            method: "POST".into(),
            description: "AI agent to assist with insurance claim processing and documentation".into(),
            test_payload: json!({
                "claimType": "vehicle",
                "incidentReport": "summary",
                "documents": []
            }),
            available: false,
        },
    ]
}
