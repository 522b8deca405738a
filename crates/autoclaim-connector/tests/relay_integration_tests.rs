//! Proxy route tests against stub upstreams on loopback.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::http::{HeaderMap, StatusCode};
use axum::routing::post;
use axum::{Json, Router};
use bytes::Bytes;
use serde_json::{json, Value};

use autoclaim_connector::dispatch::DispatchRegistry;
use autoclaim_connector::relay::NotarizeRelay;
use autoclaim_connector::summarizer::{HttpFunctionInvoker, SigningCredentials, SummaryService};
use autoclaim_connector::web_server::{router, WebState};
use autoclaim_protocol::{RelayFailure, MSG_SUMMARIZER_FAILED, MSG_TRANSCRIPTION_REQUIRED};
use autoclaim_state::{Fixtures, ManualClock};

// ─── Helpers ─────────────────────────────────────────────────────────────────

async fn spawn(app: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{addr}")
}

async fn spawn_app(notarize_url: String, function_url: String) -> String {
    let state = WebState {
        fixtures: Arc::new(Fixtures::demo()),
        relay: NotarizeRelay::new(notarize_url),
        summaries: SummaryService::new(
            Arc::new(HttpFunctionInvoker::new(function_url)),
            "accident-report-summarizer",
        ),
        dispatch: DispatchRegistry::new(
            Arc::new(ManualClock::new()),
            Duration::from_millis(5),
            2,
        ),
    };
    spawn(router(state)).await
}

/// Upstream that records the raw body it received and answers with `reply`.
async fn recording_upstream(status: StatusCode, reply: Value) -> (String, Arc<Mutex<Option<Bytes>>>) {
    let seen = Arc::new(Mutex::new(None));
    let captured = seen.clone();
    let app = Router::new().route(
        "/notarize",
        post(move |body: Bytes| {
            let captured = captured.clone();
            let reply = reply.clone();
            async move {
                *captured.lock().unwrap() = Some(body);
                (status, Json(reply))
            }
        }),
    );
    (format!("{}/notarize", spawn(app).await), seen)
}

async fn function_stub(reply: Value) -> String {
    let app = Router::new().route(
        "/invoke",
        post(move |Json(event): Json<Value>| {
            let reply = reply.clone();
            async move {
                assert!(event["body"].as_str().unwrap().contains("transcription"));
                Json(reply)
            }
        }),
    );
    format!("{}/invoke", spawn(app).await)
}

const UNREACHABLE: &str = "http://127.0.0.1:1/unreachable";

// ─── Notarize relay ──────────────────────────────────────────────────────────

#[tokio::test]
async fn test_notarize_forwards_body_verbatim() {
    let (upstream, seen) =
        recording_upstream(StatusCode::OK, json!({"status": "success", "objectId": "0xabc"})).await;
    let base = spawn_app(upstream, UNREACHABLE.into()).await;

    let raw = r#"{ "reportHash": "ab12",  "metadata": {"claimId": "CLAIM-1"} }"#;
    let resp = reqwest::Client::new()
        .post(format!("{base}/api/notarize"))
        .header("content-type", "application/json")
        .body(raw)
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status(), 200);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body, json!({"status": "success", "objectId": "0xabc"}));
    assert_eq!(seen.lock().unwrap().as_deref(), Some(raw.as_bytes()));
}

#[tokio::test]
async fn test_notarize_mirrors_upstream_status() {
    let (upstream, _) =
        recording_upstream(StatusCode::NOT_FOUND, json!({"status": "error", "detail": "no such claim"}))
            .await;
    let base = spawn_app(upstream, UNREACHABLE.into()).await;

    let resp = reqwest::Client::new()
        .post(format!("{base}/api/notarize"))
        .json(&json!({"reportHash": "ff"}))
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status(), 404);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["detail"], "no such claim");
}

#[tokio::test]
async fn test_notarize_unreachable_upstream_returns_envelope() {
    let base = spawn_app(UNREACHABLE.into(), UNREACHABLE.into()).await;

    let resp = reqwest::Client::new()
        .post(format!("{base}/api/notarize"))
        .json(&json!({"reportHash": "ff"}))
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status(), 500);
    let body: RelayFailure = resp.json().await.unwrap();
    assert_eq!(body, RelayFailure::notarize());
}

#[tokio::test]
async fn test_notarize_non_json_upstream_returns_envelope() {
    let app = Router::new().route(
        "/notarize",
        post(|| async { (StatusCode::OK, [("content-type", "text/plain")], "notarized ok") }),
    );
    let upstream = format!("{}/notarize", spawn(app).await);
    let base = spawn_app(upstream, UNREACHABLE.into()).await;

    let resp = reqwest::Client::new()
        .post(format!("{base}/api/notarize"))
        .json(&json!({"reportHash": "ff"}))
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status(), 500);
    let body: RelayFailure = resp.json().await.unwrap();
    assert_eq!(body, RelayFailure::notarize());
}

#[tokio::test]
async fn test_notarize_rejects_malformed_json() {
    let (upstream, seen) = recording_upstream(StatusCode::OK, json!({})).await;
    let base = spawn_app(upstream, UNREACHABLE.into()).await;

    let resp = reqwest::Client::new()
        .post(format!("{base}/api/notarize"))
        .body("{not json")
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status(), 500);
    assert!(seen.lock().unwrap().is_none(), "malformed bodies must not reach upstream");
}

// ─── Accident report summarizer ──────────────────────────────────────────────

#[tokio::test]
async fn test_accident_report_requires_transcription() {
    let base = spawn_app(UNREACHABLE.into(), UNREACHABLE.into()).await;
    let client = reqwest::Client::new();

    for body in [json!({}), json!({"transcription": ""})] {
        let resp = client
            .post(format!("{base}/api/accident-report"))
            .json(&body)
            .send()
            .await
            .unwrap();
        assert_eq!(resp.status(), 400);
        let body: Value = resp.json().await.unwrap();
        assert_eq!(body["error"], MSG_TRANSCRIPTION_REQUIRED);
    }
}

#[tokio::test]
async fn test_accident_report_returns_function_summary() {
    let function = function_stub(json!({
        "statusCode": 200,
        "body": "{\"summary\":\"<reasoning>scratch</reasoning>Minor rear-end collision.\"}"
    }))
    .await;
    let base = spawn_app(UNREACHABLE.into(), function).await;

    let resp = reqwest::Client::new()
        .post(format!("{base}/api/accident-report"))
        .json(&json!({"transcription": "I was rear-ended at a stop light"}))
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status(), 200);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body, json!({"summary": "Minor rear-end collision."}));
}

#[tokio::test]
async fn test_accident_report_function_failure_is_500() {
    let function = function_stub(json!({"statusCode": 502, "body": "\"upstream model error\""})).await;
    let base = spawn_app(UNREACHABLE.into(), function).await;

    let resp = reqwest::Client::new()
        .post(format!("{base}/api/accident-report"))
        .json(&json!({"transcription": "hit a pole"}))
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status(), 500);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["error"], MSG_SUMMARIZER_FAILED);
}

#[tokio::test]
async fn test_accident_report_malformed_body_is_500() {
    let base = spawn_app(UNREACHABLE.into(), UNREACHABLE.into()).await;

    let resp = reqwest::Client::new()
        .post(format!("{base}/api/accident-report"))
        .body("transcription=hello")
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status(), 500);
}

#[tokio::test]
async fn test_accident_report_missing_function_body_is_500() {
    let function = function_stub(json!({"statusCode": 200})).await;
    let base = spawn_app(UNREACHABLE.into(), function).await;

    let resp = reqwest::Client::new()
        .post(format!("{base}/api/accident-report"))
        .json(&json!({"transcription": "hit a pole"}))
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status(), 500);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["error"], MSG_SUMMARIZER_FAILED);
}

#[tokio::test]
async fn test_accident_report_transcription_truthiness() {
    let function = function_stub(json!({"statusCode": 200, "body": "{\"summary\":\"ok\"}"})).await;
    let base = spawn_app(UNREACHABLE.into(), function).await;
    let client = reqwest::Client::new();

    let resp = client
        .post(format!("{base}/api/accident-report"))
        .json(&json!({"transcription": 123}))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);

    for body in [json!([]), json!({"transcription": null}), json!({"transcription": 0})] {
        let resp = client
            .post(format!("{base}/api/accident-report"))
            .json(&body)
            .send()
            .await
            .unwrap();
        assert_eq!(resp.status(), 400, "{body} should be rejected");
    }
}

#[tokio::test]
async fn test_signed_invoker_sends_sigv4_headers() {
    let seen = Arc::new(Mutex::new(None));
    let captured = seen.clone();
    let app = Router::new().route(
        "/invoke",
        post(move |headers: HeaderMap| {
            let captured = captured.clone();
            async move {
                *captured.lock().unwrap() = Some(headers);
                Json(json!({"statusCode": 200, "body": "{\"summary\":\"signed\"}"}))
            }
        }),
    );
    let endpoint = format!("{}/invoke", spawn(app).await);
    let invoker = HttpFunctionInvoker::signed(
        endpoint,
        SigningCredentials {
            access_key_id: "AKIDEXAMPLE".into(),
            secret_access_key: "wJalrXUtnFEMI/K7MDENG+bPxRfiCYEXAMPLEKEY".into(),
            session_token: None,
            region: "ap-southeast-1".into(),
        },
    );
    assert!(invoker.is_signed());
    let summaries = SummaryService::new(Arc::new(invoker), "accident-report-summarizer");

    let summary = summaries
        .summarize(&Value::String("hit a pole".into()))
        .await
        .unwrap();
    assert_eq!(summary, Value::String("signed".into()));

    let headers = seen.lock().unwrap().take().expect("stub saw no request");
    let auth = headers["authorization"].to_str().unwrap();
    assert!(auth.starts_with("AWS4-HMAC-SHA256 Credential=AKIDEXAMPLE/"));
    assert!(auth.contains("/ap-southeast-1/lambda/aws4_request"));
    assert!(headers.contains_key("x-amz-date"));
}
