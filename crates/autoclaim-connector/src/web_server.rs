//! HTTP server for the proxy routes, dashboard JSON and dispatch streams.

use std::sync::Arc;

use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::extract::{Path as AxumPath, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use bytes::Bytes;
use serde::Deserialize;
use tokio::sync::watch;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use autoclaim_protocol::{
    ActionAck, ErrorBody, RelayFailure, Role, StatusChangeRequest, SummarizeRequest,
    SummaryResponse, MSG_SUMMARIZER_FAILED, MSG_TRANSCRIPTION_REQUIRED,
};
use autoclaim_state::{
    DashboardRecord, DashboardView, Fixtures, StateError, TimelinePreset, TimelineSnapshot,
};

use crate::dispatch::DispatchRegistry;
use crate::relay::NotarizeRelay;
use crate::summarizer::SummaryService;

#[derive(Clone)]
pub struct WebState {
    pub fixtures: Arc<Fixtures>,
    pub relay: NotarizeRelay,
    pub summaries: SummaryService,
    pub dispatch: DispatchRegistry,
}

pub struct WebServer {
    bind_addr: String,
    state: WebState,
}

impl WebServer {
    pub fn new(bind_addr: String, state: WebState) -> Self {
        Self { bind_addr, state }
    }

    pub async fn run(self) -> Result<(), anyhow::Error> {
        let listener = tokio::net::TcpListener::bind(&self.bind_addr).await?;
        tracing::info!(
            addr = %listener.local_addr()?,
            notarize = %self.state.relay.upstream(),
            function = %self.state.summaries.function(),
            "AutoClaim API listening"
        );
        axum::serve(listener, router(self.state)).await?;
        Ok(())
    }
}

pub fn router(state: WebState) -> Router {
    Router::new()
        .route("/api/health", get(api_health))
        .route("/api/accident-report", post(api_accident_report))
        .route("/api/notarize", post(api_notarize))
        .route("/api/services", get(api_services))
        .route("/api/claimer/submissions", get(api_submissions))
        .route("/api/claimer/submissions/:id", get(api_submission))
        .route("/api/police/reports", get(api_police_reports))
        .route("/api/police/reports/:id", get(api_police_report))
        .route("/api/police/reports/:id/status", post(api_police_status))
        .route("/api/insurance/claims", get(api_insurance_claims))
        .route("/api/insurance/claims/:id", get(api_insurance_claim))
        .route("/api/insurance/claims/:id/status", post(api_insurance_status))
        .route("/api/dispatch", post(api_dispatch_start))
        .route("/api/dispatch/:token", get(api_dispatch_snapshot))
        .route("/api/dispatch/:token/stream", get(api_dispatch_stream))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn not_found(what: &str, id: &str) -> Response {
    (
        StatusCode::NOT_FOUND,
        Json(ErrorBody::new(format!("{what} '{id}' not found"))),
    )
        .into_response()
}

async fn api_health() -> Json<serde_json::Value> {
    Json(serde_json::json!({"ok": true, "service": "autoclaim"}))
}

// ── Proxy routes ────────────────────────────────────────────────────────────

async fn api_accident_report(State(web): State<WebState>, body: Bytes) -> Response {
    let request = match serde_json::from_slice::<serde_json::Value>(&body) {
        Ok(value) => SummarizeRequest::from_body(&value),
        Err(e) => {
            tracing::error!(error = %e, "Accident report body is not valid JSON");
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorBody::new(MSG_SUMMARIZER_FAILED)),
            )
                .into_response();
        }
    };

    let transcription = match request.require_transcription() {
        Ok(t) => t,
        Err(_) => {
            return (
                StatusCode::BAD_REQUEST,
                Json(ErrorBody::new(MSG_TRANSCRIPTION_REQUIRED)),
            )
                .into_response();
        }
    };

    match web.summaries.summarize(transcription).await {
        Ok(summary) => (StatusCode::OK, Json(SummaryResponse { summary })).into_response(),
        Err(e) => {
            tracing::error!(error = %e, function = %web.summaries.function(), "Summarizer failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorBody::new(MSG_SUMMARIZER_FAILED)),
            )
                .into_response()
        }
    }
}

async fn api_notarize(State(web): State<WebState>, body: Bytes) -> Response {
    let failure = || {
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(RelayFailure::notarize()),
        )
            .into_response()
    };

    match web.relay.forward(body).await {
        Ok(upstream) => match StatusCode::from_u16(upstream.status) {
            Ok(status) => (status, Json(upstream.body)).into_response(),
            Err(e) => {
                tracing::error!(error = %e, "Notarize upstream sent an invalid status");
                failure()
            }
        },
        Err(e) => {
            tracing::error!(error = %e, "Notarize proxy error");
            failure()
        }
    }
}

async fn api_services(State(web): State<WebState>) -> Json<serde_json::Value> {
    Json(serde_json::json!({ "services": web.fixtures.services }))
}

// ── Dashboards ──────────────────────────────────────────────────────────────

async fn api_submissions(State(web): State<WebState>) -> Json<serde_json::Value> {
    Json(serde_json::json!({ "submissions": web.fixtures.submissions }))
}

async fn api_submission(State(web): State<WebState>, AxumPath(id): AxumPath<String>) -> Response {
    match web.fixtures.submission(&id) {
        Some(s) => Json(s.clone()).into_response(),
        None => not_found("submission", &id),
    }
}

async fn api_police_reports(State(web): State<WebState>) -> Json<serde_json::Value> {
    Json(serde_json::json!({ "reports": web.fixtures.police_reports }))
}

async fn api_police_report(State(web): State<WebState>, AxumPath(id): AxumPath<String>) -> Response {
    match web.fixtures.police_report(&id) {
        Some(r) => Json(r.clone()).into_response(),
        None => not_found("report", &id),
    }
}

async fn api_insurance_claims(State(web): State<WebState>) -> Json<serde_json::Value> {
    Json(serde_json::json!({ "claims": web.fixtures.insurance_claims }))
}

async fn api_insurance_claim(State(web): State<WebState>, AxumPath(id): AxumPath<String>) -> Response {
    match web.fixtures.insurance_claim(&id) {
        Some(c) => Json(c.clone()).into_response(),
        None => not_found("claim", &id),
    }
}

async fn api_police_status(
    State(web): State<WebState>,
    AxumPath(id): AxumPath<String>,
    body: Bytes,
) -> Response {
    let req = match decode_status_change(&body) {
        Ok(req) => req,
        Err(resp) => return resp,
    };
    let view = DashboardView::new(web.fixtures.police_reports.clone());
    acknowledge(view, &id, &req.status)
}

async fn api_insurance_status(
    State(web): State<WebState>,
    AxumPath(id): AxumPath<String>,
    body: Bytes,
) -> Response {
    let req = match decode_status_change(&body) {
        Ok(req) => req,
        Err(resp) => return resp,
    };
    let view = DashboardView::new(web.fixtures.insurance_claims.clone());
    acknowledge(view, &id, &req.status)
}

fn decode_status_change(body: &[u8]) -> Result<StatusChangeRequest, Response> {
    serde_json::from_slice(body).map_err(|e| {
        (
            StatusCode::BAD_REQUEST,
            Json(ErrorBody::new(format!("invalid status request: {e}"))),
        )
            .into_response()
    })
}

/// Log a status request against a throwaway view. Fixtures stay untouched.
fn acknowledge<R: DashboardRecord>(mut view: DashboardView<R>, id: &str, status: &str) -> Response {
    match view.request_status_str(id, status) {
        Ok(action) => Json(ActionAck {
            id: action.record_id,
            requested_status: action.requested_status,
            persisted: false,
        })
        .into_response(),
        Err(StateError::UnknownRecord { role, id }) => not_found(role_noun(role), &id),
        Err(e) => (StatusCode::BAD_REQUEST, Json(ErrorBody::new(e.to_string()))).into_response(),
    }
}

fn role_noun(role: Role) -> &'static str {
    match role {
        Role::Claimer => "submission",
        Role::Police => "report",
        Role::Insurance => "claim",
    }
}

// ── Dispatch timelines ──────────────────────────────────────────────────────

#[derive(Debug, Default, Deserialize)]
struct DispatchStartRequest {
    #[serde(default)]
    token: Option<String>,
    #[serde(default)]
    preset: Option<TimelinePreset>,
}

async fn api_dispatch_start(State(web): State<WebState>, body: Bytes) -> Response {
    let req: DispatchStartRequest = if body.is_empty() {
        DispatchStartRequest::default()
    } else {
        match serde_json::from_slice(&body) {
            Ok(req) => req,
            Err(e) => {
                return (StatusCode::BAD_REQUEST, Json(ErrorBody::new(e.to_string())))
                    .into_response()
            }
        }
    };
    let preset = req.preset.unwrap_or(TimelinePreset::Dispatch);
    let ticket = match req.token.filter(|t| !t.trim().is_empty()) {
        Some(token) => web.dispatch.start_with_token(token, preset).await,
        None => web.dispatch.start(preset).await,
    };
    (StatusCode::CREATED, Json(ticket)).into_response()
}

async fn api_dispatch_snapshot(
    State(web): State<WebState>,
    AxumPath(token): AxumPath<String>,
) -> Response {
    match web.dispatch.snapshot(&token).await {
        Some(snapshot) => Json(snapshot).into_response(),
        None => not_found("dispatch", &token),
    }
}

async fn api_dispatch_stream(
    ws: WebSocketUpgrade,
    State(web): State<WebState>,
    AxumPath(token): AxumPath<String>,
) -> Response {
    match web.dispatch.subscribe(&token).await {
        Some(updates) => ws.on_upgrade(move |socket| stream_loop(socket, updates)),
        None => not_found("dispatch", &token),
    }
}

async fn stream_loop(mut socket: WebSocket, mut updates: watch::Receiver<TimelineSnapshot>) {
    loop {
        let payload = {
            let snapshot = updates.borrow_and_update();
            match serde_json::to_string(&*snapshot) {
                Ok(json) => json,
                Err(e) => {
                    tracing::warn!(error = %e, "Failed to encode dispatch snapshot");
                    break;
                }
            }
        };
        if socket.send(Message::Text(payload.into())).await.is_err() {
            break;
        }
        if updates.changed().await.is_err() {
            break;
        }
    }
    let _ = socket.close().await;
}
