//! Accident report summarization.
//!
//! Two paths reach the summarizer model:
//!
//! - [`SummaryService`] backs `POST /api/accident-report`. It wraps the
//!   transcription in a [`FunctionEvent`] and hands it to a
//!   [`FunctionInvoker`], then decodes the function's JSON-encoded body.
//! - [`SummarizeClient`] is used by the guided report to call the public
//!   summarize gateway directly.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::time::SystemTime;

use aws_credential_types::Credentials;
use aws_sigv4::http_request::{sign, SignableBody, SignableRequest, SigningParams, SigningSettings};
use aws_sigv4::sign::v4;
use aws_smithy_runtime_api::client::identity::Identity;
use reqwest::header::{ACCEPT, CONTENT_TYPE};
use serde_json::Value;
use thiserror::Error;

use autoclaim_protocol::{FunctionEvent, FunctionResult, ProtocolError, SummarizeRequest};

use crate::config::FunctionConfig;

/// Service name in the SigV4 credential scope of function invocations.
const LAMBDA_SIGNING_NAME: &str = "lambda";

/// Set by the invoke API when the function itself threw.
const FUNCTION_ERROR_HEADER: &str = "x-amz-function-error";

#[derive(Debug, Error)]
pub enum SummarizerError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("server returned {status}: {body}")]
    Server { status: u16, body: String },
    #[error("function {function} reported status {status}")]
    FunctionFailed { function: String, status: u16 },
    #[error("function {function} raised {kind}")]
    FunctionError { function: String, kind: String },
    #[error("request signing failed: {0}")]
    Signing(String),
    #[error(transparent)]
    Protocol(#[from] ProtocolError),
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Boxed future returned by [`FunctionInvoker::invoke`].
pub type InvokeFuture<'a> =
    Pin<Box<dyn Future<Output = Result<FunctionResult, SummarizerError>> + Send + 'a>>;

/// Runs a named serverless function with a JSON event.
pub trait FunctionInvoker: Send + Sync {
    fn invoke<'a>(&'a self, function: &'a str, event: &'a FunctionEvent) -> InvokeFuture<'a>;
}

/// Static AWS credentials for signing invocations.
#[derive(Clone)]
pub struct SigningCredentials {
    pub access_key_id: String,
    pub secret_access_key: String,
    pub session_token: Option<String>,
    pub region: String,
}

impl std::fmt::Debug for SigningCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SigningCredentials")
            .field("access_key_id", &self.access_key_id)
            .field("region", &self.region)
            .finish_non_exhaustive()
    }
}

/// SigV4 headers for a JSON POST of `payload` to `url` at time `at`.
pub fn sign_invocation(
    credentials: &SigningCredentials,
    url: &str,
    payload: &[u8],
    at: SystemTime,
) -> Result<Vec<(String, String)>, SummarizerError> {
    let identity: Identity = Credentials::new(
        credentials.access_key_id.clone(),
        credentials.secret_access_key.clone(),
        credentials.session_token.clone(),
        None,
        "autoclaim-config",
    )
    .into();
    let params: SigningParams = v4::SigningParams::builder()
        .identity(&identity)
        .region(&credentials.region)
        .name(LAMBDA_SIGNING_NAME)
        .time(at)
        .settings(SigningSettings::default())
        .build()
        .map_err(|e| SummarizerError::Signing(e.to_string()))?
        .into();
    let request = SignableRequest::new(
        "POST",
        url,
        [("content-type", "application/json")].into_iter(),
        SignableBody::Bytes(payload),
    )
    .map_err(|e| SummarizerError::Signing(e.to_string()))?;
    let (instructions, _signature) = sign(request, &params)
        .map_err(|e| SummarizerError::Signing(e.to_string()))?
        .into_parts();
    Ok(instructions
        .headers()
        .map(|(name, value)| (name.to_string(), value.to_string()))
        .collect())
}

/// Invokes a function by POSTing its event to the invoke endpoint and
/// reading back the function's return value. Requests are SigV4-signed
/// when credentials are configured.
pub struct HttpFunctionInvoker {
    client: reqwest::Client,
    endpoint: String,
    credentials: Option<SigningCredentials>,
}

impl HttpFunctionInvoker {
    /// Unsigned invoker, for function URLs and local endpoints.
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            endpoint: endpoint.into(),
            credentials: None,
        }
    }

    pub fn signed(endpoint: impl Into<String>, credentials: SigningCredentials) -> Self {
        Self {
            credentials: Some(credentials),
            ..Self::new(endpoint)
        }
    }

    pub fn from_config(config: &FunctionConfig) -> Self {
        match (&config.access_key_id, &config.secret_access_key) {
            (Some(key), Some(secret)) => Self::signed(
                config.endpoint(),
                SigningCredentials {
                    access_key_id: key.clone(),
                    secret_access_key: secret.clone(),
                    session_token: config.session_token.clone(),
                    region: config.region.clone(),
                },
            ),
            _ => {
                tracing::warn!(
                    function = %config.name,
                    "No function credentials configured; invoking unsigned"
                );
                Self::new(config.endpoint())
            }
        }
    }

    pub fn is_signed(&self) -> bool {
        self.credentials.is_some()
    }
}

impl FunctionInvoker for HttpFunctionInvoker {
    fn invoke<'a>(&'a self, function: &'a str, event: &'a FunctionEvent) -> InvokeFuture<'a> {
        Box::pin(async move {
            tracing::debug!(function, endpoint = %self.endpoint, signed = self.is_signed(), "Invoking function");
            let payload = serde_json::to_vec(event)?;
            let mut req = self
                .client
                .post(&self.endpoint)
                .header(ACCEPT, "application/json")
                .header(CONTENT_TYPE, "application/json");
            if let Some(credentials) = &self.credentials {
                for (name, value) in
                    sign_invocation(credentials, &self.endpoint, &payload, SystemTime::now())?
                {
                    req = req.header(name, value);
                }
            }
            let resp = req.body(payload).send().await?;

            let status = resp.status();
            if !status.is_success() {
                let body = resp.text().await.unwrap_or_default();
                return Err(SummarizerError::Server {
                    status: status.as_u16(),
                    body,
                });
            }
            if let Some(kind) = resp.headers().get(FUNCTION_ERROR_HEADER) {
                return Err(SummarizerError::FunctionError {
                    function: function.to_string(),
                    kind: kind.to_str().unwrap_or("Unhandled").to_string(),
                });
            }
            Ok(resp.json::<FunctionResult>().await?)
        })
    }
}

/// Server-side summarization through a named function.
#[derive(Clone)]
pub struct SummaryService {
    invoker: Arc<dyn FunctionInvoker>,
    function: String,
}

impl SummaryService {
    pub fn new(invoker: Arc<dyn FunctionInvoker>, function: impl Into<String>) -> Self {
        Self {
            invoker,
            function: function.into(),
        }
    }

    pub fn function(&self) -> &str {
        &self.function
    }

    /// Summarize a transcription. The caller validates it is non-empty.
    pub async fn summarize(&self, transcription: &Value) -> Result<Value, SummarizerError> {
        let event = FunctionEvent::for_transcription(transcription)?;
        let result = self.invoker.invoke(&self.function, &event).await?;
        if let Some(status) = result.status_code.filter(|s| *s >= 400) {
            return Err(SummarizerError::FunctionFailed {
                function: self.function.clone(),
                status,
            });
        }
        Ok(result.decode_summary()?)
    }
}

/// Direct client for the public summarize gateway.
pub struct SummarizeClient {
    client: reqwest::Client,
    url: String,
}

impl SummarizeClient {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            url: url.into(),
        }
    }

    /// POST `{transcription}` and return the decoded JSON response.
    pub async fn summarize(&self, request: &SummarizeRequest) -> Result<Value, SummarizerError> {
        tracing::info!(url = %self.url, "Requesting AI summary");
        let resp = self
            .client
            .post(&self.url)
            .header(CONTENT_TYPE, "application/json")
            .json(request)
            .send()
            .await?;
        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(SummarizerError::Server {
                status: status.as_u16(),
                body,
            });
        }
        Ok(resp.json().await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Canned(FunctionResult);

    impl FunctionInvoker for Canned {
        fn invoke<'a>(&'a self, function: &'a str, event: &'a FunctionEvent) -> InvokeFuture<'a> {
            assert_eq!(function, "accident-report-summarizer");
            assert!(event.body.contains("transcription"));
            let result = self.0.clone();
            Box::pin(async move { Ok(result) })
        }
    }

    fn service(status_code: Option<u16>, body: &str) -> SummaryService {
        SummaryService::new(
            Arc::new(Canned(FunctionResult {
                status_code,
                body: Some(body.into()),
            })),
            "accident-report-summarizer",
        )
    }

    #[tokio::test]
    async fn summary_is_decoded_from_body() {
        let summary = service(Some(200), r#""Rear-end collision.""#)
            .summarize(&Value::String("test".into()))
            .await
            .unwrap();
        assert_eq!(summary, Value::String("Rear-end collision.".into()));
    }

    #[tokio::test]
    async fn function_error_status_fails() {
        let err = service(Some(500), r#"{"detail":"boom"}"#)
            .summarize(&Value::String("test".into()))
            .await
            .unwrap_err();
        assert!(matches!(err, SummarizerError::FunctionFailed { status: 500, .. }));
    }

    fn credentials(session_token: Option<&str>) -> SigningCredentials {
        SigningCredentials {
            access_key_id: "AKIDEXAMPLE".into(),
            secret_access_key: "wJalrXUtnFEMI/K7MDENG+bPxRfiCYEXAMPLEKEY".into(),
            session_token: session_token.map(Into::into),
            region: "us-east-1".into(),
        }
    }

    fn header<'a>(headers: &'a [(String, String)], name: &str) -> Option<&'a str> {
        headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    #[test]
    fn invocation_is_signed_for_lambda_scope() {
        // 2015-08-30T12:36:00Z
        let at = SystemTime::UNIX_EPOCH + std::time::Duration::from_secs(1_440_938_160);
        let headers = sign_invocation(
            &credentials(None),
            "https://lambda.us-east-1.amazonaws.com/2015-03-31/functions/accident-report-summarizer/invocations",
            br#"{"body":"{}"}"#,
            at,
        )
        .unwrap();

        assert_eq!(header(&headers, "x-amz-date"), Some("20150830T123600Z"));
        let auth = header(&headers, "authorization").unwrap();
        assert!(auth.starts_with(
            "AWS4-HMAC-SHA256 Credential=AKIDEXAMPLE/20150830/us-east-1/lambda/aws4_request"
        ));
        assert!(auth.contains("Signature="));
        assert!(header(&headers, "x-amz-security-token").is_none());
    }

    #[test]
    fn session_token_is_sent() {
        let headers = sign_invocation(
            &credentials(Some("FQoGZXIvYXdzEXAMPLE")),
            "http://127.0.0.1:9001/invoke",
            b"{}",
            SystemTime::now(),
        )
        .unwrap();
        assert_eq!(header(&headers, "x-amz-security-token"), Some("FQoGZXIvYXdzEXAMPLE"));
    }

    #[test]
    fn config_with_keys_builds_signed_invoker() {
        let mut config = FunctionConfig::default();
        assert!(!HttpFunctionInvoker::from_config(&config).is_signed());
        config.access_key_id = Some("AKIDEXAMPLE".into());
        config.secret_access_key = Some("secret".into());
        assert!(HttpFunctionInvoker::from_config(&config).is_signed());
    }
}
