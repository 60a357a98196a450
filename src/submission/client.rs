use reqwest::Client as ReqwestClient;
use url::Url;

use crate::Result;
use crate::error::{Error, Kind as ErrorKind};
use crate::submission::transport::{HttpResponse, Transport};
use crate::submission::types::FeedbackBody;
use crate::submission::{FeedbackPolicy, GraderConfig, SubmissionFeedback, SubmissionRequest};

/// Client for a single grading endpoint.
///
/// Every [`submit`](GraderClient::submit) is one independent `POST`; nothing is
/// shared between calls apart from the transport's connection pool.
#[derive(Clone, Debug)]
pub struct GraderClient<T = ReqwestClient> {
    endpoint: Url,
    policy: FeedbackPolicy,
    transport: T,
}

impl GraderClient {
    /// Creates a client backed by a fresh `reqwest` client.
    pub fn new(config: GraderConfig) -> Result<Self> {
        let mut builder = ReqwestClient::builder();
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }

        Ok(Self::with_transport(config, builder.build()?))
    }
}

impl<T: Transport> GraderClient<T> {
    /// Creates a client that submits through a caller-supplied transport.
    pub fn with_transport(config: GraderConfig, transport: T) -> Self {
        Self {
            endpoint: config.endpoint,
            policy: config.policy,
            transport,
        }
    }

    #[must_use]
    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    #[must_use]
    pub fn policy(&self) -> FeedbackPolicy {
        self.policy
    }

    /// Submits one answer and returns the server's feedback.
    ///
    /// A non-success status fails with [`ErrorKind::Status`] carrying the
    /// response body as its message.
    pub async fn submit(&self, request: &SubmissionRequest) -> Result<SubmissionFeedback> {
        let body = serde_json::to_vec(&request.body())
            .map_err(|e| Error::with_source(ErrorKind::Internal, e))?;

        #[cfg(feature = "tracing")]
        tracing::debug!(
            endpoint = %self.endpoint,
            identifier = request.identifier(),
            "submitting answer for grading"
        );

        let response = self.transport.post_json(&self.endpoint, body).await?;

        into_feedback(response, self.policy)
    }
}

fn into_feedback(response: HttpResponse, policy: FeedbackPolicy) -> Result<SubmissionFeedback> {
    if !response.status.is_success() {
        let message = response.text();

        #[cfg(feature = "tracing")]
        tracing::warn!(
            status = %response.status,
            message = %message,
            "grading server rejected submission"
        );

        return Err(Error::status(response.status, message));
    }

    policy.apply(decode(&response.body)?)
}

#[cfg(feature = "tracing")]
fn decode(body: &[u8]) -> Result<FeedbackBody> {
    let mut de = serde_json::Deserializer::from_slice(body);
    let mut on_ignored = |path: serde_ignored::Path<'_>| {
        tracing::warn!(%path, "ignoring unknown field in grading feedback");
    };
    let feedback = serde_path_to_error::deserialize(serde_ignored::Deserializer::new(
        &mut de,
        &mut on_ignored,
    ))?;
    de.end()?;

    Ok(feedback)
}

#[cfg(not(feature = "tracing"))]
fn decode(body: &[u8]) -> Result<FeedbackBody> {
    Ok(serde_json::from_slice(body)?)
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use async_trait::async_trait;
    use reqwest::StatusCode;

    use super::*;

    /// Answers every request with the same canned response and records bodies.
    #[derive(Debug)]
    struct Scripted {
        status: StatusCode,
        body: &'static str,
        seen: Mutex<Vec<(Url, serde_json::Value)>>,
    }

    impl Scripted {
        fn new(status: StatusCode, body: &'static str) -> Self {
            Self {
                status,
                body,
                seen: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl Transport for Scripted {
        async fn post_json(&self, url: &Url, body: Vec<u8>) -> Result<HttpResponse> {
            let value = serde_json::from_slice(&body)?;
            self.seen
                .lock()
                .expect("poisoned")
                .push((url.clone(), value));
            Ok(HttpResponse::new(self.status, self.body))
        }
    }

    /// Never reaches a server.
    #[derive(Debug)]
    struct Unreachable;

    #[async_trait]
    impl Transport for Unreachable {
        async fn post_json(&self, _url: &Url, _body: Vec<u8>) -> Result<HttpResponse> {
            Err(Error::with_source(
                ErrorKind::Transport,
                std::io::Error::from(std::io::ErrorKind::ConnectionRefused),
            ))
        }
    }

    fn client<T: Transport>(policy: FeedbackPolicy, transport: T) -> GraderClient<T> {
        let config = GraderConfig::from_raw("http://grader.test/submissions", policy)
            .expect("valid endpoint");
        GraderClient::with_transport(config, transport)
    }

    fn request() -> SubmissionRequest {
        SubmissionRequest::new("derivatives-2", "2x + 1", "session-9")
    }

    #[tokio::test]
    async fn decodes_success_body() -> anyhow::Result<()> {
        let client = client(
            FeedbackPolicy::Trust,
            Scripted::new(StatusCode::OK, r#"{"grade":0.75,"hint":"check your signs"}"#),
        );

        let feedback = client.submit(&request()).await?;

        assert_eq!(feedback, SubmissionFeedback::new(0.75, "check your signs"));
        Ok(())
    }

    #[tokio::test]
    async fn posts_request_fields_unmodified() -> anyhow::Result<()> {
        let client = client(
            FeedbackPolicy::Trust,
            Scripted::new(StatusCode::OK, r#"{"grade":1,"hint":""}"#),
        );

        client.submit(&request()).await?;

        let seen = client.transport.seen.lock().expect("poisoned");
        assert_eq!(seen.len(), 1, "exactly one request per submit");
        let (url, body) = &seen[0];
        assert_eq!(url.as_str(), "http://grader.test/submissions");
        assert_eq!(
            body,
            &serde_json::json!({
                "identifier": "derivatives-2",
                "answer": "2x + 1",
                "session": "session-9",
            })
        );
        Ok(())
    }

    #[tokio::test]
    async fn non_success_status_uses_body_as_message() {
        let client = client(
            FeedbackPolicy::Trust,
            Scripted::new(StatusCode::NOT_FOUND, "Invalid activity identifier"),
        );

        let err = client.submit(&request()).await.expect_err("404 must fail");

        assert_eq!(err.kind(), ErrorKind::Status);
        assert_eq!(err.to_string(), "Invalid activity identifier");
    }

    #[tokio::test]
    async fn success_with_bad_json_is_decode_error() {
        let client = client(FeedbackPolicy::Trust, Scripted::new(StatusCode::OK, "not json"));

        let err = client.submit(&request()).await.expect_err("body is not json");

        assert_eq!(err.kind(), ErrorKind::Decode);
    }

    #[tokio::test]
    async fn trailing_garbage_is_decode_error() {
        let client = client(
            FeedbackPolicy::Trust,
            Scripted::new(StatusCode::OK, r#"{"grade":1,"hint":""} extra"#),
        );

        let err = client.submit(&request()).await.expect_err("trailing data");

        assert_eq!(err.kind(), ErrorKind::Decode);
    }

    #[tokio::test]
    async fn unknown_fields_are_ignored() -> anyhow::Result<()> {
        let client = client(
            FeedbackPolicy::Strict,
            Scripted::new(StatusCode::OK, r#"{"grade":0.5,"hint":"h","extra":1}"#),
        );

        let feedback = client.submit(&request()).await?;

        assert_eq!(feedback, SubmissionFeedback::new(0.5, "h"));
        Ok(())
    }

    #[tokio::test]
    async fn null_hint_is_empty_under_trust() -> anyhow::Result<()> {
        let client = client(
            FeedbackPolicy::Trust,
            Scripted::new(StatusCode::OK, r#"{"grade":0,"hint":null}"#),
        );

        let feedback = client.submit(&request()).await?;

        assert_eq!(feedback, SubmissionFeedback::new(0.0, ""));
        Ok(())
    }

    #[tokio::test]
    async fn null_hint_is_missing_under_strict() {
        let client = client(
            FeedbackPolicy::Strict,
            Scripted::new(StatusCode::OK, r#"{"grade":0,"hint":null}"#),
        );

        let err = client.submit(&request()).await.expect_err("hint is null");

        assert_eq!(err.kind(), ErrorKind::Validation);
    }

    #[tokio::test]
    async fn decode_error_display_is_the_json_error() {
        let client = client(
            FeedbackPolicy::Trust,
            Scripted::new(StatusCode::OK, r#"{"grade":"0.5","hint":""}"#),
        );

        let err = client.submit(&request()).await.expect_err("grade is a string");

        assert_eq!(err.kind(), ErrorKind::Decode);
        assert!(!err.to_string().starts_with("Decode"), "no kind prefix: {err}");
        assert!(err.to_string().contains("invalid type"), "json error text: {err}");
    }

    #[cfg(feature = "tracing")]
    #[tokio::test]
    async fn decode_error_reports_field_path() {
        let client = client(
            FeedbackPolicy::Trust,
            Scripted::new(StatusCode::OK, r#"{"grade":"0.5","hint":""}"#),
        );

        let err = client.submit(&request()).await.expect_err("grade is a string");

        assert_eq!(err.kind(), ErrorKind::Decode);
        let source = err
            .downcast_ref::<serde_path_to_error::Error<serde_json::Error>>()
            .expect("path-aware decode error");
        assert_eq!(source.path().to_string(), "grade");
    }

    #[cfg(feature = "tracing")]
    #[test]
    fn decode_tolerates_unknown_fields() -> anyhow::Result<()> {
        let body = decode(br#"{"grade":1,"extra":{"nested":true},"hint":"h"}"#)?;

        assert!((body.grade - 1.0).abs() < f64::EPSILON, "grade {}", body.grade);
        assert_eq!(body.hint.as_deref(), Some("h"));
        Ok(())
    }

    #[tokio::test]
    async fn strict_policy_runs_after_decode() {
        let client = client(
            FeedbackPolicy::Strict,
            Scripted::new(StatusCode::OK, r#"{"grade":1.5,"hint":""}"#),
        );

        let err = client.submit(&request()).await.expect_err("grade out of range");

        assert_eq!(err.kind(), ErrorKind::Validation);
    }

    #[tokio::test]
    async fn transport_errors_pass_through() {
        let client = client(FeedbackPolicy::Trust, Unreachable);

        let err = client.submit(&request()).await.expect_err("no server");

        assert_eq!(err.kind(), ErrorKind::Transport);
        assert_eq!(
            err.downcast_ref::<std::io::Error>().map(std::io::Error::kind),
            Some(std::io::ErrorKind::ConnectionRefused)
        );
    }
}
