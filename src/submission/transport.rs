use async_trait::async_trait;
use reqwest::header::{CONTENT_TYPE, HeaderValue};
use reqwest::{Client as ReqwestClient, StatusCode};
use url::Url;

use crate::Result;

/// Status and raw body of a grading server response.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HttpResponse {
    /// HTTP status line code.
    pub status: StatusCode,
    /// Raw response body, not yet decoded.
    pub body: Vec<u8>,
}

impl HttpResponse {
    #[must_use]
    pub fn new<B: Into<Vec<u8>>>(status: StatusCode, body: B) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    /// Body decoded as text, replacing invalid UTF-8.
    #[must_use]
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }
}

/// The HTTP capability a [`GraderClient`](super::GraderClient) submits through.
///
/// Implementations send exactly one `POST` with `Content-Type: application/json`
/// and report the response as-is, whatever its status. Errors are reserved for
/// requests that got no response at all.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn post_json(&self, url: &Url, body: Vec<u8>) -> Result<HttpResponse>;
}

#[async_trait]
impl Transport for ReqwestClient {
    async fn post_json(&self, url: &Url, body: Vec<u8>) -> Result<HttpResponse> {
        let response = self
            .post(url.clone())
            .header(CONTENT_TYPE, HeaderValue::from_static("application/json"))
            .body(body)
            .send()
            .await?;

        let status = response.status();
        let body = response.bytes().await?;

        Ok(HttpResponse::new(status, body.to_vec()))
    }
}
