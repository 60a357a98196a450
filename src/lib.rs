#![cfg_attr(doc, doc = include_str!("../README.md"))]

pub mod error;
pub mod submission;

pub use error::{Error, Kind as ErrorKind};
pub use submission::{
    FeedbackPolicy, GraderClient, GraderConfig, SubmissionFeedback, SubmissionRequest,
};

pub type Result<T> = std::result::Result<T, Error>;

/// Submits `answer` for the activity `identifier` to the grader at `endpoint_url`.
///
/// Uses a default `reqwest` client with no timeout and [`FeedbackPolicy::Trust`].
/// Build a [`GraderClient`] to reuse connections or change either.
pub async fn submit(
    endpoint_url: &str,
    identifier: &str,
    answer: &str,
    session: &str,
) -> Result<SubmissionFeedback> {
    let config = GraderConfig::from_raw(endpoint_url, FeedbackPolicy::Trust)?;
    let request = SubmissionRequest::new(identifier, answer, session);

    GraderClient::new(config)?.submit(&request).await
}
