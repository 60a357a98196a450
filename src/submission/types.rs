use bon::Builder;
use secrecy::{ExposeSecret as _, SecretString};
use serde::{Deserialize, Serialize};

/// One answer to one activity, ready to be graded.
///
/// ```
/// use activity_grader_client::submission::SubmissionRequest;
///
/// let request = SubmissionRequest::builder()
///     .identifier("fractions-3")
///     .answer("3/4")
///     .session("c0ffee".to_owned())
///     .build();
/// assert_eq!(request.identifier(), "fractions-3");
/// ```
#[derive(Builder, Clone, Debug)]
pub struct SubmissionRequest {
    #[builder(into)]
    identifier: String,
    #[builder(into)]
    answer: String,
    #[builder(into)]
    session: SecretString,
}

impl SubmissionRequest {
    #[must_use]
    pub fn new(identifier: &str, answer: &str, session: &str) -> Self {
        Self::builder()
            .identifier(identifier)
            .answer(answer)
            .session(session.to_owned())
            .build()
    }

    #[must_use]
    pub fn identifier(&self) -> &str {
        &self.identifier
    }

    #[must_use]
    pub fn answer(&self) -> &str {
        &self.answer
    }

    #[must_use]
    pub fn session(&self) -> &SecretString {
        &self.session
    }

    pub(crate) fn body(&self) -> SubmissionBody<'_> {
        SubmissionBody {
            identifier: &self.identifier,
            answer: &self.answer,
            session: self.session.expose_secret(),
        }
    }
}

/// JSON body sent to the grading server.
#[derive(Debug, Serialize)]
pub(crate) struct SubmissionBody<'req> {
    pub identifier: &'req str,
    pub answer: &'req str,
    pub session: &'req str,
}

/// The grading server's verdict on a submission.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct SubmissionFeedback {
    /// Evaluation of the answer, documented as `0.0 <= grade <= 1.0`.
    pub grade: f64,
    /// Hint for the submitted answer; empty when there is none.
    pub hint: String,
}

impl SubmissionFeedback {
    #[must_use]
    pub fn new<S: Into<String>>(grade: f64, hint: S) -> Self {
        Self {
            grade,
            hint: hint.into(),
        }
    }

    #[must_use]
    pub fn has_hint(&self) -> bool {
        !self.hint.is_empty()
    }

    #[must_use]
    pub fn is_full_credit(&self) -> bool {
        self.grade >= 1.0
    }
}

/// Feedback exactly as decoded, before a [`FeedbackPolicy`](super::FeedbackPolicy) runs.
#[derive(Debug, Deserialize)]
pub(crate) struct FeedbackBody {
    pub grade: f64,
    #[serde(default)]
    pub hint: Option<String>,
}
