use crate::Result;
use crate::error::Error;
use crate::submission::types::{FeedbackBody, SubmissionFeedback};

/// How much of the grading server's feedback shape is checked after decoding.
///
/// The server documents `0 <= grade <= 1` and always sends a `hint`, but the
/// wire contract does not guarantee either.
#[non_exhaustive]
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum FeedbackPolicy {
    /// Accept whatever decodes. A missing `hint` becomes the empty string.
    #[default]
    Trust,
    /// Reject grades outside `[0, 1]` and responses without a `hint`.
    Strict,
}

impl FeedbackPolicy {
    pub(crate) fn apply(self, body: FeedbackBody) -> Result<SubmissionFeedback> {
        match self {
            FeedbackPolicy::Trust => Ok(SubmissionFeedback {
                grade: body.grade,
                hint: body.hint.unwrap_or_default(),
            }),
            FeedbackPolicy::Strict => {
                if !(0.0..=1.0).contains(&body.grade) {
                    return Err(Error::validation(format!(
                        "grade {} is outside [0, 1]",
                        body.grade
                    )));
                }
                let hint = body
                    .hint
                    .ok_or_else(|| Error::validation("feedback is missing `hint`"))?;

                Ok(SubmissionFeedback {
                    grade: body.grade,
                    hint,
                })
            }
        }
    }
}
