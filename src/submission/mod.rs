//! Answer submission against an activity grading server.
//!
//! The flow is a single round trip:
//! - serialize `{identifier, answer, session}` as JSON
//! - `POST` it to the grading endpoint
//! - decode `{grade, hint}` on success, or surface the server's error text
//!
//! [`GraderClient`] is generic over [`Transport`] so the HTTP layer can be swapped.

mod client;
mod config;
mod policy;
mod transport;
mod types;

pub use client::GraderClient;
pub use config::GraderConfig;
pub use policy::FeedbackPolicy;
pub use transport::{HttpResponse, Transport};
pub use types::{SubmissionFeedback, SubmissionRequest};
