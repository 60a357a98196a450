use std::time::Duration;

use url::Url;

use crate::Result;
use crate::error::Error;
use crate::submission::policy::FeedbackPolicy;

/// Grading endpoint configuration.
#[derive(Clone, Debug)]
pub struct GraderConfig {
    pub endpoint: Url,
    /// Whole-request timeout. `None` leaves the transport's default in place.
    pub timeout: Option<Duration>,
    pub policy: FeedbackPolicy,
}

impl GraderConfig {
    pub fn from_raw(endpoint: &str, policy: FeedbackPolicy) -> Result<Self> {
        let endpoint = Url::parse(endpoint)?;

        Self::new(endpoint, None, policy)
    }

    pub fn new(endpoint: Url, timeout: Option<Duration>, policy: FeedbackPolicy) -> Result<Self> {
        if !matches!(endpoint.scheme(), "http" | "https") {
            return Err(Error::validation(format!(
                "grading endpoint must be http or https, got scheme `{}`",
                endpoint.scheme()
            )));
        }
        if timeout.is_some_and(|timeout| timeout.is_zero()) {
            return Err(Error::validation("timeout must be greater than zero"));
        }

        Ok(Self {
            endpoint,
            timeout,
            policy,
        })
    }

    /// Sets the request timeout, keeping the rest of the configuration.
    pub fn with_timeout(self, timeout: Duration) -> Result<Self> {
        Self::new(self.endpoint, Some(timeout), self.policy)
    }
}
