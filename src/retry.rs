use std::fmt::{Display, Formatter};
use std::future::Future;
use std::time::Duration;
use http::StatusCode;
use crate::error::{Error, Result, Stage};

/// Why a single attempt did not succeed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Failure {
    Status(StatusCode),
    Timeout,
    Transport(String),
}

impl Display for Failure {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Failure::Status(status) => write!(f, "{}", status),
            Failure::Timeout => write!(f, "timed out"),
            Failure::Transport(e) => write!(f, "{}", e),
        }
    }
}

impl From<reqwest::Error> for Failure {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            Failure::Timeout
        } else {
            match e.status() {
                Some(status) => Failure::Status(status),
                None => Failure::Transport(e.without_url().to_string()),
            }
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub backoff: Duration,
}

impl RetryPolicy {
    pub fn immediate(max_attempts: u32) -> Self {
        Self { max_attempts, backoff: Duration::ZERO }
    }

    /// Delay before attempt `attempt + 1`, doubling from `backoff`.
    fn delay_after(&self, attempt: u32) -> Duration {
        let factor = 1u32 << attempt.saturating_sub(1).min(6);
        self.backoff.saturating_mul(factor)
    }
}

/// Runs `call` until it succeeds or `policy.max_attempts` calls have failed.
///
/// `call` receives the 1-based attempt number. Only the last failure is kept
/// to describe the resulting error.
pub async fn with_retries<T, F, Fut>(policy: RetryPolicy, stage: Stage, mut call: F) -> Result<T>
where
    F: FnMut(u32) -> Fut,
    Fut: Future<Output = std::result::Result<T, Failure>>,
{
    let max_attempts = policy.max_attempts.max(1);
    let mut last_failure = None;

    for attempt in 1..=max_attempts {
        debug!("{} - attempt {}/{}", stage, attempt, max_attempts);

        match call(attempt).await {
            Ok(value) => return Ok(value),
            Err(failure) => {
                warn!("{} - attempt {}/{} failed : {}", stage, attempt, max_attempts, failure);
                last_failure = Some(failure);
            }
        }

        if attempt < max_attempts && !policy.backoff.is_zero() {
            tokio::time::sleep(policy.delay_after(attempt)).await;
        }
    }

    error!("{} - giving up after {} attempt(s)", stage, max_attempts);

    match last_failure {
        Some(Failure::Timeout) => Err(Error::UpstreamTimeout { stage, attempts: max_attempts }),
        Some(failure) => Err(Error::UpstreamUnavailable {
            stage,
            attempts: max_attempts,
            last_failure: failure.to_string(),
        }),
        None => Err(Error::UpstreamUnavailable {
            stage,
            attempts: max_attempts,
            last_failure: "no attempt made".to_string(),
        }),
    }
}
