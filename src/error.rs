use std::fmt::{Display, Formatter};
use crate::timestep::TimeStepError;

pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Which of the two upstream calls a failure belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Capabilities,
    Observations,
}

impl Display for Stage {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Stage::Capabilities => write!(f, "capabilities"),
            Stage::Observations => write!(f, "observations"),
        }
    }
}

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("Upstream {stage} unavailable after {attempts} attempt(s): {last_failure}")]
    UpstreamUnavailable {
        stage: Stage,
        attempts: u32,
        last_failure: String,
    },

    #[error("Upstream {stage} timed out after {attempts} attempt(s)")]
    UpstreamTimeout {
        stage: Stage,
        attempts: u32,
    },

    #[error("Malformed upstream response: {0}")]
    MalformedUpstream(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("TimeStepError: {0}")]
    TimeStepError(#[from] TimeStepError),

    #[error("ConfyError: {0}")]
    ConfyError(#[from] confy::ConfyError),
}

impl Error {
    /// Whether the upstream side is to blame, as opposed to this process.
    pub fn is_upstream(&self) -> bool {
        matches!(
            self,
            Error::UpstreamUnavailable { .. }
                | Error::UpstreamTimeout { .. }
                | Error::MalformedUpstream(_)
                | Error::TimeStepError(_)
        )
    }
}
