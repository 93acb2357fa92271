use thiserror::Error;

/// Any failure talking to the upstream provider: connection errors,
/// non-2xx statuses and undecodable bodies. Carries the underlying
/// error's message verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{0}")]
pub struct UpstreamError(pub String);

impl From<reqwest::Error> for UpstreamError {
    fn from(err: reqwest::Error) -> Self {
        UpstreamError(err.to_string())
    }
}

