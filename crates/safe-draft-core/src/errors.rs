use thiserror::Error;

/// Log target shared by the whole workspace.
pub const LOG_TARGET: &str = "safe_draft";

#[derive(Debug, Error)]
pub enum PortError {
    #[error("port not implemented: {0}")]
    NotImplemented(&'static str),
    #[error("transport error: {0}")]
    Transport(String),
    #[error("validation error: {0}")]
    Validation(String),
}

/// Last error encountered while rebuilding or estimating a draft.
///
/// Transient: cleared by the coordinator before the next rebuild attempt.
/// None of these are fatal; the previous valid draft is always retained.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DraftError {
    #[error("transaction could not be built: {0}")]
    Construction(String),
    #[error("gas estimate unavailable: {0}")]
    Estimation(String),
}

impl DraftError {
    pub fn code(&self) -> ErrorCode {
        match self {
            DraftError::Construction(_) => ErrorCode::CreateTx,
            DraftError::Estimation(_) => ErrorCode::EstimateGas,
        }
    }
}

/// Stable numeric error codes, so log lines can be correlated across
/// deployments without parsing message text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    CreateTx,
    EstimateGas,
    Migration,
}

impl ErrorCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::CreateTx => "103",
            ErrorCode::EstimateGas => "612",
            ErrorCode::Migration => "107",
        }
    }
}

/// Fire-and-forget error sink. Every occurrence is logged, including repeats
/// of an identical error; deduplication is deliberately not performed.
pub fn log_error(code: ErrorCode, detail: &str) {
    tracing::error!(target: LOG_TARGET, code = code.as_str(), "{detail}");
}
