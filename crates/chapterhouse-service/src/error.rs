use thiserror::Error;

/// Errors produced by the service layer.
///
/// Orchestration paths that mix several failure sources (event series,
/// alert scanning) report through `anyhow` instead; this enum covers the
/// operations whose callers branch on the failure kind.
#[derive(Error, Debug)]
pub enum ServiceError {
    #[error("Not authenticated")]
    NotAuthenticated,

    #[error("Token error: {0}")]
    TokenError(#[from] jsonwebtoken::errors::Error),

    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    #[error("Invariant violation: {0}")]
    InvariantViolation(&'static str),

    #[error("Push dispatch error: {0}")]
    PushError(#[from] reqwest::Error),
}

pub type ServiceResult<T> = std::result::Result<T, ServiceError>;
