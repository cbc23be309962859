use thiserror::Error;

/// Errors surfacing from the core layer.
///
/// The core modules are pure, so the only failure they hand upward is a
/// wiring assumption that did not hold at runtime (missing depot entries
/// and the like). Fallible parsing returns `Option` instead.
#[derive(Error, Debug)]
pub enum CoreError {
    #[error("Invariant violation: {0}")]
    InvariantViolation(&'static str),
}

pub type CoreResult<T> = std::result::Result<T, CoreError>;
