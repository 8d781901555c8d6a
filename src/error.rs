use thiserror::Error;

/// Errors reported when re-checking a claimed solution.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum VerifyError {
    #[error("nonce {nonce} is outside the configured range (max {max})")]
    NonceOutOfRange { nonce: u32, max: u32 },
    #[error("claimed hash does not match the recomputed hash")]
    HashMismatch,
    #[error("hash does not meet target")]
    AboveTarget,
}

/// Errors returned synchronously when a search cannot be started.
///
/// Terminal outcomes of a running search (`Found`, `Exhausted`, `Cancelled`)
/// are not errors and never surface through this type.
#[derive(Debug, Error)]
pub enum Error {
    #[error("invalid target: {0}")]
    InvalidTarget(String),
    #[error("start nonce {start} exceeds max nonce {max}")]
    InvalidNonceRange { start: u32, max: u32 },
    #[error("invalid config: {0}")]
    InvalidConfig(String),
    #[error("failed to spawn mining worker: {0}")]
    Spawn(#[from] std::io::Error),
}
