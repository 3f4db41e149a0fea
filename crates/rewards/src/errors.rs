use kestrel_types::AccountId;
use thiserror::Error;

/// Failures surfaced by the reward operations.
///
/// Every failure aborts the whole operation; precondition violations leave
/// no state change behind, and retries are the caller's concern.
#[derive(Debug, Error)]
pub enum RewardsError {
    #[error("caller is not authorized as {0}")]
    Unauthorized(AccountId),

    #[error("producer {0} does not have an active key")]
    ProducerInactive(AccountId),

    #[error("already claimed rewards within past day")]
    AlreadyClaimed,

    #[error("no producer record found for {0}")]
    ProducerNotFound(AccountId),

    #[error("token ledger call failed: {0}")]
    Ledger(String),
}

impl From<anyhow::Error> for RewardsError {
    fn from(err: anyhow::Error) -> Self {
        Self::Ledger(err.to_string())
    }
}
