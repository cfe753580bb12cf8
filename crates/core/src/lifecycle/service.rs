//! The transaction state machine.

use super::error::LifecycleError;
use super::types::TransactionStatus;

/// Stateless lifecycle validator.
pub struct LifecycleService;

impl LifecycleService {
    /// Checks whether a status change is allowed.
    ///
    /// Allowed: `Draft -> Posted`, `Draft -> Cancelled`,
    /// `Posted -> Cancelled`.
    ///
    /// # Errors
    ///
    /// Returns `InvalidStateTransition` for every other pair, including
    /// self-transitions.
    pub const fn validate_transition(
        from: TransactionStatus,
        to: TransactionStatus,
    ) -> Result<(), LifecycleError> {
        use TransactionStatus::{Cancelled, Draft, Posted};
        match (from, to) {
            (Draft, Posted) | (Draft | Posted, Cancelled) => Ok(()),
            _ => Err(LifecycleError::InvalidStateTransition { from, to }),
        }
    }

    /// Returns true if the status admits no further transitions.
    #[must_use]
    pub const fn is_terminal(status: TransactionStatus) -> bool {
        matches!(status, TransactionStatus::Cancelled)
    }
}
