//! Events that trigger transaction state transitions

use super::machine::Outcome;

/// Events that can trigger state transitions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TransactionEvent {
    /// Exclusivity lock acquired
    LockAcquired,
    /// Stale bytes drained; command is about to go out
    CommandDispatched,
    /// Response terminated (or timed out)
    ResponseComplete(Outcome),
    /// Lock released, on any exit path
    Released,
}
