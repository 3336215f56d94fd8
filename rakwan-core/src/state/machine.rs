//! State machine definition
//!
//! Lifecycle: `Idle → Locked → AwaitingResponse → Completed(_) → Idle`.
//! `Released` returns to `Idle` from every state, so a failure at any
//! step after the lock is taken still ends idle.

use super::events::TransactionEvent;

/// How a response wait ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Outcome {
    /// `OK` line received
    Success,
    /// Cumulative timeout elapsed
    Timeout,
    /// `ERROR` received
    ProtocolError,
}

/// Transaction states
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TransactionState {
    /// No transaction; lock free
    #[default]
    Idle,
    /// Lock held, command not yet sent
    Locked,
    /// Command sent, accumulating response bytes
    AwaitingResponse,
    /// Response classified, lock still held
    Completed(Outcome),
}

impl TransactionState {
    /// Check if a transaction holds the lock
    pub fn is_locked(&self) -> bool {
        !matches!(self, TransactionState::Idle)
    }

    /// Check if inbound bytes belong to a transaction
    pub fn is_awaiting_response(&self) -> bool {
        matches!(self, TransactionState::AwaitingResponse)
    }

    /// Outcome, once completed
    pub fn outcome(&self) -> Option<Outcome> {
        match self {
            TransactionState::Completed(outcome) => Some(*outcome),
            _ => None,
        }
    }

    /// Process an event and return the next state
    pub fn transition(self, event: TransactionEvent) -> Self {
        use TransactionEvent::*;
        use TransactionState::*;

        match (self, event) {
            (Idle, LockAcquired) => Locked,
            (Locked, CommandDispatched) => AwaitingResponse,
            (AwaitingResponse, ResponseComplete(outcome)) => Completed(outcome),

            // Release always ends the run
            (_, Released) => Idle,

            // Default: stay in current state
            _ => self,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_full_lifecycle() {
        let state = TransactionState::Idle;

        let locked = state.transition(TransactionEvent::LockAcquired);
        assert_eq!(locked, TransactionState::Locked);
        assert!(locked.is_locked());
        assert!(!locked.is_awaiting_response());

        let awaiting = locked.transition(TransactionEvent::CommandDispatched);
        assert_eq!(awaiting, TransactionState::AwaitingResponse);
        assert!(awaiting.is_awaiting_response());

        let done = awaiting.transition(TransactionEvent::ResponseComplete(Outcome::Success));
        assert_eq!(done, TransactionState::Completed(Outcome::Success));
        assert_eq!(done.outcome(), Some(Outcome::Success));

        let idle = done.transition(TransactionEvent::Released);
        assert_eq!(idle, TransactionState::Idle);
        assert!(!idle.is_locked());
    }

    #[test]
    fn test_release_from_any_state() {
        let states = [
            TransactionState::Idle,
            TransactionState::Locked,
            TransactionState::AwaitingResponse,
            TransactionState::Completed(Outcome::Timeout),
        ];

        for state in states {
            assert_eq!(
                state.transition(TransactionEvent::Released),
                TransactionState::Idle
            );
        }
    }

    #[test]
    fn test_out_of_order_events_ignored() {
        // Response without a dispatched command
        let locked = TransactionState::Locked;
        assert_eq!(
            locked.transition(TransactionEvent::ResponseComplete(Outcome::Success)),
            locked
        );

        // Second completion does not overwrite the first
        let done = TransactionState::Completed(Outcome::ProtocolError);
        assert_eq!(
            done.transition(TransactionEvent::ResponseComplete(Outcome::Success)),
            done
        );

        // Nested lock is not a transition
        assert_eq!(
            locked.transition(TransactionEvent::LockAcquired),
            locked
        );
    }

    fn any_outcome() -> impl Strategy<Value = Outcome> {
        prop_oneof![
            Just(Outcome::Success),
            Just(Outcome::Timeout),
            Just(Outcome::ProtocolError),
        ]
    }

    fn any_event() -> impl Strategy<Value = TransactionEvent> {
        prop_oneof![
            Just(TransactionEvent::LockAcquired),
            Just(TransactionEvent::CommandDispatched),
            any_outcome().prop_map(TransactionEvent::ResponseComplete),
            Just(TransactionEvent::Released),
        ]
    }

    proptest! {
        #[test]
        fn prop_completes_at_most_once(events in proptest::collection::vec(any_event(), 0..64)) {
            let mut state = TransactionState::Idle;
            let mut completed: Option<Outcome> = None;

            for event in events {
                let next = state.transition(event);
                if let (None, Some(outcome)) = (state.outcome(), next.outcome()) {
                    // Only reachable from AwaitingResponse
                    prop_assert_eq!(state, TransactionState::AwaitingResponse);
                    completed = Some(outcome);
                }
                if next == TransactionState::Idle {
                    completed = None;
                }
                prop_assert_eq!(next.outcome(), completed);
                state = next;
            }

            prop_assert_eq!(state.transition(TransactionEvent::Released), TransactionState::Idle);
        }
    }
}
