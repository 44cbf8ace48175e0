/*
[INPUT]:  LifecycleEvent raised by the controller
[OUTPUT]: Validated lifecycle transitions
[POS]:    Controller layer - lifecycle state machine
[UPDATE]: When lifecycle states or transitions change
*/

use std::fmt;

use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LifecycleState {
    Uninitialized,
    Loading,
    Ready,
    Mutating,
    Degraded,
}

impl LifecycleState {
    /// Ready and Mutating accept user mutations.
    pub fn accepts_mutations(self) -> bool {
        matches!(self, LifecycleState::Ready | LifecycleState::Mutating)
    }
}

impl fmt::Display for LifecycleState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            LifecycleState::Uninitialized => "uninitialized",
            LifecycleState::Loading => "loading",
            LifecycleState::Ready => "ready",
            LifecycleState::Mutating => "mutating",
            LifecycleState::Degraded => "degraded",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleEvent {
    Start,
    StatusesLoaded,
    StatusesFailed,
    OperationDispatched,
    AllSettled,
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum LifecycleError {
    #[error("Invalid lifecycle transition: {from:?} -> {event:?}")]
    InvalidTransition {
        from: LifecycleState,
        event: LifecycleEvent,
    },
}

#[derive(Debug)]
pub struct Lifecycle {
    current: LifecycleState,
}

impl Default for Lifecycle {
    fn default() -> Self {
        Self {
            current: LifecycleState::Uninitialized,
        }
    }
}

impl Lifecycle {
    pub fn state(&self) -> LifecycleState {
        self.current
    }

    fn next(from: LifecycleState, event: LifecycleEvent) -> Option<LifecycleState> {
        use LifecycleEvent as E;
        use LifecycleState as S;
        match (from, event) {
            (S::Uninitialized, E::Start) => Some(S::Loading),
            (S::Loading, E::StatusesLoaded) => Some(S::Ready),
            (S::Loading, E::StatusesFailed) => Some(S::Degraded),
            (S::Ready | S::Mutating, E::OperationDispatched) => Some(S::Mutating),
            (S::Ready | S::Mutating, E::AllSettled) => Some(S::Ready),
            _ => None,
        }
    }

    pub fn can_transition(&self, event: LifecycleEvent) -> bool {
        Self::next(self.current, event).is_some()
    }

    pub fn transition(&mut self, event: LifecycleEvent) -> Result<LifecycleState, LifecycleError> {
        let next = Self::next(self.current, event).ok_or(LifecycleError::InvalidTransition {
            from: self.current,
            event,
        })?;
        self.current = next;
        Ok(next)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn startup_reaches_ready() {
        let mut lifecycle = Lifecycle::default();
        assert_eq!(lifecycle.state(), LifecycleState::Uninitialized);
        assert_eq!(lifecycle.transition(LifecycleEvent::Start), Ok(LifecycleState::Loading));
        assert_eq!(
            lifecycle.transition(LifecycleEvent::StatusesLoaded),
            Ok(LifecycleState::Ready)
        );
    }

    #[test]
    fn ready_and_mutating_alternate() {
        let mut lifecycle = Lifecycle::default();
        lifecycle.transition(LifecycleEvent::Start).unwrap();
        lifecycle.transition(LifecycleEvent::StatusesLoaded).unwrap();
        lifecycle.transition(LifecycleEvent::OperationDispatched).unwrap();
        lifecycle.transition(LifecycleEvent::OperationDispatched).unwrap();
        assert_eq!(lifecycle.state(), LifecycleState::Mutating);
        lifecycle.transition(LifecycleEvent::AllSettled).unwrap();
        assert_eq!(lifecycle.state(), LifecycleState::Ready);
    }

    #[test]
    fn degraded_is_terminal() {
        let mut lifecycle = Lifecycle::default();
        lifecycle.transition(LifecycleEvent::Start).unwrap();
        lifecycle.transition(LifecycleEvent::StatusesFailed).unwrap();
        for event in [
            LifecycleEvent::Start,
            LifecycleEvent::StatusesLoaded,
            LifecycleEvent::OperationDispatched,
            LifecycleEvent::AllSettled,
        ] {
            assert!(!lifecycle.can_transition(event));
        }
        assert_eq!(lifecycle.state(), LifecycleState::Degraded);
    }

    #[test]
    fn mutations_before_start_are_invalid() {
        let mut lifecycle = Lifecycle::default();
        let err = lifecycle
            .transition(LifecycleEvent::OperationDispatched)
            .unwrap_err();
        assert_eq!(
            err,
            LifecycleError::InvalidTransition {
                from: LifecycleState::Uninitialized,
                event: LifecycleEvent::OperationDispatched,
            }
        );
        assert!(!LifecycleState::Loading.accepts_mutations());
        assert!(LifecycleState::Mutating.accepts_mutations());
    }
}
