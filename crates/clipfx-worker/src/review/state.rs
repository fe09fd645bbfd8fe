//! Per-row review state machine.
//!
//! ```text
//! Presented --Continue--> Editing --FinishEditing--> Completed
//! Presented --Skip------> Skipped
//! Presented --Quit------> Aborted
//! ```

use std::fmt;

use thiserror::Error;

/// Where the operator is with the current row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReviewState {
    /// Row shown, waiting for a command
    Presented,
    /// Walking the editable fields
    Editing,
    /// Left untouched
    Skipped,
    /// Session stopped before this row was changed
    Aborted,
    /// Edits (possibly none) accepted
    Completed,
}

/// Operator input that drives the state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReviewEvent {
    Continue,
    Skip,
    Quit,
    FinishEditing,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("invalid review transition: {event:?} in state {state}")]
pub struct TransitionError {
    pub state: ReviewState,
    pub event: ReviewEvent,
}

impl ReviewState {
    /// Apply an event. Pure.
    pub fn transition(self, event: ReviewEvent) -> Result<Self, TransitionError> {
        use ReviewEvent::*;
        use ReviewState::*;

        match (self, event) {
            (Presented, Continue) => Ok(Editing),
            (Presented, Skip) => Ok(Skipped),
            (Presented, Quit) => Ok(Aborted),
            (Editing, FinishEditing) => Ok(Completed),
            (state, event) => Err(TransitionError { state, event }),
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            ReviewState::Skipped | ReviewState::Aborted | ReviewState::Completed
        )
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ReviewState::Presented => "presented",
            ReviewState::Editing => "editing",
            ReviewState::Skipped => "skipped",
            ReviewState::Aborted => "aborted",
            ReviewState::Completed => "completed",
        }
    }
}

impl fmt::Display for ReviewState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Run a sequence of events from `Presented`, stopping at the first error.
pub fn replay(events: &[ReviewEvent]) -> Result<ReviewState, TransitionError> {
    events
        .iter()
        .try_fold(ReviewState::Presented, |state, event| state.transition(*event))
}
