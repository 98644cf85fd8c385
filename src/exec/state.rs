// src/exec/state.rs

//! Launch state machine.
//!
//! ```text
//! Start -> StdinRedirected -> FdsClosed -> Replaced
//!                                       -> ReplaceFailed
//!                                       -> Delegated   (spawn/emulation path)
//! ```
//!
//! Every step is irreversible, so the only legal moves are one step forward.

use tracing::debug;

use crate::errors::{LaunchError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LaunchState {
    Start,
    StdinRedirected,
    FdsClosed,
    /// The target now occupies this process (terminal).
    Replaced,
    /// Image replacement returned an error (terminal).
    ReplaceFailed,
    /// Control handed to the spawn-and-forward path (terminal for the
    /// launcher itself).
    Delegated,
}

impl LaunchState {
    pub fn can_advance_to(self, next: LaunchState) -> bool {
        use LaunchState::*;
        matches!(
            (self, next),
            (Start, StdinRedirected)
                | (StdinRedirected, FdsClosed)
                | (FdsClosed, Replaced)
                | (FdsClosed, ReplaceFailed)
                | (FdsClosed, Delegated)
        )
    }

    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            LaunchState::Replaced | LaunchState::ReplaceFailed | LaunchState::Delegated
        )
    }
}

/// Tracks the current [`LaunchState`] and rejects out-of-order transitions.
#[derive(Debug)]
pub struct LaunchStateMachine {
    state: LaunchState,
}

impl Default for LaunchStateMachine {
    fn default() -> Self {
        Self::new()
    }
}

impl LaunchStateMachine {
    pub fn new() -> Self {
        Self {
            state: LaunchState::Start,
        }
    }

    pub fn state(&self) -> LaunchState {
        self.state
    }

    pub fn advance(&mut self, next: LaunchState) -> Result<()> {
        if !self.state.can_advance_to(next) {
            return Err(LaunchError::State {
                from: self.state,
                to: next,
            });
        }
        debug!(from = ?self.state, to = ?next, "launch state transition");
        self.state = next;
        Ok(())
    }
}
