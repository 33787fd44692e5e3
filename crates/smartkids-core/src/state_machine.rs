//! Session mode state machine.
//!
//! Three states: `Demo`, `AwaitingLogin`, `Authenticated`. Entry effects
//! (demo sample repopulation, roster fetches) live in the orchestrator;
//! this module only answers which transitions are legal.

use crate::error::IllegalTransition;
use crate::types::SessionState;

/// Validates a session mode transition.
pub fn validate_transition(from: SessionState, to: SessionState) -> Result<(), IllegalTransition> {
    if allowed(from, to) {
        Ok(())
    } else {
        Err(IllegalTransition { from, to })
    }
}

pub fn allowed_transitions(from: SessionState) -> Vec<SessionState> {
    use SessionState::*;
    match from {
        // Authenticated is reachable directly from Demo only when a
        // persisted credential is resumed at startup.
        Demo => vec![AwaitingLogin, Authenticated],
        // No cancel path back to Demo is modeled.
        AwaitingLogin => vec![Authenticated],
        Authenticated => vec![Demo],
    }
}

fn allowed(from: SessionState, to: SessionState) -> bool {
    allowed_transitions(from).into_iter().any(|s| s == to)
}
