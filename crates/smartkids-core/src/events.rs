//! Session events published to presentation collaborators.
//!
//! Replaces the per-dashboard login-required callback: any view subscribes
//! once and reacts to the events it cares about.

use crate::types::{ChildId, SessionState};

#[derive(Debug, Clone, PartialEq)]
pub enum SessionEvent {
    /// A gated action asked for authentication; the login surface should be
    /// shown in place of the dashboard.
    LoginRequired,

    /// The session mode changed.
    ModeChanged {
        from: SessionState,
        to: SessionState,
    },

    /// The roster was replaced wholesale (fetch outcome or demo entry).
    RosterReplaced { count: usize },

    /// A child was appended after a create attempt. `local` marks a
    /// fallback record that is not persisted remotely.
    ChildAdded { id: ChildId, local: bool },
}
