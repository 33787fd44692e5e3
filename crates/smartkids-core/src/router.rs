//! View router: pure function from session state to a presentation target.

use crate::types::{Section, SessionState};

/// The presentation collaborator the shell should render.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewTarget {
    /// The login surface, shown while a login is awaited.
    Login,
    /// Prompt to register a child; shown for any non-settings section when
    /// no child is selected (settings stays reachable, registration happens
    /// there).
    RegisterChildPrompt,
    Health,
    Learning,
    School,
    Meal,
    Settings,
}

/// Map the active section to a presentation target.
#[must_use]
pub fn route(state: SessionState, section: Section, has_selection: bool) -> ViewTarget {
    if state == SessionState::AwaitingLogin {
        return ViewTarget::Login;
    }
    if !has_selection && section != Section::Settings {
        return ViewTarget::RegisterChildPrompt;
    }
    match section {
        Section::Health => ViewTarget::Health,
        Section::Learning => ViewTarget::Learning,
        Section::School => ViewTarget::School,
        Section::Meal => ViewTarget::Meal,
        Section::Settings => ViewTarget::Settings,
    }
}
