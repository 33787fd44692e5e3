//! Session orchestrator.
//!
//! Owns all mutable application state: mode, credential, current user,
//! child roster, selection, active section and notification preferences.
//! Every mutation goes through a command on this type; collaborators never
//! touch the state directly. Remote completions are delivered through the
//! `apply_*` commands tagged with the epoch they were issued under.

use crate::demo;
use crate::error::{GatewayError, IllegalTransition};
use crate::events::SessionEvent;
use crate::roster::ChildRoster;
use crate::router::{self, ViewTarget};
use crate::state_machine;
use crate::types::{
    Child, ChildId, Credential, NotificationSettings, Section, SessionEpoch, SessionState, User,
};
use tokio::sync::mpsc;

/// Read-only view of the session handed to presentation collaborators.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionSnapshot {
    pub state: SessionState,
    pub user: Option<User>,
    pub children: Vec<Child>,
    pub selected_child: Option<Child>,
    pub section: Section,
    pub notifications: NotificationSettings,
}

impl SessionSnapshot {
    /// Derived demo flag; never stored independently of the mode.
    #[inline]
    #[must_use]
    pub fn is_demo(&self) -> bool {
        self.state == SessionState::Demo
    }

    /// User to display: the live user, or the demo stand-in while no
    /// session exists.
    #[must_use]
    pub fn display_user(&self) -> User {
        match &self.user {
            Some(user) => user.clone(),
            None => demo::sample_user(),
        }
    }
}

/// The single owner of session state.
pub struct SessionOrchestrator {
    state: SessionState,
    epoch: SessionEpoch,
    credential: Option<Credential>,
    user: Option<User>,
    roster: ChildRoster,
    selected: Option<ChildId>,
    section: Section,
    notifications: NotificationSettings,
    subscribers: Vec<mpsc::UnboundedSender<SessionEvent>>,
}

impl SessionOrchestrator {
    /// Start in demo mode with the fixed sample roster.
    #[must_use]
    pub fn new() -> Self {
        let mut orchestrator = Self {
            state: SessionState::Demo,
            epoch: SessionEpoch::default(),
            credential: None,
            user: None,
            roster: ChildRoster::new(),
            selected: None,
            section: Section::default(),
            notifications: NotificationSettings::default(),
            subscribers: Vec::new(),
        };
        orchestrator.enter_demo();
        orchestrator
    }

    // ----- observers ------------------------------------------------------

    #[inline]
    #[must_use]
    pub fn state(&self) -> SessionState {
        self.state
    }

    #[inline]
    #[must_use]
    pub fn epoch(&self) -> SessionEpoch {
        self.epoch
    }

    #[inline]
    #[must_use]
    pub fn credential(&self) -> Option<&Credential> {
        self.credential.as_ref()
    }

    #[inline]
    #[must_use]
    pub fn user(&self) -> Option<&User> {
        self.user.as_ref()
    }

    #[inline]
    #[must_use]
    pub fn roster(&self) -> &ChildRoster {
        &self.roster
    }

    /// Resolve the weak selection against the roster. The invariant that a
    /// non-null selection references a roster entry is structural: selection
    /// is held by id and resolved on read.
    #[inline]
    #[must_use]
    pub fn selected_child(&self) -> Option<&Child> {
        self.selected.as_ref().and_then(|id| self.roster.get(id))
    }

    #[inline]
    #[must_use]
    pub fn section(&self) -> Section {
        self.section
    }

    #[inline]
    #[must_use]
    pub fn notifications(&self) -> NotificationSettings {
        self.notifications
    }

    #[must_use]
    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            state: self.state,
            user: self.user.clone(),
            children: self.roster.children().to_vec(),
            selected_child: self.selected_child().cloned(),
            section: self.section,
            notifications: self.notifications,
        }
    }

    /// Presentation target for the current state.
    #[must_use]
    pub fn route(&self) -> ViewTarget {
        router::route(self.state, self.section, self.selected_child().is_some())
    }

    // ----- events ---------------------------------------------------------

    /// Subscribe to session events. Dropped receivers are pruned on emit.
    pub fn subscribe(&mut self) -> mpsc::UnboundedReceiver<SessionEvent> {
        let (tx, rx) = mpsc::unbounded_channel();
        self.subscribers.push(tx);
        rx
    }

    fn emit(&mut self, event: SessionEvent) {
        self.subscribers.retain(|tx| tx.send(event.clone()).is_ok());
    }

    // ----- mode transitions -----------------------------------------------

    /// A collaborator hit an auth-gated action: show the login surface.
    pub fn require_login(&mut self) -> Result<(), IllegalTransition> {
        self.transition(SessionState::AwaitingLogin)?;
        self.emit(SessionEvent::LoginRequired);
        Ok(())
    }

    /// Resume an authenticated session from a persisted credential at
    /// startup. The caller issues the profile/roster fetches tagged with the
    /// returned epoch.
    pub fn resume(&mut self, credential: Credential) -> Result<SessionEpoch, IllegalTransition> {
        self.transition(SessionState::Authenticated)?;
        self.credential = Some(credential);
        self.user = None;
        Ok(self.epoch)
    }

    /// Successful login callback carrying (credential, user). The roster
    /// fetch is issued by the caller and does not block the transition.
    pub fn login_succeeded(
        &mut self,
        credential: Credential,
        user: User,
    ) -> Result<SessionEpoch, IllegalTransition> {
        self.transition(SessionState::Authenticated)?;
        self.credential = Some(credential);
        self.user = Some(user);
        Ok(self.epoch)
    }

    /// Revert to demo mode, clearing the session and repopulating the
    /// sample roster.
    pub fn logout(&mut self) -> Result<(), IllegalTransition> {
        self.transition(SessionState::Demo)?;
        self.enter_demo();
        Ok(())
    }

    fn transition(&mut self, to: SessionState) -> Result<(), IllegalTransition> {
        state_machine::validate_transition(self.state, to)?;
        let from = self.state;
        self.state = to;
        self.epoch.bump();
        tracing::info!(?from, ?to, epoch = self.epoch.0, "session mode changed");
        self.emit(SessionEvent::ModeChanged { from, to });
        Ok(())
    }

    /// Demo entry effect: clear the session, repopulate the fixed sample and
    /// select its first entry. Runs on every entry, overwriting any prior
    /// roster.
    fn enter_demo(&mut self) {
        self.credential = None;
        self.user = None;
        self.roster.replace(demo::sample_roster());
        self.selected = self.roster.first().map(|c| c.id.clone());
        let count = self.roster.len();
        self.emit(SessionEvent::RosterReplaced { count });
    }

    // ----- remote completions ----------------------------------------------

    /// Deliver a roster fetch outcome. Returns `false` when the completion
    /// was stale (issued under an earlier epoch) and discarded.
    pub fn apply_roster(
        &mut self,
        epoch: SessionEpoch,
        outcome: Result<Vec<Child>, GatewayError>,
    ) -> bool {
        if epoch != self.epoch {
            tracing::warn!(
                issued = epoch.0,
                current = self.epoch.0,
                "discarding stale roster completion"
            );
            return false;
        }
        match outcome {
            Ok(children) => {
                tracing::debug!(count = children.len(), "roster replaced from gateway");
                self.roster.replace(children);
            }
            Err(error) => {
                // Authenticated users must never see stale or sample data;
                // fail closed to an empty roster.
                tracing::warn!(%error, "roster fetch failed, clearing roster");
                self.roster.replace(Vec::new());
            }
        }
        self.selected = self.roster.first().map(|c| c.id.clone());
        let count = self.roster.len();
        self.emit(SessionEvent::RosterReplaced { count });
        true
    }

    /// Deliver a profile outcome. The caller has already applied the
    /// credential-payload fallback, so this always carries *some* user.
    pub fn apply_profile(&mut self, epoch: SessionEpoch, user: User) -> bool {
        if epoch != self.epoch {
            tracing::warn!(
                issued = epoch.0,
                current = self.epoch.0,
                "discarding stale profile completion"
            );
            return false;
        }
        self.user = Some(user);
        true
    }

    // ----- roster commands --------------------------------------------------

    /// Select a child by id. Ids not present in the roster are ignored.
    pub fn select_child(&mut self, id: &ChildId) -> bool {
        if self.roster.contains(id) {
            self.selected = Some(id.clone());
            true
        } else {
            false
        }
    }

    pub fn set_section(&mut self, section: Section) {
        self.section = section;
    }

    /// Append (or replace) a child after a create attempt and select it.
    pub fn append_child(&mut self, child: Child) {
        let id = child.id.clone();
        let local = id.is_local();
        self.roster.upsert(child);
        self.selected = Some(id.clone());
        self.emit(SessionEvent::ChildAdded { id, local });
    }

    /// Local replace-by-id. Unknown ids are a no-op; the selection follows
    /// automatically since it is resolved by id.
    pub fn update_child(&mut self, child: Child) -> bool {
        self.roster.replace_by_id(child)
    }

    pub fn set_notifications(&mut self, settings: NotificationSettings) {
        self.notifications = settings;
    }
}

impl Default for SessionOrchestrator {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Gender;
    use chrono::NaiveDate;

    fn child(id: &str, name: &str) -> Child {
        Child {
            id: ChildId::from(id),
            name: name.to_string(),
            birth_date: NaiveDate::from_ymd_opt(2017, 6, 1).unwrap(),
            gender: Gender::Female,
            profile_image_url: None,
        }
    }

    #[test]
    fn starts_in_demo_with_sample_selected() {
        let orch = SessionOrchestrator::new();
        assert_eq!(orch.state(), SessionState::Demo);
        assert_eq!(orch.roster().len(), 2);
        assert_eq!(orch.selected_child().unwrap().name, "김민준");
    }

    #[test]
    fn require_login_moves_to_awaiting_and_emits() {
        let mut orch = SessionOrchestrator::new();
        let mut events = orch.subscribe();
        orch.require_login().unwrap();
        assert_eq!(orch.state(), SessionState::AwaitingLogin);

        let first = events.try_recv().unwrap();
        assert!(matches!(first, SessionEvent::ModeChanged { .. }));
        assert_eq!(events.try_recv().unwrap(), SessionEvent::LoginRequired);
    }

    #[test]
    fn require_login_is_rejected_while_authenticated() {
        let mut orch = SessionOrchestrator::new();
        orch.require_login().unwrap();
        orch.login_succeeded(Credential::new("t"), demo::sample_user())
            .unwrap();
        assert!(orch.require_login().is_err());
    }

    #[test]
    fn stale_roster_completion_is_discarded() {
        let mut orch = SessionOrchestrator::new();
        orch.require_login().unwrap();
        let epoch = orch
            .login_succeeded(Credential::new("t"), demo::sample_user())
            .unwrap();
        orch.logout().unwrap();

        // Late-arriving authenticated response after logout.
        assert!(!orch.apply_roster(epoch, Ok(vec![child("9", "늦은응답")])));
        assert_eq!(orch.roster().len(), 2);
        assert_eq!(orch.selected_child().unwrap().name, "김민준");
    }

    #[test]
    fn roster_failure_fails_closed() {
        let mut orch = SessionOrchestrator::new();
        orch.require_login().unwrap();
        let epoch = orch
            .login_succeeded(Credential::new("t"), demo::sample_user())
            .unwrap();

        assert!(orch.apply_roster(epoch, Err(GatewayError::Transport("down".into()))));
        assert!(orch.roster().is_empty());
        assert!(orch.selected_child().is_none());
    }

    #[test]
    fn empty_roster_is_valid_and_clears_selection() {
        let mut orch = SessionOrchestrator::new();
        orch.require_login().unwrap();
        let epoch = orch
            .login_succeeded(Credential::new("t"), demo::sample_user())
            .unwrap();

        assert!(orch.apply_roster(epoch, Ok(Vec::new())));
        assert!(orch.roster().is_empty());
        assert!(orch.selected_child().is_none());
        assert_eq!(orch.route(), ViewTarget::RegisterChildPrompt);
    }

    #[test]
    fn logout_reenters_demo_sample() {
        let mut orch = SessionOrchestrator::new();
        orch.require_login().unwrap();
        let epoch = orch
            .login_succeeded(Credential::new("t"), demo::sample_user())
            .unwrap();
        orch.apply_roster(epoch, Ok(vec![child("7", "아람")]));

        orch.logout().unwrap();
        assert_eq!(orch.state(), SessionState::Demo);
        assert!(orch.credential().is_none());
        assert!(orch.user().is_none());
        assert_eq!(orch.roster().len(), 2);
        assert_eq!(orch.selected_child().unwrap().name, "김민준");
    }

    #[test]
    fn update_child_refreshes_selection_value() {
        let mut orch = SessionOrchestrator::new();
        let selected = orch.selected_child().unwrap().clone();
        let mut updated = selected.clone();
        updated.name = "김민준 (수정)".to_string();

        assert!(orch.update_child(updated));
        assert_eq!(orch.selected_child().unwrap().name, "김민준 (수정)");
    }

    #[test]
    fn update_unknown_child_is_noop() {
        let mut orch = SessionOrchestrator::new();
        let before = orch.snapshot();
        assert!(!orch.update_child(child("missing", "없음")));
        assert_eq!(orch.snapshot(), before);
    }

    #[test]
    fn select_child_requires_roster_membership() {
        let mut orch = SessionOrchestrator::new();
        assert!(orch.select_child(&ChildId::from("2")));
        assert_eq!(orch.selected_child().unwrap().name, "이서연");
        assert!(!orch.select_child(&ChildId::from("404")));
        assert_eq!(orch.selected_child().unwrap().name, "이서연");
    }

    #[test]
    fn snapshot_display_user_falls_back_to_sample() {
        let orch = SessionOrchestrator::new();
        assert_eq!(orch.snapshot().display_user().name, "김부모");
    }
}
