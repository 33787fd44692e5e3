//! Async session handle.
//!
//! Wraps the orchestrator behind a `tokio::sync::Mutex` and drives the
//! fire-and-forget remote fetches. In-flight requests are never cancelled;
//! instead each completion carries the epoch it was issued under and the
//! orchestrator discards stale ones.

use crate::error::{SessionError, StoreError};
use crate::events::SessionEvent;
use crate::gateway::{CredentialStore, RemoteGateway};
use crate::identity;
use crate::orchestrator::{SessionOrchestrator, SessionSnapshot};
use crate::router::ViewTarget;
use crate::state_machine;
use crate::types::{
    AddChildOutcome, Child, ChildDraft, ChildId, Credential, NotificationSettings, Section,
    SessionEpoch, SessionState, User,
};
use std::sync::Arc;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;

/// Join handles for the fetch tasks issued on entry into `Authenticated`.
///
/// Dropping this detaches the tasks (they keep running); awaiting it is
/// mainly for tests and sequential callers.
#[derive(Debug)]
pub struct Refresh {
    tasks: Vec<JoinHandle<()>>,
}

impl Refresh {
    /// Wait for the profile and roster fetches to finish, in either order.
    /// A panicked task is logged, not propagated.
    pub async fn completed(self) {
        for task in self.tasks {
            if let Err(error) = task.await {
                tracing::warn!(%error, "session fetch task failed");
            }
        }
    }
}

/// Command surface handed to the presentation layer.
#[derive(Clone)]
pub struct Session {
    orchestrator: Arc<Mutex<SessionOrchestrator>>,
    gateway: Arc<dyn RemoteGateway>,
    store: Arc<dyn CredentialStore>,
}

impl Session {
    /// Start the session: demo mode if no credential is persisted, otherwise
    /// resume an authenticated session and issue the fetches.
    ///
    /// Must be called within a tokio runtime.
    pub fn start(
        gateway: Arc<dyn RemoteGateway>,
        store: Arc<dyn CredentialStore>,
    ) -> Result<(Self, Option<Refresh>), StoreError> {
        let mut orchestrator = SessionOrchestrator::new();
        let persisted = store.load()?;

        // A fresh orchestrator always accepts the resume transition.
        let resumed = persisted.and_then(|credential| {
            orchestrator
                .resume(credential.clone())
                .ok()
                .map(|epoch| (epoch, credential))
        });

        let session = Self {
            orchestrator: Arc::new(Mutex::new(orchestrator)),
            gateway,
            store,
        };

        let refresh = resumed.map(|(epoch, credential)| {
            tracing::info!("resuming session from persisted credential");
            session.spawn_fetches(epoch, credential)
        });

        Ok((session, refresh))
    }

    /// Subscribe to session events.
    pub async fn subscribe(&self) -> tokio::sync::mpsc::UnboundedReceiver<SessionEvent> {
        self.orchestrator.lock().await.subscribe()
    }

    pub async fn snapshot(&self) -> SessionSnapshot {
        self.orchestrator.lock().await.snapshot()
    }

    pub async fn route(&self) -> ViewTarget {
        self.orchestrator.lock().await.route()
    }

    /// A dashboard action gated behind auth was invoked. Invalid in
    /// authenticated mode; ignored there.
    pub async fn require_login(&self) {
        let mut orch = self.orchestrator.lock().await;
        if let Err(error) = orch.require_login() {
            tracing::debug!(%error, "login request ignored");
        }
    }

    /// Successful login callback. Side effects in order: persist the
    /// credential, set the user, enter authenticated mode, issue the
    /// fetches (which do not block the transition).
    pub async fn login_succeeded(
        &self,
        credential: Credential,
        user: User,
    ) -> Result<Refresh, SessionError> {
        let mut orch = self.orchestrator.lock().await;
        // Validate before the durable write so a rejected transition does
        // not leave a stored credential behind.
        state_machine::validate_transition(orch.state(), SessionState::Authenticated)?;
        self.store.save(&credential)?;
        let epoch = orch.login_succeeded(credential.clone(), user)?;
        drop(orch);
        Ok(self.spawn_fetches(epoch, credential))
    }

    /// Log out: erase the credential, clear the session and repopulate the
    /// demo sample.
    pub async fn logout(&self) -> Result<(), SessionError> {
        let mut orch = self.orchestrator.lock().await;
        state_machine::validate_transition(orch.state(), SessionState::Demo)?;
        self.store.clear()?;
        orch.logout()?;
        Ok(())
    }

    /// Create a child remotely, falling back to a local-only record when the
    /// write fails. No-op (`None`) unless authenticated with a credential.
    pub async fn add_child(&self, draft: ChildDraft) -> Option<AddChildOutcome> {
        let (epoch, credential) = {
            let orch = self.orchestrator.lock().await;
            if orch.state() != SessionState::Authenticated {
                tracing::debug!("add_child ignored outside authenticated mode");
                return None;
            }
            match orch.credential() {
                Some(credential) => (orch.epoch(), credential.clone()),
                None => return None,
            }
        };

        let result = self.gateway.create_child(&credential, &draft).await;

        let mut orch = self.orchestrator.lock().await;
        // The session changed while the create was in flight; its response
        // no longer belongs to this state.
        if orch.epoch() != epoch {
            tracing::warn!("discarding child create completion from a previous session");
            return None;
        }

        let outcome = match result {
            Ok(child) => {
                orch.append_child(child.clone());
                AddChildOutcome::Saved(child)
            }
            Err(error) => {
                tracing::warn!(%error, "child create failed, keeping local-only record");
                let child = draft.into_child(ChildId::local_now());
                orch.append_child(child.clone());
                AddChildOutcome::LocalFallback(child)
            }
        };
        Some(outcome)
    }

    pub async fn select_child(&self, id: &ChildId) -> bool {
        self.orchestrator.lock().await.select_child(id)
    }

    pub async fn set_section(&self, section: Section) {
        self.orchestrator.lock().await.set_section(section);
    }

    /// Pure local replace-by-id; no remote call is modeled for update.
    pub async fn update_child(&self, child: Child) -> bool {
        self.orchestrator.lock().await.update_child(child)
    }

    pub async fn set_notifications(&self, settings: NotificationSettings) {
        self.orchestrator.lock().await.set_notifications(settings);
    }

    /// Issue the profile and roster fetches for the given epoch. The two are
    /// independent: they may complete in either order and fail independently.
    fn spawn_fetches(&self, epoch: SessionEpoch, credential: Credential) -> Refresh {
        tracing::debug!(epoch = epoch.0, "issuing profile and roster fetches");

        let roster_task = {
            let orchestrator = Arc::clone(&self.orchestrator);
            let gateway = Arc::clone(&self.gateway);
            let credential = credential.clone();
            tokio::spawn(async move {
                let outcome = gateway.fetch_roster(&credential).await;
                orchestrator.lock().await.apply_roster(epoch, outcome);
            })
        };

        let profile_task = {
            let orchestrator = Arc::clone(&self.orchestrator);
            let gateway = Arc::clone(&self.gateway);
            tokio::spawn(async move {
                let user = match gateway.fetch_profile(&credential).await {
                    Ok(user) => user,
                    Err(error) => {
                        tracing::warn!(%error, "profile fetch failed, decoding credential");
                        identity::user_from_credential(&credential)
                    }
                };
                orchestrator.lock().await.apply_profile(epoch, user);
            })
        };

        Refresh {
            tasks: vec![roster_task, profile_task],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn completed_survives_a_panicked_task() {
        let refresh = Refresh {
            tasks: vec![
                tokio::spawn(async { panic!("fetch blew up") }),
                tokio::spawn(async {}),
            ],
        };
        refresh.completed().await;
    }
}
