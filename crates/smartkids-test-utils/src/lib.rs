//! Testing utilities for the SmartKids workspace.
//!
//! Scripted fake gateway, in-memory credential store and fixtures.

use smartkids_core::error::{GatewayError, StoreError};
use smartkids_core::gateway::{CredentialStore, RemoteGateway};
use smartkids_core::types::{Child, ChildDraft, ChildId, Credential, Gender, User};
use std::collections::VecDeque;
use std::sync::Mutex;

/// Install a fmt subscriber honoring `RUST_LOG`. Safe to call repeatedly.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .try_init();
}

pub fn test_child(id: &str, name: &str) -> Child {
    Child {
        id: ChildId::from(id),
        name: name.to_string(),
        birth_date: chrono::NaiveDate::from_ymd_opt(2017, 6, 1).unwrap(),
        gender: Gender::Male,
        profile_image_url: None,
    }
}

pub fn test_draft(name: &str) -> ChildDraft {
    ChildDraft {
        name: name.to_string(),
        birth_date: chrono::NaiveDate::from_ymd_opt(2019, 2, 11).unwrap(),
        gender: Gender::Female,
        profile_image_url: None,
    }
}

pub fn test_user(name: &str) -> User {
    User {
        name: name.to_string(),
        profile_image_url: None,
    }
}

/// Gateway whose responses are scripted per operation.
///
/// Each call pops the next scripted response for that operation; an empty
/// queue yields a transport failure, which exercises the orchestrator's
/// fallback paths by default.
#[derive(Default)]
pub struct FakeGateway {
    profiles: Mutex<VecDeque<Result<User, GatewayError>>>,
    rosters: Mutex<VecDeque<Result<Vec<Child>, GatewayError>>>,
    creates: Mutex<VecDeque<Result<Child, GatewayError>>>,
    create_calls: Mutex<Vec<ChildDraft>>,
    create_gate: Mutex<Option<tokio::sync::oneshot::Receiver<()>>>,
}

impl FakeGateway {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_profile(&self, response: Result<User, GatewayError>) {
        self.profiles.lock().unwrap().push_back(response);
    }

    pub fn push_roster(&self, response: Result<Vec<Child>, GatewayError>) {
        self.rosters.lock().unwrap().push_back(response);
    }

    pub fn push_create(&self, response: Result<Child, GatewayError>) {
        self.creates.lock().unwrap().push_back(response);
    }

    /// Drafts the orchestrator attempted to create, in call order.
    pub fn create_calls(&self) -> Vec<ChildDraft> {
        self.create_calls.lock().unwrap().clone()
    }

    /// Make the next `create_child` call block until the returned sender
    /// fires (or is dropped). Lets a test interleave other session commands
    /// with an in-flight create.
    pub fn hold_create(&self) -> tokio::sync::oneshot::Sender<()> {
        let (release, gate) = tokio::sync::oneshot::channel();
        *self.create_gate.lock().unwrap() = Some(gate);
        release
    }

    fn unscripted<T>() -> Result<T, GatewayError> {
        Err(GatewayError::Transport("no scripted response".to_string()))
    }
}

#[async_trait::async_trait]
impl RemoteGateway for FakeGateway {
    async fn fetch_profile(&self, _credential: &Credential) -> Result<User, GatewayError> {
        self.profiles
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(Self::unscripted)
    }

    async fn fetch_roster(&self, _credential: &Credential) -> Result<Vec<Child>, GatewayError> {
        self.rosters
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(Self::unscripted)
    }

    async fn create_child(
        &self,
        _credential: &Credential,
        draft: &ChildDraft,
    ) -> Result<Child, GatewayError> {
        self.create_calls.lock().unwrap().push(draft.clone());
        let gate = self.create_gate.lock().unwrap().take();
        if let Some(gate) = gate {
            let _ = gate.await;
        }
        self.creates
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(Self::unscripted)
    }
}

/// Credential store held in memory.
#[derive(Default)]
pub struct MemoryCredentialStore {
    credential: Mutex<Option<Credential>>,
}

impl MemoryCredentialStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_credential(token: &str) -> Self {
        Self {
            credential: Mutex::new(Some(Credential::new(token))),
        }
    }
}

impl CredentialStore for MemoryCredentialStore {
    fn load(&self) -> Result<Option<Credential>, StoreError> {
        Ok(self.credential.lock().unwrap().clone())
    }

    fn save(&self, credential: &Credential) -> Result<(), StoreError> {
        *self.credential.lock().unwrap() = Some(credential.clone());
        Ok(())
    }

    fn clear(&self) -> Result<(), StoreError> {
        *self.credential.lock().unwrap() = None;
        Ok(())
    }
}
