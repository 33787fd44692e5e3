//! Trait seams for the Remote Data Gateway and durable credential storage.
//!
//! The orchestrator only sees these contracts; the HTTP implementation lives
//! in the `smartkids-http` crate, and tests script fakes against them.

use crate::error::{GatewayError, StoreError};
use crate::types::{Child, ChildDraft, Credential, User};

/// Request/response boundary to the backend.
///
/// All three operations authenticate with a bearer credential. Failures are
/// always recoverable locally; no call is retried here.
#[async_trait::async_trait]
pub trait RemoteGateway: Send + Sync {
    /// GET the parent profile.
    async fn fetch_profile(&self, credential: &Credential) -> Result<User, GatewayError>;

    /// GET the child roster. An empty list is a success ("no children yet").
    async fn fetch_roster(&self, credential: &Credential) -> Result<Vec<Child>, GatewayError>;

    /// POST a draft child; the server assigns the id.
    async fn create_child(
        &self,
        credential: &Credential,
        draft: &ChildDraft,
    ) -> Result<Child, GatewayError>;
}

/// Durable storage holding a single credential key.
///
/// Read once at startup, written on login, deleted on logout. Absence means
/// logged out.
pub trait CredentialStore: Send + Sync {
    fn load(&self) -> Result<Option<Credential>, StoreError>;
    fn save(&self, credential: &Credential) -> Result<(), StoreError>;
    fn clear(&self) -> Result<(), StoreError>;
}
