//! SmartKids session core.
//!
//! Owns the shell's mutable state and the demo/authenticated mode state
//! machine, reconciles the local child roster with the Remote Data Gateway
//! under partial failure, and routes the active section to a presentation
//! target. Presentation itself is an external collaborator: it consumes
//! snapshots and events and invokes the commands on [`Session`].

pub mod demo;
pub mod events;
pub mod gateway;
pub mod identity;
pub mod orchestrator;
pub mod roster;
pub mod router;
pub mod session;
pub mod state_machine;

pub mod error;
pub mod types;

pub use error::*;
pub use events::SessionEvent;
pub use gateway::{CredentialStore, RemoteGateway};
pub use orchestrator::{SessionOrchestrator, SessionSnapshot};
pub use roster::ChildRoster;
pub use router::{route, ViewTarget};
pub use session::{Refresh, Session};
pub use types::*;
