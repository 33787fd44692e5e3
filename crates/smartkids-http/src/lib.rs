//! HTTP Remote Data Gateway and durable credential storage for SmartKids.

pub mod client;
pub mod config;
pub mod storage;

pub use client::HttpGateway;
pub use config::GatewayConfig;
pub use storage::FileCredentialStore;
