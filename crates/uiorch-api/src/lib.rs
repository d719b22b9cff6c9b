// uiorch-api: Async Rust client for the UiPath Orchestrator REST and OData API

pub mod auth;
pub mod client;
pub mod error;
pub mod models;
pub mod odata;
pub mod resources;
pub mod transport;

pub use auth::Credentials;
pub use client::{ClientConfig, FolderScope, OrchestratorClient};
pub use error::{ApiError, Error};
pub use odata::{Filter, ODataList, ODataQuery};
pub use transport::{RetryPolicy, TlsMode, TransportConfig};
