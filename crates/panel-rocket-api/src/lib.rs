// panel-rocket-api: Async Rust client for the 1Panel website and file APIs

pub mod auth;
pub mod client;
pub mod error;
pub mod files;
pub mod models;
pub mod transport;
pub mod websites;

pub use auth::{RequestSigner, SignedHeaders};
pub use client::PanelClient;
pub use error::Error;
pub use models::{SiteDefaults, Website};
pub use transport::{TlsMode, TransportConfig};
