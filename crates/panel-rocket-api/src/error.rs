use std::path::PathBuf;

use thiserror::Error;

/// Top-level error type for the `panel-rocket-api` crate.
///
/// Covers every failure mode of the 1Panel HTTP surface: transport,
/// non-success responses, envelope decoding, and the local file reads
/// that feed multipart uploads. `panel-rocket-core` maps these into
/// deployment-level errors.
#[derive(Debug, Error)]
pub enum Error {
    // ── Transport ───────────────────────────────────────────────────
    /// HTTP transport error (connection refused, DNS failure, timeout, etc.)
    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// URL parsing error.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// The signed token could not be turned into a header.
    #[error("Authentication error: {message}")]
    Authentication { message: String },

    /// TLS setup or certificate error.
    #[error("TLS error: {0}")]
    Tls(String),

    // ── API ─────────────────────────────────────────────────────────
    /// Non-success HTTP status, or a `{code, message}` envelope whose
    /// code is not 200.
    #[error("1Panel API error (HTTP {status}): {message}")]
    Api { status: u16, message: String },

    // ── Data ────────────────────────────────────────────────────────
    /// JSON deserialization failed, with the raw body for debugging.
    #[error("Deserialization error: {message}")]
    Deserialization { message: String, body: String },

    // ── Local files ─────────────────────────────────────────────────
    /// Reading a local file for upload failed.
    #[error("cannot read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl Error {
    /// Returns `true` if the server rejected the API key or timestamp.
    pub fn is_auth_rejected(&self) -> bool {
        matches!(self, Self::Api { status: 401 | 403, .. })
    }
}
