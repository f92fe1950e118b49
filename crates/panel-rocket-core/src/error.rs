// ── Core error types ──
//
// Deployment-level errors. Consumers never see HTTP status codes or JSON
// parse failures directly; the `From<panel_rocket_api::Error>` impl
// translates transport-layer errors into these variants.

use std::path::PathBuf;

use thiserror::Error;

/// Unified error type for the core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Remote ───────────────────────────────────────────────────────
    /// Transport failure or non-success response while talking to the panel.
    #[error("1Panel request failed: {message}")]
    Remote {
        message: String,
        /// HTTP status code (if applicable).
        status: Option<u16>,
    },

    /// The panel could not be reached at all (refused, DNS, timeout).
    #[error("Could not reach 1Panel: {message}")]
    Connection { message: String },

    #[error("Website not found: {domain}")]
    SiteNotFound { domain: String },

    /// The panel accepted the creation request but the site never showed up
    /// in the listing.
    #[error("Website {domain} was created but not found after {attempts} lookup(s)")]
    SiteNotFoundAfterCreate { domain: String, attempts: u32 },

    // ── Configuration ────────────────────────────────────────────────
    #[error("Configuration error: {message}")]
    Config { message: String },

    // ── Transfer ─────────────────────────────────────────────────────
    /// A single file could not be uploaded. Isolated per file by the walker.
    #[error("Upload file failed: {} - {message}", path.display())]
    Upload { path: PathBuf, message: String },

    /// Reading the local source tree failed.
    #[error("Cannot read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl CoreError {
    pub(crate) fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }
}

// ── Conversion from transport-layer errors ───────────────────────────

impl From<panel_rocket_api::Error> for CoreError {
    fn from(err: panel_rocket_api::Error) -> Self {
        use panel_rocket_api::Error as Api;

        match err {
            Api::InvalidUrl(e) => CoreError::Config {
                message: format!("Invalid URL: {e}"),
            },
            Api::Tls(message) => CoreError::Config {
                message: format!("TLS error: {message}"),
            },
            Api::Authentication { message } => CoreError::Config { message },
            Api::Io { path, source } => CoreError::Io { path, source },
            Api::Api { status, message } => CoreError::Remote {
                message,
                status: Some(status),
            },
            Api::Transport(e) if e.is_connect() || e.is_timeout() => CoreError::Connection {
                message: e.to_string(),
            },
            Api::Transport(e) => CoreError::Remote {
                status: e.status().map(|s| s.as_u16()),
                message: e.to_string(),
            },
            Api::Deserialization { message, body: _ } => CoreError::Remote {
                message: format!("unexpected response: {message}"),
                status: None,
            },
        }
    }
}
