//! CLI error types with miette diagnostics.
//!
//! Maps `CoreError` and `ConfigError` into user-facing errors with
//! actionable help text and stable exit codes.

use miette::Diagnostic;
use thiserror::Error;

use panel_rocket_config::ConfigError;
use panel_rocket_core::CoreError;

/// Process exit codes.
pub mod exit_code {
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const AUTH: i32 = 3;
    pub const NOT_FOUND: i32 = 4;
    pub const CONNECTION: i32 = 7;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Connection ───────────────────────────────────────────────────
    #[error("Could not connect to 1Panel")]
    #[diagnostic(
        code(panel_rocket::connection_failed),
        help(
            "Check that the panel is running and reachable: {message}\n\
             Self-signed certificate? Try --insecure (-k)."
        )
    )]
    ConnectionFailed { message: String },

    // ── Authentication ───────────────────────────────────────────────
    #[error("1Panel rejected the request: {message}")]
    #[diagnostic(
        code(panel_rocket::auth_failed),
        help(
            "Verify the API key under Panel Settings > API Interface, and that\n\
             this machine's IP is on the API whitelist and its clock is correct."
        )
    )]
    AuthFailed { message: String },

    #[error("No API key configured for profile '{profile}'")]
    #[diagnostic(
        code(panel_rocket::no_credentials),
        help(
            "Configure credentials with: panel-rocket config init\n\
             Or pass --api-key / set ONEPANEL_API_KEY."
        )
    )]
    NoCredentials { profile: String },

    // ── Resources ────────────────────────────────────────────────────
    #[error("{resource_type} '{identifier}' not found")]
    #[diagnostic(
        code(panel_rocket::not_found),
        help("Run: panel-rocket {list_command} to see available {resource_type}s")
    )]
    NotFound {
        resource_type: String,
        identifier: String,
        list_command: String,
    },

    // ── API ──────────────────────────────────────────────────────────
    #[error("1Panel API error: {message}")]
    #[diagnostic(code(panel_rocket::api_error))]
    ApiError {
        message: String,
        status: Option<u16>,
    },

    // ── Validation ───────────────────────────────────────────────────
    #[error("Invalid value for {field}: {reason}")]
    #[diagnostic(code(panel_rocket::validation))]
    Validation { field: String, reason: String },

    // ── Configuration ────────────────────────────────────────────────
    #[error("Profile '{name}' not found in configuration")]
    #[diagnostic(
        code(panel_rocket::profile_not_found),
        help(
            "Available profiles: {available}\n\
             Create one with: panel-rocket config init"
        )
    )]
    ProfileNotFound { name: String, available: String },

    #[error("No 1Panel base URL configured")]
    #[diagnostic(
        code(panel_rocket::no_config),
        help(
            "Pass --base-url / set ONEPANEL_BASE_URL, or create a profile with:\n\
             panel-rocket config init\n\
             Expected at: {path}"
        )
    )]
    NoConfig { path: String },

    #[error("Configuration error: {message}")]
    #[diagnostic(code(panel_rocket::config))]
    Config { message: String },

    // ── Interactive ──────────────────────────────────────────────────
    #[error("'{action}' needs an answer but there is no terminal to ask")]
    #[diagnostic(
        code(panel_rocket::confirmation_required),
        help("Pass the value as a flag, or use --yes (-y) to accept defaults.")
    )]
    NonInteractive { action: String },

    // ── IO / Serialization ───────────────────────────────────────────
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl CliError {
    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::ConnectionFailed { .. } => exit_code::CONNECTION,
            Self::AuthFailed { .. } | Self::NoCredentials { .. } => exit_code::AUTH,
            Self::NotFound { .. } => exit_code::NOT_FOUND,
            Self::Validation { .. } | Self::NonInteractive { .. } => exit_code::USAGE,
            _ => exit_code::GENERAL,
        }
    }

    pub(crate) fn site_not_found(domain: impl Into<String>) -> Self {
        Self::NotFound {
            resource_type: "website".into(),
            identifier: domain.into(),
            list_command: "sites list".into(),
        }
    }
}

// ── CoreError → CliError mapping ─────────────────────────────────────

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::Connection { message } => CliError::ConnectionFailed { message },

            CoreError::Remote {
                message,
                status: Some(401 | 403),
            } => CliError::AuthFailed { message },

            CoreError::Remote { message, status } => CliError::ApiError { message, status },

            CoreError::SiteNotFound { domain } => CliError::site_not_found(domain),

            CoreError::SiteNotFoundAfterCreate { domain, attempts } => CliError::ApiError {
                message: format!(
                    "website {domain} was created but did not appear after {attempts} lookup(s)"
                ),
                status: None,
            },

            CoreError::Config { message } => CliError::Validation {
                field: "deployment".into(),
                reason: message,
            },

            err @ CoreError::Upload { .. } => CliError::ApiError {
                message: err.to_string(),
                status: None,
            },

            err @ CoreError::Io { .. } => CliError::Io(std::io::Error::other(err.to_string())),
        }
    }
}

// ── ConfigError → CliError mapping ───────────────────────────────────

impl From<ConfigError> for CliError {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::Validation { field, reason } => CliError::Validation { field, reason },
            ConfigError::NoCredentials { profile } => CliError::NoCredentials { profile },
            ConfigError::Io(e) => CliError::Io(e),
            other => CliError::Config {
                message: other.to_string(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::*;

    #[test]
    fn exit_codes_follow_error_kind() {
        let cases = [
            (
                CoreError::Connection {
                    message: "refused".into(),
                },
                exit_code::CONNECTION,
            ),
            (
                CoreError::Remote {
                    message: "bad key".into(),
                    status: Some(401),
                },
                exit_code::AUTH,
            ),
            (
                CoreError::SiteNotFound {
                    domain: "x.com".into(),
                },
                exit_code::NOT_FOUND,
            ),
            (
                CoreError::Config {
                    message: "no path".into(),
                },
                exit_code::USAGE,
            ),
            (
                CoreError::Remote {
                    message: "boom".into(),
                    status: Some(500),
                },
                exit_code::GENERAL,
            ),
            (
                CoreError::Upload {
                    path: PathBuf::from("a.txt"),
                    message: "boom".into(),
                },
                exit_code::GENERAL,
            ),
        ];

        for (core, expected) in cases {
            let label = core.to_string();
            assert_eq!(CliError::from(core).exit_code(), expected, "{label}");
        }
    }

    #[test]
    fn missing_credentials_is_auth_exit() {
        let err = CliError::from(ConfigError::NoCredentials {
            profile: "prod".into(),
        });
        assert_eq!(err.exit_code(), exit_code::AUTH);
    }
}
