// ── Runtime deployment configuration ──
//
// These types describe *how* to reach a panel and *how* to walk and upload.
// They carry credential data and tuning, but never touch disk. The CLI
// constructs a `DeployConfig` and hands it in.

use std::path::PathBuf;
use std::time::Duration;

use panel_rocket_api::SiteDefaults;
use secrecy::SecretString;
use url::Url;

use crate::ignore::IgnoreSet;

/// TLS verification strategy.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum TlsVerification {
    /// System CA store (strict).
    #[default]
    SystemDefaults,
    /// Custom CA certificate file.
    CustomCa(PathBuf),
    /// Skip verification (self-signed panel certificates).
    DangerAcceptInvalid,
}

/// Where the panel lives and how to authenticate against it.
#[derive(Debug, Clone)]
pub struct EndpointConfig {
    /// Panel URL (e.g., `https://panel.example.com:8090`).
    pub url: Url,
    /// API key from the panel's API settings page.
    pub api_key: SecretString,
    /// `Accept-Language` value; `None` sends `en`.
    pub language: Option<String>,
    pub tls: TlsVerification,
    /// Per-request timeout.
    pub timeout: Duration,
}

impl EndpointConfig {
    pub fn new(url: Url, api_key: SecretString) -> Self {
        Self {
            url,
            api_key,
            language: None,
            tls: TlsVerification::default(),
            timeout: Duration::from_secs(30),
        }
    }
}

/// Bounded retry with a fixed delay between attempts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts, including the first. Zero is treated as one.
    pub max_attempts: u32,
    /// Wait between consecutive attempts.
    pub delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            delay: Duration::from_millis(1000),
        }
    }
}

impl RetryPolicy {
    pub fn new(max_attempts: u32, delay: Duration) -> Self {
        Self {
            max_attempts,
            delay,
        }
    }

    /// A single attempt, no waiting.
    pub fn once() -> Self {
        Self::new(1, Duration::ZERO)
    }

    pub(crate) fn attempts(&self) -> u32 {
        self.max_attempts.max(1)
    }
}

/// Tree walk and upload tuning.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WalkOptions {
    pub ignore: IgnoreSet,
    pub retry: RetryPolicy,
    /// Uploads in flight at once. 1 keeps the walk strictly sequential.
    pub concurrency: usize,
    /// Deepest directory level to descend into below the source root.
    /// `None` means unbounded.
    pub max_depth: Option<usize>,
}

impl Default for WalkOptions {
    fn default() -> Self {
        Self {
            ignore: IgnoreSet::default(),
            retry: RetryPolicy::default(),
            concurrency: 1,
            max_depth: Some(DEFAULT_MAX_DEPTH),
        }
    }
}

/// Deep enough for any real build output; shallow enough to stop a
/// symlink cycle.
pub const DEFAULT_MAX_DEPTH: usize = 64;

/// Everything a [`Deployer`](crate::Deployer) needs.
///
/// Built by the CLI, passed to `Deployer` -- core never reads config files.
#[derive(Debug, Clone)]
pub struct DeployConfig {
    pub endpoint: EndpointConfig,
    pub walk: WalkOptions,
    /// Polling for a freshly created site to appear in the listing.
    pub site_lookup: RetryPolicy,
    /// Provisioning values for site creation.
    pub site_defaults: SiteDefaults,
}

impl DeployConfig {
    pub fn new(endpoint: EndpointConfig) -> Self {
        Self {
            endpoint,
            walk: WalkOptions::default(),
            site_lookup: RetryPolicy::default(),
            site_defaults: SiteDefaults::default(),
        }
    }
}
