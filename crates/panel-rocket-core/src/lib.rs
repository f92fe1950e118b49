// panel-rocket-core: Deployment logic between the 1Panel API client and consumers.
//
// Resolves target sites, walks a local build directory, and uploads every
// file with retry. The CLI builds a `DeployConfig` and drives a `Deployer`.

pub mod config;
pub mod deployer;
pub mod error;
pub mod ignore;
pub mod summary;
pub mod upload;
pub mod walker;

// ── Primary re-exports ──────────────────────────────────────────────
pub use config::{
    DEFAULT_MAX_DEPTH, DeployConfig, EndpointConfig, RetryPolicy, TlsVerification, WalkOptions,
};
pub use deployer::{Deployer, site_root};
pub use error::CoreError;
pub use ignore::{DEFAULT_IGNORE_PATTERNS, IgnoreSet};
pub use summary::{OutcomeStatus, UploadOutcome, UploadSummary};
pub use upload::{FileUploader, upload_with_retry};
pub use walker::{TreeWalker, UploadJob, remote_dir};

// Types consumers need without depending on the API crate directly.
pub use panel_rocket_api::{SiteDefaults, Website};
