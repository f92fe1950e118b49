// ── Deployer ──
//
// Owns the panel client and the runtime configuration. Site lookup and
// creation live here alongside the deployment itself, since both need the
// same client.

use std::path::Path;

use panel_rocket_api::transport::{TlsMode, TransportConfig};
use panel_rocket_api::{PanelClient, Website};
use tracing::{debug, info};

use crate::config::{DeployConfig, TlsVerification};
use crate::error::CoreError;
use crate::summary::UploadSummary;
use crate::walker::TreeWalker;

/// Sub-directory of a site's path that the web server serves.
pub const SITE_INDEX_DIR: &str = "index";

/// Entry point for everything that talks to a panel.
pub struct Deployer {
    client: PanelClient,
    config: DeployConfig,
}

impl Deployer {
    /// Build an HTTP client for `config.endpoint`. Nothing is sent yet.
    pub fn new(config: DeployConfig) -> Result<Self, CoreError> {
        let transport = TransportConfig {
            tls: tls_to_transport(&config.endpoint.tls),
            timeout: config.endpoint.timeout,
        };
        let client = PanelClient::new(
            config.endpoint.url.as_str(),
            config.endpoint.api_key.clone(),
            config.endpoint.language.as_deref(),
            &transport,
        )?
        .with_site_defaults(config.site_defaults.clone());

        Ok(Self { client, config })
    }

    // ── Site directory ───────────────────────────────────────────────

    /// Every site on the panel, in server order.
    pub async fn list_sites(&self) -> Result<Vec<Website>, CoreError> {
        Ok(self.client.list_websites().await?)
    }

    /// The first site whose primary domain equals `domain`, if any.
    pub async fn site_by_domain(&self, domain: &str) -> Result<Option<Website>, CoreError> {
        Ok(self.client.find_website(domain).await?)
    }

    /// Create a static site for `domain` and return its record.
    ///
    /// The panel does not echo the new record, so the listing is polled
    /// according to `site_lookup` until the site shows up.
    pub async fn create_site(&self, domain: &str) -> Result<Website, CoreError> {
        info!("Creating website: {domain}");
        self.client.create_website(domain).await?;

        let policy = &self.config.site_lookup;
        let attempts = policy.attempts();
        for attempt in 1..=attempts {
            if let Some(site) = self.client.find_website(domain).await? {
                info!("Website created: {domain}");
                return Ok(site);
            }
            debug!(domain, attempt, "created site not listed yet");
            if attempt < attempts {
                tokio::time::sleep(policy.delay).await;
            }
        }

        Err(CoreError::SiteNotFoundAfterCreate {
            domain: domain.to_owned(),
            attempts,
        })
    }

    // ── Deployment ───────────────────────────────────────────────────

    /// Upload the contents of `source` into the `index` directory of the
    /// site for `domain`.
    ///
    /// Individual file failures are reported in the summary; anything that
    /// prevents the walk from starting or finishing is an error.
    pub async fn deploy(&self, domain: &str, source: &Path) -> Result<UploadSummary, CoreError> {
        let site = self
            .site_by_domain(domain)
            .await?
            .ok_or_else(|| CoreError::SiteNotFound {
                domain: domain.to_owned(),
            })?;

        let site_path = site
            .root_path()
            .ok_or_else(|| CoreError::config(format!("Website {domain} has no site path")))?;

        let is_dir = tokio::fs::metadata(source)
            .await
            .map(|m| m.is_dir())
            .unwrap_or(false);
        if !is_dir {
            return Err(CoreError::config(format!(
                "Build directory not found: {}",
                source.display()
            )));
        }

        let remote_root = site_root(site_path);
        info!("Website root directory: {remote_root}");

        let outcomes = TreeWalker::new(&self.client, &self.config.walk)
            .walk(source, &remote_root)
            .await?;
        let summary = UploadSummary::from_outcomes(outcomes);

        info!(
            "Deployment completed: {} succeeded, {} failed, {} total",
            summary.success_count, summary.fail_count, summary.total_files
        );
        Ok(summary)
    }
}

/// Remote directory uploads land in for a site at `site_path`.
pub fn site_root(site_path: &str) -> String {
    format!("{}/{SITE_INDEX_DIR}", site_path.trim_end_matches('/'))
}

fn tls_to_transport(tls: &TlsVerification) -> TlsMode {
    match tls {
        TlsVerification::SystemDefaults => TlsMode::System,
        TlsVerification::CustomCa(path) => TlsMode::CustomCa(path.clone()),
        TlsVerification::DangerAcceptInvalid => TlsMode::DangerAcceptInvalid,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn site_root_appends_index() {
        assert_eq!(site_root("/www/sites/x.com"), "/www/sites/x.com/index");
        assert_eq!(site_root("/www/sites/x.com/"), "/www/sites/x.com/index");
    }

    #[test]
    fn tls_modes_map_one_to_one() {
        assert!(matches!(
            tls_to_transport(&TlsVerification::SystemDefaults),
            TlsMode::System
        ));
        assert!(matches!(
            tls_to_transport(&TlsVerification::DangerAcceptInvalid),
            TlsMode::DangerAcceptInvalid
        ));
    }
}
