// Website endpoints
//
// 1Panel exposes listing only through a paginated search; we always ask for
// one oversized page so callers get the full, creation-ordered list.

use tracing::debug;

use crate::client::PanelClient;
use crate::error::Error;
use crate::models::{CreateWebsite, Page, Website, WebsiteSearch};

impl PanelClient {
    /// List every website on the panel, oldest first.
    ///
    /// `POST /websites/search` with a single page of [`WebsiteSearch::all`].
    pub async fn list_websites(&self) -> Result<Vec<Website>, Error> {
        debug!("listing websites");
        let page: Option<Page<Website>> = self
            .post_json("websites/search", &WebsiteSearch::all())
            .await?;
        Ok(page.map(|p| p.items).unwrap_or_default())
    }

    /// Find the first website whose primary domain equals `domain` exactly.
    ///
    /// Returns `Ok(None)` when no site matches. Lists every site, so this is
    /// linear in the number of sites.
    pub async fn find_website(&self, domain: &str) -> Result<Option<Website>, Error> {
        let sites = self.list_websites().await?;
        Ok(sites.into_iter().find(|w| w.primary_domain == domain))
    }

    /// Create a static website for `domain` using the client's [`SiteDefaults`](crate::SiteDefaults).
    ///
    /// `POST /websites`. The response carries no record; look the site up
    /// afterwards to get its path.
    pub async fn create_website(&self, domain: &str) -> Result<(), Error> {
        debug!(domain, "creating website");
        let body = CreateWebsite::new(domain, self.site_defaults());
        let _: Option<serde_json::Value> = self.post_json("websites", &body).await?;
        Ok(())
    }
}
