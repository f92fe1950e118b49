// 1Panel HTTP client
//
// Wraps `reqwest::Client` with `/api/v1` URL construction, per-request
// signing, and envelope unwrapping. Endpoint groups (websites, files) are
// implemented as inherent methods in separate files to keep this module
// focused on transport mechanics.

use secrecy::SecretString;
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::debug;
use url::Url;

use crate::auth::RequestSigner;
use crate::error::Error;
use crate::models::{ApiResponse, SiteDefaults};
use crate::transport::TransportConfig;

const API_PREFIX: &str = "api/v1/";
const SUCCESS_CODE: i64 = 200;

/// Async client for a 1Panel server.
///
/// Every request passes through [`send`](Self::send), which stamps it with a
/// freshly computed token and timestamp. All endpoint methods return the
/// unwrapped `data` payload -- the envelope is stripped before the caller
/// sees it.
pub struct PanelClient {
    http: reqwest::Client,
    base_url: Url,
    signer: RequestSigner,
    site_defaults: SiteDefaults,
}

impl PanelClient {
    /// Create a client from a panel URL, API key, and transport config.
    ///
    /// `base_url` is the panel root (e.g. `https://panel.example.com:8090`);
    /// `/api/v1/` is appended here.
    pub fn new(
        base_url: &str,
        api_key: SecretString,
        language: Option<&str>,
        transport: &TransportConfig,
    ) -> Result<Self, Error> {
        let http = transport.build_client()?;
        Self::with_client(http, base_url, api_key, language)
    }

    /// Create a client around a pre-built `reqwest::Client`.
    pub fn with_client(
        http: reqwest::Client,
        base_url: &str,
        api_key: SecretString,
        language: Option<&str>,
    ) -> Result<Self, Error> {
        Ok(Self {
            http,
            base_url: Self::normalize_base_url(base_url)?,
            signer: RequestSigner::new(api_key, language),
            site_defaults: SiteDefaults::default(),
        })
    }

    /// Replace the provisioning values used by [`create_website`](Self::create_website).
    pub fn with_site_defaults(mut self, defaults: SiteDefaults) -> Self {
        self.site_defaults = defaults;
        self
    }

    /// The API root, always ending in `/api/v1/`.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub(crate) fn site_defaults(&self) -> &SiteDefaults {
        &self.site_defaults
    }

    /// Append `/api/v1/` to the panel root unless it is already there.
    fn normalize_base_url(raw: &str) -> Result<Url, Error> {
        let mut url = Url::parse(raw.trim())?;
        let path = url.path().trim_end_matches('/').to_owned();

        if path.ends_with("/api/v1") {
            url.set_path(&format!("{path}/"));
        } else {
            url.set_path(&format!("{path}/{API_PREFIX}"));
        }

        Ok(url)
    }

    // ── URL builder ──────────────────────────────────────────────────

    /// Join an endpoint path (e.g. `"websites/search"`) onto the API root.
    pub(crate) fn url(&self, path: &str) -> Result<Url, Error> {
        Ok(self.base_url.join(path.trim_start_matches('/'))?)
    }

    // ── Request helpers ──────────────────────────────────────────────

    /// Sign and send a request. The single hook every call goes through.
    pub(crate) async fn send(
        &self,
        builder: reqwest::RequestBuilder,
    ) -> Result<reqwest::Response, Error> {
        let resp = self.signer.apply(builder)?.send().await?;
        Ok(resp)
    }

    /// POST a JSON body and unwrap the envelope.
    pub(crate) async fn post_json<T: DeserializeOwned>(
        &self,
        path: &str,
        body: &(impl Serialize + Sync),
    ) -> Result<Option<T>, Error> {
        let url = self.url(path)?;
        debug!("POST {url}");

        let resp = self.send(self.http.post(url).json(body)).await?;
        Self::parse_envelope(resp).await
    }

    /// POST a multipart form and unwrap the envelope.
    pub(crate) async fn post_multipart<T: DeserializeOwned>(
        &self,
        path: &str,
        form: reqwest::multipart::Form,
    ) -> Result<Option<T>, Error> {
        let url = self.url(path)?;
        debug!("POST {url} (multipart)");

        let resp = self.send(self.http.post(url).multipart(form)).await?;
        Self::parse_envelope(resp).await
    }

    /// Parse the `{ code, message, data }` envelope, returning `data` on
    /// success or `Error::Api` on a non-success status or code.
    async fn parse_envelope<T: DeserializeOwned>(
        resp: reqwest::Response,
    ) -> Result<Option<T>, Error> {
        let status = resp.status();
        let body = resp.text().await?;

        if !status.is_success() {
            let message = serde_json::from_str::<ApiResponse<serde_json::Value>>(&body)
                .ok()
                .and_then(|env| env.message)
                .filter(|m| !m.is_empty())
                .unwrap_or_else(|| preview(&body).to_owned());
            return Err(Error::Api {
                status: status.as_u16(),
                message,
            });
        }

        if body.trim().is_empty() {
            return Ok(None);
        }

        let envelope: ApiResponse<T> = serde_json::from_str(&body).map_err(|e| {
            Error::Deserialization {
                message: format!("{e} (body preview: {:?})", preview(&body)),
                body: body.clone(),
            }
        })?;

        match envelope.code {
            None | Some(SUCCESS_CODE) => Ok(envelope.data),
            Some(code) => Err(Error::Api {
                status: u16::try_from(code).unwrap_or(status.as_u16()),
                message: envelope.message.unwrap_or_else(|| format!("code={code}")),
            }),
        }
    }
}

fn preview(body: &str) -> &str {
    let mut end = body.len().min(200);
    while !body.is_char_boundary(end) {
        end -= 1;
    }
    &body[..end]
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn client(base: &str) -> PanelClient {
        PanelClient::with_client(
            reqwest::Client::new(),
            base,
            SecretString::from("key".to_owned()),
            None,
        )
        .unwrap()
    }

    #[test]
    fn base_url_gets_api_prefix() {
        assert_eq!(
            client("https://panel.local:8090").base_url().as_str(),
            "https://panel.local:8090/api/v1/"
        );
        assert_eq!(
            client("https://panel.local:8090/").base_url().as_str(),
            "https://panel.local:8090/api/v1/"
        );
    }

    #[test]
    fn base_url_with_prefix_is_kept() {
        assert_eq!(
            client("https://panel.local/entry/api/v1").base_url().as_str(),
            "https://panel.local/entry/api/v1/"
        );
    }

    #[test]
    fn endpoint_urls_join_under_prefix() {
        let c = client("https://panel.local");
        assert_eq!(
            c.url("/websites/search").unwrap().as_str(),
            "https://panel.local/api/v1/websites/search"
        );
    }

    #[test]
    fn preview_respects_char_boundaries() {
        let body = "é".repeat(150);
        assert!(preview(&body).len() <= 200);
    }
}
