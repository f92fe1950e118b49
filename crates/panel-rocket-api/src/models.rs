// 1Panel request and response types
//
// Every endpoint wraps its payload in `{ "code": 200, "message": "", "data": ... }`.
// Website records carry many provisioning fields we never read; the ones we
// need are modeled explicitly and the rest land in `extra`.

use serde::{Deserialize, Serialize};

// ── Response Envelope ────────────────────────────────────────────────

/// Standard 1Panel response envelope. `code == 200` means success.
#[derive(Debug, Deserialize)]
pub struct ApiResponse<T> {
    pub code: Option<i64>,
    pub message: Option<String>,
    pub data: Option<T>,
}

/// One page of a paginated search.
#[derive(Debug, Deserialize)]
pub struct Page<T> {
    #[serde(default = "Vec::new")]
    pub items: Vec<T>,
}

// ── Website ──────────────────────────────────────────────────────────

/// A website (virtual host) record from `POST /websites/search`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Website {
    #[serde(default)]
    pub id: i64,
    pub primary_domain: String,
    #[serde(default)]
    pub alias: Option<String>,
    /// Remote filesystem root of the site.
    #[serde(default)]
    pub site_path: Option<String>,
    #[serde(default)]
    pub web_site_group_id: Option<i64>,
    #[serde(default, rename = "type")]
    pub site_type: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub remark: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl Website {
    /// The remote root, treating an empty string as absent.
    pub fn root_path(&self) -> Option<&str> {
        self.site_path.as_deref().filter(|p| !p.trim().is_empty())
    }
}

/// Body of `POST /websites/search`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WebsiteSearch {
    pub name: String,
    pub page: u32,
    pub page_size: u32,
    pub order_by: String,
    pub order: String,
    pub website_group_id: i64,
}

impl WebsiteSearch {
    /// Page size large enough that every site arrives in one response.
    pub const ALL: u32 = 999_999;

    /// Search for every site, oldest first.
    pub fn all() -> Self {
        Self {
            name: String::new(),
            page: 1,
            page_size: Self::ALL,
            order_by: "created_at".into(),
            order: "null".into(),
            website_group_id: 0,
        }
    }
}

// ── Website creation ─────────────────────────────────────────────────

/// Fixed provisioning values used when creating a static site.
///
/// Passed to the client at construction so different setups (another
/// group, another runtime) can coexist.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SiteDefaults {
    pub site_type: String,
    pub app_type: String,
    pub group_id: i64,
    pub proxy_type: String,
    pub port: u16,
    pub proxy_protocol: String,
    pub runtime_type: String,
}

impl Default for SiteDefaults {
    fn default() -> Self {
        Self {
            site_type: "static".into(),
            app_type: "installed".into(),
            group_id: 2,
            proxy_type: "tcp".into(),
            port: 9000,
            proxy_protocol: "http://".into(),
            runtime_type: "php".into(),
        }
    }
}

/// Body of `POST /websites`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateWebsite {
    pub primary_domain: String,
    #[serde(rename = "type")]
    pub site_type: String,
    pub alias: String,
    pub remark: String,
    pub app_type: String,
    pub web_site_group_id: i64,
    pub other_domains: String,
    pub proxy: String,
    pub appinstall: AppInstall,
    #[serde(rename = "IPV6")]
    pub ipv6: bool,
    pub enable_ftp: bool,
    pub ftp_user: String,
    pub ftp_password: String,
    pub proxy_type: String,
    pub port: u16,
    pub proxy_protocol: String,
    pub proxy_address: String,
    pub runtime_type: String,
}

impl CreateWebsite {
    /// Build a creation request for `domain`, aliased to itself.
    pub fn new(domain: &str, defaults: &SiteDefaults) -> Self {
        Self {
            primary_domain: domain.to_owned(),
            site_type: defaults.site_type.clone(),
            alias: domain.to_owned(),
            remark: String::new(),
            app_type: defaults.app_type.clone(),
            web_site_group_id: defaults.group_id,
            other_domains: String::new(),
            proxy: String::new(),
            appinstall: AppInstall::default(),
            ipv6: false,
            enable_ftp: false,
            ftp_user: String::new(),
            ftp_password: String::new(),
            proxy_type: defaults.proxy_type.clone(),
            port: defaults.port,
            proxy_protocol: defaults.proxy_protocol.clone(),
            proxy_address: String::new(),
            runtime_type: defaults.runtime_type.clone(),
        }
    }
}

/// App installation block. Always empty for static sites.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AppInstall {
    pub app_id: i64,
    pub name: String,
    pub app_detail_id: i64,
    pub params: serde_json::Map<String, serde_json::Value>,
    pub version: String,
    pub appkey: String,
    pub advanced: bool,
    pub cpu_quota: i64,
    pub memory_limit: i64,
    pub memory_unit: String,
    pub container_name: String,
    pub allow_port: bool,
}

impl Default for AppInstall {
    fn default() -> Self {
        Self {
            app_id: 0,
            name: String::new(),
            app_detail_id: 0,
            params: serde_json::Map::new(),
            version: String::new(),
            appkey: String::new(),
            advanced: false,
            cpu_quota: 0,
            memory_limit: 0,
            memory_unit: "MB".into(),
            container_name: String::new(),
            allow_port: false,
        }
    }
}
