//! Configuration for panel-rocket.
//!
//! TOML profiles, credential resolution (env + keyring + plaintext),
//! and the pieces of `panel_rocket_core::DeployConfig` that come from
//! config. The CLI layers its flag overrides on top.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use url::Url;

use panel_rocket_core::{IgnoreSet, RetryPolicy, TlsVerification, WalkOptions};

/// Keyring service name under which API keys are stored.
pub const KEYRING_SERVICE: &str = "panel-rocket";

/// Prefix for environment overrides, e.g. `PANEL_ROCKET_DEFAULTS__TIMEOUT=60`.
pub const ENV_PREFIX: &str = "PANEL_ROCKET_";

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("no API key configured for profile '{profile}'")]
    NoCredentials { profile: String },

    #[error("failed to serialize config: {0}")]
    Serialization(#[from] toml::ser::Error),

    #[error("config loading failed: {0}")]
    Figment(Box<figment::Error>),

    #[error("keyring error: {0}")]
    Keyring(#[from] keyring::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

// ── TOML config structs ─────────────────────────────────────────────

/// Top-level TOML configuration.
#[derive(Debug, Deserialize, Serialize)]
pub struct Config {
    /// Default profile name.
    pub default_profile: Option<String>,

    /// Global defaults.
    #[serde(default)]
    pub defaults: Defaults,

    /// Named panel profiles.
    #[serde(default)]
    pub profiles: HashMap<String, Profile>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_profile: Some("default".into()),
            defaults: Defaults::default(),
            profiles: HashMap::new(),
        }
    }
}

#[derive(Debug, Deserialize, Serialize)]
pub struct Defaults {
    #[serde(default = "default_output")]
    pub output: String,

    #[serde(default)]
    pub insecure: bool,

    #[serde(default = "default_timeout")]
    pub timeout: u64,

    /// `Accept-Language` sent to the panel.
    #[serde(default)]
    pub language: Option<String>,

    /// Upload attempts per file, including the first.
    #[serde(default = "default_retry_attempts")]
    pub retry_attempts: u32,

    #[serde(default = "default_retry_delay_ms")]
    pub retry_delay_ms: u64,

    /// Uploads in flight at once.
    #[serde(default = "default_concurrency")]
    pub concurrency: usize,
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            output: default_output(),
            insecure: false,
            timeout: default_timeout(),
            language: None,
            retry_attempts: default_retry_attempts(),
            retry_delay_ms: default_retry_delay_ms(),
            concurrency: default_concurrency(),
        }
    }
}

fn default_output() -> String {
    "table".into()
}
fn default_timeout() -> u64 {
    30
}
fn default_retry_attempts() -> u32 {
    3
}
fn default_retry_delay_ms() -> u64 {
    1000
}
fn default_concurrency() -> usize {
    1
}

/// A named panel profile.
#[derive(Debug, Default, Deserialize, Serialize)]
pub struct Profile {
    /// Panel base URL (e.g., "https://panel.example.com:8090").
    pub base_url: String,

    /// API key (plaintext -- prefer keyring or env var).
    pub api_key: Option<String>,

    /// Environment variable name containing the API key.
    pub api_key_env: Option<String>,

    /// Override `Accept-Language`.
    pub language: Option<String>,

    /// Path to custom CA certificate.
    pub ca_cert: Option<PathBuf>,

    /// Override insecure TLS setting.
    pub insecure: Option<bool>,

    /// Override timeout.
    pub timeout: Option<u64>,

    /// Extra ignore patterns, added to the built-in ones.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub ignore: Vec<String>,
}

// ── Config file path ────────────────────────────────────────────────

/// Resolve the config file path via XDG / platform conventions.
pub fn config_path() -> PathBuf {
    ProjectDirs::from("dev", "panel-rocket", "panel-rocket").map_or_else(
        || {
            let mut p = dirs_fallback();
            p.push("config.toml");
            p
        },
        |dirs| dirs.config_dir().join("config.toml"),
    )
}

fn dirs_fallback() -> PathBuf {
    let mut p = PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".into()));
    p.push(".config");
    p.push("panel-rocket");
    p
}

// ── Config loading ──────────────────────────────────────────────────

/// Load the full Config from file + environment.
pub fn load_config() -> Result<Config, ConfigError> {
    load_config_from(&config_path())
}

/// Load from an explicit file path. A missing file yields the defaults.
pub fn load_config_from(path: &Path) -> Result<Config, ConfigError> {
    let figment = Figment::new()
        .merge(Serialized::defaults(Config::default()))
        .merge(Toml::file(path))
        .merge(Env::prefixed(ENV_PREFIX).split("__"));

    let config: Config = figment.extract()?;
    Ok(config)
}

/// Load only what is on disk, without `PANEL_ROCKET_` overrides. Use this
/// before editing and saving the file.
pub fn load_config_file() -> Result<Config, ConfigError> {
    load_config_file_from(&config_path())
}

pub fn load_config_file_from(path: &Path) -> Result<Config, ConfigError> {
    let config: Config = Figment::new()
        .merge(Serialized::defaults(Config::default()))
        .merge(Toml::file(path))
        .extract()?;
    Ok(config)
}

// ── Config saving ───────────────────────────────────────────────────

/// Serialize config to TOML and write to the canonical config path.
pub fn save_config(cfg: &Config) -> Result<(), ConfigError> {
    save_config_to(cfg, &config_path())
}

pub fn save_config_to(cfg: &Config, path: &Path) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let toml_str = toml::to_string_pretty(cfg)?;
    std::fs::write(path, toml_str)?;
    Ok(())
}

// ── Credential resolution (without CLI flags) ───────────────────────

fn keyring_entry(profile_name: &str) -> Result<keyring::Entry, keyring::Error> {
    keyring::Entry::new(KEYRING_SERVICE, &format!("{profile_name}/api-key"))
}

/// Store an API key in the system keyring for `profile_name`.
pub fn store_api_key(profile_name: &str, api_key: &str) -> Result<(), ConfigError> {
    keyring_entry(profile_name)?.set_password(api_key)?;
    Ok(())
}

/// Resolve an API key from the credential chain (no CLI flag step).
pub fn resolve_api_key(profile: &Profile, profile_name: &str) -> Result<SecretString, ConfigError> {
    resolve_api_key_with(
        profile,
        profile_name,
        |name| std::env::var(name).ok(),
        |name| keyring_entry(name).and_then(|e| e.get_password()).ok(),
    )
}

/// Credential chain with injectable env and keyring lookups.
///
/// Order: profile `api_key_env` → keyring → plaintext `api_key`.
pub fn resolve_api_key_with<E, K>(
    profile: &Profile,
    profile_name: &str,
    env: E,
    keyring: K,
) -> Result<SecretString, ConfigError>
where
    E: Fn(&str) -> Option<String>,
    K: Fn(&str) -> Option<String>,
{
    // 1. Profile's api_key_env → env var lookup
    if let Some(val) = profile.api_key_env.as_deref().and_then(&env) {
        return Ok(SecretString::from(val));
    }

    // 2. System keyring
    if let Some(secret) = keyring(profile_name) {
        return Ok(SecretString::from(secret));
    }

    // 3. Plaintext in config
    if let Some(ref key) = profile.api_key {
        return Ok(SecretString::from(key.clone()));
    }

    Err(ConfigError::NoCredentials {
        profile: profile_name.into(),
    })
}

// ── Translation to core types ───────────────────────────────────────

/// Parse a panel base URL, requiring http or https.
pub fn parse_base_url(raw: &str) -> Result<Url, ConfigError> {
    let url: Url = raw.trim().parse().map_err(|_| ConfigError::Validation {
        field: "base_url".into(),
        reason: format!("invalid URL: {raw}"),
    })?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(ConfigError::Validation {
            field: "base_url".into(),
            reason: format!("expected an http(s) URL, got: {raw}"),
        });
    }
    Ok(url)
}

/// Walk and retry tuning from `[defaults]`, plus a profile's extra ignores.
pub fn walk_options(defaults: &Defaults, extra_ignore: &[String]) -> WalkOptions {
    WalkOptions {
        ignore: IgnoreSet::default().extended(extra_ignore.iter().cloned()),
        retry: RetryPolicy::new(
            defaults.retry_attempts,
            Duration::from_millis(defaults.retry_delay_ms),
        ),
        concurrency: defaults.concurrency.max(1),
        ..WalkOptions::default()
    }
}

/// TLS mode for a profile: insecure beats a custom CA, which beats the
/// system store.
pub fn tls_verification(insecure: bool, ca_cert: Option<&Path>) -> TlsVerification {
    if insecure {
        TlsVerification::DangerAcceptInvalid
    } else if let Some(ca_path) = ca_cert {
        TlsVerification::CustomCa(ca_path.to_path_buf())
    } else {
        TlsVerification::SystemDefaults
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use secrecy::ExposeSecret;

    use super::*;

    fn no_lookup(_: &str) -> Option<String> {
        None
    }

    fn profile(toml_src: &str) -> Profile {
        toml::from_str(toml_src).unwrap()
    }

    #[test]
    fn api_key_env_wins_over_keyring_and_plaintext() {
        let p = profile(
            r#"
            base_url = "https://panel.example.com"
            api_key = "plain"
            api_key_env = "MY_PANEL_KEY"
            "#,
        );

        let key = resolve_api_key_with(
            &p,
            "prod",
            |name| (name == "MY_PANEL_KEY").then(|| "from-env".to_owned()),
            |_| Some("from-keyring".to_owned()),
        )
        .unwrap();
        assert_eq!(key.expose_secret(), "from-env");
    }

    #[test]
    fn keyring_is_looked_up_by_profile_name() {
        let p = profile(r#"base_url = "https://panel.example.com""#);

        let key = resolve_api_key_with(&p, "staging", no_lookup, |name| {
            (name == "staging").then(|| "from-keyring".to_owned())
        })
        .unwrap();
        assert_eq!(key.expose_secret(), "from-keyring");
    }

    #[test]
    fn plaintext_is_the_last_resort() {
        let p = profile(
            r#"
            base_url = "https://panel.example.com"
            api_key = "plain"
            api_key_env = "UNSET_VAR"
            "#,
        );

        let key = resolve_api_key_with(&p, "default", no_lookup, no_lookup).unwrap();
        assert_eq!(key.expose_secret(), "plain");
    }

    #[test]
    fn missing_key_names_the_profile() {
        let p = profile(r#"base_url = "https://panel.example.com""#);

        let err = resolve_api_key_with(&p, "prod", no_lookup, no_lookup).unwrap_err();
        assert!(matches!(err, ConfigError::NoCredentials { ref profile } if profile == "prod"));
    }

    #[test]
    fn base_url_must_be_http() {
        assert!(parse_base_url("https://panel.example.com:8090").is_ok());
        assert!(parse_base_url("not a url").is_err());
        assert!(matches!(
            parse_base_url("ftp://panel.example.com"),
            Err(ConfigError::Validation { .. })
        ));
    }

    #[test]
    fn walk_options_merge_ignores_and_retry() {
        let defaults = Defaults {
            retry_attempts: 5,
            retry_delay_ms: 250,
            concurrency: 0,
            ..Defaults::default()
        };
        let opts = walk_options(&defaults, &[".DS_Store".to_owned()]);

        assert_eq!(opts.retry, RetryPolicy::new(5, Duration::from_millis(250)));
        assert_eq!(opts.concurrency, 1);
        assert!(opts.ignore.should_ignore("img/.DS_Store"));
        assert!(opts.ignore.should_ignore("node_modules/x.js"));
    }

    #[test]
    fn tls_precedence() {
        let ca = Path::new("/etc/ca.pem");
        assert_eq!(
            tls_verification(true, Some(ca)),
            TlsVerification::DangerAcceptInvalid
        );
        assert_eq!(
            tls_verification(false, Some(ca)),
            TlsVerification::CustomCa(ca.to_path_buf())
        );
        assert_eq!(tls_verification(false, None), TlsVerification::SystemDefaults);
    }

    #[test]
    fn load_from_file_layers_over_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            r#"
            default_profile = "prod"

            [defaults]
            timeout = 90

            [profiles.prod]
            base_url = "https://panel.example.com:8090"
            api_key = "abc"
            ignore = ["*.map"]
            "#,
        )
        .unwrap();

        let cfg = load_config_from(&path).unwrap();

        assert_eq!(cfg.default_profile.as_deref(), Some("prod"));
        assert_eq!(cfg.defaults.timeout, 90);
        assert_eq!(cfg.defaults.retry_attempts, 3);
        assert_eq!(cfg.defaults.output, "table");
        let prod = &cfg.profiles["prod"];
        assert_eq!(prod.base_url, "https://panel.example.com:8090");
        assert_eq!(prod.ignore, ["*.map"]);
    }

    #[test]
    fn missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = load_config_from(&dir.path().join("absent.toml")).unwrap();
        assert_eq!(cfg.default_profile.as_deref(), Some("default"));
        assert!(cfg.profiles.is_empty());
    }

    #[test]
    fn save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested/config.toml");
        let mut cfg = Config::default();
        cfg.profiles.insert(
            "default".into(),
            Profile {
                base_url: "https://p.example.com".into(),
                ..Profile::default()
            },
        );

        save_config_to(&cfg, &path).unwrap();
        let loaded = load_config_from(&path).unwrap();

        assert_eq!(loaded.profiles["default"].base_url, "https://p.example.com");
    }

    #[test]
    fn malformed_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[profiles.prod\nbase_url = ").unwrap();

        assert!(matches!(load_config_from(&path), Err(ConfigError::Figment(_))));
        assert!(matches!(
            load_config_file_from(&path),
            Err(ConfigError::Figment(_))
        ));
    }
}
