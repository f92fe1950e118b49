//! CLI configuration -- thin wrapper around `panel_rocket_config`.
//!
//! Re-exports the shared types and adds resolution that respects
//! `GlobalOpts` flag overrides (--base-url, --api-key, etc.).

use std::time::Duration;

use secrecy::SecretString;

use panel_rocket_core::{DeployConfig, EndpointConfig};

use crate::cli::{GlobalOpts, OutputFormat};
use crate::error::CliError;

// ── Re-exports from shared crate ────────────────────────────────────

pub use panel_rocket_config::{
    Config, Defaults, Profile, config_path, load_config, load_config_file, save_config,
};

// ── CLI-specific helpers ────────────────────────────────────────────

/// Resolve the active profile name from CLI flags and config.
pub fn active_profile_name(global: &GlobalOpts, config: &Config) -> String {
    global
        .profile
        .clone()
        .or_else(|| config.default_profile.clone())
        .unwrap_or_else(|| "default".into())
}

/// Fill unset global options from `[defaults]`.
pub fn apply_defaults(global: &mut GlobalOpts, defaults: &Defaults) {
    if global.output.is_none() {
        global.output = parse_output(&defaults.output);
    }
}

fn parse_output(raw: &str) -> Option<OutputFormat> {
    use clap::ValueEnum;
    OutputFormat::from_str(raw, true).ok()
}

/// Build a `DeployConfig` from the config file, active profile, and flags.
///
/// With no matching profile, `--base-url` and `--api-key` (or their env
/// vars) are enough on their own.
pub fn build_deploy_config(global: &GlobalOpts, cfg: &Config) -> Result<DeployConfig, CliError> {
    let profile_name = active_profile_name(global, cfg);

    if let Some(profile) = cfg.profiles.get(&profile_name) {
        return resolve_profile(profile, &profile_name, global, &cfg.defaults);
    }

    // An explicitly requested profile must exist.
    if global.profile.is_some() && global.base_url.is_none() {
        let mut available: Vec<_> = cfg.profiles.keys().cloned().collect();
        available.sort();
        return Err(CliError::ProfileNotFound {
            name: profile_name,
            available: if available.is_empty() {
                "(none)".into()
            } else {
                available.join(", ")
            },
        });
    }

    let url_str = global.base_url.as_deref().ok_or_else(|| CliError::NoConfig {
        path: config_path().display().to_string(),
    })?;
    let url = panel_rocket_config::parse_base_url(url_str)?;

    let api_key = global
        .api_key
        .as_ref()
        .filter(|k| !k.trim().is_empty())
        .map(|k| SecretString::from(k.clone()))
        .ok_or(CliError::NoCredentials {
            profile: profile_name,
        })?;

    let mut endpoint = EndpointConfig::new(url, api_key);
    endpoint.language = global.language.clone().or_else(|| cfg.defaults.language.clone());
    endpoint.tls = panel_rocket_config::tls_verification(
        global.insecure || cfg.defaults.insecure,
        None,
    );
    endpoint.timeout = Duration::from_secs(global.timeout.unwrap_or(cfg.defaults.timeout));

    let mut config = DeployConfig::new(endpoint);
    config.walk = panel_rocket_config::walk_options(&cfg.defaults, &[]);
    Ok(config)
}

/// Translate a `Profile` + global flags into a `DeployConfig`.
///
/// CLI flag overrides take priority over profile values.
pub fn resolve_profile(
    profile: &Profile,
    profile_name: &str,
    global: &GlobalOpts,
    defaults: &Defaults,
) -> Result<DeployConfig, CliError> {
    // 1. Base URL (flag > env > profile)
    let url_str = global.base_url.as_deref().unwrap_or(&profile.base_url);
    let url = panel_rocket_config::parse_base_url(url_str)?;

    // 2. API key (flag > env > profile chain)
    let api_key = resolve_api_key_with_flag(profile, profile_name, global)?;

    // 3. TLS verification
    let tls = panel_rocket_config::tls_verification(
        global.insecure || profile.insecure.unwrap_or(defaults.insecure),
        profile.ca_cert.as_deref(),
    );

    // 4. Timeout (flag > profile > defaults)
    let timeout = Duration::from_secs(
        global
            .timeout
            .or(profile.timeout)
            .unwrap_or(defaults.timeout),
    );

    let mut endpoint = EndpointConfig::new(url, api_key);
    endpoint.language = global
        .language
        .clone()
        .or_else(|| profile.language.clone())
        .or_else(|| defaults.language.clone());
    endpoint.tls = tls;
    endpoint.timeout = timeout;

    let mut config = DeployConfig::new(endpoint);
    config.walk = panel_rocket_config::walk_options(defaults, &profile.ignore);
    Ok(config)
}

/// Resolve API key with CLI flag override, then fall through to shared resolution.
fn resolve_api_key_with_flag(
    profile: &Profile,
    profile_name: &str,
    global: &GlobalOpts,
) -> Result<SecretString, CliError> {
    // CLI flag takes priority
    if let Some(ref key) = global.api_key {
        return Ok(SecretString::from(key.clone()));
    }
    Ok(panel_rocket_config::resolve_api_key(profile, profile_name)?)
}
