//! Deploy command handler.

use std::time::Duration;

use dialoguer::Select;
use tracing::debug;

use panel_rocket_core::{DeployConfig, Deployer, WalkOptions};

use crate::cli::{DeployArgs, GlobalOpts};
use crate::error::CliError;
use crate::output;

use super::util;

/// Layer `deploy` flags over the configured walk options.
fn apply_args(walk: &mut WalkOptions, args: &DeployArgs) {
    if let Some(n) = args.concurrency {
        walk.concurrency = usize::from(n);
    }
    if let Some(n) = args.retries {
        walk.retry.max_attempts = n;
    }
    if let Some(ms) = args.retry_delay_ms {
        walk.retry.delay = Duration::from_millis(ms);
    }
    if !args.ignore.is_empty() {
        walk.ignore = walk.ignore.extended(args.ignore.iter().cloned());
    }
}

/// Ask the user to pick one of the panel's websites.
async fn select_site(deployer: &Deployer, yes: bool) -> Result<String, CliError> {
    if yes || !util::is_interactive() {
        return Err(CliError::NonInteractive {
            action: "select a website (pass --domain)".into(),
        });
    }

    let sites = deployer.list_sites().await?;
    if sites.is_empty() {
        return Err(CliError::Validation {
            field: "domain".into(),
            reason: "no websites found; pass --domain to create one".into(),
        });
    }

    let domains: Vec<&str> = sites.iter().map(|s| s.primary_domain.as_str()).collect();
    let choice = Select::new()
        .with_prompt("Select a website")
        .items(&domains)
        .default(0)
        .interact_opt()
        .map_err(util::prompt_err)?;

    choice
        .and_then(|i| domains.get(i))
        .map(|d| (*d).to_owned())
        .ok_or_else(|| CliError::Validation {
            field: "domain".into(),
            reason: "no website selected".into(),
        })
}

pub async fn handle(
    mut config: DeployConfig,
    args: DeployArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    // Fail fast, before any request goes out.
    if !args.path.is_dir() {
        return Err(CliError::Validation {
            field: "path".into(),
            reason: format!("build directory {} does not exist", args.path.display()),
        });
    }

    apply_args(&mut config.walk, &args);
    debug!(walk = ?config.walk, "deploy options");
    let deployer = Deployer::new(config)?;

    let domain = match args.domain {
        Some(domain) => domain,
        None => select_site(&deployer, global.yes).await?,
    };

    if deployer.site_by_domain(&domain).await?.is_none() {
        if !util::confirm(
            &format!("Website {domain} not found, create it?"),
            global.yes,
        )? {
            return Err(CliError::site_not_found(domain));
        }
        let pb = util::spinner(format!("Creating website {domain}"), global.quiet);
        let created = deployer.create_site(&domain).await;
        pb.finish_and_clear();
        created?;
    }

    let pb = util::spinner(
        format!("Uploading {} to {domain}", args.path.display()),
        global.quiet,
    );
    let summary = deployer.deploy(&domain, &args.path).await;
    pb.finish_and_clear();
    let summary = summary?;

    let color = output::should_color(&global.color);
    let out = output::render_summary(&global.format(), &domain, &summary, color);
    output::print_output(&out, global.quiet);
    Ok(())
}
