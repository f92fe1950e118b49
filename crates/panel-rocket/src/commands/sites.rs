//! Website command handlers.

use tabled::Tabled;

use panel_rocket_core::{DeployConfig, Deployer, Website};

use crate::cli::{GlobalOpts, SitesArgs, SitesCommand};
use crate::error::CliError;
use crate::output;

use super::util;

// ── Table row ───────────────────────────────────────────────────────

#[derive(Tabled)]
struct SiteRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Domain")]
    domain: String,
    #[tabled(rename = "Path")]
    path: String,
    #[tabled(rename = "Group")]
    group: String,
    #[tabled(rename = "Status")]
    status: String,
}

impl From<&Website> for SiteRow {
    fn from(w: &Website) -> Self {
        Self {
            id: w.id.to_string(),
            domain: w.primary_domain.clone(),
            path: w.root_path().unwrap_or("-").to_owned(),
            group: w
                .web_site_group_id
                .map(|g| g.to_string())
                .unwrap_or_default(),
            status: w.status.clone().unwrap_or_default(),
        }
    }
}

/// Multi-line detail view for a single site.
pub(crate) fn site_detail(w: &Website) -> String {
    let row = SiteRow::from(w);
    format!(
        "Domain: {}\nPath:   {}\nGroup:  {}\nStatus: {}",
        row.domain, row.path, row.group, row.status
    )
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(
    config: DeployConfig,
    args: SitesArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let deployer = Deployer::new(config)?;
    let format = global.format();

    match args.command {
        SitesCommand::List => {
            let sites = deployer.list_sites().await?;
            let out = output::render_list(
                &format,
                &sites,
                |s| SiteRow::from(s),
                |s| s.primary_domain.clone(),
            );
            output::print_output(&out, global.quiet);
            Ok(())
        }

        SitesCommand::Create { domain } => {
            if deployer.site_by_domain(&domain).await?.is_some() {
                return Err(CliError::Validation {
                    field: "domain".into(),
                    reason: format!("website {domain} already exists"),
                });
            }

            let pb = util::spinner(format!("Creating website {domain}"), global.quiet);
            let site = deployer.create_site(&domain).await;
            pb.finish_and_clear();
            let site = site?;

            let out = output::render_single(&format, &site, site_detail, |s| {
                s.primary_domain.clone()
            });
            output::print_output(&out, global.quiet);
            Ok(())
        }
    }
}
