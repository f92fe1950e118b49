//! Command dispatch: bridges CLI args -> core `Deployer` -> output formatting.

pub mod config_cmd;
pub mod deploy;
pub mod sites;
pub mod util;

use panel_rocket_core::DeployConfig;

use crate::cli::{Command, GlobalOpts};
use crate::error::CliError;

/// Dispatch a panel-bound command to the appropriate handler.
pub async fn dispatch(
    cmd: Command,
    config: DeployConfig,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match cmd {
        Command::Deploy(args) => deploy::handle(config, args, global).await,
        Command::Sites(args) => sites::handle(config, args, global).await,
        // Config and Completions are handled before dispatch
        Command::Config(_) | Command::Completions(_) => unreachable!(),
    }
}
