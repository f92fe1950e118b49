//! Clap derive structures for the `panel-rocket` CLI.
//!
//! Defines the command tree, global flags, and shared types.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

// ── Top-Level CLI ────────────────────────────────────────────────────

/// panel-rocket -- deploy static websites to 1Panel
#[derive(Debug, Parser)]
#[command(
    name = "panel-rocket",
    version,
    about = "Deploy a static website build directory to 1Panel",
    long_about = "Uploads a local static site build to a 1Panel-managed website.\n\n\
        Finds (or creates) the website by domain, then mirrors the build\n\
        directory into the site's index directory, retrying failed files.",
    propagate_version = true,
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalOpts,

    #[command(subcommand)]
    pub command: Command,
}

// ── Global Options ───────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct GlobalOpts {
    /// Configuration profile to use
    #[arg(long, env = "PANEL_ROCKET_PROFILE", global = true)]
    pub profile: Option<String>,

    /// 1Panel base URL (overrides profile)
    #[arg(long, short = 'e', env = "ONEPANEL_BASE_URL", global = true)]
    pub base_url: Option<String>,

    /// 1Panel API key (overrides profile)
    #[arg(
        long,
        short = 'a',
        env = "ONEPANEL_API_KEY",
        global = true,
        hide_env_values = true
    )]
    pub api_key: Option<String>,

    /// Accept-Language sent to the panel
    #[arg(long, env = "ONEPANEL_LANGUAGE", global = true)]
    pub language: Option<String>,

    /// Output format [default: table]
    #[arg(long, short = 'o', env = "PANEL_ROCKET_OUTPUT", global = true)]
    pub output: Option<OutputFormat>,

    /// When to use color output
    #[arg(long, default_value = "auto", global = true)]
    pub color: ColorMode,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(long, short = 'v', action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Skip all prompts (create missing websites without asking)
    #[arg(long, short = 'y', global = true)]
    pub yes: bool,

    /// Accept self-signed TLS certificates
    #[arg(long, short = 'k', env = "ONEPANEL_INSECURE", global = true)]
    pub insecure: bool,

    /// Request timeout in seconds [default: 30]
    #[arg(long, env = "ONEPANEL_TIMEOUT", global = true)]
    pub timeout: Option<u64>,
}

impl GlobalOpts {
    /// The selected output format, falling back to a table.
    pub fn format(&self) -> OutputFormat {
        self.output.clone().unwrap_or(OutputFormat::Table)
    }
}

// ── Output & Color Enums ─────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Pretty table (default, interactive)
    Table,
    /// Pretty-printed JSON
    Json,
    /// Compact single-line JSON
    JsonCompact,
    /// YAML
    Yaml,
    /// Plain text, one value per line (scripting)
    Plain,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum ColorMode {
    /// Auto-detect (color if terminal is interactive)
    Auto,
    /// Always emit color codes
    Always,
    /// Never emit color codes
    Never,
}

// ── Top-Level Command Enum ───────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Upload a build directory to a website
    Deploy(DeployArgs),

    /// List and create websites
    Sites(SitesArgs),

    /// Manage CLI configuration and profiles
    Config(ConfigArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

// ── Deploy ───────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct DeployArgs {
    /// Path to the static website build directory
    #[arg(long, short = 'p')]
    pub path: PathBuf,

    /// Domain of the target website (prompts when omitted)
    #[arg(long, short = 'd')]
    pub domain: Option<String>,

    /// Files uploaded at once
    #[arg(long, value_parser = clap::value_parser!(u16).range(1..=64))]
    pub concurrency: Option<u16>,

    /// Upload attempts per file, including the first
    #[arg(long, value_parser = clap::value_parser!(u32).range(1..=20))]
    pub retries: Option<u32>,

    /// Pause between attempts, in milliseconds
    #[arg(long)]
    pub retry_delay_ms: Option<u64>,

    /// Extra pattern to skip (repeatable); matches substrings or file names
    #[arg(long = "ignore", value_name = "PATTERN")]
    pub ignore: Vec<String>,
}

// ── Sites ────────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct SitesArgs {
    #[command(subcommand)]
    pub command: SitesCommand,
}

#[derive(Debug, Subcommand)]
pub enum SitesCommand {
    /// List websites
    #[command(alias = "ls")]
    List,

    /// Create a static website
    Create {
        /// Primary domain of the new website
        domain: String,
    },
}

// ── Config ───────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Interactive configuration wizard
    Init,

    /// Show the current configuration (secrets redacted)
    Show,

    /// Print the configuration file path
    Path,
}

// ── Completions ──────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    pub shell: clap_complete::Shell,
}
