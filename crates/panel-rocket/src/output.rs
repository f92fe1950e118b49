//! Output formatting: table, JSON, YAML, plain.
//!
//! Renders data in the format selected by `--output`. Table uses `tabled`,
//! structured formats use serde, plain emits one identifier per line.

use std::io::{self, IsTerminal, Write};

use owo_colors::OwoColorize;
use tabled::{Table, Tabled, settings::Style};

use panel_rocket_core::{OutcomeStatus, UploadSummary};

use crate::cli::{ColorMode, OutputFormat};

// ── Color helpers ────────────────────────────────────────────────────

/// Determine whether color output should be enabled.
pub fn should_color(mode: &ColorMode) -> bool {
    match mode {
        ColorMode::Always => true,
        ColorMode::Never => false,
        ColorMode::Auto => io::stdout().is_terminal() && std::env::var_os("NO_COLOR").is_none(),
    }
}

// ── Render dispatchers ───────────────────────────────────────────────

/// Render a list of serde-serializable + tabled items in the chosen format.
///
/// - `table`: uses the `Tabled` derive to build a pretty table
/// - `json` / `json-compact`: serializes the original data via serde
/// - `yaml`: serializes via serde_yaml
/// - `plain`: calls `id_fn` on each item to emit one identifier per line
pub fn render_list<T, R>(
    format: &OutputFormat,
    data: &[T],
    to_row: impl Fn(&T) -> R,
    id_fn: impl Fn(&T) -> String,
) -> String
where
    T: serde::Serialize,
    R: Tabled,
{
    match format {
        OutputFormat::Table => {
            let rows: Vec<R> = data.iter().map(to_row).collect();
            render_table(&rows)
        }
        OutputFormat::Json => render_json(data, false),
        OutputFormat::JsonCompact => render_json(data, true),
        OutputFormat::Yaml => render_yaml(data),
        OutputFormat::Plain => data.iter().map(&id_fn).collect::<Vec<_>>().join("\n"),
    }
}

/// Render a single serde-serializable item in the chosen format.
///
/// Table rendering uses a custom `detail_fn` that returns a pre-formatted string.
pub fn render_single<T>(
    format: &OutputFormat,
    data: &T,
    detail_fn: impl Fn(&T) -> String,
    id_fn: impl Fn(&T) -> String,
) -> String
where
    T: serde::Serialize,
{
    match format {
        OutputFormat::Table => detail_fn(data),
        OutputFormat::Json => render_json(data, false),
        OutputFormat::JsonCompact => render_json(data, true),
        OutputFormat::Yaml => render_yaml(data),
        OutputFormat::Plain => id_fn(data),
    }
}

/// Print the rendered output to stdout, respecting quiet mode.
pub fn print_output(output: &str, quiet: bool) {
    if quiet || output.is_empty() {
        return;
    }
    let mut stdout = io::stdout().lock();
    let _ = writeln!(stdout, "{output}");
}

// ── Deployment summary ───────────────────────────────────────────────

/// Human-readable deployment report: headline, counts, then one line per
/// failed file.
pub fn format_summary(domain: &str, summary: &UploadSummary, color: bool) -> String {
    use std::fmt::Write as _;

    let mut out = String::new();
    let headline = if summary.fail_count == 0 {
        "Deployed to 1Panel successfully"
    } else {
        "Deployed to 1Panel with failures"
    };
    let url = format!("https://{domain}");
    let uploaded = summary.success_count.to_string();
    let failed = summary.fail_count.to_string();

    if color {
        let headline = if summary.fail_count == 0 {
            headline.green().bold().to_string()
        } else {
            headline.yellow().bold().to_string()
        };
        let _ = writeln!(out, "{headline}");
        let _ = writeln!(out, "Website:        {}", url.cyan().underline());
        let _ = writeln!(out, "Files uploaded: {}", uploaded.green());
        if summary.fail_count > 0 {
            let _ = writeln!(out, "Files failed:   {}", failed.red());
        }
    } else {
        let _ = writeln!(out, "{headline}");
        let _ = writeln!(out, "Website:        {url}");
        let _ = writeln!(out, "Files uploaded: {uploaded}");
        if summary.fail_count > 0 {
            let _ = writeln!(out, "Files failed:   {failed}");
        }
    }

    for outcome in summary.failures() {
        if let OutcomeStatus::Failed { error } = &outcome.status {
            let _ = writeln!(out, "  {} {error}", outcome.local_path.display());
        }
    }

    out.trim_end().to_owned()
}

/// Render a deployment summary in the chosen format.
pub fn render_summary(
    format: &OutputFormat,
    domain: &str,
    summary: &UploadSummary,
    color: bool,
) -> String {
    render_single(
        format,
        summary,
        |s| format_summary(domain, s, color),
        |s| {
            s.details
                .iter()
                .map(|o| format!("{}\t{}", o.local_path.display(), status_word(&o.status)))
                .collect::<Vec<_>>()
                .join("\n")
        },
    )
}

fn status_word(status: &OutcomeStatus) -> &'static str {
    match status {
        OutcomeStatus::Uploaded { .. } => "uploaded",
        OutcomeStatus::Failed { .. } => "failed",
    }
}

// ── Format-specific renderers ────────────────────────────────────────

fn render_table<R: Tabled>(rows: &[R]) -> String {
    Table::new(rows).with(Style::rounded()).to_string()
}

/// Pretty-printed JSON.
pub(crate) fn render_json_pretty<T: serde::Serialize + ?Sized>(data: &T) -> String {
    serde_json::to_string_pretty(data).expect("serialization should not fail")
}

/// Compact single-line JSON.
pub(crate) fn render_json_compact<T: serde::Serialize + ?Sized>(data: &T) -> String {
    serde_json::to_string(data).expect("serialization should not fail")
}

fn render_json<T: serde::Serialize + ?Sized>(data: &T, compact: bool) -> String {
    if compact {
        render_json_compact(data)
    } else {
        render_json_pretty(data)
    }
}

/// YAML output.
pub(crate) fn render_yaml<T: serde::Serialize + ?Sized>(data: &T) -> String {
    serde_yaml::to_string(data).expect("serialization should not fail")
}
