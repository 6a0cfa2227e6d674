//! Flood-risk dashboard tool: scores every site in a CSV table with a
//! random forest and writes an interactive Leaflet map as one HTML file.
//!
//! Diagnostics go to stderr and are filtered by RUST_LOG (default `warn`).

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use flood_core::export::success_message;
use flood_core::{DashboardConfig, DashboardPipeline};
use tracing::info;
use tracing_subscriber::EnvFilter;

// ── CLI ──────────────────────────────────────────────────────────────────────

#[derive(Parser, Debug)]
#[command(
    name = "dashboard",
    about = "Build a flood-risk heatmap dashboard with clickable, filterable markers"
)]
struct Args {
    /// Input CSV table [default: elev_flood_rain_merged.csv]
    #[arg(long)]
    input: Option<PathBuf>,

    /// Output HTML file, overwritten if present [default: flood_risk_dashboard_clickable.html]
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Target column the forest is fitted on [default: WNTW_RISKV]
    #[arg(long)]
    target: Option<String>,

    /// JSON configuration file; the flags above override it
    #[arg(long)]
    config: Option<PathBuf>,

    /// Print a JSON run summary on stderr
    #[arg(long)]
    summary: bool,
}

impl Args {
    fn resolve_config(&self) -> Result<DashboardConfig> {
        let mut config = match &self.config {
            Some(path) => DashboardConfig::from_json_file(path)
                .with_context(|| format!("Cannot load config {}", path.display()))?,
            None => DashboardConfig::default(),
        };
        if let Some(input) = &self.input {
            config.input = input.clone();
        }
        if let Some(output) = &self.output {
            config.output = output.clone();
        }
        if let Some(target) = &self.target {
            config.schema.target = target.clone();
        }
        Ok(config)
    }
}

// ── Main ─────────────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .init();

    let args = Args::parse();
    let config = args.resolve_config()?;
    let input = config.input.clone();
    let output = config.output.clone();

    let summary = DashboardPipeline::new(config)
        .run()
        .with_context(|| format!("Cannot build dashboard from {} into {}", input.display(), output.display()))?;

    info!(rows = summary.rows, elapsed_ms = summary.elapsed_ms, "dashboard built");
    if args.summary {
        eprintln!("{}", serde_json::to_string_pretty(&summary)?);
    }
    println!("{}", success_message(&summary.output));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_flags_keep_reference_defaults() {
        let args = Args::parse_from(["dashboard"]);
        assert_eq!(args.resolve_config().unwrap(), DashboardConfig::default());
    }

    #[test]
    fn flags_override_defaults() {
        let args = Args::parse_from([
            "dashboard", "--input", "a.csv", "-o", "b.html", "--target", "RISK", "--summary",
        ]);
        let config = args.resolve_config().unwrap();
        assert_eq!(config.input, PathBuf::from("a.csv"));
        assert_eq!(config.output, PathBuf::from("b.html"));
        assert_eq!(config.schema.target, "RISK");
        assert!(args.summary);
    }
}
