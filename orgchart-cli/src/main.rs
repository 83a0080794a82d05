//! orgchart — mirror the org chart onto GitHub organisation teams.
//!
//! # Usage
//!
//! ```text
//! orgchart gh-sync --data-url <url|file> --github-org <org> [--github-team-prefix org-]
//!                  [--dry-run] [--lenient-deletes] [--json]
//! orgchart diff    --data-url <url|file> --github-org <org> [--json]
//! ```
//!
//! The GitHub token is read from `--github-token` or `GITHUB_TOKEN`.

mod commands;
mod github;
mod source;

use anyhow::Result;
use clap::{Parser, Subcommand};

use commands::{diff::DiffArgs, sync::SyncArgs};

// ---------------------------------------------------------------------------
// CLI entry point
// ---------------------------------------------------------------------------

#[derive(Parser, Debug)]
#[command(
    name = "orgchart",
    version,
    about = "Org chart management: keep GitHub teams in line with the org chart",
    long_about = None,
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Reconcile GitHub teams, hierarchy and memberships with the org chart.
    GhSync(SyncArgs),

    /// Show how the org chart and GitHub differ without changing anything.
    Diff(DiffArgs),
}

// ---------------------------------------------------------------------------
// Main
// ---------------------------------------------------------------------------

fn main() -> Result<()> {
    init_logging();
    let cli = Cli::parse();
    match cli.command {
        Commands::GhSync(args) => args.run(),
        Commands::Diff(args) => args.run(),
    }
}

fn init_logging() {
    let env = env_logger::Env::default().default_filter_or("info");
    let _ = env_logger::Builder::from_env(env)
        .format_target(false)
        .try_init();
}
