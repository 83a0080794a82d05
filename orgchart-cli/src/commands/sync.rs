//! `orgchart gh-sync` — reconcile GitHub teams with the org chart.

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use clap::Args;
use colored::Colorize;
use serde::Serialize;
use tabled::{settings::Style, Table, Tabled};

use orgchart_sync::{sync_teams, DeleteFailurePolicy, DiffReport, SyncOptions, SyncResult};

use super::ConnectionArgs;

/// Arguments for `orgchart gh-sync`.
#[derive(Args, Debug)]
pub struct SyncArgs {
    #[command(flatten)]
    pub connection: ConnectionArgs,

    /// Compute every change but issue no write call against GitHub.
    #[arg(long)]
    pub dry_run: bool,

    /// Log failed team deletions and carry on instead of aborting.
    #[arg(long)]
    pub lenient_deletes: bool,

    /// Emit the run result as machine-readable JSON.
    #[arg(long)]
    pub json: bool,
}

impl SyncArgs {
    pub fn run(self) -> Result<()> {
        let (chart, mut client, mut snapshot) = self.connection.connect()?;
        DiffReport::compute(&chart, &snapshot).log();

        let options = SyncOptions {
            dry_run: self.dry_run,
            delete_failure: if self.lenient_deletes {
                DeleteFailurePolicy::Lenient
            } else {
                DeleteFailurePolicy::Propagate
            },
        };

        let started_at = Utc::now();
        match sync_teams(&mut client, &chart, &mut snapshot, &options) {
            Ok(result) => {
                self.report(&result, started_at)?;
                Ok(())
            }
            Err(failure) => {
                self.report(&failure.result, started_at)?;
                Err(failure).context("syncing teams")
            }
        }
    }

    fn report(&self, result: &SyncResult, started_at: DateTime<Utc>) -> Result<()> {
        if self.json {
            print_json(&self.connection.github_org, self.dry_run, started_at, result)
        } else {
            print_summary(&self.connection.github_org, self.dry_run, result);
            Ok(())
        }
    }
}

#[derive(Serialize)]
struct SyncReportJson<'a> {
    organisation: &'a str,
    dry_run: bool,
    started_at: String,
    #[serde(flatten)]
    result: &'a SyncResult,
}

fn print_json(
    organisation: &str,
    dry_run: bool,
    started_at: DateTime<Utc>,
    result: &SyncResult,
) -> Result<()> {
    let payload = SyncReportJson {
        organisation,
        dry_run,
        started_at: started_at.to_rfc3339(),
        result,
    };
    println!(
        "{}",
        serde_json::to_string_pretty(&payload).context("failed to serialize sync JSON")?
    );
    Ok(())
}

#[derive(Tabled)]
struct ChangeRow {
    #[tabled(rename = "change")]
    change: String,
    #[tabled(rename = "subject")]
    subject: String,
    #[tabled(rename = "detail")]
    detail: String,
}

fn change_rows(result: &SyncResult) -> Vec<ChangeRow> {
    let mut rows = Vec::new();
    for team in &result.removed_teams {
        rows.push(ChangeRow {
            change: "removed".red().to_string(),
            subject: team.name.clone(),
            detail: format!("id {}", team.id),
        });
    }
    for name in &result.created_teams {
        rows.push(ChangeRow {
            change: "created".green().to_string(),
            subject: name.clone(),
            detail: String::new(),
        });
    }
    for name in &result.edited_teams {
        rows.push(ChangeRow {
            change: "re-parented".yellow().to_string(),
            subject: name.clone(),
            detail: String::new(),
        });
    }
    for employee in &result.unable_to_create_membership {
        rows.push(ChangeRow {
            change: "no member".bright_black().to_string(),
            subject: employee.name.clone(),
            detail: format!("no github handle, team {}", employee.member_of),
        });
    }
    for employee in &result.unable_to_create_maintainer {
        rows.push(ChangeRow {
            change: "no maintainer".bright_black().to_string(),
            subject: employee.name.clone(),
            detail: "lead has no github handle".to_string(),
        });
    }
    rows
}

fn print_summary(organisation: &str, dry_run: bool, result: &SyncResult) {
    let prefix = if dry_run { "[dry-run] " } else { "" };
    println!(
        "{prefix}✓ '{organisation}' synced ({} removed, {} created, {} re-parented, {} grants)",
        result.removed_teams.len(),
        result.created_teams.len(),
        result.edited_teams.len(),
        result.membership_grants,
    );

    let rows = change_rows(result);
    if rows.is_empty() {
        return;
    }
    let mut table = Table::new(rows);
    table.with(Style::rounded());
    println!("{table}");
}
