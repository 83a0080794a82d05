//! `orgchart diff` — show where the org chart and GitHub disagree.

use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;
use tabled::{settings::Style, Table, Tabled};

use orgchart_sync::DiffReport;

use super::ConnectionArgs;

/// Arguments for `orgchart diff`.
#[derive(Args, Debug)]
pub struct DiffArgs {
    #[command(flatten)]
    pub connection: ConnectionArgs,

    /// Emit machine-readable JSON.
    #[arg(long)]
    pub json: bool,
}

impl DiffArgs {
    pub fn run(self) -> Result<()> {
        let (chart, _client, snapshot) = self.connection.connect()?;
        let report = DiffReport::compute(&chart, &snapshot);

        if self.json {
            println!(
                "{}",
                serde_json::to_string_pretty(&report).context("failed to serialize diff JSON")?
            );
            return Ok(());
        }

        if report.is_empty() {
            println!(
                "✓ '{}' matches the org chart.",
                self.connection.github_org
            );
            return Ok(());
        }
        let mut table = Table::new(diff_rows(&report));
        table.with(Style::rounded());
        println!("{table}");
        Ok(())
    }
}

#[derive(Tabled)]
struct DiffRow {
    #[tabled(rename = "side")]
    side: String,
    #[tabled(rename = "kind")]
    kind: &'static str,
    #[tabled(rename = "name")]
    name: String,
    #[tabled(rename = "note")]
    note: String,
}

fn diff_rows(report: &DiffReport) -> Vec<DiffRow> {
    let github = || "github only".yellow().to_string();
    let chart = || "chart only".cyan().to_string();

    let mut rows = Vec::new();
    for team in &report.platform_teams_not_in_chart {
        rows.push(DiffRow {
            side: github(),
            kind: "team",
            name: team.name.clone(),
            note: "will be removed".to_string(),
        });
    }
    for team in &report.teams_not_in_platform {
        rows.push(DiffRow {
            side: chart(),
            kind: "team",
            name: team.name.clone(),
            note: format!("will be created as {}", team.platform_name),
        });
    }
    for member in &report.platform_members_not_in_chart {
        rows.push(DiffRow {
            side: github(),
            kind: "user",
            name: member.login.clone(),
            note: String::new(),
        });
    }
    for employee in &report.employees_not_in_platform {
        rows.push(DiffRow {
            side: chart(),
            kind: "employee",
            name: employee.name.clone(),
            note: employee.handle().unwrap_or_default().to_string(),
        });
    }
    for employee in &report.unlinked_employees {
        rows.push(DiffRow {
            side: chart(),
            kind: "employee",
            name: employee.name.clone(),
            note: "no github handle".bright_black().to_string(),
        });
    }
    rows
}
