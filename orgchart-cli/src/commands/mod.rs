//! Subcommands and the connection flags they share.

pub mod diff;
pub mod sync;

use anyhow::{Context, Result};
use clap::Args;

use orgchart_core::OrgChart;
use orgchart_sync::{pipeline::DEFAULT_TEAM_PREFIX, PlatformSnapshot};

use crate::github::{GitHubClient, DEFAULT_API_URL};
use crate::source;

/// Where the chart lives and which GitHub organisation mirrors it.
#[derive(Args, Debug)]
pub struct ConnectionArgs {
    /// Document-store database URL (the `chart` document is read from it),
    /// or a path to a local JSON / YAML chart file.
    #[arg(long, value_name = "URL|FILE")]
    pub data_url: String,

    /// GitHub API token.
    #[arg(long, env = "GITHUB_TOKEN", hide_env_values = true)]
    pub github_token: String,

    /// GitHub organisation to reconcile.
    #[arg(long, value_name = "ORG")]
    pub github_org: String,

    /// Only teams whose name starts with this prefix are managed.
    #[arg(long, default_value = DEFAULT_TEAM_PREFIX)]
    pub github_team_prefix: String,

    /// GitHub REST API base URL (GitHub Enterprise installs differ).
    #[arg(long, env = "GITHUB_API_URL", default_value = DEFAULT_API_URL)]
    pub github_api_url: String,
}

impl ConnectionArgs {
    /// Load the chart, then enumerate GitHub. The chart is always loaded
    /// first so an inconsistent chart fails before any API call.
    pub fn connect(&self) -> Result<(OrgChart, GitHubClient, PlatformSnapshot)> {
        let mut chart =
            source::load_chart(&self.data_url).context("retrieving org chart data")?;
        chart.assign_platform_names(&self.github_team_prefix);

        let mut client = GitHubClient::new(&self.github_api_url, &self.github_token);
        let snapshot =
            PlatformSnapshot::collect(&mut client, &self.github_org, &self.github_team_prefix)
                .context("retrieving github data")?;

        Ok((chart, client, snapshot))
    }
}
