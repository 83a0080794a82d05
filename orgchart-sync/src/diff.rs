//! Set differences between the org chart and the platform snapshot.
//!
//! Each function compares by a single identity key with exact string
//! equality and keeps the iteration order of the collection it filters.
//! Collections are small, so the nested scans are deliberate.

use serde::Serialize;

use orgchart_core::{Employee, OrgChart, Team};

use crate::platform::{PlatformTeam, PlatformUser};
use crate::snapshot::PlatformSnapshot;

/// Platform members whose login matches no employee handle.
pub fn platform_members_not_in_chart<'a>(
    chart: &OrgChart,
    snapshot: &'a PlatformSnapshot,
) -> Vec<&'a PlatformUser> {
    snapshot
        .members()
        .iter()
        .filter(|member| {
            !chart
                .employees
                .iter()
                .any(|e| e.handle() == Some(member.login.as_str()))
        })
        .collect()
}

/// Linked employees whose handle matches no platform member.
///
/// Unlinked employees are a separate category; see [`unlinked_employees`].
pub fn employees_not_in_platform<'a>(
    chart: &'a OrgChart,
    snapshot: &PlatformSnapshot,
) -> Vec<&'a Employee> {
    chart
        .employees
        .iter()
        .filter(|e| match e.handle() {
            Some(handle) => !snapshot.members().iter().any(|m| m.login == handle),
            None => false,
        })
        .collect()
}

/// Snapshot teams whose name matches no chart team's platform name.
pub fn platform_teams_not_in_chart<'a>(
    chart: &OrgChart,
    snapshot: &'a PlatformSnapshot,
) -> Vec<&'a PlatformTeam> {
    snapshot
        .teams()
        .filter(|pt| !chart.teams.iter().any(|t| t.platform_name == pt.name))
        .collect()
}

/// Chart teams whose platform name matches no snapshot team.
pub fn teams_not_in_platform<'a>(chart: &'a OrgChart, snapshot: &PlatformSnapshot) -> Vec<&'a Team> {
    chart
        .teams
        .iter()
        .filter(|t| !snapshot.teams().any(|pt| pt.name == t.platform_name))
        .collect()
}

/// Employees with no platform handle.
pub fn unlinked_employees(chart: &OrgChart) -> Vec<&Employee> {
    chart.employees.iter().filter(|e| e.handle().is_none()).collect()
}

// ---------------------------------------------------------------------------
// Pre-flight report
// ---------------------------------------------------------------------------

/// Owned copy of every difference, for display before a run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DiffReport {
    pub platform_members_not_in_chart: Vec<PlatformUser>,
    pub employees_not_in_platform: Vec<Employee>,
    pub platform_teams_not_in_chart: Vec<PlatformTeam>,
    pub teams_not_in_platform: Vec<Team>,
    pub unlinked_employees: Vec<Employee>,
}

impl DiffReport {
    pub fn compute(chart: &OrgChart, snapshot: &PlatformSnapshot) -> Self {
        Self {
            platform_members_not_in_chart: platform_members_not_in_chart(chart, snapshot)
                .into_iter()
                .cloned()
                .collect(),
            employees_not_in_platform: employees_not_in_platform(chart, snapshot)
                .into_iter()
                .cloned()
                .collect(),
            platform_teams_not_in_chart: platform_teams_not_in_chart(chart, snapshot)
                .into_iter()
                .cloned()
                .collect(),
            teams_not_in_platform: teams_not_in_platform(chart, snapshot)
                .into_iter()
                .cloned()
                .collect(),
            unlinked_employees: unlinked_employees(chart).into_iter().cloned().collect(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.platform_members_not_in_chart.is_empty()
            && self.employees_not_in_platform.is_empty()
            && self.platform_teams_not_in_chart.is_empty()
            && self.teams_not_in_platform.is_empty()
            && self.unlinked_employees.is_empty()
    }

    /// Emit one informational log line per difference.
    pub fn log(&self) {
        for m in &self.platform_members_not_in_chart {
            tracing::info!("github user {} not found in orgchart", m.login);
        }
        for e in &self.employees_not_in_platform {
            tracing::info!(
                "employee {} ({}) not found in github, will be added",
                e.name,
                e.handle().unwrap_or_default()
            );
        }
        for t in &self.platform_teams_not_in_chart {
            tracing::info!("github team {} not found in orgchart, will be removed", t.name);
        }
        for t in &self.teams_not_in_platform {
            tracing::info!(
                "team {} ({}) not found in github, will be added",
                t.name,
                t.platform_name
            );
        }
        for e in &self.unlinked_employees {
            tracing::info!("employee {} has no github handle", e.name);
        }
    }
}
