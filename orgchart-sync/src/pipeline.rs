//! Sync pipeline entrypoint used by the CLI.
//!
//! ## `sync_teams` — 5-step sequence
//!
//! 1. Remove platform teams that are not in the chart.
//! 2. Root reset: remove every chart root team still present, then forget
//!    the whole team index.
//! 3. Create every chart team missing from the platform, parents first.
//! 4. Plan per-team members and maintainers.
//! 5. Grant the planned memberships.
//!
//! Every step sees the snapshot mutations of the steps before it. The first
//! error aborts the run; nothing already applied is rolled back.

use std::collections::HashSet;

use serde::Serialize;

use orgchart_core::{Employee, OrgChart, TeamId};

use crate::diff;
use crate::error::{SyncError, SyncFailure};
use crate::membership::{plan_memberships, sync_team_members};
use crate::platform::{Platform, PlatformTeam};
use crate::snapshot::PlatformSnapshot;

// ---------------------------------------------------------------------------
// Options
// ---------------------------------------------------------------------------

/// What to do when deleting a platform team fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DeleteFailurePolicy {
    /// Abort the run.
    #[default]
    Propagate,
    /// Log a warning, keep the team, carry on.
    Lenient,
}

/// Run configuration consumed by the engine.
///
/// The organisation and team prefix travel with the [`PlatformSnapshot`]
/// the run reconciles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SyncOptions {
    /// Compute and record every mutation without issuing any write call.
    pub dry_run: bool,
    pub delete_failure: DeleteFailurePolicy,
}

pub const DEFAULT_TEAM_PREFIX: &str = "org-";

// ---------------------------------------------------------------------------
// Result
// ---------------------------------------------------------------------------

/// Everything a run did (or, in dry-run mode, would have done).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SyncResult {
    pub removed_teams: Vec<PlatformTeam>,
    pub created_teams: Vec<String>,
    pub edited_teams: Vec<String>,
    /// Employees left out of their team because they have no handle.
    pub unable_to_create_membership: Vec<Employee>,
    /// Leads not made maintainers because they have no handle.
    pub unable_to_create_maintainer: Vec<Employee>,
    /// Membership grants issued, or planned in dry-run mode.
    pub membership_grants: usize,
}

// ---------------------------------------------------------------------------
// Session
// ---------------------------------------------------------------------------

/// State owned by one in-flight run: the platform handle, the snapshot being
/// reconciled and the result accumulator.
///
/// The chart must carry platform names for the snapshot's prefix.
pub(crate) struct SyncSession<'a, P: Platform + ?Sized> {
    pub(crate) platform: &'a mut P,
    pub(crate) chart: &'a OrgChart,
    pub(crate) snapshot: &'a mut PlatformSnapshot,
    pub(crate) dry_run: bool,
    pub(crate) delete_failure: DeleteFailurePolicy,
    pub(crate) result: SyncResult,
    /// Teams whose creation is on the current recursion path.
    pub(crate) in_progress: HashSet<TeamId>,
}

impl<'a, P: Platform + ?Sized> SyncSession<'a, P> {
    pub(crate) fn new(
        platform: &'a mut P,
        chart: &'a OrgChart,
        snapshot: &'a mut PlatformSnapshot,
        options: &SyncOptions,
    ) -> Self {
        Self {
            platform,
            chart,
            snapshot,
            dry_run: options.dry_run,
            delete_failure: options.delete_failure,
            result: SyncResult::default(),
            in_progress: HashSet::new(),
        }
    }

    pub(crate) fn into_result(self) -> SyncResult {
        self.result
    }

    /// Run the full 5-step sequence.
    pub(crate) fn run(&mut self) -> Result<(), SyncError> {
        if self.dry_run {
            tracing::info!("running in DRY mode");
        }
        let chart = self.chart;

        let stale: Vec<PlatformTeam> = diff::platform_teams_not_in_chart(chart, &*self.snapshot)
            .into_iter()
            .cloned()
            .collect();
        for team in &stale {
            self.remove_team(team)?;
        }

        self.reset_root_teams()?;

        let missing: Vec<TeamId> = diff::teams_not_in_platform(chart, &*self.snapshot)
            .into_iter()
            .map(|t| t.id.clone())
            .collect();
        for team_id in &missing {
            self.create_team_if_missing(team_id)?;
        }

        let plan = plan_memberships(chart, &*self.snapshot, &mut self.result)?;
        for membership in plan.values() {
            self.result.membership_grants +=
                sync_team_members(&mut *self.platform, membership, self.dry_run)?;
        }

        Ok(())
    }
}

/// Reconcile `snapshot` and the platform behind it towards `chart`.
///
/// Teams are named with the snapshot's prefix; a chart named for another
/// prefix (or not named at all) is renamed on a copy. On failure the
/// partially populated result travels with the error.
pub fn sync_teams<P: Platform + ?Sized>(
    platform: &mut P,
    chart: &OrgChart,
    snapshot: &mut PlatformSnapshot,
    options: &SyncOptions,
) -> Result<SyncResult, SyncFailure> {
    let renamed;
    let chart = if chart.has_platform_names(snapshot.team_prefix()) {
        chart
    } else {
        tracing::debug!("naming chart teams with prefix '{}'", snapshot.team_prefix());
        let mut copy = chart.clone();
        copy.assign_platform_names(snapshot.team_prefix());
        renamed = copy;
        &renamed
    };

    let mut session = SyncSession::new(platform, chart, snapshot, options);
    match session.run() {
        Ok(()) => Ok(session.into_result()),
        Err(error) => Err(SyncFailure {
            result: session.into_result(),
            error,
        }),
    }
}

#[cfg(test)]
mod tests {
    use orgchart_core::{EmployeeId, Team};

    use super::*;
    use crate::memory::{Call, InMemoryPlatform};

    fn team(id: &str, parent: Option<&str>) -> Team {
        Team {
            id: TeamId::from(id),
            name: id.to_string(),
            parent: parent.map(TeamId::from),
            description: String::new(),
            tech_lead: None,
            product_lead: None,
            platform_name: String::new(),
        }
    }

    fn employee(id: &str, team: &str, handle: Option<&str>) -> Employee {
        Employee {
            id: EmployeeId::from(id),
            name: id.to_string(),
            github: handle.map(str::to_string),
            member_of: TeamId::from(team),
        }
    }

    fn chart(teams: Vec<Team>, employees: Vec<Employee>) -> OrgChart {
        let mut chart = OrgChart::new(teams, employees).expect("organise");
        chart.assign_platform_names("org-");
        chart
    }

    #[test]
    fn empty_chart_and_platform_is_a_no_op() {
        let mut platform = InMemoryPlatform::new();
        let mut snapshot = PlatformSnapshot::new("acme", "org-");
        let result = sync_teams(
            &mut platform,
            &OrgChart::default(),
            &mut snapshot,
            &SyncOptions::default(),
        )
        .expect("sync");
        assert_eq!(result, SyncResult::default());
        assert!(platform.calls().is_empty());
    }

    #[test]
    fn grant_failure_returns_partial_result() {
        let mut platform = InMemoryPlatform::new();
        platform.fail_membership_for("bo-gh");
        let mut snapshot = PlatformSnapshot::collect(&mut platform, "acme", "org-").expect("collect");
        let chart = chart(
            vec![team("eng", None)],
            vec![
                employee("ada", "eng", Some("ada-gh")),
                employee("bo", "eng", Some("bo-gh")),
                employee("cy", "eng", None),
            ],
        );

        let failure = sync_teams(&mut platform, &chart, &mut snapshot, &SyncOptions::default())
            .unwrap_err();
        assert!(matches!(failure.error, SyncError::Platform { .. }));
        assert!(failure.to_string().contains("bo-gh"));
        assert_eq!(failure.result.created_teams, vec!["org-eng".to_string()]);
        assert_eq!(failure.result.unable_to_create_membership.len(), 1);
        // ada was granted before bo failed; nothing after bo was attempted.
        let grants = platform
            .calls()
            .iter()
            .filter(|c| matches!(c, Call::AddMembership { .. }))
            .count();
        assert_eq!(grants, 2);
    }

    #[test]
    fn unnamed_chart_is_named_with_snapshot_prefix() {
        let mut platform = InMemoryPlatform::new();
        let mut snapshot = PlatformSnapshot::collect(&mut platform, "acme", "org-").expect("collect");
        let chart = OrgChart::new(
            vec![team("data_eng", None)],
            vec![employee("ada", "data_eng", Some("ada-gh"))],
        )
        .expect("organise");

        let result = sync_teams(&mut platform, &chart, &mut snapshot, &SyncOptions::default())
            .expect("sync");
        assert_eq!(result.created_teams, vec!["org-data-eng".to_string()]);
        assert_eq!(platform.team_names(), vec!["org-data-eng".to_string()]);
        assert!(!platform
            .calls()
            .iter()
            .any(|c| matches!(c, Call::CreateTeam { name, .. } if name.is_empty())));
        assert!(chart.teams[0].platform_name.is_empty(), "caller's chart is left as is");
    }

    #[test]
    fn unchanged_child_is_recreated_under_new_root() {
        let mut platform = InMemoryPlatform::new();
        platform.seed_team("org-eng", None);
        platform.seed_team("org-core", Some("org-eng"));
        let mut snapshot = PlatformSnapshot::collect(&mut platform, "acme", "org-").expect("collect");
        let chart = chart(vec![team("eng", None), team("core", Some("eng"))], vec![]);

        let result = sync_teams(&mut platform, &chart, &mut snapshot, &SyncOptions::default())
            .expect("sync");
        assert_eq!(result.removed_teams.len(), 1);
        assert_eq!(result.created_teams, vec!["org-eng".to_string(), "org-core".to_string()]);

        let root = platform.team_by_name("org-eng").expect("root");
        let child = platform.team_by_name("org-core").expect("child");
        assert_eq!(child.parent_id(), Some(root.id));
    }
}
