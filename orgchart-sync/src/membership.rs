//! Per-team member and maintainer planning, and the additive applier.

use std::collections::{BTreeMap, BTreeSet};

use orgchart_core::{ChartError, OrgChart, Team};

use crate::error::{platform_err, LeadRole, SyncError};
use crate::pipeline::SyncResult;
use crate::platform::{Platform, PlatformTeam, TeamRole};
use crate::snapshot::PlatformSnapshot;

/// Desired handles for one platform team.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TeamMembership {
    pub team: PlatformTeam,
    pub members: BTreeSet<String>,
    pub maintainers: BTreeSet<String>,
}

/// Planned memberships keyed by platform team name.
pub type MembershipPlan = BTreeMap<String, TeamMembership>;

fn entry<'p>(
    plan: &'p mut MembershipPlan,
    snapshot: &PlatformSnapshot,
    team: &Team,
) -> Result<&'p mut TeamMembership, SyncError> {
    let platform_team = snapshot
        .team(&team.platform_name)
        .ok_or_else(|| SyncError::TeamNotOnPlatform {
            name: team.platform_name.clone(),
        })?;
    Ok(plan
        .entry(platform_team.name.clone())
        .or_insert_with(|| TeamMembership {
            team: platform_team.clone(),
            members: BTreeSet::new(),
            maintainers: BTreeSet::new(),
        }))
}

/// Compute the desired members and maintainers of every chart team.
///
/// Every chart team gets an entry, even without direct employees. Employees
/// and leads without a handle are recorded in `result` and skipped. The tech
/// lead and product lead are evaluated independently.
pub fn plan_memberships(
    chart: &OrgChart,
    snapshot: &PlatformSnapshot,
    result: &mut SyncResult,
) -> Result<MembershipPlan, SyncError> {
    let mut plan = MembershipPlan::new();

    for employee in &chart.employees {
        let Some(handle) = employee.handle() else {
            result.unable_to_create_membership.push(employee.clone());
            continue;
        };
        let team = chart.team_of(employee).ok_or_else(|| ChartError::UnknownTeam {
            team: employee.member_of.clone(),
            employee: employee.id.clone(),
        })?;
        entry(&mut plan, snapshot, team)?
            .members
            .insert(handle.to_string());
    }

    for team in &chart.teams {
        entry(&mut plan, snapshot, team)?;

        let leads = [
            (LeadRole::TechLead, &team.tech_lead),
            (LeadRole::ProductLead, &team.product_lead),
        ];
        for (role, lead_id) in leads {
            let Some(lead_id) = lead_id else {
                continue;
            };
            let lead = chart.employee(lead_id).ok_or_else(|| SyncError::LeadNotFound {
                role,
                employee: lead_id.clone(),
                team: team.id.clone(),
            })?;
            match lead.handle() {
                Some(handle) => {
                    entry(&mut plan, snapshot, team)?
                        .maintainers
                        .insert(handle.to_string());
                }
                None => result.unable_to_create_maintainer.push(lead.clone()),
            }
        }
    }

    Ok(plan)
}

/// Grant every planned member, then every planned maintainer, of one team.
///
/// Only additions are made. Returns the number of grants issued, or the
/// number that would have been issued under dry run. The first failed grant
/// aborts.
pub fn sync_team_members<P: Platform + ?Sized>(
    platform: &mut P,
    membership: &TeamMembership,
    dry_run: bool,
) -> Result<usize, SyncError> {
    let team = &membership.team;
    tracing::info!("syncing members and maintainers for {}", team.name);

    let planned = membership.members.len() + membership.maintainers.len();
    if dry_run {
        return Ok(planned);
    }

    let grants = membership
        .members
        .iter()
        .map(|h| (h, TeamRole::Member))
        .chain(membership.maintainers.iter().map(|h| (h, TeamRole::Maintainer)));
    for (handle, role) in grants {
        tracing::debug!("adding {} as {} to {}", handle, role, team.name);
        platform
            .add_team_membership(team.id, handle, role)
            .map_err(|e| platform_err("adding member", format!("{handle} to {}", team.name), e))?;
    }
    Ok(planned)
}
