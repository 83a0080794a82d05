//! Team creation, correction and removal on the platform.
//!
//! A chart team moves through `absent → created/existing → (edited)`.
//! Parents are always ensured before their children, so a team's parent id
//! is known by the time the team itself is created or corrected. The
//! snapshot acts as the memo: once a team is in it, later calls only
//! compare parents.

use std::collections::BTreeSet;

use orgchart_core::{Team, TeamId};

use crate::error::{platform_err, SyncError};
use crate::pipeline::{DeleteFailurePolicy, SyncSession};
use crate::platform::{NewTeam, ParentRef, Platform, PlatformTeam, Privacy};

impl<'a, P: Platform + ?Sized> SyncSession<'a, P> {
    /// Make sure the platform has a team for `team_id` under the right parent.
    ///
    /// Recursively ensures the parent chain first. Calling this twice with no
    /// platform change in between issues no further create or edit call.
    pub fn create_team_if_missing(&mut self, team_id: &TeamId) -> Result<PlatformTeam, SyncError> {
        let chart = self.chart;
        let team = chart.team(team_id).ok_or_else(|| SyncError::TeamNotInChart {
            team: team_id.clone(),
        })?;

        if !self.in_progress.insert(team_id.clone()) {
            return Err(SyncError::HierarchyCycle {
                team: team_id.clone(),
            });
        }
        let outcome = self.ensure_team(team);
        self.in_progress.remove(team_id);
        outcome
    }

    fn ensure_team(&mut self, team: &Team) -> Result<PlatformTeam, SyncError> {
        let parent = match &team.parent {
            Some(parent_id) => Some(self.create_team_if_missing(parent_id)?),
            None => None,
        };

        let request = NewTeam {
            name: team.platform_name.clone(),
            description: team.description.clone(),
            parent_team_id: parent.as_ref().map(|p| p.id),
            privacy: Privacy::Closed,
        };

        if let Some(existing) = self.snapshot.team(&team.platform_name).cloned() {
            if existing.parent_id() == request.parent_team_id {
                return Ok(existing);
            }

            let edited = if self.dry_run {
                tracing::info!(
                    "[dry-run] would move {} under {:?}",
                    existing.name,
                    parent.as_ref().map(|p| &p.name)
                );
                PlatformTeam {
                    parent: parent.map(|p| ParentRef {
                        id: p.id,
                        name: p.name,
                    }),
                    ..existing
                }
            } else {
                let edited = self
                    .platform
                    .edit_team(existing.id, &request)
                    .map_err(|e| platform_err("editing team", &request.name, e))?;
                tracing::info!("moved {} under parent {:?}", edited.name, request.parent_team_id);
                edited
            };
            self.snapshot.add_team(edited.clone());
            self.result.edited_teams.push(edited.name.clone());
            return Ok(edited);
        }

        let created = if self.dry_run {
            tracing::info!("[dry-run] would create {}", request.name);
            PlatformTeam::placeholder(&request, parent.as_ref())
        } else {
            let organisation = self.snapshot.organisation().to_string();
            let created = self
                .platform
                .create_team(&organisation, &request)
                .map_err(|e| platform_err("creating team", &request.name, e))?;
            tracing::info!("created {}", created.name);
            created
        };

        self.snapshot.add_team(created.clone());
        self.result.created_teams.push(created.name.clone());
        Ok(created)
    }

    /// Delete `team` from the platform and forget it.
    ///
    /// Under [`DeleteFailurePolicy::Lenient`] a failed delete is logged and
    /// the team stays in the snapshot and out of the result.
    pub fn remove_team(&mut self, team: &PlatformTeam) -> Result<(), SyncError> {
        if self.dry_run {
            tracing::info!("[dry-run] would remove {}", team.name);
        } else if let Err(e) = self.platform.delete_team(team.id) {
            match self.delete_failure {
                DeleteFailurePolicy::Propagate => {
                    return Err(platform_err("deleting team", &team.name, e));
                }
                DeleteFailurePolicy::Lenient => {
                    tracing::warn!("could not delete {}, leaving it in place: {}", team.name, e);
                    return Ok(());
                }
            }
        } else {
            tracing::info!("removed {}", team.name);
        }

        self.result.removed_teams.push(team.clone());
        self.snapshot.remove_team(&team.name);
        Ok(())
    }

    /// Remove every root team still present on the platform and, if any was
    /// removed, forget the team index.
    ///
    /// Removing a root invalidates the parent references of its whole
    /// subtree, so every chart team is recreated from scratch afterwards.
    /// This fires even when the root team is unchanged. Roots whose delete
    /// failed under the lenient policy keep their subtree in the index.
    pub fn reset_root_teams(&mut self) -> Result<(), SyncError> {
        let chart = self.chart;
        let mut removed_any = false;
        let mut kept = BTreeSet::new();

        for root in chart.root_teams() {
            let Some(existing) = self.snapshot.team(&root.platform_name).cloned() else {
                continue;
            };
            self.remove_team(&existing)?;
            if self.snapshot.contains_team(&existing.name) {
                kept.insert(existing.name);
            } else {
                removed_any = true;
            }
        }

        if removed_any {
            tracing::info!("root team removed, recreating the full hierarchy");
            self.snapshot.retain_subtrees_of(&kept);
        }
        Ok(())
    }
}
