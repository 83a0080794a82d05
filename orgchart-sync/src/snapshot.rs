//! In-memory view of the platform's teams and members for one run.

use std::collections::{BTreeMap, BTreeSet};

use crate::error::{platform_err, SyncError};
use crate::platform::{Platform, PlatformTeam, PlatformUser};

/// Teams and members of one organisation, captured at the start of a run.
///
/// The team index is keyed by platform team name and is mutated as the
/// reconciler creates, edits and removes teams. The member list is fixed for
/// the run.
#[derive(Debug, Clone, Default)]
pub struct PlatformSnapshot {
    organisation: String,
    team_prefix: String,
    teams: BTreeMap<String, PlatformTeam>,
    members: Vec<PlatformUser>,
}

impl PlatformSnapshot {
    pub fn new(organisation: impl Into<String>, team_prefix: impl Into<String>) -> Self {
        Self {
            organisation: organisation.into(),
            team_prefix: team_prefix.into(),
            ..Self::default()
        }
    }

    /// Enumerate members and teams of `organisation`.
    ///
    /// Only teams whose name starts with `team_prefix` are kept; the rest of
    /// the organisation is invisible to the reconciler.
    pub fn collect<P: Platform + ?Sized>(
        platform: &mut P,
        organisation: &str,
        team_prefix: &str,
    ) -> Result<Self, SyncError> {
        let mut snapshot = Self::new(organisation, team_prefix);

        let members = platform
            .list_members(organisation)
            .map_err(|e| platform_err("listing members of", organisation, e))?;
        snapshot.add_members(members);

        let teams = platform
            .list_teams(organisation)
            .map_err(|e| platform_err("listing teams of", organisation, e))?;
        let total = teams.len();
        for team in teams {
            if team.name.starts_with(team_prefix) {
                snapshot.add_team(team);
            }
        }

        tracing::info!(
            "collected {} members and {} of {} teams with prefix '{}' from {}",
            snapshot.members.len(),
            snapshot.teams.len(),
            total,
            team_prefix,
            organisation
        );
        Ok(snapshot)
    }

    pub fn organisation(&self) -> &str {
        &self.organisation
    }

    pub fn team_prefix(&self) -> &str {
        &self.team_prefix
    }

    /// Insert or replace a team, keyed by its name.
    pub fn add_team(&mut self, team: PlatformTeam) {
        self.teams.insert(team.name.clone(), team);
    }

    pub fn add_members(&mut self, members: impl IntoIterator<Item = PlatformUser>) {
        self.members.extend(members);
    }

    pub fn team(&self, name: &str) -> Option<&PlatformTeam> {
        self.teams.get(name)
    }

    pub fn contains_team(&self, name: &str) -> bool {
        self.teams.contains_key(name)
    }

    pub(crate) fn remove_team(&mut self, name: &str) -> Option<PlatformTeam> {
        self.teams.remove(name)
    }

    /// Forget every team outside the subtrees rooted at `roots`.
    ///
    /// An empty `roots` forgets every team.
    pub(crate) fn retain_subtrees_of(&mut self, roots: &BTreeSet<String>) {
        let keep: BTreeSet<String> = self
            .teams
            .keys()
            .filter(|name| self.descends_from(name, roots))
            .cloned()
            .collect();
        self.teams.retain(|name, _| keep.contains(name));
    }

    /// Walk parent references from `name` looking for one of `roots`.
    fn descends_from(&self, name: &str, roots: &BTreeSet<String>) -> bool {
        let mut current = Some(name);
        for _ in 0..=self.teams.len() {
            let Some(name) = current else {
                return false;
            };
            if roots.contains(name) {
                return true;
            }
            current = self
                .teams
                .get(name)
                .and_then(|t| t.parent.as_ref())
                .map(|p| p.name.as_str());
        }
        false
    }

    /// Teams ordered by name.
    pub fn teams(&self) -> impl Iterator<Item = &PlatformTeam> {
        self.teams.values()
    }

    pub fn members(&self) -> &[PlatformUser] {
        &self.members
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::InMemoryPlatform;

    #[test]
    fn collect_filters_teams_by_prefix() {
        let mut platform = InMemoryPlatform::new();
        platform.seed_team("org-core", None);
        platform.seed_team("legacy-ops", None);
        platform.seed_team("org-data", None);
        platform.seed_member("ada");
        platform.seed_member("bo");

        let snapshot = PlatformSnapshot::collect(&mut platform, "acme", "org-").expect("collect");
        let names: Vec<_> = snapshot.teams().map(|t| t.name.as_str()).collect();
        assert_eq!(names, vec!["org-core", "org-data"]);
        assert_eq!(snapshot.members().len(), 2);
        assert_eq!(snapshot.organisation(), "acme");
        assert_eq!(snapshot.team_prefix(), "org-");
    }

    #[test]
    fn collect_propagates_list_failures() {
        let mut platform = InMemoryPlatform::new();
        platform.fail_list_calls();

        let err = PlatformSnapshot::collect(&mut platform, "acme", "org-").unwrap_err();
        assert!(matches!(err, SyncError::Platform { .. }), "got: {err}");
        assert!(err.to_string().contains("acme"));
    }

    #[test]
    fn add_team_replaces_by_name() {
        let mut snapshot = PlatformSnapshot::new("acme", "org-");
        let mut team = PlatformTeam {
            id: 1,
            name: "org-core".to_string(),
            description: None,
            privacy: None,
            parent: None,
        };
        snapshot.add_team(team.clone());
        team.id = 2;
        snapshot.add_team(team);
        assert_eq!(snapshot.teams().count(), 1);
        assert_eq!(snapshot.team("org-core").map(|t| t.id), Some(2));
    }

    #[test]
    fn retain_subtrees_keeps_descendants_only() {
        let mut platform = InMemoryPlatform::new();
        platform.seed_team("org-a", None);
        platform.seed_team("org-a-sub", Some("org-a"));
        platform.seed_team("org-a-leaf", Some("org-a-sub"));
        platform.seed_team("org-b", None);
        platform.seed_team("org-b-sub", Some("org-b"));
        let mut snapshot = PlatformSnapshot::collect(&mut platform, "acme", "org-").expect("collect");

        snapshot.retain_subtrees_of(&BTreeSet::from(["org-a".to_string()]));
        let names: Vec<_> = snapshot.teams().map(|t| t.name.as_str()).collect();
        assert_eq!(names, vec!["org-a", "org-a-leaf", "org-a-sub"]);

        snapshot.retain_subtrees_of(&BTreeSet::new());
        assert_eq!(snapshot.teams().count(), 0);
    }
}
