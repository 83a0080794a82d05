//! A recording, in-process [`Platform`].
//!
//! Behaves like the GitHub teams API where it matters to the reconciler:
//! team names are unique, deleting a team deletes its child teams, and
//! membership grants against unknown teams fail. Every write call is
//! recorded in order so tests can assert on exactly what reached the
//! platform.

use std::collections::{BTreeMap, BTreeSet};

use crate::error::PlatformError;
use crate::platform::{NewTeam, ParentRef, Platform, PlatformTeam, PlatformUser, TeamRole};

/// A write call observed by [`InMemoryPlatform`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    CreateTeam { name: String, parent_id: Option<u64> },
    EditTeam { id: u64, name: String, parent_id: Option<u64> },
    DeleteTeam { id: u64 },
    AddMembership { team_id: u64, handle: String, role: TeamRole },
}

#[derive(Debug, Default)]
pub struct InMemoryPlatform {
    next_id: u64,
    teams: BTreeMap<u64, PlatformTeam>,
    members: Vec<PlatformUser>,
    memberships: BTreeMap<u64, BTreeMap<String, TeamRole>>,
    calls: Vec<Call>,
    fail_lists: bool,
    fail_deletes: bool,
    failing_deletes: BTreeSet<u64>,
    failing_handles: BTreeSet<String>,
}

impl InMemoryPlatform {
    pub fn new() -> Self {
        Self {
            next_id: 1,
            ..Self::default()
        }
    }

    // -----------------------------------------------------------------------
    // Seeding (not recorded as calls)
    // -----------------------------------------------------------------------

    /// Add an existing team. `parent` names an already seeded team.
    pub fn seed_team(&mut self, name: &str, parent: Option<&str>) -> PlatformTeam {
        let parent = parent.and_then(|p| self.team_by_name(p)).map(|p| ParentRef {
            id: p.id,
            name: p.name.clone(),
        });
        let team = PlatformTeam {
            id: self.allocate_id(),
            name: name.to_string(),
            description: None,
            privacy: None,
            parent,
        };
        self.teams.insert(team.id, team.clone());
        team
    }

    pub fn seed_member(&mut self, login: &str) -> PlatformUser {
        let user = PlatformUser {
            id: self.allocate_id(),
            login: login.to_string(),
        };
        self.members.push(user.clone());
        user
    }

    // -----------------------------------------------------------------------
    // Failure injection
    // -----------------------------------------------------------------------

    pub fn fail_list_calls(&mut self) {
        self.fail_lists = true;
    }

    pub fn fail_deletes(&mut self) {
        self.fail_deletes = true;
    }

    /// Reject deletion of the team with `team_id` only.
    pub fn fail_delete_of(&mut self, team_id: u64) {
        self.failing_deletes.insert(team_id);
    }

    /// Reject any membership grant for `handle`.
    pub fn fail_membership_for(&mut self, handle: &str) {
        self.failing_handles.insert(handle.to_string());
    }

    // -----------------------------------------------------------------------
    // Inspection
    // -----------------------------------------------------------------------

    /// Write calls in the order they were received.
    pub fn calls(&self) -> &[Call] {
        &self.calls
    }

    pub fn team_by_name(&self, name: &str) -> Option<&PlatformTeam> {
        self.teams.values().find(|t| t.name == name)
    }

    pub fn team_names(&self) -> Vec<String> {
        self.teams.values().map(|t| t.name.clone()).collect()
    }

    /// Handles and roles granted on `team_id`, ordered by handle.
    pub fn memberships(&self, team_id: u64) -> Vec<(String, TeamRole)> {
        self.memberships
            .get(&team_id)
            .map(|m| m.iter().map(|(h, r)| (h.clone(), *r)).collect())
            .unwrap_or_default()
    }

    fn allocate_id(&mut self) -> u64 {
        let id = self.next_id.max(1);
        self.next_id = id + 1;
        id
    }

    fn parent_ref(&self, parent_id: Option<u64>) -> Result<Option<ParentRef>, PlatformError> {
        match parent_id {
            None => Ok(None),
            Some(id) => self
                .teams
                .get(&id)
                .map(|p| {
                    Some(ParentRef {
                        id: p.id,
                        name: p.name.clone(),
                    })
                })
                .ok_or_else(|| PlatformError::Rejected(format!("parent team {id} does not exist"))),
        }
    }

    fn descendants_of(&self, id: u64) -> Vec<u64> {
        let mut found = vec![id];
        let mut cursor = 0;
        while cursor < found.len() {
            let current = found[cursor];
            found.extend(
                self.teams
                    .values()
                    .filter(|t| t.parent_id() == Some(current))
                    .map(|t| t.id),
            );
            cursor += 1;
        }
        found
    }
}

impl Platform for InMemoryPlatform {
    fn list_members(&mut self, _org: &str) -> Result<Vec<PlatformUser>, PlatformError> {
        if self.fail_lists {
            return Err(PlatformError::Transport("connection refused".to_string()));
        }
        Ok(self.members.clone())
    }

    fn list_teams(&mut self, _org: &str) -> Result<Vec<PlatformTeam>, PlatformError> {
        if self.fail_lists {
            return Err(PlatformError::Transport("connection refused".to_string()));
        }
        Ok(self.teams.values().cloned().collect())
    }

    fn create_team(&mut self, _org: &str, team: &NewTeam) -> Result<PlatformTeam, PlatformError> {
        self.calls.push(Call::CreateTeam {
            name: team.name.clone(),
            parent_id: team.parent_team_id,
        });
        if self.team_by_name(&team.name).is_some() {
            return Err(PlatformError::Rejected(format!(
                "team {} already exists",
                team.name
            )));
        }
        let parent = self.parent_ref(team.parent_team_id)?;
        let created = PlatformTeam {
            id: self.allocate_id(),
            name: team.name.clone(),
            description: Some(team.description.clone()),
            privacy: Some(team.privacy),
            parent,
        };
        self.teams.insert(created.id, created.clone());
        Ok(created)
    }

    fn edit_team(&mut self, team_id: u64, team: &NewTeam) -> Result<PlatformTeam, PlatformError> {
        self.calls.push(Call::EditTeam {
            id: team_id,
            name: team.name.clone(),
            parent_id: team.parent_team_id,
        });
        let parent = self.parent_ref(team.parent_team_id)?;
        let existing = self
            .teams
            .get_mut(&team_id)
            .ok_or_else(|| PlatformError::Rejected(format!("team {team_id} does not exist")))?;
        existing.name = team.name.clone();
        existing.description = Some(team.description.clone());
        existing.privacy = Some(team.privacy);
        existing.parent = parent;
        Ok(existing.clone())
    }

    fn delete_team(&mut self, team_id: u64) -> Result<(), PlatformError> {
        self.calls.push(Call::DeleteTeam { id: team_id });
        if self.fail_deletes || self.failing_deletes.contains(&team_id) {
            return Err(PlatformError::Http {
                status: 500,
                url: format!("/teams/{team_id}"),
                body: "internal error".to_string(),
            });
        }
        if !self.teams.contains_key(&team_id) {
            return Err(PlatformError::Rejected(format!("team {team_id} does not exist")));
        }
        for id in self.descendants_of(team_id) {
            self.teams.remove(&id);
            self.memberships.remove(&id);
        }
        Ok(())
    }

    fn add_team_membership(
        &mut self,
        team_id: u64,
        handle: &str,
        role: TeamRole,
    ) -> Result<(), PlatformError> {
        self.calls.push(Call::AddMembership {
            team_id,
            handle: handle.to_string(),
            role,
        });
        if self.failing_handles.contains(handle) {
            return Err(PlatformError::Rejected(format!("{handle} cannot be added")));
        }
        if !self.teams.contains_key(&team_id) {
            return Err(PlatformError::Rejected(format!("team {team_id} does not exist")));
        }
        self.memberships
            .entry(team_id)
            .or_default()
            .insert(handle.to_string(), role);
        Ok(())
    }
}
