//! The collaboration platform as seen by the reconciler.
//!
//! Field names follow the GitHub REST representation so implementations can
//! deserialize API responses straight into these types.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::PlatformError;

/// Team visibility. The reconciler only ever writes `Closed`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Privacy {
    #[default]
    Closed,
    Secret,
}

/// Role granted by a team membership.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TeamRole {
    Member,
    Maintainer,
}

impl fmt::Display for TeamRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TeamRole::Member => write!(f, "member"),
            TeamRole::Maintainer => write!(f, "maintainer"),
        }
    }
}

/// Reference to a parent team as embedded in a team payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParentRef {
    pub id: u64,
    pub name: String,
}

/// A team on the platform.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlatformTeam {
    /// Platform identifier. Placeholder teams fabricated during a dry run
    /// carry `0`.
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub privacy: Option<Privacy>,
    #[serde(default)]
    pub parent: Option<ParentRef>,
}

impl PlatformTeam {
    pub fn parent_id(&self) -> Option<u64> {
        self.parent.as_ref().map(|p| p.id)
    }

    /// A team that would have been created, used when no call may be made.
    pub fn placeholder(request: &NewTeam, parent: Option<&PlatformTeam>) -> Self {
        Self {
            id: 0,
            name: request.name.clone(),
            description: Some(request.description.clone()),
            privacy: Some(request.privacy),
            parent: parent.map(|p| ParentRef {
                id: p.id,
                name: p.name.clone(),
            }),
        }
    }
}

/// An organisation member on the platform.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlatformUser {
    pub id: u64,
    pub login: String,
}

/// Payload for creating or editing a team.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewTeam {
    pub name: String,
    pub description: String,
    /// `None` detaches the team from any parent.
    pub parent_team_id: Option<u64>,
    pub privacy: Privacy,
}

/// Read and write access to the platform's teams and members.
///
/// List calls must return the complete collection; implementations backed
/// by a paginated API exhaust every page before returning.
pub trait Platform {
    fn list_members(&mut self, org: &str) -> Result<Vec<PlatformUser>, PlatformError>;

    fn list_teams(&mut self, org: &str) -> Result<Vec<PlatformTeam>, PlatformError>;

    fn create_team(&mut self, org: &str, team: &NewTeam) -> Result<PlatformTeam, PlatformError>;

    fn edit_team(&mut self, team_id: u64, team: &NewTeam) -> Result<PlatformTeam, PlatformError>;

    fn delete_team(&mut self, team_id: u64) -> Result<(), PlatformError>;

    fn add_team_membership(
        &mut self,
        team_id: u64,
        handle: &str,
        role: TeamRole,
    ) -> Result<(), PlatformError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn team_payload_deserializes_from_github_shape() {
        let team: PlatformTeam = serde_json::from_str(
            r#"{"id": 42, "node_id": "T_1", "name": "org-core", "slug": "org-core",
                "description": null, "privacy": "closed",
                "parent": {"id": 7, "name": "org-eng", "slug": "org-eng"}}"#,
        )
        .expect("deserialize");
        assert_eq!(team.parent_id(), Some(7));
        assert_eq!(team.privacy, Some(Privacy::Closed));
        assert_eq!(team.description, None);
    }

    #[test]
    fn placeholder_records_planned_parent() {
        let parent = PlatformTeam {
            id: 3,
            name: "org-eng".to_string(),
            description: None,
            privacy: Some(Privacy::Closed),
            parent: None,
        };
        let request = NewTeam {
            name: "org-core".to_string(),
            description: "Runtime".to_string(),
            parent_team_id: Some(3),
            privacy: Privacy::Closed,
        };
        let team = PlatformTeam::placeholder(&request, Some(&parent));
        assert_eq!(team.id, 0);
        assert_eq!(team.parent.map(|p| p.name), Some("org-eng".to_string()));
    }

    #[test]
    fn role_serializes_lowercase() {
        assert_eq!(
            serde_json::to_string(&TeamRole::Maintainer).expect("serialize"),
            "\"maintainer\""
        );
        assert_eq!(TeamRole::Member.to_string(), "member");
    }
}
