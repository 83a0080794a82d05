//! Domain types for the org chart.
//!
//! All types are serializable/deserializable via serde; the same shapes are
//! read from the document store (JSON) and from local chart files (JSON or
//! YAML).

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};

// ---------------------------------------------------------------------------
// Newtypes
// ---------------------------------------------------------------------------

/// A strongly-typed identifier for a team in the org chart.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TeamId(pub String);

impl fmt::Display for TeamId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<String> for TeamId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for TeamId {
    fn from(s: &str) -> Self {
        Self(s.to_owned())
    }
}

/// A strongly-typed identifier for an employee in the org chart.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EmployeeId(pub String);

impl fmt::Display for EmployeeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<String> for EmployeeId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for EmployeeId {
    fn from(s: &str) -> Self {
        Self(s.to_owned())
    }
}

// ---------------------------------------------------------------------------
// Domain structs
// ---------------------------------------------------------------------------

/// A person in the org chart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Employee {
    pub id: EmployeeId,
    pub name: String,
    /// GitHub login. `None` means the employee is not linked yet.
    #[serde(
        default,
        deserialize_with = "empty_as_none",
        skip_serializing_if = "Option::is_none"
    )]
    pub github: Option<String>,
    /// Identifier of the owning team; resolved through [`OrgChart::team_of`].
    pub member_of: TeamId,
}

impl Employee {
    /// The linked platform handle, if any.
    pub fn handle(&self) -> Option<&str> {
        self.github.as_deref().filter(|h| !h.is_empty())
    }
}

/// A team in the org chart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Team {
    pub id: TeamId,
    pub name: String,
    /// Parent team. `None` marks a root team.
    #[serde(
        default,
        deserialize_with = "empty_as_none",
        skip_serializing_if = "Option::is_none"
    )]
    pub parent: Option<TeamId>,
    #[serde(default)]
    pub description: String,
    #[serde(
        default,
        deserialize_with = "empty_as_none",
        skip_serializing_if = "Option::is_none"
    )]
    pub tech_lead: Option<EmployeeId>,
    #[serde(
        default,
        deserialize_with = "empty_as_none",
        skip_serializing_if = "Option::is_none"
    )]
    pub product_lead: Option<EmployeeId>,
    /// Derived GitHub team name; see [`OrgChart::assign_platform_names`].
    #[serde(skip)]
    pub platform_name: String,
}

impl Team {
    pub fn is_root(&self) -> bool {
        self.parent.is_none()
    }
}

/// Root of the org chart document.
///
/// The lookup indices are never persisted; they are rebuilt by
/// [`OrgChart::organise`] after every load.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OrgChart {
    #[serde(default)]
    pub teams: Vec<Team>,
    #[serde(default)]
    pub employees: Vec<Employee>,
    #[serde(skip)]
    pub(crate) teams_by_id: HashMap<TeamId, usize>,
    #[serde(skip)]
    pub(crate) employees_by_id: HashMap<EmployeeId, usize>,
}

/// `<prefix><id>` with every `_` in the id replaced by `-`.
pub fn platform_team_name(prefix: &str, id: &TeamId) -> String {
    format!("{prefix}{}", id.0.replace('_', "-"))
}

fn empty_as_none<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: From<String>,
{
    let value = Option::<String>::deserialize(deserializer)?;
    Ok(value.filter(|s| !s.is_empty()).map(T::from))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
