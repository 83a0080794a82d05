//! Org chart loading and organisation.
//!
//! # Load flow
//!
//! ```text
//! raw document (JSON / YAML)  →  OrgChart  →  organise()  →  indexed chart
//! ```
//!
//! Every loader in this module returns an organised chart. Platform names
//! are not derived here because they depend on the sync configuration; call
//! [`OrgChart::assign_platform_names`] once the prefix is known.

use std::collections::HashMap;
use std::path::Path;

use crate::error::ChartError;
use crate::types::{platform_team_name, Employee, EmployeeId, OrgChart, Team, TeamId};

// ---------------------------------------------------------------------------
// 1. Organise
// ---------------------------------------------------------------------------

impl OrgChart {
    /// Build an organised chart from raw team and employee lists.
    pub fn new(teams: Vec<Team>, employees: Vec<Employee>) -> Result<Self, ChartError> {
        let mut chart = OrgChart {
            teams,
            employees,
            ..OrgChart::default()
        };
        chart.organise()?;
        Ok(chart)
    }

    /// Build the team and employee indices and verify that every employee's
    /// owning team exists.
    ///
    /// Returns `ChartError::UnknownTeam` naming the first unresolved team,
    /// or `DuplicateTeam` / `DuplicateEmployee` when an identifier repeats.
    pub fn organise(&mut self) -> Result<(), ChartError> {
        let mut teams_by_id = HashMap::with_capacity(self.teams.len());
        for (idx, team) in self.teams.iter().enumerate() {
            if teams_by_id.insert(team.id.clone(), idx).is_some() {
                return Err(ChartError::DuplicateTeam(team.id.clone()));
            }
        }

        let mut employees_by_id = HashMap::with_capacity(self.employees.len());
        for (idx, employee) in self.employees.iter().enumerate() {
            if employees_by_id.insert(employee.id.clone(), idx).is_some() {
                return Err(ChartError::DuplicateEmployee(employee.id.clone()));
            }
            if !teams_by_id.contains_key(&employee.member_of) {
                return Err(ChartError::UnknownTeam {
                    team: employee.member_of.clone(),
                    employee: employee.id.clone(),
                });
            }
        }

        self.teams_by_id = teams_by_id;
        self.employees_by_id = employees_by_id;
        Ok(())
    }

    /// Derive `<prefix><id>` platform names for every team.
    pub fn assign_platform_names(&mut self, prefix: &str) {
        for team in &mut self.teams {
            team.platform_name = platform_team_name(prefix, &team.id);
        }
    }

    /// Whether every team already carries the platform name for `prefix`.
    pub fn has_platform_names(&self, prefix: &str) -> bool {
        self.teams
            .iter()
            .all(|team| team.platform_name == platform_team_name(prefix, &team.id))
    }

    // -----------------------------------------------------------------------
    // Lookups
    // -----------------------------------------------------------------------

    pub fn team(&self, id: &TeamId) -> Option<&Team> {
        self.teams_by_id.get(id).map(|&idx| &self.teams[idx])
    }

    pub fn employee(&self, id: &EmployeeId) -> Option<&Employee> {
        self.employees_by_id.get(id).map(|&idx| &self.employees[idx])
    }

    /// The team owning `employee`. Always `Some` on an organised chart.
    pub fn team_of(&self, employee: &Employee) -> Option<&Team> {
        self.team(&employee.member_of)
    }

    /// Teams without a parent, in chart order.
    pub fn root_teams(&self) -> impl Iterator<Item = &Team> {
        self.teams.iter().filter(|t| t.is_root())
    }
}

// ---------------------------------------------------------------------------
// 2. Parse
// ---------------------------------------------------------------------------

/// Parse and organise a chart from a JSON document.
pub fn from_json_str(contents: &str) -> Result<OrgChart, ChartError> {
    let mut chart: OrgChart = serde_json::from_str(contents)?;
    chart.organise()?;
    Ok(chart)
}

/// Parse and organise a chart from a YAML document.
pub fn from_yaml_str(contents: &str) -> Result<OrgChart, ChartError> {
    let mut chart: OrgChart = serde_yaml::from_str(contents)?;
    chart.organise()?;
    Ok(chart)
}

// ---------------------------------------------------------------------------
// 3. Load
// ---------------------------------------------------------------------------

/// Load a chart file. `.yaml` / `.yml` files are read as YAML, everything
/// else as JSON.
///
/// Returns `ChartError::NotFound` if absent, `ChartError::Parse` (with path)
/// if malformed.
pub fn load_path(path: &Path) -> Result<OrgChart, ChartError> {
    if !path.exists() {
        return Err(ChartError::NotFound {
            path: path.to_path_buf(),
        });
    }
    let contents = std::fs::read_to_string(path)?;

    let is_yaml = matches!(
        path.extension().and_then(|e| e.to_str()),
        Some("yaml") | Some("yml")
    );
    let parsed: Result<OrgChart, String> = if is_yaml {
        serde_yaml::from_str(&contents).map_err(|e| e.to_string())
    } else {
        serde_json::from_str(&contents).map_err(|e| e.to_string())
    };

    let mut chart = parsed.map_err(|message| ChartError::Parse {
        path: path.to_path_buf(),
        message,
    })?;
    chart.organise()?;
    Ok(chart)
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
