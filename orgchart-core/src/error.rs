//! Error types for orgchart-core.

use std::path::PathBuf;

use thiserror::Error;

use crate::types::{EmployeeId, TeamId};

/// All errors that can arise while loading or organising an org chart.
#[derive(Debug, Error)]
pub enum ChartError {
    /// Underlying I/O failure (permission denied, etc.).
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON parse error on a chart that did not come from a file.
    #[error("chart JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// YAML parse error on a chart that did not come from a file.
    #[error("chart YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// Malformed chart document at `path`.
    #[error("failed to parse org chart at {path}: {message}")]
    Parse { path: PathBuf, message: String },

    /// The chart file did not exist at the expected path.
    #[error("org chart not found at {path}")]
    NotFound { path: PathBuf },

    /// An employee references a team that is not part of the chart.
    #[error("could not find team {team} for member {employee}")]
    UnknownTeam { team: TeamId, employee: EmployeeId },

    #[error("team {0} is defined more than once")]
    DuplicateTeam(TeamId),

    #[error("employee {0} is defined more than once")]
    DuplicateEmployee(EmployeeId),
}
