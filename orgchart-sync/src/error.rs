//! Error types for orgchart-sync.

use thiserror::Error;

use orgchart_core::{ChartError, EmployeeId, TeamId};

use crate::pipeline::SyncResult;

/// Failure reported by a [`crate::Platform`] implementation.
#[derive(Debug, Error)]
pub enum PlatformError {
    /// The API answered with a non-success status.
    #[error("HTTP {status} from {url}: {body}")]
    Http { status: u16, url: String, body: String },

    /// The request never produced a response (DNS, TLS, connection reset).
    #[error("transport error: {0}")]
    Transport(String),

    /// The response body could not be decoded.
    #[error("could not decode response from {url}: {message}")]
    Decode { url: String, message: String },

    /// The platform refused the operation.
    #[error("rejected: {0}")]
    Rejected(String),
}

/// Which lead slot of a team an employee was referenced from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LeadRole {
    TechLead,
    ProductLead,
}

impl std::fmt::Display for LeadRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LeadRole::TechLead => write!(f, "tech lead"),
            LeadRole::ProductLead => write!(f, "product lead"),
        }
    }
}

/// All errors that can abort a sync run.
#[derive(Debug, Error)]
pub enum SyncError {
    /// The chart itself is inconsistent.
    #[error("org chart error: {0}")]
    Chart(#[from] ChartError),

    #[error("could not find org team {team} for creation")]
    TeamNotInChart { team: TeamId },

    /// Reconciliation did not produce a platform team the planner needs.
    #[error("team {name} not found in github")]
    TeamNotOnPlatform { name: String },

    #[error("could not find {role} {employee} for team {team}")]
    LeadNotFound {
        role: LeadRole,
        employee: EmployeeId,
        team: TeamId,
    },

    /// The parent chain of a team leads back to itself.
    #[error("team hierarchy contains a cycle through {team}")]
    HierarchyCycle { team: TeamId },

    /// A platform call failed, with the operation and target for context.
    #[error("{operation} {target}: {source}")]
    Platform {
        operation: &'static str,
        target: String,
        #[source]
        source: PlatformError,
    },
}

/// Convenience constructor for [`SyncError::Platform`].
pub(crate) fn platform_err(
    operation: &'static str,
    target: impl Into<String>,
    source: PlatformError,
) -> SyncError {
    SyncError::Platform {
        operation,
        target: target.into(),
        source,
    }
}

/// An aborted run: the error plus everything recorded before it happened.
///
/// No rollback is attempted; `result` reflects mutations already applied.
#[derive(Debug, Error)]
#[error("sync aborted: {error}")]
pub struct SyncFailure {
    pub result: SyncResult,
    #[source]
    pub error: SyncError,
}
