//! Org chart core library — domain types, chart loading, errors.
//!
//! Public API surface:
//! - [`types`] — newtypes and domain structs
//! - [`error`] — [`ChartError`]
//! - [`chart`] — parse / load / organise

pub mod chart;
pub mod error;
pub mod types;

pub use error::ChartError;
pub use types::{platform_team_name, Employee, EmployeeId, OrgChart, Team, TeamId};
