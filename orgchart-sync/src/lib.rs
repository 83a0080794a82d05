//! # orgchart-sync
//!
//! Reconciles GitHub organisation teams against an org chart.
//!
//! Build a [`PlatformSnapshot`] with [`PlatformSnapshot::collect`], print a
//! pre-flight [`DiffReport`], then call [`sync_teams`] to remove stale teams,
//! create missing ones (parents first) and grant memberships.

pub mod diff;
pub mod error;
mod hierarchy;
pub mod membership;
pub mod memory;
pub mod pipeline;
pub mod platform;
pub mod snapshot;

pub use diff::DiffReport;
pub use error::{LeadRole, PlatformError, SyncError, SyncFailure};
pub use membership::{MembershipPlan, TeamMembership};
pub use memory::InMemoryPlatform;
pub use pipeline::{sync_teams, DeleteFailurePolicy, SyncOptions, SyncResult};
pub use platform::{NewTeam, ParentRef, Platform, PlatformTeam, PlatformUser, Privacy, TeamRole};
pub use snapshot::PlatformSnapshot;
