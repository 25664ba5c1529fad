//! Orphan-branch squeeze workflows
//!
//! Collapses a repository's history into a single snapshot and publishes it to
//! a hosted project, or rebuilds a local snapshot from a hosted project's archive.
//!
//! # Architecture
//!
//! ```text
//!                     squeeze-cli
//!                          |
//!               Squeezer (workflow.rs)
//!                          |
//!    +------------+--------+--------+--------------+
//!    |            |                 |              |
//! lifecycle   snapshot        sync::PushSync  sync::PullSync
//!    |            |                 |              |
//! HostingGateway  GitGateway   both gateways   archive + GitGateway
//! ```
//!
//! Both gateways are injected; nothing here holds state between runs.

pub mod config;
pub mod error;
pub mod lifecycle;
pub mod naming;
pub mod snapshot;
pub mod sync;
pub mod workflow;

pub use config::Settings;
pub use error::{Error, Result};
pub use lifecycle::ProjectLifecycle;
pub use naming::derive_project_name;
pub use snapshot::{OrphanBranch, SnapshotBuilder};
pub use sync::{ContentSync, PullSync, PushSync, SqueezeReport, SyncContext};
pub use workflow::{SqueezeRequest, Squeezer, WorkflowKind};
