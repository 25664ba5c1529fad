//! Content synchronization strategies
//!
//! Two interchangeable ways of populating the orphan branch:
//!
//! - [`PushSync`]: read the tracked local files and send them to the hosting
//!   service as one batched commit.
//! - [`PullSync`]: download the hosted project's archive, extract it into the
//!   working tree and commit locally.

pub mod archive;
mod pull;
mod push;

use std::path::Path;
use std::time::Duration;

use async_trait::async_trait;
use squeeze_git::GitGateway;
use squeeze_gitlab::{HostingGateway, Project};

use crate::Result;

pub use pull::PullSync;
pub use push::PushSync;

/// Outcome of a workflow run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SqueezeReport {
    /// Time spent in the commit call only
    pub duration: Duration,
    /// Number of files in the snapshot
    pub files: usize,
}

/// Everything a strategy needs for one run.
pub struct SyncContext<'a> {
    pub git: &'a dyn GitGateway,
    pub hosting: &'a dyn HostingGateway,
    pub repo: &'a Path,
    pub project: &'a Project,
    pub branch: &'a str,
}

/// A way of filling the orphan branch with content.
#[async_trait]
pub trait ContentSync: Send + Sync {
    async fn sync(&self, ctx: &SyncContext<'_>) -> Result<SqueezeReport>;
}

/// Commit message used by both strategies.
pub fn commit_message(branch: &str) -> String {
    format!("Add project files to orphan branch {branch}")
}
