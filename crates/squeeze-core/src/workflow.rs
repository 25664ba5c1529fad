//! Workflow orchestration
//!
//! A [`Squeezer`] owns both gateways and runs one of the two workflows:
//!
//! - **Local to remote**: replace the hosted project, snapshot the local
//!   repository on an orphan branch, push the files in one API commit, then
//!   restore the prior branch.
//! - **Remote to local**: look the hosted project up, start an empty orphan
//!   branch, extract the project's archive into it and commit locally. The
//!   reconstructed branch stays checked out on success; on failure the prior
//!   branch is restored.

use std::path::{Path, PathBuf};

use squeeze_git::GitGateway;
use squeeze_gitlab::{HostingGateway, Project};
use tracing::info;

use crate::config::DEFAULT_EXCLUDES;
use crate::lifecycle::ProjectLifecycle;
use crate::naming::derive_project_name;
use crate::snapshot::{OrphanBranch, SnapshotBuilder};
use crate::sync::{ContentSync, PullSync, PushSync, SqueezeReport, SyncContext};
use crate::Result;

/// Which direction content flows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkflowKind {
    /// Push the local snapshot to a freshly created project
    LocalToRemote,
    /// Rebuild a local orphan branch from the hosted project
    RemoteToLocal,
}

impl WorkflowKind {
    /// Content strategy used by this workflow
    pub fn strategy(self) -> &'static dyn ContentSync {
        match self {
            Self::LocalToRemote => &PushSync,
            Self::RemoteToLocal => &PullSync,
        }
    }

    /// Whether the orphan branch stays checked out after a successful run
    pub fn keeps_branch(self) -> bool {
        matches!(self, Self::RemoteToLocal)
    }
}

/// Inputs of one workflow run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SqueezeRequest {
    pub repo_path: PathBuf,
    pub branch: String,
    /// Branch whose tree seeds the snapshot; the working tree when unset
    pub source_branch: Option<String>,
    /// Directories removed from the local snapshot before pushing
    pub exclude: Vec<String>,
}

impl SqueezeRequest {
    pub fn new(repo_path: impl Into<PathBuf>, branch: impl Into<String>) -> Self {
        Self {
            repo_path: repo_path.into(),
            branch: branch.into(),
            source_branch: None,
            exclude: DEFAULT_EXCLUDES.iter().map(|d| d.to_string()).collect(),
        }
    }

    pub fn with_source_branch(mut self, source: impl Into<String>) -> Self {
        self.source_branch = Some(source.into());
        self
    }

    pub fn with_exclude<I, S>(mut self, dirs: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.exclude = dirs.into_iter().map(Into::into).collect();
        self
    }
}

/// Runs squeeze workflows against injected gateways.
pub struct Squeezer {
    git: Box<dyn GitGateway>,
    hosting: Box<dyn HostingGateway>,
}

impl Squeezer {
    pub fn new(git: Box<dyn GitGateway>, hosting: Box<dyn HostingGateway>) -> Self {
        Self { git, hosting }
    }

    pub async fn run(&self, kind: WorkflowKind, request: &SqueezeRequest) -> Result<SqueezeReport> {
        match kind {
            WorkflowKind::LocalToRemote => self.local_to_remote(request).await,
            WorkflowKind::RemoteToLocal => self.remote_to_local(request).await,
        }
    }

    /// Replace the hosted project and publish a single-commit snapshot of the
    /// local repository to it.
    ///
    /// The prior branch is checked out again and the orphan branch deleted on
    /// every exit path after the branch exists.
    pub async fn local_to_remote(&self, request: &SqueezeRequest) -> Result<SqueezeReport> {
        let name = derive_project_name(&request.repo_path)?;
        info!(project = %name, branch = %request.branch, "Squeezing local repository");

        let project = ProjectLifecycle::new(self.hosting.as_ref())
            .replace(&name)
            .await?;

        let guard = SnapshotBuilder::new(self.git.as_ref(), &request.repo_path).build(
            &request.branch,
            request.source_branch.as_deref(),
            &request.exclude,
        )?;
        self.sync_within(WorkflowKind::LocalToRemote, guard, &project, &request.repo_path)
            .await
    }

    /// Rebuild the hosted project's default branch as a local orphan branch.
    ///
    /// A missing project is not an error: nothing is touched and an empty
    /// report is returned.
    pub async fn remote_to_local(&self, request: &SqueezeRequest) -> Result<SqueezeReport> {
        let name = derive_project_name(&request.repo_path)?;
        info!(project = %name, branch = %request.branch, "Reconstructing from hosted project");

        let Some(project) = ProjectLifecycle::new(self.hosting.as_ref())
            .lookup(&name)
            .await?
        else {
            info!(project = %name, "Project not found, nothing to reconstruct");
            return Ok(SqueezeReport::default());
        };

        let guard = SnapshotBuilder::new(self.git.as_ref(), &request.repo_path)
            .build_empty(&request.branch)?;
        self.sync_within(WorkflowKind::RemoteToLocal, guard, &project, &request.repo_path)
            .await
    }

    async fn sync_within(
        &self,
        kind: WorkflowKind,
        guard: OrphanBranch<'_>,
        project: &Project,
        repo: &Path,
    ) -> Result<SqueezeReport> {
        let ctx = SyncContext {
            git: self.git.as_ref(),
            hosting: self.hosting.as_ref(),
            repo,
            project,
            branch: guard.branch(),
        };
        let outcome = kind.strategy().sync(&ctx).await;

        if outcome.is_ok() && kind.keeps_branch() {
            guard.keep();
        } else {
            guard.release();
        }
        outcome
    }
}
