//! Local snapshot: orphan-branch creation and guaranteed restoration
//!
//! [`SnapshotBuilder`] creates the orphan branch and hands back an
//! [`OrphanBranch`] guard. Dropping the guard checks the prior branch out
//! again and deletes the orphan branch, on every exit path including early
//! returns and cancelled futures. Restoration failures are logged as warnings
//! and never returned: by then the remote side effect has already happened.

use std::path::Path;

use squeeze_git::GitGateway;
use tracing::{debug, info, warn};

use crate::Result;

/// Drives the git gateway to produce an orphan-branch snapshot of a repository.
pub struct SnapshotBuilder<'a> {
    git: &'a dyn GitGateway,
    repo: &'a Path,
}

impl<'a> SnapshotBuilder<'a> {
    pub fn new(git: &'a dyn GitGateway, repo: &'a Path) -> Self {
        Self { git, repo }
    }

    /// Create a single-commit orphan branch and remove excluded directories.
    ///
    /// Excluded directories are removed from disk and from the index after the
    /// branch is created, so later file listings no longer include them.
    pub fn build(
        &self,
        branch: &str,
        source: Option<&str>,
        exclude: &[String],
    ) -> Result<OrphanBranch<'a>> {
        let prior = self.git.current_head(self.repo)?;
        let commit = self.git.create_orphan_branch(self.repo, branch, source)?;
        debug!(branch = %branch, commit = %commit, prior = %prior, "Orphan snapshot committed");

        let guard = OrphanBranch::new(self.git, self.repo, branch, prior);
        for dir in exclude {
            self.git.remove_directory(self.repo, dir)?;
        }
        Ok(guard)
    }

    /// Create an orphan branch with an empty index and a clean working tree.
    pub fn build_empty(&self, branch: &str) -> Result<OrphanBranch<'a>> {
        let prior = self.git.current_head(self.repo)?;
        self.git.create_empty_orphan_branch(self.repo, branch)?;

        let guard = OrphanBranch::new(self.git, self.repo, branch, prior);
        self.git.clean_workdir(self.repo)?;
        Ok(guard)
    }
}

/// Scoped ownership of a local orphan branch.
///
/// Restores the prior branch and deletes the orphan branch when dropped,
/// unless [`OrphanBranch::keep`] was called.
#[must_use = "dropping the guard immediately restores the prior branch"]
pub struct OrphanBranch<'a> {
    git: &'a dyn GitGateway,
    repo: &'a Path,
    branch: String,
    prior: String,
    armed: bool,
}

impl<'a> OrphanBranch<'a> {
    fn new(git: &'a dyn GitGateway, repo: &'a Path, branch: &str, prior: String) -> Self {
        Self {
            git,
            repo,
            branch: branch.to_string(),
            prior,
            armed: true,
        }
    }

    /// Name of the orphan branch
    pub fn branch(&self) -> &str {
        &self.branch
    }

    /// Branch (or commit id) that was checked out before the snapshot
    pub fn prior(&self) -> &str {
        &self.prior
    }

    /// Leave the orphan branch checked out.
    pub fn keep(mut self) {
        self.armed = false;
        info!(branch = %self.branch, "Keeping orphan branch checked out");
    }

    /// Restore the prior branch and delete the orphan branch now.
    ///
    /// Dropping an armed guard does the restore, so this only makes the
    /// drop point explicit.
    pub fn release(self) {
        drop(self);
    }

    fn restore(&self) {
        if let Err(e) = self.git.checkout_branch(self.repo, &self.prior) {
            warn!(
                branch = %self.prior,
                error = %e,
                "Failed to check out prior branch"
            );
        }

        match self.git.delete_local_branch(self.repo, &self.branch) {
            Ok(()) => debug!(branch = %self.branch, "Removed orphan branch"),
            // Never committed to, so no ref was created
            Err(squeeze_git::Error::BranchNotFound { .. }) => {}
            Err(e) => warn!(
                branch = %self.branch,
                error = %e,
                "Failed to delete orphan branch"
            ),
        }
    }
}

impl Drop for OrphanBranch<'_> {
    fn drop(&mut self) {
        if self.armed {
            self.restore();
        }
    }
}
