//! Gateway trait for the local version-control operations

use std::path::Path;

use crate::Result;

/// Version-control operations used by the squeeze workflows.
///
/// Every method takes the working tree root explicitly; implementations hold
/// no per-repository state between calls.
pub trait GitGateway: Send + Sync {
    /// Name of the checked-out branch, or the commit id when HEAD is detached.
    fn current_head(&self, repo: &Path) -> Result<String>;

    /// Switch to a new branch with no ancestry and commit every file on it.
    ///
    /// With `source`, the new branch starts from that branch's tree; otherwise
    /// from the working tree as currently checked out. Returns the commit id.
    fn create_orphan_branch(&self, repo: &Path, branch: &str, source: Option<&str>)
    -> Result<String>;

    /// Switch to a new branch with no ancestry and an empty index, without committing.
    fn create_empty_orphan_branch(&self, repo: &Path, branch: &str) -> Result<()>;

    /// Every file path tracked in the index.
    fn list_files(&self, repo: &Path) -> Result<Vec<String>>;

    /// Remove a subtree from disk and from the index. No-op when it is absent.
    fn remove_directory(&self, repo: &Path, name: &str) -> Result<()>;

    /// Remove all untracked and ignored files and directories.
    fn clean_workdir(&self, repo: &Path) -> Result<()>;

    /// Force checkout of a local branch or commit id.
    fn checkout_branch(&self, repo: &Path, name: &str) -> Result<()>;

    /// Delete a local branch.
    fn delete_local_branch(&self, repo: &Path, name: &str) -> Result<()>;

    /// Stage everything, ignored files included, and commit on top of HEAD.
    /// Returns the commit id.
    fn commit(&self, repo: &Path, message: &str) -> Result<String>;
}
