//! libgit2-backed implementation of [`GitGateway`]

use std::fs;
use std::path::Path;

use git2::build::CheckoutBuilder;
use git2::{BranchType, IndexAddOption, Repository, Status, StatusOptions};

use crate::gateway::GitGateway;
use crate::helpers::{
    Checkpoint, commit_index, ensure_branch_absent, point_head_at_unborn, resolve_commit,
    stage_all, validate_relative,
};
use crate::{Error, Result};

/// Message of the single commit made on a freshly created orphan branch.
pub const ORPHAN_COMMIT_MESSAGE: &str = "Initial commit on orphan branch";

/// Git gateway that drives repositories in-process through libgit2.
///
/// The repository is reopened on every call, so index changes are always
/// written back to disk before a method returns.
#[derive(Debug, Default, Clone, Copy)]
pub struct Git2Gateway;

impl Git2Gateway {
    pub fn new() -> Self {
        Self
    }
}

impl GitGateway for Git2Gateway {
    fn current_head(&self, repo: &Path) -> Result<String> {
        let repo = Repository::open(repo)?;
        let head = repo.head()?;

        if head.is_branch() {
            Ok(head.shorthand().unwrap_or("HEAD").to_string())
        } else {
            // Detached HEAD
            Ok(head.peel_to_commit()?.id().to_string())
        }
    }

    fn create_orphan_branch(
        &self,
        repo_path: &Path,
        branch: &str,
        source: Option<&str>,
    ) -> Result<String> {
        let repo = Repository::open(repo_path)?;
        ensure_branch_absent(&repo, branch)?;
        let checkpoint = Checkpoint::capture(&repo)?;

        let mut source_tree = None;
        if let Some(source) = source {
            let commit = resolve_commit(&repo, source)?;
            repo.checkout_tree(commit.as_object(), Some(CheckoutBuilder::new().safe()))?;
            source_tree = Some(commit.tree_id());
            tracing::debug!(source = %source, "Checked out source tree for orphan branch");
        }

        let committed = point_head_at_unborn(&repo, branch)
            .and_then(|()| stage_all(&repo, IndexAddOption::DEFAULT))
            .and_then(|()| commit_index(&repo, ORPHAN_COMMIT_MESSAGE));
        let oid = match committed {
            Ok(oid) => oid,
            Err(e) => {
                if let Err(rollback) = checkpoint.rollback(&repo, source_tree) {
                    tracing::warn!(
                        error = %rollback,
                        "Failed to roll back repository after orphan commit failure"
                    );
                }
                return Err(e);
            }
        };

        tracing::info!(branch = %branch, commit = %oid, "Created orphan branch");
        Ok(oid.to_string())
    }

    fn create_empty_orphan_branch(&self, repo_path: &Path, branch: &str) -> Result<()> {
        let repo = Repository::open(repo_path)?;
        ensure_branch_absent(&repo, branch)?;
        point_head_at_unborn(&repo, branch)?;

        let mut index = repo.index()?;
        index.clear()?;
        index.write()?;

        tracing::info!(branch = %branch, "Created empty orphan branch");
        Ok(())
    }

    fn list_files(&self, repo: &Path) -> Result<Vec<String>> {
        let repo = Repository::open(repo)?;
        let index = repo.index()?;

        Ok(index
            .iter()
            .map(|entry| String::from_utf8_lossy(&entry.path).into_owned())
            .collect())
    }

    fn remove_directory(&self, repo_path: &Path, name: &str) -> Result<()> {
        validate_relative(name)?;
        let dir = repo_path.join(name);
        if !dir.exists() {
            return Ok(());
        }

        fs::remove_dir_all(&dir).map_err(|e| Error::io(&dir, e))?;

        let repo = Repository::open(repo_path)?;
        let mut index = repo.index()?;
        index.remove_dir(Path::new(name), 0)?;
        index.write()?;

        tracing::debug!(dir = %name, "Removed directory from working tree and index");
        Ok(())
    }

    fn clean_workdir(&self, repo_path: &Path) -> Result<()> {
        let repo = Repository::open(repo_path)?;
        let mut opts = StatusOptions::new();
        opts.include_untracked(true)
            .include_ignored(true)
            .recurse_untracked_dirs(false)
            .recurse_ignored_dirs(false);

        let statuses = repo.statuses(Some(&mut opts))?;
        let mut removed = 0usize;
        for entry in statuses.iter() {
            if !entry.status().intersects(Status::WT_NEW | Status::IGNORED) {
                continue;
            }
            let Some(relative) = entry.path() else {
                continue;
            };

            let target = repo_path.join(relative.trim_end_matches('/'));
            let result = if target.is_dir() {
                fs::remove_dir_all(&target)
            } else {
                fs::remove_file(&target)
            };
            result.map_err(|e| Error::io(&target, e))?;
            removed += 1;
        }

        tracing::debug!(removed, "Cleaned working directory");
        Ok(())
    }

    fn checkout_branch(&self, repo_path: &Path, name: &str) -> Result<()> {
        let repo = Repository::open(repo_path)?;
        let mut checkout = CheckoutBuilder::new();
        checkout.force().recreate_missing(true);

        if let Ok(branch) = repo.find_branch(name, BranchType::Local) {
            let reference = branch.into_reference();
            let commit = reference.peel_to_commit()?;
            repo.checkout_tree(commit.as_object(), Some(&mut checkout))?;
            let refname = reference.name().ok_or_else(|| Error::BranchNotFound {
                name: name.to_string(),
            })?;
            repo.set_head(refname)?;
        } else {
            let commit = resolve_commit(&repo, name)?;
            repo.checkout_tree(commit.as_object(), Some(&mut checkout))?;
            repo.set_head_detached(commit.id())?;
        }

        tracing::debug!(target = %name, "Checked out");
        Ok(())
    }

    fn delete_local_branch(&self, repo: &Path, name: &str) -> Result<()> {
        let repo = Repository::open(repo)?;
        let mut branch =
            repo.find_branch(name, BranchType::Local)
                .map_err(|_| Error::BranchNotFound {
                    name: name.to_string(),
                })?;
        branch.delete()?;

        tracing::debug!(branch = %name, "Deleted local branch");
        Ok(())
    }

    fn commit(&self, repo: &Path, message: &str) -> Result<String> {
        let repo = Repository::open(repo)?;
        // Ignored files are committed too: the working tree is taken verbatim
        stage_all(&repo, IndexAddOption::FORCE)?;
        let oid = commit_index(&repo, message)?;
        Ok(oid.to_string())
    }
}
