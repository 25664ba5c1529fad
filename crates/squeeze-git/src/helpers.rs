//! Shared git2 helper functions for the orphan-branch operations

use std::fs;
use std::path::{Component, Path, PathBuf};

use git2::build::CheckoutBuilder;
use git2::{BranchType, Commit, Delta, ErrorCode, IndexAddOption, Oid, Repository};

use crate::{Error, Result};

/// Refuse to reuse an existing local branch name.
pub fn ensure_branch_absent(repo: &Repository, name: &str) -> Result<()> {
    if repo.find_branch(name, BranchType::Local).is_ok() {
        return Err(Error::BranchExists {
            name: name.to_string(),
        });
    }
    Ok(())
}

/// Resolve a local branch name or any revspec to a commit.
pub fn resolve_commit<'r>(repo: &'r Repository, name: &str) -> Result<Commit<'r>> {
    if let Ok(branch) = repo.find_branch(name, BranchType::Local) {
        return Ok(branch.get().peel_to_commit()?);
    }
    repo.revparse_single(name)
        .and_then(|object| object.peel_to_commit())
        .map_err(|_| Error::BranchNotFound {
            name: name.to_string(),
        })
}

/// Where HEAD pointed before an orphan branch was started.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PriorHead {
    Branch(String),
    Detached(Oid),
}

/// Record the current HEAD so it can be put back if the orphan commit fails.
pub fn capture_head(repo: &Repository) -> Result<PriorHead> {
    let head = repo.head()?;
    match head.name() {
        Some(refname) if head.is_branch() => Ok(PriorHead::Branch(refname.to_string())),
        _ => Ok(PriorHead::Detached(head.peel_to_commit()?.id())),
    }
}

/// Point HEAD back at a recorded position without touching the working tree.
pub fn restore_head(repo: &Repository, prior: &PriorHead) -> Result<()> {
    match prior {
        PriorHead::Branch(refname) => repo.set_head(refname)?,
        PriorHead::Detached(oid) => repo.set_head_detached(*oid)?,
    }
    Ok(())
}

/// Repository state recorded before an orphan branch is started.
#[derive(Debug, Clone)]
pub struct Checkpoint {
    head: PriorHead,
    head_tree: Oid,
    index_tree: Oid,
}

impl Checkpoint {
    /// Record HEAD, its tree and the current index.
    pub fn capture(repo: &Repository) -> Result<Self> {
        let head = capture_head(repo)?;
        let head_tree = repo.head()?.peel_to_tree()?.id();
        let index_tree = repo.index()?.write_tree()?;
        Ok(Self {
            head,
            head_tree,
            index_tree,
        })
    }

    /// Put HEAD, the index and the working tree back as they were.
    ///
    /// When a source tree was checked out over the working tree, only the paths
    /// that differ between it and the prior HEAD tree are reverted, so unrelated
    /// uncommitted edits survive.
    pub fn rollback(&self, repo: &Repository, source_tree: Option<Oid>) -> Result<()> {
        restore_head(repo, &self.head)?;

        if let Some(source_tree) = source_tree {
            self.revert_source_checkout(repo, source_tree)?;
        }

        let mut index = repo.index()?;
        index.read_tree(&repo.find_tree(self.index_tree)?)?;
        index.write()?;
        Ok(())
    }

    fn revert_source_checkout(&self, repo: &Repository, source_tree: Oid) -> Result<()> {
        let prior_tree = repo.find_tree(self.head_tree)?;
        let source_tree = repo.find_tree(source_tree)?;
        let diff = repo.diff_tree_to_tree(Some(&prior_tree), Some(&source_tree), None)?;

        let mut restored: Vec<PathBuf> = Vec::new();
        let mut added: Vec<PathBuf> = Vec::new();
        for delta in diff.deltas() {
            match delta.status() {
                Delta::Added => added.extend(delta.new_file().path().map(Path::to_path_buf)),
                _ => restored.extend(delta.old_file().path().map(Path::to_path_buf)),
            }
        }

        if !restored.is_empty() {
            let mut checkout = CheckoutBuilder::new();
            checkout
                .force()
                .recreate_missing(true)
                .disable_pathspec_match(true);
            for path in &restored {
                checkout.path(path.as_path());
            }
            repo.checkout_tree(prior_tree.as_object(), Some(&mut checkout))?;
        }

        let Some(workdir) = repo.workdir() else {
            return Ok(());
        };
        for path in added {
            let full = workdir.join(&path);
            if full.is_file() {
                fs::remove_file(&full).map_err(|e| Error::io(&full, e))?;
            }
            // Drop directories the source checkout created; non-empty ones stay
            if let Some(parent) = full.parent().filter(|p| *p != workdir) {
                let _ = fs::remove_dir(parent);
            }
        }
        Ok(())
    }
}

/// Point HEAD at a branch that has no commits yet.
pub fn point_head_at_unborn(repo: &Repository, branch: &str) -> Result<()> {
    repo.set_head(&format!("refs/heads/{branch}"))?;
    Ok(())
}

/// Stage every change in the working tree, including deletions.
///
/// With [`IndexAddOption::DEFAULT`] this is `git add -A` and ignore rules are
/// honoured; [`IndexAddOption::FORCE`] stages ignored files as well.
pub fn stage_all(repo: &Repository, mode: IndexAddOption) -> Result<()> {
    let mut index = repo.index()?;
    index.add_all(["*"].iter(), mode, None)?;
    index.update_all(["*"].iter(), None)?;
    index.write()?;
    Ok(())
}

/// Commit the current index on top of HEAD, or as a root commit when HEAD is unborn.
pub fn commit_index(repo: &Repository, message: &str) -> Result<Oid> {
    let mut index = repo.index()?;
    let tree_id = index.write_tree()?;
    let tree = repo.find_tree(tree_id)?;
    let signature = repo.signature()?;

    let parent = match repo.head() {
        Ok(head) => Some(head.peel_to_commit()?),
        Err(e) if e.code() == ErrorCode::UnbornBranch || e.code() == ErrorCode::NotFound => None,
        Err(e) => return Err(e.into()),
    };
    let parents: Vec<&Commit<'_>> = parent.iter().collect();

    let oid = repo.commit(Some("HEAD"), &signature, &signature, message, &tree, &parents)?;
    Ok(oid)
}

/// Reject names that are absolute or climb out of the working tree.
pub fn validate_relative(name: &str) -> Result<()> {
    let path = Path::new(name);
    let escapes = path.components().any(|c| {
        matches!(
            c,
            Component::ParentDir | Component::RootDir | Component::Prefix(_)
        )
    });
    if name.is_empty() || escapes {
        return Err(Error::InvalidPath {
            path: name.to_string(),
        });
    }
    Ok(())
}
