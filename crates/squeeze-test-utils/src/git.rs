//! Git repository fixtures.

use std::fs;
use std::path::Path;

use git2::{IndexAddOption, Repository};
use tempfile::TempDir;

/// A real git repository in a temporary directory, with one commit on `main`.
///
/// Specifically:
/// - Initialises the repository with `main` as the initial branch
/// - Configures `user.name`, `user.email` and `commit.gpgsign = false`
/// - Writes each `(path, content)` pair and commits them as "Initial commit"
///
/// # Panics
/// Panics if any filesystem or git operation fails.
pub fn real_git_repo_with_commit(files: &[(&str, &str)]) -> TempDir {
    let dir = TempDir::new().unwrap();
    init_repo_at(dir.path(), files);
    dir
}

/// Same as [`real_git_repo_with_commit`], at an explicit path.
///
/// Useful when the directory name matters, since hosted projects are named after it.
pub fn init_repo_at(root: &Path, files: &[(&str, &str)]) {
    fs::create_dir_all(root).unwrap();
    let mut opts = git2::RepositoryInitOptions::new();
    opts.initial_head("main");
    let repo = Repository::init_opts(root, &opts)
        .unwrap_or_else(|e| panic!("init_repo_at: init failed: {e}"));

    let mut config = repo.config().unwrap();
    config.set_str("user.name", "Test User").unwrap();
    config.set_str("user.email", "test@test.com").unwrap();
    config.set_bool("commit.gpgsign", false).unwrap();

    write_files(root, files);
    commit_all(root, "Initial commit");
}

/// Write `(path, content)` pairs relative to `root`, creating parent directories.
pub fn write_files(root: &Path, files: &[(&str, &str)]) {
    for (path, content) in files {
        let full = root.join(path);
        if let Some(parent) = full.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(&full, content)
            .unwrap_or_else(|e| panic!("write_files: failed to write {}: {e}", full.display()));
    }
}

/// Stage everything and commit on top of HEAD.
///
/// # Panics
/// Panics if any git operation fails.
pub fn commit_all(root: &Path, message: &str) {
    let repo = Repository::open(root).unwrap();
    let mut index = repo.index().unwrap();
    index
        .add_all(["*"].iter(), IndexAddOption::DEFAULT, None)
        .unwrap();
    index.update_all(["*"].iter(), None).unwrap();
    index.write().unwrap();

    let tree = repo.find_tree(index.write_tree().unwrap()).unwrap();
    let sig = repo.signature().unwrap();
    let parent = repo.head().ok().and_then(|h| h.peel_to_commit().ok());
    let parents: Vec<_> = parent.iter().collect();
    repo.commit(Some("HEAD"), &sig, &sig, message, &tree, &parents)
        .unwrap();
}

/// Create a local branch at HEAD without checking it out.
pub fn create_branch(root: &Path, name: &str) {
    let repo = Repository::open(root).unwrap();
    let head = repo.head().unwrap().peel_to_commit().unwrap();
    repo.branch(name, &head, false).unwrap();
}

/// Name of the checked-out branch.
pub fn head_branch(root: &Path) -> String {
    let repo = Repository::open(root).unwrap();
    let head = repo.head().unwrap();
    head.shorthand().unwrap().to_string()
}

/// Whether a local branch with this name exists.
pub fn branch_exists(root: &Path, name: &str) -> bool {
    let repo = Repository::open(root).unwrap();
    repo.find_branch(name, git2::BranchType::Local).is_ok()
}

/// Paths in the tree of the given branch's tip commit, sorted.
pub fn tree_paths(root: &Path, branch: &str) -> Vec<String> {
    let repo = Repository::open(root).unwrap();
    let commit = repo
        .find_branch(branch, git2::BranchType::Local)
        .unwrap()
        .get()
        .peel_to_commit()
        .unwrap();

    let mut paths = Vec::new();
    commit
        .tree()
        .unwrap()
        .walk(git2::TreeWalkMode::PreOrder, |dir, entry| {
            if entry.kind() == Some(git2::ObjectType::Blob) {
                paths.push(format!("{dir}{}", entry.name().unwrap()));
            }
            git2::TreeWalkResult::Ok
        })
        .unwrap();
    paths.sort();
    paths
}
