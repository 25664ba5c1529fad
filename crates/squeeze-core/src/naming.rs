//! Remote project name derivation

use std::path::{Component, Path};

use crate::{Error, Result};

const GIT_SUFFIX: &str = ".git";

/// Derive the remote project name from a repository path.
///
/// Takes the final path segment after stripping a trailing `.git` suffix, so
/// `/src/demo`, `/src/demo/`, `/src/demo.git` and `/src/demo/.git` all give
/// `demo`. Paths without a usable final segment (`.`, `..`) are canonicalized
/// first.
pub fn derive_project_name(repo_path: &Path) -> Result<String> {
    if let Some(name) = final_segment(repo_path) {
        return Ok(name);
    }

    let canonical = dunce::canonicalize(repo_path).map_err(|e| Error::io(repo_path, e))?;
    final_segment(&canonical).ok_or_else(|| Error::InvalidRepoPath {
        path: repo_path.to_path_buf(),
    })
}

fn final_segment(path: &Path) -> Option<String> {
    let raw = path.to_string_lossy();
    let trimmed = raw.trim_end_matches(['/', '\\']);
    let trimmed = trimmed.strip_suffix(GIT_SUFFIX).unwrap_or(trimmed);
    let trimmed = trimmed.trim_end_matches(['/', '\\']);

    match Path::new(trimmed).components().next_back()? {
        Component::Normal(name) => Some(name.to_string_lossy().into_owned()),
        _ => None,
    }
}
