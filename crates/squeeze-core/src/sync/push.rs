use std::fs;
use std::path::Path;
use std::time::Instant;

use async_trait::async_trait;
use squeeze_gitlab::CommitAction;
use tracing::{debug, info};

use super::{ContentSync, SqueezeReport, SyncContext, commit_message};
use crate::{Error, Result};

/// Publishes every tracked file in one remote commit.
#[derive(Debug, Default, Clone, Copy)]
pub struct PushSync;

#[async_trait]
impl ContentSync for PushSync {
    async fn sync(&self, ctx: &SyncContext<'_>) -> Result<SqueezeReport> {
        let files = ctx.git.list_files(ctx.repo)?;
        if files.is_empty() {
            return Err(Error::NoFiles);
        }

        let actions = collect_actions(ctx.repo, &files)?;
        let count = actions.len();
        debug!(files = count, "Collected commit actions");

        let message = commit_message(ctx.branch);
        let started = Instant::now();
        ctx.hosting
            .commit_files(ctx.project.id, ctx.branch, &message, actions)
            .await?;
        let duration = started.elapsed();

        info!(
            project_id = ctx.project.id,
            branch = %ctx.branch,
            files = count,
            elapsed_ms = duration.as_millis() as u64,
            "Pushed snapshot commit"
        );
        Ok(SqueezeReport {
            duration,
            files: count,
        })
    }
}

/// One `create` action per file, read in full. Any unreadable file fails the batch.
pub fn collect_actions(repo: &Path, files: &[String]) -> Result<Vec<CommitAction>> {
    files
        .iter()
        .map(|file| {
            let path = repo.join(file);
            let content = fs::read(&path).map_err(|e| Error::io(&path, e))?;
            Ok(CommitAction::create(file.clone(), content))
        })
        .collect()
}
