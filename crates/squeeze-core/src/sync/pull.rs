use std::time::Instant;

use async_trait::async_trait;
use tracing::info;

use super::archive;
use super::{ContentSync, SqueezeReport, SyncContext, commit_message};
use crate::Result;

/// Rebuilds the hosted default branch locally from its archive.
///
/// Makes no remote commit. Files already extracted are left on disk if a
/// later entry fails.
#[derive(Debug, Default, Clone, Copy)]
pub struct PullSync;

#[async_trait]
impl ContentSync for PullSync {
    async fn sync(&self, ctx: &SyncContext<'_>) -> Result<SqueezeReport> {
        let bytes = ctx.hosting.download_repo_archive(ctx.project.id).await?;
        let files = archive::extract(&bytes, ctx.repo)?;

        let message = commit_message(ctx.branch);
        let started = Instant::now();
        let commit = ctx.git.commit(ctx.repo, &message)?;
        let duration = started.elapsed();

        info!(
            project_id = ctx.project.id,
            branch = %ctx.branch,
            commit = %commit,
            files,
            elapsed_ms = duration.as_millis() as u64,
            "Committed archive snapshot"
        );
        Ok(SqueezeReport { duration, files })
    }
}
