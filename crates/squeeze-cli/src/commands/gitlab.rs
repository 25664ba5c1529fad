use std::path::PathBuf;

use colored::Colorize;
use squeeze_core::{SqueezeRequest, WorkflowKind};

use super::{Context, print_report, print_start, until_interrupted};
use crate::error::Result;

/// `create-from-gitlab`: rebuild a local orphan branch from the project archive.
pub async fn run(context: &Context, repo_path: PathBuf, branch_name: String) -> Result<()> {
    let request = SqueezeRequest::new(repo_path, branch_name);

    print_start("Reconstructing into", &request.repo_path);
    let report = until_interrupted(
        context
            .squeezer
            .run(WorkflowKind::RemoteToLocal, &request),
    )
    .await?;

    if report.files == 0 {
        println!(
            "{} Nothing to reconstruct for '{}'.",
            "OK".green().bold(),
            request.branch.cyan()
        );
    } else {
        println!(
            "{} Successfully created orphan branch '{}' from GitLab.",
            "OK".green().bold(),
            request.branch.cyan()
        );
    }
    print_report(&report);
    Ok(())
}
