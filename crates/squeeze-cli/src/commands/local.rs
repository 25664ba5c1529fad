use std::path::PathBuf;

use colored::Colorize;
use squeeze_core::{SqueezeRequest, WorkflowKind};

use super::{Context, print_report, print_start, until_interrupted};
use crate::error::Result;

/// `create-from-local`: replace the GitLab project with a squeezed snapshot.
pub async fn run(
    context: &Context,
    repo_path: PathBuf,
    branch_name: String,
    from: Option<String>,
    exclude: Vec<String>,
) -> Result<()> {
    let exclude = if exclude.is_empty() {
        context.settings.exclude.clone()
    } else {
        exclude
    };
    let mut request = SqueezeRequest::new(repo_path, branch_name).with_exclude(exclude);
    if let Some(source) = from {
        request = request.with_source_branch(source);
    }

    print_start("Squeezing repository", &request.repo_path);
    let report = until_interrupted(
        context
            .squeezer
            .run(WorkflowKind::LocalToRemote, &request),
    )
    .await?;

    println!(
        "{} Successfully created and pushed orphan branch '{}'.",
        "OK".green().bold(),
        request.branch.cyan()
    );
    print_report(&report);
    Ok(())
}
