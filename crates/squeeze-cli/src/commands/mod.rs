//! Command implementations for squeeze-cli

pub mod gitlab;
pub mod local;

use std::future::Future;
use std::path::Path;

use colored::Colorize;
use squeeze_core::{Settings, SqueezeReport, Squeezer};
use squeeze_git::Git2Gateway;
use squeeze_gitlab::{DEFAULT_GITLAB_URL, GitLabClient};

use crate::cli::{Cli, Commands};
use crate::error::{CliError, Result};

/// Everything resolved from flags, environment and the settings file.
pub struct Context {
    pub squeezer: Squeezer,
    pub settings: Settings,
}

impl Context {
    /// Resolve settings and construct both gateways.
    ///
    /// Precedence: flag or environment variable, then the settings file, then defaults.
    pub fn from_cli(
        token: Option<String>,
        gitlab_url: Option<String>,
        config: Option<&Path>,
    ) -> Result<Self> {
        let settings = match config {
            Some(path) => Settings::load(path)?,
            None => Settings::default(),
        };

        let token = token.filter(|t| !t.is_empty()).ok_or_else(|| {
            CliError::user("GITLAB_TOKEN is not set; pass --token or export GITLAB_TOKEN")
        })?;
        let base_url = gitlab_url
            .or_else(|| settings.gitlab_url.clone())
            .unwrap_or_else(|| DEFAULT_GITLAB_URL.to_string());

        let hosting = GitLabClient::with_base_url(token, base_url);
        tracing::debug!(api_url = %hosting.api_url(), "Configured GitLab client");

        Ok(Self {
            squeezer: Squeezer::new(Box::new(Git2Gateway::new()), Box::new(hosting)),
            settings,
        })
    }
}

/// Dispatch a parsed command line.
pub async fn execute(cli: Cli) -> Result<()> {
    let context = Context::from_cli(cli.token, cli.gitlab_url, cli.config.as_deref())?;

    match cli.command {
        Commands::CreateFromLocal {
            repo_path,
            branch_name,
            from,
            exclude,
        } => local::run(&context, repo_path, branch_name, from, exclude).await,
        Commands::CreateFromGitlab {
            repo_path,
            branch_name,
        } => gitlab::run(&context, repo_path, branch_name).await,
    }
}

/// Run a workflow until it finishes or Ctrl-C arrives.
///
/// On Ctrl-C the workflow future is dropped, which restores the prior branch.
async fn until_interrupted<F>(workflow: F) -> Result<SqueezeReport>
where
    F: Future<Output = squeeze_core::Result<SqueezeReport>>,
{
    tokio::select! {
        report = workflow => report.map_err(CliError::from_workflow),
        signal = tokio::signal::ctrl_c() => {
            signal?;
            Err(CliError::Interrupted)
        }
    }
}

fn print_start(action: &str, repo_path: &Path) {
    println!("{} {} {}", "=>".blue().bold(), action, repo_path.display());
}

fn print_report(report: &SqueezeReport) {
    println!(
        "{} Copied {} files in {:?}.",
        "OK".green().bold(),
        report.files,
        report.duration
    );
}
