//! CLI argument parsing using clap derive

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// reposqueeze - Publish a repository as a single-commit orphan branch
#[derive(Parser, Debug)]
#[command(name = "reposqueeze")]
#[command(author, version, about, long_about = None)]
#[command(arg_required_else_help = true)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// GitLab personal access token
    #[arg(long, global = true, env = "GITLAB_TOKEN", hide_env_values = true)]
    pub token: Option<String>,

    /// Root URL of the GitLab instance
    #[arg(long, global = true, env = "GITLAB_URL")]
    pub gitlab_url: Option<String>,

    /// Settings file (TOML)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// The command to run
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// Replace the GitLab project with a single-commit snapshot of a local repository
    ///
    /// The project is named after the repository directory. Any existing
    /// project with that name is deleted first.
    ///
    /// Examples:
    ///   reposqueeze create-from-local --repo-path ./demo --branch-name squeeze
    ///   reposqueeze create-from-local --repo-path ./demo --branch-name squeeze --from release
    CreateFromLocal {
        /// Path to the local repository
        #[arg(long)]
        repo_path: PathBuf,

        /// Name of the orphan branch to create
        #[arg(long)]
        branch_name: String,

        /// Branch whose tree is snapshotted instead of the working tree
        #[arg(long)]
        from: Option<String>,

        /// Directory to leave out of the snapshot (repeatable)
        #[arg(long)]
        exclude: Vec<String>,
    },

    /// Rebuild a local orphan branch from the GitLab project's archive
    CreateFromGitlab {
        /// Path to the local repository
        #[arg(long)]
        repo_path: PathBuf,

        /// Name of the orphan branch to create
        #[arg(long)]
        branch_name: String,
    },
}
