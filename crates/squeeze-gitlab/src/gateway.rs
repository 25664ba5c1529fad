//! Gateway trait for the hosting service

use async_trait::async_trait;

use crate::{CommitAction, Project, Result};

/// Remote project operations used by the squeeze workflows.
#[async_trait]
pub trait HostingGateway: Send + Sync {
    /// Owned projects whose name equals `name` exactly.
    async fn find_projects_by_name(&self, name: &str) -> Result<Vec<Project>>;

    /// Delete a project and its full history.
    async fn delete_project(&self, project_id: u64) -> Result<()>;

    /// Create an empty project.
    async fn create_project(&self, name: &str) -> Result<Project>;

    /// Create one commit on `branch` containing every action.
    async fn commit_files(
        &self,
        project_id: u64,
        branch: &str,
        message: &str,
        actions: Vec<CommitAction>,
    ) -> Result<()>;

    /// Zip archive of the project's default branch.
    async fn download_repo_archive(&self, project_id: u64) -> Result<Vec<u8>>;
}
