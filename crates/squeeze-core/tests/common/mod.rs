//! In-memory gateway fakes shared by the workflow tests
//!
//! Both fakes keep their state behind an `Arc`, so a test can hand a clone to
//! the `Squeezer` and inspect the recorded calls afterwards.

#![allow(dead_code)]

use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;
use squeeze_gitlab::{CommitAction, HostingGateway, Project, StatusCode};

#[derive(Debug, Default)]
pub struct GitState {
    pub calls: Vec<String>,
    pub head: String,
    pub files: Vec<String>,
    pub fail_on: Option<&'static str>,
}

#[derive(Clone, Default)]
pub struct FakeGit {
    state: Arc<Mutex<GitState>>,
}

impl FakeGit {
    pub fn new(files: &[&str]) -> Self {
        let fake = Self::default();
        {
            let mut state = fake.state();
            state.head = "main".to_string();
            state.files = files.iter().map(|f| f.to_string()).collect();
        }
        fake
    }

    /// Make every call to `method` fail.
    pub fn failing_on(self, method: &'static str) -> Self {
        self.state().fail_on = Some(method);
        self
    }

    pub fn state(&self) -> MutexGuard<'_, GitState> {
        self.state.lock().unwrap()
    }

    pub fn calls(&self) -> Vec<String> {
        self.state().calls.clone()
    }

    fn record(&self, method: &'static str, detail: &str) -> squeeze_git::Result<()> {
        let mut state = self.state();
        let call = if detail.is_empty() {
            method.to_string()
        } else {
            format!("{method} {detail}")
        };
        state.calls.push(call);
        if state.fail_on == Some(method) {
            return Err(git2::Error::from_str(&format!("injected {method} failure")).into());
        }
        Ok(())
    }
}

impl squeeze_git::GitGateway for FakeGit {
    fn current_head(&self, _repo: &Path) -> squeeze_git::Result<String> {
        self.record("current_head", "")?;
        Ok(self.state().head.clone())
    }

    fn create_orphan_branch(
        &self,
        _repo: &Path,
        branch: &str,
        source: Option<&str>,
    ) -> squeeze_git::Result<String> {
        let detail = match source {
            Some(source) => format!("{branch} from {source}"),
            None => branch.to_string(),
        };
        self.record("create_orphan_branch", &detail)?;
        self.state().head = branch.to_string();
        Ok("0123abcd".to_string())
    }

    fn create_empty_orphan_branch(&self, _repo: &Path, branch: &str) -> squeeze_git::Result<()> {
        self.record("create_empty_orphan_branch", branch)?;
        self.state().head = branch.to_string();
        Ok(())
    }

    fn list_files(&self, _repo: &Path) -> squeeze_git::Result<Vec<String>> {
        self.record("list_files", "")?;
        Ok(self.state().files.clone())
    }

    fn remove_directory(&self, _repo: &Path, name: &str) -> squeeze_git::Result<()> {
        self.record("remove_directory", name)?;
        let prefix = format!("{name}/");
        self.state().files.retain(|f| !f.starts_with(&prefix));
        Ok(())
    }

    fn clean_workdir(&self, _repo: &Path) -> squeeze_git::Result<()> {
        self.record("clean_workdir", "")
    }

    fn checkout_branch(&self, _repo: &Path, name: &str) -> squeeze_git::Result<()> {
        self.record("checkout_branch", name)?;
        self.state().head = name.to_string();
        Ok(())
    }

    fn delete_local_branch(&self, _repo: &Path, name: &str) -> squeeze_git::Result<()> {
        self.record("delete_local_branch", name)
    }

    fn commit(&self, _repo: &Path, message: &str) -> squeeze_git::Result<String> {
        self.record("commit", message)?;
        Ok("4567cdef".to_string())
    }
}

#[derive(Debug, Clone)]
pub struct RecordedCommit {
    pub project_id: u64,
    pub branch: String,
    pub message: String,
    pub actions: Vec<CommitAction>,
}

#[derive(Debug, Default)]
pub struct HostingState {
    pub projects: Vec<Project>,
    pub next_id: u64,
    pub deleted: Vec<u64>,
    pub created: Vec<String>,
    pub commits: Vec<RecordedCommit>,
    pub downloads: Vec<u64>,
    pub archive: Vec<u8>,
    pub fail_on: Option<&'static str>,
}

#[derive(Clone, Default)]
pub struct FakeHosting {
    state: Arc<Mutex<HostingState>>,
}

impl FakeHosting {
    pub fn new() -> Self {
        let fake = Self::default();
        fake.state().next_id = 100;
        fake
    }

    pub fn with_project(self, id: u64, name: &str) -> Self {
        self.state().projects.push(Project {
            id,
            name: name.to_string(),
        });
        self
    }

    pub fn with_archive(self, bytes: Vec<u8>) -> Self {
        self.state().archive = bytes;
        self
    }

    /// Make every call to `operation` fail with a 500.
    pub fn failing_on(self, operation: &'static str) -> Self {
        self.state().fail_on = Some(operation);
        self
    }

    pub fn state(&self) -> MutexGuard<'_, HostingState> {
        self.state.lock().unwrap()
    }

    fn check(&self, operation: &'static str) -> squeeze_gitlab::Result<()> {
        if self.state().fail_on == Some(operation) {
            return Err(squeeze_gitlab::Error::Status {
                operation,
                status: StatusCode::INTERNAL_SERVER_ERROR,
                body: "injected failure".to_string(),
            });
        }
        Ok(())
    }
}

#[async_trait]
impl HostingGateway for FakeHosting {
    async fn find_projects_by_name(&self, name: &str) -> squeeze_gitlab::Result<Vec<Project>> {
        self.check("find project")?;
        Ok(self
            .state()
            .projects
            .iter()
            .filter(|p| p.name == name)
            .cloned()
            .collect())
    }

    async fn delete_project(&self, project_id: u64) -> squeeze_gitlab::Result<()> {
        self.check("delete project")?;
        let mut state = self.state();
        state.projects.retain(|p| p.id != project_id);
        state.deleted.push(project_id);
        Ok(())
    }

    async fn create_project(&self, name: &str) -> squeeze_gitlab::Result<Project> {
        self.check("create project")?;
        let mut state = self.state();
        let project = Project {
            id: state.next_id,
            name: name.to_string(),
        };
        state.next_id += 1;
        state.projects.push(project.clone());
        state.created.push(name.to_string());
        Ok(project)
    }

    async fn commit_files(
        &self,
        project_id: u64,
        branch: &str,
        message: &str,
        actions: Vec<CommitAction>,
    ) -> squeeze_gitlab::Result<()> {
        self.check("create commit")?;
        self.state().commits.push(RecordedCommit {
            project_id,
            branch: branch.to_string(),
            message: message.to_string(),
            actions,
        });
        Ok(())
    }

    async fn download_repo_archive(&self, project_id: u64) -> squeeze_gitlab::Result<Vec<u8>> {
        self.check("download archive")?;
        let mut state = self.state();
        state.downloads.push(project_id);
        Ok(state.archive.clone())
    }
}
