//! GitLab v4 API client
//!
//! Wraps `reqwest::Client` with the `PRIVATE-TOKEN` header and endpoint
//! construction. One attempt is made per call; any unexpected status is
//! surfaced as [`Error::Status`] carrying the response body.

use async_trait::async_trait;
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use reqwest::{Client, Method, RequestBuilder, Response, StatusCode};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, info};

use crate::gateway::HostingGateway;
use crate::types::{ActionKind, CommitAction, Encoding, Project};
use crate::{Error, Result};

/// Base URL of the public GitLab instance
pub const DEFAULT_GITLAB_URL: &str = "https://gitlab.com";

/// Page size for project search; GitLab caps it at 100.
const SEARCH_PAGE_SIZE: u32 = 100;

const NEXT_PAGE_HEADER: &str = "x-next-page";

// ============================================================================
// Wire types
// ============================================================================

/// Body of `POST /projects/:id/repository/commits`
#[derive(Debug, Serialize)]
struct CommitPayload<'a> {
    branch: &'a str,
    commit_message: &'a str,
    actions: Vec<WireAction>,
}

#[derive(Debug, Serialize)]
struct WireAction {
    action: ActionKind,
    file_path: String,
    content: String,
    encoding: Encoding,
}

impl From<CommitAction> for WireAction {
    fn from(action: CommitAction) -> Self {
        let content = match action.encoding {
            Encoding::Text => STANDARD.encode(&action.content),
            Encoding::Base64 => String::from_utf8_lossy(&action.content).into_owned(),
        };
        Self {
            action: action.action,
            file_path: action.file_path,
            content,
            encoding: Encoding::Base64,
        }
    }
}

#[derive(Debug, Serialize)]
struct CreateProjectPayload<'a> {
    name: &'a str,
}

// ============================================================================
// GitLabClient
// ============================================================================

/// HTTP client for the GitLab REST API
pub struct GitLabClient {
    client: Client,
    api_url: String,
    token: String,
}

impl GitLabClient {
    /// Creates a client for gitlab.com
    pub fn new(token: impl Into<String>) -> Self {
        Self::with_base_url(token, DEFAULT_GITLAB_URL)
    }

    /// Creates a client for a self-hosted instance (or a mock server)
    ///
    /// # Arguments
    /// * `token` - Personal access token with `api` scope
    /// * `base_url` - Instance root, e.g. `https://gitlab.example.com`
    pub fn with_base_url(token: impl Into<String>, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into();
        Self {
            client: Client::new(),
            api_url: format!("{}/api/v4", base_url.trim_end_matches('/')),
            token: token.into(),
        }
    }

    /// API root all endpoint paths are appended to
    pub fn api_url(&self) -> &str {
        &self.api_url
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let url = format!("{}{}", self.api_url, path);
        self.client
            .request(method, url)
            .header("PRIVATE-TOKEN", &self.token)
    }
}

/// Fail with the status and body unless the response has the expected status.
async fn expect_status(
    response: Response,
    operation: &'static str,
    accept: impl Fn(StatusCode) -> bool,
) -> Result<Response> {
    let status = response.status();
    if accept(status) {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    Err(Error::Status {
        operation,
        status,
        body,
    })
}

/// Value of GitLab's `x-next-page` header; empty on the last page.
fn next_page(response: &Response) -> Option<String> {
    response
        .headers()
        .get(NEXT_PAGE_HEADER)
        .and_then(|value| value.to_str().ok())
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(str::to_string)
}

async fn decode<T: DeserializeOwned>(response: Response, operation: &'static str) -> Result<T> {
    let bytes = response.bytes().await?;
    serde_json::from_slice(&bytes).map_err(|source| Error::Decode { operation, source })
}

#[async_trait]
impl HostingGateway for GitLabClient {
    async fn find_projects_by_name(&self, name: &str) -> Result<Vec<Project>> {
        debug!(name = %name, "Searching owned projects");

        // `search` is a substring match, so the exact name can sit on any page
        let per_page = SEARCH_PAGE_SIZE.to_string();
        let mut page = "1".to_string();
        let mut matches = Vec::new();
        loop {
            let response = self
                .request(Method::GET, "/projects")
                .query(&[
                    ("owned", "true"),
                    ("search", name),
                    ("per_page", per_page.as_str()),
                    ("page", page.as_str()),
                ])
                .send()
                .await?;
            let response =
                expect_status(response, "find project", |s| s == StatusCode::OK).await?;
            let next_page = next_page(&response).filter(|next| *next != page);

            let projects: Vec<Project> = decode(response, "find project").await?;
            debug!(page = %page, results = projects.len(), "Fetched project search page");
            matches.extend(projects.into_iter().filter(|p| p.name == name));

            match next_page {
                Some(next) => page = next,
                None => break,
            }
        }

        Ok(matches)
    }

    async fn delete_project(&self, project_id: u64) -> Result<()> {
        info!(project_id, "Deleting project");

        let response = self
            .request(Method::DELETE, &format!("/projects/{project_id}"))
            .send()
            .await?;
        let response =
            expect_status(response, "delete project", |s| s.is_success()).await?;
        debug!(status = %response.status(), "Project deletion accepted");

        Ok(())
    }

    async fn create_project(&self, name: &str) -> Result<Project> {
        info!(name = %name, "Creating project");

        let response = self
            .request(Method::POST, "/projects")
            .json(&CreateProjectPayload { name })
            .send()
            .await?;
        let response =
            expect_status(response, "create project", |s| s == StatusCode::CREATED).await?;

        decode(response, "create project").await
    }

    async fn commit_files(
        &self,
        project_id: u64,
        branch: &str,
        message: &str,
        actions: Vec<CommitAction>,
    ) -> Result<()> {
        let count = actions.len();
        let payload = CommitPayload {
            branch,
            commit_message: message,
            actions: actions.into_iter().map(WireAction::from).collect(),
        };

        debug!(project_id, branch = %branch, actions = count, "Submitting commit");
        let response = self
            .request(
                Method::POST,
                &format!("/projects/{project_id}/repository/commits"),
            )
            .json(&payload)
            .send()
            .await?;
        expect_status(response, "create commit", |s| s == StatusCode::CREATED).await?;

        Ok(())
    }

    async fn download_repo_archive(&self, project_id: u64) -> Result<Vec<u8>> {
        debug!(project_id, "Downloading repository archive");

        let response = self
            .request(
                Method::GET,
                &format!("/projects/{project_id}/repository/archive.zip"),
            )
            .send()
            .await?;
        let response =
            expect_status(response, "download archive", |s| s == StatusCode::OK).await?;
        let bytes = response.bytes().await?;

        debug!(project_id, size = bytes.len(), "Archive downloaded");
        Ok(bytes.to_vec())
    }
}
