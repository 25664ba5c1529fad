//! GitLab REST API client for reposqueeze
//!
//! Provides the [`HostingGateway`] trait the squeeze workflows depend on and a
//! [`GitLabClient`] implementing it against the GitLab v4 API.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use squeeze_gitlab::{GitLabClient, HostingGateway};
//!
//! # async fn example() -> squeeze_gitlab::Result<()> {
//! let client = GitLabClient::new("glpat-token");
//! let matches = client.find_projects_by_name("demo").await?;
//! println!("{} project(s) named demo", matches.len());
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod error;
pub mod gateway;
pub mod types;

pub use client::{DEFAULT_GITLAB_URL, GitLabClient};
pub use error::{Error, Result};
pub use gateway::HostingGateway;
pub use reqwest::StatusCode;
pub use types::{ActionKind, CommitAction, Encoding, Project};
