//! Remote project lifecycle: lookup, and replace-by-name

use squeeze_gitlab::{HostingGateway, Project};
use tracing::info;

use crate::{Error, Result};

/// Ensures the remote project for a name is in a known state.
///
/// Ambiguity policy: more than one exact name match is always an error, for
/// lookups and replacements alike, and nothing is mutated in that case.
pub struct ProjectLifecycle<'a> {
    hosting: &'a dyn HostingGateway,
}

impl<'a> ProjectLifecycle<'a> {
    pub fn new(hosting: &'a dyn HostingGateway) -> Self {
        Self { hosting }
    }

    /// The single project named `name`, if any.
    pub async fn lookup(&self, name: &str) -> Result<Option<Project>> {
        let mut matches = self.hosting.find_projects_by_name(name).await?;
        match matches.len() {
            0 => Ok(None),
            1 => Ok(matches.pop()),
            count => Err(Error::AmbiguousProject {
                name: name.to_string(),
                count,
            }),
        }
    }

    /// Delete any existing project named `name`, then create a fresh one.
    ///
    /// The prior project and its history are destroyed.
    pub async fn replace(&self, name: &str) -> Result<Project> {
        if let Some(existing) = self.lookup(name).await? {
            info!(project_id = existing.id, name = %name, "Deleting existing project");
            self.hosting.delete_project(existing.id).await?;
        }

        let project = self.hosting.create_project(name).await?;
        info!(project_id = project.id, name = %project.name, "Created project");
        Ok(project)
    }
}
