//! Local git operations for reposqueeze
//!
//! Exposes the orphan-branch operations the squeeze workflows need behind the
//! [`GitGateway`] trait, with a libgit2-backed implementation.

pub mod error;
pub mod gateway;
pub mod git2_gateway;
mod helpers;

pub use error::{Error, Result};
pub use gateway::GitGateway;
pub use git2_gateway::Git2Gateway;
