//! Hosting API data types

use serde::{Deserialize, Serialize};

/// A project on the hosting service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Project {
    pub id: u64,
    pub name: String,
}

/// File operation inside a batched commit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActionKind {
    Create,
    Update,
    Delete,
}

/// How [`CommitAction::content`] is encoded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Encoding {
    /// Raw file bytes; the gateway re-encodes before transmission.
    Text,
    /// Content is already base64 text.
    Base64,
}

/// One file's worth of a remote commit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommitAction {
    pub action: ActionKind,
    pub file_path: String,
    pub content: Vec<u8>,
    pub encoding: Encoding,
}

impl CommitAction {
    /// A `create` action carrying raw file content.
    pub fn create(file_path: impl Into<String>, content: Vec<u8>) -> Self {
        Self {
            action: ActionKind::Create,
            file_path: file_path.into(),
            content,
            encoding: Encoding::Text,
        }
    }
}
