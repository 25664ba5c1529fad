//! [`ZipBuilder`] for repository archives shaped like the ones GitLab serves.

use std::io::{Cursor, Write};

use zip::ZipWriter;
use zip::write::SimpleFileOptions;

/// Builds an in-memory zip whose entries live under one synthetic root directory.
///
/// # Example
///
/// ```rust
/// use squeeze_test_utils::archive::ZipBuilder;
///
/// let bytes = ZipBuilder::new("demo-main-abc123")
///     .file("a.txt", b"hello")
///     .file("b/c.txt", b"nested")
///     .build();
/// assert!(!bytes.is_empty());
/// ```
pub struct ZipBuilder {
    writer: ZipWriter<Cursor<Vec<u8>>>,
    root: String,
}

impl ZipBuilder {
    /// Start an archive rooted at `root/`, with the root directory entry first.
    pub fn new(root: &str) -> Self {
        let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
        writer
            .add_directory(format!("{root}/"), SimpleFileOptions::default())
            .unwrap();
        Self {
            writer,
            root: root.to_string(),
        }
    }

    /// Add a directory entry under the root.
    pub fn dir(mut self, path: &str) -> Self {
        self.writer
            .add_directory(format!("{}/{path}/", self.root), SimpleFileOptions::default())
            .unwrap();
        self
    }

    /// Add a file entry under the root with mode 0644.
    pub fn file(self, path: &str, content: &[u8]) -> Self {
        self.file_with_mode(path, content, 0o644)
    }

    /// Add a file entry under the root with explicit unix permission bits.
    pub fn file_with_mode(mut self, path: &str, content: &[u8], mode: u32) -> Self {
        let options = SimpleFileOptions::default().unix_permissions(mode);
        self.writer
            .start_file(format!("{}/{path}", self.root), options)
            .unwrap();
        self.writer.write_all(content).unwrap();
        self
    }

    /// Add an entry with a raw name, outside the root convention.
    pub fn raw_file(mut self, name: &str, content: &[u8]) -> Self {
        self.writer
            .start_file(name, SimpleFileOptions::default())
            .unwrap();
        self.writer.write_all(content).unwrap();
        self
    }

    /// Finish the archive and return its bytes.
    pub fn build(self) -> Vec<u8> {
        self.writer.finish().unwrap().into_inner()
    }
}
