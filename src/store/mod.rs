//! Durable storage for generated artifacts.
//!
//! Artifacts land at `<root>/<folder>/<name>`. Folders are created on
//! demand; existing files with the same name are replaced.

use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use regex::Regex;

static WHITESPACE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").unwrap());
static UNSAFE_CHARS: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[^A-Za-z0-9.+_-]").unwrap());

/// Errors that can occur while persisting artifacts.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid artifact path: {0}")]
    InvalidPath(String),
}

pub type StoreResult<T> = Result<T, StoreError>;

/// A folder inside an artifact store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FolderHandle {
    path: PathBuf,
}

impl FolderHandle {
    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// Where persisted artifacts go.
pub trait ArtifactStore {
    /// Find a folder by relative path, creating it if needed.
    fn find_or_make(&self, path: &str) -> StoreResult<FolderHandle>;

    /// Write content into a folder, returning its durable location.
    fn persist(&self, folder: &FolderHandle, content: &[u8], name: &str) -> StoreResult<PathBuf>;
}

/// Artifact store rooted at a filesystem directory.
#[derive(Debug, Clone)]
pub struct FsArtifactStore {
    root: PathBuf,
}

impl FsArtifactStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

/// Reject anything that could escape the store root.
fn check_component(part: &str) -> StoreResult<()> {
    if part.is_empty() || part == "." || part == ".." || part.contains(['/', '\\']) {
        return Err(StoreError::InvalidPath(part.to_string()));
    }
    Ok(())
}

impl ArtifactStore for FsArtifactStore {
    fn find_or_make(&self, path: &str) -> StoreResult<FolderHandle> {
        let mut dir = self.root.clone();
        for part in path.split('/').filter(|p| !p.is_empty()) {
            check_component(part)?;
            dir.push(part);
        }
        std::fs::create_dir_all(&dir)?;
        Ok(FolderHandle { path: dir })
    }

    fn persist(&self, folder: &FolderHandle, content: &[u8], name: &str) -> StoreResult<PathBuf> {
        check_component(name)?;
        let path = folder.path.join(name);
        std::fs::write(&path, content)?;
        tracing::info!(path = %path.display(), bytes = content.len(), "persisted artifact");
        Ok(path)
    }
}

/// File-system safe stem for a report title.
///
/// Whitespace runs become `-` and anything outside `[A-Za-z0-9.+_-]` is
/// dropped. Leading dots are stripped so the stem is never hidden or a
/// relative path. An empty result becomes `report`.
pub fn sanitize_stem(title: &str) -> String {
    let dashed = WHITESPACE.replace_all(title.trim(), "-");
    let cleaned = UNSAFE_CHARS.replace_all(&dashed, "");
    let stem = cleaned.trim_start_matches('.');
    if stem.is_empty() {
        "report".to_string()
    } else {
        stem.to_string()
    }
}

/// File name for a report rendered in `format`.
pub fn sanitize_file_name(title: &str, format: &str) -> String {
    format!("{}.{}", sanitize_stem(title), sanitize_stem(format))
}
