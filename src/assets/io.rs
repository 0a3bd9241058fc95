use std::path::{Path, PathBuf};

use crate::errors::Result;

/// Asset reader trait.
/// Paths are the canonical strings produced by [`simplify_path`].
pub trait AssetReader: Send + Sync {
    fn file_exists(&self, path: &str) -> bool;

    fn read_whole_file(&self, path: &str) -> Result<Vec<u8>>;
}

/// Local file system reader. Relative paths resolve against `root_path`.
#[derive(Debug, Clone, Default)]
pub struct FileAssetReader {
    root_path: PathBuf,
}

impl FileAssetReader {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            root_path: path.as_ref().to_path_buf(),
        }
    }

    #[inline]
    pub fn root_path(&self) -> &Path {
        &self.root_path
    }

    fn resolve(&self, path: &str) -> PathBuf {
        self.root_path.join(path)
    }
}

impl AssetReader for FileAssetReader {
    fn file_exists(&self, path: &str) -> bool {
        self.resolve(path).is_file()
    }

    fn read_whole_file(&self, path: &str) -> Result<Vec<u8>> {
        Ok(std::fs::read(self.resolve(path))?)
    }
}

/// Canonical form of a path, used as cache key.
///
/// Separators become `/`, repeated separators collapse, `.` segments are
/// dropped and `..` removes the preceding segment when there is one. A
/// leading `/` is kept. Case is preserved.
#[must_use]
pub fn simplify_path(path: &str) -> String {
    let normalized = path.replace('\\', "/");
    let absolute = normalized.starts_with('/');

    let mut parts: Vec<&str> = Vec::new();
    for part in normalized.split('/') {
        match part {
            "" | "." => {}
            ".." => match parts.last() {
                Some(&last) if last != ".." => {
                    parts.pop();
                }
                _ if absolute => {}
                _ => parts.push(".."),
            },
            other => parts.push(other),
        }
    }

    let joined = parts.join("/");
    if absolute {
        format!("/{joined}")
    } else {
        joined
    }
}

/// Directory part of `file_name` including the trailing separator, or an
/// empty string when it has none.
#[must_use]
pub fn base_dir(file_name: &str) -> String {
    let normalized = file_name.replace('\\', "/");
    match normalized.rfind('/') {
        Some(pos) => normalized[..=pos].to_string(),
        None => String::new(),
    }
}
