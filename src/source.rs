use anyhow::{Context, Result};
use log::{debug, warn};
use std::fs;
use std::path::{Component, Path, PathBuf};

/// Loader for source files handed to the extractors.
///
/// Extraction works on raw text, so loading a file is just reading it and recording where it
/// lives relative to the project root.
///
/// # Example
///
/// ```no_run
/// use apidoc_from_source::source::SourceReader;
/// use std::path::Path;
///
/// let root = Path::new("./my-api");
/// let file = SourceReader::read_file(&root.join("src/app.js"), root).unwrap();
/// println!("{} has {} bytes", file.relative_path, file.content.len());
/// ```
pub struct SourceReader;

/// A source file read into memory.
#[derive(Debug, Clone)]
pub struct SourceFile {
    /// Path relative to the project root, always with `/` separators
    pub relative_path: String,
    /// Raw file text
    pub content: String,
}

impl SourceFile {
    /// Build a source file from in-memory text.
    pub fn from_text(relative_path: &str, content: &str) -> Self {
        Self {
            relative_path: normalize_separators(relative_path),
            content: content.to_string(),
        }
    }

    /// File name without directories, e.g. `users.controller.ts`
    pub fn file_name(&self) -> &str {
        self.relative_path.rsplit('/').next().unwrap_or(&self.relative_path)
    }
}

impl SourceReader {
    /// Reads a single file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or is not valid UTF-8.
    pub fn read_file(path: &Path, project_root: &Path) -> Result<SourceFile> {
        debug!("Reading file: {}", path.display());

        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read file: {}", path.display()))?;

        Ok(SourceFile {
            relative_path: relative_to(path, project_root),
            content,
        })
    }

    /// Reads multiple files, continuing even if some fail.
    ///
    /// Each failure is logged as a warning and returned in place; the caller decides whether to
    /// skip it. One unreadable file never prevents the others from loading.
    pub fn read_files(paths: &[PathBuf], project_root: &Path) -> Vec<Result<SourceFile>> {
        debug!("Reading {} files", paths.len());

        let results: Vec<Result<SourceFile>> = paths
            .iter()
            .map(|path| match Self::read_file(path, project_root) {
                Ok(file) => Ok(file),
                Err(e) => {
                    warn!("Skipping {}: {:#}", path.display(), e);
                    Err(e)
                }
            })
            .collect();

        let success_count = results.iter().filter(|r| r.is_ok()).count();
        debug!(
            "Reading complete: {} succeeded, {} failed",
            success_count,
            results.len() - success_count
        );

        results
    }

    /// Reads multiple files and keeps only those that loaded.
    pub fn read_readable(paths: &[PathBuf], project_root: &Path) -> Vec<SourceFile> {
        Self::read_files(paths, project_root)
            .into_iter()
            .filter_map(Result::ok)
            .collect()
    }
}

/// Path of `path` relative to `root`, with `/` separators.
///
/// Paths outside the root are returned as given.
pub fn relative_to(path: &Path, root: &Path) -> String {
    let relative = path.strip_prefix(root).unwrap_or(path);
    let parts: Vec<String> = relative
        .components()
        .filter_map(|c| match c {
            Component::Normal(part) => Some(part.to_string_lossy().into_owned()),
            Component::ParentDir => Some("..".to_string()),
            _ => None,
        })
        .collect();

    if parts.is_empty() {
        normalize_separators(&relative.to_string_lossy())
    } else {
        parts.join("/")
    }
}

/// Replace backslashes with forward slashes.
pub fn normalize_separators(path: &str) -> String {
    path.replace('\\', "/")
}
