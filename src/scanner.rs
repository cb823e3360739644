use crate::extractor::annotated::{CONTROLLER_SUFFIX, DTO_SUFFIX};
use log::{debug, warn};
use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::{DirEntry, WalkDir};

/// Source directories tried by the annotation-aware strategy, in order.
pub const ANNOTATED_SOURCE_DIRS: &[&str] = &["src", "app", "routes", "controllers", "api", "lib"];

/// Source directories tried by the generic strategy, in order.
pub const GENERIC_SOURCE_DIRS: &[&str] = &[
    "src",
    "app",
    "routes",
    "controllers",
    "api",
    "lib",
    "server",
    "backend",
    "pages",
    "server/api",
    "app/api",
];

/// Directories never descended into.
pub const IGNORED_DIRS: &[&str] = &["node_modules", "dist", "build", ".next", ".nuxt", "coverage", ".git"];

/// Extensions the generic strategy reads.
pub const SOURCE_EXTENSIONS: &[&str] = &["js", "ts", "mjs", "jsx", "tsx"];

/// File scanner for traversing project directories.
///
/// The `FileScanner` walks the project's source directory and collects the files an extraction
/// strategy reads. Dependency and build output directories are skipped.
///
/// # Example
///
/// ```no_run
/// use apidoc_from_source::scanner::{FileScanner, GENERIC_SOURCE_DIRS};
/// use std::path::PathBuf;
///
/// let scanner = FileScanner::new(PathBuf::from("./my-api"));
/// let result = scanner.scan_sources(GENERIC_SOURCE_DIRS);
/// println!("Found {} source files", result.files.len());
/// ```
pub struct FileScanner {
    root_path: PathBuf,
}

/// Result of directory scanning operation.
#[derive(Debug, Default)]
pub struct ScanResult {
    /// Discovered files, sorted by path
    pub files: Vec<PathBuf>,
    /// Warning messages for entries that could not be accessed
    pub warnings: Vec<String>,
}

/// Files for the annotation-aware strategy.
#[derive(Debug, Default)]
pub struct AnnotatedFiles {
    pub controllers: Vec<PathBuf>,
    pub dtos: Vec<PathBuf>,
    pub warnings: Vec<String>,
}

impl FileScanner {
    pub fn new(root_path: PathBuf) -> Self {
        Self { root_path }
    }

    /// First candidate that exists as a directory under the root, else the root itself.
    pub fn find_source_dir(&self, candidates: &[&str]) -> PathBuf {
        candidates
            .iter()
            .map(|candidate| self.root_path.join(candidate))
            .find(|dir| dir.is_dir())
            .unwrap_or_else(|| self.root_path.clone())
    }

    /// Files for the generic strategy.
    ///
    /// Collects every source-extension file under the source directory. When the source
    /// directory is not the root, top-level `*.js` files of the root are added as well, since
    /// entry points such as `server.js` usually live there.
    pub fn scan_sources(&self, candidates: &[&str]) -> ScanResult {
        let source_dir = self.find_source_dir(candidates);
        debug!("Scanning sources in {}", source_dir.display());

        let mut warnings = Vec::new();
        let mut files: BTreeSet<PathBuf> = walk_files(&source_dir, &mut warnings)
            .into_iter()
            .filter(|path| has_source_extension(path))
            .collect();

        if source_dir != self.root_path {
            files.extend(self.root_js_files(&mut warnings));
        }

        ScanResult {
            files: files.into_iter().collect(),
            warnings,
        }
    }

    /// Controller and DTO files for the annotation-aware strategy.
    pub fn scan_annotated(&self, candidates: &[&str]) -> AnnotatedFiles {
        let source_dir = self.find_source_dir(candidates);
        debug!("Scanning controllers and DTOs in {}", source_dir.display());

        let mut result = AnnotatedFiles::default();
        for path in walk_files(&source_dir, &mut result.warnings) {
            let name = path.file_name().map(|n| n.to_string_lossy().into_owned()).unwrap_or_default();
            if name.ends_with(CONTROLLER_SUFFIX) {
                result.controllers.push(path);
            } else if name.ends_with(DTO_SUFFIX) {
                result.dtos.push(path);
            }
        }

        result.controllers.sort();
        result.dtos.sort();
        result
    }

    fn root_js_files(&self, warnings: &mut Vec<String>) -> Vec<PathBuf> {
        let entries = match fs::read_dir(&self.root_path) {
            Ok(entries) => entries,
            Err(e) => {
                let warning = format!("Failed to list {}: {}", self.root_path.display(), e);
                warn!("{}", warning);
                warnings.push(warning);
                return Vec::new();
            }
        };

        entries
            .filter_map(|entry| entry.ok())
            .map(|entry| entry.path())
            .filter(|path| path.is_file() && path.extension().and_then(|s| s.to_str()) == Some("js"))
            .collect()
    }
}

fn is_ignored(entry: &DirEntry) -> bool {
    if entry.depth() == 0 || !entry.file_type().is_dir() {
        return false;
    }
    let name = entry.file_name().to_string_lossy();
    IGNORED_DIRS.iter().any(|ignored| name == *ignored)
}

fn has_source_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|s| s.to_str())
        .map(|ext| SOURCE_EXTENSIONS.contains(&ext))
        .unwrap_or(false)
}

/// All regular files below `dir`, skipping ignored directories. Inaccessible entries become
/// warnings.
fn walk_files(dir: &Path, warnings: &mut Vec<String>) -> Vec<PathBuf> {
    let mut files = Vec::new();

    for entry in WalkDir::new(dir).into_iter().filter_entry(|e| !is_ignored(e)) {
        match entry {
            Ok(entry) => {
                if entry.file_type().is_file() {
                    files.push(entry.into_path());
                }
            }
            Err(e) => {
                let warning = format!("Failed to access path: {}", e);
                warn!("{}", warning);
                warnings.push(warning);
            }
        }
    }

    files
}
