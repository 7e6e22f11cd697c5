//! Measurement export discovery
//!
//! Lists a folder for sound level meter exports by extension. Discovery order
//! is the sorted path order, so repeated runs over the same folder produce the
//! same report row order.

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use thiserror::Error;
use walkdir::{DirEntry, WalkDir};

/// File scanner errors
#[derive(Debug, Error)]
pub enum ScanError {
    /// Specified path does not exist
    #[error("Path not found: {0}")]
    PathNotFound(PathBuf),

    /// Path exists but is not a directory
    #[error("Not a directory: {0}")]
    NotADirectory(PathBuf),
}

/// Measurement export scanner
pub struct FileScanner {
    extension: String,
    recursive: bool,
    ignore_patterns: Vec<String>,
}

impl FileScanner {
    /// Create scanner for an extension (without dot, matched case-insensitively)
    ///
    /// Ignores system files like .DS_Store, Thumbs.db and hidden entries.
    pub fn new(extension: &str) -> Self {
        Self {
            extension: extension.trim_start_matches('.').to_lowercase(),
            recursive: false,
            ignore_patterns: vec![".DS_Store".to_string(), "Thumbs.db".to_string()],
        }
    }

    /// Descend into subdirectories
    pub fn recursive(mut self, recursive: bool) -> Self {
        self.recursive = recursive;
        self
    }

    /// Scan directory for measurement exports, sorted by path
    pub fn scan(&self, root_path: &Path) -> Result<Vec<PathBuf>, ScanError> {
        if !root_path.exists() {
            return Err(ScanError::PathNotFound(root_path.to_path_buf()));
        }

        if !root_path.is_dir() {
            return Err(ScanError::NotADirectory(root_path.to_path_buf()));
        }

        let mut files = Vec::new();
        let mut symlink_visited = HashSet::new();

        let walker = WalkDir::new(root_path)
            .follow_links(false)
            .max_depth(if self.recursive { usize::MAX } else { 1 })
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|e| e.depth() == 0 || self.should_process_entry(e, &mut symlink_visited));

        for entry in walker {
            match entry {
                Ok(entry) => {
                    if entry.file_type().is_file() && self.has_extension(entry.path()) {
                        files.push(entry.path().to_path_buf());
                    }
                }
                Err(e) => {
                    // Unreadable entries are skipped, not fatal
                    tracing::warn!("Error accessing entry: {}", e);
                }
            }
        }

        files.sort();

        tracing::debug!(
            root = %root_path.display(),
            extension = %self.extension,
            count = files.len(),
            "Discovery complete"
        );

        Ok(files)
    }

    /// Check if entry should be processed
    fn should_process_entry(&self, entry: &DirEntry, symlink_visited: &mut HashSet<PathBuf>) -> bool {
        let file_name = entry.file_name().to_string_lossy();

        if file_name.starts_with('.') {
            return false;
        }

        for pattern in &self.ignore_patterns {
            if file_name.contains(pattern.as_str()) {
                return false;
            }
        }

        // Detect symlink loops
        if entry.file_type().is_symlink() {
            if let Ok(canonical) = entry.path().canonicalize() {
                if !symlink_visited.insert(canonical) {
                    tracing::warn!("Symlink loop detected: {}", entry.path().display());
                    return false;
                }
            }
        }

        true
    }

    /// Case-insensitive extension match
    fn has_extension(&self, path: &Path) -> bool {
        path.extension()
            .map(|ext| ext.to_string_lossy().to_lowercase() == self.extension)
            .unwrap_or(false)
    }
}

impl Default for FileScanner {
    fn default() -> Self {
        Self::new("csv")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_extension_detection() {
        let scanner = FileScanner::new(".CSV");
        assert!(scanner.has_extension(Path::new("a.csv")));
        assert!(scanner.has_extension(Path::new("B.CSV")));
        assert!(!scanner.has_extension(Path::new("a.txt")));
        assert!(!scanner.has_extension(Path::new("csv")));
    }

    #[test]
    fn test_scan_nonexistent_path() {
        let scanner = FileScanner::default();
        match scanner.scan(Path::new("/nonexistent/path")) {
            Err(ScanError::PathNotFound(_)) => {}
            other => panic!("Expected PathNotFound error, got {:?}", other),
        }
    }

    #[test]
    fn test_scan_file_as_directory() {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("a.csv");
        fs::write(&file, "").unwrap();

        match FileScanner::default().scan(&file) {
            Err(ScanError::NotADirectory(_)) => {}
            other => panic!("Expected NotADirectory error, got {:?}", other),
        }
    }

    #[test]
    fn test_scan_sorted_and_filtered() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("c.csv"), "").unwrap();
        fs::write(dir.path().join("a.csv"), "").unwrap();
        fs::write(dir.path().join("b.CSV"), "").unwrap();
        fs::write(dir.path().join("notes.txt"), "").unwrap();
        fs::write(dir.path().join(".hidden.csv"), "").unwrap();

        let files = FileScanner::default().scan(dir.path()).unwrap();
        let names: Vec<String> = files
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().to_string())
            .collect();
        assert_eq!(names, vec!["a.csv", "b.CSV", "c.csv"]);
    }

    #[test]
    fn test_scan_recursion_is_opt_in() {
        let dir = TempDir::new().unwrap();
        fs::create_dir(dir.path().join("day2")).unwrap();
        fs::write(dir.path().join("day1.csv"), "").unwrap();
        fs::write(dir.path().join("day2").join("night.csv"), "").unwrap();

        let flat = FileScanner::default().scan(dir.path()).unwrap();
        assert_eq!(flat.len(), 1);

        let deep = FileScanner::default().recursive(true).scan(dir.path()).unwrap();
        assert_eq!(deep.len(), 2);
    }

    #[test]
    fn test_scan_empty_directory() {
        let dir = TempDir::new().unwrap();
        let result = FileScanner::default().scan(dir.path()).unwrap();
        assert!(result.is_empty());
    }
}
