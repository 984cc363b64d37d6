use glob::Pattern;
use rayon::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, error};
use walkdir::WalkDir;

/// Finds media files by name suffix under one or more roots.
///
/// Suffix matching is exact and case-sensitive: with `.mp4` configured,
/// `movie.MP4` is not reported. No extensions means no matches.
pub struct PathWalker {
    extensions: Vec<String>,
    ignore_patterns: Vec<Pattern>,
}

impl PathWalker {
    pub fn new(extensions: &[String], ignore_globs: &[String]) -> Self {
        let ignore_patterns = ignore_globs
            .iter()
            .filter_map(|glob| match Pattern::new(glob) {
                Ok(p) => Some(p),
                Err(e) => {
                    error!("Invalid glob pattern '{}': {}", glob, e);
                    None
                }
            })
            .collect();

        Self {
            extensions: extensions.to_vec(),
            ignore_patterns,
        }
    }

    pub fn matches_extension(&self, file_name: &str) -> bool {
        self.extensions
            .iter()
            .any(|ext| file_name.ends_with(ext.as_str()))
    }

    fn is_ignored(&self, path: &Path) -> bool {
        self.ignore_patterns
            .iter()
            .any(|pattern| pattern.matches_path(path))
    }

    /// Lazily walk one root. Paths come back as they appear under `root`, so
    /// a relative root yields relative paths.
    pub fn walk<'a>(&'a self, root: &Path) -> impl Iterator<Item = PathBuf> + 'a {
        WalkDir::new(root)
            .follow_links(false)
            .into_iter()
            .filter_entry(move |entry| !self.is_ignored(entry.path()))
            .filter_map(|entry| match entry {
                Ok(entry) => Some(entry),
                Err(err) => {
                    error!("Error walking directory: {}", err);
                    None
                }
            })
            .filter(|entry| entry.file_type().is_file())
            .filter(move |entry| self.matches_extension(&entry.file_name().to_string_lossy()))
            .map(|entry| entry.into_path())
    }

    /// Walk every root in parallel and return the absolute paths found,
    /// sorted so repeated runs hand the store the same sequence.
    pub fn find_all(&self, root_paths: &[String]) -> Vec<PathBuf> {
        if self.extensions.is_empty() {
            debug!("No extensions configured, nothing to find");
            return Vec::new();
        }

        let mut found: Vec<PathBuf> = root_paths
            .par_iter()
            .flat_map_iter(|root| {
                let files: Vec<PathBuf> = match fs::canonicalize(root) {
                    Ok(root) => self.walk(&root).collect(),
                    Err(err) => {
                        error!("Cannot read root directory {}: {}", root, err);
                        Vec::new()
                    }
                };
                debug!("{} matching files under {}", files.len(), root);
                files
            })
            .collect();

        found.sort();
        found.dedup();
        found
    }
}
