//! Candidate-file discovery.
//!
//! Thin collaborator around the core pipeline: recursively scans a directory
//! for the `*.figma.tsx`-style files that hold `figma.connect` declarations.
//! Dependency directories and hidden directories are skipped.

use std::path::{Path, PathBuf};
use walkdir::WalkDir;

const CANDIDATE_SUFFIXES: [&str; 4] = [".figma.tsx", ".figma.ts", ".figma.jsx", ".figma.js"];

fn is_candidate(path: &Path) -> bool {
    match path.file_name().and_then(|n| n.to_str()) {
        Some(name) => CANDIDATE_SUFFIXES.iter().any(|s| name.ends_with(s)),
        None => false,
    }
}

fn is_skipped_dir(entry: &walkdir::DirEntry) -> bool {
    if !entry.file_type().is_dir() {
        return false;
    }
    match entry.file_name().to_str() {
        Some(name) => name == "node_modules" || name.starts_with('.'),
        None => false,
    }
}

/// Recursively find declaration files under `dir`, in sorted order so runs
/// are reproducible.
pub fn discover_source_files(dir: &Path) -> Vec<PathBuf> {
    let mut files = Vec::new();
    for entry in WalkDir::new(dir)
        .follow_links(true)
        .into_iter()
        .filter_entry(|e| !is_skipped_dir(e))
        .flatten()
    {
        let path = entry.path();
        if path.is_file() && is_candidate(path) {
            files.push(path.to_path_buf());
        }
    }
    files.sort();
    files
}
