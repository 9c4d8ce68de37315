use anyhow::{bail, Context, Result};
use globset::{Glob, GlobSet, GlobSetBuilder};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use crate::config::Config;

/// A note file selected for conversion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NoteFile {
    pub path: PathBuf,
    /// Path relative to the notes directory.
    pub relative_path: PathBuf,
}

/// Result of walking the notes tree.
#[derive(Debug, Clone, Default)]
pub struct NoteScan {
    pub notes: Vec<NoteFile>,
    pub skipped: u64,
}

/// Walk the notes directory and select every file that should be converted.
///
/// Filters run in this order: skip prefix, exclude globs, directories,
/// names starting with `_`. Directories named with `_` are still descended.
pub fn scan_notes(config: &Config) -> Result<NoteScan> {
    let root = config.notes_path();
    if !root.is_dir() {
        bail!("Notes directory does not exist: {}", root.display());
    }

    let exclude_set = build_globset(&config.source.exclude_globs)?;
    let mut scan = NoteScan::default();

    let walker = WalkDir::new(&root).follow_links(config.source.follow_symlinks);
    for entry in walker {
        let entry = entry.with_context(|| format!("Failed to walk {}", root.display()))?;

        let path = entry.path();
        let relative = path.strip_prefix(&root).unwrap_or(path);
        if relative.as_os_str().is_empty() {
            continue;
        }

        if is_skipped(
            relative,
            &config.source.skip_dirs,
            config.source.skip_whole_dirs,
        ) {
            if !entry.file_type().is_dir() {
                scan.skipped += 1;
            }
            continue;
        }

        if exclude_set.is_match(relative) {
            if !entry.file_type().is_dir() {
                scan.skipped += 1;
            }
            continue;
        }

        if entry.file_type().is_dir() {
            continue;
        }

        if entry.file_name().to_string_lossy().starts_with('_') {
            scan.skipped += 1;
            continue;
        }

        scan.notes.push(NoteFile {
            path: path.to_path_buf(),
            relative_path: relative.to_path_buf(),
        });
    }

    // Sort for deterministic ordering
    scan.notes.sort_by(|a, b| a.relative_path.cmp(&b.relative_path));

    Ok(scan)
}

fn is_skipped(relative: &Path, skip_dirs: &[String], whole_dirs: bool) -> bool {
    if whole_dirs {
        return skip_dirs.iter().any(|dir| relative.starts_with(dir));
    }
    let rel_str = relative.to_string_lossy();
    skip_dirs.iter().any(|dir| rel_str.starts_with(dir.as_str()))
}

fn build_globset(patterns: &[String]) -> Result<GlobSet> {
    let mut builder = GlobSetBuilder::new();
    for pattern in patterns {
        builder.add(Glob::new(pattern)?);
    }
    Ok(builder.build()?)
}
