//! Conversion run orchestration.
//!
//! Coordinates the full flow: walk → convert each note → write → copy
//! referenced images → delete the export. The run is fail-fast: the first
//! error stops everything and nothing already written is rolled back.

use anyhow::{bail, Context, Result};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Component, Path, PathBuf};

use crate::config::Config;
use crate::frontmatter::{parse_header, render_document, split_document};
use crate::models::{SiteHeader, TranscodeReport, TranscodedNote};
use crate::progress::{ProgressReporter, TranscodeProgressEvent};
use crate::resources::{copy_resources, ResourceRewriter, ResourceSet};
use crate::scan::scan_notes;
use crate::slug::destination_file_name;

/// Switches for a single run.
#[derive(Debug, Clone, Copy, Default)]
pub struct RunOptions {
    /// Parse everything and check resources, but write, copy, and delete nothing.
    pub dry_run: bool,
    /// Leave the export tree in place even if cleanup is enabled.
    pub keep_source: bool,
}

pub fn rewriter_for(config: &Config) -> ResourceRewriter {
    ResourceRewriter::new(
        config.rewrite.resource_prefix.clone(),
        config.rewrite.public_prefix.clone(),
    )
}

/// Convert one note file in memory.
pub fn transcode_note(
    path: &Path,
    relative_path: &Path,
    rewriter: &ResourceRewriter,
) -> Result<TranscodedNote> {
    let file =
        File::open(path).with_context(|| format!("could not read file: {}", path.display()))?;
    let lines = BufReader::new(file)
        .lines()
        .collect::<std::io::Result<Vec<String>>>()
        .with_context(|| format!("could not read file: {}", path.display()))?;

    let doc = split_document(lines)
        .with_context(|| format!("malformed front matter in {}", path.display()))?;

    let mut body = String::new();
    let mut resources = Vec::new();
    for line in &doc.body_lines {
        let (rewritten, name) = rewriter.rewrite_line(line);
        if let Some(name) = name {
            resources.push(name);
        }
        body.push_str(&rewritten);
        body.push('\n');
    }

    let header = parse_header(&doc.header)
        .with_context(|| format!("could not parse front matter in {}", path.display()))?;

    Ok(TranscodedNote {
        relative_path: relative_path.to_path_buf(),
        header: SiteHeader::from(header),
        body,
        resources,
    })
}

/// Where a note lands: same relative directory, slugged file name.
pub fn destination_path(config: &Config, relative_path: &Path) -> Result<PathBuf> {
    let file_name = relative_path
        .file_name()
        .ok_or_else(|| anyhow::anyhow!("note path has no file name: {}", relative_path.display()))?
        .to_string_lossy();

    let mut dest = config.content_path();
    if let Some(parent) = relative_path.parent() {
        dest.push(parent);
    }
    dest.push(destination_file_name(&file_name));
    Ok(dest)
}

/// Render and write a converted note. Returns the path written.
pub fn write_note(config: &Config, note: &TranscodedNote) -> Result<PathBuf> {
    let dest = destination_path(config, &note.relative_path)?;
    let content = render_document(&note.header, &note.body).with_context(|| {
        format!(
            "could not serialize front matter for {}",
            note.relative_path.display()
        )
    })?;

    if config.destination.create_dirs {
        if let Some(parent) = dest.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("could not create directory: {}", parent.display()))?;
        }
    }

    std::fs::write(&dest, content)
        .with_context(|| format!("could not write file: {}", dest.display()))?;
    Ok(dest)
}

/// Convert a single file and return the rendered page, without touching disk.
pub fn convert_file(config: &Config, path: &Path) -> Result<String> {
    let relative = path.file_name().map(PathBuf::from).unwrap_or_default();
    let note = transcode_note(path, &relative, &rewriter_for(config))?;
    let content = render_document(&note.header, &note.body)
        .with_context(|| format!("could not serialize front matter for {}", path.display()))?;
    Ok(content)
}

pub fn run_transcode(
    config: &Config,
    options: RunOptions,
    reporter: &dyn ProgressReporter,
) -> Result<TranscodeReport> {
    let delete_source = config.cleanup.delete_source && !options.keep_source;
    if delete_source
        && resolve_path(&config.destination.root)?.starts_with(resolve_path(&config.source.root)?)
    {
        bail!(
            "destination {} lies inside the export root {} that would be deleted",
            config.destination.root.display(),
            config.source.root.display()
        );
    }

    reporter.report(TranscodeProgressEvent::Scanning);
    let scan = scan_notes(config)?;
    log::info!(
        "found {} notes under {} ({} skipped)",
        scan.notes.len(),
        config.notes_path().display(),
        scan.skipped
    );

    let rewriter = rewriter_for(config);
    let mut resources = ResourceSet::new();
    let mut report = TranscodeReport {
        notes_skipped: scan.skipped,
        dry_run: options.dry_run,
        ..Default::default()
    };

    let total = scan.notes.len() as u64;
    for (i, file) in scan.notes.iter().enumerate() {
        let note = transcode_note(&file.path, &file.relative_path, &rewriter)?;
        if options.dry_run {
            let dest = destination_path(config, &note.relative_path)?;
            log::debug!("would write {}", dest.display());
        } else {
            let dest = write_note(config, &note)?;
            log::debug!("wrote {}", dest.display());
        }
        resources.extend(note.resources);
        report.notes_converted += 1;
        if !options.dry_run {
            report.notes_written += 1;
        }
        reporter.report(TranscodeProgressEvent::Writing {
            n: i as u64 + 1,
            total,
        });
    }

    let from_dir = config.resources_path();
    let to_dir = config.assets_path();

    if options.dry_run {
        copy_resources(&resources, &from_dir, &to_dir, true, |_, _| {})?;
        log::info!("dry run: {} resources referenced, all present", resources.len());
        return Ok(report);
    }

    if config.destination.create_dirs && !resources.is_empty() {
        std::fs::create_dir_all(&to_dir)
            .with_context(|| format!("could not create directory: {}", to_dir.display()))?;
    }

    report.resources_copied = copy_resources(&resources, &from_dir, &to_dir, false, |n, total| {
        reporter.report(TranscodeProgressEvent::Copying { n, total })
    })?;
    log::info!(
        "copied {} resources to {}",
        report.resources_copied,
        to_dir.display()
    );

    if delete_source {
        reporter.report(TranscodeProgressEvent::Deleting {
            path: config.source.root.clone(),
        });
        std::fs::remove_dir_all(&config.source.root).with_context(|| {
            format!(
                "could not delete export root: {}",
                config.source.root.display()
            )
        })?;
        report.source_deleted = true;
        log::info!("deleted {}", config.source.root.display());
    }

    Ok(report)
}

/// Resolve symlinks and `.`/`..` so two roots can be compared. Parts of the
/// path that do not exist yet are appended to the nearest existing ancestor.
fn resolve_path(path: &Path) -> Result<PathBuf> {
    let absolute = std::path::absolute(path)
        .with_context(|| format!("could not resolve path: {}", path.display()))?;

    let mut existing = absolute.as_path();
    let mut rest = Vec::new();
    let mut resolved = loop {
        if let Ok(resolved) = existing.canonicalize() {
            break resolved;
        }
        match (existing.parent(), existing.components().next_back()) {
            (Some(parent), Some(last)) => {
                rest.push(last.as_os_str().to_os_string());
                existing = parent;
            }
            _ => break existing.to_path_buf(),
        }
    };

    for part in rest.into_iter().rev() {
        match Path::new(&part).components().next() {
            Some(Component::ParentDir) => {
                resolved.pop();
            }
            Some(Component::Normal(name)) => resolved.push(name),
            _ => {}
        }
    }
    Ok(resolved)
}

/// CLI entry point for `jz run`.
pub fn run(config: &Config, options: RunOptions, reporter: &dyn ProgressReporter) -> Result<()> {
    let report = run_transcode(config, options, reporter)?;

    if report.dry_run {
        println!("run (dry-run)");
    } else {
        println!("run");
    }
    println!("  notes converted: {}", report.notes_converted);
    println!("  notes written: {}", report.notes_written);
    println!("  notes skipped: {}", report.notes_skipped);
    println!("  resources copied: {}", report.resources_copied);
    println!(
        "  source deleted: {}",
        if report.source_deleted { "yes" } else { "no" }
    );
    println!("ok");
    Ok(())
}
