//! Core data types used throughout the conversion.
//!
//! [`NoteHeader`] is what a Joplin export carries between its `---` lines;
//! [`SiteHeader`] is what Zola expects. Everything else describes what a
//! run produced.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Front matter of a Joplin note. Unknown keys are ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct NoteHeader {
    pub title: String,
    pub updated: String,
    pub created: String,
    pub tags: Vec<String>,
}

/// Front matter of a Zola page.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SiteHeader {
    pub title: String,
    pub date: String,
    pub updated: String,
    pub taxonomies: Taxonomies,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Taxonomies {
    pub tags: Vec<String>,
}

impl From<NoteHeader> for SiteHeader {
    fn from(note: NoteHeader) -> Self {
        Self {
            title: note.title,
            date: note.created,
            updated: note.updated,
            taxonomies: Taxonomies { tags: note.tags },
        }
    }
}

/// One converted note, ready to be written.
#[derive(Debug, Clone)]
pub struct TranscodedNote {
    /// Path of the source note relative to the notes directory.
    pub relative_path: PathBuf,
    pub header: SiteHeader,
    /// Body text with resource links already rewritten.
    pub body: String,
    /// Resource file names referenced by the body, in order of appearance.
    pub resources: Vec<String>,
}

/// Summary of a completed run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TranscodeReport {
    /// Notes parsed and converted, including on a dry run.
    pub notes_converted: u64,
    /// Notes actually written to the content tree.
    pub notes_written: u64,
    pub notes_skipped: u64,
    pub resources_copied: u64,
    pub source_deleted: bool,
    pub dry_run: bool,
}
