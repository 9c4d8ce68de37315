//! Front matter split, parse, and render.
//!
//! A note is a sequence of lines. The first line equal to `---` opens the
//! header and the next one closes it; every other line is body. Only the
//! first header block counts, so a later `---` (a Markdown rule) stays in
//! the body.

use thiserror::Error;

use crate::models::{NoteHeader, SiteHeader};

const DELIMITER: &str = "---";

#[derive(Debug, Error)]
pub enum FrontMatterError {
    #[error("no opening `---` line found")]
    MissingOpen,
    #[error("front matter opened on line {line} is never closed")]
    MissingClose { line: usize },
    #[error("front matter is not valid YAML: {0}")]
    Parse(#[source] serde_yaml::Error),
    #[error("could not serialize front matter: {0}")]
    Render(#[source] serde_yaml::Error),
}

/// A note split at its header delimiters.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SplitDocument {
    /// Header lines, each terminated by `\n`.
    pub header: String,
    /// Body lines without terminators, in order.
    pub body_lines: Vec<String>,
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum State {
    BeforeHeader,
    InHeader { opened_at: usize },
    AfterHeader,
}

pub fn split_document<I, S>(lines: I) -> Result<SplitDocument, FrontMatterError>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let mut doc = SplitDocument::default();
    let mut state = State::BeforeHeader;

    for (index, line) in lines.into_iter().enumerate() {
        let line = line.into();
        match state {
            State::BeforeHeader if line == DELIMITER => {
                state = State::InHeader {
                    opened_at: index + 1,
                };
            }
            State::InHeader { .. } if line == DELIMITER => {
                state = State::AfterHeader;
            }
            State::InHeader { .. } => {
                doc.header.push_str(&line);
                doc.header.push('\n');
            }
            State::BeforeHeader | State::AfterHeader => doc.body_lines.push(line),
        }
    }

    match state {
        State::BeforeHeader => Err(FrontMatterError::MissingOpen),
        State::InHeader { opened_at } => Err(FrontMatterError::MissingClose { line: opened_at }),
        State::AfterHeader => Ok(doc),
    }
}

/// Parse the raw header text. An empty header yields all-default fields.
pub fn parse_header(text: &str) -> Result<NoteHeader, FrontMatterError> {
    if text.trim().is_empty() {
        return Ok(NoteHeader::default());
    }
    serde_yaml::from_str(text).map_err(FrontMatterError::Parse)
}

pub fn render_header(header: &SiteHeader) -> Result<String, FrontMatterError> {
    serde_yaml::to_string(header).map_err(FrontMatterError::Render)
}

/// Assemble a Zola page: delimited header followed by the body as-is.
pub fn render_document(header: &SiteHeader, body: &str) -> Result<String, FrontMatterError> {
    let yaml = render_header(header)?;
    let mut out = String::with_capacity(yaml.len() + body.len() + 8);
    out.push_str(DELIMITER);
    out.push('\n');
    out.push_str(&yaml);
    if !yaml.ends_with('\n') {
        out.push('\n');
    }
    out.push_str(DELIMITER);
    out.push('\n');
    out.push_str(body);
    Ok(out)
}
