//! Embedded image references.
//!
//! Joplin stores attachments in a flat `_resources` directory and links to
//! them relatively (`../../_resources/abc123.png`). Zola serves them from
//! `static/images`, so each body line is scanned for an image name, the name
//! is recorded, and the relative prefix is swapped for the public one.

use anyhow::{bail, Context, Result};
use regex::Regex;
use std::borrow::Cow;
use std::collections::BTreeSet;
use std::path::Path;
use std::sync::LazyLock;

static RESOURCE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[a-z0-9]+\.png").unwrap());

/// Rewrites resource links in body lines.
#[derive(Debug, Clone)]
pub struct ResourceRewriter {
    resource_prefix: String,
    public_prefix: String,
}

impl ResourceRewriter {
    pub fn new(resource_prefix: impl Into<String>, public_prefix: impl Into<String>) -> Self {
        Self {
            resource_prefix: resource_prefix.into(),
            public_prefix: public_prefix.into(),
        }
    }

    /// Returns the line with links rewritten, plus the first image name
    /// found on it. Lines without an image name come back borrowed and
    /// untouched, even if they contain the resource prefix.
    pub fn rewrite_line<'a>(&self, line: &'a str) -> (Cow<'a, str>, Option<String>) {
        let Some(found) = RESOURCE_RE.find(line) else {
            return (Cow::Borrowed(line), None);
        };
        let name = found.as_str().to_string();

        if self.resource_prefix.is_empty() || !line.contains(&self.resource_prefix) {
            return (Cow::Borrowed(line), Some(name));
        }
        let rewritten = line.replace(&self.resource_prefix, &self.public_prefix);
        (Cow::Owned(rewritten), Some(name))
    }
}

/// Resource names collected across a whole run. Sorted so copies happen in
/// a stable order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResourceSet {
    names: BTreeSet<String>,
}

impl ResourceSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `true` if the name was not already present.
    pub fn insert(&mut self, name: impl Into<String>) -> bool {
        self.names.insert(name.into())
    }

    pub fn extend<I, S>(&mut self, names: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.names.extend(names.into_iter().map(Into::into));
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(String::as_str)
    }
}

/// Fail with a "missing resource" error unless every name exists in `from_dir`.
pub fn verify_resources(set: &ResourceSet, from_dir: &Path) -> Result<()> {
    for name in set.iter() {
        let src = from_dir.join(name);
        if !src.is_file() {
            bail!("missing resource: {} does not exist", src.display());
        }
    }
    Ok(())
}

/// Copy one referenced resource byte-for-byte. The destination directory
/// must already exist.
pub fn copy_resource(name: &str, from_dir: &Path, to_dir: &Path) -> Result<u64> {
    let src = from_dir.join(name);
    if !src.is_file() {
        bail!("missing resource: {} does not exist", src.display());
    }
    let dst = to_dir.join(name);
    std::fs::copy(&src, &dst)
        .with_context(|| format!("could not copy {} to {}", src.display(), dst.display()))
}

/// Copy every resource in the set, stopping at the first failure.
///
/// `on_copied(n, total)` runs after each file. A dry run only checks that
/// every source file exists and copies nothing. Returns the number of
/// files copied.
pub fn copy_resources<F>(
    set: &ResourceSet,
    from_dir: &Path,
    to_dir: &Path,
    dry_run: bool,
    mut on_copied: F,
) -> Result<u64>
where
    F: FnMut(u64, u64),
{
    if dry_run {
        verify_resources(set, from_dir)?;
        return Ok(0);
    }

    let total = set.len() as u64;
    let mut copied = 0u64;
    for name in set.iter() {
        copy_resource(name, from_dir, to_dir)?;
        log::debug!("copied resource {}", name);
        copied += 1;
        on_copied(copied, total);
    }
    Ok(copied)
}
