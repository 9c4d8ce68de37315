//! TOML configuration for a conversion run.
//!
//! A single [`Config`] value describes where the Joplin export lives, where
//! the Zola site lives, and how links are rewritten. It is loaded once at
//! startup and passed by reference into every operation.

use anyhow::{bail, Context, Result};
use globset::Glob;
use serde::Deserialize;
use std::path::{Component, Path, PathBuf};

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub source: SourceConfig,
    pub destination: DestinationConfig,
    #[serde(default)]
    pub rewrite: RewriteConfig,
    #[serde(default)]
    pub cleanup: CleanupConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct SourceConfig {
    /// Export root. Holds both the notes tree and the resource directory.
    pub root: PathBuf,
    #[serde(default = "default_notes_dir")]
    pub notes_dir: PathBuf,
    #[serde(default = "default_resources_dir")]
    pub resources_dir: PathBuf,
    /// Entries under `notes_dir` whose relative path starts with any of
    /// these names are never converted. This is a plain string prefix, so
    /// `about` also skips `about-me.md`.
    #[serde(default)]
    pub skip_dirs: Vec<String>,
    /// Match `skip_dirs` against whole leading directory names instead.
    #[serde(default)]
    pub skip_whole_dirs: bool,
    #[serde(default)]
    pub exclude_globs: Vec<String>,
    #[serde(default)]
    pub follow_symlinks: bool,
}

fn default_notes_dir() -> PathBuf {
    PathBuf::from("Website")
}
fn default_resources_dir() -> PathBuf {
    PathBuf::from("_resources")
}

#[derive(Debug, Deserialize, Clone)]
pub struct DestinationConfig {
    pub root: PathBuf,
    #[serde(default = "default_content_dir")]
    pub content_dir: PathBuf,
    #[serde(default = "default_assets_dir")]
    pub assets_dir: PathBuf,
    /// Create missing destination directories instead of failing the write.
    #[serde(default)]
    pub create_dirs: bool,
}

fn default_content_dir() -> PathBuf {
    PathBuf::from("content")
}
fn default_assets_dir() -> PathBuf {
    PathBuf::from("static/images")
}

#[derive(Debug, Deserialize, Clone)]
pub struct RewriteConfig {
    #[serde(default = "default_resource_prefix")]
    pub resource_prefix: String,
    #[serde(default = "default_public_prefix")]
    pub public_prefix: String,
}

impl Default for RewriteConfig {
    fn default() -> Self {
        Self {
            resource_prefix: default_resource_prefix(),
            public_prefix: default_public_prefix(),
        }
    }
}

fn default_resource_prefix() -> String {
    "../../_resources/".to_string()
}
fn default_public_prefix() -> String {
    "/images/".to_string()
}

#[derive(Debug, Deserialize, Clone)]
pub struct CleanupConfig {
    #[serde(default = "default_delete_source")]
    pub delete_source: bool,
}

impl Default for CleanupConfig {
    fn default() -> Self {
        Self {
            delete_source: default_delete_source(),
        }
    }
}

fn default_delete_source() -> bool {
    true
}

impl Config {
    /// Directory that is walked for notes.
    pub fn notes_path(&self) -> PathBuf {
        self.source.root.join(&self.source.notes_dir)
    }

    /// Directory that referenced images are copied from.
    pub fn resources_path(&self) -> PathBuf {
        self.source.root.join(&self.source.resources_dir)
    }

    /// Root of the mirrored Zola content tree.
    pub fn content_path(&self) -> PathBuf {
        self.destination.root.join(&self.destination.content_dir)
    }

    /// Directory that referenced images are copied into.
    pub fn assets_path(&self) -> PathBuf {
        self.destination.root.join(&self.destination.assets_dir)
    }
}

pub fn load_config(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    let config: Config = toml::from_str(&content).with_context(|| "Failed to parse config file")?;
    validate(&config)?;

    Ok(config)
}

fn validate(config: &Config) -> Result<()> {
    if config.source.root.as_os_str().is_empty() {
        bail!("source.root must be set");
    }
    if config.destination.root.as_os_str().is_empty() {
        bail!("destination.root must be set");
    }

    for (key, path) in [
        ("source.notes_dir", &config.source.notes_dir),
        ("source.resources_dir", &config.source.resources_dir),
        ("destination.content_dir", &config.destination.content_dir),
        ("destination.assets_dir", &config.destination.assets_dir),
    ] {
        if !is_plain_relative(path) {
            bail!(
                "{} must be a relative path without '..': {}",
                key,
                path.display()
            );
        }
    }

    for dir in &config.source.skip_dirs {
        if dir.is_empty() || !is_single_component(dir) {
            bail!(
                "source.skip_dirs entries must be single directory names, got '{}'",
                dir
            );
        }
    }

    for pattern in &config.source.exclude_globs {
        Glob::new(pattern)
            .with_context(|| format!("Invalid pattern in source.exclude_globs: '{}'", pattern))?;
    }

    if config.rewrite.public_prefix.is_empty() {
        bail!("rewrite.public_prefix must not be empty");
    }

    Ok(())
}

fn is_plain_relative(path: &Path) -> bool {
    !path.as_os_str().is_empty()
        && path
            .components()
            .all(|c| matches!(c, Component::Normal(_) | Component::CurDir))
}

fn is_single_component(name: &str) -> bool {
    let mut components = Path::new(name).components();
    matches!(
        (components.next(), components.next()),
        (Some(Component::Normal(_)), None)
    )
}
