use anyhow::{bail, Result};
use std::path::PathBuf;

use crate::config::Config;

/// Existence check for one directory a run depends on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LayoutCheck {
    pub name: &'static str,
    pub path: PathBuf,
    pub exists: bool,
    /// Whether the run creates this directory itself when missing.
    pub created_on_demand: bool,
}

impl LayoutCheck {
    pub fn healthy(&self) -> bool {
        self.exists || self.created_on_demand
    }
}

pub fn check_layout(config: &Config) -> Vec<LayoutCheck> {
    let create = config.destination.create_dirs;
    [
        ("notes", config.notes_path(), false),
        ("resources", config.resources_path(), false),
        ("content", config.content_path(), create),
        ("assets", config.assets_path(), create),
    ]
    .into_iter()
    .map(|(name, path, created_on_demand)| LayoutCheck {
        name,
        exists: path.is_dir(),
        path,
        created_on_demand,
    })
    .collect()
}

pub fn print_layout(config: &Config) -> Result<()> {
    let checks = check_layout(config);

    println!("{:<12} {:<10} {:<8} PATH", "DIRECTORY", "STATUS", "HEALTHY");
    for check in &checks {
        let status = match (check.exists, check.created_on_demand) {
            (true, _) => "OK",
            (false, true) => "CREATE",
            (false, false) => "MISSING",
        };
        println!(
            "{:<12} {:<10} {:<8} {}",
            check.name,
            status,
            check.healthy(),
            check.path.display()
        );
    }

    let missing: Vec<&str> = checks
        .iter()
        .filter(|c| !c.healthy())
        .map(|c| c.name)
        .collect();
    if !missing.is_empty() {
        bail!("missing directories: {}", missing.join(", "));
    }
    Ok(())
}
